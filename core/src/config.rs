//! Client configuration: base URL plus the headers sent on every request.

use std::env;

use crate::http;

pub const DEFAULT_BASE_URL: &str = "https://api.piggy.nl";
pub const ACCEPT: &str = "application/json, */*;q=0.1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    headers: Vec<(String, String)>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize(base_url),
            headers: vec![("Accept".to_string(), ACCEPT.to_string())],
        }
    }

    /// Reads `LEAT_API_BASE_URL` and `LEAT_API_KEY`. A present API key is
    /// installed as a bearer `Authorization` header.
    pub fn from_env() -> Self {
        let base_url = env::var("LEAT_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let mut config = Self::new(&base_url);
        if let Ok(key) = env::var("LEAT_API_KEY") {
            if !key.trim().is_empty() {
                config.set_header("Authorization", &format!("Bearer {}", key.trim()));
            }
        }
        config
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_base_url(&mut self, base_url: &str) {
        self.base_url = normalize(base_url);
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Header names are unique ignoring case; setting an existing name
    /// replaces its value and keeps its position.
    pub fn set_header(&mut self, name: &str, value: &str) {
        http::set_header(&mut self.headers, name, value);
    }
}

fn normalize(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}
