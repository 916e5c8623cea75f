use serde::Deserialize;

use super::{path_segment, OAUTH_CLIENT_PREFIX};
use crate::client::ApiClient;
use crate::error::Result;
use crate::http::Transport;
use crate::params::Params;

/// A physical or web shop registered with the loyalty program.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Shop {
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub id: Option<u64>,
}

pub struct Shops<'a, T> {
    client: &'a ApiClient<T>,
}

impl<'a, T: Transport> Shops<'a, T> {
    pub fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    pub fn list(&self) -> Result<Vec<Shop>> {
        self.client
            .get(&format!("{OAUTH_CLIENT_PREFIX}/shops"), &Params::new())?
            .data_as()
    }

    /// `uuid` is sent as one escaped path segment.
    pub fn find(&self, uuid: &str) -> Result<Shop> {
        let path = format!("{OAUTH_CLIENT_PREFIX}/shops/{}", path_segment(uuid));
        self.client.get(&path, &Params::new())?.data_as()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::error::ErrorKind;
    use crate::http::{HttpRequest, HttpResponse, TransportError};

    struct Canned(&'static str);

    impl Transport for Canned {
        fn send(&self, request: &HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
            assert!(request.url.starts_with("https://example.test/api/v3/oauth/clients/shops"));
            Ok(HttpResponse::new(200, self.0))
        }
    }

    fn client(body: &'static str) -> ApiClient<Canned> {
        let mut client = ApiClient::new(Canned(body));
        client.configure("https://example.test");
        client.add_header("Authorization", "Bearer abc");
        client
    }

    #[test]
    fn list_decodes_shops() {
        let client = client(r#"{"data":[{"uuid":"u1","name":"Shop One"},{"uuid":"u2","name":"Two","id":7}]}"#);
        let shops = Shops::new(&client).list().unwrap();
        assert_eq!(shops.len(), 2);
        assert_eq!(shops[0].name, "Shop One");
        assert_eq!(shops[0].id, None);
        assert_eq!(shops[1].id, Some(7));
    }

    #[test]
    fn find_rejects_wrong_shape() {
        let client = client(r#"{"data":{"uuid":"u1"}}"#);
        let err = Shops::new(&client).find("u1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[derive(Default)]
    struct Recording {
        urls: RefCell<Vec<String>>,
    }

    impl Transport for Recording {
        fn send(&self, request: &HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
            self.urls.borrow_mut().push(request.url.clone());
            Ok(HttpResponse::new(200, r#"{"data":{"uuid":"u1","name":"Shop One"}}"#))
        }
    }

    #[test]
    fn find_keeps_uuid_inside_its_segment() {
        let transport = Recording::default();
        let mut client = ApiClient::new(&transport);
        client.configure("https://example.test");
        client.add_header("Authorization", "Bearer abc");

        Shops::new(&client).find("../vouchers/redeem?code=X").unwrap();
        Shops::new(&client).find("..").unwrap();

        let urls = transport.urls.borrow();
        assert_eq!(
            urls[0],
            "https://example.test/api/v3/oauth/clients/shops/..%2Fvouchers%2Fredeem%3Fcode%3DX"
        );
        assert!(!urls[0].contains('?'));
        assert_eq!(urls[1], "https://example.test/api/v3/oauth/clients/shops/%2E%2E");
    }
}
