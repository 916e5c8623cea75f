use serde::Deserialize;

use super::OAUTH_CLIENT_PREFIX;
use crate::client::ApiClient;
use crate::error::Result;
use crate::http::Transport;
use crate::params::Params;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Voucher {
    pub uuid: String,
    pub code: String,
    pub status: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub expiration_date: Option<String>,
}

impl Voucher {
    pub fn is_redeemed(&self) -> bool {
        self.status.eq_ignore_ascii_case("redeemed")
    }
}

pub struct Vouchers<'a, T> {
    client: &'a ApiClient<T>,
}

impl<'a, T: Transport> Vouchers<'a, T> {
    pub fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    /// Look a voucher up by its printed code.
    pub fn find(&self, code: &str) -> Result<Voucher> {
        self.client
            .get(
                &format!("{OAUTH_CLIENT_PREFIX}/vouchers/find"),
                &Params::from([("code", code)]),
            )?
            .data_as()
    }

    /// Redeem a voucher, optionally on behalf of a contact.
    pub fn redeem(&self, code: &str, contact_uuid: Option<&str>) -> Result<Voucher> {
        let params = Params::new()
            .with("code", code)
            .with("contact_uuid", contact_uuid);
        self.client
            .post(&format!("{OAUTH_CLIENT_PREFIX}/vouchers/redeem"), &params)?
            .data_as()
    }
}
