//! Per-entity wrappers over `ApiClient`.
//!
//! Each resource owns one REST sub-path and decodes `envelope.data` into a
//! typed value. Decode failures surface as `MalformedResponse`.

pub mod shops;
pub mod vouchers;

pub use shops::{Shop, Shops};
pub use vouchers::{Voucher, Vouchers};

/// Path prefix of the OAuth client API.
pub const OAUTH_CLIENT_PREFIX: &str = "/api/v3/oauth/clients";

/// Percent-encode `value` as a single URL path segment.
///
/// `/`, `?` and `#` are escaped so a caller-supplied identifier can never
/// leave its segment. The dot segments `.` and `..` are escaped too, since
/// URL normalization would otherwise resolve them against the parent path.
pub(crate) fn path_segment(value: &str) -> String {
    match value {
        "." => "%2E".to_string(),
        ".." => "%2E%2E".to_string(),
        // form encoding writes spaces as `+`; a literal `+` is already `%2B`.
        _ => url::form_urlencoded::byte_serialize(value.as_bytes())
            .collect::<String>()
            .replace('+', "%20"),
    }
}
