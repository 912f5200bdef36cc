//! Authentication parameter bundles.

use serde::{Deserialize, Serialize};

/// Auth bundle read from one device. Immutable once the device connected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthParams {
    /// Account id.
    pub dsid: String,

    /// Storefront of the signed-in account.
    pub storefront: String,

    /// Music user token of the signed-in account.
    pub account_token: String,
}

/// Auth for one job: the selected device's bundle plus the process-wide
/// anonymous access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalAuthParams {
    pub dsid: String,
    pub storefront: String,
    pub account_token: String,
    pub anonymous_access_token: String,
}

impl GlobalAuthParams {
    /// Combine a device's auth bundle with the anonymous token.
    pub fn from_auth_params_and_token(auth: &AuthParams, token: &str) -> Self {
        Self {
            dsid: auth.dsid.clone(),
            storefront: auth.storefront.to_lowercase(),
            account_token: auth.account_token.clone(),
            anonymous_access_token: token.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_params_from_device_json() {
        let json = r#"{"dsid":"12345","storefront":"JP","accountToken":"tok"}"#;
        let auth: AuthParams = serde_json::from_str(json).unwrap();
        assert_eq!(auth.storefront, "JP");

        let global = GlobalAuthParams::from_auth_params_and_token(&auth, "anon");
        assert_eq!(global.storefront, "jp");
        assert_eq!(global.account_token, "tok");
        assert_eq!(global.anonymous_access_token, "anon");
    }
}
