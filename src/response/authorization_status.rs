use crate::serializers::option_string;
use serde::Deserialize;

/// The response to the login probe at `/chat/clientjstoken`. When the stored
/// cookies are no longer accepted every field other than `logged_in` comes
/// back empty.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AuthorizationStatus {
    #[serde(default)]
    pub logged_in: bool,
    #[serde(default, with = "option_string")]
    pub steamid: Option<u64>,
    #[serde(default)]
    pub accountid: u32,
    #[serde(default, with = "option_string")]
    pub account_name: Option<String>,
    #[serde(default, with = "option_string")]
    pub token: Option<String>,
}
