use super::deserializers::{from_json_string, option_string_or_number};
use crate::helpers::COMMUNITY_HOSTNAME;
use crate::serializers::{option_string, string};
use serde::Deserialize;

const INCORRECT_CREDENTIALS_MESSAGE: &str = "The account name or password that you have entered is incorrect";
const TOO_MANY_FAILURES_MESSAGE: &str = "There have been too many login failures from your network in a short time period";

/// The response to a `/login/dologin/` submission. A response that is not yet
/// successful describes the challenge Steam wants answered before the
/// credentials are accepted.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub login_complete: bool,
    /// Whether Steam wants a Steam Guard code before completing the login.
    #[serde(default)]
    pub requires_twofactor: bool,
    /// Whether Steam wants a CAPTCHA answer before completing the login.
    #[serde(default)]
    pub captcha_needed: bool,
    /// The CAPTCHA challenge id. Steam encodes the absence of a challenge as
    /// `-1`, which deserializes to `None` here.
    #[serde(default, deserialize_with = "option_string_or_number")]
    pub captcha_gid: Option<String>,
    /// Human-readable description of what went wrong.
    #[serde(default)]
    pub message: Option<String>,
    /// OAuth tokens. Only present for logins marked as coming from the
    /// mobile client.
    #[serde(default, deserialize_with = "from_json_string")]
    pub oauth: Option<OAuthData>,
    /// The account's SteamID. Accompanies transfer info.
    #[serde(default, rename = "steamID", with = "option_string")]
    pub steamid: Option<u64>,
    /// Per-domain login transfers to perform to finish the session.
    #[serde(default)]
    pub transfer_info: Option<Vec<TransferInfo>>,
}

impl LoginResponse {
    /// Whether the submitted credentials were rejected outright. Retrying
    /// will not help.
    pub fn is_credentials_incorrect(&self) -> bool {
        self.message_contains(INCORRECT_CREDENTIALS_MESSAGE)
    }

    /// Whether Steam is refusing logins from this network for now.
    pub fn is_too_many_attempts(&self) -> bool {
        self.message_contains(TOO_MANY_FAILURES_MESSAGE)
    }

    /// The URL of the CAPTCHA image to solve, when a challenge was posed.
    pub fn captcha_url(&self) -> Option<String> {
        self.captcha_gid.as_ref()
            .map(|gid| format!("https://{COMMUNITY_HOSTNAME}/login/rendercaptcha/?gid={gid}"))
    }

    fn message_contains(&self, pattern: &str) -> bool {
        self.message.as_deref()
            .map(|message| message.contains(pattern))
            .unwrap_or(false)
    }
}

/// OAuth tokens issued to mobile logins.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct OAuthData {
    #[serde(with = "string")]
    pub steamid: u64,
    #[serde(default)]
    pub account_name: Option<String>,
    pub oauth_token: String,
    pub wgtoken: String,
    pub wgtoken_secure: String,
    #[serde(default)]
    pub webcookie: Option<String>,
}

impl OAuthData {
    /// The value of the `steamLogin` cookie.
    pub fn steam_login(&self) -> String {
        format!("{}%7C%7C{}", self.steamid, self.wgtoken)
    }

    /// The value of the `steamLoginSecure` cookie.
    pub fn steam_login_secure(&self) -> String {
        format!("{}%7C%7C{}", self.steamid, self.wgtoken_secure)
    }
}

/// One per-domain login transfer. Posting [`params`](Self::params) to
/// [`url`](Self::url) sets that domain's session cookies.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TransferInfo {
    pub url: String,
    pub params: TransferParameters,
}

/// Parameters posted to a transfer URL, along with the account's SteamID.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TransferParameters {
    pub nonce: String,
    pub auth: String,
}
