use crate::time;
use serde::Serialize;

/// Client ID the Steam mobile app authenticates with. Logins carrying it
/// receive OAuth tokens in the response.
const OAUTH_CLIENT_ID: &str = "DE45CD61";
/// OAuth scope requested by the mobile app.
const OAUTH_SCOPE: &str = "read_profile write_profile read_client write_client";

/// The form submitted to `/login/dologin/`.
///
/// Most fields are fixed to what the mobile client sends. The challenge
/// fields start empty and are filled in by [`set_captcha`](Self::set_captcha)
/// and [`set_twofactor_code`](Self::set_twofactor_code) when Steam asks.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct LoginRequest {
    pub donotcache: u64,
    /// The RSA-encrypted password, base64 encoded.
    pub password: String,
    pub username: String,
    /// The Steam Guard code. Empty until Steam requests two-factor.
    pub twofactorcode: String,
    pub emailauth: String,
    pub loginfriendlyname: String,
    /// The CAPTCHA challenge id. `-1` when no CAPTCHA was posed.
    pub captchagid: String,
    pub captcha_text: String,
    pub emailsteamid: String,
    /// The timestamp returned with the RSA key material.
    pub rsatimestamp: u64,
    pub remember_login: String,
    pub tokentype: String,
    pub oauth_client_id: String,
    pub oauth_scope: String,
}

impl LoginRequest {
    pub fn new<U, P>(username: U, encrypted_password: P, rsatimestamp: u64) -> Self
    where
        U: Into<String>,
        P: Into<String>,
    {
        Self {
            donotcache: time::get_system_time(),
            password: encrypted_password.into(),
            username: username.into(),
            twofactorcode: String::new(),
            emailauth: String::new(),
            loginfriendlyname: "#login_emailauth_friendlyname_mobile".into(),
            captchagid: "-1".into(),
            captcha_text: String::new(),
            emailsteamid: String::new(),
            rsatimestamp,
            remember_login: "1".into(),
            tokentype: "-1".into(),
            oauth_client_id: OAUTH_CLIENT_ID.into(),
            oauth_scope: OAUTH_SCOPE.into(),
        }
    }

    /// Fills in the answer to a CAPTCHA challenge.
    pub fn set_captcha<G, T>(&mut self, gid: G, text: T)
    where
        G: Into<String>,
        T: Into<String>,
    {
        self.captchagid = gid.into();
        self.captcha_text = text.into();
    }

    /// Fills in a Steam Guard code.
    pub fn set_twofactor_code<C>(&mut self, code: C)
    where
        C: Into<String>,
    {
        self.twofactorcode = code.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_request_carries_mobile_client_fields() {
        let request = LoginRequest::new("alice", "ZW5jcnlwdGVk", 216000000);

        assert_eq!(request.username, "alice");
        assert_eq!(request.rsatimestamp, 216000000);
        assert_eq!(request.captchagid, "-1");
        assert_eq!(request.twofactorcode, "");
        assert_eq!(request.oauth_client_id, "DE45CD61");
        assert_eq!(request.remember_login, "1");
    }

    #[test]
    fn fills_challenge_answers() {
        let mut request = LoginRequest::new("alice", "ZW5jcnlwdGVk", 216000000);

        request.set_captcha("3122988401908795871", "w7tx25");
        request.set_twofactor_code("B2RPM");

        assert_eq!(request.captchagid, "3122988401908795871");
        assert_eq!(request.captcha_text, "w7tx25");
        assert_eq!(request.twofactorcode, "B2RPM");
    }
}
