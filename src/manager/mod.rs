mod builder;
mod login;

pub use builder::AuthManagerBuilder;
pub use login::RetryPolicy;

use login::LoginAttempt;

use crate::account::{Account, AccountRegistry};
use crate::captcha::CaptchaSolver;
use crate::error::{CaptchaError, Error, LoginError, ParameterError, TransportError};
use crate::guard;
use crate::helpers::{
    fetch_server_time, generate_sessionid, get_url, mobile_client_cookies, parses_response,
    COMMUNITY_HOSTNAME,
};
use crate::mobile_api::MobileAPI;
use crate::request::LoginRequest;
use crate::response::{AuthorizationStatus, LoginResponse, MobileConfirmation, RsaKey, TransferInfo};
use crate::storage::CookieStore;
use crate::time;
use crate::transport::{HttpRequest, RequestStrategy};
use crate::types::{CookieMap, TradeOfferId};
use std::mem;
use std::sync::Arc;
use std::time::Duration;
use steamid_ng::SteamID;
use url::Url;

/// Manager which includes functionality for logging accounts into Steam and
/// acting on their sessions.
///
/// Accounts are registered under a login name. Logging in writes the session
/// cookies into the cookie store keyed by that login; every other operation
/// reads them back from there.
#[derive(Clone)]
pub struct AuthManager {
    registry: Arc<AccountRegistry>,
    store: Arc<dyn CookieStore>,
    strategy: Arc<dyn RequestStrategy>,
    captcha_solver: Option<Arc<dyn CaptchaSolver>>,
    retry_policy: RetryPolicy,
    /// The underlying API for mobile confirmations.
    mobile_api: MobileAPI,
}

impl AuthManager {
    /// Creates a new [`AuthManager`] with in-memory cookie storage and the
    /// default transport.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Builder for constructing an [`AuthManager`].
    pub fn builder() -> AuthManagerBuilder {
        AuthManagerBuilder::new()
    }

    /// The account registry logins resolve against.
    pub fn registry(&self) -> &AccountRegistry {
        &self.registry
    }

    /// Registers an account under a login name.
    pub fn add_account(&self, login: &str, account: Account) -> Result<(), Error> {
        self.registry.add(login, account)?;

        Ok(())
    }

    /// Removes an account, returning its details. Stored cookies are left
    /// untouched; use [`clear_cookies`](Self::clear_cookies) to drop them.
    pub fn remove_account(&self, login: &str) -> Result<Account, Error> {
        let account = self.registry.remove(login)?;

        Ok(account)
    }

    /// Logs an account into Steam.
    ///
    /// Logins are idempotent. When the stored session still holds up this
    /// returns without touching anything. Otherwise the full sequence runs:
    /// a fresh sessionid is fetched, the password is encrypted with the
    /// account's RSA key and submitted, CAPTCHA and Steam Guard challenges
    /// are answered up to the retry budget, and the resulting cookies are
    /// stored per domain.
    pub async fn login(&self, login: &str) -> Result<(), Error> {
        let authorized = match self.is_authorized(login).await {
            Ok(authorized) => authorized,
            Err(Error::NotLoggedIn) => false,
            Err(Error::Transport(TransportError::Unauthorized)) => false,
            Err(error) => return Err(error),
        };

        if authorized {
            log::debug!("{login} already has a live session");
            return Ok(());
        }

        let password = self.registry.password(login)?;
        let sessionid = self.bootstrap_sessionid().await?;
        let rsa_key = self.fetch_rsa_key(login).await?;
        let rsatimestamp = rsa_key.timestamp
            .ok_or(LoginError::InvalidKeyMaterial)?;
        let encrypted_password = rsa_key.encrypt_password(&password)?;
        let request = LoginRequest::new(login, encrypted_password, rsatimestamp);
        let (response, cookies) = self.submit_until_complete(login, request).await?;

        self.finalize(login, &sessionid, response, cookies).await?;
        log::debug!("{login} logged in");

        Ok(())
    }

    /// Logs every registered account in sequentially, pausing between
    /// accounts to stay off Steam's rate limits.
    pub async fn login_all(&self, pause: Duration) -> Result<(), Error> {
        for (i, login) in self.registry.logins().iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(pause).await;
            }

            self.login(login).await?;
        }

        Ok(())
    }

    /// Whether the stored session for a login is still accepted by Steam.
    pub async fn is_authorized(&self, login: &str) -> Result<bool, Error> {
        let request = HttpRequest::get(get_url(COMMUNITY_HOSTNAME, "/chat/clientjstoken"));
        let body = self.request_for_login(login, request).await?;
        let status: AuthorizationStatus = parses_response(&body)?;

        Ok(status.logged_in)
    }

    /// Performs a request with the login's stored cookies for the request's
    /// host merged in. Cookies already on the request win over stored ones.
    pub async fn request_for_login(
        &self,
        login: &str,
        request: HttpRequest,
    ) -> Result<String, Error> {
        let request = self.authorize_request(login, request).await?;
        let body = self.strategy.request(request).await?;

        Ok(body)
    }

    /// The sessionid cookie of the login's community session.
    pub async fn sessionid(&self, login: &str) -> Result<String, Error> {
        self.cookies(login, COMMUNITY_HOSTNAME).await?
            .get("sessionid")
            .cloned()
            .ok_or(Error::NotLoggedIn)
    }

    /// The stored cookies for a login on a hostname. Empty if the login has
    /// no session there.
    pub async fn cookies(&self, login: &str, hostname: &str) -> Result<CookieMap, Error> {
        let cookies = self.store.get(login, hostname).await?;

        Ok(cookies)
    }

    /// Drops every stored cookie for a login, across all domains.
    pub async fn clear_cookies(&self, login: &str) -> Result<(), Error> {
        self.store.clear(login).await?;

        Ok(())
    }

    /// Fetches Steam's current time.
    pub async fn get_server_time(&self) -> Result<u64, Error> {
        fetch_server_time(self.strategy.as_ref()).await
    }

    /// Generates the Steam Guard code for a login at the current server
    /// time.
    pub async fn guard_code(&self, login: &str) -> Result<String, Error> {
        let authenticator = self.registry.authenticator(login)?;
        let server_time = self.get_server_time().await?;
        let code = guard::generate_guard_code(&authenticator.shared_secret, server_time)?;

        Ok(code)
    }

    /// Gets the pending mobile confirmations for a login.
    pub async fn get_confirmations(&self, login: &str) -> Result<Vec<MobileConfirmation>, Error> {
        self.mobile_api.get_confirmations(login).await
    }

    /// Accepts a mobile confirmation. Returns the server's verdict.
    pub async fn accept_confirmation(
        &self,
        login: &str,
        confirmation: &MobileConfirmation,
    ) -> Result<bool, Error> {
        self.mobile_api.accept_confirmation(login, confirmation).await
    }

    /// Cancels a mobile confirmation. Returns the server's verdict.
    pub async fn cancel_confirmation(
        &self,
        login: &str,
        confirmation: &MobileConfirmation,
    ) -> Result<bool, Error> {
        self.mobile_api.cancel_confirmation(login, confirmation).await
    }

    /// Accepts the pending confirmation belonging to a trade offer.
    pub async fn accept_confirmation_for_offer(
        &self,
        login: &str,
        tradeofferid: TradeOfferId,
    ) -> Result<bool, Error> {
        self.mobile_api.accept_confirmation_for_offer(login, tradeofferid).await
    }

    /// Fetches a fresh anonymous sessionid from the community site.
    async fn bootstrap_sessionid(&self) -> Result<String, Error> {
        let request = HttpRequest::get(get_url(COMMUNITY_HOSTNAME, "/"))
            .with_cookies(mobile_client_cookies());
        let (_body, cookies) = self.strategy.request_with_cookies(request).await?;
        let sessionid = cookies.get("sessionid")
            .cloned()
            .unwrap_or_else(generate_sessionid);

        Ok(sessionid)
    }

    /// Fetches the RSA key material the password must be encrypted with.
    async fn fetch_rsa_key(&self, login: &str) -> Result<RsaKey, Error> {
        let cookies = self.store.get(login, COMMUNITY_HOSTNAME).await?;
        let request = HttpRequest::post(get_url(COMMUNITY_HOSTNAME, "/login/getrsakey/"))
            .with_cookies(cookies)
            .with_cookies(mobile_client_cookies())
            .with_form_pairs(vec![
                ("donotcache".into(), time::get_system_time().to_string()),
                ("username".into(), login.into()),
            ]);
        let body = self.strategy.request(request).await?;
        let rsa_key: RsaKey = parses_response(&body)?;

        if !rsa_key.success {
            return Err(LoginError::KeyRetrieval.into());
        }

        Ok(rsa_key)
    }

    /// Submits the login request until Steam accepts it, answering CAPTCHA
    /// and Steam Guard challenges along the way.
    ///
    /// Challenge resubmits draw from the shared attempt budget unless the
    /// policy gives CAPTCHA its own. A failed CAPTCHA solve is retried
    /// against the budget and surfaces once it runs out; transport errors
    /// propagate immediately.
    async fn submit_until_complete(
        &self,
        login: &str,
        mut request: LoginRequest,
    ) -> Result<(LoginResponse, CookieMap), Error> {
        let RetryPolicy { attempts, captcha_attempts } = self.retry_policy;
        let mut submits = 0u8;
        let mut captcha_submits = 0u8;
        let mut answering_captcha = false;
        let mut last_message: Option<String> = None;
        let mut solve_error: Option<CaptchaError> = None;

        loop {
            let exhausted = match (answering_captcha, captcha_attempts) {
                (true, Some(budget)) => captcha_submits >= budget,
                _ => submits >= attempts,
            };

            if exhausted {
                if let Some(error) = solve_error.take() {
                    return Err(error.into());
                }

                return Err(LoginError::Failed(last_message).into());
            }

            match (answering_captcha, captcha_attempts) {
                (true, Some(_)) => captcha_submits += 1,
                _ => submits += 1,
            }

            let (response, cookies) = self.submit_login(&request).await?;

            last_message = response.message.clone();

            match login::evaluate(&response)? {
                LoginAttempt::Complete => return Ok((response, cookies)),
                LoginAttempt::Captcha { gid, url } => {
                    log::debug!("{login} was challenged with a CAPTCHA");

                    let solver = self.captcha_solver.as_deref()
                        .ok_or(CaptchaError::SolverNotConfigured)?;

                    answering_captcha = true;

                    match solver.solve(&url).await {
                        Ok(text) => {
                            solve_error = None;
                            request.set_captcha(gid, text);
                        },
                        // resubmitting re-poses the challenge, so the solve
                        // is retried against the budget
                        Err(error) => solve_error = Some(error),
                    }
                },
                LoginAttempt::TwoFactor => {
                    log::debug!("{login} was challenged for a Steam Guard code");

                    let authenticator = self.registry.authenticator(login)?;
                    let server_time = fetch_server_time(self.strategy.as_ref()).await?;
                    let code = guard::generate_guard_code(&authenticator.shared_secret, server_time)?;

                    answering_captcha = false;
                    request.set_twofactor_code(code);
                },
                LoginAttempt::Retry => answering_captcha = false,
            }
        }
    }

    async fn submit_login(&self, request: &LoginRequest) -> Result<(LoginResponse, CookieMap), Error> {
        let http_request = HttpRequest::post(get_url(COMMUNITY_HOSTNAME, "/login/dologin/"))
            .with_cookies(mobile_client_cookies())
            .with_form(request)?;
        let (body, cookies) = self.strategy.request_with_cookies(http_request).await?;
        let response = parses_response(&body)?;

        Ok((response, cookies))
    }

    /// Turns an accepted login into stored sessions.
    ///
    /// The community map is always written: the bootstrap sessionid, the
    /// cookies the submit response set, and login cookies synthesized from
    /// the OAuth blob when one was issued. The transfer variant additionally
    /// posts each per-domain transfer and stores that domain's cookies under
    /// its own hostname.
    async fn finalize(
        &self,
        login: &str,
        sessionid: &str,
        response: LoginResponse,
        submit_cookies: CookieMap,
    ) -> Result<(), Error> {
        let mut community = submit_cookies;

        community.insert("sessionid".into(), sessionid.into());

        if let Some(oauth) = &response.oauth {
            self.registry.set_steamid(login, SteamID::from(oauth.steamid))?;
            community.insert("steamLogin".into(), oauth.steam_login());
            community.insert("steamLoginSecure".into(), oauth.steam_login_secure());
        } else if let Some(steamid) = response.steamid {
            self.registry.set_steamid(login, SteamID::from(steamid))?;
        }

        if let Some(transfers) = &response.transfer_info {
            let steamid = self.registry.steamid(login)?;

            for transfer in transfers {
                let (hostname, cookies) = self.transfer_login(transfer, steamid).await?;

                if hostname == COMMUNITY_HOSTNAME {
                    community.extend(cookies);
                } else {
                    self.store.set(login, &hostname, cookies).await?;
                }
            }
        }

        self.store.set(login, COMMUNITY_HOSTNAME, community).await?;

        Ok(())
    }

    /// Posts one per-domain transfer, returning the domain and the cookies
    /// it set.
    async fn transfer_login(
        &self,
        transfer: &TransferInfo,
        steamid: SteamID,
    ) -> Result<(String, CookieMap), Error> {
        let url = Url::parse(&transfer.url)
            .map_err(ParameterError::from)?;
        let hostname = url.host_str()
            .ok_or_else(|| Error::Response(format!("Transfer URL has no host: {}", transfer.url)))?
            .to_string();
        let request = HttpRequest::post(&transfer.url)
            .with_form_pairs(vec![
                ("nonce".into(), transfer.params.nonce.clone()),
                ("auth".into(), transfer.params.auth.clone()),
                ("steamID".into(), u64::from(steamid).to_string()),
            ]);
        let (_body, cookies) = self.strategy.request_with_cookies(request).await?;

        Ok((hostname, cookies))
    }

    async fn authorize_request(
        &self,
        login: &str,
        mut request: HttpRequest,
    ) -> Result<HttpRequest, Error> {
        let url = Url::parse(&request.url)
            .map_err(ParameterError::from)?;
        let hostname = url.host_str()
            .unwrap_or(COMMUNITY_HOSTNAME)
            .to_string();
        let mut cookies = self.store.get(login, &hostname).await?;

        cookies.extend(mem::take(&mut request.cookies));
        request.cookies = cookies;

        Ok(request)
    }
}

impl Default for AuthManager {
    fn default() -> Self {
        Self::new()
    }
}

impl From<AuthManagerBuilder> for AuthManager {
    fn from(builder: AuthManagerBuilder) -> Self {
        let registry = Arc::new(AccountRegistry::new());
        let mobile_api = MobileAPI::new(
            Arc::clone(&registry),
            Arc::clone(&builder.store),
            Arc::clone(&builder.strategy),
        );

        Self {
            registry,
            store: builder.store,
            strategy: builder.strategy,
            captcha_solver: builder.captcha_solver,
            retry_policy: builder.retry_policy,
            mobile_api,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::Authenticator;
    use crate::storage::MemoryCookieStore;
    use crate::testing::ScriptedStrategy;
    use async_trait::async_trait;
    use rsa::traits::PublicKeyParts;
    use rsa::{Pkcs1v15Encrypt, RsaPrivateKey};
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const STEAMID: u64 = 76561197960287930;
    const SECRET: &str = "MDEyMzQ1Njc4OTAxMjM0NTY3ODk=";
    const SESSIONID: &str = "08a4a4287d4ae0773088cc93";

    const PROBE_URL: &str = "https://steamcommunity.com/chat/clientjstoken";
    const BOOTSTRAP_URL: &str = "https://steamcommunity.com/";
    const RSA_KEY_URL: &str = "https://steamcommunity.com/login/getrsakey/";
    const DOLOGIN_URL: &str = "https://steamcommunity.com/login/dologin/";
    const QUERY_TIME_URL: &str = "https://api.steampowered.com/ITwoFactorService/QueryTime/v0001";

    const UNAUTHORIZED_PROBE: &str = r#"{"logged_in":false,"steamid":"","accountid":0,"account_name":"","token":""}"#;
    const QUERY_TIME_RESPONSE: &str = r#"{"response":{"server_time":"1700000000"}}"#;

    struct ScriptedSolver {
        answer: String,
        calls: AtomicUsize,
    }

    impl ScriptedSolver {
        fn new(answer: &str) -> Self {
            Self {
                answer: answer.into(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CaptchaSolver for ScriptedSolver {
        async fn solve(&self, _captcha_url: &str) -> Result<String, CaptchaError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            Ok(self.answer.clone())
        }
    }

    fn scripted_manager(
        strategy: ScriptedStrategy,
        solver: Option<Arc<ScriptedSolver>>,
    ) -> (AuthManager, Arc<ScriptedStrategy>, Arc<MemoryCookieStore>) {
        let strategy = Arc::new(strategy);
        let store = Arc::new(MemoryCookieStore::default());
        let mut builder = AuthManager::builder()
            .cookie_store(store.clone())
            .request_strategy(strategy.clone());

        if let Some(solver) = solver {
            builder = builder.captcha_solver(solver);
        }

        let manager = builder.build();

        manager.add_account("alice", Account::new("hunter2")).unwrap();

        (manager, strategy, store)
    }

    fn bootstrap_cookies() -> CookieMap {
        CookieMap::from([("sessionid".into(), SESSIONID.into())])
    }

    fn rsa_key_response(private_key: &RsaPrivateKey) -> String {
        let public_key = private_key.to_public_key();

        serde_json::json!({
            "success": true,
            "publickey_mod": public_key.n().to_str_radix(16),
            "publickey_exp": public_key.e().to_str_radix(16),
            "timestamp": "216538150000",
            "token_gid": "1",
        }).to_string()
    }

    fn oauth_success_response() -> String {
        let oauth = serde_json::json!({
            "steamid": STEAMID.to_string(),
            "oauth_token": "f7499d4b1f0b43c8",
            "wgtoken": "bd33da2338c3b1f0",
            "wgtoken_secure": "9a6e462b3f0ba6fe",
        });

        serde_json::json!({
            "success": true,
            "login_complete": true,
            "oauth": oauth.to_string(),
        }).to_string()
    }

    fn captcha_response() -> String {
        serde_json::json!({
            "success": false,
            "captcha_needed": true,
            "captcha_gid": "3122988401908795871",
        }).to_string()
    }

    #[tokio::test]
    async fn captcha_challenge_is_solved_once_and_resubmitted() {
        let private_key = RsaPrivateKey::new(&mut rand::thread_rng(), 512).unwrap();
        let strategy = ScriptedStrategy::new()
            .script(PROBE_URL, UNAUTHORIZED_PROBE)
            .script_with_cookies(BOOTSTRAP_URL, "<html></html>", bootstrap_cookies())
            .script(RSA_KEY_URL, &rsa_key_response(&private_key))
            .script(DOLOGIN_URL, &captcha_response())
            .script(DOLOGIN_URL, &oauth_success_response());
        let solver = Arc::new(ScriptedSolver::new("w7tx25"));
        let (manager, strategy, store) = scripted_manager(strategy, Some(Arc::clone(&solver)));

        manager.login("alice").await.unwrap();

        assert_eq!(solver.calls.load(Ordering::SeqCst), 1);

        let submits = strategy.requests_to(DOLOGIN_URL);

        assert_eq!(submits.len(), 2);
        assert_eq!(submits[0].form_value("captchagid"), Some("-1"));
        assert_eq!(submits[1].form_value("captchagid"), Some("3122988401908795871"));
        assert_eq!(submits[1].form_value("captcha_text"), Some("w7tx25"));

        let cookies = store.get("alice", COMMUNITY_HOSTNAME).await.unwrap();

        assert_eq!(cookies.get("sessionid").map(String::as_str), Some(SESSIONID));
        assert_eq!(
            cookies.get("steamLoginSecure").map(String::as_str),
            Some("76561197960287930%7C%7C9a6e462b3f0ba6fe"),
        );
        assert_eq!(
            cookies.get("steamLogin").map(String::as_str),
            Some("76561197960287930%7C%7Cbd33da2338c3b1f0"),
        );
    }

    #[tokio::test]
    async fn incorrect_credentials_fail_without_retry() {
        let private_key = RsaPrivateKey::new(&mut rand::thread_rng(), 512).unwrap();
        let rejection = serde_json::json!({
            "success": false,
            "message": "The account name or password that you have entered is incorrect.",
        }).to_string();
        let strategy = ScriptedStrategy::new()
            .script(PROBE_URL, UNAUTHORIZED_PROBE)
            .script_with_cookies(BOOTSTRAP_URL, "<html></html>", bootstrap_cookies())
            .script(RSA_KEY_URL, &rsa_key_response(&private_key))
            .script(DOLOGIN_URL, &rejection);
        let solver = Arc::new(ScriptedSolver::new("unused"));
        let (manager, strategy, _store) = scripted_manager(strategy, Some(Arc::clone(&solver)));

        let error = manager.login("alice").await.unwrap_err();

        assert!(matches!(
            error,
            Error::Login(LoginError::IncorrectCredentials),
        ));
        assert_eq!(solver.calls.load(Ordering::SeqCst), 0);
        assert_eq!(strategy.requests_to(DOLOGIN_URL).len(), 1);
        assert_eq!(
            strategy.requests_to(RSA_KEY_URL)[0].form_value("username"),
            Some("alice"),
        );
    }

    #[tokio::test]
    async fn login_is_idempotent_for_live_sessions() {
        let probe = serde_json::json!({
            "logged_in": true,
            "steamid": STEAMID.to_string(),
            "accountid": 22202,
            "account_name": "alice",
            "token": "0e4625a5a53279356cb8f",
        }).to_string();
        let strategy = ScriptedStrategy::new()
            .script(PROBE_URL, &probe);
        let (manager, strategy, _store) = scripted_manager(strategy, None);

        manager.login("alice").await.unwrap();

        assert!(strategy.requests_to(RSA_KEY_URL).is_empty());
        assert!(strategy.requests_to(DOLOGIN_URL).is_empty());
    }

    #[tokio::test]
    async fn twofactor_login_submits_a_guard_code() {
        let private_key = RsaPrivateKey::new(&mut rand::thread_rng(), 512).unwrap();
        let challenge = serde_json::json!({
            "success": false,
            "requires_twofactor": true,
        }).to_string();
        let strategy = ScriptedStrategy::new()
            .script(PROBE_URL, UNAUTHORIZED_PROBE)
            .script_with_cookies(BOOTSTRAP_URL, "<html></html>", bootstrap_cookies())
            .script(RSA_KEY_URL, &rsa_key_response(&private_key))
            .script(DOLOGIN_URL, &challenge)
            .script(QUERY_TIME_URL, QUERY_TIME_RESPONSE)
            .script(DOLOGIN_URL, &oauth_success_response());
        let (manager, strategy, store) = scripted_manager(strategy, None);

        manager.registry()
            .attach_authenticator("alice", Authenticator {
                shared_secret: SECRET.into(),
                device_id: "android:4aff1264-a4ad-b9a6-8b59-0323d124a0a5".into(),
                identity_secret: SECRET.into(),
            })
            .unwrap();

        manager.login("alice").await.unwrap();

        let submits = strategy.requests_to(DOLOGIN_URL);

        assert_eq!(submits.len(), 2);
        assert_eq!(submits[0].form_value("twofactorcode"), Some(""));
        assert_eq!(
            submits[1].form_value("twofactorcode").unwrap(),
            guard::generate_guard_code(SECRET, 1700000000).unwrap(),
        );

        // the submitted password decrypts back to the registered one
        let encrypted = BASE64.decode(submits[0].form_value("password").unwrap()).unwrap();
        let decrypted = private_key.decrypt(Pkcs1v15Encrypt, &encrypted).unwrap();

        assert_eq!(decrypted, b"hunter2");

        assert_eq!(
            u64::from(manager.registry().steamid("alice").unwrap()),
            STEAMID,
        );
        assert_eq!(manager.sessionid("alice").await.unwrap(), SESSIONID);

        let cookies = store.get("alice", COMMUNITY_HOSTNAME).await.unwrap();

        assert!(cookies.contains_key("steamLoginSecure"));
    }

    #[tokio::test]
    async fn exhausted_budget_carries_the_last_message() {
        let private_key = RsaPrivateKey::new(&mut rand::thread_rng(), 512).unwrap();
        let rejection = serde_json::json!({
            "success": false,
            "message": "Something went wrong",
        }).to_string();
        let strategy = ScriptedStrategy::new()
            .script(PROBE_URL, UNAUTHORIZED_PROBE)
            .script_with_cookies(BOOTSTRAP_URL, "<html></html>", bootstrap_cookies())
            .script(RSA_KEY_URL, &rsa_key_response(&private_key))
            .script(DOLOGIN_URL, &rejection)
            .script(DOLOGIN_URL, &rejection)
            .script(DOLOGIN_URL, &rejection);
        let (manager, strategy, _store) = scripted_manager(strategy, None);

        let error = manager.login("alice").await.unwrap_err();

        assert!(matches!(
            error,
            Error::Login(LoginError::Failed(Some(message))) if message == "Something went wrong",
        ));
        assert_eq!(strategy.requests_to(DOLOGIN_URL).len(), 3);
    }

    #[tokio::test]
    async fn captcha_without_solver_is_fatal() {
        let private_key = RsaPrivateKey::new(&mut rand::thread_rng(), 512).unwrap();
        let strategy = ScriptedStrategy::new()
            .script(PROBE_URL, UNAUTHORIZED_PROBE)
            .script_with_cookies(BOOTSTRAP_URL, "<html></html>", bootstrap_cookies())
            .script(RSA_KEY_URL, &rsa_key_response(&private_key))
            .script(DOLOGIN_URL, &captcha_response());
        let (manager, strategy, _store) = scripted_manager(strategy, None);

        let error = manager.login("alice").await.unwrap_err();

        assert!(matches!(
            error,
            Error::Captcha(CaptchaError::SolverNotConfigured),
        ));
        assert_eq!(strategy.requests_to(DOLOGIN_URL).len(), 1);
    }

    #[tokio::test]
    async fn transfer_login_stores_cookies_per_domain() {
        let private_key = RsaPrivateKey::new(&mut rand::thread_rng(), 512).unwrap();
        let store_transfer_url = "https://store.steampowered.com/login/settoken";
        let help_transfer_url = "https://help.steampowered.com/login/settoken";
        let accepted = serde_json::json!({
            "success": true,
            "login_complete": true,
            "steamID": STEAMID.to_string(),
            "transfer_info": [
                {
                    "url": store_transfer_url,
                    "params": { "nonce": "b78a7f3d6cd664a0b3a6", "auth": "c3d6f7e2a1" },
                },
                {
                    "url": help_transfer_url,
                    "params": { "nonce": "b78a7f3d6cd664a0b3a6", "auth": "c3d6f7e2a1" },
                },
            ],
        }).to_string();
        let strategy = ScriptedStrategy::new()
            .script(PROBE_URL, UNAUTHORIZED_PROBE)
            .script_with_cookies(BOOTSTRAP_URL, "<html></html>", bootstrap_cookies())
            .script(RSA_KEY_URL, &rsa_key_response(&private_key))
            .script(DOLOGIN_URL, &accepted)
            .script_with_cookies(
                store_transfer_url,
                "{}",
                CookieMap::from([("steamLoginSecure".into(), "store-token".into())]),
            )
            .script_with_cookies(
                help_transfer_url,
                "{}",
                CookieMap::from([("steamLoginSecure".into(), "help-token".into())]),
            );
        let (manager, strategy, store) = scripted_manager(strategy, None);

        manager.login("alice").await.unwrap();

        let transfer = &strategy.requests_to(store_transfer_url)[0];

        assert_eq!(transfer.form_value("nonce"), Some("b78a7f3d6cd664a0b3a6"));
        assert_eq!(transfer.form_value("auth"), Some("c3d6f7e2a1"));
        assert_eq!(transfer.form_value("steamID"), Some("76561197960287930"));

        let store_cookies = store.get("alice", "store.steampowered.com").await.unwrap();
        let help_cookies = store.get("alice", "help.steampowered.com").await.unwrap();
        let community_cookies = store.get("alice", COMMUNITY_HOSTNAME).await.unwrap();

        assert_eq!(
            store_cookies.get("steamLoginSecure").map(String::as_str),
            Some("store-token"),
        );
        assert_eq!(
            help_cookies.get("steamLoginSecure").map(String::as_str),
            Some("help-token"),
        );
        assert_eq!(
            community_cookies.get("sessionid").map(String::as_str),
            Some(SESSIONID),
        );
        assert_eq!(
            u64::from(manager.registry().steamid("alice").unwrap()),
            STEAMID,
        );
    }

    #[tokio::test]
    async fn request_for_login_merges_stored_cookies_under_the_requests_own() {
        let strategy = ScriptedStrategy::new()
            .script("https://steamcommunity.com/market/pricehistory/", "{}");
        let (manager, strategy, store) = scripted_manager(strategy, None);

        store.set("alice", COMMUNITY_HOSTNAME, CookieMap::from([
            ("sessionid".into(), SESSIONID.into()),
            ("steamLoginSecure".into(), "stored-token".into()),
        ])).await.unwrap();

        let request = HttpRequest::get("https://steamcommunity.com/market/pricehistory/")
            .with_cookie("sessionid", "overridden");

        manager.request_for_login("alice", request).await.unwrap();

        let sent = &strategy.requests_to("https://steamcommunity.com/market/pricehistory/")[0];

        assert_eq!(sent.cookies.get("sessionid").map(String::as_str), Some("overridden"));
        assert_eq!(
            sent.cookies.get("steamLoginSecure").map(String::as_str),
            Some("stored-token"),
        );
    }

    #[tokio::test]
    async fn sessionid_requires_a_session() {
        let (manager, _strategy, _store) = scripted_manager(ScriptedStrategy::new(), None);

        assert!(matches!(
            manager.sessionid("alice").await.unwrap_err(),
            Error::NotLoggedIn,
        ));
    }
}
