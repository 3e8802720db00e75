//! The underlying API for mobile confirmations. In most cases you should
//! stick to using the manager, but if you need more control over the
//! requests, you can use this API directly.

mod helpers;

use crate::account::AccountRegistry;
use crate::error::{ConfirmationError, Error, Result};
use crate::guard::{self, ConfirmationTag};
use crate::helpers::{fetch_server_time, get_url, mobile_client_cookies, parses_response, COMMUNITY_HOSTNAME};
use crate::response::MobileConfirmation;
use crate::storage::CookieStore;
use crate::transport::{HttpRequest, RequestStrategy};
use crate::types::TradeOfferId;
use std::sync::Arc;
use serde::Deserialize;

/// Steam serves this marker when it does not recognize the authenticator
/// that signed the request. It appears in both response formats.
const INVALID_AUTHENTICATOR_MESSAGE: &str = "Invalid authenticator";

/// The API for mobile confirmations.
///
/// Every request is signed with the account's identity secret against
/// Steam's clock and carries the account's stored session cookies.
#[derive(Clone)]
pub struct MobileAPI {
    registry: Arc<AccountRegistry>,
    store: Arc<dyn CookieStore>,
    strategy: Arc<dyn RequestStrategy>,
}

impl MobileAPI {
    /// Hostname for requests.
    const HOSTNAME: &'static str = COMMUNITY_HOSTNAME;

    pub(crate) fn new(
        registry: Arc<AccountRegistry>,
        store: Arc<dyn CookieStore>,
        strategy: Arc<dyn RequestStrategy>,
    ) -> Self {
        Self {
            registry,
            store,
            strategy,
        }
    }

    /// Gets the account's pending confirmations.
    ///
    /// Steam serves these either as JSON or as an HTML page depending on
    /// which client it believes it is talking to. Both formats are handled.
    pub async fn get_confirmations(
        &self,
        login: &str,
    ) -> Result<Vec<MobileConfirmation>> {
        #[derive(Deserialize)]
        struct GetConfirmationsResponse {
            success: bool,
            #[serde(default)]
            message: Option<String>,
            #[serde(default)]
            detail: Option<String>,
            #[serde(default)]
            conf: Vec<MobileConfirmation>,
        }

        let steamid = self.registry.steamid(login)?;
        let request = self.confirmation_request(login, "/mobileconf/getlist", ConfirmationTag::Conf).await?
            .with_cookie("steamid", u64::from(steamid).to_string())
            .with_cookie("Steam_Language", "english");
        let body = self.strategy.request(request).await?;

        if body.contains(INVALID_AUTHENTICATOR_MESSAGE) {
            return Err(ConfirmationError::InvalidAuthenticator.into());
        }

        if body.trim_start().starts_with('{') {
            let response: GetConfirmationsResponse = parses_response(&body)?;

            if !response.success {
                let message = response.message
                    .or(response.detail)
                    .unwrap_or_else(|| "Confirmations could not be loaded".into());

                return Err(Error::Response(message));
            }

            return Ok(response.conf);
        }

        Ok(helpers::parse_confirmations(&body)?)
    }

    /// Accepts a confirmation. Returns the server's success flag verbatim.
    pub async fn accept_confirmation(
        &self,
        login: &str,
        confirmation: &MobileConfirmation,
    ) -> Result<bool> {
        self.send_confirmation_ajax(login, confirmation.id, confirmation.nonce, ConfirmationTag::Allow).await
    }

    /// Cancels a confirmation. Returns the server's success flag verbatim.
    pub async fn cancel_confirmation(
        &self,
        login: &str,
        confirmation: &MobileConfirmation,
    ) -> Result<bool> {
        self.send_confirmation_ajax(login, confirmation.id, confirmation.nonce, ConfirmationTag::Cancel).await
    }

    /// Accepts the confirmation created by the given trade offer.
    ///
    /// Fails with [`ConfirmationError::NotFound`] if the offer has no
    /// pending confirmation.
    pub async fn accept_confirmation_for_offer(
        &self,
        login: &str,
        tradeofferid: TradeOfferId,
    ) -> Result<bool> {
        let confirmations = self.get_confirmations(login).await?;
        let confirmation = confirmations.iter()
            .find(|confirmation| confirmation.is_for_offer(tradeofferid))
            .ok_or(ConfirmationError::NotFound(tradeofferid))?;

        self.send_confirmation_ajax(login, confirmation.id, confirmation.nonce, ConfirmationTag::Allow).await
    }

    async fn send_confirmation_ajax(
        &self,
        login: &str,
        id: u64,
        nonce: u64,
        tag: ConfirmationTag,
    ) -> Result<bool> {
        #[derive(Deserialize)]
        struct SendConfirmationResponse {
            success: bool,
        }

        let request = self.confirmation_request(login, "/mobileconf/ajaxop", tag).await?
            .with_param("op", tag.to_string())
            .with_param("cid", id.to_string())
            .with_param("ck", nonce.to_string());
        let body = self.strategy.request(request).await?;

        if body.contains(INVALID_AUTHENTICATOR_MESSAGE) {
            return Err(ConfirmationError::InvalidAuthenticator.into());
        }

        let response: SendConfirmationResponse = parses_response(&body)?;

        Ok(response.success)
    }

    /// Builds a request for a confirmation endpoint, signed with the
    /// account's identity secret. The signed tag and the `tag` parameter
    /// must agree or Steam rejects the request.
    async fn confirmation_request(
        &self,
        login: &str,
        pathname: &str,
        tag: ConfirmationTag,
    ) -> Result<HttpRequest> {
        let steamid = self.registry.steamid(login)?;
        let authenticator = self.registry.authenticator(login)?;
        let server_time = fetch_server_time(self.strategy.as_ref()).await?;
        let key = guard::generate_confirmation_hash(
            &authenticator.identity_secret,
            tag,
            server_time,
        )?;
        let cookies = self.store.get(login, Self::HOSTNAME).await?;
        let request = HttpRequest::get(Self::get_url(pathname))
            .with_cookies(cookies)
            .with_cookies(mobile_client_cookies())
            .with_header("X-Requested-With", "com.valvesoftware.android.steam.community")
            .with_param("p", authenticator.device_id)
            .with_param("a", u64::from(steamid).to_string())
            .with_param("k", key)
            .with_param("t", server_time.to_string())
            .with_param("m", "react")
            .with_param("tag", tag.to_string());

        Ok(request)
    }

    fn get_url(pathname: &str) -> String {
        get_url(Self::HOSTNAME, pathname)
    }
}
