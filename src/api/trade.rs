//! Trade offer endpoints.

use crate::error::{Error, ParameterError, Result, TradeOfferError};
use crate::helpers::{get_url, parses_response, COMMUNITY_HOSTNAME};
use crate::manager::AuthManager;
use crate::request::{NewTradeOffer, NewTradeOfferItem};
use crate::response::{AcceptedOffer, SentOffer};
use crate::serializers::{option_string, steamid_as_string, string};
use crate::transport::HttpRequest;
use crate::types::TradeOfferId;
use serde::{Deserialize, Serialize};
use steamid_ng::SteamID;

/// The API for sending and resolving trade offers.
#[derive(Clone)]
pub struct TradeAPI {
    manager: AuthManager,
}

impl TradeAPI {
    pub fn new(manager: AuthManager) -> Self {
        Self {
            manager,
        }
    }

    /// Sends a trade offer from an account's session.
    ///
    /// A successful response may still ask for a confirmation; check
    /// [`SentOffer::needs_mobile_confirmation`].
    pub async fn send_offer(
        &self,
        login: &str,
        offer: &NewTradeOffer,
    ) -> Result<SentOffer> {
        #[derive(Serialize)]
        struct OfferFormUser<'a> {
            assets: &'a Vec<NewTradeOfferItem>,
            currency: Vec<u32>,
            ready: bool,
        }

        #[derive(Serialize)]
        struct OfferForm<'a> {
            newversion: bool,
            version: u32,
            me: OfferFormUser<'a>,
            them: OfferFormUser<'a>,
        }

        #[derive(Serialize)]
        struct TradeOfferCreateParams<'a> {
            #[serde(skip_serializing_if = "Option::is_none")]
            trade_offer_access_token: &'a Option<String>,
        }

        #[derive(Serialize)]
        struct SendOfferParams<'a> {
            sessionid: String,
            serverid: u32,
            json_tradeoffer: String,
            tradeoffermessage: &'a Option<String>,
            captcha: &'static str,
            trade_offer_create_params: String,
            #[serde(serialize_with = "steamid_as_string")]
            partner: &'a SteamID,
        }

        if offer.is_empty() {
            return Err(ParameterError::EmptyOffer.into());
        }

        let sessionid = self.manager.sessionid(login).await?;
        let num_items = offer.items_to_give.len() + offer.items_to_receive.len();
        let json_tradeoffer = serde_json::to_string(&OfferForm {
            newversion: true,
            version: num_items as u32 + 1,
            me: OfferFormUser {
                assets: &offer.items_to_give,
                currency: Vec::new(),
                ready: false,
            },
            them: OfferFormUser {
                assets: &offer.items_to_receive,
                currency: Vec::new(),
                ready: false,
            },
        })?;
        let trade_offer_create_params = serde_json::to_string(&TradeOfferCreateParams {
            trade_offer_access_token: &offer.token,
        })?;
        let referer = {
            let mut referer = get_url(COMMUNITY_HOSTNAME, &format!(
                "/tradeoffer/new?partner={}",
                offer.partner.account_id(),
            ));

            if let Some(token) = &offer.token {
                referer.push_str(&format!("&token={token}"));
            }

            referer
        };
        let request = HttpRequest::post(get_url(COMMUNITY_HOSTNAME, "/tradeoffer/new/send"))
            .with_header("Referer", referer)
            .with_form(&SendOfferParams {
                sessionid,
                serverid: 1,
                captcha: "",
                tradeoffermessage: &offer.message,
                partner: &offer.partner,
                json_tradeoffer,
                trade_offer_create_params,
            })?;
        let body = self.manager.request_for_login(login, request).await?;

        check_offer_error(&body)?;
        parses_response(&body)
    }

    /// Accepts an offer the account received.
    ///
    /// `partner` is the account that sent the offer.
    pub async fn accept_offer(
        &self,
        login: &str,
        tradeofferid: TradeOfferId,
        partner: SteamID,
    ) -> Result<AcceptedOffer> {
        #[derive(Serialize)]
        struct AcceptOfferParams<'a> {
            sessionid: String,
            serverid: u32,
            #[serde(with = "string")]
            tradeofferid: TradeOfferId,
            captcha: &'static str,
            #[serde(serialize_with = "steamid_as_string")]
            partner: &'a SteamID,
        }

        let sessionid = self.manager.sessionid(login).await?;
        let pathname = format!("/tradeoffer/{tradeofferid}/accept");
        let request = HttpRequest::post(get_url(COMMUNITY_HOSTNAME, &pathname))
            .with_header("Referer", offer_referer(tradeofferid))
            .with_form(&AcceptOfferParams {
                sessionid,
                serverid: 1,
                tradeofferid,
                captcha: "",
                partner: &partner,
            })?;
        let body = self.manager.request_for_login(login, request).await?;

        check_offer_error(&body)?;
        parses_response(&body)
    }

    /// Declines an offer the account received. Returns the offer's ID.
    pub async fn decline_offer(
        &self,
        login: &str,
        tradeofferid: TradeOfferId,
    ) -> Result<TradeOfferId> {
        self.resolve_offer(login, tradeofferid, "decline").await
    }

    /// Cancels an offer the account sent. Returns the offer's ID.
    pub async fn cancel_offer(
        &self,
        login: &str,
        tradeofferid: TradeOfferId,
    ) -> Result<TradeOfferId> {
        self.resolve_offer(login, tradeofferid, "cancel").await
    }

    async fn resolve_offer(
        &self,
        login: &str,
        tradeofferid: TradeOfferId,
        action: &str,
    ) -> Result<TradeOfferId> {
        #[derive(Deserialize)]
        struct ResolveOfferResponse {
            /// An EResult code. Steam includes it only when the operation
            /// failed.
            #[serde(default)]
            success: Option<i32>,
            #[serde(default, with = "option_string")]
            tradeofferid: Option<TradeOfferId>,
        }

        let sessionid = self.manager.sessionid(login).await?;
        let pathname = format!("/tradeoffer/{tradeofferid}/{action}");
        let request = HttpRequest::post(get_url(COMMUNITY_HOSTNAME, &pathname))
            .with_header("Referer", offer_referer(tradeofferid))
            .with_form_pairs(vec![("sessionid".into(), sessionid)]);
        let body = self.manager.request_for_login(login, request).await?;
        let response: ResolveOfferResponse = parses_response(&body)?;

        if let Some(code) = response.success.filter(|code| *code != 1) {
            return Err(Error::Trade(TradeOfferError::from_code(code)));
        }

        Ok(response.tradeofferid.unwrap_or(tradeofferid))
    }
}

fn offer_referer(tradeofferid: TradeOfferId) -> String {
    get_url(COMMUNITY_HOSTNAME, &format!("/tradeoffer/{tradeofferid}"))
}

/// Checks the body for Steam's `strError` rejection format.
fn check_offer_error(body: &str) -> Result<()> {
    #[derive(Deserialize)]
    struct OfferError {
        #[serde(rename = "strError")]
        message: String,
    }

    if let Ok(OfferError { message }) = serde_json::from_str(body) {
        return Err(Error::Trade(TradeOfferError::from(message.as_str())));
    }

    Ok(())
}
