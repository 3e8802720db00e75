//! Steam Community Market endpoints.

use crate::error::{Error, Result};
use crate::helpers::{get_url, parses_response, COMMUNITY_HOSTNAME};
use crate::manager::AuthManager;
use crate::response::PriceHistory;
use crate::transport::HttpRequest;
use crate::types::AppId;

/// The banner Steam renders on the market page when the account cannot
/// use the market.
const MARKET_UNAVAILABLE_MESSAGE: &str = "The Market is unavailable for the following reason(s):";

/// The API for the Steam Community Market.
#[derive(Clone)]
pub struct MarketAPI {
    manager: AuthManager,
}

impl MarketAPI {
    pub fn new(manager: AuthManager) -> Self {
        Self {
            manager,
        }
    }

    /// Fetches an item's sale history.
    ///
    /// Steam only serves price history to accounts that own the app the
    /// item belongs to.
    pub async fn price_history(
        &self,
        login: &str,
        appid: AppId,
        market_hash_name: &str,
    ) -> Result<PriceHistory> {
        let request = HttpRequest::get(get_url(COMMUNITY_HOSTNAME, "/market/pricehistory/"))
            .with_param("country", "US")
            .with_param("currency", "1")
            .with_param("appid", appid.to_string())
            .with_param("market_hash_name", market_hash_name);
        let body = self.manager.request_for_login(login, request).await?;
        let history: PriceHistory = parses_response(&body)?;

        if !history.success {
            return Err(Error::Response("Price history could not be loaded".into()));
        }

        Ok(history)
    }

    /// Checks whether the market is available to the account. Steam locks
    /// the market behind purchase history and device cooldowns.
    pub async fn is_market_available(&self, login: &str) -> Result<bool> {
        let request = HttpRequest::get(get_url(COMMUNITY_HOSTNAME, "/market/"))
            .with_cookie("Steam_Language", "english");
        let body = self.manager.request_for_login(login, request).await?;

        Ok(!body.contains(MARKET_UNAVAILABLE_MESSAGE))
    }
}
