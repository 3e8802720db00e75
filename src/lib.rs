mod account;
mod enums;
mod helpers;
mod manager;

pub mod api;
pub mod captcha;
pub mod error;
pub mod guard;
pub mod mobile_api;
pub mod request;
pub mod response;
pub mod serializers;
pub mod storage;
pub mod time;
pub mod transport;
pub mod types;

#[cfg(test)]
mod testing;

pub use account::{Account, AccountRegistry, Authenticator};
pub use api::{InventoryAPI, MarketAPI, TradeAPI};
pub use enums::ConfirmationType;
pub use error::{Error, Result};
pub use manager::{AuthManager, AuthManagerBuilder, RetryPolicy};
pub use mobile_api::MobileAPI;
pub use steamid_ng::SteamID;
