//! Wrappers over Steam's authenticated web endpoints.
//!
//! Each API holds an [`AuthManager`](crate::AuthManager) and sends its
//! requests through the account's stored session, so the account must be
//! logged in first. A dead session surfaces as
//! [`Error::NotLoggedIn`](crate::Error::NotLoggedIn).

mod inventory;
mod market;
mod trade;

pub use inventory::InventoryAPI;
pub use market::MarketAPI;
pub use trade::TradeAPI;
