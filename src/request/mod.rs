//! Request parameters.

mod login;
mod new_trade_offer;

pub use login::LoginRequest;
pub use new_trade_offer::{NewTradeOffer, NewTradeOfferItem, NewTradeOfferBuilder};
