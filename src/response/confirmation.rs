use crate::enums::ConfirmationType;
use crate::serializers::string;
use crate::types::{ServerTime, TradeOfferId};
use std::fmt;
use chrono::serde::ts_seconds_option;
use serde::{Serialize, Deserialize};

/// A pending mobile confirmation. Used primarily for confirming trade offers
/// or listing items on the market.
///
/// Steam serves confirmations in two formats. The JSON format fills every
/// field; the HTML format only carries the ids, so the descriptive fields
/// fall back to their defaults.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct MobileConfirmation {
    /// The ID of the confirmation.
    #[serde(with = "string")]
    pub id: u64,
    /// Trade offer ID or market transaction ID that created this
    /// confirmation.
    #[serde(with = "string")]
    pub creator_id: u64,
    /// The nonce to echo back when acting on the confirmation.
    #[serde(with = "string")]
    pub nonce: u64,
    /// The confirmation type.
    #[serde(default, rename = "type")]
    pub conf_type: ConfirmationType,
    /// The time the confirmation was created.
    #[serde(default, with = "ts_seconds_option")]
    pub creation_time: Option<ServerTime>,
    /// The cancel text.
    #[serde(default)]
    pub cancel: String,
    /// The accept text e.g. "Accept" or "Send Offer".
    #[serde(default)]
    pub accept: String,
    /// `true` if this can be confirmed together with other confirmations.
    #[serde(default)]
    pub multi: bool,
    /// The type name.
    #[serde(default)]
    pub type_name: String,
    /// The headline.
    #[serde(default)]
    pub headline: String,
    /// The description.
    #[serde(default)]
    pub summary: Vec<String>,
    /// The icon.
    #[serde(default)]
    pub icon: Option<String>,
    /// Warnings.
    #[serde(default)]
    pub warn: Option<Vec<String>>,
}

impl MobileConfirmation {
    /// Whether this confirmation was created by the given trade offer.
    pub fn is_for_offer(&self, tradeofferid: TradeOfferId) -> bool {
        self.conf_type == ConfirmationType::Trade && self.creator_id == tradeofferid
    }
}

impl fmt::Display for MobileConfirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.headline.is_empty() {
            write!(f, "{} - {}", self.conf_type, self.creator_id)
        } else {
            write!(f, "{} - {}", self.conf_type, self.headline)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trade_offer_confirmation() {
        let confirmation: MobileConfirmation = serde_json::from_str(include_str!("fixtures/confirmation.json")).unwrap();

        assert_eq!(confirmation.id, 13799599785);
        assert_eq!(confirmation.nonce, 9141945700999917347);
        assert_eq!(confirmation.conf_type, ConfirmationType::Trade);
        assert_eq!(confirmation.creation_time.unwrap().timestamp(), 1687139890);
        assert!(confirmation.is_for_offer(6450467455));
        assert!(!confirmation.is_for_offer(1));
    }

    #[test]
    fn displays_headline() {
        let confirmation: MobileConfirmation = serde_json::from_str(include_str!("fixtures/confirmation.json")).unwrap();

        assert_eq!(format!("{confirmation}"), "Trade - Trade with somebody");
    }
}
