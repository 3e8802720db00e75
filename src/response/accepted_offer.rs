use serde::{Serialize, Deserialize};

/// The result returned after accepting a trade offer.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AcceptedOffer {
    /// Whether the acceptance still needs mobile confirmation or not.
    #[serde(default)]
    pub needs_mobile_confirmation: bool,
    /// Whether the acceptance still needs email confirmation or not.
    #[serde(default)]
    pub needs_email_confirmation: bool,
    /// The email domain if this offer requires email confirmation.
    #[serde(default)]
    pub email_domain: Option<String>,
}
