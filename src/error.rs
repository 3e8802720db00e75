use crate::types::TradeOfferId;
use std::num::ParseIntError;
use lazy_regex::regex_captures;

/// Any error that can occur when using this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An error occurred in the account registry.
    #[error("{}", .0)]
    Account(#[from] AccountError),
    /// Logging in failed.
    #[error("{}", .0)]
    Login(#[from] LoginError),
    /// An error occurred making a request.
    #[error("{}", .0)]
    Transport(#[from] TransportError),
    /// The cookie storage backend failed.
    #[error("Cookie storage error: {}", .0)]
    Storage(#[from] StorageError),
    /// An error occurred solving a CAPTCHA.
    #[error("{}", .0)]
    Captcha(#[from] CaptchaError),
    /// An error occurred working with mobile confirmations.
    #[error("{}", .0)]
    Confirmation(#[from] ConfirmationError),
    /// A parameter was invalid.
    #[error("Invalid parameter: {}", .0)]
    Parameter(#[from] ParameterError),
    /// The response could not be parsed as JSON.
    #[error("Error parsing response: {}", .0)]
    Parse(#[from] serde_json::Error),
    /// The response was valid but contained something unexpected.
    #[error("Unexpected response: {}", .0)]
    Response(String),
    /// An HTML document could not be parsed.
    #[error("Error parsing HTML document: {}", .0)]
    Html(#[from] ParseHtmlError),
    /// Steam rejected a trade offer request.
    #[error("Trade error: {}", .0)]
    Trade(TradeOfferError),
    /// No session cookies are stored for this login, or Steam no longer
    /// accepts them.
    #[error("Not logged in")]
    NotLoggedIn,
}

/// An error related to an account in the registry.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    /// An account with this login is already registered.
    #[error("Account already exists: \"{}\"", .0)]
    AlreadyExists(String),
    /// No account with this login is registered.
    #[error("Account not found: \"{}\"", .0)]
    NotFound(String),
    /// The account is registered but carries no authenticator.
    #[error("Not found authenticator: \"{}\"", .0)]
    AuthenticatorNotFound(String),
    /// The account's SteamID has not been supplied or learned from a login
    /// yet.
    #[error("SteamID is not known for account: \"{}\"", .0)]
    SteamIdUnknown(String),
}

/// An error produced by the login state machine.
#[derive(thiserror::Error, Debug)]
pub enum LoginError {
    /// Steam did not return usable RSA key material.
    #[error("Error requesting RSA key material")]
    KeyRetrieval,
    /// The RSA key material could not be decoded.
    #[error("RSA key material could not be decoded")]
    InvalidKeyMaterial,
    /// Encrypting the password failed.
    #[error("RSA encryption failed: {}", .0)]
    Rsa(#[from] rsa::Error),
    /// The account name or password is incorrect.
    #[error("The account name or password that you have entered is incorrect")]
    IncorrectCredentials,
    /// Too many failed logins from this network.
    #[error("There have been too many login failures from your network in a short time period")]
    TooManyAttempts,
    /// Steam requested a CAPTCHA but did not include a challenge id.
    #[error("CAPTCHA challenge is missing a challenge id")]
    MissingCaptchaGid,
    /// The retry budget was exhausted. Contains the last message from Steam,
    /// if any.
    #[error("Login failed: {}", .0.as_deref().unwrap_or("no message"))]
    Failed(Option<String>),
}

/// An error that occurred during transport.
#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    /// Steam responded with 429.
    #[error("Too many requests")]
    RateLimited,
    /// Steam responded with 401, or redirected to a login page.
    #[error("Unauthorized")]
    Unauthorized,
    /// Steam responded with an unexpected status code.
    #[error("HTTP status {}", .0)]
    Status(reqwest::StatusCode),
    /// The request itself failed. Timeouts land here.
    #[error("Request error: {}", .0)]
    Reqwest(#[from] reqwest::Error),
    /// A request middleware failed.
    #[error("Request middleware error: {}", .0)]
    Middleware(anyhow::Error),
}

impl From<reqwest_middleware::Error> for TransportError {
    fn from(error: reqwest_middleware::Error) -> Self {
        match error {
            reqwest_middleware::Error::Reqwest(e) => Self::Reqwest(e),
            reqwest_middleware::Error::Middleware(e) => Self::Middleware(e),
        }
    }
}

/// An error from a cookie storage backend.
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    /// The backend failed to read or write.
    #[error("{}", .0)]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// An error related to CAPTCHA solving.
#[derive(thiserror::Error, Debug)]
pub enum CaptchaError {
    /// Steam presented a CAPTCHA but no solver was configured.
    #[error("No CAPTCHA solver is configured")]
    SolverNotConfigured,
    /// The solver failed to produce an answer.
    #[error("CAPTCHA solving failed: {}", .0)]
    Solve(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// An error related to mobile confirmations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationError {
    /// Steam does not recognize the authenticator. The identity secret or
    /// device id is wrong, or the authenticator was removed.
    #[error("Invalid authenticator")]
    InvalidAuthenticator,
    /// No pending confirmation matches this creator id.
    #[error("No confirmation for {}", .0)]
    NotFound(TradeOfferId),
}

/// An invalid parameter.
#[derive(thiserror::Error, Debug)]
pub enum ParameterError {
    /// The offer contains no items on either side.
    #[error("Cannot send an empty offer")]
    EmptyOffer,
    /// A URL could not be parsed.
    #[error("Invalid URL: {}", .0)]
    Url(#[from] url::ParseError),
    /// A secret was not valid base64.
    #[error("Invalid base64 secret: {}", .0)]
    InvalidSecret(#[from] base64::DecodeError),
}

/// An error occurred while parsing an HTML document.
#[derive(thiserror::Error, Debug)]
pub enum ParseHtmlError {
    /// The document is missing an expected element or attribute.
    #[error("{}", .0)]
    Malformed(&'static str),
    /// The document contained an error message.
    #[error("{}", .0)]
    Response(String),
    /// An attribute could not be parsed as an integer.
    #[error("{}", .0)]
    ParseInt(#[from] ParseIntError),
    /// A CSS selector could not be parsed.
    #[error("Invalid CSS selector")]
    ParseSelector,
}

/// An error from Steam in response to a trade offer request. Steam includes
/// an EResult code in parentheses at the end of most error messages.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TradeOfferError {
    /// An error not otherwise classified. Contains the message from Steam.
    #[error("{}", .0)]
    Unknown(String),
    /// An EResult code without a specific meaning here.
    #[error("EResult {}", .0)]
    UnknownEResult(i32),
    #[error("Fail")]
    Fail,
    #[error("InvalidState")]
    InvalidState,
    #[error("AccessDenied")]
    AccessDenied,
    #[error("Timeout")]
    Timeout,
    /// Steam's servers are down, or the trade backend is unavailable.
    #[error("ServiceUnavailable")]
    ServiceUnavailable,
    /// Too many pending trade offers, or too many items in the offer.
    #[error("LimitExceeded")]
    LimitExceeded,
    #[error("Revoked")]
    Revoked,
    #[error("AlreadyRedeemed")]
    AlreadyRedeemed,
    /// The trade link is no longer valid.
    #[error("Trade URL is no longer valid")]
    InvalidTradeLink,
    /// The partner cannot trade. New device, trade hold, or profile settings.
    #[error("Partner is not available to trade")]
    PartnerCannotTrade,
    /// The partner has a trade ban.
    #[error("Partner has a trade ban")]
    TradeBan,
}

impl TradeOfferError {
    pub fn from_code(code: i32) -> Self {
        match code {
            2 => Self::Fail,
            11 => Self::InvalidState,
            15 => Self::AccessDenied,
            16 => Self::Timeout,
            20 => Self::ServiceUnavailable,
            25 => Self::LimitExceeded,
            26 => Self::Revoked,
            28 => Self::AlreadyRedeemed,
            _ => Self::UnknownEResult(code),
        }
    }

    pub fn code(&self) -> Option<i32> {
        match self {
            Self::Fail => Some(2),
            Self::InvalidState => Some(11),
            Self::AccessDenied => Some(15),
            Self::Timeout => Some(16),
            Self::ServiceUnavailable => Some(20),
            Self::LimitExceeded => Some(25),
            Self::Revoked => Some(26),
            Self::AlreadyRedeemed => Some(28),
            Self::UnknownEResult(code) => Some(*code),
            _ => None,
        }
    }
}

impl From<&str> for TradeOfferError {
    fn from(message: &str) -> Self {
        if let Some((_, code)) = regex_captures!(r"\((\d+)\)\s*$", message.trim()) {
            if let Ok(code) = code.parse::<i32>() {
                return Self::from_code(code);
            }
        }

        if message.contains("Trade URL is no longer valid") {
            return Self::InvalidTradeLink;
        }

        if message.contains("is not available to trade") {
            return Self::PartnerCannotTrade;
        }

        if message.contains("they have a trade ban") {
            return Self::TradeBan;
        }

        if message.contains("sent too many trade offers") || message.contains("maximum number of items") {
            return Self::LimitExceeded;
        }

        if message.contains("server may be down") {
            return Self::ServiceUnavailable;
        }

        Self::Unknown(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trade_offer_error_code() {
        let message = "There was an error accepting this trade offer. Please try again later. (28)";
        let error = TradeOfferError::from(message);

        assert_eq!(error, TradeOfferError::AlreadyRedeemed);
    }

    #[test]
    fn parses_trade_offer_error_message() {
        let message = "This Trade URL is no longer valid for sending a trade offer to Somebody.";
        let error = TradeOfferError::from(message);

        assert_eq!(error, TradeOfferError::InvalidTradeLink);
    }

    #[test]
    fn unclassified_message_is_kept() {
        let message = "Something odd happened.";
        let error = TradeOfferError::from(message);

        assert_eq!(error, TradeOfferError::Unknown(message.into()));
    }
}
