//! Decision logic for the login submit loop.

use crate::error::LoginError;
use crate::response::LoginResponse;

/// Retry budget for the login submit loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of login submissions before giving up.
    pub attempts: u8,
    /// Separate budget for CAPTCHA resubmissions. When `None` they draw
    /// from the shared budget.
    pub captcha_attempts: Option<u8>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            captcha_attempts: None,
        }
    }
}

/// What the login loop should do with a submit response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LoginAttempt {
    /// The credentials were accepted.
    Complete,
    /// Steam posed a CAPTCHA challenge to answer before resubmitting.
    Captcha { gid: String, url: String },
    /// Steam wants a Steam Guard code before resubmitting.
    TwoFactor,
    /// Rejected without a recognizable challenge.
    Retry,
}

/// Classifies a submit response into the next action or a terminal error.
pub(crate) fn evaluate(response: &LoginResponse) -> Result<LoginAttempt, LoginError> {
    if response.success {
        return Ok(LoginAttempt::Complete);
    }

    if response.is_credentials_incorrect() {
        return Err(LoginError::IncorrectCredentials);
    }

    if response.is_too_many_attempts() {
        return Err(LoginError::TooManyAttempts);
    }

    if response.captcha_needed {
        // The gid deserializer maps Steam's -1 and empty sentinels to None.
        return match (response.captcha_gid.clone(), response.captcha_url()) {
            (Some(gid), Some(url)) => Ok(LoginAttempt::Captcha { gid, url }),
            _ => Err(LoginError::MissingCaptchaGid),
        };
    }

    if response.requires_twofactor {
        return Ok(LoginAttempt::TwoFactor);
    }

    Ok(LoginAttempt::Retry)
}
