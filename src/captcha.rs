//! CAPTCHA solving. Steam poses a CAPTCHA after repeated login failures from
//! the same network; a solver turns the challenge image URL into the text
//! Steam expects.

use crate::error::CaptchaError;
use async_trait::async_trait;

/// Solves CAPTCHA challenges during login.
///
/// Implementations usually call out to a solving service. The solver is
/// handed the full challenge image URL and returns the transcribed text.
/// Failures are reported as [`CaptchaError::Solve`]; the login machine
/// retries them against its budget.
#[async_trait]
pub trait CaptchaSolver: Send + Sync {
    async fn solve(&self, captcha_url: &str) -> Result<String, CaptchaError>;
}
