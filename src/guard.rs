//! Steam Guard derivations: one-time codes, mobile confirmation signatures,
//! and device identifiers.
//!
//! Every derivation takes the server time reported by
//! `ITwoFactorService/QueryTime` rather than the local clock. A skewed local
//! clock otherwise produces codes Steam rejects.

use crate::error::ParameterError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::{Digest, Sha1};
use strum_macros::Display;

type HmacSha1 = Hmac<Sha1>;

/// The alphabet Steam Guard codes are drawn from. Easily-confused characters
/// are omitted.
const CODE_CHARS: &[u8; 26] = b"23456789BCDFGHJKMNPQRTVWXY";
/// The number of characters in a Steam Guard code.
const CODE_LENGTH: usize = 5;
/// Codes rotate every 30 seconds.
const CODE_PERIOD: u64 = 30;

/// The operation a confirmation signature is scoped to. The same tag must
/// appear both in the signed message and in the request's `tag` parameter.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationTag {
    /// Listing pending confirmations.
    #[strum(serialize = "conf")]
    Conf,
    /// Accepting a confirmation.
    #[strum(serialize = "allow")]
    Allow,
    /// Cancelling a confirmation.
    #[strum(serialize = "cancel")]
    Cancel,
}

/// Generates the 5-character Steam Guard code for `server_time`.
///
/// `shared_secret` is the base64 secret from the account's authenticator.
pub fn generate_guard_code(shared_secret: &str, server_time: u64) -> Result<String, ParameterError> {
    let key = BASE64.decode(shared_secret)?;
    let mut mac = HmacSha1::new_from_slice(&key)
        .expect("HMAC accepts keys of any length");

    // The message is the 30-second bucket as a big-endian u64.
    mac.update(&(server_time / CODE_PERIOD).to_be_bytes());

    let digest = mac.finalize().into_bytes();
    let offset = (digest[19] & 0xF) as usize;
    let mut fullcode = u32::from_be_bytes([
        digest[offset] & 0x7F,
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ]);
    let mut code = String::with_capacity(CODE_LENGTH);

    for _ in 0..CODE_LENGTH {
        code.push(CODE_CHARS[fullcode as usize % CODE_CHARS.len()] as char);
        fullcode /= CODE_CHARS.len() as u32;
    }

    Ok(code)
}

/// Generates the base64 signature authorizing a confirmation request tagged
/// `tag` at `server_time`.
///
/// `identity_secret` is the base64 secret from the account's authenticator.
pub fn generate_confirmation_hash(
    identity_secret: &str,
    tag: ConfirmationTag,
    server_time: u64,
) -> Result<String, ParameterError> {
    let key = BASE64.decode(identity_secret)?;
    let mut mac = HmacSha1::new_from_slice(&key)
        .expect("HMAC accepts keys of any length");

    mac.update(&server_time.to_be_bytes());
    mac.update(tag.to_string().as_bytes());

    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// Derives the device identifier Steam associates with `steamid`. Useful when
/// provisioning authenticator material that did not come with one.
pub fn generate_device_id(steamid: u64) -> String {
    let mut hasher = Sha1::new();

    hasher.update(steamid.to_string().as_bytes());

    let hash = hasher.finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect::<String>();

    format!(
        "android:{}-{}-{}-{}-{}",
        &hash[0..8],
        &hash[8..12],
        &hash[12..16],
        &hash[16..20],
        &hash[20..32],
    )
}
