use crate::error::LoginError;
use crate::serializers::option_string;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rsa::{BigUint, Pkcs1v15Encrypt, RsaPublicKey};
use serde::Deserialize;

/// RSA key material returned by `/login/getrsakey/`. The key is unique per
/// account and rotates; the accompanying timestamp must be echoed back with
/// the login request.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RsaKey {
    #[serde(default)]
    pub success: bool,
    /// The key modulus, hex encoded.
    #[serde(default)]
    pub publickey_mod: Option<String>,
    /// The key exponent, hex encoded.
    #[serde(default)]
    pub publickey_exp: Option<String>,
    /// The timestamp to submit as `rsatimestamp`.
    #[serde(default, with = "option_string")]
    pub timestamp: Option<u64>,
    #[serde(default)]
    pub token_gid: Option<String>,
}

impl RsaKey {
    /// Encrypts a password with this key using PKCS#1 v1.5 padding, returned
    /// base64 encoded the way `/login/dologin/` expects it.
    pub fn encrypt_password(&self, password: &str) -> Result<String, LoginError> {
        let modulus = self.publickey_mod.as_deref()
            .ok_or(LoginError::InvalidKeyMaterial)?;
        let exponent = self.publickey_exp.as_deref()
            .ok_or(LoginError::InvalidKeyMaterial)?;
        let n = BigUint::parse_bytes(modulus.as_bytes(), 16)
            .ok_or(LoginError::InvalidKeyMaterial)?;
        let e = BigUint::parse_bytes(exponent.as_bytes(), 16)
            .ok_or(LoginError::InvalidKeyMaterial)?;
        let key = RsaPublicKey::new(n, e)?;
        let encrypted = key.encrypt(&mut rand::thread_rng(), Pkcs1v15Encrypt, password.as_bytes())?;

        Ok(BASE64.encode(encrypted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::RsaPrivateKey;
    use rsa::traits::PublicKeyParts;

    #[test]
    fn deserializes_key_material() {
        let key: RsaKey = serde_json::from_str(include_str!("fixtures/get_rsa_key.json")).unwrap();

        assert!(key.success);
        assert_eq!(key.publickey_exp.as_deref(), Some("010001"));
        assert_eq!(key.timestamp, Some(216538150000));
    }

    #[test]
    fn encrypted_password_decrypts_with_the_private_key() {
        let private_key = RsaPrivateKey::new(&mut rand::thread_rng(), 512).unwrap();
        let public_key = private_key.to_public_key();
        let key = RsaKey {
            success: true,
            publickey_mod: Some(public_key.n().to_str_radix(16)),
            publickey_exp: Some(public_key.e().to_str_radix(16)),
            timestamp: Some(216538150000),
            token_gid: None,
        };

        let encrypted = key.encrypt_password("hunter2").unwrap();
        let ciphertext = BASE64.decode(encrypted).unwrap();
        let decrypted = private_key.decrypt(Pkcs1v15Encrypt, &ciphertext).unwrap();

        assert_eq!(decrypted, b"hunter2");
    }

    #[test]
    fn missing_modulus_is_invalid_key_material() {
        let key = RsaKey {
            success: true,
            publickey_mod: None,
            publickey_exp: Some("010001".into()),
            timestamp: None,
            token_gid: None,
        };

        assert!(matches!(
            key.encrypt_password("hunter2").unwrap_err(),
            LoginError::InvalidKeyMaterial,
        ));
    }

    #[test]
    fn garbage_modulus_is_invalid_key_material() {
        let key = RsaKey {
            success: true,
            publickey_mod: Some("not hex".into()),
            publickey_exp: Some("010001".into()),
            timestamp: None,
            token_gid: None,
        };

        assert!(matches!(
            key.encrypt_password("hunter2").unwrap_err(),
            LoginError::InvalidKeyMaterial,
        ));
    }
}
