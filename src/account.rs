//! The account registry. Credentials live here; cookies live in the
//! [`CookieStore`](crate::storage::CookieStore).

use crate::error::AccountError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use steamid_ng::SteamID;

/// Steam Guard authenticator material for one account. This is the subset of
/// a mobile authenticator needed for generating codes and signing
/// confirmations.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Authenticator {
    /// The base64 secret for generating Steam Guard codes.
    pub shared_secret: String,
    /// The device identifier registered with the authenticator.
    pub device_id: String,
    /// The base64 secret for signing mobile confirmations.
    pub identity_secret: String,
}

/// Credentials for one account.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Account {
    /// The account's password.
    pub password: String,
    /// The account's SteamID. May be omitted at registration; it is learned
    /// from the first successful login.
    #[serde(default, with = "crate::serializers::option_steamid")]
    pub steamid: Option<SteamID>,
    /// The account's authenticator, if it has one.
    #[serde(default)]
    pub authenticator: Option<Authenticator>,
}

impl Account {
    pub fn new<S>(password: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            password: password.into(),
            steamid: None,
            authenticator: None,
        }
    }

    pub fn with_steamid(mut self, steamid: SteamID) -> Self {
        self.steamid = Some(steamid);
        self
    }

    pub fn with_authenticator(mut self, authenticator: Authenticator) -> Self {
        self.authenticator = Some(authenticator);
        self
    }
}

/// Registered accounts keyed by login name.
///
/// All methods take `&self`; the registry is safe to share.
#[derive(Debug, Default)]
pub struct AccountRegistry {
    accounts: RwLock<HashMap<String, Account>>,
}

impl AccountRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account. Fails if the login is already registered.
    pub fn add(&self, login: &str, account: Account) -> Result<(), AccountError> {
        let mut accounts = self.accounts.write().unwrap();

        if accounts.contains_key(login) {
            return Err(AccountError::AlreadyExists(login.into()));
        }

        accounts.insert(login.into(), account);
        Ok(())
    }

    /// Removes an account, returning its details.
    pub fn remove(&self, login: &str) -> Result<Account, AccountError> {
        self.accounts.write().unwrap()
            .remove(login)
            .ok_or_else(|| AccountError::NotFound(login.into()))
    }

    /// The account's password.
    pub fn password(&self, login: &str) -> Result<String, AccountError> {
        self.with_account(login, |account| account.password.clone())
    }

    /// The account's SteamID. Fails with [`AccountError::SteamIdUnknown`] if
    /// the account has not logged in yet and none was supplied.
    pub fn steamid(&self, login: &str) -> Result<SteamID, AccountError> {
        self.with_account(login, |account| account.steamid)?
            .ok_or_else(|| AccountError::SteamIdUnknown(login.into()))
    }

    /// Records the account's SteamID, normally learned from a login response.
    pub fn set_steamid(&self, login: &str, steamid: SteamID) -> Result<(), AccountError> {
        let mut accounts = self.accounts.write().unwrap();
        let account = accounts.get_mut(login)
            .ok_or_else(|| AccountError::NotFound(login.into()))?;

        account.steamid = Some(steamid);
        Ok(())
    }

    /// The account's authenticator. Fails with
    /// [`AccountError::AuthenticatorNotFound`] if none is attached.
    pub fn authenticator(&self, login: &str) -> Result<Authenticator, AccountError> {
        self.with_account(login, |account| account.authenticator.clone())?
            .ok_or_else(|| AccountError::AuthenticatorNotFound(login.into()))
    }

    /// Attaches authenticator material to a registered account.
    pub fn attach_authenticator(
        &self,
        login: &str,
        authenticator: Authenticator,
    ) -> Result<(), AccountError> {
        let mut accounts = self.accounts.write().unwrap();
        let account = accounts.get_mut(login)
            .ok_or_else(|| AccountError::NotFound(login.into()))?;

        account.authenticator = Some(authenticator);
        Ok(())
    }

    /// All registered logins.
    pub fn logins(&self) -> Vec<String> {
        self.accounts.read().unwrap()
            .keys()
            .cloned()
            .collect()
    }

    pub fn contains(&self, login: &str) -> bool {
        self.accounts.read().unwrap().contains_key(login)
    }

    fn with_account<T, F>(&self, login: &str, f: F) -> Result<T, AccountError>
    where
        F: FnOnce(&Account) -> T,
    {
        self.accounts.read().unwrap()
            .get(login)
            .map(f)
            .ok_or_else(|| AccountError::NotFound(login.into()))
    }
}
