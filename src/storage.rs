//! Cookie storage. Cookies are partitioned by login and by second-level
//! domain so that `steamcommunity.com` and `store.steampowered.com` sessions
//! never leak into each other.

use crate::error::StorageError;
use crate::types::CookieMap;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// Storage for session cookies.
///
/// The login machine writes whole maps through [`set`](Self::set) after a
/// successful login; everything else only reads. Implementations backed by
/// files or databases report failures through [`StorageError`].
#[async_trait]
pub trait CookieStore: Send + Sync {
    /// Cookies for `login` on `domain`. Unknown logins and domains yield an
    /// empty map, not an error.
    async fn get(&self, login: &str, domain: &str) -> Result<CookieMap, StorageError>;

    /// Replaces the cookie map for `login` on `domain` wholesale.
    async fn set(&self, login: &str, domain: &str, cookies: CookieMap) -> Result<(), StorageError>;

    /// Drops every domain's cookies for `login`.
    async fn clear(&self, login: &str) -> Result<(), StorageError>;
}

/// The default in-memory backend.
#[derive(Debug, Default)]
pub struct MemoryCookieStore {
    cookies: RwLock<HashMap<(String, String), CookieMap>>,
}

impl MemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CookieStore for MemoryCookieStore {
    async fn get(&self, login: &str, domain: &str) -> Result<CookieMap, StorageError> {
        let cookies = self.cookies.read().unwrap();

        Ok(cookies.get(&(login.into(), domain.into()))
            .cloned()
            .unwrap_or_default())
    }

    async fn set(&self, login: &str, domain: &str, cookies: CookieMap) -> Result<(), StorageError> {
        self.cookies.write().unwrap()
            .insert((login.into(), domain.into()), cookies);
        Ok(())
    }

    async fn clear(&self, login: &str) -> Result<(), StorageError> {
        self.cookies.write().unwrap()
            .retain(|(stored_login, _), _| stored_login != login);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::COMMUNITY_HOSTNAME;

    fn cookies(pairs: &[(&str, &str)]) -> CookieMap {
        pairs.iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn get_returns_what_was_set() {
        let store = MemoryCookieStore::new();
        let session = cookies(&[("sessionid", "abc"), ("steamLoginSecure", "xyz")]);

        store.set("alice", COMMUNITY_HOSTNAME, session.clone()).await.unwrap();

        assert_eq!(store.get("alice", COMMUNITY_HOSTNAME).await.unwrap(), session);
    }

    #[tokio::test]
    async fn unknown_login_yields_empty_map() {
        let store = MemoryCookieStore::new();

        assert!(store.get("nobody", COMMUNITY_HOSTNAME).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn domains_are_partitioned() {
        let store = MemoryCookieStore::new();

        store.set("alice", COMMUNITY_HOSTNAME, cookies(&[("sessionid", "community")])).await.unwrap();
        store.set("alice", "store.steampowered.com", cookies(&[("sessionid", "store")])).await.unwrap();

        let community = store.get("alice", COMMUNITY_HOSTNAME).await.unwrap();
        let stored = store.get("alice", "store.steampowered.com").await.unwrap();

        assert_eq!(community.get("sessionid").unwrap(), "community");
        assert_eq!(stored.get("sessionid").unwrap(), "store");
    }

    #[tokio::test]
    async fn set_replaces_the_whole_map() {
        let store = MemoryCookieStore::new();

        store.set("alice", COMMUNITY_HOSTNAME, cookies(&[("old", "1")])).await.unwrap();
        store.set("alice", COMMUNITY_HOSTNAME, cookies(&[("new", "2")])).await.unwrap();

        let map = store.get("alice", COMMUNITY_HOSTNAME).await.unwrap();

        assert!(map.get("old").is_none());
        assert_eq!(map.get("new").unwrap(), "2");
    }

    #[tokio::test]
    async fn clear_drops_every_domain_for_the_login() {
        let store = MemoryCookieStore::new();

        store.set("alice", COMMUNITY_HOSTNAME, cookies(&[("sessionid", "a")])).await.unwrap();
        store.set("alice", "store.steampowered.com", cookies(&[("sessionid", "b")])).await.unwrap();
        store.set("bob", COMMUNITY_HOSTNAME, cookies(&[("sessionid", "c")])).await.unwrap();

        store.clear("alice").await.unwrap();

        assert!(store.get("alice", COMMUNITY_HOSTNAME).await.unwrap().is_empty());
        assert!(store.get("alice", "store.steampowered.com").await.unwrap().is_empty());
        assert_eq!(store.get("bob", COMMUNITY_HOSTNAME).await.unwrap().get("sessionid").unwrap(), "c");
    }
}
