// Resolution of the caller's own profile URN. Three tiers are tried in
// order, first hit wins: the in-memory value, the JSON cache on disk, and
// the `/me` endpoint.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::transport::Transport;

pub const ME_ENDPOINT: &str = "/me";
const URN_POINTER: &str = "/miniProfile/dashEntityUrn";

/// On-disk shape of the cache file.
#[derive(Serialize, Deserialize, Debug, Default)]
struct CacheEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    profile_urn: Option<String>,
}

/// JSON file remembering the URN between runs. Not keyed by account.
#[derive(Debug, Clone)]
pub struct ProfileCache {
    path: PathBuf,
}

impl ProfileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ProfileCache { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached URN, or `None` on any kind of miss.
    pub fn load(&self) -> Option<String> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::debug!(path = %self.path.display(), error = %err, "profile cache unavailable");
                return None;
            }
        };
        match serde_json::from_str::<CacheEntry>(&raw) {
            Ok(entry) => entry.profile_urn,
            Err(err) => {
                tracing::debug!(path = %self.path.display(), error = %err, "ignoring malformed profile cache");
                None
            }
        }
    }

    pub fn store(&self, urn: &str) -> io::Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let entry = CacheEntry {
            profile_urn: Some(urn.to_string()),
        };
        std::fs::write(&self.path, serde_json::to_vec(&entry)?)
    }
}

#[derive(Debug)]
pub struct ProfileResolver {
    urn: Option<String>,
    cache: ProfileCache,
}

impl ProfileResolver {
    pub fn new(cache: ProfileCache) -> Self {
        ProfileResolver { urn: None, cache }
    }

    /// Value held in memory, if resolution already happened.
    pub fn cached(&self) -> Option<&str> {
        self.urn.as_deref()
    }

    pub fn cache(&self) -> &ProfileCache {
        &self.cache
    }

    pub fn resolve(&mut self, transport: &Transport) -> Result<String> {
        if let Some(urn) = &self.urn {
            return Ok(urn.clone());
        }

        if let Some(urn) = self.cache.load() {
            tracing::debug!(%urn, "profile URN from disk cache");
            self.urn = Some(urn.clone());
            return Ok(urn);
        }

        let me = transport.fetch(ME_ENDPOINT, None)?;
        let urn = self.remember(&me)?;
        tracing::debug!(%urn, "profile URN from /me");
        Ok(urn)
    }

    /// Record the URN found in a `/me` body. An in-memory value is kept if
    /// one is already set.
    pub(crate) fn remember(&mut self, me: &Value) -> Result<String> {
        let urn = urn_from_me(me)?;
        if let Some(existing) = &self.urn {
            return Ok(existing.clone());
        }
        if let Err(err) = self.cache.store(&urn) {
            tracing::warn!(path = %self.cache.path().display(), error = %err, "failed to write profile cache");
        }
        self.urn = Some(urn.clone());
        Ok(urn)
    }
}

fn urn_from_me(me: &Value) -> Result<String> {
    me.pointer(URN_POINTER)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| Error::UnexpectedResponse("`/me` has no miniProfile.dashEntityUrn".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use mockito::Server;
    use serde_json::json;

    const ME_BODY: &str = r#"{"miniProfile": {"dashEntityUrn": "urn:li:fsd_profile:ACoAAB"}}"#;

    fn resolver_in(dir: &tempfile::TempDir) -> ProfileResolver {
        ProfileResolver::new(ProfileCache::new(dir.path().join("profile_cache.json")))
    }

    #[test]
    fn disk_cache_hit_makes_no_network_call() {
        let dir = tempfile::tempdir().unwrap();
        let mut resolver = resolver_in(&dir);
        resolver.cache().store("urn:li:fsd_profile:CACHED").unwrap();

        let mut server = Server::new();
        let me = server.mock("GET", "/me").expect(0).create();

        let urn = resolver.resolve(&testing::transport(&server.url())).unwrap();
        me.assert();
        assert_eq!(urn, "urn:li:fsd_profile:CACHED");
        assert_eq!(resolver.cached(), Some("urn:li:fsd_profile:CACHED"));
    }

    #[test]
    fn miss_calls_me_once_and_fills_both_tiers() {
        let dir = tempfile::tempdir().unwrap();
        let mut resolver = resolver_in(&dir);

        let mut server = Server::new();
        let me = server
            .mock("GET", "/me")
            .with_status(200)
            .with_body(ME_BODY)
            .expect(1)
            .create();

        let transport = testing::transport(&server.url());
        assert_eq!(resolver.resolve(&transport).unwrap(), "urn:li:fsd_profile:ACoAAB");
        // Second call is served from memory
        assert_eq!(resolver.resolve(&transport).unwrap(), "urn:li:fsd_profile:ACoAAB");

        me.assert();
        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(resolver.cache().path()).unwrap()).unwrap();
        assert_eq!(written, json!({ "profile_urn": "urn:li:fsd_profile:ACoAAB" }));
    }

    #[test]
    fn malformed_cache_falls_through_to_me() {
        let dir = tempfile::tempdir().unwrap();
        let mut resolver = resolver_in(&dir);
        std::fs::write(resolver.cache().path(), "{not json").unwrap();

        let mut server = Server::new();
        let me = server
            .mock("GET", "/me")
            .with_status(200)
            .with_body(ME_BODY)
            .create();

        let urn = resolver.resolve(&testing::transport(&server.url())).unwrap();
        me.assert();
        assert_eq!(urn, "urn:li:fsd_profile:ACoAAB");
    }

    #[test]
    fn cache_without_field_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ProfileCache::new(dir.path().join("profile_cache.json"));
        std::fs::write(cache.path(), r#"{"other": 1}"#).unwrap();
        assert_eq!(cache.load(), None);
    }

    #[test]
    fn memory_wins_over_a_differing_disk_cache() {
        let dir = tempfile::tempdir().unwrap();
        let mut resolver = resolver_in(&dir);
        resolver.cache().store("urn:li:fsd_profile:FIRST").unwrap();

        let transport = testing::transport("http://127.0.0.1:9");
        assert_eq!(resolver.resolve(&transport).unwrap(), "urn:li:fsd_profile:FIRST");

        resolver.cache().store("urn:li:fsd_profile:SECOND").unwrap();
        assert_eq!(resolver.resolve(&transport).unwrap(), "urn:li:fsd_profile:FIRST");
    }

    #[test]
    fn store_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ProfileCache::new(dir.path().join("nested/dir/profile_cache.json"));
        cache.store("urn:li:fsd_profile:X").unwrap();
        assert_eq!(cache.load().as_deref(), Some("urn:li:fsd_profile:X"));
    }

    #[test]
    fn me_without_urn_is_unexpected() {
        let dir = tempfile::tempdir().unwrap();
        let mut server = Server::new();
        let _me = server
            .mock("GET", "/me")
            .with_status(200)
            .with_body(r#"{"miniProfile": {}}"#)
            .create();

        let err = resolver_in(&dir)
            .resolve(&testing::transport(&server.url()))
            .unwrap_err();
        assert!(matches!(err, Error::UnexpectedResponse(_)));
    }
}
