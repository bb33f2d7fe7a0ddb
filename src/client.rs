// LinkedIn client: owns the HTTP session and the profile resolver for its
// whole lifetime. Dropping the client closes the session.

use serde_json::Value;

use crate::auth::SessionAuth;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::profile::{ProfileCache, ProfileResolver, ME_ENDPOINT};
use crate::transport::Transport;

#[derive(Debug)]
pub struct LinkedInClient {
    transport: Transport,
    profile: ProfileResolver,
}

impl LinkedInClient {
    /// Load the cookies named by `config` and open a session.
    pub fn open(config: &Config) -> Result<Self> {
        let auth = SessionAuth::load(&config.cookies_path)?;
        let transport = Transport::new(&config.base_url, &auth, config.impersonate)?;
        tracing::debug!(base_url = %transport.base_url(), "session opened");
        Ok(Self::from_parts(
            transport,
            ProfileCache::new(config.cache_path.clone()),
        ))
    }

    pub fn from_parts(transport: Transport, cache: ProfileCache) -> Self {
        LinkedInClient {
            transport,
            profile: ProfileResolver::new(cache),
        }
    }

    /// Open a client, run `f` with it and close it again, whether `f`
    /// succeeds or not.
    pub fn scoped<T, E, F>(config: &Config, f: F) -> std::result::Result<T, E>
    where
        E: From<Error>,
        F: FnOnce(&mut LinkedInClient) -> std::result::Result<T, E>,
    {
        let mut client = LinkedInClient::open(config)?;
        let out = f(&mut client);
        client.close();
        out
    }

    /// Release the HTTP session.
    pub fn close(self) {
        tracing::debug!(base_url = %self.transport.base_url(), "session closed");
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Raw `/me` response.
    pub fn me(&mut self) -> Result<Value> {
        let me = self.transport.fetch(ME_ENDPOINT, None)?;
        self.profile.remember(&me)?;
        Ok(me)
    }

    /// Own profile URN from memory, the disk cache or `/me`, in that order.
    pub fn profile_urn(&mut self) -> Result<String> {
        self.profile.resolve(&self.transport)
    }
}
