// Runtime configuration: API base URL and the two on-disk files the client
// reads. Defaults live under `~/.linkedin-mcp`, each value can be overridden
// from the environment.

use std::path::PathBuf;

use crate::impersonate::Impersonate;

pub const DEFAULT_BASE_URL: &str = "https://www.linkedin.com/voyager/api";

const CONFIG_DIR: &str = ".linkedin-mcp";
const COOKIES_FILE: &str = "cookies.json";
const CACHE_FILE: &str = "profile_cache.json";

pub const ENV_BASE_URL: &str = "LINKEDIN_API_BASE_URL";
pub const ENV_COOKIES_PATH: &str = "LINKEDIN_COOKIES_PATH";
pub const ENV_PROFILE_CACHE: &str = "LINKEDIN_PROFILE_CACHE";

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub cookies_path: PathBuf,
    /// Shared by every account; see DESIGN.md.
    pub cache_path: PathBuf,
    pub impersonate: Impersonate,
}

impl Default for Config {
    fn default() -> Self {
        let dir = config_dir();
        Config {
            base_url: DEFAULT_BASE_URL.to_string(),
            cookies_path: dir.join(COOKIES_FILE),
            cache_path: dir.join(CACHE_FILE),
            impersonate: Impersonate::default(),
        }
    }
}

impl Config {
    /// Defaults overridden by `LINKEDIN_API_BASE_URL`, `LINKEDIN_COOKIES_PATH`
    /// and `LINKEDIN_PROFILE_CACHE` when set.
    pub fn from_env() -> Self {
        let mut config = Config::default();
        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            config.base_url = url;
        }
        if let Ok(path) = std::env::var(ENV_COOKIES_PATH) {
            config.cookies_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var(ENV_PROFILE_CACHE) {
            config.cache_path = PathBuf::from(path);
        }
        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_cookies_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cookies_path = path.into();
        self
    }

    pub fn with_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = path.into();
        self
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_share_one_directory() {
        let config = Config::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.cookies_path.ends_with(".linkedin-mcp/cookies.json"));
        assert_eq!(config.cookies_path.parent(), config.cache_path.parent());
    }

    #[test]
    fn builders_override_fields() {
        let config = Config::default()
            .with_base_url("http://127.0.0.1:1")
            .with_cookies_path("/tmp/c.json")
            .with_cache_path("/tmp/p.json");
        assert_eq!(config.base_url, "http://127.0.0.1:1");
        assert_eq!(config.cookies_path, PathBuf::from("/tmp/c.json"));
        assert_eq!(config.cache_path, PathBuf::from("/tmp/p.json"));
    }
}
