//! Gateway configuration.
//!
//! # Responsibility
//! - Decide, once at startup, which backend the gateway uses.
//! - Read the API base URL from the environment only when asked to.
//!
//! # Invariants
//! - `api_base_url` is either `None` or a trimmed, non-empty string.

use crate::gateway::BackendKind;
use std::path::PathBuf;
use std::time::Duration;

/// Primary environment variable holding the API base URL.
pub const API_BASE_ENV: &str = "OCEANNOTES_API_BASE";
/// Fallback environment variable consulted when `API_BASE_ENV` is unset or blank.
pub const BACKEND_URL_ENV: &str = "OCEANNOTES_BACKEND_URL";
/// Upper bound for a single remote request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the local backend keeps its blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalStore {
    /// SQLite database file. The parent directory must exist.
    File(PathBuf),
    /// Process-lifetime store, mainly for tests and demos.
    InMemory,
}

/// Explicit gateway configuration, passed to `open_gateway`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub api_base_url: Option<String>,
    pub local_store: LocalStore,
    pub request_timeout: Duration,
}

impl GatewayConfig {
    /// Builds a config; a blank `api_base_url` counts as unset.
    pub fn new(api_base_url: Option<String>, local_store: LocalStore) -> Self {
        Self {
            api_base_url: normalize_base_url(api_base_url),
            local_store,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Local-only config.
    pub fn local(local_store: LocalStore) -> Self {
        Self::new(None, local_store)
    }

    /// Reads the API base URL from `OCEANNOTES_API_BASE`, then
    /// `OCEANNOTES_BACKEND_URL`.
    pub fn from_env(local_store: LocalStore) -> Self {
        Self::from_lookup(local_store, |key| std::env::var(key).ok())
    }

    /// Same as `from_env` but with an injectable variable lookup.
    pub fn from_lookup(local_store: LocalStore, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_base_url = [API_BASE_ENV, BACKEND_URL_ENV]
            .into_iter()
            .find_map(|key| normalize_base_url(lookup(key)));
        Self::new(api_base_url, local_store)
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Backend that `open_gateway` will build for this config.
    pub fn backend_kind(&self) -> BackendKind {
        if self.api_base_url.is_some() {
            BackendKind::Remote
        } else {
            BackendKind::Local
        }
    }
}

fn normalize_base_url(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{GatewayConfig, LocalStore, API_BASE_ENV, BACKEND_URL_ENV};
    use crate::gateway::BackendKind;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn blank_base_url_selects_local() {
        let config = GatewayConfig::new(Some("   ".to_string()), LocalStore::InMemory);
        assert_eq!(config.api_base_url, None);
        assert_eq!(config.backend_kind(), BackendKind::Local);
    }

    #[test]
    fn base_url_is_trimmed_and_selects_remote() {
        let config = GatewayConfig::new(
            Some(" http://localhost:3001 ".to_string()),
            LocalStore::InMemory,
        );
        assert_eq!(config.api_base_url.as_deref(), Some("http://localhost:3001"));
        assert_eq!(config.backend_kind(), BackendKind::Remote);
    }

    #[test]
    fn lookup_prefers_primary_variable() {
        let pairs = [
            (API_BASE_ENV, "http://primary"),
            (BACKEND_URL_ENV, "http://fallback"),
        ];
        let config = GatewayConfig::from_lookup(LocalStore::InMemory, lookup(&pairs));
        assert_eq!(config.api_base_url.as_deref(), Some("http://primary"));
    }

    #[test]
    fn lookup_falls_back_when_primary_is_blank() {
        let pairs = [(API_BASE_ENV, ""), (BACKEND_URL_ENV, "http://fallback")];
        let config = GatewayConfig::from_lookup(LocalStore::InMemory, lookup(&pairs));
        assert_eq!(config.api_base_url.as_deref(), Some("http://fallback"));
    }

    #[test]
    fn lookup_without_variables_is_local() {
        let config = GatewayConfig::from_lookup(LocalStore::InMemory, |_| None);
        assert_eq!(config.backend_kind(), BackendKind::Local);
    }
}
