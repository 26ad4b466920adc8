//! Daemon configuration from environment variables.
//!
//! Production injects env vars directly; development loads `.env.local` via
//! `dotenvy` before this module reads anything. Every variable has a default
//! except the submission endpoint, which stays `None` until configured so the
//! daemon can boot and serve reference data without it.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub const ENV_DAEMON_ADDR: &str = "ODK_DAEMON_ADDR";
pub const ENV_ENDPOINT_POST: &str = "ODK_ENDPOINT_POST";
pub const ENV_REFDATA_DIR: &str = "ODK_REFDATA_DIR";
pub const ENV_EXPORTS_DIR: &str = "ODK_EXPORTS_DIR";

const DEFAULT_ADDR: ([u8; 4], u16) = ([127, 0, 0, 1], 8910);
const DEFAULT_REFDATA_DIR: &str = "./data";
const DEFAULT_EXPORTS_DIR: &str = "./exports";

/// Effective daemon configuration, resolved once at boot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonConfig {
    /// HTTP bind address.
    pub addr: SocketAddr,
    /// Upstream endpoint receiving submitted purchase orders. `None` means
    /// submission and forwarding return a configuration error at call time.
    pub endpoint_post: Option<String>,
    /// Directory holding the reference-data JSON files.
    pub refdata_dir: PathBuf,
    /// Directory where submitted documents are written as JSON artifacts.
    pub exports_dir: PathBuf,
}

impl DaemonConfig {
    /// Resolve from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary lookup, so tests can supply variables
    /// without touching the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let addr = match lookup(ENV_DAEMON_ADDR) {
            Some(raw) => raw
                .parse::<SocketAddr>()
                .with_context(|| format!("{ENV_DAEMON_ADDR} is not a socket address: {raw:?}"))?,
            None => SocketAddr::from(DEFAULT_ADDR),
        };

        let endpoint_post = lookup(ENV_ENDPOINT_POST).filter(|url| !url.trim().is_empty());

        let refdata_dir = lookup(ENV_REFDATA_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REFDATA_DIR));
        let exports_dir = lookup(ENV_EXPORTS_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORTS_DIR));

        Ok(Self {
            addr,
            endpoint_post,
            refdata_dir,
            exports_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn defaults_apply_when_env_is_empty() {
        let config = DaemonConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.addr, SocketAddr::from(([127, 0, 0, 1], 8910)));
        assert_eq!(config.endpoint_post, None);
        assert_eq!(config.refdata_dir, PathBuf::from("./data"));
        assert_eq!(config.exports_dir, PathBuf::from("./exports"));
    }

    #[test]
    fn explicit_values_override_defaults() {
        let pairs = [
            (ENV_DAEMON_ADDR, "0.0.0.0:9000"),
            (ENV_ENDPOINT_POST, "https://api.example.com/po"),
            (ENV_REFDATA_DIR, "/srv/refdata"),
            (ENV_EXPORTS_DIR, "/srv/exports"),
        ];
        let config = DaemonConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.addr, SocketAddr::from(([0, 0, 0, 0], 9000)));
        assert_eq!(
            config.endpoint_post.as_deref(),
            Some("https://api.example.com/po")
        );
        assert_eq!(config.refdata_dir, PathBuf::from("/srv/refdata"));
        assert_eq!(config.exports_dir, PathBuf::from("/srv/exports"));
    }

    #[test]
    fn blank_endpoint_is_treated_as_unset() {
        let pairs = [(ENV_ENDPOINT_POST, "  ")];
        let config = DaemonConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.endpoint_post, None);
    }

    #[test]
    fn malformed_addr_is_an_error() {
        let pairs = [(ENV_DAEMON_ADDR, "not-an-addr")];
        let err = DaemonConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(err.to_string().contains(ENV_DAEMON_ADDR));
    }
}
