use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;
use tracker_shared::ip::DEFAULT_PROVIDER_URL;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_STATIC_DIR: &str = "./frontend/dist/public";

/// Runtime settings, read from `TRACKER_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// Provider the `/api/ip-location` route forwards to.
    pub provider_url: String,
    /// Built frontend served for every non-API path.
    pub static_dir: PathBuf,
    pub user_agent: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TRACKER_BIND_ADDR {value:?} is not a socket address: {source}")]
    BindAddr {
        value: String,
        source: std::net::AddrParseError,
    },

    #[error("TRACKER_IP_PROVIDER_URL {0:?} must be an absolute http(s) URL")]
    ProviderUrl(String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let raw_addr = var("TRACKER_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .trim()
            .parse()
            .map_err(|source| ConfigError::BindAddr {
                value: raw_addr.clone(),
                source,
            })?;

        let provider_url =
            var("TRACKER_IP_PROVIDER_URL").unwrap_or_else(|| DEFAULT_PROVIDER_URL.to_string());
        match reqwest::Url::parse(&provider_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => return Err(ConfigError::ProviderUrl(provider_url)),
        }

        Ok(Self {
            bind_addr,
            provider_url,
            static_dir: var("TRACKER_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
            user_agent: var("TRACKER_USER_AGENT").unwrap_or_else(|| {
                concat!("location-tracker/", env!("CARGO_PKG_VERSION")).to_string()
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = load(&[]).expect("defaults are valid");
        assert_eq!(config.bind_addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.provider_url, "https://ipapi.co/json/");
        assert_eq!(config.static_dir, PathBuf::from("./frontend/dist/public"));
        assert!(config.user_agent.starts_with("location-tracker/"));
    }

    #[test]
    fn overrides_are_read() {
        let config = load(&[
            ("TRACKER_BIND_ADDR", "127.0.0.1:8080"),
            ("TRACKER_IP_PROVIDER_URL", "http://localhost:9000/json/"),
            ("TRACKER_STATIC_DIR", "/srv/tracker"),
        ])
        .expect("overrides are valid");

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.provider_url, "http://localhost:9000/json/");
        assert_eq!(config.static_dir, PathBuf::from("/srv/tracker"));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = load(&[("TRACKER_BIND_ADDR", "  ")]).expect("blank means unset");
        assert_eq!(config.bind_addr.port(), 3000);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            load(&[("TRACKER_BIND_ADDR", "localhost")]),
            Err(ConfigError::BindAddr { .. })
        ));
        assert!(matches!(
            load(&[("TRACKER_IP_PROVIDER_URL", "ftp://example.com/")]),
            Err(ConfigError::ProviderUrl(_))
        ));
        assert!(matches!(
            load(&[("TRACKER_IP_PROVIDER_URL", "/relative")]),
            Err(ConfigError::ProviderUrl(_))
        ));
    }
}
