//! Server configuration sourced from environment variables.
//!
//! Recognised variables:
//!
//! | Variable           | Default                    | Meaning                              |
//! |--------------------|----------------------------|--------------------------------------|
//! | `PORT`             | `3000`                     | TCP port to listen on                |
//! | `APP_URL`          | unset (any origin allowed) | Origin permitted by CORS             |
//! | `DATABASE_URL`     | unset (in-memory storage)  | PostgreSQL connection string         |
//! | `HEALTH_PROBE_URL` | `https://actix.rs/docs/`   | URL pinged by the reachability probe |
//! | `APP_ENV`          | `development`              | Deployment environment label         |

use std::net::{Ipv4Addr, SocketAddr};

use url::Url;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_PROBE_URL: &str = "https://actix.rs/docs/";
const DEFAULT_ENVIRONMENT: &str = "development";

/// Environment values that fail to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `PORT` is not a valid TCP port number.
    #[error("invalid PORT value {value:?}: {reason}")]
    InvalidPort { value: String, reason: String },

    /// `HEALTH_PROBE_URL` is not a parseable URL.
    #[error("invalid HEALTH_PROBE_URL value {value:?}: {reason}")]
    InvalidProbeUrl { value: String, reason: String },
}

/// Resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    bind_addr: SocketAddr,
    allowed_origin: Option<String>,
    database_url: Option<String>,
    probe_url: Url,
    environment: String,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary lookup function.
    ///
    /// Exists so tests can supply variables without mutating the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set but unparseable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|err| ConfigError::InvalidPort {
                value: raw.clone(),
                reason: err.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let raw_probe_url =
            lookup("HEALTH_PROBE_URL").unwrap_or_else(|| DEFAULT_PROBE_URL.to_owned());
        let probe_url = Url::parse(&raw_probe_url).map_err(|err| ConfigError::InvalidProbeUrl {
            value: raw_probe_url.clone(),
            reason: err.to_string(),
        })?;

        Ok(Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
            allowed_origin: lookup("APP_URL").filter(|origin| !origin.is_empty()),
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            probe_url,
            environment: lookup("APP_ENV").unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_owned()),
        })
    }

    /// Socket address the server binds to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Origin allowed by CORS; `None` permits any origin.
    #[must_use]
    pub fn allowed_origin(&self) -> Option<&str> {
        self.allowed_origin.as_deref()
    }

    /// PostgreSQL connection string; `None` selects in-memory storage.
    #[must_use]
    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    /// URL the reachability probe pings.
    #[must_use]
    pub fn probe_url(&self) -> &Url {
        &self.probe_url
    }

    /// Deployment environment label.
    #[must_use]
    pub fn environment(&self) -> &str {
        &self.environment
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rstest::rstest;

    use super::*;

    fn lookup_from<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        move |name| map.get(name).map(|value| (*value).to_owned())
    }

    #[rstest]
    fn defaults_apply_when_environment_is_empty() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).expect("defaults parse");

        assert_eq!(config.bind_addr().port(), 3000);
        assert_eq!(config.allowed_origin(), None);
        assert_eq!(config.database_url(), None);
        assert_eq!(config.probe_url().as_str(), "https://actix.rs/docs/");
        assert_eq!(config.environment(), "development");
    }

    #[rstest]
    fn explicit_values_override_defaults() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("APP_URL", "https://app.example.com"),
            ("DATABASE_URL", "postgres://localhost/userdir"),
            ("HEALTH_PROBE_URL", "https://status.example.com/ping"),
            ("APP_ENV", "production"),
        ]))
        .expect("values parse");

        assert_eq!(config.bind_addr().port(), 8080);
        assert_eq!(config.allowed_origin(), Some("https://app.example.com"));
        assert_eq!(config.database_url(), Some("postgres://localhost/userdir"));
        assert_eq!(
            config.probe_url().as_str(),
            "https://status.example.com/ping"
        );
        assert_eq!(config.environment(), "production");
    }

    #[rstest]
    #[case("not-a-number")]
    #[case("70000")]
    #[case("-1")]
    fn unparseable_port_is_rejected(#[case] raw: &str) {
        let err = ServerConfig::from_lookup(lookup_from(&[("PORT", raw)]))
            .expect_err("invalid port must fail");
        assert!(matches!(err, ConfigError::InvalidPort { ref value, .. } if value == raw));
    }

    #[rstest]
    fn unparseable_probe_url_is_rejected() {
        let err = ServerConfig::from_lookup(lookup_from(&[("HEALTH_PROBE_URL", "::nope::")]))
            .expect_err("invalid url must fail");
        assert!(matches!(err, ConfigError::InvalidProbeUrl { .. }));
    }

    #[rstest]
    fn empty_strings_count_as_unset() {
        let config =
            ServerConfig::from_lookup(lookup_from(&[("APP_URL", ""), ("DATABASE_URL", "")]))
                .expect("empty values fall back");

        assert_eq!(config.allowed_origin(), None);
        assert_eq!(config.database_url(), None);
    }
}
