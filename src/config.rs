//! Runtime configuration read from the environment (and a `.env` file, if present).

use axum::http::HeaderValue;
use thiserror::Error;

/// The origins allowed to make credentialed cross-origin requests when none are configured.
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,https://localhost:3443";

/// The `tracing` filter used when `RUST_LOG` isn't set.
const DEFAULT_LOG_FILTER: &str = "info";

/// The server's configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// The socket address to listen on.
    pub address: String,

    /// The PostgreSQL connection URL.
    pub database_url: String,

    /// The URI origin of the website, used to scope session cookies.
    pub website_origin: String,

    /// The origins allowed to make credentialed cross-origin requests.
    pub allowed_origins: Vec<HeaderValue>,

    /// The `tracing` filter directive.
    pub log_filter: String,
}

/// An error loading the [`Config`].
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    /// A required environment variable wasn't set or wasn't valid Unicode.
    #[error("environment variable `{name}` should be set: {source}")]
    Missing {
        /// The variable's name.
        name: &'static str,

        /// The underlying error.
        source: dotenvy::Error,
    },

    /// An allowed origin couldn't be used as a header value.
    #[error("invalid CORS origin {0:?}")]
    InvalidOrigin(String),

    /// The website origin doesn't have the form `scheme://host[:port]`, or its host is an IPv6
    /// address, which can't be a cookie domain.
    #[error("invalid website origin {0:?}")]
    InvalidWebsiteOrigin(String),
}

impl Config {
    /// Reads the configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Fails if a required variable is missing or any variable is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let website_origin = check_website_origin(required("WEBSITE_ORIGIN")?)?;

        Ok(Self {
            address: required("ADDRESS")?,
            database_url: required("DATABASE_URL")?,
            website_origin,
            allowed_origins: parse_origins(
                &dotenvy::var("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.into()),
            )?,
            log_filter: dotenvy::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        })
    }

    /// Gets the domain of [`Self::website_origin`], without the scheme or port.
    pub fn website_domain(&self) -> &str {
        let origin = self.website_origin.as_str();
        let start = origin.find("://").map_or(0, |index| index + 3);
        let host = &origin[start..];

        host.split(':').next().unwrap_or(host)
    }

    /// Whether cookies should be restricted to HTTPS.
    pub fn secure_cookies(&self) -> bool {
        self.website_origin.starts_with("https:")
    }
}

/// Reads an environment variable that must be set.
fn required(name: &'static str) -> Result<String, ConfigError> {
    dotenvy::var(name).map_err(|source| ConfigError::Missing { name, source })
}

/// Checks that a website origin has a scheme and a host usable as a cookie domain.
fn check_website_origin(origin: String) -> Result<String, ConfigError> {
    let has_domain = origin
        .split_once("://")
        .and_then(|(_, rest)| rest.split(':').next())
        .is_some_and(|host| !host.is_empty() && !host.starts_with('['));

    if has_domain {
        Ok(origin)
    } else {
        Err(ConfigError::InvalidWebsiteOrigin(origin))
    }
}

/// Parses a comma-separated list of origins, ignoring surrounding whitespace and empty entries.
///
/// # Errors
///
/// Fails if an origin contains characters not allowed in a header value.
pub fn parse_origins(list: &str) -> Result<Vec<HeaderValue>, ConfigError> {
    list.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|_| ConfigError::InvalidOrigin(origin.into()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_origin(website_origin: &str) -> Config {
        Config {
            address: "127.0.0.1:0".into(),
            database_url: "postgres://localhost/test".into(),
            website_origin: website_origin.into(),
            allowed_origins: Vec::new(),
            log_filter: DEFAULT_LOG_FILTER.into(),
        }
    }

    #[test]
    fn origins_are_trimmed_and_split() -> anyhow::Result<()> {
        let origins = parse_origins(" http://localhost:3000 ,, https://localhost:3443")?;

        assert_eq!(
            origins,
            [
                HeaderValue::from_static("http://localhost:3000"),
                HeaderValue::from_static("https://localhost:3443"),
            ],
        );

        Ok(())
    }

    #[test]
    fn default_origins_parse() -> anyhow::Result<()> {
        assert_eq!(parse_origins(DEFAULT_ALLOWED_ORIGINS)?.len(), 2);
        Ok(())
    }

    #[test]
    fn origin_with_newline_rejected() {
        parse_origins("http://a.\nexample")
            .expect_err("newlines aren't allowed in header values");
    }

    #[test]
    fn website_domain_strips_scheme_and_port() {
        assert_eq!(config_with_origin("https://localhost:3443").website_domain(), "localhost");
        assert_eq!(config_with_origin("http://campsites.example").website_domain(), "campsites.example");
    }

    #[test]
    fn website_origin_needs_cookie_domain() -> anyhow::Result<()> {
        assert_eq!(
            check_website_origin("https://localhost:3443".into())?,
            "https://localhost:3443",
        );

        for origin in ["localhost:3000", "http://", "http://:3000", "http://[::1]:3000"] {
            assert!(
                matches!(
                    check_website_origin(origin.into()),
                    Err(ConfigError::InvalidWebsiteOrigin(_)),
                ),
                "{origin:?} should be rejected",
            );
        }

        Ok(())
    }

    #[test]
    fn cookies_secure_only_over_https() {
        assert!(config_with_origin("https://localhost:3443").secure_cookies(), "https should be secure");
        assert!(!config_with_origin("http://localhost:3000").secure_cookies(), "http shouldn't be secure");
    }
}
