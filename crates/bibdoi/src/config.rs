//! Configuration of a resolver and construction of its HTTP client.

use std::time::Duration;

use crate::{
    api::{MetadataClient, Style},
    controller::{Controller, DEFAULT_DELAY},
    Error, ErrorKind,
};

/// Metadata service used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://doi.org/";

/// Timeout of a single request unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings used to build a [`Controller`] talking to a metadata service over HTTP.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Service the DOI names are appended to.
    pub base_url: String,
    /// Representation requested from the service.
    pub style: Style,
    /// Wait between two consecutive requests.
    pub delay: Duration,
    /// Timeout of a single request, `None` to wait indefinitely.
    pub timeout: Option<Duration>,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            style: Style::default(),
            delay: DEFAULT_DELAY,
            timeout: Some(DEFAULT_TIMEOUT),
            user_agent: format!("bibdoi/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    /// Build the blocking HTTP client with the configured timeout and user agent.
    ///
    /// # Errors
    ///
    /// An [`Err`] is returned when the TLS backend cannot be initialized.
    pub fn client(&self) -> Result<reqwest::blocking::Client, Error> {
        reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(|e| Error::wrap(ErrorKind::IO, e))
    }

    /// The [`MetadataClient`] for the configured service.
    ///
    /// # Errors
    ///
    /// See [`Config::client`].
    pub fn metadata_client(&self) -> Result<MetadataClient<reqwest::blocking::Client>, Error> {
        Ok(MetadataClient::new(
            self.client()?,
            self.base_url.as_str(),
            self.style,
        ))
    }

    /// A [`Controller`] resolving against the configured service.
    ///
    /// # Errors
    ///
    /// See [`Config::client`].
    pub fn controller(&self) -> Result<Controller<reqwest::blocking::Client>, Error> {
        Ok(Controller::new(self.metadata_client()?, self.delay))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();

        assert_eq!("https://doi.org/", config.base_url);
        assert_eq!(Style::Csl, config.style);
        assert_eq!(Duration::from_millis(50), config.delay);
        assert_eq!(Some(Duration::from_secs(30)), config.timeout);
        assert!(config.user_agent.starts_with("bibdoi/"));
    }

    #[test]
    fn controller_uses_configured_delay_and_style() {
        let config = Config {
            base_url: "http://localhost:8080".to_owned(),
            style: Style::BibTex,
            delay: Duration::ZERO,
            ..Config::default()
        };

        let controller = config.controller().unwrap();
        assert_eq!(Duration::ZERO, controller.delay());
        assert!(!controller.is_running());

        let client = config.metadata_client().unwrap();
        assert_eq!(Style::BibTex, client.style());
        assert_eq!(
            "http://localhost:8080/10.1/a",
            client.url(&"10.1/a".parse().unwrap())
        );
    }
}
