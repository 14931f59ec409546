//! Actors sit between commands and everything with side effects: the config
//! file and the network. Commands see them through small traits so they can
//! be tested against fakes.

use crate::cloudcontroller::{CloudControllerClient, CloudControllerError};
use crate::config::Config;

/// Messages a server attached to an otherwise successful call.
pub type Warnings = Vec<String>;

/// Owns the CLI config and changes it on behalf of commands.
pub struct ConfigActor<C> {
    config: Config,
    client: C,
}

impl<C: CloudControllerClient> ConfigActor<C> {
    pub fn new(config: Config, client: C) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn into_config(self) -> Config {
        self.config
    }

    /// Queries `api` and, if it answers, makes it the target. Returns the
    /// API version it reported.
    ///
    /// The config is left untouched on error.
    pub fn set_target(
        &mut self,
        api: &str,
        skip_ssl_validation: bool,
    ) -> Result<(String, Warnings), CloudControllerError> {
        let info = self.client.target_cf(api, skip_ssl_validation)?;
        tracing::info!(api = %info.api, version = %info.api_version, "target set");

        self.config.target = info.api;
        self.config.api_version = info.api_version.clone();
        self.config.authorization_endpoint = info.authorization_endpoint;
        self.config.token_endpoint = info.token_endpoint;
        self.config.loggregator_endpoint = info.loggregator_endpoint;
        self.config.doppler_endpoint = info.doppler_endpoint;
        self.config.skip_ssl_validation = skip_ssl_validation;

        Ok((info.api_version, info.warnings))
    }

    pub fn clear_target(&mut self) {
        tracing::info!(api = %self.config.target, "target cleared");
        self.config.clear_target();
    }

    /// The targeted endpoint and its API version, if any.
    pub fn target(&self) -> Option<(&str, &str)> {
        self.config
            .is_targeted()
            .then(|| (self.config.target.as_str(), self.config.api_version.as_str()))
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeClient;
    use super::*;

    #[test]
    fn test_set_target_stores_target_information() {
        let mut actor = ConfigActor::new(Config::default(), FakeClient::answering("2.54.0"));

        let (version, warnings) = actor.set_target("https://api.example.com", true).unwrap();
        assert_eq!(version, "2.54.0");
        assert!(warnings.is_empty());

        let config = actor.config();
        assert_eq!(config.target, "https://api.example.com");
        assert_eq!(config.api_version, "2.54.0");
        assert_eq!(config.token_endpoint, "https://uaa.example.com");
        assert_eq!(config.doppler_endpoint, "wss://doppler.example.com");
        assert!(config.skip_ssl_validation);
    }

    #[test]
    fn test_set_target_passes_arguments_to_client() {
        let mut actor = ConfigActor::new(Config::default(), FakeClient::answering("2.0.0"));
        actor.set_target("https://api.example.com", false).unwrap();
        assert_eq!(
            actor.client.calls.borrow().as_slice(),
            &[("https://api.example.com".to_string(), false)]
        );
    }

    #[test]
    fn test_failed_target_leaves_config_alone() {
        let config = Config {
            target: "https://old.example.com".to_string(),
            api_version: "1.0.0".to_string(),
            ..Config::default()
        };
        let err = CloudControllerError::UnverifiedServer {
            url: "https://new.example.com/v2/info".to_string(),
        };
        let mut actor = ConfigActor::new(config.clone(), FakeClient::failing(err.clone()));

        assert_eq!(actor.set_target("https://new.example.com", false), Err(err));
        assert_eq!(actor.into_config(), config);
    }

    #[test]
    fn test_target_and_clear() {
        let mut actor = ConfigActor::new(Config::default(), FakeClient::answering("2.54.0"));
        assert_eq!(actor.target(), None);

        actor.set_target("https://api.example.com", false).unwrap();
        assert_eq!(actor.target(), Some(("https://api.example.com", "2.54.0")));

        actor.clear_target();
        assert_eq!(actor.target(), None);
    }
}
