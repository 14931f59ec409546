//! Client for the Cloud Controller `/v2/info` endpoint.
//!
//! Targeting an API means asking it for its version and the endpoints of the
//! services around it. [`CloudControllerClient`] is the seam the config actor
//! talks to; [`HttpCloudControllerClient`] is the real implementation.

use reqwest::blocking::Client;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use std::error::Error as StdError;
use std::time::Duration;
use thiserror::Error;

const INFO_PATH: &str = "/v2/info";
const WARNINGS_HEADER: &str = "x-cf-warnings";
const CONNECT_TIMEOUT_MS: u64 = 5_000;
const REQUEST_TIMEOUT_MS: u64 = 30_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CloudControllerError {
    /// The server's TLS certificate could not be verified.
    #[error("x509: certificate for {url} could not be verified")]
    UnverifiedServer { url: String },

    /// Anything else that kept the request from producing an info document.
    #[error("Request error: {message}")]
    Request { url: String, message: String },
}

/// What a Cloud Controller reports about itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetInfo {
    pub api: String,
    pub api_version: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub loggregator_endpoint: String,
    pub doppler_endpoint: String,
    /// Messages the server attached to the response.
    pub warnings: Vec<String>,
}

pub trait CloudControllerClient {
    fn target_cf(
        &self,
        api: &str,
        skip_ssl_validation: bool,
    ) -> Result<TargetInfo, CloudControllerError>;
}

#[derive(Debug, Deserialize)]
struct InfoResponse {
    #[serde(default)]
    api_version: String,
    #[serde(default)]
    authorization_endpoint: String,
    #[serde(default)]
    token_endpoint: String,
    #[serde(default)]
    logging_endpoint: String,
    #[serde(default)]
    doppler_logging_endpoint: String,
}

#[derive(Debug, Clone)]
pub struct HttpCloudControllerClient {
    user_agent: String,
    connect_timeout: Duration,
    timeout: Duration,
}

impl Default for HttpCloudControllerClient {
    fn default() -> Self {
        Self {
            user_agent: format!("cf/{}", env!("CARGO_PKG_VERSION")),
            connect_timeout: Duration::from_millis(CONNECT_TIMEOUT_MS),
            timeout: Duration::from_millis(REQUEST_TIMEOUT_MS),
        }
    }
}

impl HttpCloudControllerClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn build_client(
        &self,
        url: &str,
        skip_ssl_validation: bool,
    ) -> Result<Client, CloudControllerError> {
        Client::builder()
            .user_agent(self.user_agent.clone())
            .connect_timeout(self.connect_timeout)
            .timeout(self.timeout)
            .danger_accept_invalid_certs(skip_ssl_validation)
            .build()
            .map_err(|err| CloudControllerError::Request {
                url: url.to_string(),
                message: err.to_string(),
            })
    }
}

impl CloudControllerClient for HttpCloudControllerClient {
    fn target_cf(
        &self,
        api: &str,
        skip_ssl_validation: bool,
    ) -> Result<TargetInfo, CloudControllerError> {
        let api = api.trim_end_matches('/');
        let url = format!("{api}{INFO_PATH}");
        tracing::debug!(%url, skip_ssl_validation, "requesting cloud controller info");

        let client = self.build_client(&url, skip_ssl_validation)?;
        let response = client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .map_err(|err| map_send_error(&url, &err))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%url, %status, "cloud controller rejected info request");
            return Err(CloudControllerError::Request {
                url,
                message: format!("Server error, status code: {}", status.as_u16()),
            });
        }

        let warnings = parse_warnings(response.headers());
        let info: InfoResponse = response.json().map_err(|err| CloudControllerError::Request {
            url: url.clone(),
            message: format!("Invalid response from {url}: {err}"),
        })?;

        Ok(TargetInfo {
            api: api.to_string(),
            api_version: info.api_version,
            authorization_endpoint: info.authorization_endpoint,
            token_endpoint: info.token_endpoint,
            loggregator_endpoint: info.logging_endpoint,
            doppler_endpoint: info.doppler_logging_endpoint,
            warnings,
        })
    }
}

fn map_send_error(url: &str, err: &reqwest::Error) -> CloudControllerError {
    if is_certificate_error(err) {
        return CloudControllerError::UnverifiedServer {
            url: url.to_string(),
        };
    }
    let message = if err.is_timeout() {
        format!("Timed out waiting for {url}")
    } else {
        error_chain(err)
    };
    CloudControllerError::Request {
        url: url.to_string(),
        message,
    }
}

fn is_certificate_error(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        let text = e.to_string().to_lowercase();
        if text.contains("certificate") || text.contains("x509") {
            return true;
        }
        current = e.source();
    }
    false
}

fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut current = err.source();
    while let Some(e) = current {
        let text = e.to_string();
        if !parts.iter().any(|p| p.contains(&text)) {
            parts.push(text);
        }
        current = e.source();
    }
    parts.join(": ")
}

fn parse_warnings(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(WARNINGS_HEADER)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(String::from)
        .collect()
}
