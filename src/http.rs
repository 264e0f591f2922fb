//! Outbound HTTP.
//!
//! Every request of the crate is a plain unauthenticated GET whose failure is
//! not an error but an absent body, so the seam is a single method.

use std::future::Future;
use tracing::{debug, warn};

use crate::config::{Config, USER_AGENT};
use crate::error::Result;

pub trait Transport {
    /// Body of a successful (2xx) GET; `None` on connection errors,
    /// timeouts and any other status.
    fn get(&self, url: &str) -> impl Future<Output = Option<Vec<u8>>> + Send;
}

/// reqwest-backed transport honoring the configured timeout and proxy.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout);
        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy.as_str())?);
        }
        Ok(Self::from_client(builder.build()?))
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Option<Vec<u8>> {
        debug!(url, "GET");
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(url, error = %err, "request failed");
                return None;
            }
        };
        let status = response.status();
        if !status.is_success() {
            warn!(url, %status, "unexpected status");
            return None;
        }
        match response.bytes().await {
            Ok(body) => Some(body.to_vec()),
            Err(err) => {
                warn!(url, error = %err, "failed to read body");
                None
            }
        }
    }
}
