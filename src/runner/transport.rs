use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::error;

use crate::args::DEFAULT_USER_AGENT;
use crate::error::{RequestFailure, RunnerError};

#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Value,
}

/// Sends one JSON body to an endpoint and returns the decoded JSON reply.
///
/// Implementations report every failure through [`RequestFailure`] and
/// never panic; the runner turns those failures into outcomes.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, endpoint: &Url, body: &Value) -> Result<TransportResponse, RequestFailure>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Builds a pooled HTTP client with the given timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying client cannot be constructed.
    pub fn new(request_timeout: Duration, connect_timeout: Duration) -> Result<Self, RunnerError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .no_proxy()
            .build()
            .map_err(|err| {
                error!("Failed to build HTTP client: {}", err);
                RunnerError::BuildClientFailed { source: err }
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, endpoint: &Url, body: &Value) -> Result<TransportResponse, RequestFailure> {
        let response = self
            .client
            .post(endpoint.clone())
            .json(body)
            .send()
            .await
            .map_err(|err| RequestFailure::from_reqwest(&err))?;
        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| RequestFailure::from_reqwest(&err))?;
        let body = serde_json::from_slice(&bytes)
            .map_err(|err| RequestFailure::Decode(format!("status {}: {}", status, err)))?;
        Ok(TransportResponse { status, body })
    }
}
