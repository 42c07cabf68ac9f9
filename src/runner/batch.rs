use futures_util::future::join_all;
use reqwest::Url;
use serde_json::Value;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, warn};

use crate::args::PositiveUsize;
use crate::error::{RequestFailure, RunnerError};

use super::transport::{Transport, TransportResponse};
use super::types::{BatchResult, Request, RequestOutcome};

/// Dispatches requests in sequential chunks of at most `max_concurrency`.
///
/// Each chunk runs concurrently and is awaited in full before the next one
/// starts. Outcomes land in slots indexed by submission position, so the
/// returned [`BatchResult`] always matches input order and length.
#[derive(Debug)]
pub struct BatchRequestRunner<T> {
    transport: T,
    deadline: Option<Instant>,
}

impl<T> BatchRequestRunner<T>
where
    T: Transport,
{
    #[must_use]
    pub const fn new(transport: T) -> Self {
        Self {
            transport,
            deadline: None,
        }
    }

    /// Bounds every later `submit_batch` call by `deadline`. Requests in
    /// flight or not yet dispatched at that point fail with a timeout.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends every request to `endpoint` and returns one outcome per request.
    ///
    /// # Errors
    ///
    /// Returns an error, before any request is sent, when `endpoint` is empty
    /// or not an http(s) URL, or when `max_concurrency` is zero. Per-request
    /// failures never surface here.
    pub async fn submit_batch(
        &self,
        endpoint: &str,
        requests: &[Request],
        max_concurrency: usize,
    ) -> Result<BatchResult, RunnerError> {
        let endpoint = parse_endpoint(endpoint)?;
        let max_concurrency = PositiveUsize::try_from(max_concurrency)
            .map_err(|err| RunnerError::InvalidConcurrency { source: err })?;

        let mut slots: Vec<Option<RequestOutcome>> =
            std::iter::repeat_with(|| None).take(requests.len()).collect();

        for (chunk_index, chunk) in requests.chunks(max_concurrency.get()).enumerate() {
            if self.deadline_passed() {
                warn!(
                    "Run deadline passed; {} request(s) not dispatched.",
                    requests
                        .len()
                        .saturating_sub(chunk_index.saturating_mul(max_concurrency.get()))
                );
                break;
            }
            let offset = chunk_index.saturating_mul(max_concurrency.get());
            let outcomes = join_all(chunk.iter().map(|request| self.execute(&endpoint, request))).await;
            for (position, outcome) in outcomes.into_iter().enumerate() {
                if let Some(slot) = slots.get_mut(offset.saturating_add(position)) {
                    *slot = Some(outcome);
                }
            }
            debug!(
                "Chunk {} done ({} request(s), offset {}).",
                chunk_index,
                chunk.len(),
                offset
            );
        }

        let outcomes = slots
            .into_iter()
            .map(|slot| slot.unwrap_or_else(RequestOutcome::deadline_exceeded))
            .collect();
        Ok(BatchResult::new(outcomes))
    }

    async fn execute(&self, endpoint: &Url, request: &Request) -> RequestOutcome {
        let body = request.to_body();
        let start = Instant::now();
        let exchange = self.transport.send(endpoint, &body);
        let result = match self.deadline {
            Some(deadline) => match timeout_at(deadline, exchange).await {
                Ok(result) => result,
                Err(elapsed) => Err(RequestFailure::Timeout(format!(
                    "run deadline exceeded ({})",
                    elapsed
                ))),
            },
            None => exchange.await,
        };
        let latency = start.elapsed();

        let outcome = match result {
            Ok(response) => judge_response(request, response, latency),
            Err(failure) => RequestOutcome::failed(latency, failure, None),
        };
        if let Some(failure) = outcome.failure() {
            debug!("{} request failed: {}", request.action().as_str(), failure);
        }
        outcome
    }

    fn deadline_passed(&self) -> bool {
        self.deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
    }
}

fn judge_response(
    request: &Request,
    response: TransportResponse,
    latency: std::time::Duration,
) -> RequestOutcome {
    let TransportResponse { status, body } = response;
    let Value::Object(body) = body else {
        return RequestOutcome::failed(
            latency,
            RequestFailure::Decode(format!("status {}: expected a JSON object", status)),
            None,
        );
    };
    if !(200..300).contains(&status) {
        return RequestOutcome::failed(
            latency,
            RequestFailure::Application(format!("unexpected HTTP status {}", status)),
            Some(body),
        );
    }
    match request.action().acknowledge(&body) {
        Ok(()) => RequestOutcome::succeeded(latency, body),
        Err(failure) => RequestOutcome::failed(latency, failure, Some(body)),
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url, RunnerError> {
    let trimmed = endpoint.trim();
    if trimmed.is_empty() {
        return Err(RunnerError::EmptyEndpoint);
    }
    let url = Url::parse(trimmed).map_err(|err| RunnerError::InvalidEndpoint {
        endpoint: trimmed.to_owned(),
        source: err,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(RunnerError::UnsupportedScheme {
            scheme: other.to_owned(),
        }),
    }
}
