use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RequestFailure;

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Insert,
    QueryAll,
}

impl Action {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Action::Insert => "insert",
            Action::QueryAll => "query_all",
        }
    }

    /// Checks a decoded response body. Inserts must report `"success": true`;
    /// queries may instead return a `"logs"` array.
    pub(crate) fn acknowledge(self, body: &Map<String, Value>) -> Result<(), RequestFailure> {
        let success = body.get("success").and_then(Value::as_bool);
        let acknowledged = match self {
            Action::Insert => success == Some(true),
            Action::QueryAll => {
                success == Some(true) || body.get("logs").is_some_and(Value::is_array)
            }
        };
        if acknowledged {
            return Ok(());
        }
        let reason = match (success, body.get("error").and_then(Value::as_str)) {
            (_, Some(message)) => format!("server rejected {}: {}", self.as_str(), message),
            (Some(false), None) => format!("server reported success=false for {}", self.as_str()),
            (_, None) => format!("response to {} has no success field", self.as_str()),
        };
        Err(RequestFailure::Application(reason))
    }
}

/// One logical operation against the log server.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    action: Action,
    payload: Map<String, Value>,
}

impl Request {
    #[must_use]
    pub const fn new(action: Action, payload: Map<String, Value>) -> Self {
        Self { action, payload }
    }

    #[must_use]
    pub const fn action(&self) -> Action {
        self.action
    }

    #[must_use]
    pub const fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    /// Builds the JSON body sent on the wire: the payload plus an `action` key.
    #[must_use]
    pub fn to_body(&self) -> Value {
        let mut body = self.payload.clone();
        body.insert(
            "action".to_owned(),
            Value::String(self.action.as_str().to_owned()),
        );
        Value::Object(body)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestOutcome {
    latency: Duration,
    response_body: Option<Map<String, Value>>,
    failure: Option<RequestFailure>,
}

impl RequestOutcome {
    #[must_use]
    pub const fn succeeded(latency: Duration, response_body: Map<String, Value>) -> Self {
        Self {
            latency,
            response_body: Some(response_body),
            failure: None,
        }
    }

    /// A failed attempt. The response body is kept when the server answered
    /// with JSON that was not acknowledged.
    #[must_use]
    pub const fn failed(
        latency: Duration,
        failure: RequestFailure,
        response_body: Option<Map<String, Value>>,
    ) -> Self {
        Self {
            latency,
            response_body,
            failure: Some(failure),
        }
    }

    pub(crate) fn deadline_exceeded() -> Self {
        Self::failed(
            Duration::ZERO,
            RequestFailure::Timeout("run deadline passed before dispatch".to_owned()),
            None,
        )
    }

    #[must_use]
    pub const fn success(&self) -> bool {
        self.failure.is_none()
    }

    #[must_use]
    pub const fn latency(&self) -> Duration {
        self.latency
    }

    #[must_use]
    pub fn latency_seconds(&self) -> f64 {
        self.latency.as_secs_f64()
    }

    #[must_use]
    pub const fn response_body(&self) -> Option<&Map<String, Value>> {
        self.response_body.as_ref()
    }

    #[must_use]
    pub const fn failure(&self) -> Option<&RequestFailure> {
        self.failure.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.failure.as_ref().map(ToString::to_string)
    }
}

/// Outcomes in submission order, one per submitted request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResult {
    outcomes: Vec<RequestOutcome>,
}

impl BatchResult {
    #[must_use]
    pub const fn new(outcomes: Vec<RequestOutcome>) -> Self {
        Self { outcomes }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    #[must_use]
    pub fn outcomes(&self) -> &[RequestOutcome] {
        &self.outcomes
    }

    /// Appends the outcomes of a later batch.
    pub fn extend(&mut self, other: BatchResult) {
        self.outcomes.extend(other.outcomes);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RequestOutcome> {
        self.outcomes.iter()
    }
}

impl<'result> IntoIterator for &'result BatchResult {
    type Item = &'result RequestOutcome;
    type IntoIter = std::slice::Iter<'result, RequestOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.iter()
    }
}
