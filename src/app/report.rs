use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;

use logstress::args::TesterArgs;
use logstress::error::FailureKind;
use logstress::metrics::{RunStatistics, compute_statistics, per_second};
use logstress::runner::BatchResult;

/// Everything a rendered report needs about one finished run.
#[derive(Debug, Clone)]
pub(crate) struct RunReport {
    pub(crate) command: &'static str,
    pub(crate) endpoint: String,
    pub(crate) max_concurrency: usize,
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) stats: RunStatistics,
    /// Total entries returned by `query_all` responses; only set for queries.
    pub(crate) fetched_logs: Option<u64>,
    pub(crate) first_failure: Option<FailureSample>,
}

/// The earliest failed request of a run, kept so reports can say why it failed.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FailureSample {
    pub(crate) position: usize,
    pub(crate) kind: FailureKind,
    pub(crate) error: String,
    pub(crate) latency_seconds: f64,
    /// Server reply, when the request got a JSON object back.
    pub(crate) response: Option<Value>,
}

impl FailureSample {
    fn first(result: &BatchResult) -> Option<Self> {
        result.iter().enumerate().find_map(|(position, outcome)| {
            let failure = outcome.failure()?;
            Some(Self {
                position,
                kind: failure.kind(),
                error: failure.to_string(),
                latency_seconds: outcome.latency_seconds(),
                response: outcome.response_body().cloned().map(Value::Object),
            })
        })
    }
}

impl RunReport {
    pub(crate) fn new(
        args: &TesterArgs,
        started_at: DateTime<Utc>,
        result: &BatchResult,
        wall_clock: Duration,
        fetched_logs: Option<u64>,
    ) -> Self {
        Self {
            command: args.command.name(),
            endpoint: args.url.clone(),
            max_concurrency: args.max_concurrency.get(),
            started_at,
            stats: compute_statistics(result, wall_clock),
            fetched_logs,
            first_failure: FailureSample::first(result),
        }
    }

    pub(crate) fn fetched_logs_per_second(&self) -> Option<f64> {
        self.fetched_logs
            .and_then(|count| per_second(count, self.stats.wall_clock))
    }

    /// Success share in hundredths of a percent.
    pub(crate) fn success_rate_x100(&self) -> u64 {
        let scaled = u128::from(self.stats.succeeded)
            .saturating_mul(10_000)
            .checked_div(u128::from(self.stats.total))
            .unwrap_or(0);
        u64::try_from(scaled).map_or(u64::MAX, |value| value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use logstress::error::RequestFailure;
    use logstress::runner::RequestOutcome;
    use serde_json::{Map, json};

    #[test]
    fn first_failure_keeps_error_and_server_reply() -> Result<(), String> {
        let args = TesterArgs::try_parse_from(["logstress", "query", "-r", "3"])
            .map_err(|err| format!("parse failed: {}", err))?;
        let mut reply = Map::new();
        reply.insert("success".to_owned(), json!(false));
        reply.insert("error".to_owned(), json!("disk_full"));
        let result = BatchResult::new(vec![
            RequestOutcome::succeeded(Duration::from_millis(5), Map::new()),
            RequestOutcome::failed(
                Duration::from_millis(250),
                RequestFailure::Application("server rejected query_all: disk_full".to_owned()),
                Some(reply),
            ),
            RequestOutcome::failed(
                Duration::from_millis(5),
                RequestFailure::Network("refused".to_owned()),
                None,
            ),
        ]);

        let report = RunReport::new(&args, Utc::now(), &result, Duration::from_secs(1), None);
        let sample = report.first_failure.ok_or("Expected a failure sample")?;
        let expected = FailureSample {
            position: 1,
            kind: FailureKind::Application,
            error: "Application error: server rejected query_all: disk_full".to_owned(),
            latency_seconds: 0.25,
            response: Some(json!({"success": false, "error": "disk_full"})),
        };
        if sample != expected {
            return Err(format!("Unexpected sample: {:?}", sample));
        }
        Ok(())
    }

    #[test]
    fn successful_runs_have_no_failure_sample() -> Result<(), String> {
        let args = TesterArgs::try_parse_from(["logstress", "insert"])
            .map_err(|err| format!("parse failed: {}", err))?;
        let result = BatchResult::new(vec![RequestOutcome::succeeded(
            Duration::from_millis(5),
            Map::new(),
        )]);
        let report = RunReport::new(&args, Utc::now(), &result, Duration::from_secs(1), None);
        if report.first_failure.is_some() {
            return Err("Expected no failure sample".to_owned());
        }
        Ok(())
    }
}
