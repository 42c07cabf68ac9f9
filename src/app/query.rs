use std::time::Instant;

use chrono::Utc;
use serde_json::Value;
use tracing::info;

use logstress::args::{QueryArgs, TesterArgs};
use logstress::error::AppResult;
use logstress::runner::{BatchResult, Request, RequestOutcome};
use logstress::workload::query_all_request;

use super::{RunReport, build_runner};

pub(super) async fn run_query(args: &TesterArgs, query: &QueryArgs) -> AppResult<RunReport> {
    let runner = build_runner(args)?;
    let requests: Vec<Request> = std::iter::repeat_with(query_all_request)
        .take(query.requests.get())
        .collect();
    info!(
        "Sending {} query_all request(s) to {} (max concurrency {}).",
        requests.len(),
        args.url,
        args.max_concurrency.get()
    );

    let started_at = Utc::now();
    let start = Instant::now();
    let result = runner
        .submit_batch(&args.url, &requests, args.max_concurrency.get())
        .await?;
    let fetched = fetched_log_count(&result);
    let report = RunReport::new(args, started_at, &result, start.elapsed(), Some(fetched));
    info!(
        "Query run finished: {} succeeded, {} failed, {} log(s) fetched.",
        report.stats.succeeded, report.stats.failed, fetched
    );

    Ok(report)
}

/// Sums the `logs` array lengths of successful responses.
fn fetched_log_count(result: &BatchResult) -> u64 {
    result
        .iter()
        .filter(|outcome| outcome.success())
        .filter_map(RequestOutcome::response_body)
        .filter_map(|body| body.get("logs").and_then(Value::as_array))
        .fold(0_u64, |acc, logs| {
            acc.saturating_add(u64::try_from(logs.len()).unwrap_or(u64::MAX))
        })
}
