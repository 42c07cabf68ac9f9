use std::time::Instant;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use logstress::args::{InsertArgs, TesterArgs};
use logstress::error::{AppResult, RunnerError};
use logstress::runner::{BatchRequestRunner, BatchResult, Transport};
use logstress::workload::insert_requests;

use super::{RunReport, build_runner};

pub(super) async fn run_insert(args: &TesterArgs, insert: &InsertArgs) -> AppResult<RunReport> {
    let runner = build_runner(args)?;
    let mut rng = StdRng::from_entropy();
    info!(
        "Inserting {} log(s) into {} in batches of {} (max concurrency {}).",
        insert.num_logs.get(),
        args.url,
        insert.batch_size.get(),
        args.max_concurrency.get()
    );

    let started_at = Utc::now();
    let start = Instant::now();
    let result = submit_inserts(
        &runner,
        &args.url,
        insert,
        args.max_concurrency.get(),
        &mut rng,
    )
    .await?;
    let report = RunReport::new(args, started_at, &result, start.elapsed(), None);
    info!(
        "Insert run finished: {} succeeded, {} failed.",
        report.stats.succeeded, report.stats.failed
    );

    Ok(report)
}

/// Generates and submits `num_logs` inserts in sequential batches of
/// `batch_size`, aggregating every outcome in submission order.
async fn submit_inserts<T, R>(
    runner: &BatchRequestRunner<T>,
    endpoint: &str,
    insert: &InsertArgs,
    max_concurrency: usize,
    rng: &mut R,
) -> Result<BatchResult, RunnerError>
where
    T: Transport,
    R: Rng + ?Sized,
{
    let total = insert.num_logs.get();
    let batch_size = insert.batch_size.get();
    let mut result = BatchResult::default();
    let mut remaining = total;

    while remaining > 0 {
        let size = remaining.min(batch_size);
        let requests = insert_requests(size, rng);
        let batch = runner
            .submit_batch(endpoint, &requests, max_concurrency)
            .await?;
        remaining = remaining.saturating_sub(size);
        result.extend(batch);
        info!(
            "Submitted {}/{} log(s).",
            total.saturating_sub(remaining),
            total
        );
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use logstress::args::PositiveUsize;
    use logstress::error::RequestFailure;
    use logstress::runner::TransportResponse;
    use async_trait::async_trait;
    use reqwest::Url;
    use serde_json::{Value, json};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingTransport {
        references: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn send(
            &self,
            _endpoint: &Url,
            body: &Value,
        ) -> Result<TransportResponse, RequestFailure> {
            let reference = body
                .get("reference")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned();
            if let Ok(mut references) = self.references.lock() {
                references.push(reference);
            }
            Ok(TransportResponse {
                status: 200,
                body: json!({"success": true}),
            })
        }
    }

    fn insert_args(num_logs: usize, batch_size: usize) -> Result<InsertArgs, String> {
        Ok(InsertArgs {
            num_logs: PositiveUsize::try_from(num_logs).map_err(|err| err.to_string())?,
            batch_size: PositiveUsize::try_from(batch_size).map_err(|err| err.to_string())?,
        })
    }

    #[test]
    fn inserts_are_split_into_batches_and_aggregated() -> Result<(), String> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| format!("Failed to build runtime: {}", err))?;
        runtime.block_on(async {
            let runner = BatchRequestRunner::new(RecordingTransport::default());
            let insert = insert_args(7, 3)?;
            let mut rng = StdRng::seed_from_u64(3);

            let result = submit_inserts(&runner, "http://127.0.0.1:9", &insert, 2, &mut rng)
                .await
                .map_err(|err| format!("submit failed: {}", err))?;

            if result.len() != 7 {
                return Err(format!("Expected 7 outcomes, got {}", result.len()));
            }
            if result.iter().any(|outcome| !outcome.success()) {
                return Err("Expected every insert to succeed".to_owned());
            }
            let references = runner
                .transport()
                .references
                .lock()
                .map_err(|err| format!("lock poisoned: {}", err))?
                .clone();
            if references.len() != 7 || references.iter().any(|reference| reference.len() != 10) {
                return Err(format!("Unexpected references sent: {:?}", references));
            }
            Ok(())
        })
    }

    #[test]
    fn invalid_endpoint_aborts_the_run() -> Result<(), String> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| format!("Failed to build runtime: {}", err))?;
        runtime.block_on(async {
            let runner = BatchRequestRunner::new(RecordingTransport::default());
            let insert = insert_args(2, 1)?;
            let mut rng = StdRng::seed_from_u64(3);
            match submit_inserts(&runner, "", &insert, 2, &mut rng).await {
                Err(RunnerError::EmptyEndpoint) => Ok(()),
                other => Err(format!("Expected EmptyEndpoint, got {:?}", other)),
            }
        })
    }
}
