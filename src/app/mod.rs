//! Run orchestration: builds the runner, drives a command and emits the report.
mod export;
mod insert;
mod query;
mod report;
mod summary;

use tokio::time::Instant;
use tracing::warn;

use logstress::args::{Command, TesterArgs};
use logstress::error::{AppResult, ValidationError};
use logstress::runner::{BatchRequestRunner, HttpTransport};

pub(crate) use report::RunReport;

pub(crate) async fn run(args: &TesterArgs) -> AppResult<()> {
    let report = match &args.command {
        Command::Insert(insert) => insert::run_insert(args, insert).await?,
        Command::Query(query) => query::run_query(args, query).await?,
    };
    warn_first_failure(&report);
    export::emit_report(&report, args.output_format, args.output.as_deref()).await
}

fn build_runner(args: &TesterArgs) -> AppResult<BatchRequestRunner<HttpTransport>> {
    let transport = HttpTransport::new(args.request_timeout, args.connect_timeout)?;
    let deadline = args
        .deadline
        .map(|deadline| {
            Instant::now()
                .checked_add(deadline)
                .ok_or(ValidationError::DeadlineOverflow)
        })
        .transpose()?;
    Ok(BatchRequestRunner::new(transport).with_deadline(deadline))
}

fn warn_first_failure(report: &RunReport) {
    let Some(sample) = report.first_failure.as_ref() else {
        return;
    };
    warn!(
        "{} of {} request(s) failed; first failure (request #{}): {}",
        report.stats.failed, report.stats.total, sample.position, sample.error
    );
    if let Some(response) = sample.response.as_ref() {
        warn!("Server response for request #{}: {}", sample.position, response);
    }
}
