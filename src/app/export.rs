use std::time::Duration;

use serde_json::{Value, json};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::info;

use logstress::args::OutputFormat;
use logstress::error::AppResult;
use logstress::metrics::LatencySummary;

use super::RunReport;
use super::report::FailureSample;
use super::summary::summary_lines;

/// Renders the report and writes it to `output`, or to stdout when unset.
pub(crate) async fn emit_report(
    report: &RunReport,
    format: OutputFormat,
    output: Option<&str>,
) -> AppResult<()> {
    let rendered = render_report(report, format)?;
    match output {
        Some(path) => {
            write_report(path, rendered.as_bytes()).await?;
            info!("Wrote {} report to {}.", format.as_str(), path);
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

pub(crate) fn render_report(report: &RunReport, format: OutputFormat) -> AppResult<String> {
    let mut rendered = match format {
        OutputFormat::Text => summary_lines(report).join("\n"),
        OutputFormat::Json => serde_json::to_string_pretty(&report_json(report))?,
    };
    rendered.push('\n');
    Ok(rendered)
}

pub(crate) fn report_json(report: &RunReport) -> Value {
    let stats = &report.stats;
    json!({
        "command": report.command,
        "endpoint": report.endpoint,
        "started_at": report.started_at.to_rfc3339(),
        "max_concurrency": report.max_concurrency,
        "total_requests": stats.total,
        "successful_requests": stats.succeeded,
        "failed_requests": stats.failed,
        "failures": {
            "network": stats.failures.network,
            "timeout": stats.failures.timeout,
            "decode": stats.failures.decode,
            "application": stats.failures.application
        },
        "wall_clock_seconds": stats.wall_clock.as_secs_f64(),
        "latency_seconds": stats.latency.as_ref().map(latency_json),
        "throughput_per_second": stats.throughput,
        "fetched_logs": report.fetched_logs,
        "fetched_logs_per_second": report.fetched_logs_per_second(),
        "first_failure": report.first_failure.as_ref().map(failure_json)
    })
}

fn failure_json(sample: &FailureSample) -> Value {
    json!({
        "request_index": sample.position,
        "kind": sample.kind.as_str(),
        "error": sample.error,
        "latency_seconds": sample.latency_seconds,
        "response": sample.response
    })
}

fn latency_json(latency: &LatencySummary) -> Value {
    json!({
        "min": seconds(latency.min),
        "mean": seconds(latency.mean),
        "median": seconds(latency.median),
        "p95": seconds(latency.p95),
        "p99": seconds(latency.p99),
        "max": seconds(latency.max)
    })
}

const fn seconds(duration: Duration) -> f64 {
    duration.as_secs_f64()
}

async fn write_report(path: &str, contents: &[u8]) -> Result<(), std::io::Error> {
    let file = tokio::fs::File::create(path).await?;
    let mut writer = BufWriter::new(file);
    writer.write_all(contents).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use clap::Parser;
    use logstress::args::TesterArgs;
    use logstress::error::RequestFailure;
    use logstress::runner::{BatchResult, RequestOutcome};
    use serde_json::Map;
    use tempfile::tempdir;

    fn run_async_test<F>(future: F) -> Result<(), String>
    where
        F: std::future::Future<Output = Result<(), String>>,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| format!("Failed to build runtime: {}", err))?;
        runtime.block_on(future)
    }

    fn query_report() -> Result<RunReport, String> {
        let args = TesterArgs::try_parse_from(["logstress", "query", "-r", "2"])
            .map_err(|err| format!("parse failed: {}", err))?;
        let outcomes = vec![
            RequestOutcome::succeeded(Duration::from_millis(250), Map::new()),
            RequestOutcome::failed(
                Duration::from_millis(10),
                RequestFailure::Decode("not json".to_owned()),
                None,
            ),
        ];
        Ok(RunReport::new(
            &args,
            Utc::now(),
            &BatchResult::new(outcomes),
            Duration::from_millis(500),
            Some(6),
        ))
    }

    #[test]
    fn json_report_carries_counts_and_rates() -> Result<(), String> {
        let report = query_report()?;
        let value = report_json(&report);

        let checks = [
            ("command", json!("query")),
            ("total_requests", json!(2)),
            ("successful_requests", json!(1)),
            ("failed_requests", json!(1)),
            ("fetched_logs", json!(6)),
            ("throughput_per_second", json!(2.0)),
            ("fetched_logs_per_second", json!(12.0)),
            ("wall_clock_seconds", json!(0.5)),
        ];
        for (key, expected) in checks {
            if value.get(key) != Some(&expected) {
                return Err(format!("{} expected {}, got {:?}", key, expected, value.get(key)));
            }
        }
        if value.pointer("/failures/decode") != Some(&json!(1)) {
            return Err(format!("Unexpected failures: {:?}", value.get("failures")));
        }
        let failure_checks = [
            ("/first_failure/request_index", json!(1)),
            ("/first_failure/kind", json!("decode")),
            ("/first_failure/error", json!("Invalid JSON response: not json")),
            ("/first_failure/latency_seconds", json!(0.01)),
            ("/first_failure/response", Value::Null),
        ];
        for (pointer, expected) in failure_checks {
            if value.pointer(pointer) != Some(&expected) {
                return Err(format!("{} expected {}, got {:?}", pointer, expected, value.pointer(pointer)));
            }
        }
        if value.pointer("/latency_seconds/p99") != Some(&json!(0.25)) {
            return Err(format!("Unexpected latency: {:?}", value.get("latency_seconds")));
        }
        let started = value
            .get("started_at")
            .and_then(Value::as_str)
            .ok_or("Missing started_at")?;
        chrono::DateTime::parse_from_rfc3339(started)
            .map_err(|err| format!("started_at is not RFC 3339: {}", err))?;
        Ok(())
    }

    #[test]
    fn emit_report_writes_json_file() -> Result<(), String> {
        run_async_test(async {
            let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
            let path = dir.path().join("report.json");
            let path_str = path.to_str().ok_or("Invalid temp path")?;
            let report = query_report()?;

            emit_report(&report, OutputFormat::Json, Some(path_str))
                .await
                .map_err(|err| format!("emit failed: {}", err))?;

            let contents = std::fs::read_to_string(&path)
                .map_err(|err| format!("read failed: {}", err))?;
            let value: Value = serde_json::from_str(&contents)
                .map_err(|err| format!("report is not JSON: {}", err))?;
            if value.get("total_requests") != Some(&json!(2)) {
                return Err(format!("Unexpected report: {}", value));
            }
            Ok(())
        })
    }

    #[test]
    fn text_report_ends_with_newline() -> Result<(), String> {
        let report = query_report()?;
        let rendered = render_report(&report, OutputFormat::Text)
            .map_err(|err| format!("render failed: {}", err))?;
        if !rendered.ends_with('\n') || !rendered.contains("Fetched Logs: 6") {
            return Err(format!("Unexpected text report: {}", rendered));
        }
        Ok(())
    }
}
