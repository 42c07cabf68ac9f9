use logstress::error::FailureKind;

use super::RunReport;

/// Divisor that splits a hundredths-of-a-percent value into whole and fraction.
const PERCENT_DIVISOR: u64 = 100;
const FAILURE_KINDS: [FailureKind; 4] = [
    FailureKind::Network,
    FailureKind::Timeout,
    FailureKind::Decode,
    FailureKind::Application,
];

pub(crate) fn summary_lines(report: &RunReport) -> Vec<String> {
    let stats = &report.stats;
    let rate = report.success_rate_x100();
    let mut lines = vec![
        format!("Command: {} ({})", report.command, report.endpoint),
        format!("Started: {}", report.started_at.to_rfc3339()),
        format!("Max Concurrency: {}", report.max_concurrency),
        format!("Total Time: {:.3?}", stats.wall_clock),
        format!("Total Requests: {}", stats.total),
        format!(
            "Successful: {} ({}.{:02}%)",
            stats.succeeded,
            rate / PERCENT_DIVISOR,
            rate % PERCENT_DIVISOR
        ),
    ];

    if stats.failed > 0 {
        let kinds: Vec<String> = FAILURE_KINDS
            .iter()
            .filter_map(|kind| {
                let count = stats.failures.get(*kind);
                (count > 0).then(|| format!("{} {}", kind.as_str(), count))
            })
            .collect();
        lines.push(format!("Failed: {} ({})", stats.failed, kinds.join(", ")));
    }

    if let Some(sample) = report.first_failure.as_ref() {
        lines.push(format!(
            "First Failure: request #{}: {}",
            sample.position, sample.error
        ));
        if let Some(response) = sample.response.as_ref() {
            lines.push(format!("First Failure Response: {}", response));
        }
    }

    match stats.latency.as_ref() {
        Some(latency) => {
            lines.push(format!(
                "Min/Mean/Median Latency: {:.2?} / {:.2?} / {:.2?}",
                latency.min, latency.mean, latency.median
            ));
            lines.push(format!(
                "P95/P99/Max Latency: {:.2?} / {:.2?} / {:.2?}",
                latency.p95, latency.p99, latency.max
            ));
        }
        None => lines.push("Latency: n/a (no successful requests)".to_owned()),
    }

    lines.push(match stats.throughput {
        Some(throughput) => format!("Throughput: {:.2} req/s", throughput),
        None => "Throughput: n/a".to_owned(),
    });

    if let Some(fetched) = report.fetched_logs {
        lines.push(format!("Fetched Logs: {}", fetched));
        if let Some(rate) = report.fetched_logs_per_second() {
            lines.push(format!("Logs/sec: {:.2}", rate));
        }
    }

    lines
}
