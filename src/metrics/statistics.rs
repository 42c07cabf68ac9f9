use std::time::Duration;

use crate::error::FailureKind;
use crate::runner::BatchResult;

/// Percentiles are expressed in basis points so index selection stays exact.
const BASIS_POINTS_SCALE: u128 = 10_000;
pub const P50_BASIS_POINTS: u32 = 5_000;
pub const P95_BASIS_POINTS: u32 = 9_500;
pub const P99_BASIS_POINTS: u32 = 9_900;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FailureBreakdown {
    pub network: u64,
    pub timeout: u64,
    pub decode: u64,
    pub application: u64,
}

impl FailureBreakdown {
    const fn record(&mut self, kind: FailureKind) {
        let counter = match kind {
            FailureKind::Network => &mut self.network,
            FailureKind::Timeout => &mut self.timeout,
            FailureKind::Decode => &mut self.decode,
            FailureKind::Application => &mut self.application,
        };
        *counter = counter.saturating_add(1);
    }

    #[must_use]
    pub const fn get(&self, kind: FailureKind) -> u64 {
        match kind {
            FailureKind::Network => self.network,
            FailureKind::Timeout => self.timeout,
            FailureKind::Decode => self.decode,
            FailureKind::Application => self.application,
        }
    }
}

/// Latency figures over successful outcomes only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencySummary {
    pub min: Duration,
    pub max: Duration,
    pub mean: Duration,
    /// Value at index `floor(count / 2)`, not an average of the two middle
    /// values: for an even count this is the upper middle latency.
    pub median: Duration,
    pub p95: Duration,
    pub p99: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunStatistics {
    pub total: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub failures: FailureBreakdown,
    pub wall_clock: Duration,
    /// `None` when no request succeeded.
    pub latency: Option<LatencySummary>,
    /// Successful requests per second of wall clock; `None` for a zero wall clock.
    pub throughput: Option<f64>,
}

/// Summarizes a completed batch. Pure; the caller measures `wall_clock`.
#[must_use]
pub fn compute_statistics(result: &BatchResult, wall_clock: Duration) -> RunStatistics {
    let mut failures = FailureBreakdown::default();
    let mut latencies: Vec<Duration> = Vec::with_capacity(result.len());
    for outcome in result {
        match outcome.failure() {
            Some(failure) => failures.record(failure.kind()),
            None => latencies.push(outcome.latency()),
        }
    }
    latencies.sort_unstable();

    let total = to_u64(result.len());
    let succeeded = to_u64(latencies.len());

    RunStatistics {
        total,
        succeeded,
        failed: total.saturating_sub(succeeded),
        failures,
        wall_clock,
        latency: summarize(&latencies),
        throughput: per_second(succeeded, wall_clock),
    }
}

/// Value at index `floor(p * count)` of an ascending slice, clamped to the
/// last element. No interpolation.
#[must_use]
pub fn percentile(sorted: &[Duration], basis_points: u32) -> Option<Duration> {
    let last = sorted.len().checked_sub(1)?;
    let count = u128::try_from(sorted.len()).ok()?;
    let index = count
        .saturating_mul(u128::from(basis_points))
        .checked_div(BASIS_POINTS_SCALE)
        .and_then(|index| usize::try_from(index).ok())
        .unwrap_or(last)
        .min(last);
    sorted.get(index).copied()
}

/// `count / elapsed` in seconds, unrounded.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "throughput is reported as an unrounded rate"
)]
pub fn per_second(count: u64, elapsed: Duration) -> Option<f64> {
    if elapsed.is_zero() {
        return None;
    }
    Some(count as f64 / elapsed.as_secs_f64())
}

fn summarize(sorted: &[Duration]) -> Option<LatencySummary> {
    let min = sorted.first().copied()?;
    let max = sorted.last().copied()?;
    Some(LatencySummary {
        min,
        max,
        mean: mean(sorted),
        median: percentile(sorted, P50_BASIS_POINTS)?,
        p95: percentile(sorted, P95_BASIS_POINTS)?,
        p99: percentile(sorted, P99_BASIS_POINTS)?,
    })
}

fn mean(values: &[Duration]) -> Duration {
    let total_nanos = values
        .iter()
        .fold(0_u128, |acc, value| acc.saturating_add(value.as_nanos()));
    let count = u128::try_from(values.len()).unwrap_or(u128::MAX);
    let mean_nanos = total_nanos.checked_div(count).unwrap_or(0);
    Duration::from_nanos(u64::try_from(mean_nanos).unwrap_or(u64::MAX))
}

fn to_u64(value: usize) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}
