//! Run statistics derived from batch outcomes.
mod statistics;


pub use statistics::{
    FailureBreakdown, LatencySummary, P50_BASIS_POINTS, P95_BASIS_POINTS, P99_BASIS_POINTS,
    RunStatistics, compute_statistics, per_second, percentile,
};
