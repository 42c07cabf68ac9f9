pub(crate) const DEFAULT_USER_AGENT: &str = concat!("logstress/", env!("CARGO_PKG_VERSION"));

/// Log server address used by the insert and query drivers.
pub(crate) const DEFAULT_URL: &str = "http://localhost:54321";

/// Config filenames checked when `--config` is not given.
pub(crate) const DEFAULT_CONFIG_FILES: [&str; 2] = ["logstress.toml", "logstress.json"];

pub(super) const DEFAULT_MAX_CONCURRENCY: &str = "100";
pub(super) const DEFAULT_NUM_LOGS: &str = "100000";
pub(super) const DEFAULT_BATCH_SIZE: &str = "1000";
pub(super) const DEFAULT_QUERY_REQUESTS: &str = "1";
pub(super) const DEFAULT_REQUEST_TIMEOUT: &str = "10s";
pub(super) const DEFAULT_CONNECT_TIMEOUT: &str = "5s";
