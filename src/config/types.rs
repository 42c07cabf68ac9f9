use std::time::Duration;

use serde::Deserialize;

use crate::args::OutputFormat;
use crate::args::parsers::parse_duration_value;
use crate::error::ValidationError;

#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub url: Option<String>,
    #[serde(alias = "concurrency")]
    pub max_concurrency: Option<usize>,
    pub timeout: Option<DurationValue>,
    pub connect_timeout: Option<DurationValue>,
    pub deadline: Option<DurationValue>,
    pub output: Option<String>,
    pub output_format: Option<OutputFormat>,
    pub no_color: Option<bool>,
    pub insert: Option<InsertConfig>,
    pub query: Option<QueryConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct InsertConfig {
    pub num_logs: Option<usize>,
    pub batch_size: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QueryConfig {
    pub requests: Option<usize>,
}

/// A duration written either as whole seconds or as text such as `"500ms"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(0) => Err(ValidationError::DurationZero),
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => parse_duration_value(text),
        }
    }
}
