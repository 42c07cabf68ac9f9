mod app;
mod config;
mod request;
mod runner;
mod validation;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use request::{FailureKind, RequestFailure};
pub use runner::RunnerError;
pub use validation::ValidationError;
