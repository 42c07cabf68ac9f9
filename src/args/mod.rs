//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;
mod types;


pub use cli::{Command, InsertArgs, QueryArgs, TesterArgs};
pub use types::{OutputFormat, PositiveUsize};

pub(crate) use defaults::{DEFAULT_CONFIG_FILES, DEFAULT_USER_AGENT};

#[cfg(test)]
pub(crate) use defaults::DEFAULT_URL;
#[cfg(test)]
pub(crate) use parsers::parse_duration_arg;
