use std::time::Duration;

use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{Command, PositiveUsize, TesterArgs};
use crate::error::{AppError, AppResult, ConfigError};

use super::types::{ConfigFile, DurationValue};

/// Applies configuration values to CLI arguments. Values given on the command
/// line or through the environment take precedence.
///
/// # Errors
///
/// Returns an error when a config value is invalid.
pub fn apply_config(
    args: &mut TesterArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_cli(matches, "url")
        && let Some(url) = config.url.clone()
    {
        args.url = url;
    }

    if !is_cli(matches, "max_concurrency")
        && let Some(value) = config.max_concurrency
    {
        args.max_concurrency = ensure_positive_usize(value, "max_concurrency")?;
    }

    if !is_cli(matches, "request_timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.request_timeout = to_duration(timeout, "timeout")?;
    }

    if !is_cli(matches, "connect_timeout")
        && let Some(timeout) = config.connect_timeout.as_ref()
    {
        args.connect_timeout = to_duration(timeout, "connect_timeout")?;
    }

    if !is_cli(matches, "deadline")
        && let Some(deadline) = config.deadline.as_ref()
    {
        args.deadline = Some(to_duration(deadline, "deadline")?);
    }

    if !is_cli(matches, "output")
        && let Some(output) = config.output.clone()
    {
        args.output = Some(output);
    }

    if !is_cli(matches, "output_format")
        && let Some(format) = config.output_format
    {
        args.output_format = format;
    }

    if !is_cli(matches, "no_color")
        && let Some(no_color) = config.no_color
    {
        args.no_color = no_color;
    }

    apply_command_config(args, matches, config)
}

fn apply_command_config(
    args: &mut TesterArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    match &mut args.command {
        Command::Insert(insert) => {
            let Some(section) = config.insert.as_ref() else {
                return Ok(());
            };
            let sub = matches.subcommand_matches("insert");
            if !sub.is_some_and(|sub| is_cli(sub, "num_logs"))
                && let Some(value) = section.num_logs
            {
                insert.num_logs = ensure_positive_usize(value, "insert.num_logs")?;
            }
            if !sub.is_some_and(|sub| is_cli(sub, "batch_size"))
                && let Some(value) = section.batch_size
            {
                insert.batch_size = ensure_positive_usize(value, "insert.batch_size")?;
            }
        }
        Command::Query(query) => {
            let Some(section) = config.query.as_ref() else {
                return Ok(());
            };
            let sub = matches.subcommand_matches("query");
            if !sub.is_some_and(|sub| is_cli(sub, "requests"))
                && let Some(value) = section.requests
            {
                query.requests = ensure_positive_usize(value, "query.requests")?;
            }
        }
    }
    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches!(
        matches.value_source(name),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}

fn ensure_positive_usize(value: usize, field: &str) -> AppResult<PositiveUsize> {
    PositiveUsize::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive {
            field: field.to_owned(),
            source: err,
        })
    })
}

fn to_duration(value: &DurationValue, field: &str) -> AppResult<Duration> {
    value.to_duration().map_err(|err| {
        AppError::config(ConfigError::InvalidDuration {
            field: field.to_owned(),
            source: err,
        })
    })
}
