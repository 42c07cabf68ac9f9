use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing::debug;

use logstress::args::TesterArgs;
use logstress::config::{apply_config, load_config};
use logstress::error::AppResult;

pub(crate) fn run() -> AppResult<()> {
    let (mut args, matches) = parse_args()?;

    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, &matches, &config)?;
    }

    crate::logger::init_logging(args.verbose, args.no_color);
    debug!(
        "Running {} against {} (max concurrency {}).",
        args.command.name(),
        args.url,
        args.max_concurrency.get()
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(crate::app::run(&args))
}

fn parse_args() -> AppResult<(TesterArgs, ArgMatches)> {
    let matches = TesterArgs::command().get_matches();
    let args = TesterArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}
