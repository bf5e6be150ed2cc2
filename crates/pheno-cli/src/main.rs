//! Phenotype mapper CLI.

use clap::{ColorChoice, Parser};
use pheno_cli::commands::{
    LoadOptions, load_mapper, run_batch, run_export, run_map, run_report, run_stats,
};
use pheno_cli::logging::{LogConfig, LogFormat, init_logging};
use pheno_cli::summary::print_stats;
use pheno_model::CodeHint;
use pheno_report::OutputFormat;
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let options = LoadOptions {
        data_dir: cli.source.data_dir.clone(),
        mapping_file: cli.source.mapping_file.clone(),
    };
    let mapper = load_mapper(&options)?;
    let hint = CodeHint::from(cli.source.code_type);
    let format = OutputFormat::from(cli.source.format);
    let output = cli.source.output.as_deref();

    match &cli.command {
        Command::Map { code } => {
            run_map(&mapper, code, hint, output, format)?;
        }
        Command::Batch { file } => {
            let results = run_batch(&mapper, file, hint, output, format)?;
            if let Some(path) = output {
                println!("Mapped {} codes to {}", results.len(), path.display());
            }
        }
        Command::Stats => print_stats(&run_stats(&mapper), mapper.bridge_len()),
        Command::Export { file } => {
            let rows = run_export(&mapper, file, format)?;
            println!("Exported {rows} mappings to {}", file.display());
        }
        Command::Report => {
            run_report(&mapper, output)?;
        }
    }
    Ok(())
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_timestamps = cli.log_file.is_some();
    config.with_target = config.level_filter >= LevelFilter::DEBUG;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
