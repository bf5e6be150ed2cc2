//! CLI argument definitions for the phenotype mapper.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use pheno_model::{CodeHint, CodeKind};
use pheno_report::OutputFormat;

#[derive(Parser)]
#[command(
    name = "phenomap",
    version,
    about = "Map ICD-9, ICD-10 and SNOMED CT codes to phenotype categories",
    long_about = "Map medical codes to the phenotype definitions of a curated library.\n\n\
                  ICD-9 codes are resolved through ICD-10 using General Equivalence\n\
                  Mappings. Results carry a match type and a confidence score."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

/// Where the phenotype library and GEM file are read from, and how
/// results are written.
#[derive(Args)]
pub struct SourceArgs {
    /// Directory containing the phenotype folders
    /// (default: $PHENOMAP_DATA_DIR, then "Medical conditions").
    #[arg(long = "data-dir", value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// ICD-10 to ICD-9 GEM CSV file
    /// (default: $PHENOMAP_GEM_FILE, then "icd10toicd9gem.csv").
    #[arg(long = "mapping-file", value_name = "PATH", global = true)]
    pub mapping_file: Option<PathBuf>,

    /// Coding system of the input codes.
    #[arg(long = "code-type", value_enum, default_value = "auto", global = true)]
    pub code_type: CodeTypeArg,

    /// Write results to a file instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH", global = true)]
    pub output: Option<PathBuf>,

    /// Result and export file format.
    #[arg(long = "format", value_enum, default_value = "json", global = true)]
    pub format: FormatArg,
}

#[derive(Subcommand)]
pub enum Command {
    /// Map a single code.
    Map {
        /// Code to map, e.g. E11, 250.00 or 192127007.
        #[arg(value_name = "CODE")]
        code: String,
    },

    /// Map every code in a file (one per line, blank lines skipped).
    Batch {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Show counts over the loaded index.
    Stats,

    /// Export every code/phenotype pair in the index.
    Export {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print a summary report with categories and example mappings.
    Report,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum CodeTypeArg {
    Auto,
    Icd9,
    Icd10,
    Snomed,
}

impl From<CodeTypeArg> for CodeHint {
    fn from(arg: CodeTypeArg) -> Self {
        match arg {
            CodeTypeArg::Auto => CodeHint::Auto,
            CodeTypeArg::Icd9 => CodeHint::Explicit(CodeKind::Icd9),
            CodeTypeArg::Icd10 => CodeHint::Explicit(CodeKind::Icd10),
            CodeTypeArg::Snomed => CodeHint::Explicit(CodeKind::Snomed),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Json,
    Csv,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Csv => OutputFormat::Csv,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
