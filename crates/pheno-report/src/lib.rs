//! Output writers and summary reports for phenotype mapping.

#![deny(unsafe_code)]

pub mod error;
pub mod output;
pub mod summary;

pub use error::{ReportError, Result};
pub use output::{
    LIST_SEPARATOR, OutputFormat, write_mappings, write_mappings_csv, write_mappings_json,
    write_result_json, write_results, write_results_csv, write_results_json,
};
pub use summary::{
    CategorySummary, MAX_LISTED, PROBE_CODES, ProbeMapping, SummaryReport, categorize, stats_table,
};
