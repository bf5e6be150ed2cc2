//! JSON and CSV serialization of match results and index exports.
//!
//! Field names follow the `MatchResult` contract so existing consumers of
//! the JSON/CSV files keep working.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

use serde::Serialize;

use pheno_model::{CodeKind, MappingExportRow, MatchResult};

use crate::error::Result;

/// Separator used for multi-valued CSV cells.
pub const LIST_SEPARATOR: &str = ";";

/// File format for written results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Csv => f.write_str("csv"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("unsupported output format: {other}")),
        }
    }
}

/// Writes one result as pretty JSON.
pub fn write_result_json<W: Write>(mut writer: W, result: &MatchResult) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, result)?;
    writeln!(writer)?;
    Ok(())
}

/// Writes results as a pretty JSON array.
pub fn write_results_json<W: Write>(mut writer: W, results: &[MatchResult]) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, results)?;
    writeln!(writer)?;
    Ok(())
}

/// Writes results as CSV, one row per input code.
pub fn write_results_csv<W: Write>(writer: W, results: &[MatchResult]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record([
        "input_code",
        "formatted_code",
        "detected_type",
        "phenotypes",
        "description",
        "match_type",
        "confidence",
        "mapping_path",
        "approximate_match",
    ])?;
    for result in results {
        csv.write_record([
            result.input_code.as_str(),
            result.formatted_code.as_str(),
            result.detected_type.as_str(),
            &result.phenotypes.join(LIST_SEPARATOR),
            result.description.as_str(),
            result.match_type.as_str(),
            &result.confidence.to_string(),
            result.mapping_path.as_str(),
            if result.approximate_match {
                "true"
            } else {
                "false"
            },
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes results in `format`.
pub fn write_results<W: Write>(writer: W, results: &[MatchResult], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => write_results_json(writer, results),
        OutputFormat::Csv => write_results_csv(writer, results),
    }
}

/// Code -> phenotype names, grouped by coding system.
#[derive(Debug, Default, Serialize)]
struct MappingExport<'a> {
    icd10: BTreeMap<&'a str, Vec<&'a str>>,
    snomed: BTreeMap<&'a str, Vec<&'a str>>,
    icd9: BTreeMap<&'a str, Vec<&'a str>>,
}

/// Writes an index export as `{"icd10": {code: [phenotype, ..]}, ..}`.
pub fn write_mappings_json<W: Write>(mut writer: W, rows: &[MappingExportRow]) -> Result<()> {
    let mut export = MappingExport::default();
    for row in rows {
        let target = match row.code_type {
            CodeKind::Icd10 => &mut export.icd10,
            CodeKind::Snomed => &mut export.snomed,
            CodeKind::Icd9 => &mut export.icd9,
            CodeKind::Unknown => continue,
        };
        target
            .entry(row.code.as_str())
            .or_default()
            .push(row.phenotype.as_str());
    }
    serde_json::to_writer_pretty(&mut writer, &export)?;
    writeln!(writer)?;
    Ok(())
}

/// Writes an index export as CSV with `Code,Code_Type,Phenotype,Description`.
pub fn write_mappings_csv<W: Write>(writer: W, rows: &[MappingExportRow]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["Code", "Code_Type", "Phenotype", "Description"])?;
    for row in rows {
        csv.write_record([
            row.code.as_str(),
            row.code_type.as_str(),
            row.phenotype.as_str(),
            row.description.as_str(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes an index export in `format`.
pub fn write_mappings<W: Write>(
    writer: W,
    rows: &[MappingExportRow],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => write_mappings_json(writer, rows),
        OutputFormat::Csv => write_mappings_csv(writer, rows),
    }
}
