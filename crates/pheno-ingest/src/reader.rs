//! CSV readers for phenotype sources, the GEM file and batch code lists.

use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::de::DeserializeOwned;

use pheno_model::{EquivalenceRow, PhenotypeRow};

use crate::error::{IngestError, Result};

/// Reads a phenotype source CSV (`MEDICAL_CODE_ID`, `DESCRIPTION`, ...).
pub fn read_phenotype_rows(path: &Path) -> Result<Vec<PhenotypeRow>> {
    read_rows(path)
}

/// Reads an ICD-10/ICD-9 general equivalence mapping CSV.
pub fn read_equivalence_rows(path: &Path) -> Result<Vec<EquivalenceRow>> {
    read_rows(path)
}

/// Deserializes every record of a headed CSV file.
///
/// Values and headers are trimmed and a leading BOM on the header row is
/// dropped. Columns absent from the file fall back to the row type's
/// defaults; unknown columns are ignored.
fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)
        .map_err(|e| IngestError::csv(path, e))?;

    let headers: StringRecord = reader
        .headers()
        .map_err(|e| IngestError::csv(path, e))?
        .iter()
        .map(|header| header.trim_matches('\u{feff}').trim())
        .collect();
    reader.set_headers(headers);

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record.map_err(|e| IngestError::csv(path, e))?);
    }
    Ok(rows)
}

/// Reads a batch input file: one code per line, blank lines dropped.
pub fn read_code_list(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
