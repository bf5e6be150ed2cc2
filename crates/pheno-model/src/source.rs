//! Raw rows consumed by index and bridge construction.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ModelError;

/// Category of a phenotype source file, taken from its filename suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SourceCategory {
    /// Hospital diagnoses coded in ICD-10.
    #[serde(rename = "ICD10")]
    Icd10,
    /// CPRD Aurum primary care extract (SNOMED-bearing).
    #[serde(rename = "CPRD_AURUM")]
    CprdAurum,
    /// CPRD GOLD primary care extract (SNOMED-bearing).
    #[serde(rename = "CPRD_GOLD")]
    CprdGold,
    /// IMRD primary care extract (SNOMED-bearing).
    #[serde(rename = "IMRD")]
    Imrd,
}

impl SourceCategory {
    pub const ALL: [SourceCategory; 4] = [
        SourceCategory::Icd10,
        SourceCategory::CprdAurum,
        SourceCategory::CprdGold,
        SourceCategory::Imrd,
    ];

    /// Filename suffix used by the phenotype library, e.g. `CPRD_AURUM`.
    pub fn suffix(&self) -> &'static str {
        match self {
            SourceCategory::Icd10 => "ICD10",
            SourceCategory::CprdAurum => "CPRD_AURUM",
            SourceCategory::CprdGold => "CPRD_GOLD",
            SourceCategory::Imrd => "IMRD",
        }
    }

    /// True for primary care sources whose codes feed the SNOMED index.
    pub fn is_snomed_bearing(&self) -> bool {
        !matches!(self, SourceCategory::Icd10)
    }
}

impl fmt::Display for SourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl FromStr for SourceCategory {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        SourceCategory::ALL
            .into_iter()
            .find(|category| category.suffix() == normalized)
            .ok_or_else(|| ModelError::UnknownSourceCategory {
                value: s.to_string(),
            })
    }
}

/// One row of a phenotype source CSV.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhenotypeRow {
    #[serde(rename = "MEDICAL_CODE_ID", default)]
    pub medical_code_id: String,
    #[serde(rename = "DESCRIPTION", default)]
    pub description: String,
    #[serde(rename = "READ_CODE", default)]
    pub read_code: String,
    #[serde(rename = "SNOMED_CT_CODE", default)]
    pub snomed_ct_code: String,
    #[serde(rename = "DATABASE", default)]
    pub database: String,
}

impl PhenotypeRow {
    /// Convenience constructor for a row carrying only a code and description.
    pub fn coded(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            medical_code_id: code.into(),
            description: description.into(),
            ..Self::default()
        }
    }
}

/// Rows read from one source file of a phenotype group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhenotypeSource {
    pub category: SourceCategory,
    /// File the rows came from, when read from disk.
    pub path: Option<PathBuf>,
    pub rows: Vec<PhenotypeRow>,
}

impl PhenotypeSource {
    pub fn new(category: SourceCategory, rows: Vec<PhenotypeRow>) -> Self {
        Self {
            category,
            path: None,
            rows,
        }
    }
}

/// All sources that define one phenotype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhenotypeGroup {
    /// Phenotype name, e.g. `Type2Diabetes_11_3_21`.
    pub name: String,
    pub sources: Vec<PhenotypeSource>,
}

impl PhenotypeGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sources: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_source(mut self, category: SourceCategory, rows: Vec<PhenotypeRow>) -> Self {
        self.sources.push(PhenotypeSource::new(category, rows));
        self
    }

    /// Total rows across all sources.
    pub fn row_count(&self) -> usize {
        self.sources.iter().map(|source| source.rows.len()).sum()
    }
}

/// One row of the ICD-10 to ICD-9 general equivalence mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquivalenceRow {
    #[serde(default)]
    pub icd10cm: String,
    #[serde(default)]
    pub icd9cm: String,
    #[serde(default)]
    pub flags: String,
    #[serde(default, deserialize_with = "flag")]
    pub approximate: bool,
    #[serde(default, deserialize_with = "flag")]
    pub no_map: bool,
    #[serde(default, deserialize_with = "flag")]
    pub combination: bool,
    #[serde(default)]
    pub scenario: String,
    #[serde(default)]
    pub choice_list: String,
}

impl EquivalenceRow {
    pub fn new(icd10cm: impl Into<String>, icd9cm: impl Into<String>, approximate: bool) -> Self {
        Self {
            icd10cm: icd10cm.into(),
            icd9cm: icd9cm.into(),
            approximate,
            ..Self::default()
        }
    }
}

/// Reads a GEM flag column. Non-zero integers and `true`/`yes` are set.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(parse_flag(&raw))
}

pub fn parse_flag(raw: &str) -> bool {
    let value = raw.trim();
    if let Ok(number) = value.parse::<i64>() {
        return number != 0;
    }
    value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("yes")
}

/// A source that could not be read and was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceWarning {
    pub path: PathBuf,
    pub message: String,
}

impl fmt::Display for SourceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_values() {
        assert!(parse_flag("1"));
        assert!(parse_flag(" 1 "));
        assert!(parse_flag("true"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
        assert!(!parse_flag("n/a"));
    }

    #[test]
    fn category_round_trip() {
        for category in SourceCategory::ALL {
            assert_eq!(category.suffix().parse::<SourceCategory>(), Ok(category));
        }
        assert!(!SourceCategory::Icd10.is_snomed_bearing());
        assert!(SourceCategory::Imrd.is_snomed_bearing());
    }
}
