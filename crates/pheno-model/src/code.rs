//! Coding systems and type hints.
//!
//! Every lookup is threaded through an explicit [`CodeKind`]. Callers that do
//! not know the coding system pass [`CodeHint::Auto`] and let the detector
//! resolve it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Clinical coding system of a diagnosis code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeKind {
    /// ICD-9-CM.
    Icd9,
    /// ICD-10 / ICD-10-CM.
    Icd10,
    /// SNOMED CT concept identifier.
    Snomed,
    /// Could not be classified.
    Unknown,
}

impl CodeKind {
    /// Coding systems that carry a phenotype index, in export order.
    pub const INDEXED: [CodeKind; 3] = [CodeKind::Icd10, CodeKind::Snomed, CodeKind::Icd9];

    /// Returns the canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeKind::Icd9 => "icd9",
            CodeKind::Icd10 => "icd10",
            CodeKind::Snomed => "snomed",
            CodeKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodeKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "icd9" | "icd-9" | "icd9cm" => Ok(CodeKind::Icd9),
            "icd10" | "icd-10" | "icd10cm" => Ok(CodeKind::Icd10),
            "snomed" | "snomed_ct" | "snomedct" => Ok(CodeKind::Snomed),
            "unknown" => Ok(CodeKind::Unknown),
            _ => Err(ModelError::UnknownCodeType {
                value: s.to_string(),
            }),
        }
    }
}

/// How the caller wants a code's type resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CodeHint {
    /// Detect the coding system from the code's shape.
    #[default]
    Auto,
    /// Treat the code as belonging to the given system.
    Explicit(CodeKind),
}

impl From<CodeKind> for CodeHint {
    fn from(kind: CodeKind) -> Self {
        CodeHint::Explicit(kind)
    }
}

impl fmt::Display for CodeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeHint::Auto => f.write_str("auto"),
            CodeHint::Explicit(kind) => kind.fmt(f),
        }
    }
}

impl FromStr for CodeHint {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            return Ok(CodeHint::Auto);
        }
        s.parse::<CodeKind>().map(CodeHint::Explicit)
    }
}
