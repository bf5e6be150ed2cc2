//! Match results returned by the lookup engine.
//!
//! Field names and value domains are part of the output contract consumed
//! by downstream JSON/CSV readers and must not change.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::code::CodeKind;

/// Which cascade step produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// Code found verbatim in its own index.
    Direct,
    /// ICD-9 code resolved through its ICD-10 equivalent.
    Mapped,
    /// Hierarchical prefix match.
    Partial,
    /// No match.
    None,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Direct => "direct",
            MatchKind::Mapped => "mapped",
            MatchKind::Partial => "partial",
            MatchKind::None => "none",
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of mapping one code to phenotypes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Input code after trimming.
    pub input_code: String,
    /// Canonical form used for lookup.
    pub formatted_code: String,
    /// Coding system the code was resolved to.
    pub detected_type: CodeKind,
    /// Matching phenotype names, sorted and unique.
    pub phenotypes: Vec<String>,
    /// Description of the code that produced the match.
    pub description: String,
    pub match_type: MatchKind,
    /// Fixed reliability score of the match path (0.0 to 1.0).
    pub confidence: f32,
    /// Human-readable lookup path, empty when nothing matched.
    pub mapping_path: String,
    /// True when the ICD-9 to ICD-10 equivalence used is approximate.
    pub approximate_match: bool,
}

impl MatchResult {
    /// Builds an empty `none` result.
    pub fn unmatched(
        input_code: impl Into<String>,
        formatted_code: impl Into<String>,
        detected_type: CodeKind,
    ) -> Self {
        Self {
            input_code: input_code.into(),
            formatted_code: formatted_code.into(),
            detected_type,
            phenotypes: Vec::new(),
            description: String::new(),
            match_type: MatchKind::None,
            confidence: 0.0,
            mapping_path: String::new(),
            approximate_match: false,
        }
    }

    pub fn is_match(&self) -> bool {
        self.match_type != MatchKind::None
    }
}
