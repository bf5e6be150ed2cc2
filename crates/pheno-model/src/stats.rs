use serde::{Deserialize, Serialize};

use crate::code::CodeKind;

/// Summary counts over a built phenotype index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhenotypeStats {
    /// Distinct phenotype names across all coding systems.
    pub total_phenotypes: usize,
    pub icd10_codes: usize,
    pub snomed_codes: usize,
    /// ICD-9 codes that received phenotypes through the equivalence bridge.
    pub icd9_codes: usize,
    /// Sorted phenotype names.
    pub phenotype_list: Vec<String>,
}

/// One code/phenotype pair from a full index export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingExportRow {
    pub code: String,
    pub code_type: CodeKind,
    pub phenotype: String,
    pub description: String,
}
