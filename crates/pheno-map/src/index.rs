//! Code to phenotype index.
//!
//! The index holds one map per coding system from canonical code to the set
//! of phenotype names that include it, plus a shared code description map.
//! It is assembled by [`PhenotypeIndexBuilder`] and read-only afterwards.
//!
//! Insertion is set union, so the phenotype content of a built index does
//! not depend on the order groups or rows were added in.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use pheno_model::{CodeKind, PhenotypeGroup, PhenotypeRow, SourceCategory};

use crate::bridge::EquivalenceBridge;
use crate::codes::format_code;

/// Phenotype names attached to one code.
pub type PhenotypeSet = BTreeSet<String>;

/// Canonical code -> phenotype names for a single coding system.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeIndex {
    codes: BTreeMap<String, PhenotypeSet>,
}

impl CodeIndex {
    /// Adds `phenotype` to `code`. Repeated insertions are no-ops.
    fn insert(&mut self, code: &str, phenotype: &str) {
        if code.is_empty() {
            return;
        }
        let entry = self.codes.entry(code.to_string()).or_default();
        if !entry.contains(phenotype) {
            entry.insert(phenotype.to_string());
        }
    }

    fn extend(&mut self, code: &str, phenotypes: &PhenotypeSet) {
        self.codes
            .entry(code.to_string())
            .or_default()
            .extend(phenotypes.iter().cloned());
    }

    pub fn get(&self, code: &str) -> Option<&PhenotypeSet> {
        self.codes.get(code).filter(|set| !set.is_empty())
    }

    /// Like [`Self::get`], also returning the stored key.
    pub fn get_entry(&self, code: &str) -> Option<(&str, &PhenotypeSet)> {
        self.codes
            .get_key_value(code)
            .filter(|(_, set)| !set.is_empty())
            .map(|(key, set)| (key.as_str(), set))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Phenotype sets of every code starting with `prefix`.
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a PhenotypeSet> {
        self.codes
            .range::<str, _>((std::ops::Bound::Included(prefix), std::ops::Bound::Unbounded))
            .take_while(move |(code, _)| code.starts_with(prefix))
            .map(|(_, set)| set)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PhenotypeSet)> {
        self.codes.iter().map(|(code, set)| (code.as_str(), set))
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Immutable multi-system phenotype index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhenotypeIndex {
    icd9: CodeIndex,
    icd10: CodeIndex,
    snomed: CodeIndex,
    descriptions: BTreeMap<String, String>,
}

impl PhenotypeIndex {
    /// Index for a coding system; `None` for [`CodeKind::Unknown`].
    pub fn codes(&self, kind: CodeKind) -> Option<&CodeIndex> {
        match kind {
            CodeKind::Icd9 => Some(&self.icd9),
            CodeKind::Icd10 => Some(&self.icd10),
            CodeKind::Snomed => Some(&self.snomed),
            CodeKind::Unknown => None,
        }
    }

    /// Phenotypes recorded for `code` in the `kind` index.
    pub fn lookup(&self, kind: CodeKind, code: &str) -> Option<&PhenotypeSet> {
        self.codes(kind).and_then(|index| index.get(code))
    }

    /// Description last recorded for `code`, or an empty string.
    pub fn description(&self, code: &str) -> &str {
        self.descriptions.get(code).map_or("", String::as_str)
    }

    /// Every distinct phenotype name across all coding systems.
    pub fn phenotype_names(&self) -> BTreeSet<&str> {
        CodeKind::INDEXED
            .into_iter()
            .filter_map(|kind| self.codes(kind))
            .flat_map(|index| index.codes.values())
            .flat_map(|set| set.iter().map(String::as_str))
            .collect()
    }
}

/// Accumulates phenotype groups into a [`PhenotypeIndex`].
#[derive(Debug, Default)]
pub struct PhenotypeIndexBuilder {
    index: PhenotypeIndex,
    groups: usize,
}

impl PhenotypeIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every row of every source in `group` under the group name.
    pub fn add_group(&mut self, group: &PhenotypeGroup) -> &mut Self {
        for source in &group.sources {
            for row in &source.rows {
                self.add_row(&group.name, source.category, row);
            }
        }
        self.groups += 1;
        debug!(
            phenotype = %group.name,
            sources = group.sources.len(),
            rows = group.row_count(),
            "indexed phenotype group"
        );
        self
    }

    /// Registers one source row.
    ///
    /// ICD10 rows feed the icd10 index with a formatted code. SNOMED-bearing
    /// rows feed the snomed index with `MEDICAL_CODE_ID` and, independently,
    /// with `SNOMED_CT_CODE` when present.
    pub fn add_row(&mut self, phenotype: &str, category: SourceCategory, row: &PhenotypeRow) {
        let description = row.description.trim();
        if category.is_snomed_bearing() {
            for raw in [&row.medical_code_id, &row.snomed_ct_code] {
                let code = format_code(raw, CodeKind::Snomed);
                if code.is_empty() {
                    continue;
                }
                self.index.snomed.insert(&code, phenotype);
                self.record_description(code, description);
            }
        } else {
            let code = format_code(&row.medical_code_id, CodeKind::Icd10);
            if code.is_empty() {
                return;
            }
            self.index.icd10.insert(&code, phenotype);
            self.record_description(code, description);
        }
    }

    fn record_description(&mut self, code: String, description: &str) {
        if !description.is_empty() {
            self.index
                .descriptions
                .insert(code, description.to_string());
        }
    }

    /// Finishes construction, propagating ICD-10 phenotypes onto the ICD-9
    /// codes that bridge to them.
    pub fn build(mut self, bridge: &EquivalenceBridge) -> PhenotypeIndex {
        let propagated = self.propagate(bridge);
        info!(
            groups = self.groups,
            icd10_codes = self.index.icd10.len(),
            snomed_codes = self.index.snomed.len(),
            icd9_codes = self.index.icd9.len(),
            propagated,
            "phenotype index built"
        );
        self.index
    }

    fn propagate(&mut self, bridge: &EquivalenceBridge) -> usize {
        let mut propagated = 0usize;
        for (icd9, entry) in bridge.forward_entries() {
            let Some(phenotypes) = self.index.icd10.get(&entry.icd10) else {
                continue;
            };
            self.index.icd9.extend(icd9, phenotypes);
            propagated += 1;
            if !self.index.descriptions.contains_key(icd9)
                && let Some(description) = self.index.descriptions.get(&entry.icd10).cloned()
            {
                self.index
                    .descriptions
                    .insert(icd9.to_string(), description);
            }
        }
        propagated
    }
}
