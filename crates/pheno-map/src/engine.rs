//! Matching engine: resolves a code to phenotypes through a fixed cascade.
//!
//! The cascade tries, in order:
//!
//! 1. **direct**: the formatted code in its own index (confidence 1.0)
//! 2. **mapped**: ICD-9 only, through the equivalence bridge into the ICD-10
//!    index, falling back to the target's ancestors (0.9 exact, 0.7
//!    approximate)
//! 3. **partial**: hierarchical prefix matching (0.5)
//! 4. **none**
//!
//! Query-time failures (blank input, unknown type, no match) are ordinary
//! [`MatchResult`] values, never errors.

use std::collections::BTreeSet;

use tracing::{info, info_span, trace};

use pheno_model::{
    CodeHint, CodeKind, EquivalenceRow, MappingExportRow, MatchKind, MatchResult, PhenotypeGroup,
    PhenotypeStats,
};

use crate::bridge::EquivalenceBridge;
use crate::codes::{ancestors, base_code, detect_type, format_code};
use crate::index::{PhenotypeIndex, PhenotypeIndexBuilder, PhenotypeSet};

pub const DIRECT_CONFIDENCE: f32 = 1.0;
pub const MAPPED_CONFIDENCE: f32 = 0.9;
pub const MAPPED_APPROXIMATE_CONFIDENCE: f32 = 0.7;
pub const PARTIAL_CONFIDENCE: f32 = 0.5;

/// Prefix lengths tried by the partial matcher, longest first.
const PREFIX_LENGTHS: [usize; 3] = [4, 3, 2];

/// Owns the built index and bridge and answers lookups against them.
///
/// Both structures are immutable once the mapper exists, so a mapper can be
/// shared across threads and queried concurrently.
#[derive(Debug, Clone, Default)]
pub struct PhenotypeMapper {
    index: PhenotypeIndex,
    bridge: EquivalenceBridge,
}

impl PhenotypeMapper {
    pub fn new(index: PhenotypeIndex, bridge: EquivalenceBridge) -> Self {
        Self { index, bridge }
    }

    /// Builds the bridge, then the index (which needs the bridge for ICD-9
    /// propagation), from already-loaded source rows.
    pub fn build<'a, G, E>(groups: G, equivalences: E) -> Self
    where
        G: IntoIterator<Item = &'a PhenotypeGroup>,
        E: IntoIterator<Item = &'a EquivalenceRow>,
    {
        let span = info_span!("build_index");
        let _guard = span.enter();

        let bridge = EquivalenceBridge::from_rows(equivalences);
        info!(mappings = bridge.len(), "loaded ICD9-ICD10 equivalences");

        let mut builder = PhenotypeIndexBuilder::new();
        for group in groups {
            builder.add_group(group);
        }
        let index = builder.build(&bridge);
        Self::new(index, bridge)
    }

    pub fn index(&self) -> &PhenotypeIndex {
        &self.index
    }

    /// Number of ICD-9 codes with an ICD-10 equivalent.
    pub fn bridge_len(&self) -> usize {
        self.bridge.len()
    }

    /// Maps one code to phenotypes.
    pub fn map_code(&self, raw: &str, hint: CodeHint) -> MatchResult {
        let input = raw.trim();
        if input.is_empty() {
            return MatchResult::unmatched(input, input, CodeKind::Unknown);
        }

        let kind = match hint {
            CodeHint::Auto => detect_type(input),
            CodeHint::Explicit(kind) => kind,
        };
        if kind == CodeKind::Unknown {
            return MatchResult::unmatched(input, input, CodeKind::Unknown);
        }

        let formatted = format_code(input, kind);
        let mut result = MatchResult::unmatched(input, formatted.as_str(), kind);

        if let Some(phenotypes) = self.index.lookup(kind, &formatted) {
            self.fill(
                &mut result,
                phenotypes,
                &formatted,
                MatchKind::Direct,
                DIRECT_CONFIDENCE,
                format!("{kind} -> phenotype"),
            );
        } else if let Some((icd10, approximate, phenotypes)) = self.bridged(kind, &formatted) {
            let confidence = if approximate {
                MAPPED_APPROXIMATE_CONFIDENCE
            } else {
                MAPPED_CONFIDENCE
            };
            self.fill(
                &mut result,
                phenotypes,
                icd10,
                MatchKind::Mapped,
                confidence,
                "icd9 -> icd10 -> phenotype".to_string(),
            );
            result.approximate_match = approximate;
        } else {
            let partial = self.find_partial(&formatted, kind);
            if !partial.is_empty() {
                self.fill(
                    &mut result,
                    &partial,
                    &formatted,
                    MatchKind::Partial,
                    PARTIAL_CONFIDENCE,
                    format!("{kind} -> partial match"),
                );
            }
        }

        trace!(
            code = %result.formatted_code,
            code_type = %kind,
            match_type = %result.match_type,
            phenotypes = result.phenotypes.len(),
            "mapped code"
        );
        result
    }

    /// Resolves an ICD-9 code through its ICD-10 equivalent. The target is
    /// looked up first, whatever its length, then its ancestors, since GEM
    /// targets are often more specific than the codes phenotype lists are
    /// written against.
    fn bridged(&self, kind: CodeKind, icd9: &str) -> Option<(&str, bool, &PhenotypeSet)> {
        if kind != CodeKind::Icd9 {
            return None;
        }
        let entry = self.bridge.lookup_forward(icd9)?;
        let icd10 = self.index.codes(CodeKind::Icd10)?;
        ancestors(&entry.icd10)
            .into_iter()
            .find_map(|code| icd10.get_entry(code))
            .map(|(code, phenotypes)| (code, entry.approximate, phenotypes))
    }

    fn fill(
        &self,
        result: &mut MatchResult,
        phenotypes: &PhenotypeSet,
        described_code: &str,
        match_type: MatchKind,
        confidence: f32,
        mapping_path: String,
    ) {
        result.phenotypes = phenotypes.iter().cloned().collect();
        result.description = self.index.description(described_code).to_string();
        result.match_type = match_type;
        result.confidence = confidence;
        result.mapping_path = mapping_path;
    }

    /// Hierarchical prefix matching within the `kind` index.
    ///
    /// The code is cut at its first `.`; the base code's own phenotypes are
    /// taken, then every indexed code sharing the first 4, 3 and 2 characters
    /// of the base. A prefix length is only tried when the base is longer than
    /// it. Matches from all lengths are unioned.
    pub fn find_partial(&self, code: &str, kind: CodeKind) -> PhenotypeSet {
        let mut matches = PhenotypeSet::new();
        let Some(codes) = self.index.codes(kind) else {
            return matches;
        };

        let base = base_code(code);
        if let Some(phenotypes) = codes.get(base) {
            matches.extend(phenotypes.iter().cloned());
        }

        let base_len = base.chars().count();
        for length in PREFIX_LENGTHS {
            if base_len <= length {
                continue;
            }
            let prefix = match base.char_indices().nth(length) {
                Some((end, _)) => &base[..end],
                None => base,
            };
            for phenotypes in codes.with_prefix(prefix) {
                matches.extend(phenotypes.iter().cloned());
            }
        }
        matches
    }

    /// Maps every code in order. Output length always equals input length.
    pub fn map_batch<S>(&self, codes: &[S], hint: CodeHint) -> Vec<MatchResult>
    where
        S: AsRef<str>,
    {
        let results: Vec<MatchResult> = codes
            .iter()
            .map(|code| self.map_code(code.as_ref(), hint))
            .collect();
        info!(
            codes = results.len(),
            matched = results.iter().filter(|r| r.is_match()).count(),
            "batch mapped"
        );
        results
    }

    /// Counts over the built index.
    pub fn stats(&self) -> PhenotypeStats {
        let names: BTreeSet<&str> = self.index.phenotype_names();
        let count = |kind| self.index.codes(kind).map_or(0, |codes| codes.len());
        PhenotypeStats {
            total_phenotypes: names.len(),
            icd10_codes: count(CodeKind::Icd10),
            snomed_codes: count(CodeKind::Snomed),
            icd9_codes: count(CodeKind::Icd9),
            phenotype_list: names.into_iter().map(str::to_string).collect(),
        }
    }

    /// One row per code, phenotype and coding system.
    pub fn export_all_mappings(&self) -> Vec<MappingExportRow> {
        let mut rows = Vec::new();
        for kind in CodeKind::INDEXED {
            let Some(codes) = self.index.codes(kind) else {
                continue;
            };
            for (code, phenotypes) in codes.iter() {
                let description = self.index.description(code);
                for phenotype in phenotypes {
                    rows.push(MappingExportRow {
                        code: code.to_string(),
                        code_type: kind,
                        phenotype: phenotype.clone(),
                        description: description.to_string(),
                    });
                }
            }
        }
        rows
    }
}
