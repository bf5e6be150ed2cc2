//! ICD-9 <-> ICD-10 general equivalence bridge.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use pheno_model::{CodeKind, EquivalenceRow};

use crate::codes::format_code;

/// Forward target of an ICD-9 code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeEntry {
    pub icd10: String,
    /// True when the GEM flags the pair as an approximate equivalence.
    pub approximate: bool,
}

/// Bidirectional ICD-9/ICD-10 lookup built from GEM rows.
///
/// Each ICD-9 code keeps the first ICD-10 target seen for it. The reverse
/// map keeps every ICD-9 code that pointed at a given ICD-10 code.
#[derive(Debug, Clone, Default)]
pub struct EquivalenceBridge {
    forward: BTreeMap<String, BridgeEntry>,
    reverse: BTreeMap<String, BTreeSet<String>>,
}

impl EquivalenceBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the bridge from rows in file order.
    ///
    /// Rows flagged `no_map` or with a blank code on either side are skipped.
    pub fn from_rows<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a EquivalenceRow>,
    {
        let mut bridge = Self::new();
        let mut skipped = 0usize;
        let mut duplicates = 0usize;
        for row in rows {
            let icd9 = row.icd9cm.trim();
            let icd10 = row.icd10cm.trim();
            if row.no_map || icd9.is_empty() || icd10.is_empty() {
                skipped += 1;
                continue;
            }
            let icd9 = format_code(icd9, CodeKind::Icd9);
            let icd10 = format_code(icd10, CodeKind::Icd10);
            if !bridge.insert(icd9, icd10, row.approximate) {
                duplicates += 1;
            }
        }
        debug!(
            forward = bridge.forward.len(),
            reverse = bridge.reverse.len(),
            skipped,
            duplicates,
            "equivalence bridge built"
        );
        bridge
    }

    /// Records one pair. Returns false when the ICD-9 code already had a
    /// forward target, which is kept.
    fn insert(&mut self, icd9: String, icd10: String, approximate: bool) -> bool {
        self.reverse
            .entry(icd10.clone())
            .or_default()
            .insert(icd9.clone());
        match self.forward.entry(icd9) {
            Entry::Vacant(slot) => {
                slot.insert(BridgeEntry { icd10, approximate });
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    pub fn lookup_forward(&self, icd9: &str) -> Option<&BridgeEntry> {
        self.forward.get(icd9)
    }

    /// ICD-9 codes that map onto `icd10`; empty when none do.
    pub fn lookup_reverse(&self, icd10: &str) -> BTreeSet<String> {
        self.reverse.get(icd10).cloned().unwrap_or_default()
    }

    /// Iterates forward entries in ICD-9 order.
    pub fn forward_entries(&self) -> impl Iterator<Item = (&str, &BridgeEntry)> {
        self.forward
            .iter()
            .map(|(icd9, entry)| (icd9.as_str(), entry))
    }

    /// Number of ICD-9 codes with a forward target.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}
