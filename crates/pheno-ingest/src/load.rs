//! Loading of whole source sets with per-file recovery.
//!
//! A source that cannot be read becomes a [`SourceWarning`] and is skipped;
//! only a missing data directory aborts loading.

use std::path::Path;

use tracing::{debug, info, info_span, warn};

use pheno_model::{EquivalenceRow, PhenotypeGroup, PhenotypeSource, SourceWarning};

use crate::discovery::discover_phenotype_folders;
use crate::error::Result;
use crate::reader::{read_equivalence_rows, read_phenotype_rows};

/// Phenotype groups read from a data directory.
#[derive(Debug, Clone, Default)]
pub struct SourceLoad {
    pub groups: Vec<PhenotypeGroup>,
    pub warnings: Vec<SourceWarning>,
}

impl SourceLoad {
    pub fn file_count(&self) -> usize {
        self.groups.iter().map(|group| group.sources.len()).sum()
    }
}

/// Equivalence rows read from a GEM file.
#[derive(Debug, Clone, Default)]
pub struct EquivalenceLoad {
    pub rows: Vec<EquivalenceRow>,
    pub warnings: Vec<SourceWarning>,
}

/// Reads every phenotype folder under `root`.
///
/// # Errors
///
/// Returns an error if `root` is missing or cannot be listed.
pub fn load_phenotype_sources(root: &Path) -> Result<SourceLoad> {
    let span = info_span!("load_sources", root = %root.display());
    let _guard = span.enter();

    let folders = discover_phenotype_folders(root)?;
    let mut load = SourceLoad::default();

    for folder in folders {
        let mut group = PhenotypeGroup::new(folder.phenotype.as_str());
        for (category, path) in folder.source_files() {
            match read_phenotype_rows(&path) {
                Ok(rows) => {
                    debug!(
                        phenotype = %group.name,
                        category = %category,
                        rows = rows.len(),
                        "read phenotype source"
                    );
                    group.sources.push(PhenotypeSource {
                        category,
                        path: Some(path),
                        rows,
                    });
                }
                Err(error) => {
                    warn!(path = %path.display(), %error, "skipping unreadable phenotype source");
                    load.warnings.push(SourceWarning {
                        path,
                        message: error.to_string(),
                    });
                }
            }
        }
        load.groups.push(group);
    }

    info!(
        phenotypes = load.groups.len(),
        files = load.file_count(),
        skipped = load.warnings.len(),
        "phenotype sources loaded"
    );
    Ok(load)
}

/// Reads the GEM file at `path`.
///
/// A missing or unreadable file yields an empty row set and a warning, so
/// the index can still be built without ICD-9 support.
pub fn load_equivalence_rows(path: &Path) -> EquivalenceLoad {
    match read_equivalence_rows(path) {
        Ok(rows) => {
            info!(path = %path.display(), rows = rows.len(), "equivalence rows loaded");
            EquivalenceLoad {
                rows,
                warnings: Vec::new(),
            }
        }
        Err(error) => {
            warn!(path = %path.display(), %error, "ICD9-ICD10 mapping unavailable");
            EquivalenceLoad {
                rows: Vec::new(),
                warnings: vec![SourceWarning {
                    path: path.to_path_buf(),
                    message: error.to_string(),
                }],
            }
        }
    }
}
