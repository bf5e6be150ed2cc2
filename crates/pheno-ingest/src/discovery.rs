//! Phenotype folder discovery.
//!
//! The phenotype library is a directory of folders named
//! `<Phenotype>_birm_cam...`, each holding one CSV per source category:
//! `<folder>_ICD10.csv`, `<folder>_CPRD_AURUM.csv`, `<folder>_CPRD_GOLD.csv`
//! and `<folder>_IMRD.csv`.

use std::path::{Path, PathBuf};

use pheno_model::SourceCategory;

use crate::error::{IngestError, Result};

/// Marker that identifies a phenotype folder.
pub const FOLDER_MARKER: &str = "_birm_cam";

/// A phenotype folder found under the data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhenotypeFolder {
    pub path: PathBuf,
    /// Directory name as found on disk.
    pub folder_name: String,
    /// Phenotype name with the `_birm_cam` suffix removed.
    pub phenotype: String,
}

impl PhenotypeFolder {
    /// Source files present in this folder, in category order.
    pub fn source_files(&self) -> Vec<(SourceCategory, PathBuf)> {
        SourceCategory::ALL
            .into_iter()
            .map(|category| {
                let file = format!("{}_{}.csv", self.folder_name, category.suffix());
                (category, self.path.join(file))
            })
            .filter(|(_, path)| path.is_file())
            .collect()
    }
}

/// Strips the `_birm_cam` marker and anything after it.
pub fn phenotype_name(folder_name: &str) -> &str {
    folder_name
        .find(FOLDER_MARKER)
        .map_or(folder_name, |at| &folder_name[..at])
}

/// Lists phenotype folders under `root`, sorted by folder name.
///
/// Fails when `root` is not a directory; an index must never be built from
/// a silently missing library.
pub fn discover_phenotype_folders(root: &Path) -> Result<Vec<PhenotypeFolder>> {
    if !root.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: root.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(root).map_err(|e| IngestError::DirectoryRead {
        path: root.to_path_buf(),
        source: e,
    })?;

    let mut folders = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: root.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(folder_name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        if !folder_name.contains(FOLDER_MARKER) {
            continue;
        }
        folders.push(PhenotypeFolder {
            phenotype: phenotype_name(folder_name).to_string(),
            folder_name: folder_name.to_string(),
            path: path.clone(),
        });
    }

    folders.sort_by(|a, b| a.folder_name.cmp(&b.folder_name));
    Ok(folders)
}
