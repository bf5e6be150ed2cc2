//! Default locations of the phenotype library and GEM file.

use std::path::{Path, PathBuf};

/// Environment variable overriding the phenotype data directory.
pub const DATA_DIR_ENV_VAR: &str = "PHENOMAP_DATA_DIR";

/// Environment variable overriding the ICD-10/ICD-9 GEM file.
pub const GEM_FILE_ENV_VAR: &str = "PHENOMAP_GEM_FILE";

pub const DEFAULT_DATA_DIR: &str = "Medical conditions";

pub const DEFAULT_GEM_FILE: &str = "icd10toicd9gem.csv";

/// Resolves the phenotype data directory.
///
/// Resolution order:
/// 1. explicit path (CLI flag)
/// 2. `PHENOMAP_DATA_DIR` environment variable
/// 3. `Medical conditions` in the working directory
pub fn data_dir(explicit: Option<&Path>) -> PathBuf {
    resolve(explicit, std::env::var(DATA_DIR_ENV_VAR).ok(), DEFAULT_DATA_DIR)
}

/// Resolves the GEM equivalence file, same precedence as [`data_dir`].
pub fn gem_file(explicit: Option<&Path>) -> PathBuf {
    resolve(explicit, std::env::var(GEM_FILE_ENV_VAR).ok(), DEFAULT_GEM_FILE)
}

/// Explicit path, then a non-blank environment value, then `default`.
fn resolve(explicit: Option<&Path>, env_value: Option<String>, default: &str) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    match env_value {
        Some(value) if !value.trim().is_empty() => PathBuf::from(value),
        _ => PathBuf::from(default),
    }
}
