//! Phenotype library ingestion: folder discovery and CSV loading.

#![deny(unsafe_code)]

pub mod discovery;
pub mod error;
pub mod load;
pub mod paths;
pub mod reader;

pub use discovery::{FOLDER_MARKER, PhenotypeFolder, discover_phenotype_folders, phenotype_name};
pub use error::{IngestError, Result};
pub use load::{EquivalenceLoad, SourceLoad, load_equivalence_rows, load_phenotype_sources};
pub use reader::{read_code_list, read_equivalence_rows, read_phenotype_rows};
