//! Clinical code to phenotype mapping engine.
//!
//! Builds a unified code -> phenotype index from phenotype source rows,
//! bridges ICD-9 to ICD-10 through general equivalence mappings, and resolves
//! query codes with a confidence-ranked cascade (direct, mapped, partial).
//!
//! ```ignore
//! use pheno_map::PhenotypeMapper;
//! use pheno_model::CodeHint;
//!
//! let mapper = PhenotypeMapper::build(&groups, &equivalences);
//! let result = mapper.map_code("E11", CodeHint::Auto);
//! ```

#![deny(unsafe_code)]

pub mod bridge;
pub mod codes;
pub mod engine;
pub mod index;

pub use bridge::{BridgeEntry, EquivalenceBridge};
pub use codes::{ancestors, base_code, detect_type, format_code};
pub use engine::{
    DIRECT_CONFIDENCE, MAPPED_APPROXIMATE_CONFIDENCE, MAPPED_CONFIDENCE, PARTIAL_CONFIDENCE,
    PhenotypeMapper,
};
pub use index::{CodeIndex, PhenotypeIndex, PhenotypeIndexBuilder, PhenotypeSet};
