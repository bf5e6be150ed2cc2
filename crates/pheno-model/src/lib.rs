#![deny(unsafe_code)]

pub mod code;
pub mod error;
pub mod matching;
pub mod source;
pub mod stats;

pub use code::{CodeHint, CodeKind};
pub use error::{ModelError, Result};
pub use matching::{MatchKind, MatchResult};
pub use source::{
    EquivalenceRow, PhenotypeGroup, PhenotypeRow, PhenotypeSource, SourceCategory, SourceWarning,
    parse_flag,
};
pub use stats::{MappingExportRow, PhenotypeStats};
