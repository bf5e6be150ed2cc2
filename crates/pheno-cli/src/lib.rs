//! CLI library components for the phenotype mapper.

pub mod commands;
pub mod logging;
pub mod summary;
