//! Subcommand implementations.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, info_span};

use pheno_ingest::{load_equivalence_rows, load_phenotype_sources, paths, read_code_list};
use pheno_map::PhenotypeMapper;
use pheno_model::{CodeHint, MatchResult, PhenotypeStats};
use pheno_report::{
    OutputFormat, SummaryReport, write_mappings, write_result_json, write_results,
    write_results_csv,
};

/// Source locations; `None` falls back to the environment, then defaults.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub data_dir: Option<PathBuf>,
    pub mapping_file: Option<PathBuf>,
}

/// Loads the phenotype library and GEM file and builds the mapper.
///
/// Unreadable source files and a missing GEM file are logged and skipped.
/// A missing data directory is fatal.
pub fn load_mapper(options: &LoadOptions) -> Result<PhenotypeMapper> {
    let data_dir = paths::data_dir(options.data_dir.as_deref());
    let gem_file = paths::gem_file(options.mapping_file.as_deref());
    let span = info_span!("load_mapper", data_dir = %data_dir.display());
    let _guard = span.enter();

    let sources = load_phenotype_sources(&data_dir)
        .with_context(|| format!("load phenotype library from {}", data_dir.display()))?;
    let equivalences = load_equivalence_rows(&gem_file);
    let mapper = PhenotypeMapper::build(&sources.groups, &equivalences.rows);

    info!(
        phenotypes = sources.groups.len(),
        skipped_files = sources.warnings.len() + equivalences.warnings.len(),
        bridge = mapper.bridge_len(),
        "mapper ready"
    );
    Ok(mapper)
}

/// Opens `output` for writing, or stdout when `None`.
fn open_output(output: Option<&Path>) -> Result<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("create output file {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

pub fn run_map(
    mapper: &PhenotypeMapper,
    code: &str,
    hint: CodeHint,
    output: Option<&Path>,
    format: OutputFormat,
) -> Result<MatchResult> {
    let result = mapper.map_code(code, hint);
    let mut writer = open_output(output)?;
    let written = match format {
        OutputFormat::Json => write_result_json(&mut writer, &result),
        OutputFormat::Csv => write_results_csv(&mut writer, std::slice::from_ref(&result)),
    };
    written.context("write result")?;
    writer.flush().context("flush output")?;
    Ok(result)
}

/// Maps every non-blank line of `file`.
pub fn run_batch(
    mapper: &PhenotypeMapper,
    file: &Path,
    hint: CodeHint,
    output: Option<&Path>,
    format: OutputFormat,
) -> Result<Vec<MatchResult>> {
    let codes = read_code_list(file)
        .with_context(|| format!("read batch file {}", file.display()))?;
    let results = mapper.map_batch(&codes, hint);
    let mut writer = open_output(output)?;
    write_results(&mut writer, &results, format).context("write results")?;
    writer.flush().context("flush output")?;
    Ok(results)
}

pub fn run_stats(mapper: &PhenotypeMapper) -> PhenotypeStats {
    mapper.stats()
}

/// Writes the full index to `file`; returns the number of rows written.
pub fn run_export(mapper: &PhenotypeMapper, file: &Path, format: OutputFormat) -> Result<usize> {
    let rows = mapper.export_all_mappings();
    let mut writer = open_output(Some(file))?;
    write_mappings(&mut writer, &rows, format)
        .with_context(|| format!("export mappings to {}", file.display()))?;
    writer.flush().context("flush export")?;
    info!(rows = rows.len(), path = %file.display(), "mappings exported");
    Ok(rows.len())
}

pub fn run_report(mapper: &PhenotypeMapper, output: Option<&Path>) -> Result<SummaryReport> {
    let report = SummaryReport::build(mapper);
    let mut writer = open_output(output)?;
    writer
        .write_all(report.render().as_bytes())
        .context("write report")?;
    writer.flush().context("flush report")?;
    Ok(report)
}
