//! Human-readable summary of a built phenotype index.

use chrono::{DateTime, Utc};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use pheno_map::PhenotypeMapper;
use pheno_model::{CodeHint, MatchResult, PhenotypeStats};

/// Phenotypes listed per category before the rest are elided.
pub const MAX_LISTED: usize = 10;

/// Codes mapped in the example section, with what they are expected to hit.
pub const PROBE_CODES: [(&str, &str); 5] = [
    ("E11", "Type 2 Diabetes (ICD10)"),
    ("I48", "Atrial Fibrillation (ICD10)"),
    ("F90.0", "ADHD (ICD10)"),
    ("192127007", "ADHD (SNOMED)"),
    ("250", "Diabetes (ICD9 via ICD10)"),
];

/// Category name and the keywords that place a phenotype in it. Categories
/// are tried in order and the first hit wins.
const CATEGORIES: [(&str, &[&str]); 5] = [
    (
        "Mental Health",
        &[
            "anxiety",
            "depression",
            "bipolar",
            "adhd",
            "autism",
            "ptsd",
            "psychosis",
            "eating",
        ],
    ),
    (
        "Cardiovascular",
        &[
            "cardiac",
            "heart",
            "hypertension",
            "arrhythmia",
            "af_",
            "ihd",
            "mi",
            "aneurysm",
        ],
    ),
    ("Diabetes/Endocrine", &["diabetes", "thyroid", "addison"]),
    (
        "Cancer",
        &[
            "cancer",
            "ca_",
            "metastatic",
            "breast",
            "lung",
            "colon",
            "prostate",
            "skin",
        ],
    ),
    (
        "Neurological",
        &[
            "alzheimer",
            "dementia",
            "parkinson",
            "ms_",
            "epilepsy",
            "migraine",
        ],
    ),
];

pub const OTHER_CATEGORY: &str = "Other";

/// Short keywords without a separator only match whole `_`-delimited name
/// parts, so "mi" does not claim "Migraine".
fn matches_keyword(name: &str, keyword: &str) -> bool {
    if keyword.len() <= 3 && !keyword.contains('_') {
        name.split('_').any(|part| part == keyword)
    } else {
        name.contains(keyword)
    }
}

/// Category a phenotype name falls into.
pub fn categorize(phenotype: &str) -> &'static str {
    let name = phenotype.to_lowercase();
    CATEGORIES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| matches_keyword(&name, keyword)))
        .map_or(OTHER_CATEGORY, |(category, _)| *category)
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    pub name: &'static str,
    pub phenotypes: Vec<String>,
}

impl CategorySummary {
    pub fn listed(&self) -> &[String] {
        &self.phenotypes[..self.phenotypes.len().min(MAX_LISTED)]
    }

    pub fn elided(&self) -> usize {
        self.phenotypes.len().saturating_sub(MAX_LISTED)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeMapping {
    pub code: &'static str,
    pub label: &'static str,
    pub result: MatchResult,
}

/// Snapshot of index statistics, categories and probe mappings.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryReport {
    pub generated_at: DateTime<Utc>,
    pub stats: PhenotypeStats,
    pub bridge_mappings: usize,
    /// Non-empty categories in display order.
    pub categories: Vec<CategorySummary>,
    pub probes: Vec<ProbeMapping>,
}

impl SummaryReport {
    pub fn build(mapper: &PhenotypeMapper) -> Self {
        Self::build_at(mapper, Utc::now())
    }

    pub fn build_at(mapper: &PhenotypeMapper, generated_at: DateTime<Utc>) -> Self {
        let stats = mapper.stats();

        let mut categories: Vec<CategorySummary> = CATEGORIES
            .iter()
            .map(|(name, _)| *name)
            .chain([OTHER_CATEGORY])
            .map(|name| CategorySummary {
                name,
                phenotypes: Vec::new(),
            })
            .collect();
        for phenotype in &stats.phenotype_list {
            let category = categorize(phenotype);
            if let Some(summary) = categories.iter_mut().find(|c| c.name == category) {
                summary.phenotypes.push(phenotype.clone());
            }
        }
        categories.retain(|category| !category.phenotypes.is_empty());

        let probes = PROBE_CODES
            .iter()
            .map(|&(code, label)| ProbeMapping {
                code,
                label,
                result: mapper.map_code(code, CodeHint::Auto),
            })
            .collect();

        Self {
            generated_at,
            stats,
            bridge_mappings: mapper.bridge_len(),
            categories,
            probes,
        }
    }

    /// Renders the report as plain text with tables.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Phenotype mapping report ({})\n\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        out.push_str(&self.stats_table().to_string());
        out.push_str("\n\nPhenotype categories\n");
        out.push_str(&self.render_categories());
        out.push_str("\nExample mappings\n");
        out.push_str(&self.probe_table().to_string());
        out.push('\n');
        out
    }

    pub fn stats_table(&self) -> Table {
        stats_table(&self.stats, self.bridge_mappings)
    }

    /// Category listing, one indented phenotype per line.
    pub fn render_categories(&self) -> String {
        let mut out = String::new();
        for category in &self.categories {
            out.push_str(&format!(
                "{} ({} conditions):\n",
                category.name,
                category.phenotypes.len()
            ));
            for phenotype in category.listed() {
                out.push_str(&format!("  - {phenotype}\n"));
            }
            if category.elided() > 0 {
                out.push_str(&format!("  ... and {} more\n", category.elided()));
            }
        }
        out
    }

    pub fn probe_table(&self) -> Table {
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Code"),
            header_cell("Expected"),
            header_cell("Phenotypes"),
            header_cell("Match"),
            header_cell("Confidence"),
            header_cell("Path"),
        ]);
        apply_table_style(&mut table);
        align_column(&mut table, 4, CellAlignment::Right);
        for probe in &self.probes {
            let phenotypes = if probe.result.phenotypes.is_empty() {
                Cell::new("No mapping found").fg(Color::DarkGrey)
            } else {
                Cell::new(probe.result.phenotypes.join(", "))
            };
            table.add_row(vec![
                Cell::new(probe.code).fg(Color::Blue),
                Cell::new(probe.label),
                phenotypes,
                Cell::new(probe.result.match_type),
                Cell::new(format!("{:.1}", probe.result.confidence)),
                Cell::new(&probe.result.mapping_path),
            ]);
        }
        table
    }
}

/// Index counts as a two-column table.
pub fn stats_table(stats: &PhenotypeStats, bridge_mappings: usize) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Index"), header_cell("Entries")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let rows = [
        ("Phenotype categories", stats.total_phenotypes),
        ("ICD10 codes indexed", stats.icd10_codes),
        ("SNOMED codes indexed", stats.snomed_codes),
        ("ICD9 codes with mappings", stats.icd9_codes),
        ("ICD9-ICD10 equivalences", bridge_mappings),
    ];
    for (label, count) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(count)]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
