//! Integration tests for the matching cascade.

use pheno_map::{EquivalenceBridge, PhenotypeIndexBuilder, PhenotypeMapper};
use pheno_model::{
    CodeHint, CodeKind, EquivalenceRow, MatchKind, PhenotypeGroup, PhenotypeRow, SourceCategory,
};

const DIABETES: &str = "Type2Diabetes_11_3_21";

fn diabetes_group() -> PhenotypeGroup {
    PhenotypeGroup::new(DIABETES).with_source(
        SourceCategory::Icd10,
        vec![PhenotypeRow::coded("E11", "Type 2 diabetes mellitus")],
    )
}

fn adhd_group() -> PhenotypeGroup {
    PhenotypeGroup::new("ADHD_11_3_21")
        .with_source(
            SourceCategory::Icd10,
            vec![PhenotypeRow::coded("F900", "Attention deficit disorder")],
        )
        .with_source(
            SourceCategory::CprdAurum,
            vec![PhenotypeRow {
                medical_code_id: "1958561000006117".to_string(),
                description: "Attention deficit hyperactivity disorder".to_string(),
                snomed_ct_code: "406506008".to_string(),
                ..PhenotypeRow::default()
            }],
        )
}

fn icd9_row(icd10: &str, icd9: &str, approximate: bool) -> EquivalenceRow {
    EquivalenceRow::new(icd10, icd9, approximate)
}

#[test]
fn direct_icd10_scenario() {
    let mapper = PhenotypeMapper::build(&[diabetes_group()], &[]);
    let result = mapper.map_code("E11", CodeHint::Auto);

    assert_eq!(result.match_type, MatchKind::Direct);
    assert_eq!(result.confidence, 1.0);
    assert_eq!(result.phenotypes, vec![DIABETES.to_string()]);
    assert_eq!(result.description, "Type 2 diabetes mellitus");
    assert_eq!(result.detected_type, CodeKind::Icd10);
    assert_eq!(result.mapping_path, "icd10 -> phenotype");
    assert!(!result.approximate_match);
}

#[test]
fn bridged_icd9_scenario() {
    let rows = [icd9_row("E1100", "25000", false)];
    let mapper = PhenotypeMapper::build(&[diabetes_group()], &rows);
    let result = mapper.map_code("250.00", CodeHint::Explicit(CodeKind::Icd9));

    assert_eq!(result.match_type, MatchKind::Mapped);
    assert_eq!(result.confidence, 0.9);
    assert_eq!(result.phenotypes, vec![DIABETES.to_string()]);
    assert_eq!(result.description, "Type 2 diabetes mellitus");
    assert_eq!(result.mapping_path, "icd9 -> icd10 -> phenotype");
    assert!(!result.approximate_match);
}

#[test]
fn approximate_bridge_lowers_confidence() {
    let rows = [icd9_row("E1100", "25000", true)];
    let mapper = PhenotypeMapper::build(&[diabetes_group()], &rows);
    let result = mapper.map_code("25000", CodeHint::Explicit(CodeKind::Icd9));

    assert_eq!(result.formatted_code, "250.00");
    assert_eq!(result.match_type, MatchKind::Mapped);
    assert_eq!(result.confidence, 0.7);
    assert!(result.approximate_match);
}

#[test]
fn explicit_icd9_hint_keeps_v_codes_verbatim() {
    let screening = PhenotypeGroup::new("Screening").with_source(
        SourceCategory::Icd10,
        vec![PhenotypeRow::coded("Z00", "General examination")],
    );
    let rows = [icd9_row("Z0000", "V721", false)];
    let mapper = PhenotypeMapper::build(&[screening], &rows);

    let dotted = mapper.map_code("V72.1", CodeHint::Explicit(CodeKind::Icd9));
    assert_eq!(dotted.detected_type, CodeKind::Icd9);
    assert_eq!(dotted.formatted_code, "V72.1");
    assert_eq!(dotted.match_type, MatchKind::None);

    let bare = mapper.map_code("V721", CodeHint::Explicit(CodeKind::Icd9));
    assert_eq!(bare.formatted_code, "V721");
    assert_eq!(bare.match_type, MatchKind::Mapped);
    assert_eq!(bare.phenotypes, vec!["Screening".to_string()]);
    assert_eq!(bare.description, "General examination");
}

#[test]
fn short_bridge_target_is_looked_up_exactly() {
    let group = PhenotypeGroup::new("Short")
        .with_source(SourceCategory::Icd10, vec![PhenotypeRow::coded("E1", "")]);
    let mut builder = PhenotypeIndexBuilder::new();
    builder.add_group(&group);
    // Index built without propagation so the lookup reaches the bridge.
    let index = builder.build(&EquivalenceBridge::new());
    let bridge = EquivalenceBridge::from_rows(&[icd9_row("E1", "250", false)]);
    let mapper = PhenotypeMapper::new(index, bridge);

    let result = mapper.map_code("250", CodeHint::Explicit(CodeKind::Icd9));
    assert_eq!(result.match_type, MatchKind::Mapped);
    assert_eq!(result.confidence, 0.9);
    assert_eq!(result.phenotypes, vec!["Short".to_string()]);
}

#[test]
fn propagated_icd9_codes_match_directly() {
    let rows = [icd9_row("E11", "250", false)];
    let mapper = PhenotypeMapper::build(&[diabetes_group()], &rows);

    let result = mapper.map_code("250", CodeHint::Auto);
    assert_eq!(result.detected_type, CodeKind::Icd9);
    assert_eq!(result.match_type, MatchKind::Direct);
    assert_eq!(result.confidence, 1.0);
    assert_eq!(result.mapping_path, "icd9 -> phenotype");
    assert_eq!(result.description, "Type 2 diabetes mellitus");
    assert_eq!(mapper.stats().icd9_codes, 1);
}

#[test]
fn partial_match_on_more_specific_code() {
    let mapper = PhenotypeMapper::build(&[diabetes_group()], &[]);
    let result = mapper.map_code("E11.9", CodeHint::Auto);

    assert_eq!(result.formatted_code, "E11.9");
    assert_eq!(result.match_type, MatchKind::Partial);
    assert_eq!(result.confidence, 0.5);
    assert_eq!(result.phenotypes, vec![DIABETES.to_string()]);
    assert_eq!(result.mapping_path, "icd10 -> partial match");
    assert_eq!(result.description, "");
}

#[test]
fn partial_accumulates_across_prefix_lengths() {
    let group = PhenotypeGroup::new("Narrow").with_source(
        SourceCategory::Icd10,
        vec![PhenotypeRow::coded("E112", "")],
    );
    let broad = PhenotypeGroup::new("Broad").with_source(
        SourceCategory::Icd10,
        vec![PhenotypeRow::coded("E10", "")],
    );
    let mapper = PhenotypeMapper::build(&[group, broad], &[]);

    // Base "E11" (len 3): only the length-2 prefix "E1" is scanned.
    let phenotypes = mapper.find_partial("E11.7", CodeKind::Icd10);
    let names: Vec<&str> = phenotypes.iter().map(String::as_str).collect();
    assert_eq!(names, vec!["Broad", "Narrow"]);
}

#[test]
fn two_character_base_never_prefix_scans() {
    let mapper = PhenotypeMapper::build(&[diabetes_group()], &[]);
    assert!(mapper.find_partial("E1", CodeKind::Icd10).is_empty());

    let result = mapper.map_code("E1", CodeHint::Explicit(CodeKind::Icd10));
    assert_eq!(result.match_type, MatchKind::None);
    assert!(result.phenotypes.is_empty());
}

#[test]
fn no_match_is_none() {
    let mapper = PhenotypeMapper::build(&[diabetes_group()], &[]);
    let result = mapper.map_code("J45", CodeHint::Auto);

    assert_eq!(result.match_type, MatchKind::None);
    assert_eq!(result.confidence, 0.0);
    assert!(result.phenotypes.is_empty());
    assert_eq!(result.description, "");
    assert_eq!(result.mapping_path, "");
}

#[test]
fn snomed_codes_match_both_columns() {
    let mapper = PhenotypeMapper::build(&[adhd_group()], &[]);

    let by_concept = mapper.map_code("406506008", CodeHint::Auto);
    assert_eq!(by_concept.detected_type, CodeKind::Snomed);
    assert_eq!(by_concept.match_type, MatchKind::Direct);
    assert_eq!(by_concept.mapping_path, "snomed -> phenotype");

    let by_medcode = mapper.map_code("1958561000006117", CodeHint::Auto);
    assert_eq!(by_medcode.match_type, MatchKind::Direct);
    assert_eq!(
        by_medcode.description,
        "Attention deficit hyperactivity disorder"
    );
}

#[test]
fn lowercase_icd10_needs_explicit_hint() {
    let mapper = PhenotypeMapper::build(&[adhd_group()], &[]);

    let auto = mapper.map_code("f90.0", CodeHint::Auto);
    assert_eq!(auto.detected_type, CodeKind::Unknown);
    assert_eq!(auto.match_type, MatchKind::None);

    let explicit = mapper.map_code("f900", CodeHint::Explicit(CodeKind::Icd10));
    assert_eq!(explicit.formatted_code, "F90.0");
    assert_eq!(explicit.match_type, MatchKind::Direct);
}

#[test]
fn batch_preserves_order_and_count() {
    let mapper = PhenotypeMapper::build(&[diabetes_group()], &[]);
    let codes = ["E11", "", "  ", "E11", "J45", "???"];
    let results = mapper.map_batch(&codes, CodeHint::Auto);

    assert_eq!(results.len(), codes.len());
    assert_eq!(results[0].match_type, MatchKind::Direct);
    assert_eq!(results[1].match_type, MatchKind::None);
    assert_eq!(results[1].detected_type, CodeKind::Unknown);
    assert_eq!(results[2].match_type, MatchKind::None);
    assert_eq!(results[3], results[0]);
    assert_eq!(results[4].match_type, MatchKind::None);
    assert_eq!(results[5].detected_type, CodeKind::Unknown);

    let empty: [&str; 0] = [];
    assert!(mapper.map_batch(&empty, CodeHint::Auto).is_empty());
}

#[test]
fn stats_count_every_index() {
    let rows = [icd9_row("F900", "31400", false)];
    let mapper = PhenotypeMapper::build(&[diabetes_group(), adhd_group()], &rows);
    let stats = mapper.stats();

    assert_eq!(stats.total_phenotypes, 2);
    assert_eq!(stats.icd10_codes, 2);
    assert_eq!(stats.snomed_codes, 2);
    assert_eq!(stats.icd9_codes, 1);
    assert_eq!(
        stats.phenotype_list,
        vec!["ADHD_11_3_21".to_string(), DIABETES.to_string()]
    );
    assert_eq!(mapper.bridge_len(), 1);
}

#[test]
fn export_yields_one_row_per_code_and_phenotype() {
    let other = PhenotypeGroup::new("Diabetes_any")
        .with_source(SourceCategory::Icd10, vec![PhenotypeRow::coded("E11", "")]);
    let mapper = PhenotypeMapper::build(&[diabetes_group(), other], &[]);
    let rows = mapper.export_all_mappings();

    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row.code == "E11"));
    assert!(rows.iter().all(|row| row.code_type == CodeKind::Icd10));
    assert!(
        rows.iter()
            .all(|row| row.description == "Type 2 diabetes mellitus")
    );
    let phenotypes: Vec<&str> = rows.iter().map(|row| row.phenotype.as_str()).collect();
    assert_eq!(phenotypes, vec!["Diabetes_any", DIABETES]);
}

#[test]
fn mapper_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PhenotypeMapper>();

    let mapper = std::sync::Arc::new(PhenotypeMapper::build(&[diabetes_group()], &[]));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let mapper = std::sync::Arc::clone(&mapper);
            std::thread::spawn(move || mapper.map_code("E11", CodeHint::Auto).match_type)
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), MatchKind::Direct);
    }
}
