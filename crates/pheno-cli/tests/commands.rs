//! End-to-end tests for the subcommands against a temporary library.

use std::fs;
use std::path::Path;

use pheno_cli::commands::{LoadOptions, load_mapper, run_batch, run_export, run_map, run_report};
use pheno_model::{CodeHint, CodeKind, MatchKind};
use pheno_report::OutputFormat;

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(path, contents).expect("write file");
}

fn options(root: &Path) -> LoadOptions {
    let data_dir = root.join("Medical conditions");
    write(
        &data_dir
            .join("Type2Diabetes_11_3_21_birm_cam")
            .join("Type2Diabetes_11_3_21_birm_cam_ICD10.csv"),
        "MEDICAL_CODE_ID,DESCRIPTION\nE11,Type 2 diabetes mellitus\n",
    );
    write(
        &data_dir
            .join("ADHD_11_3_21_birm_cam")
            .join("ADHD_11_3_21_birm_cam_CPRD_GOLD.csv"),
        "MEDICAL_CODE_ID,DESCRIPTION,SNOMED_CT_CODE\n\
         12345678,Attention deficit disorder,192127007\n",
    );
    let gem = root.join("icd10toicd9gem.csv");
    write(
        &gem,
        "icd10cm,icd9cm,flags,approximate,no_map,combination,scenario,choice_list\n\
         E1100,25000,00000,0,0,0,0,0\n",
    );
    LoadOptions {
        data_dir: Some(data_dir),
        mapping_file: Some(gem),
    }
}

#[test]
fn loads_library_and_bridge() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mapper = load_mapper(&options(dir.path())).expect("load mapper");

    assert_eq!(mapper.stats().total_phenotypes, 2);
    assert_eq!(mapper.bridge_len(), 1);

    let result = mapper.map_code("25000", CodeHint::Explicit(CodeKind::Icd9));
    assert_eq!(result.match_type, MatchKind::Mapped);
    assert_eq!(result.phenotypes, vec!["Type2Diabetes_11_3_21".to_string()]);
}

#[test]
fn missing_data_directory_fails() {
    let dir = tempfile::tempdir().expect("temp dir");
    let options = LoadOptions {
        data_dir: Some(dir.path().join("absent")),
        mapping_file: Some(dir.path().join("absent.csv")),
    };
    let error = load_mapper(&options).unwrap_err();
    assert!(format!("{error:#}").contains("absent"));
}

#[test]
fn missing_gem_file_still_builds() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut options = options(dir.path());
    options.mapping_file = Some(dir.path().join("missing-gem.csv"));

    let mapper = load_mapper(&options).expect("load mapper");
    assert_eq!(mapper.bridge_len(), 0);
    assert_eq!(
        mapper.map_code("192127007", CodeHint::Auto).match_type,
        MatchKind::Direct
    );
}

#[test]
fn map_writes_json_to_output_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mapper = load_mapper(&options(dir.path())).expect("load mapper");
    let output = dir.path().join("result.json");

    let result = run_map(&mapper, "E11", CodeHint::Auto, Some(&output), OutputFormat::Json)
        .expect("map");
    assert_eq!(result.match_type, MatchKind::Direct);

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).expect("read output")).expect("json");
    assert_eq!(value["formatted_code"], "E11");
    assert_eq!(value["mapping_path"], "icd10 -> phenotype");
}

#[test]
fn batch_writes_csv_in_input_order() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mapper = load_mapper(&options(dir.path())).expect("load mapper");
    let codes = dir.path().join("codes.txt");
    write(&codes, "E11\n\n250.00\nJ45\n");
    let output = dir.path().join("results.csv");

    let results = run_batch(
        &mapper,
        &codes,
        CodeHint::Auto,
        Some(&output),
        OutputFormat::Csv,
    )
    .expect("batch");
    assert_eq!(results.len(), 3);

    let text = fs::read_to_string(&output).expect("read output");
    let first_columns: Vec<&str> = text
        .lines()
        .skip(1)
        .map(|line| line.split(',').next().unwrap_or_default())
        .collect();
    assert_eq!(first_columns, vec!["E11", "250.00", "J45"]);
}

#[test]
fn batch_file_missing_is_fatal() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mapper = load_mapper(&options(dir.path())).expect("load mapper");
    let output = dir.path().join("results.json");

    let error = run_batch(
        &mapper,
        &dir.path().join("nope.txt"),
        CodeHint::Auto,
        Some(&output),
        OutputFormat::Json,
    )
    .unwrap_err();
    assert!(format!("{error:#}").contains("nope.txt"));
    assert!(!output.exists());
}

#[test]
fn export_and_report_write_files() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mapper = load_mapper(&options(dir.path())).expect("load mapper");

    let export = dir.path().join("all_mappings.csv");
    let rows = run_export(&mapper, &export, OutputFormat::Csv).expect("export");
    let text = fs::read_to_string(&export).expect("read export");
    assert_eq!(text.lines().count(), rows + 1);
    assert!(text.contains("192127007,snomed,ADHD_11_3_21,Attention deficit disorder"));

    let report_path = dir.path().join("report.txt");
    let report = run_report(&mapper, Some(&report_path)).expect("report");
    assert_eq!(report.probes.len(), 5);
    let text = fs::read_to_string(&report_path).expect("read report");
    assert!(text.contains("Mental Health (1 conditions):"));
}
