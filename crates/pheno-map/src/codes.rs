//! Code formatting and coding-system detection.

use std::sync::LazyLock;

use regex::Regex;

use pheno_model::CodeKind;

static ICD10_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]\d{2}(\.\d+)?$").expect("valid ICD-10 pattern"));

static ICD9_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{3}(\.\d+)?|[VE]\d{2}(\.\d+)?)$").expect("valid ICD-9 pattern")
});

static SNOMED_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{6,18}$").expect("valid SNOMED pattern"));

/// Normalizes a raw code into the canonical form for its coding system.
///
/// - ICD-9: `V`/`E` codes are left alone; otherwise a decimal point is
///   inserted after the third character when missing (`25000` -> `250.00`).
/// - ICD-10: uppercased, then the same decimal insertion (`e1100` -> `E11.00`).
/// - SNOMED and unknown codes are only trimmed.
pub fn format_code(raw: &str, kind: CodeKind) -> String {
    let code = raw.trim();
    match kind {
        CodeKind::Icd9 => {
            if code.starts_with(['V', 'E']) {
                return code.to_string();
            }
            insert_decimal(code)
        }
        CodeKind::Icd10 => insert_decimal(&code.to_uppercase()),
        CodeKind::Snomed | CodeKind::Unknown => code.to_string(),
    }
}

fn insert_decimal(code: &str) -> String {
    if code.contains('.') || code.chars().count() < 4 {
        return code.to_string();
    }
    match code.char_indices().nth(3) {
        Some((split, _)) => format!("{}.{}", &code[..split], &code[split..]),
        None => code.to_string(),
    }
}

/// Classifies an unlabeled code by its shape.
///
/// Patterns are tried in order ICD-10, ICD-9, SNOMED. Detection is case
/// sensitive: a lowercase ICD-10 code is reported as unknown.
pub fn detect_type(code: &str) -> CodeKind {
    let code = code.trim();
    if ICD10_PATTERN.is_match(code) {
        CodeKind::Icd10
    } else if ICD9_PATTERN.is_match(code) {
        CodeKind::Icd9
    } else if SNOMED_PATTERN.is_match(code) {
        CodeKind::Snomed
    } else {
        CodeKind::Unknown
    }
}

/// Returns the part of a code before its first decimal point.
pub fn base_code(code: &str) -> &str {
    code.split_once('.').map_or(code, |(base, _)| base)
}

/// The code followed by its hierarchical ancestors, down to the
/// three-character category: `E11.00` -> `E11.00`, `E11.0`, `E11`.
/// A code shorter than a category yields only itself.
pub fn ancestors(code: &str) -> Vec<&str> {
    if code.is_empty() {
        return Vec::new();
    }
    let mut chain = vec![code];
    let mut current = code;
    while current.chars().count() > 3 {
        let Some((last, _)) = current.char_indices().next_back() else {
            break;
        };
        current = current[..last].trim_end_matches('.');
        chain.push(current);
    }
    chain
}
