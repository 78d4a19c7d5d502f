//! Path compilation case-file tests
//!
//! Runs every case in `tests/cases/paths.json` through the compiler and
//! checks the canonical rendering, error messages, and that compiled
//! paths survive being recompiled from their own text.

#![allow(clippy::expect_used)]

use serde::Deserialize;
use std::fs;
use xmlpath_core::{CompiledPath, Predicate, compile};

/// A single compile test case
#[derive(Debug, Deserialize)]
struct PathCase {
    name: String,
    path: String,
    #[serde(default)]
    canonical: Option<String>,
    #[serde(default)]
    invalid: bool,
    #[serde(default)]
    error: Option<String>,
}

/// The case file structure
#[derive(Debug, Deserialize)]
struct CaseFile {
    tests: Vec<PathCase>,
}

fn load_cases() -> CaseFile {
    let case_path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/cases/paths.json");
    let content = fs::read_to_string(case_path).expect("Failed to read case file");
    serde_json::from_str(&content).expect("Failed to parse case JSON")
}

/// Every path nested inside the predicates of `path`
fn sub_paths(path: &CompiledPath) -> Vec<&CompiledPath> {
    fn walk<'a>(predicate: &'a Predicate, out: &mut Vec<&'a CompiledPath>) {
        match predicate {
            Predicate::Position(_) => {}
            Predicate::Contains { path, .. }
            | Predicate::Equals { path, .. }
            | Predicate::Not(path)
            | Predicate::Exists(path) => {
                out.push(path);
                out.extend(sub_paths(path));
            }
            Predicate::And(terms) | Predicate::Or(terms) => {
                for term in terms {
                    walk(term, out);
                }
            }
        }
    }

    let mut out = Vec::new();
    for step in path.steps() {
        if let Some(predicate) = step.predicate() {
            walk(predicate, &mut out);
        }
    }
    out
}

/// Run a single case and return the failure reason, if any
fn run_case(case: &PathCase) -> Option<String> {
    let result = compile(&case.path);

    if case.invalid {
        return match result {
            Ok(path) => Some(format!("expected compile error but got {path}")),
            Err(e) => match &case.error {
                Some(expected) if e.message() != expected => Some(format!(
                    "error mismatch:\n  got:      {}\n  expected: {expected}",
                    e.message()
                )),
                _ => None,
            },
        };
    }

    let path = match result {
        Ok(path) => path,
        Err(e) => return Some(format!("unexpected compile error: {e}")),
    };

    let rendered = path.to_string();
    if let Some(expected) = &case.canonical
        && &rendered != expected
    {
        return Some(format!(
            "rendering mismatch:\n  got:      {rendered}\n  expected: {expected}"
        ));
    }

    match compile(&rendered) {
        Ok(again) if again == path => {}
        Ok(again) => return Some(format!("canonical form recompiled differently: {again:?}")),
        Err(e) => return Some(format!("canonical form failed to compile: {e}")),
    }

    for sub in std::iter::once(&path).chain(sub_paths(&path)) {
        match compile(sub.source()) {
            Ok(again) if &again == sub => {}
            Ok(again) => {
                return Some(format!(
                    "source {:?} recompiled differently: {again:?}",
                    sub.source()
                ));
            }
            Err(e) => return Some(format!("source {:?} failed to compile: {e}", sub.source())),
        }
    }

    None
}

#[test]
fn run_path_cases() {
    let cases = load_cases();

    let total = cases.tests.len();
    let failures: Vec<(String, String)> = cases
        .tests
        .iter()
        .filter_map(|case| run_case(case).map(|reason| (case.name.clone(), reason)))
        .collect();

    for (name, reason) in &failures {
        println!("\n[FAIL] {name}");
        println!("  {reason}");
    }

    assert!(
        failures.is_empty(),
        "{} out of {} path cases failed",
        failures.len(),
        total
    );
}

#[test]
fn test_case_file_loads() {
    let cases = load_cases();
    assert!(!cases.tests.is_empty(), "case file should have tests");
    assert!(cases.tests.iter().any(|case| case.invalid));
    assert!(
        cases
            .tests
            .iter()
            .filter(|case| !case.invalid)
            .all(|case| case.canonical.is_some())
    );
}
