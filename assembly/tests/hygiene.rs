//! Source hygiene for the assembly crate.
//!
//! Scans production files under `src/` (test siblings excluded) for patterns
//! that crash the viewer or swallow errors. Every budget is zero; a new hit
//! fails the build until it is rewritten to propagate or handle the case.

use std::fs;
use std::path::{Path, PathBuf};

struct Budget {
    pattern: &'static str,
    max: usize,
}

const UNWRAP: Budget = Budget { pattern: ".unwrap()", max: 0 };
const EXPECT: Budget = Budget { pattern: ".expect(", max: 0 };
const PANIC: Budget = Budget { pattern: "panic!(", max: 0 };
const UNREACHABLE: Budget = Budget { pattern: "unreachable!(", max: 0 };
const TODO: Budget = Budget { pattern: "todo!(", max: 0 };
const UNIMPLEMENTED: Budget = Budget { pattern: "unimplemented!(", max: 0 };
const SILENT_DISCARD: Budget = Budget { pattern: "let _ =", max: 0 };
const DOT_OK: Budget = Budget { pattern: ".ok()", max: 0 };
const ALLOW_DEAD_CODE: Budget = Budget { pattern: "#[allow(dead_code)]", max: 0 };

fn production_files(dir: &Path, out: &mut Vec<(PathBuf, String)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            production_files(&path, out);
            continue;
        }
        let is_rs = path.extension().is_some_and(|e| e == "rs");
        let is_test = path.to_string_lossy().ends_with("_test.rs");
        if is_rs && !is_test {
            if let Ok(content) = fs::read_to_string(&path) {
                out.push((path, content));
            }
        }
    }
}

fn enforce(budget: &Budget) {
    let mut files = Vec::new();
    production_files(Path::new("src"), &mut files);
    assert!(!files.is_empty(), "no sources found under src/");

    let hits: Vec<(String, usize)> = files
        .iter()
        .map(|(path, content)| {
            let n = content.lines().filter(|line| line.contains(budget.pattern)).count();
            (path.display().to_string(), n)
        })
        .filter(|(_, n)| *n > 0)
        .collect();
    let found: usize = hits.iter().map(|(_, n)| n).sum();
    let listing = hits.iter().map(|(p, n)| format!("  {p}: {n}")).collect::<Vec<_>>().join("\n");
    assert!(found <= budget.max, "`{}` found {found} times, budget {}:\n{listing}", budget.pattern, budget.max);
}

#[test]
fn no_unwrap() {
    enforce(&UNWRAP);
}

#[test]
fn no_expect() {
    enforce(&EXPECT);
}

#[test]
fn no_panic() {
    enforce(&PANIC);
}

#[test]
fn no_unreachable() {
    enforce(&UNREACHABLE);
}

#[test]
fn no_todo() {
    enforce(&TODO);
}

#[test]
fn no_unimplemented() {
    enforce(&UNIMPLEMENTED);
}

#[test]
fn no_silent_discard() {
    enforce(&SILENT_DISCARD);
}

#[test]
fn no_dot_ok() {
    enforce(&DOT_OK);
}

#[test]
fn no_allow_dead_code() {
    enforce(&ALLOW_DEAD_CODE);
}
