/*
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use app_core::github::RemoteFile;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};

static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*import\s+(?:type\s+)?\{([^}]*)\}\s*from\s*['"]([^'"]+)['"]"#).unwrap()
});

/// One statement referencing an imported identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeSnippet {
    pub line: usize,
    pub code: String,
}

/// Everything recorded about one imported identifier in one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportUsage {
    pub line: usize,
    pub file: String,
    pub import_path: String,
    pub import_statement: String,
    pub code: Vec<CodeSnippet>,
}

/// Detected technology usage as rendered to clients: either a bare
/// presence flag or full provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Construct {
    Flag {
        value: bool,
    },
    #[serde(rename = "construct")]
    Detail {
        id: String,
        file: String,
        line: usize,
        href: Option<String>,
    },
}

// Scan results are memoized per file path for the process lifetime.
// There is no invalidation: a path re-scanned with new content keeps
// returning the first result until restart.
static SCAN_CACHE: LazyLock<Mutex<HashMap<String, HashMap<String, ImportUsage>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Scans a set of downloaded source files for imports from the
/// allow-listed module paths and collects every statement referencing
/// the imported identifiers.
pub fn scan_files(files: &[RemoteFile], allowed: &[String]) -> HashMap<String, ImportUsage> {
    let mut result: HashMap<String, ImportUsage> = HashMap::new();

    for file in files {
        for (ident, usage) in scan_file(file, allowed) {
            result
                .entry(ident)
                .and_modify(|existing| existing.code.extend(usage.code.clone()))
                .or_insert(usage);
        }
    }

    result
}

pub fn scan_file(file: &RemoteFile, allowed: &[String]) -> HashMap<String, ImportUsage> {
    if let Some(cached) = SCAN_CACHE.lock().unwrap().get(&file.path) {
        return cached.clone();
    }

    let mut usages: HashMap<String, ImportUsage> = HashMap::new();
    let mut reference_res: HashMap<String, Regex> = HashMap::new();

    for (idx, line) in file.content.lines().enumerate() {
        let lineno = idx + 1;

        if let Some(caps) = IMPORT_RE.captures(line) {
            let import_path = caps[2].to_string();

            if !allowed.contains(&import_path) {
                continue;
            }

            for ident in caps[1].split(',') {
                // `{ Api as Client }` binds the alias.
                let ident = ident
                    .split_whitespace()
                    .last()
                    .unwrap_or_default()
                    .to_string();

                if ident.is_empty() {
                    continue;
                }

                reference_res.entry(ident.clone()).or_insert_with(|| {
                    Regex::new(&format!(r"\b{}\b", regex::escape(&ident))).unwrap()
                });

                usages.entry(ident).or_insert(ImportUsage {
                    line: lineno,
                    file: file.path.clone(),
                    import_path: import_path.clone(),
                    import_statement: line.trim().to_string(),
                    code: Vec::new(),
                });
            }

            continue;
        }

        for (ident, usage) in usages.iter_mut() {
            if reference_res[ident].is_match(line) {
                usage.code.push(CodeSnippet {
                    line: lineno,
                    code: line.trim().to_string(),
                });
            }
        }
    }

    SCAN_CACHE
        .lock()
        .unwrap()
        .insert(file.path.clone(), usages.clone());

    usages
}
