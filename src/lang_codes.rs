// Copyright 2024 the wikt-etymology contributors.
// This is free software distributed under the terms specified in
// the file LICENSE at the top-level directory of this distribution.

//! The Language-Code Table (spec.md §4.1): an immutable mapping between
//! Wiktionary short codes (`en`, `la`, `ine-pro`, ...) and canonical
//! language names, loaded once from a two-column `code,name` CSV (§6).

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::FatalError;

#[derive(Debug, Deserialize)]
struct Row {
    code: String,
    name: String,
}

/// Read-only, shared across shards per spec.md §5(b).
#[derive(Debug, Default)]
pub struct LanguageTable {
    code_to_name: HashMap<String, String>,
    name_to_code: HashMap<String, String>,
}

impl LanguageTable {
    /// Loads the two-column `code,name` CSV table (§6) once at startup.
    pub fn load(path: &Path) -> Result<Self, FatalError> {
        let file = std::fs::File::open(path).map_err(|source| FatalError::LanguageTable {
            path: path.display().to_string(),
            source,
        })?;
        let mut reader = csv::Reader::from_reader(file);
        let mut table = LanguageTable::default();
        for row in reader.deserialize() {
            let row: Row = row.map_err(|source| FatalError::LanguageTableFormat {
                path: path.display().to_string(),
                source,
            })?;
            table
                .name_to_code
                .entry(row.name.clone())
                .or_insert_with(|| row.code.clone());
            table.code_to_name.insert(row.code, row.name);
        }
        Ok(table)
    }

    /// `resolve(code) -> name`; when the code is absent, return the input
    /// unchanged (I6).
    pub fn resolve<'a>(&'a self, code: &'a str) -> &'a str {
        self.code_to_name
            .get(code)
            .map(String::as_str)
            .unwrap_or(code)
    }

    /// Reverse lookup used by the Page Driver to map a level-2 section
    /// heading (a language name) back to its short code (§4.5 step 2).
    pub fn reverse(&self, name: &str) -> Option<&str> {
        self.name_to_code.get(name).map(String::as_str)
    }
}
