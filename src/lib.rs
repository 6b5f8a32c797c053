// Copyright 2024 the wikt-etymology contributors.
// This is free software distributed under the terms specified in
// the file LICENSE at the top-level directory of this distribution.

//! Extracts etymological relation edges from the English Wiktionary XML
//! dump: language/template parsing, wiki-markup normalization, a closed
//! relation-kind registry, and a nested-template unnester, driven
//! per-article by `page::process_article`.
//!
//! For the on-disk pipeline (download, decompress, emit CSV), see the
//! `wikt-etymology` binary in `main.rs`; this library crate exposes the
//! extraction core on its own so it can be driven against any source of
//! `(title, wiki_text)` pairs, not just the packaged dump reader.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod ast;
mod configuration;
mod csv_sink;
mod download;
mod dump;
mod error;
mod identity;
mod lang_codes;
mod normalizer;
mod page;
mod record;
mod template;
mod unnest;
mod util;

pub use configuration::create_configuration;
pub use csv_sink::Sink as CsvSink;
pub use download::ensure_downloaded;
pub use dump::{DumpReader, Page};
pub use error::FatalError;
pub use lang_codes::LanguageTable;
pub use page::process_article;
pub use record::{EtymologyEdge, RelType};
