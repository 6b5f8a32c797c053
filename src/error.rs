// Copyright 2024 the wikt-etymology contributors.
// This is free software distributed under the terms specified in
// the file LICENSE at the top-level directory of this distribution.

//! The error taxonomy of spec.md §7: fatal errors abort the process;
//! article- and edge-scoped problems are logged and skipped (see
//! `util::Context` and `page`).

use thiserror::Error;

/// Errors that abort the whole run. Everything else (malformed
/// wiki-markup, an unmappable language section, a template with too few
/// positional parameters) is article- or edge-scoped and never reaches
/// this type; it is logged via the `log` crate instead and the offending
/// article or edge is skipped.
#[derive(Debug, Error)]
pub enum FatalError {
    /// The dump archive could not be opened for reading.
    #[error("cannot open dump at {path}: {source}")]
    DumpOpen {
        /// The path that was opened.
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The language-code table file could not be opened for reading.
    #[error("cannot read language code table at {path}: {source}")]
    LanguageTable {
        /// The path that was opened.
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The language-code table's CSV content did not match the `code,name`
    /// schema.
    #[error("malformed language code table at {path}: {source}")]
    LanguageTableFormat {
        /// The path that was read.
        path: String,
        #[source]
        source: csv::Error,
    },

    /// The dump archive could not be fetched over HTTP.
    #[error("failed to download dump from {url}: {source}")]
    Download {
        /// The URL that was fetched.
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The output CSV stream failed to write or flush.
    #[error("output stream write failure: {0}")]
    OutputWrite(#[source] csv::Error),

    /// The dump's XML could not be parsed.
    #[error("malformed dump XML: {0}")]
    DumpXml(#[source] quick_xml::Error),
}
