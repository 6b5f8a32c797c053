// Copyright 2024 the wikt-etymology contributors.
// This is free software distributed under the terms specified in
// the file LICENSE at the top-level directory of this distribution.

//! The CSV Sink (SPEC_FULL.md §4.9): serializes `EtymologyEdge` rows to
//! the eleven-column output contract of spec.md §6. No header row is
//! written (none is required; omitting one keeps concurrent shards'
//! output directly concatenable).

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::FatalError;
use crate::record::EtymologyEdge;

/// A single-writer CSV sink over the eleven-column output contract (§6).
pub struct Sink<W: Write> {
    writer: csv::Writer<W>,
}

impl Sink<File> {
    /// Creates (or truncates) the output file at `path`.
    pub fn create(path: &Path) -> Result<Self, FatalError> {
        let file = File::create(path).map_err(|source| FatalError::DumpOpen {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Sink::from_writer(file))
    }
}

impl<W: Write> Sink<W> {
    /// Wraps an arbitrary writer, e.g. a buffer in tests.
    pub fn from_writer(writer: W) -> Self {
        Sink {
            writer: csv::WriterBuilder::new().has_headers(false).from_writer(writer),
        }
    }

    /// Serializes and writes one edge as a CSV row.
    pub fn write(&mut self, edge: &EtymologyEdge) -> Result<(), FatalError> {
        self.writer.serialize(edge).map_err(FatalError::OutputWrite)
    }

    /// Flushes any buffered output.
    pub fn flush(&mut self) -> Result<(), FatalError> {
        self.writer
            .flush()
            .map_err(|source| FatalError::OutputWrite(csv::Error::from(source)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RelType;

    fn edge() -> EtymologyEdge {
        EtymologyEdge {
            term_id: "abc".into(),
            lang: "en".into(),
            term: "water".into(),
            reltype: RelType::InheritedFrom,
            related_term_id: Some("def".into()),
            related_lang: Some("Middle English".into()),
            related_term: Some("water".into()),
            position: 0,
            group_tag: None,
            parent_tag: None,
            parent_position: None,
        }
    }

    #[test]
    fn writes_eleven_columns_with_no_header() {
        let mut buffer = vec![];
        {
            let mut sink = Sink::from_writer(&mut buffer);
            sink.write(&edge()).unwrap();
            sink.flush().unwrap();
        }
        let output = String::from_utf8(buffer).unwrap();
        let mut lines = output.lines();
        let row = lines.next().unwrap();
        assert_eq!(row.split(',').count(), 11);
        assert!(lines.next().is_none());
        assert!(row.starts_with("abc,en,water,inherited_from,"));
    }
}
