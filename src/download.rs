// Copyright 2024 the wikt-etymology contributors.
// This is free software distributed under the terms specified in
// the file LICENSE at the top-level directory of this distribution.

//! The Downloader (SPEC_FULL.md §4.8): fetches the dump archive over HTTP
//! with a streaming body, skipped entirely when the configured path
//! already holds a file.

use std::fs::File;
use std::io::copy;
use std::path::Path;

use crate::error::FatalError;

/// Downloads `url` to `path` unless `path` already exists.
pub fn ensure_downloaded(url: &str, path: &Path) -> Result<(), FatalError> {
    if path.exists() {
        log::info!("dump already present at {}, skipping download", path.display());
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        if let Err(source) = std::fs::create_dir_all(parent) {
            log::warn!("could not create {}: {}", parent.display(), source);
        }
    }
    log::info!("downloading dump from {url}");
    let mut response = reqwest::blocking::get(url).map_err(|source| FatalError::Download {
        url: url.to_owned(),
        source,
    })?;
    let mut file = File::create(path).map_err(|source| FatalError::DumpOpen {
        path: path.display().to_string(),
        source,
    })?;
    copy(&mut response, &mut file).map_err(|source| FatalError::DumpOpen {
        path: path.display().to_string(),
        source,
    })?;
    Ok(())
}
