// Copyright 2024 the wikt-etymology contributors.
// This is free software distributed under the terms specified in
// the file LICENSE at the top-level directory of this distribution.

//! Deterministic identifiers for terms, and fresh random tags for groups.
//!
//! Grounded in the `uuid` v5/v4 pattern used for stable content identifiers
//! in `robotoss-mr-ai` (`services/src/uuid.rs`, `codegraph-prep/src/core/
//! ids.rs`): a fixed namespace UUID plus `Uuid::new_v5` for anything that
//! must be the same across runs, and `Uuid::new_v4` for anything that only
//! needs to be unique within a run.

use base64::Engine;
use uuid::Uuid;

/// `term_id = base64url(UUIDv5(namespace=OID, name = lang ^ "^" ^ term))`,
/// with trailing `=` padding stripped.
///
/// The namespace is the well-known `NAMESPACE_OID` UUID
/// (`6ba7b812-9dad-11d1-80b4-00c04fd430c8`), matching the reference
/// identity scheme's `uuid.uuid5(uuid.NAMESPACE_OID, ...)` exactly, not a
/// crate-local stand-in.
///
/// `base64::engine::general_purpose::URL_SAFE_NO_PAD` produces unpadded
/// output directly, which is the same string a manual `rstrip("=")` pass
/// over the padded encoding would produce.
pub fn term_id(lang: &str, term: &str) -> String {
    let name = format!("{lang}^{term}");
    let uuid = Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes());
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(uuid.as_bytes())
}

/// A fresh, globally unique tag for a group-parent edge (§4.4 step 1).
pub fn new_group_tag() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_lang_term_yields_identical_id() {
        assert_eq!(term_id("en", "water"), term_id("en", "water"));
    }

    #[test]
    fn different_lang_or_term_yields_different_id() {
        assert_ne!(term_id("en", "water"), term_id("de", "water"));
        assert_ne!(term_id("en", "water"), term_id("en", "wasser"));
    }

    #[test]
    fn id_has_no_padding() {
        assert!(!term_id("en", "water").contains('='));
    }

    #[test]
    fn group_tags_are_fresh_each_call() {
        assert_ne!(new_group_tag(), new_group_tag());
    }
}
