// Copyright 2024 the wikt-etymology contributors.
// This is free software distributed under the terms specified in
// the file LICENSE at the top-level directory of this distribution.

//! Small helpers shared across the pipeline, and the per-article
//! diagnostic context.
//!
//! The teacher (`brkalmar-parse_wiktionary_en`) collects a `Vec<Warning>`
//! on its `Context` and hands it back to its caller, since it is a library
//! with no opinion on how its caller reports problems. This crate is the
//! terminal consumer of its own output — there is no caller to hand
//! warnings back to — so `Context` logs them immediately via the `log`
//! crate instead of retaining them, keeping the O(one page) memory bound
//! of spec.md §5.

use std::borrow::Cow;

use parse_wiki_text::Node;

/// Per-article diagnostic context threaded through the Page Driver,
/// Normalizer and Unnester.
pub struct Context<'a> {
    /// The article title, used to prefix logged diagnostics.
    pub title: &'a str,
}

impl<'a> Context<'a> {
    /// Starts a fresh diagnostic context for the article titled `title`.
    pub fn new(title: &'a str) -> Self {
        Context { title }
    }

    /// An article-scoped problem (spec.md §7): malformed markup, a missing
    /// mapping, an empty section.
    pub fn warn_article(&self, message: impl std::fmt::Display) {
        log::debug!("{}: {}", self.title, message);
    }

    /// An edge-scoped problem (spec.md §7): a template with too few
    /// positionals, an invalid `related_term`, an unknown template name.
    pub fn warn_edge(&self, message: impl std::fmt::Display) {
        log::trace!("{}: {}", self.title, message);
    }
}

/// Flattens a node sequence to plain text, the way the teacher's
/// `util::parse_text` does for `parse_wiki_text::Node` sequences: a single
/// Text node borrows directly, anything else concatenates character
/// entities and text, and any other node kind makes the whole sequence
/// unrepresentable as text.
#[must_use]
pub fn parse_text<'a>(nodes: &[Node<'a>]) -> Option<Cow<'a, str>> {
    match nodes {
        [] => Some(Cow::Borrowed("")),
        [Node::Text { value, .. }] => Some(Cow::Borrowed(*value)),
        _ => nodes
            .iter()
            .map(|node| match node {
                Node::CharacterEntity { character, .. } => Some(character.to_string()),
                Node::Text { value, .. } => Some(value.to_string()),
                _ => None,
            })
            .collect::<Option<String>>()
            .map(Cow::Owned),
    }
}

/// Splits on the first run of comma/whitespace characters and returns the
/// first token, trimmed. Used by the `etyl`-merge pass (§4.3 step 2) to
/// pull a bare word out of the free text immediately following `{{etyl}}`.
pub fn first_token(text: &str) -> &str {
    text.trim()
        .split(|c: char| c == ',' || c.is_whitespace())
        .find(|token| !token.is_empty())
        .unwrap_or("")
}

/// Lowercases and strips everything but ASCII letters, used to recognize
/// `"from"` regardless of capitalization or stray punctuation (§4.3 step 5,
/// §9 open question on the `from`/`<` trigger).
pub fn lowercase_letters_only(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphabetic())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_token_splits_on_comma_or_space() {
        assert_eq!(first_token(" aqua, more text"), "aqua");
        assert_eq!(first_token("aqua vitae"), "aqua");
        assert_eq!(first_token("aqua"), "aqua");
    }

    #[test]
    fn lowercase_letters_only_drops_punctuation() {
        assert_eq!(lowercase_letters_only("From!"), "from");
        assert_eq!(lowercase_letters_only("  From-"), "from");
    }
}
