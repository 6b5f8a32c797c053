// Copyright 2024 the wikt-etymology contributors.
// This is free software distributed under the terms specified in
// the file LICENSE at the top-level directory of this distribution.

//! Builds the `parse_wiki_text::Configuration` this crate parses English
//! Wiktionary wiki-markup with.
//!
//! The teacher's `lib.rs` re-exports `configuration::create_configuration`
//! but the retrieval pack is missing the file itself (its sibling,
//! `parse_wiktionary_de`, has the identical gap). Reconstructed here from
//! `parse_wiki_text::ConfigurationSource`'s documented field set, using the
//! namespace/magic-word/protocol values MediaWiki ships for the English
//! Wiktionary.

use parse_wiki_text::{Configuration, ConfigurationSource};

/// A fresh parser configuration. Cheap to call repeatedly, but callers
/// should build one and share it across the whole run (§5(b) treats the
/// configuration the same way as the Language-Code Table: read-only and
/// shared).
#[must_use]
pub fn create_configuration() -> Configuration {
    Configuration::new(&ConfigurationSource {
        category_namespaces: &["category"],
        extension_tags: &[
            "categorytree",
            "ce",
            "gallery",
            "imagemap",
            "inputbox",
            "math",
            "nowiki",
            "poem",
            "pre",
            "ref",
            "references",
            "score",
            "section",
            "source",
            "syntaxhighlight",
            "templatedata",
            "timeline",
        ],
        file_namespaces: &["file", "image"],
        link_trail: "a-z",
        magic_words: &[
            "DISAMBIG",
            "FORCETOC",
            "HIDDENCAT",
            "INDEX",
            "NEWSECTIONLINK",
            "NOCC",
            "NOCOLLABORATIONHUBTOC",
            "NOCONTENTCONVERT",
            "NOEDITSECTION",
            "NOGALLERY",
            "NOINDEX",
            "NONEWSECTIONLINK",
            "NOTC",
            "NOTITLECONVERT",
            "NOTOC",
            "STATICREDIRECT",
            "TOC",
        ],
        protocols: &[
            "//",
            "bitcoin:",
            "ftp://",
            "ftps://",
            "geo:",
            "git://",
            "gopher://",
            "http://",
            "https://",
            "irc://",
            "ircs://",
            "magnet:",
            "mailto:",
            "mms://",
            "news:",
            "nntp://",
            "redis://",
            "sftp://",
            "sip:",
            "sips:",
            "sms:",
            "ssh://",
            "svn://",
            "tel:",
            "telnet://",
            "urn:",
            "worldwind://",
            "xmpp:",
        ],
        redirect_magic_words: &["REDIRECT"],
    })
}
