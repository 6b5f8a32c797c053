// Copyright 2024 the wikt-etymology contributors.
// This is free software distributed under the terms specified in
// the file LICENSE at the top-level directory of this distribution.

//! The Page Driver (spec.md §4.5): per-article, split by language section,
//! locate Etymology subsections, normalize, extract, emit.
//!
//! The section-walking shape — an index cursor advanced by however many
//! nodes the nested section consumed, stopping at the next heading whose
//! level closes the current section — is the same one the teacher's
//! `language.rs`/`pos.rs` macros implement for POS/definition sections;
//! this driver just has two levels (language, then Etymology) instead of
//! four.

use parse_wiki_text::{Configuration, Node};

use crate::ast;
use crate::lang_codes::LanguageTable;
use crate::normalizer;
use crate::record::EtymologyEdge;
use crate::template;
use crate::util::{parse_text, Context};

/// Extracts every valid etymology edge from one article's wiki-markup.
pub fn process_article(
    configuration: &Configuration,
    langs: &LanguageTable,
    title: &str,
    wiki_text: &str,
) -> Vec<EtymologyEdge> {
    let ctx = Context::new(title);
    let parsed = configuration.parse(wiki_text);
    extract_language_sections(&ctx, langs, title, &parsed.nodes)
}

/// The number of nodes belonging to the section that starts right after a
/// heading, i.e. until a heading whose level is `<= boundary_level`, or the
/// end of the slice.
fn section_length(nodes: &[Node], boundary_level: u32) -> usize {
    nodes
        .iter()
        .position(|node| matches!(node, Node::Heading { level, .. } if *level <= boundary_level))
        .unwrap_or(nodes.len())
}

fn extract_language_sections<'a>(
    ctx: &Context,
    langs: &LanguageTable,
    term: &str,
    nodes: &[Node<'a>],
) -> Vec<EtymologyEdge> {
    let mut edges = vec![];
    let mut index = 0;
    while index < nodes.len() {
        let Node::Heading {
            level,
            nodes: heading_nodes,
            ..
        } = &nodes[index]
        else {
            index += 1;
            continue;
        };
        if *level != 2 {
            index += 1;
            continue;
        }
        let section_start = index + 1;
        let section_len = section_length(&nodes[section_start..], 2);
        let section_end = section_start + section_len;
        match parse_text(heading_nodes) {
            Some(heading_text) => match langs.reverse(&heading_text) {
                Some(short_code) => edges.extend(extract_etymology_sections(
                    ctx,
                    langs,
                    term,
                    short_code,
                    &nodes[section_start..section_end],
                )),
                None => ctx.warn_article(format_args!(
                    "no short code for language section {heading_text:?}"
                )),
            },
            None => ctx.warn_article("unreadable language section heading"),
        }
        index = section_end;
    }
    edges
}

fn extract_etymology_sections<'a>(
    ctx: &Context,
    langs: &LanguageTable,
    term: &str,
    lang: &str,
    nodes: &[Node<'a>],
) -> Vec<EtymologyEdge> {
    let mut edges = vec![];
    let mut index = 0;
    while index < nodes.len() {
        let Node::Heading {
            level,
            nodes: heading_nodes,
            ..
        } = &nodes[index]
        else {
            index += 1;
            continue;
        };
        if *level != 3 {
            index += 1;
            continue;
        }
        let section_start = index + 1;
        let section_len = section_length(&nodes[section_start..], 3);
        let section_end = section_start + section_len;
        let is_etymology = parse_text(heading_nodes)
            .map(|text| is_etymology_heading(&text))
            .unwrap_or(false);
        if is_etymology {
            // Flat, non-nested (§4.5 step 3): stop at the next heading of
            // *any* level, not just level <= 3, so a nested `====Noun====`
            // subsection's templates are never swept into the etymology.
            let content_len = section_length(&nodes[section_start..section_end], u32::MAX);
            edges.extend(extract_etymology_section(
                ctx,
                langs,
                term,
                lang,
                &nodes[section_start..section_start + content_len],
            ));
        }
        index = section_end;
    }
    edges
}

fn is_etymology_heading(text: &str) -> bool {
    text == "Etymology"
        || text
            .strip_prefix("Etymology ")
            .map(str::trim)
            .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
}

fn extract_etymology_section<'a>(
    ctx: &Context,
    langs: &LanguageTable,
    term: &str,
    lang: &str,
    nodes: &[Node<'a>],
) -> Vec<EtymologyEdge> {
    let raw = nodes.iter().filter_map(ast::convert_top_level).collect();
    let normalized = normalizer::normalize(ctx, raw);
    let mut edges = vec![];
    for node in &normalized {
        if let Some(inner) = node.as_template() {
            edges.extend(template::parse(ctx, langs, term, lang, inner));
        }
    }
    edges.retain(EtymologyEdge::is_valid);
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::create_configuration;
    use std::io::Write;

    fn langs() -> LanguageTable {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "code,name").unwrap();
        writeln!(file, "en,English").unwrap();
        writeln!(file, "enm,Middle English").unwrap();
        LanguageTable::load(file.path()).unwrap()
    }

    #[test]
    fn inherited_scenario_end_to_end() {
        let configuration = create_configuration();
        let langs = langs();
        let wiki_text = "==English==\n===Etymology===\n{{inh|en|enm|water}}\n";
        let edges = process_article(&configuration, &langs, "water", wiki_text);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].lang, "en");
        assert_eq!(edges[0].term, "water");
        assert_eq!(edges[0].related_lang.as_deref(), Some("Middle English"));
        assert_eq!(edges[0].related_term.as_deref(), Some("water"));
    }

    #[test]
    fn numbered_etymology_sections_are_both_scanned() {
        let configuration = create_configuration();
        let langs = langs();
        let wiki_text = concat!(
            "==English==\n",
            "===Etymology 1===\n",
            "{{inh|en|enm|bank}}\n",
            "===Etymology 2===\n",
            "{{inh|en|enm|banke}}\n",
        );
        let edges = process_article(&configuration, &langs, "bank", wiki_text);
        assert_eq!(edges.len(), 2);
    }

    #[test]
    fn invalid_related_term_is_filtered_out() {
        let configuration = create_configuration();
        let langs = langs();
        let wiki_text = "==English==\n===Etymology===\n{{inh|en|enm|-}}\n";
        let edges = process_article(&configuration, &langs, "water", wiki_text);
        assert!(edges.is_empty());
    }

    #[test]
    fn unmapped_language_section_is_skipped() {
        let configuration = create_configuration();
        let langs = langs();
        let wiki_text = "==Klingon==\n===Etymology===\n{{inh|tlh|enm|water}}\n";
        let edges = process_article(&configuration, &langs, "water", wiki_text);
        assert!(edges.is_empty());
    }

    #[test]
    fn etymology_section_is_flat_and_excludes_nested_pos_subsections() {
        let configuration = create_configuration();
        let langs = langs();
        let wiki_text = concat!(
            "==English==\n",
            "===Etymology 1===\n",
            "{{inh|en|enm|bank}}\n",
            "====Noun====\n",
            "{{m|en|something}}\n",
            "===Etymology 2===\n",
            "{{inh|en|enm|banke}}\n",
        );
        let edges = process_article(&configuration, &langs, "bank", wiki_text);
        // Only the two `inh` edges; the `{{m}}` inside the nested `====Noun====`
        // subsection must not be swept into Etymology 1's flat content.
        assert_eq!(edges.len(), 2);
        assert!(edges.iter().all(|e| e.related_term.as_deref() != Some("something")));
    }
}
