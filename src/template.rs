// Copyright 2024 the wikt-etymology contributors.
// This is free software distributed under the terms specified in
// the file LICENSE at the top-level directory of this distribution.

//! The Template Parsers registry (spec.md §4.2): a closed dispatch over
//! the handful of template name families that can produce etymology
//! edges, returning 0..N edges for a given `(term, subject_lang,
//! template)` triple. An unregistered name dispatches to nothing — the
//! registry *is* the allow-list (spec.md §7).
//!
//! Closed-set polymorphism here follows `jmviz-wety`'s
//! `etymology_templates.rs`, which keeps its own template-name-to-mode
//! tables as static `phf` maps rather than branching logic: a new
//! relation kind is a map entry, not a new trait impl.

use std::borrow::Cow;

use crate::ast::EtyTemplate;
use crate::identity::term_id;
use crate::lang_codes::LanguageTable;
use crate::record::{EtymologyEdge, RelType};
use crate::unnest;
use crate::util::Context;

/// The shape of parser a template name dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserKind {
    /// `(lang, source_lang, source_word)` -> one edge, position 0.
    BinarySource(RelType),
    /// `(source_lang, source_word)` -> one edge.
    MentionLike(RelType),
    /// `(source_lang, part1, .., partN)` -> N edges, position 0..N-1.
    MultiSourcePositional(RelType),
    /// `(lang, prefix, [root])` -> `has_prefix` or `has_prefix_with_root`.
    Prefix,
    /// `(lang, root, suffix)` -> `has_suffix`.
    Suffix,
    /// `(lang, prefix, [middles...], suffix)` -> `has_confix`.
    Confix,
    /// `(lang)` -> `is_onomatopoeic` self-loop.
    Onomatopoeia,
    /// Delegates to the Unnester (§4.4) with this group-parent kind.
    Group(RelType),
}

/// The closed dispatch table (§4.2), including the aliases and preserved
/// misspellings observed in the upstream corpus. A `phf::Map` rather than
/// a `match` for the same reason `jmviz-wety`'s `etymology_templates.rs`
/// keeps its template-name-to-mode tables as `phf_ordered_map!`s: this is
/// a flat, static, exhaustively-enumerated name table, not branching logic.
///
/// Several corpus template names are registered verbatim alongside their
/// normalized spelling, since the registry is the allow-list and a missed
/// key silently drops every edge from that template: `"PIE root"`,
/// `"orthographic borrowing"`, `"semantic loan"` (space), `"named-after"`
/// (hyphen), and `"noncognate"` (no separator).
static PARSERS: phf::Map<&'static str, ParserKind> = phf::phf_map! {
    "inherited" => ParserKind::BinarySource(RelType::InheritedFrom),
    "inh" => ParserKind::BinarySource(RelType::InheritedFrom),
    "derived" => ParserKind::BinarySource(RelType::DerivedFrom),
    "der" => ParserKind::BinarySource(RelType::DerivedFrom),
    "derived-parsed" => ParserKind::BinarySource(RelType::DerivedFrom),
    "derived_parsed" => ParserKind::BinarySource(RelType::DerivedFrom),
    "borrowed" => ParserKind::BinarySource(RelType::BorrowedFrom),
    "bor" => ParserKind::BinarySource(RelType::BorrowedFrom),
    "learned_borrowing" => ParserKind::BinarySource(RelType::LearnedBorrowingFrom),
    "learned borrowring" => ParserKind::BinarySource(RelType::LearnedBorrowingFrom),
    "orthographic_borrowing" => ParserKind::BinarySource(RelType::OrthographicBorrowingFrom),
    "orthographic borrowing" => ParserKind::BinarySource(RelType::OrthographicBorrowingFrom),
    "obor" => ParserKind::BinarySource(RelType::OrthographicBorrowingFrom),
    "calque" => ParserKind::BinarySource(RelType::CalqueOf),
    "semantic_loan" => ParserKind::BinarySource(RelType::SemanticLoanOf),
    "semantic loan" => ParserKind::BinarySource(RelType::SemanticLoanOf),
    "phono_semantic_matching" => ParserKind::BinarySource(RelType::PhonoSemanticMatchingOf),
    "psm" => ParserKind::BinarySource(RelType::PhonoSemanticMatchingOf),
    "phono-semantifc matching" => ParserKind::BinarySource(RelType::PhonoSemanticMatchingOf),

    "mention" => ParserKind::MentionLike(RelType::EtymologicallyRelatedTo),
    "m" => ParserKind::MentionLike(RelType::EtymologicallyRelatedTo),
    "m+" => ParserKind::MentionLike(RelType::EtymologicallyRelatedTo),
    "link" => ParserKind::MentionLike(RelType::EtymologicallyRelatedTo),
    "l" => ParserKind::MentionLike(RelType::EtymologicallyRelatedTo),
    "langname-mention" => ParserKind::MentionLike(RelType::EtymologicallyRelatedTo),
    "cognate" => ParserKind::MentionLike(RelType::CognateOf),
    "cog" => ParserKind::MentionLike(RelType::CognateOf),
    "non_cognate" => ParserKind::MentionLike(RelType::EtymologicallyRelatedTo),
    "noncognate" => ParserKind::MentionLike(RelType::EtymologicallyRelatedTo),
    "noncog" => ParserKind::MentionLike(RelType::EtymologicallyRelatedTo),
    "named_after" => ParserKind::MentionLike(RelType::NamedAfter),
    "named-after" => ParserKind::MentionLike(RelType::NamedAfter),
    "clipping" => ParserKind::MentionLike(RelType::ClippingOf),
    "back_form" => ParserKind::MentionLike(RelType::BackFormationFrom),

    "affix" => ParserKind::MultiSourcePositional(RelType::HasAffix),
    "af" => ParserKind::MultiSourcePositional(RelType::HasAffix),
    "compound" => ParserKind::MultiSourcePositional(RelType::CompoundOf),
    "blend" => ParserKind::MultiSourcePositional(RelType::BlendOf),
    "doublet" => ParserKind::MultiSourcePositional(RelType::DoubletWith),
    "PIE root" => ParserKind::MultiSourcePositional(RelType::HasPieRoot),
    "pie_root" => ParserKind::MultiSourcePositional(RelType::HasPieRoot),

    "prefix" => ParserKind::Prefix,
    "suffix" => ParserKind::Suffix,
    "confix" => ParserKind::Confix,
    "onomatopoeic" => ParserKind::Onomatopoeia,
    "onom" => ParserKind::Onomatopoeia,

    "affix_parsed" => ParserKind::Group(RelType::GroupAffixRoot),
    "affix-parsed" => ParserKind::Group(RelType::GroupAffixRoot),
    "from_parsed" => ParserKind::Group(RelType::GroupDerivedRoot),
    "from-parsed" => ParserKind::Group(RelType::GroupDerivedRoot),
    "related_parsed" => ParserKind::Group(RelType::GroupRelatedRoot),
    "related-parsed" => ParserKind::Group(RelType::GroupRelatedRoot),
};

/// `parse(name) -> Parser | nil` (§4.2): looks up the closed dispatch
/// table above.
pub fn lookup(name: &str) -> Option<ParserKind> {
    PARSERS.get(name).copied()
}

/// Invokes the parser registered for `template.name`, if any.
pub fn parse(
    ctx: &Context,
    langs: &LanguageTable,
    term: &str,
    lang: &str,
    template: &EtyTemplate,
) -> Vec<EtymologyEdge> {
    match lookup(&template.name) {
        None => {
            ctx.warn_edge(format_args!("no registered parser for {:?}", template.name));
            vec![]
        }
        Some(ParserKind::BinarySource(reltype)) => {
            binary_source(ctx, langs, term, lang, template, reltype)
        }
        Some(ParserKind::MentionLike(reltype)) => {
            mention_like(ctx, langs, term, lang, template, reltype)
        }
        Some(ParserKind::MultiSourcePositional(reltype)) => {
            multi_source(ctx, langs, term, lang, template, reltype)
        }
        Some(ParserKind::Prefix) => prefix(ctx, langs, term, lang, template),
        Some(ParserKind::Suffix) => suffix(ctx, langs, term, lang, template),
        Some(ParserKind::Confix) => confix(ctx, langs, term, lang, template),
        Some(ParserKind::Onomatopoeia) => vec![onomatopoeia(langs, term, lang)],
        Some(ParserKind::Group(reltype)) => unnest::unnest(ctx, langs, term, lang, template, reltype),
    }
}

fn base_edge(term: &str, lang: &str, reltype: RelType) -> EtymologyEdge {
    EtymologyEdge {
        term_id: term_id(lang, term),
        lang: lang.to_owned(),
        term: term.to_owned(),
        reltype,
        related_term_id: None,
        related_lang: None,
        related_term: None,
        position: 0,
        group_tag: None,
        parent_tag: None,
        parent_position: None,
    }
}

/// Attaches the related side of an edge, resolving `related_lang` through
/// the code table (I6) and deriving `related_term_id` from the *canonical*
/// name, per P2 / §3.
fn with_related(
    mut edge: EtymologyEdge,
    langs: &LanguageTable,
    related_lang_code: &str,
    related_term: Cow<str>,
    position: u32,
) -> EtymologyEdge {
    let canonical = langs.resolve(related_lang_code).to_owned();
    edge.related_term_id = Some(term_id(&canonical, &related_term));
    edge.related_lang = Some(canonical);
    edge.related_term = Some(related_term.into_owned());
    edge.position = position;
    edge
}

fn binary_source(
    ctx: &Context,
    langs: &LanguageTable,
    term: &str,
    lang: &str,
    template: &EtyTemplate,
    reltype: RelType,
) -> Vec<EtymologyEdge> {
    if template.positional_len() < 3 {
        ctx.warn_edge(format_args!(
            "{} needs 3 positionals, got {}",
            template.name,
            template.positional_len()
        ));
        return vec![];
    }
    let Some(source_lang) = template.positional_text(1) else {
        return vec![];
    };
    let Some(source_word) = template.positional_text(2) else {
        return vec![];
    };
    let edge = with_related(
        base_edge(term, lang, reltype),
        langs,
        &source_lang,
        source_word,
        0,
    );
    vec![edge]
}

fn mention_like(
    ctx: &Context,
    langs: &LanguageTable,
    term: &str,
    lang: &str,
    template: &EtyTemplate,
    reltype: RelType,
) -> Vec<EtymologyEdge> {
    if template.positional_len() < 2 {
        ctx.warn_edge(format_args!(
            "{} needs 2 positionals, got {}",
            template.name,
            template.positional_len()
        ));
        return vec![];
    }
    let Some(source_lang) = template.positional_text(0) else {
        return vec![];
    };
    let Some(source_word) = template.positional_text(1) else {
        return vec![];
    };
    let edge = with_related(
        base_edge(term, lang, reltype),
        langs,
        &source_lang,
        source_word,
        0,
    );
    vec![edge]
}

fn multi_source(
    ctx: &Context,
    langs: &LanguageTable,
    term: &str,
    lang: &str,
    template: &EtyTemplate,
    reltype: RelType,
) -> Vec<EtymologyEdge> {
    if template.positional_len() < 2 {
        ctx.warn_edge(format_args!(
            "{} needs a source language and at least one part",
            template.name
        ));
        return vec![];
    }
    // pie_root fixes related_lang to "ine-pro" regardless of the declared
    // source language, but still iterates every part after it (§4.2, §9).
    let declared_lang = template.positional_text(0);
    let source_lang: Cow<str> = if reltype == RelType::HasPieRoot {
        Cow::Borrowed("ine-pro")
    } else {
        match declared_lang {
            Some(value) => value,
            None => return vec![],
        }
    };
    let mut edges = vec![];
    for index in 1..template.positional_len() {
        let Some(part) = template.positional_text(index) else {
            continue;
        };
        edges.push(with_related(
            base_edge(term, lang, reltype),
            langs,
            &source_lang,
            part,
            (index - 1) as u32,
        ));
    }
    edges
}

fn prefix(
    ctx: &Context,
    langs: &LanguageTable,
    term: &str,
    lang: &str,
    template: &EtyTemplate,
) -> Vec<EtymologyEdge> {
    if template.positional_len() < 2 {
        ctx.warn_edge(format_args!("prefix needs at least 2 positionals"));
        return vec![];
    }
    let Some(prefix_value) = template.positional_text(1) else {
        return vec![];
    };
    let mut edges = vec![with_related(
        base_edge(term, lang, RelType::HasPrefix),
        langs,
        lang,
        prefix_value,
        0,
    )];
    if let Some(root) = template
        .positional_text(2)
        .filter(|root| !root.is_empty() && root != "-")
    {
        edges.push(with_related(
            base_edge(term, lang, RelType::HasPrefixWithRoot),
            langs,
            lang,
            root,
            0,
        ));
    }
    edges
}

fn suffix(
    ctx: &Context,
    langs: &LanguageTable,
    term: &str,
    lang: &str,
    template: &EtyTemplate,
) -> Vec<EtymologyEdge> {
    if template.positional_len() < 3 {
        ctx.warn_edge(format_args!("suffix needs 3 positionals"));
        return vec![];
    }
    let Some(root) = template.positional_text(1) else {
        return vec![];
    };
    let Some(suffix_value) = template.positional_text(2) else {
        return vec![];
    };
    // Reuses the has_prefix_with_root label for the suffix's root; a
    // preserved quirk, not a mistake to fix (spec.md §9).
    vec![
        with_related(
            base_edge(term, lang, RelType::HasPrefixWithRoot),
            langs,
            lang,
            root,
            0,
        ),
        with_related(
            base_edge(term, lang, RelType::HasSuffix),
            langs,
            lang,
            suffix_value,
            0,
        ),
    ]
}

fn confix(
    ctx: &Context,
    langs: &LanguageTable,
    term: &str,
    lang: &str,
    template: &EtyTemplate,
) -> Vec<EtymologyEdge> {
    if template.positional_len() < 1 {
        ctx.warn_edge(format_args!("confix needs a declared language"));
        return vec![];
    }
    // positional[0] is the declared subject language; the components
    // (prefix, [middles...], suffix) are everything after it.
    let n_components = template.positional_len() - 1;
    if n_components < 2 {
        ctx.warn_edge(format_args!("confix needs a prefix and a suffix"));
        return vec![];
    }
    let mut edges = vec![];
    for i in 0..n_components {
        let Some(component) = template.positional_text(i + 1) else {
            continue;
        };
        // §9: the final element's position is len(components) - 2, not
        // len - 1; with no middles this collapses prefix and suffix onto
        // position 0. Preserve the quirk.
        let position = if i == 0 {
            0
        } else if i == n_components - 1 {
            (n_components as u32).saturating_sub(2)
        } else {
            i as u32
        };
        edges.push(with_related(
            base_edge(term, lang, RelType::HasConfix),
            langs,
            lang,
            component,
            position,
        ));
    }
    edges
}

fn onomatopoeia(langs: &LanguageTable, term: &str, lang: &str) -> EtymologyEdge {
    with_related(
        base_edge(term, lang, RelType::IsOnomatopoeic),
        langs,
        lang,
        Cow::Borrowed(term),
        0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::RawNode;
    use std::io::Write;

    fn text(value: &str) -> Vec<RawNode<'static>> {
        vec![RawNode::Text(Cow::Owned(value.to_owned()))]
    }

    fn langs() -> LanguageTable {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "code,name").unwrap();
        writeln!(file, "enm,Middle English").unwrap();
        writeln!(file, "grc,Ancient Greek").unwrap();
        writeln!(file, "ine-pro,Proto-Indo-European").unwrap();
        LanguageTable::load(file.path()).unwrap()
    }

    fn ctx() -> Context<'static> {
        Context::new("water")
    }

    #[test]
    fn inherited_three_params_emits_one_edge() {
        let template = EtyTemplate {
            name: Cow::Borrowed("inh"),
            positional: vec![text("en"), text("enm"), text("water")],
            named: Default::default(),
        };
        let edges = parse(&ctx(), &langs(), "water", "en", &template);
        assert_eq!(edges.len(), 1);
        let edge = &edges[0];
        assert_eq!(edge.reltype, RelType::InheritedFrom);
        assert_eq!(edge.related_lang.as_deref(), Some("Middle English"));
        assert_eq!(edge.related_term.as_deref(), Some("water"));
        assert_eq!(edge.position, 0);
    }

    #[test]
    fn inherited_too_few_params_emits_nothing() {
        let template = EtyTemplate {
            name: Cow::Borrowed("inh"),
            positional: vec![text("en"), text("enm")],
            named: Default::default(),
        };
        assert!(parse(&ctx(), &langs(), "water", "en", &template).is_empty());
    }

    #[test]
    fn prefix_with_root_emits_two_edges() {
        let template = EtyTemplate {
            name: Cow::Borrowed("prefix"),
            positional: vec![text("en"), text("un"), text("do")],
            named: Default::default(),
        };
        let edges = parse(&ctx(), &langs(), "undo", "en", &template);
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].reltype, RelType::HasPrefix);
        assert_eq!(edges[0].related_term.as_deref(), Some("un"));
        assert_eq!(edges[1].reltype, RelType::HasPrefixWithRoot);
        assert_eq!(edges[1].related_term.as_deref(), Some("do"));
    }

    #[test]
    fn prefix_without_root_emits_one_edge() {
        let template = EtyTemplate {
            name: Cow::Borrowed("prefix"),
            positional: vec![text("en"), text("un")],
            named: Default::default(),
        };
        let edges = parse(&ctx(), &langs(), "undo", "en", &template);
        assert_eq!(edges.len(), 1);
    }

    #[test]
    fn affix_run_emits_positions_0_to_n_minus_1() {
        let template = EtyTemplate {
            name: Cow::Borrowed("affix"),
            positional: vec![text("en"), text("foo"), text("bar"), text("baz")],
            named: Default::default(),
        };
        let edges = parse(&ctx(), &langs(), "foobarbaz", "en", &template);
        assert_eq!(edges.len(), 3);
        assert_eq!(
            edges.iter().map(|e| e.position).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert!(edges.iter().all(|e| e.reltype == RelType::HasAffix));
    }

    #[test]
    fn pie_root_ignores_declared_lang() {
        let template = EtyTemplate {
            name: Cow::Borrowed("pie_root"),
            positional: vec![text("whatever"), text("*wed-")],
            named: Default::default(),
        };
        let edges = parse(&ctx(), &langs(), "water", "en", &template);
        assert_eq!(edges.len(), 1);
        assert_eq!(
            edges[0].related_lang.as_deref(),
            Some("Proto-Indo-European")
        );
    }

    #[test]
    fn confix_with_no_middle_collapses_prefix_and_suffix_to_position_zero() {
        let template = EtyTemplate {
            name: Cow::Borrowed("confix"),
            positional: vec![text("en"), text("un"), text("ness")],
            named: Default::default(),
        };
        let edges = parse(&ctx(), &langs(), "unhappiness", "en", &template);
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].position, 0);
        assert_eq!(edges[1].position, 0);
    }

    #[test]
    fn confix_with_one_middle_collides_middle_and_suffix_positions() {
        let template = EtyTemplate {
            name: Cow::Borrowed("confix"),
            positional: vec![text("en"), text("en"), text("light"), text("en")],
            named: Default::default(),
        };
        let edges = parse(&ctx(), &langs(), "enlighten", "en", &template);
        assert_eq!(edges.len(), 3);
        assert_eq!(edges[0].position, 0);
        assert_eq!(edges[1].position, 1);
        assert_eq!(edges[2].position, 1);
    }

    #[test]
    fn invalid_related_term_filtered_at_validity_check() {
        let template = EtyTemplate {
            name: Cow::Borrowed("inh"),
            positional: vec![text("en"), text("enm"), text("-")],
            named: Default::default(),
        };
        let edges = parse(&ctx(), &langs(), "water", "en", &template);
        assert_eq!(edges.len(), 1);
        assert!(!edges[0].is_valid());
    }

    #[test]
    fn unknown_template_name_emits_nothing() {
        let template = EtyTemplate {
            name: Cow::Borrowed("not-a-real-template"),
            positional: vec![text("en")],
            named: Default::default(),
        };
        assert!(parse(&ctx(), &langs(), "water", "en", &template).is_empty());
    }
}
