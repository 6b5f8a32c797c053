// Copyright 2024 the wikt-etymology contributors.
// This is free software distributed under the terms specified in
// the file LICENSE at the top-level directory of this distribution.

//! The Nested-Template Unnester (spec.md §4.4): given a synthesized group
//! template (`affix-parsed`, `from-parsed`, `related-parsed`), emits a
//! group-parent header edge plus one child edge per inner template found
//! in each positional parameter, attaching parent linkage so downstream
//! consumers can reconstruct the forest the `+`/`,`/`from` connectives
//! implied in the source markup.
//!
//! Mutually recursive with `template`: a group parser delegates here, and
//! here we call back into `template::parse` for each inner template. A
//! child that already carries a `parent_tag` (produced by a group nested
//! one level deeper) is left alone — the innermost parent wins.

use crate::ast::EtyTemplate;
use crate::identity::{new_group_tag, term_id};
use crate::lang_codes::LanguageTable;
use crate::record::{EtymologyEdge, RelType};
use crate::template;
use crate::util::Context;

/// Builds a group-parent edge plus its parented children for one
/// synthesized group template (§4.4).
pub fn unnest(
    ctx: &Context,
    langs: &LanguageTable,
    term: &str,
    lang: &str,
    group_template: &EtyTemplate,
    group_kind: RelType,
) -> Vec<EtymologyEdge> {
    let group_tag = new_group_tag();
    let mut edges = vec![EtymologyEdge {
        term_id: term_id(lang, term),
        lang: lang.to_owned(),
        term: term.to_owned(),
        reltype: group_kind,
        related_term_id: None,
        related_lang: None,
        related_term: None,
        position: 0,
        group_tag: Some(group_tag.clone()),
        parent_tag: None,
        parent_position: None,
    }];

    let mut parent_index: i64 = 0;
    for index in 0..group_template.positional_len() {
        let mut contained_parseable = false;
        for inner in group_template.inner_templates(index) {
            if template::lookup(&inner.name).is_none() {
                ctx.warn_edge(format_args!(
                    "no registered parser for nested {:?}",
                    inner.name
                ));
                continue;
            }
            contained_parseable = true;
            for mut child in template::parse(ctx, langs, term, lang, inner) {
                if child.parent_tag.is_none() {
                    child.parent_tag = Some(group_tag.clone());
                    child.parent_position = Some(parent_index);
                }
                edges.push(child);
            }
        }
        if contained_parseable {
            parent_index += 1;
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::RawNode;
    use std::borrow::Cow;
    use std::io::Write;

    fn text(value: &str) -> Vec<RawNode<'static>> {
        vec![RawNode::Text(Cow::Owned(value.to_owned()))]
    }

    fn mention(lang: &str, word: &str) -> EtyTemplate<'static> {
        EtyTemplate::synthetic("m", vec![text(lang), text(word)])
    }

    fn langs() -> LanguageTable {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "code,name").unwrap();
        writeln!(file, "en,English").unwrap();
        LanguageTable::load(file.path()).unwrap()
    }

    fn ctx() -> Context<'static> {
        Context::new("foobarbaz")
    }

    #[test]
    fn affix_group_attaches_ascending_positions() {
        let group = EtyTemplate::synthetic(
            "affix-parsed",
            vec![
                vec![RawNode::Template(mention("en", "foo"))],
                vec![RawNode::Template(mention("en", "bar"))],
                vec![RawNode::Template(mention("en", "baz"))],
            ],
        );
        let edges = unnest(&ctx(), &langs(), "foobarbaz", "en", &group, RelType::GroupAffixRoot);
        assert_eq!(edges.len(), 4);
        let parent = &edges[0];
        assert!(parent.is_group_parent());
        assert_eq!(parent.reltype, RelType::GroupAffixRoot);
        let group_tag = parent.group_tag.clone().unwrap();
        for (i, child) in edges[1..].iter().enumerate() {
            assert_eq!(child.parent_tag.as_deref(), Some(group_tag.as_str()));
            assert_eq!(child.parent_position, Some(i as i64));
            assert_eq!(child.reltype, RelType::EtymologicallyRelatedTo);
        }
    }

    #[test]
    fn already_parented_child_keeps_inner_parent() {
        // An outer group whose single positional wraps another group
        // template (a nested `affix-parsed` inside a `from-parsed`).
        let inner_group = EtyTemplate::synthetic(
            "affix-parsed",
            vec![
                vec![RawNode::Template(mention("en", "foo"))],
                vec![RawNode::Template(mention("en", "bar"))],
            ],
        );
        let outer = EtyTemplate::synthetic(
            "from-parsed",
            vec![vec![RawNode::Template(inner_group)]],
        );
        let edges = unnest(&ctx(), &langs(), "foobar", "en", &outer, RelType::GroupDerivedRoot);
        // outer parent + inner parent + 2 grandchildren = 4
        assert_eq!(edges.len(), 4);
        let outer_tag = edges[0].group_tag.clone().unwrap();
        let inner_parent = edges
            .iter()
            .find(|e| e.is_group_parent() && e.reltype == RelType::GroupAffixRoot)
            .unwrap();
        assert_eq!(inner_parent.parent_tag.as_deref(), Some(outer_tag.as_str()));
        let inner_tag = inner_parent.group_tag.clone().unwrap();
        for child in edges.iter().filter(|e| !e.is_group_parent()) {
            assert_eq!(child.parent_tag.as_deref(), Some(inner_tag.as_str()));
        }
    }
}
