// Copyright 2024 the wikt-etymology contributors.
// This is free software distributed under the terms specified in
// the file LICENSE at the top-level directory of this distribution.

//! The Wiki-Markup Normalizer (spec.md §4.3): a total function over one
//! Etymology section's node sequence that merges `etyl` into
//! `derived-parsed` and fuses `+`/`,`/`from`-connected template runs into
//! the `affix-parsed`/`related-parsed`/`from-parsed` virtual templates the
//! Unnester expects.
//!
//! Mirrors the teacher's own preference for owning the node list outright
//! and rewriting it pass by pass (see `lib.rs`'s section-walking loop)
//! rather than threading an index cursor through borrowed slices.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet, VecDeque};

use crate::ast::{EtyTemplate, RawNode};
use crate::util::{first_token, lowercase_letters_only, Context};

const MENTION_NAMES: &[&str] = &["m", "mention", "m+", "langname-mention", "l", "link"];

/// Runs all five steps of §4.3 in order over one section's already-pruned
/// node sequence (pruning itself happens earlier, in `ast::convert_top_level`).
pub fn normalize<'a>(ctx: &Context, nodes: Vec<RawNode<'a>>) -> Vec<RawNode<'a>> {
    let nodes = merge_etyl(ctx, nodes);
    let nodes = combine_template_chains(nodes, |s| s == "+", "affix-parsed");
    let nodes = combine_template_chains(nodes, |s| s == ",", "related-parsed");
    // §9: the trigger is "<" or "from" (lowercase-letters-only); the code,
    // not the prose mentioning ">", is what this follows.
    combine_template_chains(
        nodes,
        |s| s == "<" || lowercase_letters_only(s) == "from",
        "from-parsed",
    )
}

enum EtylOutcome {
    Synthesize {
        subj_lang: String,
        rel_lang: String,
        val: String,
        consume_next: bool,
    },
    NoMerge,
}

fn analyze_etyl<'a>(etyl: &EtyTemplate<'a>, next: &RawNode<'a>) -> EtylOutcome {
    let Some(rel_lang) = etyl.positional_text(0) else {
        return EtylOutcome::NoMerge;
    };
    let subj_lang = etyl
        .positional_text(1)
        .map(Cow::into_owned)
        .unwrap_or_else(|| "en".to_owned());

    match next {
        RawNode::Text(value) => {
            let val = first_token(value);
            if val.is_empty() {
                EtylOutcome::NoMerge
            } else {
                EtylOutcome::Synthesize {
                    subj_lang,
                    rel_lang: rel_lang.into_owned(),
                    val: val.to_owned(),
                    consume_next: false,
                }
            }
        }
        RawNode::Wikilink { target, text } => {
            let source = if !text.is_empty() { text } else { target };
            let val = first_token(source);
            if val.is_empty() {
                EtylOutcome::NoMerge
            } else {
                EtylOutcome::Synthesize {
                    subj_lang,
                    rel_lang: rel_lang.into_owned(),
                    val: val.to_owned(),
                    consume_next: false,
                }
            }
        }
        RawNode::Template(inner) if MENTION_NAMES.contains(&inner.name.as_ref()) => {
            match (inner.positional_text(0), inner.positional_text(1)) {
                (Some(override_lang), Some(val)) => EtylOutcome::Synthesize {
                    subj_lang,
                    rel_lang: override_lang.into_owned(),
                    val: val.into_owned(),
                    consume_next: true,
                },
                _ => EtylOutcome::NoMerge,
            }
        }
        _ => EtylOutcome::NoMerge,
    }
}

fn make_derived_parsed<'a>(subj_lang: String, rel_lang: String, val: String) -> RawNode<'a> {
    RawNode::Template(EtyTemplate::synthetic(
        "derived-parsed",
        vec![
            vec![RawNode::Text(Cow::Owned(subj_lang))],
            vec![RawNode::Text(Cow::Owned(rel_lang))],
            vec![RawNode::Text(Cow::Owned(val))],
        ],
    ))
}

fn merge_etyl<'a>(ctx: &Context, nodes: Vec<RawNode<'a>>) -> Vec<RawNode<'a>> {
    let mut queue: VecDeque<RawNode<'a>> = nodes.into();
    let mut out = Vec::with_capacity(queue.len());
    while let Some(node) = queue.pop_front() {
        if let RawNode::Template(template) = &node {
            if template.name == "etyl" {
                if let Some(next) = queue.front() {
                    match analyze_etyl(template, next) {
                        EtylOutcome::Synthesize {
                            subj_lang,
                            rel_lang,
                            val,
                            consume_next,
                        } => {
                            if consume_next {
                                queue.pop_front();
                            }
                            out.push(make_derived_parsed(subj_lang, rel_lang, val));
                            continue;
                        }
                        EtylOutcome::NoMerge => {
                            ctx.warn_edge("etyl template could not be merged, dropping");
                            continue;
                        }
                    }
                }
            }
        }
        out.push(node);
    }
    out
}

/// The shared procedure behind steps 3-5: fuse maximal runs (length >= 2)
/// of templates separated by a single connective Text node into one
/// synthetic template, leaving the connective text nodes in place.
fn combine_template_chains<'a>(
    nodes: Vec<RawNode<'a>>,
    is_connective: impl Fn(&str) -> bool,
    synthetic_name: &'static str,
) -> Vec<RawNode<'a>> {
    let template_indices: Vec<usize> = nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| matches!(node, RawNode::Template(_)))
        .map(|(index, _)| index)
        .collect();

    let mut runs: Vec<Vec<usize>> = vec![];
    let mut current: Vec<usize> = vec![];
    for &index in &template_indices {
        let joins = match current.last() {
            None => true,
            Some(&prev) => {
                index == prev + 2
                    && matches!(&nodes[prev + 1], RawNode::Text(value) if is_connective(value.trim()))
            }
        };
        if joins {
            current.push(index);
        } else {
            if current.len() >= 2 {
                runs.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
            current.push(index);
        }
    }
    if current.len() >= 2 {
        runs.push(current);
    }

    let mut drop: HashSet<usize> = HashSet::new();
    let mut insert_before: HashMap<usize, EtyTemplate<'a>> = HashMap::new();
    for run in runs {
        let first = run[0];
        let positional = run
            .iter()
            .map(|&index| match &nodes[index] {
                RawNode::Template(template) => vec![RawNode::Template(template.clone())],
                _ => unreachable!("run indices are all templates by construction"),
            })
            .collect();
        insert_before.insert(first, EtyTemplate::synthetic(synthetic_name, positional));
        drop.extend(run);
    }

    let mut out = Vec::with_capacity(nodes.len());
    for (index, node) in nodes.into_iter().enumerate() {
        if let Some(synthetic) = insert_before.remove(&index) {
            out.push(RawNode::Template(synthetic));
        }
        if drop.contains(&index) {
            continue;
        }
        out.push(node);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> Context<'static> {
        Context::new("water")
    }

    fn text(value: &str) -> RawNode<'static> {
        RawNode::Text(Cow::Owned(value.to_owned()))
    }

    fn mention(lang: &str, word: &str) -> RawNode<'static> {
        RawNode::Template(EtyTemplate::synthetic(
            "m",
            vec![vec![text(lang)], vec![text(word)]],
        ))
    }

    fn template_names(nodes: &[RawNode]) -> Vec<&str> {
        nodes
            .iter()
            .filter_map(RawNode::as_template)
            .map(|t| t.name.as_ref())
            .collect()
    }

    #[test]
    fn plus_chain_fuses_into_affix_parsed() {
        let nodes = vec![
            mention("en", "foo"),
            text(" + "),
            mention("en", "bar"),
            text(" + "),
            mention("en", "baz"),
        ];
        let out = normalize(&ctx(), nodes);
        assert_eq!(template_names(&out), vec!["affix-parsed"]);
        let RawNode::Template(synthetic) = &out[0] else {
            panic!("expected a template")
        };
        assert_eq!(synthetic.positional_len(), 3);
        assert_eq!(synthetic.inner_templates(0)[0].name, "m");
        // connecting "+" text nodes are preserved per §4.3 step 3.
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn single_template_is_not_fused() {
        let nodes = vec![mention("en", "foo")];
        let out = normalize(&ctx(), nodes);
        assert_eq!(template_names(&out), vec!["m"]);
    }

    #[test]
    fn etyl_stitches_with_following_text() {
        let etyl = RawNode::Template(EtyTemplate::synthetic(
            "etyl",
            vec![vec![text("la")], vec![text("en")]],
        ));
        let nodes = vec![etyl, text(" aqua,")];
        let out = normalize(&ctx(), nodes);
        assert_eq!(template_names(&out), vec!["derived-parsed"]);
        let RawNode::Template(derived) = &out[0] else {
            panic!("expected a template")
        };
        assert_eq!(derived.positional_text(0).as_deref(), Some("en"));
        assert_eq!(derived.positional_text(1).as_deref(), Some("la"));
        assert_eq!(derived.positional_text(2).as_deref(), Some("aqua"));
    }

    #[test]
    fn etyl_stitches_with_following_mention_and_overrides_language() {
        let etyl = RawNode::Template(EtyTemplate::synthetic(
            "etyl",
            vec![vec![text("la")], vec![text("en")]],
        ));
        let nodes = vec![etyl, mention("grc", "\u{1f55}\u{3b4}\u{3c9}\u{3c1}")];
        let out = normalize(&ctx(), nodes);
        assert_eq!(template_names(&out), vec!["derived-parsed"]);
        let RawNode::Template(derived) = &out[0] else {
            panic!("expected a template")
        };
        assert_eq!(derived.positional_text(0).as_deref(), Some("en"));
        assert_eq!(derived.positional_text(1).as_deref(), Some("grc"));
        assert_eq!(
            derived.positional_text(2).as_deref(),
            Some("\u{1f55}\u{3b4}\u{3c9}\u{3c1}")
        );
    }

    #[test]
    fn from_chain_fuses_on_less_than_and_from() {
        let nodes = vec![
            mention("en", "A"),
            text(" < "),
            mention("en", "B"),
            text(" from "),
            mention("en", "C"),
        ];
        let out = normalize(&ctx(), nodes);
        assert_eq!(template_names(&out), vec!["from-parsed"]);
        let RawNode::Template(synthetic) = &out[0] else {
            panic!("expected a template")
        };
        assert_eq!(synthetic.positional_len(), 3);
    }
}
