// Copyright 2024 the wikt-etymology contributors.
// This is free software distributed under the terms specified in
// the file LICENSE at the top-level directory of this distribution.

//! A small owned AST the normalizer, template registry and unnester all
//! share, translated once from `parse_wiki_text::Node` at the section
//! boundary.
//!
//! This mirrors the move the teacher makes from `Node` to its own
//! `Flowing<'a>` enum (`src/lib.rs`): a flat, purpose-built representation
//! decouples the rest of the pipeline from `parse_wiki_text`'s own struct
//! layout. Here it also lets the Normalizer *synthesize* new templates
//! (`derived-parsed`, `affix-parsed`, ...) that were never actually present
//! in the source wiki-markup, by constructing `EtyTemplate` values
//! directly instead of trying to fabricate `parse_wiki_text::Node`s.

use std::borrow::Cow;
use std::collections::HashMap;

use parse_wiki_text::{Node, Parameter};

use crate::util::parse_text;

/// A node in an Etymology section's content, after §4.3 step 1 ("prune
/// noise") has already been applied by `convert_top_level`.
#[derive(Debug, Clone)]
pub enum RawNode<'a> {
    /// Plain text content.
    Text(Cow<'a, str>),
    /// A `[[target|text]]` wikilink.
    Wikilink {
        #[allow(dead_code)]
        target: Cow<'a, str>,
        text: Cow<'a, str>,
    },
    /// A template invocation, possibly synthesized by the Normalizer.
    Template(EtyTemplate<'a>),
}

impl<'a> RawNode<'a> {
    /// The trimmed text of a Text node, used by the chain-synthesis passes
    /// to recognize connective tokens (`+`, `,`, `<`, `from`).
    pub fn trimmed_text(&self) -> Option<&str> {
        match self {
            RawNode::Text(value) => Some(value.trim()),
            _ => None,
        }
    }

    /// This node as a template invocation, if it is one.
    pub fn as_template(&self) -> Option<&EtyTemplate<'a>> {
        match self {
            RawNode::Template(template) => Some(template),
            _ => None,
        }
    }
}

/// A template invocation: `{{name|pos1|pos2|key=val}}`.
///
/// `positional` holds each positional parameter's *node sequence*, not
/// just its flattened text, so the Unnester can look for top-level inner
/// templates inside a parameter's value (§4.4 step 2) without re-parsing
/// wiki-markup.
#[derive(Debug, Clone)]
pub struct EtyTemplate<'a> {
    /// The template's name, e.g. `"inh"` or `"affix-parsed"`.
    pub name: Cow<'a, str>,
    /// Positional parameter values, in declaration order.
    pub positional: Vec<Vec<RawNode<'a>>>,
    /// Keyed (`key=value`) parameter values, which never participate in
    /// positional dispatch (§4.2).
    pub named: HashMap<Cow<'a, str>, Vec<RawNode<'a>>>,
}

impl<'a> EtyTemplate<'a> {
    /// Builds a virtual template the Normalizer synthesizes in place of a
    /// fused run of connected templates (§4.3 steps 2-5). Each element of
    /// `positional` is itself a single-node sequence wrapping one of the
    /// fused templates.
    pub fn synthetic(name: &'static str, positional: Vec<Vec<RawNode<'a>>>) -> Self {
        EtyTemplate {
            name: Cow::Borrowed(name),
            positional,
            named: HashMap::new(),
        }
    }

    /// The number of positional parameters this template was invoked with.
    pub fn positional_len(&self) -> usize {
        self.positional.len()
    }

    /// The flattened text of positional parameter `index`, if its value is
    /// plain text/wikilink content rather than a nested template.
    pub fn positional_text(&self, index: usize) -> Option<Cow<'a, str>> {
        flatten_text(self.positional.get(index)?)
    }

    /// Top-level templates nested inside positional parameter `index`'s
    /// value (§4.4 step 2 is explicit that this is non-recursive: we do
    /// not descend into *those* templates' own parameters here).
    pub fn inner_templates(&self, index: usize) -> Vec<&EtyTemplate<'a>> {
        match self.positional.get(index) {
            None => vec![],
            Some(nodes) => nodes.iter().filter_map(RawNode::as_template).collect(),
        }
    }
}

/// Concatenates a node sequence's text content, the way `util::parse_text`
/// does for `parse_wiki_text::Node` sequences, but over `RawNode`. Returns
/// `None` if any node in the sequence is a template (unrepresentable as
/// plain text).
fn flatten_text<'a>(nodes: &[RawNode<'a>]) -> Option<Cow<'a, str>> {
    if nodes.is_empty() {
        return Some(Cow::Borrowed(""));
    }
    if let [RawNode::Text(value)] = nodes {
        return Some(value.clone());
    }
    let mut out = String::new();
    for node in nodes {
        match node {
            RawNode::Text(value) => out.push_str(value),
            RawNode::Wikilink { text, .. } => out.push_str(text),
            RawNode::Template(_) => return None,
        }
    }
    Some(Cow::Owned(out))
}

/// Converts one top-level node of an Etymology section. Returns `None` for
/// anything other than Text/Wikilink/Template, or for a Text node whose
/// trimmed value is empty — this *is* §4.3 step 1: "top-level" here means
/// non-recursive, we never descend into a template's own parameters from
/// this function.
pub fn convert_top_level<'a>(node: &Node<'a>) -> Option<RawNode<'a>> {
    match node {
        Node::Text { value, .. } => {
            if value.trim().is_empty() {
                None
            } else {
                Some(RawNode::Text(Cow::Borrowed(value)))
            }
        }
        Node::Link { target, text, .. } => Some(RawNode::Wikilink {
            target: Cow::Borrowed(target),
            text: parse_text(text).unwrap_or(Cow::Borrowed(*target)),
        }),
        Node::Template {
            name, parameters, ..
        } => {
            let name = parse_text(name)?;
            Some(RawNode::Template(convert_template(name, parameters)))
        }
        _ => None,
    }
}

/// Converts a template invocation's parameters into owned `RawNode`
/// sequences, keyed by position or by name. A parameter with a name that
/// can't be flattened to text is dropped (it cannot participate in any
/// `key=value` dispatch downstream).
pub fn convert_template<'a>(name: Cow<'a, str>, parameters: &[Parameter<'a>]) -> EtyTemplate<'a> {
    let mut positional = vec![];
    let mut named = HashMap::new();
    for parameter in parameters {
        let value: Vec<RawNode<'a>> = parameter.value.iter().filter_map(convert_inner).collect();
        match &parameter.name {
            None => positional.push(value),
            Some(name_nodes) => {
                if let Some(key) = parse_text(name_nodes) {
                    named.insert(key, value);
                }
            }
        }
    }
    EtyTemplate {
        name,
        positional,
        named,
    }
}

/// Same cases as `convert_top_level`, but keeps empty Text nodes: a
/// parameter value of `""` is meaningful, unlike top-level whitespace-only
/// filler between templates.
fn convert_inner<'a>(node: &Node<'a>) -> Option<RawNode<'a>> {
    match node {
        Node::Text { value, .. } => Some(RawNode::Text(Cow::Borrowed(value))),
        Node::Link { target, text, .. } => Some(RawNode::Wikilink {
            target: Cow::Borrowed(target),
            text: parse_text(text).unwrap_or(Cow::Borrowed(*target)),
        }),
        Node::Template {
            name, parameters, ..
        } => {
            let name = parse_text(name)?;
            Some(RawNode::Template(convert_template(name, parameters)))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> RawNode<'static> {
        RawNode::Text(Cow::Owned(value.to_owned()))
    }

    #[test]
    fn positional_text_flattens_single_text_node() {
        let template = EtyTemplate::synthetic("inh", vec![vec![text("en")], vec![text("enm")]]);
        assert_eq!(template.positional_text(0).as_deref(), Some("en"));
        assert_eq!(template.positional_text(1).as_deref(), Some("enm"));
        assert_eq!(template.positional_text(2), None);
    }

    #[test]
    fn positional_text_none_when_value_is_a_template() {
        let inner = EtyTemplate::synthetic("m", vec![vec![text("en")], vec![text("foo")]]);
        let outer = EtyTemplate::synthetic("affix-parsed", vec![vec![RawNode::Template(inner)]]);
        assert_eq!(outer.positional_text(0), None);
        assert_eq!(outer.inner_templates(0).len(), 1);
    }
}
