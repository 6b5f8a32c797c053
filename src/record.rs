// Copyright 2024 the wikt-etymology contributors.
// This is free software distributed under the terms specified in
// the file LICENSE at the top-level directory of this distribution.

//! The output data model: etymology edges and the closed set of relation kinds.

use serde::Serialize;

/// One extracted etymological claim: "term in language L has relation R to
/// term T in language L', optionally with ordinal position, optionally
/// parented to another edge."
///
/// Field order matches the CSV output contract exactly (see `csv_sink`).
#[derive(Debug, Clone, Serialize)]
pub struct EtymologyEdge {
    /// Stable identifier of the subject term, derived from `(lang, term)`.
    pub term_id: String,
    /// The subject term's language (short code).
    pub lang: String,
    /// The subject term's written form.
    pub term: String,
    /// The relation this edge claims (I1).
    pub reltype: RelType,
    /// Stable identifier of the related term, when both its language and
    /// form are known.
    pub related_term_id: Option<String>,
    /// The related term's language, resolved to its canonical name (I6).
    pub related_lang: Option<String>,
    /// The related term's written form.
    pub related_term: Option<String>,
    /// Ordinal position within a multi-part relation; 0 when irrelevant.
    pub position: u32,
    /// Present only on a synthetic group-parent header (I2).
    pub group_tag: Option<String>,
    /// Points at a parent edge's `group_tag`, if this edge belongs to a group.
    pub parent_tag: Option<String>,
    /// This edge's ordinal position within its parent group.
    pub parent_position: Option<i64>,
}

impl EtymologyEdge {
    /// (I5) An edge is emitted iff it is valid: `related_term` absent or not
    /// in `{"", "-"}`. Group parents (no `related_term`) are exempt.
    pub fn is_valid(&self) -> bool {
        match &self.related_term {
            None => true,
            Some(term) => term != "" && term != "-",
        }
    }

    /// Whether this edge is a group-parent header rather than a claim (I2).
    pub fn is_group_parent(&self) -> bool {
        self.group_tag.is_some()
    }
}

/// The closed set of relation kinds a [`EtymologyEdge`] can carry (I1).
///
/// Serializes to the exact lowercase/underscore/hyphen spellings used by
/// downstream consumers; `back-formation_from` and
/// `phono-semantic_matching_of` keep their hyphen verbatim, matching the
/// upstream corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RelType {
    /// Inherited from
    #[serde(rename = "inherited_from")]
    InheritedFrom,
    /// Derived from
    #[serde(rename = "derived_from")]
    DerivedFrom,
    /// Borrowed from
    #[serde(rename = "borrowed_from")]
    BorrowedFrom,
    /// Learned borrowing from
    #[serde(rename = "learned_borrowing_from")]
    LearnedBorrowingFrom,
    /// Orthographic borrowing from
    #[serde(rename = "orthographic_borrowing_from")]
    OrthographicBorrowingFrom,
    /// Has PIE root
    #[serde(rename = "has_pie_root")]
    HasPieRoot,
    /// Has affix
    #[serde(rename = "has_affix")]
    HasAffix,
    /// Has prefix
    #[serde(rename = "has_prefix")]
    HasPrefix,
    /// Has prefix with root
    #[serde(rename = "has_prefix_with_root")]
    HasPrefixWithRoot,
    /// Has suffix
    #[serde(rename = "has_suffix")]
    HasSuffix,
    /// Has confix
    #[serde(rename = "has_confix")]
    HasConfix,
    /// Compound of
    #[serde(rename = "compound_of")]
    CompoundOf,
    /// Blend of
    #[serde(rename = "blend_of")]
    BlendOf,
    /// Clipping of
    #[serde(rename = "clipping_of")]
    ClippingOf,
    /// Back-formation from
    #[serde(rename = "back-formation_from")]
    BackFormationFrom,
    /// Doublet with
    #[serde(rename = "doublet_with")]
    DoubletWith,
    /// Is onomatopoeic
    #[serde(rename = "is_onomatopoeic")]
    IsOnomatopoeic,
    /// Calque of
    #[serde(rename = "calque_of")]
    CalqueOf,
    /// Semantic loan of
    #[serde(rename = "semantic_loan_of")]
    SemanticLoanOf,
    /// Named after
    #[serde(rename = "named_after")]
    NamedAfter,
    /// Phono-semantic matching of
    #[serde(rename = "phono-semantic_matching_of")]
    PhonoSemanticMatchingOf,
    /// Etymologically related to
    #[serde(rename = "etymologically_related_to")]
    EtymologicallyRelatedTo,
    /// Cognate of
    #[serde(rename = "cognate_of")]
    CognateOf,
    /// Group-parent header for an unnested `affix-parsed` group.
    #[serde(rename = "group_affix_root")]
    GroupAffixRoot,
    /// Group-parent header for an unnested `related-parsed` group.
    #[serde(rename = "group_related_root")]
    GroupRelatedRoot,
    /// Group-parent header for an unnested `from-parsed` group.
    #[serde(rename = "group_derived_root")]
    GroupDerivedRoot,
}

impl RelType {
    /// The group-parent kind a virtual group template produces (§4.4).
    pub fn is_group_kind(self) -> bool {
        matches!(
            self,
            RelType::GroupAffixRoot | RelType::GroupRelatedRoot | RelType::GroupDerivedRoot
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(related_term: Option<&str>, group_tag: Option<&str>) -> EtymologyEdge {
        EtymologyEdge {
            term_id: "t".into(),
            lang: "en".into(),
            term: "water".into(),
            reltype: RelType::InheritedFrom,
            related_term_id: None,
            related_lang: None,
            related_term: related_term.map(str::to_owned),
            position: 0,
            group_tag: group_tag.map(str::to_owned),
            parent_tag: None,
            parent_position: None,
        }
    }

    #[test]
    fn rejects_empty_and_dash_related_term() {
        assert!(!edge(Some(""), None).is_valid());
        assert!(!edge(Some("-"), None).is_valid());
        assert!(edge(Some("aqua"), None).is_valid());
    }

    #[test]
    fn group_parent_exempt_from_related_term_requirement() {
        assert!(edge(None, Some("group-1")).is_valid());
        assert!(edge(None, Some("group-1")).is_group_parent());
    }
}
