// crates/gazetteer-core/src/filter.rs

//! # Filter Builder
//!
//! Turns a search intent into an OGC filter tree. The trees are plain
//! values, built fresh on every call and never shared.

use crate::model::{MatchingType, SearchQuery};

/// Namespace prefix the property paths below are written in.
pub const SCHEMA_PREFIX: &str = "gn";

/// Feature identifier (`nnid`).
pub const PROPERTY_ID: &str = "gn:nnid";
/// Endonym name path.
pub const PROPERTY_NAME: &str = "gn:hatEndonym/gn:Endonym/gn:name";
/// Object type path used by the type whitelist.
pub const PROPERTY_OBJECT_TYPE: &str = "gn:hatObjektart/gn:Objektart/gn:objektart";

pub const WILDCARD: char = '*';
pub const SINGLE_CHAR: char = '?';
pub const ESCAPE_CHAR: char = '\\';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeFilter {
    pub property: String,
    pub pattern: String,
    pub wildcard: char,
    pub single_char: char,
    pub escape: char,
    pub match_case: bool,
}

impl LikeFilter {
    pub fn new(property: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            pattern: pattern.into(),
            wildcard: WILDCARD,
            single_char: SINGLE_CHAR,
            escape: ESCAPE_CHAR,
            match_case: true,
        }
    }

    pub fn case_insensitive(mut self) -> Self {
        self.match_case = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterExpression {
    Like(LikeFilter),
    Equals {
        property: String,
        literal: String,
        match_case: bool,
    },
    And(Vec<FilterExpression>),
    Or(Vec<FilterExpression>),
}

impl FilterExpression {
    pub fn equals(property: impl Into<String>, literal: impl Into<String>) -> Self {
        FilterExpression::Equals {
            property: property.into(),
            literal: literal.into(),
            match_case: true,
        }
    }

    /// Every LIKE node of the tree, depth first.
    pub fn like_filters(&self) -> Vec<&LikeFilter> {
        let mut out = Vec::new();
        self.collect_likes(&mut out);
        out
    }

    fn collect_likes<'a>(&'a self, out: &mut Vec<&'a LikeFilter>) {
        match self {
            FilterExpression::Like(like) => out.push(like),
            FilterExpression::Equals { .. } => {}
            FilterExpression::And(children) | FilterExpression::Or(children) => {
                for child in children {
                    child.collect_likes(out);
                }
            }
        }
    }
}

/// LIKE pattern for a term under the given matching mode.
///
/// Wildcards already present in `term` are passed through untouched.
pub fn search_pattern(term: &str, matching: MatchingType) -> String {
    match matching {
        MatchingType::Exact => term.to_string(),
        MatchingType::BeginsWith => format!("{term}{WILDCARD}"),
        MatchingType::Contains => format!("{WILDCARD}{term}{WILDCARD}"),
    }
}

/// Exact id lookup, still expressed as a LIKE without wildcards.
pub fn build_identity_filter(id: &str) -> FilterExpression {
    FilterExpression::Like(LikeFilter::new(PROPERTY_ID, id))
}

/// `And(Like(name), Or(Equals(type)...))`.
///
/// With no allowed types the type filter is left out and the term filter is
/// returned on its own.
pub fn build_search_filter(query: &SearchQuery) -> FilterExpression {
    let pattern = search_pattern(&query.term, query.matching());
    let term_filter =
        FilterExpression::Like(LikeFilter::new(PROPERTY_NAME, pattern).case_insensitive());

    if query.allowed_types.is_empty() {
        return term_filter;
    }

    let type_filter = FilterExpression::Or(
        query
            .allowed_types
            .iter()
            .map(|t| FilterExpression::equals(PROPERTY_OBJECT_TYPE, t.as_str()))
            .collect(),
    );

    FilterExpression::And(vec![term_filter, type_filter])
}
