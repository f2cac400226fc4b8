#![deny(rust_2018_idioms)]

//! Parsing for the textual relation grammar.
//!
//! A relation spec is `R(A,B,C)`; a dependency spec is a semicolon-separated
//! list of `LHS->RHS` pairs whose sides are comma-separated attribute names,
//! e.g. `A,B->C,D;C->B`.

use relnf_core::{Attribute, AttributeSet, SmolStr};
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed relation spec `{input}`, expected `R(A,B,...)`")]
    MalformedRelation { input: String },

    #[error("relation spec `{input}` declares no attributes")]
    EmptyRelation { input: String },

    #[error("malformed functional dependency `{fragment}`, expected `LHS->RHS`")]
    MalformedDependency { fragment: String },

    #[error("functional dependency `{fragment}` has an empty {side}-hand side")]
    EmptySide { side: &'static str, fragment: String },
}

/// A parsed relation header plus its dependency list, ready to be handed to
/// the schema constructor. Attribute membership is *not* checked here; the
/// constructor owns that invariant.
#[derive(Debug, Clone)]
pub struct RelationSpec {
    pub name: SmolStr,
    pub attributes: AttributeSet,
    pub dependencies: Vec<DependencySpec>,
}

/// One `LHS->RHS` pair. Sides are canonically sorted and deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySpec {
    pub lhs: AttributeSet,
    pub rhs: AttributeSet,
}

pub fn parse(relation: &str, dependencies: &str) -> Result<RelationSpec> {
    let (name, attributes) = parse_relation(relation)?;
    let dependencies = parse_dependencies(dependencies)?;
    Ok(RelationSpec { name, attributes, dependencies })
}

/// Parses `R(A,B,C)` into the relation name and its attribute universe.
pub fn parse_relation(input: &str) -> Result<(SmolStr, AttributeSet)> {
    let malformed = || Error::MalformedRelation { input: input.to_string() };

    let input = input.trim();
    let open = input.find('(').ok_or_else(malformed)?;
    let body = input.strip_suffix(')').ok_or_else(malformed)?;
    let (name, attrs) = (&input[..open], &body[open + 1..]);
    if name.is_empty() || attrs.contains(['(', ')']) {
        return Err(malformed());
    }

    let attributes = attr_list(attrs);
    if attributes.is_empty() {
        return Err(Error::EmptyRelation { input: input.to_string() });
    }

    Ok((SmolStr::new(name), attributes))
}

/// Parses a `;`-separated dependency list. An empty (or all-whitespace) input
/// is a relation without declared dependencies, not an error.
pub fn parse_dependencies(input: &str) -> Result<Vec<DependencySpec>> {
    input
        .split(';')
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(parse_dependency)
        .collect()
}

fn parse_dependency(fragment: &str) -> Result<DependencySpec> {
    let (lhs, rhs) = fragment
        .split_once("->")
        .ok_or_else(|| Error::MalformedDependency { fragment: fragment.to_string() })?;

    let empty = |side| Error::EmptySide { side, fragment: fragment.to_string() };
    let lhs = attr_list(lhs);
    if lhs.is_empty() {
        return Err(empty("left"));
    }
    let rhs = attr_list(rhs);
    if rhs.is_empty() {
        return Err(empty("right"));
    }

    Ok(DependencySpec { lhs, rhs })
}

fn attr_list(s: &str) -> AttributeSet {
    s.split(',').map(str::trim).filter(|s| !s.is_empty()).map(Attribute::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_relation_header() {
        let (name, attrs) = parse_relation("R(A,B,C,D)").unwrap();
        assert_eq!(name, "R");
        assert_eq!(attrs.to_string(), "A,B,C,D");

        let (name, attrs) = parse_relation("Enrolment( S , C )").unwrap();
        assert_eq!(name, "Enrolment");
        assert_eq!(attrs.to_string(), "C,S");
    }

    #[test]
    fn reject_malformed_relation() {
        assert!(matches!(parse_relation("R A,B"), Err(Error::MalformedRelation { .. })));
        assert!(matches!(parse_relation("(A,B)"), Err(Error::MalformedRelation { .. })));
        assert!(matches!(parse_relation("R(A,B"), Err(Error::MalformedRelation { .. })));
        assert!(matches!(parse_relation("R()"), Err(Error::EmptyRelation { .. })));
    }

    #[test]
    fn parse_dependency_list() {
        let deps = parse_dependencies("A,B->C,D;C->B").unwrap();
        assert_eq!(deps.len(), 2);
        assert_eq!(deps[0].lhs.to_string(), "A,B");
        assert_eq!(deps[0].rhs.to_string(), "C,D");
        assert_eq!(deps[1].lhs.to_string(), "C");
        assert_eq!(deps[1].rhs.to_string(), "B");
    }

    #[test]
    fn empty_dependency_input_is_no_dependencies() {
        assert!(parse_dependencies("").unwrap().is_empty());
        assert!(parse_dependencies("  ; ;").unwrap().is_empty());
    }

    #[test]
    fn reject_malformed_dependencies() {
        let err = parse_dependencies("A,B").unwrap_err();
        assert!(matches!(err, Error::MalformedDependency { ref fragment } if fragment == "A,B"));

        assert!(matches!(
            parse_dependencies("->B"),
            Err(Error::EmptySide { side: "left", .. })
        ));
        assert!(matches!(
            parse_dependencies("A->"),
            Err(Error::EmptySide { side: "right", .. })
        ));
    }
}
