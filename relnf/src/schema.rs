use std::fmt;

use itertools::Itertools;
use relnf_core::{AttributeSet, NormalForm, SmolStr};
use rustc_hash::FxHashSet;

use crate::closure::{closure_of, Closure};
use crate::fd::FunctionalDependency;
use crate::{cover, Error, Result};

/// Closure enumeration walks the power set of the attributes, so the
/// attribute count is capped.
pub const MAX_ATTRIBUTES: usize = 20;

/// A relation schema together with everything derivable from its functional
/// dependencies.
///
/// Construction runs the full analysis pipeline eagerly: attribute closures,
/// super and candidate keys, per-dependency and overall normal forms, the
/// minimal cover and its partial/full split. A `Schema` is immutable once
/// built; decomposition produces fresh children.
#[derive(Clone, Debug)]
pub struct Schema {
    name: SmolStr,
    attributes: AttributeSet,
    fds: Vec<FunctionalDependency>,
    closures: Vec<Closure>,
    super_keys: Vec<AttributeSet>,
    candidate_keys: Vec<AttributeSet>,
    key_attributes: AttributeSet,
    non_key_attributes: AttributeSet,
    essential_attributes: AttributeSet,
    non_essential_attributes: AttributeSet,
    minimal_cover: Vec<FunctionalDependency>,
    partial_fds: Vec<FunctionalDependency>,
    full_fds: Vec<FunctionalDependency>,
    normal_form: NormalForm,
}

impl Schema {
    /// Parses and analyzes a schema from a relation spec such as `R(A,B,C)`
    /// and a dependency spec such as `A->B;B->C`.
    pub fn parse(relation: &str, dependencies: &str) -> Result<Self> {
        let spec = relnf_parse::parse(relation, dependencies)?;
        let fds = spec
            .dependencies
            .into_iter()
            .map(|d| FunctionalDependency::new(d.lhs, d.rhs))
            .collect();
        Self::new(spec.name, spec.attributes, fds)
    }

    /// Validates the inputs and runs the analysis pipeline.
    pub fn new(
        name: impl Into<SmolStr>,
        attributes: AttributeSet,
        fds: Vec<FunctionalDependency>,
    ) -> Result<Self> {
        let name = name.into();
        if attributes.is_empty() {
            return Err(Error::EmptyRelation { name });
        }
        if attributes.len() > MAX_ATTRIBUTES {
            return Err(Error::TooManyAttributes {
                name,
                count: attributes.len(),
                max: MAX_ATTRIBUTES,
            });
        }
        for fd in &fds {
            if fd.lhs().is_empty() {
                return Err(Error::EmptySide { side: "left", fd: fd.to_string() });
            }
            if fd.rhs().is_empty() {
                return Err(Error::EmptySide { side: "right", fd: fd.to_string() });
            }
            for attr in fd.lhs().iter().chain(fd.rhs()) {
                if !attributes.contains(attr) {
                    return Err(Error::UnknownAttribute {
                        attribute: attr.clone(),
                        fd: fd.to_string(),
                    });
                }
            }
        }
        Ok(Self::analyze(name, attributes, fds))
    }

    #[tracing::instrument(skip_all, fields(%name, attrs = attributes.len(), fds = fds.len()))]
    fn analyze(name: SmolStr, attributes: AttributeSet, mut fds: Vec<FunctionalDependency>) -> Self {
        // An attribute is essential when no dependency ever derives it; those
        // must sit in every super key.
        let derived = fds.iter().flat_map(|fd| fd.rhs()).cloned().collect::<AttributeSet>();
        let essential_attributes = attributes.difference(&derived);
        let non_essential_attributes = attributes.difference(&essential_attributes);

        let closures = enumerate_closures(&attributes, &fds);
        let super_keys = closures
            .iter()
            .filter(|c| c.determines(&attributes))
            .map(|c| c.seed().clone())
            .collect::<Vec<_>>();
        let candidate_keys = minimize_keys(&super_keys);
        let key_attributes =
            candidate_keys.iter().fold(AttributeSet::new(), |acc, k| acc.union(k));
        let non_key_attributes = attributes.difference(&key_attributes);

        for fd in &mut fds {
            fd.classify(&candidate_keys, &non_key_attributes);
        }
        // A schema with no dependencies has nothing to violate.
        let normal_form = fds
            .iter()
            .map(FunctionalDependency::normal_form)
            .min()
            .unwrap_or(NormalForm::BoyceCodd);

        let mut minimal_cover = cover::minimal_cover(&fds);
        for fd in &mut minimal_cover {
            fd.classify(&candidate_keys, &non_key_attributes);
        }
        let (partial_fds, full_fds) = separate_fds(&minimal_cover, &fds);

        tracing::debug!(%normal_form, ?candidate_keys, "analyzed schema");
        Self {
            name,
            attributes,
            fds,
            closures,
            super_keys,
            candidate_keys,
            key_attributes,
            non_key_attributes,
            essential_attributes,
            non_essential_attributes,
            minimal_cover,
            partial_fds,
            full_fds,
            normal_form,
        }
    }

    #[inline]
    pub fn name(&self) -> &SmolStr {
        &self.name
    }

    #[inline]
    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    #[inline]
    pub fn fds(&self) -> &[FunctionalDependency] {
        &self.fds
    }

    /// Closures of every non-empty attribute subset, ordered by seed size
    /// then lexically.
    #[inline]
    pub fn closures(&self) -> &[Closure] {
        &self.closures
    }

    #[inline]
    pub fn super_keys(&self) -> &[AttributeSet] {
        &self.super_keys
    }

    #[inline]
    pub fn candidate_keys(&self) -> &[AttributeSet] {
        &self.candidate_keys
    }

    /// The first candidate key, by the smallest-then-lexical ordering.
    #[inline]
    pub fn primary_key(&self) -> &AttributeSet {
        // `candidate_keys` is never empty: the full attribute set always
        // determines itself.
        &self.candidate_keys[0]
    }

    #[inline]
    pub fn key_attributes(&self) -> &AttributeSet {
        &self.key_attributes
    }

    #[inline]
    pub fn non_key_attributes(&self) -> &AttributeSet {
        &self.non_key_attributes
    }

    #[inline]
    pub fn essential_attributes(&self) -> &AttributeSet {
        &self.essential_attributes
    }

    #[inline]
    pub fn non_essential_attributes(&self) -> &AttributeSet {
        &self.non_essential_attributes
    }

    #[inline]
    pub fn minimal_cover(&self) -> &[FunctionalDependency] {
        &self.minimal_cover
    }

    /// Cover dependencies that violate 2NF, plus those they transitively drag
    /// along (any dependency whose LHS lies in the closure of a violator's
    /// RHS).
    #[inline]
    pub fn partial_fds(&self) -> &[FunctionalDependency] {
        &self.partial_fds
    }

    #[inline]
    pub fn full_fds(&self) -> &[FunctionalDependency] {
        &self.full_fds
    }

    /// The highest tier every dependency satisfies.
    #[inline]
    pub fn normal_form(&self) -> NormalForm {
        self.normal_form
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.attributes)
    }
}

/// Computes the closure of every non-empty attribute subset by iterating a
/// bitmask; bit `i` selects the `i`th attribute in canonical order.
fn enumerate_closures(attributes: &AttributeSet, fds: &[FunctionalDependency]) -> Vec<Closure> {
    let attrs = attributes.as_slice();
    let n = attrs.len();
    let mut closures = Vec::with_capacity((1usize << n) - 1);
    for mask in 1usize..1 << n {
        let seed = attrs
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, a)| a.clone())
            .collect::<AttributeSet>();
        closures.push(closure_of(&seed, fds));
    }
    closures.sort_by(|a, b| {
        (a.seed().len(), a.seed()).cmp(&(b.seed().len(), b.seed()))
    });
    closures
}

/// Greedily filters the (size-then-lexically sorted) super keys down to the
/// minimal ones: a super key survives only if it contains no already-accepted
/// key.
fn minimize_keys(super_keys: &[AttributeSet]) -> Vec<AttributeSet> {
    let mut keys = Vec::<AttributeSet>::new();
    for sk in super_keys {
        if !keys.iter().any(|k| sk.is_superset(k)) {
            keys.push(sk.clone());
        }
    }
    keys
}

/// Splits the classified minimal cover into partial and full dependencies.
/// A 2NF violator is partial, and so is every dependency whose LHS falls
/// inside the closure of a violator's RHS.
fn separate_fds(
    cover: &[FunctionalDependency],
    fds: &[FunctionalDependency],
) -> (Vec<FunctionalDependency>, Vec<FunctionalDependency>) {
    let mut partial = FxHashSet::default();
    let mut full = cover.to_vec();
    for fd in cover {
        if fd.normal_form() < NormalForm::Second {
            let dragged = closure_of(fd.rhs(), fds);
            full.retain(|f| {
                let drop = f == fd || dragged.set().is_superset(f.lhs());
                if drop {
                    partial.insert(f.clone());
                }
                !drop
            });
            partial.insert(fd.clone());
        }
    }
    (partial.into_iter().sorted().collect(), full)
}

#[cfg(test)]
mod tests {
    use relnf_core::Attribute;

    use super::*;

    fn set(s: &str) -> AttributeSet {
        s.split(',').map(Attribute::from).collect()
    }

    fn schema(relation: &str, dependencies: &str) -> Schema {
        Schema::parse(relation, dependencies).unwrap()
    }

    #[test]
    fn candidate_keys_are_minimal_super_keys() {
        let s = schema("R(A,B,C,D)", "A->B,C,D;B,C->A,D;D->B");
        assert_eq!(s.candidate_keys(), &[set("A"), set("B,C"), set("C,D")]);
        assert_eq!(s.primary_key(), &set("A"));
        assert!(s.super_keys().contains(&set("A,B,C,D")));
        assert_eq!(s.non_key_attributes(), &AttributeSet::new());
    }

    #[test]
    fn transitive_prime_dependency_caps_at_3nf() {
        // D -> B has a non-key determinant but a prime RHS.
        let s = schema("R(A,B,C,D)", "A->B,C,D;B,C->A,D;D->B");
        assert_eq!(s.normal_form(), NormalForm::Third);
    }

    #[test]
    fn composite_key_with_prime_rhs_is_3nf() {
        let s = schema("R(A,B,C)", "A,B->C;C->B");
        assert_eq!(s.candidate_keys(), &[set("A,B"), set("A,C")]);
        assert_eq!(s.normal_form(), NormalForm::Third);
    }

    #[test]
    fn partial_dependency_is_separated() {
        let s = schema("R(P,C,L,A,Q,T)", "P->C,L,A,Q,T;C,L->P,A,Q,T;C->T;A->Q");
        assert_eq!(s.candidate_keys(), &[set("P"), set("C,L")]);
        assert_eq!(s.normal_form(), NormalForm::First);
        assert_eq!(s.partial_fds().len(), 1);
        assert_eq!(s.partial_fds()[0].lhs(), &set("C"));
        assert_eq!(s.partial_fds()[0].rhs(), &set("T"));
        assert_eq!(s.full_fds().len(), s.minimal_cover().len() - 1);
    }

    #[test]
    fn essential_attributes_never_derived() {
        let s = schema("R(A,B,C,D,E)", "A->B;B,C->E;D,E->A");
        assert_eq!(s.essential_attributes(), &set("C,D"));
        assert_eq!(s.non_essential_attributes(), &set("A,B,E"));
    }

    #[test]
    fn every_super_key_closure_is_the_universe() {
        let s = schema("R(A,B,C,D,E)", "A->B;B,C->E;D,E->A");
        for key in s.super_keys() {
            let c = closure_of(key, s.fds());
            assert_eq!(c.set(), s.attributes());
        }
    }

    #[test]
    fn no_dependencies_means_bcnf() {
        let s = schema("R(A,B,C)", "");
        assert_eq!(s.normal_form(), NormalForm::BoyceCodd);
        assert_eq!(s.candidate_keys(), &[set("A,B,C")]);
        assert!(s.minimal_cover().is_empty());
    }

    #[test]
    fn unknown_attribute_is_rejected() {
        let err = Schema::parse("R(A,B)", "A->C").unwrap_err();
        assert!(matches!(err, Error::UnknownAttribute { .. }));
    }

    #[test]
    fn empty_relation_is_rejected() {
        let err = Schema::parse("R()", "").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn display_round_trips_the_relation_spec() {
        let s = schema("Student(Name,Id,Dept)", "Id->Name,Dept");
        assert_eq!(s.to_string(), "Student(Dept,Id,Name)");
    }
}
