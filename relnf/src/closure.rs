use std::fmt;

use relnf_core::AttributeSet;

use crate::FunctionalDependency;

/// The attribute closure of a seed set under a list of functional
/// dependencies: the maximal set derivable by repeated FD application.
/// `set ⊇ seed` always holds.
#[derive(Clone, PartialEq, Eq)]
pub struct Closure {
    seed: AttributeSet,
    set: AttributeSet,
}

impl Closure {
    #[inline]
    pub fn seed(&self) -> &AttributeSet {
        &self.seed
    }

    #[inline]
    pub fn set(&self) -> &AttributeSet {
        &self.set
    }

    /// Whether the seed determines the whole universe, i.e. is a super key.
    #[inline]
    pub fn determines(&self, universe: &AttributeSet) -> bool {
        &self.set == universe
    }
}

/// Computes the closure of `seed` by fixed-point iteration: keep applying
/// every dependency whose LHS is already contained until a full pass adds
/// nothing. Terminates because the result only grows and is bounded by the
/// attribute universe.
pub fn closure_of(seed: &AttributeSet, fds: &[FunctionalDependency]) -> Closure {
    let mut set = seed.clone();
    loop {
        let mut grew = false;
        for fd in fds {
            if set.is_superset(fd.lhs()) {
                for attr in fd.rhs() {
                    grew |= set.insert(attr.clone());
                }
            }
        }
        if !grew {
            break;
        }
    }
    Closure { seed: seed.clone(), set }
}

/// Whether `e` covers `f`: every dependency of `f` is entailed by `e`.
pub fn covers(e: &[FunctionalDependency], f: &[FunctionalDependency]) -> bool {
    f.iter().all(|fd| closure_of(fd.lhs(), e).set().is_superset(fd.rhs()))
}

/// Whether two dependency sets are equivalent (they cover each other).
pub fn equivalent(e: &[FunctionalDependency], f: &[FunctionalDependency]) -> bool {
    covers(e, f) && covers(f, e)
}

impl fmt::Display for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})+ = {{{}}}", self.seed, self.set)
    }
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

#[cfg(test)]
mod tests {
    use relnf_core::Attribute;

    use super::*;

    fn set(s: &str) -> AttributeSet {
        s.split(',').map(Attribute::from).collect()
    }

    fn fds(spec: &str) -> Vec<FunctionalDependency> {
        relnf_parse::parse_dependencies(spec)
            .unwrap()
            .into_iter()
            .map(|d| FunctionalDependency::new(d.lhs, d.rhs))
            .collect()
    }

    #[test]
    fn closure_reaches_fixed_point() {
        let fds = fds("A->B;B,C->E;D,E->A");
        assert_eq!(closure_of(&set("A"), &fds).set(), &set("A,B"));
        assert_eq!(closure_of(&set("A,C"), &fds).set(), &set("A,B,C,E"));
        assert_eq!(closure_of(&set("C,D,E"), &fds).set(), &set("A,B,C,D,E"));
    }

    #[test]
    fn closure_of_superkey_is_universe() {
        let fds = fds("A->B,C,D");
        assert!(closure_of(&set("A"), &fds).determines(&set("A,B,C,D")));
    }

    #[test]
    fn closure_contains_seed() {
        let fds = fds("A->B");
        let c = closure_of(&set("C,D"), &fds);
        assert!(c.set().is_superset(c.seed()));
        assert_eq!(c.set(), &set("C,D"));
    }

    #[test]
    fn closure_monotone_in_seed() {
        let fds = fds("A->B;B->C;C,D->E");
        let small = closure_of(&set("A"), &fds);
        let large = closure_of(&set("A,D"), &fds);
        assert!(large.set().is_superset(small.set()));
    }

    #[test]
    fn closure_idempotent() {
        let fds = fds("A->B;B->C");
        let once = closure_of(&set("A"), &fds);
        let twice = closure_of(once.set(), &fds);
        assert_eq!(once.set(), twice.set());
    }

    #[test]
    fn equivalence_is_mutual_covering() {
        // {A->B, B->C} and {A->B,C, B->C} are equivalent.
        let e = fds("A->B;B->C");
        let f = fds("A->B,C;B->C");
        assert!(equivalent(&e, &f));

        let g = fds("A->B");
        let h = fds("A->C");
        assert!(!covers(&g, &h));
        assert!(!equivalent(&g, &h));
    }
}
