use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use relnf_core::{AttributeSet, NormalForm};

/// A functional dependency `X -> Y` together with the normal-form tier it has
/// been verified to satisfy.
///
/// Equality, ordering and hashing look at `lhs`/`rhs` only; the tier is a
/// derived annotation. The tier starts at 1NF and is only ever raised by
/// [`classify`](Self::classify), never lowered.
#[derive(Clone)]
pub struct FunctionalDependency {
    lhs: AttributeSet,
    rhs: AttributeSet,
    normal_form: NormalForm,
}

impl FunctionalDependency {
    pub fn new(lhs: AttributeSet, rhs: AttributeSet) -> Self {
        Self { lhs, rhs, normal_form: NormalForm::First }
    }

    #[inline]
    pub fn lhs(&self) -> &AttributeSet {
        &self.lhs
    }

    #[inline]
    pub fn rhs(&self) -> &AttributeSet {
        &self.rhs
    }

    #[inline]
    pub fn normal_form(&self) -> NormalForm {
        self.normal_form
    }

    /// The dependency's attributes, `lhs ∪ rhs`.
    pub fn attributes(&self) -> AttributeSet {
        self.lhs.union(&self.rhs)
    }

    #[inline]
    pub fn has_multivalued_rhs(&self) -> bool {
        self.rhs.len() > 1
    }

    #[inline]
    pub fn in_bcnf(&self) -> bool {
        self.normal_form.is_bcnf()
    }

    /// A copy with the tier reset to 1NF, for handing to a child schema that
    /// will classify it against its own keys.
    pub fn reset(&self) -> Self {
        Self::new(self.lhs.clone(), self.rhs.clone())
    }

    /// Determines the dependency's normal form relative to the given key
    /// structure, raising the tier one verified level at a time:
    ///
    /// - 2NF unless the LHS is a partial key and the RHS reaches outside the
    ///   key attributes (a non-prime attribute depending on part of a key);
    /// - 3NF if the LHS or the RHS is a full candidate key, or the RHS is a
    ///   partial key that is not entirely non-key;
    /// - BCNF iff the LHS is a full candidate key.
    pub fn classify(&mut self, candidate_keys: &[AttributeSet], non_key: &AttributeSet) {
        let violates_2nf = is_partial_key(&self.lhs, candidate_keys)
            && self.rhs.iter().any(|a| non_key.contains(a));
        if !violates_2nf {
            self.raise(NormalForm::Second);
        }

        if self.normal_form >= NormalForm::Second {
            let rhs_prime_part = is_partial_key(&self.rhs, candidate_keys)
                && !self.rhs.iter().all(|a| non_key.contains(a));
            if is_full_key(&self.lhs, candidate_keys)
                || is_full_key(&self.rhs, candidate_keys)
                || rhs_prime_part
            {
                self.raise(NormalForm::Third);
            }
        }

        if self.normal_form >= NormalForm::Third && is_full_key(&self.lhs, candidate_keys) {
            self.raise(NormalForm::BoyceCodd);
        }
    }

    fn raise(&mut self, to: NormalForm) {
        self.normal_form = self.normal_form.max(to);
    }
}

fn is_full_key(attrs: &AttributeSet, candidate_keys: &[AttributeSet]) -> bool {
    candidate_keys.iter().any(|k| k == attrs)
}

fn is_partial_key(attrs: &AttributeSet, candidate_keys: &[AttributeSet]) -> bool {
    candidate_keys.iter().any(|k| attrs.is_proper_subset(k))
}

impl PartialEq for FunctionalDependency {
    fn eq(&self, other: &Self) -> bool {
        self.lhs == other.lhs && self.rhs == other.rhs
    }
}

impl Eq for FunctionalDependency {}

impl Hash for FunctionalDependency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lhs.hash(state);
        self.rhs.hash(state);
    }
}

impl PartialOrd for FunctionalDependency {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FunctionalDependency {
    fn cmp(&self, other: &Self) -> Ordering {
        self.lhs.cmp(&other.lhs).then_with(|| self.rhs.cmp(&other.rhs))
    }
}

impl fmt::Display for FunctionalDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}} -> {{{}}}", self.lhs, self.rhs)
    }
}

impl fmt::Debug for FunctionalDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}
