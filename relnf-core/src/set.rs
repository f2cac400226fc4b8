use std::fmt;

use itertools::Itertools;

use crate::Attribute;

/// An ordered set of attributes, kept sorted by name.
///
/// The sorted representation makes the canonical string form (`A,B,C`) and the
/// derived lexical `Ord` deterministic, which everything downstream (closure
/// listings, key ordering, cover reduction order) relies on.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeSet {
    attrs: Vec<Attribute>,
}

impl AttributeSet {
    #[inline]
    pub fn new() -> Self {
        Self { attrs: Vec::new() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.attrs.iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Attribute] {
        &self.attrs
    }

    #[inline]
    pub fn contains(&self, attr: &Attribute) -> bool {
        self.attrs.binary_search(attr).is_ok()
    }

    /// Inserts `attr` at its sorted position; no-op if already present.
    pub fn insert(&mut self, attr: Attribute) -> bool {
        match self.attrs.binary_search(&attr) {
            Ok(_) => false,
            Err(idx) => {
                self.attrs.insert(idx, attr);
                true
            }
        }
    }

    pub fn is_superset(&self, other: &Self) -> bool {
        other.iter().all(|a| self.contains(a))
    }

    #[inline]
    pub fn is_subset(&self, other: &Self) -> bool {
        other.is_superset(self)
    }

    /// `self ⊂ other` (subset but not equal).
    #[inline]
    pub fn is_proper_subset(&self, other: &Self) -> bool {
        self.is_subset(other) && self != other
    }

    pub fn union(&self, other: &Self) -> Self {
        let mut attrs = self.clone();
        for a in other.iter() {
            attrs.insert(a.clone());
        }
        attrs
    }

    pub fn difference(&self, other: &Self) -> Self {
        self.iter().filter(|a| !other.contains(a)).cloned().collect()
    }

    pub fn intersection(&self, other: &Self) -> Self {
        self.iter().filter(|a| other.contains(a)).cloned().collect()
    }

    pub fn extend(&mut self, other: &Self) {
        for a in other.iter() {
            self.insert(a.clone());
        }
    }
}

impl fmt::Display for AttributeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.attrs.iter().join(","))
    }
}

impl fmt::Debug for AttributeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{self}}}")
    }
}

impl FromIterator<Attribute> for AttributeSet {
    fn from_iter<T: IntoIterator<Item = Attribute>>(iter: T) -> Self {
        let mut set = Self::new();
        for attr in iter {
            set.insert(attr);
        }
        set
    }
}

impl<'a> IntoIterator for &'a AttributeSet {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.attrs.iter()
    }
}

impl IntoIterator for AttributeSet {
    type Item = Attribute;
    type IntoIter = std::vec::IntoIter<Attribute>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.attrs.into_iter()
    }
}

impl From<Vec<Attribute>> for AttributeSet {
    fn from(attrs: Vec<Attribute>) -> Self {
        attrs.into_iter().collect()
    }
}
