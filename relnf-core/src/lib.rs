#![deny(rust_2018_idioms)]

mod set;

use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

pub use smol_str::SmolStr;

pub use self::set::AttributeSet;

/// A named column of a relation schema. Equality and ordering are by name.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Attribute {
    name: SmolStr,
}

impl Attribute {
    #[inline]
    pub const fn new_inline(s: &str) -> Self {
        Self { name: SmolStr::new_inline(s) }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.name.as_str()
    }

    #[inline]
    pub fn into_inner(self) -> SmolStr {
        self.name
    }
}

impl FromStr for Attribute {
    type Err = std::convert::Infallible;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.into())
    }
}

impl PartialEq<&str> for Attribute {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.name == *other
    }
}

impl From<Attribute> for String {
    #[inline]
    fn from(value: Attribute) -> Self {
        value.name.into()
    }
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for Attribute {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name.fmt(f)
    }
}

impl Deref for Attribute {
    type Target = str;

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.name.deref()
    }
}

impl<S> From<S> for Attribute
where
    S: AsRef<str>,
{
    fn from(s: S) -> Self {
        Self { name: SmolStr::new(s.as_ref().trim()) }
    }
}

impl Borrow<str> for Attribute {
    fn borrow(&self) -> &str {
        self.name.as_ref()
    }
}

/// Normal-form tier of a functional dependency or a whole schema.
///
/// The derived ordering follows the tier hierarchy, so `nf >= NormalForm::Third`
/// reads as "at least 3NF".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NormalForm {
    First,
    Second,
    Third,
    BoyceCodd,
}

impl NormalForm {
    #[inline]
    pub fn is_bcnf(self) -> bool {
        self >= NormalForm::BoyceCodd
    }
}

impl fmt::Display for NormalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalForm::First => write!(f, "1NF"),
            NormalForm::Second => write!(f, "2NF"),
            NormalForm::Third => write!(f, "3NF"),
            NormalForm::BoyceCodd => write!(f, "BCNF"),
        }
    }
}
