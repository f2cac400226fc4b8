#![deny(rust_2018_idioms)]

//! Relational-schema analysis: attribute closures, candidate keys, normal
//! forms, minimal covers and stepwise decomposition towards BCNF.
//!
//! The entire pipeline runs eagerly when a [`Schema`] is constructed; all
//! derived data is available behind accessors afterwards. Decomposition
//! produces fresh child schemas and never touches the parent.

mod closure;
mod cover;
mod decompose;
mod fd;
pub mod report;
mod schema;

use thiserror::Error;

pub use relnf_core::{Attribute, AttributeSet, NormalForm, SmolStr};

pub use self::closure::{closure_of, covers, equivalent, Closure};
pub use self::cover::minimal_cover;
pub use self::decompose::{decompose, normalize, to_2nf, to_3nf, to_bcnf};
pub use self::fd::FunctionalDependency;
pub use self::schema::{Schema, MAX_ATTRIBUTES};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] relnf_parse::Error),

    #[error("functional dependency `{fd}` references attribute `{attribute}` outside the relation")]
    UnknownAttribute { attribute: Attribute, fd: String },

    #[error("functional dependency `{fd}` has an empty {side}-hand side")]
    EmptySide { side: &'static str, fd: String },

    #[error("relation `{name}` has no attributes")]
    EmptyRelation { name: SmolStr },

    #[error("relation `{name}` has {count} attributes; closure enumeration supports at most {max}")]
    TooManyAttributes { name: SmolStr, count: usize, max: usize },
}
