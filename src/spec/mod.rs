//! Specifications - reusable, composable query objects.
//!
//! A `Specification<D>` is anything that can turn itself into a `Filter<D>`.
//! Specifications compose with `and`, `or` and `not` (from `SpecificationExt`)
//! into a `Spec<D>` tree, which compiles back down to a single filter.
//!
//! ## Example
//!
//! ```ignore
//! struct Named(String);
//!
//! impl Specification<Vehicle> for Named {
//!     fn as_filter(&self) -> Filter<Vehicle> {
//!         let name = self.0.clone();
//!         Filter::new(move |v: &Vehicle| v.name == name)
//!     }
//! }
//!
//! let spec = Named("a".into()).or(Named("b".into())).not();
//! let vehicle = repo.get_by(&spec, &cancel).await?;
//! ```

mod sort;

use std::fmt;

use crate::query::Filter;

pub use sort::{SortBy, SortSpecification};

/// A query object convertible to a primitive filter.
pub trait Specification<D>: Send + Sync {
    fn as_filter(&self) -> Filter<D>;

    /// Evaluate the specification against one document.
    fn is_satisfied_by(&self, document: &D) -> bool {
        self.as_filter().matches(document)
    }

    /// Lift into a composite tree node.
    fn into_spec(self) -> Spec<D>
    where
        Self: Sized,
    {
        Spec::Leaf(self.as_filter())
    }
}

/// Composite specification tree.
pub enum Spec<D> {
    Leaf(Filter<D>),
    And(Box<Spec<D>>, Box<Spec<D>>),
    Or(Box<Spec<D>>, Box<Spec<D>>),
    Not(Box<Spec<D>>),
}

impl<D> Clone for Spec<D> {
    fn clone(&self) -> Self {
        match self {
            Spec::Leaf(filter) => Spec::Leaf(filter.clone()),
            Spec::And(left, right) => Spec::And(left.clone(), right.clone()),
            Spec::Or(left, right) => Spec::Or(left.clone(), right.clone()),
            Spec::Not(inner) => Spec::Not(inner.clone()),
        }
    }
}

impl<D> fmt::Debug for Spec<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Spec::Leaf(_) => f.write_str("Leaf"),
            Spec::And(left, right) => f.debug_tuple("And").field(left).field(right).finish(),
            Spec::Or(left, right) => f.debug_tuple("Or").field(left).field(right).finish(),
            Spec::Not(inner) => f.debug_tuple("Not").field(inner).finish(),
        }
    }
}

impl<D: 'static> Spec<D> {
    /// Fold the tree into one filter.
    pub fn compile(&self) -> Filter<D> {
        match self {
            Spec::Leaf(filter) => filter.clone(),
            Spec::And(left, right) => {
                let (left, right) = (left.compile(), right.compile());
                Filter::new(move |document| left.matches(document) && right.matches(document))
            }
            Spec::Or(left, right) => {
                let (left, right) = (left.compile(), right.compile());
                Filter::new(move |document| left.matches(document) || right.matches(document))
            }
            Spec::Not(inner) => {
                let inner = inner.compile();
                Filter::new(move |document| !inner.matches(document))
            }
        }
    }
}

impl<D: 'static> Specification<D> for Spec<D> {
    fn as_filter(&self) -> Filter<D> {
        self.compile()
    }

    fn into_spec(self) -> Spec<D> {
        self
    }
}

impl<D> Specification<D> for Filter<D> {
    fn as_filter(&self) -> Filter<D> {
        self.clone()
    }
}

/// Combinators available on every specification.
pub trait SpecificationExt<D>: Specification<D> + Sized {
    fn and<S: Specification<D>>(self, other: S) -> Spec<D> {
        Spec::And(Box::new(self.into_spec()), Box::new(other.into_spec()))
    }

    fn or<S: Specification<D>>(self, other: S) -> Spec<D> {
        Spec::Or(Box::new(self.into_spec()), Box::new(other.into_spec()))
    }

    fn not(self) -> Spec<D> {
        Spec::Not(Box::new(self.into_spec()))
    }
}

impl<D, S: Specification<D>> SpecificationExt<D> for S {}
