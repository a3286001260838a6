//! Query primitives - filters, sort keys, query intents and the factory that
//! maps intents to concrete filters.

mod factory;
mod filter;
mod names;
mod sort;

pub use factory::{ExpressionsFactory, ExpressionsTable};
pub use filter::Filter;
pub use names::{QueryName, UnknownQueryName};
pub use sort::{Sort, SortDirection, SortKey, SortValue};
