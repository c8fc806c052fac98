//! Refine - filtering, sorting and paging of typed collections driven by
//! request query parameters.
//!
//! Refine sits between an inbound request and a data source. It takes the
//! untyped key/value pairs of a query string and turns them into:
//!
//! - a composed filter predicate over your entity type
//! - a resolved sort order and the slice for the requested page
//! - a [`PageSummary`] describing where that page sits in the full result
//!
//! # Quick Start
//!
//! ```rust
//! use refine::{
//!     FilterRegistry, Pager, PagingParams, ParamEnum, Params, Refinable, SortRegistry,
//!     TypedFilter,
//! };
//!
//! #[derive(Debug, Clone, Copy, PartialEq, PartialOrd, ParamEnum)]
//! enum Priority {
//!     Low,
//!     Normal,
//!     Urgent,
//! }
//!
//! #[derive(Debug, Refinable)]
//! struct Task {
//!     id: u32,
//!     title: String,
//!     #[refine(Enum)]
//!     priority: Priority,
//! }
//!
//! let tasks = vec![
//!     Task { id: 1, title: "Write docs".into(), priority: Priority::Normal },
//!     Task { id: 2, title: "Fix crash".into(), priority: Priority::Urgent },
//!     Task { id: 3, title: "Fix typo".into(), priority: Priority::Low },
//! ];
//!
//! // Every field is a filter key, plus one computed filter.
//! let filters = FilterRegistry::<Task>::new()
//!     .with(
//!         "at_least",
//!         TypedFilter::closure(|min: Priority| move |t: &Task| t.priority >= min).with_values(true),
//!     )
//!     .with_dynamic_fields();
//!
//! let params = Params::new()
//!     .with("title", "Fix")
//!     .with("at_least", "Normal")
//!     .with("pageSize", "10");
//!
//! let filtered = filters.filter(tasks, &params).unwrap();
//!
//! let pager = Pager::new(
//!     PagingParams::from_params(&params).unwrap(),
//!     SortRegistry::<Task>::new().with_default(Task::ID),
//! );
//! let (page, summary) = pager.paginate(filtered).unwrap();
//!
//! assert_eq!(page.len(), 1);
//! assert_eq!(page[0].id, 2);
//! assert_eq!(summary.results_count, 1);
//! ```
//!
//! # Filter Semantics
//!
//! ```text
//! match = AND over incoming keys with a registered filter
//!         (OR over the values sent for that key)
//! ```
//!
//! - Keys are exact and case-sensitive; unregistered keys are ignored.
//! - Dynamic text filters test substring containment, everything else equality.
//! - Values are converted to the filter's type first; a bad value fails the
//!   whole call with [`RefineError::Conversion`].
//!
//! # Paging Semantics
//!
//! - A blank or absent `sortBy` uses the [`DEFAULT_SORT_KEY`] ordering.
//! - An unknown sort key is [`RefineError::SortKeyNotFound`], unless dynamic
//!   paging maps it to a field.
//! - `pageSize = 0` returns every record, sorted.
//!
//! # Value Types and Operators
//!
//! | Type | Operators |
//! |------|-----------|
//! | String | `Eq`, `Contains`, `Gt`, `Gte`, `Lt`, `Lte` |
//! | Number | `Eq`, `Gt`, `Gte`, `Lt`, `Lte` |
//! | Timestamp | `Eq`, `Gt`, `Gte`, `Lt`, `Lte` |
//! | Enum | `Eq`, `Gt`, `Gte`, `Lt`, `Lte` |
//! | Bool | `Eq` |

// Lets the derive macros' `::refine::` paths resolve inside this crate.
extern crate self as refine;

mod clause;
mod collection;
mod convert;
mod error;
mod filter;
mod op;
mod paging;
mod params;
mod predicate;
mod sort;
mod source;
mod traits;
mod value;

pub use clause::{Clause, ClauseValue};
pub use collection::{Collection, CollectionPage};
pub use convert::{parse_datetime, parse_enum, FromParam, ParamEnum, ParamKind};
pub use error::{RefineError, Result};
pub use filter::{
    DynamicFilter, FilterDefinition, FilterRegistry, SupportedFilterProperty, SupportedValue,
    TypedFilter, ENUM_TYPE_NAME,
};
pub use op::Op;
pub use paging::{PageSummary, Pager, PagingParams};
pub use params::Params;
pub use predicate::Predicate;
pub use sort::{compare_values, Dir, SortExpr, SortRegistry, DEFAULT_SORT_KEY};
pub use source::Source;
pub use traits::{FieldDescriptor, Refinable, ToTimestamp};
pub use value::{Number, Timestamp, Value};

pub use refine_macros::{ParamEnum, Refinable};
