//! Derive macros for refine.
//!
//! # Available Macros
//!
//! - [`Refinable`] - Register a struct's fields for dynamic filtering and sorting
//! - [`ParamEnum`] - Make a fieldless enum parseable from query parameters by member name
//!
//! Both are re-exported by the `refine` crate; depend on that rather than on
//! this crate directly.

mod attrs;
mod param_enum;
mod refinable;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Refinable` trait.
///
/// Each eligible field becomes a filter key and a sort key, and gets a name
/// constant on the struct.
///
/// # Field Kinds
///
/// The kind is inferred from the field type when possible:
///
/// | Type | Kind | Dynamic filter |
/// |------|------|----------------|
/// | `String` | `Text` | substring containment (or equality) |
/// | integer and float primitives | `Number` | equality |
/// | `bool` | `Bool` | equality |
/// | `Timestamp`, `DateTime<Utc>`, `NaiveDateTime`, `NaiveDate` | `Timestamp` | equality |
///
/// `Option<T>` fields take the kind of `T`; an empty field reads as
/// `Value::None`, matches no filter value and sorts last. Any other field is
/// left out unless annotated. Enum fields need `#[refine(Enum)]` and a
/// `ParamEnum` impl.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `Text`, `Number`, `Timestamp`, `Enum`, `Bool` | Set the kind explicitly |
/// | `ty = "..."` | Same, as a string |
/// | `skip` | Leave the field out (computed or internal data) |
/// | `rename = "..."` | Use a custom key |
///
/// # Generated Code
///
/// 1. Field name constants (e.g., `Task::TITLE`, `Task::DUE_AT`)
/// 2. `Refinable::field_value()` matching on the keys
/// 3. `Refinable::fields()` returning a static descriptor table
///
/// # Example
///
/// ```ignore
/// use refine::{ParamEnum, Refinable};
///
/// #[derive(Clone, Copy, PartialEq, PartialOrd, ParamEnum)]
/// enum Status { Pending, Active, Done }
///
/// #[derive(Refinable)]
/// struct Task {
///     title: String,
///     priority: u8,
///     #[refine(Enum)]
///     status: Status,
///     #[refine(Timestamp, rename = "due")]
///     due_at: chrono::DateTime<chrono::Utc>,
///     #[refine(skip)]
///     score: f64,
/// }
///
/// assert_eq!(Task::DUE, "due");
/// assert_eq!(Task::fields().len(), 4);
/// ```
#[proc_macro_derive(Refinable, attributes(refine))]
pub fn refinable_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    refinable::refinable_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derives `ParamEnum` and `FromParam` for a fieldless enum.
///
/// Members are parsed by exact, case-sensitive name. Discriminants are
/// declaration indexes, so `#[derive(PartialOrd)]` on the same enum agrees
/// with clause comparisons. Explicit discriminants are a compile error. The
/// type name reported by `FromParam` is the enum's name.
///
/// # Example
///
/// ```ignore
/// use refine::{FromParam, ParamEnum};
///
/// #[derive(Debug, PartialEq, ParamEnum)]
/// enum Level { Low, High }
///
/// assert_eq!(Level::from_param("High").unwrap(), Level::High);
/// assert!(Level::from_param("high").is_err());
/// assert_eq!(Level::VARIANTS, &["Low", "High"]);
/// ```
#[proc_macro_derive(ParamEnum)]
pub fn param_enum_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    param_enum::param_enum_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
