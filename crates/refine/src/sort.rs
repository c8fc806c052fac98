//! Sort keys and the registry resolving them.
//!
//! A sort key resolves to a [`SortExpr`]: either a field read through
//! [`Refinable::field_value`] or an arbitrary projection of the entity, such
//! as a derived number. The reserved key [`DEFAULT_SORT_KEY`] is used when a
//! request names no sort key.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{RefineError, Result};
use crate::traits::Refinable;
use crate::value::Value;

/// Key of the ordering used when no sort key is requested.
pub const DEFAULT_SORT_KEY: &str = "Default";

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Direction for a `desc` flag.
    pub fn from_desc(desc: bool) -> Self {
        if desc {
            Dir::Desc
        } else {
            Dir::Asc
        }
    }

    pub fn is_desc(self) -> bool {
        matches!(self, Dir::Desc)
    }

    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Compares two values for sorting.
///
/// `None` sorts last. Mismatched types and NaN compare equal, which keeps
/// their input order under a stable sort.
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Ordering {
    match (a, b) {
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => a.compare(*b).unwrap_or(Ordering::Equal),
        (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
        (Value::Enum(a), Value::Enum(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),

        (Value::None, Value::None) => Ordering::Equal,
        (Value::None, _) => Ordering::Greater,
        (_, Value::None) => Ordering::Less,

        _ => Ordering::Equal,
    }
}

type ProjectionFn<T> = Arc<dyn for<'a> Fn(&'a T) -> Value<'a> + Send + Sync>;

/// What a sort key orders by.
pub enum SortExpr<T> {
    /// A named field of the entity.
    Field(String),
    /// A projection of the entity.
    Func(ProjectionFn<T>),
}

impl<T> SortExpr<T> {
    pub fn field(name: impl Into<String>) -> Self {
        SortExpr::Field(name.into())
    }

    pub fn from_fn<F>(f: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Value<'a> + Send + Sync + 'static,
    {
        SortExpr::Func(Arc::new(f))
    }
}

impl<T: Refinable> SortExpr<T> {
    /// Reads the sort value out of an entity.
    pub fn extract<'a>(&self, entity: &'a T) -> Value<'a> {
        match self {
            SortExpr::Field(name) => entity.field_value(name),
            SortExpr::Func(f) => f(entity),
        }
    }

    /// Compares two entities by this expression, ascending.
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        compare_values(&self.extract(a), &self.extract(b))
    }
}

impl<T> Clone for SortExpr<T> {
    fn clone(&self) -> Self {
        match self {
            SortExpr::Field(name) => SortExpr::Field(name.clone()),
            SortExpr::Func(f) => SortExpr::Func(Arc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for SortExpr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortExpr::Field(name) => f.debug_tuple("Field").field(name).finish(),
            SortExpr::Func(_) => f.write_str("Func(..)"),
        }
    }
}

/// Maps sort keys to [`SortExpr`]s.
///
/// With `dynamic` set, a key that is not registered falls back to a field of
/// the same name from [`Refinable::fields`].
///
/// # Example
///
/// ```
/// use refine::{Number, Refinable, SortRegistry, Value, DEFAULT_SORT_KEY};
///
/// #[derive(Refinable)]
/// struct Point {
///     x: f64,
///     y: f64,
/// }
///
/// let sorts = SortRegistry::<Point>::new()
///     .with_default(Point::X)
///     .with_fn("distance", |p: &Point| Value::Number(Number::F64(p.x * p.x + p.y * p.y)))
///     .dynamic(true);
///
/// assert!(sorts.resolve(None).is_ok());
/// assert!(sorts.resolve(Some("distance")).is_ok());
/// assert!(sorts.resolve(Some("y")).is_ok());
/// assert!(sorts.resolve(Some("z")).is_err());
/// assert_eq!(sorts.supported_sort_properties(), vec!["x", "y", DEFAULT_SORT_KEY, "distance"]);
/// ```
pub struct SortRegistry<T> {
    sorts: BTreeMap<String, SortExpr<T>>,
    dynamic: bool,
}

impl<T> Default for SortRegistry<T> {
    fn default() -> Self {
        SortRegistry {
            sorts: BTreeMap::new(),
            dynamic: false,
        }
    }
}

impl<T: Refinable> SortRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `expr` under `key`, returning any expression it replaces.
    pub fn insert(&mut self, key: impl Into<String>, expr: SortExpr<T>) -> Option<SortExpr<T>> {
        self.sorts.insert(key.into(), expr)
    }

    /// Registers a field under `key`.
    pub fn with(mut self, key: impl Into<String>, field: impl Into<String>) -> Self {
        self.insert(key, SortExpr::field(field));
        self
    }

    /// Registers a projection under `key`.
    pub fn with_fn<F>(mut self, key: impl Into<String>, f: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Value<'a> + Send + Sync + 'static,
    {
        self.insert(key, SortExpr::from_fn(f));
        self
    }

    /// Registers a field as the [`DEFAULT_SORT_KEY`] ordering.
    pub fn with_default(self, field: impl Into<String>) -> Self {
        self.with(DEFAULT_SORT_KEY, field)
    }

    /// Enables or disables the field fallback.
    pub fn dynamic(mut self, dynamic: bool) -> Self {
        self.dynamic = dynamic;
        self
    }

    pub fn set_dynamic(&mut self, dynamic: bool) {
        self.dynamic = dynamic;
    }

    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.sorts.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.sorts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorts.is_empty()
    }

    /// Resolves a requested sort key.
    ///
    /// A missing or blank key means [`DEFAULT_SORT_KEY`]. Registered keys
    /// come first; with the field fallback enabled, an exact field name
    /// resolves to that field. Anything else is
    /// [`RefineError::SortKeyNotFound`].
    pub fn resolve(&self, requested: Option<&str>) -> Result<SortExpr<T>> {
        let key = match requested {
            Some(key) if !key.trim().is_empty() => key,
            _ => DEFAULT_SORT_KEY,
        };

        if let Some(expr) = self.sorts.get(key) {
            tracing::debug!(key, source = "registry", "resolved sort key");
            return Ok(expr.clone());
        }
        if self.dynamic {
            if let Some(field) = T::field(key) {
                tracing::debug!(key, source = "field", "resolved sort key");
                return Ok(SortExpr::field(field.name));
            }
        }
        Err(RefineError::SortKeyNotFound {
            key: key.to_string(),
        })
    }

    /// Sort keys a client may request: discovered field names (when dynamic)
    /// followed by registered keys. Duplicates are kept.
    pub fn supported_sort_properties(&self) -> Vec<String> {
        let fields = T::fields()
            .iter()
            .filter(|_| self.dynamic)
            .map(|field| field.name.to_string());
        fields.chain(self.sorts.keys().cloned()).collect()
    }
}

impl<T> fmt::Debug for SortRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortRegistry")
            .field("keys", &self.sorts.keys().collect::<Vec<_>>())
            .field("dynamic", &self.dynamic)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::FieldDescriptor;
    use crate::value::{Number, Timestamp};

    struct Job {
        name: String,
        weight: f64,
    }

    impl Refinable for Job {
        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "name" => Value::String(&self.name),
                "weight" => Value::Number(Number::F64(self.weight)),
                _ => Value::None,
            }
        }

        fn fields() -> &'static [FieldDescriptor] {
            static FIELDS: &[FieldDescriptor] = &[
                FieldDescriptor::text("name"),
                FieldDescriptor::number::<f64>("weight"),
            ];
            FIELDS
        }
    }

    fn job(name: &str, weight: f64) -> Job {
        Job {
            name: name.to_string(),
            weight,
        }
    }

    #[test]
    fn dir_apply() {
        assert_eq!(Dir::Asc.apply(Ordering::Less), Ordering::Less);
        assert_eq!(Dir::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(Dir::Desc.apply(Ordering::Equal), Ordering::Equal);
        assert_eq!(Dir::from_desc(true), Dir::Desc);
        assert_eq!(Dir::default().to_string(), "asc");
    }

    #[test]
    fn compare_values_orders_like_types() {
        assert_eq!(
            compare_values(&Value::String("apple"), &Value::String("banana")),
            Ordering::Less
        );
        assert_eq!(
            compare_values(
                &Value::Timestamp(Timestamp(2000)),
                &Value::Timestamp(Timestamp(1000))
            ),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(&Value::Bool(false), &Value::Bool(true)),
            Ordering::Less
        );
    }

    #[test]
    fn compare_values_sorts_none_last() {
        let none = Value::None;
        let some = Value::String("test");
        assert_eq!(compare_values(&none, &some), Ordering::Greater);
        assert_eq!(compare_values(&some, &none), Ordering::Less);
        assert_eq!(compare_values(&none, &none), Ordering::Equal);
    }

    #[test]
    fn incomparable_values_are_equal() {
        let nan = Value::Number(Number::F64(f64::NAN));
        assert_eq!(
            compare_values(&nan, &Value::Number(Number::F64(1.0))),
            Ordering::Equal
        );
        assert_eq!(
            compare_values(&Value::String("a"), &Value::Bool(true)),
            Ordering::Equal
        );
    }

    #[test]
    fn blank_and_missing_keys_use_default() {
        let sorts = SortRegistry::<Job>::new().with_default("name");
        for requested in [None, Some(""), Some("   "), Some(DEFAULT_SORT_KEY)] {
            let expr = sorts.resolve(requested).unwrap();
            assert!(matches!(expr, SortExpr::Field(ref f) if f == "name"));
        }
    }

    #[test]
    fn missing_default_is_not_found() {
        let sorts = SortRegistry::<Job>::new().with("name", "name");
        assert!(matches!(
            sorts.resolve(None),
            Err(RefineError::SortKeyNotFound { ref key }) if key == DEFAULT_SORT_KEY
        ));
    }

    #[test]
    fn field_fallback_only_when_dynamic() {
        let fixed = SortRegistry::<Job>::new().with_default("name");
        assert!(fixed.resolve(Some("weight")).is_err());

        let dynamic = fixed.dynamic(true);
        assert!(dynamic.resolve(Some("weight")).is_ok());
        assert!(dynamic.resolve(Some("Weight")).is_err());
        assert!(dynamic.resolve(Some("height")).is_err());
    }

    #[test]
    fn projections_compare_derived_values() {
        let sorts = SortRegistry::<Job>::new()
            .with_fn("squared", |j: &Job| Value::Number(Number::F64(j.weight * j.weight)));
        let expr = sorts.resolve(Some("squared")).unwrap();
        assert_eq!(expr.compare(&job("a", -3.0), &job("b", 2.0)), Ordering::Greater);
        assert_eq!(format!("{expr:?}"), "Func(..)");
    }

    #[test]
    fn supported_properties_list_fields_then_keys() {
        let sorts = SortRegistry::<Job>::new()
            .with_default("name")
            .with("name", "name");
        assert_eq!(sorts.supported_sort_properties(), vec![DEFAULT_SORT_KEY, "name"]);

        let sorts = sorts.dynamic(true);
        assert_eq!(
            sorts.supported_sort_properties(),
            vec!["name", "weight", DEFAULT_SORT_KEY, "name"]
        );
    }
}
