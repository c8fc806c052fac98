//! Filter definitions: one per registered filter key.
//!
//! A [`FilterDefinition`] turns the raw value(s) sent under its key into a
//! [`Predicate`]. Two implementations ship with the crate:
//!
//! - [`TypedFilter`] runs a caller-supplied function on the converted value.
//! - [`DynamicFilter`] compares one discovered entity field with the value.

use std::marker::PhantomData;

use serde::Serialize;

use crate::clause::Clause;
use crate::convert::{FromParam, ParamKind};
use crate::error::Result;
use crate::op::Op;
use crate::predicate::Predicate;
use crate::traits::FieldDescriptor;

use super::ENUM_TYPE_NAME;

/// A legal value for a filter, for populating client-side selectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupportedValue {
    pub label: String,
    pub value: String,
}

impl SupportedValue {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        SupportedValue {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Builds predicates for one filter key.
pub trait FilterDefinition<T>: Send + Sync {
    /// Category of the type raw values convert into.
    fn accepted_kind(&self) -> ParamKind;

    /// Name of the type raw values convert into.
    fn accepted_type(&self) -> &'static str;

    /// Converts `raw` and builds the predicate for it.
    fn predicate(&self, raw: &str) -> Result<Predicate<T>>;

    /// Builds the OR of the predicates for every value in `raws`.
    ///
    /// A single value yields exactly the predicate [`predicate`](Self::predicate)
    /// would build. Later values are appended as further OR branches, so
    /// value order only affects branch order. Any conversion failure fails
    /// the whole call.
    fn predicate_any(&self, raws: &[String]) -> Result<Predicate<T>> {
        let Some((first, rest)) = raws.split_first() else {
            return Ok(Predicate::Any(Vec::new()));
        };
        rest.iter()
            .try_fold(self.predicate(first)?, |merged, raw| {
                Ok(merged.or(self.predicate(raw)?))
            })
    }

    /// Legal values to advertise, if the accepted type is enumerable and
    /// exposure was requested.
    fn supported_values(&self) -> Option<Vec<SupportedValue>> {
        None
    }

    /// Type name reported through introspection; enums collapse to
    /// [`ENUM_TYPE_NAME`].
    fn type_name(&self) -> &'static str {
        if self.accepted_kind().is_enum() {
            ENUM_TYPE_NAME
        } else {
            self.accepted_type()
        }
    }
}

type BuildFn<T, V> = Box<dyn Fn(V) -> Predicate<T> + Send + Sync>;

/// Filter whose predicate is supplied by the integrator as a function of the
/// converted value.
///
/// # Example
///
/// ```
/// use refine::{Clause, FilterDefinition, Predicate, Refinable, TypedFilter};
///
/// #[derive(Refinable)]
/// struct Item {
///     name: String,
///     price: f64,
/// }
///
/// let cheaper_than = TypedFilter::<Item, f64>::closure(|max| move |item: &Item| item.price < max);
/// let named = TypedFilter::<Item, String>::new(|name| Predicate::clause(Clause::eq("name", name)));
///
/// let item = Item { name: "bolt".into(), price: 0.5 };
/// assert!(cheaper_than.predicate("1.0").unwrap().matches(&item));
/// assert!(named.predicate("bolt").unwrap().matches(&item));
/// assert!(cheaper_than.predicate("cheap").is_err());
/// ```
pub struct TypedFilter<T, V> {
    build: BuildFn<T, V>,
    expose_values: bool,
}

impl<T, V: FromParam> TypedFilter<T, V> {
    /// Creates a filter from a predicate builder.
    pub fn new<F>(build: F) -> Self
    where
        F: Fn(V) -> Predicate<T> + Send + Sync + 'static,
    {
        TypedFilter {
            build: Box::new(build),
            expose_values: false,
        }
    }

    /// Creates a filter from a function returning a plain closure.
    pub fn closure<F, P>(build: F) -> Self
    where
        F: Fn(V) -> P + Send + Sync + 'static,
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        TypedFilter::new(move |value| Predicate::from_fn(build(value)))
    }

    /// Advertises the accepted type's members through
    /// [`supported_values`](FilterDefinition::supported_values).
    ///
    /// Only enumerated types have members to advertise.
    pub fn with_values(mut self, expose: bool) -> Self {
        self.expose_values = expose;
        self
    }
}

impl<T, V> FilterDefinition<T> for TypedFilter<T, V>
where
    V: FromParam,
{
    fn accepted_kind(&self) -> ParamKind {
        V::KIND
    }

    fn accepted_type(&self) -> &'static str {
        V::TYPE_NAME
    }

    fn predicate(&self, raw: &str) -> Result<Predicate<T>> {
        let value = V::from_param(raw)?;
        Ok((self.build)(value))
    }

    fn supported_values(&self) -> Option<Vec<SupportedValue>> {
        if !self.expose_values || !V::KIND.is_enum() {
            return None;
        }
        V::variant_names().map(|names| {
            names
                .iter()
                .map(|name| SupportedValue::new(*name, *name))
                .collect()
        })
    }
}

/// Filter comparing one discovered field of the entity with the raw value.
///
/// Text fields use substring containment when `containment` is set;
/// everything else uses equality. The raw value is converted with the
/// field's own type.
pub struct DynamicFilter<T> {
    field: &'static FieldDescriptor,
    containment: bool,
    _entity: PhantomData<fn(&T)>,
}

impl<T> DynamicFilter<T> {
    pub fn new(field: &'static FieldDescriptor, containment: bool) -> Self {
        DynamicFilter {
            field,
            containment,
            _entity: PhantomData,
        }
    }

    /// The field this filter compares.
    pub fn field(&self) -> &'static FieldDescriptor {
        self.field
    }

    fn op(&self) -> Op {
        if self.containment && self.field.kind == ParamKind::Text {
            Op::Contains
        } else {
            Op::Eq
        }
    }
}

impl<T> FilterDefinition<T> for DynamicFilter<T> {
    fn accepted_kind(&self) -> ParamKind {
        self.field.kind
    }

    fn accepted_type(&self) -> &'static str {
        self.field.type_name
    }

    fn predicate(&self, raw: &str) -> Result<Predicate<T>> {
        let value = (self.field.convert)(raw)?;
        Ok(Predicate::clause(Clause::new(self.field.name, self.op(), value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::ParamEnum;
    use crate::error::RefineError;
    use crate::traits::Refinable;
    use crate::value::{Number, Value};

    #[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
    enum Shade {
        Light,
        Dark,
    }

    impl ParamEnum for Shade {
        const VARIANTS: &'static [&'static str] = &["Light", "Dark"];

        fn from_variant_name(name: &str) -> Option<Self> {
            match name {
                "Light" => Some(Shade::Light),
                "Dark" => Some(Shade::Dark),
                _ => None,
            }
        }

        fn variant_name(&self) -> &'static str {
            Self::VARIANTS[*self as usize]
        }

        fn discriminant(&self) -> u32 {
            *self as u32
        }
    }

    impl FromParam for Shade {
        const TYPE_NAME: &'static str = "Shade";
        const KIND: ParamKind = ParamKind::Enum;

        fn from_param(raw: &str) -> Result<Self> {
            crate::convert::parse_enum(raw, Self::TYPE_NAME)
        }

        fn variant_names() -> Option<&'static [&'static str]> {
            Some(Self::VARIANTS)
        }
    }

    struct Paint {
        name: String,
        code: i32,
        shade: Shade,
    }

    impl Refinable for Paint {
        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "name" => Value::String(&self.name),
                "code" => Value::Number(Number::from(self.code)),
                "shade" => Value::Enum(self.shade.discriminant()),
                _ => Value::None,
            }
        }

        fn fields() -> &'static [FieldDescriptor] {
            static FIELDS: &[FieldDescriptor] = &[
                FieldDescriptor::text("name"),
                FieldDescriptor::number::<i32>("code"),
                FieldDescriptor::enumeration::<Shade>("shade"),
            ];
            FIELDS
        }
    }

    fn paint(name: &str, code: i32, shade: Shade) -> Paint {
        Paint {
            name: name.to_string(),
            code,
            shade,
        }
    }

    fn raws(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn typed_filter_converts_before_building() {
        let filter = TypedFilter::<Paint, i32>::closure(|code| move |p: &Paint| p.code == code);
        assert!(filter.predicate("7").unwrap().matches(&paint("a", 7, Shade::Dark)));
        assert!(matches!(
            filter.predicate("seven"),
            Err(RefineError::Conversion { target: "i32", .. })
        ));
        assert_eq!(filter.type_name(), "i32");
    }

    #[test]
    fn single_value_any_is_the_single_predicate() {
        let filter = DynamicFilter::<Paint>::new(Paint::field("code").unwrap(), true);
        let single = filter.predicate("3").unwrap();
        let merged = filter.predicate_any(&raws(&["3"])).unwrap();
        assert_eq!(format!("{single:?}"), format!("{merged:?}"));
    }

    #[test]
    fn multiple_values_or_together() {
        let filter = DynamicFilter::<Paint>::new(Paint::field("code").unwrap(), true);
        let merged = filter.predicate_any(&raws(&["1", "3"])).unwrap();

        assert!(merged.matches(&paint("a", 1, Shade::Light)));
        assert!(merged.matches(&paint("b", 3, Shade::Light)));
        assert!(!merged.matches(&paint("c", 2, Shade::Light)));
        assert!(merged.is_translatable());
    }

    #[test]
    fn one_bad_value_fails_the_merge() {
        let filter = DynamicFilter::<Paint>::new(Paint::field("code").unwrap(), true);
        assert!(filter.predicate_any(&raws(&["1", "x"])).is_err());
    }

    #[test]
    fn dynamic_text_uses_containment_when_enabled() {
        let field = Paint::field("name").unwrap();
        let contains = DynamicFilter::<Paint>::new(field, true);
        let equals = DynamicFilter::<Paint>::new(field, false);
        let red = paint("Deep Red", 1, Shade::Dark);

        assert!(contains.predicate("Red").unwrap().matches(&red));
        assert!(!equals.predicate("Red").unwrap().matches(&red));
        assert!(equals.predicate("Deep Red").unwrap().matches(&red));
    }

    #[test]
    fn dynamic_enum_matches_by_member_name() {
        let filter = DynamicFilter::<Paint>::new(Paint::field("shade").unwrap(), true);
        assert!(filter.predicate("Dark").unwrap().matches(&paint("a", 1, Shade::Dark)));
        assert!(filter.predicate("dark").is_err());
        assert_eq!(filter.type_name(), ENUM_TYPE_NAME);
        assert_eq!(filter.supported_values(), None);
    }

    #[test]
    fn supported_values_only_for_exposed_enums() {
        let hidden = TypedFilter::<Paint, Shade>::closure(|s| move |p: &Paint| p.shade == s);
        assert_eq!(hidden.supported_values(), None);

        let exposed = hidden.with_values(true);
        assert_eq!(
            exposed.supported_values(),
            Some(vec![
                SupportedValue::new("Light", "Light"),
                SupportedValue::new("Dark", "Dark"),
            ])
        );
        assert_eq!(exposed.type_name(), ENUM_TYPE_NAME);
        assert_eq!(exposed.accepted_type(), "Shade");

        let numeric = TypedFilter::<Paint, i32>::closure(|c| move |p: &Paint| p.code == c)
            .with_values(true);
        assert_eq!(numeric.supported_values(), None);
    }
}
