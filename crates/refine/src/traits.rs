//! Entity introspection.
//!
//! [`Refinable`] is what the filter and sort registries know about an entity:
//! how to read a field by name, and which stored fields exist. The
//! `#[derive(Refinable)]` macro registers the fields at compile time; a
//! manual implementation works just as well.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::clause::ClauseValue;
use crate::convert::{FromParam, ParamEnum, ParamKind};
use crate::error::Result;
use crate::value::{Number, Timestamp, Value};

/// Trait for entities that can be filtered and sorted by field name.
///
/// # Derive Usage
///
/// ```
/// use refine::{ParamEnum, Refinable, Value};
///
/// #[derive(Debug, Clone, Copy, PartialEq, PartialOrd, ParamEnum)]
/// enum Status {
///     Open,
///     Closed,
/// }
///
/// #[derive(Refinable)]
/// struct Ticket {
///     id: i32,
///     title: String,
///     #[refine(Enum)]
///     status: Status,
///     #[refine(skip)]
///     cached_score: f64,
/// }
///
/// let ticket = Ticket { id: 3, title: "Crash".into(), status: Status::Closed, cached_score: 0.0 };
/// assert_eq!(ticket.field_value(Ticket::TITLE), Value::String("Crash"));
/// assert_eq!(ticket.field_value("cached_score"), Value::None);
/// assert_eq!(Ticket::fields().len(), 3);
/// ```
///
/// # Manual Implementation
///
/// ```
/// use refine::{FieldDescriptor, Number, Refinable, Value};
///
/// struct Ticket {
///     id: i32,
///     title: String,
/// }
///
/// impl Refinable for Ticket {
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "id" => Value::Number(Number::from(self.id)),
///             "title" => Value::String(&self.title),
///             _ => Value::None,
///         }
///     }
///
///     fn fields() -> &'static [FieldDescriptor] {
///         static FIELDS: &[FieldDescriptor] = &[
///             FieldDescriptor::number::<i32>("id"),
///             FieldDescriptor::text("title"),
///         ];
///         FIELDS
///     }
/// }
/// ```
pub trait Refinable {
    /// Returns the value of a field for comparison.
    ///
    /// Unknown or non-queryable fields return [`Value::None`].
    fn field_value(&self, field: &str) -> Value<'_>;

    /// Returns the stored fields eligible for dynamic filtering and sorting.
    ///
    /// Computed members should be left out; they can still be exposed
    /// through explicitly registered filters and sorts.
    fn fields() -> &'static [FieldDescriptor]
    where
        Self: Sized,
    {
        &[]
    }

    /// Looks up an eligible field by exact name.
    fn field(name: &str) -> Option<&'static FieldDescriptor>
    where
        Self: Sized,
    {
        Self::fields().iter().find(|f| f.name == name)
    }
}

/// Describes one stored field of an entity: its name, its accepted type and
/// how a raw parameter value for it is converted.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    /// Field name used as filter and sort key.
    pub name: &'static str,
    /// Category of the field's type.
    pub kind: ParamKind,
    /// Stable type name reported through introspection.
    pub type_name: &'static str,
    /// Converts a raw parameter into a comparable clause value.
    pub convert: fn(&str) -> Result<ClauseValue>,
    /// Member names, for enum fields.
    pub variants: Option<&'static [&'static str]>,
}

impl FieldDescriptor {
    /// A `String` field.
    pub const fn text(name: &'static str) -> Self {
        FieldDescriptor {
            name,
            kind: ParamKind::Text,
            type_name: <String as FromParam>::TYPE_NAME,
            convert: convert_text,
            variants: None,
        }
    }

    /// A numeric field of primitive type `N`.
    pub const fn number<N>(name: &'static str) -> Self
    where
        N: FromParam + Into<Number>,
    {
        FieldDescriptor {
            name,
            kind: N::KIND,
            type_name: N::TYPE_NAME,
            convert: convert_number::<N>,
            variants: None,
        }
    }

    /// A `bool` field.
    pub const fn boolean(name: &'static str) -> Self {
        FieldDescriptor {
            name,
            kind: ParamKind::Bool,
            type_name: <bool as FromParam>::TYPE_NAME,
            convert: convert_bool,
            variants: None,
        }
    }

    /// A date/time field; raw values are parsed as ISO 8601.
    pub const fn timestamp(name: &'static str) -> Self {
        FieldDescriptor {
            name,
            kind: ParamKind::DateTime,
            type_name: <Timestamp as FromParam>::TYPE_NAME,
            convert: convert_timestamp,
            variants: None,
        }
    }

    /// An enum field of type `E`.
    pub const fn enumeration<E: ParamEnum>(name: &'static str) -> Self {
        FieldDescriptor {
            name,
            kind: ParamKind::Enum,
            type_name: crate::filter::ENUM_TYPE_NAME,
            convert: convert_enum::<E>,
            variants: Some(E::VARIANTS),
        }
    }
}

fn convert_text(raw: &str) -> Result<ClauseValue> {
    Ok(ClauseValue::String(String::from_param(raw)?))
}

fn convert_number<N>(raw: &str) -> Result<ClauseValue>
where
    N: FromParam + Into<Number>,
{
    Ok(ClauseValue::Number(N::from_param(raw)?.into()))
}

fn convert_bool(raw: &str) -> Result<ClauseValue> {
    Ok(ClauseValue::Bool(bool::from_param(raw)?))
}

fn convert_timestamp(raw: &str) -> Result<ClauseValue> {
    Ok(ClauseValue::Timestamp(Timestamp::from_param(raw)?))
}

fn convert_enum<E: ParamEnum>(raw: &str) -> Result<ClauseValue> {
    let member = crate::convert::parse_enum::<E>(raw, crate::filter::ENUM_TYPE_NAME)?;
    Ok(ClauseValue::Enum(member.discriminant()))
}

/// Conversion of date/time field types into [`Timestamp`]s.
///
/// Used by `#[derive(Refinable)]` for timestamp fields.
pub trait ToTimestamp {
    fn to_timestamp(&self) -> Timestamp;
}

impl ToTimestamp for Timestamp {
    fn to_timestamp(&self) -> Timestamp {
        *self
    }
}

/// Milliseconds since Unix epoch.
impl ToTimestamp for i64 {
    fn to_timestamp(&self) -> Timestamp {
        Timestamp::from_millis(*self)
    }
}

impl ToTimestamp for DateTime<Utc> {
    fn to_timestamp(&self) -> Timestamp {
        Timestamp::from_datetime(self)
    }
}

impl ToTimestamp for NaiveDateTime {
    fn to_timestamp(&self) -> Timestamp {
        Timestamp::from_millis(self.and_utc().timestamp_millis())
    }
}

impl ToTimestamp for NaiveDate {
    fn to_timestamp(&self) -> Timestamp {
        Timestamp::from_millis(self.and_time(chrono::NaiveTime::default()).and_utc().timestamp_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item {
        name: String,
        count: i32,
    }

    impl Refinable for Item {
        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "name" => Value::String(&self.name),
                "count" => Value::Number(Number::from(self.count)),
                _ => Value::None,
            }
        }

        fn fields() -> &'static [FieldDescriptor] {
            static FIELDS: &[FieldDescriptor] = &[
                FieldDescriptor::text("name"),
                FieldDescriptor::number::<i32>("count"),
            ];
            FIELDS
        }
    }

    #[test]
    fn manual_impl_reads_fields() {
        let item = Item {
            name: "test".to_string(),
            count: 42,
        };

        assert_eq!(item.field_value("name"), Value::String("test"));
        assert_eq!(item.field_value("count"), Value::Number(Number::I64(42)));
        assert_eq!(item.field_value("unknown"), Value::None);
    }

    #[test]
    fn field_lookup_is_exact() {
        assert!(Item::field("count").is_some());
        assert!(Item::field("Count").is_none());
        assert_eq!(Item::field("count").map(|f| f.type_name), Some("i32"));
    }

    #[test]
    fn descriptors_convert_with_field_type() {
        let count = Item::field("count").unwrap();
        assert!(matches!(
            (count.convert)("7"),
            Ok(ClauseValue::Number(Number::I64(7)))
        ));
        assert!((count.convert)("seven").is_err());

        let ts = FieldDescriptor::timestamp("at");
        assert!(matches!(
            (ts.convert)("1970-01-01T00:00:01Z"),
            Ok(ClauseValue::Timestamp(Timestamp(1000)))
        ));
    }

    #[test]
    fn timestamps_from_chrono_types() {
        let date = NaiveDate::from_ymd_opt(1970, 1, 2).unwrap();
        assert_eq!(date.to_timestamp(), Timestamp(86_400_000));
        assert_eq!(1500i64.to_timestamp(), Timestamp(1500));
    }
}
