//! Conversion of raw parameter strings into typed values.
//!
//! [`FromParam`] is the value converter: every type a filter can accept
//! implements it. Date/time types go through [`parse_datetime`], enums are
//! resolved by exact member name through [`ParamEnum`], and everything else
//! uses the primitive's own `FromStr`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::error::{RefineError, Result};
use crate::value::Timestamp;

/// Broad category of the type a raw value converts into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Integer,
    Float,
    Bool,
    Text,
    DateTime,
    Enum,
}

impl ParamKind {
    /// Returns `true` for enumerated types.
    pub fn is_enum(self) -> bool {
        matches!(self, ParamKind::Enum)
    }
}

/// A type that raw query parameter values can be converted into.
///
/// Conversion is a pure function of the raw string; it never consults the
/// locale.
pub trait FromParam: Sized {
    /// Stable name of the type, reported through filter introspection.
    const TYPE_NAME: &'static str;

    /// Category of the type.
    const KIND: ParamKind;

    /// Converts a raw parameter value.
    fn from_param(raw: &str) -> Result<Self>;

    /// Member names, for enumerated types.
    fn variant_names() -> Option<&'static [&'static str]> {
        None
    }
}

/// An enum whose members can be named in query parameters.
///
/// Usually derived with `#[derive(ParamEnum)]`, which also implements
/// [`FromParam`]. Discriminants are declaration indexes, so the derived
/// ordering of members matches their discriminant ordering.
pub trait ParamEnum: Sized + 'static {
    /// Member names in declaration order.
    const VARIANTS: &'static [&'static str];

    /// Looks a member up by its exact, case-sensitive name.
    fn from_variant_name(name: &str) -> Option<Self>;

    /// Returns this member's name.
    fn variant_name(&self) -> &'static str;

    /// Returns this member's discriminant.
    fn discriminant(&self) -> u32;
}

/// Resolves an enum member by exact name, for `FromParam` impls on enums.
pub fn parse_enum<E: ParamEnum>(raw: &str, type_name: &'static str) -> Result<E> {
    E::from_variant_name(raw).ok_or_else(|| {
        RefineError::conversion(
            raw,
            type_name,
            format!("expected one of: {}", E::VARIANTS.join(", ")),
        )
    })
}

/// Parses an ISO 8601 date or date-time into UTC.
///
/// Accepted forms:
/// - RFC 3339 with an offset (`2017-11-07T13:00:00.000Z`, `2017-11-07T15:00:00+02:00`)
/// - a local date-time, taken as UTC (`2017-11-07T13:00:00`, `2017-11-07T13:00:00.250`)
/// - a date, taken as midnight UTC (`2017-11-07`)
///
/// Locale-dependent spellings such as `2017/11/07` or `11/07/2017` are
/// rejected.
pub fn parse_datetime(raw: &str) -> Result<DateTime<Utc>> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        Ok(date) => Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))),
        Err(e) => Err(RefineError::conversion(raw, "DateTime", e)),
    }
}

macro_rules! from_param_via_from_str {
    ($kind:ident: $($ty:ty),+) => {
        $(
            impl FromParam for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);
                const KIND: ParamKind = ParamKind::$kind;

                fn from_param(raw: &str) -> Result<Self> {
                    raw.trim()
                        .parse::<$ty>()
                        .map_err(|e| RefineError::conversion(raw, Self::TYPE_NAME, e))
                }
            }
        )+
    };
}

from_param_via_from_str!(Integer: i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
from_param_via_from_str!(Float: f32, f64);

impl FromParam for bool {
    const TYPE_NAME: &'static str = "bool";
    const KIND: ParamKind = ParamKind::Bool;

    fn from_param(raw: &str) -> Result<Self> {
        let s = raw.trim();
        if s.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if s.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(RefineError::conversion(raw, Self::TYPE_NAME, "expected true or false"))
        }
    }
}

impl FromParam for String {
    const TYPE_NAME: &'static str = "String";
    const KIND: ParamKind = ParamKind::Text;

    fn from_param(raw: &str) -> Result<Self> {
        Ok(raw.to_string())
    }
}

impl FromParam for DateTime<Utc> {
    const TYPE_NAME: &'static str = "DateTime";
    const KIND: ParamKind = ParamKind::DateTime;

    fn from_param(raw: &str) -> Result<Self> {
        parse_datetime(raw)
    }
}

impl FromParam for NaiveDateTime {
    const TYPE_NAME: &'static str = "NaiveDateTime";
    const KIND: ParamKind = ParamKind::DateTime;

    fn from_param(raw: &str) -> Result<Self> {
        parse_datetime(raw).map(|dt| dt.naive_utc())
    }
}

impl FromParam for NaiveDate {
    const TYPE_NAME: &'static str = "NaiveDate";
    const KIND: ParamKind = ParamKind::DateTime;

    fn from_param(raw: &str) -> Result<Self> {
        parse_datetime(raw).map(|dt| dt.date_naive())
    }
}

impl FromParam for Timestamp {
    const TYPE_NAME: &'static str = "Timestamp";
    const KIND: ParamKind = ParamKind::DateTime;

    fn from_param(raw: &str) -> Result<Self> {
        parse_datetime(raw).map(|dt| Timestamp::from_datetime(&dt))
    }
}
