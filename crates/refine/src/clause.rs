//! Field clauses: the translatable leaves of a predicate tree.
//!
//! A [`Clause`] names a field, an operator and an owned comparison value.
//! Unlike an opaque closure, a clause can be inspected, so a query backend
//! can translate it instead of evaluating it in process.

use crate::op::Op;
use crate::value::{Number, Timestamp, Value};

/// A single field comparison.
///
/// # Example
///
/// ```
/// use refine::{Clause, Op, Value};
///
/// let clause = Clause::new("name", Op::Contains, "ve");
/// assert!(clause.matches(&Value::String("Seven")));
/// assert!(!clause.matches(&Value::String("Two")));
/// ```
#[derive(Debug, Clone)]
pub struct Clause {
    /// The field name to compare.
    pub field: String,
    /// The comparison operator.
    pub op: Op,
    /// The value to compare against.
    pub value: ClauseValue,
}

impl Clause {
    /// Creates a new clause.
    pub fn new(field: impl Into<String>, op: Op, value: impl Into<ClauseValue>) -> Self {
        Clause {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Creates an equality clause.
    pub fn eq(field: impl Into<String>, value: impl Into<ClauseValue>) -> Self {
        Clause::new(field, Op::Eq, value)
    }

    /// Creates a substring-containment clause.
    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Clause::new(field, Op::Contains, ClauseValue::String(value.into()))
    }

    /// Evaluates this clause against a field value.
    ///
    /// Missing fields and type mismatches never match.
    pub fn matches(&self, field_value: &Value<'_>) -> bool {
        match (&self.value, field_value) {
            (ClauseValue::String(needle), Value::String(s)) => match self.op {
                Op::Contains => s.contains(needle.as_str()),
                op => op.eval_ordering(str::cmp(s, needle)),
            },
            (ClauseValue::Number(clause_num), Value::Number(field_num)) => field_num
                .compare(*clause_num)
                .is_some_and(|ordering| self.op.eval_ordering(ordering)),
            (ClauseValue::Timestamp(clause_ts), Value::Timestamp(field_ts)) => {
                self.op.eval_ordering(field_ts.cmp(clause_ts))
            }
            (ClauseValue::Enum(clause_disc), Value::Enum(field_disc)) => {
                self.op.eval_ordering(field_disc.cmp(clause_disc))
            }
            (ClauseValue::Bool(clause_bool), Value::Bool(field_bool)) => {
                self.op == Op::Eq && field_bool == clause_bool
            }
            _ => false,
        }
    }
}

/// Owned comparison value stored in a clause.
#[derive(Debug, Clone)]
pub enum ClauseValue {
    /// String value.
    String(String),
    /// Numeric value.
    Number(Number),
    /// Timestamp value.
    Timestamp(Timestamp),
    /// Enum member discriminant.
    Enum(u32),
    /// Boolean value.
    Bool(bool),
}

impl From<String> for ClauseValue {
    fn from(s: String) -> Self {
        ClauseValue::String(s)
    }
}

impl From<&str> for ClauseValue {
    fn from(s: &str) -> Self {
        ClauseValue::String(s.to_string())
    }
}

impl From<Number> for ClauseValue {
    fn from(n: Number) -> Self {
        ClauseValue::Number(n)
    }
}

impl From<Timestamp> for ClauseValue {
    fn from(t: Timestamp) -> Self {
        ClauseValue::Timestamp(t)
    }
}

impl From<bool> for ClauseValue {
    fn from(b: bool) -> Self {
        ClauseValue::Bool(b)
    }
}

macro_rules! clause_value_from_number {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for ClauseValue {
                fn from(n: $ty) -> Self {
                    ClauseValue::Number(Number::from(n))
                }
            }
        )+
    };
}

clause_value_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);
