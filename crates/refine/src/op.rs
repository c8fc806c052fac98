//! Operators a [`Clause`](crate::Clause) compares with.

use std::cmp::Ordering;
use std::fmt;

/// How a clause compares a field with its value.
///
/// Dynamic filters build `Eq` and `Contains` clauses. The ordering
/// operators serve typed filters that build range clauses themselves.
///
/// | Operator | Applies to |
/// |----------|------------|
/// | `Eq` | every value type |
/// | `Contains` | text |
/// | `Gt`, `Gte`, `Lt`, `Lte` | text, numbers, timestamps, enum members |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Eq,
    /// Substring containment, case-sensitive.
    Contains,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Op {
    /// Whether this operator is decided by an [`Ordering`] alone.
    pub fn is_ordering(self) -> bool {
        !matches!(self, Op::Contains)
    }

    /// Decides the operator from `field.cmp(value)`.
    ///
    /// `Contains` never matches here.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self {
            Op::Eq => ordering.is_eq(),
            Op::Gt => ordering.is_gt(),
            Op::Gte => ordering.is_ge(),
            Op::Lt => ordering.is_lt(),
            Op::Lte => ordering.is_le(),
            Op::Contains => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "eq",
            Op::Contains => "contains",
            Op::Gt => "gt",
            Op::Gte => "gte",
            Op::Lt => "lt",
            Op::Lte => "lte",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
