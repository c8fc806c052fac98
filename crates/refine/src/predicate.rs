//! Composable boolean predicates over an entity.
//!
//! A [`Predicate`] is a small tree. Leaves are either translatable
//! [`Clause`]s or opaque closures; inner nodes are `Any` (OR) and `All`
//! (AND). Every branch is evaluated against the same entity reference, so
//! merging predicates never rebinds the entity they talk about.
//!
//! In-memory sources evaluate the tree with [`Predicate::matches`]. A source
//! backed by a query engine can walk it instead and translate the clauses,
//! falling back to in-process evaluation when
//! [`Predicate::is_translatable`] is `false`.

use std::fmt;
use std::sync::Arc;

use crate::clause::Clause;
use crate::traits::Refinable;

type PredicateFn<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Boolean predicate over an entity of type `T`.
///
/// # Example
///
/// ```
/// use refine::{Clause, Predicate, Refinable};
///
/// #[derive(Refinable)]
/// struct Item {
///     name: String,
///     count: i64,
/// }
///
/// let named = Predicate::<Item>::clause(Clause::eq("name", "bolt"));
/// let plenty = Predicate::from_fn(|item: &Item| item.count > 10);
/// let either = named.or(plenty);
///
/// assert!(either.matches(&Item { name: "bolt".into(), count: 1 }));
/// assert!(either.matches(&Item { name: "nut".into(), count: 20 }));
/// assert!(!either.matches(&Item { name: "nut".into(), count: 2 }));
/// assert!(!either.is_translatable());
/// ```
pub enum Predicate<T> {
    /// A field comparison.
    Clause(Clause),
    /// An opaque closure.
    Func(PredicateFn<T>),
    /// Matches if at least one member matches. Empty matches nothing.
    Any(Vec<Predicate<T>>),
    /// Matches if every member matches. Empty matches everything.
    All(Vec<Predicate<T>>),
}

impl<T> Predicate<T> {
    /// Wraps a field clause.
    pub fn clause(clause: Clause) -> Self {
        Predicate::Clause(clause)
    }

    /// Wraps a closure.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Predicate::Func(Arc::new(f))
    }

    /// Predicate accepting every entity.
    pub fn always() -> Self {
        Predicate::All(Vec::new())
    }

    /// Combines predicates with OR.
    pub fn any(predicates: impl IntoIterator<Item = Predicate<T>>) -> Self {
        predicates
            .into_iter()
            .fold(Predicate::Any(Vec::new()), Predicate::or)
    }

    /// Combines predicates with AND.
    pub fn all(predicates: impl IntoIterator<Item = Predicate<T>>) -> Self {
        predicates
            .into_iter()
            .fold(Predicate::All(Vec::new()), Predicate::and)
    }

    /// OR-combines `self` with `other`, flattening nested `Any` nodes.
    ///
    /// Clause order follows call order: `self`'s branches come first.
    pub fn or(self, other: Predicate<T>) -> Self {
        let mut branches = match self {
            Predicate::Any(branches) => branches,
            single => vec![single],
        };
        match other {
            Predicate::Any(more) => branches.extend(more),
            single => branches.push(single),
        }
        Predicate::Any(branches)
    }

    /// AND-combines `self` with `other`, flattening nested `All` nodes.
    pub fn and(self, other: Predicate<T>) -> Self {
        let mut branches = match self {
            Predicate::All(branches) => branches,
            single => vec![single],
        };
        match other {
            Predicate::All(more) => branches.extend(more),
            single => branches.push(single),
        }
        Predicate::All(branches)
    }

    /// Returns `true` if the tree contains no closures.
    pub fn is_translatable(&self) -> bool {
        match self {
            Predicate::Clause(_) => true,
            Predicate::Func(_) => false,
            Predicate::Any(branches) | Predicate::All(branches) => {
                branches.iter().all(Predicate::is_translatable)
            }
        }
    }

    /// Collects the clauses in the tree, depth first.
    pub fn clauses(&self) -> Vec<&Clause> {
        let mut out = Vec::new();
        self.collect_clauses(&mut out);
        out
    }

    fn collect_clauses<'a>(&'a self, out: &mut Vec<&'a Clause>) {
        match self {
            Predicate::Clause(clause) => out.push(clause),
            Predicate::Func(_) => {}
            Predicate::Any(branches) | Predicate::All(branches) => {
                for branch in branches {
                    branch.collect_clauses(out);
                }
            }
        }
    }
}

impl<T: Refinable> Predicate<T> {
    /// Evaluates the predicate against one entity.
    pub fn matches(&self, entity: &T) -> bool {
        match self {
            Predicate::Clause(clause) => clause.matches(&entity.field_value(&clause.field)),
            Predicate::Func(f) => f(entity),
            Predicate::Any(branches) => branches.iter().any(|p| p.matches(entity)),
            Predicate::All(branches) => branches.iter().all(|p| p.matches(entity)),
        }
    }
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        match self {
            Predicate::Clause(clause) => Predicate::Clause(clause.clone()),
            Predicate::Func(f) => Predicate::Func(Arc::clone(f)),
            Predicate::Any(branches) => Predicate::Any(branches.clone()),
            Predicate::All(branches) => Predicate::All(branches.clone()),
        }
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Clause(clause) => f.debug_tuple("Clause").field(clause).finish(),
            Predicate::Func(_) => f.write_str("Func(..)"),
            Predicate::Any(branches) => f.debug_tuple("Any").field(branches).finish(),
            Predicate::All(branches) => f.debug_tuple("All").field(branches).finish(),
        }
    }
}

impl<T> From<Clause> for Predicate<T> {
    fn from(clause: Clause) -> Self {
        Predicate::Clause(clause)
    }
}
