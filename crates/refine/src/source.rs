//! The data source seam.
//!
//! Filtering and paging only ever talk to a [`Source`]. The crate implements
//! it for in-memory vectors of entities or entity references; a source
//! backed by a query engine implements it by translating the predicate tree
//! and sort expression instead of evaluating them.

use std::borrow::Borrow;

use crate::predicate::Predicate;
use crate::sort::{Dir, SortExpr};
use crate::traits::Refinable;

/// A collection of `T` that can be narrowed, counted, ordered and sliced.
///
/// Every operation consumes the source and returns the transformed one.
pub trait Source<T>: Sized {
    /// Keeps only the entities matching `predicate`.
    fn narrow(self, predicate: &Predicate<T>) -> Self;

    /// Number of entities currently in the source.
    fn count(&self) -> usize;

    /// Orders the source by `expr`. Ties keep their relative order.
    fn order(self, expr: &SortExpr<T>, dir: Dir) -> Self;

    /// Skips `skip` entities and keeps at most `take` of the rest.
    fn slice(self, skip: usize, take: usize) -> Self;
}

impl<T, R> Source<T> for Vec<R>
where
    T: Refinable,
    R: Borrow<T>,
{
    fn narrow(mut self, predicate: &Predicate<T>) -> Self {
        self.retain(|entity| predicate.matches(entity.borrow()));
        self
    }

    fn count(&self) -> usize {
        self.len()
    }

    fn order(mut self, expr: &SortExpr<T>, dir: Dir) -> Self {
        self.sort_by(|a, b| dir.apply(expr.compare(a.borrow(), b.borrow())));
        self
    }

    fn slice(self, skip: usize, take: usize) -> Self {
        self.into_iter().skip(skip).take(take).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::Clause;
    use crate::value::{Number, Value};

    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        rank: i64,
        group: &'static str,
    }

    impl Refinable for Entry {
        fn field_value(&self, field: &str) -> Value<'_> {
            match field {
                "rank" => Value::Number(Number::I64(self.rank)),
                "group" => Value::String(self.group),
                _ => Value::None,
            }
        }
    }

    fn entries() -> Vec<Entry> {
        vec![
            Entry { rank: 2, group: "b" },
            Entry { rank: 1, group: "a" },
            Entry { rank: 2, group: "a" },
            Entry { rank: 3, group: "b" },
        ]
    }

    #[test]
    fn narrow_and_count() {
        let narrowed = entries().narrow(&Predicate::<Entry>::clause(Clause::eq("group", "a")));
        assert_eq!(Source::<Entry>::count(&narrowed), 2);
    }

    #[test]
    fn order_is_stable_in_both_directions() {
        let by_rank = SortExpr::<Entry>::field("rank");

        let asc = entries().order(&by_rank, Dir::Asc);
        let groups: Vec<_> = asc.iter().map(|e| (e.rank, e.group)).collect();
        assert_eq!(groups, vec![(1, "a"), (2, "b"), (2, "a"), (3, "b")]);

        let desc = entries().order(&by_rank, Dir::Desc);
        let groups: Vec<_> = desc.iter().map(|e| (e.rank, e.group)).collect();
        assert_eq!(groups, vec![(3, "b"), (2, "b"), (2, "a"), (1, "a")]);
    }

    #[test]
    fn slice_past_the_end_is_empty() {
        let sliced: Vec<Entry> = Source::<Entry>::slice(entries(), 3, 10);
        assert_eq!(sliced.len(), 1);
        let empty: Vec<Entry> = Source::<Entry>::slice(entries(), 10, 10);
        assert!(empty.is_empty());
    }

    #[test]
    fn borrowed_entities_work_too() {
        let owned = entries();
        let refs: Vec<&Entry> = owned.iter().collect();
        let ordered = refs.order(&SortExpr::<Entry>::field("rank"), Dir::Asc);
        assert_eq!(ordered[0].rank, 1);
    }
}
