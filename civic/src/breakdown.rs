//! Complete enum-keyed count tables.

use crate::types::{Category, Priority, Status};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// A closed enum whose values can key a [`Breakdown`].
///
/// `ALL` lists every value in canonical order and `index` must return the
/// position of a value within `ALL`.
pub trait Enumerated: Copy + Eq + fmt::Display + 'static {
    const ALL: &'static [Self];

    fn index(self) -> usize;
    fn key(self) -> &'static str;
}

impl Enumerated for Category {
    const ALL: &'static [Self] = &Category::ALL;

    fn index(self) -> usize {
        self as usize
    }

    fn key(self) -> &'static str {
        self.as_str()
    }
}

impl Enumerated for Priority {
    const ALL: &'static [Self] = &Priority::ALL;

    fn index(self) -> usize {
        self as usize
    }

    fn key(self) -> &'static str {
        self.as_str()
    }
}

impl Enumerated for Status {
    const ALL: &'static [Self] = &Status::ALL;

    fn index(self) -> usize {
        self as usize
    }

    fn key(self) -> &'static str {
        self.as_str()
    }
}

/// Breakdown maps every value of `K` to a count.
///
/// Keys are never missing: the table is sized from `K::ALL` at construction
/// and every slot starts at zero.
#[derive(Clone, PartialEq, Eq)]
pub struct Breakdown<K: Enumerated> {
    counts: Vec<usize>,
    _key: PhantomData<K>,
}

impl<K: Enumerated> Breakdown<K> {
    pub fn new() -> Self {
        debug_assert!(
            K::ALL.iter().enumerate().all(|(i, k)| k.index() == i),
            "enum ordering does not match ALL"
        );
        Breakdown {
            counts: vec![0; K::ALL.len()],
            _key: PhantomData,
        }
    }

    /// Builds a table by counting one key per item.
    pub fn tally<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        let mut breakdown = Self::new();
        for key in keys {
            breakdown.record(key);
        }
        breakdown
    }

    pub fn record(&mut self, key: K) {
        self.counts[key.index()] += 1;
    }

    pub fn get(&self, key: K) -> usize {
        self.counts[key.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterates `(key, count)` in canonical order, zero counts included.
    pub fn iter(&self) -> impl Iterator<Item = (K, usize)> + '_ {
        K::ALL.iter().map(move |&k| (k, self.counts[k.index()]))
    }
}

impl<K: Enumerated> Default for Breakdown<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Enumerated> fmt::Debug for Breakdown<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(k, n)| (k.key(), n)))
            .finish()
    }
}

impl<K: Enumerated> Serialize for Breakdown<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, count) in self.iter() {
            map.serialize_entry(key.key(), &count)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_table_has_every_key_at_zero() {
        let breakdown = Breakdown::<Category>::new();
        assert_eq!(breakdown.len(), Category::ALL.len());
        assert!(breakdown.iter().all(|(_, n)| n == 0));
        assert_eq!(breakdown.total(), 0);
    }

    #[test]
    fn tally_counts_and_keeps_canonical_order() {
        let breakdown = Breakdown::tally([Status::Closed, Status::Reported, Status::Closed]);
        let keys: Vec<Status> = breakdown.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, Status::ALL.to_vec());
        assert_eq!(breakdown.get(Status::Closed), 2);
        assert_eq!(breakdown.get(Status::InProgress), 0);
        assert_eq!(breakdown.total(), 3);
    }

    #[test]
    fn serializes_as_ordered_map() {
        let breakdown = Breakdown::tally([Priority::Urgent]);
        let json = serde_json::to_string(&breakdown).unwrap();
        assert_eq!(json, r#"{"low":0,"medium":0,"high":0,"urgent":1}"#);
    }
}
