//! Frequency counting with stable ranking.
//!
//! [`FrequencyTable`] counts observations in first-seen order. Its ranked
//! projection sorts by count, descending, and keeps first-seen order among
//! equal counts, so ties always resolve to the value the page showed first.
//!
//! ```rust
//! use swatch_tokens::FrequencyTable;
//!
//! let table: FrequencyTable<&str> = ["4px", "8px", "8px", "4px", "2px"].into_iter().collect();
//! assert_eq!(table.ranked(), vec![("4px", 2), ("8px", 2), ("2px", 1)]);
//! assert_eq!(table.most_common(), Some(&"4px"));
//! ```

use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Occurrence counts keyed by value, in first-seen order.
///
/// Serializes as a list of `[value, count]` pairs so the order survives a trip
/// through JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "Vec<(T, usize)>",
    into = "Vec<(T, usize)>",
    bound(
        serialize = "T: Clone + Serialize",
        deserialize = "T: Eq + Hash + Clone + Deserialize<'de>"
    )
)]
pub struct FrequencyTable<T: Eq + Hash + Clone> {
    index: HashMap<T, usize>,
    entries: Vec<(T, usize)>,
}

impl<T: Eq + Hash + Clone> Default for FrequencyTable<T> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<T: Eq + Hash + Clone> FrequencyTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one observation. `None` is discarded.
    pub fn observe(&mut self, value: impl Into<Option<T>>) {
        self.observe_n(value, 1);
    }

    /// Counts `n` observations of the same value at once.
    pub fn observe_n(&mut self, value: impl Into<Option<T>>, n: usize) {
        let Some(value) = value.into() else {
            return;
        };
        if n == 0 {
            return;
        }

        match self.index.get(&value) {
            Some(&slot) => self.entries[slot].1 += n,
            None => {
                self.index.insert(value.clone(), self.entries.len());
                self.entries.push((value, n));
            }
        }
    }

    pub fn count(&self, value: &T) -> usize {
        self.index
            .get(value)
            .map(|&slot| self.entries[slot].1)
            .unwrap_or(0)
    }

    /// Number of distinct values.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total observations across all values.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    /// Distinct values in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(value, _)| value)
    }

    /// `(value, count)` pairs in first-seen order.
    pub fn entries(&self) -> &[(T, usize)] {
        &self.entries
    }

    /// All values by descending count, ties in first-seen order.
    pub fn ranked(&self) -> Vec<(T, usize)> {
        let mut ranked = self.entries.clone();
        // sort_by is stable
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// The first `n` entries of [`ranked`](Self::ranked).
    pub fn top(&self, n: usize) -> Vec<(T, usize)> {
        let mut ranked = self.ranked();
        ranked.truncate(n);
        ranked
    }

    pub fn most_common(&self) -> Option<&T> {
        let mut best: Option<&(T, usize)> = None;
        for entry in &self.entries {
            if best.map_or(true, |b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map(|(value, _)| value)
    }

    /// Folds another table into this one. Values new to `self` are appended in
    /// `other`'s order.
    pub fn merge(&mut self, other: &FrequencyTable<T>) {
        for (value, n) in &other.entries {
            self.observe_n(value.clone(), *n);
        }
    }
}

impl<T: Eq + Hash + Clone, V: Into<Option<T>>> Extend<V> for FrequencyTable<T> {
    fn extend<I: IntoIterator<Item = V>>(&mut self, iter: I) {
        for value in iter {
            self.observe(value);
        }
    }
}

impl<T: Eq + Hash + Clone, V: Into<Option<T>>> FromIterator<V> for FrequencyTable<T> {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

impl<T: Eq + Hash + Clone> From<Vec<(T, usize)>> for FrequencyTable<T> {
    fn from(pairs: Vec<(T, usize)>) -> Self {
        let mut table = Self::new();
        for (value, n) in pairs {
            table.observe_n(value, n);
        }
        table
    }
}

impl<T: Eq + Hash + Clone> From<FrequencyTable<T>> for Vec<(T, usize)> {
    fn from(table: FrequencyTable<T>) -> Self {
        table.entries
    }
}

/// Ranks a sequence of observations. Absent observations are discarded.
///
/// ```rust
/// use swatch_tokens::rank;
///
/// let ranked: Vec<(&str, usize)> = rank(vec![Some("a"), None, Some("b"), Some("b")]);
/// assert_eq!(ranked, vec![("b", 2), ("a", 1)]);
/// assert!(rank::<&str, _, _>(Vec::<Option<&str>>::new()).is_empty());
/// ```
pub fn rank<T, V, I>(observations: I) -> Vec<(T, usize)>
where
    T: Eq + Hash + Clone,
    V: Into<Option<T>>,
    I: IntoIterator<Item = V>,
{
    observations
        .into_iter()
        .collect::<FrequencyTable<T>>()
        .ranked()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty() {
        let table: FrequencyTable<String> = FrequencyTable::new();
        assert!(table.is_empty());
        assert!(table.ranked().is_empty());
        assert_eq!(table.most_common(), None);
        assert_eq!(table.total(), 0);
    }

    #[test]
    fn test_counts_and_ranks() {
        let table: FrequencyTable<&str> = ["a", "b", "b", "c", "b", "c"].into_iter().collect();
        assert_eq!(table.count(&"b"), 3);
        assert_eq!(table.count(&"z"), 0);
        assert_eq!(table.ranked(), vec![("b", 3), ("c", 2), ("a", 1)]);
        assert_eq!(table.top(2), vec![("b", 3), ("c", 2)]);
        assert_eq!(table.total(), 6);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let table: FrequencyTable<&str> = ["x", "y", "z", "z", "y", "x"].into_iter().collect();
        assert_eq!(table.ranked(), vec![("x", 2), ("y", 2), ("z", 2)]);
        assert_eq!(table.most_common(), Some(&"x"));
    }

    #[test]
    fn test_absent_observations_are_discarded() {
        let mut table: FrequencyTable<i32> = FrequencyTable::new();
        table.observe(Some(1));
        table.observe(None);
        table.observe(1);
        assert_eq!(table.len(), 1);
        assert_eq!(table.count(&1), 2);
    }

    #[test]
    fn test_merge_appends_new_values() {
        let mut left: FrequencyTable<&str> = ["a", "b"].into_iter().collect();
        let right: FrequencyTable<&str> = ["c", "a", "a"].into_iter().collect();
        left.merge(&right);
        assert_eq!(left.entries(), &[("a", 3), ("b", 1), ("c", 1)]);
    }

    #[test]
    fn test_serializes_as_ordered_pairs() {
        let table: FrequencyTable<String> =
            ["8px", "2px", "8px"].into_iter().map(String::from).collect();
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"[["8px",2],["2px",1]]"#);

        let back: FrequencyTable<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }

    proptest! {
        #[test]
        fn prop_rank_is_stable(values in prop::collection::vec(0u8..6, 0..60)) {
            let ranked = rank::<u8, _, _>(values.iter().copied());

            // Descending by count.
            for pair in ranked.windows(2) {
                prop_assert!(pair[0].1 >= pair[1].1);
            }

            // Equal counts keep first-occurrence order.
            let first_seen = |v: u8| values.iter().position(|&x| x == v).unwrap();
            for pair in ranked.windows(2) {
                if pair[0].1 == pair[1].1 {
                    prop_assert!(first_seen(pair[0].0) < first_seen(pair[1].0));
                }
            }

            // Counts add up.
            let total: usize = ranked.iter().map(|(_, n)| n).sum();
            prop_assert_eq!(total, values.len());
        }
    }
}
