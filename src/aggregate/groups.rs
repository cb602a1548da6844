//! Insertion-ordered grouping of record indices by key.
//!
//! The report derives several metrics from the same "rows per label"
//! partitioning (region shares, product ranking, product revenue). Grouping
//! once and reusing the index keeps each derived metric a single pass and
//! makes iteration order deterministic.

use std::collections::HashMap;

/// Key -> ordered list of record indices, with keys kept in first-encounter
/// order. Lookup is O(1); iteration never depends on hash order.
#[derive(Debug, Clone, Default)]
pub struct GroupIndex {
    slots: Vec<(String, Vec<usize>)>,
    by_key: HashMap<String, usize>,
}

impl GroupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `idx` under `key`, creating the slot on first encounter.
    pub fn push(&mut self, key: &str, idx: usize) {
        match self.by_key.get(key) {
            Some(&slot) => self.slots[slot].1.push(idx),
            None => {
                self.by_key.insert(key.to_string(), self.slots.len());
                self.slots.push((key.to_string(), vec![idx]));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterate groups in first-encounter order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.slots.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// The group with the highest member count.
    ///
    /// Strict `>` comparison keeps the first-encountered key when several
    /// groups tie for the maximum.
    pub fn max_by_count(&self) -> Option<(&str, &[usize])> {
        let mut best: Option<(&str, &[usize])> = None;
        for (key, indices) in self.iter() {
            let beats = match best {
                Some((_, b)) => indices.len() > b.len(),
                None => true,
            };
            if beats {
                best = Some((key, indices));
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_keep_first_encounter_order() {
        let mut index = GroupIndex::new();
        for (i, key) in ["SP", "RJ", "SP", "MG", "RJ", "SP"].iter().enumerate() {
            index.push(key, i);
        }

        let keys: Vec<&str> = index.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["SP", "RJ", "MG"]);

        let sp: Vec<usize> = index.iter().next().unwrap().1.to_vec();
        assert_eq!(sp, vec![0, 2, 5]);
    }

    #[test]
    fn max_by_count_prefers_first_encounter_on_tie() {
        let mut index = GroupIndex::new();
        // "b" and "a" both end up with two members; "b" was seen first.
        for (i, key) in ["b", "a", "a", "b"].iter().enumerate() {
            index.push(key, i);
        }

        let (key, indices) = index.max_by_count().unwrap();
        assert_eq!(key, "b");
        assert_eq!(indices.len(), 2);
    }

    #[test]
    fn max_by_count_empty_is_none() {
        assert!(GroupIndex::new().max_by_count().is_none());
    }
}
