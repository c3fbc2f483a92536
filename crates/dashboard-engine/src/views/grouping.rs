//! Group-by accumulation shared by the table and chart views

use std::collections::HashMap;
use std::hash::Hash;

/// Per-key sums of `N` metrics, remembering the order in which keys were
/// first seen.
pub(crate) struct GroupedSums<K, const N: usize> {
    index: HashMap<K, usize>,
    groups: Vec<(K, [f64; N])>,
}

impl<K: Eq + Hash + Clone, const N: usize> GroupedSums<K, N> {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            groups: Vec::new(),
        }
    }

    pub fn add(&mut self, key: K, values: [f64; N]) {
        match self.index.get(&key) {
            Some(&slot) => {
                let sums = &mut self.groups[slot].1;
                for (sum, value) in sums.iter_mut().zip(values) {
                    *sum += value;
                }
            }
            None => {
                self.index.insert(key.clone(), self.groups.len());
                self.groups.push((key, values));
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, key: &K) -> Option<&[f64; N]> {
        self.index.get(key).map(|&slot| &self.groups[slot].1)
    }

    /// Groups ordered by key
    pub fn into_sorted(self) -> Vec<(K, [f64; N])>
    where
        K: Ord,
    {
        let mut groups = self.groups;
        groups.sort_by(|a, b| a.0.cmp(&b.0));
        groups
    }

    /// Groups ordered by descending `metric`. Ties keep first-seen order.
    pub fn into_ranked(self, metric: usize) -> Vec<(K, [f64; N])> {
        let mut groups = self.groups;
        groups.sort_by(|a, b| b.1[metric].total_cmp(&a.1[metric]));
        groups
    }
}
