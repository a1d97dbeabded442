//! Encounter-ordered grouping helpers.
//!
//! Groups keep the order in which their key was first seen, so a stable
//! sort on top of them breaks ties by input order.

use std::collections::HashMap;
use std::hash::Hash;

/// Counts items per key, skipping items whose key is `None`.
#[must_use]
pub fn count_by<T, K, I, F>(items: I, mut key: F) -> Vec<(K, u64)>
where
    I: IntoIterator<Item = T>,
    T: Copy,
    K: Eq + Hash + Clone,
    F: FnMut(T) -> Option<K>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, u64)> = Vec::new();

    for item in items {
        let Some(k) = key(item) else {
            continue;
        };
        if let Some(&i) = index.get(&k) {
            counts[i].1 += 1;
        } else {
            index.insert(k.clone(), counts.len());
            counts.push((k, 1));
        }
    }

    counts
}

/// Collects items per key, skipping items whose key is `None`.
#[must_use]
pub fn group_by<T, K, I, F>(items: I, mut key: F) -> Vec<(K, Vec<T>)>
where
    I: IntoIterator<Item = T>,
    T: Copy,
    K: Eq + Hash + Clone,
    F: FnMut(T) -> Option<K>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<T>)> = Vec::new();

    for item in items {
        let Some(k) = key(item) else {
            continue;
        };
        if let Some(&i) = index.get(&k) {
            groups[i].1.push(item);
        } else {
            index.insert(k.clone(), groups.len());
            groups.push((k, vec![item]));
        }
    }

    groups
}

/// Stable sort by count, highest first.
pub fn sort_by_count_desc<K>(counts: &mut [(K, u64)]) {
    counts.sort_by(|a, b| b.1.cmp(&a.1));
}

/// Returns the entry with the highest count; ties go to the earliest entry.
#[must_use]
pub fn max_by_count<K>(counts: &[(K, u64)]) -> Option<&(K, u64)> {
    counts
        .iter()
        .fold(None, |best: Option<&(K, u64)>, entry| match best {
            Some(b) if b.1 >= entry.1 => Some(b),
            _ => Some(entry),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_keep_first_seen_order() {
        let counts = count_by(["b", "a", "b", "c", "a", "b"], Some);
        assert_eq!(counts, vec![("b", 3), ("a", 2), ("c", 1)]);
    }

    #[test]
    fn none_keys_are_skipped() {
        let counts = count_by([Some(1), None, Some(1)], |v| v);
        assert_eq!(counts, vec![(1, 2)]);
    }

    #[test]
    fn stable_sort_breaks_ties_by_encounter() {
        let mut counts = count_by(["x", "y", "z", "y"], Some);
        sort_by_count_desc(&mut counts);
        assert_eq!(counts, vec![("y", 2), ("x", 1), ("z", 1)]);
    }

    #[test]
    fn max_prefers_earliest_on_tie() {
        let counts = vec![("a", 2), ("b", 3), ("c", 3)];
        assert_eq!(max_by_count(&counts), Some(&("b", 3)));
        assert_eq!(max_by_count::<&str>(&[]), None);
    }

    #[test]
    fn groups_collect_members() {
        let groups = group_by([1, 2, 3, 4, 5], |v| Some(v % 2));
        assert_eq!(groups, vec![(1, vec![1, 3, 5]), (0, vec![2, 4])]);
    }
}
