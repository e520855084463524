//! Symmetric adjacency plus the "reachable from main" flag, shared by the
//! room graph and the world graph.

use std::collections::BTreeSet;

use serde::Serialize;
use slotmap::{Key, SecondaryMap};

#[derive(Clone, Debug, Serialize)]
pub struct Linkage<K: Key> {
    adjacency: SecondaryMap<K, BTreeSet<K>>,
    accessible: SecondaryMap<K, bool>,
}

impl<K: Key + Ord> Linkage<K> {
    pub fn new(keys: impl IntoIterator<Item = K>) -> Self {
        let mut adjacency = SecondaryMap::new();
        let mut accessible = SecondaryMap::new();
        for key in keys {
            adjacency.insert(key, BTreeSet::new());
            accessible.insert(key, false);
        }
        Self { adjacency, accessible }
    }

    pub fn connections(&self, key: K) -> impl Iterator<Item = K> + '_ {
        self.adjacency.get(key).into_iter().flat_map(|set| set.iter().copied())
    }

    pub fn connection_count(&self, key: K) -> usize {
        self.adjacency.get(key).map_or(0, BTreeSet::len)
    }

    pub fn is_connected(&self, a: K, b: K) -> bool {
        self.adjacency.get(a).is_some_and(|set| set.contains(&b))
    }

    pub fn is_accessible(&self, key: K) -> bool {
        self.accessible.get(key).copied().unwrap_or(false)
    }

    /// Records a mutual connection. If either side is already reachable from
    /// main, reachability spreads to everything attached to the other side.
    pub fn link(&mut self, a: K, b: K) {
        if a == b || !self.adjacency.contains_key(a) || !self.adjacency.contains_key(b) {
            return;
        }
        let a_accessible = self.is_accessible(a);
        let b_accessible = self.is_accessible(b);
        if let Some(set) = self.adjacency.get_mut(a) {
            set.insert(b);
        }
        if let Some(set) = self.adjacency.get_mut(b) {
            set.insert(a);
        }
        if a_accessible {
            self.set_accessible_from_main(b);
        } else if b_accessible {
            self.set_accessible_from_main(a);
        }
    }

    /// Marks `key` and everything transitively connected to it. A key that
    /// is already marked stops the walk, which also handles cycles.
    pub fn set_accessible_from_main(&mut self, key: K) {
        let mut pending = vec![key];
        while let Some(current) = pending.pop() {
            match self.accessible.get_mut(current) {
                Some(flag) if !*flag => *flag = true,
                _ => continue,
            }
            if let Some(set) = self.adjacency.get(current) {
                pending.extend(set.iter().copied());
            }
        }
    }

    pub fn all_accessible(&self) -> bool {
        self.accessible.values().all(|&flag| flag)
    }

    pub fn inaccessible_count(&self) -> usize {
        self.accessible.values().filter(|&&flag| !flag).count()
    }

    pub fn component_size(&self, root: K) -> usize {
        if !self.adjacency.contains_key(root) {
            return 0;
        }
        let mut seen = BTreeSet::from([root]);
        let mut pending = vec![root];
        while let Some(current) = pending.pop() {
            for next in self.connections(current) {
                if seen.insert(next) {
                    pending.push(next);
                }
            }
        }
        seen.len()
    }

    pub fn link_count(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).sum::<usize>() / 2
    }
}
