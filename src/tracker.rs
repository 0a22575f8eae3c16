use std::{
    collections::HashMap,
    hash::{BuildHasher, Hash},
};

use remcache_utils::prelude::{SlabList, SlotId};

/// Logical timestamp of the last insert or refresh of a key.
pub type Round = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsertOutcome {
    NewlyInserted,
    AlreadyPresent,
}

macro_rules! recency_event {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            tracing::debug!($($arg)+);
        } else {
            tracing::trace!($($arg)+);
        }
    };
}

struct Entry<K, V> {
    key: K,
    value: V,
    round: Round,
}

/// LRU bookkeeping, with no knowledge of threads.
///
/// `index` maps a key to its node in `entries`; `entries` is ordered from the
/// most recently touched key (front) to the least recently touched (back).
/// Each node carries the round it was last touched at, so rounds strictly
/// decrease from front to back and the back node holds the oldest round.
pub(crate) struct RecencyTracker<K, V, S> {
    index: HashMap<K, SlotId, S>,
    entries: SlabList<Entry<K, V>>,
    round: Round,
    capacity: usize,
    verbose: bool,
}

impl<K, V, S> RecencyTracker<K, V, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher,
{
    /// `capacity` must already be validated as non-zero.
    pub fn new(capacity: usize, verbose: bool, hasher: S) -> Self {
        debug_assert!(capacity > 0);
        Self {
            index: HashMap::with_capacity_and_hasher(capacity, hasher),
            entries: SlabList::with_capacity(capacity),
            round: 0,
            capacity,
            verbose,
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn current_round(&self) -> Round {
        self.round
    }

    pub fn oldest_round(&self) -> Option<Round> {
        self.entries.back().map(|e| e.round)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Looks a key up without touching its round.
    pub fn get(&self, key: &K) -> Option<&V> {
        let id = self.index.get(key)?;
        self.entries.get(*id).map(|e| &e.value)
    }

    pub fn insert(&mut self, key: K, value: V) -> InsertOutcome {
        if let Some(&id) = self.index.get(&key) {
            self.refresh(id);
            return InsertOutcome::AlreadyPresent;
        }

        self.round += 1;
        if self.index.len() >= self.capacity {
            self.evict_oldest();
        }

        let round = self.round;
        let id = self.entries.push_front(Entry {
            key: key.clone(),
            value,
            round,
        });
        self.index.insert(key, id);

        recency_event!(self.verbose, "new key inserted at round {}", round);
        InsertOutcome::NewlyInserted
    }

    /// Entries from the oldest round to the newest.
    pub fn iter_oldest_first(&self) -> impl Iterator<Item = (&K, &V, Round)> {
        self.entries.iter().rev().map(|e| (&e.key, &e.value, e.round))
    }

    /// Advances the round of an existing key. The stored value is kept.
    fn refresh(&mut self, id: SlotId) {
        let Some(entry) = self.entries.get_mut(id) else {
            return;
        };
        // already the newest touch in this round
        if entry.round == self.round {
            return;
        }

        let previous = entry.round;
        self.round += 1;
        entry.round = self.round;
        self.entries.move_to_front(id);

        recency_event!(
            self.verbose,
            "key insertion round updated from {} to {}, oldest round is {:?}",
            previous,
            self.round,
            self.oldest_round()
        );
    }

    fn evict_oldest(&mut self) {
        let Some(id) = self.entries.back_id() else {
            return;
        };
        let Some(entry) = self.entries.remove(id) else {
            return;
        };
        self.index.remove(&entry.key);

        recency_event!(
            self.verbose,
            "max capacity reached, evicted key from round {}, new oldest round is {:?}",
            entry.round,
            self.oldest_round()
        );
    }
}

impl<K, V, S> RecencyTracker<K, V, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher + Clone,
{
    /// A fresh tracker with the same capacity, verbosity and hasher.
    pub fn empty_like(&self) -> Self {
        Self::new(self.capacity, self.verbose, self.index.hasher().clone())
    }
}

#[cfg(test)]
impl<K, V, S> RecencyTracker<K, V, S>
where
    K: Hash + Eq + Clone + std::fmt::Debug,
    S: BuildHasher,
{
    pub fn check_invariants(&self) {
        assert_eq!(self.index.len(), self.entries.len());
        assert!(self.index.len() <= self.capacity);

        for (key, id) in self.index.iter() {
            let entry = self.entries.get(*id).expect("index points at a vacant slot");
            assert_eq!(&entry.key, key);
        }

        let rounds: Vec<Round> = self.entries.iter().map(|e| e.round).collect();
        assert!(
            rounds.windows(2).all(|w| w[0] > w[1]),
            "rounds not strictly decreasing: {:?}",
            rounds
        );
        if let Some(newest) = rounds.first() {
            assert!(*newest <= self.round);
        }
        assert_eq!(self.oldest_round(), rounds.last().copied());
    }
}
