use std::{
    fmt::{Debug, Display},
    hash::{BuildHasher, Hash, RandomState},
    io::{self, Write},
    thread,
    time::Duration,
};

use crate::{
    error::Result,
    gate::AccessGate,
    options::{CacheOptions, DEFAULT_CAPACITY},
    tracker::{InsertOutcome, RecencyTracker, Round},
};

pub trait Cache<K, V>: Sync + Send
where
    K: Sync + Send,
    V: Sync + Send,
{
    fn insert(&self, key: K, value: V) -> InsertOutcome;

    fn find(&self, key: &K) -> Option<V>;

    fn size(&self) -> usize;
}

/// Bounded least-recently-used cache, safe to share between threads.
///
/// Every operation runs under the cache's [`AccessGate`]: lookups are admitted
/// as readers and may run in parallel, inserts are admitted as writers and run
/// alone. Recency is only advanced by [`insert`](Self::insert); a lookup never
/// protects a key from eviction.
///
/// The cache is not `Clone`. Moving it is a plain Rust move, and
/// [`take`](Self::take) moves the contents out while leaving an empty cache
/// behind.
pub struct LruCache<K, V, S = RandomState> {
    gate: AccessGate<RecencyTracker<K, V, S>>,
}

impl<K, V> LruCache<K, V, RandomState>
where
    K: Hash + Eq + Clone,
{
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_options(CacheOptions::new().capacity(capacity))
    }

    pub fn with_options(opts: &CacheOptions) -> Result<Self> {
        Self::with_options_and_hasher(opts, RandomState::new())
    }
}

impl<K, V, S> LruCache<K, V, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher,
{
    pub fn with_hasher(capacity: usize, hasher: S) -> Result<Self> {
        Self::with_options_and_hasher(CacheOptions::new().capacity(capacity), hasher)
    }

    pub fn with_options_and_hasher(opts: &CacheOptions, hasher: S) -> Result<Self> {
        opts.validate()?;
        let tracker = RecencyTracker::new(opts.get_capacity(), opts.is_verbose(), hasher);
        Ok(Self {
            gate: AccessGate::new(tracker),
        })
    }

    pub fn capacity(&self) -> usize {
        self.gate.enter_as_reader().capacity()
    }

    /// Number of distinct keys currently held.
    pub fn size(&self) -> usize {
        self.gate.enter_as_reader().len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn contains(&self, key: &K) -> bool {
        self.gate.enter_as_reader().contains(key)
    }

    pub fn find(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.find_with_delay(key, Duration::ZERO)
    }

    /// Same as [`find`](Self::find), but returns `(V::default(), false)` on a
    /// miss.
    pub fn find_or_default(&self, key: &K) -> (V, bool)
    where
        V: Clone + Default,
    {
        match self.find(key) {
            Some(value) => (value, true),
            None => (V::default(), false),
        }
    }

    /// Holds reader admission for `delay` before the lookup. Only meant for
    /// tests that need deterministic overlap between threads.
    pub fn find_with_delay(&self, key: &K, delay: Duration) -> Option<V>
    where
        V: Clone,
    {
        let tracker = self.gate.enter_as_reader();
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        tracker.get(key).cloned()
    }

    /// Inserts a new key, evicting the oldest one when full.
    ///
    /// For a key that is already present only its recency is refreshed; the
    /// stored value is left untouched and `value` is dropped.
    pub fn insert(&self, key: K, value: V) -> InsertOutcome {
        self.insert_with_delay(key, value, Duration::ZERO)
    }

    /// Holds writer admission for `delay` before the insert. Only meant for
    /// tests that need deterministic overlap between threads.
    pub fn insert_with_delay(&self, key: K, value: V, delay: Duration) -> InsertOutcome {
        let mut tracker = self.gate.enter_as_writer();
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        tracker.insert(key, value)
    }

    pub fn current_round(&self) -> Round {
        self.gate.enter_as_reader().current_round()
    }

    /// Round of the next eviction candidate, `None` when empty.
    pub fn oldest_round(&self) -> Option<Round> {
        self.gate.enter_as_reader().oldest_round()
    }

    /// Writes every entry with its round to stdout, oldest first.
    pub fn debug_dump<FK, FV>(&self, key_fmt: FK, value_fmt: FV) -> Result<()>
    where
        FK: Fn(&K) -> String,
        FV: Fn(&V) -> String,
    {
        self.debug_dump_to(io::stdout().lock(), key_fmt, value_fmt)
    }

    /// [`debug_dump`](Self::debug_dump) for keys and values that print
    /// themselves.
    pub fn debug_dump_display(&self) -> Result<()>
    where
        K: Display,
        V: Display,
    {
        self.debug_dump(|k| k.to_string(), |v| v.to_string())
    }

    pub fn debug_dump_to<W, FK, FV>(&self, mut out: W, key_fmt: FK, value_fmt: FV) -> Result<()>
    where
        W: Write,
        FK: Fn(&K) -> String,
        FV: Fn(&V) -> String,
    {
        let tracker = self.gate.enter_as_reader();
        writeln!(out, "Contents of cache ({}):", tracker.len())?;
        for (key, value, round) in tracker.iter_oldest_first() {
            writeln!(
                out,
                "[{}] -> {} (at round {})",
                key_fmt(key),
                value_fmt(value),
                round
            )?;
        }
        out.flush()?;
        Ok(())
    }
}

impl<K, V, S> LruCache<K, V, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher + Clone,
{
    /// Moves all entries, the round counter and the configuration into a new
    /// cache. `self` is left empty and usable with the same capacity.
    pub fn take(&mut self) -> Self {
        let tracker = self.gate.get_mut();
        let empty = tracker.empty_like();
        Self {
            gate: AccessGate::new(std::mem::replace(tracker, empty)),
        }
    }
}

impl<K, V, S> Default for LruCache<K, V, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self {
            gate: AccessGate::new(RecencyTracker::new(DEFAULT_CAPACITY, false, S::default())),
        }
    }
}

impl<K, V, S> Debug for LruCache<K, V, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tracker = self.gate.enter_as_reader();
        f.debug_struct("LruCache")
            .field("capacity", &tracker.capacity())
            .field("size", &tracker.len())
            .field("current_round", &tracker.current_round())
            .field("oldest_round", &tracker.oldest_round())
            .field("verbose", &tracker.is_verbose())
            .finish()
    }
}

impl<K, V, S> Cache<K, V> for LruCache<K, V, S>
where
    K: Send + Sync + Hash + Eq + Clone,
    V: Send + Sync + Clone,
    S: Send + Sync + BuildHasher,
{
    fn insert(&self, key: K, value: V) -> InsertOutcome {
        LruCache::insert(self, key, value)
    }

    fn find(&self, key: &K) -> Option<V> {
        LruCache::find(self, key)
    }

    fn size(&self) -> usize {
        LruCache::size(self)
    }
}
