use std::hash::{BuildHasher, Hash, RandomState};

use crate::{
    cache::LruCache,
    error::{Error, Result},
};

/// Capacity used when none is configured.
pub const DEFAULT_CAPACITY: usize = 100;

#[derive(Debug, Clone)]
pub struct CacheOptions {
    capacity: usize,

    verbose: bool,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            verbose: false,
        }
    }
}

impl CacheOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum number of entries held before the oldest one is evicted.
    pub fn capacity(&mut self, capacity: usize) -> &mut Self {
        self.capacity = capacity;
        self
    }

    /// Log every recency change at `debug` instead of `trace`.
    pub fn verbose(&mut self, verbose: bool) -> &mut Self {
        self.verbose = verbose;
        self
    }

    pub fn get_capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity < 1 {
            return Err(Error::InvalidConfiguration(format!(
                "capacity must be at least 1, got {}",
                self.capacity
            )));
        }
        Ok(())
    }

    pub fn build<K, V>(&self) -> Result<LruCache<K, V>>
    where
        K: Hash + Eq + Clone,
    {
        self.build_with_hasher(RandomState::new())
    }

    pub fn build_with_hasher<K, V, S>(&self, hasher: S) -> Result<LruCache<K, V, S>>
    where
        K: Hash + Eq + Clone,
        S: BuildHasher,
    {
        LruCache::with_options_and_hasher(self, hasher)
    }
}
