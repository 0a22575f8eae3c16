mod cache;
mod tracker;

#[cfg(test)]
mod test_utils;

pub mod error;
pub mod gate;
pub mod options;

pub mod prelude {
    pub use crate::{
        cache::{Cache, LruCache},
        error::{Error, Result},
        gate::AccessGate,
        options::{CacheOptions, DEFAULT_CAPACITY},
        tracker::{InsertOutcome, Round},
    };
}
pub use prelude::*;
