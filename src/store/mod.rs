//! Store Module
//!
//! The capability set the adapter needs from a memcached client.
//!
//! ## Implementations
//! - `network::MemcacheClient`: a real server over TCP
//! - `MemoryStore`: an in-process map with the same outcomes, for tests and
//!   dry runs
//!
//! ## Outcomes
//! Misses, refused adds and stale CAS tokens are errors
//! (`NotFound`, `NotStored`, `CasConflict`), so a single `?` carries them to
//! the caller.

mod memory;

pub use memory::MemoryStore;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use bytes::Bytes;

use crate::error::{DriverError, Result};

/// A stored value as returned by `get`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub key: String,
    pub value: Bytes,
    pub flags: u32,

    /// CAS token, when the store hands one out
    pub cas: Option<u64>,
}

/// Key-value operations a memcached client provides
///
/// Implementations must be safe to share across worker threads.
pub trait Store: Send + Sync {
    /// Fetch an item; `Err(NotFound)` on a miss
    fn get(&self, key: &str) -> Result<Item>;

    /// Store only if absent; `Err(NotStored)` if the key exists
    fn add(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Store unconditionally
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Store only if `cas` is still current; `Err(CasConflict)` if another
    /// writer got there first, `Err(NotFound)` if the key is gone
    fn compare_and_swap(&self, key: &str, value: &[u8], cas: u64) -> Result<()>;

    /// Remove a key; `Err(NotFound)` on a miss
    fn delete(&self, key: &str) -> Result<()>;
}

impl<S: Store + ?Sized> Store for Arc<S> {
    fn get(&self, key: &str) -> Result<Item> {
        (**self).get(key)
    }

    fn add(&self, key: &str, value: &[u8]) -> Result<()> {
        (**self).add(key, value)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        (**self).set(key, value)
    }

    fn compare_and_swap(&self, key: &str, value: &[u8], cas: u64) -> Result<()> {
        (**self).compare_and_swap(key, value, cas)
    }

    fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key)
    }
}

/// Write primitive used for record updates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorePrimitive {
    /// `add`: fails when the record already exists
    #[default]
    CreateIfAbsent,

    /// `set`: replaces the whole record
    SetUnconditional,

    /// `gets` + `cas`: merges the new fields into the current record
    CompareAndSwap,
}

impl StorePrimitive {
    /// Property value naming this primitive
    pub fn as_str(&self) -> &'static str {
        match self {
            StorePrimitive::CreateIfAbsent => "add",
            StorePrimitive::SetUnconditional => "set",
            StorePrimitive::CompareAndSwap => "cas",
        }
    }
}

impl FromStr for StorePrimitive {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "add" => Ok(StorePrimitive::CreateIfAbsent),
            "set" => Ok(StorePrimitive::SetUnconditional),
            "cas" => Ok(StorePrimitive::CompareAndSwap),
            other => Err(DriverError::Config(format!(
                "unknown update primitive {:?} (expected add, set or cas)",
                other
            ))),
        }
    }
}

impl fmt::Display for StorePrimitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
