//! In-process store
//!
//! HashMap-based store behind a RwLock, mirroring memcached outcomes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use parking_lot::RwLock;

use super::{Item, Store};
use crate::error::{DriverError, Result};
use crate::key::check_key;

/// A stored value and its CAS token
#[derive(Debug, Clone)]
struct Entry {
    value: Bytes,
    cas: u64,
}

/// In-memory stand-in for a memcached server
///
/// Reads take a shared lock; writes take the exclusive lock. Every write
/// bumps the item's CAS token.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RwLock<HashMap<String, Entry>>,
    next_cas: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored items
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Raw stored bytes for a key, bypassing the adapter
    pub fn raw(&self, key: &str) -> Option<Bytes> {
        self.items.read().get(key).map(|e| e.value.clone())
    }

    fn entry(&self, value: &[u8]) -> Entry {
        Entry {
            value: Bytes::copy_from_slice(value),
            cas: self.next_cas.fetch_add(1, Ordering::Relaxed) + 1,
        }
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Item> {
        check_key(key)?;
        let items = self.items.read();
        let entry = items.get(key).ok_or(DriverError::NotFound)?;
        Ok(Item {
            key: key.to_string(),
            value: entry.value.clone(),
            flags: 0,
            cas: Some(entry.cas),
        })
    }

    fn add(&self, key: &str, value: &[u8]) -> Result<()> {
        check_key(key)?;
        let mut items = self.items.write();
        if items.contains_key(key) {
            return Err(DriverError::NotStored);
        }
        let entry = self.entry(value);
        items.insert(key.to_string(), entry);
        Ok(())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        check_key(key)?;
        let entry = self.entry(value);
        self.items.write().insert(key.to_string(), entry);
        Ok(())
    }

    fn compare_and_swap(&self, key: &str, value: &[u8], cas: u64) -> Result<()> {
        check_key(key)?;
        let mut items = self.items.write();
        match items.get(key) {
            None => Err(DriverError::NotFound),
            Some(current) if current.cas != cas => Err(DriverError::CasConflict),
            Some(_) => {
                let entry = self.entry(value);
                items.insert(key.to_string(), entry);
                Ok(())
            }
        }
    }

    fn delete(&self, key: &str) -> Result<()> {
        check_key(key)?;
        self.items
            .write()
            .remove(key)
            .map(|_| ())
            .ok_or(DriverError::NotFound)
    }
}
