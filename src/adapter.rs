//! Memcached Driver
//!
//! Maps harness CRUD calls onto memcached.
//!
//! ## Mapping
//! - read   -> `gets`, decode blob, keep requested fields
//! - insert -> `add` (fails if the record exists)
//! - update -> `add`, `set` or `gets`+`cas`, per `StorePrimitive`
//! - delete -> `delete`
//! - scan   -> nothing; memcached cannot iterate keys in order
//!
//! Each record is one JSON blob under its qualified key, so every call is a
//! single-key operation and the driver itself holds no state beyond config.

use crate::config::Config;
use crate::db::{Context, Db, SqlDb};
use crate::error::{DriverError, Result};
use crate::key::KeyScheme;
use crate::network::MemcacheClient;
use crate::record::{decode_record, encode_record, project, Record};
use crate::store::{Store, StorePrimitive};

/// Harness driver backed by a memcached store
pub struct MemcachedDb<S: Store = MemcacheClient> {
    store: S,
    key_scheme: KeyScheme,
    update_primitive: StorePrimitive,
}

impl MemcachedDb<MemcacheClient> {
    /// Build a driver talking to the server in `config`
    pub fn connect(config: &Config) -> Self {
        Self::with_store(MemcacheClient::from_config(config), config)
    }
}

impl<S: Store> MemcachedDb<S> {
    /// Build a driver over any store
    pub fn with_store(store: S, config: &Config) -> Self {
        Self {
            store,
            key_scheme: config.key_scheme,
            update_primitive: config.update_primitive,
        }
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn key_scheme(&self) -> KeyScheme {
        self.key_scheme
    }

    pub fn update_primitive(&self) -> StorePrimitive {
        self.update_primitive
    }

    /// Memcached key for `(table, key)`
    pub fn qualified_key(&self, table: &str, key: &str) -> String {
        self.key_scheme.qualify(table, key)
    }

    fn fetch(&self, key: &str) -> Result<Record> {
        let item = self.store.get(key)?;
        decode_record(&item.value)
    }

    /// Write `values` under `key` with the given primitive
    fn write(&self, primitive: StorePrimitive, key: &str, values: &Record) -> Result<()> {
        match primitive {
            StorePrimitive::CreateIfAbsent => self.store.add(key, &encode_record(values)?),
            StorePrimitive::SetUnconditional => self.store.set(key, &encode_record(values)?),
            StorePrimitive::CompareAndSwap => {
                let item = self.store.get(key)?;
                let cas = item.cas.ok_or_else(|| {
                    DriverError::Protocol(format!("no CAS token returned for {:?}", key))
                })?;

                let mut record = decode_record(&item.value)?;
                record.extend(values.iter().map(|(k, v)| (k.clone(), v.clone())));

                self.store.compare_and_swap(key, &encode_record(&record)?, cas)
            }
        }
    }
}

impl<S: Store> Db for MemcachedDb<S> {
    /// No per-thread state; the context is returned as is
    fn init_thread(&self, ctx: Context, _thread_id: usize, _thread_count: usize) -> Context {
        ctx
    }

    fn cleanup_thread(&self, _ctx: &Context) {}

    fn read(&self, _ctx: &Context, table: &str, key: &str, fields: &[&str]) -> Result<Record> {
        let qualified = self.qualified_key(table, key);
        tracing::trace!("read {}", qualified);

        let record = self
            .fetch(&qualified)
            .map_err(|e| DriverError::operation("Read", e))?;
        Ok(project(record, fields))
    }

    /// Not supported: memcached has no ordered key iteration. Always returns
    /// an empty result and no error.
    fn scan(
        &self,
        _ctx: &Context,
        _table: &str,
        _start_key: &str,
        _count: usize,
        _fields: &[&str],
    ) -> Result<Vec<Record>> {
        Ok(Vec::new())
    }

    fn update(&self, _ctx: &Context, table: &str, key: &str, values: &Record) -> Result<()> {
        let qualified = self.qualified_key(table, key);
        tracing::trace!("update {} via {}", qualified, self.update_primitive);

        self.write(self.update_primitive, &qualified, values)
            .map_err(|e| DriverError::operation("Update", e))
    }

    fn insert(&self, _ctx: &Context, table: &str, key: &str, values: &Record) -> Result<()> {
        let qualified = self.qualified_key(table, key);
        tracing::trace!("insert {}", qualified);

        self.write(StorePrimitive::CreateIfAbsent, &qualified, values)
            .map_err(|e| DriverError::operation("Insert", e))
    }

    fn delete(&self, _ctx: &Context, table: &str, key: &str) -> Result<()> {
        let qualified = self.qualified_key(table, key);
        tracing::trace!("delete {}", qualified);

        self.store
            .delete(&qualified)
            .map_err(|e| DriverError::operation("Delete", e))
    }

    /// Connections belong to the client and close when it drops
    fn close(&self) -> Result<()> {
        Ok(())
    }

    fn sql_db(&self) -> Option<&dyn SqlDb> {
        None
    }
}
