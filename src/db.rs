//! Driver interface
//!
//! What a benchmarking harness calls on a database driver. Workers share one
//! driver instance, so every method takes `&self`.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::Result;
use crate::record::Record;

/// Per-call execution context
///
/// An immutable, cheaply clonable bag of string values the harness threads
/// through calls. Drivers that need per-thread state derive a new context in
/// `init_thread`; drivers that don't return it unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    values: Arc<BTreeMap<String, String>>,
}

impl Context {
    /// Empty root context
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a context carrying one more value
    pub fn with_value(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut values = (*self.values).clone();
        values.insert(key.into(), value.into());
        Self {
            values: Arc::new(values),
        }
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

/// Handle to a relational database behind a driver
pub trait SqlDb: Send + Sync {
    /// Driver name of the SQL backend
    fn driver_name(&self) -> &str;
}

/// A database driver the harness can run workloads against
pub trait Db: Send + Sync {
    /// Prepare per-thread state; returns the context the thread should use
    fn init_thread(&self, ctx: Context, thread_id: usize, thread_count: usize) -> Context;

    /// Release per-thread state
    fn cleanup_thread(&self, ctx: &Context);

    /// Read one record; an empty `fields` slice means every field
    fn read(&self, ctx: &Context, table: &str, key: &str, fields: &[&str]) -> Result<Record>;

    /// Read up to `count` records starting at `start_key`
    ///
    /// Drivers for stores without ordered iteration return an empty result
    /// rather than an error.
    fn scan(
        &self,
        ctx: &Context,
        table: &str,
        start_key: &str,
        count: usize,
        fields: &[&str],
    ) -> Result<Vec<Record>>;

    /// Write `values` to an existing record
    fn update(&self, ctx: &Context, table: &str, key: &str, values: &Record) -> Result<()>;

    /// Create a record
    fn insert(&self, ctx: &Context, table: &str, key: &str, values: &Record) -> Result<()>;

    /// Remove a record
    fn delete(&self, ctx: &Context, table: &str, key: &str) -> Result<()>;

    /// Release driver-wide resources
    fn close(&self) -> Result<()>;

    /// Relational handle, for drivers backed by a SQL database
    fn sql_db(&self) -> Option<&dyn SqlDb> {
        None
    }
}
