//! Driver registry
//!
//! Maps short driver names to factories. The harness builds one `Registry`
//! at its composition root and registers the drivers it wants; there is no
//! process-wide registry.
//!
//! ```no_run
//! use memcdriver::{registry, Context, Properties, Registry};
//!
//! # fn main() -> memcdriver::Result<()> {
//! let mut drivers = Registry::new();
//! registry::register(&mut drivers)?;
//!
//! let db = drivers.create(registry::DRIVER_NAME, &Properties::new())?;
//! let _record = db.read(&Context::background(), "usertable", "user1", &[])?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;

use crate::adapter::MemcachedDb;
use crate::config::Config;
use crate::db::Db;
use crate::error::{DriverError, Result};
use crate::properties::Properties;

/// Name the memcached driver registers under
pub const DRIVER_NAME: &str = "memc";

/// Builds a driver from a property bag
pub trait DbCreator: Send + Sync {
    fn create(&self, props: &Properties) -> Result<Box<dyn Db>>;
}

/// Factory for `MemcachedDb`
#[derive(Debug, Clone, Copy, Default)]
pub struct MemcachedCreator;

impl DbCreator for MemcachedCreator {
    fn create(&self, props: &Properties) -> Result<Box<dyn Db>> {
        let config = Config::from_properties(props)?;
        tracing::info!(
            "memcached driver: uri={} update={} keyscheme={}",
            config.uri,
            config.update_primitive,
            config.key_scheme
        );
        Ok(Box::new(MemcachedDb::connect(&config)))
    }
}

/// Named driver factories
#[derive(Default)]
pub struct Registry {
    creators: HashMap<String, Box<dyn DbCreator>>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory; a name can only be taken once
    pub fn register(
        &mut self,
        name: impl Into<String>,
        creator: impl DbCreator + 'static,
    ) -> Result<()> {
        let name = name.into();
        if self.creators.contains_key(&name) {
            return Err(DriverError::Config(format!(
                "driver {:?} is already registered",
                name
            )));
        }
        self.creators.insert(name, Box::new(creator));
        Ok(())
    }

    /// Build the driver registered as `name`
    pub fn create(&self, name: &str, props: &Properties) -> Result<Box<dyn Db>> {
        let creator = self
            .creators
            .get(name)
            .ok_or_else(|| DriverError::Config(format!("unknown driver {:?}", name)))?;
        creator.create(props)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.creators.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.creators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Register the memcached driver under `memc`
pub fn register(registry: &mut Registry) -> Result<()> {
    registry.register(DRIVER_NAME, MemcachedCreator)
}
