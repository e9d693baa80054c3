//! # memcdriver
//!
//! A memcached driver for CRUD workload benchmarking harnesses:
//! - Generic `table/key/fields/values` calls mapped onto memcached
//! - Records stored as one JSON blob per key, values base64-encoded
//! - Blocking text-protocol client with connection reuse
//! - Explicit driver registry instead of global registration
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Benchmark Harness (workers)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  Registry::create("memc", props)
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     MemcachedDb (Db)                        │
//! │        qualified keys · record blobs · field filter         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  Store trait
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌──────────────┐         ┌──────────────┐
//!   │MemcacheClient│         │ MemoryStore  │
//!   │ (TCP, ASCII) │         │  (RwLock)    │
//!   └──────┬───────┘         └──────────────┘
//!          │
//!          ▼
//!   ┌──────────────┐
//!   │  memcached   │
//!   └──────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod properties;

pub mod key;
pub mod record;
pub mod protocol;
pub mod network;
pub mod store;

pub mod db;
pub mod adapter;
pub mod registry;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{DriverError, Result};
pub use config::Config;
pub use properties::Properties;
pub use key::KeyScheme;
pub use record::Record;
pub use network::MemcacheClient;
pub use store::{MemoryStore, Store, StorePrimitive};
pub use db::{Context, Db};
pub use adapter::MemcachedDb;
pub use registry::{DbCreator, MemcachedCreator, Registry};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of memcdriver
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
