//! Configuration for memcdriver
//!
//! Centralized configuration with sensible defaults, read from the harness
//! property bag.
//!
//! ## Properties
//! | Key                  | Default           | Meaning                          |
//! |----------------------|-------------------|----------------------------------|
//! | `memc.uri`           | `127.0.0.1:11211` | server address                   |
//! | `memc.timeout_ms`    | `500`             | connect/read/write timeout       |
//! | `memc.max_idle_conns`| `2`               | idle connections kept, 0 = none |
//! | `memc.update`        | `add`             | update primitive: add, set, cas  |
//! | `memc.keyscheme`     | `length_prefixed` | key layout: concat, length_prefixed |

use crate::error::Result;
use crate::key::KeyScheme;
use crate::properties::Properties;
use crate::store::StorePrimitive;

pub const URI_PROPERTY: &str = "memc.uri";
pub const URI_DEFAULT: &str = "127.0.0.1:11211";

pub const TIMEOUT_PROPERTY: &str = "memc.timeout_ms";
pub const TIMEOUT_DEFAULT_MS: u64 = 500;

pub const MAX_IDLE_PROPERTY: &str = "memc.max_idle_conns";
pub const MAX_IDLE_DEFAULT: usize = 2;

pub const UPDATE_PROPERTY: &str = "memc.update";
pub const KEY_SCHEME_PROPERTY: &str = "memc.keyscheme";

/// Main configuration for the memcached driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Client Configuration
    // -------------------------------------------------------------------------
    /// Server address (host:port)
    pub uri: String,

    /// Connect, read and write timeout (milliseconds, 0 disables)
    pub timeout_ms: u64,

    /// Idle connections kept for reuse (0 dials per call)
    pub max_idle_conns: usize,

    // -------------------------------------------------------------------------
    // Adapter Configuration
    // -------------------------------------------------------------------------
    /// Primitive used by update; insert always uses create-if-absent
    pub update_primitive: StorePrimitive,

    /// How (table, key) becomes a memcached key
    pub key_scheme: KeyScheme,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            uri: URI_DEFAULT.to_string(),
            timeout_ms: TIMEOUT_DEFAULT_MS,
            max_idle_conns: MAX_IDLE_DEFAULT,
            update_primitive: StorePrimitive::CreateIfAbsent,
            key_scheme: KeyScheme::LengthPrefixed,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Read config from a property bag, defaulting anything absent
    pub fn from_properties(props: &Properties) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            uri: props.get_string(URI_PROPERTY, URI_DEFAULT),
            timeout_ms: props.get_parsed(TIMEOUT_PROPERTY, defaults.timeout_ms)?,
            max_idle_conns: props.get_parsed(MAX_IDLE_PROPERTY, defaults.max_idle_conns)?,
            update_primitive: props.get_parsed(UPDATE_PROPERTY, defaults.update_primitive)?,
            key_scheme: props.get_parsed(KEY_SCHEME_PROPERTY, defaults.key_scheme)?,
        })
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the server address
    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.config.uri = uri.into();
        self
    }

    /// Set the socket timeout (in milliseconds)
    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.config.timeout_ms = ms;
        self
    }

    /// Set how many idle connections are kept
    pub fn max_idle_conns(mut self, count: usize) -> Self {
        self.config.max_idle_conns = count;
        self
    }

    /// Set the update primitive
    pub fn update_primitive(mut self, primitive: StorePrimitive) -> Self {
        self.config.update_primitive = primitive;
        self
    }

    /// Set the key scheme
    pub fn key_scheme(mut self, scheme: KeyScheme) -> Self {
        self.config.key_scheme = scheme;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
