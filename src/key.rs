//! Qualified keys
//!
//! Every record lives under one memcached key derived from `(table, key)`.
//!
//! ## Schemes
//! - `concat`: `{table}-{key}`. Compatible with data loaded by older
//!   drivers, but not injective: `("a-b", "c")` and `("a", "b-c")` both
//!   map to `a-b-c`.
//! - `length_prefixed`: `{len(table)}:{table}-{key}`. The byte length of the
//!   table pins where the table ends, so distinct pairs never collide.

use std::fmt;
use std::str::FromStr;

use crate::error::{DriverError, Result};

/// Longest key memcached accepts
pub const MAX_KEY_LEN: usize = 250;

/// Separator between table and key
pub const SEPARATOR: char = '-';

/// How `(table, key)` is composed into a memcached key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyScheme {
    /// `{table}-{key}`
    Concat,

    /// `{len(table)}:{table}-{key}`
    #[default]
    LengthPrefixed,
}

impl KeyScheme {
    /// Compose the qualified key for `(table, key)`
    pub fn qualify(&self, table: &str, key: &str) -> String {
        match self {
            KeyScheme::Concat => format!("{}{}{}", table, SEPARATOR, key),
            KeyScheme::LengthPrefixed => {
                format!("{}:{}{}{}", table.len(), table, SEPARATOR, key)
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            KeyScheme::Concat => "concat",
            KeyScheme::LengthPrefixed => "length_prefixed",
        }
    }
}

impl FromStr for KeyScheme {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "concat" => Ok(KeyScheme::Concat),
            "length_prefixed" => Ok(KeyScheme::LengthPrefixed),
            other => Err(DriverError::Config(format!(
                "unknown key scheme {:?} (expected concat or length_prefixed)",
                other
            ))),
        }
    }
}

impl fmt::Display for KeyScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether memcached will accept `key`
///
/// Keys are at most 250 bytes and contain no whitespace or control bytes.
pub fn is_legal_key(key: &str) -> bool {
    key.len() <= MAX_KEY_LEN && key.bytes().all(|b| b > b' ' && b != 0x7f)
}

/// Reject keys memcached would refuse, before they reach the wire
pub fn check_key(key: &str) -> Result<()> {
    if key.is_empty() || !is_legal_key(key) {
        return Err(DriverError::MalformedKey(key.to_string()));
    }
    Ok(())
}
