//! Command definitions
//!
//! Requests the client sends to memcached.

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Get,
    Gets,
    Set,
    Add,
    Cas,
    Delete,
    Version,
}

impl CommandType {
    /// Verb as it appears on the wire
    pub fn verb(&self) -> &'static str {
        match self {
            CommandType::Get => "get",
            CommandType::Gets => "gets",
            CommandType::Set => "set",
            CommandType::Add => "add",
            CommandType::Cas => "cas",
            CommandType::Delete => "delete",
            CommandType::Version => "version",
        }
    }
}

/// A memcached request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch a value
    Get { key: String },

    /// Fetch a value together with its CAS token
    Gets { key: String },

    /// Store unconditionally
    Set {
        key: String,
        flags: u32,
        exptime: u32,
        value: Vec<u8>,
    },

    /// Store only if the key is absent
    Add {
        key: String,
        flags: u32,
        exptime: u32,
        value: Vec<u8>,
    },

    /// Store only if the CAS token still matches
    Cas {
        key: String,
        flags: u32,
        exptime: u32,
        value: Vec<u8>,
        cas: u64,
    },

    /// Remove a key
    Delete { key: String },

    /// Server version (health check)
    Version,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Get { .. } => CommandType::Get,
            Command::Gets { .. } => CommandType::Gets,
            Command::Set { .. } => CommandType::Set,
            Command::Add { .. } => CommandType::Add,
            Command::Cas { .. } => CommandType::Cas,
            Command::Delete { .. } => CommandType::Delete,
            Command::Version => CommandType::Version,
        }
    }

    /// The key this command addresses, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            Command::Get { key }
            | Command::Gets { key }
            | Command::Set { key, .. }
            | Command::Add { key, .. }
            | Command::Cas { key, .. }
            | Command::Delete { key } => Some(key),
            Command::Version => None,
        }
    }

    pub fn set(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Command::Set {
            key: key.into(),
            flags: 0,
            exptime: 0,
            value: value.into(),
        }
    }

    pub fn add(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Command::Add {
            key: key.into(),
            flags: 0,
            exptime: 0,
            value: value.into(),
        }
    }

    pub fn cas(key: impl Into<String>, value: impl Into<Vec<u8>>, cas: u64) -> Self {
        Command::Cas {
            key: key.into(),
            flags: 0,
            exptime: 0,
            value: value.into(),
            cas,
        }
    }
}
