//! Response definitions
//!
//! Replies memcached sends back.

/// One item from a `get`/`gets` reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    pub key: String,
    pub flags: u32,
    pub data: Vec<u8>,

    /// Present only in `gets` replies
    pub cas: Option<u64>,
}

/// A parsed memcached reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// `VALUE ...` blocks terminated by `END`; empty on a miss
    Values(Vec<Value>),

    Stored,
    NotStored,

    /// CAS token mismatch
    Exists,

    NotFound,
    Deleted,
    Version(String),

    /// Unknown command
    Error,
    ClientError(String),
    ServerError(String),
}

impl Response {
    /// Returns true if this is an error reply
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Response::Error | Response::ClientError(_) | Response::ServerError(_)
        )
    }

    /// Returns true if this reply means the key was absent
    pub fn is_miss(&self) -> bool {
        match self {
            Response::Values(values) => values.is_empty(),
            Response::NotFound => true,
            _ => false,
        }
    }
}
