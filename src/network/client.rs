//! Memcache Client
//!
//! Blocking client for one memcached server.
//!
//! Connections are dialed on demand. Each call checks one out, uses it for a
//! single request/reply, and hands it back to a bounded lock-free free-list.
//! A connection that saw an I/O or protocol error, or got an error reply, is
//! dropped instead, since its stream may be mid-reply.

use std::time::Duration;

use bytes::Bytes;
use crossbeam::queue::ArrayQueue;

use super::Connection;
use crate::config::Config;
use crate::error::{DriverError, Result};
use crate::key::check_key;
use crate::protocol::{Command, Response};
use crate::store::{Item, Store};

/// Client for a memcached server at `host:port`
pub struct MemcacheClient {
    /// Server address
    addr: String,

    /// Connect/read/write timeout
    timeout: Duration,

    /// Idle connections ready for reuse; `None` when reuse is off
    idle: Option<ArrayQueue<Connection>>,
}

impl MemcacheClient {
    /// Create a client; no connection is made until the first call
    ///
    /// With `max_idle_conns == 0` every call dials a fresh connection.
    pub fn new(addr: impl Into<String>, timeout: Duration, max_idle_conns: usize) -> Self {
        Self {
            addr: addr.into(),
            timeout,
            idle: (max_idle_conns > 0).then(|| ArrayQueue::new(max_idle_conns)),
        }
    }

    /// Create a client from driver config
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.uri.clone(),
            Duration::from_millis(config.timeout_ms),
            config.max_idle_conns,
        )
    }

    /// Server address
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Number of idle connections currently held
    pub fn idle_connections(&self) -> usize {
        self.idle.as_ref().map_or(0, ArrayQueue::len)
    }

    /// Server version string
    pub fn version(&self) -> Result<String> {
        match self.round_trip(&Command::Version)? {
            Response::Version(version) => Ok(version),
            other => Err(unexpected("version", &other)),
        }
    }

    /// Send a command on a pooled connection and return the reply
    ///
    /// Error replies are turned into `DriverError::Server`. The connection
    /// behind an error reply is closed, since memcached may still have more
    /// error lines queued on it.
    fn round_trip(&self, command: &Command) -> Result<Response> {
        let pooled = self.idle.as_ref().and_then(ArrayQueue::pop);
        let mut conn = match pooled {
            Some(conn) => conn,
            None => Connection::connect(&self.addr, self.timeout)?,
        };

        let response = match conn.request(command) {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Dropping connection to {}: {}", conn.peer_addr(), e);
                return Err(e);
            }
        };

        if response.is_error() {
            tracing::debug!(
                "Dropping connection to {} after error reply",
                conn.peer_addr()
            );
        } else if let Some(idle) = &self.idle {
            // A full free-list just closes the extra connection
            let _ = idle.push(conn);
        }

        check_error(response)
    }
}

impl Store for MemcacheClient {
    fn get(&self, key: &str) -> Result<Item> {
        check_key(key)?;
        let response = self.round_trip(&Command::Gets {
            key: key.to_string(),
        })?;

        match response {
            Response::Values(values) => {
                let value = values
                    .into_iter()
                    .find(|v| v.key == key)
                    .ok_or(DriverError::NotFound)?;
                Ok(Item {
                    key: value.key,
                    value: Bytes::from(value.data),
                    flags: value.flags,
                    cas: value.cas,
                })
            }
            other => Err(unexpected("gets", &other)),
        }
    }

    fn add(&self, key: &str, value: &[u8]) -> Result<()> {
        check_key(key)?;
        match self.round_trip(&Command::add(key, value))? {
            Response::Stored => Ok(()),
            Response::NotStored => Err(DriverError::NotStored),
            other => Err(unexpected("add", &other)),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        check_key(key)?;
        match self.round_trip(&Command::set(key, value))? {
            Response::Stored => Ok(()),
            Response::NotStored => Err(DriverError::NotStored),
            other => Err(unexpected("set", &other)),
        }
    }

    fn compare_and_swap(&self, key: &str, value: &[u8], cas: u64) -> Result<()> {
        check_key(key)?;
        match self.round_trip(&Command::cas(key, value, cas))? {
            Response::Stored => Ok(()),
            Response::Exists => Err(DriverError::CasConflict),
            Response::NotFound => Err(DriverError::NotFound),
            Response::NotStored => Err(DriverError::NotStored),
            other => Err(unexpected("cas", &other)),
        }
    }

    fn delete(&self, key: &str) -> Result<()> {
        check_key(key)?;
        let response = self.round_trip(&Command::Delete {
            key: key.to_string(),
        })?;

        match response {
            Response::Deleted => Ok(()),
            Response::NotFound => Err(DriverError::NotFound),
            other => Err(unexpected("delete", &other)),
        }
    }
}

/// Map ERROR / CLIENT_ERROR / SERVER_ERROR replies to errors
fn check_error(response: Response) -> Result<Response> {
    match response {
        Response::Error => Err(DriverError::Server("ERROR".to_string())),
        Response::ClientError(msg) => Err(DriverError::Server(format!("CLIENT_ERROR {}", msg))),
        Response::ServerError(msg) => Err(DriverError::Server(format!("SERVER_ERROR {}", msg))),
        other => Ok(other),
    }
}

fn unexpected(verb: &str, response: &Response) -> DriverError {
    DriverError::Protocol(format!("unexpected reply to {}: {:?}", verb, response))
}
