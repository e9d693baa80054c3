//! Network Module
//!
//! TCP client side of the memcached protocol.
//!
//! ## Architecture
//! - `Connection`: one socket, one request/reply at a time
//! - `MemcacheClient`: shared across worker threads, hands each call its own
//!   connection from a bounded idle list

mod connection;
mod client;

pub use connection::Connection;
pub use client::MemcacheClient;
