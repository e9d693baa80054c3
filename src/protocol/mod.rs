//! Protocol Module
//!
//! The memcached text protocol, client side.
//!
//! ## Commands
//! - `get` / `gets` - fetch a value (with its CAS token for `gets`)
//! - `set`          - store unconditionally
//! - `add`          - store only if absent
//! - `cas`          - store only if the CAS token matches
//! - `delete`       - remove a key
//! - `version`      - health check
//!
//! ## Replies
//! - `VALUE ... END`                        - hit(s); bare `END` is a miss
//! - `STORED` / `NOT_STORED`                - storage outcome
//! - `EXISTS` / `NOT_FOUND`                 - CAS outcome / miss
//! - `DELETED`                              - delete outcome
//! - `ERROR` / `CLIENT_ERROR` / `SERVER_ERROR` - failures

mod command;
mod response;
mod codec;

pub use command::{Command, CommandType};
pub use response::{Response, Value};
pub use codec::{
    decode_response, encode_command, read_response, write_command, CRLF, MAX_VALUE_SIZE,
};
