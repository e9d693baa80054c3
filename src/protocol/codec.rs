//! Protocol codec
//!
//! Encoding of requests and decoding of replies for the memcached text
//! protocol.
//!
//! ## Wire Format
//!
//! ### Requests
//! ```text
//! get <key>\r\n
//! gets <key>\r\n
//! set|add <key> <flags> <exptime> <bytes>\r\n<data>\r\n
//! cas <key> <flags> <exptime> <bytes> <cas>\r\n<data>\r\n
//! delete <key>\r\n
//! version\r\n
//! ```
//!
//! ### Replies
//! ```text
//! VALUE <key> <flags> <bytes> [<cas>]\r\n<data>\r\n ... END\r\n
//! STORED | NOT_STORED | EXISTS | NOT_FOUND | DELETED\r\n
//! VERSION <version>\r\n
//! ERROR | CLIENT_ERROR <msg> | SERVER_ERROR <msg>\r\n
//! ```

use std::io::{BufRead, Write};
use std::str::FromStr;

use super::{Command, Response, Value};
use crate::error::{DriverError, Result};

/// Line terminator
pub const CRLF: &[u8] = b"\r\n";

/// Largest data block accepted in a reply (memcached's `-I` ceiling)
pub const MAX_VALUE_SIZE: usize = 128 * 1024 * 1024;

// =============================================================================
// Command Encoding
// =============================================================================

/// Encode a command to bytes
pub fn encode_command(command: &Command) -> Vec<u8> {
    let verb = command.command_type().verb();

    match command {
        Command::Get { key } | Command::Gets { key } | Command::Delete { key } => {
            let mut message = Vec::with_capacity(verb.len() + 1 + key.len() + CRLF.len());
            message.extend_from_slice(verb.as_bytes());
            message.push(b' ');
            message.extend_from_slice(key.as_bytes());
            message.extend_from_slice(CRLF);
            message
        }
        Command::Set {
            key,
            flags,
            exptime,
            value,
        }
        | Command::Add {
            key,
            flags,
            exptime,
            value,
        } => {
            let header = format!("{} {} {} {} {}\r\n", verb, key, flags, exptime, value.len());
            with_data_block(header, value)
        }
        Command::Cas {
            key,
            flags,
            exptime,
            value,
            cas,
        } => {
            let header = format!(
                "{} {} {} {} {} {}\r\n",
                verb,
                key,
                flags,
                exptime,
                value.len(),
                cas
            );
            with_data_block(header, value)
        }
        Command::Version => b"version\r\n".to_vec(),
    }
}

fn with_data_block(header: String, value: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(header.len() + value.len() + CRLF.len());
    message.extend_from_slice(header.as_bytes());
    message.extend_from_slice(value);
    message.extend_from_slice(CRLF);
    message
}

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    let bytes = encode_command(command);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Response Decoding
// =============================================================================

/// Decode a response from bytes
///
/// Returns the response and the number of bytes consumed.
pub fn decode_response(bytes: &[u8]) -> Result<(Response, usize)> {
    let mut remaining = bytes;
    let response = read_response(&mut remaining)?;
    Ok((response, bytes.len() - remaining.len()))
}

/// Read a complete response from a stream
///
/// Blocks until a complete response is received or an error occurs.
pub fn read_response<R: BufRead>(reader: &mut R) -> Result<Response> {
    let line = read_line(reader)?;

    match line.as_slice() {
        b"STORED" => Ok(Response::Stored),
        b"NOT_STORED" => Ok(Response::NotStored),
        b"EXISTS" => Ok(Response::Exists),
        b"NOT_FOUND" => Ok(Response::NotFound),
        b"DELETED" => Ok(Response::Deleted),
        b"END" => Ok(Response::Values(Vec::new())),
        b"ERROR" => Ok(Response::Error),
        _ if line.starts_with(b"VALUE ") => read_values(reader, &line),
        _ if line.starts_with(b"VERSION ") => Ok(Response::Version(lossy(&line[8..]))),
        _ if line.starts_with(b"CLIENT_ERROR") => {
            Ok(Response::ClientError(lossy(&line[12..]).trim().to_string()))
        }
        _ if line.starts_with(b"SERVER_ERROR") => {
            Ok(Response::ServerError(lossy(&line[12..]).trim().to_string()))
        }
        _ => Err(DriverError::Protocol(format!(
            "unexpected reply line: {:?}",
            lossy(&line)
        ))),
    }
}

/// Read VALUE blocks until END
fn read_values<R: BufRead>(reader: &mut R, first: &[u8]) -> Result<Response> {
    let mut values = vec![read_value(reader, first)?];

    loop {
        let line = read_line(reader)?;
        if line == b"END" {
            return Ok(Response::Values(values));
        }
        values.push(read_value(reader, &line)?);
    }
}

/// Parse one `VALUE <key> <flags> <bytes> [<cas>]` header and its data block
fn read_value<R: BufRead>(reader: &mut R, header: &[u8]) -> Result<Value> {
    let header = std::str::from_utf8(header)
        .map_err(|_| DriverError::Protocol("VALUE header is not UTF-8".to_string()))?;

    let mut parts = header.split(' ');
    if parts.next() != Some("VALUE") {
        return Err(DriverError::Protocol(format!(
            "expected VALUE or END, got {:?}",
            header
        )));
    }

    let key = parts
        .next()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| DriverError::Protocol("VALUE header: missing key".to_string()))?
        .to_string();
    let flags: u32 = parse_field(parts.next(), "flags")?;
    let len: usize = parse_field(parts.next(), "length")?;
    let cas = match parts.next() {
        Some(raw) => Some(parse_field(Some(raw), "cas")?),
        None => None,
    };

    if parts.next().is_some() {
        return Err(DriverError::Protocol(format!(
            "VALUE header: trailing tokens in {:?}",
            header
        )));
    }

    if len > MAX_VALUE_SIZE {
        return Err(DriverError::Protocol(format!(
            "value too large: {} bytes (max {})",
            len, MAX_VALUE_SIZE
        )));
    }

    // Data block plus its CRLF
    let mut data = vec![0u8; len + CRLF.len()];
    reader.read_exact(&mut data)?;

    if &data[len..] != CRLF {
        return Err(DriverError::Protocol(format!(
            "data block for {:?} not terminated by CRLF",
            key
        )));
    }
    data.truncate(len);

    Ok(Value {
        key,
        flags,
        data,
        cas,
    })
}

/// Read one CRLF-terminated line, without the terminator
fn read_line<R: BufRead>(reader: &mut R) -> Result<Vec<u8>> {
    let mut line = Vec::new();
    let n = reader.read_until(b'\n', &mut line)?;

    if n == 0 {
        return Err(DriverError::ConnectionClosed);
    }
    if !line.ends_with(CRLF) {
        return Err(DriverError::Protocol(format!(
            "incomplete reply line: {:?}",
            lossy(&line)
        )));
    }

    line.truncate(line.len() - CRLF.len());
    Ok(line)
}

fn parse_field<T: FromStr>(raw: Option<&str>, name: &str) -> Result<T> {
    let raw = raw.ok_or_else(|| {
        DriverError::Protocol(format!("VALUE header: missing {}", name))
    })?;
    raw.parse()
        .map_err(|_| DriverError::Protocol(format!("VALUE header: invalid {} {:?}", name, raw)))
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
