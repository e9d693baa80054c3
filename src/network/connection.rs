//! Connection
//!
//! One blocking TCP connection to a memcached server.

use std::io::{BufReader, BufWriter};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::error::{DriverError, Result};
use crate::protocol::{read_response, write_command, Command, Response};

/// A single client connection
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Peer address for logging
    peer_addr: SocketAddr,
}

impl Connection {
    /// Dial `addr` (`host:port`), trying each resolved address in turn
    ///
    /// `timeout` bounds the connect and every later read and write; zero
    /// disables it.
    pub fn connect(addr: &str, timeout: Duration) -> Result<Self> {
        let candidates = addr
            .to_socket_addrs()
            .map_err(|e| DriverError::Network(format!("resolve {}: {}", addr, e)))?;

        let mut last_err = None;
        for candidate in candidates {
            let attempt = if timeout.is_zero() {
                TcpStream::connect(candidate)
            } else {
                TcpStream::connect_timeout(&candidate, timeout)
            };
            match attempt {
                Ok(stream) => return Self::from_stream(stream, timeout),
                Err(e) => last_err = Some(e),
            }
        }

        Err(DriverError::Network(match last_err {
            Some(e) => format!("dial {}: {}", addr, e),
            None => format!("dial {}: no addresses resolved", addr),
        }))
    }

    /// Wrap an established stream
    ///
    /// Sets up buffered I/O and configures timeouts.
    pub fn from_stream(stream: TcpStream, timeout: Duration) -> Result<Self> {
        let peer_addr = stream.peer_addr()?;

        // Disable Nagle's algorithm for low latency
        stream.set_nodelay(true)?;

        if !timeout.is_zero() {
            stream.set_read_timeout(Some(timeout))?;
            stream.set_write_timeout(Some(timeout))?;
        }

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        tracing::debug!("Connected to memcached at {}", peer_addr);

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            peer_addr,
        })
    }

    /// Send one command and read its reply
    pub fn request(&mut self, command: &Command) -> Result<Response> {
        tracing::trace!(
            "-> {} {:?} on {}",
            command.command_type().verb(),
            command.key(),
            self.peer_addr
        );

        write_command(&mut self.writer, command)?;
        let response = read_response(&mut self.reader)?;

        tracing::trace!("<- {:?} from {}", response_kind(&response), self.peer_addr);
        Ok(response)
    }

    /// Get the peer address
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }
}

/// Reply name without the payload, for trace logs
fn response_kind(response: &Response) -> &'static str {
    match response {
        Response::Values(values) if values.is_empty() => "END",
        Response::Values(_) => "VALUE",
        Response::Stored => "STORED",
        Response::NotStored => "NOT_STORED",
        Response::Exists => "EXISTS",
        Response::NotFound => "NOT_FOUND",
        Response::Deleted => "DELETED",
        Response::Version(_) => "VERSION",
        Response::Error => "ERROR",
        Response::ClientError(_) => "CLIENT_ERROR",
        Response::ServerError(_) => "SERVER_ERROR",
    }
}
