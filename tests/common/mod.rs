//! Minimal in-process memcached server for tests
//!
//! Speaks just enough of the text protocol for the client: get, gets, set,
//! add, cas, delete, version. Keys containing `server_error` get a
//! SERVER_ERROR reply to storage commands. Keys containing `bad_chunk` get
//! `CLIENT_ERROR` followed by a trailing `ERROR` line, the way memcached
//! answers a rejected data block.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

struct StoredItem {
    flags: u32,
    data: Vec<u8>,
    cas: u64,
}

#[derive(Default)]
struct State {
    items: Mutex<HashMap<String, StoredItem>>,
    next_cas: AtomicU64,
    connections: AtomicUsize,
}

/// A running mock server; threads live until the test process exits
pub struct MockServer {
    addr: String,
    state: Arc<State>,
}

impl MockServer {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let state = Arc::new(State::default());

        let accept_state = Arc::clone(&state);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                accept_state.connections.fetch_add(1, Ordering::SeqCst);
                let state = Arc::clone(&accept_state);
                thread::spawn(move || {
                    let _ = serve(stream, &state);
                });
            }
        });

        Self { addr, state }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Connections accepted so far
    pub fn connections(&self) -> usize {
        self.state.connections.load(Ordering::SeqCst)
    }

    /// Raw value stored under `key`
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.state
            .items
            .lock()
            .unwrap()
            .get(key)
            .map(|item| item.data.clone())
    }

    /// Store a raw value, bypassing the protocol
    pub fn put_raw(&self, key: &str, data: &[u8]) {
        let cas = self.state.next_cas.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.items.lock().unwrap().insert(
            key.to_string(),
            StoredItem {
                flags: 0,
                data: data.to_vec(),
                cas,
            },
        );
    }
}

/// An address nothing listens on
pub fn dead_addr() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);
    addr
}

fn serve(stream: TcpStream, state: &State) -> io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = stream;

    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Ok(());
        }
        let parts: Vec<&str> = line.trim_end_matches("\r\n").split(' ').collect();

        let reply: Vec<u8> = match parts[0] {
            "get" | "gets" => {
                let items = state.items.lock().unwrap();
                let mut out = Vec::new();
                for key in &parts[1..] {
                    if let Some(item) = items.get(*key) {
                        if parts[0] == "gets" {
                            write!(out, "VALUE {} {} {} {}\r\n", key, item.flags, item.data.len(), item.cas)?;
                        } else {
                            write!(out, "VALUE {} {} {}\r\n", key, item.flags, item.data.len())?;
                        }
                        out.extend_from_slice(&item.data);
                        out.extend_from_slice(b"\r\n");
                    }
                }
                out.extend_from_slice(b"END\r\n");
                out
            }
            "set" | "add" | "cas" => {
                let key = parts[1].to_string();
                let flags: u32 = parts[2].parse().unwrap();
                let len: usize = parts[4].parse().unwrap();
                let mut data = vec![0u8; len + 2];
                reader.read_exact(&mut data)?;
                data.truncate(len);

                let mut items = state.items.lock().unwrap();
                let current = items.get(&key).map(|item| item.cas);

                let outcome: &[u8] = if key.contains("server_error") {
                    b"SERVER_ERROR out of memory storing object\r\n"
                } else if key.contains("bad_chunk") {
                    b"CLIENT_ERROR bad data chunk\r\nERROR\r\n"
                } else {
                    match (parts[0], current) {
                        ("add", Some(_)) => b"NOT_STORED\r\n",
                        ("cas", None) => b"NOT_FOUND\r\n",
                        ("cas", Some(cas)) if parts[5].parse::<u64>().unwrap() != cas => {
                            b"EXISTS\r\n"
                        }
                        _ => {
                            let cas = state.next_cas.fetch_add(1, Ordering::SeqCst) + 1;
                            items.insert(key, StoredItem { flags, data, cas });
                            b"STORED\r\n"
                        }
                    }
                };
                outcome.to_vec()
            }
            "delete" => match state.items.lock().unwrap().remove(parts[1]) {
                Some(_) => b"DELETED\r\n".to_vec(),
                None => b"NOT_FOUND\r\n".to_vec(),
            },
            "version" => b"VERSION 1.6.21-mock\r\n".to_vec(),
            _ => b"ERROR\r\n".to_vec(),
        };

        writer.write_all(&reply)?;
        writer.flush()?;
    }
}
