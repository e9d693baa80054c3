//! Codec Tests
//!
//! Tests for command encoding and reply decoding.

use std::io::Cursor;

use memcdriver::protocol::{
    decode_response, encode_command, read_response, write_command, Command, CommandType,
    Response, Value,
};
use memcdriver::DriverError;

// =============================================================================
// Command Encoding Tests
// =============================================================================

#[test]
fn test_encode_get() {
    let cmd = Command::Get {
        key: "users-42".to_string(),
    };
    assert_eq!(encode_command(&cmd), b"get users-42\r\n");
}

#[test]
fn test_encode_gets() {
    let cmd = Command::Gets {
        key: "5:users-42".to_string(),
    };
    assert_eq!(encode_command(&cmd), b"gets 5:users-42\r\n");
}

#[test]
fn test_encode_set() {
    let cmd = Command::set("k", b"hello".to_vec());
    assert_eq!(encode_command(&cmd), b"set k 0 0 5\r\nhello\r\n");
}

#[test]
fn test_encode_add_with_flags_and_exptime() {
    let cmd = Command::Add {
        key: "k".to_string(),
        flags: 7,
        exptime: 60,
        value: b"v".to_vec(),
    };
    assert_eq!(encode_command(&cmd), b"add k 7 60 1\r\nv\r\n");
}

#[test]
fn test_encode_cas() {
    let cmd = Command::cas("k", b"abc".to_vec(), 991);
    assert_eq!(encode_command(&cmd), b"cas k 0 0 3 991\r\nabc\r\n");
}

#[test]
fn test_encode_value_with_crlf_inside() {
    // Length prefix makes embedded CRLF safe
    let cmd = Command::set("k", b"a\r\nb".to_vec());
    assert_eq!(encode_command(&cmd), b"set k 0 0 4\r\na\r\nb\r\n");
}

#[test]
fn test_encode_empty_value() {
    let cmd = Command::add("k", Vec::new());
    assert_eq!(encode_command(&cmd), b"add k 0 0 0\r\n\r\n");
}

#[test]
fn test_encode_delete_and_version() {
    let cmd = Command::Delete {
        key: "k".to_string(),
    };
    assert_eq!(encode_command(&cmd), b"delete k\r\n");
    assert_eq!(encode_command(&Command::Version), b"version\r\n");
}

#[test]
fn test_command_type_and_key() {
    let cmd = Command::cas("k", b"v".to_vec(), 1);
    assert_eq!(cmd.command_type(), CommandType::Cas);
    assert_eq!(cmd.command_type().verb(), "cas");
    assert_eq!(cmd.key(), Some("k"));
    assert_eq!(Command::Version.key(), None);
}

#[test]
fn test_write_command_to_stream() {
    let mut buffer = Vec::new();
    write_command(&mut buffer, &Command::set("k", b"v".to_vec())).unwrap();
    assert_eq!(buffer, b"set k 0 0 1\r\nv\r\n");
}

// =============================================================================
// Reply Decoding Tests
// =============================================================================

#[test]
fn test_decode_simple_replies() {
    let cases: &[(&[u8], Response)] = &[
        (&b"STORED\r\n"[..], Response::Stored),
        (&b"NOT_STORED\r\n"[..], Response::NotStored),
        (&b"EXISTS\r\n"[..], Response::Exists),
        (&b"NOT_FOUND\r\n"[..], Response::NotFound),
        (&b"DELETED\r\n"[..], Response::Deleted),
        (&b"ERROR\r\n"[..], Response::Error),
    ];

    for (bytes, expected) in cases {
        let (response, consumed) = decode_response(bytes).unwrap();
        assert_eq!(&response, expected);
        assert_eq!(consumed, bytes.len());
    }
}

#[test]
fn test_decode_miss() {
    let (response, consumed) = decode_response(b"END\r\n").unwrap();
    assert_eq!(response, Response::Values(vec![]));
    assert!(response.is_miss());
    assert_eq!(consumed, 5);
}

#[test]
fn test_decode_get_hit() {
    let bytes = b"VALUE users-42 3 5\r\nalice\r\nEND\r\n";
    let (response, consumed) = decode_response(bytes).unwrap();

    assert_eq!(
        response,
        Response::Values(vec![Value {
            key: "users-42".to_string(),
            flags: 3,
            data: b"alice".to_vec(),
            cas: None,
        }])
    );
    assert_eq!(consumed, bytes.len());
}

#[test]
fn test_decode_gets_hit_with_cas() {
    let (response, _) = decode_response(b"VALUE k 0 2 12345\r\nhi\r\nEND\r\n").unwrap();
    match response {
        Response::Values(values) => {
            assert_eq!(values.len(), 1);
            assert_eq!(values[0].cas, Some(12345));
            assert_eq!(values[0].data, b"hi");
        }
        other => panic!("Expected VALUES, got {:?}", other),
    }
}

#[test]
fn test_decode_multiple_values() {
    let bytes = b"VALUE a 0 1\r\n1\r\nVALUE b 0 2\r\n22\r\nEND\r\n";
    let (response, _) = decode_response(bytes).unwrap();
    match response {
        Response::Values(values) => {
            let keys: Vec<&str> = values.iter().map(|v| v.key.as_str()).collect();
            assert_eq!(keys, vec!["a", "b"]);
            assert_eq!(values[1].data, b"22");
        }
        other => panic!("Expected VALUES, got {:?}", other),
    }
}

#[test]
fn test_decode_binary_data_block() {
    let mut bytes = b"VALUE k 0 4\r\n".to_vec();
    bytes.extend_from_slice(&[0x00, b'\r', b'\n', 0xff]);
    bytes.extend_from_slice(b"\r\nEND\r\n");

    let (response, _) = decode_response(&bytes).unwrap();
    match response {
        Response::Values(values) => assert_eq!(values[0].data, vec![0x00, b'\r', b'\n', 0xff]),
        other => panic!("Expected VALUES, got {:?}", other),
    }
}

#[test]
fn test_decode_version() {
    let (response, _) = decode_response(b"VERSION 1.6.21\r\n").unwrap();
    assert_eq!(response, Response::Version("1.6.21".to_string()));
}

#[test]
fn test_decode_error_replies() {
    let (response, _) = decode_response(b"CLIENT_ERROR bad data chunk\r\n").unwrap();
    assert_eq!(response, Response::ClientError("bad data chunk".to_string()));
    assert!(response.is_error());

    let (response, _) = decode_response(b"SERVER_ERROR out of memory\r\n").unwrap();
    assert_eq!(response, Response::ServerError("out of memory".to_string()));
    assert!(response.is_error());

    assert!(!Response::Stored.is_error());
}

#[test]
fn test_decode_leaves_next_reply_unread() {
    let bytes = b"STORED\r\nDELETED\r\n";
    let (first, consumed) = decode_response(bytes).unwrap();
    assert_eq!(first, Response::Stored);

    let (second, _) = decode_response(&bytes[consumed..]).unwrap();
    assert_eq!(second, Response::Deleted);
}

#[test]
fn test_read_response_from_stream() {
    let mut cursor = Cursor::new(b"VALUE k 0 1\r\nx\r\nEND\r\nNOT_FOUND\r\n".to_vec());

    let first = read_response(&mut cursor).unwrap();
    assert!(!first.is_miss());

    let second = read_response(&mut cursor).unwrap();
    assert_eq!(second, Response::NotFound);
}

// =============================================================================
// Malformed Reply Tests
// =============================================================================

#[test]
fn test_decode_empty_input_is_connection_closed() {
    assert!(matches!(
        decode_response(b""),
        Err(DriverError::ConnectionClosed)
    ));
}

#[test]
fn test_decode_line_without_crlf() {
    assert!(matches!(
        decode_response(b"STORED"),
        Err(DriverError::Protocol(_))
    ));
    assert!(matches!(
        decode_response(b"STORED\n"),
        Err(DriverError::Protocol(_))
    ));
}

#[test]
fn test_decode_unknown_reply() {
    assert!(matches!(
        decode_response(b"WHATEVER\r\n"),
        Err(DriverError::Protocol(_))
    ));
}

#[test]
fn test_decode_bad_value_header() {
    for bytes in [
        &b"VALUE k x 1\r\na\r\nEND\r\n"[..],
        &b"VALUE k 0\r\na\r\nEND\r\n"[..],
        &b"VALUE k 0 1 notcas\r\na\r\nEND\r\n"[..],
        &b"VALUE k 0 1 1 extra\r\na\r\nEND\r\n"[..],
    ] {
        assert!(
            matches!(decode_response(bytes), Err(DriverError::Protocol(_))),
            "accepted {:?}",
            String::from_utf8_lossy(bytes)
        );
    }
}

#[test]
fn test_decode_data_block_without_terminator() {
    assert!(matches!(
        decode_response(b"VALUE k 0 1\r\nabEND\r\n"),
        Err(DriverError::Protocol(_))
    ));
}

#[test]
fn test_decode_truncated_data_block() {
    assert!(matches!(
        decode_response(b"VALUE k 0 10\r\nabc"),
        Err(DriverError::Io(_))
    ));
}

#[test]
fn test_decode_missing_end() {
    assert!(matches!(
        decode_response(b"VALUE k 0 1\r\na\r\n"),
        Err(DriverError::ConnectionClosed)
    ));
}

#[test]
fn test_decode_oversized_value() {
    assert!(matches!(
        decode_response(b"VALUE k 0 999999999999\r\n"),
        Err(DriverError::Protocol(_))
    ));
}
