//! Record blobs
//!
//! A record is stored as one JSON object mapping field names to the standard
//! base64 of their bytes:
//!
//! ```text
//! {"age":"NDI=","name":"YWxpY2U="}
//! ```
//!
//! Fields are emitted in sorted order so equal records encode to equal
//! blobs. `null` values decode to empty byte vectors.

use std::collections::{BTreeMap, HashMap};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{DriverError, Result};

/// Field name to opaque value bytes
pub type Record = HashMap<String, Vec<u8>>;

/// A field value on its way into a blob
#[derive(Serialize)]
#[serde(transparent)]
struct EncodedField<'a>(#[serde(serialize_with = "serialize_base64")] &'a [u8]);

/// A field value read back from a blob
#[derive(Deserialize)]
#[serde(transparent)]
struct DecodedField(#[serde(deserialize_with = "deserialize_base64")] Vec<u8>);

fn serialize_base64<S>(value: &&[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&STANDARD.encode(*value))
}

fn deserialize_base64<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(text) => STANDARD.decode(text.as_bytes()).map_err(D::Error::custom),
        None => Ok(Vec::new()),
    }
}

/// Encode a record into its stored blob
pub fn encode_record(record: &Record) -> Result<Vec<u8>> {
    let fields: BTreeMap<&str, EncodedField<'_>> = record
        .iter()
        .map(|(field, value)| (field.as_str(), EncodedField(value)))
        .collect();
    serde_json::to_vec(&fields).map_err(|e| DriverError::Encode(e.to_string()))
}

/// Decode a stored blob back into a record
pub fn decode_record(blob: &[u8]) -> Result<Record> {
    let fields: HashMap<String, DecodedField> =
        serde_json::from_slice(blob).map_err(|e| DriverError::Decode(e.to_string()))?;

    Ok(fields
        .into_iter()
        .map(|(field, DecodedField(value))| (field, value))
        .collect())
}

/// Keep only the requested fields
///
/// An empty filter keeps the whole record. Requested fields the record does
/// not have are left out.
pub fn project(mut record: Record, fields: &[&str]) -> Record {
    if fields.is_empty() {
        return record;
    }
    fields
        .iter()
        .filter_map(|field| record.remove_entry(*field))
        .collect()
}
