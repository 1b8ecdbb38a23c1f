//! Snapshot Codec
//!
//! Versioned, self-describing encoding of the full cache state.
//!
//! A snapshot is a single JSON document:
//! - `format`: always `"ttl-lru-cache"`
//! - `version`: layout version, currently 1
//! - `taken_at`: when the snapshot was written (Unix millis)
//! - `capacity`: capacity of the cache that wrote it
//! - `entries`: `{key, value, expires_at?}` objects, least recently used first
//!
//! Deadlines are absolute, so an entry restored later still expires at its
//! original wall-clock instant.

use std::io::{self, BufReader, BufWriter, Read, Write};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::cache::CacheEntry;
use crate::error::{CacheError, Result};

/// Format tag written into every snapshot.
pub const SNAPSHOT_FORMAT: &str = "ttl-lru-cache";

/// Current snapshot layout version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// A decoded snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<V> {
    /// When the snapshot was written (Unix millis)
    pub taken_at: u64,
    /// Capacity of the cache that wrote it
    pub capacity: usize,
    /// Entries, least recently used first
    pub entries: Vec<CacheEntry<V>>,
}

#[derive(Serialize)]
struct SnapshotOut<'a, V> {
    format: &'a str,
    version: u32,
    taken_at: u64,
    capacity: usize,
    entries: Vec<EntryOut<'a, V>>,
}

#[derive(Serialize)]
struct EntryOut<'a, V> {
    key: &'a str,
    value: &'a V,
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_at: Option<u64>,
}

/// Header is checked before the entries are interpreted as `V`.
///
/// Entries stay as raw JSON text so values are parsed straight into `V`
/// with full precision.
#[derive(Deserialize)]
struct SnapshotIn {
    format: String,
    version: u32,
    taken_at: u64,
    capacity: usize,
    entries: Box<RawValue>,
}

// == Encode ==
/// Writes a snapshot of `entries` (least recently used first) to `writer`.
pub fn encode<'a, V, W, I>(writer: W, capacity: usize, taken_at: u64, entries: I) -> Result<()>
where
    V: Serialize + 'a,
    W: Write,
    I: IntoIterator<Item = (&'a str, &'a V, Option<u64>)>,
{
    let document = SnapshotOut {
        format: SNAPSHOT_FORMAT,
        version: SNAPSHOT_VERSION,
        taken_at,
        capacity,
        entries: entries
            .into_iter()
            .map(|(key, value, expires_at)| EntryOut {
                key,
                value,
                expires_at,
            })
            .collect(),
    };

    let mut writer = BufWriter::new(writer);
    serde_json::to_writer(&mut writer, &document).map_err(|err| {
        if err.is_io() {
            CacheError::Io(io::Error::from(err))
        } else {
            CacheError::Encode(err.to_string())
        }
    })?;
    writer.flush()?;

    Ok(())
}

// == Decode ==
/// Reads and validates a snapshot from `reader`.
///
/// Malformed input, an unknown format tag, an unsupported version, or
/// values that do not fit `V` are reported as [`CacheError::Decode`].
pub fn decode<V, R>(reader: R) -> Result<Snapshot<V>>
where
    V: DeserializeOwned,
    R: Read,
{
    let raw: SnapshotIn = serde_json::from_reader(BufReader::new(reader)).map_err(decode_error)?;

    if raw.format != SNAPSHOT_FORMAT {
        return Err(CacheError::Decode(format!(
            "unrecognized snapshot format `{}`",
            raw.format
        )));
    }
    if raw.version != SNAPSHOT_VERSION {
        return Err(CacheError::Decode(format!(
            "unsupported snapshot version {} (expected {})",
            raw.version, SNAPSHOT_VERSION
        )));
    }

    let entries: Vec<CacheEntry<V>> =
        serde_json::from_str(raw.entries.get()).map_err(decode_error)?;

    Ok(Snapshot {
        taken_at: raw.taken_at,
        capacity: raw.capacity,
        entries,
    })
}

fn decode_error(err: serde_json::Error) -> CacheError {
    if err.is_io() {
        CacheError::Io(io::Error::from(err))
    } else {
        CacheError::Decode(err.to_string())
    }
}
