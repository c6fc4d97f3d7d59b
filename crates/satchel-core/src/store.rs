//! JSON array persistence for the tool stores.
//!
//! Every satchel store is a single pretty-printed JSON array of records,
//! small enough to read whole and rewrite atomically on every change.

use crate::error::Result;
use crate::io::{atomic_write, touch_read};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Parse a JSON array of records. Whitespace-only input — including the
/// zero-byte file `touch_read` creates on a tool's first run — parses as
/// an empty store.
pub fn import<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>> {
    let raw = if raw.trim().is_empty() { "[]" } else { raw };
    Ok(serde_json::from_str(raw)?)
}

/// Serialize records as a pretty-printed JSON array. Stores are meant to
/// be hand-editable, so compact output would be hostile.
pub fn export<T: Serialize>(records: &[T]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Load the records in `path`, creating an empty store on first use.
pub fn load<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    import(&touch_read(path)?)
}

/// Atomically replace `path` with the serialized records.
pub fn save<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    atomic_write(path, export(records)?.as_bytes())
}
