//! Storage layout and schema migration.
//!
//! ```text
//! purchaseHistory          → JSON array of records, newest first
//! purchaseHistory_version  → integer schema version
//! ```

use super::record::UNKNOWN_WALLET;
use serde_json::Value;

/// Key holding the serialized history.
pub const HISTORY_KEY: &str = "purchaseHistory";

/// Key holding the schema version marker.
pub const VERSION_KEY: &str = "purchaseHistory_version";

/// Schema version written by this crate.
pub const CURRENT_VERSION: u32 = 1;

/// Result of a migration pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// Marker already at the current version.
    UpToDate,
    /// Older data was back-filled; `records` entries were rewritten.
    Migrated { records: usize },
    /// Marker is newer than this crate understands; nothing was touched.
    NewerVersion(u32),
}

/// Interpret a stored version marker. Absent or unparsable markers count as
/// version 0.
pub fn parse_version(raw: Option<&str>) -> u32 {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}

/// Back-fill fields that version 0 records may lack.
///
/// - `walletAddress` defaults to `"unknown"`
/// - `status` defaults to `"confirmed"`
/// - `price` falls back to the legacy `solanaAmount`, then `0`
///
/// Present values are kept when truthy. Non-object entries pass through
/// untouched and are dropped later by validation.
pub fn backfill_v0(entry: &mut Value) {
    let Some(object) = entry.as_object_mut() else {
        return;
    };

    if !object.get("walletAddress").is_some_and(is_truthy) {
        object.insert("walletAddress".into(), Value::from(UNKNOWN_WALLET));
    }

    if !object.get("status").is_some_and(is_truthy) {
        object.insert("status".into(), Value::from("confirmed"));
    }

    let price = object
        .get("price")
        .filter(|v| is_truthy(v))
        .or_else(|| object.get("solanaAmount").filter(|v| is_truthy(v)))
        .cloned()
        .unwrap_or_else(|| Value::from(0));
    object.insert("price".into(), price);
}

/// Loose truthiness: null, false, zero and empty strings count as missing.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
