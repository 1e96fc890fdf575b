//! Conversions between stored column values and domain values.

use jid::BareJid;

use super::error::{StorageError, StorageResult};

/// Parses a JID column, reporting corrupt rows as serialization errors.
pub(crate) fn decode_jid(raw: &str) -> StorageResult<BareJid> {
    raw.parse::<BareJid>()
        .map_err(|err| StorageError::serialization(format!("stored jid '{raw}': {err}")))
}

/// Converts a row count to the type reported by the ports.
pub(crate) fn row_count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

/// Converts a page size to a SQL `LIMIT` value.
pub(crate) fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

/// Converts a SQL `COUNT(*)` value to a row count.
pub(crate) fn sql_count(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}
