//! Bare JID normalization.
//!
//! Read paths treat malformed identifiers as "not found" via [`bare`];
//! write paths reject them through [`require_bare`].

use jid::{BareJid, Jid};
use thiserror::Error;

/// A JID string that cannot be normalized to bare form.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid jid: '{0}'")]
pub struct InvalidJid(pub String);

/// Normalizes `raw` to its bare form, dropping any resource.
///
/// Returns `None` for empty or malformed input.
#[must_use]
pub fn bare(raw: &str) -> Option<BareJid> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<Jid>().ok().map(|jid| jid.to_bare())
}

/// Normalizes `raw` to its bare form.
///
/// # Errors
///
/// Returns [`InvalidJid`] for empty or malformed input.
pub fn require_bare(raw: &str) -> Result<BareJid, InvalidJid> {
    bare(raw).ok_or_else(|| InvalidJid(raw.to_owned()))
}
