//! Shared fixtures for integration tests.

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use jid::BareJid;
use minidom::Element;
use mockable::Clock;
use std::sync::Mutex;

/// Clock returning a fixed start instant, advancing one second per reading.
#[derive(Debug)]
pub struct SteppingClock {
    next: Mutex<DateTime<Utc>>,
}

impl SteppingClock {
    /// Creates a clock starting at [`epoch`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            next: Mutex::new(epoch()),
        }
    }
}

impl Default for SteppingClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let mut next = self
            .next
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let now = *next;
        *next = now + Duration::seconds(1);
        now
    }
}

/// First instant returned by a fresh [`SteppingClock`].
#[must_use]
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Parses a bare JID literal.
///
/// # Panics
///
/// Panics when `raw` is not a valid bare JID.
#[must_use]
pub fn jid(raw: &str) -> BareJid {
    raw.parse().expect("test jid should parse")
}

/// Builds a `jabber:client` chat message stanza.
#[must_use]
pub fn chat(from: &str, to: &str, body: &str) -> Element {
    Element::builder("message", "jabber:client")
        .attr("from", from)
        .attr("to", to)
        .attr("type", "chat")
        .append(
            Element::builder("body", "jabber:client")
                .append(body.to_owned())
                .build(),
        )
        .build()
}
