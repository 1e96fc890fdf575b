//! Helpers shared by the unit test modules.

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use jid::BareJid;
use minidom::Element;
use mockable::Clock;
use std::sync::Mutex;

/// Clock returning a fixed start instant, advancing one second per reading.
#[derive(Debug)]
pub(crate) struct SteppingClock {
    next: Mutex<DateTime<Utc>>,
}

impl SteppingClock {
    pub(crate) fn new() -> Self {
        Self::starting_at(epoch())
    }

    pub(crate) const fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            next: Mutex::new(start),
        }
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let mut next = self.next.lock().expect("clock lock should not be poisoned");
        let now = *next;
        *next = now + Duration::seconds(1);
        now
    }
}

/// Start instant of every [`SteppingClock::new`] clock.
pub(crate) fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0)
        .single()
        .expect("fixed instant should be valid")
}

pub(crate) fn jid(raw: &str) -> BareJid {
    raw.parse().expect("test jid should parse")
}

pub(crate) fn chat(from: &str, to: &str, body: &str) -> Element {
    Element::builder("message", "jabber:client")
        .attr("from", from)
        .attr("to", to)
        .attr("type", "chat")
        .append(Element::builder("body", "jabber:client").append(body.to_owned()).build())
        .build()
}
