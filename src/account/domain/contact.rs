//! Roster entries and their presence-subscription states.

use super::{ParseAskError, ParseSubscriptionError};
use jid::BareJid;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Presence subscription between a user and one contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subscription {
    /// Neither side is subscribed.
    #[default]
    None,
    /// The user receives the contact's presence.
    To,
    /// The contact receives the user's presence.
    From,
    /// Both sides are subscribed.
    Both,
}

impl Subscription {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::To => "to",
            Self::From => "from",
            Self::Both => "both",
        }
    }
}

impl fmt::Display for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Subscription {
    type Error = ParseSubscriptionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "to" => Ok(Self::To),
            "from" => Ok(Self::From),
            "both" => Ok(Self::Both),
            _ => Err(ParseSubscriptionError(value.to_owned())),
        }
    }
}

/// Pending subscription request state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ask {
    /// The user asked to subscribe to the contact.
    Subscribe,
}

impl Ask {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Subscribe => "subscribe",
        }
    }
}

impl fmt::Display for Ask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Ask {
    type Error = ParseAskError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "subscribe" => Ok(Self::Subscribe),
            _ => Err(ParseAskError(value.to_owned())),
        }
    }
}

/// One entry of a user's roster, keyed by bare JID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    jid: BareJid,
    name: Option<String>,
    subscription: Subscription,
    ask: Option<Ask>,
    groups: BTreeSet<String>,
}

impl Contact {
    /// Creates a contact with no name, no subscription and no groups.
    #[must_use]
    pub const fn new(jid: BareJid) -> Self {
        Self {
            jid,
            name: None,
            subscription: Subscription::None,
            ask: None,
            groups: BTreeSet::new(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the subscription state.
    #[must_use]
    pub const fn with_subscription(mut self, subscription: Subscription) -> Self {
        self.subscription = subscription;
        self
    }

    /// Sets the pending ask state.
    #[must_use]
    pub const fn with_ask(mut self, ask: Option<Ask>) -> Self {
        self.ask = ask;
        self
    }

    /// Sets the group names.
    ///
    /// Names are trimmed; blank names and duplicates are dropped.
    #[must_use]
    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.groups = groups
            .into_iter()
            .map(|group| group.as_ref().trim().to_owned())
            .filter(|group| !group.is_empty())
            .collect();
        self
    }

    /// Returns the contact's bare JID.
    #[must_use]
    pub const fn jid(&self) -> &BareJid {
        &self.jid
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the subscription state.
    #[must_use]
    pub const fn subscription(&self) -> Subscription {
        self.subscription
    }

    /// Returns the pending ask state.
    #[must_use]
    pub const fn ask(&self) -> Option<Ask> {
        self.ask
    }

    /// Returns the group names in sorted order.
    #[must_use]
    pub const fn groups(&self) -> &BTreeSet<String> {
        &self.groups
    }
}
