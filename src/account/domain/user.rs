//! Accounts and their private extension documents.

use super::Contact;
use jid::BareJid;
use std::fmt;

/// A registered account with its roster.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    jid: BareJid,
    name: Option<String>,
    password: Option<String>,
    roster: Vec<Contact>,
}

impl User {
    /// Creates an account with an empty roster.
    #[must_use]
    pub const fn new(jid: BareJid) -> Self {
        Self {
            jid,
            name: None,
            password: None,
            roster: Vec::new(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the stored credential.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Replaces the roster.
    #[must_use]
    pub fn with_roster(mut self, roster: impl IntoIterator<Item = Contact>) -> Self {
        self.roster = roster.into_iter().collect();
        self
    }

    /// Returns the account's bare JID.
    #[must_use]
    pub const fn jid(&self) -> &BareJid {
        &self.jid
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the stored credential.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Returns the roster.
    #[must_use]
    pub fn roster(&self) -> &[Contact] {
        &self.roster
    }

    /// Finds a roster entry by bare JID.
    #[must_use]
    pub fn contact(&self, jid: &BareJid) -> Option<&Contact> {
        self.roster.iter().find(|contact| contact.jid() == jid)
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("jid", &self.jid)
            .field("name", &self.name)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("roster", &self.roster)
            .finish()
    }
}

/// A private XML document stored per account, keyed by root element name
/// and namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    root: String,
    namespace: String,
    xml: String,
}

impl Fragment {
    /// Creates a fragment from its key and serialized document.
    #[must_use]
    pub fn new(root: impl Into<String>, namespace: impl Into<String>, xml: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            namespace: namespace.into(),
            xml: xml.into(),
        }
    }

    /// Returns the root element name.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Returns the root element namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the serialized document.
    #[must_use]
    pub fn xml(&self) -> &str {
        &self.xml
    }
}
