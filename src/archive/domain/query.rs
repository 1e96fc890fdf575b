//! Archive retrieval criteria and paginated results.

use chrono::{DateTime, Utc};
use jid::BareJid;

/// Page size used when a query does not set one.
pub const DEFAULT_PAGE_LIMIT: usize = 50;

/// Optional time bounds, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeRange {
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl TimeRange {
    /// Creates a range from optional bounds.
    #[must_use]
    pub const fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// Returns the inclusive lower bound.
    #[must_use]
    pub const fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    /// Returns the inclusive upper bound.
    #[must_use]
    pub const fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    /// Whether `instant` falls inside the range, bounds included.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| instant >= start) && self.end.is_none_or(|end| instant <= end)
    }
}

/// One bounded, ordered page plus the total number of matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    items: Vec<T>,
    total: u64,
}

impl<T> Page<T> {
    /// Creates a page.
    #[must_use]
    pub const fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }

    /// Creates an empty page with no matches.
    #[must_use]
    pub const fn empty() -> Self {
        Self::new(Vec::new(), 0)
    }

    /// Returns the page items.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consumes the page, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Returns the number of matches ignoring the page limit.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Whether matches exist beyond this page.
    #[must_use]
    pub fn has_more(&self) -> bool {
        u64::try_from(self.items.len()).is_ok_and(|len| len < self.total)
    }
}

/// Criteria for listing the collections a JID takes part in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionQuery {
    jid: BareJid,
    with: Option<BareJid>,
    range: TimeRange,
    limit: usize,
}

impl CollectionQuery {
    /// Matches every collection with `jid` on either side.
    #[must_use]
    pub const fn new(jid: BareJid) -> Self {
        Self {
            jid,
            with: None,
            range: TimeRange::new(None, None),
            limit: DEFAULT_PAGE_LIMIT,
        }
    }

    /// Restricts the query to the single collection shared with `with`.
    #[must_use]
    pub fn with_peer(mut self, with: BareJid) -> Self {
        self.with = Some(with);
        self
    }

    /// Sets the inclusive lower bound on `created_at`.
    #[must_use]
    pub const fn starting_at(mut self, start: DateTime<Utc>) -> Self {
        self.range.start = Some(start);
        self
    }

    /// Sets the inclusive upper bound on `created_at`.
    #[must_use]
    pub const fn ending_at(mut self, end: DateTime<Utc>) -> Self {
        self.range.end = Some(end);
        self
    }

    /// Sets the maximum page size.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Returns the JID whose collections are listed.
    #[must_use]
    pub const fn jid(&self) -> &BareJid {
        &self.jid
    }

    /// Returns the optional peer restriction.
    #[must_use]
    pub const fn with(&self) -> Option<&BareJid> {
        self.with.as_ref()
    }

    /// Returns the time bounds.
    #[must_use]
    pub const fn range(&self) -> TimeRange {
        self.range
    }

    /// Returns the maximum page size.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }
}

/// Criteria for reading the messages of one conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageQuery {
    jid: BareJid,
    with: BareJid,
    range: TimeRange,
    limit: usize,
}

impl MessageQuery {
    /// Matches messages between `jid` and `with` created at or after `start`.
    #[must_use]
    pub const fn new(jid: BareJid, with: BareJid, start: DateTime<Utc>) -> Self {
        Self {
            jid,
            with,
            range: TimeRange::new(Some(start), None),
            limit: DEFAULT_PAGE_LIMIT,
        }
    }

    /// Sets the inclusive upper bound on `created_at`.
    #[must_use]
    pub const fn ending_at(mut self, end: DateTime<Utc>) -> Self {
        self.range.end = Some(end);
        self
    }

    /// Sets the maximum page size.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Returns the requesting JID.
    #[must_use]
    pub const fn jid(&self) -> &BareJid {
        &self.jid
    }

    /// Returns the other side of the conversation.
    #[must_use]
    pub const fn with(&self) -> &BareJid {
        &self.with
    }

    /// Returns the time bounds.
    #[must_use]
    pub const fn range(&self) -> TimeRange {
        self.range
    }

    /// Returns the maximum page size.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }
}
