use std::collections::BTreeSet;

use crate::filter::StatusFilter;

/// Page size used when the caller does not ask for one
pub const DEFAULT_LIMIT: usize = 20;

/// A search request after the inline filters have been pulled out of the text
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StructuredQuery {
    /// Free text with filter tokens removed; empty matches every document
    pub text: String,
    /// Every label a ticket must carry
    pub labels: BTreeSet<String>,
    pub status: StatusFilter,
    pub assignee_id: Option<i64>,
    pub creator_id: Option<i64>,
    limit: usize,
    offset: usize,
}

impl Default for StructuredQuery {
    fn default() -> Self {
        Self {
            text: String::new(),
            labels: BTreeSet::new(),
            status: StatusFilter::All,
            assignee_id: None,
            creator_id: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl StructuredQuery {
    /// Set pagination. A zero limit is raised to one.
    pub fn with_page(mut self, limit: usize, offset: usize) -> Self {
        self.limit = limit.max(1);
        self.offset = offset;
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// 1-based page number derived from offset and limit
    pub fn page_number(&self) -> usize {
        self.offset / self.limit + 1
    }

    /// True when the free text places no restriction on matches
    pub fn is_wildcard(&self) -> bool {
        self.text.is_empty()
    }

    /// True when any filter besides the free text is active
    pub fn has_filters(&self) -> bool {
        !self.labels.is_empty()
            || self.status != StatusFilter::All
            || self.assignee_id.is_some()
            || self.creator_id.is_some()
    }
}
