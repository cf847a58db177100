// search-core/src/search.rs
//! 搜索结果类型
//!
//! Tickets and comments come back in one ranked list. Each hit keeps its own
//! shape, common properties are reached through [`SearchResult`].

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{ContentType, TicketStatus};

/// 工单命中
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketResult {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub status: TicketStatus,
    pub labels: Vec<String>,
    pub assignee_id: Option<i64>,
    pub creator_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Lower is more relevant
    pub rank: f64,
    /// `Title: ...\nBody: ...` with `<mark>` around matched words
    pub highlighted: String,
    pub snippet: String,
}

/// 评论命中
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentResult {
    pub id: i64,
    /// Owning ticket
    pub target_id: i64,
    /// `Comment on ticket #<target_id>`
    pub title: String,
    pub body: String,
    pub creator_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub rank: f64,
    pub highlighted: String,
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SearchResult {
    Ticket(TicketResult),
    Comment(CommentResult),
}

impl SearchResult {
    pub fn content_type(&self) -> ContentType {
        match self {
            SearchResult::Ticket(_) => ContentType::Ticket,
            SearchResult::Comment(_) => ContentType::Comment,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            SearchResult::Ticket(t) => t.id,
            SearchResult::Comment(c) => c.id,
        }
    }

    pub fn rank(&self) -> f64 {
        match self {
            SearchResult::Ticket(t) => t.rank,
            SearchResult::Comment(c) => c.rank,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            SearchResult::Ticket(t) => t.created_at,
            SearchResult::Comment(c) => c.created_at,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            SearchResult::Ticket(t) => &t.title,
            SearchResult::Comment(c) => &c.title,
        }
    }

    pub fn highlighted(&self) -> &str {
        match self {
            SearchResult::Ticket(t) => &t.highlighted,
            SearchResult::Comment(c) => &c.highlighted,
        }
    }

    pub fn snippet(&self) -> &str {
        match self {
            SearchResult::Ticket(t) => &t.snippet,
            SearchResult::Comment(c) => &c.snippet,
        }
    }
}

/// One page of merged results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResultPage {
    pub results: Vec<SearchResult>,
    /// Text matches across both indexes, before filters
    pub total: usize,
    /// 1-based
    pub current_page: usize,
    pub total_pages: usize,
    /// The query as the caller typed it
    pub query: String,
}

impl SearchResultPage {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
