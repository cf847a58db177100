// search-core/src/models.rs
//! 数据模型定义
//!
//! Records handed over by the ticket and comment services, and the lifecycle
//! events that keep the indexes in step with them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 文档类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Ticket,
    Comment,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Ticket => "ticket",
            ContentType::Comment => "comment",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ticket" => Ok(ContentType::Ticket),
            "comment" => Ok(ContentType::Comment),
            other => Err(format!("unknown content type: {}", other)),
        }
    }
}

/// 工单状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Open,
    Closed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::Closed => "closed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "open" => Some(TicketStatus::Open),
            "closed" => Some(TicketStatus::Closed),
            _ => None,
        }
    }
}

/// What a comment is attached to. Only ticket comments are searchable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentTarget {
    Ticket,
    Discussion,
}

impl CommentTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentTarget::Ticket => "ticket",
            CommentTarget::Discussion => "discussion",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ticket" => Some(CommentTarget::Ticket),
            "discussion" => Some(CommentTarget::Discussion),
            _ => None,
        }
    }
}

/// 工单记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketRecord {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub status: TicketStatus,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub assignee_id: Option<i64>,
    pub creator_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 评论记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub id: i64,
    pub target_type: CommentTarget,
    /// Owning ticket (or discussion) id
    pub target_id: i64,
    pub body: String,
    pub creator_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommentRecord {
    pub fn is_ticket_comment(&self) -> bool {
        self.target_type == CommentTarget::Ticket
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Record {
    Ticket(TicketRecord),
    Comment(CommentRecord),
}

impl Record {
    pub fn content_type(&self) -> ContentType {
        match self {
            Record::Ticket(_) => ContentType::Ticket,
            Record::Comment(_) => ContentType::Comment,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Record::Ticket(ticket) => ticket.id,
            Record::Comment(comment) => comment.id,
        }
    }
}

/// Lifecycle notification pushed by the ticket/comment services
#[derive(Debug, Clone, PartialEq)]
pub enum RecordEvent {
    Created(Record),
    Updated(Record),
    Deleted { content_type: ContentType, id: i64 },
}
