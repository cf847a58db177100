// search-core/src/source.rs
//! 数据源
//!
//! The authoritative ticket and comment stores live outside this crate. A
//! rebuild reads everything through [`RecordSource`].

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::models::{CommentRecord, TicketRecord};

/// Enumerates every record that should be searchable
pub trait RecordSource: Send + Sync {
    fn all_tickets(&self) -> anyhow::Result<Vec<TicketRecord>>;

    /// Comments attached to tickets. Discussion comments returned here are
    /// ignored by the indexer.
    fn all_ticket_comments(&self) -> anyhow::Result<Vec<CommentRecord>>;
}

/// In-memory record dump, typically loaded from a JSON export
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordSnapshot {
    #[serde(default)]
    pub tickets: Vec<TicketRecord>,
    #[serde(default)]
    pub comments: Vec<CommentRecord>,
}

impl RecordSnapshot {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        let snapshot = serde_json::from_str(&content)
            .with_context(|| format!("invalid snapshot {}", path.display()))?;
        Ok(snapshot)
    }
}

impl RecordSource for RecordSnapshot {
    fn all_tickets(&self) -> anyhow::Result<Vec<TicketRecord>> {
        Ok(self.tickets.clone())
    }

    fn all_ticket_comments(&self) -> anyhow::Result<Vec<CommentRecord>> {
        Ok(self
            .comments
            .iter()
            .filter(|c| c.is_ticket_comment())
            .cloned()
            .collect())
    }
}
