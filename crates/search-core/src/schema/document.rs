// search-core/src/schema/document.rs
//! 文档转换
//!
//! Record -> TantivyDocument for writing, and back again when reading stored
//! hits. Every field is stored, so a hit can be rebuilt into the full record.

use chrono::{DateTime, Utc};
use tantivy::schema::{Field, Value};
use tantivy::TantivyDocument;

use super::builder::{CommentFields, TicketFields};
use crate::models::{CommentRecord, CommentTarget, TicketRecord, TicketStatus};

impl TicketFields {
    pub fn to_document(&self, ticket: &TicketRecord) -> TantivyDocument {
        let mut doc = TantivyDocument::default();
        doc.add_i64(self.doc_id, ticket.id);
        doc.add_text(self.title, &ticket.title);
        doc.add_text(self.body, &ticket.body);
        doc.add_text(self.status, ticket.status.as_str());
        for label in &ticket.labels {
            doc.add_text(self.labels, label);
        }
        if let Some(assignee_id) = ticket.assignee_id {
            doc.add_i64(self.assignee_id, assignee_id);
        }
        doc.add_i64(self.creator_id, ticket.creator_id);
        doc.add_i64(self.created_at, ticket.created_at.timestamp_millis());
        doc.add_i64(self.updated_at, ticket.updated_at.timestamp_millis());
        doc
    }

    /// 从存储文档还原工单记录，缺少主键或状态时返回 None
    pub fn from_document(&self, doc: &TantivyDocument) -> Option<TicketRecord> {
        Some(TicketRecord {
            id: read_i64(doc, self.doc_id)?,
            title: read_text(doc, self.title),
            body: read_text(doc, self.body),
            status: doc
                .get_first(self.status)
                .and_then(|v| v.as_str())
                .and_then(TicketStatus::parse)?,
            labels: doc
                .get_all(self.labels)
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            assignee_id: read_i64(doc, self.assignee_id),
            creator_id: read_i64(doc, self.creator_id).unwrap_or_default(),
            created_at: read_timestamp(doc, self.created_at),
            updated_at: read_timestamp(doc, self.updated_at),
        })
    }
}

impl CommentFields {
    pub fn to_document(&self, comment: &CommentRecord) -> TantivyDocument {
        let mut doc = TantivyDocument::default();
        doc.add_i64(self.doc_id, comment.id);
        doc.add_i64(self.target_id, comment.target_id);
        doc.add_text(self.target_type, comment.target_type.as_str());
        doc.add_text(self.body, &comment.body);
        doc.add_i64(self.creator_id, comment.creator_id);
        doc.add_i64(self.created_at, comment.created_at.timestamp_millis());
        doc.add_i64(self.updated_at, comment.updated_at.timestamp_millis());
        doc
    }

    pub fn from_document(&self, doc: &TantivyDocument) -> Option<CommentRecord> {
        Some(CommentRecord {
            id: read_i64(doc, self.doc_id)?,
            target_type: doc
                .get_first(self.target_type)
                .and_then(|v| v.as_str())
                .and_then(CommentTarget::parse)?,
            target_id: read_i64(doc, self.target_id).unwrap_or_default(),
            body: read_text(doc, self.body),
            creator_id: read_i64(doc, self.creator_id).unwrap_or_default(),
            created_at: read_timestamp(doc, self.created_at),
            updated_at: read_timestamp(doc, self.updated_at),
        })
    }
}

fn read_text(doc: &TantivyDocument, field: Field) -> String {
    doc.get_first(field)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

fn read_i64(doc: &TantivyDocument, field: Field) -> Option<i64> {
    doc.get_first(field).and_then(|v| v.as_i64())
}

fn read_timestamp(doc: &TantivyDocument, field: Field) -> DateTime<Utc> {
    read_i64(doc, field)
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or_default()
}
