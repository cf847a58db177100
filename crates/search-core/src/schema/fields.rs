// search-core/src/schema/fields.rs
//! 字段名常量定义
//!
//! 统一管理所有 Schema 字段名，避免魔法字符串

/// Primary key of the source entity, used for delete-then-insert
pub const FIELD_DOC_ID: &str = "doc_id";

/// Ticket title (tickets only)
pub const FIELD_TITLE: &str = "title";

/// Ticket or comment body, the main full-text field
pub const FIELD_BODY: &str = "body";

/// `open` / `closed`, untokenized
pub const FIELD_STATUS: &str = "status";

/// One untokenized value per label
pub const FIELD_LABELS: &str = "labels";

pub const FIELD_ASSIGNEE_ID: &str = "assignee_id";

pub const FIELD_CREATOR_ID: &str = "creator_id";

/// Unix milliseconds
pub const FIELD_CREATED_AT: &str = "created_at";

/// Unix milliseconds
pub const FIELD_UPDATED_AT: &str = "updated_at";

/// Owning ticket id (comments only)
pub const FIELD_TARGET_ID: &str = "target_id";

/// `ticket` / `discussion` (comments only)
pub const FIELD_TARGET_TYPE: &str = "target_type";

/// Name under which the text analyzer is registered on both indexes
pub const TEXT_TOKENIZER: &str = "ticket_text";
