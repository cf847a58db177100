// search-core/src/schema/builder.rs
//! Schema 构建器
//!
//! Builds the two tantivy schemas (tickets, comments) together with their
//! field handles, and the shared text analyzer.

use tantivy::schema::*;
use tantivy::tokenizer::{AsciiFoldingFilter, LowerCaser, RemoveLongFilter, SimpleTokenizer, TextAnalyzer};

use super::fields::*;

/// Tokens of this many bytes or more are dropped by the analyzer and never
/// reach the index
pub const MAX_TOKEN_LEN: usize = 255;

/// Unicode word splitting, lower-casing and diacritic folding.
///
/// Used both at index time and to analyze query words and highlight text, so
/// all three see the same tokens.
pub fn text_analyzer() -> TextAnalyzer {
    TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(RemoveLongFilter::limit(MAX_TOKEN_LEN))
        .filter(LowerCaser)
        .filter(AsciiFoldingFilter)
        .build()
}

fn text_options() -> TextOptions {
    TextOptions::default()
        .set_indexing_options(
            TextFieldIndexing::default()
                .set_tokenizer(TEXT_TOKENIZER)
                .set_index_option(IndexRecordOption::WithFreqsAndPositions),
        )
        .set_stored()
}

/// Field handles of the ticket index
#[derive(Debug, Clone, Copy)]
pub struct TicketFields {
    pub doc_id: Field,
    pub title: Field,
    pub body: Field,
    pub status: Field,
    pub labels: Field,
    pub assignee_id: Field,
    pub creator_id: Field,
    pub created_at: Field,
    pub updated_at: Field,
}

/// Field handles of the comment index
#[derive(Debug, Clone, Copy)]
pub struct CommentFields {
    pub doc_id: Field,
    pub target_id: Field,
    pub target_type: Field,
    pub body: Field,
    pub creator_id: Field,
    pub created_at: Field,
    pub updated_at: Field,
}

/// 构建工单索引 Schema
///
/// - `title`, `body`: analyzed, stored
/// - `status`, `labels`: exact, stored
/// - ids and timestamps: i64, stored
pub fn build_ticket_schema() -> (Schema, TicketFields) {
    let mut schema_builder = Schema::builder();

    let doc_id = schema_builder.add_i64_field(FIELD_DOC_ID, INDEXED | STORED | FAST);
    let title = schema_builder.add_text_field(FIELD_TITLE, text_options());
    let body = schema_builder.add_text_field(FIELD_BODY, text_options());
    let status = schema_builder.add_text_field(FIELD_STATUS, STRING | STORED);
    let labels = schema_builder.add_text_field(FIELD_LABELS, STRING | STORED);
    let assignee_id = schema_builder.add_i64_field(FIELD_ASSIGNEE_ID, INDEXED | STORED);
    let creator_id = schema_builder.add_i64_field(FIELD_CREATOR_ID, INDEXED | STORED);
    let created_at = schema_builder.add_i64_field(FIELD_CREATED_AT, STORED | FAST);
    let updated_at = schema_builder.add_i64_field(FIELD_UPDATED_AT, STORED);

    let fields = TicketFields {
        doc_id,
        title,
        body,
        status,
        labels,
        assignee_id,
        creator_id,
        created_at,
        updated_at,
    };
    (schema_builder.build(), fields)
}

/// 构建评论索引 Schema
pub fn build_comment_schema() -> (Schema, CommentFields) {
    let mut schema_builder = Schema::builder();

    let doc_id = schema_builder.add_i64_field(FIELD_DOC_ID, INDEXED | STORED | FAST);
    let target_id = schema_builder.add_i64_field(FIELD_TARGET_ID, INDEXED | STORED);
    let target_type = schema_builder.add_text_field(FIELD_TARGET_TYPE, STRING | STORED);
    let body = schema_builder.add_text_field(FIELD_BODY, text_options());
    let creator_id = schema_builder.add_i64_field(FIELD_CREATOR_ID, INDEXED | STORED);
    let created_at = schema_builder.add_i64_field(FIELD_CREATED_AT, STORED | FAST);
    let updated_at = schema_builder.add_i64_field(FIELD_UPDATED_AT, STORED);

    let fields = CommentFields {
        doc_id,
        target_id,
        target_type,
        body,
        creator_id,
        created_at,
        updated_at,
    };
    (schema_builder.build(), fields)
}
