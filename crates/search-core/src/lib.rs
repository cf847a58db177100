// search-core/src/lib.rs
//! 工单搜索引擎核心库
//!
//! 基于 Tantivy 的全文搜索，提供：
//! - 工单 / 评论双索引维护（增量更新与全量重建）
//! - 查询执行：全文匹配 + 标签、状态、指派人、创建人过滤
//! - 结果合并排序、高亮与摘要

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub mod config;
pub mod error;
pub mod expression;
pub mod highlight;
pub mod indexer;
pub mod models;
pub mod query_executor;
pub mod schema;
pub mod search;
pub mod source;

// 重导出核心类型
pub use config::{DisplayConfig, IndexConfig, PagingConfig, SearchConfig};
pub use error::{IndexError, SearchError};
pub use expression::{MatchClause, MatchExpr};
pub use highlight::{combine_highlights, snippet, Highlighter, MARK_CLOSE, MARK_OPEN};
pub use indexer::{IndexStats, IndexStorage, IndexStore, RebuildSummary};
pub use models::{CommentRecord, CommentTarget, ContentType, Record, RecordEvent, TicketRecord, TicketStatus};
pub use query_executor::execute;
pub use search::{CommentResult, SearchResult, SearchResultPage, TicketResult};
pub use source::{RecordSnapshot, RecordSource};

/// 搜索引擎统一入口
///
/// Bundles the index store, the record source used for rebuilds and the
/// configuration.
pub struct SearchEngine {
    store: IndexStore,
    source: Arc<dyn RecordSource>,
    config: SearchConfig,
}

impl SearchEngine {
    /// Open the indexes described by `config.index`
    pub fn new(config: SearchConfig, source: Arc<dyn RecordSource>) -> Result<Self, IndexError> {
        let store = IndexStore::from_config(&config.index)?;
        Ok(Self::with_store(store, source, config))
    }

    pub fn with_store(store: IndexStore, source: Arc<dyn RecordSource>, config: SearchConfig) -> Self {
        Self { store, source, config }
    }

    pub fn store(&self) -> &IndexStore {
        &self.store
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// 执行搜索
    ///
    /// Parses the DSL in `raw`. A zero `limit` means the configured default,
    /// larger values are capped at `paging.max_limit`.
    pub fn search(&self, raw: &str, limit: usize, offset: usize) -> Result<SearchResultPage, SearchError> {
        let limit = self.config.paging.clamp_limit(limit);
        let query = query::parse_query(raw).with_page(limit, offset);
        self.search_structured(raw, &query)
    }

    /// Run an already parsed query
    pub fn search_structured(
        &self,
        raw: &str,
        query: &query::StructuredQuery,
    ) -> Result<SearchResultPage, SearchError> {
        execute(&self.store, raw, query, &self.config)
    }

    /// Rebuild both indexes from the record source
    pub fn rebuild_index(&self) -> Result<RebuildSummary, IndexError> {
        self.store.rebuild_all(self.source.as_ref())
    }

    pub fn rebuild_index_with_progress<F>(&self, cancel: &AtomicBool, progress: F) -> Result<RebuildSummary, IndexError>
    where
        F: Fn(usize, usize),
    {
        self.store
            .rebuild_all_with_progress(self.source.as_ref(), cancel, progress)
    }

    pub fn apply(&self, event: &RecordEvent) -> Result<(), IndexError> {
        self.store.apply(event)
    }

    pub fn index_ticket(&self, ticket: &TicketRecord) -> Result<(), IndexError> {
        self.store.index_ticket(ticket)
    }

    pub fn index_comment(&self, comment: &CommentRecord) -> Result<bool, IndexError> {
        self.store.index_comment(comment)
    }

    pub fn remove_from_index(&self, content_type: ContentType, id: i64) -> Result<(), IndexError> {
        self.store.remove_from_index(content_type, id)
    }

    pub fn stats(&self) -> IndexStats {
        self.store.stats()
    }
}
