// search-core/src/config.rs
//! 配置模块

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 搜索引擎配置
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    pub index: IndexConfig,
    pub paging: PagingConfig,
    pub display: DisplayConfig,
}

/// 索引配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Directory holding the `tickets/` and `comments/` indexes, in memory when unset
    pub storage_path: Option<PathBuf>,
    /// Writer arena budget per index, in bytes
    pub writer_memory: usize,
}

/// 分页配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PagingConfig {
    pub default_limit: usize,
    pub max_limit: usize,
}

/// 显示配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub snippet_max_len: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            storage_path: None,
            writer_memory: 50_000_000,
        }
    }
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_limit: query::DEFAULT_LIMIT,
            max_limit: 100,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            snippet_max_len: 200,
        }
    }
}

impl PagingConfig {
    /// Resolve a caller supplied page size: zero means the default, the result
    /// is always within `1..=max_limit`.
    pub fn clamp_limit(&self, limit: usize) -> usize {
        let limit = if limit == 0 { self.default_limit } else { limit };
        limit.clamp(1, self.max_limit.max(1))
    }
}
