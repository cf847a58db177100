pub mod index;
pub mod rebuild;
pub mod remove;
pub mod search;
pub mod stats;

use crate::config::Config;
use crate::error::{Result, WrapErr};
use search_core::{RecordSnapshot, RecordSource, SearchEngine};
use std::sync::Arc;

pub use index::IndexCommand;
pub use rebuild::RebuildCommand;
pub use remove::RemoveCommand;
pub use search::SearchCommand;
pub use stats::StatsCommand;

#[async_trait::async_trait]
pub trait Command {
    async fn execute(&self) -> Result<()>;
}

/// Open the on-disk indexes. Commands other than `rebuild` never read records,
/// so they get an empty source.
fn open_engine(config: &Config, source: Arc<dyn RecordSource>) -> Result<SearchEngine> {
    let index_dir = config.index_dir();
    SearchEngine::new(config.search_config(), source)
        .wrap_err_with(|| format!("Failed to open index at {}", index_dir.display()))
}

fn open_engine_without_source(config: &Config) -> Result<SearchEngine> {
    open_engine(config, Arc::new(RecordSnapshot::default()))
}
