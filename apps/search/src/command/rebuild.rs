use super::{Command, open_engine};
use crate::config::Config;
use crate::error::{Result, WrapErr, error};
use indicatif::{ProgressBar, ProgressStyle};
use search_core::{IndexError, RecordSnapshot};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub struct RebuildCommand {
    config: Config,
    snapshot: Option<PathBuf>,
}

impl RebuildCommand {
    pub fn new(cfg: Config, snapshot: Option<PathBuf>) -> Self {
        Self {
            config: cfg,
            snapshot,
        }
    }
}

#[async_trait::async_trait]
impl Command for RebuildCommand {
    async fn execute(&self) -> Result<()> {
        let snapshot_path = self
            .snapshot
            .clone()
            .unwrap_or_else(|| self.config.snapshot_path());
        let snapshot = RecordSnapshot::load(&snapshot_path).map_err(|e| error!("{:#}", e))?;
        tracing::info!(
            "loaded {} tickets and {} comments from {}",
            snapshot.tickets.len(),
            snapshot.comments.len(),
            snapshot_path.display()
        );

        let engine = Arc::new(open_engine(&self.config, Arc::new(snapshot))?);
        let cancel = Arc::new(AtomicBool::new(false));

        // Ctrl-C 中断重建，旧索引保持不变
        let ctrl_c = {
            let cancel = Arc::clone(&cancel);
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel.store(true, Ordering::Relaxed);
                }
            })
        };

        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::with_template("{spinner} 重建索引 [{elapsed}] {bar:40} {pos}/{len} ({percent}%)")?,
        );

        let result = tokio::task::spawn_blocking({
            let engine = Arc::clone(&engine);
            let cancel = Arc::clone(&cancel);
            let pb = pb.clone();
            move || {
                engine.rebuild_index_with_progress(&cancel, |done, total| {
                    pb.set_length(total as u64);
                    pb.set_position(done as u64);
                })
            }
        })
        .await?;
        ctrl_c.abort();

        match result {
            Ok(summary) => {
                pb.finish_and_clear();
                println!(
                    "Rebuilt index: {} tickets, {} comments ({} non-ticket comments skipped)",
                    summary.tickets, summary.comments, summary.skipped
                );
                Ok(())
            }
            Err(e @ IndexError::Cancelled { .. }) => {
                pb.abandon();
                Err(e).wrap_err("Rebuild interrupted, the previous index is still in place")
            }
            Err(e) => {
                pb.abandon();
                Err(e).wrap_err("Rebuild failed, the previous index is still in place")
            }
        }
    }
}
