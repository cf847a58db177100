use super::{Command, open_engine_without_source};
use crate::config::Config;
use crate::error::Result;

pub struct StatsCommand {
    config: Config,
}

impl StatsCommand {
    pub fn new(cfg: Config) -> Self {
        Self { config: cfg }
    }
}

#[async_trait::async_trait]
impl Command for StatsCommand {
    async fn execute(&self) -> Result<()> {
        let engine = open_engine_without_source(&self.config)?;
        let stats = engine.stats();

        println!("index:    {}", self.config.index_dir().display());
        println!("tickets:  {}", stats.tickets);
        println!("comments: {}", stats.comments);
        Ok(())
    }
}
