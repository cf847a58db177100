use super::{Command, open_engine_without_source};
use crate::config::Config;
use crate::error::{Result, WrapErr};
use search_core::Record;
use std::path::PathBuf;

pub struct IndexCommand {
    config: Config,
    record_path: PathBuf,
}

impl IndexCommand {
    pub fn new(cfg: Config, record_path: PathBuf) -> Self {
        Self {
            config: cfg,
            record_path,
        }
    }

    fn load_record(&self) -> Result<Record> {
        let content = std::fs::read_to_string(&self.record_path)
            .wrap_err_with(|| format!("Failed to read {}", self.record_path.display()))?;
        let record = serde_json::from_str(&content)
            .wrap_err_with(|| format!("Invalid record in {}", self.record_path.display()))?;
        Ok(record)
    }
}

#[async_trait::async_trait]
impl Command for IndexCommand {
    async fn execute(&self) -> Result<()> {
        let record = self.load_record()?;
        let (content_type, id) = (record.content_type(), record.id());

        let engine = open_engine_without_source(&self.config)?;
        let indexed = match &record {
            Record::Ticket(ticket) => engine.index_ticket(ticket).map(|_| true),
            Record::Comment(comment) => engine.index_comment(comment),
        }
        .wrap_err_with(|| format!("Failed to index {} #{}", content_type, id))?;

        if indexed {
            println!("Indexed {} #{}", content_type, id);
        } else {
            println!("Skipped {} #{}: only ticket comments are searchable", content_type, id);
        }
        Ok(())
    }
}
