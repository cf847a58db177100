use super::{Command, open_engine_without_source};
use crate::config::Config;
use crate::error::{Result, WrapErr};
use search_core::ContentType;

pub struct RemoveCommand {
    config: Config,
    content_type: ContentType,
    id: i64,
}

impl RemoveCommand {
    pub fn new(cfg: Config, content_type: ContentType, id: i64) -> Self {
        Self {
            config: cfg,
            content_type,
            id,
        }
    }
}

#[async_trait::async_trait]
impl Command for RemoveCommand {
    async fn execute(&self) -> Result<()> {
        let engine = open_engine_without_source(&self.config)?;
        engine
            .remove_from_index(self.content_type, self.id)
            .wrap_err_with(|| format!("Failed to remove {} #{}", self.content_type, self.id))?;

        println!("Removed {} #{} from the index", self.content_type, self.id);
        Ok(())
    }
}
