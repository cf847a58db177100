use crate::error::Result;
use config::{constants, create_strategy, resolve_dir, AppStrategy};
use search_core::SearchConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default = "default_config", deny_unknown_fields)]
pub struct Config {
    /// Index data lives under `<data-dir>/index`
    pub data_dir: PathBuf,
    /// Record export used by `rebuild` when no `--snapshot` is given
    pub snapshot_path: Option<PathBuf>,
    /// Engine settings (`[search.index]`, `[search.paging]`, `[search.display]`)
    pub search: SearchConfig,
}

fn default_config() -> Config {
    let data_dir = match create_strategy() {
        Ok(strategy) => resolve_dir("TICKET_SEARCH_DATA_DIR", &strategy, |s| Some(s.data_dir())),
        Err(_) => std::env::temp_dir().join(constants::APP_NAME),
    };

    Config {
        data_dir,
        snapshot_path: None,
        search: SearchConfig::default(),
    }
}

impl Config {
    fn load_str(user_config_str: &str) -> Result<Config> {
        let user_config: Config = toml::from_str(user_config_str)?;
        Ok(user_config)
    }

    pub fn load() -> Result<Config> {
        let strategy = create_strategy()?;
        let config_path = strategy.config_dir().join(constants::CLI_CONFIG_FILE_NAME);

        match std::fs::read_to_string(&config_path) {
            Ok(user_config_str) => Self::load_str(&user_config_str),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // 配置文件不存在，创建示例配置文件
                Self::create_example_config(&config_path)?;
                Self::load_str("")
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Engine config with the index directory filled in. The CLI always keeps
    /// its indexes on disk.
    pub fn search_config(&self) -> SearchConfig {
        let mut search = self.search.clone();
        if search.index.storage_path.is_none() {
            search.index.storage_path = Some(self.data_dir.join(constants::INDEX_DIR_NAME));
        }
        search
    }

    pub fn index_dir(&self) -> PathBuf {
        self.search_config()
            .index
            .storage_path
            .unwrap_or_else(|| self.data_dir.join(constants::INDEX_DIR_NAME))
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.snapshot_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join(constants::SNAPSHOT_FILE_NAME))
    }

    fn create_example_config(config_path: &Path) -> Result<()> {
        use std::io::Write;

        // 确保配置目录存在
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let example_config = r#"# ticket-search 配置文件
#
# 此文件在首次运行时自动创建

# 可选：自定义数据目录（索引保存在 <data-dir>/index）
# data-dir = "/var/lib/ticket-search"

# 可选：rebuild 默认读取的记录导出文件
# snapshot-path = "/var/lib/ticket-search/snapshot.json"

[search.paging]
default_limit = 20
max_limit = 100

[search.display]
snippet_max_len = 200
"#;

        let mut file = std::fs::File::create(config_path)?;
        file.write_all(example_config.as_bytes())?;

        eprintln!("已创建配置文件: {:?}", config_path);

        Ok(())
    }
}
