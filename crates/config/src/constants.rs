pub const TOP_LEVEL_DOMAIN: &str = "org";
pub const AUTHOR: &str = "tracker";
pub const APP_NAME: &str = "ticket-search";

/// Lives in the config dir
pub const CLI_CONFIG_FILE_NAME: &str = "config.toml";

/// Subdirectory of the data dir holding the `tickets/` and `comments/` indexes
pub const INDEX_DIR_NAME: &str = "index";

/// Default record export read by `rebuild`, inside the data dir
pub const SNAPSHOT_FILE_NAME: &str = "snapshot.json";
