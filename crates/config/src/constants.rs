//! Fixed names shared between the CLI and the library crates

/// Registry endpoint used when neither the config file nor the environment
/// supplies one
pub const DEFAULT_API_URL: &str = "https://api.addonhub.io";

/// Directory name under the platform config and data directories
pub const APP_DIR: &str = "addonhub";

pub const CONFIG_FILE: &str = "config.toml";
pub const CREDENTIALS_FILE: &str = "credentials.toml";
pub const SETTINGS_DIR: &str = "settings";
pub const LOGS_DIR: &str = "logs";

/// Settings key holding the team selected with `addonhub switch`
pub const CURRENT_TEAM_KEY: &str = "team";

pub const ENV_API_URL: &str = "ADDONHUB_API_URL";
pub const ENV_API_KEY: &str = "ADDONHUB_API_KEY";
pub const ENV_TIMEOUT: &str = "ADDONHUB_TIMEOUT";
pub const ENV_DATA_DIR: &str = "ADDONHUB_DATA_DIR";
