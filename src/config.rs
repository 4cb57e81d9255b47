use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: Server,
    pub db: Db,
    pub deployment: Deployment,
    pub flags: Flags,
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Db {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Deployment {
    /// Self-hosted installs are exempt from tier-based retention windows.
    pub self_hosted: bool,
}

/// Default values for the per-source read flags. Each flag independently
/// enables one analytical data source for feed reads.
#[derive(Debug, Deserialize, Clone)]
pub struct Flags {
    pub workflow_run_reads: bool,
    pub step_run_reads: bool,
    pub trace_log_reads: bool,
    pub list_trace_enrichment: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Pagination {
    pub default_limit: u32,
    pub max_limit: u32,
}

/// Load settings from `config/default.toml`, `config/<env>.toml`, and env overrides.
pub fn load() -> Result<Settings, config::ConfigError> {
    let env_name = std::env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());
    config::Config::builder()
        .add_source(config::File::with_name("config/default"))
        .add_source(config::File::with_name(&format!("config/{env_name}")).required(false))
        .add_source(config::Environment::with_prefix("FEED").separator("__"))
        .build()?
        .try_deserialize()
}
