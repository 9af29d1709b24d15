use crate::config::SchoolConfig;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub config: SchoolConfig,
    /// Where `config` was loaded from, if a file was used.
    pub config_source: Option<String>,
}
