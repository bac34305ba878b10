pub mod replay;
pub mod scenario;

use interaction::ConfigError;
use scenario::ScenarioError;

pub use replay::{ReplayOptions, ReplayReport, replay};
pub use scenario::{Scenario, ScenarioStep};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    Config(ConfigError),
    Scenario(ScenarioError),
    Io(String),
    Json(String),
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolError::Config(e) => write!(f, "{e}"),
            ToolError::Scenario(e) => write!(f, "{e}"),
            ToolError::Io(msg) => write!(f, "io error: {msg}"),
            ToolError::Json(msg) => write!(f, "json error: {msg}"),
        }
    }
}

impl std::error::Error for ToolError {}

impl From<ConfigError> for ToolError {
    fn from(e: ConfigError) -> Self {
        ToolError::Config(e)
    }
}

impl From<ScenarioError> for ToolError {
    fn from(e: ScenarioError) -> Self {
        ToolError::Scenario(e)
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(e: serde_json::Error) -> Self {
        ToolError::Json(e.to_string())
    }
}
