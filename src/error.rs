use thiserror::Error;

#[derive(Error, Debug)]
pub enum HardsubError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// A required external tool is absent or not runnable. Fatal for the whole run.
    #[error("{tool} not found. Install it from: {hint}")]
    MissingDependency { tool: String, hint: String },

    #[error("Command not found: {0}")]
    ToolNotFound(String),

    #[error("Media processing error: {0}")]
    Media(String),

    #[error("Remote storage error: {0}")]
    Remote(String),

    #[error("Remote object not found: {0}")]
    RemoteNotFound(String),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Standard input closed while waiting for an answer")]
    InputClosed,
}

pub type Result<T> = std::result::Result<T, HardsubError>;
