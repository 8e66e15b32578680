use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid document pattern '{pattern}' in project '{project}': {message}")]
    InvalidGlob {
        project: String,
        pattern: String,
        message: String,
    },

    #[error("Invalid project '{name}': {message}")]
    InvalidProject { name: String, message: String },
}
