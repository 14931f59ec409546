use crate::cloudcontroller::CloudControllerError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("UI error: {0}")]
    Ui(#[from] termtext::Error),

    #[error("Cloud Controller error: {0}")]
    CloudController(#[from] CloudControllerError),

    /// The command already told the user what went wrong.
    #[error("command failed")]
    Failed,
}

pub type Result<T> = std::result::Result<T, CfError>;
