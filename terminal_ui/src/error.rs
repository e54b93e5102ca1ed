use std::path::PathBuf;

use taskdesk_shared::TaskId;

/// Failures talking to the remote task API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{method} {url} failed: {source}")]
    Request {
        method: &'static str,
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{method} {url} returned {status}")]
    Status {
        method: &'static str,
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("cannot build a task url from {0}")]
    InvalidUrl(String),
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FormError {
    #[error("required field is empty: {0}")]
    Missing(&'static str),
    #[error("estimated hours must be a positive number: {0:?}")]
    InvalidHours(String),
    #[error("due date must be YYYY-MM-DD: {0:?}")]
    InvalidDueDate(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("task list is not on screen, nothing to capture")]
    MissingRenderTarget,
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid api url {url:?}: {source}")]
    InvalidApiUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("api url cannot carry a path: {0}")]
    NotABase(String),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("terminal i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("task {0} not found")]
    TaskNotFound(TaskId),
    #[error("{0} request failed, see the log for details")]
    RequestFailed(&'static str),
    #[error("logger: {0}")]
    Logger(#[from] log::SetLoggerError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
