use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LumiError>;

/// Ошибки построения библиотеки правил и окружения ассистента.
/// Сам подбор ответа ошибок не порождает.
#[derive(Debug, Error)]
pub enum LumiError {
    #[error("rule has no keywords")]
    EmptyKeywords,

    #[error("rule has no responses")]
    EmptyResponses,

    #[error("rule contains a blank keyword")]
    BlankKeyword,

    #[error("rule contains a blank response")]
    BlankResponse,

    #[error("rule #{index} is invalid: {source}")]
    InvalidRule {
        index: usize,
        #[source]
        source: Box<LumiError>,
    },

    #[error("fallback set is empty")]
    EmptyFallbacks,

    #[error("fallback set contains a blank reply")]
    BlankFallback,

    #[error("thinking delay window {min_ms}..{max_ms} ms is empty")]
    InvalidDelay { min_ms: u64, max_ms: u64 },

    #[error("failed to read rule library {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed rule library: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no tokio runtime is running")]
    NoRuntime,
}
