//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Batch must contain at least one submission")]
    EmptyBatch,

    #[error("Storage quota exceeded: {needed} bytes needed, {limit} bytes available")]
    QuotaExceeded { needed: usize, limit: usize },
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
