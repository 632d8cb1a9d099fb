use thiserror::Error;

#[derive(Error, Debug)]
pub enum InspectError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("検出サービスエラー: {0}")]
    Detection(String),

    #[error("HTTP通信エラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("検査記録が見つかりません: {0}")]
    NotFound(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] fod_inspect_common::Error),
}

pub type Result<T> = std::result::Result<T, InspectError>;
