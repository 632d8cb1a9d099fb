//! 異物検出サービス連携
//!
//! 画像1枚を送り、自由形式の解析テキストを受け取る。
//! テキストの解釈は fod_inspect_common のパーサーが行う。

mod http;

pub use http::HttpDetector;

use crate::error::Result;
use crate::scanner::ImageInfo;
use async_trait::async_trait;
use fod_inspect_common::DetectionResponse;

/// 画像1枚の異物検出
#[async_trait]
pub trait Detector: Send + Sync {
    async fn detect(&self, image: &ImageInfo) -> Result<DetectionResponse>;
}
