//! 検出サービスのHTTPクライアント
//!
//! `POST {api_url}/api/detect` に multipart の `file` フィールドで画像を送る。

use super::Detector;
use crate::error::{InspectError, Result};
use crate::scanner::ImageInfo;
use async_trait::async_trait;
use fod_inspect_common::DetectionResponse;
use reqwest::multipart::{Form, Part};
use std::time::Duration;

const DETECT_PATH: &str = "/api/detect";

pub struct HttpDetector {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDetector {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, DETECT_PATH)
    }
}

#[async_trait]
impl Detector for HttpDetector {
    async fn detect(&self, image: &ImageInfo) -> Result<DetectionResponse> {
        let bytes = tokio::fs::read(&image.path).await?;
        let part = Part::bytes(bytes)
            .file_name(image.file_name.clone())
            .mime_str(image.mime_type())?;
        let form = Form::new().part("file", part);

        tracing::debug!(endpoint = %self.endpoint(), file = %image.file_name, "sending image to detection service");

        let response = self
            .client
            .post(self.endpoint())
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(InspectError::Detection(error_detail(status.as_u16(), &text)));
        }

        let payload: DetectionResponse = response.json().await?;
        tracing::debug!(
            file = %image.file_name,
            chars = payload.response.len(),
            model = ?payload.model,
            "detection response received"
        );
        Ok(payload)
    }
}

/// エラーレスポンスの `detail` を取り出す（無ければステータスのみ）
fn error_detail(status: u16, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["detail"].as_str().map(str::to_string))
        .unwrap_or_else(|| format!("Detection failed: {}", status))
}
