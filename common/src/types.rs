//! 検査結果の型定義
//!
//! CLIとストアで共有される型:
//! - Defect: 解析テキストから抽出した欠陥
//! - NewSubmission / Submission: 画像1枚分の検査結果（ID付与前/後）
//! - NewInspection / InspectionRecord: バッチ（複数画像）またはレガシー単一結果
//! - DetectionResponse: 検出サービスのレスポンス

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 欠陥の重大度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Major,
    Minor,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Major => "major",
            Severity::Minor => "minor",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 検査判定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InspectionStatus {
    Pass,
    Fail,
}

impl InspectionStatus {
    pub fn is_fail(&self) -> bool {
        matches!(self, InspectionStatus::Fail)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InspectionStatus::Pass => "pass",
            InspectionStatus::Fail => "fail",
        }
    }
}

impl fmt::Display for InspectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 画像上の位置（画像サイズに対するパーセント座標 0-100）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
}

impl Location {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// 解析テキストから抽出した欠陥
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Defect {
    /// `DEF-001` 形式（1回のパース内で連番）
    pub id: String,
    pub location: Location,
    pub severity: Severity,
    pub description: String,
}

/// 画像メタデータ
#[derive(Debug, Clone, PartialEq)]
pub struct ImageMeta {
    pub photo_ref: String,
    pub photo_name: String,
    pub design_specs: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl ImageMeta {
    /// 現在時刻をタイムスタンプとしてメタデータを作成
    pub fn new(photo_ref: impl Into<String>, photo_name: impl Into<String>) -> Self {
        Self {
            photo_ref: photo_ref.into(),
            photo_name: photo_name.into(),
            design_specs: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_design_specs(mut self, design_specs: Vec<String>) -> Self {
        self.design_specs = design_specs;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// ID付与前の画像1枚分の検査結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubmission {
    pub timestamp: DateTime<Utc>,
    pub photo_ref: String,
    pub photo_name: String,
    #[serde(default)]
    pub design_spec_refs: Vec<String>,
    pub status: InspectionStatus,
    #[serde(default)]
    pub defects: Vec<Defect>,
    pub analysis_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inference_time_ms: Option<f64>,
}

impl NewSubmission {
    pub fn into_submission(self, id: String) -> Submission {
        Submission {
            id,
            timestamp: self.timestamp,
            photo_ref: self.photo_ref,
            photo_name: self.photo_name,
            design_spec_refs: self.design_spec_refs,
            status: self.status,
            defects: self.defects,
            analysis_text: self.analysis_text,
            model: self.model,
            inference_time_ms: self.inference_time_ms,
        }
    }
}

/// 画像1枚分の検査結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// バッチ内で一意（`{batchId}-sub-{index}`）
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub photo_ref: String,
    pub photo_name: String,
    #[serde(default)]
    pub design_spec_refs: Vec<String>,
    pub status: InspectionStatus,
    #[serde(default)]
    pub defects: Vec<Defect>,
    /// 検出サービスの生テキスト（そのまま保持）
    pub analysis_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inference_time_ms: Option<f64>,
}

/// プロジェクト参照
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectRef {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// バッチ保存時のメタデータ
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchMeta {
    pub project: Option<ProjectRef>,
    /// 設計仕様が空のサブミッションに適用される
    pub design_specs: Vec<String>,
}

/// ID付与前の検査記録（`save` の入力）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInspection {
    #[serde(default)]
    pub image_ref: String,
    #[serde(default)]
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inference_time_ms: Option<f64>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submissions: Option<Vec<Submission>>,
}

impl NewInspection {
    /// レガシー形式（画像1枚・submissionsなし）の入力を作成
    pub fn legacy(image_ref: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            image_ref: image_ref.into(),
            response: response.into(),
            model: None,
            inference_time_ms: None,
            timestamp: Utc::now(),
            project_id: None,
            project_name: None,
            submissions: None,
        }
    }

    pub fn with_id(self, id: String) -> InspectionRecord {
        InspectionRecord {
            id,
            image_ref: self.image_ref,
            response: self.response,
            model: self.model,
            inference_time_ms: self.inference_time_ms,
            timestamp: self.timestamp,
            project_id: self.project_id,
            project_name: self.project_name,
            submissions: self.submissions,
        }
    }
}

/// 検査記録（バッチまたはレガシー単一結果）
///
/// `submissions` を持たない記録はレガシー形式。読み出し側は
/// `to_submissions` で1件のサブミッションとして扱う。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionRecord {
    pub id: String,
    /// 先頭サブミッションの画像（後方互換用）
    #[serde(default)]
    pub image_ref: String,
    /// 先頭サブミッションの解析テキスト（後方互換用）
    #[serde(default)]
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inference_time_ms: Option<f64>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submissions: Option<Vec<Submission>>,
}

/// 検出サービスのレスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResponse {
    pub response: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub inference_time_ms: Option<f64>,
}

/// 重大度別の欠陥件数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DefectSummary {
    pub critical: usize,
    pub major: usize,
    pub minor: usize,
}

impl DefectSummary {
    pub fn from_defects<'a>(defects: impl IntoIterator<Item = &'a Defect>) -> Self {
        let mut summary = Self::default();
        for defect in defects {
            match defect.severity {
                Severity::Critical => summary.critical += 1,
                Severity::Major => summary.major += 1,
                Severity::Minor => summary.minor += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.critical + self.major + self.minor
    }
}
