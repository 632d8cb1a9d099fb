//! 検査結果の集約（CLI/ストア共通）
//!
//! 画像1枚分の解析テキストからサブミッションを作り、
//! 複数のサブミッションをバッチ（検査記録）にまとめる。

use crate::classifier::classify_status;
use crate::error::{Error, Result};
use crate::parser::parse_defects;
use crate::types::{
    Defect, DefectSummary, ImageMeta, InspectionRecord, InspectionStatus, NewSubmission, ProjectRef,
    Severity, Submission,
};

/// 検出サービスを呼べなかった画像に使う解析テキスト
pub const FALLBACK_ANALYSIS: &str = "INSPECTION SUMMARY (Mock - API unavailable)

Specification: Design specs
Images Analyzed: 1
Defects Detected: 2 anomalies found
Status: FAIL - Defects present

CRITICAL FAILURES:
• Surface Integrity: Foreign object detected
  - Location: Upper-left quadrant
  - Recommended Action: Reject and rework

MAJOR ISSUES:
• Debris detected at center region
  - Recommended Action: Quality review required

RECOMMENDATION: Product does not meet manufacturing specifications. Immediate rework required.";

/// フォールバック時のモデル名
pub const FALLBACK_MODEL: &str = "mock (offline)";

/// レガシー記録から合成するサブミッションの画像名
const LEGACY_PHOTO_NAME: &str = "product.png";

/// 解析テキストからサブミッションを生成
///
/// 重大（critical）な欠陥が1件でもあるか、テキスト判定が不合格なら不合格。
pub fn build_submission(
    meta: &ImageMeta,
    analysis_text: &str,
    model: Option<&str>,
    inference_time_ms: Option<f64>,
) -> NewSubmission {
    let defects = parse_defects(analysis_text);
    let status = derive_status(analysis_text, &defects);

    NewSubmission {
        timestamp: meta.timestamp,
        photo_ref: meta.photo_ref.clone(),
        photo_name: meta.photo_name.clone(),
        design_spec_refs: meta.design_specs.clone(),
        status,
        defects,
        analysis_text: analysis_text.to_string(),
        model: model.map(str::to_string),
        inference_time_ms: inference_time_ms.map(|ms| ms.max(0.0)),
    }
}

/// 検出サービス呼び出しに失敗した画像のサブミッション
pub fn fallback_submission(meta: &ImageMeta) -> NewSubmission {
    build_submission(meta, FALLBACK_ANALYSIS, Some(FALLBACK_MODEL), Some(0.0))
}

/// サブミッションをバッチにまとめる
///
/// - サブミッションIDは `{batch_id}-sub-{index}`（0始まり）
/// - タイムスタンプと単一結果互換のフィールドは先頭サブミッションから取る
pub fn build_batch(
    batch_id: &str,
    submissions: Vec<NewSubmission>,
    project: Option<ProjectRef>,
) -> Result<InspectionRecord> {
    if submissions.is_empty() {
        return Err(Error::EmptyBatch);
    }

    let submissions: Vec<Submission> = submissions
        .into_iter()
        .enumerate()
        .map(|(index, s)| s.into_submission(submission_id(batch_id, index)))
        .collect();

    let first = &submissions[0];
    let project = project.unwrap_or_default();

    Ok(InspectionRecord {
        id: batch_id.to_string(),
        image_ref: first.photo_ref.clone(),
        response: first.analysis_text.clone(),
        model: first.model.clone(),
        inference_time_ms: first.inference_time_ms,
        timestamp: first.timestamp,
        project_id: project.id,
        project_name: project.name,
        submissions: Some(submissions),
    })
}

/// 検査記録をサブミッションのリストとして取得
///
/// レガシー形式（submissionsなし）は保存済みテキストを再解析して1件を合成する。
/// ストレージ上の記録は書き換えない。
pub fn to_submissions(record: &InspectionRecord) -> Vec<Submission> {
    if let Some(submissions) = record.submissions.as_ref().filter(|s| !s.is_empty()) {
        return submissions.clone();
    }

    let defects = parse_defects(&record.response);
    let status = derive_status(&record.response, &defects);

    vec![Submission {
        id: record.id.clone(),
        timestamp: record.timestamp,
        photo_ref: record.image_ref.clone(),
        photo_name: LEGACY_PHOTO_NAME.to_string(),
        design_spec_refs: Vec::new(),
        status,
        defects,
        analysis_text: record.response.clone(),
        model: record.model.clone(),
        inference_time_ms: record.inference_time_ms,
    }]
}

/// 記録内でのサブミッションID
pub fn submission_id(batch_id: &str, index: usize) -> String {
    format!("{}-sub-{}", batch_id, index)
}

/// バッチ全体の判定（1件でも不合格なら不合格）
pub fn overall_status<'a>(submissions: impl IntoIterator<Item = &'a Submission>) -> InspectionStatus {
    if submissions.into_iter().any(|s| s.status.is_fail()) {
        InspectionStatus::Fail
    } else {
        InspectionStatus::Pass
    }
}

/// 解析テキストと抽出済み欠陥からの判定
///
/// 重大（critical）な欠陥が1件でもあるか、テキスト判定が不合格なら不合格。
pub fn derive_status(analysis_text: &str, defects: &[Defect]) -> InspectionStatus {
    let has_critical = defects.iter().any(|d| d.severity == Severity::Critical);
    if has_critical || classify_status(analysis_text).is_fail() {
        InspectionStatus::Fail
    } else {
        InspectionStatus::Pass
    }
}

impl InspectionRecord {
    /// 記録全体の判定
    pub fn status(&self) -> InspectionStatus {
        overall_status(&to_submissions(self))
    }

    pub fn submission_count(&self) -> usize {
        match &self.submissions {
            Some(submissions) if !submissions.is_empty() => submissions.len(),
            _ => 1,
        }
    }

    /// 全サブミッションの重大度別欠陥件数
    pub fn defect_summary(&self) -> DefectSummary {
        let submissions = to_submissions(self);
        DefectSummary::from_defects(submissions.iter().flat_map(|s| s.defects.iter()))
    }

    /// submissionsが無い（または空の）記録
    pub fn is_legacy(&self) -> bool {
        self.submissions.as_ref().map_or(true, |s| s.is_empty())
    }
}
