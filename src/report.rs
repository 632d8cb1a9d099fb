//! 検査記録の表示用テキスト生成

use fod_inspect_common::{
    derive_status, parse_defects, to_submissions, Defect, InspectionRecord, InspectionStatus,
};
use serde::Serialize;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// `parse` コマンドの出力
#[derive(Debug, Clone, Serialize)]
pub struct ParseReport {
    pub status: InspectionStatus,
    pub defects: Vec<Defect>,
}

impl ParseReport {
    /// 保存時と同じ判定（critical があれば不合格）
    pub fn from_text(text: &str) -> Self {
        let defects = parse_defects(text);
        Self {
            status: derive_status(text, &defects),
            defects,
        }
    }
}

fn status_label(status: InspectionStatus) -> &'static str {
    match status {
        InspectionStatus::Pass => "PASS",
        InspectionStatus::Fail => "FAIL",
    }
}

/// 一覧表示の1行
pub fn format_record_line(record: &InspectionRecord) -> String {
    let summary = record.defect_summary();
    let count = record.submission_count();
    format!(
        "{}  {}  {}件  {}  (critical {} / major {} / minor {})",
        record.timestamp.format(TIMESTAMP_FORMAT),
        record.id,
        count,
        status_label(record.status()),
        summary.critical,
        summary.major,
        summary.minor,
    )
}

/// 詳細表示
pub fn format_record_detail(record: &InspectionRecord) -> String {
    let mut lines = Vec::new();

    lines.push(format!("検査記録: {}", record.id));
    lines.push(format!("  日時: {}", record.timestamp.format(TIMESTAMP_FORMAT)));
    if let Some(name) = record.project_name.as_deref().or(record.project_id.as_deref()) {
        lines.push(format!("  プロジェクト: {}", name));
    }
    lines.push(format!("  判定: {}", status_label(record.status())));
    if record.is_legacy() {
        lines.push("  形式: 単一結果（旧形式）".to_string());
    }

    for submission in to_submissions(record) {
        lines.push(String::new());
        lines.push(format!(
            "  [{}] {}  {}",
            submission.id,
            submission.photo_name,
            status_label(submission.status)
        ));
        if let Some(model) = &submission.model {
            let time = submission
                .inference_time_ms
                .map(|ms| format!(" ({:.0} ms)", ms))
                .unwrap_or_default();
            lines.push(format!("    モデル: {}{}", model, time));
        }
        if !submission.design_spec_refs.is_empty() {
            lines.push(format!("    設計仕様: {}", submission.design_spec_refs.join(", ")));
        }
        if submission.defects.is_empty() {
            lines.push("    欠陥: なし".to_string());
        }
        for defect in &submission.defects {
            lines.push(format!(
                "    {} [{}] ({:.0}, {:.0}) {}",
                defect.id, defect.severity, defect.location.x, defect.location.y, defect.description
            ));
        }
    }

    lines.join("\n")
}
