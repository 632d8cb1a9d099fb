//! 解析テキストパーサー
//!
//! 検出サービスが返す自由形式のテキストから欠陥を抽出する。
//! 重大度見出し（`CRITICAL FAILURES:` など）と箇条書き（`•` `-` `*`）の
//! ゆるい書式を前提とした行スキャナで、書式に沿わないテキストでも失敗しない。

use crate::types::{Defect, Location, Severity};
use regex::Regex;

/// 座標情報がない欠陥に順番に割り当てる位置（マーカーの重なり防止）
pub const DEFAULT_POSITIONS: [Location; 5] = [
    Location::new(25.0, 30.0),
    Location::new(50.0, 50.0),
    Location::new(75.0, 35.0),
    Location::new(35.0, 70.0),
    Location::new(65.0, 65.0),
];

/// フォールバック欠陥の位置（画像中央）
pub const FALLBACK_POSITION: Location = Location::new(50.0, 50.0);

/// フォールバック欠陥の説明文に使う先頭文字数
const SNIPPET_CHARS: usize = 200;

const FALLBACK_DESCRIPTION: &str = "Anomaly detected (see full analysis below)";

/// 箇条書きとして採用する説明文の最小長（この長さを超える必要がある）
const MIN_DESCRIPTION_CHARS: usize = 5;

lazy_static::lazy_static! {
    // 行頭の箇条書き記号
    static ref BULLET_RE: Regex = Regex::new(r"^\s*[•\-*]\s*(.+)").unwrap();
    // FOD系キーワード（単語単位、活用形を含む）
    static ref FOD_TERM_RE: Regex = Regex::new(
        r"(?i)\b(?:fod|foreign\s+objects?|debris|defect\w*|anomal\w*)\b"
    ).unwrap();
}

/// 解析テキストから欠陥リストを抽出
///
/// 抽出手順:
/// 1. `location:` / `recommended action:` を含む継続行は直前の欠陥の説明に追記
/// 2. 重大度見出し行で現在の重大度を切り替え（欠陥は生成しない）
/// 3. 重大度が決まっている状態の箇条書き行を欠陥として採用
/// 4. 何も抽出できなければFOD系キーワードから1件だけ合成
///
/// 同じ入力には常に同じ結果（ID・順序・内容）を返す。
///
/// # Examples
/// ```
/// use fod_inspect_common::{parse_defects, Severity};
///
/// let defects = parse_defects("MAJOR ISSUES:\n• Debris detected at center\n");
/// assert_eq!(defects.len(), 1);
/// assert_eq!(defects[0].id, "DEF-001");
/// assert_eq!(defects[0].severity, Severity::Major);
/// ```
pub fn parse_defects(text: &str) -> Vec<Defect> {
    let mut defects: Vec<Defect> = Vec::new();
    let mut current_severity: Option<Severity> = None;

    for raw_line in text.split('\n') {
        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
        let lower = line.to_lowercase();

        if let Some(last) = defects.last_mut() {
            if is_continuation(&lower) {
                let extra = text_after_colon(line);
                if !extra.is_empty() {
                    last.description.push_str(&format!(" ({})", extra));
                }
                continue;
            }
        }

        if let Some(severity) = severity_header(&lower) {
            current_severity = Some(severity);
            continue;
        }

        let Some(severity) = current_severity else {
            continue;
        };

        if let Some(caps) = BULLET_RE.captures(line) {
            let description = caps[1].trim();
            if description.chars().count() > MIN_DESCRIPTION_CHARS {
                let index = defects.len();
                defects.push(Defect {
                    id: defect_id(index),
                    location: DEFAULT_POSITIONS[index % DEFAULT_POSITIONS.len()],
                    severity,
                    description: description.to_string(),
                });
            }
        }
    }

    if defects.is_empty() {
        if let Some(defect) = fallback_defect(text) {
            defects.push(defect);
        }
    }

    tracing::debug!(count = defects.len(), "parsed defects from analysis text");
    defects
}

/// `DEF-001` 形式のID（0始まりのインデックスから）
fn defect_id(index: usize) -> String {
    format!("DEF-{:03}", index + 1)
}

/// 重大度見出し行の判定
fn severity_header(lower: &str) -> Option<Severity> {
    if lower.contains("critical") && (lower.contains("failure") || lower.contains(':')) {
        Some(Severity::Critical)
    } else if lower.contains("major") && (lower.contains("issue") || lower.contains(':')) {
        Some(Severity::Major)
    } else if lower.contains("minor") && (lower.contains("issue") || lower.contains(':')) {
        Some(Severity::Minor)
    } else {
        None
    }
}

fn is_continuation(lower: &str) -> bool {
    lower.contains("location:") || lower.contains("recommended action:")
}

/// 最初のコロン以降のテキスト
fn text_after_colon(line: &str) -> &str {
    line.split_once(':').map(|(_, rest)| rest.trim()).unwrap_or("")
}

/// 構造化された欠陥がない場合のフォールバック
fn fallback_defect(text: &str) -> Option<Defect> {
    if !FOD_TERM_RE.is_match(text) {
        return None;
    }

    let severity = if text.to_lowercase().contains("critical") {
        Severity::Critical
    } else {
        Severity::Major
    };

    let snippet: String = text.chars().take(SNIPPET_CHARS).collect();
    let snippet = snippet.split_whitespace().collect::<Vec<_>>().join(" ");
    let description = if snippet.is_empty() {
        FALLBACK_DESCRIPTION.to_string()
    } else {
        snippet
    };

    Some(Defect {
        id: defect_id(0),
        location: FALLBACK_POSITION,
        severity,
        description,
    })
}
