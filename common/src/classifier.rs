//! 解析テキストの合否判定
//!
//! 大文字小文字を区別しない部分一致で判定する。
//! 「異物なし」系の表現が1つでもあれば合格（不合格系の語が同時にあっても合格）。
//! どちらの表現も無いテキストは不合格として扱う。

use crate::types::InspectionStatus;

/// 合格を示す表現（不合格表現より優先）
pub const PASS_PHRASES: &[&str] = &[
    "no fod",
    "no foreign object",
    "no debris",
    "clear",
    "no visible",
    "no defect",
];

/// 不合格を示す表現
pub const FAIL_PHRASES: &[&str] = &[
    "fod",
    "foreign object",
    "debris",
    "defect",
    "item",
    "found",
];

/// 解析テキストから合否を判定
///
/// # Examples
/// ```
/// use fod_inspect_common::{classify_status, InspectionStatus};
///
/// assert_eq!(classify_status("No defect found"), InspectionStatus::Pass);
/// assert_eq!(classify_status("Debris on the tray"), InspectionStatus::Fail);
/// ```
pub fn classify_status(text: &str) -> InspectionStatus {
    let lower = text.to_lowercase();

    if PASS_PHRASES.iter().any(|p| lower.contains(p)) {
        return InspectionStatus::Pass;
    }

    if FAIL_PHRASES.iter().any(|p| lower.contains(p)) {
        tracing::debug!("fail phrase matched");
        return InspectionStatus::Fail;
    }

    // 判定不能は不合格
    tracing::debug!("no classification phrase matched, defaulting to fail");
    InspectionStatus::Fail
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_phrases() {
        assert_eq!(classify_status("No FOD detected."), InspectionStatus::Pass);
        assert_eq!(classify_status("Surface is CLEAR"), InspectionStatus::Pass);
        assert_eq!(classify_status("no visible contamination"), InspectionStatus::Pass);
    }

    #[test]
    fn test_pass_takes_precedence() {
        assert_eq!(classify_status("no defect found"), InspectionStatus::Pass);
        assert_eq!(
            classify_status("Debris check: no foreign object on the part"),
            InspectionStatus::Pass
        );
    }

    #[test]
    fn test_fail_phrases() {
        assert_eq!(classify_status("FOD present near bolt"), InspectionStatus::Fail);
        assert_eq!(classify_status("One loose item on tray"), InspectionStatus::Fail);
        assert_eq!(classify_status("Foreign Object at top-left"), InspectionStatus::Fail);
    }

    #[test]
    fn test_unclassifiable_defaults_to_fail() {
        assert_eq!(classify_status("All good."), InspectionStatus::Fail);
        assert_eq!(classify_status(""), InspectionStatus::Fail);
    }
}
