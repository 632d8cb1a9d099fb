//! 一括検査パイプライン
//!
//! 画像を1枚ずつ順番に検出サービスへ送り、サブミッションを作る。
//! 呼び出しに失敗した画像はフォールバックのテキストで置き換えるので、
//! 入力画像と同じ数のサブミッションが必ずできる。

use crate::detector::Detector;
use crate::error::{InspectError, Result};
use crate::scanner::ImageInfo;
use fod_inspect_common::{
    build_submission, fallback_submission, BatchMeta, ImageMeta, InspectionStore, NewSubmission,
};

/// 一括検査の結果
#[derive(Debug, Clone)]
pub struct InspectionRun {
    pub submissions: Vec<NewSubmission>,
    /// フォールバックを使った画像の数
    pub fallback_count: usize,
}

/// 画像を順番に検査する
///
/// `on_progress(処理済み枚数, 全体枚数)` は1枚ごとに呼ばれる。
pub async fn run_inspection<D, F>(
    detector: &D,
    images: &[ImageInfo],
    design_specs: &[String],
    mut on_progress: F,
) -> InspectionRun
where
    D: Detector + ?Sized,
    F: FnMut(usize, usize),
{
    let total = images.len();
    let mut submissions = Vec::with_capacity(total);
    let mut fallback_count = 0;

    for (index, image) in images.iter().enumerate() {
        let result = detector.detect(image).await;

        let meta = ImageMeta::new(image.path.display().to_string(), image.file_name.clone())
            .with_design_specs(design_specs.to_vec());

        let submission = match result {
            Ok(response) => build_submission(
                &meta,
                &response.response,
                response.model.as_deref(),
                response.inference_time_ms,
            ),
            Err(e) => {
                tracing::warn!(file = %image.file_name, error = %e, "detection failed, using fallback analysis");
                fallback_count += 1;
                fallback_submission(&meta)
            }
        };

        tracing::debug!(
            file = %image.file_name,
            status = %submission.status,
            defects = submission.defects.len(),
            "submission built"
        );
        submissions.push(submission);
        on_progress(index + 1, total);
    }

    InspectionRun {
        submissions,
        fallback_count,
    }
}

/// 画像を検査してバッチとして保存し、バッチIDを返す
pub async fn inspect_and_save<S, D, F>(
    store: &mut S,
    detector: &D,
    images: &[ImageInfo],
    meta: BatchMeta,
    on_progress: F,
) -> Result<(String, InspectionRun)>
where
    S: InspectionStore,
    D: Detector + ?Sized,
    F: FnMut(usize, usize),
{
    if images.is_empty() {
        return Err(InspectError::NoImagesFound("検査対象の画像がありません".into()));
    }

    let run = run_inspection(detector, images, &meta.design_specs, on_progress).await;
    let id = store.save_batch(run.submissions.clone(), meta)?;
    Ok((id, run))
}
