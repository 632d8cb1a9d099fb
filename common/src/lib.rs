//! FOD Inspect Common Library
//!
//! 検出サービスの解析テキストを構造化する処理と、検査記録ストア

pub mod types;
pub mod error;
pub mod parser;
pub mod classifier;
pub mod aggregator;
pub mod storage;
pub mod events;
pub mod store;

pub use types::{
    BatchMeta, Defect, DefectSummary, DetectionResponse, ImageMeta, InspectionRecord,
    InspectionStatus, Location, NewInspection, NewSubmission, ProjectRef, Severity, Submission,
};
pub use error::{Error, Result};
pub use parser::parse_defects;
pub use classifier::classify_status;
pub use aggregator::{
    build_batch, build_submission, derive_status, fallback_submission, to_submissions, FALLBACK_ANALYSIS,
    FALLBACK_MODEL,
};
pub use storage::{MemoryStorage, SessionStorage};
pub use events::{ChangeNotifier, StoreEvent};
pub use store::{InspectionStore, SessionStore, STORAGE_KEY};
