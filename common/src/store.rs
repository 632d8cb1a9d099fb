//! 検査記録ストア
//!
//! 全記録を ID → 記録 のJSONオブジェクト1つにまとめ、
//! セッション保存先の固定キーに書き込む。
//! 変更のたびに `StoreEvent::InspectionsUpdated` を通知する。

use crate::aggregator::build_batch;
use crate::error::{Error, Result};
use crate::events::{ChangeNotifier, StoreEvent};
use crate::storage::SessionStorage;
use crate::types::{BatchMeta, InspectionRecord, NewInspection, NewSubmission};
use chrono::Utc;
use rand::Rng;
use std::collections::BTreeMap;
use tokio::sync::broadcast;

/// 保存先のキー
pub const STORAGE_KEY: &str = "fod-inspect:inspections";

const ID_SUFFIX_LEN: usize = 7;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// 検査記録の保存・取得
pub trait InspectionStore {
    /// 単一結果（またはバッチ）を保存してIDを返す
    fn save(&mut self, input: NewInspection) -> String;

    /// サブミッション群を1つのバッチとして保存してIDを返す
    fn save_batch(&mut self, submissions: Vec<NewSubmission>, meta: BatchMeta) -> Result<String>;

    fn get(&self, id: &str) -> Option<InspectionRecord>;

    /// タイムスタンプの新しい順
    fn list(&self) -> Vec<InspectionRecord>;

    /// 記録を削除（削除した場合true）
    fn remove(&mut self, id: &str) -> bool;

    /// 変更通知を購読（受信側をdropすると購読解除）
    fn subscribe(&self) -> broadcast::Receiver<StoreEvent>;
}

/// セッション保存先を使うストア
#[derive(Debug)]
pub struct SessionStore<M: SessionStorage> {
    medium: M,
    notifier: ChangeNotifier,
}

impl<M: SessionStorage> SessionStore<M> {
    pub fn new(medium: M, notifier: ChangeNotifier) -> Self {
        Self { medium, notifier }
    }

    pub fn medium(&self) -> &M {
        &self.medium
    }

    /// 記録件数
    pub fn len(&self) -> usize {
        self.read_all().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 全記録を削除（セッション終了相当）
    pub fn clear(&mut self) {
        if let Err(e) = self.medium.remove_item(STORAGE_KEY) {
            tracing::warn!(error = %e, "failed to clear inspection store");
        }
        self.notifier.notify(StoreEvent::InspectionsUpdated);
    }

    /// 保存先から全記録を読み込み（読めない・壊れている場合は空）
    fn read_all(&self) -> BTreeMap<String, InspectionRecord> {
        let Some(raw) = self.medium.get_item(STORAGE_KEY) else {
            return BTreeMap::new();
        };

        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "stored inspections unreadable, treating as empty");
                BTreeMap::new()
            }
        }
    }

    /// 全記録を書き込み（失敗はログのみ）
    fn write_all(&mut self, records: &BTreeMap<String, InspectionRecord>) {
        let result = serde_json::to_string(records)
            .map_err(Error::from)
            .and_then(|json| self.medium.set_item(STORAGE_KEY, json));

        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to persist inspections");
        }
    }

    fn insert(&mut self, record: InspectionRecord) {
        let mut records = self.read_all();
        records.insert(record.id.clone(), record);
        self.write_all(&records);
        self.notifier.notify(StoreEvent::InspectionsUpdated);
    }
}

impl<M: SessionStorage> InspectionStore for SessionStore<M> {
    fn save(&mut self, input: NewInspection) -> String {
        let id = generate_id("insp");
        self.insert(input.with_id(id.clone()));
        tracing::info!(id = %id, "saved inspection");
        id
    }

    fn save_batch(&mut self, submissions: Vec<NewSubmission>, meta: BatchMeta) -> Result<String> {
        let id = generate_id("batch");

        let submissions = submissions
            .into_iter()
            .map(|mut s| {
                if s.design_spec_refs.is_empty() {
                    s.design_spec_refs = meta.design_specs.clone();
                }
                s
            })
            .collect();

        let record = build_batch(&id, submissions, meta.project)?;
        let count = record.submission_count();
        self.insert(record);
        tracing::info!(id = %id, submissions = count, "saved inspection batch");
        Ok(id)
    }

    fn get(&self, id: &str) -> Option<InspectionRecord> {
        self.read_all().remove(id)
    }

    fn list(&self) -> Vec<InspectionRecord> {
        let mut records: Vec<InspectionRecord> = self.read_all().into_values().collect();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| b.id.cmp(&a.id)));
        records
    }

    fn remove(&mut self, id: &str) -> bool {
        let mut records = self.read_all();
        if records.remove(id).is_none() {
            return false;
        }
        self.write_all(&records);
        self.notifier.notify(StoreEvent::InspectionsUpdated);
        tracing::info!(id = %id, "removed inspection");
        true
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.notifier.subscribe()
    }
}

/// 時刻順のプレフィックス + ランダムな接尾辞のID
///
/// 例: `batch-1768726800000-k3j9x0a`
pub fn generate_id(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{}-{}-{}", prefix, Utc::now().timestamp_millis(), suffix)
}
