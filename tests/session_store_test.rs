//! セッションファイルを使った検査記録ストアのテスト

use chrono::{Duration, TimeZone, Utc};
use fod_inspect::session::FileStorage;
use fod_inspect_common::{
    build_submission, BatchMeta, ChangeNotifier, ImageMeta, InspectionStore, NewInspection,
    ProjectRef, SessionStore, StoreEvent,
};
use tempfile::tempdir;

fn open(root: &std::path::Path, session: &str) -> SessionStore<FileStorage> {
    SessionStore::new(FileStorage::open(root, session), ChangeNotifier::default())
}

#[test]
fn test_records_survive_reopen() {
    let dir = tempdir().unwrap();

    let mut input = NewInspection::legacy("blob:tray-1", "No FOD detected");
    input.model = Some("qwen-vl".to_string());
    input.inference_time_ms = Some(812.5);

    let id = {
        let mut store = open(dir.path(), "line-a");
        store.save(input.clone())
    };

    let store = open(dir.path(), "line-a");
    let record = store.get(&id).unwrap();
    assert_eq!(record, input.with_id(id.clone()));
}

#[test]
fn test_sessions_are_isolated() {
    let dir = tempdir().unwrap();

    let mut a = open(dir.path(), "line-a");
    a.save(NewInspection::legacy("blob:1", "clear"));

    let b = open(dir.path(), "line-b");
    assert!(b.is_empty());
    assert_eq!(open(dir.path(), "line-a").len(), 1);
}

#[test]
fn test_clear_ends_session() {
    let dir = tempdir().unwrap();
    let path = FileStorage::session_path(dir.path(), "line-a");

    let mut store = open(dir.path(), "line-a");
    store.save(NewInspection::legacy("blob:1", "clear"));
    assert!(path.exists());

    let mut events = store.subscribe();
    store.clear();
    assert_eq!(events.try_recv().unwrap(), StoreEvent::InspectionsUpdated);
    assert!(!path.exists());
    assert!(open(dir.path(), "line-a").is_empty());

    // 2回目もファイルは作られない
    store.clear();
    assert!(!path.exists());
}

#[test]
fn test_list_newest_first_after_reopen() {
    let dir = tempdir().unwrap();
    let base = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();

    let mut store = open(dir.path(), "s");
    let mut ids = Vec::new();
    for minutes in [5, 30, 10] {
        let mut input = NewInspection::legacy("blob:x", "clear");
        input.timestamp = base + Duration::minutes(minutes);
        ids.push(store.save(input));
    }
    drop(store);

    let listed: Vec<String> = open(dir.path(), "s").list().into_iter().map(|r| r.id).collect();
    assert_eq!(listed, vec![ids[1].clone(), ids[2].clone(), ids[0].clone()]);
}

#[test]
fn test_malformed_session_file_reads_empty() {
    let dir = tempdir().unwrap();
    let path = FileStorage::session_path(dir.path(), "broken");
    std::fs::create_dir_all(dir.path()).unwrap();
    std::fs::write(&path, "{ not json").unwrap();

    let mut store = open(dir.path(), "broken");
    assert!(store.list().is_empty());

    // 壊れたファイルは次の保存で上書きされる
    let id = store.save(NewInspection::legacy("blob:1", "clear"));
    assert!(open(dir.path(), "broken").get(&id).is_some());
}

#[test]
fn test_batch_roundtrip_and_remove() {
    let dir = tempdir().unwrap();
    let mut store = open(dir.path(), "batch");
    let mut events = store.subscribe();

    let submissions = vec![
        build_submission(&ImageMeta::new("a.jpg", "a.jpg"), "No FOD detected. Surface clear.", None, None),
        build_submission(
            &ImageMeta::new("b.jpg", "b.jpg"),
            "CRITICAL FAILURES:\n• Foreign object detected\n",
            None,
            None,
        ),
    ];
    let meta = BatchMeta {
        project: Some(ProjectRef { id: Some("p-7".into()), name: Some("Assembly 7".into()) }),
        design_specs: vec!["SPEC-A".into()],
    };

    let id = store.save_batch(submissions, meta).unwrap();
    assert_eq!(events.try_recv().unwrap(), StoreEvent::InspectionsUpdated);

    let reopened = open(dir.path(), "batch");
    let record = reopened.get(&id).unwrap();
    assert_eq!(record.project_name.as_deref(), Some("Assembly 7"));
    assert_eq!(record.submission_count(), 2);
    assert_eq!(record.image_ref, "a.jpg");

    let subs = record.submissions.as_ref().unwrap();
    assert_eq!(subs[0].id, format!("{}-sub-0", id));
    assert_eq!(subs[1].design_spec_refs, vec!["SPEC-A".to_string()]);

    assert!(store.remove(&id));
    assert!(!store.remove(&id));
    assert!(open(dir.path(), "batch").get(&id).is_none());
}
