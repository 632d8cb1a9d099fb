//! セッションファイル
//!
//! 検査記録の保存先。セッション名ごとに一時ディレクトリへJSONファイルを1つ作り、
//! セッションを終えるとき（`session --clear`）に削除する。
//! 中身が空になったファイルも削除する。

use fod_inspect_common::{Result, SessionStorage};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// セッションファイルの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionFile {
    /// バージョン（互換性チェック用）
    version: u32,
    /// キー → 値
    items: HashMap<String, String>,
}

impl SessionFile {
    const CURRENT_VERSION: u32 = 1;
}

impl Default for SessionFile {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            items: HashMap::new(),
        }
    }
}

/// ファイルに保存するセッション保存先
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    file: SessionFile,
}

impl FileStorage {
    /// 既定のセッションディレクトリ
    pub fn default_root() -> PathBuf {
        std::env::temp_dir().join("fod-inspect").join("sessions")
    }

    /// セッションファイルのパス
    pub fn session_path(root: &Path, session: &str) -> PathBuf {
        root.join(format!("{}.json", sanitize_session_name(session)))
    }

    /// セッションファイルを開く（無い・壊れている場合は空で開始）
    pub fn open(root: &Path, session: &str) -> Self {
        let path = Self::session_path(root, session);
        let file = Self::load(&path);
        Self { path, file }
    }

    fn load(path: &Path) -> SessionFile {
        if !path.exists() {
            return SessionFile::default();
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(_) => return SessionFile::default(),
        };

        match serde_json::from_reader::<_, SessionFile>(BufReader::new(file)) {
            Ok(session) if session.version == SessionFile::CURRENT_VERSION => session,
            Ok(_) => {
                tracing::warn!(path = %path.display(), "session file version mismatch, starting empty");
                SessionFile::default()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "session file unreadable, starting empty");
                SessionFile::default()
            }
        }
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &self.file)?;
        // dropに任せるとflushのエラーが消える
        writer.flush()?;
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.file.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<()> {
        let previous = self.file.items.insert(key.to_string(), value);
        if let Err(e) = self.persist() {
            // 書き込めなかった値はメモリにも残さない
            match previous {
                Some(old) => self.file.items.insert(key.to_string(), old),
                None => self.file.items.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    /// 最後のキーを消したらセッションファイルごと削除（セッション終了）
    fn remove_item(&mut self, key: &str) -> Result<()> {
        if self.file.items.remove(key).is_none() {
            return Ok(());
        }
        if !self.file.items.is_empty() {
            return self.persist();
        }
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// ファイル名に使えない文字を `_` に置換
fn sanitize_session_name(session: &str) -> String {
    let name: String = session
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if name.is_empty() {
        "default".to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_session_name() {
        assert_eq!(sanitize_session_name("line-3_a"), "line-3_a");
        assert_eq!(sanitize_session_name("../etc/passwd"), "___etc_passwd");
        assert_eq!(sanitize_session_name(""), "default");
    }

    #[test]
    fn test_session_path() {
        let path = FileStorage::session_path(Path::new("/tmp/s"), "abc");
        assert_eq!(path, PathBuf::from("/tmp/s/abc.json"));
    }

    #[test]
    fn test_remove_last_item_deletes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path(), "s");
        storage.set_item("a", "1".to_string()).unwrap();
        storage.set_item("b", "2".to_string()).unwrap();
        let path = FileStorage::session_path(dir.path(), "s");

        storage.remove_item("a").unwrap();
        assert!(path.exists());
        assert_eq!(FileStorage::open(dir.path(), "s").get_item("b").as_deref(), Some("2"));

        storage.remove_item("b").unwrap();
        assert!(!path.exists());

        // 無いキーの削除は何もしない
        storage.remove_item("b").unwrap();
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_failed_write_keeps_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::open(dir.path(), "full");
        storage.set_item("k", "old".to_string()).unwrap();

        // 書き込みが必ずENOSPCになるデバイスに差し替える
        let path = FileStorage::session_path(dir.path(), "full");
        std::fs::remove_file(&path).unwrap();
        std::os::unix::fs::symlink("/dev/full", &path).unwrap();

        assert!(storage.set_item("k", "new".to_string()).is_err());
        assert_eq!(storage.get_item("k").as_deref(), Some("old"));

        assert!(storage.set_item("other", "x".to_string()).is_err());
        assert!(storage.get_item("other").is_none());
    }
}
