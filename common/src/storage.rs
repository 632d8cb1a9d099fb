//! セッション単位のキー・バリュー保存先
//!
//! 検査記録はセッション中だけ残ればよいので、保存先はこのトレイトで抽象化する。
//! CLIはセッションファイル、テストはメモリを使う。

use crate::error::{Error, Result};
use std::collections::HashMap;

/// セッション単位の保存先
pub trait SessionStorage {
    fn get_item(&self, key: &str) -> Option<String>;

    /// 値を書き込む（容量超過などで失敗しうる）
    fn set_item(&mut self, key: &str, value: String) -> Result<()>;

    fn remove_item(&mut self, key: &str) -> Result<()>;
}

/// メモリ上の保存先（任意で容量上限つき）
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// キーと値の合計バイト数が `quota_bytes` を超える書き込みを拒否する
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            items: HashMap::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.items
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<()> {
        if let Some(limit) = self.quota_bytes {
            let needed = self.used_bytes_without(key) + key.len() + value.len();
            if needed > limit {
                return Err(Error::QuotaExceeded { needed, limit });
            }
        }
        self.items.insert(key.to_string(), value);
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.items.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_set_get_remove() {
        let mut storage = MemoryStorage::new();
        assert!(storage.get_item("k").is_none());

        storage.set_item("k", "v1".to_string()).unwrap();
        storage.set_item("k", "v2".to_string()).unwrap();
        assert_eq!(storage.get_item("k").as_deref(), Some("v2"));
        assert_eq!(storage.len(), 1);

        storage.remove_item("k").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_memory_storage_quota() {
        let mut storage = MemoryStorage::with_quota(8);
        storage.set_item("key", "12345".to_string()).unwrap();

        let result = storage.set_item("key", "123456".to_string());
        assert!(matches!(result, Err(Error::QuotaExceeded { needed: 9, limit: 8 })));
        // 失敗した書き込みは反映されない
        assert_eq!(storage.get_item("key").as_deref(), Some("12345"));
    }
}
