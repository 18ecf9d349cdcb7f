//! Image Cache
//!
//! 正規化した商品名 → 画像の場所 の対応を JSON ファイルに永続化する。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::CatalogError;

/// 既定のキャッシュファイル名
pub const DEFAULT_CACHE_FILE: &str = "image_cache.json";

/// キャッシュの1エントリ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageCacheEntry {
    /// 画像の場所（URLまたはローカルパス）
    pub location: String,
    /// 解決した日時
    pub resolved_at: DateTime<Utc>,
}

/// 画像キャッシュ
///
/// 読み込みは既存のエントリとマージされ、実行中に解決済みのエントリを
/// ディスク上の古い値で上書きすることはありません。
#[derive(Debug, Default)]
pub struct ImageCache {
    path: Option<PathBuf>,
    entries: BTreeMap<String, ImageCacheEntry>,
}

impl ImageCache {
    /// 永続化しないメモリ上のキャッシュ
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// キャッシュファイルを読み込む
    ///
    /// ファイルが存在しない、または壊れている場合は空のキャッシュから始めます。
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let mut cache = Self {
            path: Some(path.into()),
            entries: BTreeMap::new(),
        };
        cache.reload();
        cache
    }

    /// キャッシュファイルを再読み込みし、未登録のキーだけを取り込む
    pub fn reload(&mut self) {
        let Some(path) = self.path.clone() else {
            return;
        };

        match read_entries(&path) {
            Ok(Some(loaded)) => {
                debug!(path = %path.display(), entries = loaded.len(), "loaded image cache");
                for (key, entry) in loaded {
                    self.entries.entry(key).or_insert(entry);
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable image cache");
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&ImageCacheEntry> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: String, location: String) {
        self.entries.insert(
            key,
            ImageCacheEntry {
                location,
                resolved_at: Utc::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// キャッシュをファイルへ書き出す
    ///
    /// 一時ファイルに書き込んでから置き換えるため、中断しても既存のファイルは壊れません。
    pub fn persist(&self) -> Result<(), CatalogError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&tmp_path, json)?;
        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        Ok(())
    }
}

fn read_entries(path: &Path) -> Result<Option<BTreeMap<String, ImageCacheEntry>>, CatalogError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&content)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = tempdir().unwrap();
        let cache = ImageCache::load(dir.path().join(DEFAULT_CACHE_FILE));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_persist_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CACHE_FILE);

        let mut cache = ImageCache::load(&path);
        cache.insert("bits doritos".to_string(), "product_images/bits-doritos.png".to_string());
        cache.persist().unwrap();

        let reloaded = ImageCache::load(&path);
        assert_eq!(reloaded.len(), 1);
        assert_eq!(
            reloaded.get("bits doritos").unwrap().location,
            "product_images/bits-doritos.png"
        );
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_reload_does_not_replace_resolved_entries() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CACHE_FILE);

        let mut on_disk = ImageCache::load(&path);
        on_disk.insert("pipa blanca".to_string(), "old.png".to_string());
        on_disk.insert("chicle".to_string(), "chicle.png".to_string());
        on_disk.persist().unwrap();

        let mut cache = ImageCache::in_memory();
        cache.path = Some(path);
        cache.insert("pipa blanca".to_string(), "new.png".to_string());
        cache.reload();

        assert_eq!(cache.get("pipa blanca").unwrap().location, "new.png");
        assert_eq!(cache.get("chicle").unwrap().location, "chicle.png");
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = tempdir().unwrap();
        // キャッシュファイルの位置にディレクトリがあると置き換えに失敗する
        let path = dir.path().join(DEFAULT_CACHE_FILE);
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        let mut cache = ImageCache::load(&path);
        cache.insert("chicle".to_string(), "chicle.png".to_string());

        assert!(cache.persist().is_err());
        assert!(!path.with_extension("json.tmp").exists());
        assert!(path.is_dir());
    }

    #[test]
    fn test_corrupt_file_is_ignored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CACHE_FILE);
        fs::write(&path, "{ not json").unwrap();

        let cache = ImageCache::load(&path);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_in_memory_persist_is_noop() {
        let mut cache = ImageCache::in_memory();
        cache.insert("x".to_string(), "y".to_string());
        assert!(cache.persist().is_ok());
    }
}
