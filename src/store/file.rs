//! Durable file-backed store.
//!
//! One file per key under the configured root, named by the SHA-256 of the
//! key (`<64 hex chars>.json`). Names are fixed-length and lowercase, so
//! arbitrarily long keys fit any filesystem and keys differing only in case
//! stay apart on case-insensitive volumes.
//!
//! Each file holds `{"key": ..., "value": ...}`. The stored key is checked
//! on read; a file that belongs to another key reads as absent.
//!
//! Writes land in `<root>/.tmp/` first and are renamed over the target, so
//! an interrupted write never leaves a half-written entry behind.

use super::KeyValueStore;
use crate::config::StoreConfig;
use crate::error::{Error, Result};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Extension of entry files.
const ENTRY_SUFFIX: &str = ".json";

/// Staging directory for in-flight writes, inside the root.
const TMP_DIR: &str = ".tmp";

/// Distinguishes concurrent temporary files within this process.
static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// On-disk layout of one entry.
#[derive(Serialize, Deserialize)]
struct EntryFile {
    key: String,
    value: String,
}

/// File-backed store that survives application restarts.
///
/// Cheap to clone; clones point at the same directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    root: Arc<PathBuf>,
}

impl FileStore {
    /// Open (creating if needed) the store described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the root or staging directory cannot
    /// be created.
    pub async fn open(config: StoreConfig) -> Result<Self> {
        let root = config.root().to_path_buf();
        let tmp = root.join(TMP_DIR);
        tokio::fs::create_dir_all(&tmp).await.map_err(|e| {
            Error::ConfigError(format!(
                "Failed to create store directory {}: {}",
                tmp.display(),
                e
            ))
        })?;

        info!("✓ File store opened at {}", root.display());
        Ok(FileStore {
            root: Arc::new(root),
        })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.root.join(entry_file_name(key))
    }

    fn tmp_path(&self, key: &str) -> PathBuf {
        let n = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.root.join(TMP_DIR).join(format!(
            "{}.{}-{}.tmp",
            key_digest(key),
            std::process::id(),
            n
        ))
    }
}

fn key_digest(key: &str) -> String {
    hex::encode(Sha256::digest(key.as_bytes()))
}

/// Map a cache key to its file name.
fn entry_file_name(key: &str) -> String {
    format!("{}{}", key_digest(key), ENTRY_SUFFIX)
}

fn read_error(key: &str, reason: impl ToString) -> Error {
    Error::StoreReadError {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn write_error(key: &str, reason: impl ToString) -> Error {
    Error::StoreWriteError {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

impl KeyValueStore for FileStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let bytes = match tokio::fs::read(self.entry_path(key)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("✓ File GET {} -> MISS", key);
                return Ok(None);
            }
            Err(e) => {
                warn!("File GET {} failed: {}", key, e);
                return Err(read_error(key, e));
            }
        };

        let text = String::from_utf8(bytes).map_err(|e| {
            warn!("File GET {}: entry is not UTF-8", key);
            read_error(key, format!("entry file is not valid UTF-8: {}", e))
        })?;

        let entry: EntryFile = serde_json::from_str(&text).map_err(|e| {
            warn!("File GET {}: malformed entry file", key);
            read_error(key, format!("malformed entry file: {}", e))
        })?;

        if entry.key != key {
            warn!("File GET {}: entry belongs to {:?}, treating as MISS", key, entry.key);
            return Ok(None);
        }

        debug!("✓ File GET {} -> HIT", key);
        Ok(Some(entry.value))
    }

    async fn set_item(&self, key: &str, value: String) -> Result<()> {
        let len = value.len();
        let text = serde_json::to_string(&EntryFile {
            key: key.to_string(),
            value,
        })
        .map_err(|e| write_error(key, e))?;

        let tmp = self.tmp_path(key);

        if let Err(e) = tokio::fs::write(&tmp, text.as_bytes()).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            warn!("File SET {} failed: {}", key, e);
            return Err(write_error(key, e));
        }

        if let Err(e) = tokio::fs::rename(&tmp, self.entry_path(key)).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            warn!("File SET {} failed on rename: {}", key, e);
            return Err(write_error(key, e));
        }

        debug!("✓ File SET {} ({} bytes)", key, len);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        match tokio::fs::remove_file(self.entry_path(key)).await {
            Ok(()) => {
                debug!("✓ File REMOVE {}", key);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(write_error(key, e)),
        }
    }

    async fn multi_remove(&self, keys: &[&str]) -> Result<()> {
        try_join_all(keys.iter().map(|key| self.remove_item(key))).await?;
        debug!("✓ File MULTI_REMOVE {} keys", keys.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn open_in(dir: &TempDir) -> FileStore {
        FileStore::open(StoreConfig::new(dir.path()))
            .await
            .expect("Failed to open store")
    }

    fn list(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .expect("Failed to list dir")
            .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_entry_file_name() {
        let name = entry_file_name("events");
        assert_eq!(name.len(), 64 + ENTRY_SUFFIX.len());
        assert!(name.ends_with(".json"));
        assert_eq!(name, entry_file_name("events"));

        let long = "é".repeat(500);
        assert_eq!(entry_file_name(&long).len(), name.len());
    }

    #[test]
    fn test_entry_file_name_case_sensitive_keys_stay_apart() {
        let upper = entry_file_name("userInfo");
        let lower = entry_file_name("userinfo");
        assert_ne!(upper.to_lowercase(), lower.to_lowercase());
        assert_eq!(upper, upper.to_lowercase());
    }

    #[tokio::test]
    async fn test_file_store_set_get() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = open_in(&dir).await;

        store
            .set_item("userInfo", "{\"id\":\"1\"}".to_string())
            .await
            .expect("Failed to set");

        let value = store.get_item("userInfo").await.expect("Failed to get");
        assert_eq!(value, Some("{\"id\":\"1\"}".to_string()));

        let on_disk = std::fs::read_to_string(store.entry_path("userInfo")).expect("Failed to read");
        assert!(on_disk.contains("\"key\":\"userInfo\""));
    }

    #[tokio::test]
    async fn test_file_store_miss() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = open_in(&dir).await;

        assert_eq!(store.get_item("events").await.expect("Failed to get"), None);
        assert!(!store.contains_key("events").await.expect("Failed to check"));
    }

    #[tokio::test]
    async fn test_file_store_long_key() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = open_in(&dir).await;
        let key = format!("event-{}", "a".repeat(300));
        let wide = format!("event-{}", "ü".repeat(200));

        assert_eq!(store.get_item(&key).await.expect("Failed to get"), None);

        store
            .set_item(&key, "\"v\"".to_string())
            .await
            .expect("Failed to set");
        store
            .set_item(&wide, "\"w\"".to_string())
            .await
            .expect("Failed to set");

        assert_eq!(
            store.get_item(&key).await.expect("Failed to get"),
            Some("\"v\"".to_string())
        );
        assert_eq!(
            store.get_item(&wide).await.expect("Failed to get"),
            Some("\"w\"".to_string())
        );
    }

    #[tokio::test]
    async fn test_file_store_keys_differing_in_case() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = open_in(&dir).await;

        store
            .set_item("userInfo", "1".to_string())
            .await
            .expect("Failed to set");
        store
            .set_item("userinfo", "2".to_string())
            .await
            .expect("Failed to set");

        assert_eq!(
            store.get_item("userInfo").await.expect("Failed to get"),
            Some("1".to_string())
        );
        assert_eq!(
            store.get_item("userinfo").await.expect("Failed to get"),
            Some("2".to_string())
        );
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = TempDir::new().expect("Failed to create temp dir");

        {
            let store = open_in(&dir).await;
            store
                .set_item("accessToken", "\"tok\"".to_string())
                .await
                .expect("Failed to set");
        }

        let reopened = open_in(&dir).await;
        assert_eq!(
            reopened.get_item("accessToken").await.expect("Failed to get"),
            Some("\"tok\"".to_string())
        );
    }

    #[tokio::test]
    async fn test_file_store_overwrite_leaves_no_temp_files() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = open_in(&dir).await;

        store
            .set_item("events", "[1]".to_string())
            .await
            .expect("Failed to set");
        store
            .set_item("events", "[2]".to_string())
            .await
            .expect("Failed to set");

        assert_eq!(
            store.get_item("events").await.expect("Failed to get"),
            Some("[2]".to_string())
        );

        assert_eq!(
            list(dir.path()),
            vec![TMP_DIR.to_string(), entry_file_name("events")]
        );
        assert!(list(&dir.path().join(TMP_DIR)).is_empty());
    }

    #[tokio::test]
    async fn test_file_store_failed_write_keeps_prior_value() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = open_in(&dir).await;

        store
            .set_item("events", "[1]".to_string())
            .await
            .expect("Failed to set");

        // Replace the staging directory with a plain file so the temp write fails.
        let tmp = dir.path().join(TMP_DIR);
        std::fs::remove_dir(&tmp).expect("Failed to remove staging dir");
        std::fs::write(&tmp, b"").expect("Failed to create blocker");

        match store.set_item("events", "[2]".to_string()).await {
            Err(Error::StoreWriteError { key, .. }) => assert_eq!(key, "events"),
            other => panic!("Expected StoreWriteError, got {:?}", other),
        }

        assert_eq!(
            store.get_item("events").await.expect("Failed to get"),
            Some("[1]".to_string())
        );
    }

    #[tokio::test]
    async fn test_file_store_remove() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = open_in(&dir).await;

        for key in ["userInfo", "accessToken", "events"] {
            store
                .set_item(key, "1".to_string())
                .await
                .expect("Failed to set");
        }

        store
            .multi_remove(&["userInfo", "accessToken", "never-set"])
            .await
            .expect("Failed to multi_remove");

        assert!(!store.contains_key("userInfo").await.expect("check"));
        assert!(!store.contains_key("accessToken").await.expect("check"));
        assert!(store.contains_key("events").await.expect("check"));
    }

    #[tokio::test]
    async fn test_file_store_non_utf8_entry_is_read_error() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = open_in(&dir).await;

        std::fs::write(store.entry_path("events"), [0xff, 0xfe, 0xfd]).expect("Failed to write");

        match store.get_item("events").await {
            Err(Error::StoreReadError { key, reason }) => {
                assert_eq!(key, "events");
                assert!(reason.contains("UTF-8"));
            }
            other => panic!("Expected StoreReadError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_file_store_malformed_entry_is_read_error() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = open_in(&dir).await;

        std::fs::write(store.entry_path("events"), "[1, 2]").expect("Failed to write");

        assert!(matches!(
            store.get_item("events").await,
            Err(Error::StoreReadError { .. })
        ));
    }

    #[tokio::test]
    async fn test_file_store_foreign_entry_reads_as_absent() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = open_in(&dir).await;

        std::fs::write(
            store.entry_path("events"),
            "{\"key\":\"other\",\"value\":\"[]\"}",
        )
        .expect("Failed to write");

        assert_eq!(store.get_item("events").await.expect("Failed to get"), None);
        assert!(!store.contains_key("events").await.expect("Failed to check"));
    }

    #[tokio::test]
    async fn test_file_store_unreadable_entry_agrees_with_contains() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = open_in(&dir).await;

        // A directory where an entry file should be cannot be read.
        std::fs::create_dir(store.entry_path("events")).expect("Failed to create dir");

        match store.get_item("events").await {
            Err(Error::StoreReadError { key, .. }) => assert_eq!(key, "events"),
            other => panic!("Expected StoreReadError, got {:?}", other),
        }
        assert!(matches!(
            store.contains_key("events").await,
            Err(Error::StoreReadError { .. })
        ));
    }

    #[tokio::test]
    async fn test_file_store_open_creates_nested_root() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let root = dir.path().join("volunteam").join("cache");

        let store = FileStore::open(StoreConfig::new(&root))
            .await
            .expect("Failed to open store");

        assert!(root.join(TMP_DIR).is_dir());
        assert_eq!(store.root(), root.as_path());
    }
}
