// src/storage/json.rs

//! Whole-file JSON key-value store.

use std::collections::HashMap;
use std::path::PathBuf;

use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};

/// A durable string-to-string mapping backed by one JSON file.
///
/// The whole file is read once at open and rewritten on every `put`
/// (write to temp, then rename), so a crashed write never leaves a
/// partially updated file behind.
pub struct JsonStore {
    path: PathBuf,
    data: HashMap<String, String>,
}

impl JsonStore {
    /// Open the store, loading existing data or starting empty if the
    /// backing file does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(AppError::Io(e)),
        };
        Ok(Self { path, data })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    /// Insert a value, rewriting the backing file before returning.
    pub async fn put(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        self.data.insert(key.into(), value.into());
        self.save().await
    }

    async fn save(&self) -> Result<()> {
        let bytes = serde_json::to_vec(&self.data)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn starts_empty_when_file_absent() {
        let tmp = TempDir::new().unwrap();
        let store = JsonStore::open(tmp.path().join("releases.json"))
            .await
            .unwrap();
        assert_eq!(store.get("last_release_stable"), None);
    }

    #[tokio::test]
    async fn put_then_reopen_round_trips() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("releases.json");

        let mut store = JsonStore::open(&path).await.unwrap();
        store.put("last_release_stable", "987654321").await.unwrap();
        assert_eq!(store.get("last_release_stable"), Some("987654321"));

        let reopened = JsonStore::open(&path).await.unwrap();
        assert_eq!(reopened.get("last_release_stable"), Some("987654321"));
    }

    #[tokio::test]
    async fn put_overwrites_existing_key() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("releases.json");

        let mut store = JsonStore::open(&path).await.unwrap();
        store.put("last_release_canary", "100").await.unwrap();
        store.put("last_release_canary", "200").await.unwrap();

        let reopened = JsonStore::open(&path).await.unwrap();
        assert_eq!(reopened.get("last_release_canary"), Some("200"));
    }

    #[tokio::test]
    async fn file_holds_a_single_json_object() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("releases.json");

        let mut store = JsonStore::open(&path).await.unwrap();
        store.put("last_release_stable", "987654321").await.unwrap();

        let raw = tokio::fs::read(&path).await.unwrap();
        let parsed: HashMap<String, String> = serde_json::from_slice(&raw).unwrap();
        assert_eq!(
            parsed,
            HashMap::from([("last_release_stable".to_string(), "987654321".to_string())])
        );
    }
}
