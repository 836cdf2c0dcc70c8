use crate::domain::model::{upsert_snooped, SnoopedElection, SnoopedEntry};
use crate::domain::ports::{SnoopedElectionStore, Storage};
use crate::utils::error::{ElectionError, Result};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

pub const DEFAULT_STORE_FILE: &str = "snooped_elections.json";

#[derive(Default)]
pub struct InMemorySnoopStore {
    records: Mutex<Vec<SnoopedElection>>,
}

impl InMemorySnoopStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnoopedElectionStore for InMemorySnoopStore {
    async fn update_or_create(&self, entry: SnoopedEntry) -> Result<(SnoopedElection, bool)> {
        let mut records = self.records.lock().await;
        Ok(upsert_snooped(&mut records, entry, Utc::now()))
    }

    async fn all(&self) -> Result<Vec<SnoopedElection>> {
        Ok(self.records.lock().await.clone())
    }
}

/// 整份紀錄存成單一 JSON 陣列檔，每次 upsert 讀寫整個檔案
pub struct JsonFileSnoopStore<S: Storage> {
    storage: S,
    file_name: String,
    lock: Mutex<()>,
}

impl<S: Storage> JsonFileSnoopStore<S> {
    pub fn new(storage: S, file_name: impl Into<String>) -> Self {
        Self {
            storage,
            file_name: file_name.into(),
            lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<Vec<SnoopedElection>> {
        match self.storage.read_file(&self.file_name).await {
            Ok(data) if data.is_empty() => Ok(Vec::new()),
            Ok(data) => Ok(serde_json::from_slice(&data)?),
            Err(ElectionError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No store file {} yet, starting empty", self.file_name);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    async fn save(&self, records: &[SnoopedElection]) -> Result<()> {
        let json = serde_json::to_vec_pretty(records)?;
        self.storage.write_file(&self.file_name, &json).await
    }
}

#[async_trait]
impl<S: Storage> SnoopedElectionStore for JsonFileSnoopStore<S> {
    async fn update_or_create(&self, entry: SnoopedEntry) -> Result<(SnoopedElection, bool)> {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;
        let outcome = upsert_snooped(&mut records, entry, Utc::now());
        self.save(&records).await?;
        Ok(outcome)
    }

    async fn all(&self) -> Result<Vec<SnoopedElection>> {
        let _guard = self.lock.lock().await;
        self.load().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::cli::LocalStorage;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                ElectionError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn entry(title: &str, cause: &str) -> SnoopedEntry {
        SnoopedEntry {
            snooper_name: "LibDemNewbies".to_string(),
            detail_url: format!("http://example.com/#{}-2024-05-02", title),
            title: title.to_string(),
            source: "http://example.com/".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            cause: cause.to_string(),
            detail: title.to_string(),
        }
    }

    #[tokio::test]
    async fn test_in_memory_update_or_create() {
        let store = InMemorySnoopStore::new();
        let (_, created) = store.update_or_create(entry("walkley", "unknown")).await.unwrap();
        assert!(created);
        let (item, created) = store
            .update_or_create(entry("walkley", "resignation"))
            .await
            .unwrap();
        assert!(!created);
        assert_eq!(item.cause, "resignation");
        assert_eq!(store.all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_json_store_writes_file() {
        let storage = MockStorage::default();
        let store = JsonFileSnoopStore::new(storage.clone(), DEFAULT_STORE_FILE);

        store.update_or_create(entry("walkley", "unknown")).await.unwrap();
        store.update_or_create(entry("beighton", "death")).await.unwrap();

        let files = storage.files.lock().await;
        let saved: Vec<SnoopedElection> =
            serde_json::from_slice(files.get(DEFAULT_STORE_FILE).unwrap()).unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[1].id, 2);
    }

    #[tokio::test]
    async fn test_json_store_survives_restart() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().to_str().unwrap().to_string();

        let store = JsonFileSnoopStore::new(LocalStorage::new(base.clone()), DEFAULT_STORE_FILE);
        let (first, created) = store.update_or_create(entry("walkley", "unknown")).await.unwrap();
        assert!(created);
        drop(store);

        let reopened = JsonFileSnoopStore::new(LocalStorage::new(base), DEFAULT_STORE_FILE);
        let (again, created) = reopened
            .update_or_create(entry("walkley", "resignation"))
            .await
            .unwrap();
        assert!(!created);
        assert_eq!(again.id, first.id);
        assert_eq!(again.date_seen, first.date_seen);
        assert_eq!(reopened.all().await.unwrap().len(), 1);
    }
}
