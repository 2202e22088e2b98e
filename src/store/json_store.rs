use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Serialize, de::DeserializeOwned};

use crate::store::history::HistoryStore;
use crate::store::schema::HistoryData;

const HISTORY_FILE: &str = "history.json";

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("keytrail");
        Self::with_base_dir(base_dir)
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if !path.exists() {
            return T::default();
        }
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), %err, "unreadable data file, starting fresh");
                T::default()
            }),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "failed to read data file");
                T::default()
            }
        }
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    pub fn load_history(&self, limit: usize) -> HistoryStore {
        let data: HistoryData = self.load(HISTORY_FILE);
        if data.needs_reset() {
            tracing::warn!(
                found = data.schema_version,
                "history schema changed, discarding old results"
            );
            return HistoryStore::new(limit);
        }
        HistoryStore::from_data(limit, data)
    }

    pub fn save_history(&self, history: &HistoryStore) -> Result<()> {
        self.save(HISTORY_FILE, &history.to_data())?;
        tracing::debug!(results = history.len(), "history saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::result::{ResultIdentifier, TestKind, TestResult};

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        assert!(store.load_history(25).is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let id = ResultIdentifier::new(TestKind::Timer, 30, "Common words");
        let mut history = HistoryStore::new(25);
        history.push(TestResult::empty(id.clone()));
        store.save_history(&history).unwrap();

        assert!(!dir.path().join("history.tmp").exists());
        let loaded = store.load_history(25);
        assert_eq!(loaded.results_for(&id).len(), 1);
    }

    #[test]
    fn test_corrupt_or_stale_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(dir.path().join(HISTORY_FILE), "{ not json").unwrap();
        assert!(store.load_history(25).is_empty());

        fs::write(
            dir.path().join(HISTORY_FILE),
            r#"{"schema_version": 999, "results": []}"#,
        )
        .unwrap();
        assert!(store.load_history(25).is_empty());
    }
}
