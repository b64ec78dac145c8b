use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::resolve_data_dir;
use crate::model::store::AttendanceStore;
use crate::repository::traits::StoreRepository;

const DEFAULT_FILE_NAME: &str = "attendance.json";

/// Keeps the whole store in one pretty-printed JSON file.
#[derive(Clone)]
pub struct FileStoreRepository {
    file_path: PathBuf,
}

impl FileStoreRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let mut path = resolve_data_dir(base_dir)?;
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create data directory {}", path.display()))?;
        path.push(DEFAULT_FILE_NAME);

        let repo = FileStoreRepository { file_path: path };
        if !repo.file_path.exists() {
            repo.save(&AttendanceStore::new())?;
        }
        Ok(repo)
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl StoreRepository for FileStoreRepository {
    fn load(&self) -> Result<AttendanceStore> {
        let file = File::open(&self.file_path)
            .with_context(|| format!("Failed to open {}", self.file_path.display()))?;
        let reader = BufReader::new(file);
        let mut store: AttendanceStore = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse {}", self.file_path.display()))?;
        store.reconcile();
        Ok(store)
    }

    fn save(&self, store: &AttendanceStore) -> Result<()> {
        let file = File::create(&self.file_path)
            .with_context(|| format!("Failed to write {}", self.file_path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, store)?;
        writer.flush()?;
        debug!(path = %self.file_path.display(), "store saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::event::AttendanceEvent;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_new_creates_empty_store_file() {
        let dir = TempDir::new().unwrap();
        let repo = FileStoreRepository::new(Some(dir.path().join("nested"))).unwrap();

        assert!(repo.path().exists());
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let repo = FileStoreRepository::new(Some(dir.path().to_path_buf())).unwrap();

        let monday = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let mut store = AttendanceStore::new();
        store.submit(
            AttendanceEvent::on(monday)
                .with_in("09:00".parse().unwrap())
                .with_out("17:30".parse().unwrap())
                .with_remark("Regular workday"),
        );
        store.delete_day(NaiveDate::from_ymd_opt(2024, 6, 4).unwrap()).unwrap();
        repo.save(&store).unwrap();

        let loaded = repo.load().unwrap();
        assert_eq!(loaded, store);
        assert_eq!(loaded.week_total("2024-W23"), 510);

        // an existing file is left alone on re-open
        let reopened = FileStoreRepository::new(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(reopened.load().unwrap(), store);
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let repo = FileStoreRepository::new(Some(dir.path().to_path_buf())).unwrap();
        fs::write(repo.path(), "not json").unwrap();

        assert!(repo.load().is_err());
    }
}
