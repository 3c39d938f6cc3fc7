use std::cell::Cell;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::Error;
use crate::task::TaskRecord;
use crate::theme::ThemeMode;

#[derive(Debug)]
pub struct DataStore {
    pub data_dir: PathBuf,
    pub tasks_path: PathBuf,
    pub theme_path: PathBuf,
    degraded: Cell<bool>,
}

impl DataStore {
    #[tracing::instrument(skip(data_dir))]
    pub fn open(data_dir: &Path) -> Self {
        let data_dir = data_dir.to_path_buf();
        let tasks_path = data_dir.join("tasks.data");
        let theme_path = data_dir.join("theme.data");

        let store = Self {
            data_dir,
            tasks_path,
            theme_path,
            degraded: Cell::new(false),
        };

        match store.prepare() {
            Ok(()) => {
                info!(
                    data_dir = %store.data_dir.display(),
                    tasks = %store.tasks_path.display(),
                    theme = %store.theme_path.display(),
                    "opened datastore"
                );
            }
            Err(err) => {
                warn!(
                    error = %err,
                    data_dir = %store.data_dir.display(),
                    "storage unavailable; running in memory only"
                );
                store.degraded.set(true);
            }
        }

        store
    }

    fn prepare(&self) -> Result<(), Error> {
        fs::create_dir_all(&self.data_dir).map_err(Error::StorageUnavailable)?;
        if !self.tasks_path.exists() {
            fs::write(&self.tasks_path, "").map_err(Error::StorageUnavailable)?;
        }
        if !self.theme_path.exists() {
            fs::write(&self.theme_path, "").map_err(Error::StorageUnavailable)?;
        }
        Ok(())
    }

    pub fn degraded(&self) -> bool {
        self.degraded.get()
    }

    #[tracing::instrument(skip(self))]
    pub fn load_tasks(&self) -> Vec<TaskRecord> {
        if self.degraded.get() {
            return Vec::new();
        }

        let raw = match fs::read_to_string(&self.tasks_path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Vec::new(),
            Err(err) => {
                warn!(
                    error = %err,
                    file = %self.tasks_path.display(),
                    "storage unavailable; running in memory only"
                );
                self.degraded.set(true);
                return Vec::new();
            }
        };

        let mut out = Vec::new();
        for (idx, line) in raw.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match serde_json::from_str::<TaskRecord>(trimmed) {
                Ok(record) => out.push(record),
                Err(err) => {
                    // Malformed data reads as "no data", never as a caller-visible error.
                    warn!(
                        error = %err,
                        file = %self.tasks_path.display(),
                        line = idx + 1,
                        "malformed task data; starting empty"
                    );
                    return Vec::new();
                }
            }
        }

        debug!(count = out.len(), "loaded tasks");
        out
    }

    #[tracing::instrument(skip(self, records))]
    pub fn save_tasks(&self, records: &[TaskRecord]) {
        if self.degraded.get() {
            debug!(count = records.len(), "degraded; skipping task write");
            return;
        }

        if let Err(err) = self.write_tasks(records) {
            warn!(
                error = %err,
                file = %self.tasks_path.display(),
                "storage unavailable; running in memory only"
            );
            self.degraded.set(true);
        }
    }

    fn write_tasks(&self, records: &[TaskRecord]) -> Result<(), Error> {
        debug!(
            file = %self.tasks_path.display(),
            count = records.len(),
            "saving tasks atomically"
        );

        let dir = self.tasks_path.parent().unwrap_or_else(|| Path::new("."));
        let mut temp = NamedTempFile::new_in(dir).map_err(Error::StorageUnavailable)?;
        for record in records {
            let serialized = serde_json::to_string(record)
                .map_err(|err| Error::StorageUnavailable(io::Error::from(err)))?;
            writeln!(temp, "{serialized}").map_err(Error::StorageUnavailable)?;
        }
        temp.flush().map_err(Error::StorageUnavailable)?;

        temp.persist(&self.tasks_path)
            .map_err(|err| Error::StorageUnavailable(err.error))?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub fn load_theme(&self) -> Option<ThemeMode> {
        if self.degraded.get() {
            return None;
        }

        let raw = match fs::read_to_string(&self.theme_path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                warn!(
                    error = %err,
                    file = %self.theme_path.display(),
                    "storage unavailable; running in memory only"
                );
                self.degraded.set(true);
                return None;
            }
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        let mode = ThemeMode::parse(trimmed);
        if mode.is_none() {
            warn!(
                value = %trimmed,
                file = %self.theme_path.display(),
                "unrecognized theme value; using default"
            );
        }
        mode
    }

    #[tracing::instrument(skip(self))]
    pub fn save_theme(&self, mode: ThemeMode) {
        if self.degraded.get() {
            debug!("degraded; skipping theme write");
            return;
        }

        if let Err(err) = fs::write(&self.theme_path, mode.as_str()) {
            warn!(
                error = %err,
                file = %self.theme_path.display(),
                "storage unavailable; running in memory only"
            );
            self.degraded.set(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::DataStore;
    use crate::task::TaskRecord;

    fn record(description: &str, completed: bool) -> TaskRecord {
        TaskRecord {
            description: description.to_string(),
            completed,
        }
    }

    #[test]
    fn save_then_load_preserves_content_and_order() {
        let temp = tempdir().expect("tempdir");
        let store = DataStore::open(temp.path());

        let records = vec![
            record("Buy milk", true),
            record("Walk dog", false),
            record("Water plants", false),
        ];
        store.save_tasks(&records);

        assert_eq!(store.load_tasks(), records);
        assert!(!store.degraded());
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let temp = tempdir().expect("tempdir");
        let store = DataStore::open(temp.path());

        std::fs::remove_file(&store.tasks_path).expect("remove tasks file");
        assert!(store.load_tasks().is_empty());
        assert!(!store.degraded());
    }

    #[test]
    fn malformed_data_loads_as_empty() {
        let temp = tempdir().expect("tempdir");
        let store = DataStore::open(temp.path());

        store.save_tasks(&[record("Buy milk", false)]);
        std::fs::write(&store.tasks_path, "{\"description\":\"Buy milk\"}\nnot json\n")
            .expect("write tasks file");

        assert!(store.load_tasks().is_empty());
    }

    #[test]
    fn setup_failure_degrades_to_memory_only() {
        let temp = tempdir().expect("tempdir");
        let blocker = temp.path().join("not-a-dir");
        std::fs::write(&blocker, "x").expect("write blocker");

        let store = DataStore::open(&blocker.join("data"));
        assert!(store.degraded());

        store.save_tasks(&[record("Buy milk", false)]);
        assert!(store.load_tasks().is_empty());
        assert!(store.load_theme().is_none());
    }
}
