//! Persistence of fitted trend models
//!
//! # Architecture
//!
//! - `ModelStore` trait defines load/save for a fitted [`TrendModel`]
//! - `FileModelStore` keeps the model as a JSON artifact on disk
//! - `Database` implements the trait on top of the `trend_models` table
//!   (see `db::trend_models`), keeping earlier fits as history
//!
//! A loaded model may be older than the newest transactions. Retraining is an
//! explicit run; nothing here refreshes a model implicitly.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::trend::TrendModel;

/// Storage backend for the fitted trend model
///
/// Implementations must allow at most one writer at a time, and a load running
/// alongside a save must observe either the old or the new model in full.
pub trait ModelStore: Send + Sync {
    /// Human-readable name for this store
    fn name(&self) -> &str;

    /// Load the most recently saved model
    ///
    /// Fails with [`Error::ModelNotFound`] if nothing has been trained yet.
    fn load(&self) -> Result<TrendModel>;

    /// Save a model, replacing the current one
    fn save(&self, model: &TrendModel) -> Result<()>;
}

/// JSON model artifact on the local filesystem
pub struct FileModelStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ModelStore for FileModelStore {
    fn name(&self) -> &str {
        "file"
    }

    fn load(&self) -> Result<TrendModel> {
        let _guard = self.lock.read().unwrap_or_else(|e| e.into_inner());

        if !self.path.exists() {
            return Err(Error::ModelNotFound(self.path.display().to_string()));
        }

        let content = fs::read_to_string(&self.path)?;
        let model: TrendModel = serde_json::from_str(&content)?;
        debug!(path = %self.path.display(), "Loaded trend model");
        Ok(model)
    }

    fn save(&self, model: &TrendModel) -> Result<()> {
        let _guard = self.lock.write().unwrap_or_else(|e| e.into_inner());

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        // Write beside the target and rename so readers never see a partial file
        let mut tmp = NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(&mut tmp, model)?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        info!(path = %self.path.display(), "Saved trend model");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MonthIndex, MonthlyAggregate};
    use tempfile::TempDir;

    fn fitted() -> TrendModel {
        let series = vec![
            MonthlyAggregate {
                month_index: MonthIndex::try_from(202401).unwrap(),
                total_amount: 1000.25,
            },
            MonthlyAggregate {
                month_index: MonthIndex::try_from(202402).unwrap(),
                total_amount: 1333.0 / 3.0,
            },
            MonthlyAggregate {
                month_index: MonthIndex::try_from(202403).unwrap(),
                total_amount: 2718.281828,
            },
        ];
        TrendModel::fit(&series).unwrap()
    }

    #[test]
    fn test_load_before_training() {
        let dir = TempDir::new().unwrap();
        let store = FileModelStore::new(dir.path().join("model.json"));
        assert!(matches!(store.load(), Err(Error::ModelNotFound(_))));
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileModelStore::new(dir.path().join("nested").join("model.json"));
        let model = fitted();

        store.save(&model).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded.slope, model.slope);
        assert_eq!(loaded.intercept, model.intercept);
        assert_eq!(loaded, model);

        let month = MonthIndex::try_from(202406).unwrap();
        assert_eq!(loaded.predict(month), model.predict(month));
    }

    #[test]
    fn test_save_overwrites_previous_model() {
        let dir = TempDir::new().unwrap();
        let store = FileModelStore::new(dir.path().join("model.json"));

        store.save(&TrendModel::new(1.0, 2.0)).unwrap();
        store.save(&TrendModel::new(3.0, 4.0)).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.slope, 3.0);
        assert_eq!(loaded.intercept, 4.0);
    }

    #[test]
    fn test_concurrent_loads_see_whole_models() {
        use std::sync::Arc;

        let dir = TempDir::new().unwrap();
        let store = Arc::new(FileModelStore::new(dir.path().join("model.json")));
        store.save(&TrendModel::new(1.0, 1.0)).unwrap();

        let writer = {
            let store = Arc::clone(&store);
            std::thread::spawn(move || {
                for i in 0..20 {
                    let v = i as f64;
                    store.save(&TrendModel::new(v, v)).unwrap();
                }
            })
        };

        for _ in 0..20 {
            let model = store.load().unwrap();
            assert_eq!(model.slope, model.intercept);
        }
        writer.join().unwrap();
    }
}
