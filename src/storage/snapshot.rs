//! Review snapshot files
//!
//! Each review kind is stored as one flat JSON array holding the comment
//! objects exactly as the API returned them. Loading a snapshot skips the
//! whole fetch.
//!
//! # Example
//!
//! ```no_run
//! use bangumi_score::config::StorageConfig;
//! use bangumi_score::review::ReviewKind;
//! use bangumi_score::storage::SnapshotStore;
//!
//! # fn example() -> Result<(), bangumi_score::error::StorageError> {
//! let store = SnapshotStore::new(&StorageConfig::default());
//! if store.exists() {
//!     let short = store.load(ReviewKind::Short)?;
//!     println!("{} short reviews on disk", short.len());
//! }
//! # Ok(())
//! # }
//! ```

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::StorageConfig;
use crate::review::{Comment, ReviewKind};
use crate::utils::error::StorageError;

/// Reads and writes the short/long review snapshots
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    short_path: PathBuf,
    long_path: PathBuf,
}

impl SnapshotStore {
    /// Create a store rooted at the configured data directory
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            short_path: config.path_for(ReviewKind::Short),
            long_path: config.path_for(ReviewKind::Long),
        }
    }

    /// Snapshot file of `kind`
    pub fn path(&self, kind: ReviewKind) -> &Path {
        match kind {
            ReviewKind::Short => &self.short_path,
            ReviewKind::Long => &self.long_path,
        }
    }

    /// Both snapshot files are present
    pub fn exists(&self) -> bool {
        self.short_path.is_file() && self.long_path.is_file()
    }

    /// Write `comments` as the snapshot of `kind`
    ///
    /// The array is written to a temporary sibling file and renamed over the
    /// target, so a crash never leaves a truncated snapshot.
    pub fn save(&self, kind: ReviewKind, comments: &[Comment]) -> Result<PathBuf, StorageError> {
        let path = self.path(kind).to_path_buf();

        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| StorageError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
        temp_name.push(".tmp");
        let temp_path = path.with_file_name(temp_name);

        let io_err = |source| StorageError::Io {
            path: temp_path.clone(),
            source,
        };

        let file = File::create(&temp_path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, comments).map_err(|source| StorageError::Json {
            path: temp_path.clone(),
            source,
        })?;
        writer.flush().map_err(io_err)?;

        fs::rename(&temp_path, &path).map_err(|source| StorageError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(path = %path.display(), count = comments.len(), "Snapshot saved");
        Ok(path)
    }

    /// Read the snapshot of `kind` in stored order
    pub fn load(&self, kind: ReviewKind) -> Result<Vec<Comment>, StorageError> {
        let path = self.path(kind);

        let file = File::open(path).map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let comments: Vec<Comment> =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| StorageError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::debug!(path = %path.display(), count = comments.len(), "Snapshot loaded");
        Ok(comments)
    }
}
