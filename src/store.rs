//! Key-value storage for saved progress
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A string-to-string store in the manner of a browser's local storage.
///
/// Values are opaque to the store; callers serialize them.  Writes are
/// expected to be best-effort: callers log failures and carry on.
pub(crate) trait Store: fmt::Debug {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), SaveError>;
}

/// A store that lives only as long as the process
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct MemoryStore(BTreeMap<String, String>);

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), SaveError> {
        self.0.insert(key.to_owned(), value);
        Ok(())
    }
}

/// A store kept in memory and written out in full, as a JSON object, to a
/// file on every change
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Return the default location of the progress file
    pub(crate) fn default_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|p| p.join("daily-snake").join("progress.json"))
    }

    /// Create an empty store that will be saved at `path`
    pub(crate) fn new(path: PathBuf) -> FileStore {
        FileStore {
            path,
            entries: BTreeMap::new(),
        }
    }

    /// Load the store saved at `path`.  A missing file yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file exists but could not be read or is not a JSON
    /// object of strings.
    pub(crate) fn open(path: PathBuf) -> Result<FileStore, LoadError> {
        let src = match fs_err::read(&path) {
            Ok(src) => src,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(FileStore::new(path));
            }
            Err(e) => return Err(LoadError::read(e)),
        };
        let entries = serde_json::from_slice(&src).map_err(LoadError::deserialize)?;
        Ok(FileStore { path, entries })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self) -> Result<(), SaveError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::create_dir_all(parent).map_err(SaveError::mkdir)?;
        }
        let mut src = serde_json::to_string_pretty(&self.entries).map_err(SaveError::serialize)?;
        src.push('\n');
        fs_err::write(&self.path, &src).map_err(SaveError::write)?;
        Ok(())
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), SaveError> {
        self.entries.insert(key.to_owned(), value);
        self.write()
    }
}

#[derive(Debug, Error)]
#[error("Failed to save progress to disk")]
pub(crate) struct SaveError(#[source] SaveErrorSource);

impl SaveError {
    fn mkdir(e: std::io::Error) -> Self {
        SaveError(SaveErrorSource::Mkdir(e))
    }

    fn serialize(e: serde_json::Error) -> Self {
        SaveError(SaveErrorSource::Serialize(e))
    }

    fn write(e: std::io::Error) -> Self {
        SaveError(SaveErrorSource::Write(e))
    }
}

#[derive(Debug, Error)]
enum SaveErrorSource {
    #[error("failed to create parent directories")]
    Mkdir(#[source] std::io::Error),
    #[error("failed to serialize progress")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write progress file")]
    Write(#[source] std::io::Error),
}

#[derive(Debug, Error)]
#[error("Failed to read progress from disk")]
pub(crate) struct LoadError(#[source] LoadErrorSource);

impl LoadError {
    fn read(e: std::io::Error) -> Self {
        LoadError(LoadErrorSource::Read(e))
    }

    fn deserialize(e: serde_json::Error) -> Self {
        LoadError(LoadErrorSource::Deserialize(e))
    }
}

#[derive(Debug, Error)]
enum LoadErrorSource {
    #[error("failed to read progress file")]
    Read(#[source] std::io::Error),
    #[error("failed to deserialize progress")]
    Deserialize(#[source] serde_json::Error),
}
