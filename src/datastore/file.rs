//! Store file access
//!
//! All reads and writes of the store file go through here. Locking uses
//! advisory file locks (flock-style), so mutual exclusion holds across
//! threads and across processes sharing the same store location.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::{Result, StoreError};
use crate::record::Store;

/// Reads and writes the single store file at one location.
///
/// ## Concurrency
/// - `load()` takes a shared lock: concurrent reads never block each other
/// - `exclusive()` takes an exclusive lock and keeps it for the lifetime of
///   the returned [`StoreSession`], covering a full load-modify-save cycle
/// - Lock acquisition blocks with no timeout; callers needing cancellation
///   must enforce a deadline externally
///
/// The manager holds no open file across calls: the file is opened and
/// locked per operation, so state stays correct under multi-process
/// deployment.
pub struct FileManager {
    path: PathBuf,
}

impl FileManager {
    /// Create a manager for `{data_dir}/{file_name}`.
    ///
    /// Does not touch the filesystem: the directory is a bootstrap concern
    /// and the file itself is created lazily on the first mutating session.
    pub fn new(data_dir: impl Into<PathBuf>, file_name: &str) -> Self {
        Self {
            path: data_dir.into().join(file_name),
        }
    }

    /// Path of the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the store under a shared lock.
    ///
    /// Returns `(store, found)`: a missing file is an empty store with
    /// `found = false`, not an error. Undecodable contents fail with
    /// [`StoreError::CorruptData`].
    pub fn load(&self) -> Result<(Store, bool)> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok((Store::new(), false));
            }
            Err(e) => return Err(e.into()),
        };

        file.lock_shared()?;
        let store = read_store(&file);
        let _ = FileExt::unlock(&file);

        store.map(|s| (s, true))
    }

    /// Open an exclusive session for a read-modify-write cycle.
    ///
    /// The file is created if it does not exist yet (the store materializes
    /// on the first successful create). The exclusive lock is held until the
    /// session is dropped, on every exit path.
    pub fn exclusive(&self) -> Result<StoreSession> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        Ok(StoreSession { file })
    }
}

/// An exclusive-locked handle on the store file.
///
/// Spans one whole load+mutate+save sequence, so two concurrent mutations
/// can never both read the same pre-update store and silently overwrite
/// each other's writes. Dropping the session releases the lock.
#[derive(Debug)]
pub struct StoreSession {
    file: File,
}

impl StoreSession {
    /// Deserialize the current file contents.
    ///
    /// Returns `(store, found)`; a zero-length file (just created by this
    /// session, or by a peer that never saved) reads as an empty store with
    /// `found = false`.
    pub fn load(&mut self) -> Result<(Store, bool)> {
        self.file.seek(SeekFrom::Start(0))?;

        let mut contents = String::new();
        self.file.read_to_string(&mut contents)?;

        if contents.is_empty() {
            return Ok((Store::new(), false));
        }

        let store = serde_json::from_str(&contents)
            .map_err(|e| StoreError::CorruptData(e.to_string()))?;
        Ok((store, true))
    }

    /// Serialize `store` and replace the file's entire contents.
    pub fn save(&mut self, store: &Store) -> Result<()> {
        let bytes = serde_json::to_vec(store).map_err(std::io::Error::other)?;

        self.file.seek(SeekFrom::Start(0))?;
        self.file.set_len(0)?;
        self.file.write_all(&bytes)?;
        self.file.sync_all()?;

        Ok(())
    }
}

impl Drop for StoreSession {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

fn read_store(mut file: &File) -> Result<Store> {
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    if contents.is_empty() {
        return Ok(Store::new());
    }

    serde_json::from_str(&contents).map_err(|e| StoreError::CorruptData(e.to_string()))
}
