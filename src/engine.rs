//! Engine Module
//!
//! The record engine implementing create, read, and delete on top of the
//! file manager.
//!
//! ## Responsibilities
//! - Validate batch shape and size limits before touching the store
//! - Reject duplicate keys atomically (all-or-nothing batches)
//! - Stamp `CreatedAt` / default `Time-To-Live` on new records
//! - Classify expired records as absent on read and delete

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::Config;
use crate::datastore::FileManager;
use crate::error::{Result, StoreError};
use crate::record::{Record, CREATED_AT_FIELD, TTL_FIELD};

/// A batch entry that passed validation and is ready to be stamped
struct PreparedEntry {
    key: String,
    fields: Map<String, Value>,
    ttl_seconds: Option<u64>,
}

/// The record engine for one store location
///
/// ## Concurrency Model
///
/// - **Mutations** (create/delete): serialized by `write_lock` in-process,
///   and by the file manager's exclusive session across processes. The
///   session spans the whole load+validate+save sequence, so concurrent
///   mutations cannot lose each other's updates.
/// - **Reads**: no engine lock; the file manager's shared lock lets reads
///   run concurrently with each other.
///
/// The engine holds no store state in memory between requests: every
/// operation starts from the file, which keeps multiple server processes
/// against the same location coherent.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Store file access
    files: FileManager,

    /// Serializes mutating operations within this process
    write_lock: Mutex<()>,
}

impl Engine {
    /// Create an engine for the store location in `config`.
    ///
    /// The data directory is expected to exist already; creating it is the
    /// server bootstrap's job, not the engine's.
    pub fn new(config: Config) -> Self {
        let files = FileManager::new(&config.data_dir, &config.store_file_name);
        Self {
            config,
            files,
            write_lock: Mutex::new(()),
        }
    }

    // =========================================================================
    // Create
    // =========================================================================

    /// Bulk-insert a batch of records.
    ///
    /// Steps:
    /// 1. Validate shape and size limits (no store access needed)
    /// 2. Open an exclusive session and load the current store
    /// 3. Reject if the store is full or any key already exists
    /// 4. Stamp the batch in parallel and merge
    /// 5. Save the whole store back through the same session
    ///
    /// The batch is all-or-nothing: any validation failure or key collision
    /// rejects every record and the store file is left untouched.
    pub fn create(&self, batch: Map<String, Value>) -> Result<String> {
        let entries = self.validate_batch(batch)?;

        let _write_guard = self.write_lock.lock();

        let mut session = self.files.exclusive()?;
        let (mut store, _) = session.load()?;

        if serialized_size(&store)? >= self.config.max_store_bytes {
            return Err(StoreError::StoreFull);
        }

        for entry in &entries {
            if store.contains_key(&entry.key) {
                return Err(StoreError::DuplicateKey {
                    key: entry.key.clone(),
                });
            }
        }

        let count = entries.len();
        let stamped = stamp_batch(entries, self.config.stamp_workers)?;
        store.extend(stamped);

        session.save(&store)?;

        tracing::debug!(records = count, "created records in datastore");
        Ok("Data created in the datastore.".to_string())
    }

    // =========================================================================
    // Read
    // =========================================================================

    /// Read a single record by key.
    ///
    /// Returns the record's fields with `Time-To-Live` included as stored
    /// and `CreatedAt` stripped. Expired records are treated as absent.
    pub fn read(&self, key: &str) -> Result<Map<String, Value>> {
        let (store, found) = self.files.load()?;
        if !found {
            tracing::debug!(key, "read against an empty datastore");
            return Err(StoreError::NotFound);
        }

        let record = store.get(key).ok_or(StoreError::NotFound)?;
        if record.is_expired(Utc::now()) {
            return Err(StoreError::Expired);
        }

        Ok(record.clone().into_read_fields())
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// Delete a single record by key.
    ///
    /// Same lookup and expiry semantics as read; on success the key is
    /// removed and the whole store is rewritten.
    pub fn delete(&self, key: &str) -> Result<String> {
        let _write_guard = self.write_lock.lock();

        // Opening an exclusive session would create the file; a store that
        // was never written must stay absent on a failed delete.
        if !self.files.path().is_file() {
            tracing::debug!(key, "delete against an empty datastore");
            return Err(StoreError::NotFound);
        }

        let mut session = self.files.exclusive()?;
        let (mut store, found) = session.load()?;
        if !found {
            return Err(StoreError::NotFound);
        }

        let record = store.get(key).ok_or(StoreError::NotFound)?;
        if record.is_expired(Utc::now()) {
            return Err(StoreError::Expired);
        }

        store.remove(key);
        session.save(&store)?;

        tracing::debug!(key, "deleted record from datastore");
        Ok("Data deleted from the datastore.".to_string())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Apply the pre-lock validation rules to an incoming batch.
    ///
    /// Checks, in order: batch serialized size, per-key length, value
    /// shape, per-value serialized size. The reserved fields are stripped
    /// here: `Time-To-Live` is parsed (null or non-negative integer) and a
    /// caller-supplied `CreatedAt` is discarded, since the engine stamps
    /// its own.
    fn validate_batch(&self, batch: Map<String, Value>) -> Result<Vec<PreparedEntry>> {
        if serialized_size(&batch)? > self.config.max_store_bytes {
            return Err(StoreError::TooLarge);
        }

        let mut entries = Vec::with_capacity(batch.len());
        for (key, value) in batch {
            if key.chars().count() > self.config.max_key_chars {
                return Err(StoreError::KeyTooLong { key });
            }

            let Value::Object(mut fields) = value else {
                return Err(StoreError::InvalidFormat(
                    "the values must be JSON objects".to_string(),
                ));
            };

            if serialized_size(&fields)? > self.config.max_record_bytes {
                return Err(StoreError::ValueTooLarge { key });
            }

            let ttl_seconds = parse_ttl(fields.remove(TTL_FIELD))?;
            fields.remove(CREATED_AT_FIELD);

            entries.push(PreparedEntry {
                key,
                fields,
                ttl_seconds,
            });
        }

        Ok(entries)
    }
}

// =============================================================================
// Batch Stamping
// =============================================================================

/// Stamp a validated batch with `CreatedAt`, fanning out over disjoint
/// chunks on scoped worker threads.
///
/// Each record's preparation is independent and keyed, so the partitioning
/// is not externally observable: the merged result is identical however the
/// work is split. The scope joins every worker before returning, and no
/// state is shared between them.
fn stamp_batch(entries: Vec<PreparedEntry>, workers: usize) -> Result<Vec<(String, Record)>> {
    let created_at = Utc::now();

    let chunk_size = entries.len().div_ceil(workers.max(1));
    if chunk_size == 0 || entries.len() <= chunk_size {
        return Ok(stamp_chunk(entries, created_at));
    }

    let mut chunks = Vec::with_capacity(workers);
    let mut remaining = entries;
    while remaining.len() > chunk_size {
        let tail = remaining.split_off(chunk_size);
        chunks.push(remaining);
        remaining = tail;
    }
    chunks.push(remaining);

    let joined = crossbeam::thread::scope(|scope| {
        let handles: Vec<_> = chunks
            .into_iter()
            .map(|chunk| scope.spawn(move |_| stamp_chunk(chunk, created_at)))
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join())
            .collect::<std::thread::Result<Vec<_>>>()
    });

    match joined {
        Ok(Ok(parts)) => Ok(parts.into_iter().flatten().collect()),
        _ => Err(StoreError::Io(std::io::Error::other(
            "record stamping worker panicked",
        ))),
    }
}

fn stamp_chunk(
    entries: Vec<PreparedEntry>,
    created_at: DateTime<Utc>,
) -> Vec<(String, Record)> {
    entries
        .into_iter()
        .map(|entry| {
            (
                entry.key,
                Record::new(entry.fields, entry.ttl_seconds, created_at),
            )
        })
        .collect()
}

// =============================================================================
// Helpers
// =============================================================================

/// Parse a caller-supplied `Time-To-Live`: absent or null means the record
/// never expires, otherwise it must be a non-negative integer of seconds.
fn parse_ttl(value: Option<Value>) -> Result<Option<u64>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_u64().map(Some).ok_or_else(|| {
            StoreError::InvalidFormat(
                "Time-To-Live must be a non-negative integer of seconds".to_string(),
            )
        }),
        Some(_) => Err(StoreError::InvalidFormat(
            "Time-To-Live must be a non-negative integer of seconds".to_string(),
        )),
    }
}

/// Serialized size in bytes, as persisted
fn serialized_size<T: Serialize>(value: &T) -> Result<usize> {
    let bytes = serde_json::to_vec(value).map_err(std::io::Error::other)?;
    Ok(bytes.len())
}
