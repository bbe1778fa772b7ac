//! Datastore Module
//!
//! Single point of truth for the store's on-disk representation.
//!
//! ## Responsibilities
//! - Locked load/save of the one JSON file holding the whole store
//! - Shared locks for pure reads, one exclusive session per mutation
//! - Whole-file rewrites only (no partial/append updates)
//!
//! ## File Format
//! ```text
//! {data_dir}/store.json
//! {
//!   "<key>": {
//!     "<field>": <value>, ...,
//!     "CreatedAt": "2026-08-07T10:15:03.412Z",
//!     "Time-To-Live": 50 | null
//!   },
//!   ...
//! }
//! ```
//!
//! The store is size-capped, so whole-file read/modify/write under a coarse
//! advisory lock is acceptable: it trades write throughput for the absence
//! of any multi-step on-disk state machine to corrupt.

mod file;

pub use file::{FileManager, StoreSession};
