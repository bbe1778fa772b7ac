//! Record and store types
//!
//! A record is one key's JSON object plus two reserved fields stamped by the
//! engine: `CreatedAt` (creation timestamp, immutable) and `Time-To-Live`
//! (optional lifetime in seconds, `null` = never expires). Expiry is a
//! read-time classification: the bytes of an expired record stay on disk
//! until an explicit delete.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Reserved field holding the creation timestamp
pub const CREATED_AT_FIELD: &str = "CreatedAt";

/// Reserved field holding the TTL in seconds
pub const TTL_FIELD: &str = "Time-To-Live";

/// The full collection of records persisted at one store location,
/// serialized as a single JSON object keyed by record key.
pub type Store = BTreeMap<String, Record>;

/// One stored record: the caller's fields plus the reserved stamps.
///
/// `Time-To-Live` is always materialized in the serialized form, as an
/// explicit `null` when the record never expires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "CreatedAt")]
    created_at: DateTime<Utc>,

    #[serde(rename = "Time-To-Live")]
    ttl_seconds: Option<u64>,

    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl Record {
    /// Build a record from caller-supplied fields.
    ///
    /// The reserved fields must already be stripped from `fields`; the
    /// engine extracts `Time-To-Live` during validation and discards any
    /// caller-supplied `CreatedAt`.
    pub fn new(fields: Map<String, Value>, ttl_seconds: Option<u64>, created_at: DateTime<Utc>) -> Self {
        Self {
            created_at,
            ttl_seconds,
            fields,
        }
    }

    /// Creation timestamp
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// TTL in seconds, `None` if the record never expires
    pub fn ttl_seconds(&self) -> Option<u64> {
        self.ttl_seconds
    }

    /// The caller-supplied fields (reserved stamps excluded)
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// A record is live while `now < CreatedAt + Time-To-Live`.
    /// A null TTL never expires.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        let Some(ttl) = self.ttl_seconds else {
            return false;
        };

        // TTLs past the representable range are treated as never expiring
        let ttl = i64::try_from(ttl).unwrap_or(i64::MAX);
        let Some(lifetime) = Duration::try_seconds(ttl) else {
            return false;
        };
        match self.created_at.checked_add_signed(lifetime) {
            Some(expires_at) => now >= expires_at,
            None => false,
        }
    }

    /// The shape returned by the read operation: the caller's fields with
    /// `Time-To-Live` included as stored and `CreatedAt` stripped.
    pub fn into_read_fields(self) -> Map<String, Value> {
        let mut fields = self.fields;
        let ttl = match self.ttl_seconds {
            Some(secs) => Value::from(secs),
            None => Value::Null,
        };
        fields.insert(TTL_FIELD.to_string(), ttl);
        fields
    }
}
