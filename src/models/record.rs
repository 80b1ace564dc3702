//! # Record Model
//!
//! A single row of the collection being walked. The batch core treats records
//! as opaque apart from their id and the marker field the transformer sets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One record in the ordered collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    pub title: String,
    /// Stable creation timestamp; pages are ordered oldest-first on it
    pub created_at: DateTime<Utc>,
    /// Set exactly once by the transformer
    pub marker: Option<String>,
}

impl Record {
    pub fn new(id: i64, title: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: title.into(),
            created_at,
            marker: None,
        }
    }

    /// Whether the marker has already been written; an empty string counts as unset
    pub fn is_marked(&self) -> bool {
        self.marker.as_deref().is_some_and(|m| !m.is_empty())
    }

    /// Sort key for oldest-first pagination, tie-broken on id
    pub fn sort_key(&self) -> (DateTime<Utc>, i64) {
        (self.created_at, self.id)
    }
}
