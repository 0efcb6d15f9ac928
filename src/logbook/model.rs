//! # Data Model
//!
//! Two record shapes live here, one per storage strategy:
//!
//! - [`Entry`]: the flat journal line (`id`, `text`, `color`, timestamps).
//! - [`Document`]: an identified record holding its current [`Content`] and the
//!   append-only `history` of every content it replaced.
//!
//! A serialized [`Document`] is what the document table stores, so the JSON
//! produced by [`Document::serialize`] is a storage format, not only a wire
//! format. The table derives its searchable columns from it with
//! `json_extract`, which is why the field names below are load-bearing.
//!
//! Timestamps inside documents are written as RFC 3339 with a fixed nanosecond
//! precision, so the stored strings order the same way the instants do.

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A flat journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,
    pub text: String,
    pub color: i64,
    /// Unix seconds
    pub created: i64,
    /// Unix seconds
    pub modified: i64,
}

impl Entry {
    /// Builds an unsaved entry; `id` stays 0 until the store assigns one.
    pub fn new(text: impl Into<String>, color: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            id: 0,
            text: text.into(),
            color,
            created: now,
            modified: now,
        }
    }
}

/// A complete document record, as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub identifier: String,
    pub content: Content,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub history: Vec<Content>,
}

/// The content portion of a [`Document`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Content {
    pub text: String,
    #[serde(with = "timestamp")]
    pub created: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub modified: DateTime<Utc>,
    #[serde(default)]
    pub meta: Meta,
}

/// Metadata attached to a [`Content`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Meta {
    #[serde(rename = "contentType")]
    pub content_type: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    pub color: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub coordinate: Coordinate,
}

/// A geographic coordinate on Earth.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

impl Document {
    /// A fresh document: no identifier yet, empty tags and history, and
    /// `created == modified == now`.
    pub fn new() -> Self {
        Self {
            identifier: String::new(),
            content: Content::new(""),
            history: Vec::new(),
        }
    }

    /// A random identifier for documents created without one.
    pub fn fresh_identifier() -> String {
        Uuid::new_v4().to_string()
    }

    /// Parses a stored document. Missing or `null` collections come back as
    /// empty vectors.
    pub fn decode(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Decodes a batch of stored documents, failing on the first bad payload.
    pub fn decode_all<S: AsRef<str>>(raws: &[S]) -> Result<Vec<Self>> {
        raws.iter().map(|raw| Self::decode(raw.as_ref())).collect()
    }

    pub fn serialize(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Moves the current content into history and installs `next`.
    ///
    /// A document is created once: `next` inherits the current `created`, so
    /// revising never changes where the document sorts.
    pub fn revise(&mut self, mut next: Content) {
        next.created = self.content.created;
        let previous = std::mem::replace(&mut self.content, next);
        self.history.push(previous);
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Content {
    pub fn new(text: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            text: text.into(),
            created: now,
            modified: now,
            meta: Meta::default(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.meta.content_type = content_type.into();
        self
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.meta.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_color(mut self, color: i64) -> Self {
        self.meta.color = color;
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.meta.location = Some(location);
        self
    }
}

impl Meta {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Pretty-printed JSON, for display and editing.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Nanos, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
