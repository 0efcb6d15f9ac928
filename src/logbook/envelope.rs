//! # Response Envelope
//!
//! Every public operation answers with one JSON object:
//!
//! ```json
//! {"entries": [...], "error": null}
//! {"documents": [...], "error": null}
//! {"entries": null, "error": {"code": "QueryFailure", "message": "..."}}
//! ```
//!
//! The list key depends on the backend that produced the answer; on failure
//! the key is still present (as `null`) so clients can decode every response
//! with the same shape. Clients are expected to check `error` on every
//! response.

use crate::error::{LogbookError, Result};
use crate::model::{Document, Entry};
use serde::{Deserialize, Serialize};

/// Which list key an envelope carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingKind {
    Entries,
    Documents,
}

/// The records half of an envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Listing {
    #[serde(rename = "entries")]
    Entries(Option<Vec<Entry>>),
    #[serde(rename = "documents")]
    Documents(Option<Vec<Document>>),
}

impl Listing {
    pub fn entries(entries: Vec<Entry>) -> Self {
        Listing::Entries(Some(entries))
    }

    pub fn documents(documents: Vec<Document>) -> Self {
        Listing::Documents(Some(documents))
    }

    /// The `null` listing used alongside an error.
    pub fn absent(kind: ListingKind) -> Self {
        match kind {
            ListingKind::Entries => Listing::Entries(None),
            ListingKind::Documents => Listing::Documents(None),
        }
    }

    pub fn kind(&self) -> ListingKind {
        match self {
            Listing::Entries(_) => ListingKind::Entries,
            Listing::Documents(_) => ListingKind::Documents,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Listing::Entries(list) => list.as_ref().map_or(0, Vec::len),
            Listing::Documents(list) => list.as_ref().map_or(0, Vec::len),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl From<&LogbookError> for ErrorBody {
    fn from(err: &LogbookError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(flatten)]
    pub listing: Listing,
    pub error: Option<ErrorBody>,
}

impl Envelope {
    pub fn success(listing: Listing) -> Self {
        Self {
            listing,
            error: None,
        }
    }

    pub fn failure(kind: ListingKind, err: &LogbookError) -> Self {
        Self {
            listing: Listing::absent(kind),
            error: Some(ErrorBody::from(err)),
        }
    }

    /// Wraps an operation outcome.
    pub fn from_result(kind: ListingKind, result: Result<Listing>) -> Self {
        match result {
            Ok(listing) => Self::success(listing),
            Err(err) => Self::failure(kind, &err),
        }
    }

    /// Serialized form. If serialization itself fails, the serializer's
    /// message is returned as the bytes.
    pub fn encode(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_else(|e| e.to_string().into_bytes())
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}
