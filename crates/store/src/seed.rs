//! JSON seed documents.
//!
//! A seed holds every record the in-memory store starts with:
//!
//! ```json
//! {
//!   "views":    [ { "slug": "roadmap", ... } ],
//!   "forms":    [ { "id": "...", "owner": "owner-1", ... } ],
//!   "profiles": [ { "owner": "owner-1", "tracker_credential": "<base64>" } ],
//!   "sessions": [ { "token": "...", "owner": "owner-1" } ]
//! }
//! ```

use std::path::{Path, PathBuf};

use domain::{EncryptedCredential, Form, OwnerId, View};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a seed document.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("seed file '{path}' is not valid: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate view slug '{0}' in seed")]
    DuplicateSlug(String),
}

/// An owner profile record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub owner: OwnerId,
    #[serde(default)]
    pub tracker_credential: Option<EncryptedCredential>,
}

/// An owner session token record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub token: String,
    pub owner: OwnerId,
}

/// The full content of a seed file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedDocument {
    #[serde(default)]
    pub views: Vec<View>,
    #[serde(default)]
    pub forms: Vec<Form>,
    #[serde(default)]
    pub profiles: Vec<ProfileRecord>,
    #[serde(default)]
    pub sessions: Vec<SessionRecord>,
}

impl SeedDocument {
    /// Reads and parses a seed file.
    pub async fn load(path: &Path) -> Result<Self, SeedError> {
        let raw = tokio::fs::read(path).await.map_err(|source| SeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_slice(&raw).map_err(|source| SeedError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
