use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

use crate::models::WardenRecord;

/// Errors that can occur while reading the handle registry
#[derive(Debug, Error)]
pub enum HandleRegistryError {
    #[error("Failed to read handle registry: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed handle record {path}: {source}")]
    Malformed {
        path: String,
        source: serde_json::Error,
    },
}

/// Explicit result of a collision lookup
///
/// Lookup failures are errors, never "available": only a genuinely absent
/// record frees the handle.
#[derive(Debug)]
pub enum HandleLookup {
    Found(WardenRecord),
    NotFound,
}

/// Read-only, file-backed registry of warden and team handles
///
/// One JSON record per handle under the handles directory. Serves both the
/// name collision check and the team-membership lookup.
#[derive(Debug, Clone)]
pub struct HandleRegistry {
    dir: PathBuf,
}

impl HandleRegistry {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Look up a handle record by name
    pub async fn lookup(&self, handle: &str) -> Result<HandleLookup, HandleRegistryError> {
        let path = self.dir.join(format!("{handle}.json"));
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let record = serde_json::from_slice(&bytes).map_err(|source| {
                    HandleRegistryError::Malformed {
                        path: path.display().to_string(),
                        source,
                    }
                })?;
                Ok(HandleLookup::Found(record))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(HandleLookup::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// List the team records whose members include the given handle
    ///
    /// The scan is best-effort: an individual record that fails to read or
    /// parse is skipped with a warning rather than failing the whole scan.
    pub async fn teams_for(&self, handle: &str) -> Result<Vec<WardenRecord>, HandleRegistryError> {
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut teams = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            match read_record(&path).await {
                Ok(record) => {
                    if record.is_team() && record.has_member(handle) {
                        teams.push(record);
                    }
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable handle record");
                }
            }
        }

        Ok(teams)
    }
}

async fn read_record(path: &Path) -> Result<WardenRecord, HandleRegistryError> {
    let bytes = tokio::fs::read(path).await?;
    serde_json::from_slice(&bytes).map_err(|source| HandleRegistryError::Malformed {
        path: path.display().to_string(),
        source,
    })
}
