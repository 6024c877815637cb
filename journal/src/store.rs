//! Whole-document experience store.
//!
//! The journal persists as one pretty-printed JSON array of experiences at
//! a well-known path. Read-modify-write of the entire document is the only
//! supported mutation pattern; callers serialize concurrent edits (at most
//! one in-flight write). Recovery from a corrupt document is "start from
//! empty", surfaced to the user by the caller.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::experience::Experience;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem failure reading or writing the document.
    #[error("experience store I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The document exists but is not parseable JSON of the expected shape.
    #[error("experience document is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// Imported data failed the minimum shape validation.
    #[error("imported data rejected: {0}")]
    InvalidImport(String),
}

/// File-backed store for the experience document.
#[derive(Debug, Clone)]
pub struct ExperienceStore {
    path: PathBuf,
}

impl ExperienceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full experience list.
    ///
    /// An absent file is an empty journal, not an error. A present but
    /// unparsable file is [`StoreError::Corrupt`].
    pub fn load(&self) -> Result<Vec<Experience>, StoreError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no experience document, starting empty");
            return Ok(Vec::new());
        }
        let json = fs::read_to_string(&self.path)?;
        let experiences: Vec<Experience> = serde_json::from_str(&json)?;
        debug!(count = experiences.len(), "experience document loaded");
        Ok(experiences)
    }

    /// Load, falling back to an empty journal when the document is corrupt.
    pub fn load_or_default(&self) -> Vec<Experience> {
        match self.load() {
            Ok(experiences) => experiences,
            Err(error) => {
                warn!(%error, "experience document unreadable, falling back to empty");
                Vec::new()
            }
        }
    }

    /// Write the whole document, pretty-printed UTF-8.
    pub fn save(&self, experiences: &[Experience]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(experiences)?;
        fs::write(&self.path, json)?;
        debug!(count = experiences.len(), path = %self.path.display(), "experience document saved");
        Ok(())
    }

    /// Validate and parse externally-supplied JSON before trusting it.
    ///
    /// Minimum shape: a top-level array whose entries each carry
    /// `creationDate` and `ingestions`.
    pub fn import_json(json: &str) -> Result<Vec<Experience>, StoreError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let entries = value
            .as_array()
            .ok_or_else(|| StoreError::InvalidImport("expected a top-level array".to_string()))?;
        for (i, entry) in entries.iter().enumerate() {
            if entry.get("creationDate").is_none() || entry.get("ingestions").is_none() {
                return Err(StoreError::InvalidImport(format!(
                    "entry {i} is missing creationDate or ingestions"
                )));
            }
        }
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_rejects_non_array() {
        let result = ExperienceStore::import_json(r#"{"title": "not a list"}"#);
        assert!(matches!(result, Err(StoreError::InvalidImport(_))));
    }

    #[test]
    fn test_import_rejects_entries_missing_required_fields() {
        let result = ExperienceStore::import_json(r#"[{"title": "no dates"}]"#);
        assert!(matches!(result, Err(StoreError::InvalidImport(_))));
    }

    #[test]
    fn test_import_accepts_minimal_entries() {
        let json = r#"[{
            "title": "Imported",
            "creationDate": 1700000000000,
            "sortDate": 1700000000000,
            "ingestions": []
        }]"#;
        let experiences = ExperienceStore::import_json(json).unwrap();
        assert_eq!(experiences.len(), 1);
        assert_eq!(experiences[0].title, "Imported");
    }
}
