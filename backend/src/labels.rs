//! On-disk label image storage, one PNG per tote.

use std::path::{Path, PathBuf};

use shared::endpoints::LABEL_EXTENSION;

#[derive(Debug, thiserror::Error)]
pub enum LabelError {
    #[error("label storage error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct LabelStore {
    dir: PathBuf,
}

impl LabelStore {
    /// Use `dir`, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, LabelError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, tote_id: &str) -> PathBuf {
        self.dir
            .join(format!("{}{}", sanitize_tote_id(tote_id), LABEL_EXTENSION))
    }

    pub async fn save(&self, tote_id: &str, bytes: &[u8]) -> Result<(), LabelError> {
        tokio::fs::write(self.path_for(tote_id), bytes).await?;
        Ok(())
    }

    /// `None` when no label has been uploaded for the tote.
    pub async fn load(&self, tote_id: &str) -> Result<Option<Vec<u8>>, LabelError> {
        match tokio::fs::read(self.path_for(tote_id)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

/// Reduce a tote id to a safe file stem: path separators, NUL and other
/// control characters are dropped, and dot-only names are replaced.
pub fn sanitize_tote_id(tote_id: &str) -> String {
    let clean: String = tote_id
        .chars()
        .filter(|c| *c != '/' && *c != '\\' && !c.is_control())
        .collect();
    let clean = clean.trim().to_string();

    if clean.is_empty() || clean.chars().all(|c| c == '.') {
        "unnamed_tote".to_string()
    } else {
        clean
    }
}
