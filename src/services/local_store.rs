use std::path::{Path, PathBuf};
use tokio::fs;

/// Writes ingested content into a single local directory.
///
/// The directory is created on demand and an existing file with the same
/// name is silently overwritten; concurrent writers race and the last one
/// wins. Files are never deleted here, lifecycle is managed externally.
pub struct LocalStore {
    directory: PathBuf,
}

impl LocalStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Persists `content` under `filename`, returning the full path.
    pub async fn save(&self, content: &[u8], filename: &str) -> std::io::Result<PathBuf> {
        fs::create_dir_all(&self.directory).await?;

        let path = self.directory.join(filename);
        fs::write(&path, content).await?;

        Ok(path)
    }
}
