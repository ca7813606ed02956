use std::path::PathBuf;

use anyhow::Context;
use axum::async_trait;
use bytes::Bytes;

/// Where validated uploads end up. The records only keep a path string back to
/// the stored file, so deleting a record leaves the file behind.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn save(&self, filename: &str, body: Bytes) -> anyhow::Result<()>;
}

/// Local-disk storage under the configured upload directory, which is also
/// served publicly at `/uploads`.
#[derive(Clone)]
pub struct DiskStorage {
    root: PathBuf,
}

impl DiskStorage {
    pub async fn new(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .with_context(|| format!("create upload dir {}", root.display()))?;
        Ok(Self { root })
    }
}

#[async_trait]
impl Storage for DiskStorage {
    async fn save(&self, filename: &str, body: Bytes) -> anyhow::Result<()> {
        let path = self.root.join(filename);
        tokio::fs::write(&path, &body)
            .await
            .with_context(|| format!("write upload {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_writes_file_under_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = DiskStorage::new(dir.path()).await.expect("storage");

        storage
            .save("project-1-2.jpg", Bytes::from_static(b"fake image bytes"))
            .await
            .expect("save");

        let written = std::fs::read(dir.path().join("project-1-2.jpg")).expect("read back");
        assert_eq!(written, b"fake image bytes");
    }

    #[tokio::test]
    async fn new_creates_missing_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("a/b/uploads");
        DiskStorage::new(&nested).await.expect("storage");
        assert!(nested.is_dir());
    }
}
