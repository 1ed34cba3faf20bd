use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;

/// Where uploaded workout photos live. Keys are flat file names.
#[async_trait]
pub trait StorageClient: Send + Sync {
    async fn put_object(&self, key: &str, body: Bytes) -> anyhow::Result<()>;
    async fn delete_object(&self, key: &str) -> anyhow::Result<()>;
    /// Path the browser uses to fetch the object.
    fn public_url(&self, key: &str) -> String;
}

#[derive(Clone)]
pub struct LocalStorage {
    root: PathBuf,
    url_prefix: String,
}

impl LocalStorage {
    pub async fn new(root: impl Into<PathBuf>, url_prefix: &str) -> anyhow::Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .with_context(|| format!("create upload dir {}", root.display()))?;
        Ok(Self {
            root,
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
        })
    }

    fn object_path(&self, key: &str) -> anyhow::Result<PathBuf> {
        anyhow::ensure!(
            !key.is_empty() && !key.contains(&['/', '\\'][..]) && !key.starts_with('.'),
            "invalid object key {key:?}"
        );
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl StorageClient for LocalStorage {
    async fn put_object(&self, key: &str, body: Bytes) -> anyhow::Result<()> {
        let path = self.object_path(key)?;
        tokio::fs::write(&path, &body)
            .await
            .with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> anyhow::Result<()> {
        let path = self.object_path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("remove {}", path.display())),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.url_prefix, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_delete_object() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "/uploads/").await.unwrap();

        storage
            .put_object("a.png", Bytes::from_static(b"png"))
            .await
            .unwrap();
        assert_eq!(std::fs::read(dir.path().join("a.png")).unwrap(), b"png");
        assert_eq!(storage.public_url("a.png"), "/uploads/a.png");

        storage.delete_object("a.png").await.unwrap();
        assert!(!dir.path().join("a.png").exists());
        // deleting twice is fine
        storage.delete_object("a.png").await.unwrap();
    }

    #[tokio::test]
    async fn rejects_keys_that_escape_the_root() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "/uploads").await.unwrap();

        for key in ["../x.png", "sub/x.png", ".hidden", ""] {
            assert!(
                storage.put_object(key, Bytes::from_static(b"x")).await.is_err(),
                "{key:?} accepted"
            );
        }
    }
}
