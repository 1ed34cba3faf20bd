use anyhow::Context;
use bytes::Bytes;
use uuid::Uuid;

use crate::storage::StorageClient;

/// A file part received from a form.
#[derive(Debug, Clone)]
pub struct UploadItem {
    pub body: Bytes,
    pub content_type: String,
    pub file_name: Option<String>,
}

/// Store an uploaded photo under a generated name and return its key.
/// The client's file name only contributes the extension.
pub async fn store_image(storage: &dyn StorageClient, img: UploadItem) -> anyhow::Result<String> {
    anyhow::ensure!(!img.body.is_empty(), "empty upload");

    let ext = ext_from_mime(&img.content_type)
        .or_else(|| img.file_name.as_deref().and_then(ext_from_file_name))
        .unwrap_or("bin");
    let key = format!("{}.{}", Uuid::new_v4(), ext);

    storage
        .put_object(&key, img.body)
        .await
        .with_context(|| format!("put_object {}", key))?;
    Ok(key)
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}

fn ext_from_file_name(name: &str) -> Option<&'static str> {
    let (_, ext) = name.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("jpg"),
        "png" => Some("png"),
        "webp" => Some("webp"),
        "gif" => Some("gif"),
        "heic" => Some("heic"),
        _ => None,
    }
}

#[cfg(test)]
mod image_tests {
    use super::*;
    use crate::storage::LocalStorage;

    #[test]
    fn test_ext_from_mime() {
        assert_eq!(ext_from_mime("image/jpeg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/jpg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/png"), Some("png"));
        assert_eq!(ext_from_mime("image/webp"), Some("webp"));
        assert_eq!(ext_from_mime("image/heic"), Some("heic"));
        assert_eq!(ext_from_mime("application/octet-stream"), None);
        assert_eq!(ext_from_mime("whatever/else"), None);
    }

    #[test]
    fn test_ext_from_file_name() {
        assert_eq!(ext_from_file_name("me.JPEG"), Some("jpg"));
        assert_eq!(ext_from_file_name("../../etc/passwd"), None);
        assert_eq!(ext_from_file_name("noext"), None);
    }

    #[tokio::test]
    async fn same_file_name_never_collides() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "/uploads").await.unwrap();
        let item = |body: &'static [u8]| UploadItem {
            body: Bytes::from_static(body),
            content_type: "image/png".into(),
            file_name: Some("photo.png".into()),
        };

        let first = store_image(&storage, item(b"first")).await.unwrap();
        let second = store_image(&storage, item(b"second")).await.unwrap();

        assert_ne!(first, second);
        assert!(first.ends_with(".png"));
        assert_eq!(std::fs::read(dir.path().join(&first)).unwrap(), b"first");
        assert_eq!(std::fs::read(dir.path().join(&second)).unwrap(), b"second");
    }

    #[tokio::test]
    async fn empty_upload_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "/uploads").await.unwrap();
        let err = store_image(
            &storage,
            UploadItem {
                body: Bytes::new(),
                content_type: "image/png".into(),
                file_name: None,
            },
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("empty"));
    }
}
