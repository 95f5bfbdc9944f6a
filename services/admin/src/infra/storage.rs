use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::Context as _;
use uuid::Uuid;

use crate::domain::repository::BlobStore;
use crate::domain::types::{BlobBucket, Upload};
use crate::error::AdminServiceError;

/// Blob store on local (or mounted network) disks.
///
/// Public buckets live under `public_root`; the others under `network_root`,
/// which is resolved per request from settings.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    pub public_root: PathBuf,
    pub network_root: PathBuf,
}

impl LocalBlobStore {
    pub fn path(&self, bucket: BlobBucket, key: &str) -> PathBuf {
        let root = if bucket.is_public() {
            &self.public_root
        } else {
            &self.network_root
        };
        root.join(bucket.dir()).join(key)
    }
}

impl BlobStore for LocalBlobStore {
    async fn put(&self, bucket: BlobBucket, upload: &Upload) -> Result<String, AdminServiceError> {
        let ext = upload
            .extension()
            .ok_or_else(|| AdminServiceError::invalid("file", "must have a file extension"))?;
        let key = format!("{}.{ext}", Uuid::now_v7());
        let path = self.path(bucket, &key);
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("create blob directory {}", dir.display()))?;
        }
        tokio::fs::write(&path, &upload.bytes)
            .await
            .with_context(|| format!("write blob {}", path.display()))?;
        tracing::debug!(bucket = bucket.dir(), key = %key, size = upload.bytes.len(), "blob stored");
        Ok(key)
    }

    async fn delete(&self, bucket: BlobBucket, key: &str) -> Result<(), AdminServiceError> {
        // Keys are generated here; anything else never names a file of ours.
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Ok(());
        }
        let path = self.path(bucket, key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("remove blob {}", path.display()))
                .into()),
        }
    }
}
