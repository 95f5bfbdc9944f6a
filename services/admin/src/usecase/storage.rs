use hrdesk_core::validation::FieldErrors;

use crate::domain::repository::BlobStore;
use crate::domain::types::{BlobBucket, BlobRef, Upload};
use crate::error::AdminServiceError;

/// Blobs written during one operation, removed again if the operation fails.
pub struct StagedBlobs<'a, S: BlobStore> {
    store: &'a S,
    stored: Vec<BlobRef>,
}

impl<'a, S: BlobStore> StagedBlobs<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            stored: Vec::new(),
        }
    }

    /// Store `upload` if present. A failure rolls back everything staged so far.
    pub async fn put(
        &mut self,
        bucket: BlobBucket,
        upload: Option<&Upload>,
    ) -> Result<Option<String>, AdminServiceError> {
        let Some(upload) = upload else {
            return Ok(None);
        };
        match self.store.put(bucket, upload).await {
            Ok(key) => {
                self.stored.push(BlobRef::new(bucket, &key));
                Ok(Some(key))
            }
            Err(e) => {
                self.rollback().await;
                Err(e)
            }
        }
    }

    pub async fn rollback(&mut self) {
        discard_blobs(self.store, self.stored.drain(..)).await;
    }
}

/// Remove blobs that nothing references any more. Failures are logged and skipped.
pub async fn discard_blobs<S, I>(store: &S, blobs: I)
where
    S: BlobStore,
    I: IntoIterator<Item = BlobRef>,
{
    for blob in blobs {
        if let Err(e) = store.delete(blob.bucket, &blob.key).await {
            tracing::warn!(
                error = ?e,
                bucket = blob.bucket.dir(),
                key = %blob.key,
                "failed to remove blob"
            );
        }
    }
}

/// Record a field error when `upload` is present but not an acceptable image.
pub fn check_upload(errors: &mut FieldErrors, field: &str, upload: Option<&Upload>) {
    if let Some(Err(message)) = upload.map(Upload::check_image) {
        errors.add(field, message);
    }
}
