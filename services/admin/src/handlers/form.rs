//! `multipart/form-data` bodies: text fields plus uploaded files.

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::domain::types::Upload;
use crate::error::AdminServiceError;

/// A fully-read multipart body.
///
/// File parts without a file name or content (an empty file input) are
/// dropped, so "no file chosen" reads the same as the field being absent.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, Upload>,
}

impl FormData {
    pub async fn read(mut multipart: Multipart) -> Result<Self, AdminServiceError> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await.map_err(|e| {
            tracing::debug!(error = %e, "invalid multipart body");
            AdminServiceError::MalformedRequest
        })? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };
            match field.file_name().map(str::to_owned) {
                Some(file_name) => {
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|_| AdminServiceError::MalformedRequest)?;
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    form.files.insert(name, Upload { file_name, bytes });
                }
                None => {
                    let value = field
                        .text()
                        .await
                        .map_err(|_| AdminServiceError::MalformedRequest)?;
                    form.fields.insert(name, value);
                }
            }
        }
        Ok(form)
    }

    /// Text field as sent; `None` when absent.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }

    /// Checkbox-style field: `true`, `1` or `on`.
    pub fn flag(&self, name: &str) -> bool {
        matches!(
            self.fields.get(name).map(|v| v.trim().to_ascii_lowercase()).as_deref(),
            Some("true" | "1" | "on")
        )
    }

    pub fn take_file(&mut self, name: &str) -> Option<Upload> {
        self.files.remove(name)
    }
}
