//! Blob storage seam for uploaded brand logos.

use crate::error::ApiError;

/// Uploads larger than this are refused before reaching storage.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "gif", "webp", "svg", "avif"];

/// Raw image payload taken from a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn validate(&self) -> Result<(), StorageError> {
        if self.bytes.is_empty() {
            return Err(StorageError::Rejected("image is empty".to_string()));
        }
        if self.bytes.len() > MAX_IMAGE_BYTES {
            return Err(StorageError::Rejected(format!(
                "image exceeds {} bytes",
                MAX_IMAGE_BYTES
            )));
        }

        let declared_image = self
            .content_type
            .as_deref()
            .map(|value| value.to_ascii_lowercase().starts_with("image/"));
        let extension_is_image = self
            .extension()
            .map(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false);

        match declared_image {
            Some(true) => Ok(()),
            Some(false) => Err(StorageError::Rejected(
                "uploaded file is not an image".to_string(),
            )),
            None if extension_is_image => Ok(()),
            None => Err(StorageError::Rejected(
                "uploaded file is not an image".to_string(),
            )),
        }
    }

    pub fn extension(&self) -> Option<String> {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }
}

/// Location of a stored image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub key: String,
    pub public_url: String,
}

/// Stored bytes served back by the media endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Storage abstraction for uploaded logos.
pub trait ImageStore: Send + Sync {
    fn put(&self, upload: &ImageUpload) -> Result<StoredImage, StorageError>;
    fn delete(&self, key: &str) -> Result<(), StorageError>;
    fn get(&self, key: &str) -> Result<Option<StoredObject>, StorageError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("{0}")]
    Rejected(String),
    #[error("object {0} not found")]
    Missing(String),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<StorageError> for ApiError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::Rejected(message) => ApiError::Validation(message),
            StorageError::Missing(key) => ApiError::not_found(format!("object {key} not found")),
            StorageError::Unavailable(_) => ApiError::dependency(value),
        }
    }
}

/// Turn an uploaded file name into a storage-safe slug.
pub fn sanitize_file_name(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = false;
    for ch in name.trim().chars() {
        if ch == '.' {
            if last_dash {
                slug.pop();
            }
            slug.push('.');
            last_dash = false;
        } else if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash && !slug.is_empty() {
            slug.push('-');
            last_dash = true;
        }
    }
    let slug = slug.trim_matches(|ch| ch == '-' || ch == '.').to_string();
    if slug.is_empty() {
        "upload".to_string()
    } else {
        slug
    }
}
