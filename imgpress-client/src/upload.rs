use std::path::Path;

use image::ImageFormat;

/// A file picked for upload but not sent yet
#[derive(Clone)]
pub struct PendingUpload {
    original_name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

impl std::fmt::Debug for PendingUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingUpload")
            .field("original_name", &self.original_name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// What the upload form shows about the selected file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDetails {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
}

impl PendingUpload {
    /// Wrap in-memory bytes, guessing the type from content then name
    pub fn from_bytes(
        original_name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        let original_name = original_name.into();
        let mime_type = image::guess_format(&bytes)
            .ok()
            .or_else(|| ImageFormat::from_path(&original_name).ok())
            .map(|format| format.to_mime_type().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        Self {
            original_name,
            mime_type,
            bytes,
        }
    }

    /// Read a file from disk
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::from_bytes(name, bytes))
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// File name without its extension, the default display name
    pub fn stem(&self) -> &str {
        Path::new(&self.original_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.original_name)
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn details(&self) -> FileDetails {
        FileDetails {
            name: self.original_name.clone(),
            mime_type: self.mime_type.clone(),
            size: self.size(),
        }
    }
}
