//! Image files queued for multipart upload.

use std::path::Path;

use thiserror::Error;

/// Image types the backend accepts, by extension.
const ACCEPTED: &[(&str, &str)] = &[
    ("jpeg", "image/jpeg"),
    ("jpg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
];

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("unsupported image type for {0} (expected .jpeg, .jpg, .png or .gif)")]
    UnsupportedType(String),
    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// One image file, held in memory so a request can be replayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    file_name: String,
    mime: &'static str,
    bytes: Vec<u8>,
}

impl Upload {
    /// Wrap in-memory image bytes.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::UnsupportedType` unless the name ends in an accepted extension.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, UploadError> {
        let file_name = file_name.into();
        let mime = mime_for(&file_name).ok_or_else(|| UploadError::UnsupportedType(file_name.clone()))?;
        Ok(Self {
            file_name,
            mime,
            bytes,
        })
    }

    /// Read an image from disk.
    ///
    /// # Errors
    ///
    /// Returns `UploadError` if the type is not accepted or the file cannot be read.
    pub async fn from_path(path: &Path) -> Result<Self, UploadError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        // Check the type before touching the disk.
        mime_for(&file_name).ok_or_else(|| UploadError::UnsupportedType(path.display().to_string()))?;

        let bytes = tokio::fs::read(path).await.map_err(|source| UploadError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::new(file_name, bytes)
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub const fn mime(&self) -> &'static str {
        self.mime
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub(crate) fn to_part(&self) -> Result<reqwest::multipart::Part, reqwest::Error> {
        reqwest::multipart::Part::bytes(self.bytes.clone())
            .file_name(self.file_name.clone())
            .mime_str(self.mime)
    }
}

fn mime_for(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();
    ACCEPTED
        .iter()
        .find(|(accepted, _)| *accepted == ext)
        .map(|(_, mime)| *mime)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_types() {
        assert_eq!(Upload::new("front.JPG", vec![1]).unwrap().mime(), "image/jpeg");
        assert_eq!(Upload::new("a.jpeg", vec![1]).unwrap().mime(), "image/jpeg");
        assert_eq!(Upload::new("b.png", vec![1]).unwrap().mime(), "image/png");
        assert_eq!(Upload::new("c.gif", vec![1]).unwrap().mime(), "image/gif");
    }

    #[test]
    fn test_rejected_types() {
        assert!(matches!(
            Upload::new("notes.txt", vec![]),
            Err(UploadError::UnsupportedType(_))
        ));
        assert!(Upload::new("no-extension", vec![]).is_err());
        assert!(Upload::new("photo.webp", vec![]).is_err());
    }

    #[tokio::test]
    async fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("banner.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let upload = Upload::from_path(&path).await.unwrap();
        assert_eq!(upload.file_name(), "banner.png");
        assert_eq!(upload.len(), 4);
    }

    #[tokio::test]
    async fn test_from_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Upload::from_path(&dir.path().join("gone.jpg")).await;
        assert!(matches!(result, Err(UploadError::Read { .. })));
    }

    #[test]
    fn test_to_part() {
        assert!(Upload::new("a.png", vec![1, 2, 3]).unwrap().to_part().is_ok());
    }
}
