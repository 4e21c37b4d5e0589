//! Uploaded files.

use bytes::Bytes;

/// A file uploaded with the request.
///
/// Contains the file metadata and content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// The form field name.
    pub name: Option<String>,
    /// The original file name from the client.
    pub file_name: Option<String>,
    /// The MIME type of the file as sent by the client.
    pub content_type: Option<String>,
    /// The file content as bytes.
    pub data: Bytes,
}

impl UploadedFile {
    /// Create a new uploaded file.
    #[must_use]
    pub fn new(
        name: Option<String>,
        file_name: Option<String>,
        content_type: Option<String>,
        data: Bytes,
    ) -> Self {
        Self {
            name,
            file_name,
            content_type,
            data,
        }
    }

    /// Get the form field name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Get the original file name.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Get the MIME type.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Get the file data as bytes.
    #[must_use]
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Get the file size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the file is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the file extension from the filename.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        self.file_name
            .as_ref()
            .and_then(|name| name.rsplit_once('.').map(|(_, ext)| ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uploaded_file() {
        let file = UploadedFile::new(
            Some("attach".into()),
            Some("file-small.txt".into()),
            Some("text/plain".into()),
            Bytes::from_static(b"I am a small file"),
        );

        assert_eq!(file.name(), Some("attach"));
        assert_eq!(file.file_name(), Some("file-small.txt"));
        assert_eq!(file.content_type(), Some("text/plain"));
        assert_eq!(file.len(), 17);
        assert!(!file.is_empty());
        assert_eq!(file.extension(), Some("txt"));
    }

    #[test]
    fn test_file_without_name() {
        let file = UploadedFile::new(None, None, None, Bytes::new());
        assert!(file.is_empty());
        assert_eq!(file.extension(), None);
    }
}
