//! Multipart form data loading.
//!
//! `multipart/form-data` bodies are read asynchronously: file parts become
//! [`UploadedFile`] values in the files bag, text parts go to the body bag.
//! Part names use the same bracket syntax as query strings, so `attach[]`
//! collects several files into a list.

use std::{fmt, io};

use bytes::Bytes;
use tessera_core::{BagId, UploadedFile, Value, ValueMap};
use tracing::debug;

use crate::query::insert_pair;
use crate::{ExtractionError, ParameterBag};

/// Limits applied while loading a multipart body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultipartConfig {
    /// Largest accepted body, in bytes.
    pub max_body_size: usize,
    /// Largest accepted part, in bytes.
    pub max_field_size: usize,
    /// Most parts accepted.
    pub max_fields: usize,
}

impl Default for MultipartConfig {
    fn default() -> Self {
        Self {
            max_body_size: 50 * 1024 * 1024,
            max_field_size: 10 * 1024 * 1024,
            max_fields: 100,
        }
    }
}

impl MultipartConfig {
    /// Creates the default limits: 50 MiB body, 10 MiB per part, 100 parts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the body limit.
    #[must_use]
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }

    /// Sets the per-part limit.
    #[must_use]
    pub fn max_field_size(mut self, size: usize) -> Self {
        self.max_field_size = size;
        self
    }

    /// Sets the part count limit.
    #[must_use]
    pub fn max_fields(mut self, count: usize) -> Self {
        self.max_fields = count;
        self
    }
}

/// Bags read from a multipart body.
#[derive(Debug, Clone, Default)]
pub struct MultipartBags {
    /// File parts, keyed by part name.
    pub files: ParameterBag,
    /// Text parts, keyed by part name.
    pub fields: ParameterBag,
}

/// A multipart body waiting to be split into bags.
pub struct Multipart {
    parts: multer::Multipart<'static>,
    config: MultipartConfig,
}

impl fmt::Debug for Multipart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Multipart")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Multipart {
    /// Prepares `body` for loading, taking the boundary from `content_type`.
    ///
    /// # Errors
    ///
    /// Fails when the content type carries no boundary or the body is over
    /// the size limit.
    pub fn new(
        content_type: Option<&str>,
        body: Bytes,
        config: MultipartConfig,
    ) -> Result<Self, ExtractionError> {
        let boundary = content_type
            .and_then(|ct| multer::parse_boundary(ct).ok())
            .ok_or_else(|| {
                ExtractionError::unsupported_media_type("multipart/form-data", content_type)
            })?;

        if body.len() > config.max_body_size {
            return Err(ExtractionError::payload_too_large(
                config.max_body_size,
                body.len(),
            ));
        }

        let stream = futures_util::stream::once(async move { Ok::<_, io::Error>(body) });
        Ok(Self {
            parts: multer::Multipart::new(stream, boundary),
            config,
        })
    }

    /// Reads every part. Parts without a name are skipped.
    ///
    /// # Errors
    ///
    /// Fails on malformed input, a text part that is not UTF-8, or a limit
    /// being exceeded.
    pub async fn load(mut self) -> Result<MultipartBags, ExtractionError> {
        let mut files = ValueMap::new();
        let mut fields = ValueMap::new();
        let mut count = 0_usize;

        while let Some(part) = self.parts.next_field().await.map_err(malformed)? {
            count += 1;
            if count > self.config.max_fields {
                return Err(ExtractionError::too_many_fields(self.config.max_fields));
            }

            let Some(name) = part.name().map(str::to_owned) else {
                continue;
            };
            let file_name = part.file_name().map(str::to_owned);
            let content_type = part.content_type().map(ToString::to_string);
            let data = part.bytes().await.map_err(malformed)?;
            if data.len() > self.config.max_field_size {
                return Err(ExtractionError::payload_too_large(
                    self.config.max_field_size,
                    data.len(),
                ));
            }

            debug!(part = %name, size = data.len(), file = file_name.is_some(), "multipart part read");

            if file_name.is_some() {
                let file = UploadedFile::new(Some(name.clone()), file_name, content_type, data);
                insert_pair(&mut files, &name, Value::File(file));
            } else {
                let text = String::from_utf8(data.to_vec()).map_err(|e| {
                    ExtractionError::malformed(BagId::Body, format!("part \"{name}\" is not valid UTF-8: {e}"))
                })?;
                insert_pair(&mut fields, &name, Value::String(text));
            }
        }

        Ok(MultipartBags {
            files: ParameterBag::from(files),
            fields: ParameterBag::from(fields),
        })
    }
}

fn malformed(error: multer::Error) -> ExtractionError {
    ExtractionError::malformed(BagId::Files, format!("multipart parse error: {error}"))
}
