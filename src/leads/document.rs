//! Document upload and lead extraction
//!
//! Real extraction is an external service; [`MockDocumentExtractor`] stands
//! in for it by waiting a fixed delay and returning a fixed record.

use crate::errors::{LeadError, Result};
use crate::types::{LeadSource, NewLead};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// MIME type of PDF documents
pub const PDF_MIME: &str = "application/pdf";

/// MIME type of OOXML word-processing documents (.docx)
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Fallback MIME type for unknown extensions
pub const UNKNOWN_MIME: &str = "application/octet-stream";

/// Accepted upload types
pub const ACCEPTED_MIME_TYPES: [&str; 2] = [PDF_MIME, DOCX_MIME];

/// Simulated processing time
pub const DEFAULT_PROCESSING_DELAY: Duration = Duration::from_secs(2);

/// An uploaded file as the extractor sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    pub file_name: String,
    pub mime_type: String,
}

impl DocumentUpload {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Describe a file on disk, inferring the MIME type from its extension
    pub fn from_path(path: &Path) -> Self {
        let mime_type = match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("pdf") => PDF_MIME,
            Some("docx") => DOCX_MIME,
            _ => UNKNOWN_MIME,
        };

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self::new(file_name, mime_type)
    }

    /// Describe an existing file on disk
    ///
    /// Missing paths fail with an I/O error, directories with a validation error.
    pub fn open(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(LeadError::Validation(format!(
                "{} is not a file",
                path.display()
            )));
        }
        Ok(Self::from_path(path))
    }

    pub fn is_supported(&self) -> bool {
        ACCEPTED_MIME_TYPES.contains(&self.mime_type.as_str())
    }

    /// Reject anything but PDF and DOCX
    pub fn ensure_supported(&self) -> Result<()> {
        if self.is_supported() {
            Ok(())
        } else {
            Err(LeadError::UnsupportedDocument {
                mime_type: self.mime_type.clone(),
            })
        }
    }
}

/// Lead fields pulled out of a document, for review before submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedLead {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl ExtractedLead {
    /// Prefill a candidate lead sourced from a document
    pub fn into_new_lead(self) -> NewLead {
        NewLead {
            name: self.name,
            email: self.email,
            phone: Some(self.phone).filter(|p| !p.trim().is_empty()),
            source: LeadSource::Document,
        }
    }
}

/// Pulls lead information out of an uploaded document
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract(&self, upload: &DocumentUpload) -> Result<ExtractedLead>;
}

/// Stand-in extractor returning a fixed record after a delay
#[derive(Debug, Clone)]
pub struct MockDocumentExtractor {
    delay: Duration,
}

impl MockDocumentExtractor {
    pub fn new() -> Self {
        Self::with_delay(DEFAULT_PROCESSING_DELAY)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for MockDocumentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentExtractor for MockDocumentExtractor {
    async fn extract(&self, upload: &DocumentUpload) -> Result<ExtractedLead> {
        if let Err(e) = upload.ensure_supported() {
            warn!(file = %upload.file_name, mime = %upload.mime_type, "rejected document upload");
            return Err(e);
        }

        tokio::time::sleep(self.delay).await;

        info!(file = %upload.file_name, "document processed");
        Ok(ExtractedLead {
            name: "John Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            phone: "+1 (555) 123-4567".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Instant;

    #[test]
    fn test_mime_from_extension() {
        let pdf = DocumentUpload::from_path(&PathBuf::from("/tmp/Card.PDF"));
        assert_eq!(pdf.mime_type, PDF_MIME);
        assert_eq!(pdf.file_name, "Card.PDF");

        let docx = DocumentUpload::from_path(&PathBuf::from("lead.docx"));
        assert_eq!(docx.mime_type, DOCX_MIME);

        let png = DocumentUpload::from_path(&PathBuf::from("photo.png"));
        assert_eq!(png.mime_type, UNKNOWN_MIME);
        assert!(!png.is_supported());
    }

    #[test]
    fn test_open_requires_existing_file() {
        let missing = DocumentUpload::open(Path::new("/definitely/not/here/card.pdf"));
        assert!(matches!(missing.unwrap_err(), LeadError::IoError(_)));

        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            DocumentUpload::open(dir.path()).unwrap_err(),
            LeadError::Validation(_)
        ));

        let file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        let upload = DocumentUpload::open(file.path()).unwrap();
        assert_eq!(upload.mime_type, PDF_MIME);
    }

    #[test]
    fn test_extracted_into_new_lead() {
        let extracted = ExtractedLead {
            name: "John Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            phone: String::new(),
        };
        let lead = extracted.into_new_lead();

        assert_eq!(lead.source, LeadSource::Document);
        assert!(lead.phone.is_none());
    }

    #[tokio::test]
    async fn test_mock_extracts_fixed_record() {
        let extractor = MockDocumentExtractor::with_delay(Duration::from_millis(20));
        let upload = DocumentUpload::new("lead.pdf", PDF_MIME);

        let start = Instant::now();
        let extracted = extractor.extract(&upload).await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(20));
        assert_eq!(extracted.name, "John Doe");
        assert_eq!(extracted.email, "john.doe@example.com");
        assert_eq!(extracted.phone, "+1 (555) 123-4567");
    }

    #[tokio::test]
    async fn test_mock_rejects_other_types_without_waiting() {
        let extractor = MockDocumentExtractor::with_delay(Duration::from_secs(30));
        let upload = DocumentUpload::new("notes.txt", "text/plain");

        let result = extractor.extract(&upload).await;
        assert!(matches!(
            result.unwrap_err(),
            LeadError::UnsupportedDocument { .. }
        ));
    }

    #[test]
    fn test_default_delay() {
        assert_eq!(MockDocumentExtractor::default().delay(), Duration::from_secs(2));
    }
}
