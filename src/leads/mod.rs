//! Lead working set and document intake

pub mod document;
pub mod store;

pub use document::{
    DocumentExtractor, DocumentUpload, ExtractedLead, MockDocumentExtractor, DOCX_MIME, PDF_MIME,
};
pub use store::{LeadCounts, LeadStore, StatusFilter};
