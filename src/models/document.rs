use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A binary attachment owned by exactly one application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub application_id: i64,
    pub filename: String,
    pub mime_type: String,
    pub doc_type: String,
    pub content: Vec<u8>,
    pub uploaded_at: NaiveDate,
    pub content_hash: String,
}

/// Listing row for an application's documents, without the content blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub id: i64,
    pub filename: String,
    pub mime_type: String,
    pub doc_type: String,
    pub uploaded_at: NaiveDate,
}
