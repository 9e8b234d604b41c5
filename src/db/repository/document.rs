use base64::Engine;
use chrono::Local;
use rusqlite::{params, Connection};
use sha2::{Digest, Sha256};

use crate::db::DatabaseError;
use crate::models::{Document, DocumentMeta};

/// Fingerprint of a document's raw bytes, used for dedup.
pub fn content_fingerprint(content: &[u8]) -> String {
    let hash = Sha256::digest(content);
    base64::engine::general_purpose::STANDARD.encode(hash)
}

/// Store an attachment for an application.
///
/// Returns false when byte-identical content already exists under the same
/// (application, doc_type): the dedup index turns the insert into a
/// committed no-op rather than an error, and callers surface "skipped
/// duplicate" to the user. Uploading against a missing application is
/// `NotFound`; any other failure is a storage error.
pub fn add_document(
    conn: &Connection,
    application_id: i64,
    filename: &str,
    mime_type: &str,
    content: &[u8],
    doc_type: &str,
) -> Result<bool, DatabaseError> {
    let hash = content_fingerprint(content);
    let result = conn.execute(
        "INSERT INTO documents
         (application_id, filename, mime_type, content, uploaded_at, doc_type, content_hash)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(application_id, doc_type, content_hash) DO NOTHING",
        params![
            application_id,
            filename,
            mime_type,
            content,
            Local::now().date_naive(),
            doc_type,
            hash,
        ],
    );

    let rows = match result {
        Ok(rows) => rows,
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
        {
            return Err(DatabaseError::NotFound {
                entity_type: "Application".into(),
                id: application_id,
            });
        }
        Err(e) => return Err(e.into()),
    };

    if rows == 0 {
        tracing::debug!(application_id, doc_type, "Skipped duplicate document upload");
    }
    Ok(rows > 0)
}

/// List an application's documents, newest first, without content blobs.
pub fn list_documents(
    conn: &Connection,
    application_id: i64,
) -> Result<Vec<DocumentMeta>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, filename, mime_type, doc_type, uploaded_at
         FROM documents
         WHERE application_id = ?1
         ORDER BY id DESC",
    )?;

    let rows = stmt.query_map([application_id], |row| {
        Ok(DocumentMeta {
            id: row.get(0)?,
            filename: row.get(1)?,
            mime_type: row.get(2)?,
            doc_type: row.get(3)?,
            uploaded_at: row.get(4)?,
        })
    })?;

    let mut docs = Vec::new();
    for row in rows {
        docs.push(row?);
    }
    Ok(docs)
}

/// Get a full document record, content included, for download.
pub fn get_document(conn: &Connection, id: i64) -> Result<Option<Document>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, application_id, filename, mime_type, doc_type, content,
                uploaded_at, content_hash
         FROM documents WHERE id = ?1",
    )?;

    let result = stmt.query_row([id], |row| {
        Ok(Document {
            id: row.get(0)?,
            application_id: row.get(1)?,
            filename: row.get(2)?,
            mime_type: row.get(3)?,
            doc_type: row.get(4)?,
            content: row.get(5)?,
            uploaded_at: row.get(6)?,
            content_hash: row.get(7)?,
        })
    });

    match result {
        Ok(doc) => Ok(Some(doc)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Delete one document. Returns false when the id does not exist.
pub fn delete_document(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let rows = conn.execute("DELETE FROM documents WHERE id = ?1", [id])?;
    Ok(rows > 0)
}

/// Delete every document of a type for an application except the kept id.
/// Backs the "only the latest resume is retained" rule; returns how many
/// rows were removed.
pub fn delete_documents_by_type_except(
    conn: &Connection,
    application_id: i64,
    doc_type: &str,
    keep_id: i64,
) -> Result<usize, DatabaseError> {
    let rows = conn.execute(
        "DELETE FROM documents
         WHERE application_id = ?1 AND doc_type = ?2 AND id <> ?3",
        params![application_id, doc_type, keep_id],
    )?;
    if rows > 0 {
        tracing::info!(
            application_id,
            doc_type,
            removed = rows,
            "Pruned older documents of type"
        );
    }
    Ok(rows)
}

/// Newest document id of a type for an application, if any.
pub fn latest_document_id_by_type(
    conn: &Connection,
    application_id: i64,
    doc_type: &str,
) -> Result<Option<i64>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id FROM documents
         WHERE application_id = ?1 AND doc_type = ?2
         ORDER BY id DESC LIMIT 1",
    )?;

    match stmt.query_row(params![application_id, doc_type], |row| row.get(0)) {
        Ok(id) => Ok(Some(id)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
