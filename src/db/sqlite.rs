use std::path::Path;

use rusqlite::{params, Connection};

use super::repository::content_fingerprint;
use super::DatabaseError;

/// Open a SQLite connection to the given path and bootstrap the schema
pub fn open_database(path: &Path) -> Result<Connection, DatabaseError> {
    let conn = Connection::open(path)?;
    configure_pragmas(&conn)?;
    bootstrap_schema(&conn)?;
    Ok(conn)
}

/// Open an in-memory database (for testing)
pub fn open_memory_database() -> Result<Connection, DatabaseError> {
    let conn = Connection::open_in_memory()?;
    configure_pragmas(&conn)?;
    bootstrap_schema(&conn)?;
    Ok(conn)
}

fn configure_pragmas(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(
        "PRAGMA journal_mode=DELETE;
         PRAGMA foreign_keys=ON;",
    )?;
    Ok(())
}

/// Apply the schema, idempotently. Safe to run on every startup against
/// an existing database: creates missing tables and indexes, adds the
/// columns that postdate the base schema, and fingerprints legacy
/// document rows before the dedup index is created.
pub fn bootstrap_schema(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS applications (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            company TEXT NOT NULL,
            role TEXT NOT NULL,
            location TEXT,
            job_url TEXT,
            source TEXT,
            status TEXT NOT NULL,
            applied_date TEXT,
            followup_date TEXT,
            salary TEXT,
            contact TEXT,
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS documents (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            application_id INTEGER NOT NULL REFERENCES applications(id) ON DELETE CASCADE,
            filename TEXT NOT NULL,
            mime_type TEXT NOT NULL,
            content BLOB NOT NULL,
            uploaded_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS profile (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            label TEXT NOT NULL UNIQUE,
            application_id INTEGER REFERENCES applications(id),
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS settings (
            profile_id INTEGER NOT NULL REFERENCES profile(id) ON DELETE CASCADE,
            setting_key TEXT NOT NULL,
            setting_value TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE(profile_id, setting_key)
        );

        CREATE INDEX IF NOT EXISTS idx_applications_status ON applications(status);
        CREATE INDEX IF NOT EXISTS idx_documents_application ON documents(application_id);
        "#,
    )
    .map_err(|e| DatabaseError::SchemaBootstrap {
        reason: e.to_string(),
    })?;

    // Columns added after the base schema. An existing database migrates
    // in place; a fresh one grows them immediately after table creation.
    for (table, column, ddl) in [
        ("applications", "work_model", "work_model TEXT"),
        ("applications", "salary_range", "salary_range TEXT"),
        ("applications", "interview_stage", "interview_stage TEXT"),
        ("applications", "interview_date", "interview_date TEXT"),
        ("applications", "next_action", "next_action TEXT"),
        ("applications", "next_action_date", "next_action_date TEXT"),
        ("applications", "priority", "priority TEXT"),
        ("applications", "company_research", "company_research TEXT"),
        ("applications", "phone_screen_notes", "phone_screen_notes TEXT"),
        (
            "documents",
            "doc_type",
            "doc_type TEXT NOT NULL DEFAULT 'Document'",
        ),
        (
            "documents",
            "content_hash",
            "content_hash TEXT NOT NULL DEFAULT ''",
        ),
    ] {
        ensure_column(conn, table, column, ddl)?;
    }

    // Fingerprints must exist on every row before the dedup index can hold.
    backfill_content_hashes(conn)?;

    conn.execute_batch(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_documents_dedup
         ON documents(application_id, doc_type, content_hash);",
    )
    .map_err(|e| DatabaseError::SchemaBootstrap {
        reason: e.to_string(),
    })?;

    Ok(())
}

/// Add a column when the table does not already have it.
fn ensure_column(
    conn: &Connection,
    table: &str,
    column: &str,
    ddl: &str,
) -> Result<(), DatabaseError> {
    let present = conn
        .prepare(&format!("SELECT {column} FROM {table} LIMIT 0"))
        .is_ok();
    if !present {
        tracing::info!(table, column, "Adding column to existing schema");
        conn.execute_batch(&format!("ALTER TABLE {table} ADD COLUMN {ddl}"))
            .map_err(|e| DatabaseError::SchemaBootstrap {
                reason: format!("add {table}.{column}: {e}"),
            })?;
    }
    Ok(())
}

/// Fingerprint document rows that predate the content_hash column.
/// Runs in one transaction so a partial backfill is never persisted.
fn backfill_content_hashes(conn: &Connection) -> Result<(), DatabaseError> {
    let tx = conn.unchecked_transaction()?;

    let rows: Vec<(i64, Vec<u8>)> = {
        let mut stmt = tx.prepare("SELECT id, content FROM documents WHERE content_hash = ''")?;
        let collected = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        collected
    };

    let count = rows.len();
    for (id, content) in rows {
        tx.execute(
            "UPDATE documents SET content_hash = ?1 WHERE id = ?2",
            params![content_fingerprint(&content), id],
        )?;
    }

    tx.commit()?;
    if count > 0 {
        tracing::info!(rows = count, "Backfilled document content fingerprints");
    }
    Ok(())
}

/// Count tables in the database (for verification)
pub fn count_tables(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get::<_, i64>(0),
    )?;
    Ok(count)
}
