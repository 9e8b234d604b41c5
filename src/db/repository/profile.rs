use chrono::{Local, NaiveDate};
use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::{ApplicationStatus, ProfileIds, Setting};

/// Fixed lookup label for the singleton profile row.
const PROFILE_LABEL: &str = "PROFILE";

/// Look up the singleton profile, creating it (and its anchor application
/// row) on first call. Idempotent: repeated calls return the same ids.
///
/// Runs in one transaction. Concurrent first calls race at the UNIQUE
/// label constraint — the loser's insert is a no-op and the follow-up
/// lookup reads the winner's row.
pub fn ensure_profile(conn: &Connection) -> Result<ProfileIds, DatabaseError> {
    let tx = conn.unchecked_transaction()?;
    let today = Local::now().date_naive();

    tx.execute(
        "INSERT INTO profile (label, created_at) VALUES (?1, ?2)
         ON CONFLICT(label) DO NOTHING",
        params![PROFILE_LABEL, today],
    )?;

    let (profile_id, application_id): (i64, Option<i64>) = tx.query_row(
        "SELECT id, application_id FROM profile WHERE label = ?1",
        [PROFILE_LABEL],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    let application_id = match application_id {
        Some(id) => id,
        None => {
            // Anchor row so profile-scoped documents always have an owner.
            tx.execute(
                "INSERT INTO applications (company, role, status, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    "(Profile)",
                    "Resume",
                    ApplicationStatus::Saved.as_str(),
                    today,
                    today,
                ],
            )?;
            let app_id = tx.last_insert_rowid();
            tx.execute(
                "UPDATE profile SET application_id = ?1 WHERE id = ?2",
                params![app_id, profile_id],
            )?;
            tracing::info!(
                profile_id,
                application_id = app_id,
                "Created profile and anchor application"
            );
            app_id
        }
    };

    tx.commit()?;
    Ok(ProfileIds {
        profile_id,
        application_id,
    })
}

/// Get a profile setting by key. Returns None if not set; the caller
/// supplies its own default.
pub fn get_setting(
    conn: &Connection,
    profile_id: i64,
    key: &str,
) -> Result<Option<serde_json::Value>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT setting_value FROM settings WHERE profile_id = ?1 AND setting_key = ?2",
    )?;

    let raw = match stmt.query_row(params![profile_id, key], |row| row.get::<_, String>(0)) {
        Ok(raw) => raw,
        Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let value = serde_json::from_str(&raw)
        .map_err(|e| DatabaseError::ConstraintViolation(format!("Invalid JSON in setting {key}: {e}")))?;
    Ok(Some(value))
}

/// All settings of a profile as full rows, ordered by key.
pub fn list_settings(conn: &Connection, profile_id: i64) -> Result<Vec<Setting>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT profile_id, setting_key, setting_value, updated_at
         FROM settings WHERE profile_id = ?1
         ORDER BY setting_key",
    )?;

    let rows = stmt.query_map([profile_id], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, NaiveDate>(3)?,
        ))
    })?;

    let mut settings = Vec::new();
    for row in rows {
        let (profile_id, key, raw, updated_at) = row?;
        let value = serde_json::from_str(&raw)
            .map_err(|e| DatabaseError::ConstraintViolation(format!("Invalid JSON in setting {key}: {e}")))?;
        settings.push(Setting {
            profile_id,
            key,
            value,
            updated_at,
        });
    }
    Ok(settings)
}

/// Set a profile setting (upsert). Overwrites value and updated_at.
pub fn set_setting(
    conn: &Connection,
    profile_id: i64,
    key: &str,
    value: &serde_json::Value,
) -> Result<(), DatabaseError> {
    let raw = serde_json::to_string(value)
        .map_err(|e| DatabaseError::ConstraintViolation(format!("Invalid JSON in setting {key}: {e}")))?;

    conn.execute(
        "INSERT INTO settings (profile_id, setting_key, setting_value, updated_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(profile_id, setting_key)
         DO UPDATE SET setting_value = ?3, updated_at = ?4",
        params![profile_id, key, raw, Local::now().date_naive()],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn test_db() -> Connection {
        open_memory_database().unwrap()
    }

    #[test]
    fn ensure_profile_is_idempotent() {
        let conn = test_db();
        let first = ensure_profile(&conn).unwrap();
        let second = ensure_profile(&conn).unwrap();
        assert_eq!(first, second);

        let profiles: i64 = conn
            .query_row("SELECT COUNT(*) FROM profile", [], |row| row.get(0))
            .unwrap();
        assert_eq!(profiles, 1);
    }

    #[test]
    fn anchor_application_row_is_real() {
        let conn = test_db();
        let ids = ensure_profile(&conn).unwrap();

        let (company, role, status): (String, String, String) = conn
            .query_row(
                "SELECT company, role, status FROM applications WHERE id = ?1",
                [ids.application_id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert_eq!(company, "(Profile)");
        assert_eq!(role, "Resume");
        assert_eq!(status, "Saved");
    }

    #[test]
    fn ensure_profile_relinks_a_missing_anchor() {
        let conn = test_db();
        let first = ensure_profile(&conn).unwrap();

        // Simulate an older database where the profile row exists but was
        // never linked to an anchor application.
        conn.execute("UPDATE profile SET application_id = NULL", [])
            .unwrap();

        let second = ensure_profile(&conn).unwrap();
        assert_eq!(first.profile_id, second.profile_id);
        assert_ne!(second.application_id, 0);
    }

    #[test]
    fn get_setting_missing_is_none() {
        let conn = test_db();
        let ids = ensure_profile(&conn).unwrap();
        let value = get_setting(&conn, ids.profile_id, "followup_days").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn set_setting_then_get_round_trips_structured_values() {
        let conn = test_db();
        let ids = ensure_profile(&conn).unwrap();

        set_setting(&conn, ids.profile_id, "followup_days", &json!(10)).unwrap();
        set_setting(
            &conn,
            ids.profile_id,
            "board_columns",
            &json!(["Applied", "Interview", "Offer"]),
        )
        .unwrap();

        assert_eq!(
            get_setting(&conn, ids.profile_id, "followup_days").unwrap(),
            Some(json!(10))
        );
        assert_eq!(
            get_setting(&conn, ids.profile_id, "board_columns").unwrap(),
            Some(json!(["Applied", "Interview", "Offer"]))
        );
    }

    #[test]
    fn set_setting_overwrites_existing_key() {
        let conn = test_db();
        let ids = ensure_profile(&conn).unwrap();

        set_setting(&conn, ids.profile_id, "followup_days", &json!(7)).unwrap();
        set_setting(&conn, ids.profile_id, "followup_days", &json!(14)).unwrap();

        assert_eq!(
            get_setting(&conn, ids.profile_id, "followup_days").unwrap(),
            Some(json!(14))
        );

        let rows: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM settings WHERE setting_key = 'followup_days'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn list_settings_returns_full_rows_ordered_by_key() {
        let conn = test_db();
        let ids = ensure_profile(&conn).unwrap();

        set_setting(&conn, ids.profile_id, "followup_days", &json!(10)).unwrap();
        set_setting(&conn, ids.profile_id, "board_columns", &json!(["Applied"])).unwrap();

        let settings = list_settings(&conn, ids.profile_id).unwrap();
        assert_eq!(settings.len(), 2);
        assert_eq!(settings[0].key, "board_columns");
        assert_eq!(settings[0].value, json!(["Applied"]));
        assert_eq!(settings[1].key, "followup_days");
        assert_eq!(settings[1].profile_id, ids.profile_id);
        assert_eq!(settings[1].updated_at, Local::now().date_naive());

        assert!(list_settings(&conn, ids.profile_id + 1).unwrap().is_empty());
    }

    #[test]
    fn malformed_stored_json_surfaces_as_constraint_violation() {
        let conn = test_db();
        let ids = ensure_profile(&conn).unwrap();

        // A row written by something other than set_setting.
        conn.execute(
            "INSERT INTO settings (profile_id, setting_key, setting_value, updated_at)
             VALUES (?1, 'theme', '{not json', '2024-01-01')",
            [ids.profile_id],
        )
        .unwrap();

        let result = get_setting(&conn, ids.profile_id, "theme");
        assert!(matches!(
            result,
            Err(DatabaseError::ConstraintViolation(_))
        ));
    }

    #[test]
    fn caller_default_via_unwrap_or() {
        let conn = test_db();
        let ids = ensure_profile(&conn).unwrap();

        let days = get_setting(&conn, ids.profile_id, "followup_days")
            .unwrap()
            .and_then(|v| v.as_i64())
            .unwrap_or(crate::config::DEFAULT_FOLLOWUP_DAYS);
        assert_eq!(days, 7);
    }
}
