use std::str::FromStr;

use chrono::{Local, NaiveDate};
use rusqlite::{params, params_from_iter, Connection};

use crate::db::DatabaseError;
use crate::models::{Application, ApplicationDraft, ApplicationFilter, ApplicationStatus, DueDateField};

const SELECT_COLUMNS: &str = "id, company, role, location, job_url, source, status,
        applied_date, followup_date, salary, contact, notes,
        work_model, salary_range, interview_stage, interview_date,
        next_action, next_action_date, priority, company_research,
        phone_screen_notes, created_at, updated_at";

/// List applications matching the filter.
///
/// Ordering is part of the contract: effective due date ascending with
/// undated rows last, then newest id first among ties.
pub fn list_applications(
    conn: &Connection,
    filter: &ApplicationFilter,
) -> Result<Vec<Application>, DatabaseError> {
    let mut sql = format!("SELECT {SELECT_COLUMNS} FROM applications");
    let mut clauses: Vec<String> = Vec::new();
    let mut params: Vec<String> = Vec::new();

    if let Some(status) = &filter.status {
        params.push(status.as_str().to_string());
        clauses.push(format!("status = ?{}", params.len()));
    }

    let search = filter.search.trim();
    if !search.is_empty() {
        params.push(format!("%{}%", search.to_lowercase()));
        let n = params.len();
        clauses.push(format!(
            "(LOWER(company) LIKE ?{n} OR LOWER(role) LIKE ?{n} \
             OR LOWER(location) LIKE ?{n} OR LOWER(source) LIKE ?{n})"
        ));
    }

    let (first, second) = due_date_columns(&filter.due_field);
    if filter.overdue_only {
        params.push(today().to_string());
        clauses.push(format!(
            "(COALESCE({first}, {second}) IS NOT NULL \
             AND COALESCE({first}, {second}) < ?{} \
             AND status NOT IN ('Rejected', 'Withdrawn'))",
            params.len()
        ));
    }

    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(&format!(
        " ORDER BY COALESCE({first}, {second}, '9999-12-31') ASC, id DESC"
    ));

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(params.iter()), application_row)?;

    let mut apps = Vec::new();
    for row in rows {
        apps.push(application_from_row(row?)?);
    }
    Ok(apps)
}

/// Get one application by id.
pub fn get_application(conn: &Connection, id: i64) -> Result<Option<Application>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SELECT_COLUMNS} FROM applications WHERE id = ?1"
    ))?;

    match stmt.query_row([id], application_row) {
        Ok(row) => Ok(Some(application_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Insert a new application; created_at and updated_at are both set to
/// the current date. Returns the new id.
pub fn insert_application(
    conn: &Connection,
    draft: &ApplicationDraft,
) -> Result<i64, DatabaseError> {
    let today = today();
    conn.execute(
        "INSERT INTO applications
         (company, role, location, job_url, source, status, applied_date,
          followup_date, salary, contact, notes, work_model, salary_range,
          interview_stage, interview_date, next_action, next_action_date,
          priority, company_research, phone_screen_notes, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                 ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22)",
        params![
            draft.company,
            draft.role,
            draft.location,
            draft.job_url,
            draft.source,
            draft.status.as_str(),
            draft.applied_date,
            draft.followup_date,
            draft.salary,
            draft.contact,
            draft.notes,
            draft.work_model,
            draft.salary_range,
            draft.interview_stage,
            draft.interview_date,
            draft.next_action,
            draft.next_action_date,
            draft.priority,
            draft.company_research,
            draft.phone_screen_notes,
            today,
            today,
        ],
    )?;

    let id = conn.last_insert_rowid();
    tracing::info!(application_id = id, company = %draft.company, "Inserted application");
    Ok(id)
}

/// Replace all mutable fields of an application and refresh updated_at.
/// Returns false when no row has the given id.
pub fn update_application(
    conn: &Connection,
    id: i64,
    draft: &ApplicationDraft,
) -> Result<bool, DatabaseError> {
    let rows = conn.execute(
        "UPDATE applications SET
           company = ?1,
           role = ?2,
           location = ?3,
           job_url = ?4,
           source = ?5,
           status = ?6,
           applied_date = ?7,
           followup_date = ?8,
           salary = ?9,
           contact = ?10,
           notes = ?11,
           work_model = ?12,
           salary_range = ?13,
           interview_stage = ?14,
           interview_date = ?15,
           next_action = ?16,
           next_action_date = ?17,
           priority = ?18,
           company_research = ?19,
           phone_screen_notes = ?20,
           updated_at = ?21
         WHERE id = ?22",
        params![
            draft.company,
            draft.role,
            draft.location,
            draft.job_url,
            draft.source,
            draft.status.as_str(),
            draft.applied_date,
            draft.followup_date,
            draft.salary,
            draft.contact,
            draft.notes,
            draft.work_model,
            draft.salary_range,
            draft.interview_stage,
            draft.interview_date,
            draft.next_action,
            draft.next_action_date,
            draft.priority,
            draft.company_research,
            draft.phone_screen_notes,
            today(),
            id,
        ],
    )?;
    Ok(rows > 0)
}

/// Narrow mutation for board-style status transitions: touches only
/// status and updated_at.
pub fn quick_update_status(
    conn: &Connection,
    id: i64,
    status: &ApplicationStatus,
) -> Result<bool, DatabaseError> {
    let rows = conn.execute(
        "UPDATE applications SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.as_str(), today(), id],
    )?;
    Ok(rows > 0)
}

/// Delete an application; its documents go with it via FK cascade.
pub fn delete_application(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let rows = conn.execute("DELETE FROM applications WHERE id = ?1", [id])?;
    if rows > 0 {
        tracing::info!(application_id = id, "Deleted application and its documents");
    }
    Ok(rows > 0)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn due_date_columns(field: &DueDateField) -> (&'static str, &'static str) {
    match field {
        DueDateField::NextAction => ("next_action_date", "followup_date"),
        DueDateField::Followup => ("followup_date", "next_action_date"),
    }
}

// Internal row type for Application mapping
struct ApplicationRow {
    id: i64,
    company: String,
    role: String,
    location: Option<String>,
    job_url: Option<String>,
    source: Option<String>,
    status: String,
    applied_date: Option<NaiveDate>,
    followup_date: Option<NaiveDate>,
    salary: Option<String>,
    contact: Option<String>,
    notes: Option<String>,
    work_model: Option<String>,
    salary_range: Option<String>,
    interview_stage: Option<String>,
    interview_date: Option<NaiveDate>,
    next_action: Option<String>,
    next_action_date: Option<NaiveDate>,
    priority: Option<String>,
    company_research: Option<String>,
    phone_screen_notes: Option<String>,
    created_at: NaiveDate,
    updated_at: NaiveDate,
}

fn application_row(row: &rusqlite::Row) -> rusqlite::Result<ApplicationRow> {
    Ok(ApplicationRow {
        id: row.get(0)?,
        company: row.get(1)?,
        role: row.get(2)?,
        location: row.get(3)?,
        job_url: row.get(4)?,
        source: row.get(5)?,
        status: row.get(6)?,
        applied_date: row.get(7)?,
        followup_date: row.get(8)?,
        salary: row.get(9)?,
        contact: row.get(10)?,
        notes: row.get(11)?,
        work_model: row.get(12)?,
        salary_range: row.get(13)?,
        interview_stage: row.get(14)?,
        interview_date: row.get(15)?,
        next_action: row.get(16)?,
        next_action_date: row.get(17)?,
        priority: row.get(18)?,
        company_research: row.get(19)?,
        phone_screen_notes: row.get(20)?,
        created_at: row.get(21)?,
        updated_at: row.get(22)?,
    })
}

fn application_from_row(row: ApplicationRow) -> Result<Application, DatabaseError> {
    Ok(Application {
        id: row.id,
        company: row.company,
        role: row.role,
        location: row.location,
        job_url: row.job_url,
        source: row.source,
        status: ApplicationStatus::from_str(&row.status)?,
        applied_date: row.applied_date,
        followup_date: row.followup_date,
        salary: row.salary,
        contact: row.contact,
        notes: row.notes,
        work_model: row.work_model,
        salary_range: row.salary_range,
        interview_stage: row.interview_stage,
        interview_date: row.interview_date,
        next_action: row.next_action,
        next_action_date: row.next_action_date,
        priority: row.priority,
        company_research: row.company_research,
        phone_screen_notes: row.phone_screen_notes,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}
