//! CSV rendering of an application list.
//!
//! The caller exports whatever it currently lists (filters applied), so
//! this stays a pure function from records to text. Columns mirror the
//! stored fields; derived flags like "overdue" are computed per view and
//! never exported.

use crate::models::Application;
use crate::service::format_date;

const HEADER: [&str; 23] = [
    "id",
    "company",
    "role",
    "location",
    "job_url",
    "source",
    "status",
    "applied_date",
    "followup_date",
    "salary",
    "contact",
    "notes",
    "work_model",
    "salary_range",
    "interview_stage",
    "interview_date",
    "next_action",
    "next_action_date",
    "priority",
    "company_research",
    "phone_screen_notes",
    "created_at",
    "updated_at",
];

/// Render applications as UTF-8 CSV, header row first.
pub fn applications_to_csv(apps: &[Application]) -> String {
    let mut out = String::new();
    push_row(&mut out, HEADER.iter().map(|s| s.to_string()));

    for app in apps {
        push_row(
            &mut out,
            [
                app.id.to_string(),
                app.company.clone(),
                app.role.clone(),
                opt_text(&app.location),
                opt_text(&app.job_url),
                opt_text(&app.source),
                app.status.as_str().to_string(),
                opt_date(app.applied_date),
                opt_date(app.followup_date),
                opt_text(&app.salary),
                opt_text(&app.contact),
                opt_text(&app.notes),
                opt_text(&app.work_model),
                opt_text(&app.salary_range),
                opt_text(&app.interview_stage),
                opt_date(app.interview_date),
                opt_text(&app.next_action),
                opt_date(app.next_action_date),
                opt_text(&app.priority),
                opt_text(&app.company_research),
                opt_text(&app.phone_screen_notes),
                format_date(app.created_at),
                format_date(app.updated_at),
            ]
            .into_iter(),
        );
    }

    out
}

fn opt_text(field: &Option<String>) -> String {
    field.clone().unwrap_or_default()
}

fn opt_date(field: Option<chrono::NaiveDate>) -> String {
    field.map(format_date).unwrap_or_default()
}

fn push_row(out: &mut String, fields: impl Iterator<Item = String>) {
    let mut first = true;
    for field in fields {
        if !first {
            out.push(',');
        }
        first = false;
        out.push_str(&escape_field(&field));
    }
    out.push_str("\r\n");
}

/// Quote a field when it contains a comma, quote, or line break;
/// embedded quotes double up.
fn escape_field(field: &str) -> String {
    if field.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
