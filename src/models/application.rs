use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::ApplicationStatus;

/// One tracked job application, as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    pub company: String,
    pub role: String,
    pub location: Option<String>,
    pub job_url: Option<String>,
    pub source: Option<String>,
    pub status: ApplicationStatus,
    pub applied_date: Option<NaiveDate>,
    pub followup_date: Option<NaiveDate>,
    pub salary: Option<String>,
    pub contact: Option<String>,
    pub notes: Option<String>,
    pub work_model: Option<String>,
    pub salary_range: Option<String>,
    pub interview_stage: Option<String>,
    pub interview_date: Option<NaiveDate>,
    pub next_action: Option<String>,
    pub next_action_date: Option<NaiveDate>,
    pub priority: Option<String>,
    pub company_research: Option<String>,
    pub phone_screen_notes: Option<String>,
    pub created_at: NaiveDate,
    pub updated_at: NaiveDate,
}

/// Mutable fields of an application, used for insert and full update.
///
/// `company` and `role` must be non-empty after trimming; callers run
/// `service::validate_required` before handing a draft to the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationDraft {
    pub company: String,
    pub role: String,
    pub location: Option<String>,
    pub job_url: Option<String>,
    pub source: Option<String>,
    pub status: ApplicationStatus,
    pub applied_date: Option<NaiveDate>,
    pub followup_date: Option<NaiveDate>,
    pub salary: Option<String>,
    pub contact: Option<String>,
    pub notes: Option<String>,
    pub work_model: Option<String>,
    pub salary_range: Option<String>,
    pub interview_stage: Option<String>,
    pub interview_date: Option<NaiveDate>,
    pub next_action: Option<String>,
    pub next_action_date: Option<NaiveDate>,
    pub priority: Option<String>,
    pub company_research: Option<String>,
    pub phone_screen_notes: Option<String>,
}
