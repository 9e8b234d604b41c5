use super::enums::{ApplicationStatus, DueDateField};

/// Listing criteria for applications.
///
/// `status: None` means the "All" choice in a status picker. `search`
/// matches case-insensitively as a substring against company, role,
/// location, and source.
#[derive(Debug, Default)]
pub struct ApplicationFilter {
    pub search: String,
    pub status: Option<ApplicationStatus>,
    pub overdue_only: bool,
    pub due_field: DueDateField,
}
