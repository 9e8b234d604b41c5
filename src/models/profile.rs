use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The resolved singleton profile and its anchor application row.
///
/// The anchor application exists so profile-scoped documents (a resume,
/// typically) always have a valid owning application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileIds {
    pub profile_id: i64,
    pub application_id: i64,
}

/// One profile-scoped setting row. The value is an arbitrary structured
/// payload, stored as JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    pub profile_id: i64,
    pub key: String,
    pub value: serde_json::Value,
    pub updated_at: NaiveDate,
}
