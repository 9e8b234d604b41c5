use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(ApplicationStatus {
    Saved => "Saved",
    Applied => "Applied",
    OnlineAssessment => "OA",
    HrScreen => "HR Screen",
    Interview => "Interview",
    Onsite => "Onsite",
    Offer => "Offer",
    Rejected => "Rejected",
    Ghosted => "Ghosted",
    Withdrawn => "Withdrawn",
});

impl ApplicationStatus {
    /// Every status, in pipeline order. Callers use this for pickers.
    pub const ALL: [ApplicationStatus; 10] = [
        ApplicationStatus::Saved,
        ApplicationStatus::Applied,
        ApplicationStatus::OnlineAssessment,
        ApplicationStatus::HrScreen,
        ApplicationStatus::Interview,
        ApplicationStatus::Onsite,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
        ApplicationStatus::Ghosted,
        ApplicationStatus::Withdrawn,
    ];

    /// Terminal statuses are excluded from overdue computation.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Withdrawn)
    }
}

impl Default for ApplicationStatus {
    fn default() -> Self {
        Self::Saved
    }
}

str_enum!(DueDateField {
    NextAction => "next_action",
    Followup => "followup",
});

impl Default for DueDateField {
    fn default() -> Self {
        Self::NextAction
    }
}
