//! Repository layer — entity-scoped database operations.
//!
//! Free functions over a live `rusqlite::Connection`; the connection's
//! lifecycle belongs to the caller. Every operation commits (or rolls
//! back) before returning, so the core holds no state between calls.

mod application;
mod document;
mod profile;

pub use application::*;
pub use document::*;
pub use profile::*;

#[cfg(test)]
mod tests {
    use chrono::{Duration, Local};

    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::models::{ApplicationDraft, ApplicationFilter, ApplicationStatus};
    use crate::service::validate_required;

    fn test_db() -> rusqlite::Connection {
        open_memory_database().unwrap()
    }

    fn draft(company: &str, role: &str, status: ApplicationStatus) -> ApplicationDraft {
        ApplicationDraft {
            company: company.into(),
            role: role.into(),
            status,
            ..Default::default()
        }
    }

    #[test]
    fn cascade_delete_removes_documents_and_spares_others() {
        let conn = test_db();
        let keep = insert_application(&conn, &draft("Acme", "Engineer", ApplicationStatus::Applied)).unwrap();
        let gone = insert_application(&conn, &draft("Initech", "Analyst", ApplicationStatus::Saved)).unwrap();

        add_document(&conn, keep, "kept.pdf", "application/pdf", b"kept", "Document").unwrap();
        add_document(&conn, gone, "a.pdf", "application/pdf", b"first", "Document").unwrap();
        add_document(&conn, gone, "b.pdf", "application/pdf", b"second", "Email").unwrap();

        assert!(delete_application(&conn, gone).unwrap());

        assert!(list_documents(&conn, gone).unwrap().is_empty());
        assert_eq!(list_documents(&conn, keep).unwrap().len(), 1);
    }

    #[test]
    fn retain_only_latest_resume_flow() {
        let conn = test_db();
        let app_id = insert_application(&conn, &draft("Acme", "Engineer", ApplicationStatus::Applied)).unwrap();

        add_document(&conn, app_id, "resume-v1.pdf", "application/pdf", b"v1", "Resume").unwrap();
        add_document(&conn, app_id, "resume-v2.pdf", "application/pdf", b"v2", "Resume").unwrap();
        add_document(&conn, app_id, "resume-v3.pdf", "application/pdf", b"v3", "Resume").unwrap();
        add_document(&conn, app_id, "cover.pdf", "application/pdf", b"cover", "Document").unwrap();

        let keep_id = latest_document_id_by_type(&conn, app_id, "Resume")
            .unwrap()
            .unwrap();
        let removed = delete_documents_by_type_except(&conn, app_id, "Resume", keep_id).unwrap();
        assert_eq!(removed, 2);

        let resumes: Vec<_> = list_documents(&conn, app_id)
            .unwrap()
            .into_iter()
            .filter(|d| d.doc_type == "Resume")
            .collect();
        assert_eq!(resumes.len(), 1);
        assert_eq!(resumes[0].id, keep_id);
        assert_eq!(resumes[0].filename, "resume-v3.pdf");

        // The unrelated document survives
        assert_eq!(list_documents(&conn, app_id).unwrap().len(), 2);
    }

    #[test]
    fn profile_documents_hang_off_the_anchor_application() {
        let conn = test_db();
        let ids = ensure_profile(&conn).unwrap();

        assert!(add_document(
            &conn,
            ids.application_id,
            "resume.pdf",
            "application/pdf",
            b"profile resume",
            "Resume"
        )
        .unwrap());
        assert_eq!(list_documents(&conn, ids.application_id).unwrap().len(), 1);
    }

    #[test]
    fn insert_then_filter_then_quick_reject_end_to_end() {
        let conn = test_db();

        let mut d = draft("Acme", "Engineer", ApplicationStatus::Applied);
        d.followup_date = Some(Local::now().date_naive() - Duration::days(3));
        validate_required(&d.company, &d.role).unwrap();
        let id = insert_application(&conn, &d).unwrap();

        let filter = ApplicationFilter {
            status: Some(ApplicationStatus::Applied),
            ..Default::default()
        };
        let listed = list_applications(&conn, &filter).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, id);
        assert_eq!(listed[0].company, "Acme");

        assert!(quick_update_status(&conn, id, &ApplicationStatus::Rejected).unwrap());

        // Terminal status drops it from the overdue view even though the
        // follow-up date is in the past.
        let overdue = ApplicationFilter {
            overdue_only: true,
            ..Default::default()
        };
        assert!(list_applications(&conn, &overdue).unwrap().is_empty());
    }
}
