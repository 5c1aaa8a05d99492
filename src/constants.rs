use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Durable record holding the signed-in user.
pub const CURRENT_USER_KEY: &str = "currentUser";

/// Shared ledger of submitted assessments, read by managers.
pub const ALL_ASSESSMENTS_KEY: &str = "allAssessments";

pub fn skill_data_key(user_id: &str) -> String {
    format!("skillMatrixData_{user_id}")
}

pub fn assessment_status_key(user_id: &str) -> String {
    format!("assessmentStatus_{user_id}")
}
