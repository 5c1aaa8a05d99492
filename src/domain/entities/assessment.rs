use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::skill::{Skill, SkillCategory};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssessmentStatus {
    #[default]
    Draft,
    Submitted,
    /// Reserved for manager sign-off; nothing transitions into it yet.
    Reviewed,
}

impl AssessmentStatus {
    /// Submitted and reviewed assessments are read-only.
    pub fn is_locked(self) -> bool {
        !matches!(self, AssessmentStatus::Draft)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AssessmentStatus::Draft => "draft",
            AssessmentStatus::Submitted => "submitted",
            AssessmentStatus::Reviewed => "reviewed",
        }
    }
}

impl FromStr for AssessmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "draft" => Ok(AssessmentStatus::Draft),
            "submitted" => Ok(AssessmentStatus::Submitted),
            "reviewed" => Ok(AssessmentStatus::Reviewed),
            other => Err(format!("Unknown assessment status: {other}")),
        }
    }
}

impl fmt::Display for AssessmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ledger entry written when a user submits. One live entry per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSkillAssessment {
    pub id: String,
    pub user_id: String,
    pub skills: Vec<Skill>,
    pub completed_at: DateTime<Utc>,
    pub status: AssessmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_comments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
}

impl UserSkillAssessment {
    pub fn submitted(user_id: &str, skills: Vec<Skill>) -> Self {
        let completed_at = Utc::now();
        UserSkillAssessment {
            id: format!("assessment-{}-{}", user_id, completed_at.timestamp_millis()),
            user_id: user_id.to_string(),
            skills,
            completed_at,
            status: AssessmentStatus::Submitted,
            manager_comments: None,
            reviewed_at: None,
            reviewed_by: None,
        }
    }
}

/// Body returned for the employee's workspace view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentView {
    pub status: AssessmentStatus,
    pub categories: Vec<SkillCategory>,
}
