use crate::{
    domain::catalog,
    entities::{
        assessment::UserSkillAssessment,
        skill::SkillCategory,
        stats::{AssessmentSummary, CategorySummary, TeamStats},
        user::TeamMember,
    },
    repositories::ledger::LedgerRepository,
};

/// Manager-facing view over the shared ledger. Nothing is cached; each call
/// re-reads the record.
pub struct LedgerReader<L>
where
    L: LedgerRepository,
{
    pub ledger_repo: L,
}

impl<L> LedgerReader<L>
where
    L: LedgerRepository,
{
    pub fn new(ledger_repo: L) -> Self {
        LedgerReader { ledger_repo }
    }

    /// Every submitted assessment. An unreadable ledger reads as empty.
    pub async fn all_assessments(&self) -> Vec<UserSkillAssessment> {
        match self.ledger_repo.load_all().await {
            Ok(assessments) => assessments,
            Err(e) => {
                tracing::error!("Error loading assessment ledger: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn assessments_for(&self, user_id: Option<&str>) -> Vec<UserSkillAssessment> {
        let assessments = self.all_assessments().await;
        match user_id.filter(|id| !id.is_empty()) {
            Some(id) => assessments.into_iter().filter(|a| a.user_id == id).collect(),
            None => assessments,
        }
    }

    pub async fn team_stats(&self) -> TeamStats {
        TeamStats::from_ledger(&self.all_assessments().await, catalog::employee_count())
    }

    /// List rows for the dashboard, joined against the roster.
    pub async fn summaries(&self, user_id: Option<&str>, roster: &[TeamMember]) -> Vec<AssessmentSummary> {
        self.assessments_for(user_id)
            .await
            .into_iter()
            .map(|assessment| {
                let employee = roster.iter().find(|m| m.id == assessment.user_id).cloned();
                AssessmentSummary::new(assessment, employee)
            })
            .collect()
    }

    pub async fn category_summaries(&self, categories: &[SkillCategory]) -> Vec<CategorySummary> {
        let assessments = self.all_assessments().await;
        categories
            .iter()
            .map(|category| CategorySummary::for_category(category, &assessments))
            .collect()
    }
}
