use serde::Serialize;

use crate::entities::{
    assessment::{AssessmentStatus, UserSkillAssessment},
    skill::{Skill, SkillCategory, SkillLevel},
    user::TeamMember,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillStats {
    pub total_skills: usize,
    pub average_level: f64,
    pub expert_skills: usize,
    pub categories_count: usize,
    /// Percentage of skills rated above "Not Familiar".
    pub completion_rate: f64,
}

impl SkillStats {
    pub fn from_categories(categories: &[SkillCategory]) -> Self {
        let skills: Vec<&Skill> = categories.iter().flat_map(|c| c.skills.iter()).collect();
        let total = skills.len();
        let assessed = skills.iter().filter(|s| s.level.is_assessed()).count();

        SkillStats {
            total_skills: total,
            average_level: mean_level(skills.iter().copied()),
            expert_skills: count_experts(skills.iter().copied()),
            categories_count: categories.len(),
            completion_rate: if total > 0 {
                assessed as f64 / total as f64 * 100.0
            } else {
                0.0
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    pub total_employees: usize,
    pub completed_assessments: usize,
    pub pending_reviews: usize,
    pub average_team_level: f64,
}

impl TeamStats {
    pub fn from_ledger(assessments: &[UserSkillAssessment], total_employees: usize) -> Self {
        let submitted = assessments
            .iter()
            .filter(|a| a.status == AssessmentStatus::Submitted)
            .count();

        TeamStats {
            total_employees,
            completed_assessments: submitted,
            pending_reviews: submitted,
            average_team_level: mean_level(assessments.iter().flat_map(|a| a.skills.iter())),
        }
    }
}

/// One row of the manager's assessment list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentSummary {
    pub assessment: UserSkillAssessment,
    pub employee: Option<TeamMember>,
    pub average_level: f64,
    pub expert_skills: usize,
}

impl AssessmentSummary {
    pub fn new(assessment: UserSkillAssessment, employee: Option<TeamMember>) -> Self {
        let average_level = mean_level(assessment.skills.iter());
        let expert_skills = count_experts(assessment.skills.iter());
        AssessmentSummary {
            assessment,
            employee,
            average_level,
            expert_skills,
        }
    }
}

/// Team-wide aggregate for one catalog category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub category: String,
    pub total_skills: usize,
    pub team_average_level: f64,
    pub expert_count: usize,
    pub skills_assessed: usize,
}

impl CategorySummary {
    pub fn for_category(category: &SkillCategory, assessments: &[UserSkillAssessment]) -> Self {
        let rated: Vec<&Skill> = assessments
            .iter()
            .flat_map(|a| a.skills.iter())
            .filter(|s| s.category == category.id)
            .collect();

        CategorySummary {
            category: category.name.clone(),
            total_skills: category.skills.len(),
            team_average_level: mean_level(rated.iter().copied()),
            expert_count: count_experts(rated.iter().copied()),
            skills_assessed: rated.len(),
        }
    }
}

pub fn mean_level<'a>(skills: impl Iterator<Item = &'a Skill>) -> f64 {
    let (sum, count) = skills.fold((0i64, 0usize), |(sum, count), skill| {
        (sum + i64::from(skill.level.value()), count + 1)
    });
    if count == 0 { 0.0 } else { sum as f64 / count as f64 }
}

fn count_experts<'a>(skills: impl Iterator<Item = &'a Skill>) -> usize {
    skills.filter(|s| s.level == SkillLevel::Expert).count()
}
