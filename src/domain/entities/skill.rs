use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Self-rated proficiency, stored as an integer in `[-1, 4]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum SkillLevel {
    NotApplicable,
    #[default]
    NotFamiliar,
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    pub const ALL: [SkillLevel; 6] = [
        SkillLevel::NotApplicable,
        SkillLevel::NotFamiliar,
        SkillLevel::Beginner,
        SkillLevel::Intermediate,
        SkillLevel::Advanced,
        SkillLevel::Expert,
    ];

    pub fn value(self) -> i8 {
        match self {
            SkillLevel::NotApplicable => -1,
            SkillLevel::NotFamiliar => 0,
            SkillLevel::Beginner => 1,
            SkillLevel::Intermediate => 2,
            SkillLevel::Advanced => 3,
            SkillLevel::Expert => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SkillLevel::NotApplicable => "Not Applicable",
            SkillLevel::NotFamiliar => "Not Familiar",
            SkillLevel::Beginner => "Beginner",
            SkillLevel::Intermediate => "Intermediate",
            SkillLevel::Advanced => "Advanced",
            SkillLevel::Expert => "Expert",
        }
    }

    /// Counts toward the completion rate.
    pub fn is_assessed(self) -> bool {
        self.value() > 0
    }
}

impl TryFrom<i8> for SkillLevel {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        SkillLevel::ALL
            .into_iter()
            .find(|level| level.value() == value)
            .ok_or_else(|| format!("Skill level must be between -1 and 4, got {value}"))
    }
}

impl From<SkillLevel> for i8 {
    fn from(level: SkillLevel) -> Self {
        level.value()
    }
}

/// Icon shown next to a category. Resolved to an actual glyph by the UI only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryIcon {
    Cloud,
    Container,
    Code,
    GitBranch,
    Activity,
    Shield,
    Terminal,
    Network,
    Database,
    ClipboardList,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: String,
    pub name: String,
    /// Id of the owning category.
    pub category: String,
    pub level: SkillLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub is_custom: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillCategory {
    pub id: String,
    pub name: String,
    pub icon: CategoryIcon,
    pub color: String,
    pub skills: Vec<Skill>,
}

impl SkillCategory {
    pub fn find_skill_mut(&mut self, skill_id: &str) -> Option<&mut Skill> {
        self.skills.iter_mut().find(|skill| skill.id == skill_id)
    }
}

/// Flattens the category tree in display order.
pub fn flatten_skills(categories: &[SkillCategory]) -> Vec<Skill> {
    categories
        .iter()
        .flat_map(|category| category.skills.iter().cloned())
        .collect()
}

/// Payload for a user-added skill; id and timestamp are assigned on insert.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewSkill {
    #[validate(custom(function = "validate_not_blank", message = "Skill name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,

    #[serde(default)]
    pub level: SkillLevel,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default = "default_true")]
    pub is_custom: bool,
}

fn default_true() -> bool {
    true
}

fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        Err(validator::ValidationError::new("blank"))
    } else {
        Ok(())
    }
}

/// Payload for editing a skill in place. The id comes from the path and the
/// timestamp is assigned on save.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SkillEdit {
    #[validate(custom(function = "validate_not_blank", message = "Skill name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,

    pub level: SkillLevel,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    #[serde(default)]
    pub description: Option<String>,

    /// Kept from the stored skill when absent.
    #[serde(default)]
    pub is_custom: Option<bool>,
}

impl SkillEdit {
    pub fn into_skill(self, id: String, current: Option<&Skill>) -> Skill {
        Skill {
            is_custom: self
                .is_custom
                .or(current.map(|skill| skill.is_custom))
                .unwrap_or_default(),
            id,
            name: self.name.trim().to_string(),
            category: self.category,
            level: self.level,
            description: self.description.filter(|d| !d.trim().is_empty()),
            last_updated: Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LevelUpdate {
    pub level: SkillLevel,
}

/// Query filters from the search panel.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkillFilter {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub level: Option<SkillLevel>,
}

impl SkillFilter {
    pub fn matches(&self, category_id: &str, skill: &Skill) -> bool {
        let matches_search = match self.search.as_deref() {
            Some(term) => skill.name.to_lowercase().contains(&term.to_lowercase()),
            None => true,
        };
        let matches_category = match self.category.as_deref() {
            Some(selected) if !selected.is_empty() => selected == category_id,
            _ => true,
        };
        let matches_level = self.level.is_none_or(|level| skill.level == level);

        matches_search && matches_category && matches_level
    }
}
