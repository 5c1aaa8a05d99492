use chrono::Utc;
use rand::Rng;

use crate::{
    domain::catalog,
    entities::{
        assessment::{AssessmentStatus, UserSkillAssessment},
        skill::{flatten_skills, NewSkill, Skill, SkillCategory, SkillFilter, SkillLevel},
        stats::SkillStats,
        user::User,
    },
    errors::AppError,
    repositories::{assessment::AssessmentRepository, ledger::LedgerRepository},
};

/// Workspace for one signed-in user: their category tree, its lifecycle status,
/// and write-through persistence. Every mutation is total; unknown ids, unknown
/// categories and locked assessments turn it into a no-op.
pub struct AssessmentManager<R, L>
where
    R: AssessmentRepository,
    L: LedgerRepository,
{
    user: User,
    categories: Vec<SkillCategory>,
    status: AssessmentStatus,
    repo: R,
    ledger: L,
}

impl<R, L> AssessmentManager<R, L>
where
    R: AssessmentRepository,
    L: LedgerRepository,
{
    /// Restores the user's saved workspace, falling back to the catalog when
    /// nothing is saved or the saved record cannot be read.
    pub async fn load(user: User, repo: R, ledger: L) -> Self {
        let categories = match repo.load_categories(&user.id).await {
            Ok(Some(categories)) => categories,
            Ok(None) => catalog::initial_skill_categories(),
            Err(e) => {
                tracing::error!(user_id = %user.id, "Error loading saved data: {}", e);
                catalog::initial_skill_categories()
            }
        };

        let status = match repo.load_status(&user.id).await {
            Ok(status) => status.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(user_id = %user.id, "Ignoring saved assessment status: {}", e);
                AssessmentStatus::Draft
            }
        };

        let manager = AssessmentManager {
            user,
            categories,
            status,
            repo,
            ledger,
        };
        manager.persist_categories().await;
        manager.persist_status().await;

        tracing::info!(
            user_id = %manager.user.id,
            status = %manager.status,
            categories = manager.categories.len(),
            "Assessment workspace opened"
        );
        manager
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn categories(&self) -> &[SkillCategory] {
        &self.categories
    }

    pub fn status(&self) -> AssessmentStatus {
        self.status
    }

    pub fn skill(&self, skill_id: &str) -> Option<&Skill> {
        self.categories
            .iter()
            .find_map(|category| category.skills.iter().find(|skill| skill.id == skill_id))
    }

    pub fn stats(&self) -> SkillStats {
        SkillStats::from_categories(&self.categories)
    }

    /// Categories narrowed by the search panel; categories left empty are dropped.
    pub fn filtered_categories(&self, filter: &SkillFilter) -> Vec<SkillCategory> {
        self.categories
            .iter()
            .filter_map(|category| {
                let skills: Vec<Skill> = category
                    .skills
                    .iter()
                    .filter(|skill| filter.matches(&category.id, skill))
                    .cloned()
                    .collect();
                if skills.is_empty() {
                    None
                } else {
                    Some(SkillCategory { skills, ..category.clone() })
                }
            })
            .collect()
    }

    pub async fn set_level(&mut self, skill_id: &str, level: SkillLevel) {
        if self.is_locked("set level") {
            return;
        }

        let Some(skill) = self.find_skill_mut(skill_id) else {
            tracing::debug!(skill_id, "Level change for unknown skill ignored");
            return;
        };
        skill.level = level;
        skill.last_updated = Utc::now();

        self.persist_categories().await;
    }

    /// Appends a user-defined skill to the category named by `new_skill.category`.
    /// Returns the stored skill, or `None` when nothing was added.
    pub async fn add_skill(&mut self, new_skill: NewSkill) -> Option<Skill> {
        if self.is_locked("add skill") {
            return None;
        }

        let skill = Skill {
            id: custom_skill_id(),
            name: new_skill.name.trim().to_string(),
            category: new_skill.category,
            level: new_skill.level,
            description: new_skill.description.filter(|d| !d.trim().is_empty()),
            last_updated: Utc::now(),
            is_custom: new_skill.is_custom,
        };

        let Some(category) = self.categories.iter_mut().find(|c| c.id == skill.category) else {
            tracing::debug!(category = %skill.category, "Skill for unknown category dropped");
            return None;
        };
        category.skills.push(skill.clone());

        tracing::info!(user_id = %self.user.id, skill_id = %skill.id, "Custom skill added");
        self.persist_categories().await;
        Some(skill)
    }

    /// Replaces the skill with the same id where it currently sits. A changed
    /// `category` field does not move it to another category list.
    pub async fn edit_skill(&mut self, updated: Skill) {
        if self.is_locked("edit skill") {
            return;
        }

        let Some(skill) = self.find_skill_mut(&updated.id) else {
            tracing::debug!(skill_id = %updated.id, "Edit for unknown skill ignored");
            return;
        };
        *skill = Skill {
            last_updated: Utc::now(),
            ..updated
        };

        self.persist_categories().await;
    }

    pub async fn delete_skill(&mut self, skill_id: &str) {
        if self.is_locked("delete skill") {
            return;
        }

        let removed = self.categories.iter_mut().any(|category| {
            match category.skills.iter().position(|s| s.id == skill_id) {
                Some(index) => {
                    category.skills.remove(index);
                    true
                }
                None => false,
            }
        });

        if removed {
            tracing::info!(user_id = %self.user.id, skill_id, "Skill deleted");
            self.persist_categories().await;
        }
    }

    /// Freezes the workspace and records a snapshot in the shared ledger,
    /// replacing any earlier snapshot for this user.
    pub async fn submit_assessment(&mut self) -> UserSkillAssessment {
        self.status = AssessmentStatus::Submitted;
        self.persist_status().await;

        let assessment = UserSkillAssessment::submitted(&self.user.id, flatten_skills(&self.categories));
        if let Err(e) = self.ledger.upsert(assessment.clone()).await {
            tracing::error!(user_id = %self.user.id, "Failed to record submitted assessment: {}", e);
        } else {
            tracing::info!(
                user_id = %self.user.id,
                skills = assessment.skills.len(),
                "Assessment submitted"
            );
        }
        assessment
    }

    /// The category tree exactly as held, for download.
    pub fn export_json(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string_pretty(&self.categories)?)
    }

    fn is_locked(&self, action: &str) -> bool {
        if self.status.is_locked() {
            tracing::debug!(user_id = %self.user.id, status = %self.status, action, "Assessment is read-only");
            true
        } else {
            false
        }
    }

    fn find_skill_mut(&mut self, skill_id: &str) -> Option<&mut Skill> {
        self.categories
            .iter_mut()
            .find_map(|category| category.find_skill_mut(skill_id))
    }

    async fn persist_categories(&self) {
        if self.categories.is_empty() {
            return;
        }
        if let Err(e) = self.repo.save_categories(&self.user.id, &self.categories).await {
            tracing::error!(user_id = %self.user.id, "Failed to save skill data: {}", e);
        }
    }

    async fn persist_status(&self) {
        if let Err(e) = self.repo.save_status(&self.user.id, self.status).await {
            tracing::error!(user_id = %self.user.id, "Failed to save assessment status: {}", e);
        }
    }
}

/// `custom-{epoch millis}-{9 base36 chars}`
fn custom_skill_id() -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("custom-{}-{}", Utc::now().timestamp_millis(), suffix)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        entities::user::Role,
        repositories::{
            assessment::{KvAssessmentRepo, MockAssessmentRepository},
            kv_store::{KeyValueStore, MemoryStore},
            ledger::{KvLedgerRepo, MockLedgerRepository},
        },
    };

    type TestManager = AssessmentManager<KvAssessmentRepo, KvLedgerRepo>;

    fn employee(id: &str) -> User {
        User {
            id: id.into(),
            email: format!("user{id}@company.com"),
            name: "Test User".into(),
            role: Role::Employee,
            department: None,
            position: None,
            manager_id: None,
            created_at: Utc::now(),
            last_login: None,
        }
    }

    async fn open(store: &MemoryStore, user_id: &str) -> TestManager {
        let shared: Arc<dyn KeyValueStore> = Arc::new(store.clone());
        AssessmentManager::load(
            employee(user_id),
            KvAssessmentRepo::new(shared.clone()),
            KvLedgerRepo::new(shared),
        )
        .await
    }

    fn new_skill(category: &str) -> NewSkill {
        NewSkill {
            name: "  Nomad  ".into(),
            category: category.into(),
            level: SkillLevel::Beginner,
            description: Some("Workload scheduling".into()),
            is_custom: true,
        }
    }

    #[tokio::test]
    async fn first_load_starts_from_the_catalog_and_saves_it() {
        let store = MemoryStore::new();
        let manager = open(&store, "1").await;

        assert_eq!(manager.categories().len(), catalog::initial_skill_categories().len());
        assert_eq!(manager.status(), AssessmentStatus::Draft);
        assert!(store.get("skillMatrixData_1").await.unwrap().is_some());
        assert_eq!(store.get("assessmentStatus_1").await.unwrap().as_deref(), Some("draft"));
    }

    #[tokio::test]
    async fn malformed_saved_data_falls_back_to_the_catalog() {
        let store = MemoryStore::new();
        store.set("skillMatrixData_1", "[{\"broken\"".into()).await.unwrap();
        store.set("assessmentStatus_1", "archived".into()).await.unwrap();

        let manager = open(&store, "1").await;

        assert_eq!(manager.categories().len(), catalog::initial_skill_categories().len());
        assert_eq!(manager.status(), AssessmentStatus::Draft);
    }

    #[tokio::test]
    async fn reopening_restores_levels_and_status() {
        let store = MemoryStore::new();
        let mut manager = open(&store, "1").await;
        manager.set_level("kubernetes", SkillLevel::Expert).await;
        manager.submit_assessment().await;

        let reopened = open(&store, "1").await;
        assert_eq!(reopened.status(), AssessmentStatus::Submitted);
        assert_eq!(reopened.stats().expert_skills, 1);
        assert_eq!(reopened.categories(), manager.categories());
    }

    #[tokio::test]
    async fn set_level_updates_the_skill_and_its_timestamp() {
        let store = MemoryStore::new();
        let mut manager = open(&store, "1").await;
        let before = Utc::now();

        manager.set_level("terraform", SkillLevel::Advanced).await;
        manager.set_level("does-not-exist", SkillLevel::Expert).await;

        let skill = manager
            .categories()
            .iter()
            .flat_map(|c| c.skills.iter())
            .find(|s| s.id == "terraform")
            .unwrap();
        assert_eq!(skill.level, SkillLevel::Advanced);
        assert!(skill.last_updated >= before);
        assert_eq!(manager.stats().expert_skills, 0);
    }

    #[tokio::test]
    async fn add_skill_appends_to_the_named_category() {
        let store = MemoryStore::new();
        let mut manager = open(&store, "1").await;
        let before = manager.stats().total_skills;

        let added = manager.add_skill(new_skill("containers")).await.unwrap();

        assert!(added.id.starts_with("custom-"));
        assert_eq!(added.id.rsplit('-').next().unwrap().len(), 9);
        assert_eq!(added.name, "Nomad");
        assert!(added.is_custom);
        let containers = manager.categories().iter().find(|c| c.id == "containers").unwrap();
        assert_eq!(containers.skills.last().unwrap().id, added.id);
        assert_eq!(manager.stats().total_skills, before + 1);
    }

    #[tokio::test]
    async fn add_skill_to_unknown_category_is_dropped() {
        let store = MemoryStore::new();
        let mut manager = open(&store, "1").await;
        let before = manager.categories().to_vec();

        assert!(manager.add_skill(new_skill("quantum")).await.is_none());
        assert_eq!(manager.categories(), before.as_slice());
    }

    #[tokio::test]
    async fn edit_replaces_in_place_without_moving_categories() {
        let store = MemoryStore::new();
        let mut manager = open(&store, "1").await;
        let mut docker = manager
            .categories()
            .iter()
            .find(|c| c.id == "containers")
            .and_then(|c| c.skills.iter().find(|s| s.id == "docker"))
            .cloned()
            .unwrap();
        docker.name = "Docker Engine".into();
        docker.category = "cloud-platforms".into();

        manager.edit_skill(docker).await;

        let containers = manager.categories().iter().find(|c| c.id == "containers").unwrap();
        let edited = containers.skills.iter().find(|s| s.id == "docker").unwrap();
        assert_eq!(edited.name, "Docker Engine");
        let cloud = manager.categories().iter().find(|c| c.id == "cloud-platforms").unwrap();
        assert!(cloud.skills.iter().all(|s| s.id != "docker"));
    }

    #[tokio::test]
    async fn delete_removes_the_skill() {
        let store = MemoryStore::new();
        let mut manager = open(&store, "1").await;
        let before = manager.stats().total_skills;

        manager.delete_skill("helm").await;
        manager.delete_skill("helm").await;

        assert_eq!(manager.stats().total_skills, before - 1);
        let reopened = open(&store, "1").await;
        assert_eq!(reopened.stats().total_skills, before - 1);
    }

    #[tokio::test]
    async fn submitted_workspace_ignores_every_mutation() {
        let store = MemoryStore::new();
        let mut manager = open(&store, "1").await;
        manager.submit_assessment().await;
        let frozen = manager.categories().to_vec();
        let some_skill = frozen[0].skills[0].clone();

        manager.set_level(&some_skill.id, SkillLevel::Expert).await;
        assert!(manager.add_skill(new_skill("containers")).await.is_none());
        manager.edit_skill(Skill { name: "Renamed".into(), ..some_skill.clone() }).await;
        manager.delete_skill(&some_skill.id).await;

        assert_eq!(manager.categories(), frozen.as_slice());
        assert_eq!(manager.status(), AssessmentStatus::Submitted);
    }

    #[tokio::test]
    async fn submitting_twice_keeps_one_ledger_entry() {
        let store = MemoryStore::new();
        let shared: Arc<dyn KeyValueStore> = Arc::new(store.clone());
        let mut manager = open(&store, "1").await;

        manager.set_level("aws", SkillLevel::Intermediate).await;
        manager.submit_assessment().await;
        let second = manager.submit_assessment().await;

        let ledger = KvLedgerRepo::new(shared).load_all().await.unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].user_id, "1");
        assert_eq!(ledger[0].skills, second.skills);
        assert_eq!(ledger[0].status, AssessmentStatus::Submitted);
    }

    #[tokio::test]
    async fn exported_json_parses_back_to_the_same_tree() {
        let store = MemoryStore::new();
        let mut manager = open(&store, "1").await;
        manager.set_level("python", SkillLevel::Expert).await;
        manager.add_skill(new_skill("scripting")).await;

        let json = manager.export_json().unwrap();
        let parsed: Vec<SkillCategory> = serde_json::from_str(&json).unwrap();

        assert_eq!(flatten_skills(&parsed), flatten_skills(manager.categories()));
    }

    #[tokio::test]
    async fn filter_drops_empty_categories() {
        let store = MemoryStore::new();
        let mut manager = open(&store, "1").await;
        manager.set_level("grafana", SkillLevel::Advanced).await;

        let filtered = manager.filtered_categories(&SkillFilter {
            level: Some(SkillLevel::Advanced),
            ..Default::default()
        });

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "monitoring");
        assert_eq!(filtered[0].skills.len(), 1);
    }

    #[tokio::test]
    async fn storage_failures_do_not_block_mutations() {
        let mut repo = MockAssessmentRepository::new();
        repo.expect_load_categories().returning(|_| Ok(None));
        repo.expect_load_status().returning(|_| Ok(None));
        repo.expect_save_categories()
            .returning(|_, _| Err(AppError::StorageError("disk full".into())));
        repo.expect_save_status()
            .returning(|_, _| Err(AppError::StorageError("disk full".into())));
        let mut ledger = MockLedgerRepository::new();
        ledger.expect_upsert()
            .times(1)
            .returning(|_| Err(AppError::StorageError("disk full".into())));

        let mut manager = AssessmentManager::load(employee("1"), repo, ledger).await;
        manager.set_level("bash", SkillLevel::Expert).await;
        let snapshot = manager.submit_assessment().await;

        assert_eq!(manager.stats().expert_skills, 1);
        assert_eq!(manager.status(), AssessmentStatus::Submitted);
        assert_eq!(snapshot.user_id, "1");
    }
}
