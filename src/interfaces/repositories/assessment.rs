use async_trait::async_trait;

use crate::{
    constants::{assessment_status_key, skill_data_key},
    entities::{assessment::AssessmentStatus, skill::SkillCategory},
    errors::{AppError, StoreError},
    repositories::kv_store::SharedStore,
};

/// Per-user workspace records: the category tree and the lifecycle status.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssessmentRepository: Send + Sync {
    /// `Ok(None)` when the user has never saved anything.
    async fn load_categories(&self, user_id: &str) -> Result<Option<Vec<SkillCategory>>, AppError>;

    async fn save_categories(&self, user_id: &str, categories: &[SkillCategory]) -> Result<(), AppError>;

    async fn load_status(&self, user_id: &str) -> Result<Option<AssessmentStatus>, AppError>;

    async fn save_status(&self, user_id: &str, status: AssessmentStatus) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct KvAssessmentRepo {
    store: SharedStore,
}

impl KvAssessmentRepo {
    pub fn new(store: SharedStore) -> Self {
        KvAssessmentRepo { store }
    }
}

#[async_trait]
impl AssessmentRepository for KvAssessmentRepo {
    async fn load_categories(&self, user_id: &str) -> Result<Option<Vec<SkillCategory>>, AppError> {
        let Some(raw) = self.store.get(&skill_data_key(user_id)).await? else {
            return Ok(None);
        };

        let categories = serde_json::from_str(&raw).map_err(StoreError::from)?;
        Ok(Some(categories))
    }

    async fn save_categories(&self, user_id: &str, categories: &[SkillCategory]) -> Result<(), AppError> {
        let raw = serde_json::to_string(categories)?;
        self.store.set(&skill_data_key(user_id), raw).await?;
        Ok(())
    }

    async fn load_status(&self, user_id: &str) -> Result<Option<AssessmentStatus>, AppError> {
        let Some(raw) = self.store.get(&assessment_status_key(user_id)).await? else {
            return Ok(None);
        };

        raw.parse::<AssessmentStatus>()
            .map(Some)
            .map_err(|e| StoreError::Serialization(e).into())
    }

    async fn save_status(&self, user_id: &str, status: AssessmentStatus) -> Result<(), AppError> {
        self.store
            .set(&assessment_status_key(user_id), status.as_str().to_string())
            .await?;
        Ok(())
    }
}
