use async_trait::async_trait;
use serde_json::Value;

use crate::{
    constants::ALL_ASSESSMENTS_KEY,
    entities::assessment::UserSkillAssessment,
    errors::{AppError, StoreError},
    repositories::kv_store::SharedStore,
};

/// Shared list of submitted assessments, at most one per user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    async fn load_all(&self) -> Result<Vec<UserSkillAssessment>, AppError>;

    /// Replaces any entry for the same user, then appends.
    async fn upsert(&self, assessment: UserSkillAssessment) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct KvLedgerRepo {
    store: SharedStore,
}

impl KvLedgerRepo {
    pub fn new(store: SharedStore) -> Self {
        KvLedgerRepo { store }
    }
}

#[async_trait]
impl LedgerRepository for KvLedgerRepo {
    async fn load_all(&self) -> Result<Vec<UserSkillAssessment>, AppError> {
        match self.store.get(ALL_ASSESSMENTS_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw).map_err(StoreError::from)?),
            None => Ok(Vec::new()),
        }
    }

    async fn upsert(&self, assessment: UserSkillAssessment) -> Result<(), AppError> {
        // Other users' entries are carried over as raw JSON, readable or not.
        // A ledger that is not a JSON array is left as it is.
        let mut entries: Vec<Value> = match self.store.get(ALL_ASSESSMENTS_KEY).await? {
            Some(raw) => serde_json::from_str(&raw).map_err(StoreError::from)?,
            None => Vec::new(),
        };

        entries.retain(|entry| {
            entry.get("userId").and_then(Value::as_str) != Some(assessment.user_id.as_str())
        });
        entries.push(serde_json::to_value(&assessment)?);

        let raw = serde_json::to_string(&entries)?;
        self.store.set(ALL_ASSESSMENTS_KEY, raw).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::repositories::kv_store::{KeyValueStore, MemoryStore};

    #[tokio::test]
    async fn empty_ledger_reads_as_no_entries() {
        let repo = KvLedgerRepo::new(Arc::new(MemoryStore::new()));
        assert!(repo.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn upsert_replaces_the_users_previous_entry() {
        let repo = KvLedgerRepo::new(Arc::new(MemoryStore::new()));

        repo.upsert(UserSkillAssessment::submitted("1", vec![])).await.unwrap();
        repo.upsert(UserSkillAssessment::submitted("2", vec![])).await.unwrap();
        let mut replacement = UserSkillAssessment::submitted("1", vec![]);
        replacement.id = "assessment-1-latest".into();
        repo.upsert(replacement).await.unwrap();

        let entries = repo.load_all().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].user_id, "2");
        assert_eq!(entries[1].id, "assessment-1-latest");
    }

    #[tokio::test]
    async fn upsert_keeps_entries_it_cannot_read() {
        let store = MemoryStore::new();
        let unreadable_entry = r#"[{"id":"assessment-2-1","userId":"2","skills":[{"id":"aws","name":"AWS","category":"cloud-platforms","level":5,"lastUpdated":"2024-03-05T12:00:00Z"}],"completedAt":"2024-03-05T12:00:00Z","status":"submitted"}]"#;
        store.set(ALL_ASSESSMENTS_KEY, unreadable_entry.into()).await.unwrap();
        let repo = KvLedgerRepo::new(Arc::new(store.clone()));
        assert!(repo.load_all().await.is_err());

        repo.upsert(UserSkillAssessment::submitted("1", vec![])).await.unwrap();

        let raw = store.get(ALL_ASSESSMENTS_KEY).await.unwrap().unwrap();
        let entries: Vec<Value> = serde_json::from_str(&raw).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["userId"], "2");
        assert_eq!(entries[0]["skills"][0]["level"], 5);
        assert_eq!(entries[1]["userId"], "1");
    }

    #[tokio::test]
    async fn upsert_leaves_a_corrupt_ledger_untouched() {
        let store = MemoryStore::new();
        store.set(ALL_ASSESSMENTS_KEY, "oops".into()).await.unwrap();
        let repo = KvLedgerRepo::new(Arc::new(store.clone()));

        let result = repo.upsert(UserSkillAssessment::submitted("1", vec![])).await;

        assert!(matches!(result, Err(AppError::StorageError(_))));
        assert_eq!(store.get(ALL_ASSESSMENTS_KEY).await.unwrap().as_deref(), Some("oops"));
    }
}
