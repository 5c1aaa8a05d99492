use async_trait::async_trait;

use crate::{
    constants::CURRENT_USER_KEY,
    entities::user::User,
    errors::{AppError, StoreError},
    repositories::kv_store::SharedStore,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn load_current_user(&self) -> Result<Option<User>, AppError>;

    async fn save_current_user(&self, user: &User) -> Result<(), AppError>;

    async fn clear_current_user(&self) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct KvSessionRepo {
    store: SharedStore,
}

impl KvSessionRepo {
    pub fn new(store: SharedStore) -> Self {
        KvSessionRepo { store }
    }
}

#[async_trait]
impl SessionRepository for KvSessionRepo {
    async fn load_current_user(&self) -> Result<Option<User>, AppError> {
        match self.store.get(CURRENT_USER_KEY).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw).map_err(StoreError::from)?)),
            None => Ok(None),
        }
    }

    async fn save_current_user(&self, user: &User) -> Result<(), AppError> {
        let raw = serde_json::to_string(user)?;
        self.store.set(CURRENT_USER_KEY, raw).await?;
        Ok(())
    }

    async fn clear_current_user(&self) -> Result<(), AppError> {
        self.store.remove(CURRENT_USER_KEY).await?;
        Ok(())
    }
}
