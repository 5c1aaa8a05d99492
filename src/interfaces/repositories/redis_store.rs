use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Pool};

use crate::{errors::StoreError, repositories::kv_store::KeyValueStore};

#[derive(Clone)]
pub struct RedisStore {
    pool: Pool,
    /// Namespace prepended to every record key.
    prefix: String,
}

impl RedisStore {
    pub fn new(pool: Pool, prefix: impl Into<String>) -> Self {
        RedisStore {
            pool,
            prefix: prefix.into(),
        }
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.pool.get().await?;
        let value: Option<String> = conn.get(self.namespaced(key)).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await?;
        let _: () = conn.set(self.namespaced(key), value).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await?;
        let _: () = conn.del(self.namespaced(key)).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.pool.get().await?;
        let pong: String = deadpool_redis::redis::cmd("PING")
            .query_async(&mut conn)
            .await?;
        if pong == "PONG" {
            Ok(())
        } else {
            Err(StoreError::Redis(format!("unexpected PING reply: {pong}")))
        }
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
