use std::{sync::Arc, time::Duration};

use deadpool_redis::{Config as RedisConfig, Pool, Runtime};
use tracing::info;

use crate::{
    errors::StoreError,
    repositories::{
        file_store::FileStore,
        kv_store::{KeyValueStore, MemoryStore, SharedStore},
        redis_store::RedisStore,
    },
    settings::{AppConfig, StorageBackend},
};

/// Opens the record store selected by `storage`.
pub async fn open_store(config: &AppConfig) -> Result<SharedStore, StoreError> {
    let store: SharedStore = match config.storage {
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::File => {
            let dir = config
                .data_dir
                .as_ref()
                .ok_or_else(|| StoreError::Misconfigured("data_dir is not configured".into()))?;
            Arc::new(FileStore::open(dir).await?)
        }
        StorageBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .ok_or_else(|| StoreError::Misconfigured("redis_url is not configured".into()))?;
            let pool = create_redis_pool(url).await?;
            Arc::new(RedisStore::new(pool, config.redis_prefix.clone()))
        }
    };

    info!(backend = store.backend_name(), "Record store ready");
    Ok(store)
}

/// Builds the pool and waits for the server to answer PING, backing off
/// between attempts.
pub async fn create_redis_pool(redis_url: &str) -> Result<Pool, StoreError> {
    let max_retries = 5;
    let mut retry_count = 0;
    let mut wait_seconds = 2;

    let pool = RedisConfig::from_url(redis_url)
        .create_pool(Some(Runtime::Tokio1))
        .map_err(|e| StoreError::Misconfigured(e.to_string()))?;
    let probe = RedisStore::new(pool.clone(), "");

    loop {
        match probe.ping().await {
            Ok(()) => {
                info!("Redis connection established.");
                return Ok(pool);
            }
            Err(e) if retry_count < max_retries => {
                retry_count += 1;
                info!(
                    "Failed to reach Redis (attempt {}/{}): {}. Retrying in {}s...",
                    retry_count, max_retries, e, wait_seconds
                );

                tokio::time::sleep(Duration::from_secs(wait_seconds)).await;
                wait_seconds *= 2;
            }
            Err(e) => return Err(e),
        }
    }
}
