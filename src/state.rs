use std::sync::Arc;

use creche_config::{CorsConfig, JwtConfig, StorageConfig};
use creche_core::{FileStorage, LocalFileStorage};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub storage_config: StorageConfig,
    pub file_storage: Arc<dyn FileStorage>,
}

impl AppState {
    /// Builds state around an existing pool, reading the rest from the environment.
    pub fn new(db: PgPool) -> Self {
        let storage_config = StorageConfig::from_env();
        let file_storage = Arc::new(LocalFileStorage::new(
            storage_config.upload_dir.clone(),
            storage_config.base_url.clone(),
            storage_config.max_upload_bytes,
        ));

        Self {
            db,
            jwt_config: JwtConfig::from_env(),
            cors_config: CorsConfig::from_env(),
            storage_config,
            file_storage,
        }
    }
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let db = creche_db::init_db_pool().await?;
    Ok(AppState::new(db))
}
