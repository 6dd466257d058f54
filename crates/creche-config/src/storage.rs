use std::env;
use std::path::PathBuf;

use crate::env_parse;

/// Where uploaded nursery documents are written and the URL they are served from.
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    pub base_url: String,
    pub max_upload_bytes: usize,
}

impl StorageConfig {
    pub fn from_env() -> Self {
        Self {
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("storage/uploads")),
            base_url: env::var("UPLOAD_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000/files".to_string()),
            max_upload_bytes: env_parse("UPLOAD_MAX_BYTES", 10 * 1024 * 1024),
        }
    }
}
