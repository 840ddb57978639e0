use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct StorageConfig {
    /// Directory where uploaded coursework files are written.
    pub upload_dir: PathBuf,
    /// Public URL prefix under which the upload directory is served.
    pub public_base_url: String,
}

impl StorageConfig {
    pub fn from_env() -> Self {
        Self {
            upload_dir: env::var("STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("storage/uploads")),
            public_base_url: env::var("FILES_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000/files".to_string()),
        }
    }
}
