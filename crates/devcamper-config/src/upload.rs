use std::env;
use std::path::PathBuf;

use crate::env_or;

/// URL prefix uploaded photos are served under.
pub const UPLOADS_ROUTE: &str = "/uploads";

#[derive(Clone, Debug)]
pub struct UploadConfig {
    pub path: PathBuf,
    /// Largest accepted upload in bytes.
    pub max_size: usize,
}

impl UploadConfig {
    pub fn from_env() -> Self {
        Self {
            path: env::var("FILE_UPLOAD_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./public/uploads")),
            max_size: env_or("MAX_FILE_UPLOAD", 1_000_000),
        }
    }
}
