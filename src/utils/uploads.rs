//! Uploads are staged as temp files and only moved into the upload directory
//! after the database commit. A staged file that is never promoted is deleted
//! when it is dropped.

use chrono::Utc;
use log::{debug, warn};
use rand::Rng;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs;

use crate::errors::AppError;
use crate::models::attachment::StoredFile;

pub const ALLOWED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "application/pdf"];
pub const PUBLIC_PREFIX: &str = "/uploads";

const STAGING_DIR: &str = ".staging";
const NAME_SUFFIX_LEN: usize = 13;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, Copy)]
pub struct UploadLimits {
    pub max_files: usize,
    pub max_file_bytes: usize,
}

#[derive(Debug)]
pub struct StagedFile {
    pub stored: StoredFile,
    temp: NamedTempFile,
}

#[derive(Debug)]
pub struct UploadStore {
    root: PathBuf,
    staging: PathBuf,
    limits: UploadLimits,
}

impl UploadStore {
    /// Creates the upload and staging directories if they are missing.
    pub async fn prepare(root: impl Into<PathBuf>, limits: UploadLimits) -> io::Result<Self> {
        let root = root.into();
        let staging = root.join(STAGING_DIR);
        fs::create_dir_all(&staging).await?;
        Ok(UploadStore { root, staging, limits })
    }

    pub fn limits(&self) -> UploadLimits {
        self.limits
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn stage(&self, original_name: Option<&str>, bytes: &[u8]) -> Result<StagedFile, AppError> {
        if bytes.len() > self.limits.max_file_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "File size exceeds {} byte limit",
                self.limits.max_file_bytes
            )));
        }

        let file_type = infer::get(bytes)
            .filter(|kind| ALLOWED_MIME_TYPES.contains(&kind.mime_type()))
            .ok_or_else(|| {
                AppError::BadRequest("Invalid file type. Only JPEG, PNG, and PDF are allowed.".to_string())
            })?;

        let extension = original_extension(original_name)
            .unwrap_or_else(|| file_type.extension().to_string());
        let file_name = generate_file_name(&extension);

        let temp = NamedTempFile::new_in(&self.staging)?;
        fs::write(temp.path(), bytes).await?;
        debug!("Staged upload {} ({}, {} bytes)", file_name, file_type.mime_type(), bytes.len());

        Ok(StagedFile {
            stored: StoredFile {
                file_path: format!("{}/{}", PUBLIC_PREFIX, file_name),
                file_name,
            },
            temp,
        })
    }

    /// Moves every staged file into the upload directory. A failed move does
    /// not stop the others; its staged copy is deleted and its name returned.
    pub fn promote_all(&self, files: Vec<StagedFile>) -> Vec<String> {
        let mut failed = Vec::new();
        for file in files {
            let target = self.root.join(&file.stored.file_name);
            if let Err(err) = file.temp.persist(&target) {
                warn!("Failed to move upload into {}: {}", target.display(), err.error);
                failed.push(file.stored.file_name);
            }
        }
        failed
    }

    pub fn discard_all(&self, files: Vec<StagedFile>) {
        for file in files {
            let staged = file.temp.path().to_path_buf();
            if let Err(err) = file.temp.close() {
                warn!("Failed to discard staged upload {}: {}", staged.display(), err);
            }
        }
    }
}

fn original_extension(original_name: Option<&str>) -> Option<String> {
    let extension = Path::new(original_name?).extension()?.to_str()?;
    if extension.is_empty() || !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(extension.to_string())
}

/// `<unix millis>-<13 base36 chars>.<extension>`
pub fn generate_file_name(extension: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..NAME_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{}-{}.{}", Utc::now().timestamp_millis(), suffix, extension)
}
