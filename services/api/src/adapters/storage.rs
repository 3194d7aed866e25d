//! services/api/src/adapters/storage.rs
//!
//! Local-disk implementation of the `FileStorageService` port. Uploads land in
//! `<root>/<project_id>/<uuid>_<filename>`, so two uploads with the same name
//! never collide. The on-disk name is shortened when needed so the prefixed
//! name stays under the usual 255-byte limit; the full name is kept in the record.

use async_trait::async_trait;
use project_workspace_core::domain::StoredFile;
use project_workspace_core::ports::{FileStorageService, PortError, PortResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::info;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates the upload root if it does not exist yet.
    pub async fn ensure_root(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.root).await
    }

    fn project_dir(&self, project_id: i64) -> PathBuf {
        self.root.join(project_id.to_string())
    }
}

/// Reduces a client-supplied filename to its last path component.
pub fn sanitize_filename(raw: &str) -> PortResult<String> {
    let name = raw
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>();
    let name = name.trim();

    if name.is_empty() || name == "." || name == ".." {
        return Err(PortError::Validation(format!(
            "filename: '{}' is not a usable file name",
            raw
        )));
    }
    Ok(name.to_string())
}

/// Longest name kept after the uuid prefix, in bytes.
const MAX_DISK_NAME_BYTES: usize = 200;

/// Shortens a sanitized name to `MAX_DISK_NAME_BYTES` on a char boundary,
/// keeping an extension of up to 16 bytes.
fn disk_name(name: &str) -> String {
    if name.len() <= MAX_DISK_NAME_BYTES {
        return name.to_string();
    }
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && ext.len() < 16 => {
            (stem, &name[stem.len()..])
        }
        _ => (name, ""),
    };
    let mut cut = MAX_DISK_NAME_BYTES - ext.len();
    while !stem.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}{}", &stem[..cut], ext)
}

fn storage_error(action: &str, path: &Path, e: std::io::Error) -> PortError {
    PortError::Storage(format!("failed to {} {}: {}", action, path.display(), e))
}

#[async_trait]
impl FileStorageService for LocalFileStorage {
    async fn save_file(
        &self,
        project_id: i64,
        filename: &str,
        data: &[u8],
    ) -> PortResult<StoredFile> {
        let filename = sanitize_filename(filename)?;
        let dir = self.project_dir(project_id);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| storage_error("create directory", &dir, e))?;

        let dest = dir.join(format!(
            "{}_{}",
            Uuid::new_v4().simple(),
            disk_name(&filename)
        ));
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&dest)
            .await
            .map_err(|e| storage_error("create", &dest, e))?;
        file.write_all(data)
            .await
            .map_err(|e| storage_error("write", &dest, e))?;
        file.flush()
            .await
            .map_err(|e| storage_error("flush", &dest, e))?;

        info!("Saved {} bytes to {}", data.len(), dest.display());
        Ok(StoredFile {
            filename,
            path: dest.to_string_lossy().into_owned(),
        })
    }

    async fn read_file(&self, path: &str) -> PortResult<Vec<u8>> {
        fs::read(path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => PortError::NotFound(format!("File {} not found", path)),
            _ => storage_error("read", Path::new(path), e),
        })
    }

    async fn remove_file(&self, path: &str) -> PortResult<()> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error("remove", Path::new(path), e)),
        }
    }

    async fn remove_project_files(&self, project_id: i64) -> PortResult<()> {
        let dir = self.project_dir(project_id);
        match fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error("remove directory", &dir, e)),
        }
    }
}
