//! File-based credential storage.
//!
//! The session's durable entries live in one JSON file, by default
//! `<config dir>/folio/credentials.json`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use folio_application::ports::{CredentialStorage, StorageError};
use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

const SCHEMA_VERSION: u32 = 1;

/// On-disk layout:
/// ```json
/// {
///   "entries": {
///     "auth-access-token": "\"eyJhbGciOi...\"",
///     "auth-user-data": "{\"id\":\"...\",\"username\":\"ada\"}"
///   },
///   "schema_version": 1
/// }
/// ```
#[derive(Debug, Serialize, Deserialize)]
struct CredentialFile {
    schema_version: u32,
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

impl Default for CredentialFile {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            entries: BTreeMap::new(),
        }
    }
}

/// Credential storage backed by a single JSON file.
///
/// Writes go through a temporary file and a rename, so a crash mid-write
/// leaves the previous contents in place. Mutations within one process are
/// serialized.
#[derive(Debug)]
pub struct FileCredentialStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileCredentialStorage {
    /// Creates a storage over `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// `<config dir>/folio/credentials.json`, if the platform has a config
    /// directory.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("folio").join("credentials.json"))
    }

    /// The backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<CredentialFile, StorageError> {
        let content = match fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(CredentialFile::default());
            }
            Err(e) => return Err(io_error(&self.path, &e)),
        };

        let file: CredentialFile = serde_json::from_slice(&content)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        if file.schema_version != SCHEMA_VERSION {
            return Err(StorageError::Serialization(format!(
                "unsupported credential file version {}",
                file.schema_version
            )));
        }
        Ok(file)
    }

    async fn write(&self, file: &CredentialFile) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error(parent, &e))?;
        }

        let content = encode(file)?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, &content)
            .await
            .map_err(|e| io_error(&staging, &e))?;
        restrict_permissions(&staging).await?;
        fs::rename(&staging, &self.path)
            .await
            .map_err(|e| io_error(&self.path, &e))?;

        debug!(path = %self.path.display(), entries = file.entries.len(), "credentials written");
        Ok(())
    }
}

/// Two-space indented JSON with a trailing newline. Keys come out sorted
/// because the entries are a `BTreeMap`.
fn encode(file: &CredentialFile) -> Result<Vec<u8>, StorageError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"  ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    file.serialize(&mut serializer).map_err(|e| StorageError::Serialization(e.to_string()))?;
    buffer.push(b'\n');
    Ok(buffer)
}

fn io_error(path: &Path, error: &std::io::Error) -> StorageError {
    StorageError::Io(format!("{}: {error}", path.display()))
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> Result<(), StorageError> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .await
        .map_err(|e| io_error(path, &e))
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> Result<(), StorageError> {
    Ok(())
}

#[async_trait]
impl CredentialStorage for FileCredentialStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read().await?.entries.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut file = self.read().await?;
        file.entries.insert(key.to_string(), value.to_string());
        self.write(&file).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut file = self.read().await?;
        if file.entries.remove(key).is_none() {
            return Ok(());
        }
        self.write(&file).await
    }
}
