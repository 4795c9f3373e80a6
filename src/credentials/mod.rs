use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::AppError;

pub type Credentials = BTreeMap<String, String>;

/// Username → password mapping kept in a flat JSON file.
///
/// Every call reads or rewrites the whole file. There is no locking: two
/// concurrent registrations race and the last writer wins.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<Credentials, AppError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("Credential file {} not found, starting empty", self.path.display());
                return Ok(Credentials::new());
            }
            Err(e) => {
                tracing::error!("Failed to read credential file {}: {}", self.path.display(), e);
                return Err(AppError::StorageUnavailable(e.to_string()));
            }
        };

        serde_json::from_slice(&raw).map_err(|e| {
            tracing::error!("Malformed credential file {}: {}", self.path.display(), e);
            AppError::StorageUnavailable(format!("malformed credential file: {}", e))
        })
    }

    /// Writes the mapping to a sibling temp file, then renames it over the
    /// target so readers never observe a partial file.
    pub async fn save(&self, credentials: &Credentials) -> Result<(), AppError> {
        let json = serde_json::to_vec_pretty(credentials)
            .map_err(|e| AppError::StorageUnavailable(e.to_string()))?;

        let tmp = self.temp_path();
        if let Err(e) = tokio::fs::write(&tmp, &json).await {
            tracing::error!("Failed to write {}: {}", tmp.display(), e);
            return Err(AppError::StorageUnavailable(e.to_string()));
        }
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            tracing::error!("Failed to replace {}: {}", self.path.display(), e);
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(AppError::StorageUnavailable(e.to_string()));
        }
        Ok(())
    }

    pub async fn verify(&self, username: &str, password: &str) -> Result<bool, AppError> {
        let credentials = self.load().await?;
        Ok(credentials.get(username).is_some_and(|stored| stored == password))
    }

    /// Adds a new record. An existing username leaves the file untouched.
    pub async fn register(&self, username: &str, password: &str) -> Result<(), AppError> {
        let mut credentials = self.load().await?;
        if credentials.contains_key(username) {
            return Err(AppError::UsernameTaken);
        }
        credentials.insert(username.to_string(), password.to_string());
        self.save(&credentials).await?;
        tracing::info!("Registered user {}", username);
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "users.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> CredentialStore {
        CredentialStore::new(dir.path().join("users.json"))
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_then_load_returns_same_mapping() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut credentials = Credentials::new();
        credentials.insert("alice".into(), "pw1".into());
        credentials.insert("bob".into(), "päss wörd".into());
        credentials.insert(String::new(), String::new());

        store.save(&credentials).await.unwrap();
        assert_eq!(store.load().await.unwrap(), credentials);
        assert!(!store.temp_path().exists());

        store.save(&Credentials::new()).await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_file_is_storage_unavailable() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), b"{\"alice\": 42").unwrap();
        assert!(matches!(
            store.load().await,
            Err(AppError::StorageUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn unwritable_location_is_storage_unavailable() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(dir.path().join("missing-dir").join("users.json"));
        assert!(matches!(
            store.save(&Credentials::new()).await,
            Err(AppError::StorageUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn duplicate_registration_leaves_mapping_unchanged() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.register("alice", "pw1").await.unwrap();

        let err = store.register("alice", "other").await.unwrap_err();
        assert!(matches!(err, AppError::UsernameTaken));

        let credentials = store.load().await.unwrap();
        assert_eq!(credentials.len(), 1);
        assert_eq!(credentials["alice"], "pw1");
    }

    #[tokio::test]
    async fn verify_requires_exact_pair() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.register("alice", "pw1").await.unwrap();

        assert!(store.verify("alice", "pw1").await.unwrap());
        assert!(!store.verify("alice", "wrong").await.unwrap());
        assert!(!store.verify("mallory", "pw1").await.unwrap());
    }
}
