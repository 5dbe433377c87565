//! Session token storage.
//!
//! The session is a single opaque token stored under the `authToken` key in
//! `${TASKDECK_HOME}/session.json` with restricted permissions (0600).
//! Tokens are never logged or displayed in full.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::paths;
use crate::route::Route;

/// Key the token is stored under.
pub const TOKEN_KEY: &str = "authToken";

/// Durable storage for the session token.
///
/// `get` never fails for a missing token: absence is the normal
/// unauthenticated state.
pub trait TokenStore: Send + Sync {
    fn save(&self, token: &str) -> Result<()>;
    fn get(&self) -> Result<Option<String>>;
    /// Removes the token. Returns whether a token was present.
    fn remove(&self) -> Result<bool>;
}

/// On-disk layout of the session file (a single key-value entry).
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct SessionFile {
    #[serde(flatten)]
    entries: BTreeMap<String, String>,
}

/// File-backed token store.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location under TASKDECK_HOME.
    pub fn default_location() -> Self {
        Self::new(paths::session_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the session file. A file that does not parse is treated as
    /// empty so a corrupt session never locks the user out.
    fn load(&self) -> Result<SessionFile> {
        if !self.path.exists() {
            return Ok(SessionFile::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session from {}", self.path.display()))?;
        if contents.trim().is_empty() {
            return Ok(SessionFile::default());
        }

        match serde_json::from_str(&contents) {
            Ok(file) => Ok(file),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable session file");
                Ok(SessionFile::default())
            }
        }
    }

    /// Writes via temp file + rename so a crash never leaves a partial token.
    fn write(&self, file: &SessionFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents = serde_json::to_string_pretty(file).context("Failed to serialize session")?;
        let tmp_path = self.path.with_extension("json.tmp");

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut handle = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&tmp_path)
                .with_context(|| format!("Failed to open {} for writing", tmp_path.display()))?;
            handle
                .write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", tmp_path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&tmp_path, contents)
                .with_context(|| format!("Failed to write to {}", tmp_path.display()))?;
        }

        fs::rename(&tmp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn save(&self, token: &str) -> Result<()> {
        let mut file = SessionFile::default();
        file.entries.insert(TOKEN_KEY.to_string(), token.to_string());
        self.write(&file)?;
        tracing::debug!(path = %self.path.display(), token = %mask_token(token), "session token saved");
        Ok(())
    }

    fn get(&self) -> Result<Option<String>> {
        let file = self.load()?;
        Ok(file
            .entries
            .get(TOKEN_KEY)
            .filter(|t| !t.is_empty())
            .cloned())
    }

    fn remove(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        let mut file = self.load()?;
        let had_token = file.entries.remove(TOKEN_KEY).is_some();
        self.write(&file)?;
        tracing::debug!(path = %self.path.display(), had_token, "session token cleared");
        Ok(had_token)
    }
}

/// In-memory token store.
#[derive(Debug, Default, Clone)]
pub struct MemoryTokenStore {
    token: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Arc::new(Mutex::new(Some(token.into()))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn save(&self, token: &str) -> Result<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn get(&self) -> Result<Option<String>> {
        Ok(self
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn remove(&self) -> Result<bool> {
        Ok(self
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some())
    }
}

/// Explicit session context handed to every authenticated operation.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// Session backed by the default session file.
    pub fn from_default_store() -> Self {
        Self::new(Arc::new(FileTokenStore::default_location()))
    }

    pub fn save(&self, token: &str) -> Result<()> {
        self.store.save(token)
    }

    pub fn get(&self) -> Result<Option<String>> {
        self.store.get()
    }

    pub fn is_authenticated(&self) -> Result<bool> {
        Ok(self.get()?.is_some())
    }

    /// Clears the token and returns the unauthenticated entry screen.
    pub fn clear(&self) -> Result<Route> {
        let had_token = self.store.remove()?;
        tracing::info!(had_token, "logged out");
        Ok(Route::Login)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

/// Returns a masked version of a token for display (first 8 chars + ...).
pub fn mask_token(token: &str) -> String {
    if token.chars().count() <= 12 {
        return "***".to_string();
    }
    let prefix: String = token.chars().take(8).collect();
    format!("{prefix}...")
}
