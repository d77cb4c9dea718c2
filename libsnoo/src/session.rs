//! Session state: the modhash/cookie pair and where it is persisted
//!
//! A session starts anonymous. It becomes authenticated either by loading a
//! previously saved session file or by a successful login. There is no
//! logout; a fresh client starts a fresh session.
//!
//! The session file is a flat JSON document:
//!
//! ```json
//! {"modhash": "...", "cookie": "..."}
//! ```
//!
//! Unknown keys are ignored on load and dropped on save.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SnooError};

/// Authentication material issued by the service on login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub modhash: String,
    pub cookie: String,
}

/// Observable login state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticated,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    credentials: Option<Credentials>,
    path: Option<PathBuf>,
}

impl Session {
    /// Create an empty, anonymous session
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an anonymous session that remembers where it should be saved
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            credentials: None,
            path: Some(path.into()),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn state(&self) -> AuthState {
        if self.is_logged_in() {
            AuthState::Authenticated
        } else {
            AuthState::Anonymous
        }
    }

    /// Guard for operations that mutate state or read private data
    pub fn require_login(&self) -> Result<()> {
        if self.is_logged_in() {
            Ok(())
        } else {
            Err(SnooError::AuthenticationRequired)
        }
    }

    pub fn modhash(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.modhash.as_str())
    }

    pub fn cookie(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.cookie.as_str())
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// The file this session was loaded from or last saved to
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Install credentials directly. `Client::login` goes through this;
    /// embedders that already hold a modhash and cookie can too.
    pub fn set_credentials(&mut self, modhash: impl Into<String>, cookie: impl Into<String>) {
        self.credentials = Some(Credentials {
            modhash: modhash.into(),
            cookie: cookie.into(),
        });
    }

    /// Load a session file.
    ///
    /// Returns `Ok(false)` and leaves the session untouched when the file
    /// does not exist. A file that exists but cannot be read or parsed is
    /// `SessionCorrupt`.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<bool> {
        let path = path.as_ref();

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No session file at {}", path.display());
                return Ok(false);
            }
            Err(e) => {
                return Err(SnooError::SessionCorrupt(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let credentials: Credentials = serde_json::from_str(&content).map_err(|e| {
            SnooError::SessionCorrupt(format!("failed to parse {}: {}", path.display(), e))
        })?;

        self.credentials = Some(credentials);
        self.path = Some(path.to_path_buf());
        tracing::info!("Loaded session from {}", path.display());

        Ok(true)
    }

    /// Persist the session.
    ///
    /// Uses `path` when given, otherwise the remembered path. The resolved
    /// path is remembered for later saves.
    pub fn save(&mut self, path: Option<&Path>) -> Result<()> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(SnooError::AuthenticationRequired)?;

        let target = path
            .map(Path::to_path_buf)
            .or_else(|| self.path.clone())
            .ok_or(SnooError::MissingPath)?;

        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string(credentials)
            .map_err(|e| SnooError::InvalidInput(format!("failed to encode session: {}", e)))?;
        std::fs::write(&target, json)?;

        // The cookie works like a password
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&target, perms)?;
        }

        tracing::info!("Saved session to {}", target.display());
        self.path = Some(target);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_session_is_anonymous() {
        let session = Session::new();
        assert!(!session.is_logged_in());
        assert_eq!(session.state(), AuthState::Anonymous);
        assert!(session.modhash().is_none());
        assert!(session.cookie().is_none());
        assert!(matches!(
            session.require_login(),
            Err(SnooError::AuthenticationRequired)
        ));
    }

    #[test]
    fn test_set_credentials_logs_in() {
        let mut session = Session::new();
        session.set_credentials("m", "c");
        assert!(session.is_logged_in());
        assert_eq!(session.state(), AuthState::Authenticated);
        assert_eq!(session.modhash(), Some("m"));
        assert_eq!(session.cookie(), Some("c"));
        assert!(session.require_login().is_ok());
    }

    #[test]
    fn test_load_missing_file_returns_false() {
        let dir = TempDir::new().unwrap();
        let mut session = Session::new();

        let loaded = session.load(dir.path().join("missing.json")).unwrap();

        assert!(!loaded);
        assert!(!session.is_logged_in());
        assert!(session.path().is_none());
    }

    #[test]
    fn test_load_valid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"modhash":"m","cookie":"c"}"#).unwrap();

        let mut session = Session::new();
        assert!(session.load(&path).unwrap());
        assert!(session.is_logged_in());
        assert_eq!(session.modhash(), Some("m"));
        assert_eq!(session.cookie(), Some("c"));
        assert_eq!(session.path(), Some(path.as_path()));
    }

    #[test]
    fn test_load_ignores_extra_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"modhash":"m","cookie":"c","user":"alice"}"#).unwrap();

        let mut session = Session::new();
        assert!(session.load(&path).unwrap());
        assert_eq!(session.modhash(), Some("m"));
    }

    #[test]
    fn test_load_malformed_file_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json at all").unwrap();

        let mut session = Session::new();
        let result = session.load(&path);
        assert!(matches!(result, Err(SnooError::SessionCorrupt(_))));
        assert!(!session.is_logged_in());
    }

    #[test]
    fn test_load_half_session_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"modhash":"m"}"#).unwrap();

        let mut session = Session::new();
        assert!(matches!(
            session.load(&path),
            Err(SnooError::SessionCorrupt(_))
        ));
        assert!(!session.is_logged_in());
    }

    #[test]
    fn test_save_requires_login() {
        let dir = TempDir::new().unwrap();
        let mut session = Session::new();
        let path = dir.path().join("session.json");

        let result = session.save(Some(&path));
        assert!(matches!(result, Err(SnooError::AuthenticationRequired)));
        assert!(!path.exists());
    }

    #[test]
    fn test_save_without_any_path() {
        let mut session = Session::new();
        session.set_credentials("m", "c");
        assert!(matches!(session.save(None), Err(SnooError::MissingPath)));
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let mut session = Session::new();
        session.set_credentials("hash123", "cookie456");
        session.save(Some(&path)).unwrap();
        assert_eq!(session.path(), Some(path.as_path()));

        let mut restored = Session::new();
        assert!(restored.load(&path).unwrap());
        assert_eq!(restored.credentials(), session.credentials());
    }

    #[test]
    fn test_save_reuses_remembered_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        let mut session = Session::with_path(&path);
        session.set_credentials("m1", "c1");
        session.save(None).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, serde_json::json!({"modhash": "m1", "cookie": "c1"}));
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_session_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        // A pre-existing world-readable file gets tightened too
        std::fs::write(&path, "{}").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let mut session = Session::new();
        session.set_credentials("H", "C");
        session.save(Some(&path)).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
