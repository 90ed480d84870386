//! # Sign-in Session
//!
//! Who is using the client, in which mode, and with which token.
//!
//! Credentials live at `~/.ridealong/credentials.json` (token plus user
//! profile). The sign-in flow writes that file; this client only reads it
//! and deletes it on logout.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::backend::AuthToken;
use crate::core::trip::{Mode, User};

/// The acting user's context, passed into every command.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub token: Option<AuthToken>,
    pub user: User,
    pub mode: Mode,
}

impl Session {
    pub fn new(token: Option<AuthToken>, user: User, mode: Mode) -> Self {
        Self { token, user, mode }
    }

    /// Drops the token and identity and falls back to passenger mode.
    pub fn sign_out(&mut self) {
        self.token = None;
        self.user = User::guest();
        self.mode = Mode::Passenger;
    }

    /// The chat-facing identifier of the signed-in user.
    pub fn chat_identity(&self) -> String {
        self.user.user_id.to_string()
    }
}

/// On-disk layout of the credentials file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StoredCredentials {
    pub token: String,
    pub user: User,
}

#[derive(Debug)]
pub enum CredentialError {
    Io(io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialError::Io(e) => write!(f, "credentials I/O error: {e}"),
            CredentialError::Parse(e) => write!(f, "credentials parse error: {e}"),
        }
    }
}

impl std::error::Error for CredentialError {}

/// File-backed credential storage.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `~/.ridealong/credentials.json`, or `None` without a home directory.
    pub fn default_location() -> Option<Self> {
        dirs::home_dir().map(|h| Self::new(h.join(".ridealong").join("credentials.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `Ok(None)` when nothing has been stored yet.
    pub fn load(&self) -> Result<Option<StoredCredentials>, CredentialError> {
        if !self.path.exists() {
            debug!("No credentials at {}", self.path.display());
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path).map_err(CredentialError::Io)?;
        let creds = serde_json::from_str(&contents).map_err(CredentialError::Parse)?;
        info!("Loaded credentials from {}", self.path.display());
        Ok(Some(creds))
    }

    /// Removes stored credentials. Missing file is not an error.
    pub fn clear(&self) -> Result<(), CredentialError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Cleared credentials at {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                warn!("Failed to clear credentials: {}", e);
                Err(CredentialError::Io(e))
            }
        }
    }
}

/// Builds the startup session: `token_override` (env) wins over the stored
/// token; the stored user profile is used when present.
pub fn restore(
    store: Option<&CredentialStore>,
    token_override: Option<String>,
    mode: Mode,
) -> Session {
    let stored = match store.map(|s| s.load()) {
        Some(Ok(creds)) => creds,
        Some(Err(e)) => {
            warn!("Ignoring unreadable credentials: {}", e);
            None
        }
        None => None,
    };

    let (stored_token, user) = match stored {
        Some(creds) => (Some(creds.token), creds.user),
        None => (None, User::guest()),
    };

    let token = token_override.or(stored_token).and_then(AuthToken::new);
    if token.is_none() {
        warn!("No auth token available; remote calls will be refused");
    }
    Session::new(token, user, mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> CredentialStore {
        let dir = std::env::temp_dir().join(format!(
            "ridealong-test-{}-{}",
            name,
            uuid::Uuid::new_v4()
        ));
        CredentialStore::new(dir.join("credentials.json"))
    }

    fn write_credentials(store: &CredentialStore, creds: &StoredCredentials) {
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), serde_json::to_string(creds).unwrap()).unwrap();
    }

    fn sample() -> StoredCredentials {
        StoredCredentials {
            token: "tok-123".to_string(),
            user: User {
                user_id: 5,
                username: "sara".to_string(),
                driver_id: Some(3),
                gender: Some("female".to_string()),
                is_driver: true,
                profile_photo: None,
            },
        }
    }

    #[test]
    fn test_load_then_clear() {
        let store = temp_store("load");
        write_credentials(&store, &sample());
        assert_eq!(store.load().unwrap(), Some(sample()));
        store.clear().unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_load_missing_is_none() {
        let store = temp_store("missing");
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_clear_missing_is_ok() {
        let store = temp_store("clear");
        assert!(store.clear().is_ok());
    }

    #[test]
    fn test_restore_prefers_override_token() {
        let store = temp_store("override");
        write_credentials(&store, &sample());
        let session = restore(Some(&store), Some("env-token".to_string()), Mode::Driver);
        assert_eq!(session.token.as_ref().map(|t| t.as_str()), Some("env-token"));
        assert_eq!(session.user.username, "sara");
        assert_eq!(session.mode, Mode::Driver);
        store.clear().unwrap();
    }

    #[test]
    fn test_restore_without_anything_is_guest() {
        let session = restore(None, None, Mode::Passenger);
        assert!(session.token.is_none());
        assert!(session.user.is_guest());
    }

    #[test]
    fn test_sign_out_resets_to_passenger() {
        let mut session = Session::new(AuthToken::new("t"), sample().user, Mode::Driver);
        session.sign_out();
        assert!(session.token.is_none());
        assert!(session.user.is_guest());
        assert_eq!(session.mode, Mode::Passenger);
    }
}
