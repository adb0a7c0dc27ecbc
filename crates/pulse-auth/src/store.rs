//! Durable storage for the auth state blob.
//!
//! The blob is the JSON form of [`AuthState`] (`{"token": ..., "user": {...}}`).
//! Absence of the blob means logged out.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use pulse_core::entities::AuthState;

use crate::error::AuthError;

const DEFAULT_KEYRING_SERVICE: &str = "pulse-cli";
const KEYRING_USER: &str = "auth-state";
const SESSION_FILE_NAME: &str = "session.json";

/// Env variable that overrides the stored token.
pub const TOKEN_ENV: &str = "PULSE_AUTH__TOKEN";

/// Where a loaded session came from (for `auth status`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSource {
    Keyring,
    File,
    Env,
    Memory,
}

impl SessionSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Keyring => "keyring",
            Self::File => "file",
            Self::Env => "env",
            Self::Memory => "memory",
        }
    }
}

#[derive(Debug)]
enum Backend {
    /// OS keychain with a file fallback.
    Keyring { service: String, fallback: PathBuf },
    File(PathBuf),
    Memory(Mutex<Option<String>>),
}

/// Persists one [`AuthState`] blob.
#[derive(Debug)]
pub struct SessionStore {
    backend: Backend,
    env_override: bool,
}

impl SessionStore {
    /// Keychain store falling back to `<config dir>/pulse/session.json`.
    ///
    /// `PULSE_KEYRING_SERVICE` overrides the keychain service name.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if no config directory can be resolved.
    pub fn system() -> Result<Self, AuthError> {
        let service = std::env::var("PULSE_KEYRING_SERVICE")
            .unwrap_or_else(|_| DEFAULT_KEYRING_SERVICE.to_string());
        Ok(Self {
            backend: Backend::Keyring {
                service,
                fallback: default_session_path()?,
            },
            env_override: true,
        })
    }

    /// Store pinned to a single file; the keychain is never touched.
    #[must_use]
    pub fn file_only(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: Backend::File(path.into()),
            env_override: true,
        }
    }

    /// Process-local store that persists nothing.
    #[must_use]
    pub const fn memory() -> Self {
        Self {
            backend: Backend::Memory(Mutex::new(None)),
            env_override: false,
        }
    }

    /// Read the persisted state. `Ok(None)` means logged out.
    ///
    /// A blob that fails to parse is treated as logged out.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the session file exists but cannot be read.
    pub fn load(&self) -> Result<Option<(AuthState, SessionSource)>, AuthError> {
        let stored = self.read_raw()?.and_then(|(raw, source)| {
            match serde_json::from_str::<AuthState>(&raw) {
                Ok(state) => Some((state, source)),
                Err(error) => {
                    tracing::warn!(%error, source = source.as_str(), "discarding unreadable session blob");
                    None
                }
            }
        });

        if self.env_override {
            if let Some(token) = env_token() {
                let state = stored.map(|(state, _)| state).unwrap_or_default();
                return Ok(Some((
                    AuthState {
                        token: Some(token),
                        ..state
                    },
                    SessionSource::Env,
                )));
            }
        }

        Ok(stored)
    }

    /// Persist `state`, replacing any previous blob.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if neither the keychain nor the file can be written.
    pub fn save(&self, state: &AuthState) -> Result<(), AuthError> {
        let blob = serde_json::to_string(state)?;
        match &self.backend {
            Backend::Keyring { service, fallback } => match keyring::Entry::new(service, KEYRING_USER) {
                Ok(entry) => match entry.set_password(&blob) {
                    Ok(()) => Ok(()),
                    Err(error) => {
                        tracing::warn!(%error, "keyring store failed; falling back to file");
                        write_file(fallback, &blob)
                    }
                },
                Err(error) => {
                    tracing::warn!(%error, "keyring unavailable; falling back to file");
                    write_file(fallback, &blob)
                }
            },
            Backend::File(path) => write_file(path, &blob),
            Backend::Memory(slot) => {
                *lock(slot) = Some(blob);
                Ok(())
            }
        }
    }

    /// Remove the persisted blob. Missing blobs are not an error.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the session file cannot be removed.
    pub fn clear(&self) -> Result<(), AuthError> {
        match &self.backend {
            Backend::Keyring { service, fallback } => {
                if let Ok(entry) = keyring::Entry::new(service, KEYRING_USER) {
                    match entry.delete_credential() {
                        Ok(()) | Err(keyring::Error::NoEntry) => {}
                        Err(error) => tracing::debug!(%error, "keyring delete failed; clearing file"),
                    }
                }
                remove_file(fallback)
            }
            Backend::File(path) => remove_file(path),
            Backend::Memory(slot) => {
                *lock(slot) = None;
                Ok(())
            }
        }
    }

    fn read_raw(&self) -> Result<Option<(String, SessionSource)>, AuthError> {
        match &self.backend {
            Backend::Keyring { service, fallback } => {
                if let Ok(entry) = keyring::Entry::new(service, KEYRING_USER) {
                    match entry.get_password() {
                        Ok(blob) if !blob.trim().is_empty() => {
                            return Ok(Some((blob, SessionSource::Keyring)));
                        }
                        Ok(_) | Err(keyring::Error::NoEntry) => {}
                        Err(error) => tracing::debug!(%error, "keyring read failed; trying file"),
                    }
                }
                Ok(read_file(fallback)?.map(|blob| (blob, SessionSource::File)))
            }
            Backend::File(path) => Ok(read_file(path)?.map(|blob| (blob, SessionSource::File))),
            Backend::Memory(slot) => Ok(lock(slot).clone().map(|blob| (blob, SessionSource::Memory))),
        }
    }
}

/// Default fallback file: `<config dir>/pulse/session.json`.
///
/// # Errors
///
/// Returns `AuthError::Storage` if the platform has no config directory.
pub fn default_session_path() -> Result<PathBuf, AuthError> {
    dirs::config_dir()
        .map(|dir| dir.join("pulse").join(SESSION_FILE_NAME))
        .ok_or_else(|| AuthError::Storage("config directory not found, cannot store session".into()))
}

fn env_token() -> Option<String> {
    std::env::var(TOKEN_ENV).ok().filter(|token| !token.trim().is_empty())
}

fn lock(slot: &Mutex<Option<String>>) -> std::sync::MutexGuard<'_, Option<String>> {
    slot.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn write_file(path: &Path, blob: &str) -> Result<(), AuthError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AuthError::Storage(format!("mkdir {}: {e}", parent.display())))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                tracing::warn!("failed to chmod 0700 {}: {e}", parent.display());
            }
        }
    }
    fs::write(path, blob).map_err(|e| AuthError::Storage(format!("write {}: {e}", path.display())))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .map_err(|e| AuthError::Storage(format!("chmod {}: {e}", path.display())))?;
    }

    Ok(())
}

fn read_file(path: &Path) -> Result<Option<String>, AuthError> {
    match fs::read_to_string(path) {
        Ok(blob) => Ok(Some(blob).filter(|s| !s.trim().is_empty())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(AuthError::Storage(format!("read {}: {e}", path.display()))),
    }
}

fn remove_file(path: &Path) -> Result<(), AuthError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(AuthError::Storage(format!("delete {}: {e}", path.display()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use pulse_core::enums::UserRole;

    #[test]
    fn default_path_is_under_config_dir() {
        let path = default_session_path().expect("should resolve");
        assert!(path.ends_with("pulse/session.json"));
    }

    #[test]
    fn file_save_load_clear_cycle() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let path = tmp.path().join("nested").join("session.json");
        let store = SessionStore {
            backend: Backend::File(path.clone()),
            env_override: false,
        };

        assert!(store.load().expect("load").is_none());

        let state = AuthState::new("tok-1", "anna@example.com", UserRole::Creator);
        store.save(&state).expect("save");

        let raw = fs::read_to_string(&path).expect("read");
        assert!(raw.contains("\"token\":\"tok-1\""));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).expect("metadata").permissions().mode() & 0o777;
            assert_eq!(mode, 0o600, "session file should be 0600");
        }

        let (loaded, source) = store.load().expect("load").expect("present");
        assert_eq!(loaded, state);
        assert_eq!(source, SessionSource::File);

        store.clear().expect("clear");
        assert!(!path.exists());
        store.clear().expect("second clear is a no-op");
    }

    #[test]
    fn keyring_clear_without_entry_still_removes_fallback() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let fallback = tmp.path().join("session.json");
        fs::write(&fallback, "{}").expect("write");
        let store = SessionStore {
            backend: Backend::Keyring {
                service: "pulse-test-clear-without-entry".to_string(),
                fallback: fallback.clone(),
            },
            env_override: false,
        };

        store.clear().expect("clear");
        assert!(!fallback.exists());
    }

    #[test]
    fn corrupt_blob_reads_as_logged_out() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let path = tmp.path().join("session.json");
        fs::write(&path, "{not json").expect("write");
        let store = SessionStore {
            backend: Backend::File(path),
            env_override: false,
        };
        assert!(store.load().expect("load").is_none());
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = SessionStore::memory();
        let state = AuthState::new("t", "e@x.io", UserRole::Executor);
        store.save(&state).expect("save");
        assert_eq!(store.load().expect("load").map(|(s, _)| s), Some(state));
        store.clear().expect("clear");
        assert!(store.load().expect("load").is_none());
    }
}
