use std::path::PathBuf;

use anyhow::Context;
use pulse_auth::{Session, SessionStore};
use pulse_config::PulseConfig;

/// Read `.env`, then the layered config.
pub fn load_config() -> anyhow::Result<PulseConfig> {
    load_dotenv()?;
    PulseConfig::load().context("failed to load pulse configuration")
}

fn load_dotenv() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let env_path = cwd.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    }
    Ok(())
}

/// Restore the persisted session: a pinned file when `session.path` is set,
/// otherwise the keychain with its file fallback.
pub fn open_session(config: &PulseConfig) -> anyhow::Result<Session> {
    let store = match session_path(config) {
        Some(path) => SessionStore::file_only(path),
        None => SessionStore::system()?,
    };
    Session::load(store).context("failed to restore session")
}

fn session_path(config: &PulseConfig) -> Option<PathBuf> {
    config
        .session
        .path
        .clone()
        .filter(|path| !path.as_os_str().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pinned_session_file_is_used() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = PulseConfig::default();
        config.session.path = Some(dir.path().join("session.json"));

        let session = open_session(&config).expect("session opens");
        assert!(!session.is_authenticated());
    }

    #[test]
    fn empty_session_path_means_unpinned() {
        let mut config = PulseConfig::default();
        config.session.path = Some(PathBuf::new());
        assert_eq!(session_path(&config), None);
    }
}
