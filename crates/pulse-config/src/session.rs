//! Session persistence settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Pin the session blob to this file instead of the OS keychain.
    #[serde(default)]
    pub path: Option<PathBuf>,
}
