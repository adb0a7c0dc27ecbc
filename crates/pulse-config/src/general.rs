//! General application configuration.

use pulse_core::enums::{SortDirection, SortField};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Sort applied to `task list` when no `--sort` flag is given.
    #[serde(default)]
    pub default_sort: Option<SortField>,

    #[serde(default)]
    pub default_direction: SortDirection,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_sort: None,
            default_direction: SortDirection::Asc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = GeneralConfig::default();
        assert_eq!(config.default_sort, None);
        assert_eq!(config.default_direction, SortDirection::Asc);
    }
}
