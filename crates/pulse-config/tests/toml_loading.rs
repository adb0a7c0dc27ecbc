//! Integration tests for TOML configuration loading.
//!
//! Uses `figment::Jail` for sandboxed files and env vars.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;
use pulse_config::PulseConfig;
use pulse_core::enums::{SortDirection, SortField};
use std::path::PathBuf;

#[test]
fn loads_all_sections_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[api]
base_url = "https://pulse.example.com/api/"
timeout_secs = 10

[chat]
poll_interval_ms = 2500

[session]
path = "/tmp/pulse-session.json"

[general]
default_sort = "due_at"
default_direction = "desc"
"#,
        )?;

        let config: PulseConfig = Figment::from(Serialized::defaults(PulseConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.api.base_url(), "https://pulse.example.com/api");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.chat.poll_interval_ms, 2500);
        assert_eq!(config.session.path, Some(PathBuf::from("/tmp/pulse-session.json")));
        assert_eq!(config.general.default_sort, Some(SortField::DueAt));
        assert_eq!(config.general.default_direction, SortDirection::Desc);
        Ok(())
    });
}

#[test]
fn env_beats_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[chat]
poll_interval_ms = 2500
"#,
        )?;
        jail.set_env("PULSE_CHAT__POLL_INTERVAL_MS", "1000");

        let config: PulseConfig = Figment::from(Serialized::defaults(PulseConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("PULSE_").split("__"))
            .extract()?;

        assert_eq!(config.chat.poll_interval_ms, 1000);
        Ok(())
    });
}

#[test]
fn partial_section_keeps_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[api]
timeout_secs = 5
"#,
        )?;

        let config: PulseConfig = Figment::from(Serialized::defaults(PulseConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.api.base_url(), "http://localhost:8000/api");
        assert_eq!(config.api.timeout_secs, 5);
        Ok(())
    });
}
