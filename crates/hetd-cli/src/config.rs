//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Calendar locator: an HTTP(S) export URL or a path to an `.ics` file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("source", &self.source.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Plain ICAL variable, possibly loaded from a .env file
        figment = figment.merge(Env::raw().only(&["ICAL"]).map(|_| "source".into()));

        // Load from environment variables (HETD_*)
        figment = figment.merge(Env::prefixed("HETD_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for hetd.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("hetd"))
}

#[cfg(test)]
#[allow(
    clippy::result_large_err,
    reason = "figment::Jail closures return figment::Error"
)]
mod tests {
    use super::*;

    use figment::Jail;

    /// Points the platform config dir into the jail so a real
    /// `~/.config/hetd/config.toml` cannot leak into tests.
    fn isolate(jail: &mut Jail) {
        let home = jail.directory().display().to_string();
        jail.set_env("HOME", &home);
        jail.set_env("XDG_CONFIG_HOME", format!("{home}/.config"));
    }

    #[test]
    fn test_dirs_config_path_ends_with_hetd() {
        let path = dirs_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "hetd");
    }

    #[test]
    fn test_default_config_has_no_source() {
        assert!(Config::default().source.is_none());
    }

    #[test]
    fn test_debug_redacts_source() {
        let config = Config {
            source: Some("https://example.org/cal.ics?token=secret".to_string()),
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_source_from_config_file() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.create_file("hetd.toml", r#"source = "timetable.ics""#)?;

            let config = Config::load_from(Some(Path::new("hetd.toml")))?;
            assert_eq!(config.source.as_deref(), Some("timetable.ics"));
            Ok(())
        });
    }

    #[test]
    fn test_source_from_legacy_ical_variable() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.set_env("ICAL", "https://example.org/legacy.ics");

            let config = Config::load_from(None)?;
            assert_eq!(
                config.source.as_deref(),
                Some("https://example.org/legacy.ics")
            );
            Ok(())
        });
    }

    #[test]
    fn test_prefixed_variable_wins_over_file_and_ical() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.create_file("hetd.toml", r#"source = "from-file.ics""#)?;
            jail.set_env("ICAL", "from-ical.ics");
            jail.set_env("HETD_SOURCE", "from-env.ics");

            let config = Config::load_from(Some(Path::new("hetd.toml")))?;
            assert_eq!(config.source.as_deref(), Some("from-env.ics"));
            Ok(())
        });
    }

    #[test]
    fn test_default_config_file_is_read() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.create_dir(".config/hetd")?;
            jail.create_file(".config/hetd/config.toml", r#"source = "default.ics""#)?;

            let config = Config::load_from(None)?;
            assert_eq!(config.source.as_deref(), Some("default.ics"));
            Ok(())
        });
    }
}
