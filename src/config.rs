//! Configuration management for lil-curio
//!
//! Supports loading configuration from, in increasing priority:
//! - Default values
//! - Config files (`lil-curio.toml`, `.lil-curio.toml`)
//! - The user config directory (`lil-curio.toml`)
//! - An explicit file given with `--config`
//! - Environment variables (`LIL_CURIO_<SECTION>__<KEY>`)
//!
//! ## Example config file (lil-curio.toml):
//! ```toml
//! [defaults]
//! schema_type = "json"
//! validity_level = "full"
//! compatibility_level = "backward"
//! git_ref = "HEAD"
//! json = false
//!
//! [git]
//! backend = "cli"
//! program = "git"
//!
//! [rules]
//! "json.check-refs" = "true"
//! ```

use std::path::Path;

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::git::{GitBackendKind, VersionResolver, DEFAULT_REVISION};
use crate::level::{CompatibilityLevel, ValidityLevel};
use crate::rules::RuleConfig;

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurioConfig {
    /// Fallbacks for command-line options
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// How previous versions are read from git
    #[serde(default)]
    pub git: GitConfig,

    /// Engine options
    #[serde(default)]
    pub rules: RuleConfig,
}

/// Values used when the corresponding flag is not given
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Schema type used when `--type` is omitted
    #[serde(default)]
    pub schema_type: Option<String>,

    #[serde(default = "default_validity_level")]
    pub validity_level: ValidityLevel,

    #[serde(default = "default_compatibility_level")]
    pub compatibility_level: CompatibilityLevel,

    /// Revision `diff` compares against
    #[serde(default = "default_git_ref")]
    pub git_ref: String,

    /// Emit JSON reports without `--json`
    #[serde(default)]
    pub json: bool,
}

/// Git settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitConfig {
    #[serde(default)]
    pub backend: GitBackendKind,

    /// Executable used by the `cli` backend
    #[serde(default = "default_git_program")]
    pub program: String,
}

fn default_validity_level() -> ValidityLevel {
    ValidityLevel::Full
}

fn default_compatibility_level() -> CompatibilityLevel {
    CompatibilityLevel::Backward
}

fn default_git_ref() -> String {
    DEFAULT_REVISION.to_string()
}

fn default_git_program() -> String {
    "git".to_string()
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            schema_type: None,
            validity_level: default_validity_level(),
            compatibility_level: default_compatibility_level(),
            git_ref: default_git_ref(),
            json: false,
        }
    }
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            backend: GitBackendKind::default(),
            program: default_git_program(),
        }
    }
}

impl GitConfig {
    /// Resolver backed by the configured git backend
    pub fn resolver(&self) -> VersionResolver {
        VersionResolver::with_kind(self.backend, &self.program)
    }
}

impl CurioConfig {
    /// Load configuration, adding `config_path` as a required source
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // Load from default locations
        for location in ["lil-curio.toml", ".lil-curio.toml"] {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from the user config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "lilcurio", "lil-curio") {
            let user_config = config_dir.config_dir().join("lil-curio.toml");
            if user_config.exists() {
                tracing::debug!(path = %user_config.display(), "loading user configuration");
                builder = builder.add_source(File::from(user_config).required(false));
            }
        }

        if let Some(path) = config_path {
            tracing::debug!(path = %path.display(), "loading explicit configuration");
            builder = builder.add_source(File::from(path).required(true));
        }

        // Load from environment variables (LIL_CURIO_*)
        builder = builder.add_source(
            Environment::with_prefix("LIL_CURIO")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = CurioConfig::default();
        assert_eq!(config.defaults.schema_type, None);
        assert_eq!(config.defaults.validity_level, ValidityLevel::Full);
        assert_eq!(config.defaults.compatibility_level, CompatibilityLevel::Backward);
        assert_eq!(config.defaults.git_ref, "HEAD");
        assert_eq!(config.git.backend, GitBackendKind::Cli);
        assert_eq!(config.git.program, "git");
        assert!(config.rules.is_empty());
    }

    #[test]
    fn test_serialize_config() {
        let config = CurioConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[defaults]"));
        assert!(toml_str.contains("compatibility_level = \"BACKWARD\""));
        assert!(toml_str.contains("backend = \"cli\""));
    }

    #[test]
    fn test_parse_partial_file() {
        let config: CurioConfig = toml::from_str(
            r#"
            [defaults]
            schema_type = "avro"
            compatibility_level = "full-transitive"

            [git]
            backend = "libgit2"

            [rules]
            "json.check-refs" = "false"
            "#,
        )
        .unwrap();

        assert_eq!(config.defaults.schema_type.as_deref(), Some("avro"));
        assert_eq!(config.defaults.compatibility_level, CompatibilityLevel::FullTransitive);
        assert_eq!(config.defaults.validity_level, ValidityLevel::Full);
        assert_eq!(config.git.backend, GitBackendKind::Libgit2);
        assert_eq!(config.git.program, "git");
        assert_eq!(config.rules.get("json.check-refs").map(String::as_str), Some("false"));
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        let parsed = toml::from_str::<CurioConfig>("[defaults]\nvalidity_level = \"strict\"\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[defaults]\nschema_type = \"json\"\njson = true\n").unwrap();

        let config = CurioConfig::load_from(Some(&path)).unwrap();
        assert_eq!(config.defaults.schema_type.as_deref(), Some("json"));
        assert!(config.defaults.json);
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(
            &path,
            "[defaults]\ngit_ref = \"main\"\n\n[git]\nprogram = \"git\"\n",
        )
        .unwrap();

        std::env::set_var("LIL_CURIO_DEFAULTS__GIT_REF", "release/1.2");
        std::env::set_var("LIL_CURIO_GIT__PROGRAM", "/opt/git/bin/git");
        let config = CurioConfig::load_from(Some(&path));
        std::env::remove_var("LIL_CURIO_DEFAULTS__GIT_REF");
        std::env::remove_var("LIL_CURIO_GIT__PROGRAM");

        let config = config.unwrap();
        assert_eq!(config.defaults.git_ref, "release/1.2");
        assert_eq!(config.git.program, "/opt/git/bin/git");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(CurioConfig::load_from(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
