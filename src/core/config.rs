//! Configuration module - Fixed constants and user settings

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Git invocation constants
pub mod git {
    /// Version control binary
    pub const PROGRAM: &str = "git";

    /// Metadata directory removed before re-initializing
    pub const METADATA_DIR: &str = ".git";

    /// Name given to the user's remote
    pub const REMOTE_NAME: &str = "origin";
}

/// Template files rewritten after the clone, relative to the project root
pub mod targets {
    pub const PACKAGE_MANIFEST: &str = "package.json";
    pub const ENV_DEVELOPMENT: &str = ".env.development";
    pub const ENV_PRE_PRODUCTION: &str = ".env.pre";
    pub const ENV_PRODUCTION: &str = ".env.production";
    pub const ENV_STAGING: &str = ".env.stage";
    pub const README: &str = "README.md";
}

/// Built-in defaults used when the settings file leaves a field out
pub mod defaults {
    pub const TEMPLATE_BASE_URL: &str = "https://github.com/LiYaMei94";
    pub const BRANCH: &str = "main";
    pub const AUTHOR: &str = "anonymous";
    pub const INSTALL_PROGRAM: &str = "npm";
    pub const INSTALL_ARGS: &[&str] = &["install"];
    pub const START_COMMAND: &str = "npm run serve";
}

/// Environment variable that points at an alternative settings file
pub const CONFIG_ENV: &str = "STENCIL_CONFIG";

/// User settings, read from `config.toml`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL the `<type>-template.git` repositories live under
    pub template_base_url: String,
    /// Suggested answer for the author prompt
    pub default_author: String,
    /// Suggested answer for the branch prompt
    pub default_branch: String,
    pub install: InstallSettings,
}

/// Package manager used by the install step
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InstallSettings {
    pub program: String,
    pub args: Vec<String>,
    /// Shown to the user as the command that starts the new project
    pub start_command: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            template_base_url: defaults::TEMPLATE_BASE_URL.to_string(),
            default_author: login_name().unwrap_or_else(|| defaults::AUTHOR.to_string()),
            default_branch: defaults::BRANCH.to_string(),
            install: InstallSettings::default(),
        }
    }
}

impl Default for InstallSettings {
    fn default() -> Self {
        Self {
            program: defaults::INSTALL_PROGRAM.to_string(),
            args: defaults::INSTALL_ARGS.iter().map(|a| a.to_string()).collect(),
            start_command: defaults::START_COMMAND.to_string(),
        }
    }
}

impl InstallSettings {
    /// The install command as the user would type it
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Settings {
    /// Parse settings from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid settings file")
    }

    /// Load settings.
    ///
    /// An explicit path must exist. Without one, the default location is
    /// tried and silently skipped when absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::read(path),
            None => match default_path() {
                Some(path) if path.exists() => Self::read(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .context(format!("Failed to read settings file: {}", path.display()))?;
        Self::from_toml(&text).context(format!("In {}", path.display()))
    }

    /// Remote repository URL for a template name
    pub fn template_url(&self, template: &str) -> String {
        format!(
            "{}/{}-template.git",
            self.template_base_url.trim_end_matches('/'),
            template
        )
    }
}

/// `<config dir>/stencil/config.toml`
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("stencil").join("config.toml"))
}

fn login_name() -> Option<String> {
    ["USER", "USERNAME"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(|name| name.trim().to_string())
        .find(|name| !name.is_empty())
}
