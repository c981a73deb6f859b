//! Request module - What the user asked for, and where it goes
//!
//! A [`ProjectRequest`] is collected once per invocation from the command
//! line and the interactive prompts. It is read-only afterwards.

use anyhow::{Result, bail};
use clap::ValueEnum;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::config::Settings;
use crate::core::prompt::Prompter;

/// Answers that count as "no value given"
const EMPTY_SENTINELS: &[&str] = &["undefined", "null", "unknown"];

/// Available project templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TemplateType {
    /// Vue + Ant Design
    #[value(name = "vue-antd")]
    VueAntd,
}

impl TemplateType {
    pub const ALL: &'static [TemplateType] = &[TemplateType::VueAntd];

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateType::VueAntd => "vue-antd",
        }
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRequest {
    /// Directory name of the new project
    pub name: String,
    pub description: String,
    pub author: String,
    /// Remote for the fresh repository; `None` skips remote setup
    pub remote_url: Option<String>,
    pub branch: String,
    pub template: TemplateType,
}

/// Where a template comes from and where it lands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSource {
    pub url: String,
    pub destination: PathBuf,
}

impl TemplateSource {
    pub fn resolve(request: &ProjectRequest, settings: &Settings, base_dir: &Path) -> Self {
        Self {
            url: settings.template_url(request.template.as_str()),
            destination: base_dir.join(&request.name),
        }
    }
}

/// True for a missing value or one of the spellings users type for "none":
/// blank, `undefined`, `null`, `unknown` (case-sensitive).
pub fn is_empty_sentinel(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(value) => value.trim().is_empty() || EMPTY_SENTINELS.contains(&value),
    }
}

/// Normalize a prompt answer into a proper optional value
pub fn optional_answer(answer: String) -> Option<String> {
    if is_empty_sentinel(Some(&answer)) {
        None
    } else {
        Some(answer.trim().to_string())
    }
}

/// Check that a project name can be used as a single directory name
pub fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        bail!("Project name must not be empty");
    }
    if name == "." || name == ".." {
        bail!("Project name must not be `{name}`");
    }
    if name.contains(['/', '\\']) {
        bail!("Project name must not contain path separators: {name}");
    }
    Ok(name.to_string())
}

/// Ask the remaining questions and build the request.
///
/// `preselected` is the template given on the command line; it becomes the
/// default of the template choice.
pub fn collect(
    name: &str,
    preselected: Option<TemplateType>,
    settings: &Settings,
    prompter: &dyn Prompter,
) -> Result<ProjectRequest> {
    let name = validate_name(name)?;

    let description = prompter.input("Project description", None)?;
    let author = prompter.input("Project author", Some(&settings.default_author))?;
    let remote_url = optional_answer(prompter.input("Git remote repository", None)?);
    let branch = prompter.input("Branch name", Some(&settings.default_branch))?;

    let items: Vec<&str> = TemplateType::ALL.iter().map(|t| t.as_str()).collect();
    let default = preselected
        .and_then(|wanted| TemplateType::ALL.iter().position(|t| *t == wanted))
        .unwrap_or(0);
    let choice = prompter.select("Template type", &items, default)?;
    let Some(&template) = TemplateType::ALL.get(choice) else {
        bail!("Invalid template selection: {choice}");
    };

    let author = match author.trim() {
        "" => settings.default_author.clone(),
        author => author.to_string(),
    };
    let branch = match branch.trim() {
        "" => settings.default_branch.clone(),
        branch => branch.to_string(),
    };

    Ok(ProjectRequest {
        name,
        description: description.trim().to_string(),
        author,
        remote_url,
        branch,
        template,
    })
}
