//! Inject module - Writing project metadata into template files
//!
//! Each target file is rendered as a Handlebars template: `{{name}}` is
//! substituted HTML-escaped, `{{{name}}}` verbatim, and unknown fields
//! render as nothing.

use handlebars::Handlebars;
use serde::Serialize;
use std::path::Path;

use crate::core::config::targets;
use crate::core::error::{InjectionError, TargetFailure};

/// What a target file is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetRole {
    PackageManifest,
    EnvDevelopment,
    EnvPreProduction,
    EnvProduction,
    EnvStaging,
    Readme,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InjectionTarget {
    pub role: TargetRole,
    /// Path relative to the project root
    pub path: &'static str,
    /// A missing required file fails the step; a missing optional one is skipped
    pub required: bool,
}

/// The files rewritten after every clone
pub const TARGETS: &[InjectionTarget] = &[
    InjectionTarget {
        role: TargetRole::PackageManifest,
        path: targets::PACKAGE_MANIFEST,
        required: true,
    },
    InjectionTarget {
        role: TargetRole::EnvDevelopment,
        path: targets::ENV_DEVELOPMENT,
        required: false,
    },
    InjectionTarget {
        role: TargetRole::EnvPreProduction,
        path: targets::ENV_PRE_PRODUCTION,
        required: false,
    },
    InjectionTarget {
        role: TargetRole::EnvProduction,
        path: targets::ENV_PRODUCTION,
        required: false,
    },
    InjectionTarget {
        role: TargetRole::EnvStaging,
        path: targets::ENV_STAGING,
        required: false,
    },
    InjectionTarget {
        role: TargetRole::Readme,
        path: targets::README,
        required: false,
    },
];

/// Values available to the templates
#[derive(Debug, Clone, Serialize)]
pub struct Metadata<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub author: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetOutcome {
    Rendered,
    Skipped,
}

/// Per-target result of a successful injection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InjectionReport {
    pub outcomes: Vec<(InjectionTarget, TargetOutcome)>,
}

impl InjectionReport {
    pub fn rendered(&self) -> impl Iterator<Item = &InjectionTarget> {
        self.with(TargetOutcome::Rendered)
    }

    pub fn skipped(&self) -> impl Iterator<Item = &InjectionTarget> {
        self.with(TargetOutcome::Skipped)
    }

    fn with(&self, wanted: TargetOutcome) -> impl Iterator<Item = &InjectionTarget> {
        self.outcomes
            .iter()
            .filter(move |(_, outcome)| *outcome == wanted)
            .map(|(target, _)| target)
    }
}

/// Inject `metadata` into the standard [`TARGETS`] under `root`
pub fn inject(root: &Path, metadata: &Metadata<'_>) -> Result<InjectionReport, InjectionError> {
    inject_targets(root, TARGETS, metadata)
}

/// Inject `metadata` into each of `targets`.
///
/// Every target is attempted; the step fails afterwards if any required
/// file was missing or any file could not be read, rendered or written.
pub fn inject_targets(
    root: &Path,
    targets: &[InjectionTarget],
    metadata: &Metadata<'_>,
) -> Result<InjectionReport, InjectionError> {
    let registry = Handlebars::new();
    let mut report = InjectionReport::default();
    let mut failures = Vec::new();

    for target in targets {
        let path = root.join(target.path);
        if !path.is_file() {
            if target.required {
                failures.push(TargetFailure::Missing { file: target.path });
            } else {
                report.outcomes.push((*target, TargetOutcome::Skipped));
            }
            continue;
        }

        match render_file(&registry, &path, metadata) {
            Ok(()) => report.outcomes.push((*target, TargetOutcome::Rendered)),
            Err(failure) => failures.push(failure),
        }
    }

    if failures.is_empty() {
        Ok(report)
    } else {
        Err(InjectionError { failures })
    }
}

fn render_file(
    registry: &Handlebars<'_>,
    path: &Path,
    metadata: &Metadata<'_>,
) -> Result<(), TargetFailure> {
    let content = std::fs::read_to_string(path).map_err(|source| TargetFailure::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let rendered =
        registry
            .render_template(&content, metadata)
            .map_err(|source| TargetFailure::Render {
                path: path.to_path_buf(),
                source,
            })?;
    std::fs::write(path, rendered).map_err(|source| TargetFailure::Write {
        path: path.to_path_buf(),
        source,
    })
}
