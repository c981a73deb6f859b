//! Error module - One error type per pipeline step

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes reported by `main`
pub mod exit_codes {
    pub const FAILURE: i32 = 1;
    pub const FETCH: i32 = 3;
    pub const INJECTION: i32 = 4;
    pub const VCS: i32 = 5;
    pub const INSTALL: i32 = 6;
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("git clone process exited with code {code}{}", detail(.message))]
    Exit { code: i32, message: Option<String> },

    #[error("failed to start git clone")]
    Spawn(#[source] io::Error),

    #[error("destination {} is not valid UTF-8", .0.display())]
    Destination(PathBuf),
}

/// Why a single template file could not be injected
#[derive(Debug, Error)]
pub enum TargetFailure {
    #[error("no {file}")]
    Missing { file: &'static str },

    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to render {}: {source}", path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: handlebars::RenderError,
    },

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Every target that failed, collected over the whole batch
#[derive(Debug, Error)]
#[error("injection failed: {}", summarize(.failures))]
pub struct InjectionError {
    pub failures: Vec<TargetFailure>,
}

fn detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|message| format!(": {message}"))
        .unwrap_or_default()
}

fn summarize(failures: &[TargetFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error)]
pub enum VcsError {
    #[error("failed to remove {}", path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` exited with code {code}")]
    Exit { command: String, code: i32 },

    #[error("failed to start `{command}`")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("install failed with code {code}")]
    Exit { code: i32, hint: Vec<String> },

    #[error("failed to start `{command}`")]
    Spawn {
        command: String,
        hint: Vec<String>,
        #[source]
        source: io::Error,
    },

    #[error("install prompt failed")]
    Prompt(#[source] anyhow::Error),
}

impl InstallError {
    /// Manual commands the user can fall back to
    pub fn hint(&self) -> &[String] {
        match self {
            Self::Exit { hint, .. } | Self::Spawn { hint, .. } => hint,
            Self::Prompt(_) => &[],
        }
    }
}

/// The failure that stopped the pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Injection(#[from] InjectionError),

    #[error(transparent)]
    Vcs(#[from] VcsError),

    #[error(transparent)]
    Install(#[from] InstallError),
}

impl PipelineError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Fetch(_) => exit_codes::FETCH,
            Self::Injection(_) => exit_codes::INJECTION,
            Self::Vcs(_) => exit_codes::VCS,
            Self::Install(_) => exit_codes::INSTALL,
        }
    }
}
