//! Fetch module - Cloning a template repository

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use crate::core::config::git;
use crate::core::error::FetchError;
use crate::core::process::{ProcessRunner, Stream};

static PROGRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([\s\S]+?):\s*(\d+)% \((\d+)/(\d+)\)").expect("progress pattern is valid")
});

/// One parsed `<stage>: <percent>% (<done>/<total>)` line from git
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneProgress {
    pub stage: String,
    pub percent: u8,
    pub done: u64,
    pub total: u64,
}

impl CloneProgress {
    /// Parse a progress line; anything else yields `None`
    pub fn parse(line: &str) -> Option<Self> {
        let caps = PROGRESS.captures(line)?;
        Some(Self {
            stage: caps[1].trim().to_string(),
            percent: caps[2].parse::<u8>().ok()?.min(100),
            done: caps[3].parse().ok()?,
            total: caps[4].parse().ok()?,
        })
    }
}

/// Clone `url` into `destination`, reporting progress as it arrives.
///
/// A failed clone leaves whatever git wrote in `destination`.
pub fn fetch(
    runner: &dyn ProcessRunner,
    url: &str,
    destination: &Path,
    on_progress: &mut dyn FnMut(&CloneProgress),
) -> Result<(), FetchError> {
    let target = destination
        .to_str()
        .ok_or_else(|| FetchError::Destination(destination.to_path_buf()))?;
    let args = ["clone", "--progress", url, target];

    let output = runner
        .run(git::PROGRAM, &args, None, &mut |stream, line| {
            if stream == Stream::Stderr {
                if let Some(progress) = CloneProgress::parse(line) {
                    on_progress(&progress);
                }
            }
        })
        .map_err(FetchError::Spawn)?;

    if output.success() {
        Ok(())
    } else {
        Err(FetchError::Exit {
            code: output.code,
            message: last_line(&output.stderr),
        })
    }
}

fn last_line(text: &str) -> Option<String> {
    text.lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}
