//! VCS module - Replacing the template's history with a fresh repository

use std::io;
use std::path::Path;

use crate::core::config::git;
use crate::core::error::VcsError;
use crate::core::process::{ProcessRunner, Stream};

/// How the reinitialize step ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VcsOutcome {
    /// History removed, new repository pointing at the remote
    Initialized { remote: String, branch: String },
    /// History removed, no remote given so no repository created
    HistoryRemoved,
}

/// Delete `path` and everything below it, depth first.
///
/// A path that does not exist is left alone. On Windows read-only files
/// (git marks its object files that way) are made writable first.
pub fn remove_tree(path: &Path) -> io::Result<()> {
    let metadata = match std::fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err),
    };

    if !metadata.is_dir() {
        return remove_file(path, metadata);
    }

    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        let child = entry.path();
        let child_metadata = std::fs::symlink_metadata(&child)?;
        if child_metadata.is_dir() {
            remove_tree(&child)?;
        } else {
            remove_file(&child, child_metadata)?;
        }
    }
    std::fs::remove_dir(path)
}

#[cfg(windows)]
fn remove_file(path: &Path, metadata: std::fs::Metadata) -> io::Result<()> {
    let mut permissions = metadata.permissions();
    if permissions.readonly() {
        #[allow(clippy::permissions_set_readonly_false)]
        permissions.set_readonly(false);
        std::fs::set_permissions(path, permissions)?;
    }
    std::fs::remove_file(path)
}

#[cfg(not(windows))]
fn remove_file(path: &Path, _metadata: std::fs::Metadata) -> io::Result<()> {
    std::fs::remove_file(path)
}

/// Remove the cloned history from `root` and, when a remote is given,
/// initialize a new repository on `branch` with the remote as `origin`.
///
/// Nothing is staged or committed.
pub fn reinit(
    runner: &dyn ProcessRunner,
    root: &Path,
    remote: Option<&str>,
    branch: &str,
    on_line: &mut dyn FnMut(Stream, &str),
) -> Result<VcsOutcome, VcsError> {
    let metadata_dir = root.join(git::METADATA_DIR);
    remove_tree(&metadata_dir).map_err(|source| VcsError::Cleanup {
        path: metadata_dir,
        source,
    })?;

    let Some(remote) = remote else {
        return Ok(VcsOutcome::HistoryRemoved);
    };

    // `--` keeps a remote that starts with `-` from being read as an option.
    let steps: [&[&str]; 3] = [
        &["init"],
        &["branch", "-M", branch],
        &["remote", "add", "--", git::REMOTE_NAME, remote],
    ];
    for args in steps {
        let command = format!("{} {}", git::PROGRAM, args.join(" "));
        let output = runner
            .run(git::PROGRAM, args, Some(root), on_line)
            .map_err(|source| VcsError::Spawn {
                command: command.clone(),
                source,
            })?;
        if !output.success() {
            return Err(VcsError::Exit {
                command,
                code: output.code,
            });
        }
    }

    Ok(VcsOutcome::Initialized {
        remote: remote.to_string(),
        branch: branch.to_string(),
    })
}
