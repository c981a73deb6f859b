//! Process module - Running external tools with streamed output
//!
//! Every step that shells out (clone, VCS setup, dependency install) goes
//! through [`ProcessRunner`], so the pipeline never touches
//! `std::process` directly and tests can substitute a scripted runner.

use std::env;
use std::ffi::OsString;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// Which pipe a line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Exit code and captured output of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, or -1 when the process was killed by a signal
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

pub trait ProcessRunner {
    /// Run `program` with `args` in `cwd` (or the current directory) and
    /// block until it exits.
    ///
    /// `on_line` sees every output line as it is produced. Returns an error
    /// only when the process could not be started or its pipes failed; a
    /// non-zero exit is reported through [`ProcessOutput::code`].
    fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
        on_line: &mut dyn FnMut(Stream, &str),
    ) -> io::Result<ProcessOutput>;
}

/// Runs real processes via `std::process::Command`
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

/// How long output may still trickle in once the process has exited
const DRAIN_GRACE: Duration = Duration::from_millis(100);

enum Message {
    Line(Stream, String),
    Closed,
    Exited(io::Result<ExitStatus>),
}

impl ProcessRunner for SystemRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
        on_line: &mut dyn FnMut(Stream, &str),
    ) -> io::Result<ProcessOutput> {
        let mut command = Command::new(resolve_program(program));
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        let mut child = command.spawn()?;
        let stdout = child.stdout.take().ok_or_else(|| missing_pipe("stdout"))?;
        let stderr = child.stderr.take().ok_or_else(|| missing_pipe("stderr"))?;

        let (tx, rx) = mpsc::channel();
        spawn_reader(stdout, Stream::Stdout, tx.clone());
        spawn_reader(stderr, Stream::Stderr, tx.clone());
        thread::spawn(move || {
            let _ = tx.send(Message::Exited(child.wait()));
        });

        // Once the child exits the readers are detached; a background job
        // that inherited the pipes does not delay the result.
        let mut output = ProcessOutput::default();
        let mut open_pipes = 2;
        let mut exited: Option<(ExitStatus, Instant)> = None;
        loop {
            let message = match exited {
                None => rx
                    .recv()
                    .map_err(|_| io::Error::other("process waiter vanished"))?,
                Some(_) if open_pipes == 0 => break,
                Some((_, deadline)) => {
                    match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
                        Ok(message) => message,
                        Err(_) => break,
                    }
                }
            };
            match message {
                Message::Line(stream, line) => {
                    on_line(stream, &line);
                    let buffer = match stream {
                        Stream::Stdout => &mut output.stdout,
                        Stream::Stderr => &mut output.stderr,
                    };
                    buffer.push_str(&line);
                    buffer.push('\n');
                }
                Message::Closed => open_pipes -= 1,
                Message::Exited(result) => {
                    exited = Some((result?, Instant::now() + DRAIN_GRACE));
                }
            }
        }

        output.code = exited.and_then(|(status, _)| status.code()).unwrap_or(-1);
        Ok(output)
    }
}

/// The program to hand to `Command::new` for `program`.
///
/// On Windows, package managers ship as batch-file shims (`npm.cmd`) that
/// process creation only finds when named in full.
pub fn resolve_program(program: &str) -> OsString {
    let path = env::var_os("PATH").unwrap_or_default();
    find_shim(program, env::split_paths(&path), SHIM_EXTENSIONS)
        .map(PathBuf::into_os_string)
        .unwrap_or_else(|| program.into())
}

#[cfg(windows)]
const SHIM_EXTENSIONS: &[&str] = &["cmd", "bat"];

#[cfg(not(windows))]
const SHIM_EXTENSIONS: &[&str] = &[];

/// First `<program>.<ext>` in `dirs`, unless a real executable shadows it
fn find_shim(
    program: &str,
    dirs: impl IntoIterator<Item = PathBuf>,
    extensions: &[&str],
) -> Option<PathBuf> {
    if extensions.is_empty()
        || program.contains(['/', '\\'])
        || Path::new(program).extension().is_some()
    {
        return None;
    }
    for dir in dirs {
        if dir.join(format!("{program}.exe")).is_file() {
            return None;
        }
        if let Some(shim) = extensions
            .iter()
            .map(|ext| dir.join(format!("{program}.{ext}")))
            .find(|candidate| candidate.is_file())
        {
            return Some(shim);
        }
    }
    None
}

fn missing_pipe(name: &str) -> io::Error {
    io::Error::other(format!("child {name} was not captured"))
}

fn spawn_reader<R>(mut pipe: R, stream: Stream, tx: mpsc::Sender<Message>)
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut chunk = [0u8; 4096];
        let mut pending = Vec::new();
        // A read error ends the stream like EOF does.
        while let Ok(read) = pipe.read(&mut chunk) {
            if read == 0 {
                break;
            }
            for &byte in &chunk[..read] {
                if byte == b'\n' || byte == b'\r' {
                    flush_line(&mut pending, stream, &tx);
                } else {
                    pending.push(byte);
                }
            }
        }
        flush_line(&mut pending, stream, &tx);
        let _ = tx.send(Message::Closed);
    });
}

fn flush_line(pending: &mut Vec<u8>, stream: Stream, tx: &mpsc::Sender<Message>) {
    if pending.is_empty() {
        return;
    }
    let line = String::from_utf8_lossy(pending).into_owned();
    pending.clear();
    // The receiver only goes away once the caller stopped listening.
    let _ = tx.send(Message::Line(stream, line));
}
