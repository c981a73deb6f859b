//! Scripted stand-ins for processes, prompts and the console

use anyhow::{Result, bail};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::fetch::CloneProgress;
use crate::core::inject::InjectionReport;
use crate::core::install::InstallOutcome;
use crate::core::pipeline::{PipelineObserver, PipelineState};
use crate::core::process::{ProcessOutput, ProcessRunner, Stream};
use crate::core::prompt::Prompter;
use crate::core::vcs::VcsOutcome;

/// A recorded process invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

type Effect = Box<dyn Fn(&Call)>;

#[derive(Default)]
struct Response {
    code: i32,
    lines: Vec<(Stream, String)>,
    effect: Option<Effect>,
    spawn_error: bool,
}

/// Answers process invocations from a queue; exits 0 once the queue is empty
#[derive(Default)]
pub struct ScriptedRunner {
    responses: RefCell<VecDeque<Response>>,
    calls: RefCell<Vec<Call>>,
}

pub struct ResponseBuilder<'a> {
    runner: &'a ScriptedRunner,
    index: usize,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response exiting with `code`
    pub fn respond(&self, code: i32) -> ResponseBuilder<'_> {
        let mut responses = self.responses.borrow_mut();
        responses.push_back(Response {
            code,
            ..Response::default()
        });
        ResponseBuilder {
            runner: self,
            index: responses.len() - 1,
        }
    }

    /// Queue a response whose process cannot be started
    pub fn fail_to_spawn(&self) {
        self.responses.borrow_mut().push_back(Response {
            spawn_error: true,
            ..Response::default()
        });
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

impl ResponseBuilder<'_> {
    /// Emit `text` on `stream` while running
    pub fn line(self, stream: Stream, text: &str) -> Self {
        self.runner.responses.borrow_mut()[self.index]
            .lines
            .push((stream, text.to_string()));
        self
    }

    /// Side effect performed when the call happens
    pub fn effect(self, effect: impl Fn(&Call) + 'static) -> Self {
        self.runner.responses.borrow_mut()[self.index].effect = Some(Box::new(effect));
        self
    }
}

impl ProcessRunner for ScriptedRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
        on_line: &mut dyn FnMut(Stream, &str),
    ) -> io::Result<ProcessOutput> {
        let call = Call {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            cwd: cwd.map(Path::to_path_buf),
        };
        self.calls.borrow_mut().push(call.clone());

        let response = self.responses.borrow_mut().pop_front().unwrap_or_default();
        if response.spawn_error {
            return Err(io::Error::new(io::ErrorKind::NotFound, program.to_string()));
        }
        if let Some(effect) = &response.effect {
            effect(&call);
        }

        let mut output = ProcessOutput {
            code: response.code,
            ..ProcessOutput::default()
        };
        for (stream, line) in &response.lines {
            on_line(*stream, line);
            let buffer = match stream {
                Stream::Stdout => &mut output.stdout,
                Stream::Stderr => &mut output.stderr,
            };
            buffer.push_str(line);
            buffer.push('\n');
        }
        Ok(output)
    }
}

enum Answer {
    Text(String),
    Choice(usize),
    Default,
}

/// Answers prompts from a queue and fails on unexpected questions
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: RefCell<VecDeque<Answer>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(self, text: &str) -> Self {
        self.push(Answer::Text(text.to_string()))
    }

    /// Accept the prompt's default text
    pub fn text_default(self) -> Self {
        self.push(Answer::Default)
    }

    pub fn choose(self, index: usize) -> Self {
        self.push(Answer::Choice(index))
    }

    /// Accept the prompt's default choice
    pub fn choose_default(self) -> Self {
        self.push(Answer::Default)
    }

    /// Every prompt shown so far
    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }

    fn push(self, answer: Answer) -> Self {
        self.answers.borrow_mut().push_back(answer);
        self
    }

    fn next(&self, prompt: &str) -> Result<Answer> {
        self.asked.borrow_mut().push(prompt.to_string());
        match self.answers.borrow_mut().pop_front() {
            Some(answer) => Ok(answer),
            None => bail!("unexpected prompt: {prompt}"),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn input(&self, prompt: &str, default: Option<&str>) -> Result<String> {
        match self.next(prompt)? {
            Answer::Text(text) => Ok(text),
            Answer::Default => Ok(default.unwrap_or_default().to_string()),
            Answer::Choice(_) => bail!("expected a text answer for: {prompt}"),
        }
    }

    fn select(&self, prompt: &str, items: &[&str], default: usize) -> Result<usize> {
        let index = match self.next(prompt)? {
            Answer::Choice(index) => index,
            Answer::Default => default,
            Answer::Text(_) => bail!("expected a choice for: {prompt}"),
        };
        if index >= items.len() {
            bail!("choice {index} out of range for: {prompt}");
        }
        Ok(index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    State(PipelineState),
    Progress(u8),
    Output(String),
    Injected(InjectionReport),
    Vcs(VcsOutcome),
    InstallStarted(String),
    Installed(InstallOutcome),
}

/// Keeps every observer callback in order
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub events: Vec<Event>,
}

impl PipelineObserver for RecordingObserver {
    fn on_state(&mut self, state: PipelineState) {
        self.events.push(Event::State(state));
    }

    fn on_clone_progress(&mut self, progress: &CloneProgress) {
        self.events.push(Event::Progress(progress.percent));
    }

    fn on_output(&mut self, _stream: Stream, line: &str) {
        self.events.push(Event::Output(line.to_string()));
    }

    fn on_injected(&mut self, report: &InjectionReport) {
        self.events.push(Event::Injected(report.clone()));
    }

    fn on_vcs(&mut self, outcome: &VcsOutcome) {
        self.events.push(Event::Vcs(outcome.clone()));
    }

    fn on_install_started(&mut self, command: &str) {
        self.events.push(Event::InstallStarted(command.to_string()));
    }

    fn on_installed(&mut self, outcome: &InstallOutcome) {
        self.events.push(Event::Installed(outcome.clone()));
    }
}
