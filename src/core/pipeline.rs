//! Pipeline module - Fetch, inject, reinitialize, install
//!
//! The steps run strictly in order; the first failure moves the pipeline
//! to [`PipelineState::Failed`] and nothing after it runs. Completed steps
//! are not rolled back.

use crate::core::config::Settings;
use crate::core::error::PipelineError;
use crate::core::fetch::{self, CloneProgress};
use crate::core::inject::{self, InjectionReport, Metadata};
use crate::core::install::{self, InstallEvent, InstallOutcome};
use crate::core::process::{ProcessRunner, Stream};
use crate::core::prompt::Prompter;
use crate::core::request::{ProjectRequest, TemplateSource};
use crate::core::vcs::{self, VcsOutcome};

/// Where the pipeline is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Fetching,
    Injecting,
    ReinitializingVcs,
    Installing,
    Done,
    Failed,
}

/// Receives progress while the pipeline runs
pub trait PipelineObserver {
    fn on_state(&mut self, state: PipelineState);
    fn on_clone_progress(&mut self, progress: &CloneProgress);
    fn on_output(&mut self, stream: Stream, line: &str);
    fn on_injected(&mut self, report: &InjectionReport);
    fn on_vcs(&mut self, outcome: &VcsOutcome);
    fn on_install_started(&mut self, command: &str);
    fn on_installed(&mut self, outcome: &InstallOutcome);
}

pub struct Pipeline<'a> {
    runner: &'a dyn ProcessRunner,
    prompter: &'a dyn Prompter,
    settings: &'a Settings,
    state: PipelineState,
    history: Vec<PipelineState>,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        runner: &'a dyn ProcessRunner,
        prompter: &'a dyn Prompter,
        settings: &'a Settings,
    ) -> Self {
        Self {
            runner,
            prompter,
            settings,
            state: PipelineState::Idle,
            history: vec![PipelineState::Idle],
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Every state entered so far, starting with `Idle`
    pub fn history(&self) -> &[PipelineState] {
        &self.history
    }

    /// Run all steps for `request`, cloning from and into `source`
    pub fn run(
        &mut self,
        request: &ProjectRequest,
        source: &TemplateSource,
        observer: &mut dyn PipelineObserver,
    ) -> Result<(), PipelineError> {
        let result = self.run_steps(request, source, observer);
        let last = if result.is_ok() {
            PipelineState::Done
        } else {
            PipelineState::Failed
        };
        self.enter(last, observer);
        result
    }

    fn run_steps(
        &mut self,
        request: &ProjectRequest,
        source: &TemplateSource,
        observer: &mut dyn PipelineObserver,
    ) -> Result<(), PipelineError> {
        let root = source.destination.as_path();

        self.enter(PipelineState::Fetching, observer);
        fetch::fetch(self.runner, &source.url, root, &mut |progress| {
            observer.on_clone_progress(progress)
        })?;

        self.enter(PipelineState::Injecting, observer);
        let metadata = Metadata {
            name: &request.name,
            description: &request.description,
            author: &request.author,
        };
        let report = inject::inject(root, &metadata)?;
        observer.on_injected(&report);

        self.enter(PipelineState::ReinitializingVcs, observer);
        let outcome = vcs::reinit(
            self.runner,
            root,
            request.remote_url.as_deref(),
            &request.branch,
            &mut |stream, line| observer.on_output(stream, line),
        )?;
        observer.on_vcs(&outcome);

        self.enter(PipelineState::Installing, observer);
        let outcome = install::install(
            self.runner,
            self.prompter,
            &self.settings.install,
            &request.name,
            root,
            &mut |event| match event {
                InstallEvent::Started { command } => observer.on_install_started(command),
                InstallEvent::Output { stream, line } => observer.on_output(stream, line),
            },
        )?;
        observer.on_installed(&outcome);

        Ok(())
    }

    fn enter(&mut self, state: PipelineState, observer: &mut dyn PipelineObserver) {
        self.state = state;
        self.history.push(state);
        observer.on_state(state);
    }
}
