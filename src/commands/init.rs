//! Comando init - Cria um projeto a partir de um template

use anyhow::{Context, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use xshell::Shell;

use crate::core::config::{Settings, git};
use crate::core::error::PipelineError;
use crate::core::fetch::CloneProgress;
use crate::core::inject::{InjectionReport, TargetRole};
use crate::core::install::InstallOutcome;
use crate::core::pipeline::{Pipeline, PipelineObserver, PipelineState};
use crate::core::preflight;
use crate::core::process::{Stream, SystemRunner};
use crate::core::prompt::DialoguerPrompter;
use crate::core::request::{self, ProjectRequest, TemplateSource, TemplateType};
use crate::core::utils;
use crate::core::vcs::VcsOutcome;

pub fn run(
    name: &str,
    template: Option<TemplateType>,
    config: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    println!("{}", format!("🌱 Creating project '{}'...", name).bright_yellow());

    let settings = Settings::load(config)?;
    let name = request::validate_name(name)?;

    let sh = Shell::new()?;
    preflight::require(&sh, git::PROGRAM)?;
    if !preflight::tool_available(&sh, &settings.install.program) {
        utils::print_warning(&format!(
            "`{}` was not found; installing dependencies will fail",
            settings.install.program
        ));
    }

    let prompter = DialoguerPrompter::new();
    let request = request::collect(&name, template, &settings, &prompter)?;

    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let source = TemplateSource::resolve(&request, &settings, &cwd);
    utils::print_verbose(
        verbose,
        &format!("template: {} ({})", request.template, source.url),
    );
    utils::print_verbose(
        verbose,
        &format!("destination: {}", source.destination.display()),
    );

    let runner = SystemRunner;
    let mut observer = ConsoleObserver::new(&request, &source, verbose);
    let mut pipeline = Pipeline::new(&runner, &prompter, &settings);

    let result = pipeline.run(&request, &source, &mut observer);
    let stages: Vec<_> = pipeline.history().iter().map(|s| format!("{s:?}")).collect();
    utils::print_verbose(
        verbose,
        &format!("pipeline {:?}: {}", pipeline.state(), stages.join(" → ")),
    );

    match result {
        Ok(()) => Ok(()),
        Err(err) => {
            if let PipelineError::Install(install) = &err {
                utils::print_hint(install.hint());
            }
            Err(err.into())
        }
    }
}

/// Renders pipeline progress on the terminal
struct ConsoleObserver {
    name: String,
    url: String,
    destination: PathBuf,
    verbose: bool,
    progress: Option<ProgressBar>,
    spinner: Option<ProgressBar>,
}

impl ConsoleObserver {
    fn new(request: &ProjectRequest, source: &TemplateSource, verbose: bool) -> Self {
        Self {
            name: request.name.clone(),
            url: source.url.clone(),
            destination: source.destination.clone(),
            verbose,
            progress: None,
            spinner: None,
        }
    }

    fn clear_bars(&mut self) {
        if let Some(bar) = self.progress.take() {
            bar.finish_and_clear();
        }
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    fn clone_bar() -> ProgressBar {
        let bar = ProgressBar::new(100);
        let style = ProgressStyle::with_template(
            "     {spinner:.cyan} {msg:<26} [{bar:30.cyan/blue}] {pos:>3}%",
        )
        .map(|style| style.progress_chars("=> "))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        bar
    }
}

impl PipelineObserver for ConsoleObserver {
    fn on_state(&mut self, state: PipelineState) {
        let was_cloning = self.progress.is_some();
        self.clear_bars();

        match state {
            PipelineState::Fetching => {
                utils::print_step(&format!("Cloning {}...", self.url.bright_cyan()));
                self.progress = Some(Self::clone_bar());
            }
            PipelineState::Injecting => {
                if was_cloning {
                    utils::print_success("Template cloned");
                }
                utils::print_step("Injecting project metadata...");
            }
            PipelineState::ReinitializingVcs => {
                utils::print_step("Resetting version control...");
            }
            PipelineState::Installing => {}
            PipelineState::Done => {
                println!(
                    "{}",
                    format!("✓ Project {} created!", self.name).bright_green().bold()
                );
                println!(
                    "   Location: {}",
                    self.destination.display().to_string().bright_cyan()
                );
            }
            PipelineState::Idle | PipelineState::Failed => {}
        }
    }

    fn on_clone_progress(&mut self, progress: &CloneProgress) {
        if let Some(bar) = &self.progress {
            bar.set_message(progress.stage.clone());
            bar.set_position(u64::from(progress.percent));
        }
        if self.verbose {
            let line = format!(
                "git {} stage {}% complete ({}/{})",
                progress.stage, progress.percent, progress.done, progress.total
            );
            match &self.progress {
                Some(bar) => bar.println(format!("     {}", line.bright_black())),
                None => utils::print_verbose(true, &line),
            }
        }
    }

    fn on_output(&mut self, stream: Stream, line: &str) {
        match &self.spinner {
            Some(spinner) => spinner.println(format!("     {line}")),
            None => {
                let prefix = match stream {
                    Stream::Stdout => "stdout",
                    Stream::Stderr => "stderr",
                };
                utils::print_verbose(self.verbose, &format!("{prefix}: {line}"));
            }
        }
    }

    fn on_injected(&mut self, report: &InjectionReport) {
        for target in report.rendered() {
            utils::print_verbose(
                self.verbose,
                &format!("{} ({})", role_label(target.role), target.path),
            );
        }
        for target in report.skipped() {
            utils::print_warning(&format!("No {}, skipped", target.path));
        }
        utils::print_success(&format!(
            "Metadata injected into {} file(s)",
            report.rendered().count()
        ));
    }

    fn on_vcs(&mut self, outcome: &VcsOutcome) {
        match outcome {
            VcsOutcome::Initialized { remote, branch } => utils::print_success(&format!(
                "Git repository initialized on {} with {} → {}",
                branch.bright_green(),
                git::REMOTE_NAME,
                remote.bright_cyan()
            )),
            VcsOutcome::HistoryRemoved => {
                utils::print_info("No git remote given, repository not initialized")
            }
        }
    }

    fn on_install_started(&mut self, command: &str) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_message(format!("{command}..."));
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(spinner);
    }

    fn on_installed(&mut self, outcome: &InstallOutcome) {
        self.clear_bars();
        match outcome {
            InstallOutcome::Installed { .. } => utils::print_success("Dependencies installed"),
            InstallOutcome::Skipped { .. } => utils::print_info("Dependency install skipped"),
        }
        utils::print_hint(outcome.hint());
    }
}

fn role_label(role: TargetRole) -> &'static str {
    match role {
        TargetRole::PackageManifest => "package manifest",
        TargetRole::EnvDevelopment => "development environment",
        TargetRole::EnvPreProduction => "pre-production environment",
        TargetRole::EnvProduction => "production environment",
        TargetRole::EnvStaging => "staging environment",
        TargetRole::Readme => "readme",
    }
}
