//! Install module - Installing the new project's dependencies

use std::path::Path;

use crate::core::config::InstallSettings;
use crate::core::error::InstallError;
use crate::core::process::{ProcessRunner, Stream};
use crate::core::prompt::{Prompter, yes_no};

/// Progress of a running install
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallEvent<'a> {
    /// Consent given, `command` is about to run
    Started { command: &'a str },
    Output { stream: Stream, line: &'a str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Dependencies installed; `hint` starts the project
    Installed { hint: Vec<String> },
    /// User declined; `hint` installs and starts it by hand
    Skipped { hint: Vec<String> },
}

impl InstallOutcome {
    pub fn hint(&self) -> &[String] {
        match self {
            Self::Installed { hint } | Self::Skipped { hint } => hint,
        }
    }
}

/// Ask for consent, then run the package manager inside `root`.
///
/// `name` is the project directory as the user sees it, used in hints.
pub fn install(
    runner: &dyn ProcessRunner,
    prompter: &dyn Prompter,
    settings: &InstallSettings,
    name: &str,
    root: &Path,
    on_event: &mut dyn FnMut(InstallEvent<'_>),
) -> Result<InstallOutcome, InstallError> {
    let manual = vec![
        format!("cd {name}"),
        settings.command_line(),
        settings.start_command.clone(),
    ];

    let consent = yes_no(prompter, "Install dependencies?", true).map_err(InstallError::Prompt)?;
    if !consent {
        return Ok(InstallOutcome::Skipped { hint: manual });
    }

    let command = settings.command_line();
    on_event(InstallEvent::Started { command: &command });

    let args: Vec<&str> = settings.args.iter().map(String::as_str).collect();
    let output = runner
        .run(&settings.program, &args, Some(root), &mut |stream, line| {
            on_event(InstallEvent::Output { stream, line })
        })
        .map_err(|source| InstallError::Spawn {
            command,
            hint: manual.clone(),
            source,
        })?;

    if output.success() {
        Ok(InstallOutcome::Installed {
            hint: vec![format!("cd {name}"), settings.start_command.clone()],
        })
    } else {
        Err(InstallError::Exit {
            code: output.code,
            hint: manual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{ScriptedPrompter, ScriptedRunner};

    #[test]
    fn declining_runs_nothing_and_hints_manual_install() {
        let runner = ScriptedRunner::new();
        let prompter = ScriptedPrompter::new().choose(1);

        let outcome = install(
            &runner,
            &prompter,
            &InstallSettings::default(),
            "demo",
            Path::new("/work/demo"),
            &mut |_| {},
        )
        .unwrap();

        assert!(runner.calls().is_empty());
        assert_eq!(
            outcome,
            InstallOutcome::Skipped {
                hint: vec![
                    "cd demo".into(),
                    "npm install".into(),
                    "npm run serve".into()
                ]
            }
        );
    }

    #[test]
    fn accepting_runs_package_manager_in_project_dir() {
        let runner = ScriptedRunner::new();
        runner.respond(0).line(Stream::Stdout, "added 1 package");
        let prompter = ScriptedPrompter::new().choose(0);

        let mut events = Vec::new();
        let outcome = install(
            &runner,
            &prompter,
            &InstallSettings::default(),
            "demo",
            Path::new("/work/demo"),
            &mut |event| events.push(format!("{event:?}")),
        )
        .unwrap();

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "npm");
        assert_eq!(calls[0].args, vec!["install"]);
        assert_eq!(calls[0].cwd.as_deref(), Some(Path::new("/work/demo")));
        assert_eq!(
            events,
            vec![
                "Started { command: \"npm install\" }",
                "Output { stream: Stdout, line: \"added 1 package\" }",
            ]
        );
        assert_eq!(outcome.hint(), ["cd demo", "npm run serve"]);
    }

    #[test]
    fn failed_install_carries_code_and_manual_hint() {
        let runner = ScriptedRunner::new();
        runner.respond(1);
        let prompter = ScriptedPrompter::new().choose_default();
        let settings = InstallSettings {
            program: "yarn".into(),
            args: vec![],
            start_command: "yarn serve".into(),
        };

        let error = install(
            &runner,
            &prompter,
            &settings,
            "demo",
            Path::new("demo"),
            &mut |_| {},
        )
        .unwrap_err();

        assert!(matches!(error, InstallError::Exit { code: 1, .. }));
        assert_eq!(error.hint(), ["cd demo", "yarn", "yarn serve"]);
    }
}
