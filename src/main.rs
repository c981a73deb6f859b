//! Stencil - Project scaffolding from git templates
//!
//! Clones a template repository, fills in the project's name, description
//! and author, starts a fresh git history and installs dependencies.
//!
//! # Uso
//! ```bash
//! stencil init my-app
//! stencil init my-app --type vue-antd
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod core;

use crate::core::config::CONFIG_ENV;
use crate::core::error::{PipelineError, exit_codes};
use crate::core::request::TemplateType;
use crate::core::utils;

#[derive(Parser)]
#[command(name = "stencil")]
#[command(about = "🌱 Stencil - Scaffold a new project from a git template", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file
    #[arg(long, global = true, hide = true, env = CONFIG_ENV)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Init a project
    Init {
        /// Project name, also the directory created for it
        name: String,

        /// Type of the project to init
        #[arg(short, long = "type", value_enum)]
        template_type: Option<TemplateType>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    println!("{}", "🌱 Stencil".bright_cyan().bold());
    println!();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            utils::print_error(&format!("{err:#}"));
            ExitCode::from(exit_code(&err))
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init {
            name,
            template_type,
        } => commands::init::run(&name, template_type, cli.config.as_deref(), cli.verbose),
    }
}

fn exit_code(err: &anyhow::Error) -> u8 {
    let code = err
        .downcast_ref::<PipelineError>()
        .map_or(exit_codes::FAILURE, PipelineError::exit_code);
    u8::try_from(code).unwrap_or(1)
}
