//! Core module - Template provisioning building blocks

pub mod config;
pub mod error;
pub mod fetch;
pub mod inject;
pub mod install;
pub mod pipeline;
pub mod preflight;
pub mod process;
pub mod prompt;
pub mod request;
pub mod utils;
pub mod vcs;

#[cfg(test)]
pub mod testing;
