//! Utilities module - Console output helpers

use colored::*;

/// Print a step message
pub fn print_step(message: &str) {
    println!("   {} {}", "→".bright_blue(), message);
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("   {} {}", "✓".bright_green(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("   {} {}", "✗".bright_red(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("   {} {}", "⚠".bright_yellow(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("   {} {}", "ℹ".bright_cyan(), message);
}

/// Print the shell commands the user should run next, one per line
pub fn print_hint(commands: &[String]) {
    println!();
    for command in commands {
        println!("     {}", command.bright_blue());
    }
}

/// Print a diagnostic line, only when verbose output is on
pub fn print_verbose(verbose: bool, message: &str) {
    if verbose {
        println!("     {}", message.bright_black());
    }
}
