//! Terminal presentation: tables, prompts, progress.

pub mod progress;
pub mod prompt;
pub mod table;

pub use progress::{spinner, ScanProgress};
pub use prompt::Prompter;
pub use table::{render_panel, truncate, Align, Table};

use colored::Colorize;

/// Print an error line in bold red.
pub fn error(message: &str) {
    eprintln!("{}", message.red().bold());
}

/// Print a warning line in yellow.
pub fn warning(message: &str) {
    println!("{}", message.yellow());
}

/// Print a success line in green.
pub fn success(message: &str) {
    println!("{}", message.green());
}

/// Print a dimmed hint line.
pub fn hint(message: &str) {
    println!("{}", message.dimmed());
}
