//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// FlavorLineTool - a CLI for Flavortown and Hackatime
///
/// Browse users, projects and the shop, search across every page of a
/// listing, manage your own projects, and check your coding time.
///
/// Examples:
///   flavor login api ft_sk_...
///   flavor list users --page 2
///   flavor search users ada --all
///   flavor projects edit 42
///   flavor time today
#[derive(Parser, Debug, Clone)]
#[command(name = "flavor", author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to configuration file
    ///
    /// If not specified, looks for ~/.flavorlinetool/config.toml
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run in quiet mode (no spinners, errors only in logs)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Flavortown API base URL
    #[arg(long, value_name = "URL", env = "FLAVOR_API_URL", global = true)]
    pub flavortown_url: Option<String>,

    /// Hackatime API base URL
    #[arg(long, value_name = "URL", env = "HACKATIME_API_URL", global = true)]
    pub hackatime_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    /// Generate a default ~/.flavorlinetool/config.toml
    #[arg(long)]
    pub init_config: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Check that the CLI is alive and show which credentials are set
    Status,

    /// Store credentials and identifiers
    #[command(subcommand)]
    Login(LoginCommand),

    /// List shop items, users, or your projects
    #[command(subcommand)]
    List(ListCommand),

    /// Search users or projects
    #[command(subcommand)]
    Search(SearchCommand),

    /// Create, edit, or view projects
    #[command(subcommand)]
    Projects(ProjectsCommand),

    /// Hackatime coding time
    #[command(subcommand)]
    Time(TimeCommand),
}

#[derive(Subcommand, Debug, Clone)]
pub enum LoginCommand {
    /// Login with your Flavortown API key
    Api {
        /// Your Flavortown API key (prompted if omitted)
        key: Option<String>,
    },
    /// Set your Flavortown user ID
    Id {
        /// Your Flavortown user ID (prompted if omitted)
        id: Option<String>,
    },
    /// Login with your Hackatime API key
    Hackatime {
        /// Your Hackatime API key (prompted if omitted)
        key: Option<String>,
    },
    /// Set your Hackatime username
    #[command(name = "hackatime-user", alias = "hackatimeuser")]
    HackatimeUser {
        /// Your Hackatime username (prompted if omitted)
        username: Option<String>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ListCommand {
    /// List all items in the shop
    Shop,
    /// List users (paginated)
    Users {
        #[arg(long, default_value = "1", value_name = "N")]
        page: u32,
    },
    /// List your projects
    #[command(name = "my-projects")]
    MyProjects,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SearchCommand {
    /// Search users by display name
    Users(SearchArgs),
    /// Search projects by title or description
    Projects(SearchArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct SearchArgs {
    /// Text to search for (case-insensitive)
    pub query: String,

    /// Page to show when not scanning all pages
    #[arg(long, default_value = "1", value_name = "N", conflicts_with = "all")]
    pub page: u32,

    /// Scan every page of results
    #[arg(long)]
    pub all: bool,

    /// Skip the confirmation before a full scan
    #[arg(short, long)]
    pub yes: bool,

    /// Seconds to wait between page requests during a full scan
    #[arg(long, value_name = "SECS")]
    pub delay: Option<f64>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ProjectsCommand {
    /// Create a new project with an interactive form
    Create,
    /// Edit one of your projects with an interactive form
    Edit {
        /// The ID of the project to edit (prompted if omitted)
        project_id: Option<u64>,
    },
    /// View details of a project
    View {
        /// The ID of the project to view (prompted if omitted)
        project_id: Option<u64>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum TimeCommand {
    /// Show how much you've coded today
    Today,
    /// Show all-time stats for a Hackatime user
    Stats {
        /// Hackatime username (defaults to the stored one)
        username: Option<String>,
    },
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.command.is_none() {
            return Err("No command given. Run 'flavor --help' for usage.".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        for url in [&self.flavortown_url, &self.hackatime_url].into_iter().flatten() {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(format!("API URL must start with 'http://' or 'https://': {}", url));
            }
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        match &self.command {
            Some(Command::List(ListCommand::Users { page })) if *page == 0 => {
                return Err("Page must be at least 1".to_string());
            }
            Some(Command::Search(
                SearchCommand::Users(search) | SearchCommand::Projects(search),
            )) => search.validate()?,
            _ => {}
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        }
    }
}

impl SearchArgs {
    fn validate(&self) -> Result<(), String> {
        if self.query.trim().is_empty() {
            return Err("Search query must not be empty".to_string());
        }
        if self.page == 0 {
            return Err("Page must be at least 1".to_string());
        }
        if let Some(delay) = self.delay {
            if Duration::try_from_secs_f64(delay).is_err() {
                return Err(format!(
                    "Delay must be a non-negative number of seconds, got {}",
                    delay
                ));
            }
        }
        Ok(())
    }
}
