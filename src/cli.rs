//! Defines the command-line interface structure using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "prompthub", version, about = "Share and reuse prompt repositories")]
pub struct Cli {
    /// Data directory (defaults to ~/.prompthub)
    #[arg(long, global = true, env = "PROMPTHUB_HOME")]
    pub home: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Cmd,
}

#[derive(Subcommand)]
pub enum Cmd {
    /// Create an account and sign in
    Signup {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        username: Option<String>,
    },
    /// Sign in to an existing account
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    /// Sign out and forget the saved session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List public repositories, newest first
    List,
    /// Search repositories by name, tag or description
    Search {
        query: String,
        #[arg(long, help = "Only show repositories in this category ('all' for any)")]
        category: Option<String>,
        #[arg(long, default_value = "relevance", help = "relevance, stars, forks, updated or created")]
        sort: String,
    },
    /// Show a repository and its prompts
    Show {
        /// Repository route, e.g. `ada/email-kit`
        repo: String,
    },
    /// Star a repository
    Star { repo: String },
    /// Remove your star from a repository
    Unstar { repo: String },
    /// Copy a repository and its prompts into your account
    Fork { repo: String },
    /// Show hub statistics
    Stats,
    /// Manage your repositories
    #[command(subcommand)]
    Repo(RepoCmd),
    /// Manage prompts inside a repository
    #[command(subcommand)]
    Prompt(PromptCmd),
    /// Send a one-off prompt to the configured model
    Generate {
        text: String,
        #[arg(long, help = "Override the configured model")]
        model: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum RepoCmd {
    /// Create a new repository interactively
    New,
    /// Export a repository and its prompts to a file
    Export {
        repo: String,
        #[arg(long, help = "Output file path")]
        out: PathBuf,
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
    },
    /// Recompute a repository's star count from its stars
    Recount { repo: String },
}

#[derive(Subcommand)]
pub enum PromptCmd {
    /// Add a prompt to one of your repositories
    New { repo: String },
    /// List the prompts of a repository
    List { repo: String },
    /// Print a prompt
    Get { repo: String, file: String },
    /// Edit a prompt in your editor
    Edit { repo: String, file: String },
    /// Delete a prompt
    Delete { repo: String, file: String },
    /// Copy a prompt's content to the clipboard
    Copy { repo: String, file: String },
    /// Render a prompt with variable substitution (local only)
    Render {
        repo: String,
        file: String,
        #[arg(long = "var", help = "Variable assignments in key=value format")]
        vars: Vec<String>,
    },
    /// Render a prompt and send it to the configured model
    Run {
        repo: String,
        file: String,
        #[arg(long = "var", help = "Variable assignments in key=value format")]
        vars: Vec<String>,
        #[arg(long, help = "Override the configured model")]
        model: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Yaml,
}
