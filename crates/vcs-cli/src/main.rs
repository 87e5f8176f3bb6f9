//! VCS Share CLI
//!
//! The command-line interface for sharing local directories against
//! remote VCS roots and managing server logins.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;
use vcs_core::{RegistryConfig, VcsAccess};

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: could not set up logging: {}", "warning".yellow().bold(), e);
    }

    let Some(command) = cli.command else {
        println!("{} VCS Share CLI", "vcs".green().bold());
        println!();
        println!("Run {} for available commands.", "vcs --help".cyan());
        return Ok(());
    };

    let config = RegistryConfig::discover(cli.home.as_deref())?;
    tracing::debug!(?config, "Resolved configuration");
    let access = VcsAccess::open_file(config)?;

    execute_command(&access, command)?;
    access.flush()?;
    Ok(())
}

fn execute_command(access: &VcsAccess, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Share {
            path,
            remote_root_id,
        } => commands::run_share(access, &path, remote_root_id),
        Commands::Unshare { id } => commands::run_unshare(access, &id),
        Commands::Roots { json } => commands::run_roots(access, json),
        Commands::Which { path } => commands::run_which(access, &path),
        Commands::Login {
            url,
            user,
            password,
        } => commands::run_login(access, &url, &user, password),
        Commands::Logout { url } => commands::run_logout(access, &url),
        Commands::Credentials { json } => commands::run_credentials(access, json),
        Commands::Reset { yes } => commands::run_reset(access, yes),
    }
}
