//! Login, logout and credential listing

use colored::Colorize;
use dialoguer::Password;
use serde_json::json;
use vcs_core::{CredentialChange, VcsAccess};

use crate::error::Result;

/// Run the login command
pub fn run_login(access: &VcsAccess, url: &str, user: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt(format!("Password for {} at {}", user, url))
            .interact()?,
    };

    match access.set_credential(url, user, &password)? {
        CredentialChange::Inserted => {
            println!("{} login for {}", "Stored".green().bold(), url.cyan());
        }
        CredentialChange::Replaced { previous } => {
            println!(
                "{} login for {} (was {})",
                "Replaced".green().bold(),
                url.cyan(),
                previous.user()
            );
        }
    }
    Ok(())
}

/// Run the logout command
pub fn run_logout(access: &VcsAccess, url: &str) -> Result<()> {
    match access.remove_credential(url)? {
        Some(removed) => println!("{} login for {}", "Removed".green().bold(), removed.server().cyan()),
        None => println!("{} {}", "No login stored for".dimmed(), url),
    }
    Ok(())
}

/// Run the credentials command
pub fn run_credentials(access: &VcsAccess, json: bool) -> Result<()> {
    let credentials = access.credentials();

    if json {
        let listing: Vec<_> = credentials
            .iter()
            .map(|c| json!({ "server": c.server(), "user": c.user() }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    if credentials.is_empty() {
        println!("{} (use {} to add one)", "No logins".dimmed(), "vcs login".cyan());
        return Ok(());
    }

    println!("{}", "Stored Logins".bold());
    println!();
    for credential in &credentials {
        println!("  {}  {}", credential.server().cyan(), credential.user());
    }
    Ok(())
}
