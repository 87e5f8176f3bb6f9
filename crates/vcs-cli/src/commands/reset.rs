//! Reset command

use colored::Colorize;
use dialoguer::Confirm;
use vcs_core::VcsAccess;

use crate::error::{CliError, Result};

/// Run the reset command
pub fn run_reset(access: &VcsAccess, yes: bool) -> Result<()> {
    if !yes {
        let confirmed = Confirm::new()
            .with_prompt("Remove every share and stored login?")
            .default(false)
            .interact()?;
        if !confirmed {
            return Err(CliError::user("Reset cancelled"));
        }
    }

    access.clear()?;
    println!("{} all shares and logins", "Cleared".green().bold());
    Ok(())
}
