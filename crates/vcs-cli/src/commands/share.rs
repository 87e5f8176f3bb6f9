//! Share, unshare and lookup commands

use colored::Colorize;
use std::path::Path;
use vcs_core::VcsAccess;

use crate::error::Result;

/// Run the share command
pub fn run_share(access: &VcsAccess, path: &Path, remote_root_id: u64) -> Result<()> {
    let root = access.share(path, remote_root_id)?;
    println!(
        "{} {} as share {} (remote root {})",
        "Shared".green().bold(),
        root.local_path(),
        root.id().cyan(),
        root.remote_root_id()
    );
    Ok(())
}

/// Run the unshare command
pub fn run_unshare(access: &VcsAccess, id: &str) -> Result<()> {
    let root = access.unshare(id)?;
    println!(
        "{} share {} ({})",
        "Removed".green().bold(),
        root.id().cyan(),
        root.local_path()
    );
    Ok(())
}

/// Run the roots command
pub fn run_roots(access: &VcsAccess, json: bool) -> Result<()> {
    let roots = access.roots();

    if json {
        println!("{}", serde_json::to_string_pretty(&roots)?);
        return Ok(());
    }

    if roots.is_empty() {
        println!("{} (use {} to add one)", "No shares".dimmed(), "vcs share".cyan());
        return Ok(());
    }

    println!("{}", "Shared Roots".bold());
    println!();
    for root in &roots {
        println!(
            "  {:<6} {}  {} {}",
            root.id().cyan(),
            root.local_path(),
            "remote".dimmed(),
            root.remote_root_id()
        );
    }
    Ok(())
}

/// Run the which command
pub fn run_which(access: &VcsAccess, path: &Path) -> Result<()> {
    match access.get_root(path)? {
        Some(root) => println!("{}", root),
        None => println!("{} {}", "Not shared:".yellow(), path.display()),
    }
    Ok(())
}
