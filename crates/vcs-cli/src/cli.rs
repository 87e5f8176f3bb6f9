//! CLI argument parsing using clap derive

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// VCS Share - Track shared directories and server logins
#[derive(Parser, Debug)]
#[command(name = "vcs")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding config.toml and store.json
    #[arg(long, global = true, env = "VCS_SHARE_HOME")]
    pub home: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Share a local directory against a remote VCS root
    ///
    /// The directory must exist and must neither lie inside nor contain
    /// an existing share.
    Share {
        /// Local directory to share
        path: PathBuf,

        /// Id of the remote VCS root
        remote_root_id: u64,
    },

    /// Remove a share by id
    Unshare {
        /// Share id as printed by `vcs roots`
        id: String,
    },

    /// List shared roots
    Roots {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show which share owns a path
    Which {
        /// Path to look up
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Store the login for a server, replacing any existing one
    Login {
        /// Server URL
        url: String,

        /// User name
        #[arg(short, long)]
        user: String,

        /// Password; prompted for when omitted
        #[arg(long, env = "VCS_SHARE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the login for a server
    Logout {
        /// Server URL
        url: String,
    },

    /// List stored logins (secrets are never shown)
    Credentials {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Remove every share and login
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_share() {
        let cli = Cli::parse_from(["vcs", "share", "/work/project", "42"]);
        assert_eq!(
            cli.command,
            Some(Commands::Share {
                path: PathBuf::from("/work/project"),
                remote_root_id: 42,
            })
        );
    }

    #[test]
    fn parse_share_rejects_non_numeric_remote() {
        assert!(Cli::try_parse_from(["vcs", "share", "/work", "abc"]).is_err());
    }

    #[test]
    fn parse_which_defaults_to_cwd() {
        let cli = Cli::parse_from(["vcs", "which"]);
        assert_eq!(
            cli.command,
            Some(Commands::Which {
                path: PathBuf::from(".")
            })
        );
    }

    #[test]
    fn parse_login_with_user() {
        let cli = Cli::parse_from(["vcs", "login", "http://host/", "--user", "u", "--password", "p"]);
        assert_eq!(
            cli.command,
            Some(Commands::Login {
                url: "http://host/".into(),
                user: "u".into(),
                password: Some("p".into()),
            })
        );
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["vcs", "roots", "--json", "-v", "--home", "/tmp/h"]);
        assert!(cli.verbose);
        assert_eq!(cli.home, Some(PathBuf::from("/tmp/h")));
        assert_eq!(cli.command, Some(Commands::Roots { json: true }));
    }
}
