//! Command-line definitions.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use folio_domain::{ManuscriptStatus, UserRole, UserStatus, WorkspaceRole};
use url::Url;
use uuid::Uuid;

/// Command-line client for the Folio manuscript API.
#[derive(Debug, Parser)]
#[command(name = "folio")]
#[command(version)]
pub struct Cli {
    /// Configuration file (TOML).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// API base URL, e.g. `https://folio.example/api`.
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<Url>,

    /// File the session is kept in between runs.
    #[arg(long, global = true, value_name = "FILE")]
    pub credentials: Option<PathBuf>,

    /// Keep the session in memory for this run only.
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Print responses as JSON instead of tables.
    #[arg(long, global = true)]
    pub json: bool,

    /// Log more (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in with a username or email address.
    Login(LoginArgs),

    /// Sign in with a Google access token.
    GoogleLogin {
        access_token: String,
        #[arg(long)]
        id_token: Option<String>,
    },

    /// Create an account and sign in.
    Register(RegisterArgs),

    /// Sign out and forget the stored session.
    Logout,

    /// Show the signed-in user.
    Whoami,

    /// User directory and administration.
    #[command(subcommand)]
    Users(UserCommand),

    /// Update the signed-in user's profile.
    Profile(ProfileArgs),

    /// Password reset and change.
    #[command(subcommand)]
    Password(PasswordCommand),

    /// Workspaces and their members.
    #[command(subcommand, visible_alias = "ws")]
    Workspaces(WorkspaceCommand),

    /// Manuscripts.
    #[command(subcommand)]
    Manuscripts(ManuscriptCommand),

    /// Chapters of a manuscript.
    #[command(subcommand)]
    Chapters(ChapterCommand),

    /// Chapter documents and editor configuration.
    #[command(subcommand)]
    Documents(DocumentCommand),
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username, or email address if it contains '@'.
    pub identifier: String,

    #[arg(long, env = "FOLIO_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    pub username: String,

    pub email: String,

    #[arg(long, env = "FOLIO_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Repeat of the password; defaults to `--password`.
    #[arg(long)]
    pub confirm: Option<String>,
}

#[derive(Debug, Args)]
pub struct ProfileArgs {
    #[arg(long)]
    pub username: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum PasswordCommand {
    /// Email a reset link.
    Reset {
        email: String,
    },

    /// Set a new password from a reset link.
    Confirm {
        uid: String,
        token: String,
        #[arg(long, env = "FOLIO_NEW_PASSWORD", hide_env_values = true)]
        new_password: String,
        #[arg(long)]
        confirm: Option<String>,
    },

    /// Change the signed-in user's password.
    Change {
        #[arg(long, env = "FOLIO_PASSWORD", hide_env_values = true)]
        old_password: String,
        #[arg(long, env = "FOLIO_NEW_PASSWORD", hide_env_values = true)]
        new_password: String,
        #[arg(long)]
        confirm: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List every user (for adding workspace members).
    List,

    /// Show one user.
    Show { id: Uuid },

    /// Create a user.
    Create {
        username: String,
        email: String,
        #[arg(long)]
        role: UserRole,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
        #[arg(long, default_value = "")]
        phone: String,
        /// Initial password; the server picks one when omitted.
        #[arg(long, env = "FOLIO_NEW_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Change a user's details, role or status.
    Update {
        id: Uuid,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        role: Option<UserRole>,
        #[arg(long)]
        status: Option<UserStatus>,
    },

    /// Delete a user.
    Delete { id: Uuid },

    /// Invite someone by email.
    Invite {
        email: String,
        #[arg(long)]
        role: UserRole,
    },
}

#[derive(Debug, Subcommand)]
pub enum WorkspaceCommand {
    /// List visible workspaces.
    List,

    /// Show one workspace.
    Show { id: Uuid },

    /// Create a workspace.
    Create { name: String },

    /// Rename a workspace.
    Rename { id: Uuid, name: String },

    /// Delete a workspace.
    Delete { id: Uuid },

    /// List members of a workspace.
    Members { id: Uuid },

    /// Add a user to a workspace.
    AddMember {
        workspace: Uuid,
        user: Uuid,
        #[arg(long, default_value_t = WorkspaceRole::Member)]
        role: WorkspaceRole,
    },

    /// Change a member's role.
    SetRole {
        workspace: Uuid,
        membership: Uuid,
        role: WorkspaceRole,
    },

    /// Remove a member from a workspace.
    RemoveMember { workspace: Uuid, membership: Uuid },
}

#[derive(Debug, Subcommand)]
pub enum ManuscriptCommand {
    /// List the manuscripts of a workspace.
    List { workspace: Uuid },

    /// Show one manuscript.
    Show { id: Uuid },

    /// Create a manuscript.
    Create {
        workspace: Uuid,
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<ManuscriptStatus>,
    },

    /// Change a manuscript's title, description or status.
    Update {
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<ManuscriptStatus>,
    },

    /// Delete a manuscript.
    Delete { id: Uuid },
}

#[derive(Debug, Subcommand)]
pub enum ChapterCommand {
    /// List chapters in reading order.
    List { manuscript: Uuid },

    /// Add a chapter.
    Create {
        manuscript: Uuid,
        title: String,
        /// Position in the manuscript, starting at 1.
        #[arg(long)]
        order: u32,
    },

    /// Rename or move a chapter.
    Update {
        manuscript: Uuid,
        chapter: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        order: Option<u32>,
    },

    /// Delete a chapter.
    Delete { manuscript: Uuid, chapter: Uuid },
}

#[derive(Debug, Subcommand)]
pub enum DocumentCommand {
    /// List the documents of a chapter.
    List { manuscript: Uuid, chapter: Uuid },

    /// Print the office editor configuration for a document.
    EditorConfig { document: Uuid },
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "folio",
            "workspaces",
            "list",
            "--json",
            "--base-url",
            "https://folio.example/api",
        ])
        .unwrap();

        assert!(cli.json);
        assert_eq!(
            cli.base_url.map(|u| u.to_string()).as_deref(),
            Some("https://folio.example/api")
        );
        assert!(matches!(cli.command, Command::Workspaces(WorkspaceCommand::List)));
    }

    #[test]
    fn test_role_parses_case_insensitively() {
        let id = Uuid::nil().to_string();
        let cli = Cli::try_parse_from(["folio", "ws", "set-role", &id, &id, "editor"]).unwrap();
        match cli.command {
            Command::Workspaces(WorkspaceCommand::SetRole { role, .. }) => {
                assert_eq!(role, WorkspaceRole::Editor);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_user_update_flags() {
        let id = Uuid::nil().to_string();
        let cli = Cli::try_parse_from([
            "folio", "users", "update", &id, "--status", "Suspended", "--role", "admin",
        ])
        .unwrap();
        match cli.command {
            Command::Users(UserCommand::Update { status, role, email, .. }) => {
                assert_eq!(status, Some(UserStatus::Suspended));
                assert_eq!(role, Some(UserRole::Admin));
                assert_eq!(email, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_invite_requires_role() {
        assert!(Cli::try_parse_from(["folio", "users", "invite", "bob@example.com"]).is_err());
        let cli = Cli::try_parse_from([
            "folio", "users", "invite", "bob@example.com", "--role", "cashier",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Users(UserCommand::Invite { role: UserRole::Cashier, .. })
        ));
    }

    #[test]
    fn test_google_login_takes_optional_id_token() {
        let cli = Cli::try_parse_from(["folio", "google-login", "ya29.token"]).unwrap();
        match cli.command {
            Command::GoogleLogin { access_token, id_token } => {
                assert_eq!(access_token, "ya29.token");
                assert_eq!(id_token, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_verbose_counts() {
        let cli = Cli::try_parse_from(["folio", "-vv", "whoami"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
