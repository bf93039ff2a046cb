//! Command-line arguments

use clap::{Args, Parser, Subcommand, ValueEnum};
use kithab_catalog::{Selection, SelectionEvent};
use kithab_client::{DownloadPolicy, NoteSource};
use kithab_core::Role;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "kithab-cli", version)]
#[command(about = "Find, upload and manage course notes on a Kithab portal")]
#[command(
    after_help = "Environment:\n  KITHAB_BACKEND_URL      Backend API root\n  KITHAB_ADMIN_ID         Login id that signs in as admin\n  KITHAB_SESSION_PATH     Where the login session is kept\n  KITHAB_DOWNLOAD_POLICY  all-or-nothing or per-item"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags accepted by every command
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Configuration file (defaults to ./kithab.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Backend API root, overriding configuration and environment
    #[arg(long, global = true, value_name = "URL")]
    pub backend: Option<String>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in; the id decides whether as admin, faculty or student
    Login {
        /// Roll number, employee id or admin id
        id: String,
        /// Password (read from stdin when omitted)
        #[arg(long, env = "KITHAB_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Create a student account
    Register(RegisterArgs),
    /// Email a password reset link
    ForgotPassword {
        email: String,
    },
    /// Set a new password with the token from the reset link
    ResetPassword {
        token: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm: Option<String>,
    },
    /// Browse regulations, branches and subjects
    Meta {
        #[command(subcommand)]
        command: MetaCommand,
    },
    /// Search, download and upload notes
    Notes {
        #[command(subcommand)]
        command: NotesCommand,
    },
    /// Administer the taxonomy and user accounts
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
}

#[derive(Debug, Clone, Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub roll_number: String,
    /// One of CSE, ECE, EEE, MECH, CIVIL
    #[arg(long)]
    pub branch: String,
    #[arg(long)]
    pub password: String,
    /// Repeat the password (defaults to --password)
    #[arg(long)]
    pub confirm: Option<String>,
}

// ============================================================================
// Selection
// ============================================================================

/// Regulation, branch, semester and subject flags
#[derive(Debug, Clone, Default, Args)]
pub struct SelectionArgs {
    #[arg(long, value_name = "ID")]
    pub regulation: Option<String>,
    #[arg(long, value_name = "ID")]
    pub branch: Option<String>,
    #[arg(long, value_name = "N")]
    pub semester: Option<String>,
    #[arg(long, value_name = "ID")]
    pub subject: Option<String>,
}

impl SelectionArgs {
    /// Feed the flags through the selection reducer in cascade order
    pub fn to_selection(&self) -> Selection {
        let mut selection = Selection::new();
        if let Some(regulation) = &self.regulation {
            selection.dispatch(SelectionEvent::regulation(regulation));
        }
        if let Some(branch) = &self.branch {
            selection.dispatch(SelectionEvent::branch(branch));
        }
        if let Some(semester) = &self.semester {
            selection.dispatch(SelectionEvent::semester(semester));
        }
        if let Some(subject) = &self.subject {
            selection.dispatch(SelectionEvent::subject(subject));
        }
        selection
    }
}

/// Which note endpoints to read
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct SourceArgs {
    /// Use the admin note endpoints
    #[arg(long)]
    pub admin: bool,
}

impl SourceArgs {
    pub fn source(&self) -> NoteSource {
        if self.admin {
            NoteSource::Admin
        } else {
            NoteSource::Subject
        }
    }
}

// ============================================================================
// Metadata
// ============================================================================

#[derive(Debug, Subcommand)]
pub enum MetaCommand {
    /// List regulations
    Regulations,
    /// List branches, optionally of one regulation
    Branches {
        #[arg(long, value_name = "ID")]
        regulation: Option<String>,
    },
    /// List subjects, optionally narrowed by regulation, branch and semester
    Subjects(SelectionArgs),
    /// Show the choices the cascade offers for a partial selection
    Options(SelectionArgs),
}

// ============================================================================
// Notes
// ============================================================================

#[derive(Debug, Subcommand)]
pub enum NotesCommand {
    /// List the notes filed under a subject
    Search {
        #[command(flatten)]
        selection: SelectionArgs,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Download one note of a subject
    Download {
        #[command(flatten)]
        selection: SelectionArgs,
        #[command(flatten)]
        source: SourceArgs,
        /// Note to download
        #[arg(long, value_name = "ID")]
        note: String,
        /// Directory to write into
        #[arg(long, value_name = "DIR", default_value = ".")]
        dir: PathBuf,
    },
    /// Download every note of a subject into one zip archive
    DownloadAll {
        #[command(flatten)]
        selection: SelectionArgs,
        #[command(flatten)]
        source: SourceArgs,
        /// Archive path (defaults to the configured archive name)
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
        /// What to do when one note fails
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,
    },
    /// Upload files under a subject (faculty)
    Upload {
        #[command(flatten)]
        selection: SelectionArgs,
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List your own uploads (faculty)
    Mine,
    /// Delete a note (admin)
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Mark or unmark a note as a favourite
    Favorite {
        id: String,
        #[arg(long)]
        remove: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    AllOrNothing,
    PerItem,
}

impl From<PolicyArg> for DownloadPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::AllOrNothing => DownloadPolicy::AllOrNothing,
            PolicyArg::PerItem => DownloadPolicy::PerItem,
        }
    }
}

// ============================================================================
// Admin
// ============================================================================

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Manage regulations
    Regulation {
        #[command(subcommand)]
        command: RegulationCommand,
    },
    /// Manage branches
    Branch {
        #[command(subcommand)]
        command: BranchCommand,
    },
    /// Manage subjects
    Subject {
        #[command(subcommand)]
        command: SubjectCommand,
    },
    /// Manage student and faculty accounts
    Users {
        #[command(subcommand)]
        command: UsersCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum RegulationCommand {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        semesters: String,
    },
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        semesters: Option<String>,
    },
    Delete {
        id: String,
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum BranchCommand {
    Add {
        #[arg(long, value_name = "ID")]
        regulation: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        code: String,
    },
    Edit {
        id: String,
        #[arg(long, value_name = "ID")]
        regulation: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        code: Option<String>,
    },
    Delete {
        id: String,
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum SubjectCommand {
    Add {
        #[arg(long, value_name = "ID")]
        regulation: String,
        #[arg(long, value_name = "ID")]
        branch: String,
        #[arg(long, value_name = "N")]
        semester: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        code: String,
    },
    Edit {
        id: String,
        #[arg(long, value_name = "ID")]
        regulation: Option<String>,
        #[arg(long, value_name = "ID")]
        branch: Option<String>,
        #[arg(long, value_name = "N")]
        semester: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        code: Option<String>,
    },
    Delete {
        id: String,
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    Student,
    Faculty,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Student => Role::Student,
            RoleArg::Faculty => Role::Faculty,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List accounts of one role
    List {
        #[arg(long, value_enum, default_value_t = RoleArg::Student)]
        role: RoleArg,
    },
    /// Change fields of an account: `--set key=value`
    Edit {
        id: String,
        #[arg(long, value_enum)]
        role: RoleArg,
        #[arg(long = "set", value_name = "KEY=VALUE", required = true)]
        fields: Vec<String>,
    },
    Delete {
        id: String,
        #[arg(long, short)]
        yes: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_selection_flags_follow_cascade() {
        let args = SelectionArgs {
            regulation: Some("r1".to_string()),
            branch: Some("b1".to_string()),
            semester: Some("3".to_string()),
            subject: Some("s1".to_string()),
        };
        let selection = args.to_selection();
        assert!(selection.is_complete());
        assert_eq!(selection.semester, Some(3));

        let partial = SelectionArgs {
            subject: None,
            ..args
        };
        assert!(!partial.to_selection().is_complete());
    }

    #[test]
    fn test_parse_download_all() {
        let cli = Cli::try_parse_from([
            "kithab-cli",
            "notes",
            "download-all",
            "--regulation",
            "r1",
            "--policy",
            "per-item",
            "--admin",
        ])
        .unwrap();
        match cli.command {
            Command::Notes {
                command:
                    NotesCommand::DownloadAll {
                        selection,
                        source,
                        policy,
                        ..
                    },
            } => {
                assert_eq!(selection.regulation.as_deref(), Some("r1"));
                assert_eq!(source.source(), NoteSource::Admin);
                assert_eq!(policy.map(DownloadPolicy::from), Some(DownloadPolicy::PerItem));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
