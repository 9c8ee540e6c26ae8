//! Command-line arguments.

use clap::{Parser, Subcommand};
use gridboard_core::{Breakpoint, MemberRole, WidgetKind};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gridboard")]
#[command(about = "Build grid dashboards of charts, notes and folders")]
pub struct Cli {
    /// Email of the user acting on the dashboards
    #[arg(long)]
    pub user: String,

    /// Storage directory (overrides the config file)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Config file to use instead of the default one
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List the workspaces you can see
    Workspaces,
    /// Create a workspace and switch to it
    NewWorkspace { name: Option<String> },
    /// Switch the active workspace
    Select { id: String },
    /// Rename a workspace
    Rename { id: String, name: String },
    /// Delete a workspace you own
    DeleteWorkspace { id: String },
    /// Add a widget (plan, pie, line, text, title, checklist, image, article, folder, table)
    Add {
        kind: WidgetKind,
        /// Folder to put the widget in
        #[arg(long)]
        parent: Option<String>,
    },
    /// Remove a widget; folders take their content along
    Remove { widget: String },
    /// Collapse or expand a folder
    Toggle { folder: String },
    /// Make a user known so they can be invited
    Register { email: String, name: String },
    /// Share the active workspace
    Invite {
        email: String,
        #[arg(long, default_value = "visitor")]
        role: MemberRole,
    },
    /// Change the role of a member of the active workspace
    SetRole { email: String, role: MemberRole },
    /// Revoke a member's access to the active workspace
    RemoveMember { email: String },
    /// Print the active workspace at one breakpoint
    Show {
        #[arg(long, default_value = "lg")]
        breakpoint: Breakpoint,
    },
}
