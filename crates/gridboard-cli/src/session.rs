//! A user's session over the stored dashboards.

use anyhow::{Context, Result};
use gridboard_core::storage::{load_active_workspace, save_active_workspace};
use gridboard_core::{
    AutoSaveManager, Directory, Storage, UserDirectory, UserRecord, WorkspaceStore, normalize_email,
};
use std::fmt::Write;
use std::sync::Arc;

use crate::cli::Command;
use crate::render::render_workspace;

pub struct Session<S: Storage> {
    store: WorkspaceStore,
    autosave: AutoSaveManager<S>,
    directory: UserDirectory,
}

impl<S: Storage> Session<S> {
    /// Load the stored dashboards as seen by `user`.
    pub fn open(storage: Arc<S>, user: &str) -> Result<Self> {
        let user = normalize_email(user);
        let mut autosave = AutoSaveManager::new(storage);
        let workspaces = autosave.load().context("Failed to load workspaces")?;
        let active = load_active_workspace(autosave.storage().as_ref(), &user)?;
        let directory = UserDirectory::load(autosave.storage().as_ref()).context("Failed to load users")?;

        let store = WorkspaceStore::from_workspaces(&user, workspaces, active);
        autosave.track(store.revision());
        Ok(Self { store, autosave, directory })
    }

    pub fn store(&self) -> &WorkspaceStore {
        &self.store
    }

    /// Run one command and return what to print.
    pub fn execute(&mut self, command: Command) -> Result<String> {
        let output = match command {
            Command::Workspaces => self.list_workspaces(),
            Command::NewWorkspace { name } => self.store.create_workspace(name.as_deref()),
            Command::Select { id } => {
                self.store.select_workspace(&id)?;
                format!("Switched to {}", self.active_name())
            }
            Command::Rename { id, name } => {
                self.store.rename_workspace(&id, &name)?;
                format!("Renamed to {name}")
            }
            Command::DeleteWorkspace { id } => {
                self.store.remove_workspace(&id)?;
                format!("Deleted {id}")
            }
            Command::Add { kind, parent } => self.store.add_widget(kind, parent.as_deref())?,
            Command::Remove { widget } => {
                self.store.remove_widget(&widget)?;
                format!("Removed {widget}")
            }
            Command::Toggle { folder } => {
                self.store.toggle_folder(&folder)?;
                folder
            }
            Command::Register { email, name } => {
                let record = UserRecord { id: format!("user_{}", self.directory.len() + 1), name };
                let email = self.directory.insert(&email, record);
                self.directory
                    .save(self.autosave.storage().as_ref())
                    .context("Failed to save users")?;
                format!("Registered {email}")
            }
            Command::Invite { email, role } => {
                let email = self.store.invite(&email, role, &self.directory)?;
                format!("Invited {} <{}> as {}", self.directory.display_name(&email), email, role)
            }
            Command::SetRole { email, role } => {
                self.store.change_member_role(&email, role)?;
                format!("{} is now {}", normalize_email(&email), role)
            }
            Command::RemoveMember { email } => {
                self.store.remove_member(&email)?;
                format!("Removed {} from {}", normalize_email(&email), self.active_name())
            }
            Command::Show { breakpoint } => match self.store.active() {
                Some(workspace) => {
                    let widgets = self.store.resolved_widgets();
                    render_workspace(workspace, &widgets, breakpoint)
                }
                None => "No workspace yet; create one with `new-workspace`".to_string(),
            },
        };
        self.autosave.track(self.store.revision());
        Ok(output)
    }

    /// Write pending changes and remember the active workspace.
    ///
    /// A session lives for one command, so pending changes are flushed here
    /// instead of waiting for the debounce delay.
    pub fn close(mut self) -> Result<()> {
        if self.autosave.is_dirty() {
            self.autosave
                .flush(self.store.workspaces())
                .context("Failed to save workspaces")?;
        }
        save_active_workspace(self.autosave.storage().as_ref(), self.store.identity(), self.store.active_id())
            .context("Failed to save the active workspace")?;
        Ok(())
    }

    fn active_name(&self) -> String {
        self.store.active().map(|ws| ws.name.clone()).unwrap_or_default()
    }

    fn list_workspaces(&self) -> String {
        let mut out = String::new();
        for ws in self.store.visible() {
            let marker = if Some(ws.id.as_str()) == self.store.active_id() { "*" } else { " " };
            let role = ws.role_of(self.store.identity()).map(|r| r.to_string()).unwrap_or_default();
            let _ = writeln!(out, "{} {}  {} ({}, {} widgets)", marker, ws.id, ws.name, role, ws.widgets.len());
        }
        out.trim_end().to_string()
    }
}
