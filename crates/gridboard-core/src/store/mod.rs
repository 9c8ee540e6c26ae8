//! The workspace store: the session's view of all workspaces, with undo
//! history and a role gate in front of every mutation.
//!
//! Every mutation works on a copy of the affected workspace and only
//! replaces the stored one once it succeeded, so a rejected call leaves the
//! collection and the history exactly as they were.

mod history;
mod sharing;

pub use history::{History, MAX_HISTORY_LENGTH};
pub use sharing::{ShareError, change_member_role, invite, remove_member};

use std::collections::HashSet;

use thiserror::Error;

use crate::dependency;
use crate::directory::{Directory, normalize_email};
use crate::model::{
    GridKind, LayoutItem, Layouts, MemberRole, PointEditError, Role, Widget, WidgetData, WidgetId,
    WidgetKind, Workspace, WorkspaceId,
};
use crate::placement;
use crate::registry;
use crate::synchronizer;

/// Error type for store operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("{identity} is not allowed to {action}")]
    Forbidden { identity: String, action: &'static str },
    #[error("Workspace not found: {0}")]
    WorkspaceNotFound(String),
    #[error("No active workspace")]
    NoActiveWorkspace,
    #[error("Widget not found: {0}")]
    WidgetNotFound(String),
    #[error("Parent folder not found: {0}")]
    ParentNotFound(String),
    #[error("Widget {id} is a {found}, expected a {expected}")]
    KindMismatch { id: String, expected: WidgetKind, found: WidgetKind },
    #[error(transparent)]
    PointEdit(#[from] PointEditError),
    #[error(transparent)]
    Share(#[from] ShareError),
    #[error("Nothing to undo")]
    NothingToUndo,
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    /// Owner or editor.
    Edit,
    /// Owner only.
    Own,
}

/// In-memory collection of workspaces as seen by one identity.
#[derive(Debug, Clone)]
pub struct WorkspaceStore {
    workspaces: Vec<Workspace>,
    active: Option<WorkspaceId>,
    history: History,
    /// Bumped on every committed change; drives autosave.
    revision: u64,
    identity: String,
}

impl WorkspaceStore {
    /// Empty store acting as `identity`.
    pub fn new(identity: &str) -> Self {
        Self::from_workspaces(identity, Vec::new(), None)
    }

    /// Store over a loaded collection. `active` is kept when `identity` can
    /// see it, otherwise the first visible workspace becomes active.
    pub fn from_workspaces(identity: &str, workspaces: Vec<Workspace>, active: Option<WorkspaceId>) -> Self {
        let mut store = Self {
            workspaces,
            active,
            history: History::new(),
            revision: 0,
            identity: normalize_email(identity),
        };
        store.ensure_active();
        store
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Act as another identity from now on. History is kept.
    pub fn set_identity(&mut self, identity: &str) {
        self.identity = normalize_email(identity);
        self.ensure_active();
    }

    /// The whole collection, including workspaces this identity cannot see.
    pub fn workspaces(&self) -> &[Workspace] {
        &self.workspaces
    }

    /// Workspaces the identity owns or is a member of, in stored order.
    pub fn visible(&self) -> impl Iterator<Item = &Workspace> {
        self.workspaces.iter().filter(|ws| ws.is_visible_to(&self.identity))
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active(&self) -> Option<&Workspace> {
        let id = self.active.as_deref()?;
        self.workspaces.iter().find(|ws| ws.id == id)
    }

    /// Role of the identity on the active workspace.
    pub fn role(&self) -> Option<Role> {
        self.active()?.role_of(&self.identity)
    }

    /// Keep the active workspace if it is visible, otherwise fall back to
    /// the first visible one.
    pub fn ensure_active(&mut self) -> Option<&str> {
        let current_visible = self
            .active()
            .is_some_and(|ws| ws.is_visible_to(&self.identity));
        if !current_visible {
            let first = self.visible().next().map(|ws| ws.id.clone());
            self.active = first;
        }
        self.active.as_deref()
    }

    pub fn select_workspace(&mut self, id: &str) -> StoreResult<()> {
        if !self.visible().any(|ws| ws.id == id) {
            return Err(StoreError::WorkspaceNotFound(id.to_string()));
        }
        self.active = Some(id.to_string());
        Ok(())
    }

    /// Create an empty workspace owned by the identity and make it active.
    pub fn create_workspace(&mut self, name: Option<&str>) -> WorkspaceId {
        let name = match name {
            Some(name) => name.to_string(),
            None => format!("New workspace {}", self.visible().count() + 1),
        };
        let workspace = Workspace::new(name, self.identity.clone());
        let id = workspace.id.clone();
        self.checkpoint_unchecked();
        self.workspaces.push(workspace);
        self.active = Some(id.clone());
        self.revision += 1;
        log::debug!("Created workspace {}", id);
        id
    }

    pub fn rename_workspace(&mut self, id: &str, name: &str) -> StoreResult<()> {
        let index = self.index_of(id)?;
        self.edit(index, Access::Edit, "rename this workspace", true, |ws| {
            ws.name = name.to_string();
            Ok(())
        })
    }

    /// Delete a workspace. Only its owner may do this.
    pub fn remove_workspace(&mut self, id: &str) -> StoreResult<()> {
        let index = self.index_of(id)?;
        self.authorize(&self.workspaces[index], Access::Own, "delete this workspace")?;
        self.checkpoint_unchecked();
        self.workspaces.remove(index);
        self.revision += 1;
        if self.active.as_deref() == Some(id) {
            self.active = None;
        }
        self.ensure_active();
        Ok(())
    }

    /// Apply `mutator` to the active workspace only.
    ///
    /// Editors may change anything but the owner and the member list; a
    /// mutator that touches those as a non-owner is rejected as a whole.
    pub fn update_active<F>(&mut self, mutator: F) -> StoreResult<()>
    where
        F: FnOnce(&mut Workspace),
    {
        let index = self.active_index()?;
        let is_owner = self.workspaces[index].role_of(&self.identity) == Some(Role::Owner);
        let identity = self.identity.clone();
        self.edit(index, Access::Edit, "edit this workspace", true, |ws| {
            let (owner, members) = (ws.owner.clone(), ws.members.clone());
            mutator(ws);
            if !is_owner && (ws.owner != owner || ws.members != members) {
                log::debug!("Rejected: {} may not change membership of {}", identity, ws.id);
                return Err(StoreError::Forbidden { identity, action: "change membership" });
            }
            Ok(())
        })
    }

    /// Add a widget of `kind` with registry defaults, placed in every
    /// breakpoint of the dashboard or of the folder `parent`.
    pub fn add_widget(&mut self, kind: WidgetKind, parent: Option<&str>) -> StoreResult<WidgetId> {
        let index = self.active_index()?;
        self.edit(index, Access::Edit, "add widgets", true, |ws| {
            let widget = registry::create_widget(kind, parent.map(str::to_string));
            let id = widget.id.clone();
            let defaults = registry::defaults(kind);

            match parent {
                Some(parent_id) => {
                    let folder = ws
                        .widget_mut(parent_id)
                        .and_then(Widget::folder_mut)
                        .ok_or_else(|| StoreError::ParentNotFound(parent_id.to_string()))?;
                    let mut nested = folder.children_layouts.take().unwrap_or_default();
                    placement::place_everywhere(&mut nested, &id, defaults.nested(), GridKind::Nested);
                    ws.widgets.push(widget);
                    synchronizer::apply_children_layout_change(ws, parent_id, nested);
                }
                None => {
                    placement::place_everywhere(&mut ws.layouts, &id, defaults, GridKind::TopLevel);
                    ws.widgets.push(widget);
                }
            }
            Ok(id)
        })
    }

    /// Remove a widget. A folder takes every widget nested in it along.
    pub fn remove_widget(&mut self, id: &str) -> StoreResult<()> {
        let index = self.active_index()?;
        self.edit(index, Access::Edit, "remove widgets", true, |ws| {
            let parent_id = ws
                .widget(id)
                .ok_or_else(|| StoreError::WidgetNotFound(id.to_string()))?
                .parent_id
                .clone();

            let doomed = subtree(ws, id);
            for layout in ws.layouts.values_mut() {
                layout.retain(|item| !doomed.contains(&item.i));
            }
            if let Some(parent) = parent_id {
                let nested = ws
                    .widget_mut(&parent)
                    .and_then(Widget::folder_mut)
                    .and_then(|folder| folder.children_layouts.as_mut());
                for layout in nested.into_iter().flat_map(|layouts| layouts.values_mut()) {
                    layout.retain(|item| item.i != id);
                }
            }
            ws.widgets.retain(|w| !doomed.contains(&w.id));
            log::debug!("Removed {} widget(s)", doomed.len());
            Ok(())
        })
    }

    /// Replace a widget's payload. The widget type cannot change.
    pub fn update_widget_data(&mut self, id: &str, data: WidgetData) -> StoreResult<()> {
        let index = self.active_index()?;
        self.edit(index, Access::Edit, "edit widgets", false, |ws| {
            let widget = ws
                .widget_mut(id)
                .ok_or_else(|| StoreError::WidgetNotFound(id.to_string()))?;
            if widget.kind() != data.kind() {
                return Err(StoreError::KindMismatch {
                    id: id.to_string(),
                    expected: widget.kind(),
                    found: data.kind(),
                });
            }
            widget.data = data;
            Ok(())
        })
    }

    /// Set the value of a chart point that has no dependency attached.
    pub fn set_point_value(&mut self, widget_id: &str, series: &str, point_id: &str, y: f64) -> StoreResult<()> {
        let index = self.active_index()?;
        self.edit(index, Access::Edit, "edit widgets", false, |ws| {
            line_mut(ws, widget_id)?.set_point_value(series, point_id, y)?;
            Ok(())
        })
    }

    /// Link a chart point to a numeric field of another widget, or unlink it.
    pub fn set_point_dependency(
        &mut self,
        widget_id: &str,
        series: &str,
        point_id: &str,
        dependency: Option<crate::model::Dependency>,
    ) -> StoreResult<()> {
        let index = self.active_index()?;
        self.edit(index, Access::Edit, "edit widgets", false, |ws| {
            line_mut(ws, widget_id)?.set_point_dependency(series, point_id, dependency)?;
            Ok(())
        })
    }

    /// Fold a grid layout report into the active workspace.
    pub fn layout_change(&mut self, active: &[LayoutItem], all: Layouts) -> StoreResult<()> {
        let index = self.active_index()?;
        self.edit(index, Access::Edit, "move widgets", false, |ws| {
            synchronizer::apply_layout_change(ws, active, all);
            Ok(())
        })
    }

    /// Fold a nested grid layout report of `folder_id` into the active
    /// workspace and refit the folder.
    pub fn children_layout_change(&mut self, folder_id: &str, nested: Layouts) -> StoreResult<()> {
        let index = self.active_index()?;
        self.edit(index, Access::Edit, "move widgets", false, |ws| {
            if synchronizer::apply_children_layout_change(ws, folder_id, nested) {
                Ok(())
            } else {
                Err(StoreError::WidgetNotFound(folder_id.to_string()))
            }
        })
    }

    pub fn toggle_folder(&mut self, folder_id: &str) -> StoreResult<()> {
        let index = self.active_index()?;
        self.edit(index, Access::Edit, "toggle folders", true, |ws| {
            if synchronizer::toggle_folder(ws, folder_id) {
                Ok(())
            } else {
                Err(StoreError::WidgetNotFound(folder_id.to_string()))
            }
        })
    }

    /// Record the current state in the history, as at the end of a drag or
    /// resize.
    pub fn checkpoint(&mut self) -> StoreResult<()> {
        let index = self.active_index()?;
        self.authorize(&self.workspaces[index], Access::Edit, "move widgets")?;
        self.checkpoint_unchecked();
        Ok(())
    }

    /// Restore the collection as it was before the last recorded action.
    pub fn undo(&mut self) -> StoreResult<()> {
        let snapshot = self.history.pop().ok_or(StoreError::NothingToUndo)?;
        self.workspaces = snapshot;
        self.revision += 1;
        self.ensure_active();
        Ok(())
    }

    /// Widgets of the active workspace with dependent chart points
    /// refreshed from their sources.
    pub fn resolved_widgets(&self) -> Vec<Widget> {
        self.active()
            .map(|ws| dependency::resolve(&ws.widgets))
            .unwrap_or_default()
    }

    /// Share the active workspace with a known user. Owner only.
    pub fn invite<D: Directory + ?Sized>(&mut self, email: &str, role: MemberRole, directory: &D) -> StoreResult<String> {
        let index = self.active_index()?;
        let inviter = self.identity.clone();
        self.edit(index, Access::Own, "manage members", true, |ws| {
            Ok(sharing::invite(ws, &inviter, email, role, directory)?)
        })
    }

    pub fn change_member_role(&mut self, email: &str, role: MemberRole) -> StoreResult<()> {
        let index = self.active_index()?;
        self.edit(index, Access::Own, "manage members", true, |ws| {
            Ok(sharing::change_member_role(ws, email, role)?)
        })
    }

    pub fn remove_member(&mut self, email: &str) -> StoreResult<()> {
        let index = self.active_index()?;
        self.edit(index, Access::Own, "manage members", true, |ws| {
            Ok(sharing::remove_member(ws, email)?)
        })
    }

    /// Counter of committed changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    fn index_of(&self, id: &str) -> StoreResult<usize> {
        self.workspaces
            .iter()
            .position(|ws| ws.id == id && ws.is_visible_to(&self.identity))
            .ok_or_else(|| StoreError::WorkspaceNotFound(id.to_string()))
    }

    fn active_index(&self) -> StoreResult<usize> {
        let id = self.active.as_deref().ok_or(StoreError::NoActiveWorkspace)?;
        self.index_of(id)
    }

    fn authorize(&self, workspace: &Workspace, access: Access, action: &'static str) -> StoreResult<()> {
        let allowed = match (workspace.role_of(&self.identity), access) {
            (Some(role), Access::Edit) => role.can_edit(),
            (Some(role), Access::Own) => role == Role::Owner,
            (None, _) => false,
        };
        if allowed {
            Ok(())
        } else {
            log::debug!("Rejected: {} may not {} in {}", self.identity, action, workspace.id);
            Err(StoreError::Forbidden { identity: self.identity.clone(), action })
        }
    }

    fn checkpoint_unchecked(&mut self) {
        self.history.push(self.workspaces.clone());
    }

    /// Run `f` on a copy of workspace `index` and commit the copy if it
    /// succeeds. `record` pushes the prior state onto the history.
    fn edit<T, F>(&mut self, index: usize, access: Access, action: &'static str, record: bool, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Workspace) -> StoreResult<T>,
    {
        self.authorize(&self.workspaces[index], access, action)?;
        let mut draft = self.workspaces[index].clone();
        let value = f(&mut draft)?;
        if record {
            self.checkpoint_unchecked();
        }
        self.workspaces[index] = draft;
        self.revision += 1;
        Ok(value)
    }
}

/// `id` and every widget nested below it, at any depth.
fn subtree(workspace: &Workspace, id: &str) -> HashSet<WidgetId> {
    let mut doomed = HashSet::from([id.to_string()]);
    let mut frontier = vec![id.to_string()];
    while let Some(parent) = frontier.pop() {
        for child in workspace.children_of(&parent) {
            if doomed.insert(child.id.clone()) {
                frontier.push(child.id.clone());
            }
        }
    }
    doomed
}

fn line_mut<'a>(workspace: &'a mut Workspace, id: &str) -> StoreResult<&'a mut crate::model::LineData> {
    let widget = workspace
        .widget_mut(id)
        .ok_or_else(|| StoreError::WidgetNotFound(id.to_string()))?;
    let found = widget.kind();
    match &mut widget.data {
        WidgetData::Line(line) => Ok(line),
        _ => Err(StoreError::KindMismatch { id: id.to_string(), expected: WidgetKind::Line, found }),
    }
}
