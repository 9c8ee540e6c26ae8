//! Workspace and widget data model.

mod layout;
mod payload;

pub use layout::{Breakpoint, GridKind, LayoutItem, Layouts, max_bottom};
pub(crate) use layout::rects_overlap;
pub use payload::{
    ArticleData, ChecklistData, ChecklistItem, Dependency, DependencyKey, FolderData, ImageData,
    LineData, LineDataPoint, LineSeries, PieData, PlanData, PlanUnit, PointEditError, PointLabel,
    TableCell, TableColumn, TableData, TableRow, TextData, TitleData,
};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Widget identifier, unique within a workspace.
pub type WidgetId = String;

/// Workspace identifier.
pub type WorkspaceId = String;

/// The ten widget type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    Plan,
    Pie,
    Line,
    Text,
    Title,
    Checklist,
    Image,
    Article,
    Folder,
    Table,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 10] = [
        WidgetKind::Plan,
        WidgetKind::Pie,
        WidgetKind::Line,
        WidgetKind::Text,
        WidgetKind::Title,
        WidgetKind::Checklist,
        WidgetKind::Image,
        WidgetKind::Article,
        WidgetKind::Folder,
        WidgetKind::Table,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WidgetKind::Plan => "plan",
            WidgetKind::Pie => "pie",
            WidgetKind::Line => "line",
            WidgetKind::Text => "text",
            WidgetKind::Title => "title",
            WidgetKind::Checklist => "checklist",
            WidgetKind::Image => "image",
            WidgetKind::Article => "article",
            WidgetKind::Folder => "folder",
            WidgetKind::Table => "table",
        }
    }

    /// Chart widgets get a random gradient on creation.
    pub fn uses_gradient(self) -> bool {
        matches!(self, WidgetKind::Plan | WidgetKind::Pie | WidgetKind::Line)
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WidgetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WidgetKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown widget type: {s}"))
    }
}

/// Widget payload, tagged by widget type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum WidgetData {
    Plan(PlanData),
    Pie(PieData),
    Line(LineData),
    Text(TextData),
    Title(TitleData),
    Checklist(ChecklistData),
    Image(ImageData),
    Article(ArticleData),
    Folder(FolderData),
    Table(TableData),
}

impl WidgetData {
    pub fn kind(&self) -> WidgetKind {
        match self {
            WidgetData::Plan(_) => WidgetKind::Plan,
            WidgetData::Pie(_) => WidgetKind::Pie,
            WidgetData::Line(_) => WidgetKind::Line,
            WidgetData::Text(_) => WidgetKind::Text,
            WidgetData::Title(_) => WidgetKind::Title,
            WidgetData::Checklist(_) => WidgetKind::Checklist,
            WidgetData::Image(_) => WidgetKind::Image,
            WidgetData::Article(_) => WidgetKind::Article,
            WidgetData::Folder(_) => WidgetKind::Folder,
            WidgetData::Table(_) => WidgetKind::Table,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            WidgetData::Plan(d) => &d.title,
            WidgetData::Pie(d) => &d.title,
            WidgetData::Line(d) => &d.title,
            WidgetData::Text(d) | WidgetData::Article(d) => &d.title,
            WidgetData::Title(d) => &d.title,
            WidgetData::Checklist(d) => &d.title,
            WidgetData::Image(d) => &d.title,
            WidgetData::Folder(d) => &d.title,
            WidgetData::Table(d) => &d.title,
        }
    }
}

/// A dashboard widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub id: WidgetId,
    #[serde(flatten)]
    pub data: WidgetData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_w: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_h: Option<u32>,
    /// Folder this widget lives in, if nested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<WidgetId>,
}

impl Widget {
    pub fn kind(&self) -> WidgetKind {
        self.data.kind()
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.data, WidgetData::Folder(_))
    }

    pub fn folder(&self) -> Option<&FolderData> {
        match &self.data {
            WidgetData::Folder(folder) => Some(folder),
            _ => None,
        }
    }

    pub fn folder_mut(&mut self) -> Option<&mut FolderData> {
        match &mut self.data {
            WidgetData::Folder(folder) => Some(folder),
            _ => None,
        }
    }
}

/// Role a member can be granted. The owner is implicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Editor,
    Visitor,
}

impl MemberRole {
    pub fn as_str(self) -> &'static str {
        match self {
            MemberRole::Editor => "editor",
            MemberRole::Visitor => "visitor",
        }
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "editor" => Ok(MemberRole::Editor),
            "visitor" => Ok(MemberRole::Visitor),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Effective role of an identity on a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Owner,
    Editor,
    Visitor,
}

impl Role {
    /// Owners and editors may mutate workspace content.
    pub fn can_edit(self) -> bool {
        matches!(self, Role::Owner | Role::Editor)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Owner => "owner",
            Role::Editor => "editor",
            Role::Visitor => "visitor",
        })
    }
}

impl From<MemberRole> for Role {
    fn from(role: MemberRole) -> Self {
        match role {
            MemberRole::Editor => Role::Editor,
            MemberRole::Visitor => Role::Visitor,
        }
    }
}

/// A dashboard: widgets plus their per-breakpoint layouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: String,
    /// Normalized email of the owner.
    pub owner: String,
    #[serde(default)]
    pub members: BTreeMap<String, MemberRole>,
    #[serde(default)]
    pub widgets: Vec<Widget>,
    #[serde(default)]
    pub layouts: Layouts,
}

impl Workspace {
    /// Create an empty workspace owned by `owner`.
    pub fn new(name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            owner: owner.into(),
            members: BTreeMap::new(),
            widgets: Vec::new(),
            layouts: Layouts::new(),
        }
    }

    pub fn role_of(&self, email: &str) -> Option<Role> {
        if self.owner == email {
            return Some(Role::Owner);
        }
        self.members.get(email).copied().map(Role::from)
    }

    /// Whether `email` can see this workspace at all.
    pub fn is_visible_to(&self, email: &str) -> bool {
        self.role_of(email).is_some()
    }

    pub fn widget(&self, id: &str) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id == id)
    }

    pub fn widget_mut(&mut self, id: &str) -> Option<&mut Widget> {
        self.widgets.iter_mut().find(|w| w.id == id)
    }

    /// Direct children of a folder.
    pub fn children_of<'a>(&'a self, folder_id: &'a str) -> impl Iterator<Item = &'a Widget> + 'a {
        self.widgets
            .iter()
            .filter(move |w| w.parent_id.as_deref() == Some(folder_id))
    }

    /// Widgets placed on the dashboard itself.
    pub fn top_level(&self) -> impl Iterator<Item = &Widget> {
        self.widgets.iter().filter(|w| w.parent_id.is_none())
    }

    /// Top-level layout of one breakpoint.
    pub fn layout(&self, breakpoint: Breakpoint) -> &[LayoutItem] {
        self.layouts.get(&breakpoint).map(Vec::as_slice).unwrap_or(&[])
    }
}
