//! Gridboard Core Library
//!
//! Data model, grid layout engine and persistence for Gridboard dashboards:
//! workspaces of widgets laid out on responsive grids, with folders that
//! nest their own grid.

pub mod config;
pub mod dependency;
pub mod directory;
pub mod model;
pub mod palette;
pub mod placement;
pub mod registry;
pub mod storage;
pub mod store;
pub mod synchronizer;

pub use config::{Config, ConfigError};
pub use directory::{Directory, UserDirectory, UserRecord, normalize_email};
pub use model::{
    Breakpoint, GridKind, LayoutItem, Layouts, MemberRole, Role, Widget, WidgetData, WidgetId,
    WidgetKind, Workspace, WorkspaceId,
};
pub use placement::{Footprint, Placement, place, place_everywhere};
pub use registry::{WidgetDefaults, create_widget};
pub use storage::{AutoSaveManager, FileStorage, MemoryStorage, Storage, StorageError, StorageResult};
pub use store::{ShareError, StoreError, StoreResult, WorkspaceStore};
