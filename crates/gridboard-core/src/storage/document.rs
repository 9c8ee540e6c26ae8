//! Keys and (de)serialization of the persisted dashboard document.

use super::{Storage, StorageError, StorageResult};
use crate::model::Workspace;

/// Key of the serialized workspace collection.
pub const WORKSPACES_KEY: &str = "all_workspaces";

/// Key of the identity directory.
pub const USERS_KEY: &str = "users";

/// Key remembering which workspace `email` had open last.
pub fn active_workspace_key(email: &str) -> String {
    format!("active_workspace_id:{email}")
}

/// Load the workspace collection.
///
/// A missing document is an empty collection. So is a document that does
/// not parse: it is reported and left to be overwritten by the next save.
pub fn load_workspaces<S: Storage + ?Sized>(storage: &S) -> StorageResult<Vec<Workspace>> {
    let Some(json) = storage.get(WORKSPACES_KEY)? else {
        return Ok(Vec::new());
    };
    match serde_json::from_str(&json) {
        Ok(workspaces) => Ok(workspaces),
        Err(e) => {
            log::warn!("Stored workspaces are unreadable, starting empty: {}", e);
            Ok(Vec::new())
        }
    }
}

/// Overwrite the stored workspace collection.
pub fn save_workspaces<S: Storage + ?Sized>(storage: &S, workspaces: &[Workspace]) -> StorageResult<()> {
    let json = serde_json::to_string(workspaces)
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
    storage.set(WORKSPACES_KEY, &json)
}

/// Last active workspace of `email`, if any was recorded.
pub fn load_active_workspace<S: Storage + ?Sized>(storage: &S, email: &str) -> StorageResult<Option<String>> {
    let Some(json) = storage.get(&active_workspace_key(email))? else {
        return Ok(None);
    };
    Ok(serde_json::from_str::<Option<String>>(&json).unwrap_or_else(|e| {
        log::warn!("Ignoring unreadable active workspace for {}: {}", email, e);
        None
    }))
}

/// Record the active workspace of `email`; `None` forgets it.
pub fn save_active_workspace<S: Storage + ?Sized>(
    storage: &S,
    email: &str,
    workspace_id: Option<&str>,
) -> StorageResult<()> {
    let key = active_workspace_key(email);
    match workspace_id {
        Some(id) => {
            let json = serde_json::to_string(id)
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            storage.set(&key, &json)
        }
        None => storage.remove(&key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Breakpoint, LayoutItem, WidgetKind};
    use crate::registry::create_widget;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_missing_document_is_empty() {
        let storage = MemoryStorage::new();
        assert!(load_workspaces(&storage).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_document_is_empty() {
        let storage = MemoryStorage::new();
        storage.set(WORKSPACES_KEY, "{not json").unwrap();
        assert!(load_workspaces(&storage).unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load_workspaces() {
        let storage = MemoryStorage::new();
        let mut ws = Workspace::new("Sales", "a@x.com");
        let folder = create_widget(WidgetKind::Folder, None);
        let child = create_widget(WidgetKind::Line, Some(folder.id.clone()));
        ws.layouts
            .insert(Breakpoint::Lg, vec![LayoutItem::new(folder.id.clone(), 0, 0, 12, 6)]);
        ws.widgets.push(folder);
        ws.widgets.push(child);

        save_workspaces(&storage, std::slice::from_ref(&ws)).unwrap();
        let loaded = load_workspaces(&storage).unwrap();
        assert_eq!(loaded, vec![ws]);
    }

    #[test]
    fn test_active_workspace_is_per_identity() {
        let storage = MemoryStorage::new();
        save_active_workspace(&storage, "a@x.com", Some("one")).unwrap();
        save_active_workspace(&storage, "b@x.com", Some("two")).unwrap();

        assert_eq!(load_active_workspace(&storage, "a@x.com").unwrap().as_deref(), Some("one"));
        assert_eq!(load_active_workspace(&storage, "b@x.com").unwrap().as_deref(), Some("two"));

        save_active_workspace(&storage, "a@x.com", None).unwrap();
        assert_eq!(load_active_workspace(&storage, "a@x.com").unwrap(), None);
    }

    #[test]
    fn test_unreadable_active_workspace_is_none() {
        let storage = MemoryStorage::new();
        storage.set(&active_workspace_key("a@x.com"), "not json").unwrap();
        assert_eq!(load_active_workspace(&storage, "a@x.com").unwrap(), None);
    }
}
