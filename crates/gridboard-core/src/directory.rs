//! Directory of known identities, consulted when sharing workspaces.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::storage::{Storage, StorageError, StorageResult, USERS_KEY};

/// Canonical form of an email: trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// A registered identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
}

/// Lookup of identities by normalized email.
pub trait Directory {
    fn lookup(&self, email: &str) -> Option<&UserRecord>;

    fn contains(&self, email: &str) -> bool {
        self.lookup(email).is_some()
    }

    /// Name to show for `email`, falling back to the email itself.
    fn display_name<'a>(&'a self, email: &'a str) -> &'a str {
        self.lookup(email).map(|user| user.name.as_str()).unwrap_or(email)
    }
}

/// Directory backed by the `users` document of a storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDirectory {
    users: BTreeMap<String, UserRecord>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the directory. Unknown extra fields (such as stored
    /// credentials) are ignored and never loaded.
    pub fn load<S: Storage + ?Sized>(storage: &S) -> StorageResult<Self> {
        let Some(json) = storage.get(USERS_KEY)? else {
            return Ok(Self::new());
        };
        let users: BTreeMap<String, UserRecord> = serde_json::from_str(&json).unwrap_or_else(|e| {
            log::warn!("Stored users are unreadable, starting empty: {}", e);
            BTreeMap::new()
        });
        Ok(Self {
            users: users
                .into_iter()
                .map(|(email, user)| (normalize_email(&email), user))
                .collect(),
        })
    }

    pub fn save<S: Storage + ?Sized>(&self, storage: &S) -> StorageResult<()> {
        let json = serde_json::to_string(&self.users)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        storage.set(USERS_KEY, &json)
    }

    /// Add or replace an identity. Returns its normalized email.
    pub fn insert(&mut self, email: &str, user: UserRecord) -> String {
        let email = normalize_email(email);
        self.users.insert(email.clone(), user);
        email
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Directory for UserDirectory {
    fn lookup(&self, email: &str) -> Option<&UserRecord> {
        self.users.get(&normalize_email(email))
    }
}
