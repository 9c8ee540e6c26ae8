//! Workspace membership: inviting, re-roling and removing members.

use thiserror::Error;

use crate::directory::{Directory, normalize_email};
use crate::model::{MemberRole, Workspace};

/// Rejected membership change. Messages are shown to the user as is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShareError {
    #[error("You cannot invite yourself.")]
    SelfInvite,
    #[error("This user already has access.")]
    AlreadyHasAccess,
    #[error("No user with this email was found.")]
    UnknownUser,
    #[error("{0} is not a member of this workspace.")]
    NotAMember(String),
}

/// Grant `role` on `workspace` to `email`. Returns the normalized email.
pub fn invite<D: Directory + ?Sized>(
    workspace: &mut Workspace,
    inviter: &str,
    email: &str,
    role: MemberRole,
    directory: &D,
) -> Result<String, ShareError> {
    let email = normalize_email(email);
    if email == normalize_email(inviter) {
        return Err(ShareError::SelfInvite);
    }
    if workspace.is_visible_to(&email) {
        return Err(ShareError::AlreadyHasAccess);
    }
    if !directory.contains(&email) {
        return Err(ShareError::UnknownUser);
    }
    workspace.members.insert(email.clone(), role);
    Ok(email)
}

pub fn change_member_role(workspace: &mut Workspace, email: &str, role: MemberRole) -> Result<(), ShareError> {
    let email = normalize_email(email);
    match workspace.members.get_mut(&email) {
        Some(current) => {
            *current = role;
            Ok(())
        }
        None => Err(ShareError::NotAMember(email)),
    }
}

pub fn remove_member(workspace: &mut Workspace, email: &str) -> Result<(), ShareError> {
    let email = normalize_email(email);
    workspace
        .members
        .remove(&email)
        .map(|_| ())
        .ok_or(ShareError::NotAMember(email))
}
