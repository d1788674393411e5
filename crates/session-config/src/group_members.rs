use std::collections::BTreeMap;

use session_shared::{GroupMember, SessionId};

use crate::error::Result;
use crate::state::ConfigState;

/// Member list of a closed group, keyed and ordered by session id.
#[derive(Debug, Clone, Default)]
pub struct GroupMembers {
    state: ConfigState,
    members: BTreeMap<SessionId, GroupMember>,
}

impl GroupMembers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ConfigState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ConfigState {
        &mut self.state
    }

    pub fn get(&self, session_id: &SessionId) -> Option<&GroupMember> {
        self.members.get(session_id)
    }

    /// The stored member, or a default record for `session_id`. Nothing is
    /// inserted until [`GroupMembers::set`] is called.
    pub fn get_or_construct(&self, session_id: &SessionId) -> Result<GroupMember> {
        match self.members.get(session_id) {
            Some(member) => Ok(member.clone()),
            None => Ok(GroupMember::new(session_id.clone())?),
        }
    }

    pub fn set(&mut self, member: GroupMember) {
        let id = member.session_id().clone();
        if self.members.get(&id) != Some(&member) {
            tracing::debug!(member = %id.short(), "storing group member");
            self.members.insert(id, member);
            self.state.mark_dirty();
        }
    }

    pub fn erase(&mut self, session_id: &SessionId) -> bool {
        let removed = self.members.remove(session_id).is_some();
        if removed {
            tracing::debug!(member = %session_id.short(), "erased group member");
            self.state.mark_dirty();
        }
        removed
    }

    pub fn all(&self) -> impl Iterator<Item = &GroupMember> {
        self.members.values()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn admins(&self) -> impl Iterator<Item = &GroupMember> {
        self.members.values().filter(|m| m.admin)
    }
}
