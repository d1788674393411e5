use std::collections::BTreeMap;

use session_shared::community::{canonical_url, validate_room};
use session_shared::Community;

use crate::error::Result;
use crate::state::ConfigState;

// (canonical base url, lowercase room)
type CommunityKey = (String, String);

/// The user's joined communities.
#[derive(Debug, Clone, Default)]
pub struct UserGroups {
    state: ConfigState,
    communities: BTreeMap<CommunityKey, Community>,
}

impl UserGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ConfigState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ConfigState {
        &mut self.state
    }

    pub fn get_community(&self, base_url: &str, room: &str) -> Result<Option<&Community>> {
        let key = community_key(base_url, room)?;
        Ok(self.communities.get(&key))
    }

    pub fn get_or_construct_community(
        &self,
        base_url: &str,
        room: &str,
        pubkey: [u8; 32],
    ) -> Result<Community> {
        match self.get_community(base_url, room)? {
            Some(existing) => Ok(existing.clone()),
            None => Ok(Community::new(base_url, room, pubkey)?),
        }
    }

    pub fn set_community(&mut self, community: Community) {
        let key = (community.base_url().to_string(), community.room_norm());
        if self.communities.get(&key) != Some(&community) {
            tracing::debug!(url = %community.full_url(), "storing community");
            self.communities.insert(key, community);
            self.state.mark_dirty();
        }
    }

    pub fn erase_community(&mut self, base_url: &str, room: &str) -> Result<bool> {
        let key = community_key(base_url, room)?;
        let removed = self.communities.remove(&key).is_some();
        if removed {
            self.state.mark_dirty();
        }
        Ok(removed)
    }

    pub fn communities(&self) -> impl Iterator<Item = &Community> {
        self.communities.values()
    }

    pub fn community_count(&self) -> usize {
        self.communities.len()
    }
}

fn community_key(base_url: &str, room: &str) -> Result<CommunityKey> {
    validate_room(room)?;
    Ok((canonical_url(base_url)?, room.to_ascii_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn community(room: &str) -> Community {
        Community::new("https://open.example.org", room, [5u8; 32]).unwrap()
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut groups = UserGroups::new();
        groups.set_community(community("Lobby"));

        let found = groups
            .get_community("HTTPS://OPEN.EXAMPLE.ORG/", "lobby")
            .unwrap()
            .unwrap();
        assert_eq!(found.room(), "Lobby");
        assert_eq!(groups.community_count(), 1);
    }

    #[test]
    fn test_set_replaces_same_room() {
        let mut groups = UserGroups::new();
        groups.set_community(community("lobby"));
        groups.set_community(community("LOBBY"));
        assert_eq!(groups.community_count(), 1);
        assert_eq!(groups.communities().next().unwrap().room(), "LOBBY");
    }

    #[test]
    fn test_get_or_construct() {
        let mut groups = UserGroups::new();
        let c = groups
            .get_or_construct_community("https://open.example.org", "new", [1u8; 32])
            .unwrap();
        assert_eq!(groups.community_count(), 0);

        groups.set_community(c.clone());
        let again = groups
            .get_or_construct_community("https://open.example.org", "NEW", [2u8; 32])
            .unwrap();
        assert_eq!(again, c);
    }

    #[test]
    fn test_erase() {
        let mut groups = UserGroups::new();
        groups.set_community(community("a"));
        assert!(groups.erase_community("https://open.example.org", "A").unwrap());
        assert!(!groups.erase_community("https://open.example.org", "a").unwrap());
        assert!(groups.erase_community("not a url", "a").is_err());
    }
}
