use session_shared::constants::{DESCRIPTION_MAX_LENGTH, NAME_MAX_LENGTH};
use session_shared::{ExpiryMode, FormatError, ProfilePic};

use crate::error::Result;
use crate::state::ConfigState;

/// Shared metadata of a closed group.
#[derive(Debug, Clone, Default)]
pub struct GroupInfo {
    state: ConfigState,
    fields: Fields,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Fields {
    name: Option<String>,
    description: Option<String>,
    profile_pic: Option<ProfilePic>,
    expiry: ExpiryMode,
    created: Option<i64>,
    delete_before: Option<i64>,
    delete_attach_before: Option<i64>,
    destroyed: bool,
}

impl GroupInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ConfigState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ConfigState {
        &mut self.state
    }

    pub fn name(&self) -> Option<&str> {
        self.fields.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) -> Result<()> {
        check_len("group name", name.as_deref(), NAME_MAX_LENGTH)?;
        self.update(|info| info.name = name);
        Ok(())
    }

    pub fn description(&self) -> Option<&str> {
        self.fields.description.as_deref()
    }

    pub fn set_description(&mut self, description: Option<String>) -> Result<()> {
        check_len("group description", description.as_deref(), DESCRIPTION_MAX_LENGTH)?;
        self.update(|info| info.description = description);
        Ok(())
    }

    pub fn profile_pic(&self) -> Option<&ProfilePic> {
        self.fields.profile_pic.as_ref()
    }

    pub fn set_profile_pic(&mut self, pic: Option<ProfilePic>) {
        self.update(|info| info.profile_pic = pic);
    }

    pub fn expiry_timer(&self) -> ExpiryMode {
        self.fields.expiry
    }

    pub fn set_expiry_timer(&mut self, expiry: ExpiryMode) {
        self.update(|info| info.expiry = expiry);
    }

    pub fn created(&self) -> Option<i64> {
        self.fields.created
    }

    pub fn set_created(&mut self, created: Option<i64>) {
        self.update(|info| info.created = created);
    }

    pub fn delete_before(&self) -> Option<i64> {
        self.fields.delete_before
    }

    pub fn set_delete_before(&mut self, timestamp: Option<i64>) {
        self.update(|info| info.delete_before = timestamp);
    }

    pub fn delete_attach_before(&self) -> Option<i64> {
        self.fields.delete_attach_before
    }

    pub fn set_delete_attach_before(&mut self, timestamp: Option<i64>) {
        self.update(|info| info.delete_attach_before = timestamp);
    }

    pub fn is_destroyed(&self) -> bool {
        self.fields.destroyed
    }

    /// Permanently mark the group as deleted. Irreversible.
    pub fn destroy_group(&mut self) {
        if !self.fields.destroyed {
            tracing::info!("destroying group");
            self.update(|info| info.destroyed = true);
        }
    }

    // Apply a change, flagging the config dirty only if something moved.
    fn update(&mut self, f: impl FnOnce(&mut Fields)) {
        let before = self.fields.clone();
        f(&mut self.fields);
        if self.fields != before {
            self.state.mark_dirty();
        }
    }
}

fn check_len(field: &'static str, value: Option<&str>, max: usize) -> Result<()> {
    match value {
        Some(v) if v.len() > max => Err(FormatError::TooLong {
            field,
            actual: v.len(),
            max,
        }
        .into()),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_fresh_info_is_clean() {
        let info = GroupInfo::new();
        assert!(!info.state().needs_push());
        assert_eq!(info.name(), None);
        assert_eq!(info.expiry_timer(), ExpiryMode::Disabled);
        assert_eq!(info.created(), None);
    }

    #[test]
    fn test_setters_mark_dirty() {
        let mut info = GroupInfo::new();
        info.set_name(Some("Book club".into())).unwrap();
        assert!(info.state().needs_push());
        assert_eq!(info.name(), Some("Book club"));

        let seqno = info.state_mut().push();
        info.state_mut().confirm_pushed(seqno);
        assert!(!info.state().needs_push());

        // Writing the same value again is not a change.
        info.set_name(Some("Book club".into())).unwrap();
        assert!(!info.state().needs_push());

        info.set_expiry_timer(ExpiryMode::AfterSend(Duration::from_secs(60)));
        assert!(info.state().needs_push());
    }

    #[test]
    fn test_length_limits() {
        let mut info = GroupInfo::new();
        assert!(info.set_name(Some("n".repeat(NAME_MAX_LENGTH + 1))).is_err());
        assert!(info
            .set_description(Some("d".repeat(DESCRIPTION_MAX_LENGTH + 1)))
            .is_err());
        assert!(!info.state().needs_push());
    }

    #[test]
    fn test_timestamps_optional() {
        let mut info = GroupInfo::new();
        info.set_created(Some(1_700_000_000));
        info.set_delete_before(Some(1_700_000_100));
        assert_eq!(info.created(), Some(1_700_000_000));
        assert_eq!(info.delete_before(), Some(1_700_000_100));
        assert_eq!(info.delete_attach_before(), None);

        info.set_created(None);
        assert_eq!(info.created(), None);
    }

    #[test]
    fn test_destroy_is_sticky() {
        let mut info = GroupInfo::new();
        info.destroy_group();
        assert!(info.is_destroyed());
        info.destroy_group();
        assert!(info.is_destroyed());
    }
}
