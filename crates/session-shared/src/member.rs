use serde::{Deserialize, Serialize};

use crate::constants::NAME_MAX_LENGTH;
use crate::error::FormatError;
use crate::profile_pic::ProfilePic;
use crate::types::{IdPrefix, SessionId};

/// Progress of an invitation or an admin promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(i32)]
pub enum MemberStatus {
    #[default]
    Accepted = 0,
    Sent = 1,
    Failed = 2,
    NotSent = 3,
}

impl MemberStatus {
    pub fn from_code(code: i32) -> Result<Self, FormatError> {
        match code {
            0 => Ok(Self::Accepted),
            1 => Ok(Self::Sent),
            2 => Ok(Self::Failed),
            3 => Ok(Self::NotSent),
            other => Err(FormatError::UnknownCode {
                field: "member status",
                code: other,
            }),
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(i32)]
pub enum RemovedStatus {
    #[default]
    NotRemoved = 0,
    Removed = 1,
    RemovedWithMessages = 2,
}

impl RemovedStatus {
    pub fn from_code(code: i32) -> Result<Self, FormatError> {
        match code {
            0 => Ok(Self::NotRemoved),
            1 => Ok(Self::Removed),
            2 => Ok(Self::RemovedWithMessages),
            other => Err(FormatError::UnknownCode {
                field: "removed status",
                code: other,
            }),
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}

/// One member of a closed group, as recorded in the group's member config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    session_id: SessionId,
    name: Option<String>,
    pub profile_pic: Option<ProfilePic>,
    pub admin: bool,
    pub invite_status: MemberStatus,
    pub promotion_status: MemberStatus,
    pub removed_status: RemovedStatus,
    /// Set when the member was added with access to earlier messages.
    pub supplement: bool,
}

impl GroupMember {
    /// A fresh member record; only standard (`05`) ids can be members.
    pub fn new(session_id: SessionId) -> Result<Self, FormatError> {
        session_id.require_prefix(IdPrefix::Standard)?;
        Ok(Self {
            session_id,
            name: None,
            profile_pic: None,
            admin: false,
            invite_status: MemberStatus::default(),
            promotion_status: MemberStatus::default(),
            removed_status: RemovedStatus::default(),
            supplement: false,
        })
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) -> Result<(), FormatError> {
        if let Some(n) = &name {
            if n.len() > NAME_MAX_LENGTH {
                return Err(FormatError::TooLong {
                    field: "member name",
                    actual: n.len(),
                    max: NAME_MAX_LENGTH,
                });
            }
        }
        self.name = name;
        Ok(())
    }

    pub fn set_invited(&mut self, failed: bool) {
        self.invite_status = if failed {
            MemberStatus::Failed
        } else {
            MemberStatus::Sent
        };
    }

    pub fn set_accepted(&mut self) {
        self.invite_status = MemberStatus::Accepted;
    }

    pub fn invite_pending(&self) -> bool {
        self.invite_status != MemberStatus::Accepted
    }

    pub fn invite_failed(&self) -> bool {
        self.invite_status == MemberStatus::Failed
    }

    pub fn set_promotion_sent(&mut self) {
        self.admin = false;
        self.promotion_status = MemberStatus::Sent;
    }

    pub fn set_promotion_failed(&mut self) {
        self.admin = false;
        self.promotion_status = MemberStatus::Failed;
    }

    pub fn set_promotion_accepted(&mut self) {
        self.admin = true;
        self.promotion_status = MemberStatus::Accepted;
    }

    /// Admin already, or an admin promotion is in flight.
    pub fn promoted(&self) -> bool {
        self.admin || self.promotion_pending()
    }

    pub fn promotion_pending(&self) -> bool {
        !self.admin && self.promotion_status != MemberStatus::Accepted
    }

    pub fn set_removed(&mut self, with_messages: bool) {
        self.removed_status = if with_messages {
            RemovedStatus::RemovedWithMessages
        } else {
            RemovedStatus::Removed
        };
    }

    pub fn is_removed(&self) -> bool {
        self.removed_status != RemovedStatus::NotRemoved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member() -> GroupMember {
        let id = SessionId::new(IdPrefix::Standard, [9u8; 32]);
        GroupMember::new(id).unwrap()
    }

    #[test]
    fn test_only_standard_ids() {
        let group_id = SessionId::new(IdPrefix::Group, [9u8; 32]);
        assert!(matches!(
            GroupMember::new(group_id),
            Err(FormatError::SessionIdPrefix { .. })
        ));
    }

    #[test]
    fn test_new_member_defaults() {
        let m = member();
        assert!(!m.admin);
        assert!(!m.invite_pending());
        assert!(!m.promoted());
        assert!(!m.is_removed());
        assert_eq!(m.name(), None);
    }

    #[test]
    fn test_invite_flow() {
        let mut m = member();
        m.set_invited(false);
        assert!(m.invite_pending());
        assert!(!m.invite_failed());
        m.set_invited(true);
        assert!(m.invite_failed());
        m.set_accepted();
        assert!(!m.invite_pending());
    }

    #[test]
    fn test_promotion_flow() {
        let mut m = member();
        m.set_promotion_sent();
        assert!(m.promotion_pending());
        assert!(m.promoted());
        m.set_promotion_failed();
        assert_eq!(m.promotion_status, MemberStatus::Failed);
        m.set_promotion_accepted();
        assert!(m.admin);
        assert!(!m.promotion_pending());
        assert!(m.promoted());
    }

    #[test]
    fn test_name_limit() {
        let mut m = member();
        assert!(m.set_name(Some("x".repeat(NAME_MAX_LENGTH))).is_ok());
        assert!(m.set_name(Some("x".repeat(NAME_MAX_LENGTH + 1))).is_err());
        assert_eq!(m.name().map(str::len), Some(NAME_MAX_LENGTH));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(MemberStatus::from_code(3).unwrap(), MemberStatus::NotSent);
        assert!(MemberStatus::from_code(4).is_err());
        assert_eq!(RemovedStatus::RemovedWithMessages.code(), 2);
        assert!(RemovedStatus::from_code(-1).is_err());
    }
}
