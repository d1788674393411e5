//! # session-shared
//!
//! Value types exchanged between the managed runtime and the config library:
//! session ids, profile pictures, community references, expiry settings and
//! group member records, plus the error taxonomy used when converting them.

pub mod community;
pub mod constants;
pub mod error;
pub mod expiry;
pub mod member;
pub mod profile_pic;
pub mod types;

pub use community::Community;
pub use error::{ConversionError, EncodingError, FormatError, SessionError};
pub use expiry::{ExpirationMode, ExpiryMode};
pub use member::{GroupMember, MemberStatus, RemovedStatus};
pub use profile_pic::ProfilePic;
pub use types::{IdPrefix, SessionId};
