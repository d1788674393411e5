//! # session-config
//!
//! In-process config objects shared between every boundary call: group info,
//! group members and the user's communities.
//!
//! The objects themselves are plain values. Sharing happens through
//! [`ConfigRegistry`], which owns them behind a single lock and hands out
//! opaque [`ConfigHandle`]s in place of pointers.

pub mod group_info;
pub mod group_members;
pub mod registry;
pub mod state;
pub mod user_groups;

mod error;

pub use error::{ConfigError, Result};
pub use group_info::GroupInfo;
pub use group_members::GroupMembers;
pub use registry::{Config, ConfigHandle, ConfigKind, ConfigRegistry};
pub use state::ConfigState;
pub use user_groups::UserGroups;
