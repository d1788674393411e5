//! Handle table for native config objects.
//!
//! The managed side never sees a pointer: it holds a [`ConfigHandle`] and
//! every access goes through [`ConfigRegistry::with`], which runs the caller's
//! closure while holding the registry lock. The process-wide instance is
//! [`ConfigRegistry::global`]; there is exactly one lock for all objects in a
//! registry.
//!
//! The lock is not re-entrant. Taking it again from the thread that already
//! holds it fails with [`ConfigError::Reentrant`] instead of deadlocking.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use parking_lot::{Mutex, MutexGuard};

use crate::error::{ConfigError, Result};
use crate::group_info::GroupInfo;
use crate::group_members::GroupMembers;
use crate::user_groups::UserGroups;

/// Opaque key for a registered config object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigHandle(u64);

impl ConfigHandle {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ConfigHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Every kind of object the registry can hold.
#[derive(Debug)]
pub enum Config {
    GroupInfo(GroupInfo),
    GroupMembers(GroupMembers),
    UserGroups(UserGroups),
}

impl Config {
    pub fn kind(&self) -> &'static str {
        match self {
            Config::GroupInfo(_) => GroupInfo::KIND,
            Config::GroupMembers(_) => GroupMembers::KIND,
            Config::UserGroups(_) => UserGroups::KIND,
        }
    }
}

/// Typed access to one variant of [`Config`].
pub trait ConfigKind: Sized {
    const KIND: &'static str;

    fn wrap(self) -> Config;

    fn from_config_mut(config: &mut Config) -> Option<&mut Self>;
}

macro_rules! config_kind {
    ($ty:ident, $name:literal) => {
        impl ConfigKind for $ty {
            const KIND: &'static str = $name;

            fn wrap(self) -> Config {
                Config::$ty(self)
            }

            fn from_config_mut(config: &mut Config) -> Option<&mut Self> {
                match config {
                    Config::$ty(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

config_kind!(GroupInfo, "group info config");
config_kind!(GroupMembers, "group members config");
config_kind!(UserGroups, "user groups config");

#[derive(Default)]
struct Inner {
    next_handle: u64,
    configs: HashMap<ConfigHandle, Config>,
}

pub struct ConfigRegistry {
    inner: Mutex<Inner>,
    // Token of the thread currently holding `inner`, 0 when free.
    owner: AtomicUsize,
}

thread_local! {
    static THREAD_TOKEN: u8 = const { 0 };
}

fn thread_token() -> usize {
    THREAD_TOKEN.with(|t| t as *const u8 as usize)
}

struct RegistryGuard<'a> {
    inner: MutexGuard<'a, Inner>,
    owner: &'a AtomicUsize,
}

impl Drop for RegistryGuard<'_> {
    fn drop(&mut self) {
        // Runs before `inner` is unlocked.
        self.owner.store(0, Ordering::Release);
    }
}

impl ConfigRegistry {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_handle: 1,
                configs: HashMap::new(),
            }),
            owner: AtomicUsize::new(0),
        }
    }

    /// The registry shared by every boundary call in the process.
    pub fn global() -> &'static ConfigRegistry {
        static GLOBAL: OnceLock<ConfigRegistry> = OnceLock::new();
        GLOBAL.get_or_init(ConfigRegistry::new)
    }

    fn lock(&self) -> Result<RegistryGuard<'_>> {
        let me = thread_token();
        if self.owner.load(Ordering::Acquire) == me {
            tracing::error!("config lock requested while already held by this thread");
            return Err(ConfigError::Reentrant);
        }
        let inner = self.inner.lock();
        self.owner.store(me, Ordering::Release);
        Ok(RegistryGuard {
            inner,
            owner: &self.owner,
        })
    }

    /// Register a config object and return its handle.
    pub fn insert<T: ConfigKind>(&self, config: T) -> Result<ConfigHandle> {
        let mut guard = self.lock()?;
        let handle = ConfigHandle(guard.inner.next_handle);
        guard.inner.next_handle += 1;
        guard.inner.configs.insert(handle, config.wrap());
        tracing::debug!(%handle, kind = T::KIND, "registered config");
        Ok(handle)
    }

    /// Drop the object behind `handle`.
    pub fn remove(&self, handle: ConfigHandle) -> Result<Config> {
        let mut guard = self.lock()?;
        let config = guard
            .inner
            .configs
            .remove(&handle)
            .ok_or(ConfigError::UnknownHandle(handle))?;
        tracing::debug!(%handle, kind = config.kind(), "released config");
        Ok(config)
    }

    /// Run `f` on the object behind `handle` with the lock held.
    ///
    /// The lock is released when `f` returns or unwinds. `f` must not call
    /// back into the managed runtime.
    pub fn with<T, R>(&self, handle: ConfigHandle, f: impl FnOnce(&mut T) -> R) -> Result<R>
    where
        T: ConfigKind,
    {
        let mut guard = self.lock()?;
        let config = guard
            .inner
            .configs
            .get_mut(&handle)
            .ok_or(ConfigError::UnknownHandle(handle))?;
        let actual = config.kind();
        let typed = T::from_config_mut(config).ok_or(ConfigError::WrongKind {
            handle,
            expected: T::KIND,
            actual,
        })?;
        Ok(f(typed))
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.inner.configs.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl Default for ConfigRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use rand::RngCore;
    use session_shared::{GroupMember, IdPrefix, SessionId};

    use super::*;

    #[test]
    fn test_insert_with_remove() {
        let registry = ConfigRegistry::new();
        let handle = registry.insert(GroupInfo::new()).unwrap();

        registry
            .with(handle, |info: &mut GroupInfo| info.set_name(Some("Team".into())))
            .unwrap()
            .unwrap();
        let name = registry
            .with(handle, |info: &mut GroupInfo| info.name().map(str::to_owned))
            .unwrap();
        assert_eq!(name.as_deref(), Some("Team"));

        assert!(matches!(registry.remove(handle).unwrap(), Config::GroupInfo(_)));
        assert_eq!(
            registry.with(handle, |_: &mut GroupInfo| ()),
            Err(ConfigError::UnknownHandle(handle))
        );
        assert!(registry.is_empty().unwrap());
    }

    #[test]
    fn test_wrong_kind() {
        let registry = ConfigRegistry::new();
        let handle = registry.insert(UserGroups::new()).unwrap();
        let err = registry.with(handle, |_: &mut GroupMembers| ()).unwrap_err();
        assert_eq!(
            err,
            ConfigError::WrongKind {
                handle,
                expected: "group members config",
                actual: "user groups config",
            }
        );
    }

    #[test]
    fn test_handles_are_unique() {
        let registry = ConfigRegistry::new();
        let a = registry.insert(GroupInfo::new()).unwrap();
        registry.remove(a).unwrap();
        let b = registry.insert(GroupInfo::new()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_nested_lock_is_an_error() {
        let registry = ConfigRegistry::new();
        let handle = registry.insert(GroupInfo::new()).unwrap();
        let inner = registry
            .with(handle, |_: &mut GroupInfo| registry.len())
            .unwrap();
        assert_eq!(inner, Err(ConfigError::Reentrant));

        // The outer guard was released normally.
        assert_eq!(registry.len().unwrap(), 1);
    }

    #[test]
    fn test_lock_released_after_panic() {
        let registry = Arc::new(ConfigRegistry::new());
        let handle = registry.insert(GroupInfo::new()).unwrap();

        let r = Arc::clone(&registry);
        let result = thread::spawn(move || {
            r.with(handle, |_: &mut GroupInfo| panic!("boom")).ok();
        })
        .join();
        assert!(result.is_err());

        assert_eq!(registry.len().unwrap(), 1);
        registry.with(handle, |info: &mut GroupInfo| info.destroy_group()).unwrap();
    }

    #[test]
    fn test_concurrent_member_updates() {
        let registry = Arc::new(ConfigRegistry::new());
        let handle = registry.insert(GroupMembers::new()).unwrap();

        let threads: Vec<_> = (0..8u8)
            .map(|t| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    let mut rng = rand::thread_rng();
                    for i in 0..50u8 {
                        let mut key = [0u8; 32];
                        rng.fill_bytes(&mut key[2..]);
                        key[0] = t;
                        key[1] = i;
                        let member = GroupMember::new(SessionId::new(IdPrefix::Standard, key)).unwrap();
                        registry
                            .with(handle, |members: &mut GroupMembers| members.set(member))
                            .unwrap();
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }

        let count = registry.with(handle, |m: &mut GroupMembers| m.len()).unwrap();
        assert_eq!(count, 8 * 50);
    }
}
