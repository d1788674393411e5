//! `network.loki.messenger.libsession_util.UserGroupsConfig`, community part.

use jni::objects::{JClass, JObject};
use jni::sys::{jboolean, jlong, jobject, JNI_FALSE};
use jni::JNIEnv;
use session_config::{ConfigRegistry, UserGroups};

use super::{ffi_call, ffi_object, handle};
use crate::boundary::BoundaryEnv;
use crate::config::{self, ClassNames};
use crate::error::Result;
use crate::marshal::Marshaler;

pub fn create(registry: &ConfigRegistry) -> Result<jlong> {
    let handle = registry.insert(UserGroups::new())?;
    Ok(handle.raw() as jlong)
}

pub fn free(registry: &ConfigRegistry, raw: jlong) -> Result<()> {
    registry.remove(handle(raw))?;
    Ok(())
}

/// The community at `base_url` + `room`, or null.
pub fn get_community_info<E: BoundaryEnv>(
    env: &mut E,
    classes: &ClassNames,
    registry: &ConfigRegistry,
    raw: jlong,
    base_url: &E::Object,
    room: &E::Object,
) -> Result<E::Object> {
    let mut m = Marshaler::new(env, classes);
    let base_url = m.text_from_boundary(base_url)?;
    let room = m.text_from_boundary(room)?;

    let community = registry.with(handle(raw), |groups: &mut UserGroups| {
        groups.get_community(&base_url, &room).map(|c| c.cloned())
    })??;
    match community {
        Some(community) => m.serialize_community(&community),
        None => Ok(m.env().null()),
    }
}

pub fn set_community<E: BoundaryEnv>(
    env: &mut E,
    classes: &ClassNames,
    registry: &ConfigRegistry,
    raw: jlong,
    info: &E::Object,
) -> Result<()> {
    let community = Marshaler::new(env, classes).deserialize_community(info)?;
    registry.with(handle(raw), |groups: &mut UserGroups| groups.set_community(community))?;
    Ok(())
}

pub fn erase_community<E: BoundaryEnv>(
    env: &mut E,
    classes: &ClassNames,
    registry: &ConfigRegistry,
    raw: jlong,
    base_url: &E::Object,
    room: &E::Object,
) -> Result<bool> {
    let mut m = Marshaler::new(env, classes);
    let base_url = m.text_from_boundary(base_url)?;
    let room = m.text_from_boundary(room)?;

    Ok(registry.with(handle(raw), |groups: &mut UserGroups| {
        groups.erase_community(&base_url, &room)
    })??)
}

/// Every community as a `BaseCommunityInfo[]`.
pub fn all_community_info<E: BoundaryEnv>(
    env: &mut E,
    classes: &ClassNames,
    registry: &ConfigRegistry,
    raw: jlong,
) -> Result<E::Object> {
    let communities = registry.with(handle(raw), |groups: &mut UserGroups| {
        groups.communities().cloned().collect::<Vec<_>>()
    })?;

    let mut m = Marshaler::new(env, classes);
    let items = communities
        .iter()
        .map(|community| m.serialize_community(community))
        .collect::<Result<Vec<_>>>()?;
    m.object_array(&classes.base_community, items)
}

pub fn size_community_info(registry: &ConfigRegistry, raw: jlong) -> Result<jlong> {
    Ok(registry.with(handle(raw), |groups: &mut UserGroups| {
        groups.community_count() as jlong
    })?)
}

pub fn needs_push(registry: &ConfigRegistry, raw: jlong) -> Result<bool> {
    Ok(registry.with(handle(raw), |groups: &mut UserGroups| groups.state().needs_push())?)
}

// --- JNI symbols ---

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_UserGroupsConfig_nativeCreate(
    mut env: JNIEnv,
    _class: JClass,
) -> jlong {
    ffi_call(&mut env, "UserGroupsConfig.nativeCreate", 0, |_| {
        create(ConfigRegistry::global())
    })
}

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_UserGroupsConfig_nativeFree(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
) {
    ffi_call(&mut env, "UserGroupsConfig.nativeFree", (), |_| {
        free(ConfigRegistry::global(), handle)
    })
}

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_UserGroupsConfig_getCommunityInfo<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    handle: jlong,
    base_url: JObject<'local>,
    room: JObject<'local>,
) -> jobject {
    ffi_object(&mut env, "UserGroupsConfig.getCommunityInfo", |env| {
        let registry = ConfigRegistry::global();
        get_community_info(env, config::classes(), registry, handle, &base_url, &room)
    })
}

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_UserGroupsConfig_setCommunity<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    handle: jlong,
    info: JObject<'local>,
) {
    ffi_call(&mut env, "UserGroupsConfig.setCommunity", (), |env| {
        set_community(env, config::classes(), ConfigRegistry::global(), handle, &info)
    })
}

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_UserGroupsConfig_eraseCommunity<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    handle: jlong,
    base_url: JObject<'local>,
    room: JObject<'local>,
) -> jboolean {
    ffi_call(&mut env, "UserGroupsConfig.eraseCommunity", JNI_FALSE, |env| {
        let registry = ConfigRegistry::global();
        erase_community(env, config::classes(), registry, handle, &base_url, &room)
            .map(jboolean::from)
    })
}

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_UserGroupsConfig_allCommunityInfo(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
) -> jobject {
    ffi_object(&mut env, "UserGroupsConfig.allCommunityInfo", |env| {
        all_community_info(env, config::classes(), ConfigRegistry::global(), handle)
    })
}

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_UserGroupsConfig_sizeCommunityInfo(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
) -> jlong {
    ffi_call(&mut env, "UserGroupsConfig.sizeCommunityInfo", 0, |_| {
        size_community_info(ConfigRegistry::global(), handle)
    })
}

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_UserGroupsConfig_needsPush(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
) -> jboolean {
    ffi_call(&mut env, "UserGroupsConfig.needsPush", JNI_FALSE, |_| {
        needs_push(ConfigRegistry::global(), handle).map(jboolean::from)
    })
}

#[cfg(test)]
mod tests {
    use session_shared::Community;

    use super::*;
    use crate::heap::{HeapRef, ManagedHeap};

    fn setup() -> (ManagedHeap, ClassNames, ConfigRegistry, jlong) {
        let classes = ClassNames::default();
        let heap = ManagedHeap::with_session_classes(&classes);
        let registry = ConfigRegistry::new();
        let raw = create(&registry).unwrap();
        (heap, classes, registry, raw)
    }

    fn store(heap: &mut ManagedHeap, classes: &ClassNames, registry: &ConfigRegistry, raw: jlong, c: &Community) {
        let obj = Marshaler::new(heap, classes).serialize_community(c).unwrap();
        set_community(heap, classes, registry, raw, &obj).unwrap();
    }

    #[test]
    fn test_set_and_lookup_case_insensitive() {
        let (mut heap, classes, registry, raw) = setup();
        let community = Community::new("https://Open.Example.org", "Lobby", [1; 32]).unwrap();
        store(&mut heap, &classes, &registry, raw, &community);
        assert!(needs_push(&registry, raw).unwrap());

        let base = heap.make_string("HTTPS://open.example.org/").unwrap();
        let room = heap.make_string("lobby").unwrap();
        let out = get_community_info(&mut heap, &classes, &registry, raw, &base, &room).unwrap();
        let found = Marshaler::new(&mut heap, &classes)
            .deserialize_community(&out)
            .unwrap();
        assert_eq!(found, community);
        assert_eq!(found.room(), "Lobby");
    }

    #[test]
    fn test_missing_community_is_null() {
        let (mut heap, classes, registry, raw) = setup();
        let base = heap.make_string("https://open.example.org").unwrap();
        let room = heap.make_string("nowhere").unwrap();
        let out = get_community_info(&mut heap, &classes, &registry, raw, &base, &room).unwrap();
        assert_eq!(out, HeapRef::NULL);
    }

    #[test]
    fn test_all_and_erase() {
        let (mut heap, classes, registry, raw) = setup();
        for room in ["a", "b", "c"] {
            let c = Community::new("https://open.example.org", room, [2; 32]).unwrap();
            store(&mut heap, &classes, &registry, raw, &c);
        }
        assert_eq!(size_community_info(&registry, raw).unwrap(), 3);

        let array = all_community_info(&mut heap, &classes, &registry, raw).unwrap();
        assert_eq!(heap.array_items(array).unwrap().len(), 3);

        let base = heap.make_string("https://open.example.org").unwrap();
        let room = heap.make_string("B").unwrap();
        assert!(erase_community(&mut heap, &classes, &registry, raw, &base, &room).unwrap());
        assert!(!erase_community(&mut heap, &classes, &registry, raw, &base, &room).unwrap());
        assert_eq!(size_community_info(&registry, raw).unwrap(), 2);
    }

    #[test]
    fn test_invalid_room_rejected() {
        let (mut heap, classes, registry, raw) = setup();
        let base = heap.make_string("https://open.example.org").unwrap();
        let room = heap.make_string("not a room!").unwrap();
        let err = get_community_info(&mut heap, &classes, &registry, raw, &base, &room).unwrap_err();
        assert!(err.is_format());
    }
}
