//! `network.loki.messenger.libsession_util.GroupMembersConfig`

use jni::objects::{JClass, JObject};
use jni::sys::{jboolean, jlong, jobject, JNI_FALSE};
use jni::JNIEnv;
use session_config::{ConfigRegistry, GroupMembers};

use super::{ffi_call, ffi_object, handle};
use crate::boundary::BoundaryEnv;
use crate::config::{self, ClassNames};
use crate::error::Result;
use crate::marshal::Marshaler;

pub fn create(registry: &ConfigRegistry) -> Result<jlong> {
    let handle = registry.insert(GroupMembers::new())?;
    Ok(handle.raw() as jlong)
}

pub fn free(registry: &ConfigRegistry, raw: jlong) -> Result<()> {
    registry.remove(handle(raw))?;
    Ok(())
}

/// The member with `session_id`, or null.
pub fn get<E: BoundaryEnv>(
    env: &mut E,
    classes: &ClassNames,
    registry: &ConfigRegistry,
    raw: jlong,
    session_id: &E::Object,
) -> Result<E::Object> {
    let mut m = Marshaler::new(env, classes);
    let id = m.session_id_from_text(session_id)?;
    let member = registry.with(handle(raw), |members: &mut GroupMembers| {
        members.get(&id).cloned()
    })?;
    match member {
        Some(member) => m.serialize_group_member(&member),
        None => Ok(m.env().null()),
    }
}

pub fn get_or_construct<E: BoundaryEnv>(
    env: &mut E,
    classes: &ClassNames,
    registry: &ConfigRegistry,
    raw: jlong,
    session_id: &E::Object,
) -> Result<E::Object> {
    let mut m = Marshaler::new(env, classes);
    let id = m.session_id_from_text(session_id)?;
    let member = registry.with(handle(raw), |members: &mut GroupMembers| {
        members.get_or_construct(&id)
    })??;
    m.serialize_group_member(&member)
}

pub fn set<E: BoundaryEnv>(
    env: &mut E,
    classes: &ClassNames,
    registry: &ConfigRegistry,
    raw: jlong,
    member: &E::Object,
) -> Result<()> {
    let member = Marshaler::new(env, classes).deserialize_group_member(member)?;
    registry.with(handle(raw), |members: &mut GroupMembers| members.set(member))?;
    Ok(())
}

pub fn erase<E: BoundaryEnv>(
    env: &mut E,
    classes: &ClassNames,
    registry: &ConfigRegistry,
    raw: jlong,
    session_id: &E::Object,
) -> Result<bool> {
    let id = Marshaler::new(env, classes).session_id_from_text(session_id)?;
    Ok(registry.with(handle(raw), |members: &mut GroupMembers| members.erase(&id))?)
}

/// Every member as a `GroupMember[]`, in session id order.
pub fn all<E: BoundaryEnv>(
    env: &mut E,
    classes: &ClassNames,
    registry: &ConfigRegistry,
    raw: jlong,
) -> Result<E::Object> {
    let members = registry.with(handle(raw), |members: &mut GroupMembers| {
        members.all().cloned().collect::<Vec<_>>()
    })?;

    let mut m = Marshaler::new(env, classes);
    let items = members
        .iter()
        .map(|member| m.serialize_group_member(member))
        .collect::<Result<Vec<_>>>()?;
    m.object_array(&classes.group_member, items)
}

pub fn size(registry: &ConfigRegistry, raw: jlong) -> Result<jlong> {
    Ok(registry.with(handle(raw), |members: &mut GroupMembers| members.len() as jlong)?)
}

pub fn needs_push(registry: &ConfigRegistry, raw: jlong) -> Result<bool> {
    Ok(registry.with(handle(raw), |members: &mut GroupMembers| {
        members.state().needs_push()
    })?)
}

// --- JNI symbols ---

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_GroupMembersConfig_nativeCreate(
    mut env: JNIEnv,
    _class: JClass,
) -> jlong {
    ffi_call(&mut env, "GroupMembersConfig.nativeCreate", 0, |_| {
        create(ConfigRegistry::global())
    })
}

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_GroupMembersConfig_nativeFree(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
) {
    ffi_call(&mut env, "GroupMembersConfig.nativeFree", (), |_| {
        free(ConfigRegistry::global(), handle)
    })
}

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_GroupMembersConfig_get<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    handle: jlong,
    session_id: JObject<'local>,
) -> jobject {
    ffi_object(&mut env, "GroupMembersConfig.get", |env| {
        get(env, config::classes(), ConfigRegistry::global(), handle, &session_id)
    })
}

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_GroupMembersConfig_getOrConstruct<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    handle: jlong,
    session_id: JObject<'local>,
) -> jobject {
    ffi_object(&mut env, "GroupMembersConfig.getOrConstruct", |env| {
        get_or_construct(env, config::classes(), ConfigRegistry::global(), handle, &session_id)
    })
}

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_GroupMembersConfig_set<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    handle: jlong,
    member: JObject<'local>,
) {
    ffi_call(&mut env, "GroupMembersConfig.set", (), |env| {
        set(env, config::classes(), ConfigRegistry::global(), handle, &member)
    })
}

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_GroupMembersConfig_erase<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    handle: jlong,
    session_id: JObject<'local>,
) -> jboolean {
    ffi_call(&mut env, "GroupMembersConfig.erase", JNI_FALSE, |env| {
        erase(env, config::classes(), ConfigRegistry::global(), handle, &session_id)
            .map(jboolean::from)
    })
}

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_GroupMembersConfig_all(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
) -> jobject {
    ffi_object(&mut env, "GroupMembersConfig.all", |env| {
        all(env, config::classes(), ConfigRegistry::global(), handle)
    })
}

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_GroupMembersConfig_size(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
) -> jlong {
    ffi_call(&mut env, "GroupMembersConfig.size", 0, |_| {
        size(ConfigRegistry::global(), handle)
    })
}

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_GroupMembersConfig_needsPush(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
) -> jboolean {
    ffi_call(&mut env, "GroupMembersConfig.needsPush", JNI_FALSE, |_| {
        needs_push(ConfigRegistry::global(), handle).map(jboolean::from)
    })
}

#[cfg(test)]
mod tests {
    use session_shared::{GroupMember, IdPrefix, MemberStatus, SessionId};

    use super::*;
    use crate::heap::{HeapRef, ManagedHeap};

    fn setup() -> (ManagedHeap, ClassNames, ConfigRegistry, jlong) {
        let classes = ClassNames::default();
        let heap = ManagedHeap::with_session_classes(&classes);
        let registry = ConfigRegistry::new();
        let raw = create(&registry).unwrap();
        (heap, classes, registry, raw)
    }

    fn id(byte: u8) -> SessionId {
        SessionId::new(IdPrefix::Standard, [byte; 32])
    }

    #[test]
    fn test_get_missing_is_null() {
        let (mut heap, classes, registry, raw) = setup();

        let key = heap.make_string(&id(1).to_hex()).unwrap();
        let out = get(&mut heap, &classes, &registry, raw, &key).unwrap();
        assert_eq!(out, HeapRef::NULL);
    }

    #[test]
    fn test_get_or_construct_does_not_insert() {
        let (mut heap, classes, registry, raw) = setup();

        let key = heap.make_string(&id(1).to_hex()).unwrap();
        let out = get_or_construct(&mut heap, &classes, &registry, raw, &key).unwrap();
        let member = Marshaler::new(&mut heap, &classes)
            .deserialize_group_member(&out)
            .unwrap();
        assert_eq!(member, GroupMember::new(id(1)).unwrap());
        assert_eq!(size(&registry, raw).unwrap(), 0);
        assert!(!needs_push(&registry, raw).unwrap());
    }

    #[test]
    fn test_set_get_erase() {
        let (mut heap, classes, registry, raw) = setup();

        let mut member = GroupMember::new(id(7)).unwrap();
        member.set_name(Some("Bob".to_string())).unwrap();
        member.set_invited(false);
        let obj = Marshaler::new(&mut heap, &classes)
            .serialize_group_member(&member)
            .unwrap();
        set(&mut heap, &classes, &registry, raw, &obj).unwrap();
        assert_eq!(size(&registry, raw).unwrap(), 1);
        assert!(needs_push(&registry, raw).unwrap());

        let key = heap.make_string(&id(7).to_hex()).unwrap();
        let out = get(&mut heap, &classes, &registry, raw, &key).unwrap();
        let stored = Marshaler::new(&mut heap, &classes)
            .deserialize_group_member(&out)
            .unwrap();
        assert_eq!(stored, member);
        assert_eq!(stored.invite_status, MemberStatus::Sent);

        assert!(erase(&mut heap, &classes, &registry, raw, &key).unwrap());
        assert!(!erase(&mut heap, &classes, &registry, raw, &key).unwrap());
        assert_eq!(size(&registry, raw).unwrap(), 0);
    }

    #[test]
    fn test_all_members() {
        let (mut heap, classes, registry, raw) = setup();

        for byte in [9u8, 2, 5] {
            let member = GroupMember::new(id(byte)).unwrap();
            let obj = Marshaler::new(&mut heap, &classes)
                .serialize_group_member(&member)
                .unwrap();
            set(&mut heap, &classes, &registry, raw, &obj).unwrap();
        }

        let array = all(&mut heap, &classes, &registry, raw).unwrap();
        let items = heap.array_items(array).unwrap();
        let mut m = Marshaler::new(&mut heap, &classes);
        let ids: Vec<SessionId> = items
            .iter()
            .map(|obj| m.deserialize_group_member(obj).unwrap().session_id().clone())
            .collect();
        assert_eq!(ids, vec![id(2), id(5), id(9)]);
    }

    #[test]
    fn test_malformed_id_rejected() {
        let (mut heap, classes, registry, raw) = setup();

        let key = heap.make_string("05abc").unwrap();
        let err = get(&mut heap, &classes, &registry, raw, &key).unwrap_err();
        assert!(err.is_format());
        assert_eq!(err.exception_class(), "java/lang/IllegalArgumentException");

        let err = erase(&mut heap, &classes, &registry, raw, &HeapRef::NULL).unwrap_err();
        assert_eq!(err.exception_class(), "java/lang/NullPointerException");
    }

    #[test]
    fn test_wrong_config_kind() {
        let (mut heap, classes, registry, _) = setup();
        let info = super::super::group_info::create(&registry).unwrap();

        let key = heap.make_string(&id(1).to_hex()).unwrap();
        let err = get(&mut heap, &classes, &registry, info, &key).unwrap_err();
        assert_eq!(err.exception_class(), "java/lang/IllegalStateException");
    }
}
