//! `network.loki.messenger.libsession_util.GroupInfoConfig`

use jni::objects::{JClass, JObject};
use jni::sys::{jboolean, jlong, jobject, JNI_FALSE};
use jni::JNIEnv;
use session_config::{ConfigRegistry, GroupInfo};

use super::{ffi_call, ffi_object, handle};
use crate::boundary::BoundaryEnv;
use crate::config::{self, ClassNames};
use crate::error::Result;
use crate::marshal::Marshaler;

pub fn create(registry: &ConfigRegistry) -> Result<jlong> {
    let handle = registry.insert(GroupInfo::new())?;
    Ok(handle.raw() as jlong)
}

pub fn free(registry: &ConfigRegistry, raw: jlong) -> Result<()> {
    registry.remove(handle(raw))?;
    Ok(())
}

pub fn get_name<E: BoundaryEnv>(
    env: &mut E,
    classes: &ClassNames,
    registry: &ConfigRegistry,
    raw: jlong,
) -> Result<E::Object> {
    let name = registry.with(handle(raw), |info: &mut GroupInfo| info.name().map(str::to_owned))?;
    Marshaler::new(env, classes).optional_text_to_boundary(name.as_deref())
}

pub fn set_name<E: BoundaryEnv>(
    env: &mut E,
    classes: &ClassNames,
    registry: &ConfigRegistry,
    raw: jlong,
    name: &E::Object,
) -> Result<()> {
    let name = Marshaler::new(env, classes).optional_text_from_boundary(name)?;
    registry.with(handle(raw), |info: &mut GroupInfo| info.set_name(name))??;
    Ok(())
}

pub fn get_description<E: BoundaryEnv>(
    env: &mut E,
    classes: &ClassNames,
    registry: &ConfigRegistry,
    raw: jlong,
) -> Result<E::Object> {
    let description = registry.with(handle(raw), |info: &mut GroupInfo| {
        info.description().map(str::to_owned)
    })?;
    Marshaler::new(env, classes).optional_text_to_boundary(description.as_deref())
}

pub fn set_description<E: BoundaryEnv>(
    env: &mut E,
    classes: &ClassNames,
    registry: &ConfigRegistry,
    raw: jlong,
    description: &E::Object,
) -> Result<()> {
    let description = Marshaler::new(env, classes).optional_text_from_boundary(description)?;
    registry.with(handle(raw), |info: &mut GroupInfo| info.set_description(description))??;
    Ok(())
}

pub fn get_profile_pic<E: BoundaryEnv>(
    env: &mut E,
    classes: &ClassNames,
    registry: &ConfigRegistry,
    raw: jlong,
) -> Result<E::Object> {
    let pic = registry.with(handle(raw), |info: &mut GroupInfo| info.profile_pic().cloned())?;
    Marshaler::new(env, classes).serialize_user_pic(pic.as_ref())
}

pub fn set_profile_pic<E: BoundaryEnv>(
    env: &mut E,
    classes: &ClassNames,
    registry: &ConfigRegistry,
    raw: jlong,
    pic: &E::Object,
) -> Result<()> {
    let pic = Marshaler::new(env, classes).deserialize_user_pic(pic)?;
    registry.with(handle(raw), |info: &mut GroupInfo| info.set_profile_pic(pic))?;
    Ok(())
}

pub fn get_expiry_timer<E: BoundaryEnv>(
    env: &mut E,
    classes: &ClassNames,
    registry: &ConfigRegistry,
    raw: jlong,
) -> Result<E::Object> {
    let expiry = registry.with(handle(raw), |info: &mut GroupInfo| info.expiry_timer())?;
    Marshaler::new(env, classes).serialize_expiry(&expiry)
}

pub fn set_expiry_timer<E: BoundaryEnv>(
    env: &mut E,
    classes: &ClassNames,
    registry: &ConfigRegistry,
    raw: jlong,
    expiry: &E::Object,
) -> Result<()> {
    let expiry = Marshaler::new(env, classes).deserialize_expiry(expiry)?;
    registry.with(handle(raw), |info: &mut GroupInfo| info.set_expiry_timer(expiry))?;
    Ok(())
}

/// Which optional timestamp an accessor targets.
#[derive(Debug, Clone, Copy)]
pub enum Timestamp {
    Created,
    DeleteBefore,
    DeleteAttachmentsBefore,
}

impl Timestamp {
    fn get(self, info: &GroupInfo) -> Option<i64> {
        match self {
            Timestamp::Created => info.created(),
            Timestamp::DeleteBefore => info.delete_before(),
            Timestamp::DeleteAttachmentsBefore => info.delete_attach_before(),
        }
    }

    fn set(self, info: &mut GroupInfo, value: Option<i64>) {
        match self {
            Timestamp::Created => info.set_created(value),
            Timestamp::DeleteBefore => info.set_delete_before(value),
            Timestamp::DeleteAttachmentsBefore => info.set_delete_attach_before(value),
        }
    }
}

pub fn get_timestamp<E: BoundaryEnv>(
    env: &mut E,
    classes: &ClassNames,
    registry: &ConfigRegistry,
    raw: jlong,
    which: Timestamp,
) -> Result<E::Object> {
    let value = registry.with(handle(raw), |info: &mut GroupInfo| which.get(info))?;
    Marshaler::new(env, classes).optional_long_to_boundary(value)
}

pub fn set_timestamp<E: BoundaryEnv>(
    env: &mut E,
    classes: &ClassNames,
    registry: &ConfigRegistry,
    raw: jlong,
    which: Timestamp,
    value: &E::Object,
) -> Result<()> {
    let value = Marshaler::new(env, classes).optional_long_from_boundary(value)?;
    registry.with(handle(raw), |info: &mut GroupInfo| which.set(info, value))?;
    Ok(())
}

pub fn is_destroyed(registry: &ConfigRegistry, raw: jlong) -> Result<bool> {
    Ok(registry.with(handle(raw), |info: &mut GroupInfo| info.is_destroyed())?)
}

pub fn destroy_group(registry: &ConfigRegistry, raw: jlong) -> Result<()> {
    registry.with(handle(raw), |info: &mut GroupInfo| info.destroy_group())?;
    Ok(())
}

pub fn needs_push(registry: &ConfigRegistry, raw: jlong) -> Result<bool> {
    Ok(registry.with(handle(raw), |info: &mut GroupInfo| info.state().needs_push())?)
}

pub fn push(registry: &ConfigRegistry, raw: jlong) -> Result<jlong> {
    Ok(registry.with(handle(raw), |info: &mut GroupInfo| info.state_mut().push())?)
}

pub fn confirm_pushed(registry: &ConfigRegistry, raw: jlong, seqno: jlong) -> Result<()> {
    registry.with(handle(raw), |info: &mut GroupInfo| {
        info.state_mut().confirm_pushed(seqno)
    })?;
    Ok(())
}

// --- JNI symbols ---

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_GroupInfoConfig_nativeCreate(
    mut env: JNIEnv,
    _class: JClass,
) -> jlong {
    ffi_call(&mut env, "GroupInfoConfig.nativeCreate", 0, |_| {
        create(ConfigRegistry::global())
    })
}

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_GroupInfoConfig_nativeFree(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
) {
    ffi_call(&mut env, "GroupInfoConfig.nativeFree", (), |_| {
        free(ConfigRegistry::global(), handle)
    })
}

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_GroupInfoConfig_getName(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
) -> jobject {
    ffi_object(&mut env, "GroupInfoConfig.getName", |env| {
        get_name(env, config::classes(), ConfigRegistry::global(), handle)
    })
}

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_GroupInfoConfig_setName<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    handle: jlong,
    name: JObject<'local>,
) {
    ffi_call(&mut env, "GroupInfoConfig.setName", (), |env| {
        set_name(env, config::classes(), ConfigRegistry::global(), handle, &name)
    })
}

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_GroupInfoConfig_getDescription(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
) -> jobject {
    ffi_object(&mut env, "GroupInfoConfig.getDescription", |env| {
        get_description(env, config::classes(), ConfigRegistry::global(), handle)
    })
}

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_GroupInfoConfig_setDescription<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    handle: jlong,
    description: JObject<'local>,
) {
    ffi_call(&mut env, "GroupInfoConfig.setDescription", (), |env| {
        set_description(env, config::classes(), ConfigRegistry::global(), handle, &description)
    })
}

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_GroupInfoConfig_getProfilePic(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
) -> jobject {
    ffi_object(&mut env, "GroupInfoConfig.getProfilePic", |env| {
        get_profile_pic(env, config::classes(), ConfigRegistry::global(), handle)
    })
}

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_GroupInfoConfig_setProfilePic<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    handle: jlong,
    pic: JObject<'local>,
) {
    ffi_call(&mut env, "GroupInfoConfig.setProfilePic", (), |env| {
        set_profile_pic(env, config::classes(), ConfigRegistry::global(), handle, &pic)
    })
}

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_GroupInfoConfig_getExpiryTimer(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
) -> jobject {
    ffi_object(&mut env, "GroupInfoConfig.getExpiryTimer", |env| {
        get_expiry_timer(env, config::classes(), ConfigRegistry::global(), handle)
    })
}

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_GroupInfoConfig_setExpiryTimer<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    handle: jlong,
    expiry: JObject<'local>,
) {
    ffi_call(&mut env, "GroupInfoConfig.setExpiryTimer", (), |env| {
        set_expiry_timer(env, config::classes(), ConfigRegistry::global(), handle, &expiry)
    })
}

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_GroupInfoConfig_getCreated(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
) -> jobject {
    ffi_object(&mut env, "GroupInfoConfig.getCreated", |env| {
        get_timestamp(env, config::classes(), ConfigRegistry::global(), handle, Timestamp::Created)
    })
}

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_GroupInfoConfig_setCreated<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    handle: jlong,
    created: JObject<'local>,
) {
    ffi_call(&mut env, "GroupInfoConfig.setCreated", (), |env| {
        let registry = ConfigRegistry::global();
        set_timestamp(env, config::classes(), registry, handle, Timestamp::Created, &created)
    })
}

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_GroupInfoConfig_getDeleteBefore(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
) -> jobject {
    ffi_object(&mut env, "GroupInfoConfig.getDeleteBefore", |env| {
        let registry = ConfigRegistry::global();
        get_timestamp(env, config::classes(), registry, handle, Timestamp::DeleteBefore)
    })
}

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_GroupInfoConfig_setDeleteBefore<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    handle: jlong,
    timestamp: JObject<'local>,
) {
    ffi_call(&mut env, "GroupInfoConfig.setDeleteBefore", (), |env| {
        let registry = ConfigRegistry::global();
        set_timestamp(env, config::classes(), registry, handle, Timestamp::DeleteBefore, &timestamp)
    })
}

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_GroupInfoConfig_getDeleteAttachmentsBefore(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
) -> jobject {
    ffi_object(&mut env, "GroupInfoConfig.getDeleteAttachmentsBefore", |env| {
        let registry = ConfigRegistry::global();
        let which = Timestamp::DeleteAttachmentsBefore;
        get_timestamp(env, config::classes(), registry, handle, which)
    })
}

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_GroupInfoConfig_setDeleteAttachmentsBefore<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    handle: jlong,
    timestamp: JObject<'local>,
) {
    ffi_call(&mut env, "GroupInfoConfig.setDeleteAttachmentsBefore", (), |env| {
        let registry = ConfigRegistry::global();
        let which = Timestamp::DeleteAttachmentsBefore;
        set_timestamp(env, config::classes(), registry, handle, which, &timestamp)
    })
}

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_GroupInfoConfig_isDestroyed(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
) -> jboolean {
    ffi_call(&mut env, "GroupInfoConfig.isDestroyed", JNI_FALSE, |_| {
        is_destroyed(ConfigRegistry::global(), handle).map(jboolean::from)
    })
}

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_GroupInfoConfig_destroyGroup(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
) {
    ffi_call(&mut env, "GroupInfoConfig.destroyGroup", (), |_| {
        destroy_group(ConfigRegistry::global(), handle)
    })
}

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_GroupInfoConfig_needsPush(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
) -> jboolean {
    ffi_call(&mut env, "GroupInfoConfig.needsPush", JNI_FALSE, |_| {
        needs_push(ConfigRegistry::global(), handle).map(jboolean::from)
    })
}

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_GroupInfoConfig_push(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
) -> jlong {
    ffi_call(&mut env, "GroupInfoConfig.push", 0, |_| {
        push(ConfigRegistry::global(), handle)
    })
}

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_GroupInfoConfig_confirmPushed(
    mut env: JNIEnv,
    _class: JClass,
    handle: jlong,
    seqno: jlong,
) {
    ffi_call(&mut env, "GroupInfoConfig.confirmPushed", (), |_| {
        confirm_pushed(ConfigRegistry::global(), handle, seqno)
    })
}
