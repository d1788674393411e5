//! Stateless helpers on the value classes. None of these touch the registry.

use jni::objects::{JClass, JObject};
use jni::sys::{jboolean, jobject, JNI_FALSE};
use jni::JNIEnv;
use session_shared::{Community, SessionId};

use super::{ffi_call, ffi_object};
use crate::boundary::BoundaryEnv;
use crate::config::{self, ClassNames};
use crate::error::Result;
use crate::marshal::Marshaler;

/// `BaseCommunityInfo` for a `https://host/room?public_key=...` URL.
pub fn parse_full_url<E: BoundaryEnv>(
    env: &mut E,
    classes: &ClassNames,
    full_url: &E::Object,
) -> Result<E::Object> {
    let mut m = Marshaler::new(env, classes);
    let url = m.text_from_boundary(full_url)?;
    let community = Community::parse_full_url(&url)?;
    m.serialize_community(&community)
}

pub fn full_url<E: BoundaryEnv>(env: &mut E, classes: &ClassNames, info: &E::Object) -> Result<E::Object> {
    let mut m = Marshaler::new(env, classes);
    let community = m.deserialize_community(info)?;
    m.text_to_boundary(&community.full_url())
}

/// Whether `hex` is a well-formed session id. Never fails on bad input.
pub fn is_valid_account_id<E: BoundaryEnv>(env: &mut E, classes: &ClassNames, hex: &E::Object) -> Result<bool> {
    let mut m = Marshaler::new(env, classes);
    match m.optional_text_from_boundary(hex) {
        Ok(Some(text)) => Ok(text.parse::<SessionId>().is_ok()),
        Ok(None) => Ok(false),
        Err(e) if e.is_encoding() => Ok(false),
        Err(e) => Err(e),
    }
}

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_util_BaseCommunityInfo_parseFullUrl<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    full_url: JObject<'local>,
) -> jobject {
    ffi_object(&mut env, "BaseCommunityInfo.parseFullUrl", |env| {
        parse_full_url(env, config::classes(), &full_url)
    })
}

#[no_mangle]
pub extern "system" fn Java_network_loki_messenger_libsession_1util_util_BaseCommunityInfo_fullUrl<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    info: JObject<'local>,
) -> jobject {
    ffi_object(&mut env, "BaseCommunityInfo.fullUrl", |env| {
        full_url(env, config::classes(), &info)
    })
}

#[no_mangle]
pub extern "system" fn Java_org_session_libsignal_utilities_AccountId_isValid<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    hex: JObject<'local>,
) -> jboolean {
    ffi_call(&mut env, "AccountId.isValid", JNI_FALSE, |env| {
        is_valid_account_id(env, config::classes(), &hex).map(jboolean::from)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::{HeapRef, ManagedHeap};

    const PUBKEY: &str = "a03c383cf63c3c4efe67acc52112a6dd734b3a946b9545f488aaa93da7991238";

    #[test]
    fn test_full_url_round_trip() {
        let classes = ClassNames::default();
        let mut heap = ManagedHeap::with_session_classes(&classes);

        let url = format!("https://open.getsession.org/r/session?public_key={PUBKEY}");
        let input = heap.make_string(&url).unwrap();
        let info = parse_full_url(&mut heap, &classes, &input).unwrap();

        let out = full_url(&mut heap, &classes, &info).unwrap();
        assert_eq!(
            heap.read_string(&out).unwrap().unwrap(),
            format!("https://open.getsession.org/session?public_key={PUBKEY}")
        );
    }

    #[test]
    fn test_parse_full_url_rejects_missing_key() {
        let classes = ClassNames::default();
        let mut heap = ManagedHeap::with_session_classes(&classes);

        let input = heap.make_string("https://open.getsession.org/session").unwrap();
        let err = parse_full_url(&mut heap, &classes, &input).unwrap_err();
        assert!(err.is_format());
    }

    #[test]
    fn test_is_valid_account_id() {
        let classes = ClassNames::default();
        let mut heap = ManagedHeap::with_session_classes(&classes);

        let valid = heap.make_string(&format!("05{PUBKEY}")).unwrap();
        let short = heap.make_string("05abcd").unwrap();
        let lone = heap.string_from_utf16(&[0xD800]);

        assert!(is_valid_account_id(&mut heap, &classes, &valid).unwrap());
        assert!(!is_valid_account_id(&mut heap, &classes, &short).unwrap());
        assert!(!is_valid_account_id(&mut heap, &classes, &lone).unwrap());
        assert!(!is_valid_account_id(&mut heap, &classes, &HeapRef::NULL).unwrap());
    }
}
