//! `extern "system"` entry points called by the Kotlin wrappers.
//!
//! Each export is a thin shim over a body generic in [`BoundaryEnv`]:
//! unmarshal the arguments, make one [`ConfigRegistry::with`] call that
//! produces owned values, then marshal the results. The config lock is
//! therefore never held while the JVM is being called.
//!
//! [`BoundaryEnv`]: crate::boundary::BoundaryEnv
//! [`ConfigRegistry::with`]: session_config::ConfigRegistry::with

pub mod group_info;
pub mod group_members;
pub mod user_groups;
pub mod util;

use std::panic::{catch_unwind, AssertUnwindSafe};

use jni::objects::JObject;
use jni::sys::{jlong, jobject};
use jni::JNIEnv;
use session_config::ConfigHandle;

use crate::error::{BridgeError, Result};

const PANIC_EXCEPTION: &str = "java/lang/IllegalStateException";

pub(crate) fn handle(raw: jlong) -> ConfigHandle {
    ConfigHandle::from_raw(raw as u64)
}

/// Run an export body, turning errors and panics into Java exceptions.
///
/// On failure `fallback` is returned to the JVM, which discards it because
/// an exception is pending.
pub(crate) fn ffi_call<'local, T>(
    env: &mut JNIEnv<'local>,
    op: &'static str,
    fallback: T,
    body: impl FnOnce(&mut JNIEnv<'local>) -> Result<T>,
) -> T {
    match catch_unwind(AssertUnwindSafe(|| body(&mut *env))) {
        Ok(Ok(value)) => value,
        Ok(Err(err)) => {
            tracing::warn!(op, error = %err, "native call failed");
            throw(env, &err);
            fallback
        }
        Err(_) => {
            tracing::error!(op, "panic in native call");
            if !env.exception_check().unwrap_or(true) {
                if let Err(e) = env.throw_new(PANIC_EXCEPTION, format!("panic in {op}")) {
                    tracing::error!(op, error = %e, "failed to raise Java exception");
                }
            }
            fallback
        }
    }
}

/// Same as [`ffi_call`] for bodies returning an object reference.
pub(crate) fn ffi_object<'local>(
    env: &mut JNIEnv<'local>,
    op: &'static str,
    body: impl FnOnce(&mut JNIEnv<'local>) -> Result<JObject<'local>>,
) -> jobject {
    ffi_call(env, op, std::ptr::null_mut(), |env| {
        body(env).map(JObject::into_raw)
    })
}

fn throw(env: &mut JNIEnv<'_>, err: &BridgeError) {
    // A pending exception already describes the failure.
    if env.exception_check().unwrap_or(true) {
        return;
    }
    if let Err(e) = env.throw_new(err.exception_class(), err.to_string()) {
        tracing::error!(error = %e, "failed to raise Java exception");
    }
}
