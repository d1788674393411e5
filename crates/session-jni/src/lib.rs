// JNI marshaling layer between the Android app and the session config objects.

pub mod boundary;
pub mod config;
pub mod env;
pub mod error;
pub mod exports;
#[cfg(any(test, feature = "testing"))]
pub mod heap;
pub mod logging;
pub mod marshal;

use std::ffi::c_void;

use jni::sys::{jint, JavaVM, JNI_VERSION_1_6};

pub use boundary::{Arg, BoundaryEnv};
pub use config::{BridgeConfig, ClassNames};
pub use error::{BoundaryError, BridgeError, Result};
#[cfg(any(test, feature = "testing"))]
pub use heap::{HeapRef, ManagedHeap, Slot};
pub use marshal::Marshaler;

/// Called by the JVM when the library is loaded.
#[no_mangle]
pub extern "system" fn JNI_OnLoad(_vm: *mut JavaVM, _reserved: *mut c_void) -> jint {
    let config = config::install(BridgeConfig::from_env());
    logging::init(config);
    JNI_VERSION_1_6
}
