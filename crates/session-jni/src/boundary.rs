//! The managed-runtime operations the marshaler is written against.
//!
//! [`BoundaryEnv`] is implemented for `jni::JNIEnv` (see `env.rs`) and for
//! the in-memory `ManagedHeap` (`testing` feature). Class names are
//! JNI internal names (`java/lang/String`), signatures are JNI descriptors.

use crate::error::BoundaryError;

pub const LONG_CLASS: &str = "java/lang/Long";
pub const STRING_CLASS: &str = "java/lang/String";
pub const STRING_SIG: &str = "Ljava/lang/String;";
pub const BYTE_ARRAY_SIG: &str = "[B";

/// A constructor argument.
pub enum Arg<'a, O> {
    Object(&'a O),
    Long(i64),
    Int(i32),
    Bool(bool),
}

pub trait BoundaryEnv {
    /// A (local) reference to a managed object; may be null.
    type Object;

    fn null(&self) -> Self::Object;

    fn is_null(&self, obj: &Self::Object) -> bool;

    fn make_byte_array(&mut self, bytes: &[u8]) -> Result<Self::Object, BoundaryError>;

    fn read_byte_array(&mut self, array: &Self::Object) -> Result<Vec<u8>, BoundaryError>;

    fn make_string(&mut self, text: &str) -> Result<Self::Object, BoundaryError>;

    /// Contents of a `java.lang.String`.
    ///
    /// Returns `Ok(None)` when the string holds an unpaired UTF-16
    /// surrogate and so has no UTF-8 form.
    fn read_string(&mut self, string: &Self::Object) -> Result<Option<String>, BoundaryError>;

    fn construct(
        &mut self,
        class: &str,
        ctor_sig: &str,
        args: &[Arg<'_, Self::Object>],
    ) -> Result<Self::Object, BoundaryError>;

    fn static_object_field(
        &mut self,
        class: &str,
        name: &str,
        sig: &str,
    ) -> Result<Self::Object, BoundaryError>;

    fn object_field(
        &mut self,
        obj: &Self::Object,
        name: &str,
        sig: &str,
    ) -> Result<Self::Object, BoundaryError>;

    fn long_field(&mut self, obj: &Self::Object, name: &str) -> Result<i64, BoundaryError>;

    fn int_field(&mut self, obj: &Self::Object, name: &str) -> Result<i32, BoundaryError>;

    fn bool_field(&mut self, obj: &Self::Object, name: &str) -> Result<bool, BoundaryError>;

    fn instance_of(&mut self, obj: &Self::Object, class: &str) -> Result<bool, BoundaryError>;

    fn make_object_array(
        &mut self,
        class: &str,
        items: &[Self::Object],
    ) -> Result<Self::Object, BoundaryError>;

    /// Release a local reference early. Long loops over config contents
    /// would otherwise exhaust the JNI local reference table.
    fn release(&mut self, _obj: Self::Object) -> Result<(), BoundaryError> {
        Ok(())
    }

    /// `java.lang.Long` holding `value`.
    fn box_long(&mut self, value: i64) -> Result<Self::Object, BoundaryError> {
        self.construct(LONG_CLASS, "(J)V", &[Arg::Long(value)])
    }

    /// Value of a `java.lang.Long`.
    fn unbox_long(&mut self, boxed: &Self::Object) -> Result<i64, BoundaryError> {
        self.long_field(boxed, "value")
    }
}
