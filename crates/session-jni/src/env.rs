//! [`BoundaryEnv`] over a live `JNIEnv`.

use jni::objects::{JByteArray, JObject, JString, JValue};
use jni::sys::{jboolean, jsize};
use jni::JNIEnv;

use crate::boundary::{Arg, BoundaryEnv};
use crate::error::BoundaryError;

impl<'local> BoundaryEnv for JNIEnv<'local> {
    type Object = JObject<'local>;

    fn null(&self) -> JObject<'local> {
        JObject::null()
    }

    fn is_null(&self, obj: &JObject<'local>) -> bool {
        obj.is_null()
    }

    fn make_byte_array(&mut self, bytes: &[u8]) -> Result<JObject<'local>, BoundaryError> {
        Ok(self.byte_array_from_slice(bytes)?.into())
    }

    fn read_byte_array(&mut self, array: &JObject<'local>) -> Result<Vec<u8>, BoundaryError> {
        let array: &JByteArray<'local> = array.into();
        Ok(self.convert_byte_array(array)?)
    }

    fn make_string(&mut self, text: &str) -> Result<JObject<'local>, BoundaryError> {
        Ok(JNIEnv::new_string(self, text)?.into())
    }

    fn read_string(&mut self, string: &JObject<'local>) -> Result<Option<String>, BoundaryError> {
        let string: &JString<'local> = string.into();
        let units = utf16_units(self, string)?;
        Ok(String::from_utf16(&units).ok())
    }

    fn construct(
        &mut self,
        class: &str,
        ctor_sig: &str,
        args: &[Arg<'_, JObject<'local>>],
    ) -> Result<JObject<'local>, BoundaryError> {
        let jargs: Vec<JValue<'_, '_>> = args
            .iter()
            .map(|arg| match arg {
                Arg::Object(obj) => JValue::Object(*obj),
                Arg::Long(v) => JValue::Long(*v),
                Arg::Int(v) => JValue::Int(*v),
                Arg::Bool(v) => JValue::Bool(*v as jboolean),
            })
            .collect();
        Ok(self.new_object(class, ctor_sig, &jargs)?)
    }

    fn static_object_field(
        &mut self,
        class: &str,
        name: &str,
        sig: &str,
    ) -> Result<JObject<'local>, BoundaryError> {
        Ok(self.get_static_field(class, name, sig)?.l()?)
    }

    fn object_field(
        &mut self,
        obj: &JObject<'local>,
        name: &str,
        sig: &str,
    ) -> Result<JObject<'local>, BoundaryError> {
        Ok(self.get_field(obj, name, sig)?.l()?)
    }

    fn long_field(&mut self, obj: &JObject<'local>, name: &str) -> Result<i64, BoundaryError> {
        Ok(self.get_field(obj, name, "J")?.j()?)
    }

    fn int_field(&mut self, obj: &JObject<'local>, name: &str) -> Result<i32, BoundaryError> {
        Ok(self.get_field(obj, name, "I")?.i()?)
    }

    fn bool_field(&mut self, obj: &JObject<'local>, name: &str) -> Result<bool, BoundaryError> {
        Ok(self.get_field(obj, name, "Z")?.z()?)
    }

    fn instance_of(&mut self, obj: &JObject<'local>, class: &str) -> Result<bool, BoundaryError> {
        Ok(self.is_instance_of(obj, class)?)
    }

    fn release(&mut self, obj: JObject<'local>) -> Result<(), BoundaryError> {
        Ok(self.delete_local_ref(obj)?)
    }

    fn make_object_array(
        &mut self,
        class: &str,
        items: &[JObject<'local>],
    ) -> Result<JObject<'local>, BoundaryError> {
        let array = self.new_object_array(items.len() as jsize, class, JObject::null())?;
        for (i, item) in items.iter().enumerate() {
            self.set_object_array_element(&array, i as jsize, item)?;
        }
        Ok(array.into())
    }
}

// Raw UTF-16 code units of a Java string. `get_string` would go through
// modified UTF-8 and replace unpaired surrogates silently.
fn utf16_units(env: &mut JNIEnv<'_>, string: &JString<'_>) -> Result<Vec<u16>, BoundaryError> {
    let raw = env.get_raw();
    let missing = || BoundaryError::Jni("JNI function table incomplete".to_string());

    // SAFETY: `raw` is the live env of the current thread and `string` is a
    // valid local reference for the duration of the call.
    let units = unsafe {
        let table = &**raw;
        let get_len = table.GetStringLength.ok_or_else(missing)?;
        let get_region = table.GetStringRegion.ok_or_else(missing)?;

        let len = get_len(raw, string.as_raw());
        let mut units = vec![0u16; len.max(0) as usize];
        get_region(raw, string.as_raw(), 0, len, units.as_mut_ptr());
        units
    };

    if env.exception_check()? {
        return Err(BoundaryError::PendingException);
    }
    Ok(units)
}
