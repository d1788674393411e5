//! In-memory managed heap.
//!
//! [`ManagedHeap`] implements [`BoundaryEnv`] without a JVM so the marshaler
//! and the export bodies can be exercised on the host. It behaves like the
//! JVM where the marshaler can observe a difference: strings are UTF-16,
//! constructors are looked up by descriptor, fields by name and signature,
//! `instance_of` follows superclasses and is true for null, and object arrays
//! reject elements of the wrong class.

use std::collections::HashMap;

use crate::boundary::{Arg, BoundaryEnv, BYTE_ARRAY_SIG, LONG_CLASS, STRING_CLASS, STRING_SIG};
use crate::config::ClassNames;
use crate::error::BoundaryError;

const OBJECT_CLASS: &str = "java/lang/Object";

/// Reference into a [`ManagedHeap`]. `HeapRef::NULL` is the null reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeapRef(Option<usize>);

impl HeapRef {
    pub const NULL: HeapRef = HeapRef(None);
}

/// A field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Object(HeapRef),
    Long(i64),
    Int(i32),
    Bool(bool),
}

impl Slot {
    fn zero(sig: &str) -> Slot {
        match sig {
            "J" => Slot::Long(0),
            "I" => Slot::Int(0),
            "Z" => Slot::Bool(false),
            _ => Slot::Object(HeapRef::NULL),
        }
    }
}

#[derive(Debug)]
enum Value {
    ByteArray(Vec<u8>),
    Str(Vec<u16>),
    Instance {
        class: String,
        fields: HashMap<String, Slot>,
    },
    Array {
        element: String,
        items: Vec<HeapRef>,
    },
}

#[derive(Debug, Default)]
struct ClassDef {
    superclass: Option<String>,
    /// Declared fields as `(name, signature)`.
    fields: Vec<(String, String)>,
    /// Fields assigned by the constructor, in parameter order.
    constructor: Option<Vec<String>>,
    statics: HashMap<String, (String, HeapRef)>,
}

#[derive(Debug, Default)]
pub struct ManagedHeap {
    objects: Vec<Value>,
    classes: HashMap<String, ClassDef>,
}

impl ManagedHeap {
    /// A heap with only `java/lang/Long` defined.
    pub fn new() -> Self {
        let mut heap = Self::default();
        heap.define_class(LONG_CLASS, None, &[("value", "J")], Some(&["value"][..]));
        heap
    }

    /// A heap with every session boundary class defined under `classes`.
    pub fn with_session_classes(classes: &ClassNames) -> Self {
        let mut heap = Self::new();
        let user_pic_sig = ClassNames::descriptor(&classes.user_pic);

        heap.define_class(
            &classes.user_pic,
            None,
            &[("url", STRING_SIG), ("key", BYTE_ARRAY_SIG)],
            Some(&["url", "key"][..]),
        );
        heap.define_class(
            &classes.base_community,
            None,
            &[("baseUrl", STRING_SIG), ("room", STRING_SIG), ("pubKeyHex", STRING_SIG)],
            Some(&["baseUrl", "room", "pubKeyHex"][..]),
        );

        heap.define_class(&classes.expiry_mode, None, &[("expiryMillis", "J")], None);
        for sub in [&classes.expiry_after_send, &classes.expiry_after_read] {
            heap.define_class(
                sub,
                Some(classes.expiry_mode.as_str()),
                &[],
                Some(&["expiryMillis"][..]),
            );
        }
        heap.define_class(&classes.expiry_none, Some(classes.expiry_mode.as_str()), &[], None);
        let none = heap.alloc(Value::Instance {
            class: classes.expiry_none.clone(),
            fields: HashMap::from([("expiryMillis".to_string(), Slot::Long(0))]),
        });
        heap.define_static(
            &classes.expiry_none,
            "INSTANCE",
            &ClassNames::descriptor(&classes.expiry_none),
            none,
        );

        let member_fields = [
            ("sessionId", STRING_SIG),
            ("name", STRING_SIG),
            ("profilePic", user_pic_sig.as_str()),
            ("admin", "Z"),
            ("inviteStatus", "I"),
            ("promotionStatus", "I"),
            ("removedStatus", "I"),
            ("supplement", "Z"),
        ];
        let member_ctor: Vec<&str> = member_fields.iter().map(|(name, _)| *name).collect();
        heap.define_class(&classes.group_member, None, &member_fields, Some(member_ctor.as_slice()));

        heap.define_class(
            &classes.account_id,
            None,
            &[("hexString", STRING_SIG)],
            Some(&["hexString"][..]),
        );
        heap
    }

    /// Define a class. `constructor` lists the fields its constructor
    /// assigns, in parameter order; `None` makes it non-constructible.
    pub fn define_class(
        &mut self,
        name: &str,
        superclass: Option<&str>,
        fields: &[(&str, &str)],
        constructor: Option<&[&str]>,
    ) {
        self.classes.insert(
            name.to_string(),
            ClassDef {
                superclass: superclass.map(str::to_string),
                fields: fields
                    .iter()
                    .map(|(n, s)| (n.to_string(), s.to_string()))
                    .collect(),
                constructor: constructor.map(|c| c.iter().map(|f| f.to_string()).collect()),
                statics: HashMap::new(),
            },
        );
    }

    pub fn define_static(&mut self, class: &str, name: &str, sig: &str, value: HeapRef) {
        if let Some(def) = self.classes.get_mut(class) {
            def.statics.insert(name.to_string(), (sig.to_string(), value));
        }
    }

    /// A string from raw UTF-16 code units, which may be ill-formed.
    pub fn string_from_utf16(&mut self, units: &[u16]) -> HeapRef {
        self.alloc(Value::Str(units.to_vec()))
    }

    /// Build an instance field by field, bypassing the constructor.
    pub fn instantiate(&mut self, class: &str, fields: &[(&str, Slot)]) -> Result<HeapRef, BoundaryError> {
        let mut slots = self.zeroed_fields(class)?;
        for (name, slot) in fields {
            slots.insert(name.to_string(), *slot);
        }
        Ok(self.alloc(Value::Instance {
            class: class.to_string(),
            fields: slots,
        }))
    }

    /// Class of a live object, `None` for null.
    pub fn class_of(&self, obj: HeapRef) -> Option<&str> {
        match self.get(obj).ok()? {
            Value::ByteArray(_) => Some(BYTE_ARRAY_SIG),
            Value::Str(_) => Some(STRING_CLASS),
            Value::Instance { class, .. } => Some(class.as_str()),
            Value::Array { .. } => Some("[Ljava/lang/Object;"),
        }
    }

    /// Elements of an object array.
    pub fn array_items(&self, array: HeapRef) -> Result<Vec<HeapRef>, BoundaryError> {
        match self.get(array)? {
            Value::Array { items, .. } => Ok(items.clone()),
            _ => Err(BoundaryError::InvalidReference),
        }
    }

    fn alloc(&mut self, value: Value) -> HeapRef {
        self.objects.push(value);
        HeapRef(Some(self.objects.len() - 1))
    }

    fn get(&self, obj: HeapRef) -> Result<&Value, BoundaryError> {
        obj.0
            .and_then(|i| self.objects.get(i))
            .ok_or(BoundaryError::InvalidReference)
    }

    fn class(&self, name: &str) -> Result<&ClassDef, BoundaryError> {
        self.classes
            .get(name)
            .ok_or_else(|| BoundaryError::NoSuchClass(name.to_string()))
    }

    /// Field signature, searching superclasses.
    fn field_sig(&self, class: &str, name: &str) -> Option<&str> {
        let mut current = Some(class);
        while let Some(c) = current {
            let def = self.classes.get(c)?;
            if let Some((_, sig)) = def.fields.iter().find(|(n, _)| n == name) {
                return Some(sig);
            }
            current = def.superclass.as_deref();
        }
        None
    }

    fn zeroed_fields(&self, class: &str) -> Result<HashMap<String, Slot>, BoundaryError> {
        self.class(class)?;
        let mut fields = HashMap::new();
        let mut current = Some(class);
        while let Some(c) = current {
            let def = self.class(c)?;
            for (name, sig) in &def.fields {
                fields.entry(name.clone()).or_insert(Slot::zero(sig));
            }
            current = def.superclass.as_deref();
        }
        Ok(fields)
    }

    fn is_subclass(&self, class: &str, target: &str) -> bool {
        let mut current = Some(class);
        while let Some(c) = current {
            if c == target {
                return true;
            }
            current = self.classes.get(c).and_then(|d| d.superclass.as_deref());
        }
        false
    }

    fn conforms(&self, obj: HeapRef, class: &str) -> Result<bool, BoundaryError> {
        if obj.0.is_none() || class == OBJECT_CLASS {
            return Ok(true);
        }
        Ok(match self.get(obj)? {
            Value::ByteArray(_) => class == BYTE_ARRAY_SIG,
            Value::Str(_) => class == STRING_CLASS,
            Value::Instance { class: actual, .. } => self.is_subclass(actual, class),
            Value::Array { element, .. } => class.strip_prefix("[L").and_then(|c| c.strip_suffix(';'))
                == Some(element.as_str()),
        })
    }

    /// Whether `slot` is assignable to a field of signature `sig`.
    fn accepts(&self, sig: &str, slot: &Slot) -> Result<bool, BoundaryError> {
        Ok(match (sig, slot) {
            ("J", Slot::Long(_)) | ("I", Slot::Int(_)) | ("Z", Slot::Bool(_)) => true,
            (BYTE_ARRAY_SIG, Slot::Object(obj)) => self.conforms(*obj, BYTE_ARRAY_SIG)?,
            (sig, Slot::Object(obj)) => match sig.strip_prefix('L').and_then(|s| s.strip_suffix(';')) {
                Some(class) => self.conforms(*obj, class)?,
                None => false,
            },
            _ => false,
        })
    }

    fn field(&self, obj: HeapRef, name: &str, sig: &str) -> Result<Slot, BoundaryError> {
        let Value::Instance { class, fields } = self.get(obj)? else {
            return Err(BoundaryError::InvalidReference);
        };
        let no_field = || BoundaryError::NoSuchField {
            class: class.clone(),
            name: name.to_string(),
            signature: sig.to_string(),
        };
        if self.field_sig(class, name) != Some(sig) {
            return Err(no_field());
        }
        fields.get(name).copied().ok_or_else(no_field)
    }
}

impl BoundaryEnv for ManagedHeap {
    type Object = HeapRef;

    fn null(&self) -> HeapRef {
        HeapRef::NULL
    }

    fn is_null(&self, obj: &HeapRef) -> bool {
        obj.0.is_none()
    }

    fn make_byte_array(&mut self, bytes: &[u8]) -> Result<HeapRef, BoundaryError> {
        Ok(self.alloc(Value::ByteArray(bytes.to_vec())))
    }

    fn read_byte_array(&mut self, array: &HeapRef) -> Result<Vec<u8>, BoundaryError> {
        match self.get(*array)? {
            Value::ByteArray(bytes) => Ok(bytes.clone()),
            _ => Err(BoundaryError::InvalidReference),
        }
    }

    fn make_string(&mut self, text: &str) -> Result<HeapRef, BoundaryError> {
        Ok(self.alloc(Value::Str(text.encode_utf16().collect())))
    }

    fn read_string(&mut self, string: &HeapRef) -> Result<Option<String>, BoundaryError> {
        match self.get(*string)? {
            Value::Str(units) => Ok(String::from_utf16(units).ok()),
            _ => Err(BoundaryError::InvalidReference),
        }
    }

    fn construct(
        &mut self,
        class: &str,
        ctor_sig: &str,
        args: &[Arg<'_, HeapRef>],
    ) -> Result<HeapRef, BoundaryError> {
        let no_ctor = || BoundaryError::NoSuchConstructor {
            class: class.to_string(),
            signature: ctor_sig.to_string(),
        };
        let params = self.class(class)?.constructor.clone().ok_or_else(no_ctor)?;

        let mut descriptor = String::from("(");
        for param in &params {
            descriptor.push_str(self.field_sig(class, param).ok_or_else(no_ctor)?);
        }
        descriptor.push_str(")V");
        if descriptor != ctor_sig || args.len() != params.len() {
            return Err(no_ctor());
        }

        let mut fields = self.zeroed_fields(class)?;
        for (param, arg) in params.iter().zip(args) {
            let slot = match arg {
                Arg::Object(obj) => Slot::Object(**obj),
                Arg::Long(v) => Slot::Long(*v),
                Arg::Int(v) => Slot::Int(*v),
                Arg::Bool(v) => Slot::Bool(*v),
            };
            let sig = self.field_sig(class, param).ok_or_else(no_ctor)?;
            if !self.accepts(sig, &slot)? {
                return Err(BoundaryError::Jni(format!(
                    "argument for {param} of {class} does not match {sig}"
                )));
            }
            fields.insert(param.clone(), slot);
        }

        Ok(self.alloc(Value::Instance {
            class: class.to_string(),
            fields,
        }))
    }

    fn static_object_field(&mut self, class: &str, name: &str, sig: &str) -> Result<HeapRef, BoundaryError> {
        match self.class(class)?.statics.get(name) {
            Some((s, value)) if s == sig => Ok(*value),
            _ => Err(BoundaryError::NoSuchField {
                class: class.to_string(),
                name: name.to_string(),
                signature: sig.to_string(),
            }),
        }
    }

    fn object_field(&mut self, obj: &HeapRef, name: &str, sig: &str) -> Result<HeapRef, BoundaryError> {
        match self.field(*obj, name, sig)? {
            Slot::Object(value) => Ok(value),
            _ => Err(BoundaryError::InvalidReference),
        }
    }

    fn long_field(&mut self, obj: &HeapRef, name: &str) -> Result<i64, BoundaryError> {
        match self.field(*obj, name, "J")? {
            Slot::Long(v) => Ok(v),
            _ => Err(BoundaryError::InvalidReference),
        }
    }

    fn int_field(&mut self, obj: &HeapRef, name: &str) -> Result<i32, BoundaryError> {
        match self.field(*obj, name, "I")? {
            Slot::Int(v) => Ok(v),
            _ => Err(BoundaryError::InvalidReference),
        }
    }

    fn bool_field(&mut self, obj: &HeapRef, name: &str) -> Result<bool, BoundaryError> {
        match self.field(*obj, name, "Z")? {
            Slot::Bool(v) => Ok(v),
            _ => Err(BoundaryError::InvalidReference),
        }
    }

    fn instance_of(&mut self, obj: &HeapRef, class: &str) -> Result<bool, BoundaryError> {
        self.conforms(*obj, class)
    }

    fn make_object_array(&mut self, class: &str, items: &[HeapRef]) -> Result<HeapRef, BoundaryError> {
        for item in items {
            if !self.conforms(*item, class)? {
                return Err(BoundaryError::Jni(format!("ArrayStoreException: element is not a {class}")));
            }
        }
        Ok(self.alloc(Value::Array {
            element: class.to_string(),
            items: items.to_vec(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strings_are_utf16() {
        let mut heap = ManagedHeap::new();
        let s = heap.make_string("a\u{1F600}").unwrap();
        assert_eq!(heap.read_string(&s).unwrap().as_deref(), Some("a\u{1F600}"));

        let lone = heap.string_from_utf16(&[0x61, 0xD800]);
        assert_eq!(heap.read_string(&lone).unwrap(), None);
    }

    #[test]
    fn test_constructor_descriptor_checked() {
        let mut heap = ManagedHeap::new();
        let boxed = heap.box_long(7).unwrap();
        assert_eq!(heap.unbox_long(&boxed).unwrap(), 7);

        let err = heap.construct(LONG_CLASS, "(I)V", &[Arg::Int(7)]).unwrap_err();
        assert!(matches!(err, BoundaryError::NoSuchConstructor { .. }));
    }

    #[test]
    fn test_instance_of_follows_superclass() {
        let classes = ClassNames::default();
        let mut heap = ManagedHeap::with_session_classes(&classes);
        let sig = ClassNames::descriptor(&classes.expiry_none);
        let none = heap.static_object_field(&classes.expiry_none, "INSTANCE", &sig).unwrap();

        assert!(heap.instance_of(&none, &classes.expiry_mode).unwrap());
        assert!(!heap.instance_of(&none, &classes.expiry_after_read).unwrap());
        assert_eq!(heap.long_field(&none, "expiryMillis").unwrap(), 0);
        assert!(heap.instance_of(&HeapRef::NULL, &classes.user_pic).unwrap());
    }

    #[test]
    fn test_field_signature_mismatch() {
        let classes = ClassNames::default();
        let mut heap = ManagedHeap::with_session_classes(&classes);
        let url = heap.make_string("http://example.org").unwrap();
        let key = heap.make_byte_array(&[0; 32]).unwrap();
        let pic = heap
            .construct(
                &classes.user_pic,
                "(Ljava/lang/String;[B)V",
                &[Arg::Object(&url), Arg::Object(&key)],
            )
            .unwrap();

        assert_eq!(heap.object_field(&pic, "url", STRING_SIG).unwrap(), url);
        assert!(matches!(
            heap.object_field(&pic, "url", BYTE_ARRAY_SIG),
            Err(BoundaryError::NoSuchField { .. })
        ));
    }

    #[test]
    fn test_object_array_rejects_wrong_class() {
        let mut heap = ManagedHeap::new();
        let s = heap.make_string("x").unwrap();
        let boxed = heap.box_long(1).unwrap();

        assert_eq!(heap.class_of(boxed), Some(LONG_CLASS));
        assert_eq!(heap.class_of(HeapRef::NULL), None);

        let array = heap.make_object_array(LONG_CLASS, &[boxed, HeapRef::NULL]).unwrap();
        assert_eq!(heap.array_items(array).unwrap(), vec![boxed, HeapRef::NULL]);
        assert!(heap.make_object_array(LONG_CLASS, &[s]).is_err());
    }
}
