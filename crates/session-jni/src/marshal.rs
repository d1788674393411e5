//! Conversions between native session values and their managed forms.
//!
//! Every method is a pure conversion: nothing here takes the config lock, so
//! conversions can be freely combined and nested inside one export.

use session_shared::{
    Community, ConversionError, EncodingError, ExpirationMode, ExpiryMode, FormatError,
    GroupMember, MemberStatus, ProfilePic, RemovedStatus, SessionId,
};

use crate::boundary::{Arg, BoundaryEnv, BYTE_ARRAY_SIG, LONG_CLASS, STRING_SIG};
use crate::config::ClassNames;
use crate::error::Result;

const EXPIRY_MILLIS: &str = "expiryMillis";

pub struct Marshaler<'a, E: BoundaryEnv> {
    env: &'a mut E,
    classes: &'a ClassNames,
}

impl<'a, E: BoundaryEnv> Marshaler<'a, E> {
    pub fn new(env: &'a mut E, classes: &'a ClassNames) -> Self {
        Self { env, classes }
    }

    pub fn env(&mut self) -> &mut E {
        &mut *self.env
    }

    pub fn classes(&self) -> &ClassNames {
        self.classes
    }

    fn require(&self, obj: &E::Object, what: &'static str) -> Result<()> {
        if self.env.is_null(obj) {
            return Err(ConversionError::NullValue(what).into());
        }
        Ok(())
    }

    fn require_instance(&mut self, obj: &E::Object, class: &str, what: &'static str) -> Result<()> {
        self.require(obj, what)?;
        if !self.env.instance_of(obj, class)? {
            return Err(ConversionError::UnexpectedType {
                expected: class.to_string(),
            }
            .into());
        }
        Ok(())
    }

    // --- bytes ---

    pub fn bytes_to_boundary(&mut self, bytes: &[u8]) -> Result<E::Object> {
        Ok(self.env.make_byte_array(bytes)?)
    }

    /// Copy a `byte[]`. Null is a [`ConversionError`].
    pub fn bytes_from_boundary(&mut self, array: &E::Object) -> Result<Vec<u8>> {
        self.require(array, "byte[]")?;
        Ok(self.env.read_byte_array(array)?)
    }

    pub fn optional_bytes_from_boundary(&mut self, array: &E::Object) -> Result<Option<Vec<u8>>> {
        if self.env.is_null(array) {
            return Ok(None);
        }
        self.bytes_from_boundary(array).map(Some)
    }

    // --- text ---

    pub fn text_from_boundary(&mut self, string: &E::Object) -> Result<String> {
        self.require(string, "String")?;
        match self.env.read_string(string)? {
            Some(text) => Ok(text),
            None => Err(EncodingError::Utf16.into()),
        }
    }

    /// The UTF-8 bytes of a managed string.
    pub fn utf8_from_boundary(&mut self, string: &E::Object) -> Result<Vec<u8>> {
        Ok(self.text_from_boundary(string)?.into_bytes())
    }

    pub fn text_to_boundary(&mut self, text: &str) -> Result<E::Object> {
        Ok(self.env.make_string(text)?)
    }

    /// A managed string from raw bytes, which must be valid UTF-8.
    pub fn utf8_to_boundary(&mut self, bytes: &[u8]) -> Result<E::Object> {
        let text = std::str::from_utf8(bytes).map_err(EncodingError::from)?;
        self.text_to_boundary(text)
    }

    pub fn optional_text_to_boundary(&mut self, text: Option<&str>) -> Result<E::Object> {
        match text {
            Some(text) => self.text_to_boundary(text),
            None => Ok(self.env.null()),
        }
    }

    pub fn optional_text_from_boundary(&mut self, string: &E::Object) -> Result<Option<String>> {
        if self.env.is_null(string) {
            return Ok(None);
        }
        self.text_from_boundary(string).map(Some)
    }

    // --- boxed longs ---

    pub fn optional_long_to_boundary(&mut self, value: Option<i64>) -> Result<E::Object> {
        match value {
            Some(v) => Ok(self.env.box_long(v)?),
            None => Ok(self.env.null()),
        }
    }

    pub fn optional_long_from_boundary(&mut self, boxed: &E::Object) -> Result<Option<i64>> {
        if self.env.is_null(boxed) {
            return Ok(None);
        }
        self.require_instance(boxed, LONG_CLASS, "Long")?;
        Ok(Some(self.env.unbox_long(boxed)?))
    }

    // --- profile pictures ---

    /// `UserPic(url, key)`, or null when there is no picture.
    pub fn serialize_user_pic(&mut self, pic: Option<&ProfilePic>) -> Result<E::Object> {
        let Some(pic) = pic else {
            return Ok(self.env.null());
        };
        let url = self.text_to_boundary(pic.url())?;
        let key = self.bytes_to_boundary(pic.key())?;
        let obj = self.env.construct(
            &self.classes.user_pic,
            &format!("({STRING_SIG}{BYTE_ARRAY_SIG})V"),
            &[Arg::Object(&url), Arg::Object(&key)],
        )?;
        self.env.release(url)?;
        self.env.release(key)?;
        Ok(obj)
    }

    /// Raw `(url, key)` of a `UserPic`; a null picture gives `(None, None)`.
    pub fn user_pic_fields(&mut self, pic: &E::Object) -> Result<(Option<String>, Option<Vec<u8>>)> {
        if self.env.is_null(pic) {
            return Ok((None, None));
        }
        let classes = self.classes;
        self.require_instance(pic, &classes.user_pic, "UserPic")?;

        let url = self.env.object_field(pic, "url", STRING_SIG)?;
        let key = self.env.object_field(pic, "key", BYTE_ARRAY_SIG)?;
        let fields = (
            self.optional_text_from_boundary(&url)?,
            self.optional_bytes_from_boundary(&key)?,
        );
        self.env.release(url)?;
        self.env.release(key)?;
        Ok(fields)
    }

    /// A validated picture. Only a null `UserPic` means no picture; an empty
    /// URL with a key is kept as a value.
    pub fn deserialize_user_pic(&mut self, pic: &E::Object) -> Result<Option<ProfilePic>> {
        match self.user_pic_fields(pic)? {
            (None, None) => Ok(None),
            (Some(url), Some(key)) => Ok(Some(ProfilePic::from_parts(url, &key)?)),
            (None, Some(_)) => Err(ConversionError::NullValue("UserPic.url").into()),
            (Some(_), None) => Err(ConversionError::NullValue("UserPic.key").into()),
        }
    }

    // --- communities ---

    pub fn serialize_community(&mut self, community: &Community) -> Result<E::Object> {
        let base_url = self.text_to_boundary(community.base_url())?;
        let room = self.text_to_boundary(community.room())?;
        let pubkey = self.text_to_boundary(&community.pubkey_hex())?;
        let obj = self.env.construct(
            &self.classes.base_community,
            &format!("({STRING_SIG}{STRING_SIG}{STRING_SIG})V"),
            &[Arg::Object(&base_url), Arg::Object(&room), Arg::Object(&pubkey)],
        )?;
        for local in [base_url, room, pubkey] {
            self.env.release(local)?;
        }
        Ok(obj)
    }

    pub fn deserialize_community(&mut self, info: &E::Object) -> Result<Community> {
        let classes = self.classes;
        self.require_instance(info, &classes.base_community, "BaseCommunityInfo")?;

        let base_url = self.string_field(info, "baseUrl", "BaseCommunityInfo.baseUrl")?;
        let room = self.string_field(info, "room", "BaseCommunityInfo.room")?;
        let pubkey = self.string_field(info, "pubKeyHex", "BaseCommunityInfo.pubKeyHex")?;
        Ok(Community::with_pubkey_hex(&base_url, &room, &pubkey)?)
    }

    fn string_field(&mut self, obj: &E::Object, name: &str, what: &'static str) -> Result<String> {
        let value = self.env.object_field(obj, name, STRING_SIG)?;
        self.require(&value, what)?;
        let text = self.text_from_boundary(&value)?;
        self.env.release(value)?;
        Ok(text)
    }

    // --- expiry ---

    /// `ExpiryMode$NONE.INSTANCE`, or `AfterSend`/`AfterRead` carrying the
    /// duration in milliseconds.
    pub fn serialize_expiry(&mut self, expiry: &ExpiryMode) -> Result<E::Object> {
        let class = match expiry {
            ExpiryMode::Disabled => {
                let sig = ClassNames::descriptor(&self.classes.expiry_none);
                return Ok(self
                    .env
                    .static_object_field(&self.classes.expiry_none, "INSTANCE", &sig)?);
            }
            ExpiryMode::AfterSend(_) => &self.classes.expiry_after_send,
            ExpiryMode::AfterRead(_) => &self.classes.expiry_after_read,
        };
        Ok(self.env.construct(class, "(J)V", &[Arg::Long(expiry.millis())])?)
    }

    /// Serialize a raw `(mode, seconds)` pair as stored by the config objects.
    pub fn serialize_expiry_parts(&mut self, mode: ExpirationMode, seconds: i64) -> Result<E::Object> {
        let expiry = ExpiryMode::from_parts(mode, seconds)?;
        self.serialize_expiry(&expiry)
    }

    /// `(mode, seconds)` of a managed expiry; milliseconds are truncated.
    pub fn expiry_parts(&mut self, expiry: &E::Object) -> Result<(ExpirationMode, i64)> {
        Ok(self.deserialize_expiry(expiry)?.into_parts())
    }

    pub fn deserialize_expiry(&mut self, expiry: &E::Object) -> Result<ExpiryMode> {
        self.require(expiry, "ExpiryMode")?;

        let mode = if self.env.instance_of(expiry, &self.classes.expiry_after_send)? {
            ExpirationMode::AfterSend
        } else if self.env.instance_of(expiry, &self.classes.expiry_after_read)? {
            ExpirationMode::AfterRead
        } else if self.env.instance_of(expiry, &self.classes.expiry_none)? {
            return Ok(ExpiryMode::Disabled);
        } else {
            return Err(FormatError::UnknownExpiryMode.into());
        };

        let millis = self.env.long_field(expiry, EXPIRY_MILLIS)?;
        Ok(ExpiryMode::from_millis(mode, millis)?)
    }

    // --- group members ---

    fn group_member_ctor_sig(&self) -> String {
        format!(
            "({STRING_SIG}{STRING_SIG}{}ZIIIZ)V",
            ClassNames::descriptor(&self.classes.user_pic)
        )
    }

    pub fn serialize_group_member(&mut self, member: &GroupMember) -> Result<E::Object> {
        let session_id = self.text_to_boundary(&member.session_id().to_hex())?;
        let name = self.optional_text_to_boundary(member.name())?;
        let pic = self.serialize_user_pic(member.profile_pic.as_ref())?;

        let sig = self.group_member_ctor_sig();
        let obj = self.env.construct(
            &self.classes.group_member,
            &sig,
            &[
                Arg::Object(&session_id),
                Arg::Object(&name),
                Arg::Object(&pic),
                Arg::Bool(member.admin),
                Arg::Int(member.invite_status.code()),
                Arg::Int(member.promotion_status.code()),
                Arg::Int(member.removed_status.code()),
                Arg::Bool(member.supplement),
            ],
        )?;
        for local in [session_id, name, pic] {
            self.env.release(local)?;
        }
        Ok(obj)
    }

    pub fn deserialize_group_member(&mut self, obj: &E::Object) -> Result<GroupMember> {
        let classes = self.classes;
        self.require_instance(obj, &classes.group_member, "GroupMember")?;

        let session_id = self.env.object_field(obj, "sessionId", STRING_SIG)?;
        let session_id = {
            let id = self.session_id_from_text(&session_id);
            self.env.release(session_id)?;
            id?
        };
        let mut member = GroupMember::new(session_id)?;

        let name = self.env.object_field(obj, "name", STRING_SIG)?;
        let name_text = self.optional_text_from_boundary(&name)?;
        self.env.release(name)?;
        member.set_name(name_text)?;

        let pic_sig = ClassNames::descriptor(&self.classes.user_pic);
        let pic = self.env.object_field(obj, "profilePic", &pic_sig)?;
        member.profile_pic = self.deserialize_user_pic(&pic)?;
        self.env.release(pic)?;

        member.admin = self.env.bool_field(obj, "admin")?;
        member.invite_status = MemberStatus::from_code(self.env.int_field(obj, "inviteStatus")?)?;
        member.promotion_status =
            MemberStatus::from_code(self.env.int_field(obj, "promotionStatus")?)?;
        member.removed_status = RemovedStatus::from_code(self.env.int_field(obj, "removedStatus")?)?;
        member.supplement = self.env.bool_field(obj, "supplement")?;
        Ok(member)
    }

    // --- session ids ---

    /// `AccountId(hexString)`.
    pub fn serialize_session_id(&mut self, id: &SessionId) -> Result<E::Object> {
        let hex = self.text_to_boundary(&id.to_hex())?;
        let obj = self.env.construct(
            &self.classes.account_id,
            &format!("({STRING_SIG})V"),
            &[Arg::Object(&hex)],
        )?;
        self.env.release(hex)?;
        Ok(obj)
    }

    pub fn deserialize_session_id(&mut self, id: &E::Object) -> Result<SessionId> {
        let classes = self.classes;
        self.require_instance(id, &classes.account_id, "AccountId")?;
        let hex = self.env.object_field(id, "hexString", STRING_SIG)?;
        let parsed = self.session_id_from_text(&hex);
        self.env.release(hex)?;
        parsed
    }

    /// Parse a session id passed as a bare managed string.
    pub fn session_id_from_text(&mut self, hex: &E::Object) -> Result<SessionId> {
        self.require(hex, "session id")?;
        let text = self.text_from_boundary(hex)?;
        Ok(SessionId::from_hex(&text)?)
    }

    // --- arrays ---

    /// An array of `class` holding `items`. The item references are consumed.
    pub fn object_array(&mut self, class: &str, items: Vec<E::Object>) -> Result<E::Object> {
        let array = self.env.make_object_array(class, &items)?;
        for item in items {
            self.env.release(item)?;
        }
        Ok(array)
    }
}
