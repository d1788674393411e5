use serde::{Deserialize, Serialize};

use crate::constants::{PROFILE_PIC_KEY_SIZE, PROFILE_PIC_MAX_URL_LENGTH};
use crate::error::FormatError;

/// Location and decryption key of an uploaded avatar.
///
/// An unset picture is `Option::<ProfilePic>::None`; a `ProfilePic` with an
/// empty URL is a distinct, valid value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfilePic {
    url: String,
    key: [u8; PROFILE_PIC_KEY_SIZE],
}

impl ProfilePic {
    pub fn new(url: impl Into<String>, key: [u8; PROFILE_PIC_KEY_SIZE]) -> Result<Self, FormatError> {
        let url = url.into();
        if url.len() > PROFILE_PIC_MAX_URL_LENGTH {
            return Err(FormatError::TooLong {
                field: "profile picture url",
                actual: url.len(),
                max: PROFILE_PIC_MAX_URL_LENGTH,
            });
        }
        Ok(Self { url, key })
    }

    /// Build from a key of unchecked length, as received over the boundary.
    pub fn from_parts(url: impl Into<String>, key: &[u8]) -> Result<Self, FormatError> {
        let key: [u8; PROFILE_PIC_KEY_SIZE] =
            key.try_into().map_err(|_| FormatError::KeyLength {
                expected: PROFILE_PIC_KEY_SIZE,
                actual: key.len(),
            })?;
        Self::new(url, key)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn key(&self) -> &[u8; PROFILE_PIC_KEY_SIZE] {
        &self.key
    }

    pub fn into_parts(self) -> (String, [u8; PROFILE_PIC_KEY_SIZE]) {
        (self.url, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_checks_key_length() {
        let pic = ProfilePic::from_parts("http://example.org/avatar", &[7u8; 32]).unwrap();
        assert_eq!(pic.url(), "http://example.org/avatar");
        assert_eq!(pic.key(), &[7u8; 32]);

        let err = ProfilePic::from_parts("http://example.org/avatar", &[7u8; 31]).unwrap_err();
        assert_eq!(
            err,
            FormatError::KeyLength {
                expected: 32,
                actual: 31
            }
        );
        assert!(ProfilePic::from_parts("", &[]).is_err());
    }

    #[test]
    fn test_empty_url_is_a_value() {
        let pic = ProfilePic::new("", [0u8; 32]).unwrap();
        assert_eq!(pic.url(), "");
    }

    #[test]
    fn test_url_length_limit() {
        let long = "a".repeat(PROFILE_PIC_MAX_URL_LENGTH + 1);
        assert!(matches!(
            ProfilePic::new(long, [0u8; 32]),
            Err(FormatError::TooLong { .. })
        ));
        assert!(ProfilePic::new("a".repeat(PROFILE_PIC_MAX_URL_LENGTH), [0u8; 32]).is_ok());
    }
}
