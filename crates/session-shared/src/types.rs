use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{PUBKEY_SIZE, SESSION_ID_HEX_LEN};
use crate::error::FormatError;

/// Leading byte of a session id, telling what kind of key follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IdPrefix {
    Unblinded,
    Group,
    Standard,
    Blinded,
    BlindedV2,
    Unknown(u8),
}

impl IdPrefix {
    pub fn from_byte(b: u8) -> Self {
        match b {
            0x00 => Self::Unblinded,
            0x03 => Self::Group,
            0x05 => Self::Standard,
            0x15 => Self::Blinded,
            0x25 => Self::BlindedV2,
            other => Self::Unknown(other),
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            Self::Unblinded => 0x00,
            Self::Group => 0x03,
            Self::Standard => 0x05,
            Self::Blinded => 0x15,
            Self::BlindedV2 => 0x25,
            Self::Unknown(b) => b,
        }
    }
}

// Session id = prefix byte + 32-byte public key, hex encoded (66 chars)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId {
    prefix: u8,
    pubkey: [u8; PUBKEY_SIZE],
}

impl SessionId {
    pub fn new(prefix: IdPrefix, pubkey: [u8; PUBKEY_SIZE]) -> Self {
        Self {
            prefix: prefix.to_byte(),
            pubkey,
        }
    }

    /// Parse a hex session id. Either case is accepted; nothing is trimmed.
    pub fn from_hex(s: &str) -> Result<Self, FormatError> {
        if s.len() != SESSION_ID_HEX_LEN {
            return Err(FormatError::SessionIdLength {
                expected: SESSION_ID_HEX_LEN,
                actual: s.len(),
            });
        }

        let bytes = hex::decode(s).map_err(|_| FormatError::SessionIdHex)?;
        let mut pubkey = [0u8; PUBKEY_SIZE];
        pubkey.copy_from_slice(&bytes[1..]);
        Ok(Self {
            prefix: bytes[0],
            pubkey,
        })
    }

    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(SESSION_ID_HEX_LEN);
        out.push_str(&hex::encode([self.prefix]));
        out.push_str(&hex::encode(self.pubkey));
        out
    }

    pub fn prefix(&self) -> IdPrefix {
        IdPrefix::from_byte(self.prefix)
    }

    pub fn pubkey(&self) -> &[u8; PUBKEY_SIZE] {
        &self.pubkey
    }

    /// Fails unless the id carries the given prefix.
    pub fn require_prefix(&self, prefix: IdPrefix) -> Result<(), FormatError> {
        if self.prefix() == prefix {
            Ok(())
        } else {
            Err(FormatError::SessionIdPrefix {
                expected: prefix.to_byte(),
                actual: self.prefix,
            })
        }
    }

    pub fn short(&self) -> String {
        self.to_hex()[..10].to_string()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for SessionId {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for SessionId {
    type Error = FormatError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.to_hex()
    }
}
