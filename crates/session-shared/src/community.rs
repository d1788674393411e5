//! Open group ("community") references.
//!
//! A community is addressed by a server base URL, a room token on that
//! server, and the server's X25519 public key. Base URLs are stored in
//! canonical form so that equal servers compare equal; room tokens keep the
//! case they were given but are matched case-insensitively.

use serde::{Deserialize, Serialize};

use crate::constants::{
    COMMUNITY_BASE_URL_MAX_LENGTH, COMMUNITY_PUBKEY_QUERY, COMMUNITY_ROOM_MAX_LENGTH, PUBKEY_SIZE,
};
use crate::error::FormatError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Community {
    base_url: String,
    room: String,
    pubkey: [u8; PUBKEY_SIZE],
}

impl Community {
    pub fn new(base_url: &str, room: &str, pubkey: [u8; PUBKEY_SIZE]) -> Result<Self, FormatError> {
        let base_url = canonical_url(base_url)?;
        validate_room(room)?;
        Ok(Self {
            base_url,
            room: room.to_string(),
            pubkey,
        })
    }

    /// Build from a hex-encoded public key.
    pub fn with_pubkey_hex(base_url: &str, room: &str, pubkey_hex: &str) -> Result<Self, FormatError> {
        Self::new(base_url, room, parse_pubkey_hex(pubkey_hex)?)
    }

    /// Parse `https://host[:port]/room?public_key=<hex>` (or the legacy
    /// `.../r/room?public_key=<hex>` form).
    pub fn parse_full_url(full_url: &str) -> Result<Self, FormatError> {
        let (location, query) = full_url
            .split_once('?')
            .ok_or_else(|| FormatError::Url(format!("missing public key in {full_url:?}")))?;

        let pubkey_hex = query
            .split('&')
            .find_map(|param| param.strip_prefix(COMMUNITY_PUBKEY_QUERY))
            .ok_or_else(|| FormatError::Url(format!("missing public key in {full_url:?}")))?;

        let (base, room) = location
            .trim_end_matches('/')
            .rsplit_once('/')
            .ok_or_else(|| FormatError::Url(format!("missing room in {full_url:?}")))?;
        let base = base.strip_suffix("/r").unwrap_or(base);

        Self::with_pubkey_hex(base, room, pubkey_hex)
    }

    pub fn full_url(&self) -> String {
        format!(
            "{}/{}?{}{}",
            self.base_url,
            self.room,
            COMMUNITY_PUBKEY_QUERY,
            self.pubkey_hex()
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    /// Room token lowercased, used for lookups.
    pub fn room_norm(&self) -> String {
        self.room.to_ascii_lowercase()
    }

    pub fn pubkey(&self) -> &[u8; PUBKEY_SIZE] {
        &self.pubkey
    }

    pub fn pubkey_hex(&self) -> String {
        hex::encode(self.pubkey)
    }

    /// Replace the room token, e.g. to adopt the server's capitalisation.
    pub fn set_room(&mut self, room: &str) -> Result<(), FormatError> {
        validate_room(room)?;
        self.room = room.to_string();
        Ok(())
    }

    pub fn set_pubkey(&mut self, pubkey: [u8; PUBKEY_SIZE]) {
        self.pubkey = pubkey;
    }
}

/// Lowercase scheme and host, drop the default port and trailing slashes.
pub fn canonical_url(url: &str) -> Result<String, FormatError> {
    let (scheme, rest) = url
        .split_once("://")
        .ok_or_else(|| FormatError::Url(format!("missing scheme in {url:?}")))?;
    let scheme = scheme.to_ascii_lowercase();
    let default_port = match scheme.as_str() {
        "http" => ":80",
        "https" => ":443",
        _ => return Err(FormatError::Url(format!("unsupported scheme in {url:?}"))),
    };

    let rest = rest.trim_end_matches('/');
    let (host, path) = match rest.find('/') {
        Some(i) => rest.split_at(i),
        None => (rest, ""),
    };
    if host.is_empty() {
        return Err(FormatError::Url(format!("missing host in {url:?}")));
    }
    let host = host.to_ascii_lowercase();
    let host = host.strip_suffix(default_port).unwrap_or(&host);

    let canonical = format!("{scheme}://{host}{path}");
    if canonical.len() > COMMUNITY_BASE_URL_MAX_LENGTH {
        return Err(FormatError::TooLong {
            field: "community base url",
            actual: canonical.len(),
            max: COMMUNITY_BASE_URL_MAX_LENGTH,
        });
    }
    Ok(canonical)
}

pub fn validate_room(room: &str) -> Result<(), FormatError> {
    let valid = !room.is_empty()
        && room.len() <= COMMUNITY_ROOM_MAX_LENGTH
        && room
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if valid {
        Ok(())
    } else {
        Err(FormatError::RoomToken(room.to_string()))
    }
}

pub fn parse_pubkey_hex(pubkey_hex: &str) -> Result<[u8; PUBKEY_SIZE], FormatError> {
    let err = FormatError::PubkeyHex {
        expected: PUBKEY_SIZE * 2,
    };
    if pubkey_hex.len() != PUBKEY_SIZE * 2 {
        return Err(err);
    }
    let mut pubkey = [0u8; PUBKEY_SIZE];
    hex::decode_to_slice(pubkey_hex, &mut pubkey).map_err(|_| err)?;
    Ok(pubkey)
}
