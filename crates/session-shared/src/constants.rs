/// Length of a hex-encoded session id (1 prefix byte + 32 key bytes)
pub const SESSION_ID_HEX_LEN: usize = 66;

/// Ed25519 / X25519 public key size in bytes
pub const PUBKEY_SIZE: usize = 32;

/// Profile picture decryption key size in bytes
pub const PROFILE_PIC_KEY_SIZE: usize = 32;

/// Maximum profile picture URL length in bytes
pub const PROFILE_PIC_MAX_URL_LENGTH: usize = 223;

/// Maximum display name length in bytes (contacts, members, groups)
pub const NAME_MAX_LENGTH: usize = 100;

/// Maximum group description length in bytes
pub const DESCRIPTION_MAX_LENGTH: usize = 2000;

/// Maximum community base URL length in bytes
pub const COMMUNITY_BASE_URL_MAX_LENGTH: usize = 267;

/// Maximum community room token length
pub const COMMUNITY_ROOM_MAX_LENGTH: usize = 64;

/// Query parameter carrying the community public key in a full URL
pub const COMMUNITY_PUBKEY_QUERY: &str = "public_key=";

pub const MILLIS_PER_SECOND: i64 = 1000;

/// Longest expiry (in seconds) whose millisecond form still fits an i64
pub const MAX_EXPIRY_SECONDS: i64 = i64::MAX / MILLIS_PER_SECOND;
