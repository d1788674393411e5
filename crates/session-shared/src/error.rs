use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),
}

/// A boundary value was missing or of the wrong shape where one was required.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Expected {0}, got null")]
    NullValue(&'static str),

    #[error("Expected an instance of {expected}")]
    UnexpectedType { expected: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Session id must be {expected} hex characters, got {actual}")]
    SessionIdLength { expected: usize, actual: usize },

    #[error("Session id contains non-hex characters")]
    SessionIdHex,

    #[error("Session id prefix {actual:02x} is not allowed here (expected {expected:02x})")]
    SessionIdPrefix { expected: u8, actual: u8 },

    #[error("Invalid key length: expected {expected} bytes, got {actual}")]
    KeyLength { expected: usize, actual: usize },

    #[error("Public key must be {expected} hex characters")]
    PubkeyHex { expected: usize },

    #[error("{field} is too long: {actual} bytes (max {max})")]
    TooLong {
        field: &'static str,
        actual: usize,
        max: usize,
    },

    #[error("Invalid URL: {0}")]
    Url(String),

    #[error("Invalid room token: {0:?}")]
    RoomToken(String),

    #[error("Invalid expiry duration: {0}")]
    Duration(i64),

    #[error("Unknown {field} code: {code}")]
    UnknownCode { field: &'static str, code: i32 },

    #[error("Unknown expiry mode class")]
    UnknownExpiryMode,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("Invalid UTF-8 at byte {valid_up_to}")]
    Utf8 { valid_up_to: usize },

    #[error("Unpaired UTF-16 surrogate")]
    Utf16,
}

impl From<std::string::FromUtf8Error> for EncodingError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        EncodingError::Utf8 {
            valid_up_to: e.utf8_error().valid_up_to(),
        }
    }
}

impl From<std::str::Utf8Error> for EncodingError {
    fn from(e: std::str::Utf8Error) -> Self {
        EncodingError::Utf8 {
            valid_up_to: e.valid_up_to(),
        }
    }
}

impl From<std::string::FromUtf16Error> for EncodingError {
    fn from(_: std::string::FromUtf16Error) -> Self {
        EncodingError::Utf16
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
