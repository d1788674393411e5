use session_config::ConfigError;
use session_shared::{ConversionError, EncodingError, FormatError, SessionError};
use thiserror::Error;

/// Failures of the boundary itself, independent of the values carried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoundaryError {
    #[error("JNI error: {0}")]
    Jni(String),

    #[error("Class not found: {0}")]
    NoSuchClass(String),

    #[error("No constructor {signature} on {class}")]
    NoSuchConstructor { class: String, signature: String },

    #[error("No field {name} ({signature}) on {class}")]
    NoSuchField {
        class: String,
        name: String,
        signature: String,
    },

    #[error("Stale or foreign object reference")]
    InvalidReference,

    /// A Java exception is pending on the calling thread.
    #[error("Java exception pending")]
    PendingException,
}

impl From<jni::errors::Error> for BoundaryError {
    fn from(e: jni::errors::Error) -> Self {
        match e {
            jni::errors::Error::JavaException => BoundaryError::PendingException,
            other => BoundaryError::Jni(other.to_string()),
        }
    }
}

/// Everything a marshaling call or an exported function can fail with.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error(transparent)]
    Value(#[from] SessionError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Boundary(#[from] BoundaryError),
}

impl From<ConversionError> for BridgeError {
    fn from(e: ConversionError) -> Self {
        BridgeError::Value(e.into())
    }
}

impl From<FormatError> for BridgeError {
    fn from(e: FormatError) -> Self {
        BridgeError::Value(e.into())
    }
}

impl From<EncodingError> for BridgeError {
    fn from(e: EncodingError) -> Self {
        BridgeError::Value(e.into())
    }
}

impl From<jni::errors::Error> for BridgeError {
    fn from(e: jni::errors::Error) -> Self {
        BridgeError::Boundary(e.into())
    }
}

impl BridgeError {
    /// Java exception class thrown for this error.
    pub fn exception_class(&self) -> &'static str {
        match self {
            BridgeError::Value(SessionError::Conversion(_)) => "java/lang/NullPointerException",
            BridgeError::Value(_) => "java/lang/IllegalArgumentException",
            BridgeError::Config(ConfigError::Value(SessionError::Conversion(_))) => {
                "java/lang/NullPointerException"
            }
            BridgeError::Config(ConfigError::Value(_)) => "java/lang/IllegalArgumentException",
            BridgeError::Config(_) | BridgeError::Boundary(_) => "java/lang/IllegalStateException",
        }
    }

    pub fn is_format(&self) -> bool {
        matches!(
            self,
            BridgeError::Value(SessionError::Format(_))
                | BridgeError::Config(ConfigError::Value(SessionError::Format(_)))
        )
    }

    pub fn is_conversion(&self) -> bool {
        matches!(self, BridgeError::Value(SessionError::Conversion(_)))
    }

    pub fn is_encoding(&self) -> bool {
        matches!(self, BridgeError::Value(SessionError::Encoding(_)))
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
