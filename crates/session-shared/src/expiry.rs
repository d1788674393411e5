use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_EXPIRY_SECONDS, MILLIS_PER_SECOND};
use crate::error::FormatError;

/// Raw expiration mode code as stored by the config library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ExpirationMode {
    None = 0,
    AfterSend = 1,
    AfterRead = 2,
}

impl ExpirationMode {
    pub fn from_code(code: i32) -> Result<Self, FormatError> {
        match code {
            0 => Ok(Self::None),
            1 => Ok(Self::AfterSend),
            2 => Ok(Self::AfterRead),
            other => Err(FormatError::UnknownCode {
                field: "expiration mode",
                code: other,
            }),
        }
    }
}

/// Disappearing-message setting. Durations are whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExpiryMode {
    #[default]
    Disabled,
    AfterSend(Duration),
    AfterRead(Duration),
}

impl ExpiryMode {
    /// Combine a raw mode and a duration in seconds.
    ///
    /// The seconds are ignored when the mode is `None`; otherwise they must be
    /// non-negative and small enough to be expressed in milliseconds.
    pub fn from_parts(mode: ExpirationMode, seconds: i64) -> Result<Self, FormatError> {
        if mode == ExpirationMode::None {
            return Ok(Self::Disabled);
        }
        if !(0..=MAX_EXPIRY_SECONDS).contains(&seconds) {
            return Err(FormatError::Duration(seconds));
        }
        let duration = Duration::from_secs(seconds as u64);
        Ok(match mode {
            ExpirationMode::AfterSend => Self::AfterSend(duration),
            _ => Self::AfterRead(duration),
        })
    }

    /// Same as [`ExpiryMode::from_parts`], from a millisecond duration.
    /// Sub-second remainders are truncated.
    pub fn from_millis(mode: ExpirationMode, millis: i64) -> Result<Self, FormatError> {
        if mode != ExpirationMode::None && millis < 0 {
            return Err(FormatError::Duration(millis));
        }
        Self::from_parts(mode, millis / MILLIS_PER_SECOND)
    }

    pub fn mode(&self) -> ExpirationMode {
        match self {
            Self::Disabled => ExpirationMode::None,
            Self::AfterSend(_) => ExpirationMode::AfterSend,
            Self::AfterRead(_) => ExpirationMode::AfterRead,
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            Self::Disabled => Duration::ZERO,
            Self::AfterSend(d) | Self::AfterRead(d) => *d,
        }
    }

    pub fn seconds(&self) -> i64 {
        self.duration().as_secs() as i64
    }

    pub fn millis(&self) -> i64 {
        self.seconds() * MILLIS_PER_SECOND
    }

    pub fn into_parts(self) -> (ExpirationMode, i64) {
        (self.mode(), self.seconds())
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }
}
