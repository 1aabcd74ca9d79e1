//! Position and trade direction.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Direction of a trade or position.
///
/// Encoded on the wire as an integer: `-1` short, `0` flat, `1` long.
/// Trades are always `Long` or `Short`; a `Flat` position belongs to a
/// pipeline that currently holds no exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Side {
    Short,
    #[default]
    Flat,
    Long,
}

impl Side {
    /// Returns -1, 0 or 1.
    pub fn sign(&self) -> i8 {
        match self {
            Self::Short => -1,
            Self::Flat => 0,
            Self::Long => 1,
        }
    }

    pub fn is_flat(&self) -> bool {
        matches!(self, Self::Flat)
    }
}

impl TryFrom<i64> for Side {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::Short),
            0 => Ok(Self::Flat),
            1 => Ok(Self::Long),
            other => Err(CoreError::InvalidSide(other)),
        }
    }
}

impl From<Side> for i64 {
    fn from(side: Side) -> Self {
        i64::from(side.sign())
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Short => write!(f, "SHORT"),
            Self::Flat => write!(f, "FLAT"),
            Self::Long => write!(f, "LONG"),
        }
    }
}
