//! Error types.
//!
//! Tab discovery and badge reconciliation never fail: every missing link
//! degrades to "no group" and clears the badges. The only fallible surface
//! is settings, where user edits are validated and the persisted blob is
//! read and written.

use std::fmt;
use std::io;

use crate::settings::ColorField;

/// Settings validation and persistence errors.
#[derive(Debug)]
pub enum SettingsError {
    /// A color edit was not `#RRGGBB` (or empty).
    InvalidColor { field: ColorField, value: String },
    /// Reading or writing the settings blob failed.
    Io(io::Error),
    /// The settings blob is not valid JSON of the expected shape.
    Parse(serde_json::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidColor { field, value } => {
                write!(f, "invalid {field} {value:?}: expected #RRGGBB")
            }
            Self::Io(err) => write!(f, "settings I/O error: {err}"),
            Self::Parse(err) => write!(f, "malformed settings: {err}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidColor { .. } => None,
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<io::Error> for SettingsError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}
