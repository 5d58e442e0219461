//! Badge settings: model, edit boundary, and persistence.
//!
//! Persisted layout (JSON):
//!
//! ```json
//! { "enabled": true, "badgeTextColor": "#ffffff", "badgeBackgroundColor": "#a882ff" }
//! ```
//!
//! Colors are validated where the user edits them ([`Settings::apply`]).
//! Loading is lenient: missing fields take defaults, unknown fields are
//! ignored, and a stored color that is not `#RRGGBB` falls back to its
//! default with a warning.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::reconciler::BadgeStyle;

/// Default badge text color.
pub const DEFAULT_TEXT_COLOR: &str = "#ffffff";

/// Default badge background color.
pub const DEFAULT_BACKGROUND_COLOR: &str = "#a882ff";

/// Background color applied when the user clears the background field.
pub const BACKGROUND_COLOR_PLACEHOLDER: &str = "#5b5b5b";

/// A `#RRGGBB` color, hex digits in either case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct HexColor(String);

impl HexColor {
    /// Parse a `#RRGGBB` color, keeping the input's case.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        is_hex_color(value).then(|| Self(value.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_static(value: &'static str) -> Self {
        debug_assert!(is_hex_color(value));
        Self(value.to_owned())
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|digits| digits.len() == 6 && digits.bytes().all(|b| b.is_ascii_hexdigit()))
}

/// Which color setting an edit or error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorField {
    Text,
    Background,
}

impl ColorField {
    /// Color applied when the field is cleared.
    #[must_use]
    pub const fn cleared_value(self) -> &'static str {
        match self {
            Self::Text => DEFAULT_TEXT_COLOR,
            Self::Background => BACKGROUND_COLOR_PLACEHOLDER,
        }
    }
}

impl fmt::Display for ColorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("badgeTextColor"),
            Self::Background => f.write_str("badgeBackgroundColor"),
        }
    }
}

/// One user edit from the settings form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsEdit {
    SetEnabled(bool),
    /// Raw text-field input; empty resets the field.
    SetTextColor(String),
    /// Raw text-field input; empty resets the field.
    SetBackgroundColor(String),
}

/// Badge settings. Replaced wholesale on every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub enabled: bool,
    pub badge_text_color: HexColor,
    pub badge_background_color: HexColor,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            badge_text_color: HexColor::from_static(DEFAULT_TEXT_COLOR),
            badge_background_color: HexColor::from_static(DEFAULT_BACKGROUND_COLOR),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StoredSettings {
    enabled: Option<bool>,
    badge_text_color: Option<String>,
    badge_background_color: Option<String>,
}

impl Settings {
    /// Settings with `edit` applied. `self` is left untouched, so a
    /// rejected edit keeps the prior value.
    pub fn apply(&self, edit: SettingsEdit) -> Result<Self, SettingsError> {
        let mut next = self.clone();
        match edit {
            SettingsEdit::SetEnabled(enabled) => next.enabled = enabled,
            SettingsEdit::SetTextColor(value) => {
                next.badge_text_color = validate_color_edit(ColorField::Text, value)?;
            }
            SettingsEdit::SetBackgroundColor(value) => {
                next.badge_background_color = validate_color_edit(ColorField::Background, value)?;
            }
        }
        Ok(next)
    }

    /// Colors for the badge reconciler.
    #[must_use]
    pub fn badge_style(&self) -> BadgeStyle<'_> {
        BadgeStyle {
            text_color: self.badge_text_color.as_str(),
            background_color: self.badge_background_color.as_str(),
        }
    }

    /// Decode a persisted blob over the defaults. `null` yields defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let stored: Option<StoredSettings> = serde_json::from_str(json)?;
        Ok(Self::merged(stored.unwrap_or_default()))
    }

    /// Encode for persistence.
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn merged(stored: StoredSettings) -> Self {
        let defaults = Self::default();
        Self {
            enabled: stored.enabled.unwrap_or(defaults.enabled),
            badge_text_color: stored_color(
                ColorField::Text,
                stored.badge_text_color,
                defaults.badge_text_color,
            ),
            badge_background_color: stored_color(
                ColorField::Background,
                stored.badge_background_color,
                defaults.badge_background_color,
            ),
        }
    }
}

fn validate_color_edit(field: ColorField, value: String) -> Result<HexColor, SettingsError> {
    if value.is_empty() {
        return Ok(HexColor::from_static(field.cleared_value()));
    }
    HexColor::parse(&value).ok_or(SettingsError::InvalidColor { field, value })
}

fn stored_color(field: ColorField, stored: Option<String>, default: HexColor) -> HexColor {
    match stored {
        None => default,
        Some(value) => HexColor::parse(&value).unwrap_or_else(|| {
            tracing::warn!(%field, value = %value, fallback = %default, "ignoring invalid stored color");
            default
        }),
    }
}

/// Opaque storage for the settings blob.
pub trait SettingsStore {
    /// The stored blob, or `None` if nothing was saved yet.
    fn load(&self) -> Result<Option<String>, SettingsError>;

    /// Replace the stored blob.
    fn save(&mut self, blob: &str) -> Result<(), SettingsError>;
}

/// Load settings from `store`, defaults when nothing is stored.
pub fn load_settings<S: SettingsStore + ?Sized>(store: &S) -> Result<Settings, SettingsError> {
    match store.load()? {
        Some(blob) => Settings::from_json(&blob),
        None => Ok(Settings::default()),
    }
}

/// Persist `settings` into `store`.
pub fn save_settings<S: SettingsStore + ?Sized>(
    store: &mut S,
    settings: &Settings,
) -> Result<(), SettingsError> {
    store.save(&settings.to_json()?)
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blob: Option<String>,
    saves: usize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `blob`.
    #[must_use]
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Some(blob.into()),
            saves: 0,
        }
    }

    #[must_use]
    pub fn blob(&self) -> Option<&str> {
        self.blob.as_deref()
    }

    /// Number of successful saves.
    #[must_use]
    pub const fn saves(&self) -> usize {
        self.saves
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, SettingsError> {
        Ok(self.blob.clone())
    }

    fn save(&mut self, blob: &str) -> Result<(), SettingsError> {
        self.blob = Some(blob.to_owned());
        self.saves += 1;
        Ok(())
    }
}

/// JSON file store. Writes go to a sibling temp file first and are renamed
/// into place.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonFileStore {
    fn load(&self) -> Result<Option<String>, SettingsError> {
        match fs::read_to_string(&self.path) {
            Ok(blob) => Ok(Some(blob)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&mut self, blob: &str) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, blob)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn defaults_match_persisted_layout() {
        let settings = Settings::default();
        assert!(settings.enabled);
        assert_eq!(settings.badge_text_color.as_str(), "#ffffff");
        assert_eq!(settings.badge_background_color.as_str(), "#a882ff");
    }

    #[test]
    fn hex_color_accepts_both_cases() {
        assert!(HexColor::parse("#A1b2C3").is_some());
        assert_eq!(HexColor::parse("#A1b2C3").unwrap().as_str(), "#A1b2C3");
    }

    #[test]
    fn hex_color_rejects_malformed() {
        for bad in ["", "#fff", "ffffff", "#gggggg", "#1234567", "# 12345", "#12345\u{e9}"] {
            assert!(HexColor::parse(bad).is_none(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn valid_color_edit_replaces_value() {
        let settings = Settings::default();
        let next = settings
            .apply(SettingsEdit::SetTextColor("#000000".into()))
            .unwrap();
        assert_eq!(next.badge_text_color.as_str(), "#000000");
        assert_eq!(settings.badge_text_color.as_str(), "#ffffff");
    }

    #[test]
    fn invalid_color_edit_is_rejected() {
        let settings = Settings::default();
        let err = settings
            .apply(SettingsEdit::SetBackgroundColor("purple".into()))
            .unwrap_err();
        assert!(matches!(
            err,
            SettingsError::InvalidColor {
                field: ColorField::Background,
                ..
            }
        ));
        assert!(err.to_string().contains("badgeBackgroundColor"));
    }

    #[test]
    fn empty_color_edit_resets_field() {
        let settings = Settings::default()
            .apply(SettingsEdit::SetTextColor("#123456".into()))
            .unwrap()
            .apply(SettingsEdit::SetBackgroundColor("#654321".into()))
            .unwrap();

        let cleared = settings
            .apply(SettingsEdit::SetTextColor(String::new()))
            .unwrap()
            .apply(SettingsEdit::SetBackgroundColor(String::new()))
            .unwrap();
        assert_eq!(cleared.badge_text_color.as_str(), DEFAULT_TEXT_COLOR);
        assert_eq!(
            cleared.badge_background_color.as_str(),
            BACKGROUND_COLOR_PLACEHOLDER
        );
    }

    #[test]
    fn toggle_edit() {
        let next = Settings::default()
            .apply(SettingsEdit::SetEnabled(false))
            .unwrap();
        assert!(!next.enabled);
    }

    #[test]
    fn json_uses_camel_case_keys() {
        let json = Settings::default().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["enabled"], true);
        assert_eq!(value["badgeTextColor"], "#ffffff");
        assert_eq!(value["badgeBackgroundColor"], "#a882ff");
    }

    #[test]
    fn partial_blob_merges_over_defaults() {
        let settings = Settings::from_json(r#"{"enabled": false, "extra": 1}"#).unwrap();
        assert!(!settings.enabled);
        assert_eq!(settings.badge_text_color.as_str(), DEFAULT_TEXT_COLOR);
        assert_eq!(
            settings.badge_background_color.as_str(),
            DEFAULT_BACKGROUND_COLOR
        );
    }

    #[test]
    fn null_blob_is_defaults() {
        assert_eq!(Settings::from_json("null").unwrap(), Settings::default());
    }

    #[test]
    fn malformed_blob_is_parse_error() {
        assert!(matches!(
            Settings::from_json("{not json"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[traced_test]
    #[test]
    fn invalid_stored_color_falls_back_with_warning() {
        let settings = Settings::from_json(r##"{"badgeTextColor": "#12"}"##).unwrap();
        assert_eq!(settings.badge_text_color.as_str(), DEFAULT_TEXT_COLOR);
        assert!(logs_contain("ignoring invalid stored color"));
    }

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(load_settings(&store).unwrap(), Settings::default());

        let custom = Settings::default()
            .apply(SettingsEdit::SetBackgroundColor("#00FF00".into()))
            .unwrap();
        save_settings(&mut store, &custom).unwrap();
        assert_eq!(store.saves(), 1);
        assert_eq!(load_settings(&store).unwrap(), custom);
    }

    #[test]
    fn file_store_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn file_store_persists_and_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let mut store = JsonFileStore::new(&path);

        let custom = Settings::default()
            .apply(SettingsEdit::SetEnabled(false))
            .unwrap();
        save_settings(&mut store, &custom).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
        let reopened = JsonFileStore::new(&path);
        assert_eq!(load_settings(&reopened).unwrap(), custom);
    }
}
