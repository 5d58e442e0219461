//! Plugin lifecycle: load, settings edits, and unload.

use pretty_assertions::assert_eq;
use tabnum_core::reconciler::BACKGROUND_COLOR_PROPERTY;
use tabnum_core::settings::load_settings;
use tabnum_core::{
    EngineConfig, HostEvent, JsonFileStore, KeyEvent, MemoryStore, Modifiers, Settings,
    SettingsEdit, SettingsError, SettingsStore, TabNumbersPlugin,
};
use tabnum_harness::MemoryWorkspace;
use web_time::{Duration, Instant};

const DELAY: Duration = Duration::from_millis(50);

type Plugin<S> = TabNumbersPlugin<MemoryWorkspace, S>;

#[test]
fn load_reads_persisted_settings() {
    let store = MemoryStore::with_blob(
        r##"{"enabled": true, "badgeTextColor": "#000000", "badgeBackgroundColor": "#00ff00"}"##,
    );
    let t0 = Instant::now();
    let plugin: Plugin<_> = TabNumbersPlugin::load(store, EngineConfig::default(), t0);

    assert!(plugin.engine().is_running());
    assert_eq!(plugin.settings().badge_text_color.as_str(), "#000000");
    assert_eq!(plugin.settings().badge_background_color.as_str(), "#00ff00");
    assert!(plugin.engine().refresh_pending());
}

#[test]
fn malformed_blob_loads_defaults() {
    let t0 = Instant::now();
    let plugin: Plugin<_> =
        TabNumbersPlugin::load(MemoryStore::with_blob("{oops"), EngineConfig::default(), t0);
    assert_eq!(plugin.settings(), &Settings::default());
}

#[test]
fn initial_refresh_numbers_the_focused_group() {
    let (mut ws, group, _) = MemoryWorkspace::with_single_group(3);
    let t0 = Instant::now();
    let mut plugin: Plugin<_> =
        TabNumbersPlugin::load(MemoryStore::new(), EngineConfig::default(), t0);

    assert!(plugin.poll(&mut ws, t0 + DELAY).is_some());
    assert_eq!(
        ws.labels(group),
        vec![Some("1".into()), Some("2".into()), Some("3".into())]
    );
}

#[test]
fn edit_persists_then_refreshes() {
    let (mut ws, _, panes) = MemoryWorkspace::with_single_group(2);
    let t0 = Instant::now();
    let mut plugin: Plugin<_> =
        TabNumbersPlugin::load(MemoryStore::new(), EngineConfig::default(), t0);
    plugin.poll(&mut ws, t0 + DELAY);

    let t1 = t0 + Duration::from_secs(1);
    plugin
        .edit_settings(SettingsEdit::SetBackgroundColor("#123abc".into()), t1)
        .unwrap();

    assert_eq!(plugin.store().saves(), 1);
    let persisted = load_settings(plugin.store()).unwrap();
    assert_eq!(persisted.badge_background_color.as_str(), "#123abc");
    assert!(plugin.engine().refresh_pending());

    plugin.poll(&mut ws, t1 + DELAY);
    let badge = ws.badge(panes[0]).unwrap();
    assert_eq!(
        ws.document().style(badge, BACKGROUND_COLOR_PROPERTY),
        Some("#123abc")
    );
}

#[test]
fn rejected_edit_is_not_saved() {
    let t0 = Instant::now();
    let mut plugin: Plugin<_> =
        TabNumbersPlugin::load(MemoryStore::new(), EngineConfig::default(), t0);
    let before = plugin.settings().clone();

    let err = plugin
        .edit_settings(SettingsEdit::SetTextColor("white".into()), t0)
        .unwrap_err();

    assert!(matches!(err, SettingsError::InvalidColor { .. }));
    assert_eq!(plugin.store().saves(), 0);
    assert_eq!(plugin.settings(), &before);
}

/// Store whose writes always fail.
#[derive(Debug, Default)]
struct ReadOnlyStore;

impl SettingsStore for ReadOnlyStore {
    fn load(&self) -> Result<Option<String>, SettingsError> {
        Ok(None)
    }

    fn save(&mut self, _blob: &str) -> Result<(), SettingsError> {
        Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
    }
}

#[test]
fn failed_save_keeps_prior_settings() {
    let t0 = Instant::now();
    let mut plugin: Plugin<_> =
        TabNumbersPlugin::load(ReadOnlyStore, EngineConfig::default(), t0);

    let err = plugin
        .edit_settings(SettingsEdit::SetEnabled(false), t0)
        .unwrap_err();

    assert!(matches!(err, SettingsError::Io(_)));
    assert!(plugin.settings().enabled);
}

#[test]
fn disabling_through_the_form_clears_badges() {
    let (mut ws, _, _) = MemoryWorkspace::with_single_group(3);
    let t0 = Instant::now();
    let mut plugin: Plugin<_> =
        TabNumbersPlugin::load(MemoryStore::new(), EngineConfig::default(), t0);
    plugin.poll(&mut ws, t0 + DELAY);
    assert_eq!(ws.attached_badges().len(), 3);

    let t1 = t0 + Duration::from_secs(1);
    plugin
        .edit_settings(SettingsEdit::SetEnabled(false), t1)
        .unwrap();
    plugin.poll(&mut ws, t1 + DELAY);
    assert!(ws.attached_badges().is_empty());

    let t2 = t1 + Duration::from_secs(1);
    plugin
        .edit_settings(SettingsEdit::SetEnabled(true), t2)
        .unwrap();
    plugin.poll(&mut ws, t2 + DELAY);
    assert_eq!(ws.attached_badges().len(), 3);
}

#[test]
fn unload_removes_badges_and_returns_store() {
    let (mut ws, _, panes) = MemoryWorkspace::with_single_group(4);
    let t0 = Instant::now();
    let mut plugin: Plugin<_> =
        TabNumbersPlugin::load(MemoryStore::new(), EngineConfig::default(), t0);
    plugin.poll(&mut ws, t0 + DELAY);
    plugin.on_event(&mut ws, &HostEvent::Key(KeyEvent::down(Modifiers::CTRL)), t0);
    assert_eq!(ws.badge_visible(panes[0]), Some(true));

    plugin.on_event(&mut ws, &HostEvent::LayoutChanged, t0 + DELAY);
    let store = plugin.unload(&mut ws);

    assert!(ws.attached_badges().is_empty());
    assert_eq!(store.saves(), 0);
}

#[test]
fn file_store_round_trips_through_the_plugin() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.json");
    let t0 = Instant::now();

    let mut plugin: Plugin<_> =
        TabNumbersPlugin::load(JsonFileStore::new(&path), EngineConfig::default(), t0);
    plugin
        .edit_settings(SettingsEdit::SetTextColor("#0A0B0C".into()), t0)
        .unwrap();
    let (mut ws, _, _) = MemoryWorkspace::with_single_group(1);
    drop(plugin.unload(&mut ws));

    let reloaded: Plugin<_> =
        TabNumbersPlugin::load(JsonFileStore::new(&path), EngineConfig::default(), t0);
    assert_eq!(reloaded.settings().badge_text_color.as_str(), "#0A0B0C");
}
