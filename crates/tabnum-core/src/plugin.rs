//! Plugin lifecycle: settings persistence wired to the engine.
//!
//! [`TabNumbersPlugin`] is what a host loads: it reads the persisted
//! settings, starts the engine, forwards notifications, turns settings-form
//! edits into validate → persist → refresh, and stops the engine on unload.

use web_time::Instant;

use crate::config::EngineConfig;
use crate::engine::{HostEvent, TabNumbers};
use crate::error::SettingsError;
use crate::host::Host;
use crate::reconciler::ReconcileReport;
use crate::settings::{Settings, SettingsEdit, SettingsStore, load_settings, save_settings};

/// A loaded tab-numbers plugin.
pub struct TabNumbersPlugin<H: Host, S: SettingsStore> {
    store: S,
    engine: TabNumbers<H>,
}

impl<H: Host, S: SettingsStore> TabNumbersPlugin<H, S> {
    /// Load settings from `store` and start the engine.
    ///
    /// Unreadable or malformed settings fall back to defaults.
    pub fn load(store: S, config: EngineConfig, now: Instant) -> Self {
        let settings = load_settings(&store).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "failed to load settings, using defaults");
            Settings::default()
        });
        let mut engine = TabNumbers::new(settings, config);
        engine.start(now);
        Self { store, engine }
    }

    #[must_use]
    pub const fn engine(&self) -> &TabNumbers<H> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut TabNumbers<H> {
        &mut self.engine
    }

    #[must_use]
    pub const fn settings(&self) -> &Settings {
        self.engine.settings()
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Forward one host notification.
    pub fn on_event(&mut self, host: &mut H, event: &HostEvent, now: Instant) {
        self.engine.handle_event(host, event, now);
    }

    /// Run the pending refresh if due.
    pub fn poll(&mut self, host: &mut H, now: Instant) -> Option<ReconcileReport> {
        self.engine.poll(host, now)
    }

    /// Apply one settings-form edit: validate, persist, then refresh.
    ///
    /// A rejected edit or a failed save leaves the engine on its prior
    /// settings.
    pub fn edit_settings(&mut self, edit: SettingsEdit, now: Instant) -> Result<(), SettingsError> {
        let next = self.engine.settings().apply(edit)?;
        save_settings(&mut self.store, &next)?;
        self.engine.update_settings(next, now);
        Ok(())
    }

    /// Stop the engine, removing every badge, and hand back the store.
    pub fn unload(mut self, host: &mut H) -> S {
        self.engine.stop(host);
        self.store
    }
}
