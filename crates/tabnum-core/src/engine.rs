//! The tab-number engine.
//!
//! [`TabNumbers`] ties the pieces together:
//!
//! - host notifications ([`HostEvent`]) request a refresh, which is
//!   debounced by a [`RefreshScheduler`];
//! - [`TabNumbers::poll`] runs the due reconciliation against the host;
//! - key events flip badge visibility through [`ModifierState`].
//!
//! # Lifecycle
//!
//! ```text
//!  ┌─────────┐  start()   ┌─────────┐
//!  │ Stopped │──────────▶│ Running │
//!  └─────────┘◀──────────└─────────┘
//!                stop()
//! ```
//!
//! While stopped, key events and refresh requests are ignored. `stop()`
//! cancels the pending refresh and removes every badge before returning.

use std::fmt;

use web_time::Instant;

use crate::config::EngineConfig;
use crate::group::resolve_active_group;
use crate::host::{ElementOf, Host};
use crate::modifier::{KeyEvent, ModifierState, ModifierTransition};
use crate::reconciler::{BadgeReconciler, MAX_NUMBERED_TABS, ReconcileReport};
use crate::scheduler::RefreshScheduler;
use crate::settings::Settings;

/// Notifications the host delivers to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// Panes were split, closed, moved, or restored.
    LayoutChanged,
    /// Focus moved to another pane.
    ActivePaneChanged,
    /// A key-down or key-up.
    Key(KeyEvent),
}

/// Whether the engine is attached to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineState {
    #[default]
    Stopped,
    Running,
}

/// Numbered badges for the active tab group of one host.
pub struct TabNumbers<H: Host> {
    config: EngineConfig,
    settings: Settings,
    state: EngineState,
    modifier: ModifierState,
    scheduler: RefreshScheduler,
    reconciler: BadgeReconciler<ElementOf<H>>,
}

impl<H: Host> fmt::Debug for TabNumbers<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabNumbers")
            .field("state", &self.state)
            .field("settings", &self.settings)
            .field("modifier_held", &self.modifier.is_held())
            .field("refresh_deadline", &self.scheduler.deadline())
            .field("badges", &self.reconciler.len())
            .finish()
    }
}

impl<H: Host> TabNumbers<H> {
    /// New stopped engine. `config` is clamped to supported ranges.
    #[must_use]
    pub fn new(settings: Settings, config: EngineConfig) -> Self {
        let config = config.validated();
        Self {
            config,
            settings,
            state: EngineState::Stopped,
            modifier: ModifierState::new(),
            scheduler: RefreshScheduler::new(config.refresh_delay),
            reconciler: BadgeReconciler::new(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> EngineState {
        self.state
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.state, EngineState::Running)
    }

    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub const fn modifier_held(&self) -> bool {
        self.modifier.is_held()
    }

    /// Current header → badge mapping.
    #[must_use]
    pub const fn badges(&self) -> &BadgeReconciler<ElementOf<H>> {
        &self.reconciler
    }

    /// When the pending refresh is due, if one is pending. The host should
    /// call [`poll`](Self::poll) at or after this instant.
    #[must_use]
    pub const fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.deadline()
    }

    #[must_use]
    pub const fn refresh_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Attach to the host and schedule the initial refresh.
    pub fn start(&mut self, now: Instant) {
        if self.is_running() {
            return;
        }
        self.state = EngineState::Running;
        tracing::debug!(enabled = self.settings.enabled, "tab numbers started");
        self.refresh(now);
    }

    /// Detach from the host: cancel the pending refresh and remove every
    /// badge. Returns how many badges were removed.
    pub fn stop(&mut self, host: &mut H) -> usize {
        let cancelled = self.scheduler.cancel();
        let removed = self.reconciler.clear(host.document_mut());
        self.modifier.reset();
        self.state = EngineState::Stopped;
        tracing::debug!(cancelled, removed, "tab numbers stopped");
        removed
    }

    /// Swap in new settings and schedule a refresh.
    pub fn update_settings(&mut self, settings: Settings, now: Instant) {
        self.settings = settings;
        self.refresh(now);
    }

    /// Request a refresh. Requests within the debounce delay coalesce into
    /// one reconciliation. Ignored while stopped.
    pub fn refresh(&mut self, now: Instant) {
        if !self.is_running() {
            tracing::trace!("refresh ignored while stopped");
            return;
        }
        self.scheduler.schedule(now);
    }

    /// Run the pending refresh if it is due.
    pub fn poll(&mut self, host: &mut H, now: Instant) -> Option<ReconcileReport> {
        if !self.is_running() || !self.scheduler.poll(now) {
            return None;
        }
        Some(self.reconcile_now(host))
    }

    /// Reconcile immediately, bypassing the debounce.
    pub fn reconcile_now(&mut self, host: &mut H) -> ReconcileReport {
        let span = tracing::debug_span!("tabnum.reconcile", enabled = self.settings.enabled);
        let _guard = span.enter();

        if !self.settings.enabled {
            return self.clear_all(host, "disabled");
        }
        let Some(group) = resolve_active_group(&*host) else {
            return self.clear_all(host, "no active group");
        };

        let headers: Vec<_> = group.headers().take(MAX_NUMBERED_TABS).collect();
        let report = self.reconciler.reconcile(
            host.document_mut(),
            &headers,
            self.settings.badge_style(),
            self.modifier.is_held(),
        );
        tracing::debug!(
            group_size = group.len(),
            created = report.created,
            renumbered = report.renumbered,
            removed = report.removed,
            kept = report.kept,
            "badges reconciled"
        );
        report
    }

    /// Feed a key event. Returns the visibility transition it caused.
    pub fn handle_key(&mut self, host: &mut H, event: &KeyEvent) -> Option<ModifierTransition> {
        if !self.is_running() {
            return None;
        }
        let transition = self.modifier.feed(event)?;
        match transition {
            ModifierTransition::Pressed => self.reconciler.show(host.document_mut()),
            ModifierTransition::Released => self.reconciler.hide(host.document_mut()),
        }
        tracing::trace!(?transition, badges = self.reconciler.len(), "badge visibility");
        Some(transition)
    }

    /// Dispatch one host notification.
    pub fn handle_event(&mut self, host: &mut H, event: &HostEvent, now: Instant) {
        match event {
            HostEvent::LayoutChanged | HostEvent::ActivePaneChanged => self.refresh(now),
            HostEvent::Key(key) => {
                self.handle_key(host, key);
            }
        }
    }

    fn clear_all(&mut self, host: &mut H, reason: &'static str) -> ReconcileReport {
        let removed = self.reconciler.clear(host.document_mut());
        tracing::debug!(reason, removed, "badges cleared");
        ReconcileReport {
            removed,
            ..ReconcileReport::default()
        }
    }
}
