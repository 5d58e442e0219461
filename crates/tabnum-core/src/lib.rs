#![forbid(unsafe_code)]

//! Core: tab-group discovery and numbered badge reconciliation.
//!
//! # Role in tabnum
//! `tabnum-core` overlays numbered badges (1–8) on the tab headers of the
//! active tab group of a split-pane editor. Badges become visible while the
//! jump modifier (Ctrl or Meta) is held, so the user can see which number
//! jumps to which tab.
//!
//! # Primary responsibilities
//! - **Host interface** ([`host`]): the pane tree, per-pane fields, and
//!   document primitives the engine queries. The host owns all of it.
//! - **Pane directory** ([`directory`]): flat pane listing and the
//!   prioritized header lookup.
//! - **Group resolver** ([`group`]): the tab group holding the focused pane,
//!   in on-screen order.
//! - **Badge reconciler** ([`reconciler`]): minimal-diff badge maintenance.
//! - **Engine** ([`engine`]): debounced refresh scheduling, modifier
//!   tracking, and lifecycle; [`plugin`] wires it to settings persistence.
//!
//! # How it fits in the system
//! The host pushes [`engine::HostEvent`]s and advances time explicitly via
//! [`engine::TabNumbers::poll`]. Nothing blocks and nothing spawns threads;
//! every call runs to completion on the host's UI thread.

pub mod config;
pub mod directory;
pub mod engine;
pub mod error;
pub mod group;
pub mod host;
pub mod modifier;
pub mod plugin;
pub mod reconciler;
pub mod scheduler;
pub mod settings;

pub use config::EngineConfig;
pub use directory::{HeaderLookup, list_all_panes, resolve_header_element};
pub use engine::{EngineState, HostEvent, TabNumbers};
pub use error::SettingsError;
pub use group::{ActiveGroup, GroupMember, resolve_active_group};
pub use host::{Document, ElementOf, Host, PaneNode};
pub use modifier::{KeyEvent, KeyEventKind, ModifierState, ModifierTransition, Modifiers};
pub use plugin::TabNumbersPlugin;
pub use reconciler::{Badge, BadgeReconciler, BadgeStyle, MAX_NUMBERED_TABS, ReconcileReport};
pub use scheduler::RefreshScheduler;
pub use settings::{
    ColorField, HexColor, JsonFileStore, MemoryStore, Settings, SettingsEdit, SettingsStore,
};
