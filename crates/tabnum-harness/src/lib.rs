#![forbid(unsafe_code)]

//! Test harness and reference fixtures for tabnum.
//!
//! - [`ElementTree`]: arena document implementing
//!   [`Document`](tabnum_core::host::Document).
//! - [`MemoryWorkspace`]: split-pane workspace implementing
//!   [`Host`](tabnum_core::host::Host), rendering the tab-strip structure
//!   the engine resolves against, with the layout mutations an editor
//!   performs (open, close, drag, re-render, unmount).

pub mod dom;
pub mod workspace;

pub use dom::{ElementId, ElementTree};
pub use workspace::{GroupRef, MemoryWorkspace, PaneRef};
