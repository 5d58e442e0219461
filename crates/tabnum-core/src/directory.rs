//! Pane directory: flat pane listing and header resolution.
//!
//! Hosts do not guarantee a stable forward pointer from a pane to its tab
//! header across all view types and render states, so header resolution is
//! a prioritized list of [`HeaderLookup`] strategies. Each strategy states
//! its own precondition and yields `None` when it does not apply; the first
//! strategy that produces an element wins.

use crate::host::{
    Document, ElementOf, Host, LEAF_ID_ATTR, TAB_HEADER_CLASS, WORKSPACE_LEAF_CLASS,
};

/// Every pane in the host's tree, pre-order and depth-first.
///
/// Empty when the host has no root.
#[must_use]
pub fn list_all_panes<H: Host + ?Sized>(host: &H) -> Vec<H::Pane> {
    host.root().map(|root| root.leaves()).unwrap_or_default()
}

/// One way of finding a pane's tab header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderLookup {
    /// The host exposes the header directly on the pane.
    DirectAssociation,
    /// The pane's leaf scope carries a leaf id; look the header up by it.
    LeafScopeAttribute,
    /// Scan all headers for one enclosed by the pane's leaf scope.
    DocumentScan,
}

impl HeaderLookup {
    /// Strategies in order of preference.
    pub const ORDER: [Self; 3] = [
        Self::DirectAssociation,
        Self::LeafScopeAttribute,
        Self::DocumentScan,
    ];

    /// Run this strategy alone.
    #[must_use]
    pub fn resolve<H: Host + ?Sized>(self, host: &H, pane: &H::Pane) -> Option<ElementOf<H>> {
        match self {
            Self::DirectAssociation => host.header_element(pane),
            Self::LeafScopeAttribute => {
                let document = host.document();
                let scope = leaf_scope(host, pane)?;
                let leaf_id = document
                    .attribute(scope, LEAF_ID_ATTR)
                    .filter(|id| !id.is_empty())?;
                document.find_by_class_and_attribute(TAB_HEADER_CLASS, LEAF_ID_ATTR, &leaf_id)
            }
            Self::DocumentScan => {
                let document = host.document();
                let scope = leaf_scope(host, pane)?;
                document
                    .find_all_by_class(TAB_HEADER_CLASS)
                    .into_iter()
                    .find(|&header| document.closest(header, WORKSPACE_LEAF_CLASS) == Some(scope))
            }
        }
    }
}

/// The pane's current tab header, or `None` when it is not mounted.
///
/// Never cache the result across refreshes: hosts re-parent and recreate
/// header elements freely.
#[must_use]
pub fn resolve_header_element<H: Host + ?Sized>(host: &H, pane: &H::Pane) -> Option<ElementOf<H>> {
    HeaderLookup::ORDER.iter().find_map(|&lookup| {
        let header = lookup.resolve(host, pane)?;
        tracing::trace!(?pane, ?lookup, ?header, "resolved tab header");
        Some(header)
    })
}

fn leaf_scope<H: Host + ?Sized>(host: &H, pane: &H::Pane) -> Option<ElementOf<H>> {
    let content = host.content_element(pane)?;
    host.document().closest(content, WORKSPACE_LEAF_CLASS)
}
