//! Group resolver: the tab group holding the focused pane.
//!
//! The group container is found structurally, as the nearest
//! `workspace-tabs` ancestor of the focused pane's header. Membership is
//! decided by header containment, and members are ordered the way their
//! headers are displayed.
//!
//! # Ordering across parents
//!
//! All headers of one group normally share a single parent, the header
//! row. That is an observed layout property, not something the host
//! promises. When headers do sit under different parents the order is
//! still total: headers are grouped by parent in order of first
//! appearance among the candidates, then ordered by sibling index within
//! each parent.

use crate::directory::{list_all_panes, resolve_header_element};
use crate::host::{Document, ElementOf, Host, PRIMARY_VIEW_TYPES, WORKSPACE_TABS_CLASS};

/// A pane of the active group together with its resolved header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMember<P, E> {
    pub pane: P,
    pub header: E,
}

/// The resolved active tab group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveGroup<P, E> {
    /// The `workspace-tabs` container.
    pub container: E,
    /// Members in on-screen, left-to-right order.
    pub members: Vec<GroupMember<P, E>>,
}

impl<P, E: Copy> ActiveGroup<P, E> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Panes in display order.
    pub fn panes(&self) -> impl Iterator<Item = &P> {
        self.members.iter().map(|member| &member.pane)
    }

    /// Headers in display order.
    pub fn headers(&self) -> impl Iterator<Item = E> + '_ {
        self.members.iter().map(|member| member.header)
    }
}

/// Resolve the active group, or `None` when any link is missing (no
/// focused pane, no header for it, no enclosing group container).
#[must_use]
pub fn resolve_active_group<H: Host + ?Sized>(
    host: &H,
) -> Option<ActiveGroup<H::Pane, ElementOf<H>>> {
    let active = host.active_pane()?;
    let active_header = resolve_header_element(host, &active)?;
    let document = host.document();
    let container = document.closest(active_header, WORKSPACE_TABS_CLASS)?;

    let mut members: Vec<_> = candidate_panes(host)
        .into_iter()
        .filter_map(|pane| {
            let header = resolve_header_element(host, &pane)?;
            document
                .contains(container, header)
                .then_some(GroupMember { pane, header })
        })
        .collect();
    order_by_display(document, &mut members);

    Some(ActiveGroup { container, members })
}

/// Panes of the primary view types, followed by every other pane in the
/// tree (empty and newly opened panes). Each pane appears once.
#[must_use]
pub fn candidate_panes<H: Host + ?Sized>(host: &H) -> Vec<H::Pane> {
    let mut candidates: Vec<H::Pane> = PRIMARY_VIEW_TYPES
        .iter()
        .flat_map(|view_type| host.panes_of_type(view_type))
        .collect();
    let others: Vec<H::Pane> = list_all_panes(host)
        .into_iter()
        .filter(|pane| !candidates.contains(pane))
        .collect();
    candidates.extend(others);
    candidates
}

fn order_by_display<D: Document, P>(document: &D, members: &mut Vec<GroupMember<P, D::Element>>) {
    let mut parents: Vec<Option<D::Element>> = Vec::new();
    let mut keyed: Vec<((usize, usize), GroupMember<P, D::Element>)> = members
        .drain(..)
        .map(|member| {
            let parent = document.parent(member.header);
            let rank = match parents.iter().position(|&seen| seen == parent) {
                Some(rank) => rank,
                None => {
                    parents.push(parent);
                    parents.len() - 1
                }
            };
            let index = document.index_in_parent(member.header).unwrap_or(usize::MAX);
            ((rank, index), member)
        })
        .collect();
    keyed.sort_by_key(|(key, _)| *key);
    members.extend(keyed.into_iter().map(|(_, member)| member));
}
