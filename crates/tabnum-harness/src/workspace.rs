//! In-memory split-pane workspace implementing [`Host`].
//!
//! Each tab group renders the structure tabnum expects from the editor:
//!
//! ```text
//! div.workspace-split.mod-root
//!   div.workspace-tabs                                  (one per group)
//!     div.workspace-tab-header-container
//!       div.workspace-tab-header-container-inner        (header row)
//!         div.workspace-tab-header[data-leaf-id]
//!           div.workspace-tab-header-inner
//!             div.workspace-tab-header-inner-title
//!             div.workspace-tab-header-inner-close-button
//!     div.workspace-tab-container
//!       div.workspace-leaf[data-leaf-id]
//!         div.workspace-leaf-content[data-type]         (content element)
//! ```
//!
//! Mutations mirror what the editor does to a live layout: opening and
//! closing panes, dragging tabs within and across groups, re-rendering or
//! unmounting headers. The pane tree returned by [`Host::root`] keeps the
//! order panes were opened in; display order lives only in the document,
//! as it does in the editor after a drag.

use std::collections::BTreeMap;

use tabnum_core::host::{
    CLOSE_BUTTON_CLASS, Document, Host, LEAF_ID_ATTR, PaneNode, TAB_HEADER_CLASS,
    WORKSPACE_LEAF_CLASS, WORKSPACE_TABS_CLASS,
};
use tabnum_core::reconciler::{BADGE_CLASS, TAB_NUMBER_ATTR};

use crate::dom::{ElementId, ElementTree};

/// Handle to one pane of a [`MemoryWorkspace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PaneRef(u32);

impl PaneRef {
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Handle to one tab group of a [`MemoryWorkspace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupRef(usize);

#[derive(Debug, Clone)]
struct PaneRecord {
    view_type: String,
    group: GroupRef,
    header: ElementId,
    leaf: ElementId,
    content: ElementId,
    expose_header: bool,
}

#[derive(Debug, Clone)]
struct GroupRecord {
    header_row: ElementId,
    tab_container: ElementId,
    panes: Vec<PaneRef>,
}

/// A live, externally mutated workspace.
#[derive(Debug, Clone)]
pub struct MemoryWorkspace {
    document: ElementTree,
    split: ElementId,
    groups: Vec<GroupRecord>,
    panes: BTreeMap<PaneRef, PaneRecord>,
    tree: Option<PaneNode<PaneRef>>,
    active: Option<PaneRef>,
    next_pane: u32,
}

impl Default for MemoryWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryWorkspace {
    /// Empty workspace with a root split and no groups.
    #[must_use]
    pub fn new() -> Self {
        let mut document = ElementTree::new();
        let split = document.append(document.root(), "div", &["workspace-split", "mod-root"]);
        let mut workspace = Self {
            document,
            split,
            groups: Vec::new(),
            panes: BTreeMap::new(),
            tree: None,
            active: None,
            next_pane: 1,
        };
        workspace.rebuild_tree();
        workspace
    }

    /// Workspace with one group of `count` markdown panes, the first focused.
    #[must_use]
    pub fn with_single_group(count: usize) -> (Self, GroupRef, Vec<PaneRef>) {
        let mut workspace = Self::new();
        let group = workspace.add_group();
        let panes: Vec<PaneRef> = (0..count)
            .map(|_| workspace.open(group, "markdown"))
            .collect();
        if let Some(&first) = panes.first() {
            workspace.focus(first);
        }
        (workspace, group, panes)
    }

    /// Add an empty tab group to the right of the existing ones.
    pub fn add_group(&mut self) -> GroupRef {
        let tabs = self.document.append(self.split, "div", &[WORKSPACE_TABS_CLASS]);
        let header_container = self
            .document
            .append(tabs, "div", &["workspace-tab-header-container"]);
        let header_row = self.document.append(
            header_container,
            "div",
            &["workspace-tab-header-container-inner"],
        );
        let tab_container = self.document.append(tabs, "div", &["workspace-tab-container"]);
        self.groups.push(GroupRecord {
            header_row,
            tab_container,
            panes: Vec::new(),
        });
        self.rebuild_tree();
        GroupRef(self.groups.len() - 1)
    }

    /// Open a pane of `view_type` as the last tab of `group`.
    ///
    /// # Panics
    ///
    /// Panics if `group` does not belong to this workspace.
    pub fn open(&mut self, group: GroupRef, view_type: &str) -> PaneRef {
        let pane = PaneRef(self.next_pane);
        self.next_pane += 1;
        let leaf_id = pane.0.to_string();
        let record = &self.groups[group.0];
        let (header_row, tab_container) = (record.header_row, record.tab_container);

        let header = self.document.append(header_row, "div", &[TAB_HEADER_CLASS]);
        self.document.set_attribute(header, LEAF_ID_ATTR, &leaf_id);
        let inner = self
            .document
            .append(header, "div", &["workspace-tab-header-inner"]);
        let title = self
            .document
            .append(inner, "div", &["workspace-tab-header-inner-title"]);
        self.document.set_text(title, &format!("{view_type} {leaf_id}"));
        self.document.append(inner, "div", &[CLOSE_BUTTON_CLASS]);

        let leaf = self
            .document
            .append(tab_container, "div", &[WORKSPACE_LEAF_CLASS]);
        self.document.set_attribute(leaf, LEAF_ID_ATTR, &leaf_id);
        let content = self
            .document
            .append(leaf, "div", &["workspace-leaf-content"]);
        self.document.set_attribute(content, "data-type", view_type);

        self.panes.insert(
            pane,
            PaneRecord {
                view_type: view_type.to_owned(),
                group,
                header,
                leaf,
                content,
                expose_header: true,
            },
        );
        self.groups[group.0].panes.push(pane);
        self.rebuild_tree();
        tracing::trace!(pane = pane.0, group = group.0, view_type, "pane opened");
        pane
    }

    /// Close a pane: its header and leaf leave the document. Closing the
    /// focused pane moves focus to the tab that takes its place, or to the
    /// new last tab, and clears it when the group is left empty.
    pub fn close(&mut self, pane: PaneRef) {
        let Some(group) = self.panes.get(&pane).map(|record| record.group) else {
            return;
        };
        let position = self
            .display_order(group)
            .iter()
            .position(|&p| p == pane)
            .unwrap_or(0);

        let Some(record) = self.panes.remove(&pane) else {
            return;
        };
        self.document.detach(record.header);
        self.document.detach(record.leaf);
        self.groups[group.0].panes.retain(|&p| p != pane);
        if self.active == Some(pane) {
            let remaining = self.display_order(group);
            self.active = remaining
                .get(position)
                .or_else(|| remaining.last())
                .copied();
        }
        self.rebuild_tree();
    }

    pub fn focus(&mut self, pane: PaneRef) {
        if self.panes.contains_key(&pane) {
            self.active = Some(pane);
        }
    }

    pub fn clear_focus(&mut self) {
        self.active = None;
    }

    /// Drag a tab to display position `index` within its group. The pane
    /// tree order is left untouched.
    pub fn move_tab(&mut self, pane: PaneRef, index: usize) {
        let Some(record) = self.panes.get(&pane) else {
            return;
        };
        let (header, header_row) = (record.header, self.groups[record.group.0].header_row);
        self.document.insert_at(header_row, header, index);
    }

    /// Drag a tab into another group, as its last tab.
    pub fn move_to_group(&mut self, pane: PaneRef, target: GroupRef) {
        let Some(record) = self.panes.get_mut(&pane) else {
            return;
        };
        let source = record.group;
        record.group = target;
        let (header, leaf) = (record.header, record.leaf);

        self.groups[source.0].panes.retain(|&p| p != pane);
        self.groups[target.0].panes.push(pane);
        let (header_row, tab_container) = (
            self.groups[target.0].header_row,
            self.groups[target.0].tab_container,
        );
        self.document.append_child(header_row, header);
        self.document.append_child(tab_container, leaf);
        self.rebuild_tree();
    }

    /// Stop exposing the pane's header directly, forcing lookups through
    /// the document.
    pub fn hide_direct_header(&mut self, pane: PaneRef) {
        if let Some(record) = self.panes.get_mut(&pane) {
            record.expose_header = false;
        }
    }

    /// Strip the leaf id and re-mount the header inside the pane's leaf
    /// scope, leaving only the document scan able to find it.
    pub fn mount_header_inside_leaf(&mut self, pane: PaneRef) {
        let Some(record) = self.panes.get_mut(&pane) else {
            return;
        };
        record.expose_header = false;
        let (header, leaf) = (record.header, record.leaf);
        self.document.remove_attribute(leaf, LEAF_ID_ATTR);
        self.document.remove_attribute(header, LEAF_ID_ATTR);
        self.document.insert_at(leaf, header, 0);
    }

    /// Replace the pane's header with a freshly rendered element in the
    /// same position. Returns the new header.
    pub fn rerender_header(&mut self, pane: PaneRef) -> Option<ElementId> {
        let record = self.panes.get(&pane)?;
        let old = record.header;
        let parent = self.document.parent(old)?;
        let index = self.document.index_in_parent(old)?;

        let header = self.document.create("div", &[TAB_HEADER_CLASS]);
        self.document
            .set_attribute(header, LEAF_ID_ATTR, &pane.0.to_string());
        let inner = self
            .document
            .append(header, "div", &["workspace-tab-header-inner"]);
        self.document.append(inner, "div", &[CLOSE_BUTTON_CLASS]);
        self.document.detach(old);
        self.document.insert_at(parent, header, index);

        if let Some(record) = self.panes.get_mut(&pane) {
            record.header = header;
        }
        Some(header)
    }

    /// Take the pane's header out of the document without closing the pane.
    pub fn unmount_header(&mut self, pane: PaneRef) {
        if let Some(record) = self.panes.get(&pane) {
            self.document.detach(record.header);
        }
    }

    /// Remove the close button from the pane's header.
    pub fn remove_close_button(&mut self, pane: PaneRef) {
        let Some(header) = self.header(pane) else {
            return;
        };
        if let Some(close) = self.document.find_descendant_by_class(header, CLOSE_BUTTON_CLASS) {
            self.document.detach(close);
        }
    }

    #[must_use]
    pub fn document(&self) -> &ElementTree {
        &self.document
    }

    /// Header element currently rendered for the pane.
    #[must_use]
    pub fn header(&self, pane: PaneRef) -> Option<ElementId> {
        self.panes.get(&pane).map(|record| record.header)
    }

    /// Panes of `group` in display order.
    #[must_use]
    pub fn display_order(&self, group: GroupRef) -> Vec<PaneRef> {
        let Some(record) = self.groups.get(group.0) else {
            return Vec::new();
        };
        self.document
            .children(record.header_row)
            .into_iter()
            .filter_map(|header| {
                self.panes
                    .iter()
                    .find(|(_, pane)| pane.header == header)
                    .map(|(&pane, _)| pane)
            })
            .collect()
    }

    /// Badge element attached to the pane's header.
    #[must_use]
    pub fn badge(&self, pane: PaneRef) -> Option<ElementId> {
        let header = self.header(pane)?;
        self.document.find_descendant_by_class(header, BADGE_CLASS)
    }

    /// Badge label shown on the pane's header.
    #[must_use]
    pub fn badge_label(&self, pane: PaneRef) -> Option<String> {
        let badge = self.badge(pane)?;
        self.document.text(badge).map(str::to_owned)
    }

    /// `data-tab-number` of the pane's badge.
    #[must_use]
    pub fn badge_number_attr(&self, pane: PaneRef) -> Option<String> {
        let badge = self.badge(pane)?;
        self.document.attribute(badge, TAB_NUMBER_ATTR)
    }

    /// Whether the pane's badge is displayed.
    #[must_use]
    pub fn badge_visible(&self, pane: PaneRef) -> Option<bool> {
        let badge = self.badge(pane)?;
        Some(self.document.style(badge, "display") == Some("inline-flex"))
    }

    /// Labels for every pane of `group`, in display order.
    #[must_use]
    pub fn labels(&self, group: GroupRef) -> Vec<Option<String>> {
        self.display_order(group)
            .into_iter()
            .map(|pane| self.badge_label(pane))
            .collect()
    }

    /// Every badge element attached anywhere in the document.
    #[must_use]
    pub fn attached_badges(&self) -> Vec<ElementId> {
        self.document.find_all_by_class(BADGE_CLASS)
    }

    fn rebuild_tree(&mut self) {
        let groups = self
            .groups
            .iter()
            .map(|group| PaneNode::Split(group.panes.iter().copied().map(PaneNode::Leaf).collect()))
            .collect();
        self.tree = Some(PaneNode::Split(groups));
    }
}

impl Host for MemoryWorkspace {
    type Pane = PaneRef;
    type Document = ElementTree;

    fn document(&self) -> &ElementTree {
        &self.document
    }

    fn document_mut(&mut self) -> &mut ElementTree {
        &mut self.document
    }

    fn root(&self) -> Option<&PaneNode<PaneRef>> {
        self.tree.as_ref()
    }

    fn active_pane(&self) -> Option<PaneRef> {
        self.active
    }

    fn view_type(&self, pane: &PaneRef) -> Option<&str> {
        self.panes.get(pane).map(|record| record.view_type.as_str())
    }

    fn content_element(&self, pane: &PaneRef) -> Option<ElementId> {
        self.panes.get(pane).map(|record| record.content)
    }

    fn header_element(&self, pane: &PaneRef) -> Option<ElementId> {
        self.panes
            .get(pane)
            .filter(|record| record.expose_header && self.document.is_attached(record.header))
            .map(|record| record.header)
    }
}
