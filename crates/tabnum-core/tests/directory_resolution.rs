//! Pane directory: tree listing and the header lookup fallbacks.

use pretty_assertions::assert_eq;
use tabnum_core::directory::{HeaderLookup, list_all_panes, resolve_header_element};
use tabnum_core::group::resolve_active_group;
use tabnum_core::host::{Host, PaneNode};
use tabnum_harness::{ElementId, ElementTree, MemoryWorkspace};

/// A host whose workspace has not been laid out yet.
struct Unlaid {
    document: ElementTree,
}

impl Host for Unlaid {
    type Pane = u32;
    type Document = ElementTree;

    fn document(&self) -> &ElementTree {
        &self.document
    }

    fn document_mut(&mut self) -> &mut ElementTree {
        &mut self.document
    }

    fn root(&self) -> Option<&PaneNode<u32>> {
        None
    }

    fn active_pane(&self) -> Option<u32> {
        Some(1)
    }

    fn view_type(&self, _pane: &u32) -> Option<&str> {
        None
    }

    fn content_element(&self, _pane: &u32) -> Option<ElementId> {
        None
    }
}

#[test]
fn missing_root_lists_nothing() {
    let host = Unlaid {
        document: ElementTree::new(),
    };
    assert!(list_all_panes(&host).is_empty());
    assert!(host.panes_of_type("markdown").is_empty());
    assert_eq!(resolve_header_element(&host, &1), None);
    assert!(resolve_active_group(&host).is_none());
}

#[test]
fn nested_splits_list_in_preorder() {
    let tree = PaneNode::Split(vec![
        PaneNode::Leaf('a'),
        PaneNode::Split(vec![PaneNode::Leaf('b'), PaneNode::Split(vec![])]),
        PaneNode::Split(vec![PaneNode::Split(vec![PaneNode::Leaf('c')])]),
        PaneNode::Leaf('d'),
    ]);
    assert_eq!(tree.leaves(), vec!['a', 'b', 'c', 'd']);
}

#[test]
fn lists_panes_across_groups_in_tree_order() {
    let mut ws = MemoryWorkspace::new();
    let left = ws.add_group();
    let right = ws.add_group();
    let a = ws.open(left, "markdown");
    let c = ws.open(right, "pdf");
    let b = ws.open(left, "empty");

    assert_eq!(list_all_panes(&ws), vec![a, b, c]);

    ws.move_to_group(a, right);
    assert_eq!(list_all_panes(&ws), vec![b, c, a]);

    ws.close(c);
    assert_eq!(list_all_panes(&ws), vec![b, a]);
}

#[test]
fn panes_of_type_filters_by_view_type() {
    let mut ws = MemoryWorkspace::new();
    let group = ws.add_group();
    let md = ws.open(group, "markdown");
    let _canvas = ws.open(group, "canvas");
    let md2 = ws.open(group, "markdown");

    assert_eq!(ws.panes_of_type("markdown"), vec![md, md2]);
    assert!(ws.panes_of_type("graph").is_empty());
}

#[test]
fn direct_association_wins_when_exposed() {
    let (ws, _, panes) = MemoryWorkspace::with_single_group(2);
    let header = ws.header(panes[1]);

    assert_eq!(
        HeaderLookup::DirectAssociation.resolve(&ws, &panes[1]),
        header
    );
    assert_eq!(resolve_header_element(&ws, &panes[1]), header);
}

#[test]
fn leaf_id_lookup_covers_hidden_association() {
    let (mut ws, _, panes) = MemoryWorkspace::with_single_group(3);
    ws.hide_direct_header(panes[2]);
    let header = ws.header(panes[2]);

    assert_eq!(HeaderLookup::DirectAssociation.resolve(&ws, &panes[2]), None);
    assert_eq!(
        HeaderLookup::LeafScopeAttribute.resolve(&ws, &panes[2]),
        header
    );
    assert_eq!(resolve_header_element(&ws, &panes[2]), header);
}

#[test]
fn document_scan_is_last_resort() {
    let (mut ws, _, panes) = MemoryWorkspace::with_single_group(2);
    ws.mount_header_inside_leaf(panes[0]);
    let header = ws.header(panes[0]);

    assert_eq!(HeaderLookup::DirectAssociation.resolve(&ws, &panes[0]), None);
    assert_eq!(HeaderLookup::LeafScopeAttribute.resolve(&ws, &panes[0]), None);
    assert_eq!(HeaderLookup::DocumentScan.resolve(&ws, &panes[0]), header);
    assert_eq!(resolve_header_element(&ws, &panes[0]), header);
}

#[test]
fn document_scan_ignores_other_leaves() {
    let (ws, _, panes) = MemoryWorkspace::with_single_group(2);
    // Headers live in the header row, outside every leaf scope.
    assert_eq!(HeaderLookup::DocumentScan.resolve(&ws, &panes[1]), None);
}

#[test]
fn unmounted_header_resolves_to_nothing() {
    let (mut ws, _, panes) = MemoryWorkspace::with_single_group(2);
    ws.unmount_header(panes[1]);

    for lookup in HeaderLookup::ORDER {
        assert_eq!(lookup.resolve(&ws, &panes[1]), None, "{lookup:?}");
    }
    assert_eq!(resolve_header_element(&ws, &panes[1]), None);
}

#[test]
fn rerendered_header_is_resolved_fresh() {
    let (mut ws, _, panes) = MemoryWorkspace::with_single_group(2);
    let before = resolve_header_element(&ws, &panes[0]);
    let after = ws.rerender_header(panes[0]);

    assert!(after.is_some());
    assert_ne!(before, after);
    assert_eq!(resolve_header_element(&ws, &panes[0]), after);

    ws.hide_direct_header(panes[0]);
    assert_eq!(resolve_header_element(&ws, &panes[0]), after);
}
