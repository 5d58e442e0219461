//! Host interface consumed by the engine.
//!
//! The host (the editor embedding tabnum) owns the pane tree, the pane
//! lifecycle, and the document that renders tab headers. The engine only
//! ever queries it fresh during a refresh pass and never keeps pane handles
//! or header elements across passes.
//!
//! Two seams:
//! - [`Document`]: DOM-like element primitives (ancestry, classes,
//!   attributes, lookups, and the few mutations badge maintenance needs).
//! - [`Host`]: the pane tree root, the focused pane, and per-pane fields.

use std::fmt;
use std::hash::Hash;

/// Class carried by the container holding one tab group's header row.
pub const WORKSPACE_TABS_CLASS: &str = "workspace-tabs";

/// Class carried by the scope element wrapping one pane's content.
pub const WORKSPACE_LEAF_CLASS: &str = "workspace-leaf";

/// Class carried by every tab header element.
pub const TAB_HEADER_CLASS: &str = "workspace-tab-header";

/// Class carried by the close control inside a tab header.
pub const CLOSE_BUTTON_CLASS: &str = "workspace-tab-header-inner-close-button";

/// Attribute linking a leaf scope to its tab header.
pub const LEAF_ID_ATTR: &str = "data-leaf-id";

/// View types the host treats as primary content, in candidate order.
pub const PRIMARY_VIEW_TYPES: [&str; 3] = ["markdown", "canvas", "pdf"];

/// Element handle type of a host's document.
pub type ElementOf<H> = <<H as Host>::Document as Document>::Element;

/// DOM-like element tree owned by the host.
///
/// Element handles are cheap copies. A handle may outlive the element it
/// names (the host can detach or recreate elements at any time); every
/// method must tolerate such stale handles, returning empty results for
/// queries and doing nothing for mutations.
pub trait Document {
    /// Handle to one element.
    type Element: Copy + Eq + Hash + fmt::Debug;

    /// Parent element, if attached.
    fn parent(&self, element: Self::Element) -> Option<Self::Element>;

    /// Children in document order.
    fn children(&self, element: Self::Element) -> Vec<Self::Element>;

    /// Whether the element carries `class`.
    fn has_class(&self, element: Self::Element, class: &str) -> bool;

    /// Attribute value, if set.
    fn attribute(&self, element: Self::Element, name: &str) -> Option<String>;

    /// Every attached element carrying `class`, in document order.
    fn find_all_by_class(&self, class: &str) -> Vec<Self::Element>;

    /// First descendant of `root` (excluding `root`) carrying `class`.
    fn find_descendant_by_class(&self, root: Self::Element, class: &str) -> Option<Self::Element>;

    /// Create a detached element.
    fn create_element(&mut self, tag: &str) -> Self::Element;

    fn add_class(&mut self, element: Self::Element, class: &str);

    fn set_attribute(&mut self, element: Self::Element, name: &str, value: &str);

    /// Replace the element's text content.
    fn set_text(&mut self, element: Self::Element, text: &str);

    /// Set an inline style property (including custom `--*` properties).
    fn set_style_property(&mut self, element: Self::Element, name: &str, value: &str);

    /// Insert `child` into `parent` immediately before `reference`.
    fn insert_before(
        &mut self,
        parent: Self::Element,
        child: Self::Element,
        reference: Self::Element,
    );

    /// Append `child` as the last child of `parent`.
    fn append_child(&mut self, parent: Self::Element, child: Self::Element);

    /// Detach and discard the element. Already-detached elements are a no-op.
    fn remove(&mut self, element: Self::Element);

    /// First element carrying `class`, in document order, whose attribute
    /// `name` equals `value`.
    fn find_by_class_and_attribute(
        &self,
        class: &str,
        name: &str,
        value: &str,
    ) -> Option<Self::Element> {
        self.find_all_by_class(class)
            .into_iter()
            .find(|&element| self.attribute(element, name).as_deref() == Some(value))
    }

    /// Nearest inclusive ancestor carrying `class`.
    fn closest(&self, element: Self::Element, class: &str) -> Option<Self::Element> {
        let mut current = Some(element);
        while let Some(candidate) = current {
            if self.has_class(candidate, class) {
                return Some(candidate);
            }
            current = self.parent(candidate);
        }
        None
    }

    /// Whether `element` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: Self::Element, element: Self::Element) -> bool {
        let mut current = Some(element);
        while let Some(candidate) = current {
            if candidate == ancestor {
                return true;
            }
            current = self.parent(candidate);
        }
        false
    }

    /// Position of the element among its parent's children.
    fn index_in_parent(&self, element: Self::Element) -> Option<usize> {
        let parent = self.parent(element)?;
        self.children(parent)
            .iter()
            .position(|&sibling| sibling == element)
    }
}

/// One node of the host's pane tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaneNode<P> {
    /// A content pane.
    Leaf(P),
    /// A split holding ordered children.
    Split(Vec<PaneNode<P>>),
}

impl<P: Clone> PaneNode<P> {
    /// All leaves in pre-order, depth-first.
    #[must_use]
    pub fn leaves(&self) -> Vec<P> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves(&self, out: &mut Vec<P>) {
        match self {
            Self::Leaf(pane) => out.push(pane.clone()),
            Self::Split(children) => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
        }
    }
}

/// The embedding editor, seen through the queries the engine needs.
pub trait Host {
    /// Opaque pane handle. Compared by identity.
    type Pane: Clone + PartialEq + fmt::Debug;

    /// The document rendering the tab strips.
    type Document: Document;

    fn document(&self) -> &Self::Document;

    fn document_mut(&mut self) -> &mut Self::Document;

    /// Root of the main pane tree, if the workspace is laid out.
    fn root(&self) -> Option<&PaneNode<Self::Pane>>;

    /// Currently focused pane.
    fn active_pane(&self) -> Option<Self::Pane>;

    /// View type tag of the pane (`"markdown"`, `"canvas"`, `"empty"`, ...).
    fn view_type(&self, pane: &Self::Pane) -> Option<&str>;

    /// Element wrapping the pane's content, if mounted.
    fn content_element(&self, pane: &Self::Pane) -> Option<ElementOf<Self>>;

    /// Header element, for hosts that keep a direct association.
    fn header_element(&self, _pane: &Self::Pane) -> Option<ElementOf<Self>> {
        None
    }

    /// Panes of one view type, in tree order.
    fn panes_of_type(&self, view_type: &str) -> Vec<Self::Pane> {
        crate::directory::list_all_panes(self)
            .into_iter()
            .filter(|pane| self.view_type(pane) == Some(view_type))
            .collect()
    }
}
