//! Badge reconciler: minimal-diff maintenance of numbered badges.
//!
//! The reconciler exclusively owns every badge element and the mapping
//! from header element to badge. Each pass diffs the desired header list
//! against that mapping:
//!
//! - headers no longer desired lose their badge;
//! - headers that keep a badge are renumbered in place (label text and
//!   `data-tab-number` only; the badge element survives) and restyled;
//! - headers without a badge get a fresh one, as do headers whose badge
//!   element is no longer inside them.
//!
//! Visibility is a separate overlay: [`BadgeReconciler::set_visible`]
//! flips the display of every mapped badge without touching membership.

use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::host::{CLOSE_BUTTON_CLASS, Document};

/// Highest number a badge may carry.
///
/// The host's "jump to tab 9" shortcut targets the last tab rather than the
/// ninth, so a ninth badge would be misleading.
pub const MAX_NUMBERED_TABS: usize = 8;

/// Class carried by every badge element.
pub const BADGE_CLASS: &str = "tab-number-badge";

/// Attribute mirroring the badge label.
pub const TAB_NUMBER_ATTR: &str = "data-tab-number";

/// Style property holding the badge text color.
pub const TEXT_COLOR_PROPERTY: &str = "--tab-number-text-color";

/// Style property holding the badge background color.
pub const BACKGROUND_COLOR_PROPERTY: &str = "--tab-number-bg-color";

const DISPLAY_PROPERTY: &str = "display";
const DISPLAY_SHOWN: &str = "inline-flex";
const DISPLAY_HIDDEN: &str = "none";

/// Colors applied to every badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeStyle<'a> {
    pub text_color: &'a str,
    pub background_color: &'a str,
}

/// One attached badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge<E> {
    /// The badge element.
    pub element: E,
    /// Displayed number, `1..=MAX_NUMBERED_TABS`.
    pub number: u8,
}

/// What a reconciliation pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Badges created and inserted.
    pub created: usize,
    /// Existing badges whose number changed.
    pub renumbered: usize,
    /// Badges detached and dropped.
    pub removed: usize,
    /// Existing badges that stayed attached (renumbered ones included).
    pub kept: usize,
}

impl ReconcileReport {
    /// Badges attached after the pass.
    #[must_use]
    pub const fn attached(&self) -> usize {
        self.created + self.kept
    }

    /// Whether the pass changed no membership and no number.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.created == 0 && self.renumbered == 0 && self.removed == 0
    }
}

impl fmt::Display for ReconcileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "created={} renumbered={} removed={} kept={}",
            self.created, self.renumbered, self.removed, self.kept
        )
    }
}

/// Owner of the header → badge mapping.
#[derive(Debug, Clone)]
pub struct BadgeReconciler<E> {
    badges: FxHashMap<E, Badge<E>>,
}

impl<E> Default for BadgeReconciler<E> {
    fn default() -> Self {
        Self {
            badges: FxHashMap::default(),
        }
    }
}

impl<E: Copy + Eq + Hash + fmt::Debug> BadgeReconciler<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of attached badges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.badges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.badges.is_empty()
    }

    /// Badge attached to `header`, if any.
    #[must_use]
    pub fn badge_for(&self, header: E) -> Option<Badge<E>> {
        self.badges.get(&header).copied()
    }

    /// `(header, badge)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (E, Badge<E>)> + '_ {
        self.badges.iter().map(|(&header, &badge)| (header, badge))
    }

    /// Bring the badges in line with `headers`, given in display order.
    ///
    /// Only the first [`MAX_NUMBERED_TABS`] headers are numbered. A header
    /// listed twice keeps its first position. New badges start with
    /// `visible` as their visibility.
    pub fn reconcile<D>(
        &mut self,
        document: &mut D,
        headers: &[E],
        style: BadgeStyle<'_>,
        visible: bool,
    ) -> ReconcileReport
    where
        D: Document<Element = E>,
    {
        let mut report = ReconcileReport::default();
        let mut desired: Vec<E> = Vec::with_capacity(MAX_NUMBERED_TABS);
        for &header in headers.iter().take(MAX_NUMBERED_TABS) {
            if !desired.contains(&header) {
                desired.push(header);
            }
        }

        let stale: Vec<E> = self
            .badges
            .keys()
            .copied()
            .filter(|header| !desired.contains(header))
            .collect();
        for header in stale {
            if let Some(badge) = self.badges.remove(&header) {
                document.remove(badge.element);
                report.removed += 1;
            }
        }

        for (number, &header) in (1u8..).zip(desired.iter()) {
            // The host may strip a badge out of a header that stays mounted.
            if let Some(badge) = self.badges.get(&header).copied()
                && !document.contains(header, badge.element)
            {
                self.badges.remove(&header);
                document.remove(badge.element);
                report.removed += 1;
            }

            if let Some(badge) = self.badges.get_mut(&header) {
                if badge.number != number {
                    write_number(document, badge.element, number);
                    badge.number = number;
                    report.renumbered += 1;
                }
                apply_style(document, badge.element, style);
                report.kept += 1;
            } else {
                let element = create_badge(document, header, number, style, visible);
                self.badges.insert(header, Badge { element, number });
                report.created += 1;
            }
        }

        report
    }

    /// Show or hide every attached badge.
    pub fn set_visible<D>(&self, document: &mut D, visible: bool)
    where
        D: Document<Element = E>,
    {
        for badge in self.badges.values() {
            set_display(document, badge.element, visible);
        }
    }

    pub fn show<D: Document<Element = E>>(&self, document: &mut D) {
        self.set_visible(document, true);
    }

    pub fn hide<D: Document<Element = E>>(&self, document: &mut D) {
        self.set_visible(document, false);
    }

    /// Remove every badge and forget the mapping. Returns how many were
    /// removed.
    pub fn clear<D: Document<Element = E>>(&mut self, document: &mut D) -> usize {
        let removed = self.badges.len();
        for (_, badge) in self.badges.drain() {
            document.remove(badge.element);
        }
        removed
    }
}

fn create_badge<D: Document>(
    document: &mut D,
    header: D::Element,
    number: u8,
    style: BadgeStyle<'_>,
    visible: bool,
) -> D::Element {
    let badge = document.create_element("div");
    document.add_class(badge, BADGE_CLASS);
    write_number(document, badge, number);
    apply_style(document, badge, style);
    set_display(document, badge, visible);

    let close_button = document
        .find_descendant_by_class(header, CLOSE_BUTTON_CLASS)
        .and_then(|close| document.parent(close).map(|parent| (parent, close)));
    match close_button {
        Some((parent, close)) => document.insert_before(parent, badge, close),
        None => {
            document.set_style_property(header, "position", "relative");
            document.append_child(header, badge);
        }
    }
    badge
}

fn write_number<D: Document>(document: &mut D, badge: D::Element, number: u8) {
    let label = number.to_string();
    document.set_text(badge, &label);
    document.set_attribute(badge, TAB_NUMBER_ATTR, &label);
}

fn apply_style<D: Document>(document: &mut D, badge: D::Element, style: BadgeStyle<'_>) {
    document.set_style_property(badge, TEXT_COLOR_PROPERTY, style.text_color);
    document.set_style_property(badge, BACKGROUND_COLOR_PROPERTY, style.background_color);
}

fn set_display<D: Document>(document: &mut D, badge: D::Element, visible: bool) {
    let display = if visible { DISPLAY_SHOWN } else { DISPLAY_HIDDEN };
    document.set_style_property(badge, DISPLAY_PROPERTY, display);
}
