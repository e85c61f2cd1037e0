//! A row of items with a trailing overflow button.
//!
//! [`OverflowSet`] is the presentational half of overflow handling: it knows
//! which items are shown inline and which are tucked into the overflow menu,
//! and lays out rendered entries accordingly. Deciding the split is left to a
//! [`ResizeGroup`](crate::resize_group::ResizeGroup) or the caller.
//!
//! # Example
//!
//! ```
//! use horizon_fabric::overflow_set::{OverflowItem, OverflowSet};
//!
//! #[derive(Debug, Clone)]
//! struct Link(&'static str);
//!
//! impl OverflowItem for Link {
//!     fn key(&self) -> &str {
//!         self.0
//!     }
//! }
//!
//! let set = OverflowSet::new(vec![Link("home"), Link("docs")], vec![Link("about")]);
//! let entries = set.render(
//!     |item| item.0.to_uppercase(),
//!     |hidden| format!("+{}", hidden.len()),
//! );
//!
//! let labels: Vec<_> = entries.iter().map(|entry| entry.output.as_str()).collect();
//! assert_eq!(labels, ["HOME", "DOCS", "+1"]);
//! ```

use horizon_fabric_core::Orientation;

/// Key of the entry rendered for the overflow button.
pub const OVERFLOW_BUTTON_KEY: &str = "overflow-button";

/// An item that can be shown inline or in an overflow menu.
pub trait OverflowItem {
    /// Stable identity of the item, unique within its set.
    fn key(&self) -> &str;
}

/// Which end of the set the overflow button sits on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OverflowSide {
    /// After the inline items.
    #[default]
    End,
    /// Before the inline items.
    Start,
}

/// One rendered entry of an overflow set.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEntry<O> {
    /// The item key, or [`OVERFLOW_BUTTON_KEY`] for the overflow button.
    pub key: String,
    /// Whatever the render callback produced.
    pub output: O,
}

impl<O> RenderedEntry<O> {
    /// Whether this entry is the overflow button.
    pub fn is_overflow_button(&self) -> bool {
        self.key == OVERFLOW_BUTTON_KEY
    }
}

/// Inline items plus the items hidden behind an overflow button.
#[derive(Debug, Clone, PartialEq)]
pub struct OverflowSet<I> {
    items: Vec<I>,
    overflow_items: Vec<I>,
    orientation: Orientation,
    overflow_side: OverflowSide,
}

impl<I> Default for OverflowSet<I> {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

impl<I> OverflowSet<I> {
    /// Create a horizontal set with the button at the end.
    pub fn new(items: Vec<I>, overflow_items: Vec<I>) -> Self {
        Self {
            items,
            overflow_items,
            orientation: Orientation::Horizontal,
            overflow_side: OverflowSide::End,
        }
    }

    /// Set the layout direction using builder pattern.
    ///
    /// The direction is layout metadata for the host, which stacks the
    /// rendered entries along it. [`render`](Self::render) emits entries in
    /// the same order for either axis.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set where the overflow button goes using builder pattern.
    pub fn with_overflow_side(mut self, side: OverflowSide) -> Self {
        self.overflow_side = side;
        self
    }

    /// Items shown inline.
    pub fn items(&self) -> &[I] {
        &self.items
    }

    /// Items shown in the overflow menu.
    pub fn overflow_items(&self) -> &[I] {
        &self.overflow_items
    }

    /// Layout direction the host should stack entries along.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Where the overflow button goes.
    pub fn overflow_side(&self) -> OverflowSide {
        self.overflow_side
    }

    /// Whether an overflow button will be rendered.
    pub fn has_overflow(&self) -> bool {
        !self.overflow_items.is_empty()
    }

    /// Total number of items, inline and overflow.
    pub fn len(&self) -> usize {
        self.items.len() + self.overflow_items.len()
    }

    /// Whether the set holds no items at all.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.overflow_items.is_empty()
    }
}

impl<I: OverflowItem> OverflowSet<I> {
    /// Render the set in layout order.
    ///
    /// `render_item` runs once per inline item. `render_overflow_button` runs
    /// once with the overflow items, and only if there are any.
    pub fn render<O>(
        &self,
        mut render_item: impl FnMut(&I) -> O,
        render_overflow_button: impl FnOnce(&[I]) -> O,
    ) -> Vec<RenderedEntry<O>> {
        let mut entries: Vec<RenderedEntry<O>> = self
            .items
            .iter()
            .map(|item| RenderedEntry {
                key: item.key().to_owned(),
                output: render_item(item),
            })
            .collect();

        if self.has_overflow() {
            let button = RenderedEntry {
                key: OVERFLOW_BUTTON_KEY.to_owned(),
                output: render_overflow_button(&self.overflow_items),
            };
            match self.overflow_side {
                OverflowSide::End => entries.push(button),
                OverflowSide::Start => entries.insert(0, button),
            }
        }

        entries
    }

    /// Find an item by key, inline or in the overflow menu.
    pub fn find(&self, key: &str) -> Option<&I> {
        self.items
            .iter()
            .chain(&self.overflow_items)
            .find(|item| item.key() == key)
    }

    /// Whether the item with `key` is hidden in the overflow menu.
    pub fn is_overflowed(&self, key: &str) -> bool {
        self.overflow_items.iter().any(|item| item.key() == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item(&'static str);

    impl OverflowItem for Item {
        fn key(&self) -> &str {
            self.0
        }
    }

    fn keys<O>(entries: &[RenderedEntry<O>]) -> Vec<&str> {
        entries.iter().map(|entry| entry.key.as_str()).collect()
    }

    #[test]
    fn test_renders_items_then_overflow_button() {
        let set = OverflowSet::new(vec![Item("a"), Item("b")], vec![Item("c"), Item("d")]);

        let entries = set.render(|item| item.0.len(), |hidden| hidden.len());

        assert_eq!(keys(&entries), ["a", "b", OVERFLOW_BUTTON_KEY]);
        assert_eq!(entries[2].output, 2);
        assert!(entries[2].is_overflow_button());
        assert!(!entries[0].is_overflow_button());
    }

    #[test]
    fn test_no_button_without_overflow() {
        let set = OverflowSet::new(vec![Item("a")], Vec::new());
        let mut button_rendered = false;

        let entries = set.render(|_| (), |_| button_rendered = true);

        assert_eq!(keys(&entries), ["a"]);
        assert!(!button_rendered);
        assert!(!set.has_overflow());
    }

    #[test]
    fn test_overflow_button_at_start() {
        let set = OverflowSet::new(vec![Item("a")], vec![Item("b")])
            .with_overflow_side(OverflowSide::Start);

        let entries = set.render(|_| (), |_| ());

        assert_eq!(keys(&entries), [OVERFLOW_BUTTON_KEY, "a"]);
    }

    #[test]
    fn test_lookup() {
        let set = OverflowSet::new(vec![Item("a")], vec![Item("b")])
            .with_orientation(Orientation::Vertical);

        assert_eq!(set.find("b"), Some(&Item("b")));
        assert_eq!(set.find("z"), None);
        assert!(set.is_overflowed("b"));
        assert!(!set.is_overflowed("a"));
        assert_eq!(set.len(), 2);
        assert_eq!(set.orientation(), Orientation::Vertical);
    }

    #[test]
    fn test_orientation_does_not_change_entry_order() {
        let horizontal = OverflowSet::new(vec![Item("a"), Item("b")], vec![Item("c")]);
        let vertical = horizontal.clone().with_orientation(Orientation::Vertical);

        let across = horizontal.render(|_| (), |_| ());
        let down = vertical.render(|_| (), |_| ());

        assert_eq!(keys(&across), keys(&down));
        assert_eq!(vertical.orientation(), Orientation::Vertical);
    }

    #[test]
    fn test_empty_set() {
        let set = OverflowSet::<Item>::default();
        assert!(set.is_empty());
        assert!(set.render(|_| (), |_| ()).is_empty());
    }
}
