//! CommandBar implementation.
//!
//! This module provides [`CommandBar`], a bar of commands that moves items
//! into an overflow menu when the container is too small to show them all.
//! The bar is a thin layer over a [`ResizeGroup`]: its data is a
//! [`CommandBarData`] split into primary, overflow and far items, and the
//! default reduce and grow steps move one item at a time between the primary
//! list and the overflow menu.
//!
//! # Example
//!
//! ```
//! use horizon_fabric::command_bar::{CommandBar, CommandBarData, CommandBarItem};
//! use horizon_fabric::resize_group::MeasureSurface;
//! use horizon_fabric::{Orientation, Result};
//!
//! struct FixedWidthButtons;
//!
//! impl MeasureSurface<CommandBarData> for FixedWidthButtons {
//!     fn measure(&self, data: &CommandBarData, _: Orientation) -> Result<f32> {
//!         let overflow_button = if data.overflow_items.is_empty() { 0.0 } else { 40.0 };
//!         Ok(data.primary_items.len() as f32 * 80.0 + overflow_button)
//!     }
//!
//!     fn container_size(&self, _: Orientation) -> Result<f32> {
//!         Ok(300.0)
//!     }
//! }
//!
//! let mut bar = CommandBar::new(vec![
//!     CommandBarItem::new("new", "New"),
//!     CommandBarItem::new("upload", "Upload"),
//!     CommandBarItem::new("share", "Share"),
//!     CommandBarItem::new("download", "Download"),
//! ]);
//!
//! bar.data_reduced.connect(|item| println!("{} moved to overflow", item.name));
//!
//! bar.mount(&FixedWidthButtons).unwrap();
//! bar.settle(&FixedWidthButtons).unwrap();
//!
//! let layout = bar.layout().unwrap();
//! assert_eq!(layout.primary.items().len(), 3);
//! assert_eq!(layout.primary.overflow_items().len(), 1);
//! ```

use std::sync::Arc;

use horizon_fabric_core::logging::targets;
use horizon_fabric_core::{Result, Signal};

use crate::overflow_set::{OverflowItem, OverflowSet, RenderedEntry};
use crate::resize_group::{
    MeasureSurface, PassOutcome, ResizeGroup, ResizeGroupOptions, ResizeGroupProps, ScalingData,
    ScalingFn, SharedMeasurementCache,
};

// ============================================================================
// CommandBarItem
// ============================================================================

/// A single command shown in a [`CommandBar`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommandBarItem {
    /// Unique key of the command.
    pub key: String,
    /// Display text.
    pub name: String,
    /// Key used when building the bar's measurement key. Falls back to
    /// `key`; set it when the item's rendered size depends on more than its
    /// identity.
    pub cache_key: Option<String>,
    /// Whether only the icon is shown inline.
    pub icon_only: bool,
    /// Whether the item currently sits in the overflow menu because the bar
    /// moved it there.
    pub rendered_in_overflow: bool,
}

impl CommandBarItem {
    /// Create a command with the given key and display text.
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            cache_key: None,
            icon_only: false,
            rendered_in_overflow: false,
        }
    }

    /// Set the measurement key using builder pattern.
    pub fn with_cache_key(mut self, cache_key: impl Into<String>) -> Self {
        self.cache_key = Some(cache_key.into());
        self
    }

    /// Show only the icon inline, using builder pattern.
    pub fn with_icon_only(mut self, icon_only: bool) -> Self {
        self.icon_only = icon_only;
        self
    }

    /// The key contributed to the bar's measurement key.
    pub fn measurement_key(&self) -> &str {
        self.cache_key.as_deref().unwrap_or(&self.key)
    }
}

impl OverflowItem for CommandBarItem {
    fn key(&self) -> &str {
        &self.key
    }
}

// ============================================================================
// CommandBarData
// ============================================================================

/// The scaling data of a [`CommandBar`].
#[derive(Debug, Clone, PartialEq)]
pub struct CommandBarData {
    /// Items shown inline, in order.
    pub primary_items: Vec<CommandBarItem>,
    /// Items in the overflow menu, in order.
    pub overflow_items: Vec<CommandBarItem>,
    /// Items pinned to the far end of the bar. They never overflow.
    pub far_items: Vec<CommandBarItem>,
    /// Overflow items supplied by the caller. Growing never moves these out
    /// of the overflow menu.
    pub minimum_overflow_items: usize,
    /// Measurement key for this arrangement.
    pub cache_key: String,
}

impl CommandBarData {
    /// Create data for the ideal arrangement of the given items.
    pub fn new(
        primary_items: Vec<CommandBarItem>,
        overflow_items: Vec<CommandBarItem>,
        far_items: Vec<CommandBarItem>,
    ) -> Self {
        let mut data = Self {
            minimum_overflow_items: overflow_items.len(),
            primary_items,
            overflow_items,
            far_items,
            cache_key: String::new(),
        };
        data.cache_key = data.compute_cache_key();
        data
    }

    /// Build the measurement key of the current arrangement.
    ///
    /// Primary and far item keys are each concatenated, then joined with an
    /// `overflow` marker when the overflow menu is not empty.
    pub fn compute_cache_key(&self) -> String {
        let concat = |items: &[CommandBarItem]| -> String {
            items.iter().map(CommandBarItem::measurement_key).collect()
        };
        let overflow = if self.overflow_items.is_empty() {
            ""
        } else {
            "overflow"
        };
        [concat(&self.primary_items), concat(&self.far_items), overflow.to_owned()].join(" ")
    }

    /// Move one primary item to the head of the overflow menu.
    ///
    /// Takes the last primary item, or the first when `shift_on_reduce` is
    /// set. Returns the new data and the moved item, or `None` when no
    /// primary items are left.
    pub fn reduced(&self, shift_on_reduce: bool) -> Option<(Self, CommandBarItem)> {
        if self.primary_items.is_empty() {
            return None;
        }

        let mut next = self.clone();
        let mut moved = if shift_on_reduce {
            next.primary_items.remove(0)
        } else {
            next.primary_items.pop()?
        };
        moved.rendered_in_overflow = true;
        next.overflow_items.insert(0, moved.clone());
        next.cache_key = next.compute_cache_key();
        Some((next, moved))
    }

    /// Move the head of the overflow menu back into the primary items.
    ///
    /// The item goes to the end of the primary list, or the start when
    /// `shift_on_reduce` is set. Returns `None` when only the caller's own
    /// overflow items remain.
    pub fn grown(&self, shift_on_reduce: bool) -> Option<(Self, CommandBarItem)> {
        if self.overflow_items.len() <= self.minimum_overflow_items {
            return None;
        }

        let mut next = self.clone();
        let mut moved = next.overflow_items.remove(0);
        moved.rendered_in_overflow = false;
        if shift_on_reduce {
            next.primary_items.insert(0, moved.clone());
        } else {
            next.primary_items.push(moved.clone());
        }
        next.cache_key = next.compute_cache_key();
        Some((next, moved))
    }
}

impl ScalingData for CommandBarData {
    fn cache_key(&self) -> Option<&str> {
        Some(&self.cache_key)
    }
}

// ============================================================================
// CommandBarLayout
// ============================================================================

/// The committed arrangement of a [`CommandBar`], ready for painting.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandBarLayout {
    /// Primary items with the overflow menu.
    pub primary: OverflowSet<CommandBarItem>,
    /// Far items. Never has an overflow menu.
    pub far: OverflowSet<CommandBarItem>,
}

impl CommandBarLayout {
    /// Lay out committed data.
    pub fn from_data(data: &CommandBarData) -> Self {
        Self {
            primary: OverflowSet::new(data.primary_items.clone(), data.overflow_items.clone()),
            far: OverflowSet::new(data.far_items.clone(), Vec::new()),
        }
    }

    /// Render primary entries (with the overflow button) followed by far
    /// entries.
    pub fn render<O>(
        &self,
        mut render_item: impl FnMut(&CommandBarItem) -> O,
        render_overflow_button: impl FnOnce(&[CommandBarItem]) -> O,
    ) -> Vec<RenderedEntry<O>> {
        let mut entries = self.primary.render(&mut render_item, render_overflow_button);
        entries.extend(self.far.items().iter().map(|item| RenderedEntry {
            key: item.key.clone(),
            output: render_item(item),
        }));
        entries
    }
}

// ============================================================================
// CommandBar
// ============================================================================

/// A bar of commands that overflows into a menu.
///
/// # Signals
///
/// - `data_reduced`: emitted with the item moved into the overflow menu
/// - `data_grown`: emitted with the item moved back out of it
///
/// Both fire while candidates are being negotiated, so an item may be
/// reported as moved before the arrangement containing it is committed.
pub struct CommandBar {
    group: ResizeGroup<CommandBarData, CommandBarLayout>,
    items: Vec<CommandBarItem>,
    overflow_items: Vec<CommandBarItem>,
    far_items: Vec<CommandBarItem>,
    shift_on_reduce: bool,
    custom_reduce: Option<ScalingFn<CommandBarData>>,
    custom_grow: Option<ScalingFn<CommandBarData>>,

    /// Signal emitted when an item moves into the overflow menu.
    pub data_reduced: Arc<Signal<CommandBarItem>>,

    /// Signal emitted when an item moves out of the overflow menu.
    pub data_grown: Arc<Signal<CommandBarItem>>,
}

impl CommandBar {
    /// Create a command bar showing `items` inline when they fit.
    pub fn new(items: Vec<CommandBarItem>) -> Self {
        let data_reduced = Arc::new(Signal::new());
        let data_grown = Arc::new(Signal::new());
        let props = Self::build_props(
            CommandBarData::new(items.clone(), Vec::new(), Vec::new()),
            false,
            None,
            None,
            &data_reduced,
            &data_grown,
        );

        Self {
            group: ResizeGroup::new(props, CommandBarLayout::from_data),
            items,
            overflow_items: Vec::new(),
            far_items: Vec::new(),
            shift_on_reduce: false,
            custom_reduce: None,
            custom_grow: None,
            data_reduced,
            data_grown,
        }
    }

    /// Set items that always start in the overflow menu, using builder pattern.
    pub fn with_overflow_items(mut self, overflow_items: Vec<CommandBarItem>) -> Self {
        self.overflow_items = overflow_items;
        self.rebuild_props();
        self
    }

    /// Set items pinned to the far end, using builder pattern.
    pub fn with_far_items(mut self, far_items: Vec<CommandBarItem>) -> Self {
        self.far_items = far_items;
        self.rebuild_props();
        self
    }

    /// Overflow the first primary item instead of the last, using builder
    /// pattern.
    pub fn with_shift_on_reduce(mut self, shift_on_reduce: bool) -> Self {
        self.shift_on_reduce = shift_on_reduce;
        self.rebuild_props();
        self
    }

    /// Replace the default reduce step, using builder pattern.
    pub fn with_reduce_data<F>(mut self, reduce: F) -> Self
    where
        F: Fn(&CommandBarData) -> Option<CommandBarData> + Send + Sync + 'static,
    {
        self.custom_reduce = Some(Arc::new(reduce));
        self.rebuild_props();
        self
    }

    /// Replace the default grow step, using builder pattern.
    pub fn with_grow_data<F>(mut self, grow: F) -> Self
    where
        F: Fn(&CommandBarData) -> Option<CommandBarData> + Send + Sync + 'static,
    {
        self.custom_grow = Some(Arc::new(grow));
        self.rebuild_props();
        self
    }

    /// Set the resize group options using builder pattern.
    pub fn with_options(mut self, options: ResizeGroupOptions) -> Self {
        self.group = self.group.with_options(options);
        self
    }

    /// Measure through a shared cache, using builder pattern.
    pub fn with_cache(mut self, cache: SharedMeasurementCache) -> Self {
        self.group = self.group.with_cache(cache);
        self
    }

    /// Replace all items and renegotiate from the ideal arrangement.
    pub fn set_items(
        &mut self,
        items: Vec<CommandBarItem>,
        overflow_items: Vec<CommandBarItem>,
        far_items: Vec<CommandBarItem>,
    ) {
        self.items = items;
        self.overflow_items = overflow_items;
        self.far_items = far_items;
        self.rebuild_props();
    }

    fn rebuild_props(&mut self) {
        let props = Self::build_props(
            self.ideal_data(),
            self.shift_on_reduce,
            self.custom_reduce.clone(),
            self.custom_grow.clone(),
            &self.data_reduced,
            &self.data_grown,
        );
        self.group.set_props(props);
    }

    /// The arrangement with every non-overflow item inline.
    pub fn ideal_data(&self) -> CommandBarData {
        CommandBarData::new(
            self.items.clone(),
            self.overflow_items.clone(),
            self.far_items.clone(),
        )
    }

    fn build_props(
        data: CommandBarData,
        shift_on_reduce: bool,
        custom_reduce: Option<ScalingFn<CommandBarData>>,
        custom_grow: Option<ScalingFn<CommandBarData>>,
        data_reduced: &Arc<Signal<CommandBarItem>>,
        data_grown: &Arc<Signal<CommandBarItem>>,
    ) -> ResizeGroupProps<CommandBarData> {
        let reduce: ScalingFn<CommandBarData> = match custom_reduce {
            Some(reduce) => reduce,
            None => {
                let data_reduced = Arc::clone(data_reduced);
                Arc::new(move |data: &CommandBarData| {
                    let (next, moved) = data.reduced(shift_on_reduce)?;
                    tracing::trace!(target: targets::COMMAND_BAR, key = %moved.key, "moving item to overflow");
                    data_reduced.emit(moved);
                    Some(next)
                })
            }
        };
        let grow: ScalingFn<CommandBarData> = match custom_grow {
            Some(grow) => grow,
            None => {
                let data_grown = Arc::clone(data_grown);
                Arc::new(move |data: &CommandBarData| {
                    let (next, moved) = data.grown(shift_on_reduce)?;
                    tracing::trace!(target: targets::COMMAND_BAR, key = %moved.key, "moving item out of overflow");
                    data_grown.emit(moved);
                    Some(next)
                })
            }
        };

        ResizeGroupProps {
            data,
            on_reduce_data: reduce,
            on_grow_data: Some(grow),
        }
    }

    // =========================================================================
    // Negotiation
    // =========================================================================

    /// Attach the bar and run the first measurement pass.
    pub fn mount<S>(&mut self, surface: &S) -> Result<PassOutcome>
    where
        S: MeasureSurface<CommandBarData> + ?Sized,
    {
        self.group.mount(surface)
    }

    /// Run one measurement pass.
    pub fn process_pass<S>(&mut self, surface: &S) -> Result<PassOutcome>
    where
        S: MeasureSurface<CommandBarData> + ?Sized,
    {
        self.group.process_pass(surface)
    }

    /// Run passes until the arrangement settles.
    pub fn settle<S>(&mut self, surface: &S) -> Result<PassOutcome>
    where
        S: MeasureSurface<CommandBarData> + ?Sized,
    {
        self.group.settle(surface)
    }

    /// Detach the bar.
    pub fn unmount(&mut self) {
        self.group.unmount();
    }

    /// Renegotiate from the ideal arrangement, for example after item text
    /// changed.
    pub fn remeasure(&mut self) {
        tracing::debug!(target: targets::COMMAND_BAR, "remeasuring command bar");
        self.group.remeasure();
    }

    /// Mark the container as resized.
    pub fn notify_container_resized(&self) {
        self.group.notify_container_resized();
    }

    /// Follow the size reported by a resize observer.
    pub fn observe_container(&mut self, resized: &Signal<f32>) {
        self.group.observe_container(resized);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The committed layout.
    pub fn layout(&self) -> Option<&CommandBarLayout> {
        self.group.rendered_output()
    }

    /// The committed data.
    pub fn data(&self) -> Option<&CommandBarData> {
        self.group.rendered_data()
    }

    /// Whether items overflow the bar in the committed layout.
    pub fn has_overflow(&self) -> bool {
        self.layout().is_some_and(|layout| layout.primary.has_overflow())
    }

    /// Whether the first primary item overflows first.
    pub fn shift_on_reduce(&self) -> bool {
        self.shift_on_reduce
    }

    /// The underlying resize group.
    pub fn resize_group(&self) -> &ResizeGroup<CommandBarData, CommandBarLayout> {
        &self.group
    }
}

impl std::fmt::Debug for CommandBar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandBar")
            .field("items", &self.items.len())
            .field("overflow_items", &self.overflow_items.len())
            .field("far_items", &self.far_items.len())
            .field("shift_on_reduce", &self.shift_on_reduce)
            .field("group", &self.group)
            .finish()
    }
}
