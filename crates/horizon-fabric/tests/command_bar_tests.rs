//! Command bar negotiation tests.

use std::cell::Cell;
use std::sync::Arc;

use horizon_fabric::command_bar::{CommandBar, CommandBarData, CommandBarItem};
use horizon_fabric::overflow_set::OVERFLOW_BUTTON_KEY;
use horizon_fabric::resize_group::{MeasureSurface, PassOutcome, SharedMeasurementCache};
use horizon_fabric::{Orientation, Result};
use parking_lot::Mutex;

const OVERFLOW_BUTTON_WIDTH: f32 = 32.0;

/// Lays out buttons with fixed-width glyphs.
struct TextMetrics {
    container: Cell<f32>,
    glyph_width: Cell<f32>,
    measure_calls: Cell<usize>,
}

impl TextMetrics {
    fn new(container: f32) -> Self {
        Self {
            container: Cell::new(container),
            glyph_width: Cell::new(8.0),
            measure_calls: Cell::new(0),
        }
    }

    fn button_width(&self, item: &CommandBarItem) -> f32 {
        if item.icon_only {
            32.0
        } else {
            item.name.len() as f32 * self.glyph_width.get() + 16.0
        }
    }
}

impl MeasureSurface<CommandBarData> for TextMetrics {
    fn measure(&self, data: &CommandBarData, _orientation: Orientation) -> Result<f32> {
        self.measure_calls.set(self.measure_calls.get() + 1);
        let buttons: f32 = data
            .primary_items
            .iter()
            .chain(&data.far_items)
            .map(|item| self.button_width(item))
            .sum();
        let overflow = if data.overflow_items.is_empty() {
            0.0
        } else {
            OVERFLOW_BUTTON_WIDTH
        };
        Ok(buttons + overflow)
    }

    fn container_size(&self, _orientation: Orientation) -> Result<f32> {
        Ok(self.container.get())
    }
}

/// Widths at 8px per glyph: 40, 64, 56, 80, 48.
fn commands() -> Vec<CommandBarItem> {
    vec![
        CommandBarItem::new("new", "New"),
        CommandBarItem::new("upload", "Upload"),
        CommandBarItem::new("share", "Share"),
        CommandBarItem::new("download", "Download"),
        CommandBarItem::new("sync", "Sync"),
    ]
}

/// 48px wide.
fn far_commands() -> Vec<CommandBarItem> {
    vec![CommandBarItem::new("info", "Info")]
}

fn keys(items: &[CommandBarItem]) -> Vec<&str> {
    items.iter().map(|item| item.key.as_str()).collect()
}

fn record(signal: &horizon_fabric::Signal<CommandBarItem>) -> Arc<Mutex<Vec<String>>> {
    let moved = Arc::new(Mutex::new(Vec::new()));
    let sink = moved.clone();
    signal.connect(move |item| sink.lock().push(item.key.clone()));
    moved
}

fn settled_bar(surface: &TextMetrics) -> CommandBar {
    let mut bar = CommandBar::new(commands()).with_far_items(far_commands());
    bar.mount(surface).unwrap();
    assert_eq!(bar.settle(surface).unwrap(), PassOutcome::Settled);
    bar
}

#[test]
fn test_everything_fits() {
    let surface = TextMetrics::new(400.0);
    let mut bar = CommandBar::new(commands()).with_far_items(far_commands());
    let reduced = record(&bar.data_reduced);

    bar.mount(&surface).unwrap();
    bar.settle(&surface).unwrap();

    let data = bar.data().unwrap();
    assert_eq!(keys(&data.primary_items), ["new", "upload", "share", "download", "sync"]);
    assert!(data.overflow_items.is_empty());
    assert!(!bar.has_overflow());
    assert!(reduced.lock().is_empty());
    assert_eq!(surface.measure_calls.get(), 1);
}

#[test]
fn test_last_items_overflow_first() {
    let surface = TextMetrics::new(250.0);
    let mut bar = CommandBar::new(commands()).with_far_items(far_commands());
    let reduced = record(&bar.data_reduced);

    bar.mount(&surface).unwrap();
    bar.settle(&surface).unwrap();

    let data = bar.data().unwrap();
    assert_eq!(keys(&data.primary_items), ["new", "upload", "share"]);
    assert_eq!(keys(&data.overflow_items), ["download", "sync"]);
    assert_eq!(keys(&data.far_items), ["info"]);
    assert!(data.overflow_items.iter().all(|item| item.rendered_in_overflow));
    assert_eq!(*reduced.lock(), ["sync", "download"]);
    assert!(bar.has_overflow());
}

#[test]
fn test_shift_on_reduce_overflows_leading_items() {
    let surface = TextMetrics::new(250.0);
    let mut bar = CommandBar::new(commands())
        .with_far_items(far_commands())
        .with_shift_on_reduce(true);

    bar.mount(&surface).unwrap();
    bar.settle(&surface).unwrap();

    let data = bar.data().unwrap();
    assert_eq!(keys(&data.primary_items), ["download", "sync"]);
    assert_eq!(keys(&data.overflow_items), ["share", "upload", "new"]);
}

#[test]
fn test_growing_moves_items_back_one_at_a_time() {
    let surface = TextMetrics::new(250.0);
    let mut bar = settled_bar(&surface);
    let grown = record(&bar.data_grown);
    let reduced = record(&bar.data_reduced);

    // Download comes back but no longer fits, so it overflows again.
    surface.container.set(300.0);
    bar.notify_container_resized();
    bar.settle(&surface).unwrap();
    assert_eq!(keys(&bar.data().unwrap().primary_items), ["new", "upload", "share"]);
    assert_eq!(*grown.lock(), ["download"]);
    assert_eq!(*reduced.lock(), ["download"]);

    // Every arrangement is cached now: widening settles without measuring.
    let measured = surface.measure_calls.get();
    surface.container.set(400.0);
    bar.notify_container_resized();
    bar.settle(&surface).unwrap();

    assert!(bar.data().unwrap().overflow_items.is_empty());
    assert_eq!(*grown.lock(), ["download", "download", "sync"]);
    assert_eq!(surface.measure_calls.get(), measured);
}

#[test]
fn test_caller_overflow_items_stay_in_overflow() {
    let surface = TextMetrics::new(1000.0);
    let mut bar = CommandBar::new(commands())
        .with_overflow_items(vec![CommandBarItem::new("settings", "Settings")]);

    bar.mount(&surface).unwrap();
    bar.settle(&surface).unwrap();
    surface.container.set(2000.0);
    bar.notify_container_resized();
    bar.settle(&surface).unwrap();

    let data = bar.data().unwrap();
    assert_eq!(data.primary_items.len(), 5);
    assert_eq!(keys(&data.overflow_items), ["settings"]);
    assert_eq!(data.minimum_overflow_items, 1);
}

#[test]
fn test_layout_renders_overflow_button_before_far_items() {
    let surface = TextMetrics::new(250.0);
    let bar = settled_bar(&surface);

    let entries = bar
        .layout()
        .unwrap()
        .render(|item| item.name.clone(), |hidden| format!("more ({})", hidden.len()));
    let keys: Vec<_> = entries.iter().map(|entry| entry.key.as_str()).collect();

    assert_eq!(keys, ["new", "upload", "share", OVERFLOW_BUTTON_KEY, "info"]);
    assert_eq!(entries[3].output, "more (2)");
}

#[test]
fn test_set_items_renegotiates() {
    let surface = TextMetrics::new(250.0);
    let mut bar = settled_bar(&surface);

    bar.set_items(
        vec![CommandBarItem::new("new", "New"), CommandBarItem::new("sync", "Sync")],
        Vec::new(),
        far_commands(),
    );
    bar.settle(&surface).unwrap();

    let data = bar.data().unwrap();
    assert_eq!(keys(&data.primary_items), ["new", "sync"]);
    assert!(data.overflow_items.is_empty());
}

#[test]
fn test_remeasure_after_font_change() {
    let surface = TextMetrics::new(250.0);
    let mut bar = settled_bar(&surface);
    assert_eq!(bar.data().unwrap().overflow_items.len(), 2);

    surface.glyph_width.set(4.0);
    bar.resize_group().cache().lock().clear();
    bar.remeasure();
    bar.settle(&surface).unwrap();

    assert!(bar.data().unwrap().overflow_items.is_empty());
}

#[test]
fn test_custom_reduce_overrides_default() {
    let surface = TextMetrics::new(250.0);
    let mut bar = CommandBar::new(commands())
        .with_far_items(far_commands())
        .with_reduce_data(|data: &CommandBarData| {
            if data.primary_items.iter().all(|item| item.icon_only) {
                return None;
            }
            let mut next = data.clone();
            for item in &mut next.primary_items {
                item.icon_only = true;
                item.cache_key = Some(format!("{}-icon", item.key));
            }
            next.cache_key = next.compute_cache_key();
            Some(next)
        });
    let reduced = record(&bar.data_reduced);

    bar.mount(&surface).unwrap();
    bar.settle(&surface).unwrap();

    let data = bar.data().unwrap();
    assert_eq!(data.primary_items.len(), 5);
    assert!(data.primary_items.iter().all(|item| item.icon_only));
    assert!(reduced.lock().is_empty());
}

#[test]
fn test_bars_share_measurements() {
    let surface = TextMetrics::new(250.0);
    let cache = SharedMeasurementCache::new();

    let mut first = CommandBar::new(commands())
        .with_far_items(far_commands())
        .with_cache(cache.clone());
    first.mount(&surface).unwrap();
    first.settle(&surface).unwrap();
    let measured = surface.measure_calls.get();

    let mut second = CommandBar::new(commands())
        .with_far_items(far_commands())
        .with_cache(cache);
    assert_eq!(second.mount(&surface).unwrap(), PassOutcome::Settled);

    assert_eq!(second.data(), first.data());
    assert_eq!(surface.measure_calls.get(), measured);
}
