//! Command bar overflow demo.
//!
//! Drives a command bar through a simulated window resize and prints the
//! committed layout after each step.
//!
//! Run with: cargo run -p horizon-fabric --example command_bar
//! Set `RUST_LOG=horizon_fabric=trace` to watch every pass.

use std::cell::Cell;

use horizon_fabric::prelude::*;
use tracing_subscriber::EnvFilter;

/// Pretends to be a text layout engine with 7px glyphs.
struct Window {
    width: Cell<f32>,
}

impl Window {
    fn button_width(item: &CommandBarItem) -> f32 {
        if item.icon_only {
            36.0
        } else {
            item.name.chars().count() as f32 * 7.0 + 24.0
        }
    }
}

impl MeasureSurface<CommandBarData> for Window {
    fn measure(&self, data: &CommandBarData, _orientation: Orientation) -> Result<f32> {
        let buttons: f32 = data
            .primary_items
            .iter()
            .chain(&data.far_items)
            .map(Self::button_width)
            .sum();
        let overflow = if data.overflow_items.is_empty() { 0.0 } else { 36.0 };
        Ok(buttons + overflow)
    }

    fn container_size(&self, _orientation: Orientation) -> Result<f32> {
        Ok(self.width.get())
    }
}

fn print_layout(width: f32, bar: &CommandBar) {
    let Some(layout) = bar.layout() else {
        println!("{width:>5}px | (nothing rendered)");
        return;
    };
    let entries = layout.render(
        |item| item.name.clone(),
        |hidden| {
            let names: Vec<_> = hidden.iter().map(|item| item.name.as_str()).collect();
            format!("[... {}]", names.join(", "))
        },
    );
    let row: Vec<_> = entries.into_iter().map(|entry| entry.output).collect();
    println!("{width:>5}px | {}", row.join("  "));
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("horizon_fabric=info")),
        )
        .init();

    let window = Window {
        width: Cell::new(640.0),
    };
    let resized = Signal::<f32>::new();

    let mut bar = CommandBar::new(vec![
        CommandBarItem::new("new", "New"),
        CommandBarItem::new("upload", "Upload"),
        CommandBarItem::new("share", "Share"),
        CommandBarItem::new("download", "Download"),
        CommandBarItem::new("move", "Move to"),
        CommandBarItem::new("copy", "Copy to"),
        CommandBarItem::new("rename", "Rename"),
    ])
    .with_overflow_items(vec![CommandBarItem::new("properties", "Properties")])
    .with_far_items(vec![
        CommandBarItem::new("sort", "Sort"),
        CommandBarItem::new("info", "Info").with_icon_only(true),
    ]);

    bar.data_reduced
        .connect(|item| tracing::info!(key = %item.key, "moved to overflow"));
    bar.data_grown
        .connect(|item| tracing::info!(key = %item.key, "moved back inline"));
    bar.observe_container(&resized);

    bar.mount(&window)?;
    bar.settle(&window)?;
    print_layout(window.width.get(), &bar);

    for width in [520.0, 400.0, 280.0, 180.0, 460.0, 700.0] {
        window.width.set(width);
        resized.emit(width);
        bar.settle(&window)?;
        print_layout(width, &bar);
    }

    let cache = bar.resize_group().cache().lock().len();
    println!("{cache} arrangements measured");
    Ok(())
}
