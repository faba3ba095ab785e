//! Plain-text rendering of the board.

use std::fmt::Write;

use crate::domain::{MenuImage, Metrics, Order, TallySummary};

/// Items listed per order before the rest collapse into `+N more`.
const ITEMS_PER_ORDER: usize = 2;
/// Tally labels longer than this many characters are shortened.
const TALLY_LABEL_CHARS: usize = 10;

pub fn render_metrics(metrics: &Metrics) -> String {
    format!(
        "People: {}  Items: {}  Latest: {}\n",
        metrics.people,
        metrics.items,
        metrics.latest.as_deref().unwrap_or("-")
    )
}

pub fn render_tally(summary: &TallySummary) -> String {
    let mut out = String::new();
    if summary.top.is_empty() {
        return out;
    }
    out.push_str("Top items\n");
    for entry in &summary.top {
        let _ = writeln!(out, "  • {}: {}", shorten(&entry.item), entry.count);
    }
    if summary.remaining > 0 {
        let _ = writeln!(out, "  ... and {} more", summary.remaining);
    }
    out
}

/// Orders are expected most recent first; the number in brackets is the
/// display position accepted by `delete`.
pub fn render_orders(orders: &[Order]) -> String {
    let mut out = String::new();
    if orders.is_empty() {
        out.push_str("No orders yet\n");
        return out;
    }
    out.push_str("Orders\n");
    for (position, order) in orders.iter().enumerate() {
        let _ = writeln!(out, "  [{position}] {}  {}", order.name, order.timestamp);
        for item in order.items.iter().take(ITEMS_PER_ORDER) {
            let _ = writeln!(out, "      • {item}");
        }
        if order.items.len() > ITEMS_PER_ORDER {
            let _ = writeln!(out, "      • +{} more", order.items.len() - ITEMS_PER_ORDER);
        }
        if !order.note.is_empty() {
            let _ = writeln!(out, "      note: {}", order.note);
        }
    }
    out
}

pub fn render_menu(menu: Option<&MenuImage>) -> String {
    match menu {
        Some(image) => format!(
            "Menu board: {} ({}, {}x{}, {} bytes)\n",
            image.label,
            image.format,
            image.width,
            image.height,
            image.size_bytes()
        ),
        None => "No menu board yet; upload one with `menu <path>`\n".to_string(),
    }
}

/// The whole board: metrics, tally, then the order list.
pub fn render_board(metrics: &Metrics, summary: &TallySummary, orders: &[Order]) -> String {
    let mut out = render_metrics(metrics);
    out.push_str(&render_tally(summary));
    out.push_str(&render_orders(orders));
    out
}

fn shorten(label: &str) -> String {
    if label.chars().count() > TALLY_LABEL_CHARS {
        let head: String = label.chars().take(TALLY_LABEL_CHARS).collect();
        format!("{head}...")
    } else {
        label.to_string()
    }
}
