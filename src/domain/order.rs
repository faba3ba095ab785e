use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::BoardError;

/// Time-of-day shown next to each order on the board.
pub const DISPLAY_TIME_FORMAT: &str = "%H:%M";
/// Full local timestamp kept for ordering and audit.
pub const ORDER_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// One person's menu submission.
///
/// Field order and names match the persisted file. Timestamps stay as
/// strings so a file written elsewhere reloads and saves back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub timestamp: String,
    pub name: String,
    pub items: Vec<String>,
    #[serde(default)]
    pub note: String,
    pub order_time: String,
}

impl Order {
    /// Builds a stored order from a validated submission, stamped at `at`.
    pub fn stamped(order: ValidOrder, at: NaiveDateTime) -> Self {
        Self {
            timestamp: at.format(DISPLAY_TIME_FORMAT).to_string(),
            name: order.name,
            items: order.items,
            note: order.note,
            order_time: format_order_time(at),
        }
    }

    /// Name comparison used for upserts: surrounding whitespace is ignored
    /// on both sides, case is not.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.trim() == name.trim()
    }
}

pub fn format_order_time(at: NaiveDateTime) -> String {
    at.format(ORDER_TIME_FORMAT).to_string()
}

/// Raw form input, as typed.
#[derive(Debug, Clone, Default)]
pub struct OrderSubmission {
    pub name: String,
    pub raw_items: String,
    pub note: String,
}

impl OrderSubmission {
    pub fn new(
        name: impl Into<String>,
        raw_items: impl Into<String>,
        note: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            raw_items: raw_items.into(),
            note: note.into(),
        }
    }

    /// Rejects a blank name or an item list with nothing left after parsing.
    pub fn validate(self) -> Result<ValidOrder, BoardError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(BoardError::Validation("name is required".to_string()));
        }
        if self.raw_items.trim().is_empty() {
            return Err(BoardError::Validation("at least one item is required".to_string()));
        }
        let items = parse_items(&self.raw_items);
        if items.is_empty() {
            return Err(BoardError::Validation(format!(
                "no items found in {:?}",
                self.raw_items
            )));
        }
        Ok(ValidOrder {
            name: name.to_string(),
            items,
            note: self.note,
        })
    }
}

/// A submission that passed validation: trimmed name, non-empty items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidOrder {
    pub name: String,
    pub items: Vec<String>,
    pub note: String,
}

/// Splits free text on commas, trimming each piece and dropping blanks.
pub fn parse_items(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
