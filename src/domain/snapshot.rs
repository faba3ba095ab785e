use serde::{Deserialize, Serialize};

use super::Order;

/// The persisted unit: every order plus the time it was written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub last_updated: String,
}

impl Snapshot {
    pub fn new(orders: Vec<Order>, last_updated: impl Into<String>) -> Self {
        Self {
            orders,
            last_updated: last_updated.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_empty() {
        let snapshot: Snapshot = serde_json::from_str("{}").unwrap();
        assert!(snapshot.orders.is_empty());
        assert_eq!(snapshot.last_updated, "");
    }

    #[test]
    fn reads_the_board_file_layout() {
        let json = r#"{
  "orders": [
    {"timestamp": "14:05", "name": "Jun", "items": ["Americano", "Croissant"], "note": "hot", "order_time": "2024-01-01T14:05:00.123456"}
  ],
  "last_updated": "2024-01-01T14:05:00.123456"
}"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.orders.len(), 1);
        assert_eq!(snapshot.orders[0].items, vec!["Americano", "Croissant"]);
        assert_eq!(snapshot.last_updated, "2024-01-01T14:05:00.123456");
    }
}
