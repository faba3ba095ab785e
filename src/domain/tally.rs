use super::Order;

/// How many distinct items the board ranks.
pub const TOP_ITEMS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemCount {
    pub item: String,
    pub count: usize,
}

/// Counts every item across all orders, most frequent first.
///
/// Items are first collected in encounter order; the sort is stable, so
/// equal counts keep that order.
pub fn tally(orders: &[Order]) -> Vec<ItemCount> {
    let mut counts: Vec<ItemCount> = Vec::new();
    for item in orders.iter().flat_map(|order| order.items.iter()) {
        match counts.iter_mut().find(|entry| &entry.item == item) {
            Some(entry) => entry.count += 1,
            None => counts.push(ItemCount {
                item: item.clone(),
                count: 1,
            }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// The top of the tally plus how many distinct items did not make the cut.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TallySummary {
    pub top: Vec<ItemCount>,
    pub remaining: usize,
}

impl TallySummary {
    pub fn from_ranked(mut ranked: Vec<ItemCount>, limit: usize) -> Self {
        let remaining = ranked.len().saturating_sub(limit);
        ranked.truncate(limit);
        Self {
            top: ranked,
            remaining,
        }
    }
}

/// Headline numbers shown beside the order list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metrics {
    pub people: usize,
    pub items: usize,
    pub latest: Option<String>,
}

impl Metrics {
    pub fn of(orders: &[Order]) -> Self {
        Self {
            people: orders.len(),
            items: orders.iter().map(|order| order.items.len()).sum(),
            latest: orders.last().map(|order| order.timestamp.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(name: &str, items: &[&str], timestamp: &str) -> Order {
        Order {
            timestamp: timestamp.to_string(),
            name: name.to_string(),
            items: items.iter().map(|s| s.to_string()).collect(),
            note: String::new(),
            order_time: String::new(),
        }
    }

    #[test]
    fn tally_ranks_by_count() {
        let orders = vec![
            order("a", &["A", "B"], "09:00"),
            order("b", &["A"], "09:01"),
            order("c", &["B", "A"], "09:02"),
        ];
        let ranked = tally(&orders);
        assert_eq!(
            ranked,
            vec![
                ItemCount { item: "A".into(), count: 3 },
                ItemCount { item: "B".into(), count: 2 },
            ]
        );
    }

    #[test]
    fn ties_keep_first_encounter_order() {
        let orders = vec![
            order("a", &["Tea", "Mocha"], "09:00"),
            order("b", &["Latte", "Mocha", "Tea"], "09:01"),
            order("c", &["Latte"], "09:02"),
        ];
        let names: Vec<_> = tally(&orders).into_iter().map(|c| c.item).collect();
        assert_eq!(names, vec!["Tea", "Mocha", "Latte"]);
    }

    #[test]
    fn summary_keeps_top_three_and_counts_the_rest() {
        let orders = vec![order("a", &["A", "B", "C", "D", "E"], "09:00")];
        let summary = TallySummary::from_ranked(tally(&orders), TOP_ITEMS);
        assert_eq!(summary.top.len(), 3);
        assert_eq!(summary.remaining, 2);
    }

    #[test]
    fn metrics_for_empty_and_populated_boards() {
        assert_eq!(Metrics::of(&[]), Metrics::default());

        let orders = vec![order("a", &["A", "B"], "09:00"), order("b", &["C"], "09:30")];
        let metrics = Metrics::of(&orders);
        assert_eq!(metrics.people, 2);
        assert_eq!(metrics.items, 3);
        assert_eq!(metrics.latest.as_deref(), Some("09:30"));
    }
}
