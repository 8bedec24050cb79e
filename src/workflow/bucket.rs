//! Pending/history partition of production orders for one stage

use chrono::NaiveDateTime;
use std::cmp::Ordering;

use super::record::ProductionOrder;
use super::stage::{Stage, StageState};

#[derive(Debug, Default)]
pub struct Buckets<'a> {
    /// Planned, not yet done; oldest planned date first
    pub pending: Vec<&'a ProductionOrder>,
    /// Planned and done; most recent actual date first
    pub history: Vec<&'a ProductionOrder>,
}

impl<'a> Buckets<'a> {
    pub fn len(&self) -> usize {
        self.pending.len() + self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Split `orders` into pending and history for `stage`
///
/// An order whose previous stage was rejected is held out of the pending
/// bucket. Orders that have not reached the stage appear in neither bucket.
pub fn classify(orders: &[ProductionOrder], stage: Stage) -> Buckets<'_> {
    let mut buckets = Buckets::default();

    for order in orders {
        let entry = order.stage(stage);
        match entry.state() {
            StageState::NotReached => {}
            StageState::Pending => {
                let blocked = stage
                    .previous()
                    .is_some_and(|prev| order.stage(prev).is_rejected());
                if !blocked {
                    buckets.pending.push(order);
                }
            }
            StageState::Complete => buckets.history.push(order),
        }
    }

    buckets.pending.sort_by(|a, b| {
        cmp_dates_asc(a.stage(stage).planned_at(), b.stage(stage).planned_at())
            .then_with(|| a.job_card_no.cmp(&b.job_card_no))
    });
    buckets.history.sort_by(|a, b| {
        cmp_dates_desc(a.stage(stage).actual_at(), b.stage(stage).actual_at())
            .then_with(|| a.job_card_no.cmp(&b.job_card_no))
    });

    buckets
}

/// Ascending, undated last
fn cmp_dates_asc(a: Option<NaiveDateTime>, b: Option<NaiveDateTime>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Descending, undated last
fn cmp_dates_desc(a: Option<NaiveDateTime>, b: Option<NaiveDateTime>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::{Cell, Row};
    use crate::workflow::layout::ProductionLayout;
    use serde_json::json;

    /// Order with (planned, actual, status) set for costing and lab test
    fn order(
        job_card: &str,
        costing: (Option<&str>, Option<&str>, Option<&str>),
        lab: (Option<&str>, Option<&str>),
    ) -> ProductionOrder {
        let mut cells = vec![Cell::default(); 48];
        cells[1] = Cell::new(json!(job_card));
        let mut set = |i: usize, v: Option<&str>| {
            if let Some(v) = v {
                cells[i] = Cell::new(json!(v));
            }
        };
        set(28, costing.0);
        set(29, costing.1);
        set(30, costing.2);
        set(32, lab.0);
        set(33, lab.1);
        ProductionOrder::from_row(&Row::new(2, cells), &ProductionLayout::default()).unwrap()
    }

    fn job_cards(orders: &[&ProductionOrder]) -> Vec<String> {
        orders.iter().map(|o| o.job_card_no.clone()).collect()
    }

    #[test]
    fn test_planned_without_actual_is_pending() {
        let orders = vec![order("JC-1", (Some("Date(2024,0,5)"), None, None), (None, None))];
        let buckets = classify(&orders, Stage::Costing);

        assert_eq!(job_cards(&buckets.pending), vec!["JC-1"]);
        assert!(buckets.history.is_empty());
    }

    #[test]
    fn test_history_sorted_by_actual_desc() {
        let orders = vec![
            order("JC-1", (Some("Date(2024,0,1)"), Some("Date(2024,0,3)"), None), (None, None)),
            order("JC-2", (Some("Date(2024,0,1)"), Some("Date(2024,0,9)"), None), (None, None)),
            order("JC-3", (Some("Date(2024,0,1)"), Some("done"), None), (None, None)),
            order(
                "JC-4",
                (Some("Date(2024,0,1)"), Some("Date(2024,0,6,12,0,0)"), None),
                (None, None),
            ),
        ];
        let buckets = classify(&orders, Stage::Costing);

        assert!(buckets.pending.is_empty());
        assert_eq!(job_cards(&buckets.history), vec!["JC-2", "JC-4", "JC-1", "JC-3"]);
    }

    #[test]
    fn test_pending_sorted_by_planned_asc() {
        let orders = vec![
            order("JC-1", (Some("Date(2024,1,10)"), None, None), (None, None)),
            order("JC-2", (Some("Date(2024,1,2)"), None, None), (None, None)),
            order("JC-3", (Some("Date(2024,1,2)"), None, None), (None, None)),
        ];
        let buckets = classify(&orders, Stage::Costing);
        assert_eq!(job_cards(&buckets.pending), vec!["JC-2", "JC-3", "JC-1"]);
    }

    #[test]
    fn test_not_reached_is_in_neither_bucket() {
        let orders = vec![order("JC-1", (None, None, None), (None, None))];
        let buckets = classify(&orders, Stage::Costing);
        assert!(buckets.is_empty());
    }

    #[test]
    fn test_rejected_previous_stage_blocks_pending() {
        let orders = vec![
            order(
                "JC-1",
                (Some("Date(2024,0,1)"), Some("Date(2024,0,2)"), Some("Rejected")),
                (Some("Date(2024,0,3)"), None),
            ),
            order(
                "JC-2",
                (Some("Date(2024,0,1)"), Some("Date(2024,0,2)"), Some("Approved")),
                (Some("Date(2024,0,3)"), None),
            ),
        ];
        let buckets = classify(&orders, Stage::LabTest);
        assert_eq!(job_cards(&buckets.pending), vec!["JC-2"]);
        assert_eq!(buckets.len(), 1);
    }
}
