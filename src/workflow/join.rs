//! Left joins against secondary sheets

use serde::Serialize;
use std::collections::HashMap;

use super::record::{DeliveryOrder, JobCard, ProductionOrder};

/// Join key: trimmed, ASCII upper-cased; blank keys never match
pub fn normalize_key(key: &str) -> Option<String> {
    let key = key.trim();
    if key.is_empty() {
        None
    } else {
        Some(key.to_ascii_uppercase())
    }
}

/// Pair each left item with the first right item sharing its key
pub fn left_join<'a, L, R, LK, RK>(
    left: &'a [L],
    right: &'a [R],
    left_key: LK,
    right_key: RK,
) -> Vec<(&'a L, Option<&'a R>)>
where
    LK: Fn(&L) -> Option<&str>,
    RK: Fn(&R) -> Option<&str>,
{
    let mut index: HashMap<String, &'a R> = HashMap::with_capacity(right.len());
    for item in right {
        if let Some(key) = right_key(item).and_then(normalize_key) {
            index.entry(key).or_insert(item);
        }
    }

    left.iter()
        .map(|item| {
            let matched = left_key(item)
                .and_then(normalize_key)
                .and_then(|key| index.get(&key).copied());
            (item, matched)
        })
        .collect()
}

/// Fill blank order fields from the matching job card
///
/// Values already present on the order win over the job card's.
pub fn enrich_with_job_cards(orders: &mut [ProductionOrder], job_cards: &[JobCard]) {
    let mut index: HashMap<String, &JobCard> = HashMap::with_capacity(job_cards.len());
    for card in job_cards {
        if let Some(key) = normalize_key(&card.job_card_no) {
            index.entry(key).or_insert(card);
        }
    }

    for order in orders.iter_mut() {
        let Some(card) = normalize_key(&order.job_card_no).and_then(|k| index.get(&k).copied())
        else {
            continue;
        };

        fill(&mut order.firm_name, &card.firm_name);
        fill(&mut order.party_name, &card.party_name);
        fill(&mut order.product_name, &card.product_name);
        fill(&mut order.machine, &card.machine);
        fill(&mut order.supervisor, &card.supervisor);
        if order.quantity.is_none() {
            order.quantity = card.quantity;
        }
    }
}

fn fill(target: &mut Option<String>, source: &Option<String>) {
    if target.is_none() {
        target.clone_from(source);
    }
}

/// An order together with its delivery order, when one exists
#[derive(Debug, Clone, Serialize)]
pub struct StageItem<'a> {
    pub order: &'a ProductionOrder,
    pub delivery_order: Option<&'a DeliveryOrder>,
}

pub fn attach_delivery_orders<'a>(
    orders: &[&'a ProductionOrder],
    delivery_orders: &'a [DeliveryOrder],
) -> Vec<StageItem<'a>> {
    let mut index: HashMap<String, &'a DeliveryOrder> = HashMap::new();
    for dorder in delivery_orders {
        if let Some(key) = normalize_key(&dorder.do_number) {
            index.entry(key).or_insert(dorder);
        }
    }

    orders
        .iter()
        .map(|&order| StageItem {
            order,
            delivery_order: order
                .delivery_order_no
                .as_deref()
                .and_then(normalize_key)
                .and_then(|key| index.get(&key).copied()),
        })
        .collect()
}
