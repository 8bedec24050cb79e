//! End-to-end pipeline over recorded query payloads: decode, bucket, join
//! and encode a stage completion.

use chrono::NaiveDate;
use prodtrack_cli::api::{Operation, QueryResponse};
use prodtrack_cli::workflow::{
    SheetLayout, Stage, StageUpdate, attach_delivery_orders, classify, decode_delivery_orders,
    decode_job_cards, decode_orders, enrich_with_job_cards,
};

const PRODUCTION: &str = include_str!("fixtures/production.txt");
const JOB_CARDS: &str = include_str!("fixtures/job_cards.txt");
const DELIVERY_ORDERS: &str = include_str!("fixtures/delivery_orders.txt");

fn job_cards_of(orders: &[&prodtrack_cli::workflow::ProductionOrder]) -> Vec<String> {
    orders.iter().map(|o| o.job_card_no.clone()).collect()
}

#[test]
fn test_decode_production_sheet() {
    let layout = SheetLayout::default();
    let table = QueryResponse::from_text(PRODUCTION, 1).unwrap();
    assert_eq!(table.row_count(), 5);

    let orders = decode_orders(&table, &layout.production);
    let rows: Vec<usize> = orders.iter().map(|o| o.row_number).collect();
    assert_eq!(rows, vec![2, 3, 5, 6]);

    let first = &orders[0];
    assert_eq!(first.job_card_no, "JC-101");
    assert_eq!(first.quantity, Some(500.0));
    assert_eq!(first.unit.as_deref(), Some("kg"));
    assert_eq!(
        first.timestamp,
        NaiveDate::from_ymd_opt(2024, 4, 1).unwrap().and_hms_opt(9, 15, 0)
    );

    // The pair after the first blank name is never read
    let names: Vec<&str> = first.raw_materials.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Resin", "Solvent"]);
    assert_eq!(first.raw_materials[0].quantity, Some(300.0));
}

#[test]
fn test_stage_buckets() {
    let layout = SheetLayout::default();
    let table = QueryResponse::from_text(PRODUCTION, 1).unwrap();
    let orders = decode_orders(&table, &layout.production);

    let costing = classify(&orders, Stage::Costing);
    assert_eq!(job_cards_of(&costing.pending), vec!["JC-104", "JC-102"]);
    assert_eq!(job_cards_of(&costing.history), vec!["JC-101", "JC-103"]);

    // JC-103 failed costing, so it is held out of lab test
    let lab = classify(&orders, Stage::LabTest);
    assert_eq!(job_cards_of(&lab.pending), vec!["JC-101"]);
    assert!(lab.history.is_empty());

    assert!(classify(&orders, Stage::Tally).is_empty());
}

#[test]
fn test_enrichment_joins() {
    let layout = SheetLayout::default();
    let mut orders = decode_orders(
        &QueryResponse::from_text(PRODUCTION, 1).unwrap(),
        &layout.production,
    );
    let cards = decode_job_cards(
        &QueryResponse::from_text(JOB_CARDS, 1).unwrap(),
        &layout.job_cards,
    );
    let deliveries = decode_delivery_orders(
        &QueryResponse::from_text(DELIVERY_ORDERS, 1).unwrap(),
        &layout.delivery_orders,
    );
    assert_eq!(cards.len(), 3);
    assert_eq!(deliveries.len(), 1);

    enrich_with_job_cards(&mut orders, &cards);

    let jc101 = &orders[0];
    assert_eq!(jc101.party_name.as_deref(), Some("Buyer Ltd"));
    assert_eq!(jc101.machine.as_deref(), Some("Mixer 2"));
    assert_eq!(jc101.supervisor.as_deref(), Some("Ravi"));

    let jc102 = &orders[1];
    assert_eq!(jc102.firm_name.as_deref(), Some("Acme Polymers"));
    assert_eq!(jc102.party_name.as_deref(), Some("Coastal Paints"));
    assert_eq!(jc102.machine.as_deref(), Some("Mixer 1"));

    let jc104 = &orders[3];
    assert_eq!(jc104.machine, None);

    let all: Vec<_> = orders.iter().collect();
    let items = attach_delivery_orders(&all, &deliveries);
    assert_eq!(
        items[0].delivery_order.map(|d| d.vehicle_no.clone()),
        Some(Some("MH12AB1234".to_string()))
    );
    assert!(items[1..].iter().all(|item| item.delivery_order.is_none()));
}

#[test]
fn test_complete_pending_stage() {
    let layout = SheetLayout::default();
    let orders = decode_orders(
        &QueryResponse::from_text(PRODUCTION, 1).unwrap(),
        &layout.production,
    );
    let pending = classify(&orders, Stage::LabTest).pending;
    let order = pending[0];

    let at = NaiveDate::from_ymd_opt(2024, 4, 5)
        .unwrap()
        .and_hms_opt(14, 30, 0)
        .unwrap();
    let update = StageUpdate::new(Stage::LabTest, at)
        .status("Pass")
        .remarks("Viscosity 82 KU");

    let op = update.for_job_card(order, &layout.production).unwrap();
    assert!(matches!(op, Operation::UpdateByJobCard { .. }));
    let form = op.to_form_fields().unwrap();
    assert_eq!(
        form,
        vec![
            ("sheetName", "Production".to_string()),
            ("action", "updateByJobCard".to_string()),
            ("jobCardNo", "JC-101".to_string()),
            (
                "cellUpdates",
                r#"{"34":"05/04/2024 14:30:00","35":"Pass","36":"Viscosity 82 KU"}"#.to_string()
            ),
        ]
    );

    let op = update.for_row(order, &layout.production).unwrap();
    let form = op.to_form_fields().unwrap();
    assert_eq!(form[2], ("rowIndex", "2".to_string()));

    // Tally was never planned for this order
    let tally = StageUpdate::new(Stage::Tally, at);
    assert!(tally.for_row(order, &layout.production).is_err());
}

#[test]
fn test_order_rejected_at_costing_cannot_complete_lab_test() {
    let layout = SheetLayout::default();
    let orders = decode_orders(
        &QueryResponse::from_text(PRODUCTION, 1).unwrap(),
        &layout.production,
    );
    let rejected = orders.iter().find(|o| o.job_card_no == "JC-103").unwrap();
    let at = NaiveDate::from_ymd_opt(2024, 4, 5)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();

    let update = StageUpdate::new(Stage::LabTest, at);
    assert!(update.for_job_card(rejected, &layout.production).is_err());
    assert!(
        update
            .after_rejection(true)
            .for_job_card(rejected, &layout.production)
            .is_ok()
    );
}
