//! Row decoders for the production workbook

use anyhow::{Result, anyhow};
use chrono::NaiveDateTime;
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

use super::layout::{DeliveryOrderLayout, JobCardLayout, ProductionLayout};
use super::materials::{RawMaterial, decode_raw_materials};
use super::stage::{Stage, StageEntry};
use crate::sheet::{Row, Table};

/// One production order from the main sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionOrder {
    /// One-based sheet row, the target of `updateCells`
    pub row_number: usize,
    pub timestamp: Option<NaiveDateTime>,
    pub job_card_no: String,
    pub firm_name: Option<String>,
    pub party_name: Option<String>,
    pub product_name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub delivery_order_no: Option<String>,
    pub raw_materials: Vec<RawMaterial>,
    pub stages: BTreeMap<Stage, StageEntry>,
    /// Filled in from the job card sheet
    pub machine: Option<String>,
    pub supervisor: Option<String>,
}

impl ProductionOrder {
    pub fn from_row(row: &Row, layout: &ProductionLayout) -> Result<Self> {
        let job_card_no = row
            .text(layout.job_card_no)
            .ok_or_else(|| anyhow!("Row {} has no job card number", row.number))?;

        let stages = Stage::ALL
            .iter()
            .map(|stage| (*stage, StageEntry::read(row, layout.stage(*stage))))
            .collect();

        Ok(Self {
            row_number: row.number,
            timestamp: row.date(layout.timestamp),
            job_card_no,
            firm_name: row.text(layout.firm_name),
            party_name: row.text(layout.party_name),
            product_name: row.text(layout.product_name),
            quantity: row.number(layout.quantity),
            unit: row.text(layout.unit),
            delivery_order_no: row.text(layout.delivery_order_no),
            raw_materials: decode_raw_materials(row, &layout.materials),
            stages,
            machine: None,
            supervisor: None,
        })
    }

    /// Entry for `stage`; every decoded order carries all stages
    pub fn stage(&self, stage: Stage) -> &StageEntry {
        static EMPTY: StageEntry = StageEntry {
            planned: None,
            actual: None,
            status: None,
            remarks: None,
        };
        self.stages.get(&stage).unwrap_or(&EMPTY)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobCard {
    pub row_number: usize,
    pub timestamp: Option<NaiveDateTime>,
    pub job_card_no: String,
    pub firm_name: Option<String>,
    pub party_name: Option<String>,
    pub product_name: Option<String>,
    pub quantity: Option<f64>,
    pub machine: Option<String>,
    pub supervisor: Option<String>,
}

impl JobCard {
    pub fn from_row(row: &Row, layout: &JobCardLayout) -> Result<Self> {
        let job_card_no = row
            .text(layout.job_card_no)
            .ok_or_else(|| anyhow!("Row {} has no job card number", row.number))?;

        Ok(Self {
            row_number: row.number,
            timestamp: row.date(layout.timestamp),
            job_card_no,
            firm_name: row.text(layout.firm_name),
            party_name: row.text(layout.party_name),
            product_name: row.text(layout.product_name),
            quantity: row.number(layout.quantity),
            machine: row.text(layout.machine),
            supervisor: row.text(layout.supervisor),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryOrder {
    pub row_number: usize,
    pub timestamp: Option<NaiveDateTime>,
    pub do_number: String,
    pub party_name: Option<String>,
    pub transporter: Option<String>,
    pub destination: Option<String>,
    pub vehicle_no: Option<String>,
}

impl DeliveryOrder {
    pub fn from_row(row: &Row, layout: &DeliveryOrderLayout) -> Result<Self> {
        let do_number = row
            .text(layout.do_number)
            .ok_or_else(|| anyhow!("Row {} has no delivery order number", row.number))?;

        Ok(Self {
            row_number: row.number,
            timestamp: row.date(layout.timestamp),
            do_number,
            party_name: row.text(layout.party_name),
            transporter: row.text(layout.transporter),
            destination: row.text(layout.destination),
            vehicle_no: row.text(layout.vehicle_no),
        })
    }
}

/// Decode every row of `table`, skipping the ones `decode` rejects
pub fn decode_all<T, F>(table: &Table, decode: F) -> Vec<T>
where
    F: Fn(&Row) -> Result<T>,
{
    let mut records = Vec::with_capacity(table.rows.len());
    let mut skipped = 0;

    for row in &table.rows {
        if row.is_empty() {
            skipped += 1;
            continue;
        }
        match decode(row) {
            Ok(record) => records.push(record),
            Err(e) => {
                debug!("Skipping row {}: {}", row.number, e);
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        debug!("Decoded {} rows, skipped {}", records.len(), skipped);
    }
    records
}

pub fn decode_orders(table: &Table, layout: &ProductionLayout) -> Vec<ProductionOrder> {
    decode_all(table, |row| ProductionOrder::from_row(row, layout))
}

pub fn decode_job_cards(table: &Table, layout: &JobCardLayout) -> Vec<JobCard> {
    decode_all(table, |row| JobCard::from_row(row, layout))
}

pub fn decode_delivery_orders(table: &Table, layout: &DeliveryOrderLayout) -> Vec<DeliveryOrder> {
    decode_all(table, |row| DeliveryOrder::from_row(row, layout))
}
