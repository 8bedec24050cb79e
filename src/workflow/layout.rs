//! Named column schema for the production workbook
//!
//! Every decoder and encoder addresses cells through this layout instead of
//! literal offsets. The defaults describe the standard workbook; any field
//! can be overridden from the `[layout]` table of the config file using
//! column letters or zero-based indices.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::stage::Stage;
use crate::sheet::Column;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetLayout {
    pub production: ProductionLayout,
    pub job_cards: JobCardLayout,
    pub delivery_orders: DeliveryOrderLayout,
}

impl SheetLayout {
    pub fn validate(&self) -> Result<()> {
        self.production.validate()?;
        check_distinct(&self.job_cards.sheet, &self.job_cards.named_columns())?;
        check_distinct(&self.delivery_orders.sheet, &self.delivery_orders.named_columns())?;
        Ok(())
    }
}

/// Main sheet: one row per production order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductionLayout {
    pub sheet: String,
    pub timestamp: Column,
    pub job_card_no: Column,
    pub firm_name: Column,
    pub party_name: Column,
    pub product_name: Column,
    pub quantity: Column,
    pub delivery_order_no: Column,
    pub unit: Column,
    pub materials: MaterialRun,
    pub stages: StageLayouts,
}

impl Default for ProductionLayout {
    fn default() -> Self {
        Self {
            sheet: "Production".to_string(),
            timestamp: Column(0),
            job_card_no: Column(1),
            firm_name: Column(2),
            party_name: Column(3),
            product_name: Column(4),
            quantity: Column(5),
            delivery_order_no: Column(6),
            unit: Column(7),
            materials: MaterialRun::default(),
            stages: StageLayouts::default(),
        }
    }
}

impl ProductionLayout {
    pub fn stage(&self, stage: Stage) -> &StageColumns {
        self.stages.get(stage)
    }

    fn named_columns(&self) -> Vec<(Column, String)> {
        let mut columns = vec![
            (self.timestamp, "timestamp".to_string()),
            (self.job_card_no, "job_card_no".to_string()),
            (self.firm_name, "firm_name".to_string()),
            (self.party_name, "party_name".to_string()),
            (self.product_name, "product_name".to_string()),
            (self.quantity, "quantity".to_string()),
            (self.delivery_order_no, "delivery_order_no".to_string()),
            (self.unit, "unit".to_string()),
        ];

        for offset in 0..self.materials.pairs * 2 {
            let role = if offset % 2 == 0 { "name" } else { "quantity" };
            columns.push((
                self.materials.start.offset(offset),
                format!("raw material {} {}", offset / 2 + 1, role),
            ));
        }

        for stage in Stage::ALL {
            let cols = self.stage(stage);
            columns.push((cols.planned, format!("{} planned", stage)));
            columns.push((cols.actual, format!("{} actual", stage)));
            if let Some(status) = cols.status {
                columns.push((status, format!("{} status", stage)));
            }
            if let Some(remarks) = cols.remarks {
                columns.push((remarks, format!("{} remarks", stage)));
            }
        }

        columns
    }

    pub fn validate(&self) -> Result<()> {
        check_distinct(&self.sheet, &self.named_columns())
    }
}

/// Repeating (name, quantity) column pairs holding raw materials
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialRun {
    pub start: Column,
    pub pairs: usize,
}

impl Default for MaterialRun {
    fn default() -> Self {
        Self {
            start: Column(8),
            pairs: 10,
        }
    }
}

/// Planned/actual pair plus optional status and remarks for one stage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageColumns {
    pub planned: Column,
    pub actual: Column,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Column>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<Column>,
}

impl StageColumns {
    /// Four consecutive columns: planned, actual, status, remarks
    pub const fn starting_at(index: usize) -> Self {
        Self {
            planned: Column(index),
            actual: Column(index + 1),
            status: Some(Column(index + 2)),
            remarks: Some(Column(index + 3)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageLayouts {
    pub costing: StageColumns,
    pub lab_test: StageColumns,
    pub kitting: StageColumns,
    pub management_approval: StageColumns,
    pub tally: StageColumns,
}

impl Default for StageLayouts {
    fn default() -> Self {
        Self {
            costing: StageColumns::starting_at(28),
            lab_test: StageColumns::starting_at(32),
            kitting: StageColumns::starting_at(36),
            management_approval: StageColumns::starting_at(40),
            tally: StageColumns::starting_at(44),
        }
    }
}

impl StageLayouts {
    pub fn get(&self, stage: Stage) -> &StageColumns {
        match stage {
            Stage::Costing => &self.costing,
            Stage::LabTest => &self.lab_test,
            Stage::Kitting => &self.kitting,
            Stage::ManagementApproval => &self.management_approval,
            Stage::Tally => &self.tally,
        }
    }
}

/// Secondary sheet keyed by job card number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobCardLayout {
    pub sheet: String,
    pub timestamp: Column,
    pub job_card_no: Column,
    pub firm_name: Column,
    pub party_name: Column,
    pub product_name: Column,
    pub quantity: Column,
    pub machine: Column,
    pub supervisor: Column,
}

impl Default for JobCardLayout {
    fn default() -> Self {
        Self {
            sheet: "Job Cards".to_string(),
            timestamp: Column(0),
            job_card_no: Column(1),
            firm_name: Column(2),
            party_name: Column(3),
            product_name: Column(4),
            quantity: Column(5),
            machine: Column(6),
            supervisor: Column(7),
        }
    }
}

impl JobCardLayout {
    fn named_columns(&self) -> Vec<(Column, String)> {
        vec![
            (self.timestamp, "timestamp".to_string()),
            (self.job_card_no, "job_card_no".to_string()),
            (self.firm_name, "firm_name".to_string()),
            (self.party_name, "party_name".to_string()),
            (self.product_name, "product_name".to_string()),
            (self.quantity, "quantity".to_string()),
            (self.machine, "machine".to_string()),
            (self.supervisor, "supervisor".to_string()),
        ]
    }

    /// Number of cells in a full row of this sheet
    pub fn width(&self) -> usize {
        self.named_columns()
            .iter()
            .map(|(col, _)| col.index() + 1)
            .max()
            .unwrap_or(0)
    }
}

/// Secondary sheet keyed by delivery order number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryOrderLayout {
    pub sheet: String,
    pub timestamp: Column,
    pub do_number: Column,
    pub party_name: Column,
    pub transporter: Column,
    pub destination: Column,
    pub vehicle_no: Column,
}

impl Default for DeliveryOrderLayout {
    fn default() -> Self {
        Self {
            sheet: "Delivery Orders".to_string(),
            timestamp: Column(0),
            do_number: Column(1),
            party_name: Column(2),
            transporter: Column(3),
            destination: Column(4),
            vehicle_no: Column(5),
        }
    }
}

impl DeliveryOrderLayout {
    fn named_columns(&self) -> Vec<(Column, String)> {
        vec![
            (self.timestamp, "timestamp".to_string()),
            (self.do_number, "do_number".to_string()),
            (self.party_name, "party_name".to_string()),
            (self.transporter, "transporter".to_string()),
            (self.destination, "destination".to_string()),
            (self.vehicle_no, "vehicle_no".to_string()),
        ]
    }
}

fn check_distinct(sheet: &str, columns: &[(Column, String)]) -> Result<()> {
    let mut owners: HashMap<Column, &str> = HashMap::new();
    for (column, name) in columns {
        if let Some(existing) = owners.insert(*column, name.as_str()) {
            bail!(
                "Layout for '{}' maps both '{}' and '{}' to column {}",
                sheet,
                existing,
                name,
                column
            );
        }
    }
    Ok(())
}
