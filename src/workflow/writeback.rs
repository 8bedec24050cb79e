//! Encode form input as column-addressed writes

use anyhow::{Result, bail};
use chrono::NaiveDateTime;
use serde_json::{Value, json};

use super::layout::{JobCardLayout, ProductionLayout};
use super::record::ProductionOrder;
use super::stage::Stage;
use crate::api::{CellUpdates, Operation};
use crate::sheet::{Column, format_sheet_datetime};

/// Completion of one stage for one order
#[derive(Debug, Clone, PartialEq)]
pub struct StageUpdate {
    pub stage: Stage,
    pub actual: NaiveDateTime,
    pub status: Option<String>,
    pub remarks: Option<String>,
    /// Accept the update even though the previous stage was rejected
    pub after_rejection: bool,
}

impl StageUpdate {
    pub fn new(stage: Stage, actual: NaiveDateTime) -> Self {
        Self {
            stage,
            actual,
            status: None,
            remarks: None,
            after_rejection: false,
        }
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }

    pub fn after_rejection(mut self, allow: bool) -> Self {
        self.after_rejection = allow;
        self
    }

    /// Cells written by this update; blank status and remarks are left alone
    pub fn cells(&self, layout: &ProductionLayout) -> Result<CellUpdates> {
        let columns = layout.stage(self.stage);
        let mut cells = CellUpdates::new();
        cells.insert(columns.actual, json!(format_sheet_datetime(self.actual)));

        for (value, column, field) in [
            (&self.status, columns.status, "status"),
            (&self.remarks, columns.remarks, "remarks"),
        ] {
            let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) else {
                continue;
            };
            match column {
                Some(column) => {
                    cells.insert(column, json!(value));
                }
                None => bail!("{} has no {} column in the layout", self.stage, field),
            }
        }

        Ok(cells)
    }

    /// Update addressed by the order's sheet row
    pub fn for_row(&self, order: &ProductionOrder, layout: &ProductionLayout) -> Result<Operation> {
        self.check_reached(order)?;
        Ok(Operation::update_cells(
            layout.sheet.clone(),
            order.row_number,
            self.cells(layout)?,
        ))
    }

    /// Update addressed by job card number; the web-hook finds the row
    pub fn for_job_card(
        &self,
        order: &ProductionOrder,
        layout: &ProductionLayout,
    ) -> Result<Operation> {
        self.check_reached(order)?;
        Ok(Operation::update_by_job_card(
            layout.sheet.clone(),
            order.job_card_no.clone(),
            self.cells(layout)?,
        ))
    }

    fn check_reached(&self, order: &ProductionOrder) -> Result<()> {
        if order.stage(self.stage).planned.is_none() {
            bail!(
                "Job card {} has no planned date for {}; it has not reached this stage",
                order.job_card_no,
                self.stage
            );
        }
        if let Some(previous) = self.stage.previous() {
            if !self.after_rejection && order.stage(previous).is_rejected() {
                bail!(
                    "Job card {} was rejected at {}; it cannot move on to {}",
                    order.job_card_no,
                    previous,
                    self.stage
                );
            }
        }
        Ok(())
    }
}

/// New row for the job card sheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobCardForm {
    pub job_card_no: String,
    pub firm_name: Option<String>,
    pub party_name: Option<String>,
    pub product_name: Option<String>,
    pub quantity: Option<f64>,
    pub machine: Option<String>,
    pub supervisor: Option<String>,
}

impl JobCardForm {
    pub fn into_operation(self, layout: &JobCardLayout, now: NaiveDateTime) -> Result<Operation> {
        let job_card_no = self.job_card_no.trim();
        if job_card_no.is_empty() {
            bail!("Job card number is required");
        }

        let mut row = vec![Value::String(String::new()); layout.width()];
        let mut put = |column: Column, value: Value| {
            if let Some(slot) = row.get_mut(column.index()) {
                *slot = value;
            }
        };

        put(layout.timestamp, json!(format_sheet_datetime(now)));
        put(layout.job_card_no, json!(job_card_no));
        for (column, value) in [
            (layout.firm_name, &self.firm_name),
            (layout.party_name, &self.party_name),
            (layout.product_name, &self.product_name),
            (layout.machine, &self.machine),
            (layout.supervisor, &self.supervisor),
        ] {
            if let Some(value) = value {
                put(column, json!(value.trim()));
            }
        }
        if let Some(quantity) = self.quantity {
            put(layout.quantity, json!(quantity));
        }

        Ok(Operation::insert(layout.sheet.clone(), row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::{Cell, Row};
    use chrono::NaiveDate;

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn order(costing_planned: bool) -> ProductionOrder {
        let mut cells = vec![Cell::default(); 48];
        cells[1] = Cell::new(json!("JC-42"));
        if costing_planned {
            cells[28] = Cell::new(json!("Date(2024,0,10)"));
        }
        ProductionOrder::from_row(&Row::new(12, cells), &ProductionLayout::default()).unwrap()
    }

    #[test]
    fn test_stage_cells_skip_blank_fields() {
        let layout = ProductionLayout::default();
        let update = StageUpdate::new(Stage::Costing, at(15, 10))
            .status("Done")
            .remarks("  ");
        let cells = update.cells(&layout).unwrap();

        assert_eq!(cells.len(), 2);
        assert_eq!(cells[&Column(29)], json!("15/01/2024 10:00:00"));
        assert_eq!(cells[&Column(30)], json!("Done"));
    }

    #[test]
    fn test_for_row_targets_sheet_row() {
        let layout = ProductionLayout::default();
        let op = StageUpdate::new(Stage::Costing, at(15, 10))
            .for_row(&order(true), &layout)
            .unwrap();

        let form = op.to_form_fields().unwrap();
        assert_eq!(form[1].1, "updateCells");
        assert_eq!(form[2], ("rowIndex", "12".to_string()));
        assert_eq!(form[3].1, r#"{"30":"15/01/2024 10:00:00"}"#);
    }

    #[test]
    fn test_for_job_card() {
        let layout = ProductionLayout::default();
        let op = StageUpdate::new(Stage::Costing, at(2, 8))
            .status("Approved")
            .for_job_card(&order(true), &layout)
            .unwrap();

        match op {
            Operation::UpdateByJobCard {
                sheet,
                job_card_no,
                cells,
            } => {
                assert_eq!(sheet, "Production");
                assert_eq!(job_card_no, "JC-42");
                assert_eq!(cells.len(), 2);
            }
            other => panic!("unexpected operation {:?}", other),
        }
    }

    #[test]
    fn test_unplanned_stage_cannot_be_completed() {
        let layout = ProductionLayout::default();
        let err = StageUpdate::new(Stage::Costing, at(2, 8))
            .for_row(&order(false), &layout)
            .unwrap_err();
        assert!(err.to_string().contains("JC-42"));
    }

    #[test]
    fn test_rejected_previous_stage_blocks_completion() {
        let layout = ProductionLayout::default();
        let mut cells = vec![Cell::default(); 48];
        cells[1] = Cell::new(json!("JC-1"));
        cells[28] = Cell::new(json!("Date(2024,0,1)"));
        cells[29] = Cell::new(json!("Date(2024,0,2)"));
        cells[30] = Cell::new(json!("Rejected"));
        cells[32] = Cell::new(json!("Date(2024,0,3)"));
        let rejected = ProductionOrder::from_row(&Row::new(2, cells), &layout).unwrap();

        let err = StageUpdate::new(Stage::LabTest, at(4, 0))
            .for_row(&rejected, &layout)
            .unwrap_err();
        assert!(err.to_string().contains("rejected at Costing"));
        assert!(
            StageUpdate::new(Stage::LabTest, at(4, 0))
                .for_job_card(&rejected, &layout)
                .is_err()
        );

        let op = StageUpdate::new(Stage::LabTest, at(4, 0))
            .after_rejection(true)
            .for_row(&rejected, &layout)
            .unwrap();
        assert!(matches!(op, Operation::UpdateCells { row_number: 2, .. }));
    }

    #[test]
    fn test_status_without_column_is_an_error() {
        let mut layout = ProductionLayout::default();
        layout.stages.costing.status = None;

        let update = StageUpdate::new(Stage::Costing, at(2, 8));
        assert!(update.cells(&layout).is_ok());
        assert!(update.status("Done").cells(&layout).is_err());
    }

    #[test]
    fn test_job_card_form_builds_full_row() {
        let layout = JobCardLayout::default();
        let form = JobCardForm {
            job_card_no: " JC-7 ".to_string(),
            firm_name: Some("Acme".to_string()),
            quantity: Some(25.0),
            machine: Some("Mixer 3".to_string()),
            ..JobCardForm::default()
        };

        match form.into_operation(&layout, at(3, 9)).unwrap() {
            Operation::Insert { sheet, row } => {
                assert_eq!(sheet, "Job Cards");
                assert_eq!(row.len(), 8);
                assert_eq!(row[0], json!("03/01/2024 09:00:00"));
                assert_eq!(row[1], json!("JC-7"));
                assert_eq!(row[2], json!("Acme"));
                assert_eq!(row[3], json!(""));
                assert_eq!(row[5], json!(25.0));
                assert_eq!(row[6], json!("Mixer 3"));
            }
            other => panic!("unexpected operation {:?}", other),
        }

        let blank = JobCardForm::default();
        assert!(blank.into_operation(&layout, at(3, 9)).is_err());
    }
}
