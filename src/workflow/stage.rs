use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::layout::StageColumns;
use crate::sheet::{Column, Row};

/// Workflow stages a production order moves through, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Stage {
    Costing,
    LabTest,
    Kitting,
    ManagementApproval,
    Tally,
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Unknown stage '{0}' (expected costing, lab-test, kitting, approval or tally)")]
pub struct ParseStageError(pub String);

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Costing,
        Stage::LabTest,
        Stage::Kitting,
        Stage::ManagementApproval,
        Stage::Tally,
    ];

    /// Name used on the command line
    pub fn slug(&self) -> &'static str {
        match self {
            Stage::Costing => "costing",
            Stage::LabTest => "lab-test",
            Stage::Kitting => "kitting",
            Stage::ManagementApproval => "approval",
            Stage::Tally => "tally",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Stage::Costing => "Costing",
            Stage::LabTest => "Lab Test",
            Stage::Kitting => "Kitting",
            Stage::ManagementApproval => "Management Approval",
            Stage::Tally => "Tally",
        }
    }

    pub fn previous(&self) -> Option<Stage> {
        match self {
            Stage::Costing => None,
            Stage::LabTest => Some(Stage::Costing),
            Stage::Kitting => Some(Stage::LabTest),
            Stage::ManagementApproval => Some(Stage::Kitting),
            Stage::Tally => Some(Stage::ManagementApproval),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Stage {
    type Err = ParseStageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        match normalized.as_str() {
            "costing" => Ok(Stage::Costing),
            "labtest" | "lab" => Ok(Stage::LabTest),
            "kitting" => Ok(Stage::Kitting),
            "approval" | "managementapproval" => Ok(Stage::ManagementApproval),
            "tally" => Ok(Stage::Tally),
            _ => Err(ParseStageError(s.to_string())),
        }
    }
}

/// A filled date cell: its text and, when parseable, its date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stamp {
    pub raw: String,
    pub at: Option<NaiveDateTime>,
}

impl Stamp {
    /// `None` when the cell is blank
    pub fn read(row: &Row, column: Column) -> Option<Self> {
        let cell = row.cell(column);
        if cell.is_blank() {
            return None;
        }
        Some(Self {
            raw: cell.text().unwrap_or_default(),
            at: cell.date(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StageState {
    /// Planned column blank: the order has not reached this stage
    NotReached,
    /// Planned filled, actual blank
    Pending,
    /// Planned and actual both filled
    Complete,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StageEntry {
    pub planned: Option<Stamp>,
    pub actual: Option<Stamp>,
    pub status: Option<String>,
    pub remarks: Option<String>,
}

impl StageEntry {
    pub fn read(row: &Row, columns: &StageColumns) -> Self {
        Self {
            planned: Stamp::read(row, columns.planned),
            actual: Stamp::read(row, columns.actual),
            status: columns.status.and_then(|c| row.text(c)),
            remarks: columns.remarks.and_then(|c| row.text(c)),
        }
    }

    pub fn state(&self) -> StageState {
        match (&self.planned, &self.actual) {
            (None, _) => StageState::NotReached,
            (Some(_), None) => StageState::Pending,
            (Some(_), Some(_)) => StageState::Complete,
        }
    }

    pub fn is_rejected(&self) -> bool {
        self.status.as_deref().is_some_and(|status| {
            let status = status.trim();
            ["rejected", "reject", "fail", "failed"]
                .iter()
                .any(|word| status.eq_ignore_ascii_case(word))
        })
    }

    pub fn planned_at(&self) -> Option<NaiveDateTime> {
        self.planned.as_ref().and_then(|s| s.at)
    }

    pub fn actual_at(&self) -> Option<NaiveDateTime> {
        self.actual.as_ref().and_then(|s| s.at)
    }
}
