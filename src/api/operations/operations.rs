//! Ordered collections of write operations

use super::operation::{CellUpdates, Operation, OperationResult};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Operations executed one after another against the web-hook
///
/// The web-hook has no transactions: execution stops at the first failed
/// result and earlier writes stay applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Operations {
    operations: Vec<Operation>,
}

impl Operations {
    pub fn new() -> Self {
        Self {
            operations: Vec::new(),
        }
    }

    pub fn from_operations(operations: Vec<Operation>) -> Self {
        Self { operations }
    }

    pub fn add(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn insert(mut self, sheet: impl Into<String>, row: Vec<Value>) -> Self {
        self.operations.push(Operation::insert(sheet, row));
        self
    }

    pub fn update_cells(
        mut self,
        sheet: impl Into<String>,
        row_number: usize,
        cells: CellUpdates,
    ) -> Self {
        self.operations
            .push(Operation::update_cells(sheet, row_number, cells));
        self
    }

    pub fn update_by_job_card(
        mut self,
        sheet: impl Into<String>,
        job_card_no: impl Into<String>,
        cells: CellUpdates,
    ) -> Self {
        self.operations
            .push(Operation::update_by_job_card(sheet, job_card_no, cells));
        self
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn extend(mut self, other: Operations) -> Self {
        self.operations.extend(other.operations);
        self
    }

    /// Execute in order; the returned results end at the first failure
    pub async fn execute(
        &self,
        client: &crate::api::SheetsClient,
    ) -> anyhow::Result<Vec<OperationResult>> {
        let mut results = Vec::with_capacity(self.operations.len());

        for (index, operation) in self.operations.iter().enumerate() {
            let result = client.execute(operation).await?;
            let failed = result.is_error();
            results.push(result);

            if failed {
                let skipped = self.operations.len() - index - 1;
                if skipped > 0 {
                    warn!(
                        "Stopping after failed {} on '{}', {} operation(s) not sent",
                        operation.action(),
                        operation.sheet(),
                        skipped
                    );
                }
                break;
            }
        }

        Ok(results)
    }
}

impl From<Operation> for Operations {
    fn from(operation: Operation) -> Self {
        Self::from_operations(vec![operation])
    }
}

impl From<Vec<Operation>> for Operations {
    fn from(operations: Vec<Operation>) -> Self {
        Self::from_operations(operations)
    }
}

impl IntoIterator for Operations {
    type Item = Operation;
    type IntoIter = std::vec::IntoIter<Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.into_iter()
    }
}

impl<'a> IntoIterator for &'a Operations {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_keeps_order() {
        let ops = Operations::new()
            .insert("Job Cards", vec![json!("JC-1")])
            .update_cells("Production", 3, CellUpdates::new())
            .update_by_job_card("Production", "JC-1", CellUpdates::new());

        assert_eq!(ops.len(), 3);
        let actions: Vec<&str> = ops.operations().iter().map(Operation::action).collect();
        assert_eq!(actions, vec!["insert", "updateCells", "updateByJobCard"]);
    }

    #[test]
    fn test_conversions() {
        let single = Operations::from(Operation::insert("Job Cards", vec![]));
        assert_eq!(single.len(), 1);

        let merged = single.extend(Operations::from(vec![
            Operation::insert("Job Cards", vec![]),
            Operation::insert("Job Cards", vec![]),
        ]));
        assert_eq!(merged.len(), 3);
        assert_eq!((&merged).into_iter().count(), 3);
        assert!(Operations::new().is_empty());
    }
}
