use chrono::NaiveDateTime;
use serde::Serialize;

use super::cell::Cell;
use super::column::Column;

static BLANK: Cell = Cell { v: None, f: None };

/// One data row of a sheet, addressed positionally
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Row {
    /// One-based row number in the sheet (header rows included)
    pub number: usize,
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(number: usize, cells: Vec<Cell>) -> Self {
        Self { number, cells }
    }

    /// Cell at `column`; positions past the end of a sparse row read as blank
    pub fn cell(&self, column: Column) -> &Cell {
        self.cells.get(column.index()).unwrap_or(&BLANK)
    }

    pub fn is_filled(&self, column: Column) -> bool {
        !self.cell(column).is_blank()
    }

    pub fn text(&self, column: Column) -> Option<String> {
        self.cell(column).text()
    }

    pub fn number(&self, column: Column) -> Option<f64> {
        self.cell(column).number()
    }

    pub fn date(&self, column: Column) -> Option<NaiveDateTime> {
        self.cell(column).date()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Cell::is_blank)
    }
}

/// Column metadata reported by the query endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColumnInfo {
    pub id: String,
    pub label: String,
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<ColumnInfo>,
    pub rows: Vec<Row>,
    pub header_rows: usize,
}

impl Table {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn labels(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| {
                if c.label.trim().is_empty() {
                    c.id.clone()
                } else {
                    c.label.clone()
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_row() -> Row {
        Row::new(
            5,
            vec![
                Cell::new(json!("Date(2024,0,2)")),
                Cell::new(json!("JC-7")),
                Cell::default(),
                Cell::new(json!(250)),
            ],
        )
    }

    #[test]
    fn test_positional_access() {
        let row = sample_row();
        assert_eq!(row.text(Column(1)), Some("JC-7".to_string()));
        assert_eq!(row.number(Column(3)), Some(250.0));
        assert!(row.date(Column(0)).is_some());
        assert!(!row.is_filled(Column(2)));
    }

    #[test]
    fn test_sparse_row_reads_blank_past_end() {
        let row = sample_row();
        assert!(row.cell(Column(40)).is_blank());
        assert_eq!(row.text(Column(40)), None);
        assert!(!row.is_empty());
        assert!(Row::new(2, vec![Cell::default()]).is_empty());
    }

    #[test]
    fn test_table_labels_fall_back_to_id() {
        let table = Table {
            columns: vec![
                ColumnInfo {
                    id: "A".into(),
                    label: "Timestamp".into(),
                    kind: "datetime".into(),
                },
                ColumnInfo {
                    id: "B".into(),
                    label: "".into(),
                    kind: "string".into(),
                },
            ],
            rows: vec![sample_row()],
            header_rows: 1,
        };
        assert_eq!(table.labels(), vec!["Timestamp".to_string(), "B".to_string()]);
    }
}
