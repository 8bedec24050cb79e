use serde::Serialize;

use super::layout::MaterialRun;
use crate::sheet::Row;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawMaterial {
    pub name: String,
    pub quantity: Option<f64>,
    /// Quantity cell as written, kept when it is not a plain number ("2 bags")
    pub quantity_text: Option<String>,
}

/// Read the repeating (name, quantity) pairs of a row
///
/// Reading stops at the first pair whose name cell is blank; later pairs
/// are ignored even if filled.
pub fn decode_raw_materials(row: &Row, run: &MaterialRun) -> Vec<RawMaterial> {
    let mut materials = Vec::new();

    for pair in 0..run.pairs {
        let name_col = run.start.offset(pair * 2);
        let qty_col = name_col.offset(1);

        let Some(name) = row.text(name_col) else {
            break;
        };

        materials.push(RawMaterial {
            name,
            quantity: row.number(qty_col),
            quantity_text: row.text(qty_col),
        });
    }

    materials
}
