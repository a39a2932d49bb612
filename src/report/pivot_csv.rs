//! Flat CSV rendering of the pivot table.
//!
//! One header row (`steps` then the eta column labels), one row per steps
//! value. Cells carry full-precision values; absent cells are empty fields.

use std::path::Path;

use csv::Writer;

use crate::aggregate::PivotTable;
use crate::error::Result;

pub(super) fn write(path: &Path, pivot: &PivotTable) -> Result<()> {
    let mut writer = Writer::from_path(path)?;

    let mut header = Vec::with_capacity(pivot.n_cols() + 1);
    header.push("steps".to_string());
    header.extend(pivot.etas().iter().map(ToString::to_string));
    writer.write_record(&header)?;

    for (row, steps) in pivot.steps().iter().enumerate() {
        let mut fields = Vec::with_capacity(pivot.n_cols() + 1);
        fields.push(steps.to_string());
        for col in 0..pivot.n_cols() {
            fields.push(pivot.cell(row, col).map_or_else(String::new, |v| v.to_string()));
        }
        writer.write_record(&fields)?;
    }

    writer.flush()?;
    Ok(())
}
