//! Workbook artifact with the four named views.
//!
//! Sheets: `FID_Table` (pivot), `Raw_Data` (per-point records), `Summary`
//! (overall statistics), `Avg_by_Eta` and `Avg_by_Steps` (group averages).
//! Absent values are left as blank cells, never written as zero.

use std::path::Path;

use rust_xlsxwriter::{Workbook, Worksheet};

use crate::aggregate::Aggregation;
use crate::error::Result;
use crate::sweep::ResultSet;

pub(super) fn write(path: &Path, results: &ResultSet, aggregation: &Aggregation) -> Result<()> {
    let mut workbook = Workbook::new();

    write_pivot_sheet(workbook.add_worksheet(), aggregation)?;
    write_raw_data_sheet(workbook.add_worksheet(), results)?;
    write_summary_sheet(workbook.add_worksheet(), aggregation)?;
    write_avg_by_eta_sheet(workbook.add_worksheet(), aggregation)?;
    write_avg_by_steps_sheet(workbook.add_worksheet(), aggregation)?;

    workbook.save(path)?;
    Ok(())
}

fn write_pivot_sheet(sheet: &mut Worksheet, aggregation: &Aggregation) -> Result<()> {
    sheet.set_name("FID_Table")?;

    let pivot = aggregation.pivot();
    sheet.write_string(0, 0, "steps")?;
    for (col, eta) in pivot.etas().iter().enumerate() {
        sheet.write_number(0, data_col(col), *eta)?;
    }

    for (row, steps) in pivot.steps().iter().enumerate() {
        sheet.write_number(data_row(row), 0, f64::from(*steps))?;
        for col in 0..pivot.n_cols() {
            if let Some(fid) = pivot.cell(row, col) {
                sheet.write_number(data_row(row), data_col(col), fid)?;
            }
        }
    }
    Ok(())
}

fn write_raw_data_sheet(sheet: &mut Worksheet, results: &ResultSet) -> Result<()> {
    sheet.set_name("Raw_Data")?;

    for (col, header) in ["steps", "eta", "fid", "status", "detail"].iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }

    for (row, record) in results.records().iter().enumerate() {
        let r = data_row(row);
        sheet.write_number(r, 0, f64::from(record.point().steps()))?;
        sheet.write_number(r, 1, record.point().eta())?;
        if let Some(fid) = record.fid() {
            sheet.write_number(r, 2, fid)?;
        }
        sheet.write_string(r, 3, record.status().label())?;
        if let Some(detail) = record.detail() {
            sheet.write_string(r, 4, detail)?;
        }
    }
    Ok(())
}

fn write_summary_sheet(sheet: &mut Worksheet, aggregation: &Aggregation) -> Result<()> {
    sheet.set_name("Summary")?;

    sheet.write_string(0, 0, "Metric")?;
    sheet.write_string(0, 1, "Value")?;

    let stats = aggregation.stats();
    let rows = [
        ("Best FID", stats.min()),
        ("Worst FID", stats.max()),
        ("Mean FID", stats.mean()),
        ("Std FID", stats.std()),
    ];
    for (row, (label, value)) in rows.iter().enumerate() {
        sheet.write_string(data_row(row), 0, *label)?;
        if let Some(value) = value {
            sheet.write_number(data_row(row), 1, *value)?;
        }
    }
    Ok(())
}

fn write_avg_by_eta_sheet(sheet: &mut Worksheet, aggregation: &Aggregation) -> Result<()> {
    sheet.set_name("Avg_by_Eta")?;

    sheet.write_string(0, 0, "eta")?;
    sheet.write_string(0, 1, "avg_fid")?;
    for (row, (eta, avg)) in aggregation.averages().by_eta().iter().enumerate() {
        sheet.write_number(data_row(row), 0, *eta)?;
        if let Some(avg) = avg {
            sheet.write_number(data_row(row), 1, *avg)?;
        }
    }
    Ok(())
}

fn write_avg_by_steps_sheet(sheet: &mut Worksheet, aggregation: &Aggregation) -> Result<()> {
    sheet.set_name("Avg_by_Steps")?;

    sheet.write_string(0, 0, "steps")?;
    sheet.write_string(0, 1, "avg_fid")?;
    for (row, (steps, avg)) in aggregation.averages().by_steps().iter().enumerate() {
        sheet.write_number(data_row(row), 0, f64::from(*steps))?;
        if let Some(avg) = avg {
            sheet.write_number(data_row(row), 1, *avg)?;
        }
    }
    Ok(())
}

/// Worksheet row below the header for data index `i`.
#[allow(clippy::cast_possible_truncation)]
fn data_row(i: usize) -> u32 {
    i as u32 + 1
}

/// Worksheet column right of the label column for data index `i`.
#[allow(clippy::cast_possible_truncation)]
fn data_col(i: usize) -> u16 {
    i as u16 + 1
}
