//! Narrative text report.
//!
//! Layout: run header, pivot table block, summary block with explicit
//! best/worst configuration lines, then per-eta and per-steps average lines
//! in axis input order. With no scored records the summary degrades to a
//! `No scored configurations.` line instead of failing.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::aggregate::{Aggregation, PivotTable};
use crate::error::Result;
use crate::sweep::RunInfo;

use super::fmt_fid;

const RULE: &str = "================================================================================";
const COL_WIDTH: usize = 12;

pub(super) fn write(path: &Path, aggregation: &Aggregation, run: RunInfo) -> Result<()> {
    fs::write(path, render(aggregation, run))?;
    Ok(())
}

fn render(aggregation: &Aggregation, run: RunInfo) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "FID SCORES TABLE");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(
        out,
        "Run: {} .. {}",
        run.started_at().format("%Y-%m-%d %H:%M:%S UTC"),
        run.finished_at().format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(out);
    out.push_str(&render_pivot(aggregation.pivot()));
    let _ = writeln!(out);

    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "SUMMARY");
    let _ = writeln!(out, "{RULE}");

    let stats = aggregation.stats();
    let _ = writeln!(out);
    let _ = writeln!(out, "Overall FID statistics:");
    let _ = writeln!(out, "  Min:  {}", fmt_fid(stats.min()));
    let _ = writeln!(out, "  Max:  {}", fmt_fid(stats.max()));
    let _ = writeln!(out, "  Mean: {}", fmt_fid(stats.mean()));
    let _ = writeln!(out, "  Std:  {}", fmt_fid(stats.std()));

    match (aggregation.best(), aggregation.worst()) {
        (Some(best), Some(worst)) => {
            let _ = writeln!(out);
            let _ = writeln!(out, "Best Configuration:");
            let _ = writeln!(
                out,
                "  Steps: {}, Eta: {}, FID: {}",
                best.point().steps(),
                best.point().eta(),
                fmt_fid(best.fid())
            );
            let _ = writeln!(out);
            let _ = writeln!(out, "Worst Configuration:");
            let _ = writeln!(
                out,
                "  Steps: {}, Eta: {}, FID: {}",
                worst.point().steps(),
                worst.point().eta(),
                fmt_fid(worst.fid())
            );
        }
        _ => {
            let _ = writeln!(out);
            let _ = writeln!(out, "No scored configurations.");
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Average FID by Eta:");
    for (eta, avg) in aggregation.averages().by_eta() {
        let _ = writeln!(out, "  eta={eta}: {}", fmt_fid(*avg));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Average FID by Steps:");
    for (steps, avg) in aggregation.averages().by_steps() {
        let _ = writeln!(out, "  {steps} steps: {}", fmt_fid(*avg));
    }

    out
}

/// Fixed-width pivot block: eta labels across, steps labels down.
fn render_pivot(pivot: &PivotTable) -> String {
    let mut out = String::new();

    let _ = write!(out, "{:<8}", "steps");
    for eta in pivot.etas() {
        let _ = write!(out, "{:>COL_WIDTH$}", format!("eta={eta}"));
    }
    let _ = writeln!(out);

    for (row, steps) in pivot.steps().iter().enumerate() {
        let _ = write!(out, "{steps:<8}");
        for col in 0..pivot.n_cols() {
            let _ = write!(out, "{:>COL_WIDTH$}", fmt_fid(pivot.cell(row, col)));
        }
        let _ = writeln!(out);
    }

    out
}
