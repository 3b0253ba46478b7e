use anyhow::Result;

use super::run_manifest::{AnalysisRun, run_single};
use crate::aggregate::{DocumentLoader, style_summary};
use crate::cli::AnalysisArgs;
use crate::export::{Cell, Sheet};
use crate::metrics::style::StyleFlag;

pub const WORKBOOK: &str = "style_results";

pub fn run(args: AnalysisArgs) -> Result<()> {
    run_single("style", &args, execute)
}

pub(super) fn execute(
    args: &AnalysisArgs,
    loader: &mut DocumentLoader,
    run: &mut AnalysisRun,
) -> Result<()> {
    let summary = style_summary(loader, &args.inputs.entity_dir)?;
    let Some(sensitivity) = summary.sensitivity else {
        run.warn(format!(
            "no matching label files in {}; ASS not computed",
            args.inputs.entity_dir.display()
        ));
        return Ok(());
    };
    run.note_images(summary.flags.len());

    let mut flags = Sheet::new(
        "ASS",
        ["File Name", "Correct Recognition (1=Correct, 0=Incorrect)"],
    );
    for (file, flag) in &summary.flags {
        flags.push_row(vec![Cell::text(file.as_str()), Cell::Int(flag.as_int())])?;
    }

    let incorrect = summary
        .flags
        .iter()
        .filter(|(_, flag)| *flag == StyleFlag::Incorrect)
        .count();
    let mut totals = Sheet::new("ASS_Summary", ["Documents", "Style Removed", "ASS"]);
    totals.push_row(vec![
        Cell::from(summary.flags.len()),
        Cell::from(incorrect),
        Cell::from(sensitivity),
    ])?;

    run.write_workbook(WORKBOOK, &[flags, totals])
}
