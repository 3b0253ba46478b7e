use anyhow::Result;

use super::run_manifest::{AnalysisRun, run_single};
use crate::aggregate::{DocumentLoader, volatility_rows};
use crate::cli::AnalysisArgs;
use crate::export::{Cell, Sheet};
use crate::model::image_name;

pub const WORKBOOK: &str = "sv_results";

pub fn run(args: AnalysisArgs) -> Result<()> {
    run_single("volatility", &args, execute)
}

pub(super) fn execute(
    args: &AnalysisArgs,
    loader: &mut DocumentLoader,
    run: &mut AnalysisRun,
) -> Result<()> {
    let rows = volatility_rows(loader, &args.inputs.score_review_dir)?;
    run.note_images(rows.len());

    let mut sheet = Sheet::new("SV", ["File Name", "SV"]);
    for row in &rows {
        sheet.push_row(vec![Cell::text(image_name(row.image)), Cell::from(row.volatility)])?;
    }
    run.write_workbook(WORKBOOK, &[sheet])
}
