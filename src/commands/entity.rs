use anyhow::Result;

use super::run_manifest::{AnalysisRun, run_single};
use crate::aggregate::{DocumentLoader, EntityRow, entity_rows};
use crate::cli::AnalysisArgs;
use crate::export::{Cell, Sheet};

pub const WORKBOOK: &str = "entity_results";

pub fn run(args: AnalysisArgs) -> Result<()> {
    run_single("entity", &args, execute)
}

pub(super) fn execute(
    args: &AnalysisArgs,
    loader: &mut DocumentLoader,
    run: &mut AnalysisRun,
) -> Result<()> {
    let rows = entity_rows(loader, &args.inputs.entity_dir)?;
    run.note_images(rows.len());
    if rows.is_empty() {
        run.warn(format!(
            "no label documents found in {}",
            args.inputs.entity_dir.display()
        ));
    }

    run.write_workbook(WORKBOOK, &[entity_sheet(&rows)?])
}

fn entity_sheet(rows: &[EntityRow]) -> Result<Sheet> {
    let mut sheet = Sheet::new(
        "Entity",
        [
            "file",
            "TP",
            "FP",
            "FN",
            "MR",
            "Accuracy",
            "Precision",
            "Recall",
            "F1",
        ],
    );
    for row in rows {
        sheet.push_row(vec![
            Cell::text(row.file.as_str()),
            Cell::from(row.counts.true_positive),
            Cell::from(row.counts.false_positive),
            Cell::from(row.counts.false_negative),
            Cell::from(row.counts.matched_replacement),
            Cell::from(row.scores.accuracy),
            Cell::from(row.scores.precision),
            Cell::from(row.scores.recall),
            Cell::from(row.scores.f1),
        ])?;
    }
    Ok(sheet)
}
