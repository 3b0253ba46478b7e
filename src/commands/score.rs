use std::collections::BTreeSet;

use anyhow::Result;

use super::run_manifest::{AnalysisRun, run_single};
use crate::aggregate::{
    DocumentLoader, ScoreObservation, ScoreSummaryRow, score_observations,
    score_summary_by_dimension, score_summary_by_image,
};
use crate::cli::AnalysisArgs;
use crate::export::{Cell, Sheet};
use crate::model::image_name;

pub const WORKBOOK: &str = "score_results";

pub fn run(args: AnalysisArgs) -> Result<()> {
    run_single("score", &args, execute)
}

pub(super) fn execute(
    args: &AnalysisArgs,
    loader: &mut DocumentLoader,
    run: &mut AnalysisRun,
) -> Result<()> {
    let extraction = score_observations(loader, &args.inputs.score_review_dir)?;
    let observations = &extraction.observations;
    let images = observations
        .iter()
        .map(|obs| obs.image)
        .collect::<BTreeSet<u32>>();
    run.note_images(images.len());
    if observations.is_empty() {
        run.warn("no score observations found; SC and SD are undefined");
    }

    let sheets = [
        observation_sheet(observations)?,
        summary_sheet(
            "SC_SD_Dimension",
            "dimension",
            &score_summary_by_dimension(observations),
        )?,
        summary_sheet(
            "SC_SD_Image",
            "File Name",
            &score_summary_by_image(observations),
        )?,
        summary_sheet("SC_SD_Document", "document", &extraction.per_document)?,
    ];
    run.write_workbook(WORKBOOK, &sheets)
}

fn observation_sheet(observations: &[ScoreObservation]) -> Result<Sheet> {
    let mut sheet = Sheet::new("Scores", ["image", "dimension", "original", "current"]);
    for obs in observations {
        sheet.push_row(vec![
            Cell::text(image_name(obs.image)),
            Cell::text(obs.dimension.as_str()),
            Cell::from(obs.original),
            Cell::from(obs.current),
        ])?;
    }
    Ok(sheet)
}

fn summary_sheet(name: &str, label_column: &str, rows: &[ScoreSummaryRow]) -> Result<Sheet> {
    let mut sheet = Sheet::new(name, [label_column, "samples", "SC", "SD"]);
    for row in rows {
        sheet.push_row(vec![
            Cell::text(row.label.as_str()),
            Cell::from(row.samples),
            Cell::from(row.consistency),
            Cell::from(row.difference),
        ])?;
    }
    Ok(sheet)
}
