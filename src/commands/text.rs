use anyhow::Result;

use super::run_manifest::{AnalysisRun, run_single};
use crate::aggregate::{DimensionText, DocumentLoader, TextRow, text_rows};
use crate::cli::AnalysisArgs;
use crate::export::{Cell, Sheet};
use crate::metrics::text::WordTokenizer;
use crate::model::{Dimension, image_name};

pub const WORKBOOK: &str = "text_results";

pub fn run(args: AnalysisArgs) -> Result<()> {
    run_single("text", &args, execute)
}

pub(super) fn execute(
    args: &AnalysisArgs,
    loader: &mut DocumentLoader,
    run: &mut AnalysisRun,
) -> Result<()> {
    let tokenizer = WordTokenizer::new()?;
    let rows = text_rows(
        loader,
        &args.inputs.score_review_dir,
        &args.inputs.suggestion_dir,
        &tokenizer,
    )?;
    run.note_images(rows.len());

    let sheets = [
        text_sheet("TAR", &rows, |text| (text.review_tar, text.suggestion_tar))?,
        text_sheet("TS", &rows, |text| (text.review_ts, text.suggestion_ts))?,
    ];
    run.write_workbook(WORKBOOK, &sheets)
}

fn text_sheet<F>(metric: &str, rows: &[TextRow], pick: F) -> Result<Sheet>
where
    F: Fn(&DimensionText) -> (Option<f64>, Option<f64>),
{
    let columns = std::iter::once("File Name".to_string())
        .chain(
            Dimension::ALL
                .iter()
                .map(|dimension| format!("{dimension}_Review_{metric}")),
        )
        .chain(
            Dimension::ALL
                .iter()
                .map(|dimension| format!("{dimension}_Suggestion_{metric}")),
        );
    let mut sheet = Sheet::new(metric, columns);

    for row in rows {
        let picked = row.dimensions.iter().map(&pick).collect::<Vec<_>>();
        let mut cells = Vec::with_capacity(1 + 2 * picked.len());
        cells.push(Cell::text(image_name(row.image)));
        cells.extend(picked.iter().map(|(review, _)| Cell::from(*review)));
        cells.extend(picked.iter().map(|(_, suggestion)| Cell::from(*suggestion)));
        sheet.push_row(cells)?;
    }
    Ok(sheet)
}
