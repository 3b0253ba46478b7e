use anyhow::Result;
use tracing::info;

use super::run_manifest::{AnalysisRun, run_single};
use crate::aggregate::{OverviewRow, overview_rows};
use crate::chart::{ChartRenderer, ChartStyle, WaffleChartRenderer};
use crate::cli::OverviewArgs;
use crate::export::{Cell, Sheet};
use crate::model::{IMAGE_COUNT, image_name};

pub const WORKBOOK: &str = "image_metrics";

pub fn run(args: OverviewArgs) -> Result<()> {
    run_single("overview", &args.analysis, |analysis, loader, run| {
        let rows = overview_rows(
            loader,
            &analysis.inputs.score_review_dir,
            &analysis.inputs.suggestion_dir,
            args.score_ceiling,
        )?;
        run.note_images(rows.len());
        info!(ceiling = args.score_ceiling, images = rows.len(), "overview computed");

        run.write_workbook(WORKBOOK, &[metrics_sheet(&rows)?])?;

        if args.no_charts {
            return Ok(());
        }
        render_charts(&rows, &WaffleChartRenderer::new(ChartStyle::default()), run)
    })
}

fn metrics_sheet(rows: &[OverviewRow]) -> Result<Sheet> {
    let columns = std::iter::once("image").chain(OverviewRow::METRICS);
    let mut sheet = Sheet::new("Metrics", columns);
    for row in rows {
        let mut cells = vec![Cell::text(image_name(row.image))];
        cells.extend(OverviewRow::METRICS.iter().map(|metric| Cell::from(row.metric(metric))));
        sheet.push_row(cells)?;
    }
    Ok(sheet)
}

fn chart_values(rows: &[OverviewRow], metric: &str) -> Vec<Option<f64>> {
    let mut values = vec![None; IMAGE_COUNT as usize];
    for row in rows {
        if let Some(slot) = (row.image as usize).checked_sub(1).and_then(|i| values.get_mut(i)) {
            *slot = row.metric(metric);
        }
    }
    values
}

fn render_charts(
    rows: &[OverviewRow],
    renderer: &dyn ChartRenderer,
    run: &mut AnalysisRun,
) -> Result<()> {
    let chart_dir = run.out_dir().join("charts");
    let mut written = Vec::with_capacity(OverviewRow::METRICS.len());
    for metric in OverviewRow::METRICS {
        let path = chart_dir.join(format!("{metric}.png"));
        renderer.render(metric, &chart_values(rows, metric), &path)?;
        written.push(path);
    }
    run.record_outputs(written);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(image: u32, similarity: Option<f64>) -> OverviewRow {
        OverviewRow {
            image,
            agreement: None,
            volatility: None,
            retention: None,
            similarity,
            difference: None,
        }
    }

    #[test]
    fn chart_values_place_images_by_number() {
        let rows = vec![row(2, Some(0.4)), row(20, Some(0.9)), row(21, Some(1.0))];
        let values = chart_values(&rows, "TS");
        assert_eq!(values.len(), 20);
        assert_eq!(values[0], None);
        assert_eq!(values[1], Some(0.4));
        assert_eq!(values[19], Some(0.9));
    }

    #[test]
    fn metrics_sheet_has_one_column_per_metric() {
        let sheet = metrics_sheet(&[row(3, Some(0.5))]).expect("sheet builds");
        assert_eq!(sheet.columns, vec!["image", "SC", "SV", "TAR", "TS", "SD"]);
        assert_eq!(sheet.rows[0][0], Cell::text("3.jpg"));
        assert_eq!(sheet.rows[0][4], Cell::Float(Some(0.5)));
        assert_eq!(sheet.rows[0][1], Cell::Float(None));
    }
}
