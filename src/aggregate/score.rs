use std::path::Path;

use anyhow::Result;
use tracing::{debug, info};

use super::DocumentLoader;
use crate::metrics::score::{
    ScorePair, ScoreSource, score_consistency, score_consistency_for_log, score_difference,
    score_difference_for_log, score_pairs, score_volatility,
};
use crate::metrics::stats::mean_present;
use crate::model::{Dimension, RoundLog, image_ids, image_name, score_review_file_name};

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreObservation {
    pub image: u32,
    pub dimension: Dimension,
    pub original: f64,
    pub current: f64,
}

impl ScoreObservation {
    fn pair(&self) -> ScorePair {
        ScorePair {
            reference: self.original,
            current: self.current,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScoreExtraction {
    pub observations: Vec<ScoreObservation>,
    pub per_document: Vec<ScoreSummaryRow>,
}

pub fn score_observations(
    loader: &mut DocumentLoader,
    score_review_dir: &Path,
) -> Result<ScoreExtraction> {
    let mut extraction = ScoreExtraction::default();

    for image in image_ids() {
        for dimension in Dimension::ALL {
            let path = score_review_dir.join(score_review_file_name(image, dimension));
            let Some(log) = loader.load::<RoundLog>(&path)? else {
                continue;
            };
            debug!(path = %path.display(), "processing score review");

            let pairs = score_pairs(&log, ScoreSource::Original);
            extraction.per_document.push(ScoreSummaryRow {
                label: format!("{}_{dimension}", image_name(image)),
                samples: pairs.len(),
                consistency: score_consistency_for_log(&log, ScoreSource::Original),
                difference: score_difference_for_log(&log, ScoreSource::Original),
            });
            extraction
                .observations
                .extend(pairs.into_iter().map(|pair| ScoreObservation {
                    image,
                    dimension,
                    original: pair.reference,
                    current: pair.current,
                }));
        }
    }

    info!(
        observations = extraction.observations.len(),
        documents = extraction.per_document.len(),
        "extracted score observations"
    );
    Ok(extraction)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSummaryRow {
    pub label: String,
    pub samples: usize,
    pub consistency: Option<f64>,
    pub difference: Option<f64>,
}

fn summarize<'a>(
    label: String,
    observations: impl Iterator<Item = &'a ScoreObservation>,
) -> ScoreSummaryRow {
    let pairs = observations.map(ScoreObservation::pair).collect::<Vec<ScorePair>>();
    ScoreSummaryRow {
        label,
        samples: pairs.len(),
        consistency: score_consistency(&pairs),
        difference: score_difference(&pairs),
    }
}

pub fn score_summary_by_dimension(observations: &[ScoreObservation]) -> Vec<ScoreSummaryRow> {
    Dimension::ALL
        .into_iter()
        .map(|dimension| {
            summarize(
                dimension.to_string(),
                observations.iter().filter(|obs| obs.dimension == dimension),
            )
        })
        .collect()
}

pub fn score_summary_by_image(observations: &[ScoreObservation]) -> Vec<ScoreSummaryRow> {
    image_ids()
        .map(|image| {
            summarize(
                image_name(image),
                observations.iter().filter(|obs| obs.image == image),
            )
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct VolatilityRow {
    pub image: u32,
    pub volatility: Option<f64>,
}

pub fn volatility_rows(
    loader: &mut DocumentLoader,
    score_review_dir: &Path,
) -> Result<Vec<VolatilityRow>> {
    let mut rows = Vec::new();

    for image in image_ids() {
        let mut per_dimension = Vec::new();
        for dimension in Dimension::ALL {
            let path = score_review_dir.join(score_review_file_name(image, dimension));
            if let Some(log) = loader.load::<RoundLog>(&path)? {
                per_dimension.push(score_volatility(&log));
            }
        }

        let volatility = mean_present(&per_dimension);
        info!(image = %image_name(image), sv = ?volatility, "average score volatility");
        rows.push(VolatilityRow { image, volatility });
    }

    Ok(rows)
}
