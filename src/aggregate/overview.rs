use std::path::Path;

use anyhow::Result;
use tracing::info;

use super::DocumentLoader;
use crate::metrics::score::{
    score_agreement_closeness, score_difference_closeness, score_volatility_closeness,
};
use crate::metrics::stats::mean_present;
use crate::metrics::text::{text_retention_closeness, text_similarity_chars};
use crate::model::{
    Dimension, RoundLog, TextGroupKind, image_ids, image_name, score_review_file_name,
    suggestion_file_name,
};

#[derive(Debug, Clone, PartialEq)]
pub struct OverviewRow {
    pub image: u32,
    pub agreement: Option<f64>,
    pub volatility: Option<f64>,
    pub retention: Option<f64>,
    pub similarity: Option<f64>,
    pub difference: Option<f64>,
}

impl OverviewRow {
    pub const METRICS: [&'static str; 5] = ["SC", "SV", "TAR", "TS", "SD"];

    pub fn metric(&self, name: &str) -> Option<f64> {
        match name {
            "SC" => self.agreement,
            "SV" => self.volatility,
            "TAR" => self.retention,
            "TS" => self.similarity,
            "SD" => self.difference,
            _ => None,
        }
    }
}

pub fn overview_rows(
    loader: &mut DocumentLoader,
    score_review_dir: &Path,
    suggestion_dir: &Path,
    ceiling: f64,
) -> Result<Vec<OverviewRow>> {
    let mut rows = Vec::new();

    for image in image_ids() {
        let mut agreement = Vec::new();
        let mut volatility = Vec::new();
        let mut retention = Vec::new();
        let mut similarity = Vec::new();
        let mut difference = Vec::new();

        for dimension in Dimension::ALL {
            let review_path = score_review_dir.join(score_review_file_name(image, dimension));
            if let Some(log) = non_empty(loader.load::<RoundLog>(&review_path)?) {
                agreement.push(score_agreement_closeness(&log, ceiling));
                volatility.push(score_volatility_closeness(&log, ceiling));
                retention.push(text_retention_closeness(&log));
                difference.push(score_difference_closeness(&log, ceiling));
                similarity.push(text_similarity_chars(&log, TextGroupKind::Reviews));
            }

            let suggestion_path = suggestion_dir.join(suggestion_file_name(image, dimension));
            if let Some(log) = non_empty(loader.load::<RoundLog>(&suggestion_path)?) {
                similarity.push(text_similarity_chars(&log, TextGroupKind::Suggestions));
            }
        }

        if agreement.is_empty() {
            continue;
        }

        let row = OverviewRow {
            image,
            agreement: mean_present(&agreement),
            volatility: mean_present(&volatility),
            retention: mean_present(&retention),
            similarity: mean_present(&similarity),
            difference: mean_present(&difference),
        };
        info!(
            image = %image_name(image),
            sc = ?row.agreement,
            sv = ?row.volatility,
            tar = ?row.retention,
            ts = ?row.similarity,
            sd = ?row.difference,
            "image overview"
        );
        rows.push(row);
    }

    Ok(rows)
}

fn non_empty(log: Option<RoundLog>) -> Option<RoundLog> {
    log.filter(|log| !log.is_empty())
}
