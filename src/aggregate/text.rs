use std::path::Path;

use anyhow::Result;

use super::DocumentLoader;
use crate::metrics::text::{WordTokenizer, text_acceptance_rate, text_similarity_words};
use crate::model::{Dimension, RoundLog, image_ids, score_review_file_name, suggestion_file_name};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DimensionText {
    pub review_tar: Option<f64>,
    pub suggestion_tar: Option<f64>,
    pub review_ts: Option<f64>,
    pub suggestion_ts: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRow {
    pub image: u32,
    pub dimensions: Vec<DimensionText>,
}

pub fn text_rows(
    loader: &mut DocumentLoader,
    score_review_dir: &Path,
    suggestion_dir: &Path,
    tokenizer: &WordTokenizer,
) -> Result<Vec<TextRow>> {
    let mut rows = Vec::new();

    for image in image_ids() {
        let mut dimensions = Vec::with_capacity(Dimension::ALL.len());
        for dimension in Dimension::ALL {
            let mut text = DimensionText::default();

            let review_path = score_review_dir.join(score_review_file_name(image, dimension));
            if let Some(log) = loader.load::<RoundLog>(&review_path)? {
                text.review_tar = text_acceptance_rate(&log);
                text.review_ts = text_similarity_words(&log, tokenizer);
            }

            let suggestion_path = suggestion_dir.join(suggestion_file_name(image, dimension));
            if let Some(log) = loader.load::<RoundLog>(&suggestion_path)? {
                text.suggestion_tar = text_acceptance_rate(&log);
                text.suggestion_ts = text_similarity_words(&log, tokenizer);
            }

            dimensions.push(text);
        }
        rows.push(TextRow { image, dimensions });
    }

    Ok(rows)
}
