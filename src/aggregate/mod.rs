use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::de::DeserializeOwned;

use crate::model::RunCounts;
use crate::util::read_json_optional;

mod entity_style;
mod overview;
mod score;
mod text;
#[cfg(test)]
mod tests;

pub use self::entity_style::{EntityRow, entity_rows, style_summary};
pub use self::overview::{OverviewRow, overview_rows};
pub use self::score::{
    ScoreObservation, ScoreSummaryRow, score_observations, score_summary_by_dimension,
    score_summary_by_image, volatility_rows,
};
pub use self::text::{DimensionText, TextRow, text_rows};

#[derive(Debug, Default)]
pub struct DocumentLoader {
    counts: RunCounts,
    seen: BTreeSet<PathBuf>,
}

impl DocumentLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load<T: DeserializeOwned>(&mut self, path: &Path) -> Result<Option<T>> {
        let document = read_json_optional(path)?;
        if !self.seen.insert(path.to_path_buf()) {
            return Ok(document);
        }
        if document.is_some() {
            self.counts.documents_loaded += 1;
        } else {
            self.counts.documents_missing += 1;
        }
        Ok(document)
    }

    pub fn into_counts(self) -> RunCounts {
        self.counts
    }
}
