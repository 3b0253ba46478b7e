use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::DocumentLoader;
use crate::metrics::entity::{EntityCounts, EntityScores};
use crate::metrics::style::{StyleFlag, artistic_style_sensitivity};
use crate::model::{EntityLabelDocument, image_ids, labels_file_name};

const LABELS_SUFFIX: &str = "_labels.json";

#[derive(Debug, Clone)]
pub struct EntityRow {
    pub file: String,
    pub counts: EntityCounts,
    pub scores: EntityScores,
}

pub fn entity_rows(loader: &mut DocumentLoader, entity_dir: &Path) -> Result<Vec<EntityRow>> {
    let mut rows = Vec::new();

    for image in image_ids() {
        let file = labels_file_name(image);
        let Some(document) = loader.load::<EntityLabelDocument>(&entity_dir.join(&file))? else {
            continue;
        };

        let counts = EntityCounts::from_document(&document);
        let scores = counts.scores();
        info!(
            file = %file,
            tp = counts.true_positive,
            fp = counts.false_positive,
            fn_ = counts.false_negative,
            mr = counts.matched_replacement,
            accuracy = scores.accuracy,
            precision = scores.precision,
            recall = scores.recall,
            f1 = scores.f1,
            "entity metrics"
        );
        rows.push(EntityRow {
            file,
            counts,
            scores,
        });
    }

    Ok(rows)
}

#[derive(Debug, Clone)]
pub struct StyleSummary {
    pub flags: Vec<(String, StyleFlag)>,
    pub sensitivity: Option<f64>,
}

pub fn style_summary(loader: &mut DocumentLoader, entity_dir: &Path) -> Result<StyleSummary> {
    let mut names = Vec::new();
    if entity_dir.is_dir() {
        let entries = fs::read_dir(entity_dir)
            .with_context(|| format!("failed to read {}", entity_dir.display()))?;
        for entry in entries {
            let entry = entry
                .with_context(|| format!("failed to read entry in {}", entity_dir.display()))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(LABELS_SUFFIX) && entry.path().is_file() {
                names.push(name);
            }
        }
    } else {
        warn!(path = %entity_dir.display(), "entity directory missing");
    }
    names.sort();

    let mut flags = Vec::with_capacity(names.len());
    for name in names {
        if let Some(document) = loader.load::<EntityLabelDocument>(&entity_dir.join(&name))? {
            flags.push((name, StyleFlag::from_document(&document)));
        }
    }

    let just_flags = flags.iter().map(|(_, flag)| *flag).collect::<Vec<StyleFlag>>();
    let sensitivity = artistic_style_sensitivity(&just_flags);
    match sensitivity {
        Some(ass) => info!(documents = flags.len(), ass, "artistic style sensitivity"),
        None => warn!(path = %entity_dir.display(), "no matching label files found"),
    }

    Ok(StyleSummary { flags, sensitivity })
}
