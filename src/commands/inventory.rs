use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use regex::Regex;
use tracing::{info, warn};

use super::run_manifest::manifest_dir;
use crate::cli::{InputArgs, InventoryArgs};
use crate::model::{
    Dimension, InputEntry, InputInventoryManifest, InputKind, image_ids, labels_file_name,
    score_review_file_name, suggestion_file_name,
};
use crate::util::{now_utc_string, sha256_file, write_json_pretty};

pub const INVENTORY_MANIFEST_FILE: &str = "input_inventory.json";

pub fn run(args: InventoryArgs) -> Result<()> {
    let manifest = build_manifest(&args.inputs)?;

    for name in &manifest.unrecognized {
        warn!(file = %name, "unrecognized input file name");
    }

    if args.dry_run {
        info!(
            input_count = manifest.input_count,
            missing = manifest.missing.len(),
            "inventory dry-run complete"
        );
        return Ok(());
    }

    let manifest_path = args
        .manifest_path
        .unwrap_or_else(|| manifest_dir(&args.out_dir).join(INVENTORY_MANIFEST_FILE));

    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote inventory manifest");
    info!(
        input_count = manifest.input_count,
        missing = manifest.missing.len(),
        "inventory completed"
    );

    Ok(())
}

struct FileNamePatterns {
    score_review: Regex,
    suggestion: Regex,
    labels: Regex,
}

impl FileNamePatterns {
    fn new() -> Result<Self> {
        Ok(Self {
            score_review: Regex::new(r"^(\d+)\.jpg_(.+)_score_Review\.json$")
                .context("failed to compile score review filename regex")?,
            suggestion: Regex::new(r"^(\d+)\.jpg_(.+)_suggestion\.json$")
                .context("failed to compile suggestion filename regex")?,
            labels: Regex::new(r"^(\d+)\.jpg_labels\.json$")
                .context("failed to compile labels filename regex")?,
        })
    }

    fn pattern(&self, kind: InputKind) -> &Regex {
        match kind {
            InputKind::ScoreReview => &self.score_review,
            InputKind::Suggestion => &self.suggestion,
            InputKind::Labels => &self.labels,
        }
    }

    fn classify(&self, kind: InputKind, filename: &str) -> Option<(u32, Option<Dimension>)> {
        let captures = self.pattern(kind).captures(filename)?;
        let image = captures.get(1)?.as_str().parse::<u32>().ok()?;
        if !image_ids().any(|known| known == image) {
            return None;
        }

        match captures.get(2) {
            Some(raw) => Dimension::parse(raw.as_str()).map(|dimension| (image, Some(dimension))),
            None => Some((image, None)),
        }
    }
}

pub fn build_manifest(inputs: &InputArgs) -> Result<InputInventoryManifest> {
    let patterns = FileNamePatterns::new()?;

    let sources = [
        (InputKind::ScoreReview, &inputs.score_review_dir),
        (InputKind::Suggestion, &inputs.suggestion_dir),
        (InputKind::Labels, &inputs.entity_dir),
    ];

    let mut entries = Vec::new();
    let mut unrecognized = Vec::new();
    let mut seen = BTreeSet::<(String, String)>::new();

    for (kind, dir) in sources {
        let mut paths = discover_json(dir)?;
        paths.sort();

        for path in paths {
            let filename = path
                .file_name()
                .and_then(|name| name.to_str())
                .map(ToOwned::to_owned)
                .with_context(|| format!("invalid UTF-8 filename: {}", path.display()))?;

            let Some((image, dimension)) = patterns.classify(kind, &filename) else {
                if kind != InputKind::Labels {
                    unrecognized.push(path.display().to_string());
                }
                continue;
            };

            let sha256 = sha256_file(&path)?;
            seen.insert((dir.display().to_string(), filename.clone()));
            entries.push(InputEntry {
                filename,
                kind,
                image,
                dimension: dimension.map(|value| value.as_str().to_string()),
                sha256,
            });
        }
    }

    if entries.is_empty() {
        bail!(
            "no input documents found in {}, {} or {}",
            inputs.score_review_dir.display(),
            inputs.suggestion_dir.display(),
            inputs.entity_dir.display()
        );
    }

    let missing = expected_files(inputs)
        .into_iter()
        .filter(|(dir, name)| !seen.contains(&(dir.display().to_string(), name.clone())))
        .map(|(dir, name)| dir.join(name).display().to_string())
        .collect::<Vec<String>>();

    Ok(InputInventoryManifest {
        manifest_version: 1,
        generated_at: now_utc_string(),
        score_review_dir: inputs.score_review_dir.display().to_string(),
        suggestion_dir: inputs.suggestion_dir.display().to_string(),
        entity_dir: inputs.entity_dir.display().to_string(),
        input_count: entries.len(),
        inputs: entries,
        missing,
        unrecognized,
    })
}

fn expected_files(inputs: &InputArgs) -> Vec<(PathBuf, String)> {
    let mut expected = Vec::new();
    for image in image_ids() {
        for dimension in Dimension::ALL {
            expected.push((
                inputs.score_review_dir.clone(),
                score_review_file_name(image, dimension),
            ));
            expected.push((
                inputs.suggestion_dir.clone(),
                suggestion_file_name(image, dimension),
            ));
        }
        expected.push((inputs.entity_dir.clone(), labels_file_name(image)));
    }
    expected
}

fn discover_json(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();

    if !dir.is_dir() {
        warn!(path = %dir.display(), "input directory missing");
        return Ok(found);
    }

    let entries = fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;

    for entry in entries {
        let entry = entry.with_context(|| format!("failed to read entry in {}", dir.display()))?;
        let path = entry.path();

        if !entry
            .file_type()
            .with_context(|| format!("failed to inspect file type: {}", path.display()))?
            .is_file()
        {
            continue;
        }

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            found.push(path);
        }
    }

    Ok(found)
}
