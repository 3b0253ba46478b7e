use std::fs;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::inventory::INVENTORY_MANIFEST_FILE;
use super::run_manifest::{RUN_MANIFEST_FILE, manifest_dir};
use crate::cli::StatusArgs;
use crate::model::{AnalysisRunManifest, InputInventoryManifest};

pub fn run(args: StatusArgs) -> Result<()> {
    let manifest_dir = manifest_dir(&args.out_dir);
    let run_manifest_path = manifest_dir.join(RUN_MANIFEST_FILE);
    let inventory_path = manifest_dir.join(INVENTORY_MANIFEST_FILE);

    info!(out_dir = %args.out_dir.display(), "status requested");

    if run_manifest_path.exists() {
        let raw = fs::read(&run_manifest_path)
            .with_context(|| format!("failed to read {}", run_manifest_path.display()))?;
        let manifest: AnalysisRunManifest = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse {}", run_manifest_path.display()))?;

        info!(
            run_id = %manifest.run_id,
            command = %manifest.command,
            status = %manifest.status,
            started_at = %manifest.started_at,
            updated_at = %manifest.updated_at,
            images_processed = manifest.counts.images_processed,
            documents_loaded = manifest.counts.documents_loaded,
            documents_missing = manifest.counts.documents_missing,
            rows_written = manifest.counts.rows_written,
            outputs = manifest.outputs.len(),
            warnings = manifest.warnings.len(),
            "loaded run manifest"
        );
        for warning in &manifest.warnings {
            warn!(run_id = %manifest.run_id, "{warning}");
        }
    } else {
        warn!(path = %run_manifest_path.display(), "run manifest missing");
    }

    if inventory_path.exists() {
        let raw = fs::read(&inventory_path)
            .with_context(|| format!("failed to read {}", inventory_path.display()))?;
        let inventory: InputInventoryManifest = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse {}", inventory_path.display()))?;

        info!(
            generated_at = %inventory.generated_at,
            input_count = inventory.input_count,
            missing = inventory.missing.len(),
            unrecognized = inventory.unrecognized.len(),
            "loaded inventory manifest"
        );
    } else {
        warn!(path = %inventory_path.display(), "inventory manifest missing");
    }

    Ok(())
}
