use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use crate::aggregate::DocumentLoader;
use crate::cli::AnalysisArgs;
use crate::export::{CsvWorkbookSink, Sheet, TabularSink};
use crate::model::{AnalysisRunManifest, RunCounts, RunPaths};
use crate::util::{now_utc_string, utc_compact_string, write_json_pretty};

pub const RUN_MANIFEST_FILE: &str = "run_manifest.json";

pub fn manifest_dir(out_dir: &Path) -> PathBuf {
    out_dir.join("manifests")
}

#[derive(Debug)]
pub struct AnalysisRun {
    run_id: String,
    command: String,
    started_at: String,
    paths: RunPaths,
    out_dir: PathBuf,
    sink: CsvWorkbookSink,
    outputs: Vec<String>,
    warnings: Vec<String>,
    images_processed: usize,
    rows_written: usize,
}

impl AnalysisRun {
    pub fn start(command: &str, args: &AnalysisArgs) -> Self {
        let run_id = format!("run-{}", utc_compact_string(Utc::now()));
        info!(run_id = %run_id, command, out_dir = %args.out_dir.display(), "starting analysis");

        Self {
            run_id,
            command: command.to_string(),
            started_at: now_utc_string(),
            paths: RunPaths {
                score_review_dir: args.inputs.score_review_dir.display().to_string(),
                suggestion_dir: args.inputs.suggestion_dir.display().to_string(),
                entity_dir: args.inputs.entity_dir.display().to_string(),
                out_dir: args.out_dir.display().to_string(),
            },
            out_dir: args.out_dir.clone(),
            sink: CsvWorkbookSink::new(&args.out_dir),
            outputs: Vec::new(),
            warnings: Vec::new(),
            images_processed: 0,
            rows_written: 0,
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn write_workbook(&mut self, workbook: &str, sheets: &[Sheet]) -> Result<()> {
        let written = self.sink.write_workbook(workbook, sheets)?;
        self.rows_written += sheets.iter().map(|sheet| sheet.rows.len()).sum::<usize>();
        self.record_outputs(written);
        info!(workbook, sheets = sheets.len(), "results saved");
        Ok(())
    }

    pub fn record_outputs(&mut self, paths: impl IntoIterator<Item = PathBuf>) {
        self.outputs
            .extend(paths.into_iter().map(|path| path.display().to_string()));
    }

    pub fn note_images(&mut self, count: usize) {
        self.images_processed = self.images_processed.max(count);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(run_id = %self.run_id, "{message}");
        self.warnings.push(message);
    }

    pub fn finish(self, loader: DocumentLoader) -> Result<()> {
        let counts = RunCounts {
            images_processed: self.images_processed,
            rows_written: self.rows_written,
            ..loader.into_counts()
        };

        let manifest = AnalysisRunManifest {
            manifest_version: 1,
            run_id: self.run_id,
            command: self.command,
            status: "completed".to_string(),
            started_at: self.started_at,
            updated_at: now_utc_string(),
            paths: self.paths,
            counts,
            outputs: self.outputs,
            warnings: self.warnings,
        };

        let path = manifest_dir(&self.out_dir).join(RUN_MANIFEST_FILE);
        write_json_pretty(&path, &manifest)?;
        info!(
            path = %path.display(),
            documents_loaded = manifest.counts.documents_loaded,
            documents_missing = manifest.counts.documents_missing,
            rows_written = manifest.counts.rows_written,
            "analysis completed"
        );
        Ok(())
    }
}

pub fn run_single<F>(command: &str, args: &AnalysisArgs, step: F) -> Result<()>
where
    F: FnOnce(&AnalysisArgs, &mut DocumentLoader, &mut AnalysisRun) -> Result<()>,
{
    let mut run = AnalysisRun::start(command, args);
    let mut loader = DocumentLoader::new();
    step(args, &mut loader, &mut run)?;
    run.finish(loader)
}
