use anyhow::Result;

use super::run_manifest::run_single;
use super::{entity, score, style, text};
use crate::cli::AnalysisArgs;

pub fn run(args: AnalysisArgs) -> Result<()> {
    run_single("all", &args, |args, loader, run| {
        entity::execute(args, loader, run)?;
        score::execute(args, loader, run)?;
        style::execute(args, loader, run)?;
        text::execute(args, loader, run)
    })
}
