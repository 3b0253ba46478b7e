use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::metrics::score::DEFAULT_SCORE_CEILING;

#[derive(Parser, Debug)]
#[command(
    name = "artmentor",
    version,
    about = "Review-log metrics for the ArtMentor annotation study"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Inventory(InventoryArgs),
    Entity(AnalysisArgs),
    Score(AnalysisArgs),
    Volatility(AnalysisArgs),
    Text(AnalysisArgs),
    Style(AnalysisArgs),
    Overview(OverviewArgs),
    All(AnalysisArgs),
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    #[arg(long, default_value = "userActionsEveryRounds/score_Review")]
    pub score_review_dir: PathBuf,

    #[arg(long, default_value = "userActionsEveryRounds/suggestion")]
    pub suggestion_dir: PathBuf,

    #[arg(long, default_value = "userActions/Entities")]
    pub entity_dir: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct AnalysisArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    #[arg(long, default_value = "results")]
    pub out_dir: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct OverviewArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,

    #[arg(long, default_value_t = DEFAULT_SCORE_CEILING)]
    pub score_ceiling: f64,

    #[arg(long, default_value_t = false)]
    pub no_charts: bool,
}

#[derive(Args, Debug, Clone)]
pub struct InventoryArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    #[arg(long, default_value = "results")]
    pub out_dir: PathBuf,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = "results")]
    pub out_dir: PathBuf,
}
