use std::fmt;

use serde::{Deserialize, Serialize};

pub const IMAGE_COUNT: u32 = 20;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize)]
pub enum Dimension {
    Realistic,
    Deformation,
    Imagination,
    ColorRichness,
    ColorContrast,
    LineCombination,
    LineTexture,
    PictureOrganization,
    Transformation,
}

impl Dimension {
    pub const ALL: [Dimension; 9] = [
        Self::Realistic,
        Self::Deformation,
        Self::Imagination,
        Self::ColorRichness,
        Self::ColorContrast,
        Self::LineCombination,
        Self::LineTexture,
        Self::PictureOrganization,
        Self::Transformation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Realistic => "Realistic",
            Self::Deformation => "Deformation",
            Self::Imagination => "Imagination",
            Self::ColorRichness => "Color Richness",
            Self::ColorContrast => "Color Contrast",
            Self::LineCombination => "Line Combination",
            Self::LineTexture => "Line Texture",
            Self::PictureOrganization => "Picture Organization",
            Self::Transformation => "Transformation",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|dim| dim.as_str() == raw)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn image_ids() -> impl Iterator<Item = u32> {
    1..=IMAGE_COUNT
}

pub fn image_name(image: u32) -> String {
    format!("{image}.jpg")
}

pub fn score_review_file_name(image: u32, dimension: Dimension) -> String {
    format!("{image}.jpg_{dimension}_score_Review.json")
}

pub fn suggestion_file_name(image: u32, dimension: Dimension) -> String {
    format!("{image}.jpg_{dimension}_suggestion.json")
}

pub fn labels_file_name(image: u32) -> String {
    format!("{image}.jpg_labels.json")
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoundRecord {
    pub round: i64,
    #[serde(default)]
    pub data: RoundData,
}

impl RoundRecord {
    pub fn is_initial(&self) -> bool {
        self.round <= 1
    }
}

pub type RoundLog = Vec<RoundRecord>;

pub fn edit_rounds(log: &[RoundRecord]) -> impl Iterator<Item = &RoundRecord> {
    log.iter().filter(|record| !record.is_initial())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoundData {
    #[serde(default)]
    pub scores: Option<ScoreGroup>,
    #[serde(default, rename = "Reviews")]
    pub reviews: Option<TextGroup>,
    #[serde(default)]
    pub suggestions: Option<TextGroup>,
}

impl RoundData {
    pub fn text_group(&self, kind: TextGroupKind) -> Option<&TextGroup> {
        match kind {
            TextGroupKind::Reviews => self.reviews.as_ref(),
            TextGroupKind::Suggestions => self.suggestions.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoreGroup {
    #[serde(default)]
    pub original: Option<ScoreValue>,
    #[serde(default, rename = "initGPTscore")]
    pub init_gpt_score: Option<ScoreValue>,
    #[serde(default)]
    pub current: Option<ScoreValue>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ScoreValue {
    Number(f64),
    Text(String),
}

impl ScoreValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => value.is_finite().then_some(*value),
            Self::Text(raw) => raw.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TextGroupKind {
    Reviews,
    Suggestions,
}

impl TextGroupKind {
    pub const ALL: [TextGroupKind; 2] = [Self::Reviews, Self::Suggestions];
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextGroup {
    #[serde(default)]
    pub original: Option<String>,
    #[serde(default)]
    pub added: Option<String>,
    #[serde(default)]
    pub removed: Option<String>,
    #[serde(default)]
    pub current: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntityLabelDocument {
    #[serde(default)]
    pub original: Vec<serde_json::Value>,
    #[serde(default)]
    pub added: Vec<serde_json::Value>,
    #[serde(default)]
    pub removed: Vec<serde_json::Value>,
    #[serde(default)]
    pub style: StyleEdits,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StyleEdits {
    #[serde(default)]
    pub removed: Vec<serde_json::Value>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    ScoreReview,
    Suggestion,
    Labels,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputEntry {
    pub filename: String,
    pub kind: InputKind,
    pub image: u32,
    pub dimension: Option<String>,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInventoryManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub score_review_dir: String,
    pub suggestion_dir: String,
    pub entity_dir: String,
    pub input_count: usize,
    pub inputs: Vec<InputEntry>,
    pub missing: Vec<String>,
    pub unrecognized: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunPaths {
    pub score_review_dir: String,
    pub suggestion_dir: String,
    pub entity_dir: String,
    pub out_dir: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunCounts {
    pub images_processed: usize,
    pub documents_loaded: usize,
    pub documents_missing: usize,
    pub rows_written: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub command: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub paths: RunPaths,
    pub counts: RunCounts,
    pub outputs: Vec<String>,
    pub warnings: Vec<String>,
}
