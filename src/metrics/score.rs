use serde::Serialize;

use super::stats::{mean, normalize, population_std, spearman};
use crate::model::{RoundRecord, ScoreGroup, ScoreValue, edit_rounds};

pub const DEFAULT_SCORE_CEILING: f64 = 5.0;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ScoreSource {
    Original,
    InitialSuggestion,
}

impl ScoreSource {
    fn pick(self, group: &ScoreGroup) -> Option<f64> {
        let value = match self {
            Self::Original => group.original.as_ref(),
            Self::InitialSuggestion => group.init_gpt_score.as_ref(),
        };
        value.and_then(ScoreValue::as_f64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScorePair {
    pub reference: f64,
    pub current: f64,
}

pub fn current_scores(log: &[RoundRecord]) -> Vec<f64> {
    edit_rounds(log)
        .filter_map(|record| record.data.scores.as_ref())
        .filter_map(|group| group.current.as_ref().and_then(ScoreValue::as_f64))
        .collect()
}

pub fn score_volatility(log: &[RoundRecord]) -> Option<f64> {
    let scores = current_scores(log);
    if scores.len() < 2 {
        return None;
    }
    population_std(&scores)
}

pub fn score_pairs(log: &[RoundRecord], source: ScoreSource) -> Vec<ScorePair> {
    edit_rounds(log)
        .filter_map(|record| record.data.scores.as_ref())
        .filter_map(|group| {
            let reference = source.pick(group)?;
            let current = group.current.as_ref().and_then(ScoreValue::as_f64)?;
            Some(ScorePair { reference, current })
        })
        .collect()
}

pub fn score_consistency(pairs: &[ScorePair]) -> Option<f64> {
    let (reference, current) = split_pairs(pairs);
    spearman(&reference, &current)
}

pub fn score_difference(pairs: &[ScorePair]) -> Option<f64> {
    let gaps = pairs
        .iter()
        .map(|pair| (pair.reference - pair.current).abs())
        .collect::<Vec<f64>>();
    mean(&gaps)
}

pub fn score_consistency_for_log(log: &[RoundRecord], source: ScoreSource) -> Option<f64> {
    score_consistency(&score_pairs(log, source))
}

pub fn score_difference_for_log(log: &[RoundRecord], source: ScoreSource) -> Option<f64> {
    score_difference(&score_pairs(log, source))
}

/// `1 - value / ceiling`. Values beyond the ceiling go negative and are left that way.
pub fn closeness(value: f64, ceiling: f64) -> f64 {
    1.0 - normalize(value, 0.0, ceiling)
}

pub fn score_difference_closeness(log: &[RoundRecord], ceiling: f64) -> Option<f64> {
    score_difference_for_log(log, ScoreSource::InitialSuggestion)
        .map(|difference| closeness(difference, ceiling))
}

pub fn score_agreement_closeness(log: &[RoundRecord], ceiling: f64) -> Option<f64> {
    score_difference_for_log(log, ScoreSource::InitialSuggestion)
        .map(|difference| normalize(closeness(difference, ceiling), 0.0, 1.0))
}

pub fn score_volatility_closeness(log: &[RoundRecord], ceiling: f64) -> Option<f64> {
    score_volatility(log).map(|volatility| closeness(volatility, ceiling))
}

fn split_pairs(pairs: &[ScorePair]) -> (Vec<f64>, Vec<f64>) {
    pairs.iter().map(|pair| (pair.reference, pair.current)).unzip()
}
