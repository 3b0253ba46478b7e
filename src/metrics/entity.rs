use serde::Serialize;

use crate::model::EntityLabelDocument;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntityCounts {
    pub true_positive: usize,
    pub false_positive: usize,
    pub false_negative: usize,
    pub matched_replacement: usize,
}

impl EntityCounts {
    pub fn from_sizes(original: usize, added: usize, removed: usize) -> Self {
        let matched_replacement = removed.min(added);
        Self {
            true_positive: original.saturating_sub(removed),
            false_positive: removed.saturating_sub(matched_replacement),
            false_negative: added.saturating_sub(matched_replacement),
            matched_replacement,
        }
    }

    pub fn from_document(document: &EntityLabelDocument) -> Self {
        Self::from_sizes(
            document.original.len(),
            document.added.len(),
            document.removed.len(),
        )
    }

    pub fn accuracy(&self) -> f64 {
        ratio(
            self.true_positive,
            self.true_positive + self.false_positive + self.false_negative + self.matched_replacement,
        )
    }

    pub fn precision(&self) -> f64 {
        ratio(
            self.true_positive,
            self.true_positive + self.false_positive + self.matched_replacement,
        )
    }

    pub fn recall(&self) -> f64 {
        ratio(
            self.true_positive,
            self.true_positive + self.false_negative + self.matched_replacement,
        )
    }

    pub fn scores(&self) -> EntityScores {
        let precision = self.precision();
        let recall = self.recall();
        EntityScores {
            accuracy: self.accuracy(),
            precision,
            recall,
            f1: f1_score(precision, recall),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EntityScores {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

pub fn f1_score(precision: f64, recall: f64) -> f64 {
    let total = precision + recall;
    if total > 0.0 {
        2.0 * precision * recall / total
    } else {
        0.0
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_entities_two_added_three_removed() {
        let counts = EntityCounts::from_sizes(10, 2, 3);
        assert_eq!(
            counts,
            EntityCounts {
                true_positive: 7,
                false_positive: 1,
                false_negative: 0,
                matched_replacement: 2,
            }
        );

        let scores = counts.scores();
        assert!((scores.accuracy - 0.7).abs() < 1e-12);
        assert!((scores.precision - 0.7).abs() < 1e-12);
        assert!((scores.recall - 7.0 / 9.0).abs() < 1e-12);
        assert!((scores.f1 - 0.736_842_105).abs() < 1e-6, "f1 = {}", scores.f1);
    }

    #[test]
    fn empty_document_scores_zero_everywhere() {
        let scores = EntityCounts::from_document(&EntityLabelDocument::default()).scores();
        assert_eq!(scores.accuracy, 0.0);
        assert_eq!(scores.precision, 0.0);
        assert_eq!(scores.recall, 0.0);
        assert_eq!(scores.f1, 0.0);
    }

    #[test]
    fn unmatched_additions_count_as_false_negatives() {
        let counts = EntityCounts::from_sizes(4, 3, 1);
        assert_eq!(counts.true_positive, 3);
        assert_eq!(counts.matched_replacement, 1);
        assert_eq!(counts.false_positive, 0);
        assert_eq!(counts.false_negative, 2);
        assert!((counts.recall() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn ratios_stay_within_unit_interval() {
        for original in 0..6 {
            for added in 0..6 {
                for removed in 0..6 {
                    let scores = EntityCounts::from_sizes(original, added, removed).scores();
                    for value in [scores.accuracy, scores.precision, scores.recall, scores.f1] {
                        assert!((0.0..=1.0).contains(&value), "{original}/{added}/{removed}");
                    }
                }
            }
        }
    }

    #[test]
    fn document_lengths_drive_counts() {
        let document: EntityLabelDocument = serde_json::from_value(serde_json::json!({
            "original": ["sun", "house", "tree"],
            "added": ["cloud"],
            "removed": ["tree"]
        }))
        .expect("labels parse");
        let counts = EntityCounts::from_document(&document);
        assert_eq!(counts.true_positive, 2);
        assert_eq!(counts.matched_replacement, 1);
    }
}
