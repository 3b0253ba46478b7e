use std::collections::BTreeMap;

use anyhow::{Context, Result};
use regex::Regex;

use super::stats::{cosine_similarity, mean, normalize};
use crate::model::{RoundRecord, TextGroup, TextGroupKind, edit_rounds};

const WORD_PATTERN: &str = r"(?u)\b\w+\b";

#[derive(Debug, Clone)]
pub struct WordTokenizer {
    pattern: Regex,
}

impl WordTokenizer {
    pub fn new() -> Result<Self> {
        let pattern = Regex::new(WORD_PATTERN).context("failed to compile word token regex")?;
        Ok(Self { pattern })
    }

    pub fn tokens(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.pattern
            .find_iter(&lowered)
            .map(|token| token.as_str().to_string())
            .collect()
    }
}

fn char_len(value: Option<&String>) -> usize {
    value.map(|text| text.chars().count()).unwrap_or(0)
}

pub fn round_acceptance_rate(group: &TextGroup) -> Option<f64> {
    let original_len = char_len(group.original.as_ref());
    if original_len == 0 {
        return None;
    }

    let denominator = char_len(group.added.as_ref()) + original_len;
    if denominator == 0 {
        return None;
    }

    let kept = original_len as f64 - char_len(group.removed.as_ref()) as f64;
    Some(kept / denominator as f64)
}

pub fn text_acceptance_rate(log: &[RoundRecord]) -> Option<f64> {
    let rates = edit_rounds(log)
        .flat_map(|record| {
            TextGroupKind::ALL
                .into_iter()
                .filter_map(move |kind| record.data.text_group(kind))
        })
        .filter_map(round_acceptance_rate)
        .collect::<Vec<f64>>();
    mean(&rates)
}

fn non_blank_pair(group: &TextGroup) -> Option<(&str, &str)> {
    let original = group.original.as_deref()?;
    let current = group.current.as_deref()?;
    if original.trim().is_empty() || current.trim().is_empty() {
        return None;
    }
    Some((original, current))
}

fn last_text_pair<'a>(
    log: &'a [RoundRecord],
    kinds: &[TextGroupKind],
) -> Option<(&'a str, &'a str)> {
    edit_rounds(log)
        .flat_map(|record| {
            kinds
                .iter()
                .filter_map(move |kind| record.data.text_group(*kind))
        })
        .filter_map(non_blank_pair)
        .last()
}

fn count_vectors<K: Ord + Clone>(left: &[K], right: &[K]) -> (Vec<f64>, Vec<f64>) {
    let mut vocabulary = BTreeMap::<K, (f64, f64)>::new();
    for term in left {
        vocabulary.entry(term.clone()).or_default().0 += 1.0;
    }
    for term in right {
        vocabulary.entry(term.clone()).or_default().1 += 1.0;
    }
    vocabulary.into_values().unzip()
}

pub fn text_similarity_words(log: &[RoundRecord], tokenizer: &WordTokenizer) -> Option<f64> {
    let (original, current) = last_text_pair(log, &TextGroupKind::ALL)?;

    let (left, right) = count_vectors(&tokenizer.tokens(original), &tokenizer.tokens(current));
    if left.len() < 2 {
        return None;
    }
    Some(cosine_similarity(&left, &right))
}

pub fn text_similarity_chars(log: &[RoundRecord], kind: TextGroupKind) -> Option<f64> {
    let (original, current) = last_text_pair(log, &[kind])?;

    let (left, right) = count_vectors(&char_terms(original), &char_terms(current));
    Some(normalize(cosine_similarity(&left, &right), 0.0, 1.0))
}

fn char_terms(text: &str) -> Vec<char> {
    let mut out = Vec::<char>::new();
    let mut pending_space: Option<char> = None;
    let mut run_len = 0_usize;

    for character in text.chars().flat_map(char::to_lowercase) {
        if character.is_whitespace() {
            run_len += 1;
            pending_space = Some(if run_len == 1 { character } else { ' ' });
            continue;
        }
        if let Some(space) = pending_space.take() {
            out.push(space);
        }
        run_len = 0;
        out.push(character);
    }
    if let Some(space) = pending_space {
        out.push(space);
    }
    out
}

pub fn text_retention_closeness(log: &[RoundRecord]) -> Option<f64> {
    let mut total_added = 0_usize;
    let mut total_removed = 0_usize;
    let mut total_original = 0_usize;

    for group in edit_rounds(log).filter_map(|record| record.data.reviews.as_ref()) {
        total_added += char_len(group.added.as_ref());
        total_removed += char_len(group.removed.as_ref());
        total_original += char_len(group.original.as_ref());
    }

    let denominator = total_added + total_original;
    if denominator == 0 {
        return None;
    }
    let modification_rate = total_removed as f64 / denominator as f64;
    Some(1.0 - normalize(modification_rate, 0.0, 1.0))
}
