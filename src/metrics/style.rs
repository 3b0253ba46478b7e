use serde::Serialize;

use crate::model::EntityLabelDocument;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum StyleFlag {
    Correct,
    Incorrect,
}

impl StyleFlag {
    pub fn from_document(document: &EntityLabelDocument) -> Self {
        if document.style.removed.is_empty() {
            Self::Correct
        } else {
            Self::Incorrect
        }
    }

    pub fn as_int(self) -> i64 {
        match self {
            Self::Correct => 1,
            Self::Incorrect => 0,
        }
    }
}

pub fn artistic_style_sensitivity(flags: &[StyleFlag]) -> Option<f64> {
    if flags.is_empty() {
        return None;
    }
    let incorrect = flags
        .iter()
        .filter(|flag| **flag == StyleFlag::Incorrect)
        .count();
    Some(1.0 - incorrect as f64 / flags.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_style_removal_in_five_documents() {
        let mut flags = vec![StyleFlag::Correct; 4];
        flags.push(StyleFlag::Incorrect);
        let ass = artistic_style_sensitivity(&flags).expect("defined");
        assert!((ass - 0.8).abs() < 1e-12);
    }

    #[test]
    fn empty_set_has_no_value() {
        assert_eq!(artistic_style_sensitivity(&[]), None);
    }

    #[test]
    fn flag_tracks_style_removed() {
        let untouched: EntityLabelDocument =
            serde_json::from_value(serde_json::json!({ "style": { "removed": [] } }))
                .expect("labels parse");
        let edited: EntityLabelDocument =
            serde_json::from_value(serde_json::json!({ "style": { "removed": ["cubism"] } }))
                .expect("labels parse");
        assert_eq!(StyleFlag::from_document(&untouched), StyleFlag::Correct);
        assert_eq!(StyleFlag::from_document(&edited), StyleFlag::Incorrect);
        assert_eq!(StyleFlag::from_document(&EntityLabelDocument::default()).as_int(), 1);
        assert_eq!(StyleFlag::Incorrect.as_int(), 0);
    }
}
