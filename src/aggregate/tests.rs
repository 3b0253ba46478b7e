use std::fs;
use std::path::Path;

use serde_json::json;

use super::*;
use crate::metrics::style::StyleFlag;
use crate::metrics::text::WordTokenizer;
use crate::model::{Dimension, labels_file_name, score_review_file_name, suggestion_file_name};

fn write(dir: &Path, name: &str, value: serde_json::Value) {
    fs::create_dir_all(dir).expect("create fixture dir");
    fs::write(dir.join(name), serde_json::to_vec(&value).expect("encode")).expect("write fixture");
}

fn review_log(rounds: &[(i64, f64, f64)]) -> serde_json::Value {
    let records = rounds
        .iter()
        .map(|(round, original, current)| {
            json!({
                "round": round,
                "data": {
                    "scores": { "original": original, "initGPTscore": original, "current": current },
                    "Reviews": {
                        "original": "abcdefghij",
                        "added": "",
                        "removed": "ab",
                        "current": "cdefghij"
                    }
                }
            })
        })
        .collect::<Vec<_>>();
    serde_json::Value::Array(records)
}

#[test]
fn entity_rows_skip_missing_images() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(
        dir.path(),
        &labels_file_name(2),
        json!({
            "original": ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"],
            "added": ["k", "l"],
            "removed": ["a", "b", "c"]
        }),
    );

    let mut loader = DocumentLoader::new();
    let rows = entity_rows(&mut loader, dir.path()).expect("entity rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].file, "2.jpg_labels.json");
    assert!((rows[0].scores.accuracy - 0.7).abs() < 1e-12);

    let counts = loader.into_counts();
    assert_eq!(counts.documents_loaded, 1);
    assert_eq!(counts.documents_missing, 19);
}

#[test]
fn style_summary_scans_label_files_in_name_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    for image in 1..=5 {
        let removed = if image == 3 { json!(["Fauvism"]) } else { json!([]) };
        write(
            dir.path(),
            &labels_file_name(image),
            json!({ "style": { "removed": removed } }),
        );
    }
    write(dir.path(), "notes.json", json!({ "style": { "removed": ["x"] } }));

    let mut loader = DocumentLoader::new();
    let summary = style_summary(&mut loader, dir.path()).expect("style summary");
    assert_eq!(summary.flags.len(), 5);
    assert_eq!(summary.flags[0].0, "1.jpg_labels.json");
    assert_eq!(summary.flags[2], ("3.jpg_labels.json".to_string(), StyleFlag::Incorrect));
    assert!((summary.sensitivity.expect("defined") - 0.8).abs() < 1e-12);
}

#[test]
fn style_summary_without_documents_has_no_value() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut loader = DocumentLoader::new();
    let summary = style_summary(&mut loader, &dir.path().join("absent")).expect("style summary");
    assert!(summary.flags.is_empty());
    assert_eq!(summary.sensitivity, None);
}

#[test]
fn score_summaries_pool_by_dimension_and_by_image() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(
        dir.path(),
        &score_review_file_name(1, Dimension::Realistic),
        review_log(&[(1, 9.0, 0.0), (2, 1.0, 1.0), (3, 2.0, 2.0)]),
    );
    write(
        dir.path(),
        &score_review_file_name(1, Dimension::Imagination),
        review_log(&[(2, 3.0, 5.0)]),
    );
    write(
        dir.path(),
        &score_review_file_name(2, Dimension::Realistic),
        review_log(&[(2, 4.0, 3.0)]),
    );

    let mut loader = DocumentLoader::new();
    let extraction = score_observations(&mut loader, dir.path()).expect("observations");
    let observations = extraction.observations;
    assert_eq!(observations.len(), 4);

    assert_eq!(extraction.per_document.len(), 3);
    assert_eq!(extraction.per_document[0].label, "1.jpg_Realistic");
    assert_eq!(extraction.per_document[0].samples, 2);
    assert!((extraction.per_document[0].consistency.expect("per-document SC") - 1.0).abs() < 1e-12);
    assert_eq!(extraction.per_document[1].label, "1.jpg_Imagination");
    assert_eq!(extraction.per_document[1].consistency, None);
    assert_eq!(extraction.per_document[1].difference, Some(2.0));
    assert!(observations.iter().all(|obs| obs.original != 9.0));

    let by_image = score_summary_by_image(&observations);
    assert_eq!(by_image.len(), 20);
    assert_eq!(by_image[0].label, "1.jpg");
    assert_eq!(by_image[0].samples, 3);
    let image_sd = by_image[0].difference.expect("image 1 SD");
    assert!((image_sd - 2.0 / 3.0).abs() < 1e-12);
    assert!((by_image[0].consistency.expect("image 1 SC") - 1.0).abs() < 1e-12);
    assert_eq!(by_image[2].samples, 0);
    assert_eq!(by_image[2].difference, None);

    let by_dimension = score_summary_by_dimension(&observations);
    assert_eq!(by_dimension.len(), 9);
    assert_eq!(by_dimension[0].label, "Realistic");
    assert_eq!(by_dimension[0].samples, 3);
    assert_eq!(by_dimension[2].samples, 1);
    assert_eq!(by_dimension[2].consistency, None);
    assert_eq!(by_dimension[2].difference, Some(2.0));
}

#[test]
fn volatility_rows_average_defined_dimensions() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(
        dir.path(),
        &score_review_file_name(1, Dimension::Realistic),
        review_log(&[(2, 0.0, 1.0), (3, 0.0, 5.0)]),
    );
    write(
        dir.path(),
        &score_review_file_name(1, Dimension::Deformation),
        review_log(&[(2, 0.0, 3.0), (3, 0.0, 3.0)]),
    );
    write(
        dir.path(),
        &score_review_file_name(1, Dimension::LineTexture),
        review_log(&[(2, 0.0, 4.0)]),
    );

    let mut loader = DocumentLoader::new();
    let rows = volatility_rows(&mut loader, dir.path()).expect("volatility rows");
    assert_eq!(rows.len(), 20);
    assert_eq!(rows[0].volatility, Some(1.0));
    assert_eq!(rows[1].volatility, None);
}

#[test]
fn text_rows_keep_review_and_suggestion_columns_apart() {
    let reviews_dir = tempfile::tempdir().expect("tempdir");
    let suggestions_dir = tempfile::tempdir().expect("tempdir");
    write(
        reviews_dir.path(),
        &score_review_file_name(4, Dimension::ColorContrast),
        review_log(&[(2, 3.0, 3.0)]),
    );
    write(
        suggestions_dir.path(),
        &suggestion_file_name(4, Dimension::ColorContrast),
        json!([
            { "round": 2, "data": { "suggestions": {
                "original": "use warm colors",
                "added": "",
                "removed": "",
                "current": "use warm colors"
            } } }
        ]),
    );

    let tokenizer = WordTokenizer::new().expect("tokenizer");
    let mut loader = DocumentLoader::new();
    let rows = text_rows(&mut loader, reviews_dir.path(), suggestions_dir.path(), &tokenizer)
        .expect("text rows");
    assert_eq!(rows.len(), 20);

    let contrast = rows[3].dimensions[4];
    assert_eq!(contrast.review_tar, Some(0.8));
    assert_eq!(contrast.suggestion_tar, Some(1.0));
    let suggestion_ts = contrast.suggestion_ts.expect("suggestion TS");
    assert!((suggestion_ts - 1.0).abs() < 1e-12);
    assert_eq!(rows[3].dimensions[0], DimensionText::default());
}

#[test]
fn overview_rows_skip_images_without_score_reviews() {
    let reviews_dir = tempfile::tempdir().expect("tempdir");
    let suggestions_dir = tempfile::tempdir().expect("tempdir");
    write(
        reviews_dir.path(),
        &score_review_file_name(7, Dimension::Transformation),
        review_log(&[(1, 0.0, 0.0), (2, 2.0, 3.0), (3, 2.0, 5.0)]),
    );

    let mut loader = DocumentLoader::new();
    let rows = overview_rows(&mut loader, reviews_dir.path(), suggestions_dir.path(), 5.0)
        .expect("overview rows");
    assert_eq!(rows.len(), 1);

    let row = &rows[0];
    assert_eq!(row.image, 7);
    assert_eq!(row.metric("SD"), Some(0.6));
    assert_eq!(row.metric("SC"), Some(0.6));
    assert_eq!(row.metric("SV"), Some(0.8));
    assert_eq!(row.metric("TAR"), Some(0.8));
    assert!(row.metric("TS").expect("TS") > 0.0);
    assert_eq!(row.metric("unknown"), None);
}

#[test]
fn overview_rows_treat_empty_logs_as_absent() {
    let reviews_dir = tempfile::tempdir().expect("tempdir");
    let suggestions_dir = tempfile::tempdir().expect("tempdir");
    write(
        reviews_dir.path(),
        &score_review_file_name(5, Dimension::Transformation),
        json!([]),
    );

    let mut loader = DocumentLoader::new();
    let rows = overview_rows(&mut loader, reviews_dir.path(), suggestions_dir.path(), 5.0)
        .expect("overview rows");
    assert!(rows.is_empty());
}

#[test]
fn loader_counts_each_path_once() {
    let dir = tempfile::tempdir().expect("tempdir");
    let present = score_review_file_name(1, Dimension::Transformation);
    write(dir.path(), &present, review_log(&[(2, 2.0, 3.0)]));
    let missing = dir.path().join(score_review_file_name(2, Dimension::Transformation));

    let mut loader = DocumentLoader::new();
    for _ in 0..2 {
        let log = loader
            .load::<crate::model::RoundLog>(&dir.path().join(&present))
            .expect("load present");
        assert!(log.is_some());
        let log = loader
            .load::<crate::model::RoundLog>(&missing)
            .expect("load missing");
        assert!(log.is_none());
    }

    let counts = loader.into_counts();
    assert_eq!(counts.documents_loaded, 1);
    assert_eq!(counts.documents_missing, 1);
}
