/// Integration tests for the file-based pipeline
///
/// These tests drive the stages end to end over temporary directories:
/// - Preprocessing with a label encoding fitted on train and reused on test
/// - TF-IDF features with matching column sets across splits
/// - Training and model persistence
/// - Evaluation metrics on separable data
mod common;

use common::{corpus, params, write_split};
use std::path::Path;
use textclf_pipeline::dataset::{Dataset, LabelEncoding};
use textclf_pipeline::features::{FeatureSet, Vocabulary};
use textclf_pipeline::ml::{load_metrics, load_model};
use textclf_pipeline::pipeline::Artifact;
use textclf_pipeline::{Pipeline, PipelineError, Stage, StageContext};

fn setup(root: &Path, n_estimator: usize, random_state: u64) -> StageContext {
    let ctx = StageContext::new(params(root, n_estimator, random_state));

    let mut train = corpus(0..20);
    // an exact duplicate row that preprocessing must drop
    train.push(train[0].clone());
    write_split(&ctx.path(Artifact::RawTrain), &train);
    write_split(&ctx.path(Artifact::RawTest), &corpus(20..30));

    ctx
}

#[test]
fn test_full_pipeline_on_separable_data() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = setup(dir.path(), 10, 2);

    Pipeline::full().unwrap().run(&ctx).unwrap();

    let interim = Dataset::read_csv(ctx.path(Artifact::InterimTrain)).unwrap();
    assert_eq!(interim.len(), 40);

    let encoding = LabelEncoding::load(ctx.path(Artifact::LabelEncoding)).unwrap();
    assert_eq!(encoding.encode("ham"), Some(0));
    assert_eq!(encoding.encode("spam"), Some(1));

    let train = FeatureSet::read_csv(ctx.path(Artifact::ProcessedTrain)).unwrap();
    let test = FeatureSet::read_csv(ctx.path(Artifact::ProcessedTest)).unwrap();
    assert_eq!(train.n_features(), 16);
    assert_eq!(test.n_features(), train.n_features());
    assert_eq!(test.len(), 20);

    let vocabulary = Vocabulary::load(ctx.path(Artifact::Vocabulary)).unwrap();
    assert_eq!(vocabulary.n_features(), 16);
    assert!(vocabulary.index_of("prize").is_some());
    assert!(vocabulary.index_of("meet").is_some());

    let metrics = load_metrics(ctx.path(Artifact::Metrics)).unwrap();
    assert_eq!(metrics.accuracy, 1.0);
    assert_eq!(metrics.precision, 1.0);
    assert_eq!(metrics.recall, 1.0);
    assert_eq!(metrics.auc, 1.0);

    let raw = std::fs::read_to_string(ctx.path(Artifact::Metrics)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value.as_object().unwrap().len(), 4);
}

#[test]
fn test_single_stages_match_full_run() {
    let staged = tempfile::tempdir().unwrap();
    let ctx = setup(staged.path(), 5, 9);
    for stage in Stage::ALL {
        Pipeline::single(stage).run(&ctx).unwrap();
    }

    let full = tempfile::tempdir().unwrap();
    let full_ctx = setup(full.path(), 5, 9);
    Pipeline::full().unwrap().run(&full_ctx).unwrap();

    assert_eq!(
        FeatureSet::read_csv(ctx.path(Artifact::ProcessedTest)).unwrap(),
        FeatureSet::read_csv(full_ctx.path(Artifact::ProcessedTest)).unwrap()
    );
    assert_eq!(
        load_metrics(ctx.path(Artifact::Metrics)).unwrap(),
        load_metrics(full_ctx.path(Artifact::Metrics)).unwrap()
    );
}

#[test]
fn test_same_seed_gives_same_model() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    let a = setup(first.path(), 8, 42);
    let b = setup(second.path(), 8, 42);
    Pipeline::full().unwrap().run(&a).unwrap();
    Pipeline::full().unwrap().run(&b).unwrap();

    let test = FeatureSet::read_csv(a.path(Artifact::ProcessedTest)).unwrap();
    let model_a = load_model(a.path(Artifact::Model)).unwrap();
    let model_b = load_model(b.path(Artifact::Model)).unwrap();

    assert_eq!(
        model_a.predict_proba(&test.features).unwrap(),
        model_b.predict_proba(&test.features).unwrap()
    );
    assert_eq!(model_a.metadata.hyperparameters, model_b.metadata.hyperparameters);
}

#[test]
fn test_unseen_test_label_stops_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = setup(dir.path(), 5, 2);

    let mut test = corpus(20..22);
    test.push(("Verify your account".to_string(), "phishing".to_string()));
    write_split(&ctx.path(Artifact::RawTest), &test);

    let err = Pipeline::full().unwrap().run(&ctx).unwrap_err();
    match err {
        PipelineError::UnseenLabel { value, row } => {
            assert_eq!(value, "phishing");
            assert_eq!(row, 4);
        }
        other => panic!("expected unseen label, got {:?}", other),
    }

    assert!(!ctx.path(Artifact::InterimTrain).exists());
    assert!(!ctx.path(Artifact::Metrics).exists());
}

#[test]
fn test_missing_text_column_is_schema_error() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = setup(dir.path(), 5, 2);

    Dataset::from_records(&["body", "target"], &[&["hello", "ham"]])
        .unwrap()
        .write_csv(ctx.path(Artifact::RawTrain))
        .unwrap();

    let err = Pipeline::single(Stage::Preprocess).run(&ctx).unwrap_err();
    assert!(matches!(err, PipelineError::Schema { ref column } if column == "text"));
}

#[test]
fn test_evaluation_without_model_fails() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = setup(dir.path(), 5, 2);

    let err = Pipeline::single(Stage::Evaluation).run(&ctx).unwrap_err();
    assert_eq!(err.error_code(), "IO_ERROR");
    assert!(err.to_string().contains("model.bin"));
}
