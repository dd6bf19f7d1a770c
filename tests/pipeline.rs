use std::num::NonZeroUsize;

use fewshot_pipeline::{
    DEFAULT_TOP_K, DatasetBuilder, FileSource, ModelOutput, PipelineConfig, PipelineError,
    Prediction, Result, Sample, Sampler, Shuffler, split_sizes, top_k, top_k_classes,
};
use ndarray::{Array1, array};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn letters(class: &str, n: usize) -> Vec<Sample> {
    let base = match class {
        "a" => 0.0,
        _ => 100.0,
    };
    (0..n).map(|i| array![base + i as f32, 1.0, -1.0]).collect()
}

struct Logits(Vec<f32>);

impl ModelOutput for Logits {
    async fn data(&self) -> Result<Vec<f32>> {
        Ok(self.0.clone())
    }
}

#[test]
fn seven_and_two_split_into_six_and_three() {
    init_logger();

    let examples = vec![letters("a", 7), letters("b", 2)];
    let split = DatasetBuilder::new()
        .build(examples, 2, &mut Shuffler::seeded(2024))
        .unwrap();

    assert_eq!(split.train.len(), 6);
    assert_eq!(split.validation.len(), 3);
    assert_eq!(split.len(), 9);
}

#[test]
fn stratification_holds_for_every_class_size() {
    init_logger();

    for n in 0..40 {
        let examples = vec![letters("a", n), letters("b", 40 - n)];
        let split = DatasetBuilder::new()
            .build(examples, 2, &mut Shuffler::new(None))
            .unwrap();

        let val_a = split.validation.classes().filter(|&c| c == 0).count();
        let val_b = split.validation.classes().filter(|&c| c == 1).count();

        assert_eq!(val_a, split_sizes(n, 0.15).1);
        assert_eq!(val_b, split_sizes(40 - n, 0.15).1);
        assert_eq!(split.len(), 40);
    }
}

#[test]
fn rebuilding_with_the_same_seed_is_reproducible() {
    init_logger();

    let config = PipelineConfig::from_json(r#"{ "seed": 0 }"#).unwrap();
    let build = || {
        DatasetBuilder::from_config(&config)
            .build(
                vec![letters("a", 12), letters("b", 9)],
                2,
                &mut Shuffler::new(config.seed),
            )
            .unwrap()
    };

    assert_eq!(build(), build());
}

#[test]
fn train_batches_cover_the_train_set() {
    init_logger();

    let split = DatasetBuilder::new()
        .build(
            vec![letters("a", 20), letters("b", 20)],
            2,
            &mut Shuffler::seeded(5),
        )
        .unwrap();

    let batch_size = NonZeroUsize::new(8).unwrap();
    let mut seen = 0;
    for batch in split.train.batches(batch_size) {
        assert!(batch.len() <= 8);
        assert_eq!(batch.xs.ncols(), 3);
        assert_eq!(batch.ys.ncols(), 2);
        seen += batch.len();
    }

    assert_eq!(seen, split.train.len());

    let train_len = split.train.len();
    let (xs, ys) = split.train.into_arrays();
    assert_eq!(xs.dim(), (train_len, 3));
    assert_eq!(ys.dim(), (train_len, 2));
    assert!(ys.rows().into_iter().all(|row| row.sum() == 1.0));
}

#[tokio::test]
async fn corpora_flow_from_files_to_predictions() {
    init_logger();

    let dir = tempfile::tempdir().unwrap();
    let labels = ["positive", "negative"];
    let mut sampler = Sampler::new(NonZeroUsize::new(100).unwrap(), Shuffler::seeded(17));
    let mut examples = Vec::new();

    for (class, label) in labels.iter().enumerate() {
        let path = dir.path().join(format!("{label}.txt"));
        let corpus: Vec<String> = (0..250).map(|i| format!("{label} {i}")).collect();
        tokio::fs::write(&path, corpus.join("\n")).await.unwrap();

        let lines = sampler.sample_lines(&FileSource::new(&path)).await.unwrap();
        assert_eq!(lines.len(), 100);
        assert!(lines.iter().all(|l| l.starts_with(label)));

        let samples: Vec<Sample> = lines
            .iter()
            .map(|l| Array1::from_elem(4, l.len() as f32 + class as f32))
            .collect();
        examples.push(samples);
    }

    let split = DatasetBuilder::new()
        .build(examples, labels.len(), &mut Shuffler::seeded(17))
        .unwrap();

    assert_eq!(split.validation.len(), 2 * split_sizes(100, 0.15).1);
    assert_eq!(split.len(), 200);

    let output = Logits(vec![0.25, 0.75]);
    let predictions = top_k_classes(&labels, &output, DEFAULT_TOP_K).await.unwrap();

    assert_eq!(
        predictions,
        [
            Prediction {
                class_name: "negative".into(),
                probability: 0.75
            },
            Prediction {
                class_name: "positive".into(),
                probability: 0.25
            },
        ]
    );
}

#[tokio::test]
async fn unreadable_corpus_stops_the_pipeline() {
    init_logger();

    let mut sampler = Sampler::default();
    let err = sampler
        .sample_lines(&FileSource::new("/definitely/not/a/corpus.txt"))
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::SourceUnavailable { .. }));
}

#[test]
fn mismatched_labels_surface_as_errors() {
    let err = top_k(&["only"], &[0.1, 0.9], 1).unwrap_err();
    assert!(matches!(err, PipelineError::LabelIndexOutOfRange { .. }));
}
