use std::{env, io, num::NonZeroUsize};

use fewshot_pipeline::{
    DatasetBuilder, LabeledDataset, PipelineConfig, Sample, Sampler, Shuffler, rank_classes,
    softmax, source_for,
};
use log::{info, warn};
use ndarray::{Array1, Array2, ArrayView1};

/// Number of features the demo derives from a line of text.
const FEATURES: usize = 4;

const BATCH_SIZE: NonZeroUsize = NonZeroUsize::new(16).unwrap();

/// Stand-in for an embedding model: character class ratios plus a length hint.
fn featurize(line: &str) -> Sample {
    let total = line.chars().count().max(1) as f32;
    let ratio = |pred: fn(&char) -> bool| line.chars().filter(pred).count() as f32 / total;

    Array1::from_vec(vec![
        ratio(char::is_ascii_alphabetic),
        ratio(char::is_ascii_digit),
        ratio(char::is_ascii_whitespace),
        (total / 100.0).min(1.0),
    ])
}

/// Negative squared distance from `x` to every class centroid of `train`.
fn centroid_logits(train: &LabeledDataset, x: ArrayView1<'_, f32>) -> Array1<f32> {
    let mut sums = Array2::<f32>::zeros((train.num_classes(), train.num_features()));
    let mut counts = vec![0usize; train.num_classes()];

    for ((row, _), class) in train.iter().zip(train.classes()) {
        let Some(count) = counts.get_mut(class) else {
            continue;
        };
        *count += 1;
        let mut sum = sums.row_mut(class);
        sum += &row;
    }

    sums.outer_iter()
        .zip(counts)
        .map(|(sum, n)| match n {
            0 => f32::NEG_INFINITY,
            n => -(&sum / n as f32 - &x).mapv(|v| v * v).sum(),
        })
        .collect()
}

#[tokio::main]
async fn main() -> io::Result<()> {
    env_logger::init();

    let config = match env::var("CONFIG") {
        Ok(path) => PipelineConfig::load(&path)?,
        Err(_) => PipelineConfig::default(),
    };

    let sources: Vec<String> = env::args().skip(1).collect();
    if sources.is_empty() {
        eprintln!("Usage: fewshot <corpus> [corpus...]   (one corpus per class)");
        return Ok(());
    }

    let mut sampler = Sampler::from_config(&config);
    let mut examples = Vec::with_capacity(sources.len());

    for id in &sources {
        let lines = sampler.sample_lines(&source_for(id)).await?;
        info!("class {}: {} candidate line(s) from {id}", examples.len(), lines.len());

        let samples: Vec<Sample> = lines
            .iter()
            .filter(|l| !l.trim().is_empty())
            .map(|l| featurize(l))
            .collect();

        if samples.is_empty() {
            warn!("{id} produced no usable lines");
        }
        examples.push(samples);
    }

    let num_classes = examples.len();
    let split = DatasetBuilder::from_config(&config).build(
        examples,
        num_classes,
        &mut Shuffler::new(config.seed),
    )?;

    info!(
        "{} training and {} validation example(s), {FEATURES} feature(s) each",
        split.train.len(),
        split.validation.len()
    );
    info!(
        "{} training batch(es) of up to {BATCH_SIZE}",
        split.train.batches(BATCH_SIZE).count()
    );

    if let Some((x, _)) = split.validation.get(0) {
        let probabilities = softmax(centroid_logits(&split.train, x).view()).to_vec();
        for prediction in rank_classes(&config, &sources, &probabilities).await? {
            info!(
                "first validation example: {} ({:.3})",
                prediction.class_name, prediction.probability
            );
        }
    }

    Ok(())
}
