use std::cmp::Ordering;

use ndarray::{Array1, ArrayView1};

use crate::{
    config::PipelineConfig,
    error::{PipelineError, Result},
};

/// How many predictions are returned when the caller doesn't say otherwise.
pub const DEFAULT_TOP_K: usize = 3;

/// A class name paired with the score the model gave it.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub class_name: String,
    pub probability: f32,
}

/// Raw per-class scores produced by an external model, read asynchronously.
#[allow(unused)]
#[trait_variant::make(ModelOutput: Send)]
pub trait LocalModelOutput {
    /// Reads the scores, one per class, in class order.
    async fn data(&self) -> Result<Vec<f32>>;
}

impl ModelOutput for Vec<f32> {
    async fn data(&self) -> Result<Vec<f32>> {
        Ok(self.clone())
    }
}

/// Orders scores from highest to lowest, NaN last.
fn descending(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.total_cmp(&a),
    }
}

/// Returns the `k` highest scores paired with their class names, highest first.
///
/// Equal scores keep their class order. The output has `min(k, scores.len())` entries.
///
/// # Arguments
/// * `labels` - The class names, indexed by class.
/// * `scores` - One score per class.
/// * `k` - The maximum number of predictions to return.
///
/// # Errors
/// `LabelIndexOutOfRange` if a selected score has no matching label.
pub fn top_k<S: AsRef<str>>(labels: &[S], scores: &[f32], k: usize) -> Result<Vec<Prediction>> {
    let mut ranked: Vec<(usize, f32)> = scores.iter().copied().enumerate().collect();
    // `sort_by` is stable, ties stay in index order.
    ranked.sort_by(|a, b| descending(a.1, b.1));

    ranked
        .into_iter()
        .take(k)
        .map(|(index, probability)| {
            let class_name = labels
                .get(index)
                .ok_or(PipelineError::LabelIndexOutOfRange {
                    index,
                    labels: labels.len(),
                })?
                .as_ref()
                .to_string();

            Ok(Prediction {
                class_name,
                probability,
            })
        })
        .collect()
}

/// Reads `output` and returns its top `k` predictions, see [`top_k`].
pub async fn top_k_classes<S, O>(labels: &[S], output: &O, k: usize) -> Result<Vec<Prediction>>
where
    S: AsRef<str>,
    O: ModelOutput,
{
    let scores = output.data().await?;
    top_k(labels, &scores, k)
}

/// Reads `output` and keeps as many predictions as `config.top_k`.
pub async fn rank_classes<S, O>(
    config: &PipelineConfig,
    labels: &[S],
    output: &O,
) -> Result<Vec<Prediction>>
where
    S: AsRef<str>,
    O: ModelOutput,
{
    top_k_classes(labels, output, config.top_k).await
}

/// Turns raw logits into probabilities that sum to one.
pub fn softmax(logits: ArrayView1<'_, f32>) -> Array1<f32> {
    let max = logits.fold(f32::NEG_INFINITY, |m, &v| m.max(v));
    let exp = logits.mapv(|v| (v - max).exp());
    let sum = exp.sum();
    exp / sum
}

/// Applies [`softmax`] to `logits` and returns the top `k` probabilities.
pub fn top_k_from_logits<S: AsRef<str>>(
    labels: &[S],
    logits: ArrayView1<'_, f32>,
    k: usize,
) -> Result<Vec<Prediction>> {
    let probabilities = softmax(logits);
    top_k(labels, &probabilities.to_vec(), k)
}
