//! Local surrogate explainer (LIME-style, tabular)
//!
//! For one instance:
//! 1. discretize every feature into background quartile bins
//! 2. draw perturbations bin-wise from background bin frequencies
//! 3. represent each perturbation as "same bin as the instance" (0/1)
//! 4. weight perturbations by an exponential kernel on their distance
//! 5. fit a weighted ridge surrogate on P(leave) and report its weights
//!
//! Sampling uses a fixed seed, so the same instance always gets the
//! same explanation.

use ndarray::{Array2, ArrayView1, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::background::standard_normal;
use crate::logic::error::ExplainError;
use crate::logic::model::Classifier;

/// Regularization of the feature-selection fit
const SELECTION_ALPHA: f64 = 0.01;
/// Regularization of the final surrogate
const SURROGATE_ALPHA: f64 = 1.0;
const PIVOT_EPSILON: f64 = 1e-12;

// ============================================================================
// CONFIG
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    #[default]
    Euclidean,
    Manhattan,
    Cosine,
}

impl DistanceMetric {
    pub fn distance(&self, a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
        match self {
            DistanceMetric::Euclidean => a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| (x - y).powi(2))
                .sum::<f64>()
                .sqrt(),
            DistanceMetric::Manhattan => a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum(),
            DistanceMetric::Cosine => {
                let norm_a = a.dot(&a).sqrt();
                let norm_b = b.dot(&b).sqrt();
                if norm_a == 0.0 || norm_b == 0.0 {
                    return 1.0;
                }
                1.0 - a.dot(&b) / (norm_a * norm_b)
            }
        }
    }
}

/// Explainer settings (`explainer_config.json`, every field optional)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplainerConfig {
    pub num_features: usize,
    pub num_samples: usize,
    pub distance_metric: DistanceMetric,
    /// Kernel width; `0.75 * sqrt(num_columns)` when unset
    pub kernel_width: Option<f64>,
}

impl Default for ExplainerConfig {
    fn default() -> Self {
        Self {
            num_features: 10,
            num_samples: 1000,
            distance_metric: DistanceMetric::Euclidean,
            kernel_width: None,
        }
    }
}

// ============================================================================
// OUTPUT
// ============================================================================

/// Surrogate fit for one instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurrogateFit {
    /// `(descriptor, weight)` ordered by descending |weight|
    pub pairs: Vec<(String, f64)>,
    pub intercept: f64,
    /// Surrogate prediction at the instance
    pub local_prediction: f64,
    /// Weighted R² of the surrogate on the perturbations
    pub score: f64,
}

pub trait LocalExplainer: Send + Sync {
    fn explain_instance(
        &self,
        instance: &[f64],
        classifier: &dyn Classifier,
        num_features: usize,
    ) -> Result<SurrogateFit, ExplainError>;
}

// ============================================================================
// QUARTILE DISCRETIZER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
struct BinStats {
    mean: f64,
    std: f64,
    min: f64,
    max: f64,
}

#[derive(Debug, Clone)]
pub struct QuartileDiscretizer {
    names: Vec<String>,
    /// Sorted, de-duplicated quartile boundaries per feature
    boundaries: Vec<Vec<f64>>,
    /// Background bin frequencies per feature (sum to 1)
    frequencies: Vec<Vec<f64>>,
    stats: Vec<Vec<Option<BinStats>>>,
}

/// Linear-interpolated percentile of sorted data
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

fn bin_stats(values: &[f64]) -> Option<BinStats> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some(BinStats {
        mean,
        std: variance.sqrt(),
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    })
}

impl QuartileDiscretizer {
    pub fn fit(background: &[Vec<f64>], names: Vec<String>) -> Result<Self, ExplainError> {
        if background.is_empty() {
            return Err(ExplainError::EmptyBackground);
        }
        let dim = names.len();
        if let Some(row) = background.iter().find(|r| r.len() != dim) {
            return Err(ExplainError::DimensionMismatch { expected: dim, actual: row.len() });
        }

        let mut boundaries = Vec::with_capacity(dim);
        let mut frequencies = Vec::with_capacity(dim);
        let mut stats = Vec::with_capacity(dim);

        for j in 0..dim {
            let mut column: Vec<f64> = background.iter().map(|r| r[j]).collect();
            column.sort_by(|a, b| a.total_cmp(b));

            let mut bounds: Vec<f64> = [0.25, 0.5, 0.75].iter().map(|q| percentile(&column, *q)).collect();
            bounds.dedup();

            let bins = bounds.len() + 1;
            let mut members: Vec<Vec<f64>> = vec![Vec::new(); bins];
            for value in &column {
                members[Self::bin_of(&bounds, *value)].push(*value);
            }

            let total = column.len() as f64;
            frequencies.push(members.iter().map(|m| m.len() as f64 / total).collect());
            stats.push(members.iter().map(|m| bin_stats(m)).collect());
            boundaries.push(bounds);
        }

        Ok(Self { names, boundaries, frequencies, stats })
    }

    /// Number of boundaries strictly below the value
    fn bin_of(bounds: &[f64], value: f64) -> usize {
        bounds.iter().filter(|b| **b < value).count()
    }

    pub fn dim(&self) -> usize {
        self.names.len()
    }

    pub fn discretize(&self, feature: usize, value: f64) -> usize {
        Self::bin_of(&self.boundaries[feature], value)
    }

    /// Quartile-form descriptor for a feature bin
    pub fn descriptor(&self, feature: usize, bin: usize) -> String {
        let name = &self.names[feature];
        let bounds = &self.boundaries[feature];
        let last = bounds.len();
        if bin == 0 {
            format!("{} <= {:.2}", name, bounds[0])
        } else if bin >= last {
            format!("{} > {:.2}", name, bounds[last - 1])
        } else {
            format!("{:.2} < {} <= {:.2}", bounds[bin - 1], name, bounds[bin])
        }
    }

    fn sample_bin(&self, feature: usize, rng: &mut StdRng) -> usize {
        let frequencies = &self.frequencies[feature];
        let draw: f64 = rng.gen_range(0.0..1.0);
        let mut cumulative = 0.0;
        for (bin, freq) in frequencies.iter().enumerate() {
            cumulative += freq;
            if draw < cumulative {
                return bin;
            }
        }
        frequencies.iter().rposition(|f| *f > 0.0).unwrap_or(0)
    }

    /// Continuous value inside a bin: normal around the bin mean, clipped to the bin range
    fn undiscretize(&self, feature: usize, bin: usize, rng: &mut StdRng) -> f64 {
        match self.stats[feature][bin] {
            Some(s) if s.std > 0.0 => (s.mean + s.std * standard_normal(rng)).clamp(s.min, s.max),
            Some(s) => s.mean,
            None => {
                let bounds = &self.boundaries[feature];
                bounds[bin.min(bounds.len() - 1)]
            }
        }
    }
}

// ============================================================================
// WEIGHTED RIDGE
// ============================================================================

/// Solve `A x = b` by Gaussian elimination with partial pivoting
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>, ExplainError> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n)
            .max_by(|i, j| a[*i][col].abs().total_cmp(&a[*j][col].abs()))
            .unwrap_or(col);
        if a[pivot][col].abs() < PIVOT_EPSILON {
            return Err(ExplainError::Numerical("singular system".to_string()));
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = ((row + 1)..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Ok(x)
}

/// Ridge regression with sample weights and an unpenalized intercept
pub(crate) fn weighted_ridge(
    x: &Array2<f64>,
    y: &[f64],
    weights: &[f64],
    alpha: f64,
) -> Result<(Vec<f64>, f64), ExplainError> {
    let (n, p) = x.dim();
    let total: f64 = weights.iter().sum();
    if n == 0 || total <= 0.0 {
        return Err(ExplainError::Numerical("no weighted samples".to_string()));
    }

    let x_mean: Vec<f64> = (0..p)
        .map(|j| (0..n).map(|i| weights[i] * x[[i, j]]).sum::<f64>() / total)
        .collect();
    let y_mean = (0..n).map(|i| weights[i] * y[i]).sum::<f64>() / total;

    let mut a = vec![vec![0.0; p]; p];
    let mut b = vec![0.0; p];
    for i in 0..n {
        let w = weights[i];
        let dy = y[i] - y_mean;
        for j in 0..p {
            let dj = x[[i, j]] - x_mean[j];
            b[j] += w * dj * dy;
            for k in j..p {
                a[j][k] += w * dj * (x[[i, k]] - x_mean[k]);
            }
        }
    }
    for j in 0..p {
        a[j][j] += alpha;
        for k in 0..j {
            a[j][k] = a[k][j];
        }
    }

    let coef = solve(a, b)?;
    let intercept = y_mean - x_mean.iter().zip(coef.iter()).map(|(m, c)| m * c).sum::<f64>();
    Ok((coef, intercept))
}

fn weighted_r2(predicted: &[f64], y: &[f64], weights: &[f64]) -> f64 {
    let total: f64 = weights.iter().sum();
    let y_mean = y.iter().zip(weights).map(|(v, w)| v * w).sum::<f64>() / total;
    let residual: f64 = predicted.iter().zip(y).zip(weights).map(|((p, v), w)| w * (v - p).powi(2)).sum();
    let spread: f64 = y.iter().zip(weights).map(|(v, w)| w * (v - y_mean).powi(2)).sum();
    if spread == 0.0 {
        if residual == 0.0 { 1.0 } else { 0.0 }
    } else {
        1.0 - residual / spread
    }
}

// ============================================================================
// EXPLAINER
// ============================================================================

pub struct LimeTabularExplainer {
    discretizer: QuartileDiscretizer,
    config: ExplainerConfig,
    seed: u64,
}

impl LimeTabularExplainer {
    /// Fit the discretizer on a (scaled) background dataset
    pub fn new(
        background: &[Vec<f64>],
        feature_names: Vec<String>,
        config: ExplainerConfig,
        seed: u64,
    ) -> Result<Self, ExplainError> {
        let discretizer = QuartileDiscretizer::fit(background, feature_names)?;
        log::debug!(
            "Explainer fitted on {} background rows x {} features",
            background.len(),
            discretizer.dim()
        );
        Ok(Self { discretizer, config, seed })
    }

    pub fn config(&self) -> &ExplainerConfig {
        &self.config
    }

    pub fn discretizer(&self) -> &QuartileDiscretizer {
        &self.discretizer
    }

    fn kernel_width(&self) -> f64 {
        self.config
            .kernel_width
            .unwrap_or_else(|| 0.75 * (self.discretizer.dim() as f64).sqrt())
    }

    /// Binary representation + continuous perturbations (row 0 is the instance)
    fn perturb(&self, instance: &[f64], instance_bins: &[usize]) -> (Array2<f64>, Array2<f64>) {
        let dim = instance.len();
        let n = self.config.num_samples.max(1);
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut binary = Array2::<f64>::ones((n, dim));
        let mut inverse = Array2::<f64>::zeros((n, dim));
        for (j, value) in instance.iter().enumerate() {
            inverse[[0, j]] = *value;
        }

        for i in 1..n {
            for j in 0..dim {
                let bin = self.discretizer.sample_bin(j, &mut rng);
                inverse[[i, j]] = self.discretizer.undiscretize(j, bin, &mut rng);
                binary[[i, j]] = if bin == instance_bins[j] { 1.0 } else { 0.0 };
            }
        }
        (binary, inverse)
    }
}

impl LocalExplainer for LimeTabularExplainer {
    fn explain_instance(
        &self,
        instance: &[f64],
        classifier: &dyn Classifier,
        num_features: usize,
    ) -> Result<SurrogateFit, ExplainError> {
        let dim = self.discretizer.dim();
        if instance.len() != dim {
            return Err(ExplainError::DimensionMismatch { expected: dim, actual: instance.len() });
        }

        let instance_bins: Vec<usize> = instance
            .iter()
            .enumerate()
            .map(|(j, v)| self.discretizer.discretize(j, *v))
            .collect();

        let (binary, inverse) = self.perturb(instance, &instance_bins);

        // Black box on the perturbations, explain P(leave)
        let labels: Vec<f64> = classifier.predict_proba(inverse.view())?.iter().map(|p| p[1]).collect();
        if labels.len() != binary.nrows() {
            return Err(ExplainError::Numerical(format!(
                "classifier returned {} rows for {} samples",
                labels.len(),
                binary.nrows()
            )));
        }

        let origin = binary.row(0);
        let width = self.kernel_width();
        let weights: Vec<f64> = binary
            .rows()
            .into_iter()
            .map(|row| {
                let d = self.config.distance_metric.distance(row, origin);
                (-(d * d) / (width * width)).exp().sqrt()
            })
            .collect();

        // Feature selection: highest weights of a lightly regularized fit
        let (all_coef, _) = weighted_ridge(&binary, &labels, &weights, SELECTION_ALPHA)?;
        let mut ranked: Vec<usize> = (0..dim).collect();
        ranked.sort_by(|a, b| {
            (all_coef[*b] * origin[*b]).abs().total_cmp(&(all_coef[*a] * origin[*a]).abs())
        });
        ranked.truncate(num_features.min(dim));

        // Final surrogate on the selected features
        let selected = binary.select(Axis(1), &ranked);
        let (coef, intercept) = weighted_ridge(&selected, &labels, &weights, SURROGATE_ALPHA)?;

        let predicted: Vec<f64> = selected
            .rows()
            .into_iter()
            .map(|row| intercept + row.iter().zip(coef.iter()).map(|(x, c)| x * c).sum::<f64>())
            .collect();
        let score = weighted_r2(&predicted, &labels, &weights);
        let local_prediction = predicted[0];

        let mut pairs: Vec<(String, f64)> = ranked
            .iter()
            .zip(coef.iter())
            .map(|(j, w)| (self.discretizer.descriptor(*j, instance_bins[*j]), *w))
            .collect();
        pairs.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));

        Ok(SurrogateFit { pairs, intercept, local_prediction, score })
    }
}

// ============================================================================
// TESTS
// ============================================================================
