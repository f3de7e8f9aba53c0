//! Background dataset for the local explainer
//!
//! The explainer learns feature distributions (quartiles, bin frequencies)
//! from this dataset. Rows are in SCALED model space.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::logic::error::ExplainError;
use crate::logic::features::{build, FeatureDomain, FeatureSchema, ModelLayout, NormalizedProfile};
use crate::logic::model::StandardScaler;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundSource {
    /// Profiles sampled from each field's declared domain
    #[default]
    Schema,
    /// Standard normal noise in scaled space
    Noise,
    /// Rows from `background.json` (raw model-column space)
    File,
}

impl BackgroundSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackgroundSource::Schema => "schema",
            BackgroundSource::Noise => "noise",
            BackgroundSource::File => "file",
        }
    }
}

impl fmt::Display for BackgroundSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown background source: {0} (expected schema, noise or file)")]
pub struct UnknownBackgroundSource(pub String);

impl FromStr for BackgroundSource {
    type Err = UnknownBackgroundSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "schema" => Ok(BackgroundSource::Schema),
            "noise" => Ok(BackgroundSource::Noise),
            "file" => Ok(BackgroundSource::File),
            other => Err(UnknownBackgroundSource(other.to_string())),
        }
    }
}

// ============================================================================
// SAMPLING
// ============================================================================

/// Box-Muller standard normal draw
pub(crate) fn standard_normal(rng: &mut impl Rng) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    let r = (-2.0 * u1.ln()).sqrt();
    let theta = 2.0 * std::f64::consts::PI * u2;
    r * theta.cos()
}

/// One profile with every field drawn uniformly from its domain
fn sample_profile(schema: &FeatureSchema, rng: &mut StdRng) -> NormalizedProfile {
    let mut profile = NormalizedProfile::new();
    for definition in schema.definitions() {
        let value = match &definition.domain {
            FeatureDomain::Range { min, max, .. } => rng.gen_range(*min..=*max).round(),
            FeatureDomain::Labels(options) => options[rng.gen_range(0..options.len())].1 as f64,
        };
        profile.insert(definition.key, value);
    }
    profile
}

/// Schema-sampled background, built and scaled like a real request
pub fn from_schema(
    samples: usize,
    seed: u64,
    layout: &ModelLayout,
    scaler: &StandardScaler,
) -> Result<Vec<Vec<f64>>, ExplainError> {
    let schema = FeatureSchema::global();
    let mut rng = StdRng::seed_from_u64(seed);

    (0..samples)
        .map(|_| {
            let vector = build(&sample_profile(schema, &mut rng), layout);
            scaler.transform(vector.as_slice()).map_err(ExplainError::from)
        })
        .collect()
}

/// `samples × dim` standard normal rows
pub fn from_noise(samples: usize, dim: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..samples)
        .map(|_| (0..dim).map(|_| standard_normal(&mut rng)).collect())
        .collect()
}

/// Rows loaded from an artifact; rows of the wrong width are skipped
pub fn from_rows(rows: &[Vec<f64>], scaler: &StandardScaler) -> Result<Vec<Vec<f64>>, ExplainError> {
    let mut scaled = Vec::with_capacity(rows.len());
    let mut skipped = 0usize;
    for row in rows {
        match scaler.transform(row) {
            Ok(values) => scaled.push(values),
            Err(_) => skipped += 1,
        }
    }
    if skipped > 0 {
        log::warn!("Skipped {} background rows with wrong width (expected {})", skipped, scaler.dim());
    }
    if scaled.is_empty() {
        return Err(ExplainError::EmptyBackground);
    }
    Ok(scaled)
}

/// Build the background dataset for the configured source
pub fn generate(
    source: BackgroundSource,
    samples: usize,
    seed: u64,
    layout: &ModelLayout,
    scaler: &StandardScaler,
    file_rows: Option<&[Vec<f64>]>,
) -> Result<Vec<Vec<f64>>, ExplainError> {
    if samples == 0 {
        return Err(ExplainError::EmptyBackground);
    }

    match (source, file_rows) {
        (BackgroundSource::Schema, _) => from_schema(samples, seed, layout, scaler),
        (BackgroundSource::Noise, _) => Ok(from_noise(samples, layout.len(), seed)),
        (BackgroundSource::File, Some(rows)) => from_rows(rows, scaler),
        (BackgroundSource::File, None) => {
            log::warn!("Background source 'file' selected but no background rows loaded, sampling from schema");
            from_schema(samples, seed, layout, scaler)
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source() {
        assert_eq!("Schema".parse::<BackgroundSource>(), Ok(BackgroundSource::Schema));
        assert_eq!("noise".parse::<BackgroundSource>(), Ok(BackgroundSource::Noise));
        assert!("gaussian".parse::<BackgroundSource>().is_err());
        assert_eq!(BackgroundSource::default(), BackgroundSource::Schema);
    }

    #[test]
    fn test_schema_background_is_seeded() {
        let layout = ModelLayout::default_layout();
        let scaler = StandardScaler::identity(layout.len());
        let a = from_schema(20, 42, &layout, &scaler).unwrap();
        let b = from_schema(20, 42, &layout, &scaler).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 20);
        assert!(a.iter().all(|row| row.len() == layout.len()));
    }

    #[test]
    fn test_schema_background_respects_domains() {
        let layout = ModelLayout::default_layout();
        let scaler = StandardScaler::identity(layout.len());
        let rows = from_schema(50, 7, &layout, &scaler).unwrap();
        let age = layout.index_of("Age").unwrap();
        let overtime = layout.index_of("OverTime_Yes").unwrap();
        for row in &rows {
            assert!(row[age] >= 18.0 && row[age] <= 65.0);
            assert!(row[overtime] == 0.0 || row[overtime] == 1.0);
        }
    }

    #[test]
    fn test_noise_background_shape() {
        let rows = from_noise(100, 19, 42);
        assert_eq!(rows.len(), 100);
        let mean: f64 = rows.iter().flatten().sum::<f64>() / 1900.0;
        assert!(mean.abs() < 0.2);
    }

    #[test]
    fn test_rows_with_wrong_width_are_skipped() {
        let scaler = StandardScaler::identity(2);
        let rows = vec![vec![1.0, 2.0], vec![1.0], vec![3.0, 4.0]];
        assert_eq!(from_rows(&rows, &scaler).unwrap().len(), 2);
        assert!(from_rows(&[vec![1.0]], &scaler).is_err());
    }

    #[test]
    fn test_zero_samples_is_error() {
        let layout = ModelLayout::default_layout();
        let scaler = StandardScaler::identity(layout.len());
        assert!(generate(BackgroundSource::Noise, 0, 42, &layout, &scaler, None).is_err());
    }
}
