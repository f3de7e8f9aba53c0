//! Input Normalizer - display labels -> model codes
//!
//! Pure function over the raw profile and the immutable schema.
//! Unknown labels fail closed to code 0. No range validation here,
//! clamping to the declared min/max belongs to the form layer.

use super::profile::{EmployeeProfile, NormalizedProfile, RawValue};
use super::schema::{FeatureDefinition, FeatureSchema};

/// Code used for labels outside the domain
pub const UNKNOWN_LABEL_CODE: f64 = 0.0;

/// Normalize against the process-wide schema
pub fn normalize(profile: &EmployeeProfile) -> NormalizedProfile {
    normalize_with(FeatureSchema::global(), profile)
}

/// Normalize against an explicit schema
pub fn normalize_with(schema: &FeatureSchema, profile: &EmployeeProfile) -> NormalizedProfile {
    let mut normalized = NormalizedProfile::new();

    for key in schema.all_keys() {
        let Some(raw) = profile.get(key.as_str()) else {
            continue;
        };
        let definition = schema.describe(key);
        normalized.insert(key, resolve(definition, raw));
    }

    normalized
}

fn resolve(definition: &FeatureDefinition, raw: &RawValue) -> f64 {
    match raw {
        RawValue::Label(label) if definition.kind.is_categorical() => {
            match definition.code_for(label) {
                Some(code) => code as f64,
                None => {
                    log::debug!(
                        "Unknown label '{}' for {}, using code {}",
                        label, definition.key, UNKNOWN_LABEL_CODE
                    );
                    UNKNOWN_LABEL_CODE
                }
            }
        }
        // Numeric text in a numeric field (e.g. from a query string)
        RawValue::Label(text) => text.trim().parse::<f64>().unwrap_or_else(|_| {
            log::debug!("Non-numeric value '{}' for {}, using 0", text, definition.key);
            UNKNOWN_LABEL_CODE
        }),
        // Already a code / number: pass through
        RawValue::Number(value) => *value,
    }
}

// ============================================================================
// TESTS
// ============================================================================
