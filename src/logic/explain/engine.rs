//! Explanation Service - cached local explanations
//!
//! Cache key is the normalized profile's stable serialization. The cache
//! stores the explainer's raw pairs; display labels are applied on the way out.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::labels::{base_feature, business_label, InsightCategory};
use super::lime::LocalExplainer;
use super::types::{CachedExplanation, Direction, Explanation, FeatureContribution, Strength};
use crate::logic::features::NormalizedProfile;
use crate::logic::model::Classifier;

// ============================================================================
// CACHE
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStatus {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Bounded LRU cache shared by every request
pub struct ExplanationCache {
    entries: Mutex<LruCache<String, CachedExplanation>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ExplanationCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn get(&self, key: &str) -> Option<CachedExplanation> {
        let found = self.entries.lock().get(key).cloned();
        let counter = if found.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    pub fn put(&self, key: String, value: CachedExplanation) {
        self.entries.lock().put(key, value);
    }

    /// Load pre-computed entries, up to capacity. Returns how many were kept.
    pub fn seed(&self, entries: impl IntoIterator<Item = (String, CachedExplanation)>) -> usize {
        let mut cache = self.entries.lock();
        let capacity = cache.cap().get();
        let mut loaded = 0;
        for (key, value) in entries.into_iter().take(capacity) {
            cache.put(key, value);
            loaded += 1;
        }
        loaded
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn status(&self) -> CacheStatus {
        let cache = self.entries.lock();
        CacheStatus {
            entries: cache.len(),
            capacity: cache.cap().get(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

// ============================================================================
// SERVICE
// ============================================================================

pub struct ExplanationService {
    explainer: Option<Box<dyn LocalExplainer>>,
    cache: Arc<ExplanationCache>,
    num_features: usize,
    unavailable_reason: String,
}

impl ExplanationService {
    pub fn new(explainer: Box<dyn LocalExplainer>, cache: Arc<ExplanationCache>, num_features: usize) -> Self {
        Self {
            explainer: Some(explainer),
            cache,
            num_features,
            unavailable_reason: String::new(),
        }
    }

    /// Service without an explainer; cached entries are still served
    pub fn disabled(reason: impl Into<String>, cache: Arc<ExplanationCache>) -> Self {
        Self {
            explainer: None,
            cache,
            num_features: 0,
            unavailable_reason: reason.into(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.explainer.is_some()
    }

    pub fn cache(&self) -> &Arc<ExplanationCache> {
        &self.cache
    }

    pub fn explain(
        &self,
        normalized: &NormalizedProfile,
        scaled_instance: &[f64],
        classifier: &dyn Classifier,
    ) -> Explanation {
        let key = normalized.cache_key();

        if let Some(cached) = self.cache.get(&key) {
            log::debug!("Explanation cache hit: {}", key);
            return present(&cached.pairs(), true, cached.score);
        }

        let Some(explainer) = self.explainer.as_ref() else {
            return Explanation::unavailable(format!("Penjelasan tidak tersedia: {}", self.unavailable_reason));
        };

        match explainer.explain_instance(scaled_instance, classifier, self.num_features) {
            Ok(fit) => {
                self.cache.put(key, CachedExplanation::from_pairs(&fit.pairs, Some(fit.score)));
                present(&fit.pairs, false, Some(fit.score))
            }
            Err(e) => {
                log::warn!("Explanation failed: {}", e);
                Explanation::unavailable(format!("Penjelasan tidak dapat dibuat: {}", e))
            }
        }
    }
}

/// Raw pairs -> display contributions, order preserved
pub fn present(pairs: &[(String, f64)], from_cache: bool, fidelity: Option<f64>) -> Explanation {
    let contributions = pairs
        .iter()
        .map(|(descriptor, weight)| {
            let feature = base_feature(descriptor);
            FeatureContribution {
                descriptor: descriptor.clone(),
                label: business_label(&feature),
                category: InsightCategory::for_feature(&feature),
                feature,
                weight: *weight,
                direction: Direction::from_weight(*weight),
                strength: Strength::from_weight(*weight),
            }
        })
        .collect();

    Explanation {
        contributions,
        from_cache,
        warning: None,
        fidelity,
    }
}

// ============================================================================
// TESTS
// ============================================================================
