use std::collections::HashMap;
use std::sync::Arc;

use crate::core::{Extrapolation, resample_many};

/// Cross-symbol mean on every timeline index.
///
/// Each series is resampled in extrapolate mode so the average spans the whole
/// timeline even where individual symbols have no data.
#[must_use]
pub fn global_average(series: &[Vec<(i64, f64)>], timeline: &[i64]) -> Vec<(i64, f64)> {
    let resampled = resample_many(series, timeline, Extrapolation::Linear);
    timeline
        .iter()
        .enumerate()
        .filter_map(|(index, time)| {
            let (sum, count) = resampled
                .iter()
                .filter_map(|values| values[index])
                .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
            (count > 0).then(|| (*time, sum / count as f64))
        })
        .collect()
}

/// Trailing mean over `(t - window_ms, t]` at every sample time.
#[must_use]
pub fn rolling_average(samples: &[(i64, f64)], window_ms: i64) -> Vec<(i64, f64)> {
    if window_ms <= 0 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(samples.len());
    let mut tail = 0;
    let mut sum = 0.0;
    for (head, (time, value)) in samples.iter().enumerate() {
        sum += value;
        while samples[tail].0 <= time - window_ms {
            sum -= samples[tail].1;
            tail += 1;
        }
        out.push((*time, sum / (head + 1 - tail) as f64));
    }
    out
}

/// Identity of one aggregate line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AverageLineId {
    Global {
        spec_id: String,
    },
    Rolling {
        spec_id: Option<String>,
        symbol: String,
        window_ms: i64,
    },
}

/// Structured cache key for a computed aggregate line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AverageCacheKey {
    pub chart_key: String,
    pub line: AverageLineId,
    /// Sorted visible symbols contributing to the line.
    pub tickers: Vec<String>,
    /// Visible window the per-symbol normalization was computed over.
    pub normalized_window: Option<(i64, i64)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AverageCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
    pub generation: u64,
}

/// Memoized aggregate lines.
///
/// Entries are dropped whenever the owner advances the generation, which it
/// does only when visibility, average configuration or data change.
#[derive(Debug, Default)]
pub struct AverageCache {
    generation: u64,
    entries: HashMap<AverageCacheKey, Arc<[(i64, f64)]>>,
    hits: u64,
    misses: u64,
}

impl AverageCache {
    const MAX_ENTRIES: usize = 512;

    /// Clears the cache if `generation` differs from the cached one.
    pub fn sync_generation(&mut self, generation: u64) {
        if self.generation != generation {
            self.entries.clear();
            self.generation = generation;
        }
    }

    pub fn get_or_compute<F>(&mut self, key: AverageCacheKey, compute: F) -> Arc<[(i64, f64)]>
    where
        F: FnOnce() -> Vec<(i64, f64)>,
    {
        if let Some(cached) = self.entries.get(&key) {
            self.hits = self.hits.saturating_add(1);
            return Arc::clone(cached);
        }
        self.misses = self.misses.saturating_add(1);
        if self.entries.len() >= Self::MAX_ENTRIES {
            self.entries.clear();
        }
        let value: Arc<[(i64, f64)]> = compute().into();
        self.entries.insert(key, Arc::clone(&value));
        value
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn stats(&self) -> AverageCacheStats {
        AverageCacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.entries.len(),
            generation: self.generation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AverageCache, AverageCacheKey, AverageLineId, global_average, rolling_average};

    fn key(spec: &str) -> AverageCacheKey {
        AverageCacheKey {
            chart_key: "price".to_owned(),
            line: AverageLineId::Global {
                spec_id: spec.to_owned(),
            },
            tickers: vec!["A".to_owned(), "B".to_owned()],
            normalized_window: None,
        }
    }

    #[test]
    fn global_average_spans_disjoint_series() {
        let a = vec![(0, 10.0), (10, 20.0)];
        let b = vec![(20, 100.0), (30, 100.0)];
        let timeline = vec![0, 10, 20, 30];
        let avg = global_average(&[a, b], &timeline);
        assert_eq!(avg.len(), 4);
        // A extrapolates to 30 at t=20, B is flat at 100.
        assert_eq!(avg[2], (20, 65.0));
        assert_eq!(avg[0], (0, 55.0));
    }

    #[test]
    fn rolling_average_uses_trailing_window() {
        let samples = vec![(0, 1.0), (10, 2.0), (20, 3.0), (30, 4.0)];
        let avg = rolling_average(&samples, 20);
        assert_eq!(avg, vec![(0, 1.0), (10, 1.5), (20, 2.5), (30, 3.5)]);
        assert!(rolling_average(&samples, 0).is_empty());
    }

    #[test]
    fn cache_reuses_entries_until_generation_changes() {
        let mut cache = AverageCache::default();
        cache.sync_generation(1);
        let first = cache.get_or_compute(key("avg"), || vec![(0, 1.0)]);
        let second = cache.get_or_compute(key("avg"), || vec![(0, 2.0)]);
        assert_eq!(first, second);
        assert_eq!(cache.stats().hits, 1);

        cache.sync_generation(2);
        let third = cache.get_or_compute(key("avg"), || vec![(0, 3.0)]);
        assert_eq!(third[0].1, 3.0);
        assert_eq!(cache.stats().misses, 2);
    }
}
