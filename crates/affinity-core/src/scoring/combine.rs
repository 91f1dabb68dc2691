//! Score combination: path statistics to a single affinity in `[0, 1]`.
//!
//! `1.0` is the neutral "no evidence" score. Direct statistics always win
//! over proxy statistics; proxy evidence is damped by a small exponent so
//! that it only ever nudges the score.

use crate::aggregate::PathStats;
use crate::config::ScoringConfig;
use crate::stats::complement_product;

use super::pareto::{pareto, ParetoThresholds};

/// Deterministic combination formulas parameterised by [`ScoringConfig`].
#[derive(Debug, Clone, Default)]
pub struct ScoreCombiner {
    config: ScoringConfig,
}

impl ScoreCombiner {
    /// Creates a combiner with the given constants.
    #[must_use]
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Returns the constants in use.
    #[must_use]
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Distance contribution: `floor + weight * pareto(distance) / max`.
    #[must_use]
    pub fn distance_norm(&self, distance_m: f64) -> f64 {
        let curve = &self.config.distance;
        let saturation = pareto(0.0, curve.eighty_percent, curve.maximum, distance_m);
        self.config.distance_floor + self.config.distance_weight * saturation / curve.maximum
    }

    /// Similarity of a venue: direct average, else damped proxy average, else 1.
    #[must_use]
    pub fn venue_similarity(&self, direct: &PathStats, proxy: &PathStats) -> f64 {
        match (direct.average(), proxy.average()) {
            (Some(avg), _) => avg,
            (None, Some(proxy_avg)) => proxy_avg.powf(self.config.proxy_exponent),
            (None, None) => 1.0,
        }
    }

    /// Venue affinity: the smaller of the similarity and the distance
    /// contribution (1 when the distance is unknown).
    #[must_use]
    pub fn venue_affinity(
        &self,
        direct: &PathStats,
        proxy: &PathStats,
        distance_m: Option<f64>,
    ) -> f64 {
        let distance = distance_m.map_or(1.0, |d| self.distance_norm(d));
        distance.min(self.venue_similarity(direct, proxy))
    }

    /// Artist affinity: direct product squared, else damped proxy product, else 1.
    #[must_use]
    pub fn artist_affinity(&self, direct: &PathStats, proxy: &PathStats) -> f64 {
        if !direct.is_empty() {
            direct.product.powf(self.config.artist_exponent)
        } else if !proxy.is_empty() {
            proxy.product.powf(self.config.proxy_exponent)
        } else {
            1.0
        }
    }

    /// Event affinity: noisy-OR of its artist and venue affinities.
    #[must_use]
    pub fn event_affinity(&self, artist: f64, venue: f64) -> f64 {
        complement_product(&[artist, venue])
    }

    /// Popularity fallback for an entity with `trackers` followers.
    ///
    /// Always within `[base, base + span]` and non-increasing in `trackers`.
    #[must_use]
    pub fn popularity_norm(&self, trackers: f64, thresholds: &ParetoThresholds) -> f64 {
        self.config.popularity_base
            + self.config.popularity_span * (1.0 - thresholds.normalized(trackers))
    }
}

/// Venue affinity with the default constants.
#[must_use]
pub fn combine_venue_affinity(
    direct: &PathStats,
    proxy: &PathStats,
    distance_m: Option<f64>,
) -> f64 {
    ScoreCombiner::default().venue_affinity(direct, proxy, distance_m)
}

/// Artist affinity with the default constants.
#[must_use]
pub fn combine_artist_affinity(direct: &PathStats, proxy: &PathStats) -> f64 {
    ScoreCombiner::default().artist_affinity(direct, proxy)
}

/// Event affinity: `1 - (1 - artist) * (1 - venue)`.
#[must_use]
pub fn combine_event_affinity(artist: f64, venue: f64) -> f64 {
    complement_product(&[artist, venue])
}

/// Distance contribution with the default constants.
#[must_use]
pub fn distance_norm(distance_m: f64) -> f64 {
    ScoreCombiner::default().distance_norm(distance_m)
}

/// Popularity norm with the default base and span.
///
/// `0.99999 + 0.00001 * (1 - pareto(0, p80, max, trackers) / max)`
#[must_use]
pub fn popularity_norm(trackers: f64, eighty_percent_value: f64, maximum_value: f64) -> f64 {
    ScoreCombiner::default().popularity_norm(
        trackers,
        &ParetoThresholds::new(eighty_percent_value, maximum_value),
    )
}
