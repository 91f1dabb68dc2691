//! Tests for score combination.

use super::combine::{
    combine_artist_affinity, combine_event_affinity, combine_venue_affinity, distance_norm,
    popularity_norm, ScoreCombiner,
};
use super::pareto::ParetoThresholds;
use crate::aggregate::PathStats;
use crate::config::ScoringConfig;

fn stats(weights: &[f64]) -> PathStats {
    let mut stats = PathStats::new();
    for w in weights {
        stats.record(*w);
    }
    stats
}

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-12, "{actual} != {expected}");
}

#[test]
fn test_distance_norm_reference() {
    assert_close(distance_norm(49_503.0), 0.969_516_206_110_532_2);
    assert_eq!(distance_norm(0.0), 0.85);
}

#[test]
fn test_venue_affinity_reference() {
    let direct = stats(&[0.9, 0.8]);
    let proxy = stats(&[0.7, 0.6]);
    let affinity = combine_venue_affinity(&direct, &proxy, Some(49_503.0));
    assert_close(affinity, 0.85);
}

#[test]
fn test_venue_affinity_distance_caps_similarity() {
    let direct = stats(&[0.99]);
    let affinity = combine_venue_affinity(&direct, &PathStats::new(), Some(0.0));
    assert_eq!(affinity, 0.85);
}

#[test]
fn test_venue_affinity_falls_back_to_proxy() {
    let proxy = stats(&[0.7, 0.6]);
    let affinity = combine_venue_affinity(&PathStats::new(), &proxy, None);
    assert_close(affinity, 0.65_f64.powf(0.1));
}

#[test]
fn test_no_evidence_is_neutral() {
    let empty = PathStats::new();
    assert_eq!(combine_venue_affinity(&empty, &empty, None), 1.0);
    assert_eq!(combine_artist_affinity(&empty, &empty), 1.0);
}

#[test]
fn test_artist_affinity_reference() {
    let direct = stats(&[0.9, 0.8]);
    let proxy = stats(&[0.7, 0.6]);
    assert_close(combine_artist_affinity(&direct, &proxy), 0.5184);
    assert_close(combine_artist_affinity(&PathStats::new(), &proxy), 0.42_f64.powf(0.1));
}

#[test]
fn test_event_affinity_reference() {
    assert_close(combine_event_affinity(0.5184, 0.85), 0.92776);
    assert_eq!(combine_event_affinity(0.0, 0.0), 0.0);
    assert_eq!(combine_event_affinity(1.0, 0.3), 1.0);
}

#[test]
fn test_popularity_norm_reference() {
    let venue = popularity_norm(500.0, 2500.0, 25_000.0);
    let artist = popularity_norm(1000.0, 5000.0, 50_000.0);
    assert_close(venue, 0.999_997_247_796_636_8);
    assert_close(artist, 0.999_997_247_796_636_8);
    assert_close(combine_event_affinity(artist, venue), 0.999_999_999_992_425_4);
}

#[test]
fn test_popularity_norm_bounds() {
    assert_eq!(popularity_norm(0.0, 2500.0, 25_000.0), 1.0);
    let huge = popularity_norm(1e9, 2500.0, 25_000.0);
    assert!(huge >= 0.99999);
    assert!(huge < 1.0);
}

#[test]
fn test_combiner_uses_configured_constants() {
    let config = ScoringConfig {
        artist_exponent: 1.0,
        distance_floor: 0.5,
        distance_weight: 0.5,
        ..ScoringConfig::default()
    };
    let combiner = ScoreCombiner::new(config);
    assert_close(combiner.artist_affinity(&stats(&[0.9, 0.8]), &PathStats::new()), 0.72);
    assert_eq!(combiner.distance_norm(0.0), 0.5);
    assert_eq!(combiner.config().artist_exponent, 1.0);

    let thresholds = ParetoThresholds::new(2500.0, 25_000.0);
    assert_eq!(combiner.popularity_norm(0.0, &thresholds), 1.0);
}
