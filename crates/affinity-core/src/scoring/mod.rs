//! Affinity scoring: saturation curves, distance and score combination.

mod combine;
pub mod geo;
mod pareto;

#[cfg(test)]
mod combine_tests;

pub use combine::{
    combine_artist_affinity, combine_event_affinity, combine_venue_affinity, distance_norm,
    popularity_norm, ScoreCombiner,
};
pub use geo::{geodesic_distance_m, node_distance_m, GeoPoint};
pub use pareto::{pareto, ParetoThresholds};
