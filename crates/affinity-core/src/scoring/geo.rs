//! Great-circle distance between nodes with coordinates.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::graph::{props, GraphView, NodeId};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point on the Earth's surface, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a point.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Reads `latitude`/`longitude` from a node.
    ///
    /// Returns `None` if the node is missing or either coordinate is absent
    /// or non-numeric.
    pub fn of_node<G: GraphView + ?Sized>(graph: &G, node: NodeId) -> Result<Option<Self>> {
        let latitude = graph.node_f64(node, props::LATITUDE)?;
        let longitude = graph.node_f64(node, props::LONGITUDE)?;
        Ok(latitude.zip(longitude).map(|(lat, lon)| Self::new(lat, lon)))
    }

    /// Haversine distance to `other` in metres, at equal elevation.
    #[must_use]
    pub fn distance_m(&self, other: &GeoPoint) -> f64 {
        geodesic_distance_m(*self, *other, 0.0, 0.0)
    }
}

/// Haversine distance in metres between two points, combined with the
/// elevation difference (`el1`, `el2` in metres) as `sqrt(d² + Δh²)`.
#[must_use]
pub fn geodesic_distance_m(from: GeoPoint, to: GeoPoint, el1: f64, el2: f64) -> f64 {
    let lat_distance = (to.latitude - from.latitude).to_radians();
    let lon_distance = (to.longitude - from.longitude).to_radians();
    let a = (lat_distance / 2.0).sin().powi(2)
        + from.latitude.to_radians().cos()
            * to.latitude.to_radians().cos()
            * (lon_distance / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    let distance = EARTH_RADIUS_KM * c * 1000.0;

    let height = el1 - el2;
    (distance.powi(2) + height.powi(2)).sqrt()
}

/// Distance in metres between two nodes, `None` when either lacks coordinates.
pub fn node_distance_m<G: GraphView + ?Sized>(
    graph: &G,
    from: NodeId,
    to: NodeId,
) -> Result<Option<f64>> {
    let Some(a) = GeoPoint::of_node(graph, from)? else {
        return Ok(None);
    };
    let Some(b) = GeoPoint::of_node(graph, to)? else {
        return Ok(None);
    };
    Ok(Some(a.distance_m(&b)))
}
