//! End-to-end affinity scenario over the public API.
//!
//! A user tracks two venues, two artists and two past events. Venue 1 and
//! artist 1 are similar to everything the user follows; both perform at the
//! future event 3. Event 4 involves only entities the user has no link to,
//! so its affinity falls back to popularity.

use std::collections::HashMap;

use serde_json::{json, Value};

use affinity_core::affinity::keys;
use affinity_core::graph::{labels, props, GraphNode, GraphView, InMemoryGraph, NodeId, RelType};
use affinity_core::{AffinityCalculator, AffinityConfig};

const USER: NodeId = 1;
const VENUE_BASE: NodeId = 100;
const ARTIST_BASE: NodeId = 200;
const EVENT_BASE: NodeId = 300;

fn venue(n: u64) -> NodeId {
    VENUE_BASE + n
}

fn artist(n: u64) -> NodeId {
    ARTIST_BASE + n
}

fn event(n: u64) -> NodeId {
    EVENT_BASE + n
}

fn weighted(name: &str, value: Value) -> HashMap<String, Value> {
    HashMap::from([(name.to_string(), value)])
}

fn setup_graph() -> InMemoryGraph {
    let mut graph = InMemoryGraph::new();
    graph
        .add_node(
            GraphNode::new(USER, &[labels::USER])
                .with_property(props::LATITUDE, json!(51.093_965))
                .with_property(props::LONGITUDE, json!(-3.011_673)),
        )
        .expect("user");

    graph
        .add_node(
            GraphNode::new(venue(1), &[labels::VENUE, labels::ACTIVE])
                .with_property(props::LATITUDE, json!(51.460_72))
                .with_property(props::LONGITUDE, json!(-2.609_646)),
        )
        .expect("venue 1");
    graph
        .add_node(GraphNode::new(artist(1), &[labels::ARTIST, labels::ACTIVE]))
        .expect("artist 1");
    for n in 2..=5 {
        graph.add_node(GraphNode::new(venue(n), &[labels::VENUE])).expect("venue");
        graph.add_node(GraphNode::new(artist(n), &[labels::ARTIST])).expect("artist");
    }
    graph
        .add_node(
            GraphNode::new(venue(6), &[labels::VENUE]).with_property(props::TRACKERS, json!(500)),
        )
        .expect("venue 6");
    graph
        .add_node(
            GraphNode::new(artist(6), &[labels::ARTIST])
                .with_property(props::TRACKERS, json!(1000)),
        )
        .expect("artist 6");

    for n in 1..=2 {
        graph.add_node(GraphNode::new(event(n), &[labels::EVENT])).expect("event");
    }
    for n in 3..=4 {
        graph
            .add_node(GraphNode::new(event(n), &[labels::EVENT, labels::FUTURE]))
            .expect("future event");
    }

    for tracked in [venue(2), venue(3), artist(2), artist(3), event(1), event(2)] {
        graph.connect(USER, tracked, RelType::Tracks).expect("tracks");
    }
    for (v, a, e) in [(4, 4, 1), (5, 5, 2), (6, 6, 4), (1, 1, 3)] {
        graph.connect(venue(v), event(e), RelType::Hosts).expect("hosts");
        graph
            .connect_with(artist(a), event(e), RelType::Plays, weighted(props::ROSTER, json!(0)))
            .expect("plays");
    }
    for (n, nmid) in [(2, 0.9), (3, 0.8), (4, 0.7), (5, 0.6)] {
        let nmid = weighted(props::NMID, json!(nmid));
        graph
            .connect_with(venue(1), venue(n), RelType::SimilarTo, nmid.clone())
            .expect("similar venue");
        graph
            .connect_with(artist(1), artist(n), RelType::SimilarTo, nmid)
            .expect("similar artist");
    }
    graph
}

fn affinity_properties(graph: &InMemoryGraph, target: NodeId) -> HashMap<String, Value> {
    let rel = graph
        .relationship_between(USER, target, RelType::HasAffinityFor)
        .expect("read")
        .expect("affinity relationship");
    graph.get_edge(rel.id).expect("edge").properties().clone()
}

fn check_venue_assertions(props: &HashMap<String, Value>) {
    assert_eq!(props[keys::DISTANCE_M].as_f64().map(f64::round), Some(49_448.0));
    let distance_norm = props[keys::DISTANCE_NORM].as_f64().expect("distanceNorm");
    assert!((distance_norm - 0.969_462_101_891_627_5).abs() < 1e-6);
    assert_eq!(props[keys::AFFINITY], json!(0.850_000_000_000_000_1));
    check_class_assertions(props);
}

fn check_class_assertions(props: &HashMap<String, Value>) {
    assert_eq!(props[keys::MIN], json!(0.8));
    assert_eq!(props[keys::AVG], json!(0.850_000_000_000_000_1));
    assert_eq!(props[keys::COUNT], json!(2));
    assert_eq!(props[keys::PROD], json!(0.720_000_000_000_000_1));
    assert_eq!(props[keys::PROXY_MIN], json!(0.6));
    assert_eq!(props[keys::PROXY_AVG], json!(0.649_999_999_999_999_9));
    assert_eq!(props[keys::PROXY_COUNT], json!(2));
    assert_eq!(props[keys::PROXY_PROD], json!(0.42));
}

#[test]
fn test_venue_affinity_without_proxy_tracks() {
    let mut graph = setup_graph();
    let calculator = AffinityCalculator::default();

    calculator
        .calculate_venue_affinity(&mut graph, USER, venue(1), false)
        .expect("venue affinity");

    check_venue_assertions(&affinity_properties(&graph, venue(1)));
}

#[test]
fn test_venue_affinity_using_proxy_tracks() {
    let mut graph = setup_graph();
    let calculator = AffinityCalculator::default();

    calculator.add_proxy_tracks(&mut graph, USER).expect("proxy tracks");
    calculator
        .calculate_venue_affinity(&mut graph, USER, venue(1), true)
        .expect("venue affinity");

    check_venue_assertions(&affinity_properties(&graph, venue(1)));
}

#[test]
fn test_artist_affinity() {
    let mut graph = setup_graph();
    AffinityCalculator::default()
        .calculate_artist_affinity(&mut graph, USER, artist(1), false)
        .expect("artist affinity");

    let props = affinity_properties(&graph, artist(1));
    check_class_assertions(&props);
    assert_eq!(props[keys::AFFINITY], json!(0.518_400_000_000_000_1));
    assert!(!props.contains_key(keys::DISTANCE_M));
}

#[test]
fn test_event_affinity_from_computed_affinities() {
    let mut graph = setup_graph();
    let calculator = AffinityCalculator::default();
    calculator
        .calculate_venue_affinity(&mut graph, USER, venue(1), false)
        .expect("venue affinity");
    calculator
        .calculate_artist_affinity(&mut graph, USER, artist(1), false)
        .expect("artist affinity");
    calculator
        .calculate_event_affinity(&mut graph, USER, event(3))
        .expect("event affinity");

    let props = affinity_properties(&graph, event(3));
    assert_eq!(props[keys::ARTIST_AFFINITY], json!(0.518_400_000_000_000_1));
    assert_eq!(props[keys::VENUE_AFFINITY], json!(0.850_000_000_000_000_1));
    assert_eq!(props[keys::AFFINITY], json!(0.92776));
}

#[test]
fn test_event_affinity_falls_back_to_popularity() {
    let mut graph = setup_graph();
    let config = AffinityConfig::default();
    let calculator = AffinityCalculator::new(&config);
    calculator
        .add_popularity_norm(&mut graph, labels::VENUE, &config.scoring.venue_popularity)
        .expect("venue popularity");
    calculator
        .add_popularity_norm(&mut graph, labels::ARTIST, &config.scoring.artist_popularity)
        .expect("artist popularity");
    calculator
        .calculate_event_affinity(&mut graph, USER, event(4))
        .expect("event affinity");

    let props = affinity_properties(&graph, event(4));
    assert_eq!(props[keys::ARTIST_AFFINITY], json!(0.999_997_247_796_636_8));
    assert_eq!(props[keys::VENUE_AFFINITY], json!(0.999_997_247_796_636_8));
    assert_eq!(props[keys::AFFINITY], json!(0.999_999_999_992_425_4));
}

#[test]
fn test_unrelated_venue_gets_no_relationship() {
    let mut graph = InMemoryGraph::new();
    graph.add_node(GraphNode::new(USER, &[labels::USER])).expect("user");
    graph.add_node(GraphNode::new(venue(1), &[labels::VENUE])).expect("venue");

    let record = AffinityCalculator::default()
        .calculate_venue_affinity(&mut graph, USER, venue(1), true)
        .expect("venue affinity");

    assert!(record.is_none());
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn test_missing_user_is_not_an_error() {
    let mut graph = setup_graph();
    let calculator = AffinityCalculator::default();

    assert!(calculator
        .calculate_venue_affinity(&mut graph, 9_999, venue(1), false)
        .expect("no error")
        .is_none());
    assert!(calculator
        .calculate_event_affinity(&mut graph, 9_999, event(3))
        .expect("no error")
        .is_none());
}
