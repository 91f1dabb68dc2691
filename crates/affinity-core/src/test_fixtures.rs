//! Shared graph fixtures for unit tests.

use serde_json::json;

use crate::graph::{labels, props, GraphNode, InMemoryGraph, NodeId, RelType};

pub const USER: NodeId = 1;

pub const VENUE_1: NodeId = 101;
pub const VENUE_2: NodeId = 102;
pub const VENUE_3: NodeId = 103;
pub const VENUE_4: NodeId = 104;
pub const VENUE_5: NodeId = 105;
pub const VENUE_6: NodeId = 106;
pub const VENUE_UNRELATED: NodeId = 107;

pub const ARTIST_1: NodeId = 201;
pub const ARTIST_2: NodeId = 202;
pub const ARTIST_3: NodeId = 203;
pub const ARTIST_4: NodeId = 204;
pub const ARTIST_5: NodeId = 205;
pub const ARTIST_6: NodeId = 206;

pub const EVENT_1: NodeId = 301;
pub const EVENT_2: NodeId = 302;
pub const EVENT_3: NodeId = 303;
pub const EVENT_4: NodeId = 304;

/// Builds the reference scenario.
///
/// The user tracks venues 2 and 3, artists 2 and 3 and events 1 and 2.
/// Events 1 and 2 are hosted by venues 4 and 5 and played by artists 4 and 5.
/// Venue 1 and artist 1 are similar to their peers 2..5 with NMID 0.9, 0.8,
/// 0.7 and 0.6, and both take part in the future event 3. Event 4 is a future
/// event at venue 6 (500 trackers) with artist 6 (1000 trackers).
pub fn scenario_graph() -> InMemoryGraph {
    let mut graph = InMemoryGraph::new();

    graph
        .add_node(
            GraphNode::new(USER, &[labels::USER])
                .with_property(props::LATITUDE, json!(51.093_965))
                .with_property(props::LONGITUDE, json!(-3.011_673)),
        )
        .unwrap();
    graph
        .add_node(
            GraphNode::new(VENUE_1, &[labels::VENUE, labels::ACTIVE])
                .with_property(props::LATITUDE, json!(51.460_72))
                .with_property(props::LONGITUDE, json!(-2.609_646)),
        )
        .unwrap();
    for id in [VENUE_2, VENUE_3, VENUE_4, VENUE_5] {
        graph.add_node(GraphNode::new(id, &[labels::VENUE])).unwrap();
    }
    graph
        .add_node(
            GraphNode::new(VENUE_6, &[labels::VENUE]).with_property(props::TRACKERS, json!(500)),
        )
        .unwrap();
    graph
        .add_node(GraphNode::new(VENUE_UNRELATED, &[labels::VENUE, labels::ACTIVE]))
        .unwrap();

    graph
        .add_node(GraphNode::new(ARTIST_1, &[labels::ARTIST, labels::ACTIVE]))
        .unwrap();
    for id in [ARTIST_2, ARTIST_3, ARTIST_4, ARTIST_5] {
        graph.add_node(GraphNode::new(id, &[labels::ARTIST])).unwrap();
    }
    graph
        .add_node(
            GraphNode::new(ARTIST_6, &[labels::ARTIST]).with_property(props::TRACKERS, json!(1000)),
        )
        .unwrap();

    for id in [EVENT_1, EVENT_2] {
        graph.add_node(GraphNode::new(id, &[labels::EVENT])).unwrap();
    }
    for id in [EVENT_3, EVENT_4] {
        graph
            .add_node(GraphNode::new(id, &[labels::EVENT, labels::FUTURE]))
            .unwrap();
    }

    for tracked in [VENUE_2, VENUE_3, ARTIST_2, ARTIST_3, EVENT_1, EVENT_2] {
        graph.connect(USER, tracked, RelType::Tracks).unwrap();
    }

    for (venue, event) in [
        (VENUE_4, EVENT_1),
        (VENUE_5, EVENT_2),
        (VENUE_6, EVENT_4),
        (VENUE_1, EVENT_3),
    ] {
        graph.connect(venue, event, RelType::Hosts).unwrap();
    }
    for (artist, event) in [
        (ARTIST_4, EVENT_1),
        (ARTIST_5, EVENT_2),
        (ARTIST_6, EVENT_4),
        (ARTIST_1, EVENT_3),
    ] {
        let id = graph.connect(artist, event, RelType::Plays).unwrap();
        set_edge(&mut graph, id, props::ROSTER, json!(0));
    }

    let weights = [0.9, 0.8, 0.7, 0.6];
    for (peer, nmid) in [VENUE_2, VENUE_3, VENUE_4, VENUE_5].into_iter().zip(weights) {
        similar(&mut graph, VENUE_1, peer, nmid);
    }
    for (peer, nmid) in [ARTIST_2, ARTIST_3, ARTIST_4, ARTIST_5].into_iter().zip(weights) {
        similar(&mut graph, ARTIST_1, peer, nmid);
    }

    graph
}

/// Adds `from -SIMILAR_TO-> to` with the given NMID.
pub fn similar(graph: &mut InMemoryGraph, from: NodeId, to: NodeId, nmid: f64) {
    let id = graph.connect(from, to, RelType::SimilarTo).unwrap();
    set_edge(graph, id, props::NMID, json!(nmid));
}

fn set_edge(graph: &mut InMemoryGraph, id: u64, name: &str, value: serde_json::Value) {
    use crate::graph::GraphWrite;
    graph.set_edge_property(id, name, value).unwrap();
}
