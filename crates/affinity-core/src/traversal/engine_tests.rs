//! Tests for the depth-first traversal driver.

use super::engine::Traversal;
use super::path::Path;
use super::role::{TargetKind, TrackMode};
use crate::error::Error;
use crate::graph::{labels, GraphNode, InMemoryGraph, RelType};
use crate::test_fixtures::{self as fx, scenario_graph, similar};

fn hop_signature(paths: &[Path]) -> Vec<(usize, u64)> {
    let mut out: Vec<(usize, u64)> = paths.iter().map(|p| (p.len(), p.nodes()[1])).collect();
    out.sort_unstable();
    out
}

#[test]
fn test_direct_mode_finds_similarity_and_event_paths() {
    let graph = scenario_graph();
    let paths = Traversal::new(fx::VENUE_1, TargetKind::Venue, TrackMode::Direct)
        .paths(&graph, fx::USER)
        .unwrap();

    assert_eq!(
        hop_signature(&paths),
        vec![
            (2, fx::VENUE_2),
            (2, fx::VENUE_3),
            (3, fx::EVENT_1),
            (3, fx::EVENT_2)
        ]
    );
    assert!(paths.iter().all(|p| p.end_node() == fx::VENUE_1));
}

#[test]
fn test_direct_mode_stats() {
    let graph = scenario_graph();
    let stats = Traversal::new(fx::VENUE_1, TargetKind::Venue, TrackMode::Direct)
        .for_each_path(&graph, fx::USER, |_| Ok(()))
        .unwrap();
    // Root, six tracked nodes, two bridged peers, two detours with one bridge each.
    assert_eq!(stats.steps, 13);
    assert_eq!(stats.accepted, 4);
}

#[test]
fn test_proxy_mode_ignores_tracked_events() {
    let graph = scenario_graph();
    let paths = Traversal::new(fx::VENUE_1, TargetKind::Venue, TrackMode::Proxy)
        .paths(&graph, fx::USER)
        .unwrap();
    assert_eq!(paths.len(), 2);
    assert!(paths.iter().all(|p| p.len() == 2));
}

#[test]
fn test_proxy_mode_follows_proxy_tracks() {
    let mut graph = scenario_graph();
    graph.connect(fx::USER, fx::VENUE_4, RelType::ProxyTracks).unwrap();
    graph.connect(fx::USER, fx::VENUE_5, RelType::ProxyTracks).unwrap();

    let paths = Traversal::new(fx::VENUE_1, TargetKind::Venue, TrackMode::Proxy)
        .paths(&graph, fx::USER)
        .unwrap();
    assert_eq!(paths.len(), 4);
    assert_eq!(
        paths.iter().filter(|p| p.contains_type(RelType::ProxyTracks)).count(),
        2
    );
}

#[test]
fn test_artist_target_detours_through_plays() {
    let graph = scenario_graph();
    let paths = Traversal::new(fx::ARTIST_1, TargetKind::Artist, TrackMode::Direct)
        .paths(&graph, fx::USER)
        .unwrap();
    assert_eq!(paths.len(), 4);
    assert_eq!(paths.iter().filter(|p| p.contains_type(RelType::Plays)).count(), 2);
}

#[test]
fn test_tracked_target_is_not_a_path() {
    let mut graph = scenario_graph();
    graph.connect(fx::USER, fx::VENUE_1, RelType::Tracks).unwrap();
    let paths = Traversal::new(fx::VENUE_1, TargetKind::Venue, TrackMode::Direct)
        .paths(&graph, fx::USER)
        .unwrap();
    assert_eq!(paths.len(), 4);
}

#[test]
fn test_tracked_event_at_target_is_pruned() {
    // User -> Event 3 <-HOSTS- Venue 1 ends on the target through the detour
    // edge; it says nothing about similarity.
    let mut graph = scenario_graph();
    graph.connect(fx::USER, fx::EVENT_3, RelType::Tracks).unwrap();
    let paths = Traversal::new(fx::VENUE_1, TargetKind::Venue, TrackMode::Direct)
        .paths(&graph, fx::USER)
        .unwrap();
    assert_eq!(paths.len(), 4);
    assert!(paths.iter().all(|p| p.nodes()[1] != fx::EVENT_3));
}

/// User tracks an event hosted by venue 10; venues 10 and 11 are similar in
/// both directions and 11 also hosts the event.
fn build_cycle_graph() -> InMemoryGraph {
    let mut graph = InMemoryGraph::new();
    graph.add_node(GraphNode::new(1, &[labels::USER])).unwrap();
    graph.add_node(GraphNode::new(10, &[labels::VENUE])).unwrap();
    graph.add_node(GraphNode::new(11, &[labels::VENUE, labels::ACTIVE])).unwrap();
    graph.add_node(GraphNode::new(20, &[labels::EVENT])).unwrap();
    graph.connect(1, 20, RelType::Tracks).unwrap();
    graph.connect(10, 20, RelType::Hosts).unwrap();
    graph.connect(11, 20, RelType::Hosts).unwrap();
    similar(&mut graph, 10, 11, 0.5);
    similar(&mut graph, 11, 10, 0.4);
    graph
}

#[test]
fn test_cycle_counts_each_similarity_edge_once() {
    let graph = build_cycle_graph();
    let paths = Traversal::new(11, TargetKind::Venue, TrackMode::Direct)
        .paths(&graph, 1)
        .unwrap();

    // Both SIMILAR_TO edges bridge 10 to the target; the HOSTS edge from
    // the target itself is pruned.
    assert_eq!(paths.len(), 2);
    for path in &paths {
        assert_eq!(path.nodes(), &[1, 20, 10, 11]);
    }
    assert_ne!(paths[0].relationships()[2].id, paths[1].relationships()[2].id);
}

#[test]
fn test_cycle_never_repeats_an_edge() {
    let graph = build_cycle_graph();
    for target in [10, 11] {
        for path in Traversal::new(target, TargetKind::Venue, TrackMode::Direct)
            .paths(&graph, 1)
            .unwrap()
        {
            let mut ids: Vec<u64> = path.relationships().iter().map(|r| r.id).collect();
            let before = ids.len();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), before);
            assert!(path.len() <= 3);
        }
    }
}

#[test]
fn test_step_budget_exceeded() {
    let graph = scenario_graph();
    let err = Traversal::new(fx::VENUE_1, TargetKind::Venue, TrackMode::Direct)
        .with_step_budget(Some(3))
        .paths(&graph, fx::USER)
        .unwrap_err();
    assert!(matches!(err, Error::TraversalBudgetExceeded(3)));
}

#[test]
fn test_step_budget_large_enough() {
    let graph = scenario_graph();
    let paths = Traversal::new(fx::VENUE_1, TargetKind::Venue, TrackMode::Direct)
        .with_step_budget(Some(13))
        .paths(&graph, fx::USER)
        .unwrap();
    assert_eq!(paths.len(), 4);
}

#[test]
fn test_missing_source_yields_nothing() {
    let graph = scenario_graph();
    let paths = Traversal::new(fx::VENUE_1, TargetKind::Venue, TrackMode::Direct)
        .paths(&graph, 9_999)
        .unwrap();
    assert!(paths.is_empty());
}

#[test]
fn test_sink_error_aborts() {
    let graph = scenario_graph();
    let result = Traversal::new(fx::VENUE_1, TargetKind::Venue, TrackMode::Direct).for_each_path(
        &graph,
        fx::USER,
        |_| Err(Error::Graph("sink closed".to_string())),
    );
    assert!(matches!(result, Err(Error::Graph(_))));
}

#[test]
fn test_source_with_entity_label_is_still_a_user() {
    let mut graph = InMemoryGraph::new();
    graph
        .add_node(GraphNode::new(1, &[labels::USER, labels::VENUE]))
        .unwrap();
    graph.add_node(GraphNode::new(2, &[labels::VENUE])).unwrap();
    graph
        .add_node(GraphNode::new(3, &[labels::VENUE, labels::ACTIVE]))
        .unwrap();
    graph.connect(1, 2, RelType::Tracks).unwrap();
    similar(&mut graph, 3, 2, 0.7);

    let paths = Traversal::new(3, TargetKind::Venue, TrackMode::Direct)
        .paths(&graph, 1)
        .unwrap();
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].nodes(), &[1, 2, 3]);
}

#[test]
fn test_user_label_wins_only_at_the_source() {
    use super::role::NodeRole;
    use std::collections::BTreeSet;

    let both: BTreeSet<String> = [labels::USER, labels::EVENT]
        .iter()
        .map(|l| (*l).to_string())
        .collect();
    assert_eq!(
        NodeRole::resolve_source(&both, TargetKind::Venue),
        NodeRole::User
    );
    assert_eq!(NodeRole::resolve(&both, TargetKind::Venue), NodeRole::Event);
}
