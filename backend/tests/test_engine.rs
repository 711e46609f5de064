//! Integration tests for the slot loop

use network_simulator_core_rs::orchestrator::utilization_percent;
use network_simulator_core_rs::{
    LinkConfig, SimulationEngine, SimulationError, SimulatorConfig, Snapshot, SnapshotObserver, TopologyError,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

fn two_node_config() -> SimulatorConfig {
    SimulatorConfig {
        nodes: Vec::new(),
        links: vec![LinkConfig {
            a: "A".to_string(),
            b: "B".to_string(),
            capacity: 2,
        }],
        slots: vec!["s0".to_string(), "s1".to_string()],
        schedule: BTreeMap::from([("s0".to_string(), BTreeMap::from([("A".to_string(), 5)]))]),
        rng_seed: 1,
        event_log_limit: 100,
    }
}

#[derive(Default)]
struct RecordingObserver {
    seen: Mutex<Vec<Snapshot>>,
}

impl SnapshotObserver for RecordingObserver {
    fn notify(&self, snapshot: &Snapshot) {
        self.seen.lock().unwrap().push(snapshot.clone());
    }
}

fn assert_conservation(snapshot: &Snapshot) {
    for (node, stats) in &snapshot.nodes {
        assert_eq!(
            stats.packets_generated,
            stats.packets_sent + stats.queue_size as u64,
            "conservation broken at {}",
            node
        );
        assert_eq!(snapshot.queues[node], stats.queue_size);
    }
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_reference_engine_initial_snapshot() {
    let engine = SimulationEngine::new(SimulatorConfig::default()).unwrap();
    let snapshot = engine.snapshot();

    assert_eq!(snapshot.current_slot, "08:00");
    assert_eq!(snapshot.slot_index, 0);
    assert_eq!(snapshot.nodes.len(), 5);
    assert_eq!(snapshot.links.len(), 12);
    assert!(snapshot.links.iter().all(|l| l.current_load == 0));
    assert_eq!(snapshot.total_queued(), 0);
    assert!(!snapshot.is_running);
}

#[test]
fn test_empty_slot_sequence_rejected() {
    let mut config = two_node_config();
    config.slots.clear();

    assert_eq!(SimulationEngine::new(config).unwrap_err(), SimulationError::EmptySlotSequence);
}

#[test]
fn test_duplicate_slot_rejected() {
    let mut config = two_node_config();
    config.slots.push("s0".to_string());

    assert_eq!(
        SimulationEngine::new(config).unwrap_err(),
        SimulationError::DuplicateSlot("s0".to_string())
    );
}

#[test]
fn test_schedule_with_unknown_node_rejected() {
    let mut config = two_node_config();
    config.schedule.insert("s1".to_string(), BTreeMap::from([("Q".to_string(), 1)]));

    assert!(matches!(
        SimulationEngine::new(config),
        Err(SimulationError::UnknownScheduleNode { .. })
    ));
}

#[test]
fn test_invalid_topology_surfaces() {
    let mut config = two_node_config();
    config.links[0].capacity = 0;

    assert!(matches!(
        SimulationEngine::new(config),
        Err(SimulationError::Topology(TopologyError::InvalidCapacity { .. }))
    ));
}

// ============================================================================
// Slot Loop
// ============================================================================

#[test]
fn test_first_slot_on_reference_network() {
    let mut engine = SimulationEngine::new(SimulatorConfig::default()).unwrap();
    let snapshot = engine.advance_slot(None);

    assert_eq!(snapshot.current_slot, "08:15");
    assert_eq!(snapshot.slot_index, 1);
    assert_eq!(snapshot.total_generated(), 200);
    assert_conservation(&snapshot);

    for link in &snapshot.links {
        assert!(link.current_load <= link.capacity, "{:?}", link);
    }
}

#[test]
fn test_link_loads_bounded_every_slot() {
    let mut engine = SimulationEngine::new(SimulatorConfig::default()).unwrap();

    for _ in 0..8 {
        let snapshot = engine.advance_slot(None);
        for link in &snapshot.links {
            assert!(link.current_load <= link.capacity);
            assert!(link.utilization_percent <= 100.0);
        }
        assert_conservation(&snapshot);
    }
}

#[test]
fn test_clock_cycles_after_full_sequence() {
    let mut engine = SimulationEngine::new(SimulatorConfig::default()).unwrap();

    let labels: Vec<String> = (0..4).map(|_| engine.advance_slot(None).current_slot).collect();

    assert_eq!(labels, vec!["08:15", "08:30", "08:45", "08:00"]);
    assert_eq!(engine.snapshot().total_generated(), 200 + 225 + 250 + 225);
}

#[test]
fn test_override_other_slot_keeps_clock() {
    let mut engine = SimulationEngine::new(SimulatorConfig::default()).unwrap();

    let snapshot = engine.advance_slot(Some("08:30"));

    assert_eq!(snapshot.total_generated(), 250);
    assert_eq!(snapshot.current_slot, "08:00");
    assert_eq!(snapshot.slot_index, 0);
}

#[test]
fn test_override_current_slot_advances_clock() {
    let mut engine = SimulationEngine::new(SimulatorConfig::default()).unwrap();

    let snapshot = engine.advance_slot(Some("08:00"));

    assert_eq!(snapshot.total_generated(), 200);
    assert_eq!(snapshot.current_slot, "08:15");
}

#[test]
fn test_unknown_slot_still_drains_backlog() {
    let mut engine = SimulationEngine::new(two_node_config()).unwrap();

    let first = engine.advance_slot(None);
    assert_eq!(first.nodes["A"].packets_sent, 2);
    assert_eq!(first.queues["A"], 3);
    assert_eq!(first.current_slot, "s1");

    let second = engine.advance_slot(Some("not-a-slot"));
    assert_eq!(second.nodes["A"].packets_generated, 5);
    assert_eq!(second.nodes["A"].packets_sent, 4);
    assert_eq!(second.queues["A"], 1);
    assert_eq!(second.current_slot, "s1");
    assert_eq!(second.link("A", "B").unwrap().current_load, 2);
    assert_eq!(second.link("B", "A").unwrap().current_load, 0);
}

#[test]
fn test_backlog_drains_over_following_slots() {
    let mut engine = SimulationEngine::new(two_node_config()).unwrap();

    engine.advance_slot(None);
    engine.advance_slot(None);
    let third = engine.advance_slot(None);

    // s0 again: 5 new arrivals on top of 1 left over
    assert_eq!(third.nodes["A"].packets_generated, 10);
    assert_eq!(third.nodes["A"].packets_sent, 6);
    assert_eq!(third.queues["A"], 4);
    assert_conservation(&third);
}

#[test]
fn test_oldest_packets_sent_first() {
    let mut engine = SimulationEngine::new(two_node_config()).unwrap();

    engine.advance_slot(None);
    let ids: Vec<u64> = engine.backlog().queue("A").map(|p| p.id()).collect();

    assert_eq!(ids, vec![2, 3, 4]);
}

#[test]
fn test_queued_ids_strictly_increasing() {
    let mut config = SimulatorConfig::default();
    for link in &mut config.links {
        link.capacity = 3;
    }
    let mut engine = SimulationEngine::new(config).unwrap();

    for _ in 0..6 {
        engine.advance_slot(None);
    }

    for node in engine.topology().nodes() {
        let ids: Vec<u64> = engine.backlog().queue(node).map(|p| p.id()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]), "queue at {} out of order", node);
    }
    assert!(engine.backlog().total_len() > 0);
}

#[test]
fn test_usage_resets_each_slot() {
    let mut config = two_node_config();
    config.schedule.clear();
    let mut engine = SimulationEngine::new(config).unwrap();

    let snapshot = engine.advance_slot(None);
    assert_eq!(snapshot.total_generated(), 0);
    assert!(snapshot.links.iter().all(|l| l.current_load == 0));
}

// ============================================================================
// Reset and Observers
// ============================================================================

#[test]
fn test_reset_clears_everything() {
    let mut engine = SimulationEngine::new(two_node_config()).unwrap();
    engine.advance_slot(None);

    let snapshot = engine.reset();

    assert_eq!(snapshot.current_slot, "s0");
    assert_eq!(snapshot.total_generated(), 0);
    assert_eq!(snapshot.total_sent(), 0);
    assert_eq!(snapshot.total_queued(), 0);
    assert!(snapshot.links.iter().all(|l| l.current_load == 0));
    assert_eq!(engine.next_packet_id(), 0);
    assert_eq!(engine.event_log().len(), 1);
}

#[test]
fn test_observers_notified_on_advance_and_reset() {
    let mut engine = SimulationEngine::new(two_node_config()).unwrap();
    let observer = Arc::new(RecordingObserver::default());
    engine.add_observer(observer.clone());

    let first = engine.advance_slot(None);
    let second = engine.advance_slot(None);
    let reset = engine.reset();

    let seen = observer.seen.lock().unwrap();
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[0], first);
    assert_eq!(seen[1], second);
    assert_eq!(seen[2], reset);
}

#[test]
fn test_snapshot_does_not_notify() {
    let mut engine = SimulationEngine::new(two_node_config()).unwrap();
    let observer = Arc::new(RecordingObserver::default());
    engine.add_observer(observer.clone());

    engine.snapshot();
    assert!(observer.seen.lock().unwrap().is_empty());
}

#[test]
fn test_event_log_records_slot() {
    let mut engine = SimulationEngine::new(two_node_config()).unwrap();
    engine.advance_slot(None);

    let log = engine.event_log();
    assert_eq!(log.events_of_type("SlotStarted").len(), 1);
    assert_eq!(log.events_of_type("BacklogDrained").len(), 2);
    assert_eq!(log.events_of_type("ClockAdvanced").len(), 1);
    assert_eq!(log.events_for_node("A").len(), 1);
}

// ============================================================================
// Snapshot Formatting
// ============================================================================

#[test]
fn test_utilization_rounding() {
    assert_eq!(utilization_percent(40, 80), 50.0);
    assert_eq!(utilization_percent(1, 3), 33.3);
    assert_eq!(utilization_percent(2, 3), 66.7);
    assert_eq!(utilization_percent(60, 60), 100.0);
    assert_eq!(utilization_percent(0, 0), 0.0);
}

#[test]
fn test_utilization_ties_round_to_even() {
    // x.x5 ties on an 80-capacity link
    assert_eq!(utilization_percent(1, 80), 1.2);
    assert_eq!(utilization_percent(3, 80), 3.8);
    assert_eq!(utilization_percent(5, 80), 6.2);
}

#[test]
fn test_snapshot_json_field_names() {
    let mut engine = SimulationEngine::new(two_node_config()).unwrap();
    let snapshot = engine.advance_slot(None);

    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["current_slot"], "s1");
    assert_eq!(json["nodes"]["A"]["packets_generated"], 5);
    assert_eq!(json["queues"]["A"], 3);
    assert_eq!(json["links"][0]["source"], "A");
    assert_eq!(json["links"][0]["utilization_percent"], 100.0);
    assert_eq!(json["is_running"], false);
}
