//! Tests for scheduled traffic generation

use network_simulator_core_rs::rng::RngManager;
use network_simulator_core_rs::{TrafficGenerator, TrafficSchedule};
use std::collections::BTreeMap;

fn nodes() -> Vec<String> {
    ["A", "B", "C", "D", "E"].iter().map(|n| n.to_string()).collect()
}

fn schedule() -> TrafficSchedule {
    let counts: BTreeMap<String, u32> = nodes().into_iter().zip([50, 30, 40, 20, 60]).collect();
    TrafficSchedule::from([("08:00".to_string(), counts)])
}

#[test]
fn test_exact_counts_per_source() {
    let mut generator = TrafficGenerator::new(schedule(), nodes());
    let mut rng = RngManager::new(12345);

    let packets = generator.generate_for_slot("08:00", &mut rng);
    assert_eq!(packets.len(), 200);

    for (node, expected) in nodes().iter().zip([50, 30, 40, 20, 60]) {
        let count = packets.iter().filter(|p| p.source() == node).count();
        assert_eq!(count, expected, "arrivals at {}", node);
    }
}

#[test]
fn test_destination_never_source() {
    let mut generator = TrafficGenerator::new(schedule(), nodes());
    let mut rng = RngManager::new(7);

    for packet in generator.generate_for_slot("08:00", &mut rng) {
        assert_ne!(packet.source(), packet.destination());
        assert!(nodes().iter().any(|n| n == packet.destination()));
        assert_eq!(packet.created_slot(), "08:00");
    }
}

#[test]
fn test_ids_strictly_increase_across_slots() {
    let mut generator = TrafficGenerator::new(schedule(), nodes());
    let mut rng = RngManager::new(1);

    let first = generator.generate_for_slot("08:00", &mut rng);
    let second = generator.generate_for_slot("08:00", &mut rng);

    let ids: Vec<u64> = first.iter().chain(second.iter()).map(|p| p.id()).collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(ids.first(), Some(&0));
    assert_eq!(generator.next_packet_id(), 400);
}

#[test]
fn test_unknown_slot_generates_nothing() {
    let mut generator = TrafficGenerator::new(schedule(), nodes());
    let mut rng = RngManager::new(1);
    let state_before = rng.get_state();

    assert!(generator.generate_for_slot("17:00", &mut rng).is_empty());
    assert_eq!(generator.next_packet_id(), 0);
    assert_eq!(rng.get_state(), state_before);
}

#[test]
fn test_same_seed_same_packets() {
    let mut first = TrafficGenerator::new(schedule(), nodes());
    let mut second = TrafficGenerator::new(schedule(), nodes());

    let a = first.generate_for_slot("08:00", &mut RngManager::new(42));
    let b = second.generate_for_slot("08:00", &mut RngManager::new(42));

    assert_eq!(a, b);
}

#[test]
fn test_generate_for_single_node() {
    let mut generator = TrafficGenerator::new(schedule(), nodes());
    let mut rng = RngManager::new(3);

    let packets = generator.generate_for_node("D", "08:00", &mut rng);
    assert_eq!(packets.len(), 20);
    assert!(packets.iter().all(|p| p.source() == "D"));
    assert_eq!(generator.arrivals_for("08:00", "E"), 60);
    assert_eq!(generator.arrivals_for("08:00", "Z"), 0);
}

#[test]
fn test_destinations_roughly_uniform() {
    let counts: BTreeMap<String, u32> = BTreeMap::from([("A".to_string(), 4000)]);
    let mut generator = TrafficGenerator::new(TrafficSchedule::from([("s".to_string(), counts)]), nodes());
    let mut rng = RngManager::new(2024);

    let packets = generator.generate_for_slot("s", &mut rng);
    for destination in ["B", "C", "D", "E"] {
        let hits = packets.iter().filter(|p| p.destination() == destination).count();
        assert!((800..1200).contains(&hits), "{} drawn {} times", destination, hits);
    }
}
