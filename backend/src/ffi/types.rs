//! Type conversion utilities for FFI boundary
//!
//! Converts snapshots into PyDict trees matching their JSON shape.

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::orchestrator::{LinkSnapshot, Snapshot};

/// Convert a Snapshot to a Python dict
///
/// Keys match the serde field names: `current_slot`, `slot_index`, `nodes`,
/// `links`, `queues`, `is_running`.
pub fn snapshot_to_py(py: Python, snapshot: &Snapshot) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new_bound(py);

    dict.set_item("current_slot", &snapshot.current_slot)?;
    dict.set_item("slot_index", snapshot.slot_index)?;

    let nodes = PyDict::new_bound(py);
    for (node, stats) in &snapshot.nodes {
        let stats_dict = PyDict::new_bound(py);
        stats_dict.set_item("packets_generated", stats.packets_generated)?;
        stats_dict.set_item("packets_sent", stats.packets_sent)?;
        stats_dict.set_item("queue_size", stats.queue_size)?;
        nodes.set_item(node, stats_dict)?;
    }
    dict.set_item("nodes", nodes)?;

    let links = PyList::empty_bound(py);
    for link in &snapshot.links {
        links.append(link_to_py(py, link)?)?;
    }
    dict.set_item("links", links)?;

    let queues = PyDict::new_bound(py);
    for (node, len) in &snapshot.queues {
        queues.set_item(node, *len)?;
    }
    dict.set_item("queues", queues)?;

    dict.set_item("is_running", snapshot.is_running)?;

    Ok(dict.unbind())
}

fn link_to_py(py: Python, link: &LinkSnapshot) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("source", &link.source)?;
    dict.set_item("destination", &link.destination)?;
    dict.set_item("capacity", link.capacity)?;
    dict.set_item("current_load", link.current_load)?;
    dict.set_item("utilization_percent", link.utilization_percent)?;
    Ok(dict.unbind())
}
