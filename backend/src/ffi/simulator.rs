//! PyO3 wrapper for SimulationEngine
//!
//! # Example (from Python)
//!
//! ```python
//! from network_simulator_core_rs import Simulator
//!
//! sim = Simulator()              # reference topology
//! status = sim.advance_slot()    # or sim.advance_slot("08:30")
//! print(status["current_slot"], status["queues"])
//! ```

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::types::snapshot_to_py;
use crate::orchestrator::{SimulationEngine, SimulatorConfig};

/// Python wrapper for the Rust engine
///
/// Python objects are only touched with the GIL held, which serializes every
/// call into the engine.
#[pyclass(name = "Simulator")]
pub struct PySimulator {
    inner: SimulationEngine,
}

#[pymethods]
impl PySimulator {
    /// Create a simulator from an optional JSON configuration string
    ///
    /// # Errors
    ///
    /// Raises ValueError if the configuration cannot be parsed or is invalid.
    #[new]
    #[pyo3(signature = (config_json=None))]
    fn new(config_json: Option<&str>) -> PyResult<Self> {
        let config = match config_json {
            Some(json) => SimulatorConfig::from_json_str(json)
                .map_err(|e| PyValueError::new_err(e.to_string()))?,
            None => SimulatorConfig::default(),
        };

        let inner = SimulationEngine::new(config)
            .map_err(|e| PyValueError::new_err(format!("Failed to create simulator: {}", e)))?;

        Ok(PySimulator { inner })
    }

    /// Simulate one slot (the current one unless `slot` is given)
    #[pyo3(signature = (slot=None))]
    fn advance_slot(&mut self, py: Python, slot: Option<&str>) -> PyResult<Py<PyDict>> {
        let snapshot = self.inner.advance_slot(slot);
        snapshot_to_py(py, &snapshot)
    }

    /// Current status without advancing
    fn status(&self, py: Python) -> PyResult<Py<PyDict>> {
        snapshot_to_py(py, &self.inner.snapshot())
    }

    /// Reinitialize and return the fresh status
    fn reset(&mut self, py: Python) -> PyResult<Py<PyDict>> {
        let snapshot = self.inner.reset();
        snapshot_to_py(py, &snapshot)
    }

    fn current_slot(&self) -> String {
        self.inner.current_slot().to_string()
    }
}
