use pyo3::exceptions::PyRuntimeError;
use pyo3::prelude::*;

use crate::display::{EnvelopePolicy, PlaneScan};

pub(super) fn parse_plane_scan(mode: &str) -> PyResult<PlaneScan> {
    PlaneScan::from_mode(mode).ok_or_else(|| {
        PyRuntimeError::new_err(format!(
            "invalid plane_scan '{}': expected 'full' or 'first-match'",
            mode
        ))
    })
}

pub(super) fn parse_envelope(mode: &str) -> PyResult<EnvelopePolicy> {
    EnvelopePolicy::from_mode(mode).ok_or_else(|| {
        PyRuntimeError::new_err(format!(
            "invalid envelope '{}': expected 'report' or 'enforce'",
            mode
        ))
    })
}

/// Surface probe warnings through Python's `warnings` module
pub(super) fn emit_warnings(py: Python<'_>, warnings: &[String]) -> PyResult<()> {
    if warnings.is_empty() {
        return Ok(());
    }
    let module = py.import("warnings")?;
    for msg in warnings {
        module.call_method1("warn", (msg.as_str(),))?;
    }
    Ok(())
}
