use pyo3::exceptions::PyRuntimeError;
use pyo3::prelude::*;

use super::helpers::{emit_warnings, parse_envelope, parse_plane_scan};
use super::summary::ProbeSummary;
use crate::display::ProbeOptions;
use crate::probe::run_probe;
use crate::vulkan::{InstanceOptions, VulkanContext};

/// Run one probe pass: enumerate, select, create and destroy a surface
///
/// Releases the GIL while talking to the driver.
///
/// Args:
///     device: Physical device index, defaults to 0
///     validation: Enable a validation layer if installed, defaults to true
///     plane_scan: "full" or "first-match"
///     envelope: "report" or "enforce"
///
/// Returns:
///     ProbeSummary: The selected display/mode/plane tuple
///
/// Raises:
///     RuntimeError: Setup failed or the probe hit a fatal condition
#[pyfunction]
#[pyo3(signature = (device=0, validation=true, plane_scan="full", envelope="report"))]
pub(crate) fn probe(
    py: Python<'_>,
    device: usize,
    validation: bool,
    plane_scan: &str,
    envelope: &str,
) -> PyResult<ProbeSummary> {
    let options = ProbeOptions {
        plane_scan: parse_plane_scan(plane_scan)?,
        envelope: parse_envelope(envelope)?,
    };
    let instance_options = InstanceOptions {
        device_index: device,
        validation,
    };

    let summary = py
        .detach(|| -> anyhow::Result<ProbeSummary> {
            let ctx = VulkanContext::create(&instance_options)?;
            let report = run_probe(&ctx.display_device(), &options)?;
            Ok(ProbeSummary::from(&report))
        })
        .map_err(|e| PyRuntimeError::new_err(format!("{:#}", e)))?;

    emit_warnings(py, &summary.warnings)?;
    Ok(summary)
}
