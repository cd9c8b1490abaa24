use pyo3::prelude::*;

use crate::probe::ProbeReport;

/// Result of a successful probe
///
/// Describes the display, mode and plane the surface was created with.
/// The surface itself has already been destroyed.
#[pyclass(frozen)]
pub(crate) struct ProbeSummary {
    /// Driver-reported display name
    #[pyo3(get)]
    display_name: String,
    /// Number of displays the device exposes
    #[pyo3(get)]
    display_count: usize,
    /// Chosen mode width (pixels)
    #[pyo3(get)]
    width: u32,
    /// Chosen mode height (pixels)
    #[pyo3(get)]
    height: u32,
    /// Chosen mode refresh rate (millihertz)
    #[pyo3(get)]
    refresh_rate: u32,
    /// Number of planes the device exposes
    #[pyo3(get)]
    plane_count: usize,
    /// Selected plane index
    #[pyo3(get)]
    plane_index: u32,
    /// Stack index the surface was created at
    #[pyo3(get)]
    plane_stack_index: u32,
    /// Non-fatal findings, one string each
    #[pyo3(get)]
    pub(super) warnings: Vec<String>,
}

impl From<&ProbeReport> for ProbeSummary {
    fn from(report: &ProbeReport) -> Self {
        let s = &report.selection;
        Self {
            display_name: s.display.name.clone(),
            display_count: report.displays.len(),
            width: s.extent.width,
            height: s.extent.height,
            refresh_rate: s.mode.refresh_rate,
            plane_count: report.plane_count,
            plane_index: s.plane_index,
            plane_stack_index: s.plane_stack_index,
            warnings: report.warnings.iter().map(ToString::to_string).collect(),
        }
    }
}

#[pymethods]
impl ProbeSummary {
    fn __repr__(&self) -> String {
        format!(
            "ProbeSummary(display='{}', mode={}x{}@{}, plane={})",
            self.display_name, self.width, self.height, self.refresh_rate, self.plane_index
        )
    }
}
