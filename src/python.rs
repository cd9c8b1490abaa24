// PyO3 Python binding layer
//
// One function and one class:
// - probe(): runs a full probe pass against a physical device
// - ProbeSummary: read-only view of the selected display/mode/plane tuple
//
// Vulkan objects never cross into Python; the context lives only for the
// duration of the call.

use pyo3::prelude::*;

use self::api::probe;
use self::summary::ProbeSummary;

mod api;
mod helpers;
mod summary;

/// Vulkan direct-to-display probe
#[pymodule]
fn vkdisplayprobe(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ProbeSummary>()?;
    m.add_function(wrap_pyfunction!(probe, m)?)?;
    Ok(())
}
