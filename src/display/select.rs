// Selection policy: first display, its first mode, first eligible plane
//
// First-match, not best-match. Nothing here ranks candidates, and a display
// that cannot be served is never swapped for another one.

use super::enumerate::DisplayEntry;
use super::resolve::PlaneReport;
use super::types::{DisplayHandle, DisplayInfo, DisplayModeInfo, Extent, PlaneInfo};
use crate::error::{ProbeError, Result};

/// Display and mode chosen for the surface
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayChoice {
    pub display: DisplayInfo,
    pub mode: DisplayModeInfo,
}

impl DisplayChoice {
    /// Surface extent: the mode's visible region
    pub fn extent(&self) -> Extent {
        self.mode.visible_region
    }
}

/// Full tuple handed to the surface binder
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub display: DisplayInfo,
    pub mode: DisplayModeInfo,
    pub plane_index: u32,
    pub plane_stack_index: u32,
    pub extent: Extent,
}

/// Display #0 and its mode #0.
///
/// Fails when there is no display or display #0 has no modes (including when
/// its mode query failed); later displays are never considered.
pub fn choose_display_and_mode(entries: &[DisplayEntry]) -> Result<DisplayChoice> {
    let first = entries.first().ok_or(ProbeError::NoDisplayMode)?;
    let mode = first.modes.first().ok_or(ProbeError::NoDisplayMode)?;
    Ok(DisplayChoice {
        display: first.info.clone(),
        mode: *mode,
    })
}

/// A plane may carry the chosen display if it can drive it and is not busy
/// serving some other display.
pub fn is_plane_eligible(
    plane: &PlaneInfo,
    supported_displays: &[DisplayHandle],
    display: DisplayHandle,
) -> bool {
    let free_or_ours = match plane.current_display {
        None => true,
        Some(current) => current == display,
    };
    free_or_ours && supported_displays.contains(&display)
}

/// First eligible plane in `reports`, in index order.
pub fn choose_plane(reports: &[PlaneReport], display: DisplayHandle) -> Option<&PlaneReport> {
    reports
        .iter()
        .find(|r| is_plane_eligible(&r.plane, &r.supported_displays, display))
}

impl Selection {
    pub fn new(choice: &DisplayChoice, plane: &PlaneReport) -> Self {
        Self {
            display: choice.display.clone(),
            mode: choice.mode,
            plane_index: plane.index,
            plane_stack_index: plane.plane.current_stack_index,
            extent: choice.extent(),
        }
    }
}
