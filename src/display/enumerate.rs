// Display, mode and plane enumeration over the count/fetch protocol

use ash::vk;
use tracing::{debug, info, warn};

use super::device::{DisplayDevice, QueryResult};
use super::types::{DisplayInfo, DisplayModeInfo, PlaneInfo};
use crate::error::{ProbeError, Result};

// ---------------------------------------------------------------------------
// Count/fetch helper
// ---------------------------------------------------------------------------

/// Run a count/fetch query and collect the entries.
///
/// The first call (no buffer) yields the count, the second fills a buffer of
/// that size. If the live count shrank in between, the result is truncated to
/// what the second call actually wrote; if it grew, the extra entries are lost
/// for this run. Either call failing fails the whole read.
pub fn read_two_call<T, F>(mut query: F) -> QueryResult<Vec<T>>
where
    T: Clone + Default,
    F: FnMut(Option<&mut [T]>) -> QueryResult<u32>,
{
    let count = query(None)? as usize;
    let mut items = vec![T::default(); count];
    if count == 0 {
        return Ok(items);
    }

    let written = query(Some(&mut items))? as usize;
    if written < count {
        debug!("Count dropped from {} to {} between calls", count, written);
    }
    items.truncate(written.min(count));
    Ok(items)
}

// ---------------------------------------------------------------------------
// Displays
// ---------------------------------------------------------------------------

/// All displays of the device, in driver order. Query failure is fatal.
pub fn enumerate_displays(device: &dyn DisplayDevice) -> Result<Vec<DisplayInfo>> {
    let displays =
        read_two_call(|out| device.display_properties(out)).map_err(ProbeError::DisplayProperties)?;

    info!("Display count: {}", displays.len());
    for (i, disp) in displays.iter().enumerate() {
        info!(
            "Display #{}: display: {} name: {} dimensions: {} resolution: {}",
            i, disp.handle, disp.name, disp.physical_dimensions, disp.physical_resolution
        );
        debug!(
            "  supportedTransforms: {:#x} planeReorderPossible: {} persistentContent: {}",
            disp.supported_transforms, disp.plane_reorder_possible, disp.persistent_content
        );
    }

    Ok(displays)
}

// ---------------------------------------------------------------------------
// Modes
// ---------------------------------------------------------------------------

/// A display together with the outcome of its mode query
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayEntry {
    pub info: DisplayInfo,
    /// Empty when the display has no modes or its mode query failed
    pub modes: Vec<DisplayModeInfo>,
    /// Set when the mode query failed
    pub mode_error: Option<vk::Result>,
}

/// Modes of a single display
pub fn enumerate_modes(
    device: &dyn DisplayDevice,
    display: &DisplayInfo,
) -> QueryResult<Vec<DisplayModeInfo>> {
    read_two_call(|out| device.display_mode_properties(display.handle, out))
}

/// Modes of every display.
///
/// A failing display is logged and skipped; the remaining displays are still
/// queried.
pub fn enumerate_all_modes(
    device: &dyn DisplayDevice,
    displays: Vec<DisplayInfo>,
) -> Vec<DisplayEntry> {
    displays
        .into_iter()
        .enumerate()
        .map(|(i, info)| match enumerate_modes(device, &info) {
            Ok(modes) => {
                for (j, mode) in modes.iter().enumerate() {
                    info!(
                        "  Display #{} mode #{}: mode: {} visibleRegion: {} refreshRate: {}",
                        i, j, mode.handle, mode.visible_region, mode.refresh_rate
                    );
                }
                DisplayEntry {
                    info,
                    modes,
                    mode_error: None,
                }
            }
            Err(code) => {
                warn!("Failed to get modes for display #{}: {}", i, code);
                DisplayEntry {
                    info,
                    modes: Vec::new(),
                    mode_error: Some(code),
                }
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Planes
// ---------------------------------------------------------------------------

/// All planes of the device; index in the returned list is the plane index.
/// Query failure is fatal.
pub fn enumerate_planes(device: &dyn DisplayDevice) -> Result<Vec<PlaneInfo>> {
    let planes = read_two_call(|out| device.display_plane_properties(out))
        .map_err(ProbeError::PlaneProperties)?;
    info!("Plane count: {}", planes.len());
    Ok(planes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_two_call_sizes_buffer_from_count() {
        let source = [10u32, 20, 30];
        let mut calls = 0;
        let items = read_two_call(|out: Option<&mut [u32]>| {
            calls += 1;
            match out {
                None => Ok(source.len() as u32),
                Some(buf) => {
                    assert_eq!(buf.len(), 3, "Buffer should match the counted size");
                    buf.copy_from_slice(&source);
                    Ok(3)
                }
            }
        })
        .unwrap();
        assert_eq!(items, vec![10, 20, 30]);
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_read_two_call_skips_fetch_when_empty() {
        let mut calls = 0;
        let items: Vec<u32> = read_two_call(|out: Option<&mut [u32]>| {
            calls += 1;
            assert!(out.is_none(), "No fetch for an empty list");
            Ok(0)
        })
        .unwrap();
        assert!(items.is_empty());
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_read_two_call_truncates_when_count_shrinks() {
        let items = read_two_call(|out: Option<&mut [u32]>| match out {
            None => Ok(4),
            Some(buf) => {
                buf[0] = 7;
                Ok(1)
            }
        })
        .unwrap();
        assert_eq!(items, vec![7]);
    }

    #[test]
    fn test_read_two_call_propagates_either_failure() {
        let count_err: QueryResult<Vec<u32>> =
            read_two_call(|_| Err(vk::Result::ERROR_OUT_OF_HOST_MEMORY));
        assert_eq!(count_err, Err(vk::Result::ERROR_OUT_OF_HOST_MEMORY));

        let fetch_err: QueryResult<Vec<u32>> = read_two_call(|out| match out {
            None => Ok(2),
            Some(_) => Err(vk::Result::ERROR_DEVICE_LOST),
        });
        assert_eq!(fetch_err, Err(vk::Result::ERROR_DEVICE_LOST));
    }
}
