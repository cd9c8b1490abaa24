// Plane compatibility: supported displays + capability envelope per plane

use std::fmt;

use tracing::info;

use super::device::DisplayDevice;
use super::enumerate::read_two_call;
use super::types::{
    AlphaModes, DisplayHandle, Extent, ModeHandle, Offset, PlaneCapabilities, PlaneInfo,
};
use crate::error::{ProbeError, Result};

/// What the probe learned about one plane
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneReport {
    pub index: u32,
    pub plane: PlaneInfo,
    pub supported_displays: Vec<DisplayHandle>,
    /// Envelope for the candidate mode
    pub capabilities: PlaneCapabilities,
}

impl PlaneReport {
    pub fn supports(&self, display: DisplayHandle) -> bool {
        self.supported_displays.contains(&display)
    }
}

/// Query supported displays and capabilities of `plane_index` against `mode`.
///
/// Both queries are fatal on failure: without them a later bind cannot be
/// judged.
pub fn resolve_plane(
    device: &dyn DisplayDevice,
    plane_index: u32,
    plane: PlaneInfo,
    mode: ModeHandle,
) -> Result<PlaneReport> {
    let supported_displays = read_two_call(|out| device.plane_supported_displays(plane_index, out))
        .map_err(|code| ProbeError::SupportedDisplays {
            plane: plane_index,
            code,
        })?;

    match plane.current_display {
        Some(current) => info!(
            "Plane #{} supports {} displays, currently bound to display {} (stack index {})",
            plane_index,
            supported_displays.len(),
            current,
            plane.current_stack_index
        ),
        None => info!(
            "Plane #{} supports {} displays, currently unbound",
            plane_index,
            supported_displays.len()
        ),
    }

    let capabilities = device
        .plane_capabilities(mode, plane_index)
        .map_err(|code| ProbeError::PlaneCapabilities {
            plane: plane_index,
            code,
        })?;
    log_capabilities(&capabilities);

    Ok(PlaneReport {
        index: plane_index,
        plane,
        supported_displays,
        capabilities,
    })
}

fn log_capabilities(caps: &PlaneCapabilities) {
    info!(
        "  supportedAlpha: {} ({:#x})",
        caps.supported_alpha, caps.supported_alpha.0
    );
    info!("  minSrc={} {}", caps.min_src_position, caps.min_src_extent);
    info!("  maxSrc={} {}", caps.max_src_position, caps.max_src_extent);
    info!("  minDst={} {}", caps.min_dst_position, caps.min_dst_extent);
    info!("  maxDst={} {}", caps.max_dst_position, caps.max_dst_extent);
}

// ---------------------------------------------------------------------------
// Envelope check
// ---------------------------------------------------------------------------

/// Reason a plane's capability envelope does not admit the surface we are about to create
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeViolation {
    AlphaModeUnsupported {
        requested: AlphaModes,
        supported: AlphaModes,
    },
    SourceExtent {
        extent: Extent,
        min: Extent,
        max: Extent,
    },
    DestinationExtent {
        extent: Extent,
        min: Extent,
        max: Extent,
    },
    SourcePosition {
        min: Offset,
        max: Offset,
    },
    DestinationPosition {
        min: Offset,
        max: Offset,
    },
}

impl fmt::Display for EnvelopeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlphaModeUnsupported {
                requested,
                supported,
            } => write!(
                f,
                "alpha mode {} not in supported set {}",
                requested, supported
            ),
            Self::SourceExtent { extent, min, max } => {
                write!(f, "source extent {} outside [{}, {}]", extent, min, max)
            }
            Self::DestinationExtent { extent, min, max } => {
                write!(f, "destination extent {} outside [{}, {}]", extent, min, max)
            }
            Self::SourcePosition { min, max } => {
                write!(f, "source origin outside [({}), ({})]", min, max)
            }
            Self::DestinationPosition { min, max } => {
                write!(f, "destination origin outside [({}), ({})]", min, max)
            }
        }
    }
}

/// Check a full-screen surface of `extent` with `alpha_mode`, placed at the
/// origin, against `caps`. Returns every violation found, in a fixed order.
pub fn check_envelope(
    caps: &PlaneCapabilities,
    extent: Extent,
    alpha_mode: AlphaModes,
) -> Vec<EnvelopeViolation> {
    let mut violations = Vec::new();

    if !caps.supported_alpha.contains(alpha_mode) {
        violations.push(EnvelopeViolation::AlphaModeUnsupported {
            requested: alpha_mode,
            supported: caps.supported_alpha,
        });
    }
    if !extent.fits_within(caps.min_src_extent, caps.max_src_extent) {
        violations.push(EnvelopeViolation::SourceExtent {
            extent,
            min: caps.min_src_extent,
            max: caps.max_src_extent,
        });
    }
    if !extent.fits_within(caps.min_dst_extent, caps.max_dst_extent) {
        violations.push(EnvelopeViolation::DestinationExtent {
            extent,
            min: caps.min_dst_extent,
            max: caps.max_dst_extent,
        });
    }
    if !Offset::ORIGIN.fits_within(caps.min_src_position, caps.max_src_position) {
        violations.push(EnvelopeViolation::SourcePosition {
            min: caps.min_src_position,
            max: caps.max_src_position,
        });
    }
    if !Offset::ORIGIN.fits_within(caps.min_dst_position, caps.max_dst_position) {
        violations.push(EnvelopeViolation::DestinationPosition {
            min: caps.min_dst_position,
            max: caps.max_dst_position,
        });
    }

    violations
}
