// Probe pipeline: displays → modes → planes → compatibility → selection → surface bind/release
//
// One forward pass, no retries. Every fatal condition surfaces as a
// `ProbeError`; only the caller decides whether that ends the process.

use std::fmt;

use ash::vk;
use tracing::{debug, info, warn};

use crate::display::surface::SURFACE_ALPHA_MODE;
use crate::display::{
    bind_surface, check_envelope, choose_display_and_mode, choose_plane, enumerate_all_modes,
    enumerate_displays, enumerate_planes, is_plane_eligible, resolve_plane, DisplayDevice,
    DisplayEntry, EnvelopePolicy, EnvelopeViolation, PlaneReport, PlaneScan, ProbeOptions,
    Selection, SurfaceHandle,
};
use crate::error::{ProbeError, Result};

/// Position in the probe state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStage {
    Init,
    EnumerateDisplays,
    EnumerateModesPerDisplay,
    EnumeratePlanes,
    ResolveCompatibility,
    SelectTuple,
    BindSurface,
    ReleaseSurface,
    Exit,
}

/// Non-fatal finding recorded during the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeWarning {
    /// Modes of this display could not be read; the display was skipped
    ModeQuery { display_index: usize, code: vk::Result },
    /// Selected plane's envelope does not admit the surface (report mode only)
    Envelope {
        plane: u32,
        violation: EnvelopeViolation,
    },
}

impl fmt::Display for ProbeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModeQuery {
                display_index,
                code,
            } => write!(f, "failed to get modes for display #{display_index}: {code}"),
            Self::Envelope { plane, violation } => write!(f, "plane #{plane}: {violation}"),
        }
    }
}

/// Outcome of a successful probe
#[derive(Debug, Clone)]
pub struct ProbeReport {
    /// Every display with its modes (or the reason it has none)
    pub displays: Vec<DisplayEntry>,
    /// Number of planes the device reported
    pub plane_count: usize,
    /// Planes that were resolved, in index order. With [`PlaneScan::FirstMatch`]
    /// this stops at the selected plane.
    pub planes: Vec<PlaneReport>,
    pub selection: Selection,
    /// Handle of the probe surface; already destroyed
    pub surface: SurfaceHandle,
    pub warnings: Vec<ProbeWarning>,
}

impl ProbeReport {
    /// One line per selection component
    pub fn log_summary(&self) {
        let s = &self.selection;
        info!(
            "Display: {} ({}) of {}",
            s.display.handle,
            s.display.name,
            self.displays.len()
        );
        info!(
            "Mode: {} {} @ {}",
            s.mode.handle, s.mode.visible_region, s.mode.refresh_rate
        );
        info!(
            "Plane: #{} (stack index {}) of {}",
            s.plane_index, s.plane_stack_index, self.plane_count
        );
        info!("Surface: {} extent {} (released)", self.surface, s.extent);
        if !self.warnings.is_empty() {
            info!("Warnings: {}", self.warnings.len());
        }
    }
}

fn enter(stage: ProbeStage) {
    debug!(?stage, "probe stage");
}

/// Run the whole probe once against `device`.
pub fn run_probe(device: &dyn DisplayDevice, options: &ProbeOptions) -> Result<ProbeReport> {
    enter(ProbeStage::Init);

    enter(ProbeStage::EnumerateDisplays);
    let displays = enumerate_displays(device)?;

    enter(ProbeStage::EnumerateModesPerDisplay);
    let entries = enumerate_all_modes(device, displays);
    let mut warnings: Vec<ProbeWarning> = entries
        .iter()
        .enumerate()
        .filter_map(|(display_index, e)| {
            e.mode_error.map(|code| ProbeWarning::ModeQuery {
                display_index,
                code,
            })
        })
        .collect();

    // Plane capabilities are queried against a concrete mode, so display and
    // mode are fixed before any plane is looked at.
    let choice = choose_display_and_mode(&entries)?;
    info!(
        "Chose display {} mode {} ({} @ {})",
        choice.display.handle,
        choice.mode.handle,
        choice.mode.visible_region,
        choice.mode.refresh_rate
    );

    enter(ProbeStage::EnumeratePlanes);
    let planes = enumerate_planes(device)?;

    enter(ProbeStage::ResolveCompatibility);
    let mut reports = Vec::with_capacity(planes.len());
    for (i, plane) in planes.iter().enumerate() {
        let report = resolve_plane(device, i as u32, *plane, choice.mode.handle)?;
        let eligible =
            is_plane_eligible(&report.plane, &report.supported_displays, choice.display.handle);
        reports.push(report);
        if eligible && options.plane_scan == PlaneScan::FirstMatch {
            break;
        }
    }

    enter(ProbeStage::SelectTuple);
    let plane = choose_plane(&reports, choice.display.handle).ok_or(ProbeError::NoSuitablePlane)?;
    info!("Using plane #{}", plane.index);
    let selection = Selection::new(&choice, plane);

    for violation in check_envelope(&plane.capabilities, selection.extent, SURFACE_ALPHA_MODE) {
        match options.envelope {
            EnvelopePolicy::Enforce => {
                return Err(ProbeError::Envelope {
                    plane: plane.index,
                    violation,
                });
            }
            EnvelopePolicy::Report => {
                warn!("Plane #{}: {}", plane.index, violation);
                warnings.push(ProbeWarning::Envelope {
                    plane: plane.index,
                    violation,
                });
            }
        }
    }

    enter(ProbeStage::BindSurface);
    let surface = bind_surface(device, &selection)?;

    enter(ProbeStage::ReleaseSurface);
    let surface = surface.release();

    enter(ProbeStage::Exit);
    Ok(ProbeReport {
        displays: entries,
        plane_count: planes.len(),
        planes: reports,
        selection,
        surface,
        warnings,
    })
}
