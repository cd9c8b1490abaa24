// In-memory device with a fixed display/plane topology
//
// Used to exercise the probe without hardware: every query is answered from
// the topology, failures can be injected per query, and every call is counted.

use std::cell::Cell;

use ash::vk;

use super::device::{DisplayDevice, QueryResult};
use super::types::{
    DisplayHandle, DisplayInfo, DisplayModeInfo, Extent, ModeHandle, PlaneCapabilities, PlaneInfo,
    SurfaceDescriptor, SurfaceHandle,
};

const DISPLAY_HANDLE_BASE: u64 = 0x100;
const SURFACE_HANDLE_BASE: u64 = 0x5000;
const DEFAULT_MAX_EXTENT: Extent = Extent::new(8192, 8192);

/// Display of a simulated topology
#[derive(Debug, Clone, Default)]
pub struct SimDisplay {
    name: String,
    physical_dimensions: Extent,
    modes: Vec<(Extent, u32)>,
    mode_error: Option<vk::Result>,
}

impl SimDisplay {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            physical_dimensions: Extent::new(600, 340),
            ..Default::default()
        }
    }

    /// Add a mode; `refresh_rate` in millihertz
    pub fn mode(mut self, width: u32, height: u32, refresh_rate: u32) -> Self {
        self.modes.push((Extent::new(width, height), refresh_rate));
        self
    }

    /// Make the mode query for this display fail
    pub fn failing_modes(mut self, code: vk::Result) -> Self {
        self.mode_error = Some(code);
        self
    }
}

/// Plane of a simulated topology
#[derive(Debug, Clone, Default)]
pub struct SimPlane {
    current_display: Option<DisplayHandle>,
    stack_index: u32,
    supported: Vec<DisplayHandle>,
    capabilities: Option<PlaneCapabilities>,
    supported_error: Option<vk::Result>,
    capabilities_error: Option<vk::Result>,
}

impl SimPlane {
    pub fn unbound() -> Self {
        Self::default()
    }

    pub fn bound_to(display: DisplayHandle, stack_index: u32) -> Self {
        Self {
            current_display: Some(display),
            stack_index,
            ..Default::default()
        }
    }

    /// Add `display` to the set this plane can drive
    pub fn supports(mut self, display: DisplayHandle) -> Self {
        self.supported.push(display);
        self
    }

    /// Override the default (permissive) capability envelope
    pub fn capabilities(mut self, caps: PlaneCapabilities) -> Self {
        self.capabilities = Some(caps);
        self
    }

    pub fn failing_supported_displays(mut self, code: vk::Result) -> Self {
        self.supported_error = Some(code);
        self
    }

    pub fn failing_capabilities(mut self, code: vk::Result) -> Self {
        self.capabilities_error = Some(code);
        self
    }
}

/// How many times each query was issued
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub display_properties: u32,
    pub display_mode_properties: u32,
    pub display_plane_properties: u32,
    pub plane_supported_displays: u32,
    pub plane_capabilities: u32,
    pub surfaces_created: u32,
    pub surfaces_destroyed: u32,
}

impl CallCounts {
    /// Any plane-level query at all
    pub fn plane_queries(&self) -> u32 {
        self.display_plane_properties + self.plane_supported_displays + self.plane_capabilities
    }
}

#[derive(Default)]
struct Counters {
    display_properties: Cell<u32>,
    display_mode_properties: Cell<u32>,
    display_plane_properties: Cell<u32>,
    plane_supported_displays: Cell<u32>,
    plane_capabilities: Cell<u32>,
    surfaces_created: Cell<u32>,
    surfaces_destroyed: Cell<u32>,
}

fn bump(counter: &Cell<u32>) {
    counter.set(counter.get() + 1);
}

/// Device answering from a fixed topology
///
/// ```
/// use vkdisplayprobe::display::{SimDisplay, SimPlane, SimulatedDevice};
///
/// let d0 = SimulatedDevice::display_handle(0);
/// let device = SimulatedDevice::new()
///     .display(SimDisplay::new("DP-1").mode(1920, 1080, 60_000))
///     .plane(SimPlane::unbound().supports(d0));
/// ```
#[derive(Default)]
pub struct SimulatedDevice {
    displays: Vec<SimDisplay>,
    planes: Vec<SimPlane>,
    display_error: Option<vk::Result>,
    plane_error: Option<vk::Result>,
    surface_error: Option<vk::Result>,
    null_surface: bool,
    counters: Counters,
}

impl SimulatedDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle the `index`-th display added with [`Self::display`] will report.
    /// Indices past the topology make handles for displays this device does
    /// not expose (e.g. a display owned by another GPU).
    pub fn display_handle(index: usize) -> DisplayHandle {
        DisplayHandle(DISPLAY_HANDLE_BASE + index as u64)
    }

    /// Handle of mode `mode` of display `display`
    pub fn mode_handle(display: usize, mode: usize) -> ModeHandle {
        ModeHandle(((display as u64 + 1) << 16) | mode as u64)
    }

    pub fn display(mut self, display: SimDisplay) -> Self {
        self.displays.push(display);
        self
    }

    pub fn plane(mut self, plane: SimPlane) -> Self {
        self.planes.push(plane);
        self
    }

    pub fn failing_display_properties(mut self, code: vk::Result) -> Self {
        self.display_error = Some(code);
        self
    }

    pub fn failing_plane_properties(mut self, code: vk::Result) -> Self {
        self.plane_error = Some(code);
        self
    }

    pub fn failing_surface(mut self, code: vk::Result) -> Self {
        self.surface_error = Some(code);
        self
    }

    /// Report success from surface creation but hand back a null handle
    pub fn null_surface(mut self) -> Self {
        self.null_surface = true;
        self
    }

    pub fn calls(&self) -> CallCounts {
        let c = &self.counters;
        CallCounts {
            display_properties: c.display_properties.get(),
            display_mode_properties: c.display_mode_properties.get(),
            display_plane_properties: c.display_plane_properties.get(),
            plane_supported_displays: c.plane_supported_displays.get(),
            plane_capabilities: c.plane_capabilities.get(),
            surfaces_created: c.surfaces_created.get(),
            surfaces_destroyed: c.surfaces_destroyed.get(),
        }
    }

    fn find_display(&self, handle: DisplayHandle) -> Option<(usize, &SimDisplay)> {
        let index = handle.0.checked_sub(DISPLAY_HANDLE_BASE)? as usize;
        self.displays.get(index).map(|d| (index, d))
    }

    fn find_mode(&self, handle: ModeHandle) -> Option<Extent> {
        let display = (handle.0 >> 16).checked_sub(1)? as usize;
        let mode = (handle.0 & 0xFFFF) as usize;
        self.displays
            .get(display)?
            .modes
            .get(mode)
            .map(|&(extent, _)| extent)
    }
}

/// Copy `items` into `out` following the count/fetch contract
fn fill<T: Clone>(items: &[T], out: Option<&mut [T]>) -> QueryResult<u32> {
    match out {
        None => Ok(items.len() as u32),
        Some(buf) => {
            let n = buf.len().min(items.len());
            buf[..n].clone_from_slice(&items[..n]);
            Ok(n as u32)
        }
    }
}

impl DisplayDevice for SimulatedDevice {
    fn display_properties(&self, out: Option<&mut [DisplayInfo]>) -> QueryResult<u32> {
        bump(&self.counters.display_properties);
        if let Some(code) = self.display_error {
            return Err(code);
        }
        let infos: Vec<DisplayInfo> = self
            .displays
            .iter()
            .enumerate()
            .map(|(i, d)| DisplayInfo {
                handle: Self::display_handle(i),
                name: d.name.clone(),
                physical_dimensions: d.physical_dimensions,
                physical_resolution: d.modes.first().map(|m| m.0).unwrap_or_default(),
                supported_transforms: 0x1,
                plane_reorder_possible: false,
                persistent_content: false,
            })
            .collect();
        fill(&infos, out)
    }

    fn display_mode_properties(
        &self,
        display: DisplayHandle,
        out: Option<&mut [DisplayModeInfo]>,
    ) -> QueryResult<u32> {
        bump(&self.counters.display_mode_properties);
        let (index, sim) = self
            .find_display(display)
            .ok_or(vk::Result::ERROR_UNKNOWN)?;
        if let Some(code) = sim.mode_error {
            return Err(code);
        }
        let modes: Vec<DisplayModeInfo> = sim
            .modes
            .iter()
            .enumerate()
            .map(|(j, &(visible_region, refresh_rate))| DisplayModeInfo {
                handle: Self::mode_handle(index, j),
                visible_region,
                refresh_rate,
            })
            .collect();
        fill(&modes, out)
    }

    fn display_plane_properties(&self, out: Option<&mut [PlaneInfo]>) -> QueryResult<u32> {
        bump(&self.counters.display_plane_properties);
        if let Some(code) = self.plane_error {
            return Err(code);
        }
        let planes: Vec<PlaneInfo> = self
            .planes
            .iter()
            .map(|p| PlaneInfo {
                current_display: p.current_display,
                current_stack_index: p.stack_index,
            })
            .collect();
        fill(&planes, out)
    }

    fn plane_supported_displays(
        &self,
        plane_index: u32,
        out: Option<&mut [DisplayHandle]>,
    ) -> QueryResult<u32> {
        bump(&self.counters.plane_supported_displays);
        let plane = self
            .planes
            .get(plane_index as usize)
            .ok_or(vk::Result::ERROR_UNKNOWN)?;
        if let Some(code) = plane.supported_error {
            return Err(code);
        }
        fill(&plane.supported, out)
    }

    fn plane_capabilities(
        &self,
        mode: ModeHandle,
        plane_index: u32,
    ) -> QueryResult<PlaneCapabilities> {
        bump(&self.counters.plane_capabilities);
        let plane = self
            .planes
            .get(plane_index as usize)
            .ok_or(vk::Result::ERROR_UNKNOWN)?;
        if let Some(code) = plane.capabilities_error {
            return Err(code);
        }
        self.find_mode(mode).ok_or(vk::Result::ERROR_UNKNOWN)?;
        Ok(plane
            .capabilities
            .unwrap_or_else(|| PlaneCapabilities::permissive(DEFAULT_MAX_EXTENT)))
    }

    fn create_plane_surface(&self, descriptor: &SurfaceDescriptor) -> QueryResult<SurfaceHandle> {
        if let Some(code) = self.surface_error {
            return Err(code);
        }
        if self.find_mode(descriptor.mode).is_none()
            || descriptor.plane_index as usize >= self.planes.len()
        {
            return Err(vk::Result::ERROR_INITIALIZATION_FAILED);
        }
        if self.null_surface {
            return Ok(SurfaceHandle(0));
        }
        bump(&self.counters.surfaces_created);
        Ok(SurfaceHandle(
            SURFACE_HANDLE_BASE + u64::from(self.counters.surfaces_created.get()),
        ))
    }

    fn destroy_surface(&self, _surface: SurfaceHandle) {
        bump(&self.counters.surfaces_destroyed);
    }
}
