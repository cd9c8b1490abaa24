// Surface binder: create a display-plane surface for the selection, then release it

use tracing::info;

use super::device::DisplayDevice;
use super::select::Selection;
use super::types::{AlphaModes, SurfaceDescriptor, SurfaceHandle, SurfaceTransform};
use crate::error::{ProbeError, Result};

/// Alpha mode the probe always binds with
pub const SURFACE_ALPHA_MODE: AlphaModes = AlphaModes::OPAQUE;

/// Descriptor for the selection: inherited transform, opaque, global alpha 1.0,
/// extent = the mode's visible region.
pub fn surface_descriptor(selection: &Selection) -> SurfaceDescriptor {
    SurfaceDescriptor {
        mode: selection.mode.handle,
        plane_index: selection.plane_index,
        plane_stack_index: selection.plane_stack_index,
        transform: SurfaceTransform::Inherit,
        global_alpha: 1.0,
        alpha_mode: SURFACE_ALPHA_MODE,
        image_extent: selection.extent,
    }
}

/// Surface created by [`bind_surface`], destroyed on drop
pub struct BoundSurface<'a> {
    device: &'a dyn DisplayDevice,
    handle: SurfaceHandle,
}

impl BoundSurface<'_> {
    pub fn handle(&self) -> SurfaceHandle {
        self.handle
    }

    /// Destroy now and hand back the (no longer valid) handle for reporting
    pub fn release(self) -> SurfaceHandle {
        self.handle
    }
}

impl Drop for BoundSurface<'_> {
    fn drop(&mut self) {
        self.device.destroy_surface(self.handle);
    }
}

/// Create a surface for `selection`. A non-success result or a null handle is fatal.
pub fn bind_surface<'a>(
    device: &'a dyn DisplayDevice,
    selection: &Selection,
) -> Result<BoundSurface<'a>> {
    let descriptor = surface_descriptor(selection);
    let handle = device
        .create_plane_surface(&descriptor)
        .map_err(ProbeError::SurfaceCreation)?;
    if handle.is_null() {
        return Err(ProbeError::SurfaceCreation(ash::vk::Result::SUCCESS));
    }

    info!("Created surface {}", handle);
    Ok(BoundSurface { device, handle })
}
