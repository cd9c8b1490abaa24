// Device seam: the raw queries the probe issues against a physical device

use ash::vk;

use super::types::{
    DisplayHandle, DisplayInfo, DisplayModeInfo, ModeHandle, PlaneCapabilities, PlaneInfo,
    SurfaceDescriptor, SurfaceHandle,
};

/// Result of a single device query, carrying the driver's result code on failure
pub type QueryResult<T> = std::result::Result<T, vk::Result>;

/// Direct-display queries on one physical device.
///
/// The list queries follow the count/fetch protocol: with `out == None` they
/// return the number of available entries; with a buffer they fill at most
/// `out.len()` entries and return how many were written. A fetch whose buffer
/// was too small for the live count (`VK_INCOMPLETE`) still reports success.
///
/// Implemented by [`crate::vulkan::VulkanDisplayDevice`] for real hardware and
/// [`crate::display::SimulatedDevice`] for fixed topologies.
pub trait DisplayDevice {
    /// `vkGetPhysicalDeviceDisplayPropertiesKHR`
    fn display_properties(&self, out: Option<&mut [DisplayInfo]>) -> QueryResult<u32>;

    /// `vkGetDisplayModePropertiesKHR`
    fn display_mode_properties(
        &self,
        display: DisplayHandle,
        out: Option<&mut [DisplayModeInfo]>,
    ) -> QueryResult<u32>;

    /// `vkGetPhysicalDeviceDisplayPlanePropertiesKHR`
    fn display_plane_properties(&self, out: Option<&mut [PlaneInfo]>) -> QueryResult<u32>;

    /// `vkGetDisplayPlaneSupportedDisplaysKHR`
    fn plane_supported_displays(
        &self,
        plane_index: u32,
        out: Option<&mut [DisplayHandle]>,
    ) -> QueryResult<u32>;

    /// `vkGetDisplayPlaneCapabilitiesKHR`
    fn plane_capabilities(&self, mode: ModeHandle, plane_index: u32)
        -> QueryResult<PlaneCapabilities>;

    /// `vkCreateDisplayPlaneSurfaceKHR`
    fn create_plane_surface(&self, descriptor: &SurfaceDescriptor) -> QueryResult<SurfaceHandle>;

    /// `vkDestroySurfaceKHR`
    fn destroy_surface(&self, surface: SurfaceHandle);
}
