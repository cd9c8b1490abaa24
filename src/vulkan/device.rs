// DisplayDevice over a real physical device, via the resolved VK_KHR_display tables

use std::ffi::CStr;
use std::ptr;

use ash::vk::{self, Handle};

use super::DisplayFns;
use crate::display::{
    AlphaModes, DisplayDevice, DisplayHandle, DisplayInfo, DisplayModeInfo, Extent, ModeHandle,
    Offset, PlaneCapabilities, PlaneInfo, QueryResult, SurfaceDescriptor, SurfaceHandle,
    SurfaceTransform,
};

/// Queries against one physical device, borrowing the context's function tables
pub struct VulkanDisplayDevice<'a> {
    fns: &'a DisplayFns,
    physical_device: vk::PhysicalDevice,
}

impl<'a> VulkanDisplayDevice<'a> {
    pub fn new(fns: &'a DisplayFns, physical_device: vk::PhysicalDevice) -> Self {
        Self {
            fns,
            physical_device,
        }
    }
}

// ---------------------------------------------------------------------------
// Result / struct conversion
// ---------------------------------------------------------------------------

/// `VK_INCOMPLETE` only means the buffer was smaller than the live count
fn check_vk(result: vk::Result) -> QueryResult<()> {
    match result {
        vk::Result::SUCCESS | vk::Result::INCOMPLETE => Ok(()),
        err => Err(err),
    }
}

/// Count/fetch adapter: `call` receives the count in/out pointer and the raw
/// buffer (null for the count call); fetched entries are converted into `out`.
fn count_or_fill<R, T>(
    out: Option<&mut [T]>,
    call: impl FnOnce(&mut u32, *mut R) -> vk::Result,
    convert: impl Fn(&R) -> T,
) -> QueryResult<u32>
where
    R: Clone + Default,
{
    match out {
        None => {
            let mut count = 0;
            check_vk(call(&mut count, ptr::null_mut()))?;
            Ok(count)
        }
        Some(buf) => {
            let mut raw = vec![R::default(); buf.len()];
            let mut count = buf.len() as u32;
            check_vk(call(&mut count, raw.as_mut_ptr()))?;
            let written = (count as usize).min(buf.len());
            for (dst, src) in buf.iter_mut().zip(&raw[..written]) {
                *dst = convert(src);
            }
            Ok(written as u32)
        }
    }
}

fn extent(e: vk::Extent2D) -> Extent {
    Extent::new(e.width, e.height)
}

fn offset(o: vk::Offset2D) -> Offset {
    Offset::new(o.x, o.y)
}

fn display_handle(display: vk::DisplayKHR) -> Option<DisplayHandle> {
    (display != vk::DisplayKHR::null()).then(|| DisplayHandle(display.as_raw()))
}

fn display_info(raw: &vk::DisplayPropertiesKHR<'_>) -> DisplayInfo {
    let name = if raw.display_name.is_null() {
        String::new()
    } else {
        // SAFETY: driver-owned NUL-terminated string, valid while the instance lives.
        unsafe { CStr::from_ptr(raw.display_name) }
            .to_string_lossy()
            .into_owned()
    };
    DisplayInfo {
        handle: DisplayHandle(raw.display.as_raw()),
        name,
        physical_dimensions: extent(raw.physical_dimensions),
        physical_resolution: extent(raw.physical_resolution),
        supported_transforms: raw.supported_transforms.as_raw(),
        plane_reorder_possible: raw.plane_reorder_possible == vk::TRUE,
        persistent_content: raw.persistent_content == vk::TRUE,
    }
}

fn mode_info(raw: &vk::DisplayModePropertiesKHR) -> DisplayModeInfo {
    DisplayModeInfo {
        handle: ModeHandle(raw.display_mode.as_raw()),
        visible_region: extent(raw.parameters.visible_region),
        refresh_rate: raw.parameters.refresh_rate,
    }
}

fn plane_info(raw: &vk::DisplayPlanePropertiesKHR) -> PlaneInfo {
    PlaneInfo {
        current_display: display_handle(raw.current_display),
        current_stack_index: raw.current_stack_index,
    }
}

fn plane_capabilities(raw: &vk::DisplayPlaneCapabilitiesKHR) -> PlaneCapabilities {
    PlaneCapabilities {
        supported_alpha: AlphaModes(raw.supported_alpha.as_raw()),
        min_src_position: offset(raw.min_src_position),
        max_src_position: offset(raw.max_src_position),
        min_src_extent: extent(raw.min_src_extent),
        max_src_extent: extent(raw.max_src_extent),
        min_dst_position: offset(raw.min_dst_position),
        max_dst_position: offset(raw.max_dst_position),
        min_dst_extent: extent(raw.min_dst_extent),
        max_dst_extent: extent(raw.max_dst_extent),
    }
}

fn transform(t: SurfaceTransform) -> vk::SurfaceTransformFlagsKHR {
    match t {
        SurfaceTransform::Inherit => vk::SurfaceTransformFlagsKHR::INHERIT,
        SurfaceTransform::Identity => vk::SurfaceTransformFlagsKHR::IDENTITY,
    }
}

// ---------------------------------------------------------------------------
// DisplayDevice
// ---------------------------------------------------------------------------

impl DisplayDevice for VulkanDisplayDevice<'_> {
    fn display_properties(&self, out: Option<&mut [DisplayInfo]>) -> QueryResult<u32> {
        let fp = self.fns.display.fp();
        count_or_fill(
            out,
            // SAFETY: count/buffer pointers are valid for the call; buffer holds `*count` entries.
            |count, buf| unsafe {
                (fp.get_physical_device_display_properties_khr)(self.physical_device, count, buf)
            },
            display_info,
        )
    }

    fn display_mode_properties(
        &self,
        display: DisplayHandle,
        out: Option<&mut [DisplayModeInfo]>,
    ) -> QueryResult<u32> {
        let fp = self.fns.display.fp();
        let display = vk::DisplayKHR::from_raw(display.0);
        count_or_fill(
            out,
            // SAFETY: as above; `display` came from this physical device.
            |count, buf| unsafe {
                (fp.get_display_mode_properties_khr)(self.physical_device, display, count, buf)
            },
            mode_info,
        )
    }

    fn display_plane_properties(&self, out: Option<&mut [PlaneInfo]>) -> QueryResult<u32> {
        let fp = self.fns.display.fp();
        count_or_fill(
            out,
            // SAFETY: as above.
            |count, buf| unsafe {
                (fp.get_physical_device_display_plane_properties_khr)(
                    self.physical_device,
                    count,
                    buf,
                )
            },
            plane_info,
        )
    }

    fn plane_supported_displays(
        &self,
        plane_index: u32,
        out: Option<&mut [DisplayHandle]>,
    ) -> QueryResult<u32> {
        let fp = self.fns.display.fp();
        count_or_fill(
            out,
            // SAFETY: as above.
            |count, buf| unsafe {
                (fp.get_display_plane_supported_displays_khr)(
                    self.physical_device,
                    plane_index,
                    count,
                    buf,
                )
            },
            |d: &vk::DisplayKHR| DisplayHandle(d.as_raw()),
        )
    }

    fn plane_capabilities(
        &self,
        mode: ModeHandle,
        plane_index: u32,
    ) -> QueryResult<PlaneCapabilities> {
        let fp = self.fns.display.fp();
        let mut caps = vk::DisplayPlaneCapabilitiesKHR::default();
        // SAFETY: `caps` is a valid out-pointer; `mode` belongs to a display of this device.
        let result = unsafe {
            (fp.get_display_plane_capabilities_khr)(
                self.physical_device,
                vk::DisplayModeKHR::from_raw(mode.0),
                plane_index,
                &mut caps,
            )
        };
        check_vk(result)?;
        Ok(plane_capabilities(&caps))
    }

    fn create_plane_surface(&self, descriptor: &SurfaceDescriptor) -> QueryResult<SurfaceHandle> {
        let create_info = vk::DisplaySurfaceCreateInfoKHR::default()
            .display_mode(vk::DisplayModeKHR::from_raw(descriptor.mode.0))
            .plane_index(descriptor.plane_index)
            .plane_stack_index(descriptor.plane_stack_index)
            .transform(transform(descriptor.transform))
            .global_alpha(descriptor.global_alpha)
            .alpha_mode(vk::DisplayPlaneAlphaFlagsKHR::from_raw(
                descriptor.alpha_mode.0,
            ))
            .image_extent(vk::Extent2D {
                width: descriptor.image_extent.width,
                height: descriptor.image_extent.height,
            });

        // SAFETY: create_info is fully initialised and outlives the call.
        let surface = unsafe {
            self.fns
                .display
                .create_display_plane_surface(&create_info, None)
        }?;
        Ok(SurfaceHandle(surface.as_raw()))
    }

    fn destroy_surface(&self, surface: SurfaceHandle) {
        // SAFETY: the surface was created by this instance and is not used afterwards.
        unsafe {
            self.fns
                .surface
                .destroy_surface(vk::SurfaceKHR::from_raw(surface.0), None)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_vk_treats_incomplete_as_success() {
        assert_eq!(check_vk(vk::Result::SUCCESS), Ok(()));
        assert_eq!(check_vk(vk::Result::INCOMPLETE), Ok(()));
        assert_eq!(
            check_vk(vk::Result::ERROR_OUT_OF_HOST_MEMORY),
            Err(vk::Result::ERROR_OUT_OF_HOST_MEMORY)
        );
    }

    #[test]
    fn test_unbound_plane_has_no_display() {
        let raw = vk::DisplayPlanePropertiesKHR {
            current_display: vk::DisplayKHR::null(),
            current_stack_index: 3,
        };
        let info = plane_info(&raw);
        assert_eq!(info.current_display, None);
        assert_eq!(info.current_stack_index, 3);

        let bound = vk::DisplayPlanePropertiesKHR {
            current_display: vk::DisplayKHR::from_raw(0x42),
            current_stack_index: 0,
        };
        assert_eq!(
            plane_info(&bound).current_display,
            Some(DisplayHandle(0x42))
        );
    }

    #[test]
    fn test_display_info_without_name() {
        let raw = vk::DisplayPropertiesKHR {
            display: vk::DisplayKHR::from_raw(0x7),
            physical_dimensions: vk::Extent2D {
                width: 527,
                height: 296,
            },
            physical_resolution: vk::Extent2D {
                width: 2560,
                height: 1440,
            },
            plane_reorder_possible: vk::TRUE,
            ..Default::default()
        };
        let info = display_info(&raw);
        assert_eq!(info.name, "");
        assert_eq!(info.physical_resolution, Extent::new(2560, 1440));
        assert!(info.plane_reorder_possible);
        assert!(!info.persistent_content);
    }

    #[test]
    fn test_count_or_fill_converts_written_entries() {
        let mut out = [PlaneInfo::default(); 2];
        let written = count_or_fill(
            Some(&mut out),
            |count: &mut u32, buf: *mut vk::DisplayPlanePropertiesKHR| {
                assert_eq!(*count, 2);
                // SAFETY: buf points to two default-initialised entries.
                unsafe { (*buf).current_stack_index = 9 };
                *count = 1;
                vk::Result::INCOMPLETE
            },
            plane_info,
        )
        .unwrap();
        assert_eq!(written, 1);
        assert_eq!(out[0].current_stack_index, 9);
    }
}
