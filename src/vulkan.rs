// Vulkan bootstrap: loader → instance with VK_KHR_display → physical device → entry points

pub mod device;

pub use device::VulkanDisplayDevice;

use std::ffi::{c_char, CStr, CString};

use anyhow::{bail, Context, Result};
use ash::{khr, vk};
use tracing::{debug, info};

/// Validation layers in order of preference; the first one available is enabled
const VALIDATION_LAYERS: [&CStr; 2] = [
    c"VK_LAYER_KHRONOS_validation",
    c"VK_LAYER_LUNARG_standard_validation",
];

/// Entry points the probe calls; all must resolve before the first query
const REQUIRED_ENTRY_POINTS: [&CStr; 7] = [
    c"vkGetPhysicalDeviceDisplayPropertiesKHR",
    c"vkGetDisplayModePropertiesKHR",
    c"vkGetPhysicalDeviceDisplayPlanePropertiesKHR",
    c"vkGetDisplayPlaneSupportedDisplaysKHR",
    c"vkGetDisplayPlaneCapabilitiesKHR",
    c"vkCreateDisplayPlaneSurfaceKHR",
    c"vkDestroySurfaceKHR",
];

/// Instance and device selection settings
#[derive(Debug, Clone)]
pub struct InstanceOptions {
    /// Index into `vkEnumeratePhysicalDevices` order
    pub device_index: usize,
    /// Enable a validation layer if one is installed
    pub validation: bool,
}

impl Default for InstanceOptions {
    fn default() -> Self {
        Self {
            device_index: 0,
            validation: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Entry-point table
// ---------------------------------------------------------------------------

/// Resolved `VK_KHR_display` / `VK_KHR_surface` function tables
pub struct DisplayFns {
    pub display: khr::display::Instance,
    pub surface: khr::surface::Instance,
}

impl DisplayFns {
    /// Look up every required entry point by name, then build the tables.
    ///
    /// A missing entry point is reported here rather than at its first call,
    /// where the loader would hand back a stub that panics.
    pub fn resolve(entry: &ash::Entry, instance: &ash::Instance) -> Result<Self> {
        for name in REQUIRED_ENTRY_POINTS {
            // SAFETY: `instance` is a live instance created from `entry`, `name` is NUL-terminated.
            let ptr = unsafe { entry.get_instance_proc_addr(instance.handle(), name.as_ptr()) };
            if ptr.is_none() {
                bail!(
                    "Failed to resolve entry point {}",
                    name.to_string_lossy()
                );
            }
        }

        Ok(Self {
            display: khr::display::Instance::new(entry, instance),
            surface: khr::surface::Instance::new(entry, instance),
        })
    }
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Destroys the instance on drop, including on early `?` returns during setup
struct InstanceGuard {
    // Keeps the loader library mapped for as long as the instance lives
    entry: ash::Entry,
    instance: ash::Instance,
}

impl Drop for InstanceGuard {
    fn drop(&mut self) {
        // SAFETY: every child object (surfaces) is destroyed before the context is dropped.
        unsafe { self.instance.destroy_instance(None) };
        debug!("Destroyed Vulkan instance");
    }
}

/// Vulkan instance, chosen physical device and resolved display entry points
pub struct VulkanContext {
    fns: DisplayFns,
    physical_device: vk::PhysicalDevice,
    device_name: String,
    guard: InstanceGuard,
}

impl VulkanContext {
    /// Load Vulkan, create an instance with `VK_KHR_surface` + `VK_KHR_display`
    /// and pick the physical device at `options.device_index`.
    pub fn create(options: &InstanceOptions) -> Result<Self> {
        // SAFETY: loading the system Vulkan loader; no other loader state exists in this process.
        let entry = unsafe { ash::Entry::load() }.context("Failed to load the Vulkan loader")?;

        let available = available_extensions(&entry)?;
        debug!(
            "Available instance extensions: {}",
            join_names(available.iter().map(CString::as_c_str))
        );
        for required in [khr::surface::NAME, khr::display::NAME] {
            if !available.iter().any(|e| e.as_c_str() == required) {
                bail!("{} is not supported", required.to_string_lossy());
            }
        }

        let layer = if options.validation {
            pick_validation_layer(&entry)?
        } else {
            None
        };
        match layer {
            Some(layer) => info!("Enabling layer {}", layer.to_string_lossy()),
            None => debug!("No validation layer enabled"),
        }

        let extension_names = [khr::surface::NAME.as_ptr(), khr::display::NAME.as_ptr()];
        let layer_names: Vec<*const c_char> = layer.iter().map(|l| l.as_ptr()).collect();
        let app_info = vk::ApplicationInfo::default()
            .application_name(c"vkdisplayprobe")
            .api_version(vk::API_VERSION_1_0);
        let create_info = vk::InstanceCreateInfo::default()
            .application_info(&app_info)
            .enabled_extension_names(&extension_names)
            .enabled_layer_names(&layer_names);

        // SAFETY: create_info and everything it points to outlive the call.
        let instance = unsafe { entry.create_instance(&create_info, None) }
            .context("Failed to create Vulkan instance")?;
        info!(
            "Enabled instance extensions: {}",
            join_names([khr::surface::NAME, khr::display::NAME])
        );

        let guard = InstanceGuard {
            entry,
            instance,
        };
        let (physical_device, device_name) =
            pick_physical_device(&guard.instance, options.device_index)?;
        let fns = DisplayFns::resolve(&guard.entry, &guard.instance)?;

        Ok(Self {
            fns,
            physical_device,
            device_name,
            guard,
        })
    }

    /// Query interface over the chosen physical device
    pub fn display_device(&self) -> VulkanDisplayDevice<'_> {
        VulkanDisplayDevice::new(&self.fns, self.physical_device)
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }
}

fn available_extensions(entry: &ash::Entry) -> Result<Vec<CString>> {
    // SAFETY: plain loader query.
    let props = unsafe { entry.enumerate_instance_extension_properties(None) }
        .context("Failed to enumerate instance extensions")?;
    Ok(props
        .iter()
        .filter_map(|p| p.extension_name_as_c_str().ok().map(CStr::to_owned))
        .collect())
}

fn pick_validation_layer(entry: &ash::Entry) -> Result<Option<&'static CStr>> {
    // SAFETY: plain loader query.
    let props = unsafe { entry.enumerate_instance_layer_properties() }
        .context("Failed to enumerate instance layers")?;
    let names: Vec<&CStr> = props
        .iter()
        .filter_map(|p| p.layer_name_as_c_str().ok())
        .collect();
    Ok(VALIDATION_LAYERS
        .into_iter()
        .find(|wanted| names.contains(wanted)))
}

fn pick_physical_device(
    instance: &ash::Instance,
    index: usize,
) -> Result<(vk::PhysicalDevice, String)> {
    // SAFETY: instance is live.
    let devices = unsafe { instance.enumerate_physical_devices() }
        .context("Failed to enumerate physical devices")?;
    if devices.is_empty() {
        bail!("No Vulkan physical devices found");
    }

    let mut chosen = None;
    for (i, &pd) in devices.iter().enumerate() {
        // SAFETY: pd was just returned by this instance.
        let props = unsafe { instance.get_physical_device_properties(pd) };
        let name = props
            .device_name_as_c_str()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        debug!("Physical device #{}: {} ({:?})", i, name, props.device_type);
        if i == index {
            chosen = Some((pd, name, props.device_type));
        }
    }

    let (pd, name, device_type) = chosen.with_context(|| {
        format!(
            "Physical device index {} out of range (found {})",
            index,
            devices.len()
        )
    })?;
    info!("Using physical device #{}: {} ({:?})", index, name, device_type);
    Ok((pd, name))
}

fn join_names<'a>(names: impl IntoIterator<Item = &'a CStr>) -> String {
    names
        .into_iter()
        .map(|n| n.to_string_lossy())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_names() {
        assert_eq!(
            join_names([khr::surface::NAME, khr::display::NAME]),
            "VK_KHR_surface, VK_KHR_display"
        );
    }

    #[test]
    fn test_required_entry_points_are_distinct() {
        let mut names: Vec<&CStr> = REQUIRED_ENTRY_POINTS.to_vec();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), REQUIRED_ENTRY_POINTS.len());
    }
}
