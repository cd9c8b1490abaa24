//! # vkdisplayprobe
//!
//! Probe Vulkan direct-to-display (`VK_KHR_display`) support on a GPU.
//!
//! The probe enumerates the displays a physical device exposes, their modes and
//! the hardware scanout planes, picks the first display, its first mode and the
//! first plane that can drive it without stealing it from another display, then
//! creates and immediately destroys a display-plane surface to confirm the
//! driver accepts the combination.
//!
//! ## Rust usage
//!
//! ```no_run
//! use vkdisplayprobe::display::ProbeOptions;
//! use vkdisplayprobe::probe::run_probe;
//! use vkdisplayprobe::vulkan::{InstanceOptions, VulkanContext};
//!
//! let ctx = VulkanContext::create(&InstanceOptions::default()).unwrap();
//! let report = run_probe(&ctx.display_device(), &ProbeOptions::default()).unwrap();
//! println!("plane #{}", report.selection.plane_index);
//! ```
//!
//! Selection logic runs against any [`display::DisplayDevice`]; tests use
//! [`display::SimulatedDevice`] to pin a topology.

pub mod display;
pub mod error;
pub mod probe;
pub mod vulkan;
#[cfg(feature = "python")]
mod python;

pub use error::{FailureKind, ProbeError};
pub use probe::{run_probe, ProbeReport, ProbeStage, ProbeWarning};
