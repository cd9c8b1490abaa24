// Direct-display probing: enumeration, plane compatibility, selection, surface bind

pub mod device;
pub mod enumerate;
pub mod policy;
pub mod resolve;
pub mod select;
pub mod simulated;
pub mod surface;
pub mod types;

pub use device::{DisplayDevice, QueryResult};
pub use enumerate::{
    enumerate_all_modes, enumerate_displays, enumerate_modes, enumerate_planes, read_two_call,
    DisplayEntry,
};
pub use policy::{EnvelopePolicy, PlaneScan, ProbeOptions};
pub use resolve::{check_envelope, resolve_plane, EnvelopeViolation, PlaneReport};
pub use select::{choose_display_and_mode, choose_plane, is_plane_eligible, DisplayChoice, Selection};
pub use simulated::{CallCounts, SimDisplay, SimPlane, SimulatedDevice};
pub use surface::{bind_surface, surface_descriptor, BoundSurface};
pub use types::{
    AlphaModes, DisplayHandle, DisplayInfo, DisplayModeInfo, Extent, ModeHandle, Offset,
    PlaneCapabilities, PlaneInfo, SurfaceDescriptor, SurfaceHandle, SurfaceTransform,
};
