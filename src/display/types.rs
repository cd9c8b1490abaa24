// Display topology types: displays, modes, planes, plane capabilities
//
// Handles are stored as raw 64-bit values so the selection core never touches
// Vulkan objects directly. The Vulkan backend converts at the boundary.

use std::fmt;

// ---------------------------------------------------------------------------
// Handles
// ---------------------------------------------------------------------------

/// Display handle (raw `VkDisplayKHR`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DisplayHandle(pub u64);

/// Display mode handle (raw `VkDisplayModeKHR`), only meaningful for its owning display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModeHandle(pub u64);

/// Surface handle (raw `VkSurfaceKHR`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SurfaceHandle(pub u64);

impl SurfaceHandle {
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for DisplayHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl fmt::Display for ModeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl fmt::Display for SurfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// Width × height (pixels, or millimetres for physical dimensions)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Both dimensions within `[min, max]`, inclusive
    pub fn fits_within(self, min: Extent, max: Extent) -> bool {
        (min.width..=max.width).contains(&self.width)
            && (min.height..=max.height).contains(&self.height)
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Signed 2D position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

impl Offset {
    pub const ORIGIN: Offset = Offset { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Both coordinates within `[min, max]`, inclusive
    pub fn fits_within(self, min: Offset, max: Offset) -> bool {
        (min.x..=max.x).contains(&self.x) && (min.y..=max.y).contains(&self.y)
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Topology records
// ---------------------------------------------------------------------------

/// Display exposed by the physical device
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisplayInfo {
    pub handle: DisplayHandle,
    /// Driver-reported name, empty if the driver returned none
    pub name: String,
    /// Physical size in millimetres
    pub physical_dimensions: Extent,
    /// Native resolution in pixels
    pub physical_resolution: Extent,
    /// Raw `VkSurfaceTransformFlagsKHR`
    pub supported_transforms: u32,
    pub plane_reorder_possible: bool,
    pub persistent_content: bool,
}

/// One (resolution, refresh rate) configuration of a display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayModeInfo {
    pub handle: ModeHandle,
    pub visible_region: Extent,
    /// Driver units (millihertz for Vulkan)
    pub refresh_rate: u32,
}

/// Scanout plane snapshot
///
/// Binding state may change underneath us if another client of the same device
/// grabs the plane; treat it as a point-in-time observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaneInfo {
    /// `None` when the plane is not bound to any display
    pub current_display: Option<DisplayHandle>,
    /// Z-order slot, only meaningful while bound
    pub current_stack_index: u32,
}

// ---------------------------------------------------------------------------
// Alpha modes
// ---------------------------------------------------------------------------

/// `VkDisplayPlaneAlphaFlagsKHR` bitmask
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AlphaModes(pub u32);

impl AlphaModes {
    pub const OPAQUE: AlphaModes = AlphaModes(0x1);
    pub const GLOBAL: AlphaModes = AlphaModes(0x2);
    pub const PER_PIXEL: AlphaModes = AlphaModes(0x4);
    pub const PER_PIXEL_PREMULTIPLIED: AlphaModes = AlphaModes(0x8);

    const NAMES: [(AlphaModes, &'static str); 4] = [
        (Self::OPAQUE, "opaque"),
        (Self::GLOBAL, "global"),
        (Self::PER_PIXEL, "per-pixel"),
        (Self::PER_PIXEL_PREMULTIPLIED, "per-pixel-premultiplied"),
    ];

    pub fn contains(self, other: AlphaModes) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for AlphaModes {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Debug for AlphaModes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AlphaModes({:#x}: {})", self.0, self)
    }
}

impl fmt::Display for AlphaModes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let mut first = true;
        for (mode, name) in Self::NAMES {
            if self.contains(mode) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        let unknown = self.0 & !0xF;
        if unknown != 0 {
            if !first {
                f.write_str("|")?;
            }
            write!(f, "{unknown:#x}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Plane capabilities
// ---------------------------------------------------------------------------

/// Capability envelope of a plane for one display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaneCapabilities {
    pub supported_alpha: AlphaModes,
    pub min_src_position: Offset,
    pub max_src_position: Offset,
    pub min_src_extent: Extent,
    pub max_src_extent: Extent,
    pub min_dst_position: Offset,
    pub max_dst_position: Offset,
    pub min_dst_extent: Extent,
    pub max_dst_extent: Extent,
}

impl PlaneCapabilities {
    /// Envelope that accepts any opaque full-screen surface up to `max`
    pub fn permissive(max: Extent) -> Self {
        Self {
            supported_alpha: AlphaModes::OPAQUE,
            min_src_position: Offset::ORIGIN,
            max_src_position: Offset::ORIGIN,
            min_src_extent: Extent::new(1, 1),
            max_src_extent: max,
            min_dst_position: Offset::ORIGIN,
            max_dst_position: Offset::ORIGIN,
            min_dst_extent: Extent::new(1, 1),
            max_dst_extent: max,
        }
    }
}

// ---------------------------------------------------------------------------
// Surface descriptor
// ---------------------------------------------------------------------------

/// How the plane's image is oriented relative to the display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceTransform {
    /// Use whatever transform the display is currently configured with
    #[default]
    Inherit,
    Identity,
}

/// Everything needed to create a display-plane surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceDescriptor {
    pub mode: ModeHandle,
    pub plane_index: u32,
    pub plane_stack_index: u32,
    pub transform: SurfaceTransform,
    pub global_alpha: f32,
    pub alpha_mode: AlphaModes,
    pub image_extent: Extent,
}
