/// How many planes are queried once a usable one has been found.
///
/// - `Full`: every plane is queried and logged; the first eligible one is kept.
/// - `FirstMatch`: stop at the first eligible plane.
///
/// The selected plane is the same either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaneScan {
    #[default]
    Full,
    FirstMatch,
}

impl PlaneScan {
    /// Parse from a mode string ("full", "first-match").
    pub fn from_mode(mode: &str) -> Option<Self> {
        match mode {
            "full" => Some(Self::Full),
            "first-match" => Some(Self::FirstMatch),
            _ => None,
        }
    }
}

/// What to do when the selected plane's capability envelope does not admit
/// the surface parameters.
///
/// - `Report`: log and record a warning, create the surface anyway.
/// - `Enforce`: fail before creating the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnvelopePolicy {
    #[default]
    Report,
    Enforce,
}

impl EnvelopePolicy {
    /// Parse from a mode string ("report", "enforce").
    pub fn from_mode(mode: &str) -> Option<Self> {
        match mode {
            "report" => Some(Self::Report),
            "enforce" => Some(Self::Enforce),
            _ => None,
        }
    }
}

/// Knobs for a probe run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProbeOptions {
    pub plane_scan: PlaneScan,
    pub envelope: EnvelopePolicy,
}
