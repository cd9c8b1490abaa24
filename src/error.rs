// Probe failure taxonomy
//
// Every variant is fatal for the run. Non-fatal conditions (a display whose
// modes cannot be read, an envelope mismatch in report mode) are collected as
// warnings on the report instead.

use ash::vk;
use thiserror::Error;

use crate::display::EnvelopeViolation;
use crate::probe::ProbeStage;

pub type Result<T> = std::result::Result<T, ProbeError>;

/// Fatal probe failure
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Failed to get display properties: {0}")]
    DisplayProperties(vk::Result),

    #[error("Failed to choose display and mode")]
    NoDisplayMode,

    #[error("Failed to get plane properties: {0}")]
    PlaneProperties(vk::Result),

    #[error("Failed to query supported displays for plane #{plane}: {code}")]
    SupportedDisplays { plane: u32, code: vk::Result },

    #[error("Failed to query plane capabilities for plane #{plane}: {code}")]
    PlaneCapabilities { plane: u32, code: vk::Result },

    #[error("Failed to find a suitable plane")]
    NoSuitablePlane,

    #[error("Plane #{plane} rejects the surface: {violation}")]
    Envelope {
        plane: u32,
        violation: EnvelopeViolation,
    },

    #[error("Failed to create surface: {0}")]
    SurfaceCreation(vk::Result),
}

/// Discriminant of [`ProbeError`], convenient for matching in callers and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    DisplayProperties,
    NoDisplayMode,
    PlaneProperties,
    SupportedDisplays,
    PlaneCapabilities,
    NoSuitablePlane,
    Envelope,
    SurfaceCreation,
}

impl ProbeError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::DisplayProperties(_) => FailureKind::DisplayProperties,
            Self::NoDisplayMode => FailureKind::NoDisplayMode,
            Self::PlaneProperties(_) => FailureKind::PlaneProperties,
            Self::SupportedDisplays { .. } => FailureKind::SupportedDisplays,
            Self::PlaneCapabilities { .. } => FailureKind::PlaneCapabilities,
            Self::NoSuitablePlane => FailureKind::NoSuitablePlane,
            Self::Envelope { .. } => FailureKind::Envelope,
            Self::SurfaceCreation(_) => FailureKind::SurfaceCreation,
        }
    }

    /// Driver result code behind the failure, if the failure came from a query
    pub fn code(&self) -> Option<vk::Result> {
        match self {
            Self::DisplayProperties(code)
            | Self::PlaneProperties(code)
            | Self::SurfaceCreation(code)
            | Self::SupportedDisplays { code, .. }
            | Self::PlaneCapabilities { code, .. } => Some(*code),
            Self::NoDisplayMode | Self::NoSuitablePlane | Self::Envelope { .. } => None,
        }
    }

    /// Stage of the probe in which the failure occurred
    pub fn stage(&self) -> ProbeStage {
        match self {
            Self::DisplayProperties(_) => ProbeStage::EnumerateDisplays,
            Self::PlaneProperties(_) => ProbeStage::EnumeratePlanes,
            Self::SupportedDisplays { .. } | Self::PlaneCapabilities { .. } => {
                ProbeStage::ResolveCompatibility
            }
            Self::NoDisplayMode | Self::NoSuitablePlane | Self::Envelope { .. } => {
                ProbeStage::SelectTuple
            }
            Self::SurfaceCreation(_) => ProbeStage::BindSurface,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_only_for_query_failures() {
        let err = ProbeError::SurfaceCreation(vk::Result::ERROR_INITIALIZATION_FAILED);
        assert_eq!(err.code(), Some(vk::Result::ERROR_INITIALIZATION_FAILED));
        assert_eq!(err.stage(), ProbeStage::BindSurface);
        assert_eq!(ProbeError::NoSuitablePlane.code(), None);
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ProbeError::NoDisplayMode.to_string(),
            "Failed to choose display and mode"
        );
        assert_eq!(
            ProbeError::NoSuitablePlane.to_string(),
            "Failed to find a suitable plane"
        );
        let err = ProbeError::SupportedDisplays {
            plane: 2,
            code: vk::Result::ERROR_OUT_OF_HOST_MEMORY,
        };
        assert!(err.to_string().starts_with("Failed to query supported displays for plane #2"));
    }
}
