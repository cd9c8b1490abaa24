// Integration test: end-to-end probe runs against simulated devices
//
// Covers the three reference scenarios plus the fatal/warning split of each
// device query.

use ash::vk;
use vkdisplayprobe::display::{
    AlphaModes, EnvelopePolicy, Extent, PlaneCapabilities, PlaneScan, ProbeOptions, SimDisplay,
    SimPlane, SimulatedDevice,
};
use vkdisplayprobe::{run_probe, FailureKind, ProbeError, ProbeStage, ProbeWarning};

// ---------------------------------------------------------------------------
// Reference scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_scenario_single_display_two_modes() {
    let d0 = SimulatedDevice::display_handle(0);
    let device = SimulatedDevice::new()
        .display(
            SimDisplay::new("HDMI-A-1")
                .mode(1920, 1080, 60_000)
                .mode(3840, 2160, 30_000),
        )
        .plane(SimPlane::unbound().supports(d0));

    let report = run_probe(&device, &ProbeOptions::default()).unwrap();
    let s = &report.selection;
    assert_eq!(s.display.handle, d0);
    assert_eq!(s.mode.handle, SimulatedDevice::mode_handle(0, 0));
    assert_eq!(s.mode.refresh_rate, 60_000);
    assert_eq!(s.plane_index, 0);
    assert_eq!(s.extent, Extent::new(1920, 1080));
    assert!(report.warnings.is_empty());

    let calls = device.calls();
    assert_eq!(calls.surfaces_created, 1);
    assert_eq!(calls.surfaces_destroyed, 1);
    println!("Scenario A: {} on plane #{}", s.extent, s.plane_index);
}

#[test]
fn test_scenario_skips_plane_serving_other_display() {
    let d0 = SimulatedDevice::display_handle(0);
    let other = SimulatedDevice::display_handle(1);
    let device = SimulatedDevice::new()
        .display(SimDisplay::new("DP-1").mode(2560, 1600, 60_000))
        .plane(SimPlane::bound_to(other, 0).supports(other))
        .plane(SimPlane::unbound().supports(d0));

    let report = run_probe(&device, &ProbeOptions::default()).unwrap();
    assert_eq!(report.selection.plane_index, 1);
    assert_eq!(report.planes.len(), 2);
    assert_eq!(device.calls().surfaces_created, 1);
}

#[test]
fn test_scenario_bound_elsewhere_despite_support() {
    let d0 = SimulatedDevice::display_handle(0);
    let other = SimulatedDevice::display_handle(1);
    let device = SimulatedDevice::new()
        .display(SimDisplay::new("DP-1").mode(2560, 1600, 60_000))
        .plane(SimPlane::bound_to(other, 0).supports(d0));

    let err = run_probe(&device, &ProbeOptions::default()).unwrap_err();
    assert!(matches!(err, ProbeError::NoSuitablePlane));
    assert_eq!(err.to_string(), "Failed to find a suitable plane");
    assert_eq!(device.calls().surfaces_created, 0);
}

// ---------------------------------------------------------------------------
// Plane scan
// ---------------------------------------------------------------------------

#[test]
fn test_plane_scan_does_not_change_selection() {
    let build = || {
        let d0 = SimulatedDevice::display_handle(0);
        let d1 = SimulatedDevice::display_handle(1);
        SimulatedDevice::new()
            .display(SimDisplay::new("DP-1").mode(1920, 1080, 60_000))
            .plane(SimPlane::bound_to(d1, 0).supports(d0))
            .plane(SimPlane::unbound().supports(d0))
            .plane(SimPlane::unbound().supports(d0))
            .plane(SimPlane::unbound().supports(d1))
    };

    let full_device = build();
    let full = run_probe(&full_device, &ProbeOptions::default()).unwrap();

    let first_device = build();
    let first = run_probe(
        &first_device,
        &ProbeOptions {
            plane_scan: PlaneScan::FirstMatch,
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(full.selection, first.selection);
    assert_eq!(full.selection.plane_index, 1);
    assert_eq!(full.planes.len(), 4);
    assert_eq!(first.planes.len(), 2);
    assert_eq!(full_device.calls().plane_supported_displays, 2 * 4);
    assert_eq!(first_device.calls().plane_capabilities, 2);
}

// ---------------------------------------------------------------------------
// Fatal query failures
// ---------------------------------------------------------------------------

#[test]
fn test_display_query_failure_is_fatal() {
    let device =
        SimulatedDevice::new().failing_display_properties(vk::Result::ERROR_INITIALIZATION_FAILED);
    let err = run_probe(&device, &ProbeOptions::default()).unwrap_err();
    assert_eq!(err.kind(), FailureKind::DisplayProperties);
    assert_eq!(err.code(), Some(vk::Result::ERROR_INITIALIZATION_FAILED));
    assert_eq!(err.stage(), ProbeStage::EnumerateDisplays);
}

#[test]
fn test_plane_query_failures_are_fatal() {
    let d0 = SimulatedDevice::display_handle(0);
    let display = || SimDisplay::new("DP-1").mode(1024, 768, 60_000);

    let device = SimulatedDevice::new()
        .display(display())
        .failing_plane_properties(vk::Result::ERROR_OUT_OF_HOST_MEMORY);
    let err = run_probe(&device, &ProbeOptions::default()).unwrap_err();
    assert_eq!(err.kind(), FailureKind::PlaneProperties);

    let device = SimulatedDevice::new()
        .display(display())
        .plane(SimPlane::unbound().supports(d0))
        .plane(SimPlane::unbound().failing_supported_displays(vk::Result::ERROR_DEVICE_LOST));
    let err = run_probe(&device, &ProbeOptions::default()).unwrap_err();
    assert!(matches!(
        err,
        ProbeError::SupportedDisplays {
            plane: 1,
            code: vk::Result::ERROR_DEVICE_LOST
        }
    ));

    let device = SimulatedDevice::new()
        .display(display())
        .plane(SimPlane::unbound().supports(d0).failing_capabilities(vk::Result::ERROR_UNKNOWN));
    let err = run_probe(&device, &ProbeOptions::default()).unwrap_err();
    assert_eq!(err.kind(), FailureKind::PlaneCapabilities);
    assert_eq!(err.stage(), ProbeStage::ResolveCompatibility);
}

#[test]
fn test_surface_failures_are_fatal() {
    let d0 = SimulatedDevice::display_handle(0);
    let device = SimulatedDevice::new()
        .display(SimDisplay::new("DP-1").mode(1024, 768, 60_000))
        .plane(SimPlane::unbound().supports(d0))
        .failing_surface(vk::Result::ERROR_INITIALIZATION_FAILED);
    let err = run_probe(&device, &ProbeOptions::default()).unwrap_err();
    assert_eq!(err.kind(), FailureKind::SurfaceCreation);
    assert_eq!(err.code(), Some(vk::Result::ERROR_INITIALIZATION_FAILED));

    let device = SimulatedDevice::new()
        .display(SimDisplay::new("DP-1").mode(1024, 768, 60_000))
        .plane(SimPlane::unbound().supports(d0))
        .null_surface();
    let err = run_probe(&device, &ProbeOptions::default()).unwrap_err();
    assert_eq!(err.kind(), FailureKind::SurfaceCreation);
    assert_eq!(device.calls().surfaces_destroyed, 0);
}

// ---------------------------------------------------------------------------
// Capability envelope
// ---------------------------------------------------------------------------

fn small_plane_device() -> SimulatedDevice {
    let d0 = SimulatedDevice::display_handle(0);
    SimulatedDevice::new()
        .display(SimDisplay::new("DP-1").mode(3840, 2160, 60_000))
        .plane(
            SimPlane::unbound()
                .supports(d0)
                .capabilities(PlaneCapabilities::permissive(Extent::new(1920, 1080))),
        )
}

#[test]
fn test_envelope_mismatch_warns_in_report_mode() {
    let device = small_plane_device();
    let report = run_probe(&device, &ProbeOptions::default()).unwrap();
    assert_eq!(report.warnings.len(), 2);
    assert!(report
        .warnings
        .iter()
        .all(|w| matches!(w, ProbeWarning::Envelope { plane: 0, .. })));
    assert_eq!(device.calls().surfaces_created, 1);
}

#[test]
fn test_envelope_mismatch_fails_in_enforce_mode() {
    let device = small_plane_device();
    let options = ProbeOptions {
        envelope: EnvelopePolicy::Enforce,
        ..Default::default()
    };
    let err = run_probe(&device, &options).unwrap_err();
    assert_eq!(err.kind(), FailureKind::Envelope);
    assert_eq!(device.calls().surfaces_created, 0);
}

#[test]
fn test_envelope_does_not_affect_plane_choice() {
    let d0 = SimulatedDevice::display_handle(0);
    let no_opaque = PlaneCapabilities {
        supported_alpha: AlphaModes::PER_PIXEL_PREMULTIPLIED,
        ..PlaneCapabilities::permissive(Extent::new(4096, 4096))
    };
    let device = SimulatedDevice::new()
        .display(SimDisplay::new("DP-1").mode(1920, 1080, 60_000))
        .plane(SimPlane::unbound().supports(d0).capabilities(no_opaque))
        .plane(SimPlane::unbound().supports(d0));

    let report = run_probe(&device, &ProbeOptions::default()).unwrap();
    assert_eq!(report.selection.plane_index, 0);
    assert_eq!(report.warnings.len(), 1);
    println!("Warning: {}", report.warnings[0]);
}
