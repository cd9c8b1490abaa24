// Integration test: selection policy properties against simulated topologies
//
// Every scenario is a fixed SimulatedDevice; the probe must behave the same
// way on every run and never trade the first display for a later one.

use ash::vk;
use vkdisplayprobe::display::{ProbeOptions, SimDisplay, SimPlane, SimulatedDevice};
use vkdisplayprobe::{run_probe, FailureKind, ProbeWarning};

fn two_display_device() -> SimulatedDevice {
    let d0 = SimulatedDevice::display_handle(0);
    let d1 = SimulatedDevice::display_handle(1);
    SimulatedDevice::new()
        .display(SimDisplay::new("DP-1").mode(2560, 1440, 59_951))
        .display(SimDisplay::new("DP-2").mode(1920, 1080, 60_000))
        .plane(SimPlane::bound_to(d1, 0).supports(d1))
        .plane(SimPlane::unbound().supports(d0).supports(d1))
        .plane(SimPlane::bound_to(d0, 2).supports(d0))
}

#[test]
fn test_selection_is_deterministic() {
    let first = run_probe(&two_display_device(), &ProbeOptions::default()).unwrap();
    for _ in 0..5 {
        let again = run_probe(&two_display_device(), &ProbeOptions::default()).unwrap();
        assert_eq!(again.selection, first.selection);
    }
    assert_eq!(first.selection.plane_index, 1);
}

#[test]
fn test_never_falls_back_to_second_display() {
    let d0 = SimulatedDevice::display_handle(0);
    let d1 = SimulatedDevice::display_handle(1);
    // D0's only plane is busy on D1; D1 has a free plane of its own.
    let device = SimulatedDevice::new()
        .display(SimDisplay::new("DP-1").mode(1920, 1080, 60_000))
        .display(SimDisplay::new("DP-2").mode(1920, 1080, 60_000))
        .plane(SimPlane::bound_to(d1, 0).supports(d0).supports(d1))
        .plane(SimPlane::unbound().supports(d1));

    let err = run_probe(&device, &ProbeOptions::default()).unwrap_err();
    assert_eq!(err.kind(), FailureKind::NoSuitablePlane);
}

#[test]
fn test_mode_failure_on_first_display_does_not_stop_enumeration() {
    let device = SimulatedDevice::new()
        .display(SimDisplay::new("DP-1").failing_modes(vk::Result::ERROR_OUT_OF_HOST_MEMORY))
        .display(
            SimDisplay::new("DP-2")
                .mode(3840, 2160, 60_000)
                .mode(1920, 1080, 120_000),
        );

    // Display #0 stays the choice, so the probe fails, but only after every
    // display's modes were requested.
    let err = run_probe(&device, &ProbeOptions::default()).unwrap_err();
    assert_eq!(err.kind(), FailureKind::NoDisplayMode);
    assert_eq!(device.calls().display_mode_properties, 1 + 2);
    assert_eq!(device.calls().plane_queries(), 0);
}

#[test]
fn test_mode_failure_is_recorded_as_warning() {
    let d0 = SimulatedDevice::display_handle(0);
    let device = SimulatedDevice::new()
        .display(SimDisplay::new("DP-1").mode(1280, 720, 60_000))
        .display(SimDisplay::new("DP-2").failing_modes(vk::Result::ERROR_DEVICE_LOST))
        .display(SimDisplay::new("DP-3").mode(800, 600, 60_000))
        .plane(SimPlane::unbound().supports(d0));

    let report = run_probe(&device, &ProbeOptions::default()).unwrap();
    assert_eq!(
        report.warnings,
        vec![ProbeWarning::ModeQuery {
            display_index: 1,
            code: vk::Result::ERROR_DEVICE_LOST,
        }]
    );
    assert!(report.displays[1].modes.is_empty());
    assert_eq!(report.displays[2].modes.len(), 1);
    assert_eq!(report.displays[2].modes[0].visible_region.width, 800);
}

#[test]
fn test_plane_bound_to_chosen_display_is_eligible() {
    let d0 = SimulatedDevice::display_handle(0);
    let device = SimulatedDevice::new()
        .display(SimDisplay::new("eDP-1").mode(1920, 1200, 60_000))
        .plane(SimPlane::bound_to(d0, 4).supports(d0));

    let report = run_probe(&device, &ProbeOptions::default()).unwrap();
    assert_eq!(report.selection.plane_index, 0);
    assert_eq!(report.selection.plane_stack_index, 4);
}

#[test]
fn test_plane_bound_elsewhere_is_ineligible() {
    let d0 = SimulatedDevice::display_handle(0);
    // Bound to a display this device does not even list.
    let elsewhere = SimulatedDevice::display_handle(7);
    let device = SimulatedDevice::new()
        .display(SimDisplay::new("eDP-1").mode(1920, 1200, 60_000))
        .plane(SimPlane::bound_to(elsewhere, 0).supports(d0));

    let err = run_probe(&device, &ProbeOptions::default()).unwrap_err();
    assert_eq!(err.kind(), FailureKind::NoSuitablePlane);
}

#[test]
fn test_zero_displays_fails_before_plane_queries() {
    let device = SimulatedDevice::new().plane(SimPlane::unbound());

    let err = run_probe(&device, &ProbeOptions::default()).unwrap_err();
    assert_eq!(err.kind(), FailureKind::NoDisplayMode);
    assert_eq!(device.calls().plane_queries(), 0);
}

#[test]
fn test_only_display_without_modes_fails_before_plane_queries() {
    let d0 = SimulatedDevice::display_handle(0);
    let device = SimulatedDevice::new()
        .display(SimDisplay::new("VGA-1"))
        .plane(SimPlane::unbound().supports(d0));

    let err = run_probe(&device, &ProbeOptions::default()).unwrap_err();
    assert_eq!(err.kind(), FailureKind::NoDisplayMode);
    assert_eq!(err.to_string(), "Failed to choose display and mode");
    assert_eq!(device.calls().plane_queries(), 0);
}
