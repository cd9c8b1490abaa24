// vkdisplayprobe CLI: bootstrap Vulkan, run one probe pass, exit with its status

use std::process::ExitCode;

use clap::{ArgAction, Parser, ValueEnum};
use tracing::{error, info};

use vkdisplayprobe::display::{EnvelopePolicy, PlaneScan, ProbeOptions};
use vkdisplayprobe::probe::run_probe;
use vkdisplayprobe::vulkan::{InstanceOptions, VulkanContext};

/// Exit status for bootstrap failures (loader, instance, extension, device)
const EXIT_SETUP_FAILURE: u8 = 2;
/// Exit status for probe failures
const EXIT_PROBE_FAILURE: u8 = 1;

#[derive(Parser, Debug)]
#[command(name = "vkdisplayprobe")]
#[command(about = "Probe VK_KHR_display: displays, modes, planes and a display-plane surface")]
struct Cli {
    /// Physical device index, in vkEnumeratePhysicalDevices order
    #[arg(long, short = 'd', env = "VKDISPLAYPROBE_DEVICE", default_value_t = 0)]
    device: usize,

    /// Do not enable a validation layer even if one is installed
    #[arg(long)]
    no_validation: bool,

    /// Keep querying planes after a usable one is found, or stop there
    #[arg(long, value_enum, default_value_t = ScanArg::Full)]
    plane_scan: ScanArg,

    /// Whether a plane capability mismatch only warns or fails the probe
    #[arg(long, value_enum, default_value_t = EnvelopeArg::Report)]
    envelope: EnvelopeArg,

    /// More logging (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
#[clap(rename_all = "kebab-case")]
enum ScanArg {
    Full,
    FirstMatch,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
#[clap(rename_all = "lower")]
enum EnvelopeArg {
    Report,
    Enforce,
}

impl From<ScanArg> for PlaneScan {
    fn from(arg: ScanArg) -> Self {
        match arg {
            ScanArg::Full => PlaneScan::Full,
            ScanArg::FirstMatch => PlaneScan::FirstMatch,
        }
    }
}

impl From<EnvelopeArg> for EnvelopePolicy {
    fn from(arg: EnvelopeArg) -> Self {
        match arg {
            EnvelopeArg::Report => EnvelopePolicy::Report,
            EnvelopeArg::Enforce => EnvelopePolicy::Enforce,
        }
    }
}

fn init_logging(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let instance_options = InstanceOptions {
        device_index: cli.device,
        validation: !cli.no_validation,
    };
    let ctx = match VulkanContext::create(&instance_options) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::from(EXIT_SETUP_FAILURE);
        }
    };
    info!("Probing {}", ctx.device_name());

    let options = ProbeOptions {
        plane_scan: cli.plane_scan.into(),
        envelope: cli.envelope.into(),
    };
    let device = ctx.display_device();
    match run_probe(&device, &options) {
        Ok(report) => {
            report.log_summary();
            ExitCode::SUCCESS
        }
        Err(e) => {
            match e.code() {
                Some(code) => error!(stage = ?e.stage(), code = code.as_raw(), "{}", e),
                None => error!(stage = ?e.stage(), "{}", e),
            }
            ExitCode::from(EXIT_PROBE_FAILURE)
        }
    }
}
