use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[clap(
    version = "0.1.0",
    name = "RS-RP",
    about = "A motor-race telemetry replay engine written in Rust"
)]
pub struct ReplayOpts {
    // FLAGS ---------------------------------------------------------------------------------------
    /// Activate GUI (otherwise the replay runs headless and prints the final classification)
    #[clap(short, long)]
    pub gui: bool,

    // OPTIONS -------------------------------------------------------------------------------------
    /// Set path to the session data payload (session info, drivers, track outline, laps, insights)
    #[clap(parse(from_os_str), short, long)]
    pub data_path: PathBuf,

    /// Set path to the position payload (per-driver timestamped coordinate series)
    #[clap(parse(from_os_str), short, long)]
    pub positions_path: PathBuf,

    /// Set path to the circuit parameter file (rotation, pit lane overlay, grace windows)
    #[clap(parse(from_os_str), short, long)]
    pub circuit_path: Option<PathBuf>,

    /// Set replay start time in seconds of session time
    #[clap(long, default_value = "0.0")]
    pub start_time: f64,

    /// Set initial playback speed multiplier, must be in the range [0.1, 100.0]
    #[clap(short, long, default_value = "1.0")]
    pub speed: f64,

    /// Set headless replay timestep size in seconds, should be in the range [0.001, 10.0]
    #[clap(short, long, default_value = "0.5")]
    pub timestep_size: f64,
}
