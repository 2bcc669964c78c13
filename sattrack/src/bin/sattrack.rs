use clap::Parser;
use sattrack::{
    actuator::Actuator,
    clock::SystemClock,
    config::{default_config_path, Config},
    hardware::{spawn_keyboard_reader, FileActuator, LogActuator, TerminalDisplay},
    panel::ChannelPanel,
    provider::TleDirectionProvider,
    SattrackError, SattrackResult, TrackingLoop,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Point a two-axis mount at a satellite")]
struct Args {
    /// Config file; defaults to the per-user config dir
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the TLE catalog path from the config
    #[arg(long)]
    tle: Option<PathBuf>,
    /// Overrides where actuator frames are written
    #[arg(long)]
    actuator_output: Option<PathBuf>,
}

fn load_config(args: &Args) -> SattrackResult<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path),
        None => {
            log::info!("config: {}", default_config_path().display());
            Config::load_or_default()
        }
    }
    .map_err(|e| SattrackError::ConfigError(e.to_string()))?;

    if let Some(tle) = &args.tle {
        config.tle.path = tle.clone();
    }
    if let Some(output) = &args.actuator_output {
        config.actuator.output_path = Some(output.clone());
    }
    Ok(config)
}

fn actuator_for(config: &Config) -> SattrackResult<Box<dyn Actuator>> {
    Ok(match &config.actuator.output_path {
        Some(path) => Box::new(FileActuator::open(path)?),
        None => Box::new(LogActuator::new(config.actuator.i2c_address)),
    })
}

fn run(args: Args) -> SattrackResult<()> {
    let config = load_config(&args)?;
    log::info!(
        "encoder on clk {} dt {} sw {}, station {:.4} {:.4} {:.0} m",
        config.gpio.clk,
        config.gpio.dt,
        config.gpio.sw,
        config.location.latitude,
        config.location.longitude,
        config.location.altitude
    );

    let (panel, sender) = ChannelPanel::new();
    spawn_keyboard_reader(sender)?;
    println!("controls: d/+ turn forward, a/- turn back, s or Enter select");

    let provider = TleDirectionProvider::from_file(config.tle.path.clone());
    let actuator = actuator_for(&config)?;

    let mut tracker = TrackingLoop::new(
        config,
        TerminalDisplay::stdout(),
        panel,
        provider,
        actuator,
        SystemClock,
    )?;
    tracker.run()
}

fn main() {
    env_logger::init();
    std::panic::set_hook(Box::new(|info| eprintln!("PANIC: {info}")));

    if let Err(e) = run(Args::parse()) {
        eprintln!("sattrack: {e}");
        std::process::exit(1);
    }
}
