mod app;
mod plots;

use std::path::PathBuf;

use clap::Parser;
use clarkepark_algo::{Session, SimulationConfig};
use eframe::{run_native, NativeOptions};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use app::VisualizerApp;

/// Real-time Clarke and Park transform visualizer
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// JSON file with initial speed, amplitude, playing and show_projections
    #[arg(long)]
    config: Option<PathBuf>,

    /// Rotation speed in revolutions per second
    #[arg(long)]
    speed: Option<f64>,

    /// Peak phase amplitude
    #[arg(long)]
    amplitude: Option<f64>,

    /// Start paused
    #[arg(long)]
    paused: bool,

    /// Start with projection guides hidden
    #[arg(long)]
    hide_projections: bool,
}

impl Cli {
    /// Config file values overridden by command line flags
    fn simulation_config(&self) -> Result<SimulationConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::from_json(&std::fs::read_to_string(path)?)?,
            None => SimulationConfig::default(),
        };
        if let Some(speed) = self.speed {
            config.speed = speed;
        }
        if let Some(amplitude) = self.amplitude {
            config.amplitude = amplitude;
        }
        if self.paused {
            config.playing = false;
        }
        if self.hide_projections {
            config.show_projections = false;
        }
        Ok(config)
    }
}

/// Use `RUST_LOG` to override the default filter.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,clarkepark_algo=info,visualizer=debug"));

    fmt().with_env_filter(filter).with_target(false).init();
}

fn main() -> eframe::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let session = match cli
        .simulation_config()
        .and_then(|config| Ok(Session::with_config(config)?))
    {
        Ok(session) => session,
        Err(err) => {
            error!("invalid startup configuration: {err}");
            std::process::exit(2);
        }
    };

    info!("starting visualizer");
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 1080.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };
    run_native(
        "Clarke & Park",
        options,
        Box::new(|_cc| Ok(Box::new(VisualizerApp::new(session)))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from(["visualizer", "--speed", "2.5", "--paused"]);
        let config = cli.simulation_config().unwrap();
        assert_eq!(config.speed, 2.5);
        assert_eq!(config.amplitude, 1.0);
        assert!(!config.playing);
        assert!(config.show_projections);
    }

    #[test]
    fn non_finite_flag_is_rejected_by_session() {
        let cli = Cli::parse_from(["visualizer", "--amplitude", "NaN"]);
        let config = cli.simulation_config().unwrap();
        assert!(Session::with_config(config).is_err());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let cli = Cli::parse_from(["visualizer", "--config", "/nonexistent/clarkepark.json"]);
        assert!(cli.simulation_config().is_err());
    }
}
