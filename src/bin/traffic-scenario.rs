//! Writes a scenario program for `traffic-dsl` from command-line or JSON
//! parameters and prints its path.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use traffic_dsl::scenario::{self, ScenarioParams};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "traffic-scenario", author, version)]
#[command(about = "Create a Greenshields scenario program")]
struct Cli {
    /// Scenario name; also the export name (default: scenario_<timestamp>)
    #[arg(long)]
    name: Option<String>,

    /// Free-flow speed in km/h
    #[arg(long, default_value_t = 100.0)]
    free_flow: f64,

    /// Jam density in veh/km
    #[arg(long, default_value_t = 200.0)]
    jam_density: f64,

    /// First density sample
    #[arg(long, default_value_t = 0.0)]
    start: f64,

    /// Last density sample (default: jam density)
    #[arg(long)]
    end: Option<f64>,

    /// Density step
    #[arg(long, default_value_t = 5.0)]
    step: f64,

    /// Read parameters from a JSON file instead of the flags above
    #[arg(long, conflicts_with_all = ["free_flow", "jam_density", "start", "end", "step"])]
    params: Option<PathBuf>,

    /// Replace an existing scenario file of the same name
    #[arg(long)]
    force: bool,

    /// Directory the program is written to
    #[arg(long, env = "TRAFFIC_DSL_INPUT_DIR", default_value = "input")]
    input_dir: PathBuf,
}

impl Cli {
    fn params(&self) -> Result<ScenarioParams> {
        let mut params = match &self.params {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Reading {}", path.display()))?;
                serde_json::from_str::<ScenarioParams>(&json)
                    .with_context(|| format!("Parsing {}", path.display()))?
            }
            None => ScenarioParams {
                name: String::new(),
                free_flow: self.free_flow,
                jam_density: self.jam_density,
                start: self.start,
                end: self.end,
                step: self.step,
            },
        };
        if let Some(name) = &self.name {
            params.name = name.clone();
        }
        Ok(params)
    }
}

fn main() -> Result<()> {
    traffic_dsl::init_logging();
    let cli = Cli::parse();

    let params = cli.params()?;
    let path = scenario::write_scenario(&cli.input_dir, &params, cli.force)?;
    info!(path = %path.display(), "scenario written");
    println!("{}", path.display());
    Ok(())
}
