use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "traffic-dsl", author, version)]
#[command(about = "Run a Greenshields traffic-flow program")]
pub struct Cli {
    /// Program file (looked up under the input directory if not found as given)
    pub program: PathBuf,

    /// Directory searched for programs not found at the literal path
    #[arg(long, env = "TRAFFIC_DSL_INPUT_DIR", default_value = "input")]
    pub input_dir: PathBuf,

    /// Directory exported tables are written to
    #[arg(long, env = "TRAFFIC_DSL_OUTPUT_DIR", default_value = "output")]
    pub output_dir: PathBuf,
}

/// Conventional directories used by the reader and the exporter.
///
/// Neither directory is created here; that belongs to whoever prepares
/// the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            output_dir: PathBuf::from("output"),
        }
    }
}

impl From<&Cli> for Settings {
    fn from(cli: &Cli) -> Self {
        Self {
            input_dir: cli.input_dir.clone(),
            output_dir: cli.output_dir.clone(),
        }
    }
}
