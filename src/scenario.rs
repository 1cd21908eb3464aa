//! Scenario programs: the bridge between a set of model parameters and a
//! program the interpreter can run, plus locating a run's exported table.

use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::writer::csv::table_path;

/// Parameters of one scenario. Missing JSON fields take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioParams {
    pub name: String,
    /// km/h
    pub free_flow: f64,
    /// veh/km
    pub jam_density: f64,
    pub start: f64,
    /// Defaults to the jam density.
    pub end: Option<f64>,
    pub step: f64,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            name: String::new(),
            free_flow: 100.0,
            jam_density: 200.0,
            start: 0.0,
            end: None,
            step: 5.0,
        }
    }
}

impl ScenarioParams {
    pub fn end(&self) -> f64 {
        self.end.unwrap_or(self.jam_density)
    }

    /// The scenario name, or `scenario_<unix seconds>` when none was given.
    pub fn name_or_default(&self) -> String {
        if self.name.trim().is_empty() {
            default_name()
        } else {
            self.name.trim().to_string()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.free_flow > 0.0) {
            bail!("free-flow speed must be positive, got {}", self.free_flow);
        }
        if !(self.jam_density > 0.0) {
            bail!("jam density must be positive, got {}", self.jam_density);
        }
        if !(self.step > 0.0) {
            bail!("step must be positive, got {}", self.step);
        }
        if self.end() < self.start {
            bail!("end density {} is below start {}", self.end(), self.start);
        }
        if self.name.contains(['/', '\\']) || self.name.contains(char::is_whitespace) {
            bail!("scenario name `{}` must be a single path-free word", self.name);
        }
        Ok(())
    }

    /// Render the canonical program for these parameters.
    pub fn to_program(&self, name: &str) -> String {
        let mut p = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(p, "# Traffic Scenario: {name}");
        let _ = writeln!(p, "FREE_FLOW        {}", self.free_flow);
        let _ = writeln!(p, "JAM_DENSITY      {}", self.jam_density);
        let _ = writeln!(
            p,
            "DENSITY_RANGE    {} {} {}",
            self.start,
            self.end(),
            self.step
        );
        p.push_str("COMPUTE_SPEED\nCOMPUTE_FLOW\nCAPACITY\n");
        let _ = writeln!(p, "EXPORT_CSV       {name}");
        p.push_str("PRINT_RESULTS\n");
        p
    }
}

pub fn default_name() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    format!("scenario_{secs}")
}

/// Validate `params` and write `<input_dir>/<name>.txt`.
///
/// An existing file is only replaced when `overwrite` is set.
pub fn write_scenario(input_dir: &Path, params: &ScenarioParams, overwrite: bool) -> Result<PathBuf> {
    params.validate()?;
    let name = params.name_or_default();
    let path = input_dir.join(format!("{name}.txt"));

    let file = if overwrite {
        File::create(&path)
    } else {
        File::create_new(&path)
    };
    let mut file = match file {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            bail!("{} already exists (use --force to replace it)", path.display());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Creating {}", path.display()));
        }
    };
    file.write_all(params.to_program(&name).as_bytes())
        .with_context(|| format!("Writing {}", path.display()))?;
    Ok(path)
}

/// `.txt` programs in `input_dir`, sorted by file name.
pub fn list_scenarios(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in
        fs::read_dir(input_dir).with_context(|| format!("Listing {}", input_dir.display()))?
    {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == "txt") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Where the table exported under `export_name` lives.
pub fn locate(output_dir: &Path, export_name: &str) -> PathBuf {
    table_path(output_dir, export_name)
}
