use serde::Serialize;

/// One parsed line of a program: the verb and its raw operands.
///
/// Operands stay as text; each handler decides how to coerce them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub verb: String,
    pub operands: Vec<String>,
}

impl Command {
    pub fn new(verb: impl Into<String>, operands: &[&str]) -> Self {
        Self {
            verb: verb.into(),
            operands: operands.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Mutable record threaded through one program execution.
///
/// Zero means "unset" for both model parameters. The three sample
/// vectors are aligned by index: `density[i]`, `speed[i]` and `flow[i]`
/// describe the same sample point.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModelState {
    /// km/h
    pub free_flow_speed: f64,
    /// veh/km
    pub jam_density: f64,

    pub density_samples: Vec<f64>,
    pub speed_samples: Vec<f64>,
    pub flow_samples: Vec<f64>,

    /// veh/h
    pub max_flow: f64,
    /// veh/km
    pub optimal_density: f64,

    pub export_name: String,
}

impl ModelState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parameters_set(&self) -> bool {
        self.free_flow_speed != 0.0 && self.jam_density != 0.0
    }

    pub fn sample_count(&self) -> usize {
        self.density_samples.len()
    }

    /// Drop everything derived from the density samples.
    pub fn invalidate_derived(&mut self) {
        self.speed_samples.clear();
        self.flow_samples.clear();
        self.max_flow = 0.0;
        self.optimal_density = 0.0;
    }
}
