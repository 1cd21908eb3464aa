//! The fixed verb set and one handler per verb.
//!
//! Every handler has the same shape: it reads its operands, checks the
//! state it depends on, mutates the state and returns the report text
//! for the command. Adding a verb means adding a variant, a keyword and
//! a handler here.

use std::fmt;

use tracing::debug;

use super::greenshields;
use crate::cli::Settings;
use crate::error::{DslError, Result};
use crate::model::ModelState;
use crate::writer::{csv, report};

pub type Handler = fn(&[String], &mut ModelState, &Settings) -> Result<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    FreeFlow,
    JamDensity,
    DensityRange,
    ComputeSpeed,
    ComputeFlow,
    Capacity,
    ExportCsv,
    PrintResults,
}

impl Verb {
    pub const ALL: &'static [Verb] = &[
        Verb::FreeFlow,
        Verb::JamDensity,
        Verb::DensityRange,
        Verb::ComputeSpeed,
        Verb::ComputeFlow,
        Verb::Capacity,
        Verb::ExportCsv,
        Verb::PrintResults,
    ];

    /// Case-sensitive lookup of a program keyword.
    pub fn from_keyword(keyword: &str) -> Option<Verb> {
        Verb::ALL.iter().copied().find(|v| v.keyword() == keyword)
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Verb::FreeFlow => "FREE_FLOW",
            Verb::JamDensity => "JAM_DENSITY",
            Verb::DensityRange => "DENSITY_RANGE",
            Verb::ComputeSpeed => "COMPUTE_SPEED",
            Verb::ComputeFlow => "COMPUTE_FLOW",
            Verb::Capacity => "CAPACITY",
            Verb::ExportCsv => "EXPORT_CSV",
            Verb::PrintResults => "PRINT_RESULTS",
        }
    }

    pub fn handler(self) -> Handler {
        match self {
            Verb::FreeFlow => free_flow,
            Verb::JamDensity => jam_density,
            Verb::DensityRange => density_range,
            Verb::ComputeSpeed => compute_speed,
            Verb::ComputeFlow => compute_flow,
            Verb::Capacity => capacity,
            Verb::ExportCsv => export_csv,
            Verb::PrintResults => print_results,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

fn operand<'a>(
    verb: Verb,
    operands: &'a [String],
    index: usize,
    expected: &'static str,
) -> Result<&'a str> {
    operands
        .get(index)
        .map(String::as_str)
        .ok_or(DslError::MissingOperand { verb, expected })
}

fn number(verb: Verb, text: &str) -> Result<f64> {
    text.parse::<f64>().map_err(|error| DslError::InvalidNumber {
        verb,
        text: text.to_string(),
        error,
    })
}

fn free_flow(operands: &[String], state: &mut ModelState, _: &Settings) -> Result<String> {
    let verb = Verb::FreeFlow;
    state.free_flow_speed = number(verb, operand(verb, operands, 0, "speed value")?)?;
    Ok(format!("[INFO] Free-flow speed: {} km/h", state.free_flow_speed))
}

fn jam_density(operands: &[String], state: &mut ModelState, _: &Settings) -> Result<String> {
    let verb = Verb::JamDensity;
    state.jam_density = number(verb, operand(verb, operands, 0, "density value")?)?;
    Ok(format!("[INFO] Jam density: {} veh/km", state.jam_density))
}

fn density_range(operands: &[String], state: &mut ModelState, _: &Settings) -> Result<String> {
    let verb = Verb::DensityRange;
    if operands.len() < 3 {
        return Err(DslError::MissingOperand {
            verb,
            expected: "start, end, step",
        });
    }
    let start = number(verb, &operands[0])?;
    let end = number(verb, &operands[1])?;
    let step = number(verb, &operands[2])?;

    if !(start.is_finite() && end.is_finite() && step.is_finite()) {
        return Err(DslError::InvalidOperand {
            verb,
            reason: "start, end and step must be finite".into(),
        });
    }
    if step <= 0.0 {
        return Err(DslError::InvalidOperand {
            verb,
            reason: format!("step must be positive, got {step}"),
        });
    }

    state.density_samples = greenshields::density_range(start, end, step);
    state.invalidate_derived();
    Ok(format!(
        "[INFO] Density range: {start} to {end} step {step} ({} points)",
        state.sample_count()
    ))
}

fn compute_speed(_: &[String], state: &mut ModelState, _: &Settings) -> Result<String> {
    let verb = Verb::ComputeSpeed;
    if state.density_samples.is_empty() {
        return Err(DslError::Precedence {
            verb,
            missing: "Need density values first",
        });
    }
    if !state.parameters_set() {
        return Err(DslError::Precedence {
            verb,
            missing: "Set FREE_FLOW and JAM_DENSITY first",
        });
    }

    state.speed_samples = greenshields::speeds(
        state.free_flow_speed,
        state.jam_density,
        &state.density_samples,
    );
    Ok(format!(
        "[INFO] Speed computed for {} points",
        state.sample_count()
    ))
}

fn compute_flow(_: &[String], state: &mut ModelState, _: &Settings) -> Result<String> {
    let verb = Verb::ComputeFlow;
    if state.density_samples.is_empty() || state.speed_samples.is_empty() {
        return Err(DslError::Precedence {
            verb,
            missing: "Need density and speed values first",
        });
    }
    if state.density_samples.len() != state.speed_samples.len() {
        return Err(DslError::Precedence {
            verb,
            missing: "Speed values are out of date, run COMPUTE_SPEED again",
        });
    }

    state.flow_samples = greenshields::flows(&state.density_samples, &state.speed_samples);
    Ok(format!(
        "[INFO] Flow computed for {} points",
        state.sample_count()
    ))
}

fn capacity(_: &[String], state: &mut ModelState, _: &Settings) -> Result<String> {
    let verb = Verb::Capacity;
    let (max_flow, optimal_density) =
        greenshields::capacity(&state.density_samples, &state.flow_samples).ok_or(
            DslError::Precedence {
                verb,
                missing: "Need flow values first",
            },
        )?;

    state.max_flow = max_flow;
    state.optimal_density = optimal_density;
    Ok(format!(
        "[INFO] Capacity: q_max = {max_flow} veh/h at k = {optimal_density} veh/km"
    ))
}

fn export_csv(operands: &[String], state: &mut ModelState, settings: &Settings) -> Result<String> {
    let verb = Verb::ExportCsv;
    let name = operand(verb, operands, 0, "filename")?;
    if name.contains(['/', '\\']) {
        return Err(DslError::InvalidOperand {
            verb,
            reason: format!("export name `{name}` must not contain a path separator"),
        });
    }
    if state.density_samples.is_empty()
        || state.speed_samples.is_empty()
        || state.flow_samples.is_empty()
    {
        return Err(DslError::Precedence {
            verb,
            missing: "Need data to export",
        });
    }

    state.export_name = name.to_string();
    let path = csv::export(
        &settings.output_dir,
        name,
        &state.density_samples,
        &state.speed_samples,
        &state.flow_samples,
    )?;
    debug!(path = %path.display(), rows = state.sample_count(), "table exported");
    Ok(format!("[INFO] CSV exported: {}", path.display()))
}

fn print_results(_: &[String], state: &mut ModelState, settings: &Settings) -> Result<String> {
    if state.flow_samples.is_empty() {
        return Err(DslError::Precedence {
            verb: Verb::PrintResults,
            missing: "No results to print",
        });
    }
    Ok(report::summary(state, &settings.output_dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ops(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_keyword_lookup_is_case_sensitive() {
        assert_eq!(Verb::from_keyword("CAPACITY"), Some(Verb::Capacity));
        assert_eq!(Verb::from_keyword("capacity"), None);
        assert_eq!(Verb::from_keyword("FOO"), None);
        for verb in Verb::ALL {
            assert_eq!(Verb::from_keyword(verb.keyword()), Some(*verb));
        }
    }

    #[test]
    fn test_scalar_setters() {
        let mut state = ModelState::new();
        let settings = Settings::default();

        let msg = free_flow(&ops(&["100"]), &mut state, &settings).unwrap();
        assert_eq!(msg, "[INFO] Free-flow speed: 100 km/h");
        let msg = jam_density(&ops(&["187.5"]), &mut state, &settings).unwrap();
        assert_eq!(msg, "[INFO] Jam density: 187.5 veh/km");

        assert_eq!(state.free_flow_speed, 100.0);
        assert_eq!(state.jam_density, 187.5);
    }

    #[test]
    fn test_operand_errors() {
        let settings = Settings::default();
        let test_cases: Vec<(Verb, Vec<String>)> = vec![
            (Verb::FreeFlow, ops(&[])),
            (Verb::JamDensity, ops(&[])),
            (Verb::DensityRange, ops(&["0", "200"])),
            (Verb::ExportCsv, ops(&[])),
        ];
        for (verb, operands) in test_cases {
            let mut state = ModelState::new();
            let err = verb.handler()(&operands, &mut state, &settings).unwrap_err();
            assert!(
                matches!(err, DslError::MissingOperand { verb: v, .. } if v == verb),
                "{verb}: {err}"
            );
            assert_eq!(state, ModelState::new());
        }

        let mut state = ModelState::new();
        let err = free_flow(&ops(&["fast"]), &mut state, &settings).unwrap_err();
        assert!(matches!(err, DslError::InvalidNumber { ref text, .. } if text == "fast"));
    }

    #[test]
    fn test_density_range_rejects_bad_bounds() {
        let settings = Settings::default();
        for bad in [["0", "200", "0"], ["0", "200", "-5"], ["0", "inf", "5"], ["nan", "1", "1"]] {
            let mut state = ModelState::new();
            let err = density_range(&ops(&bad), &mut state, &settings).unwrap_err();
            assert!(matches!(err, DslError::InvalidOperand { .. }), "{bad:?}: {err}");
        }
    }

    #[test]
    fn test_density_range_end_below_start_yields_no_points() {
        let settings = Settings::default();
        let mut state = ModelState {
            free_flow_speed: 100.0,
            jam_density: 200.0,
            ..ModelState::default()
        };

        let msg = density_range(&ops(&["200", "0", "5"]), &mut state, &settings).unwrap();
        assert_eq!(msg, "[INFO] Density range: 200 to 0 step 5 (0 points)");
        assert!(state.density_samples.is_empty());

        let err = compute_speed(&[], &mut state, &settings).unwrap_err();
        assert!(matches!(err, DslError::Precedence { .. }));
    }

    #[test]
    fn test_density_range_invalidates_dependents() {
        let settings = Settings::default();
        let mut state = ModelState {
            free_flow_speed: 100.0,
            jam_density: 200.0,
            ..ModelState::default()
        };
        density_range(&ops(&["0", "200", "50"]), &mut state, &settings).unwrap();
        compute_speed(&[], &mut state, &settings).unwrap();
        compute_flow(&[], &mut state, &settings).unwrap();
        capacity(&[], &mut state, &settings).unwrap();
        assert_eq!(state.max_flow, 5000.0);

        density_range(&ops(&["0", "100", "10"]), &mut state, &settings).unwrap();
        assert_eq!(state.sample_count(), 11);
        assert!(state.speed_samples.is_empty());
        assert!(state.flow_samples.is_empty());
        assert_eq!(state.max_flow, 0.0);

        let err = compute_flow(&[], &mut state, &settings).unwrap_err();
        assert!(matches!(err, DslError::Precedence { .. }));
    }

    #[test]
    fn test_compute_speed_preconditions() {
        let settings = Settings::default();

        let mut state = ModelState::new();
        let err = compute_speed(&[], &mut state, &settings).unwrap_err();
        assert_eq!(err.to_string(), "COMPUTE_SPEED: Need density values first");

        density_range(&ops(&["0", "10", "5"]), &mut state, &settings).unwrap();
        state.free_flow_speed = 100.0;
        let err = compute_speed(&[], &mut state, &settings).unwrap_err();
        assert_eq!(
            err.to_string(),
            "COMPUTE_SPEED: Set FREE_FLOW and JAM_DENSITY first"
        );
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let settings = Settings::default();
        let mut state = ModelState {
            free_flow_speed: 88.0,
            jam_density: 140.0,
            ..ModelState::default()
        };
        density_range(&ops(&["0", "140", "3.5"]), &mut state, &settings).unwrap();

        compute_speed(&[], &mut state, &settings).unwrap();
        compute_flow(&[], &mut state, &settings).unwrap();
        let first = state.clone();

        compute_speed(&[], &mut state, &settings).unwrap();
        compute_flow(&[], &mut state, &settings).unwrap();
        assert_eq!(state, first);
    }

    #[test]
    fn test_export_rejects_path_separators() {
        let settings = Settings::default();
        let mut state = ModelState::new();
        let err = export_csv(&ops(&["../escape"]), &mut state, &settings).unwrap_err();
        assert!(matches!(err, DslError::InvalidOperand { .. }));
        assert!(state.export_name.is_empty());
    }

    #[test]
    fn test_print_requires_results() {
        let mut state = ModelState::new();
        let err = print_results(&[], &mut state, &Settings::default()).unwrap_err();
        assert_eq!(err.to_string(), "PRINT_RESULTS: No results to print");
    }
}
