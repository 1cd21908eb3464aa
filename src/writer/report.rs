use std::path::Path;

use super::csv::table_path;
use crate::model::ModelState;

/// Prefix of the machine-readable line that names the exported table.
pub const PLOT_DATA_PREFIX: &str = "PLOT_DATA:";

/// Results block printed by `PRINT_RESULTS`, ending with the
/// `PLOT_DATA:<export_name>` line.
pub fn summary(state: &ModelState, output_dir: &Path) -> String {
    let rule = "=".repeat(50);
    let lines = [
        String::new(),
        rule.clone(),
        "FINAL ANALYSIS RESULTS:".to_string(),
        rule.clone(),
        format!("Free-flow speed: {} km/h", state.free_flow_speed),
        format!("Jam density: {} veh/km", state.jam_density),
        format!("Maximum flow: {} veh/h", state.max_flow),
        format!("Optimal density: {} veh/km", state.optimal_density),
        format!("Number of data points: {}", state.sample_count()),
        format!(
            "CSV file: {}",
            table_path(output_dir, &state.export_name).display()
        ),
        rule,
        format!("{PLOT_DATA_PREFIX}{}", state.export_name),
    ];
    lines.join("\n")
}

/// Export name from a `PLOT_DATA:` line, if `line` is one.
pub fn plot_data_name(line: &str) -> Option<&str> {
    line.trim_end().strip_prefix(PLOT_DATA_PREFIX)
}
