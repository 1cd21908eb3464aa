//! Numeric pipeline of the Greenshields model:
//! density → speed → flow → capacity.
//!
//! Everything here is pure; the interpreter owns validation of the
//! model state before calling in.

/// Slack allowed past `end` so that floating error does not drop the
/// final sample of a range.
pub const RANGE_TOLERANCE: f64 = 1e-6;

/// `{start, start+step, start+2·step, …}` up to and including `end`
/// (within [`RANGE_TOLERANCE`]). Empty when `end < start`.
///
/// Each sample is computed as `start + i*step` so error does not
/// accumulate across the range. Caller guarantees `step > 0`.
pub fn density_range(start: f64, end: f64, step: f64) -> Vec<f64> {
    let last = ((end - start + RANGE_TOLERANCE) / step).floor();
    if !(last >= 0.0) {
        return Vec::new();
    }
    (0..=last as usize)
        .map(|i| start + i as f64 * step)
        .collect()
}

/// Linear speed-density relation `v = v_free * (1 - k/k_jam)`.
///
/// Not clamped: densities beyond jam yield negative speeds.
pub fn speeds(free_flow_speed: f64, jam_density: f64, densities: &[f64]) -> Vec<f64> {
    densities
        .iter()
        .map(|k| free_flow_speed * (1.0 - k / jam_density))
        .collect()
}

/// `q = k·v` pointwise.
pub fn flows(densities: &[f64], speeds: &[f64]) -> Vec<f64> {
    densities
        .iter()
        .zip(speeds)
        .map(|(k, v)| k * v)
        .collect()
}

/// Maximum flow and the density at which it first occurs.
pub fn capacity(densities: &[f64], flows: &[f64]) -> Option<(f64, f64)> {
    let mut best: Option<usize> = None;
    for (i, q) in flows.iter().enumerate() {
        match best {
            Some(b) if *q <= flows[b] => {}
            _ => best = Some(i),
        }
    }
    let i = best?;
    Some((flows[i], *densities.get(i)?))
}
