use crate::error::{Error, Result};
use crate::grid::{Grid, Rule};
use crate::simulation::Simulation;
use crate::stats::regression;

/// Per-step count of cells where an automaton and its perturbed twin disagree.
///
/// The twin starts from the same row 0 with the center cell inverted, so
/// `series[0]` is always 1.
pub fn hamming_series(grid: &Grid, rule: Rule) -> Result<Vec<u32>> {
    let steps = grid.steps();
    let cells = grid.cells();

    let mut twin = Simulation::from_base(steps, cells, grid.row(0), true)?;
    twin.evolve(rule);
    let twin = twin.grid();

    let mut series = Vec::with_capacity(steps + 1);
    series.push(1);
    for step in 1..=steps {
        let distance = grid
            .real_cells(step)
            .iter()
            .zip(twin.real_cells(step))
            .filter(|(a, b)| a != b)
            .count();
        series.push(distance as u32);
    }
    Ok(series)
}

/// Exponent `a` of the power law `H(t) ≈ t^a` fitted on log-log axes.
///
/// Point `i` is `(ln(i + 1), ln(series[i]))`. A zero anywhere in the series
/// means the two automata converged, and the fit is reported as not computable.
pub fn hamming_exponent(series: &[u32]) -> Result<f64> {
    let mut xs = Vec::with_capacity(series.len());
    let mut ys = Vec::with_capacity(series.len());
    for (i, &h) in series.iter().enumerate() {
        if h == 0 {
            return Err(Error::NotComputable(format!(
                "automata converged at step {i}"
            )));
        }
        xs.push(((i + 1) as f64).ln());
        ys.push(f64::from(h).ln());
    }
    Ok(regression(&xs, &ys)?.slope)
}
