use std::ops::RangeInclusive;

use crate::error::{Error, Result};
use crate::grid::{initial_state, Rule, StateCode, MAX_TRACKED_CELLS};
use crate::simulation::Simulation;

/// Visitation statistics gathered by evolving every possible initial state.
#[derive(Debug, Clone, PartialEq)]
pub struct Attractor {
    pub rule: Rule,
    pub cells: usize,
    pub steps: usize,
    /// `histogram[p][e]`: how many initial conditions are in state `e` at step `p`.
    pub histogram: Vec<Vec<u32>>,
    /// Number of distinct states occupied at each step.
    pub visited_per_step: Vec<u32>,
    /// Visits to each state over all steps and all initial conditions.
    pub state_visits: Vec<u32>,
}

impl Attractor {
    /// Number of possible states, `2^cells`.
    pub fn state_count(&self) -> usize {
        1 << self.cells
    }

    /// Normalized entropy of the state distribution at every step.
    pub fn entropies(&self) -> Vec<f64> {
        self.histogram
            .iter()
            .map(|row| entropy(row, self.cells))
            .collect()
    }
}

/// Final-step statistics for one cell count of an irreversibility sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinalStepStats {
    pub cells: usize,
    /// Fraction of states that no initial condition reaches at the last step.
    pub unreached_fraction: f64,
    /// Entropy of the last-step state distribution.
    pub entropy: f64,
}

fn check_cells(cells: usize) -> Result<()> {
    if cells > MAX_TRACKED_CELLS {
        return Err(Error::TooManyCells {
            cells,
            max: MAX_TRACKED_CELLS,
        });
    }
    Ok(())
}

/// Run `visit` once per initial state in `[0, 2^cells)` with the codes of steps `1..=steps`.
fn for_each_initial_state<F>(rule: Rule, cells: usize, steps: usize, mut visit: F) -> Result<()>
where
    F: FnMut(StateCode, &[StateCode]),
{
    check_cells(cells)?;
    let mut sim = Simulation::new(steps, cells);
    let state_count: StateCode = 1 << cells;

    for state in 0..state_count {
        let base = initial_state(state, cells);
        sim.load_base(&base, false)?;
        let codes = sim.evolve(rule).ok_or(Error::TooManyCells {
            cells,
            max: MAX_TRACKED_CELLS,
        })?;
        visit(state, &codes);
    }
    Ok(())
}

/// Evolve every possible initial state of `cells` cells under `rule` and tally visits.
///
/// Cost is `O(2^cells × steps × cells)`; keep `cells` small.
pub fn analyze_attractor(rule: Rule, cells: usize, steps: usize) -> Result<Attractor> {
    check_cells(cells)?;
    let state_count = 1usize << cells;
    let mut histogram = vec![vec![0u32; state_count]; steps + 1];
    let mut visited_per_step = vec![0u32; steps + 1];
    let mut state_visits = vec![0u32; state_count];

    for_each_initial_state(rule, cells, steps, |state, codes| {
        let initial = std::iter::once(state).chain(codes.iter().copied());
        for (step, code) in initial.enumerate() {
            let slot = &mut histogram[step][code as usize];
            *slot += 1;
            if *slot == 1 {
                visited_per_step[step] += 1;
            }
            state_visits[code as usize] += 1;
        }
    })?;

    log::debug!(
        "{rule}: {cells} cells, {steps} steps, {} distinct final states",
        visited_per_step[steps]
    );

    Ok(Attractor {
        rule,
        cells,
        steps,
        histogram,
        visited_per_step,
        state_visits,
    })
}

/// Normalized Shannon entropy of one histogram row.
///
/// `H = -(1/cells) Σ p·log2(p)` with `p = count / 2^cells`; empty states are
/// skipped. `p` is taken over the number of possible states, not over the
/// number of samples.
pub fn entropy(counts: &[u32], cells: usize) -> f64 {
    let state_count = (1u64 << cells) as f64;
    let sum: f64 = counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = f64::from(c) / state_count;
            p * p.log2()
        })
        .sum();
    if sum == 0.0 {
        return 0.0;
    }
    -sum / cells as f64
}

/// Tally only the last step of every initial state of `cells` cells.
pub fn final_step_stats(rule: Rule, cells: usize, steps: usize) -> Result<FinalStepStats> {
    check_cells(cells)?;
    let state_count = 1usize << cells;
    let mut counts = vec![0u32; state_count];
    let mut distinct = 0usize;

    for_each_initial_state(rule, cells, steps, |state, codes| {
        let last = codes.last().copied().unwrap_or(state) as usize;
        counts[last] += 1;
        if counts[last] == 1 {
            distinct += 1;
        }
    })?;

    Ok(FinalStepStats {
        cells,
        unreached_fraction: (state_count - distinct) as f64 / state_count as f64,
        entropy: entropy(&counts, cells),
    })
}

/// Final-step statistics for every cell count in `cell_range`.
pub fn irreversibility(
    rule: Rule,
    cell_range: RangeInclusive<usize>,
    steps: usize,
) -> Result<Vec<FinalStepStats>> {
    cell_range
        .map(|cells| final_step_stats(rule, cells, steps))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_zero_visits_every_state_once() {
        let a = analyze_attractor(Rule::new(30), 3, 5).unwrap();
        assert_eq!(a.histogram.len(), 6);
        assert!(a.histogram[0].iter().all(|&c| c == 1));
        assert_eq!(a.histogram[0].iter().sum::<u32>(), 8);
        assert_eq!(a.visited_per_step[0], 8);
        assert!(a.visited_per_step.iter().sum::<u32>() >= 1);
    }

    #[test]
    fn every_row_sums_to_state_count() {
        let a = analyze_attractor(Rule::new(110), 4, 7).unwrap();
        for row in &a.histogram {
            assert_eq!(row.iter().sum::<u32>(), 16);
        }
        assert_eq!(a.state_visits.iter().sum::<u32>(), 16 * 8);
    }

    #[test]
    fn visited_counts_nonzero_entries() {
        let a = analyze_attractor(Rule::new(54), 5, 10).unwrap();
        for (row, &visited) in a.histogram.iter().zip(&a.visited_per_step) {
            let nonzero = row.iter().filter(|&&c| c > 0).count() as u32;
            assert_eq!(nonzero, visited);
        }
    }

    #[test]
    fn rule_0_collapses_to_zero_state() {
        let a = analyze_attractor(Rule::new(0), 4, 3).unwrap();
        assert_eq!(a.visited_per_step, vec![16, 1, 1, 1]);
        assert_eq!(a.histogram[1][0], 16);
        assert_eq!(a.state_visits[0], 1 + 3 * 16);
        let h = a.entropies();
        assert!((h[0] - 1.0).abs() < 1e-12);
        assert!(h[1].abs() < 1e-12);
    }

    #[test]
    fn identity_rule_is_reversible() {
        let a = analyze_attractor(Rule::new(204), 4, 4).unwrap();
        assert!(a.visited_per_step.iter().all(|&v| v == 16));
        assert!(a.entropies().iter().all(|h| (h - 1.0).abs() < 1e-12));
    }

    #[test]
    fn entropy_uniform_is_one() {
        let counts = vec![1u32; 8];
        assert!((entropy(&counts, 3) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn entropy_concentrated_is_zero() {
        let mut counts = vec![0u32; 16];
        counts[5] = 16;
        assert_eq!(entropy(&counts, 4), 0.0);
    }

    #[test]
    fn entropy_divides_by_possible_states() {
        // A single sample: p = 1/8, not 1.
        let mut counts = vec![0u32; 8];
        counts[2] = 1;
        let expected = -(0.125f64 * 0.125f64.log2()) / 3.0;
        assert!((entropy(&counts, 3) - expected).abs() < 1e-12);
    }

    #[test]
    fn too_many_cells_rejected() {
        assert!(matches!(
            analyze_attractor(Rule::new(30), 32, 2),
            Err(Error::TooManyCells { cells: 32, .. })
        ));
    }

    #[test]
    fn final_step_stats_rule_0() {
        let s = final_step_stats(Rule::new(0), 5, 4).unwrap();
        assert!((s.unreached_fraction - 31.0 / 32.0).abs() < 1e-12);
        assert!(s.entropy.abs() < 1e-12);
    }

    #[test]
    fn final_step_stats_identity() {
        let s = final_step_stats(Rule::new(204), 6, 4).unwrap();
        assert_eq!(s.unreached_fraction, 0.0);
        assert!((s.entropy - 1.0).abs() < 1e-12);
    }

    #[test]
    fn final_step_matches_full_histogram() {
        let a = analyze_attractor(Rule::new(30), 6, 9).unwrap();
        let s = final_step_stats(Rule::new(30), 6, 9).unwrap();
        let distinct = a.visited_per_step[9] as f64;
        assert!((s.unreached_fraction - (64.0 - distinct) / 64.0).abs() < 1e-12);
        assert!((s.entropy - a.entropies()[9]).abs() < 1e-12);
    }

    #[test]
    fn irreversibility_covers_range() {
        let sweep = irreversibility(Rule::new(54), 3..=8, 5).unwrap();
        assert_eq!(sweep.len(), 6);
        assert_eq!(sweep[0].cells, 3);
        assert_eq!(sweep[5].cells, 8);
        for s in &sweep {
            assert!((0.0..1.0).contains(&s.unreached_fraction));
        }
    }
}
