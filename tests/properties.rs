use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use ecalab::grid::{initial_state, state_code};
use ecalab::hamming::hamming_series;
use ecalab::{InitMode, Rule, Simulation};

fn random_run(rule: u8, steps: usize, cells: usize, seed: u64) -> Simulation {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut sim = Simulation::with_init(steps, cells, InitMode::Random, &mut rng).unwrap();
    sim.evolve(Rule::new(rule));
    sim
}

proptest! {
    /// Ghost columns mirror the opposite edge in every row of a random run.
    #[test]
    fn boundary_holds_after_every_step(
        rule in any::<u8>(),
        steps in 1..40_usize,
        cells in 2..80_usize,
        seed in any::<u64>(),
    ) {
        let sim = random_run(rule, steps, cells, seed);
        for step in 0..=steps {
            prop_assert!(sim.grid().boundary_consistent(step), "step {}", step);
        }
    }

    /// Same rule, same initial row: same grid.
    #[test]
    fn evolution_is_deterministic(
        rule in any::<u8>(),
        steps in 1..30_usize,
        cells in 2..60_usize,
        seed in any::<u64>(),
    ) {
        let a = random_run(rule, steps, cells, seed);
        let b = random_run(rule, steps, cells, seed);
        prop_assert_eq!(a.grid(), b.grid());
    }

    #[test]
    fn state_code_round_trip(cells in 2..=20_usize, raw in any::<u32>()) {
        let code = raw & ((1 << cells) - 1);
        let row = initial_state(code, cells);
        prop_assert_eq!(row.len(), cells + 2);
        prop_assert_eq!(state_code(&row[1..=cells]), Some(code));
    }

    /// Returned state codes agree with the rows left in the grid.
    #[test]
    fn evolve_codes_match_rows(
        rule in any::<u8>(),
        steps in 1..20_usize,
        cells in 2..=31_usize,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut sim = Simulation::with_init(steps, cells, InitMode::Random, &mut rng).unwrap();
        let codes = sim.evolve(Rule::new(rule)).unwrap();
        prop_assert_eq!(codes.len(), steps);
        for (i, &code) in codes.iter().enumerate() {
            prop_assert_eq!(sim.grid().state_code(i + 1), Some(code));
        }
    }

    /// Once an automaton and its perturbed twin agree, they agree forever.
    #[test]
    fn hamming_zero_is_absorbing(
        rule in any::<u8>(),
        steps in 1..40_usize,
        cells in 3..60_usize,
        seed in any::<u64>(),
    ) {
        let sim = random_run(rule, steps, cells, seed);
        let series = hamming_series(sim.grid(), Rule::new(rule)).unwrap();
        prop_assert_eq!(series.len(), steps + 1);
        prop_assert_eq!(series[0], 1);
        if let Some(first) = series.iter().position(|&h| h == 0) {
            prop_assert!(series[first..].iter().all(|&h| h == 0));
        }
    }
}
