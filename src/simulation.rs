use rand::Rng;

use crate::error::{Error, Result};
use crate::grid::{sync_row_boundary, Grid, InitMode, Rule, StateCode, MAX_TRACKED_CELLS};

/// Runs a one-dimensional elementary automaton over a space-time grid.
///
/// Owns the grid for the duration of one simulation. Row 0 is set with
/// [`Simulation::initialize`], then [`Simulation::evolve`] fills rows
/// `1..=steps` from it. Evolving again under another rule overwrites those
/// rows and reuses the same initial condition.
#[derive(Debug, Clone)]
pub struct Simulation {
    grid: Grid,
}

impl Simulation {
    /// A simulation of `cells` cells over `steps` steps, with an all-zero row 0.
    pub fn new(steps: usize, cells: usize) -> Self {
        Self {
            grid: Grid::new(steps, cells),
        }
    }

    /// A simulation whose row 0 is built with `mode`.
    pub fn with_init<R: Rng>(
        steps: usize,
        cells: usize,
        mode: InitMode<'_>,
        rng: &mut R,
    ) -> Result<Self> {
        let mut sim = Self::new(steps, cells);
        sim.initialize(mode, rng)?;
        Ok(sim)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn into_grid(self) -> Grid {
        self.grid
    }

    pub fn steps(&self) -> usize {
        self.grid.steps()
    }

    pub fn cells(&self) -> usize {
        self.grid.cells()
    }

    /// A simulation whose row 0 is a copy of `base`, center cell inverted when `flip_center`.
    ///
    /// The generator-free counterpart of [`Simulation::with_init`] for the
    /// `Fixed` and `MirroredFlip` modes.
    pub fn from_base(steps: usize, cells: usize, base: &[u8], flip_center: bool) -> Result<Self> {
        let mut sim = Self::new(steps, cells);
        sim.load_base(base, flip_center)?;
        Ok(sim)
    }

    /// Build row 0. The row is cleared first; `rng` is only drawn from in `Random` mode.
    pub fn initialize<R: Rng>(&mut self, mode: InitMode<'_>, rng: &mut R) -> Result<()> {
        let cells = self.grid.cells();
        match mode {
            InitMode::Seed => {
                let row = self.grid.row_mut(0);
                row.fill(0);
                row[cells / 2 + 1] = 1;
            }
            InitMode::Random => {
                let row = self.grid.row_mut(0);
                row.fill(0);
                for cell in &mut row[1..=cells] {
                    *cell = rng.gen_range(0..=1);
                }
                sync_row_boundary(row, cells);
            }
            InitMode::MirroredFlip(base) => self.load_base(base, true)?,
            InitMode::Fixed(base) => self.load_base(base, false)?,
        }
        Ok(())
    }

    /// Copy `base` (ghost columns included) into row 0, inverting the center cell
    /// when `flip_center`. Ghost columns are not re-synced after the flip.
    pub fn load_base(&mut self, base: &[u8], flip_center: bool) -> Result<()> {
        let center = self.grid.cells() / 2 + 1;
        check_base(base, self.grid.width())?;
        let row = self.grid.row_mut(0);
        row.copy_from_slice(base);
        if flip_center {
            row[center] ^= 1;
        }
        Ok(())
    }

    /// Evolve rows `1..=steps` from row 0 under `rule`.
    ///
    /// Returns the state code of every derived row (row 0 excluded), or `None`
    /// when rows are wider than [`MAX_TRACKED_CELLS`].
    pub fn evolve(&mut self, rule: Rule) -> Option<Vec<StateCode>> {
        let cells = self.grid.cells();
        let steps = self.grid.steps();
        let track = cells <= MAX_TRACKED_CELLS;
        let mut states = Vec::with_capacity(if track { steps } else { 0 });

        for step in 1..=steps {
            let (prev, next) = self.grid.rows_for_step(step);
            let mut state: StateCode = 0;
            for j in 1..=cells {
                let cell = rule.apply(prev[j - 1], prev[j], prev[j + 1]);
                next[j] = cell;
                if track {
                    state |= StateCode::from(cell) << (cells - j);
                }
            }
            sync_row_boundary(next, cells);
            if track {
                states.push(state);
            }
        }

        track.then_some(states)
    }
}

fn check_base(base: &[u8], width: usize) -> Result<()> {
    if base.len() != width {
        return Err(Error::BaseLength {
            expected: width,
            found: base.len(),
        });
    }
    Ok(())
}
