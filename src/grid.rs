use std::fmt;

/// Integer encoding of the real cells of one generation, column 1 most significant.
pub type StateCode = u32;

/// Widest row whose state code is tracked. Matches the 32-bit state space.
pub const MAX_TRACKED_CELLS: usize = 31;

/// An elementary CA rule (Wolfram numbering) expanded into its 8-entry lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rule {
    number: u8,
    /// Entry `v` is the next value of a cell whose neighborhood reads `v`
    /// (left neighbor bit 2, center bit 1, right neighbor bit 0).
    table: [u8; 8],
}

impl Rule {
    pub fn new(number: u8) -> Self {
        let mut table = [0u8; 8];
        for (v, entry) in table.iter_mut().enumerate() {
            *entry = (number >> v) & 1;
        }
        Self { number, table }
    }

    /// Rule number in `0..=255`.
    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn table(&self) -> &[u8; 8] {
        &self.table
    }

    /// Next value of a cell given its left, center and right neighbors (each 0 or 1).
    #[inline]
    pub fn apply(&self, left: u8, center: u8, right: u8) -> u8 {
        self.table[(left << 2 | center << 1 | right) as usize]
    }

    /// All 256 elementary rules in ascending order.
    pub fn all() -> impl Iterator<Item = Rule> {
        (0..=255u8).map(Rule::new)
    }
}

impl From<u8> for Rule {
    fn from(number: u8) -> Self {
        Rule::new(number)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{:03}", self.number)
    }
}

/// How row 0 of a grid is built before evolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitMode<'a> {
    /// A single live cell at column `cells / 2 + 1`.
    Seed,
    /// Independent uniform 0/1 per real cell, ghost columns re-synced.
    Random,
    /// Copy of `base` with the center cell inverted. Ghost columns are copied, not re-synced.
    MirroredFlip(&'a [u8]),
    /// Verbatim copy of `base`, ghost columns included.
    Fixed(&'a [u8]),
}

impl InitMode<'_> {
    /// Short name used in output file names.
    pub fn label(&self) -> &'static str {
        match self {
            InitMode::Seed => "semilla",
            InitMode::Random => "aleatoria",
            InitMode::MirroredFlip(_) => "similar",
            InitMode::Fixed(_) => "fija",
        }
    }
}

/// Space-time diagram of one simulation: `steps + 1` generations of `cells + 2` values.
///
/// Columns `0` and `cells + 1` are ghost cells mirroring the opposite real edge,
/// which keeps the automaton periodic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    steps: usize,
    cells: usize,
    data: Vec<u8>,
}

impl Grid {
    /// Allocate a zeroed grid. Callers guarantee `steps >= 1` and `cells >= 2`.
    pub fn new(steps: usize, cells: usize) -> Self {
        Self {
            steps,
            cells,
            data: vec![0; (steps + 1) * (cells + 2)],
        }
    }

    /// Number of evolution steps (the grid holds one more row than this).
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Number of real cells per row.
    pub fn cells(&self) -> usize {
        self.cells
    }

    /// Row width including the two ghost columns.
    pub fn width(&self) -> usize {
        self.cells + 2
    }

    /// Number of rows (`steps + 1`).
    pub fn height(&self) -> usize {
        self.steps + 1
    }

    pub fn row(&self, step: usize) -> &[u8] {
        let w = self.width();
        &self.data[step * w..(step + 1) * w]
    }

    pub fn row_mut(&mut self, step: usize) -> &mut [u8] {
        let w = self.width();
        &mut self.data[step * w..(step + 1) * w]
    }

    /// The real cells of a row, without ghost columns.
    pub fn real_cells(&self, step: usize) -> &[u8] {
        &self.row(step)[1..=self.cells]
    }

    /// Rows `step - 1` (read) and `step` (write) borrowed together.
    pub(crate) fn rows_for_step(&mut self, step: usize) -> (&[u8], &mut [u8]) {
        let w = self.width();
        let (before, after) = self.data.split_at_mut(step * w);
        (&before[(step - 1) * w..], &mut after[..w])
    }

    /// Copy the real edges of a row into its ghost columns.
    pub fn sync_boundary(&mut self, step: usize) {
        let cells = self.cells;
        sync_row_boundary(self.row_mut(step), cells);
    }

    /// Whether the periodic boundary holds for a row.
    pub fn boundary_consistent(&self, step: usize) -> bool {
        let row = self.row(step);
        row[0] == row[self.cells] && row[self.cells + 1] == row[1]
    }

    /// State code of a row, or `None` when the row is too wide to encode.
    pub fn state_code(&self, step: usize) -> Option<StateCode> {
        state_code(self.real_cells(step))
    }

    /// Count live real cells in a row.
    pub fn population(&self, step: usize) -> usize {
        self.real_cells(step).iter().map(|&c| c as usize).sum()
    }

    /// Row-major view of all values, ghost columns included.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

pub(crate) fn sync_row_boundary(row: &mut [u8], cells: usize) {
    row[0] = row[cells];
    row[cells + 1] = row[1];
}

/// Encode real cells as a binary number, first cell most significant.
pub fn state_code(real_cells: &[u8]) -> Option<StateCode> {
    if real_cells.len() > MAX_TRACKED_CELLS {
        return None;
    }
    Some(
        real_cells
            .iter()
            .fold(0, |acc, &c| (acc << 1) | StateCode::from(c & 1)),
    )
}

/// Decode a state code into a full row of `cells + 2` values with synced ghost columns.
///
/// Bit `j` (from the least significant end) lands in column `cells - j`.
pub fn initial_state(code: StateCode, cells: usize) -> Vec<u8> {
    let mut row = vec![0u8; cells + 2];
    for j in 0..cells {
        row[cells - j] = ((code >> j) & 1) as u8;
    }
    sync_row_boundary(&mut row, cells);
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_new() {
        let grid = Grid::new(10, 8);
        assert_eq!(grid.height(), 11);
        assert_eq!(grid.width(), 10);
        assert_eq!(grid.as_slice().len(), 110);
        assert!(grid.as_slice().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_rule_table() {
        let rule = Rule::new(30);
        // 30 = 0b0001_1110
        assert_eq!(rule.table(), &[0, 1, 1, 1, 1, 0, 0, 0]);
        assert_eq!(rule.apply(1, 0, 0), 1);
        assert_eq!(rule.apply(1, 1, 1), 0);
    }

    #[test]
    fn test_rule_neighborhood_bit_order() {
        // Rule 2 maps only neighborhood 0b001 (right neighbor alive) to 1.
        let rule = Rule::new(2);
        assert_eq!(rule.apply(0, 0, 1), 1);
        assert_eq!(rule.apply(1, 0, 0), 0);
        // Rule 16 maps only 0b100 (left neighbor alive) to 1.
        let rule = Rule::new(16);
        assert_eq!(rule.apply(1, 0, 0), 1);
        assert_eq!(rule.apply(0, 0, 1), 0);
    }

    #[test]
    fn test_rule_display() {
        assert_eq!(Rule::new(4).to_string(), "R004");
        assert_eq!(Rule::new(110).to_string(), "R110");
        assert_eq!(Rule::all().count(), 256);
    }

    #[test]
    fn test_sync_boundary() {
        let mut grid = Grid::new(1, 4);
        grid.row_mut(0).copy_from_slice(&[0, 1, 0, 0, 1, 0]);
        assert!(!grid.boundary_consistent(0));
        grid.sync_boundary(0);
        assert_eq!(grid.row(0), &[1, 1, 0, 0, 1, 1]);
        assert!(grid.boundary_consistent(0));
    }

    #[test]
    fn test_state_code_msb_first() {
        assert_eq!(state_code(&[1, 0, 0]), Some(4));
        assert_eq!(state_code(&[0, 0, 1]), Some(1));
        assert_eq!(state_code(&[1, 0, 1, 1]), Some(11));
        assert_eq!(state_code(&[1; 32]), None);
    }

    #[test]
    fn test_initial_state_layout() {
        // 6 = 110 -> columns 1, 2 alive, column 3 dead.
        assert_eq!(initial_state(6, 3), vec![0, 1, 1, 0, 1]);
        assert_eq!(initial_state(1, 4), vec![1, 0, 0, 0, 1, 0]);
    }

    #[test]
    fn test_state_code_roundtrip_small() {
        for code in 0..(1 << 5) {
            let row = initial_state(code, 5);
            assert_eq!(state_code(&row[1..=5]), Some(code));
        }
    }

    #[test]
    fn test_population() {
        let mut grid = Grid::new(1, 5);
        grid.row_mut(0).copy_from_slice(&[1, 1, 0, 1, 1, 1, 1]);
        // Ghost columns are not counted.
        assert_eq!(grid.population(0), 4);
    }
}
