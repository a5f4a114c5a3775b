use std::fmt;
use std::ops::RangeInclusive;

use crate::grid::{InitMode, Rule};

/// Rule applied when none is requested.
pub const DEFAULT_RULE: u8 = 54;

pub const MIN_STEPS: usize = 1;
pub const MAX_STEPS: usize = 5000;

pub const MIN_CELLS: usize = 2;
pub const MAX_CELLS: usize = 10000;

/// Widest automaton whose whole state space is enumerated.
pub const MAX_ENUMERATED_CELLS: usize = 20;

/// Initial condition selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitKind {
    #[default]
    Seed,
    Random,
}

impl InitKind {
    pub fn mode(self) -> InitMode<'static> {
        match self {
            InitKind::Seed => InitMode::Seed,
            InitKind::Random => InitMode::Random,
        }
    }

    pub fn label(self) -> &'static str {
        self.mode().label()
    }

    /// Accepts the file-name labels (`semilla`, `aleatoria`) and their English names.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "semilla" | "seed" => Some(InitKind::Seed),
            "aleatoria" | "random" => Some(InitKind::Random),
            _ => None,
        }
    }
}

impl fmt::Display for InitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The analysis a run performs, each with its own defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Program {
    /// Evolve and save the space-time diagram.
    Automaton,
    /// Hamming distance to a twin with the center cell flipped.
    Hamming,
    /// Exhaustive state-space visitation and entropy per step.
    Attractor,
    /// Final-step unreached fraction and entropy as a function of cell count.
    Irreversibility,
}

/// Parameters of one run, built from a [`Program`]'s defaults and `option:value` tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub program: Program,
    /// Rules to simulate, in order.
    pub rules: Vec<Rule>,
    pub steps: usize,
    pub cells: usize,
    pub init: InitKind,
    /// Cell counts swept by the irreversibility analysis.
    pub cell_range: RangeInclusive<usize>,
    /// Also compute the Hamming series and exponent.
    pub hamming: bool,
    /// Also run the exhaustive attractor analysis.
    pub attractor: bool,
    /// Also run the irreversibility sweep.
    pub irreversibility: bool,
    /// Save the space-time diagram even when the program does not by default.
    pub save_image: bool,
}

impl RunConfig {
    pub fn new(program: Program) -> Self {
        let (cells, steps) = match program {
            Program::Automaton | Program::Hamming => (1000, 500),
            Program::Attractor | Program::Irreversibility => (10, 20),
        };
        Self {
            program,
            rules: vec![Rule::new(DEFAULT_RULE)],
            steps,
            cells,
            init: InitKind::Seed,
            cell_range: 3..=MAX_ENUMERATED_CELLS,
            hamming: program == Program::Hamming,
            attractor: program == Program::Attractor,
            irreversibility: program == Program::Irreversibility,
            save_image: program == Program::Automaton,
        }
    }

    /// Apply `option:value` tokens. Bad values keep the current setting and log a warning.
    pub fn apply_options<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for token in tokens {
            self.apply_option(token.as_ref());
        }
    }

    fn apply_option(&mut self, token: &str) {
        let Some((key, value)) = token.split_once(':') else {
            log::warn!("Ignoring argument '{token}': expected option:value");
            return;
        };
        match key {
            "inicializacion" | "init" => match InitKind::parse(value) {
                Some(init) => self.init = init,
                None => log::warn!(
                    "Invalid initialization '{value}', expected semilla or aleatoria... keeping {}",
                    self.init
                ),
            },
            "regla" | "reglas" | "rule" | "rules" => self.set_rules(value),
            "pasos" | "steps" => {
                self.steps = parse_bounded(value, MIN_STEPS, MAX_STEPS, self.steps, "steps");
            }
            "celdas" | "cells" => self.set_cells(value),
            "hamming" => self.hamming = parse_flag(value),
            "atractor" | "attractor" => self.attractor = parse_flag(value),
            "irreversibilidad" | "irreversibility" => self.irreversibility = parse_flag(value),
            "guardar" | "save" => self.save_image = parse_flag(value),
            _ => log::warn!("Ignoring unknown option '{key}'"),
        }
    }

    fn set_rules(&mut self, value: &str) {
        if value == "todas" || value == "all" {
            self.rules = Rule::all().collect();
            return;
        }
        let rules: Vec<Rule> = parse_values(value, 0, 255)
            .into_iter()
            .map(|r| Rule::new(r as u8))
            .collect();
        if rules.is_empty() {
            log::warn!(
                "No valid rule in '{value}', expected values between 0 and 255... keeping {}",
                format_rules(&self.rules)
            );
        } else {
            self.rules = rules;
        }
    }

    fn set_cells(&mut self, value: &str) {
        // The irreversibility sweep takes a range of cell counts; a single N sweeps N alone.
        if self.program == Program::Irreversibility {
            let values = parse_values(value, 2, MAX_ENUMERATED_CELLS as i64);
            match (values.first(), values.last()) {
                (Some(&lo), Some(&hi)) => self.cell_range = lo as usize..=hi as usize,
                _ => log::warn!(
                    "Invalid cell range '{value}', expected N or a-b within 2-{MAX_ENUMERATED_CELLS}... keeping {}-{}",
                    self.cell_range.start(),
                    self.cell_range.end()
                ),
            }
            return;
        }
        let max = if self.enumerates_states() {
            MAX_ENUMERATED_CELLS
        } else {
            MAX_CELLS
        };
        self.cells = parse_bounded(value, MIN_CELLS, max, self.cells, "cells");
    }

    /// Whether the run evolves every possible initial state of `cells` cells.
    pub fn enumerates_states(&self) -> bool {
        matches!(self.program, Program::Attractor | Program::Irreversibility)
    }

    /// Clamp settings that only became invalid through a combination of options.
    pub fn validate(&mut self) {
        if self.attractor && self.cells > MAX_ENUMERATED_CELLS {
            log::warn!(
                "Attractor analysis needs at most {MAX_ENUMERATED_CELLS} cells, {} requested... disabling it",
                self.cells
            );
            self.attractor = false;
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value, "si" | "sí" | "yes" | "true" | "1")
}

fn parse_bounded(value: &str, min: usize, max: usize, current: usize, what: &str) -> usize {
    match value.trim().parse::<usize>() {
        Ok(v) if (min..=max).contains(&v) => v,
        _ => {
            log::warn!(
                "Invalid parameter '{value}', expected {what} between {min} and {max}... assuming {current}"
            );
            current
        }
    }
}

/// Parse a comma-separated list of integers; the last item may be an inclusive `a-b` range.
///
/// Values outside `[min, max]` and unparsable items are dropped with a warning.
pub fn parse_values(text: &str, min: i64, max: i64) -> Vec<i64> {
    let mut values = Vec::new();
    let accept = |v: i64, values: &mut Vec<i64>| {
        if (min..=max).contains(&v) {
            values.push(v);
        } else {
            log::warn!("Invalid parameter {v}, expected a value between {min} and {max}... discarded");
        }
    };

    let items: Vec<&str> = text.split(',').map(str::trim).collect();
    for (i, item) in items.iter().enumerate() {
        let is_last = i + 1 == items.len();
        if let Some((from, to)) = item.split_once('-').filter(|_| is_last) {
            match (from.trim().parse::<i64>(), to.trim().parse::<i64>()) {
                (Ok(from), Ok(to)) => {
                    let (lo, hi) = (from.max(min), to.min(max));
                    if (lo, hi) != (from, to) {
                        log::warn!(
                            "Range '{item}' exceeds {min}-{max}... keeping only values within it"
                        );
                    }
                    values.extend(lo..=hi);
                }
                _ => log::warn!("Invalid range '{item}'... discarded"),
            }
            continue;
        }
        match item.parse::<i64>() {
            Ok(v) => accept(v, &mut values),
            Err(_) => log::warn!("Invalid parameter '{item}'... discarded"),
        }
    }
    values
}

/// Compact rule list for log messages.
pub fn format_rules(rules: &[Rule]) -> String {
    if rules.len() == 256 {
        return "all".to_string();
    }
    rules
        .iter()
        .map(|r| r.number().to_string())
        .collect::<Vec<_>>()
        .join(",")
}
