//! Elementary cellular automata on a ring: evolution, space-time diagrams,
//! Hamming damage spreading, and exhaustive state-space (attractor and
//! irreversibility) analysis.

pub mod attractor;
pub mod config;
pub mod error;
pub mod export;
pub mod grid;
pub mod hamming;
pub mod runner;
pub mod simulation;
pub mod stats;

pub use config::{InitKind, Program, RunConfig};
pub use error::{Error, Result};
pub use grid::{Grid, InitMode, Rule};
pub use runner::{RunReport, Runner};
pub use simulation::Simulation;
