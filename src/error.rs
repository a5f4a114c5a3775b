use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the simulation engine, the analyses and the writers.
#[derive(Debug, Error)]
pub enum Error {
    /// A base row handed to `Fixed` or `MirroredFlip` initialization has the wrong width.
    #[error("base row has {found} entries, expected {expected} (cells + 2)")]
    BaseLength { expected: usize, found: usize },

    /// The state space is too large to enumerate or encode.
    #[error("{cells} cells exceed the limit of {max} for state-code tracking")]
    TooManyCells { cells: usize, max: usize },

    /// A derived quantity could not be computed (converged series, degenerate fit).
    #[error("not computable: {0}")]
    NotComputable(String),

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode GIF {}: {source}", path.display())]
    Gif {
        path: PathBuf,
        #[source]
        source: gif::EncodingError,
    },
}

/// Reasons a least-squares fit can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegressionError {
    #[error("no points to fit")]
    Empty,

    #[error("x has {xs} points but y has {ys}")]
    LengthMismatch { xs: usize, ys: usize },

    /// `n·Sxx − Sx²` (or `n·Syy − Sy²`) is exactly zero.
    #[error("zero denominator in the {axis} slope")]
    ZeroDenominator { axis: char },

    /// `slope · slope_x` is negative, so the correlation is not real.
    #[error("negative product of slopes, correlation is not real")]
    NegativeCorrelation,
}

impl From<RegressionError> for Error {
    fn from(e: RegressionError) -> Self {
        Error::NotComputable(e.to_string())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
