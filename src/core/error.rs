// src/core/error.rs

use thiserror::Error;

/// Error taxonomy of the factoring pipeline.
///
/// Configuration errors are fatal and reported immediately. Selection,
/// relation and square-root failures carry enough context for the
/// orchestrator to decide whether a retry path exists.
#[derive(Error, Debug)]
pub enum GnfsError {
    /// The target integer is unusable (n <= 1 or even).
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// Configuration file or environment override could not be read.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// The prime file was missing, unreadable, or not an ascending prime list.
    #[error("prime file {path:?}: {reason}")]
    PrimeFile { path: String, reason: String },

    /// The requested polynomial degree is unsupported.
    #[error("unsupported polynomial degree {0}: must be odd and at least 3")]
    InvalidDegree(usize),

    /// No monic irreducible degree-d polynomial was found within the retry budget.
    #[error("polynomial selection failed for degree {degree} after {tried} candidates")]
    SelectionFailed { degree: usize, tried: usize },

    /// The smoothness bound yields an empty rational or algebraic base.
    #[error("degenerate factor base: {0}")]
    DegenerateFactorBase(String),

    /// The sieve interval was exhausted below the relation quota.
    #[error("insufficient relations: found {found} of {needed}")]
    InsufficientRelations { found: usize, needed: usize },

    /// The algebraic square root could not be reconstructed within the prime budget.
    #[error("square root reconstruction failed: {0}")]
    SquareRootFailed(String),

    /// Cooperative cancellation was requested.
    #[error("cancelled")]
    Cancelled,
}
