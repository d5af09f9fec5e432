// src/config/mod.rs

use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Tuning knobs of the pipeline. Every heuristic constant of the classical
/// formulation lives here rather than inline in the algorithms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GnfsConfig {
    /// Scale constant K in the smoothness-bound heuristic
    /// B = K * exp((8/9)^(1/3) * (ln n)^(1/3) * (ln ln n)^(2/3)).
    /// Historically 10.
    pub smoothness_scale: f64,

    /// Degree of the selected polynomial. Must be odd (3, 5 or 7): the
    /// square-root stage relies on the field norm to separate the two
    /// modular square roots, which only works in odd degree.
    pub polynomial_degree: usize,

    /// How many base values m are tried before polynomial selection gives up.
    pub selection_retry_budget: usize,

    /// Minimum number of quadratic character pairs. The builder raises this
    /// to log2 of the relation quota when that is larger.
    pub quadratic_base_size: usize,

    /// Multiplier applied to the sieve half-width when a round ends short of
    /// the relation quota.
    pub interval_growth: f64,

    /// Maximum number of sieve rounds (initial round plus widenings).
    pub max_sieve_rounds: usize,

    /// Maximum number of inert primes tried while reconstructing the
    /// algebraic square root.
    pub sqrt_prime_budget: usize,

    /// How many nullspace vectors are attempted per linear-algebra round
    /// before going back to the sieve for more relations.
    pub nullspace_attempts: usize,

    /// Optional path of the plain-text polynomial cache. None disables it.
    #[serde(default)]
    pub polynomial_cache: Option<String>,
}

impl Default for GnfsConfig {
    fn default() -> Self {
        GnfsConfig {
            smoothness_scale: 10.0,
            polynomial_degree: 3,
            selection_retry_budget: 200,
            quadratic_base_size: 12,
            interval_growth: 2.0,
            max_sieve_rounds: 4,
            sqrt_prime_budget: 128,
            nullspace_attempts: 8,
            polynomial_cache: None,
        }
    }
}

impl GnfsConfig {
    /// Load configuration with precedence: nfsieve.toml -> NFSIEVE_* env vars -> defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_file("nfsieve.toml")
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("smoothness_scale", 10.0)?
            .set_default("polynomial_degree", 3)?
            .set_default("selection_retry_budget", 200)?
            .set_default("quadratic_base_size", 12)?
            .set_default("interval_growth", 2.0)?
            .set_default("max_sieve_rounds", 4)?
            .set_default("sqrt_prime_budget", 128)?
            .set_default("nullspace_attempts", 8)?;

        if path.as_ref().exists() {
            builder = builder.add_source(File::from(path.as_ref()));
        }

        builder = builder.add_source(
            Environment::with_prefix("NFSIEVE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
