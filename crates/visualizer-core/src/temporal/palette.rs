//! Deterministic colour assignment for plotted series.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VerificationError};

/// Colours drawn from when no palette is supplied.
pub const DEFAULT_PALETTE: [&str; 12] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf", "#393b79", "#637939",
];

/// Seed used by `Colors::default()`.
pub const DEFAULT_SEED: u64 = 1;

/// Where series colours come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Colors {
    /// Caller-supplied colours, used in order and cycled.
    Palette(Vec<String>),
    /// The default palette permuted by a seeded generator, then cycled.
    Seeded(u64),
}

impl Default for Colors {
    fn default() -> Self {
        Colors::Seeded(DEFAULT_SEED)
    }
}

impl Colors {
    /// One colour per series; the same input always yields the same colours.
    pub fn assign(&self, n: usize) -> Result<Vec<String>> {
        let palette: Vec<String> = match self {
            Colors::Palette(p) if p.is_empty() => {
                return Err(VerificationError::InvalidParameter {
                    name: "palette",
                    value: "[]".to_string(),
                    reason: "must contain at least one colour",
                });
            }
            Colors::Palette(p) => p.clone(),
            Colors::Seeded(seed) => {
                let mut p: Vec<String> = DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect();
                p.shuffle(&mut StdRng::seed_from_u64(*seed));
                p
            }
        };
        Ok(palette.iter().cycle().take(n).cloned().collect())
    }
}
