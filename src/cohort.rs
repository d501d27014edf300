//! Residential cohort split: a residential total divided into five demographic
//! segments with fixed target shares plus bounded jitter.

use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Cohort {
    Early,
    Mid,
    Essential,
    Executive,
    Senior,
}

impl Cohort {
    pub const ALL: [Cohort; 5] = [
        Cohort::Early,
        Cohort::Mid,
        Cohort::Essential,
        Cohort::Executive,
        Cohort::Senior,
    ];

    /// Fixed target share of total residential. Shares sum to 1.0.
    pub fn share(self) -> f64 {
        match self {
            Self::Early => 0.5,
            Self::Mid => 0.2,
            Self::Essential => 0.1,
            Self::Executive => 0.1,
            Self::Senior => 0.1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Early => "EARLY CAREER HOUSING",
            Self::Mid => "MID CAREER HOUSING",
            Self::Essential => "ESSENTIAL HOUSING",
            Self::Executive => "EXECUTIVE HOUSING",
            Self::Senior => "SENIOR HOUSING",
        }
    }
}

/// Splits a residential total into the five cohorts, in [`Cohort::ALL`] order.
///
/// Each value is `total * share * 0.8` plus a ±10% noise band
/// (`total * share * 0.2 * jitter`, jitter uniform on [-0.5, 0.5], drawn
/// independently per cohort per call). The sum is therefore only approximately
/// `total`; callers and tests must treat the outputs as bounded random
/// variables. The random source is threaded explicitly so a seeded rng makes
/// the split reproducible.
pub fn divide_residential<R: Rng + ?Sized>(total: f64, rng: &mut R) -> [f64; 5] {
    Cohort::ALL.map(|cohort| {
        let share = cohort.share();
        let jitter = rng.r#gen::<f64>() - 0.5;
        total * share * 0.8 + total * share * 0.2 * jitter
    })
}
