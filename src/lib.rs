//! cityline turns yearly land-use area data into looping, animated buildout
//! curves.
//!
//! # Pipeline overview
//!
//! 1. **Aggregate**: raw input (a year×category grid or per-building survival
//!    records) into per-year fulfillment series ([`aggregate_matrix`],
//!    [`aggregate_features`] + [`ReduceData::from_totals`])
//! 2. **Build**: series through the coordinate mapper into screen-space
//!    curves with arc length and bounds ([`CurveSet::build`])
//! 3. **Render**: one frame at a looping phase into an ordered list of draw
//!    commands ([`Renderer::render_frame`])
//!
//! The crate never touches a real drawing surface: a frame render is a
//! `Vec<DrawCmd>` for the embedder to execute, which keeps the geometry and
//! animation math deterministic and testable. Randomness (cohort jitter,
//! curve shakiness) is drawn from an explicitly threaded `rand` source, so a
//! seeded rng reproduces a chart exactly.
#![forbid(unsafe_code)]

pub mod aggregate;
pub mod cohort;
pub mod constants;
pub mod coords;
pub mod curve;
pub mod error;
pub mod render;
pub mod source;

pub use aggregate::{
    Category, FeatureRecord, LandUseGroup, ReduceData, YearTotals, aggregate_features,
    aggregate_matrix,
};
pub use cohort::{Cohort, divide_residential};
pub use coords::{ChartLayout, YearAxis};
pub use curve::{BoundingBox, Curve, CurveSet, ResidentialCurves};
pub use error::{CitylineError, CitylineResult};
pub use render::{CurveLabel, DrawCmd, Renderer, RevealMode, Rgba8, Stroke, TextAlign, reveal};
pub use source::load_features;
