//! Fixed chart parameters: the modeled year range, long-term buildout goals,
//! canvas geometry, and animation timing. The core takes no CLI or environment
//! configuration; everything tunable lives here.

pub const WIDTH: f64 = 1920.0;
pub const HEIGHT: f64 = 500.0;
pub const MARGIN_PX: f64 = 50.0;
/// Right margin is wider so end-of-curve labels fit inside the canvas.
pub const RIGHT_MARGIN_PX: f64 = 250.0;

pub const START_YEAR: i32 = 1980;
pub const THIS_YEAR: i32 = 2023;
pub const END_YEAR: i32 = 2040;

/// Target residential area per unit of office area.
pub const RESIDENCE_TARGET_RATIO: f64 = 1.676009385;
/// Target amenity area per unit of office area.
pub const AMENITIES_TARGET_RATIO: f64 = 0.18315354;

/// Long-term buildout goals in square feet.
pub const AMENITY_GOAL: f64 = 4_387_588.0;
pub const RESIDENTIAL_GOAL: f64 = 40_150_128.0;

/// Office square footage in the reference year; feature-mode office ratios are
/// expressed against this.
pub const OFFICE_REFERENCE: f64 = 27_000_000.0;

/// Frames per animation loop: 60 seconds at 60 fps.
pub const CYCLE_FRAMES: u64 = 3600;

/// Years with a scheduled community meeting, drawn as highlighted bands.
pub const MILESTONE_YEARS: [i32; 6] = [2025, 2028, 2031, 2034, 2037, 2040];

/// Feature records with no visibility interval are assumed to appear in 2030;
/// a missing or zero end year means the building never disappears within the
/// modeled horizon.
pub const DEFAULT_VISIBLE_FROM: i32 = 2030;
pub const DEFAULT_VISIBLE_TO: i32 = 5000;

/// Text line height in pixels, used for label stacking.
pub const LINE_HEIGHT_PX: f64 = 14.0;
