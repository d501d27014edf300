//! Temporal aggregation: raw yearly records into per-category fulfillment
//! series.
//!
//! Two named strategies exist and are intentionally not merged, because they
//! compute materially different "office" semantics:
//!
//! - [`aggregate_matrix`]: a year×category numeric grid where office is
//!   renormalized so the current year reads exactly 0.8, and cohort series are
//!   driven by percentage rows.
//! - [`aggregate_features`]: per-building survival intervals raw-summed into
//!   [`YearTotals`], with a goal-driven growth floor near the projection
//!   horizon and a terminal clamp in the final decade. Ratios are derived
//!   afterwards via [`ReduceData::from_totals`].

use rand::Rng;

use crate::{
    cohort::divide_residential,
    constants::{
        AMENITY_GOAL, DEFAULT_VISIBLE_FROM, DEFAULT_VISIBLE_TO, RESIDENCE_TARGET_RATIO,
        RESIDENTIAL_GOAL,
    },
    coords::{YearAxis, amenity_ratio, fulfillment_ratio, office_ratio},
    error::{CitylineError, CitylineResult},
};

/// Tagged land-use category, replacing stringly-typed per-year lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Category {
    Office,
    Residential,
    Amenities,
}

/// Land-use groups as they appear in feature records. Everything that is not
/// office or residential but still counts toward the chart rolls up into
/// [`Category::Amenities`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LandUseGroup {
    Office,
    Residential,
    Utility,
    Retail,
    Industrial,
    CharitableReligious,
}

impl LandUseGroup {
    /// Parses a record's group string; unknown groups yield `None` and the
    /// record is skipped by aggregation.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "office" => Some(Self::Office),
            "residential" => Some(Self::Residential),
            "utility" => Some(Self::Utility),
            "retail" => Some(Self::Retail),
            "industrial" => Some(Self::Industrial),
            "charitable-religious" | "charitable/religious" | "charitable religious" => {
                Some(Self::CharitableReligious)
            }
            _ => None,
        }
    }

    pub fn category(self) -> Category {
        match self {
            Self::Office => Category::Office,
            Self::Residential => Category::Residential,
            Self::Utility | Self::Retail | Self::Industrial | Self::CharitableReligious => {
                Category::Amenities
            }
        }
    }
}

/// One building's contribution: a land-use group, a chartable area, and the
/// interval of years during which it counts toward totals.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureRecord {
    pub group: Option<String>,
    pub chart_area: Option<f64>,
    pub visible_from: Option<i32>,
    pub visible_to: Option<i32>,
}

impl FeatureRecord {
    fn visibility(&self) -> (i32, i32) {
        let from = self.visible_from.unwrap_or(DEFAULT_VISIBLE_FROM);
        let to = match self.visible_to {
            None | Some(0) => DEFAULT_VISIBLE_TO,
            Some(v) => v,
        };
        (from, to)
    }
}

/// Raw per-year category totals (square feet), before ratio conversion.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct YearTotals {
    pub office: f64,
    pub residential: f64,
    pub amenities: f64,
}

/// Per-cohort yearly series, index-aligned with the year axis.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CohortSeries {
    pub early: Vec<f64>,
    pub mid: Vec<f64>,
    pub essential: Vec<f64>,
    pub executive: Vec<f64>,
    pub senior: Vec<f64>,
}

impl CohortSeries {
    fn zeroed(len: usize) -> Self {
        Self {
            early: vec![0.0; len],
            mid: vec![0.0; len],
            essential: vec![0.0; len],
            executive: vec![0.0; len],
            senior: vec![0.0; len],
        }
    }
}

/// The aggregator's output: per-year fulfillment ratios, one entry per year of
/// the axis (both endpoints inclusive), indexed by year offset.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ReduceData {
    pub office: Vec<f64>,
    pub residential: CohortSeries,
    pub amenities: Vec<f64>,
}

impl ReduceData {
    fn zeroed(len: usize) -> Self {
        Self {
            office: vec![0.0; len],
            residential: CohortSeries::zeroed(len),
            amenities: vec![0.0; len],
        }
    }

    pub fn year_count(&self) -> usize {
        self.office.len()
    }

    /// Converts raw feature-mode totals into fulfillment ratios: office
    /// against the fixed reference area, residential split into cohorts and
    /// measured against the office-implied target, amenities likewise.
    ///
    /// The cohort split draws fresh jitter from `rng` on every call.
    pub fn from_totals<R: Rng + ?Sized>(totals: &[YearTotals], rng: &mut R) -> Self {
        let mut out = Self::zeroed(totals.len());
        for (i, t) in totals.iter().enumerate() {
            out.office[i] = office_ratio(t.office);

            let [early, mid, essential, executive, senior] =
                divide_residential(t.residential, rng);
            let cohort = |use_area: f64, share: f64| {
                fulfillment_ratio(use_area, t.office, RESIDENCE_TARGET_RATIO * share)
            };
            out.residential.early[i] = cohort(early, crate::cohort::Cohort::Early.share());
            out.residential.mid[i] = cohort(mid, crate::cohort::Cohort::Mid.share());
            out.residential.essential[i] =
                cohort(essential, crate::cohort::Cohort::Essential.share());
            out.residential.executive[i] =
                cohort(executive, crate::cohort::Cohort::Executive.share());
            out.residential.senior[i] = cohort(senior, crate::cohort::Cohort::Senior.share());

            out.amenities[i] = amenity_ratio(t.amenities, t.office);
        }
        out
    }
}

// Matrix row layout, one column per year.
const ROW_OFFICE: usize = 0;
const ROW_RESIDENTIAL: usize = 1;
const ROW_COHORT_FIRST: usize = 2; // early, mid, essential, executive, senior
const ROW_AMENITIES_OVERRIDE: usize = 8;
const ROW_COUNT: usize = 9;

/// Matrix-mode aggregation. Office is renormalized so the current year equals
/// a 0.8 fulfillment ratio; residential fulfillment is measured against the
/// office-implied target and distributed by the percentage rows; amenities is
/// taken verbatim from the override row.
#[tracing::instrument(skip(grid))]
pub fn aggregate_matrix(grid: &[Vec<f64>], axis: &YearAxis) -> CitylineResult<ReduceData> {
    let years = axis.year_count();
    if grid.len() < ROW_COUNT {
        return Err(CitylineError::data(format!(
            "matrix must have at least {ROW_COUNT} rows, got {}",
            grid.len()
        )));
    }
    for (row, values) in grid.iter().enumerate().take(ROW_COUNT) {
        if values.len() < years {
            return Err(CitylineError::data(format!(
                "matrix row {row} has {} columns, need {years}",
                values.len()
            )));
        }
    }

    let current_index = (axis.current - axis.start) as usize;
    let reference_office = grid[ROW_OFFICE][current_index];
    if reference_office <= 0.0 {
        return Err(CitylineError::data(
            "current-year office area must be positive",
        ));
    }

    let mut out = ReduceData::zeroed(years);
    for i in 0..years {
        let office = grid[ROW_OFFICE][i];
        out.office[i] = office / (reference_office / 0.8);

        let fulfilled =
            fulfillment_ratio(grid[ROW_RESIDENTIAL][i], office, RESIDENCE_TARGET_RATIO) * 0.8;
        out.residential.early[i] = fulfilled * grid[ROW_COHORT_FIRST][i];
        out.residential.mid[i] = fulfilled * grid[ROW_COHORT_FIRST + 1][i];
        out.residential.essential[i] = fulfilled * grid[ROW_COHORT_FIRST + 2][i];
        out.residential.executive[i] = fulfilled * grid[ROW_COHORT_FIRST + 3][i];
        out.residential.senior[i] = fulfilled * grid[ROW_COHORT_FIRST + 4][i];

        out.amenities[i] = grid[ROW_AMENITIES_OVERRIDE][i];
    }

    tracing::debug!(years, "aggregated matrix input");
    Ok(out)
}

/// Feature-survival aggregation: raw area sums per year over each record's
/// visibility interval, then a linear growth floor toward the long-term goals,
/// then a terminal clamp to exactly the goals in the last decade.
///
/// An empty record set yields all-zero totals; that is not an error.
#[tracing::instrument(skip(features))]
pub fn aggregate_features(features: &[FeatureRecord], axis: &YearAxis) -> Vec<YearTotals> {
    let mut totals = vec![YearTotals::default(); axis.year_count()];

    let mut skipped = 0usize;
    for feature in features {
        let group = feature.group.as_deref().and_then(LandUseGroup::parse);
        let (Some(group), Some(area)) = (group, feature.chart_area) else {
            skipped += 1;
            continue;
        };
        let (from, to) = feature.visibility();

        for (i, year) in axis.years().enumerate() {
            if from <= year && year <= to {
                match group.category() {
                    Category::Office => totals[i].office += area,
                    Category::Residential => totals[i].residential += area,
                    Category::Amenities => totals[i].amenities += area,
                }
            }
        }
    }

    apply_growth_floor(&mut totals, axis);
    apply_terminal_clamp(&mut totals, axis);

    tracing::debug!(
        features = features.len(),
        skipped,
        "aggregated feature input"
    );
    totals
}

/// Enforces a straight-line minimum from the current year toward the goals, so
/// sparse or non-monotonic feature data never reads as regression. Applies
/// from the current year through `end - 5`.
fn apply_growth_floor(totals: &mut [YearTotals], axis: &YearAxis) {
    let ramp_years = f64::from(axis.end - axis.current - 5);
    if ramp_years <= 0.0 {
        return;
    }

    for (i, year) in axis.years().enumerate() {
        if year < axis.current || year > axis.end - 5 {
            continue;
        }
        let elapsed = f64::from(year - axis.current);
        let residential_floor = RESIDENTIAL_GOAL / ramp_years * elapsed;
        let amenity_floor = AMENITY_GOAL / ramp_years * elapsed;
        totals[i].residential = totals[i].residential.max(residential_floor);
        totals[i].amenities = totals[i].amenities.max(amenity_floor);
    }
}

/// The model asserts full goal achievement in the last decade regardless of
/// the computed value.
fn apply_terminal_clamp(totals: &mut [YearTotals], axis: &YearAxis) {
    for (i, year) in axis.years().enumerate() {
        if year > axis.end - 10 {
            totals[i].residential = RESIDENTIAL_GOAL;
            totals[i].amenities = AMENITY_GOAL;
        }
    }
}
