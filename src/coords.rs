//! Pure coordinate mapping: normalized (time, ratio) pairs to pixel space.
//!
//! All pixel [`Point`]s in the crate originate here. Ratio 1.0 ("fully built
//! out") renders near the top of the plot, so the vertical axis is flipped.

use kurbo::Point;

use crate::{
    constants::{
        AMENITIES_TARGET_RATIO, END_YEAR, HEIGHT, MARGIN_PX, OFFICE_REFERENCE,
        RESIDENCE_TARGET_RATIO, RIGHT_MARGIN_PX, START_YEAR, THIS_YEAR, WIDTH,
    },
    error::{CitylineError, CitylineResult},
};

/// The modeled year range plus the reference ("current") year.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct YearAxis {
    pub start: i32,
    pub current: i32,
    pub end: i32,
}

impl YearAxis {
    pub fn new(start: i32, current: i32, end: i32) -> CitylineResult<Self> {
        if start >= end {
            return Err(CitylineError::validation("YearAxis start must be < end"));
        }
        if !(start..=end).contains(&current) {
            return Err(CitylineError::validation(
                "YearAxis current year must lie within [start, end]",
            ));
        }
        Ok(Self {
            start,
            current,
            end,
        })
    }

    /// The production axis used by the buildout chart.
    pub fn chart() -> Self {
        Self {
            start: START_YEAR,
            current: THIS_YEAR,
            end: END_YEAR,
        }
    }

    /// Maps a year onto [0, 1], saturating outside the range. Out-of-range
    /// years are absorbed silently; the chart prefers visual robustness over
    /// edge errors.
    pub fn normalize(&self, year: i32) -> f64 {
        let n = f64::from(year - self.start) / f64::from(self.end - self.start);
        n.clamp(0.0, 1.0)
    }

    /// Unclamped index normalization, used for fade windows that deliberately
    /// start before the axis (negative indices).
    pub fn normalize_index(&self, index: f64) -> f64 {
        index / f64::from(self.end - self.start)
    }

    /// Number of yearly samples, both endpoints inclusive.
    pub fn year_count(&self) -> usize {
        (self.end - self.start + 1) as usize
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + use<> {
        self.start..=self.end
    }
}

/// Canvas size and margins. The mapper is a pure function of this struct, so
/// alternative layouts are a matter of constructing a different value.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            margin_left: MARGIN_PX,
            margin_right: RIGHT_MARGIN_PX,
            margin_top: MARGIN_PX,
            margin_bottom: MARGIN_PX,
        }
    }
}

impl ChartLayout {
    pub fn plot_width(&self) -> f64 {
        self.width - self.margin_left - self.margin_right
    }

    pub fn plot_height(&self) -> f64 {
        self.height - self.margin_top - self.margin_bottom
    }

    /// Maps normalized coordinates into pixel space. `ny` is intentionally not
    /// clamped: callers may overflow the plot area to show over/under-shoot.
    pub fn normalized_to_coordinates(&self, nx: f64, ny: f64) -> Point {
        let x = self.plot_width() * nx + self.margin_left;
        let y = self.plot_height() * (1.0 - ny) + self.margin_top;
        Point::new(x, y)
    }
}

/// Office fulfillment ratio against the fixed reference-year office area.
pub fn office_ratio(office_area: f64) -> f64 {
    office_area / OFFICE_REFERENCE
}

/// Fulfillment of `used` area against the target implied by the same-year
/// office area. Zero or negative targets (no office yet) read as unfulfilled.
pub fn fulfillment_ratio(used: f64, office_area: f64, target_ratio: f64) -> f64 {
    let target = office_area * target_ratio;
    if target <= 0.0 { 0.0 } else { used / target }
}

/// Residential fulfillment for a whole-category total.
pub fn residential_ratio(residential_area: f64, office_area: f64) -> f64 {
    fulfillment_ratio(residential_area, office_area, RESIDENCE_TARGET_RATIO)
}

/// Amenity fulfillment for a whole-category total.
pub fn amenity_ratio(amenity_area: f64, office_area: f64) -> f64 {
    fulfillment_ratio(amenity_area, office_area, AMENITIES_TARGET_RATIO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_saturates_and_is_monotonic() {
        let axis = YearAxis::chart();
        assert_eq!(axis.normalize(START_YEAR), 0.0);
        assert_eq!(axis.normalize(END_YEAR), 1.0);
        assert_eq!(axis.normalize(START_YEAR - 100), 0.0);
        assert_eq!(axis.normalize(END_YEAR + 100), 1.0);

        let mut prev = -1.0;
        for year in (START_YEAR - 5)..=(END_YEAR + 5) {
            let n = axis.normalize(year);
            assert!(n >= prev);
            prev = n;
        }
    }

    #[test]
    fn axis_rejects_bad_ranges() {
        assert!(YearAxis::new(2000, 2000, 2000).is_err());
        assert!(YearAxis::new(2000, 2050, 2040).is_err());
        assert!(YearAxis::new(2000, 2020, 2040).is_ok());
    }

    #[test]
    fn year_count_is_inclusive() {
        assert_eq!(YearAxis::chart().year_count(), 61);
    }

    #[test]
    fn vertical_axis_is_flipped() {
        let layout = ChartLayout::default();
        let bottom = layout.normalized_to_coordinates(0.0, 0.0);
        let top = layout.normalized_to_coordinates(0.0, 1.0);
        assert!(top.y < bottom.y);
        assert_eq!(bottom.y, HEIGHT - MARGIN_PX);
        assert_eq!(top.y, MARGIN_PX);
    }

    #[test]
    fn mapping_round_trips_within_plot_rect() {
        let layout = ChartLayout::default();
        for &(nx, ny) in &[(0.0, 0.0), (0.25, 0.5), (0.5, 0.9), (1.0, 1.0)] {
            let p = layout.normalized_to_coordinates(nx, ny);
            let back_nx = (p.x - layout.margin_left) / layout.plot_width();
            let back_ny = 1.0 - (p.y - layout.margin_top) / layout.plot_height();
            assert!((back_nx - nx).abs() < 1e-12);
            assert!((back_ny - ny).abs() < 1e-12);
        }
    }

    #[test]
    fn ny_overshoot_is_allowed() {
        let layout = ChartLayout::default();
        let p = layout.normalized_to_coordinates(0.5, 1.5);
        assert!(p.y < layout.margin_top);
    }

    #[test]
    fn zero_office_reads_as_unfulfilled() {
        assert_eq!(residential_ratio(1_000.0, 0.0), 0.0);
        assert_eq!(amenity_ratio(1_000.0, 0.0), 0.0);
    }
}
