//! Screen-space polylines with precomputed arc length and bounding box, and
//! the per-category curve set built from one aggregation snapshot.

use kurbo::Point;
use rand::Rng;

use crate::{
    aggregate::ReduceData,
    coords::{ChartLayout, YearAxis},
};

/// Bounding-box corner sentinel for empty curves. A degenerate box has
/// `sp == ep == (SENTINEL, SENTINEL)`; callers must guard against empty
/// curves before using the box for reveal math.
pub const BBOX_SENTINEL: f64 = 1e12;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BoundingBox {
    /// Min corner.
    pub sp: Point,
    /// Max corner.
    pub ep: Point,
}

impl BoundingBox {
    pub fn span_x(&self) -> f64 {
        self.ep.x - self.sp.x
    }
}

/// An ordered polyline (one point per year, chronological) with its total
/// Euclidean arc length and axis-aligned bounding box.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Curve {
    pub points: Vec<Point>,
    pub length: f64,
    pub bbox: BoundingBox,
}

impl Curve {
    pub fn new(points: Vec<Point>) -> Self {
        let length = curve_length(&points);
        let bbox = curve_bbox(&points);
        Self {
            points,
            length,
            bbox,
        }
    }

    /// Like [`Curve::new`] but with stylistic vertical shakiness: independent
    /// uniform jitter in [-2.5, +2.5] px added to each y, clamped to y >= 0.
    /// x is never altered. Noise is drawn fresh on every rebuild, not cached.
    pub fn with_noise<R: Rng + ?Sized>(mut points: Vec<Point>, rng: &mut R) -> Self {
        for p in &mut points {
            let jitter = (rng.r#gen::<f64>() - 0.5) * 5.0;
            p.y = (p.y + jitter).max(0.0);
        }
        Self::new(points)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Sum of Euclidean distances between consecutive points; 0 for a single
/// point or an empty list.
pub fn curve_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Componentwise min/max over all points, sentinel extremes when empty.
pub fn curve_bbox(points: &[Point]) -> BoundingBox {
    let mut min = Point::new(BBOX_SENTINEL, BBOX_SENTINEL);
    let mut max = Point::new(-BBOX_SENTINEL, -BBOX_SENTINEL);
    for p in points {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    if points.is_empty() {
        let sentinel = Point::new(BBOX_SENTINEL, BBOX_SENTINEL);
        return BoundingBox {
            sp: sentinel,
            ep: sentinel,
        };
    }
    BoundingBox { sp: min, ep: max }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ResidentialCurves {
    pub early: Curve,
    pub mid: Curve,
    pub essential: Curve,
    pub executive: Curve,
    pub senior: Curve,
}

/// All chart curves, built from one [`ReduceData`] snapshot and therefore
/// index-aligned by year. Built once per data load and treated as immutable;
/// a refresh builds a brand-new set.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CurveSet {
    pub office: Curve,
    pub residential: ResidentialCurves,
    pub amenities: Curve,
}

impl CurveSet {
    /// Maps every series through the coordinate mapper and builds the curves.
    /// The office curve is drawn clean; residential and amenities carry the
    /// stylistic noise, matching the chart's hand-drawn look.
    #[tracing::instrument(skip_all)]
    pub fn build<R: Rng + ?Sized>(
        data: &ReduceData,
        layout: &ChartLayout,
        axis: &YearAxis,
        rng: &mut R,
    ) -> Self {
        let to_points = |series: &[f64]| -> Vec<Point> {
            series
                .iter()
                .enumerate()
                .map(|(i, ratio)| {
                    let nx = axis.normalize(axis.start + i as i32);
                    layout.normalized_to_coordinates(nx, *ratio)
                })
                .collect()
        };

        Self {
            office: Curve::new(to_points(&data.office)),
            residential: ResidentialCurves {
                early: Curve::with_noise(to_points(&data.residential.early), rng),
                mid: Curve::with_noise(to_points(&data.residential.mid), rng),
                essential: Curve::with_noise(to_points(&data.residential.essential), rng),
                executive: Curve::with_noise(to_points(&data.residential.executive), rng),
                senior: Curve::with_noise(to_points(&data.residential.senior), rng),
            },
            amenities: Curve::with_noise(to_points(&data.amenities), rng),
        }
    }
}
