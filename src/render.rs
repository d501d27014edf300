//! Frame-driven chart rendering.
//!
//! The renderer owns the most recent [`CurveSet`] and a frame offset, derives
//! a looping phase from the caller's frame counter, and emits a flat list of
//! [`DrawCmd`]s per frame. Geometry and animation math stay pure and
//! unit-testable; executing the commands against an actual surface is the
//! embedder's job.

use kurbo::Point;

use crate::{
    cohort::Cohort,
    constants::{CYCLE_FRAMES, LINE_HEIGHT_PX, MILESTONE_YEARS},
    coords::{ChartLayout, YearAxis},
    curve::{Curve, CurveSet},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

pub const BACKGROUND: Rgba8 = Rgba8::opaque(0, 0, 0);
pub const GRID_COLOR: Rgba8 = Rgba8::opaque(255, 255, 255);
pub const MILESTONE_COLOR: Rgba8 = Rgba8::opaque(255, 255, 0);
pub const OFFICE_COLOR: Rgba8 = Rgba8::opaque(255, 255, 255);
pub const AMENITIES_COLOR: Rgba8 = Rgba8::opaque(255, 170, 0);
pub const EARLY_COLOR: Rgba8 = Rgba8::opaque(0, 200, 255);
pub const MID_COLOR: Rgba8 = Rgba8::opaque(0, 120, 255);
pub const ESSENTIAL_COLOR: Rgba8 = Rgba8::opaque(0, 255, 170);
pub const EXECUTIVE_COLOR: Rgba8 = Rgba8::opaque(255, 0, 170);
pub const SENIOR_COLOR: Rgba8 = Rgba8::opaque(170, 120, 255);

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Stroke {
    pub color: Rgba8,
    pub width: f64,
}

impl Stroke {
    pub const fn new(color: Rgba8, width: f64) -> Self {
        Self { color, width }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TextAlign {
    Left,
    Center,
}

/// One immediate-mode drawing primitive. A frame render is an ordered list of
/// these; later commands draw on top.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum DrawCmd {
    Clear {
        color: Rgba8,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    Polyline {
        points: Vec<Point>,
        stroke: Stroke,
    },
    Text {
        origin: Point,
        text: String,
        align: TextAlign,
        color: Rgba8,
    },
}

/// How the reveal front advances along a curve: by accumulated arc length
/// (constant apparent drawing speed) or by x-extent (constant horizontal
/// speed). One mode applies to every curve in a rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RevealMode {
    #[default]
    ByArcLength,
    BySpanX,
}

/// The prefix of a curve revealed at phase `t`, with the exact interpolated
/// front point. `None` for empty curves.
pub fn reveal(curve: &Curve, t: f64, mode: RevealMode) -> Option<(Vec<Point>, Point)> {
    let first = *curve.points.first()?;
    let target = match mode {
        RevealMode::ByArcLength => t * curve.length,
        RevealMode::BySpanX => t * curve.bbox.span_x(),
    };

    let mut out = vec![first];
    let mut consumed = 0.0;
    for w in curve.points.windows(2) {
        let step = match mode {
            RevealMode::ByArcLength => w[0].distance(w[1]),
            RevealMode::BySpanX => w[1].x - w[0].x,
        };
        if consumed + step >= target {
            let q = if step > 0.0 {
                ((target - consumed) / step).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let front = Point::new(
                w[0].x + q * (w[1].x - w[0].x),
                w[0].y + q * (w[1].y - w[0].y),
            );
            out.push(front);
            return Some((out, front));
        }
        consumed += step;
        out.push(w[1]);
    }

    // Accumulated extent never reached the target (t at or past 1, or float
    // slack on the last segment): the whole curve is revealed.
    let last = *out.last().unwrap_or(&first);
    Some((out, last))
}

/// One end-of-curve label.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CurveLabel {
    pub y: f64,
    pub text: String,
    pub color: Rgba8,
}

/// Collision avoidance for end-of-curve labels: sort descending by y, place
/// the first verbatim, and snap any label closer than one line height to the
/// previously placed one to exactly one line height below it. The stacked
/// position mildly lies about the curve's true endpoint; legibility wins.
pub fn stack_labels(mut labels: Vec<CurveLabel>, line_height: f64) -> Vec<CurveLabel> {
    labels.sort_by(|a, b| b.y.partial_cmp(&a.y).unwrap_or(std::cmp::Ordering::Equal));
    for i in 1..labels.len() {
        let prev = labels[i - 1].y;
        if prev - labels[i].y < line_height {
            labels[i].y = prev - line_height;
        }
    }
    labels
}

/// The per-frame entry point. Holds the current curve set (replaced wholesale
/// on refresh, never mutated in place) and the frame offset that anchors the
/// loop's phase to the moment data became available.
#[derive(Clone, Debug)]
pub struct Renderer {
    layout: ChartLayout,
    axis: YearAxis,
    mode: RevealMode,
    milestones: Vec<i32>,
    curves: Option<CurveSet>,
    frame_offset: u64,
}

impl Renderer {
    pub fn new(layout: ChartLayout, axis: YearAxis, mode: RevealMode) -> Self {
        Self {
            layout,
            axis,
            mode,
            milestones: MILESTONE_YEARS.to_vec(),
            curves: None,
            frame_offset: 0,
        }
    }

    /// Publishes a freshly built curve set, atomically replacing any previous
    /// one. The set is never mutated afterwards.
    pub fn install(&mut self, curves: CurveSet) {
        self.curves = Some(curves);
    }

    pub fn has_curves(&self) -> bool {
        self.curves.is_some()
    }

    /// Looping phase in [0, 1) for a frame counter.
    pub fn phase(&self, frame: u64) -> f64 {
        let elapsed = frame.saturating_sub(self.frame_offset);
        (elapsed % CYCLE_FRAMES) as f64 / CYCLE_FRAMES as f64
    }

    /// Renders one frame into draw commands. While no curve set is installed
    /// this is a no-op that keeps re-anchoring the frame offset, so the first
    /// real frame starts the cycle at phase 0 no matter how long loading took.
    #[tracing::instrument(skip(self))]
    pub fn render_frame(&mut self, frame: u64) -> Vec<DrawCmd> {
        let Some(curves) = self.curves.take() else {
            self.frame_offset = frame;
            return Vec::new();
        };

        let t = self.phase(frame);
        let mut cmds = vec![DrawCmd::Clear { color: BACKGROUND }];

        self.horizontal_guide(0.9, &mut cmds);
        self.draw_years(t, &mut cmds);
        let (labels, front_x) = self.draw_curves(&curves, t, &mut cmds);
        self.draw_labels(labels, front_x, &mut cmds);
        self.draw_milestones(t, &mut cmds);
        self.draw_axis(&mut cmds);

        self.curves = Some(curves);
        cmds
    }

    /// Reveals every curve, collecting the end-of-curve labels and the
    /// rightmost reveal front (the shared label anchor).
    fn draw_curves(
        &self,
        curves: &CurveSet,
        t: f64,
        cmds: &mut Vec<DrawCmd>,
    ) -> (Vec<CurveLabel>, f64) {
        let specs: [(&Curve, &str, Rgba8, f64); 7] = [
            (&curves.office, "OFFICE / R&D", OFFICE_COLOR, 4.0),
            (
                &curves.amenities,
                "AMENITIES & SERVICES",
                AMENITIES_COLOR,
                2.0,
            ),
            (
                &curves.residential.early,
                Cohort::Early.label(),
                EARLY_COLOR,
                2.0,
            ),
            (&curves.residential.mid, Cohort::Mid.label(), MID_COLOR, 2.0),
            (
                &curves.residential.essential,
                Cohort::Essential.label(),
                ESSENTIAL_COLOR,
                2.0,
            ),
            (
                &curves.residential.executive,
                Cohort::Executive.label(),
                EXECUTIVE_COLOR,
                2.0,
            ),
            (
                &curves.residential.senior,
                Cohort::Senior.label(),
                SENIOR_COLOR,
                2.0,
            ),
        ];

        let mut labels = Vec::with_capacity(specs.len());
        let mut front_x = self.layout.margin_left;
        for (index, (curve, text, color, width)) in specs.iter().enumerate() {
            let Some((points, front)) = reveal(curve, t, self.mode) else {
                continue;
            };
            cmds.push(DrawCmd::Polyline {
                points,
                stroke: Stroke::new(*color, *width),
            });
            labels.push(CurveLabel {
                y: front.y,
                text: (*text).to_string(),
                color: *color,
            });
            front_x = front_x.max(front.x);

            if index == 0 {
                // Headline rides just above the office reveal front.
                cmds.push(DrawCmd::Text {
                    origin: Point::new(150.0, front.y - 10.0),
                    text: "URBAN EQUILIBRIUM".to_string(),
                    align: TextAlign::Left,
                    color: OFFICE_COLOR,
                });
            }
        }
        (labels, front_x)
    }

    fn draw_labels(&self, labels: Vec<CurveLabel>, front_x: f64, cmds: &mut Vec<DrawCmd>) {
        for label in stack_labels(labels, LINE_HEIGHT_PX) {
            cmds.push(DrawCmd::Text {
                origin: Point::new(front_x + 5.0, label.y),
                text: label.text,
                align: TextAlign::Left,
                color: label.color,
            });
        }
    }

    /// Year gridlines fade in over a 7-year window trailing the reveal front;
    /// the current year is always drawn emphasized.
    fn draw_years(&self, t: f64, cmds: &mut Vec<DrawCmd>) {
        for (i, year) in self.axis.years().enumerate() {
            let ramp = self.fade_ramp(t, i as f64, 7.0);
            let nx = self.axis.normalize(year);

            if year == self.axis.current {
                self.vertical_line(nx, Stroke::new(GRID_COLOR, 3.0), cmds);
                self.tick_label(nx, year, 255, cmds);
            } else {
                let alpha = (100.0 * ramp) as u8;
                self.vertical_line(nx, Stroke::new(GRID_COLOR.with_alpha(alpha), 1.0), cmds);
                if i % 5 == 3 {
                    self.tick_label(nx, year, (255.0 * ramp) as u8, cmds);
                }
            }
        }
    }

    /// Milestone years get a thick highlighted band with a 1-year fade-in,
    /// independent of the main reveal.
    fn draw_milestones(&self, t: f64, cmds: &mut Vec<DrawCmd>) {
        for &year in &self.milestones {
            let index = f64::from(year - self.axis.start);
            let ramp = self.fade_ramp(t, index, 1.0);
            let nx = self.axis.normalize(year);
            let alpha = (100.0 * ramp) as u8;
            self.vertical_line(
                nx,
                Stroke::new(MILESTONE_COLOR.with_alpha(alpha), 10.0),
                cmds,
            );
        }
    }

    /// Linear 0..1 ramp over `window` years of normalized time, ending at the
    /// given year index. The window start is deliberately unclamped so early
    /// years fade in part-way through their window at t=0.
    fn fade_ramp(&self, t: f64, year_index: f64, window: f64) -> f64 {
        let n_start = self.axis.normalize_index(year_index - window);
        let n_year = self.axis.normalize_index(year_index);
        ((t - n_start) / (n_year - n_start)).clamp(0.0, 1.0)
    }

    fn vertical_line(&self, nx: f64, stroke: Stroke, cmds: &mut Vec<DrawCmd>) {
        cmds.push(DrawCmd::Line {
            from: self.layout.normalized_to_coordinates(nx, 0.0),
            to: self.layout.normalized_to_coordinates(nx, 1.0),
            stroke,
        });
    }

    fn tick_label(&self, nx: f64, year: i32, alpha: u8, cmds: &mut Vec<DrawCmd>) {
        let base = self.layout.normalized_to_coordinates(nx, 0.0);
        cmds.push(DrawCmd::Text {
            origin: Point::new(base.x, base.y + 20.0),
            text: year.to_string(),
            align: TextAlign::Center,
            color: GRID_COLOR.with_alpha(alpha),
        });
    }

    fn horizontal_guide(&self, ratio: f64, cmds: &mut Vec<DrawCmd>) {
        cmds.push(DrawCmd::Line {
            from: self.layout.normalized_to_coordinates(0.0, ratio),
            to: self.layout.normalized_to_coordinates(1.0, ratio),
            stroke: Stroke::new(GRID_COLOR.with_alpha(100), 1.0),
        });
    }

    fn draw_axis(&self, cmds: &mut Vec<DrawCmd>) {
        let origin = self.layout.normalized_to_coordinates(0.0, 0.0);
        let right = self.layout.normalized_to_coordinates(1.0, 0.0);
        let top = self.layout.normalized_to_coordinates(0.0, 1.0);
        let stroke = Stroke::new(GRID_COLOR, 3.0);
        cmds.push(DrawCmd::Line {
            from: origin,
            to: right,
            stroke,
        });
        cmds.push(DrawCmd::Line {
            from: origin,
            to: top,
            stroke,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{ReduceData, YearTotals, aggregate_features};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn line_curve() -> Curve {
        Curve::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(20.0, 10.0),
        ])
    }

    #[test]
    fn reveal_endpoints_match_phase_bounds() {
        let curve = line_curve();
        for mode in [RevealMode::ByArcLength, RevealMode::BySpanX] {
            let (_, start) = reveal(&curve, 0.0, mode).unwrap();
            assert_eq!(start, Point::new(0.0, 0.0));
            let (points, end) = reveal(&curve, 1.0, mode).unwrap();
            assert_eq!(end, Point::new(20.0, 10.0));
            assert_eq!(*points.last().unwrap(), end);
        }
    }

    #[test]
    fn reveal_is_monotonic_in_t() {
        let curve = line_curve();
        for mode in [RevealMode::ByArcLength, RevealMode::BySpanX] {
            let mut prev_x = -1.0;
            for step in 0..=100 {
                let t = f64::from(step) / 100.0;
                let (_, front) = reveal(&curve, t, mode).unwrap();
                assert!(front.x >= prev_x);
                prev_x = front.x;
            }
        }
    }

    #[test]
    fn reveal_interpolates_between_points() {
        let curve = line_curve();
        // Arc length = 10 + sqrt(200); halfway through the first segment.
        let t = 5.0 / curve.length;
        let (points, front) = reveal(&curve, t, RevealMode::ByArcLength).unwrap();
        assert!((front.x - 5.0).abs() < 1e-9);
        assert_eq!(front.y, 0.0);
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn reveal_of_empty_curve_is_none() {
        let curve = Curve::new(Vec::new());
        assert!(reveal(&curve, 0.5, RevealMode::ByArcLength).is_none());
    }

    #[test]
    fn reveal_of_single_point_returns_that_point() {
        let curve = Curve::new(vec![Point::new(3.0, 4.0)]);
        let (points, front) = reveal(&curve, 0.7, RevealMode::ByArcLength).unwrap();
        assert_eq!(front, Point::new(3.0, 4.0));
        assert_eq!(points, vec![Point::new(3.0, 4.0)]);
    }

    #[test]
    fn labels_stack_exactly_one_line_apart() {
        let labels = vec![
            CurveLabel {
                y: 100.0,
                text: "a".into(),
                color: GRID_COLOR,
            },
            CurveLabel {
                y: 100.0,
                text: "b".into(),
                color: GRID_COLOR,
            },
            CurveLabel {
                y: 100.0,
                text: "c".into(),
                color: GRID_COLOR,
            },
        ];
        let stacked = stack_labels(labels, 14.0);
        let ys: Vec<f64> = stacked.iter().map(|l| l.y).collect();
        assert_eq!(ys, vec![100.0, 86.0, 72.0]);
    }

    #[test]
    fn distant_labels_keep_their_natural_position() {
        let labels = vec![
            CurveLabel {
                y: 200.0,
                text: "a".into(),
                color: GRID_COLOR,
            },
            CurveLabel {
                y: 50.0,
                text: "b".into(),
                color: GRID_COLOR,
            },
        ];
        let stacked = stack_labels(labels, 14.0);
        assert_eq!(stacked[0].y, 200.0);
        assert_eq!(stacked[1].y, 50.0);
    }

    fn loaded_renderer() -> Renderer {
        let axis = YearAxis::chart();
        let layout = ChartLayout::default();
        let totals = aggregate_features(&[], &axis);
        let data = ReduceData::from_totals(&totals, &mut ChaCha8Rng::seed_from_u64(9));
        let set = CurveSet::build(&data, &layout, &axis, &mut ChaCha8Rng::seed_from_u64(10));
        let mut renderer = Renderer::new(layout, axis, RevealMode::ByArcLength);
        renderer.install(set);
        renderer
    }

    #[test]
    fn renderer_noops_until_curves_arrive() {
        let mut renderer = Renderer::new(
            ChartLayout::default(),
            YearAxis::chart(),
            RevealMode::ByArcLength,
        );
        assert!(renderer.render_frame(480).is_empty());
        assert!(renderer.render_frame(481).is_empty());
        // Offset tracked the last no-op frame, so the first real frame starts
        // the cycle at phase ~0.
        assert_eq!(renderer.phase(481), 0.0);
    }

    #[test]
    fn phase_loops_over_the_cycle() {
        let renderer = loaded_renderer();
        assert_eq!(renderer.phase(0), 0.0);
        assert_eq!(renderer.phase(CYCLE_FRAMES), 0.0);
        assert!((renderer.phase(CYCLE_FRAMES / 2) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn frame_emits_expected_command_mix() {
        let mut renderer = loaded_renderer();
        let cmds = renderer.render_frame(1800);

        assert!(matches!(cmds[0], DrawCmd::Clear { .. }));
        let polylines = cmds
            .iter()
            .filter(|c| matches!(c, DrawCmd::Polyline { .. }))
            .count();
        assert_eq!(polylines, 7);

        let texts: Vec<&String> = cmds
            .iter()
            .filter_map(|c| match c {
                DrawCmd::Text { text, .. } => Some(text),
                _ => None,
            })
            .collect();
        assert!(texts.iter().any(|t| t.as_str() == "OFFICE / R&D"));
        assert!(texts.iter().any(|t| t.as_str() == "SENIOR HOUSING"));
        assert!(texts.iter().any(|t| t.as_str() == "2023"));
    }

    #[test]
    fn stacked_frame_labels_never_overlap() {
        let mut renderer = loaded_renderer();
        for frame in [0, 600, 1800, 3599] {
            let cmds = renderer.render_frame(frame);
            let mut label_ys: Vec<f64> = cmds
                .iter()
                .filter_map(|c| match c {
                    DrawCmd::Text { origin, text, .. }
                        if text.contains("HOUSING")
                            || text.contains("OFFICE")
                            || text.contains("AMENITIES") =>
                    {
                        Some(origin.y)
                    }
                    _ => None,
                })
                .collect();
            label_ys.sort_by(|a, b| b.partial_cmp(a).unwrap());
            for pair in label_ys.windows(2) {
                assert!(pair[0] - pair[1] >= LINE_HEIGHT_PX - 1e-9);
            }
        }
    }

    #[test]
    fn install_replaces_the_previous_set() {
        let mut renderer = loaded_renderer();
        let axis = YearAxis::chart();
        let layout = ChartLayout::default();
        let totals = vec![YearTotals::default(); axis.year_count()];
        let data = ReduceData::from_totals(&totals, &mut ChaCha8Rng::seed_from_u64(1));
        let fresh = CurveSet::build(&data, &layout, &axis, &mut ChaCha8Rng::seed_from_u64(2));
        renderer.install(fresh);
        assert!(renderer.has_curves());
        assert!(!renderer.render_frame(0).is_empty());
    }
}
