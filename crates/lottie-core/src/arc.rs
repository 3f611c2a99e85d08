//! Elliptical arcs and their cubic approximation.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::bezier::{Bezier, BezierPoint};
use crate::nvector::NVector;

/// An ellipse, possibly rotated, used to generate arc segments.
#[derive(Debug, Clone, PartialEq)]
pub struct EllipseArc {
    pub center: NVector,
    pub radii: NVector,
    /// Angle between the main axis and the x axis, in radians.
    pub x_rotation: f64,
}

impl EllipseArc {
    pub fn new(center: NVector, radii: NVector, x_rotation: f64) -> Self {
        Self {
            center,
            radii,
            x_rotation,
        }
    }

    pub fn point(&self, t: f64) -> NVector {
        let (sin_r, cos_r) = self.x_rotation.sin_cos();
        let (sin_t, cos_t) = t.sin_cos();
        let (cx, cy) = self.center.to_xy();
        let (rx, ry) = self.radii.to_xy();
        NVector::xy(
            cx + rx * cos_r * cos_t - ry * sin_r * sin_t,
            cy + rx * sin_r * cos_t + ry * cos_r * sin_t,
        )
    }

    pub fn derivative(&self, t: f64) -> NVector {
        let (sin_r, cos_r) = self.x_rotation.sin_cos();
        let (sin_t, cos_t) = t.sin_cos();
        let (rx, ry) = self.radii.to_xy();
        NVector::xy(
            -rx * cos_r * sin_t - ry * sin_r * cos_t,
            -rx * sin_r * sin_t + ry * cos_r * cos_t,
        )
    }

    /// Cubic approximation of the arc from `angle_start` sweeping `angle_delta`.
    ///
    /// The arc is cut into equal steps of at most 90 degrees. Every returned
    /// point carries both handles; the first point has no in handle.
    pub fn to_bezier(&self, angle_start: f64, angle_delta: f64) -> Vec<BezierPoint> {
        let steps = ((angle_delta.abs() / FRAC_PI_2) - 1e-9).ceil().max(1.0);
        let step = angle_delta / steps;
        let alpha = arc_alpha(step);

        let mut points = Vec::with_capacity(steps as usize + 1);
        let q = self.derivative(angle_start) * alpha;
        points.push(BezierPoint::new(
            self.point(angle_start),
            NVector::zeros(2),
            q,
        ));

        for i in 1..=steps as usize {
            let angle = angle_start + step * i as f64;
            let q = self.derivative(angle) * alpha;
            points.push(BezierPoint::new(self.point(angle), -&q, q));
        }
        points
    }

    /// Center parameterization of an SVG arc.
    ///
    /// Returns the ellipse, the start angle and the signed sweep angle. Radii
    /// too small to reach `dest` are scaled up as SVG requires.
    pub fn from_svg_arc(
        start: &NVector,
        rx: f64,
        ry: f64,
        x_rotation_deg: f64,
        large: bool,
        sweep: bool,
        dest: &NVector,
    ) -> (EllipseArc, f64, f64) {
        let (mut rx, mut ry) = (rx.abs(), ry.abs());
        let (x1, y1) = start.to_xy();
        let (x2, y2) = dest.to_xy();
        let phi = PI * x_rotation_deg / 180.0;

        let half = NVector::xy((x1 - x2) / 2.0, (y1 - y2) / 2.0);
        let (x1p, y1p) = rotate(phi, &half, -1.0).to_xy();

        let cr = x1p.powi(2) / rx.powi(2) + y1p.powi(2) / ry.powi(2);
        if cr > 1.0 {
            let s = cr.sqrt();
            rx *= s;
            ry *= s;
        }

        let dq = rx.powi(2) * y1p.powi(2) + ry.powi(2) * x1p.powi(2);
        let pq = if dq != 0.0 {
            (rx.powi(2) * ry.powi(2) - dq) / dq
        } else {
            0.0
        };
        let mut cpm = pq.max(0.0).sqrt();
        if large == sweep {
            cpm = -cpm;
        }
        let cp = NVector::xy(cpm * rx * y1p / ry, -cpm * ry * x1p / rx);
        let center = rotate(phi, &cp, 1.0) + NVector::xy((x1 + x2) / 2.0, (y1 + y2) / 2.0);

        let u = NVector::xy((x1p - cp[0]) / rx, (y1p - cp[1]) / ry);
        let v = NVector::xy((-x1p - cp[0]) / rx, (-y1p - cp[1]) / ry);
        let theta1 = signed_angle(&NVector::xy(1.0, 0.0), &u);
        let mut delta = signed_angle(&u, &v).rem_euclid(TAU);
        if !sweep && delta > 0.0 {
            delta -= TAU;
        } else if sweep && delta < 0.0 {
            delta += TAU;
        }

        (
            EllipseArc::new(center, NVector::xy(rx, ry), phi),
            theta1,
            delta,
        )
    }
}

/// Handle length factor for a cubic spanning `step` radians.
fn arc_alpha(step: f64) -> f64 {
    step.sin() * ((4.0 + 3.0 * (step / 2.0).tan().powi(2)).sqrt() - 1.0) / 3.0
}

fn rotate(phi: f64, p: &NVector, sin_sign: f64) -> NVector {
    let c = phi.cos();
    let s = phi.sin() * sin_sign;
    let (x, y) = p.to_xy();
    NVector::xy(c * x - s * y, s * x + c * y)
}

fn signed_angle(u: &NVector, v: &NVector) -> f64 {
    let denom = u.length() * v.length();
    if denom == 0.0 {
        return 0.0;
    }
    let arg = (u.dot(v) / denom).clamp(-1.0, 1.0).acos();
    let ((ux, uy), (vx, vy)) = (u.to_xy(), v.to_xy());
    if ux * vy - uy * vx < 0.0 {
        -arg
    } else {
        arg
    }
}

impl Bezier {
    /// Appends an SVG-style elliptical arc from the last vertex to `dest`.
    ///
    /// An empty path just gets `dest`. An arc ending where it starts adds
    /// nothing, and a zero radius degrades to a straight corner point.
    pub fn arc_to(
        &mut self,
        rx: f64,
        ry: f64,
        x_rotation_deg: f64,
        large: bool,
        sweep: bool,
        dest: NVector,
    ) -> &mut Self {
        let Some(start) = self.vertices.last().cloned() else {
            return self.add_point(dest);
        };
        if start == dest {
            return self;
        }
        if rx == 0.0 || ry == 0.0 {
            return self.add_point(dest);
        }

        let (ellipse, theta1, delta) =
            EllipseArc::from_svg_arc(&start, rx, ry, x_rotation_deg, large, sweep, &dest);
        let points = ellipse.to_bezier(theta1, delta);

        if let (Some(last_out), Some(first)) = (self.out_tangents.last_mut(), points.first()) {
            *last_out = first.out_tangent.clone();
        }
        let last_in = points
            .last()
            .map(|p| p.in_tangent.clone())
            .unwrap_or_else(|| NVector::zeros(2));
        for point in points.iter().skip(1).take(points.len().saturating_sub(2)) {
            self.add_bezier_point(point.clone());
        }
        self.add_point_with(dest, last_in, NVector::zeros(2))
    }
}
