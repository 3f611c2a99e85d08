//! Cubic Bezier paths.
//!
//! A [`Bezier`] stores its vertices together with tangent handles that are
//! relative to the vertex they belong to, the same layout Lottie uses on the
//! wire. Curve parameters `t` are uniform per segment: with `n` vertices the
//! range `[0, 1]` is divided into `n - 1` equal spans regardless of arc length.

use crate::bounds::BoundingBox;
use crate::nvector::NVector;

/// A single vertex with its tangent handles.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BezierPoint {
    pub vertex: NVector,
    pub in_tangent: NVector,
    pub out_tangent: NVector,
}

impl BezierPoint {
    pub fn new(vertex: NVector, in_tangent: NVector, out_tangent: NVector) -> Self {
        Self {
            vertex,
            in_tangent,
            out_tangent,
        }
    }

    /// A corner point with zero-length handles.
    pub fn corner(vertex: NVector) -> Self {
        let zero = NVector::zeros(vertex.len());
        Self::new(vertex, zero.clone(), zero)
    }

    /// A point whose out handle mirrors the in handle.
    pub fn smooth(vertex: NVector, in_tangent: NVector) -> Self {
        let out_tangent = -&in_tangent;
        Self::new(vertex, in_tangent, out_tangent)
    }
}

/// An open or closed path made of cubic segments.
///
/// `vertices`, `in_tangents` and `out_tangents` are parallel arrays and always
/// have the same length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bezier {
    pub closed: bool,
    pub in_tangents: Vec<NVector>,
    pub out_tangents: Vec<NVector>,
    pub vertices: Vec<NVector>,
}

impl Bezier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn point(&self, index: usize) -> Option<BezierPoint> {
        Some(BezierPoint::new(
            self.vertices.get(index)?.clone(),
            self.in_tangents.get(index)?.clone(),
            self.out_tangents.get(index)?.clone(),
        ))
    }

    pub fn points(&self) -> impl Iterator<Item = BezierPoint> + '_ {
        (0..self.len()).filter_map(|i| self.point(i))
    }

    pub fn insert_point(
        &mut self,
        index: usize,
        vertex: NVector,
        in_tangent: NVector,
        out_tangent: NVector,
    ) -> &mut Self {
        self.vertices.insert(index, vertex);
        self.in_tangents.insert(index, in_tangent);
        self.out_tangents.insert(index, out_tangent);
        self.check_lengths();
        self
    }

    /// Appends a corner point.
    pub fn add_point(&mut self, vertex: NVector) -> &mut Self {
        self.add_bezier_point(BezierPoint::corner(vertex))
    }

    /// Appends a point with explicit handles.
    pub fn add_point_with(
        &mut self,
        vertex: NVector,
        in_tangent: NVector,
        out_tangent: NVector,
    ) -> &mut Self {
        let index = self.len();
        self.insert_point(index, vertex, in_tangent, out_tangent)
    }

    /// Appends a point whose out handle is the negated in handle.
    pub fn add_smooth_point(&mut self, vertex: NVector, in_tangent: NVector) -> &mut Self {
        self.add_bezier_point(BezierPoint::smooth(vertex, in_tangent))
    }

    pub fn add_bezier_point(&mut self, point: BezierPoint) -> &mut Self {
        self.add_point_with(point.vertex, point.in_tangent, point.out_tangent)
    }

    pub fn close(&mut self, closed: bool) -> &mut Self {
        self.closed = closed;
        self
    }

    fn check_lengths(&self) {
        debug_assert_eq!(self.vertices.len(), self.in_tangents.len());
        debug_assert_eq!(self.vertices.len(), self.out_tangents.len());
    }

    /// Control points of segment `i`, absolute.
    ///
    /// Segments whose handles are both zero are returned as a straight line
    /// (two points) so they are evaluated linearly.
    fn segment_points(&self, i: usize) -> Vec<NVector> {
        let v1 = &self.vertices[i];
        let v2 = &self.vertices[i + 1];
        let t1 = &self.out_tangents[i];
        let t2 = &self.in_tangents[i + 1];
        if t1.is_zero() && t2.is_zero() {
            vec![v1.clone(), v2.clone()]
        } else {
            vec![v1.clone(), v1 + t1, v2 + t2, v2.clone()]
        }
    }

    /// Maps a global parameter to a segment index and a local parameter.
    fn index_t(&self, t: f64) -> (usize, f64) {
        let segments = self.len().saturating_sub(1);
        if t <= 0.0 || segments == 0 {
            return (0, 0.0);
        }
        if t >= 1.0 {
            return (segments - 1, 1.0);
        }
        let scaled = t * segments as f64;
        let i = (scaled.floor() as usize).min(segments - 1);
        (i, scaled - i as f64)
    }

    /// Point on the curve at parameter `t` in `[0, 1]`.
    ///
    /// Empty paths yield the origin and single-vertex paths yield that vertex.
    pub fn point_at(&self, t: f64) -> NVector {
        match self.len() {
            0 => NVector::zeros(2),
            1 => self.vertices[0].clone(),
            _ => {
                let (i, local) = self.index_t(t);
                de_casteljau(&self.segment_points(i), local)
            }
        }
    }

    /// Angle in radians of the curve direction at `t`.
    pub fn tangent_angle_at(&self, t: f64) -> f64 {
        if self.len() < 2 {
            return 0.0;
        }
        let (i, local) = self.index_t(t);
        let points = self.segment_points(i);
        let deltas: Vec<NVector> = points.windows(2).map(|w| &w[1] - &w[0]).collect();
        let d = de_casteljau(&deltas, local);
        match (d.x(), d.y()) {
            (Some(x), Some(y)) => y.atan2(x),
            _ => 0.0,
        }
    }

    /// Splits the path at `t`, returning the two halves as new open paths.
    pub fn split_at(&self, t: f64) -> (Bezier, Bezier) {
        if self.len() < 2 {
            return (self.clone(), self.clone());
        }

        let (i, local) = self.index_t(t);
        let (left, right) = split_segment(&self.segment_points(i), local);
        let [_, left_out, split_in, split] = left;
        let [_, split_out, end_in, _] = right;

        let mut first = Bezier::new();
        for j in 0..i {
            first.add_point_with(
                self.vertices[j].clone(),
                self.in_tangents[j].clone(),
                self.out_tangents[j].clone(),
            );
        }
        first.add_point_with(
            self.vertices[i].clone(),
            self.in_tangents[i].clone(),
            left_out,
        );
        first.add_point_with(split.clone(), split_in.clone(), split_out.clone());

        let mut second = Bezier::new();
        second.add_point_with(split, split_in, split_out);
        second.add_point_with(
            self.vertices[i + 1].clone(),
            end_in,
            self.out_tangents[i + 1].clone(),
        );
        for j in i + 2..self.len() {
            second.add_point_with(
                self.vertices[j].clone(),
                self.in_tangents[j].clone(),
                self.out_tangents[j].clone(),
            );
        }

        (first, second)
    }

    /// The part of the path between `t1` and `t2`.
    ///
    /// Closed paths are opened first by repeating the first vertex. Equal
    /// parameters give a zero-length two-point path.
    pub fn segment(&self, t1: f64, t2: f64) -> Bezier {
        if self.closed && !self.is_empty() && self.vertices.first() != self.vertices.last() {
            let mut open = self.clone();
            open.add_point(self.vertices[0].clone());
            open.closed = false;
            return open.segment(t1, t2);
        }

        let (mut t1, mut t2) = (t1.min(1.0), t2.min(1.0));
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        } else if t1 == t2 {
            let p = self.point_at(t1);
            let mut seg = Bezier::new();
            seg.add_point(p.clone()).add_point(p);
            return seg;
        }

        let (_, rest) = self.split_at(t1);
        let (seg, _) = rest.split_at(self.remap_after_split(t1, t2));
        seg
    }

    /// Parameter on the second half of `split_at(t1)` matching `t2` on `self`.
    fn remap_after_split(&self, t1: f64, t2: f64) -> f64 {
        let (i1, l1) = self.index_t(t1);
        let (i2, l2) = self.index_t(t2);
        let rest_segments = self.len().saturating_sub(1 + i1).max(1) as f64;
        let (segment, local) = if i2 <= i1 {
            let local = if l1 < 1.0 { (l2 - l1) / (1.0 - l1) } else { 1.0 };
            (0, local)
        } else {
            (i2 - i1, l2)
        };
        ((segment as f64 + local) / rest_segments).clamp(0.0, 1.0)
    }

    /// Adds vertices at each of `positions` (increasing, in `[0, 1]`) without
    /// changing the shape.
    pub fn split_self_multi(&mut self, positions: &[f64]) {
        let Some((&first_t, others)) = positions.split_first() else {
            return;
        };
        if self.len() < 2 {
            return;
        }

        let (head, mut rest) = self.split_at(first_t);
        let mut result = Bezier::new();
        result.closed = self.closed;
        result.append_without_last(&head);

        let mut t1 = first_t;
        for &t2 in others {
            let (piece, remainder) = rest.split_at(self.remap_after_split(t1, t2));
            result.append_without_last(&piece);
            rest = remainder;
            t1 = t2;
        }

        for point in rest.points() {
            result.add_bezier_point(point);
        }
        *self = result;
    }

    fn append_without_last(&mut self, other: &Bezier) {
        for point in other.points().take(other.len().saturating_sub(1)) {
            self.add_bezier_point(point);
        }
    }

    /// Splits the path into `n_chunks` pieces of equal parameter span.
    pub fn split_self_chunks(&mut self, n_chunks: usize) {
        let positions: Vec<f64> = (1..n_chunks)
            .map(|i| i as f64 / n_chunks as f64)
            .collect();
        self.split_self_multi(&positions);
    }

    /// Inserts a midpoint in every segment.
    pub fn split_each_segment(&mut self) {
        if self.len() < 2 {
            return;
        }

        let original = std::mem::take(self);
        self.closed = original.closed;
        for i in 0..original.len() - 1 {
            let (left, right) = split_segment(&original.segment_points(i), 0.5);
            if i == 0 {
                self.add_point_with(
                    original.vertices[0].clone(),
                    original.in_tangents[0].clone(),
                    left[1].clone(),
                );
            } else if let Some(last) = self.out_tangents.last_mut() {
                *last = left[1].clone();
            }
            let [_, _, mid_in, mid] = left;
            let [_, mid_out, end_in, _] = right;
            self.add_point_with(mid, mid_in, mid_out);
            self.add_point_with(
                original.vertices[i + 1].clone(),
                end_in,
                original.out_tangents[i + 1].clone(),
            );
        }
    }

    /// Reverses the direction of the path in place.
    pub fn reverse(&mut self) {
        self.vertices.reverse();
        let mut in_tangents = std::mem::take(&mut self.out_tangents);
        let mut out_tangents = std::mem::take(&mut self.in_tangents);
        in_tangents.reverse();
        out_tangents.reverse();
        self.in_tangents = in_tangents;
        self.out_tangents = out_tangents;
    }

    /// A copy with sharp corners replaced by arcs of about `radius`.
    pub fn rounded(&self, radius: f64) -> Bezier {
        const ROUND_CORNER: f64 = 0.5519;

        let mut rounded = Bezier::new();
        rounded.closed = self.closed;
        let n = self.len();

        let toward = |current: &NVector, closer: &NVector| {
            let distance = (closer - current).length();
            let factor = if distance != 0.0 {
                (distance / 2.0).min(radius) / distance
            } else {
                0.0
            };
            let vertex = current + &((closer - current) * factor);
            let tangent = (&vertex - current) * -ROUND_CORNER;
            (vertex, tangent)
        };

        for (i, current) in self.vertices.iter().enumerate() {
            if !self.closed && (i == 0 || i == n - 1) {
                if let Some(point) = self.point(i) {
                    rounded.add_bezier_point(point);
                }
                continue;
            }
            let zero = NVector::zeros(current.len());
            let (before, out_tangent) = toward(current, &self.vertices[(i + n - 1) % n]);
            rounded.add_point_with(before, zero.clone(), out_tangent);
            let (after, in_tangent) = toward(current, &self.vertices[(i + 1) % n]);
            rounded.add_point_with(after, in_tangent, zero);
        }

        rounded
    }

    /// Scales vertices and handles by `amount`.
    pub fn scale(&mut self, amount: f64) {
        for list in [
            &mut self.vertices,
            &mut self.in_tangents,
            &mut self.out_tangents,
        ] {
            for v in list.iter_mut() {
                *v *= amount;
            }
        }
    }

    /// Interpolates point-wise towards `other`.
    ///
    /// Paths with different vertex counts cannot be blended: the result is
    /// `self` for `t < 1` and `other` otherwise.
    pub fn lerp(&self, other: &Bezier, t: f64) -> Bezier {
        if self.len() != other.len() {
            return if t < 1.0 { self.clone() } else { other.clone() };
        }

        let blend = |a: &[NVector], b: &[NVector]| -> Vec<NVector> {
            a.iter().zip(b).map(|(x, y)| x.lerp(y, t)).collect()
        };
        Bezier {
            closed: self.closed,
            in_tangents: blend(&self.in_tangents, &other.in_tangents),
            out_tangents: blend(&self.out_tangents, &other.out_tangents),
            vertices: blend(&self.vertices, &other.vertices),
        }
    }

    /// Sum of the straight distances between consecutive vertices.
    pub fn rough_length(&self) -> f64 {
        if self.len() < 2 {
            return 0.0;
        }
        let mut length: f64 = self
            .vertices
            .windows(2)
            .map(|w| (&w[1] - &w[0]).length())
            .sum();
        if self.closed {
            length += (&self.vertices[0] - &self.vertices[self.len() - 1]).length();
        }
        length
    }

    /// Box enclosing every vertex. Handles are not taken into account.
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bb = BoundingBox::default();
        for v in &self.vertices {
            if let (Some(x), Some(y)) = (v.x(), v.y()) {
                bb.include(x, y);
            }
        }
        bb
    }
}

/// Evaluates a Bezier given by its control points with repeated interpolation.
pub(crate) fn de_casteljau(points: &[NVector], t: f64) -> NVector {
    let mut level = points.to_vec();
    while level.len() > 1 {
        level = level.windows(2).map(|w| w[0].lerp(&w[1], t)).collect();
    }
    level.pop().unwrap_or_default()
}

/// Splits a single segment at local parameter `t`.
///
/// Each half is returned as `[start, start out handle, end in handle, end]`
/// with the handles relative to their vertex.
fn split_segment(points: &[NVector], t: f64) -> ([NVector; 4], [NVector; 4]) {
    let first = points[0].clone();
    let last = points[points.len() - 1].clone();

    if points.len() == 2 {
        let split = first.lerp(&last, t);
        let zero = NVector::zeros(split.len());
        return (
            [first, zero.clone(), zero.clone(), split.clone()],
            [split, zero.clone(), zero, last],
        );
    }

    let step = |pts: &[NVector]| -> Vec<NVector> {
        pts.windows(2).map(|w| w[0].lerp(&w[1], t)).collect()
    };
    let quad = step(points);
    let lin = step(&quad);
    let split = lin[0].lerp(&lin[1], t);

    let left = [
        first.clone(),
        &quad[0] - &first,
        &lin[0] - &split,
        split.clone(),
    ];
    let right = [
        split.clone(),
        &lin[1] - &split,
        &quad[2] - &last,
        last,
    ];
    (left, right)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close_to(a: &NVector, b: &NVector) -> bool {
        a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-6)
    }

    fn curve() -> Bezier {
        let mut bez = Bezier::new();
        bez.add_point_with(
            NVector::xy(0.0, 0.0),
            NVector::xy(0.0, 0.0),
            NVector::xy(20.0, 0.0),
        )
        .add_smooth_point(NVector::xy(50.0, 50.0), NVector::xy(-10.0, -10.0))
        .add_point_with(
            NVector::xy(100.0, 0.0),
            NVector::xy(0.0, 30.0),
            NVector::xy(0.0, 0.0),
        );
        bez
    }

    #[test]
    fn test_add_point_defaults_to_corner() {
        let mut bez = Bezier::new();
        bez.add_point(NVector::xy(1.0, 2.0));
        assert_eq!(bez.in_tangents[0], NVector::xy(0.0, 0.0));
        assert_eq!(bez.out_tangents[0], NVector::xy(0.0, 0.0));
    }

    #[test]
    fn test_smooth_point_mirrors_handle() {
        let mut bez = Bezier::new();
        bez.add_smooth_point(NVector::xy(0.0, 0.0), NVector::xy(3.0, -4.0));
        assert_eq!(bez.out_tangents[0], NVector::xy(-3.0, 4.0));
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut bez = curve();
        bez.close(true).close(true);
        assert!(bez.closed);
        bez.close(false);
        assert!(!bez.closed);
    }

    #[test]
    fn test_point_at_endpoints() {
        let bez = curve();
        assert!(close_to(&bez.point_at(0.0), &NVector::xy(0.0, 0.0)));
        assert!(close_to(&bez.point_at(0.5), &NVector::xy(50.0, 50.0)));
        assert!(close_to(&bez.point_at(1.0), &NVector::xy(100.0, 0.0)));
    }

    #[test]
    fn test_point_at_straight_segment_is_linear() {
        let mut bez = Bezier::new();
        bez.add_point(NVector::xy(0.0, 0.0))
            .add_point(NVector::xy(10.0, 0.0));
        assert!(close_to(&bez.point_at(0.25), &NVector::xy(2.5, 0.0)));
    }

    #[test]
    fn test_point_at_cubic_midpoint() {
        let mut bez = Bezier::new();
        bez.add_point_with(
            NVector::xy(0.0, 0.0),
            NVector::xy(0.0, 0.0),
            NVector::xy(0.0, 10.0),
        )
        .add_point_with(
            NVector::xy(10.0, 0.0),
            NVector::xy(0.0, 10.0),
            NVector::xy(0.0, 0.0),
        );
        // B(0.5) = (P0 + 3 P1 + 3 P2 + P3) / 8
        assert!(close_to(&bez.point_at(0.5), &NVector::xy(5.0, 7.5)));
    }

    #[test]
    fn test_split_continuity() {
        let bez = curve();
        for &t in &[0.1, 0.25, 0.5, 0.7, 0.9] {
            let expected = bez.point_at(t);
            let (first, second) = bez.split_at(t);
            assert!(close_to(&first.point_at(1.0), &expected), "t = {t}");
            assert!(close_to(&second.point_at(0.0), &expected), "t = {t}");
            assert_eq!(first.vertices[0], bez.vertices[0]);
            assert_eq!(second.vertices.last(), bez.vertices.last());
        }
    }

    #[test]
    fn test_split_preserves_uninvolved_points() {
        let bez = curve();
        let (first, second) = bez.split_at(0.75);
        assert_eq!(first.len(), 3);
        assert_eq!(first.point(0), bez.point(0));
        assert_eq!(first.vertices[1], bez.vertices[1]);
        assert_eq!(first.in_tangents[1], bez.in_tangents[1]);
        assert_eq!(second.len(), 2);
        assert_eq!(second.vertices[1], bez.vertices[2]);
        assert_eq!(second.out_tangents[1], bez.out_tangents[2]);
    }

    #[test]
    fn test_split_reproduces_sub_curves() {
        let bez = curve();
        let (first, _) = bez.split_at(0.25);
        // first half of segment 0 at local 0.5 is the original at t = 0.125
        assert!(close_to(&first.point_at(0.5), &bez.point_at(0.125)));
    }

    #[test]
    fn test_segment_degenerate() {
        let bez = curve();
        let seg = bez.segment(0.3, 0.3);
        assert_eq!(seg.len(), 2);
        assert_eq!(seg.vertices[0], seg.vertices[1]);
        assert!(close_to(&seg.vertices[0], &bez.point_at(0.3)));
    }

    #[test]
    fn test_segment_swaps_and_bounds() {
        let bez = curve();
        let a = bez.segment(0.2, 0.8);
        let b = bez.segment(0.8, 0.2);
        assert_eq!(a, b);
        assert!(close_to(&a.vertices[0], &bez.point_at(0.2)));
        assert!(close_to(a.vertices.last().unwrap(), &bez.point_at(0.8)));
    }

    #[test]
    fn test_segment_closed_includes_closing_edge() {
        let mut square = Bezier::new();
        square
            .add_point(NVector::xy(0.0, 0.0))
            .add_point(NVector::xy(10.0, 0.0))
            .add_point(NVector::xy(10.0, 10.0))
            .add_point(NVector::xy(0.0, 10.0))
            .close(true);
        let seg = square.segment(0.75, 1.0);
        assert!(!seg.closed);
        assert!(close_to(&seg.vertices[0], &NVector::xy(0.0, 10.0)));
        assert!(close_to(seg.vertices.last().unwrap(), &NVector::xy(0.0, 0.0)));
    }

    #[test]
    fn test_split_self_chunks_keeps_shape() {
        let mut bez = Bezier::new();
        bez.add_point(NVector::xy(0.0, 0.0))
            .add_point(NVector::xy(30.0, 0.0));
        let original = bez.clone();
        bez.split_self_chunks(3);
        assert_eq!(bez.len(), 4);
        assert!(close_to(&bez.vertices[1], &NVector::xy(10.0, 0.0)));
        assert!(close_to(&bez.vertices[2], &NVector::xy(20.0, 0.0)));
        assert_eq!(bez.vertices[3], original.vertices[1]);
    }

    #[test]
    fn test_split_each_segment() {
        let mut bez = curve();
        let original = bez.clone();
        bez.split_each_segment();
        assert_eq!(bez.len(), 5);
        assert!(close_to(&bez.vertices[1], &original.point_at(0.25)));
        assert!(close_to(&bez.vertices[3], &original.point_at(0.75)));
        assert_eq!(bez.vertices[4], original.vertices[2]);
    }

    #[test]
    fn test_reverse_swaps_handles() {
        let mut bez = curve();
        let original = bez.clone();
        bez.reverse();
        assert_eq!(bez.vertices[0], original.vertices[2]);
        assert_eq!(bez.in_tangents[0], original.out_tangents[2]);
        assert_eq!(bez.out_tangents[0], original.in_tangents[2]);
        assert!(close_to(&bez.point_at(0.3), &original.point_at(0.7)));
    }

    #[test]
    fn test_rough_length_closed() {
        let mut bez = Bezier::new();
        bez.add_point(NVector::xy(0.0, 0.0))
            .add_point(NVector::xy(3.0, 0.0))
            .add_point(NVector::xy(3.0, 4.0));
        assert!((bez.rough_length() - 7.0).abs() < 1e-9);
        bez.close(true);
        assert!((bez.rough_length() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_lerp_mismatched_counts() {
        let a = curve();
        let mut b = Bezier::new();
        b.add_point(NVector::xy(0.0, 0.0));
        assert_eq!(a.lerp(&b, 0.5), a);
        assert_eq!(a.lerp(&b, 1.0), b);
    }

    #[test]
    fn test_rounded_open_keeps_endpoints() {
        let mut bez = Bezier::new();
        bez.add_point(NVector::xy(0.0, 0.0))
            .add_point(NVector::xy(10.0, 0.0))
            .add_point(NVector::xy(10.0, 10.0));
        let rounded = bez.rounded(2.0);
        assert_eq!(rounded.len(), 4);
        assert_eq!(rounded.vertices[0], NVector::xy(0.0, 0.0));
        assert!(close_to(&rounded.vertices[1], &NVector::xy(8.0, 0.0)));
        assert!(close_to(&rounded.vertices[2], &NVector::xy(10.0, 2.0)));
        assert_eq!(rounded.vertices[3], NVector::xy(10.0, 10.0));
    }

    #[test]
    fn test_tangent_angle() {
        let mut bez = Bezier::new();
        bez.add_point(NVector::xy(0.0, 0.0))
            .add_point(NVector::xy(0.0, 10.0));
        assert!((bez.tangent_angle_at(0.5) - std::f64::consts::FRAC_PI_2).abs() < 1e-9);

        let mut line = Bezier::new();
        line.add_point(NVector::new(vec![0.0]))
            .add_point(NVector::new(vec![5.0]));
        assert_eq!(line.tangent_angle_at(0.5), 0.0);
    }

    #[test]
    fn test_bounding_box() {
        let bb = curve().bounding_box();
        assert_eq!(bb.x1, Some(0.0));
        assert_eq!(bb.x2, Some(100.0));
        assert_eq!(bb.y2, Some(50.0));
    }
}
