use std::ops::{Mul, MulAssign};

use crate::nvector::NVector;

/// A 3x3 affine matrix, row-major, operating on 2D points.
///
/// Points are column vectors. Builder operations pre-multiply, so
/// `m.translate(..).scale(..)` applies the translation first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformMatrix {
    m: [f64; 9],
}

/// The components a matrix decomposes into.
#[derive(Debug, Clone, PartialEq)]
pub struct DecomposedTransform {
    pub translation: NVector,
    /// Radians.
    pub angle: f64,
    pub scale: NVector,
    pub skew_axis: f64,
    pub skew_angle: f64,
}

impl Default for TransformMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl TransformMatrix {
    pub fn identity() -> Self {
        Self {
            m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
        }
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.m[row * 3 + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.m[row * 3 + col] = value;
    }

    pub fn a(&self) -> f64 {
        self.get(0, 0)
    }

    pub fn b(&self) -> f64 {
        self.get(1, 0)
    }

    pub fn c(&self) -> f64 {
        self.get(0, 1)
    }

    pub fn d(&self) -> f64 {
        self.get(1, 1)
    }

    pub fn tx(&self) -> f64 {
        self.get(0, 2)
    }

    pub fn ty(&self) -> f64 {
        self.get(1, 2)
    }

    pub fn rotation(radians: f64) -> Self {
        let (s, c) = radians.sin_cos();
        let mut m = Self::identity();
        m.set(0, 0, c);
        m.set(1, 0, s);
        m.set(0, 1, -s);
        m.set(1, 1, c);
        m
    }

    pub fn scale(&mut self, x: f64, y: f64) -> &mut Self {
        let mut m = Self::identity();
        m.set(0, 0, x);
        m.set(1, 1, y);
        self.then(m)
    }

    pub fn translate(&mut self, x: f64, y: f64) -> &mut Self {
        let mut m = Self::identity();
        m.set(0, 2, x);
        m.set(1, 2, y);
        self.then(m)
    }

    pub fn skew(&mut self, x_rad: f64, y_rad: f64) -> &mut Self {
        let mut m = Self::identity();
        m.set(0, 1, x_rad.tan());
        m.set(1, 0, y_rad.tan());
        self.then(m)
    }

    /// Skews by `skew` radians along an axis rotated by `axis` radians.
    pub fn skew_from_axis(&mut self, skew: f64, axis: f64) -> &mut Self {
        self.rotate(axis);
        self.skew(skew, 0.0);
        self.rotate(-axis)
    }

    pub fn rotate(&mut self, radians: f64) -> &mut Self {
        self.then(Self::rotation(radians))
    }

    /// Appends `next` so it runs after the current transform.
    pub fn then(&mut self, next: TransformMatrix) -> &mut Self {
        *self = next * *self;
        self
    }

    /// Transforms a 2D point.
    pub fn apply(&self, point: &NVector) -> NVector {
        let (x, y) = point.to_xy();
        NVector::xy(
            self.a() * x + self.c() * y + self.tx(),
            self.b() * x + self.d() * y + self.ty(),
        )
    }

    /// Splits the matrix into translation, rotation, scale and skew.
    pub fn extract_transform(&self) -> DecomposedTransform {
        let (a, b, c, d) = (self.a(), self.b(), self.c(), self.d());
        let delta = a * d - b * c;

        let (angle, sx, sy, skew_axis, r, sm) = if a != 0.0 || b != 0.0 {
            let r = a.hypot(b);
            (sign(b) * (a / r).acos(), r, delta / r, 0.0, r, 1.0)
        } else {
            let r = c.hypot(d);
            let angle = std::f64::consts::FRAC_PI_2 - sign(d) * (c / r).acos();
            (angle, delta / r, r, std::f64::consts::FRAC_PI_2, r, -1.0)
        };

        DecomposedTransform {
            translation: NVector::xy(self.tx(), self.ty()),
            angle,
            scale: NVector::xy(sx, sy),
            skew_axis,
            skew_angle: sm * (a * c + b * d).atan2(r * r),
        }
    }
}

fn sign(x: f64) -> f64 {
    if x < 0.0 {
        -1.0
    } else {
        1.0
    }
}

impl Mul for TransformMatrix {
    type Output = TransformMatrix;

    fn mul(self, other: TransformMatrix) -> TransformMatrix {
        let mut out = [0.0; 9];
        for row in 0..3 {
            for col in 0..3 {
                out[row * 3 + col] = (0..3).map(|k| self.get(row, k) * other.get(k, col)).sum();
            }
        }
        TransformMatrix { m: out }
    }
}

impl MulAssign for TransformMatrix {
    fn mul_assign(&mut self, other: TransformMatrix) {
        *self = *self * other;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn close_to(a: &NVector, b: &NVector) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-9)
    }

    #[test]
    fn test_identity_apply() {
        let m = TransformMatrix::identity();
        assert_eq!(m.apply(&NVector::xy(3.0, 4.0)), NVector::xy(3.0, 4.0));
    }

    #[test]
    fn test_apply_short_vector() {
        let mut matrix = TransformMatrix::identity();
        matrix.translate(1.0, 2.0);
        assert!(close_to(&matrix.apply(&NVector::new(vec![3.0])), &NVector::xy(4.0, 2.0)));
    }

    #[test]
    fn test_translate_then_scale() {
        let mut m = TransformMatrix::identity();
        m.translate(10.0, 0.0).scale(2.0, 3.0);
        assert!(close_to(&m.apply(&NVector::xy(1.0, 1.0)), &NVector::xy(22.0, 3.0)));
    }

    #[test]
    fn test_rotate() {
        let mut m = TransformMatrix::identity();
        m.rotate(FRAC_PI_2);
        assert!(close_to(&m.apply(&NVector::xy(1.0, 0.0)), &NVector::xy(0.0, 1.0)));
    }

    #[test]
    fn test_extract_transform() {
        let mut m = TransformMatrix::identity();
        m.scale(2.0, 3.0).rotate(0.5).translate(7.0, -1.0);
        let parts = m.extract_transform();
        assert!(close_to(&parts.translation, &NVector::xy(7.0, -1.0)));
        assert!((parts.angle - 0.5).abs() < 1e-9);
        assert!(close_to(&parts.scale, &NVector::xy(2.0, 3.0)));
    }
}
