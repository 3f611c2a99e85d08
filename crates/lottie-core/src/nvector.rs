use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

/// A numeric vector of arbitrary length.
///
/// Used for positions, sizes, tangents and colors. Component-wise arithmetic
/// between vectors of different lengths operates on the shorter length.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NVector {
    pub components: Vec<f64>,
}

impl NVector {
    pub fn new(components: Vec<f64>) -> Self {
        Self { components }
    }

    /// A 2D vector.
    pub fn xy(x: f64, y: f64) -> Self {
        Self::new(vec![x, y])
    }

    /// A 3D vector.
    pub fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self::new(vec![x, y, z])
    }

    /// A vector of `len` zeros.
    pub fn zeros(len: usize) -> Self {
        Self::new(vec![0.0; len])
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn x(&self) -> Option<f64> {
        self.components.first().copied()
    }

    pub fn y(&self) -> Option<f64> {
        self.components.get(1).copied()
    }

    pub fn z(&self) -> Option<f64> {
        self.components.get(2).copied()
    }

    /// The first two components, missing ones read as 0.
    pub fn to_xy(&self) -> (f64, f64) {
        (self.x().unwrap_or(0.0), self.y().unwrap_or(0.0))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.components.iter()
    }

    /// Euclidean norm.
    pub fn length(&self) -> f64 {
        self.components.iter().map(|c| c * c).sum::<f64>().sqrt()
    }

    pub fn dot(&self, other: &NVector) -> f64 {
        self.components
            .iter()
            .zip(&other.components)
            .map(|(a, b)| a * b)
            .sum()
    }

    /// Cross product, defined for 3-vectors only.
    pub fn cross(&self, other: &NVector) -> Option<NVector> {
        match (self.components.as_slice(), other.components.as_slice()) {
            ([a1, a2, a3], [b1, b2, b3]) => Some(NVector::xyz(
                a2 * b3 - a3 * b2,
                a3 * b1 - a1 * b3,
                a1 * b2 - a2 * b1,
            )),
            _ => None,
        }
    }

    /// Linear interpolation: `self * (1 - t) + other * t`.
    pub fn lerp(&self, other: &NVector, t: f64) -> NVector {
        self * (1.0 - t) + other * t
    }

    /// Whether every component is zero.
    pub fn is_zero(&self) -> bool {
        self.components.iter().all(|c| *c == 0.0)
    }

    fn zip_with(&self, other: &NVector, f: impl Fn(f64, f64) -> f64) -> NVector {
        NVector::new(
            self.components
                .iter()
                .zip(&other.components)
                .map(|(a, b)| f(*a, *b))
                .collect(),
        )
    }

    fn map(&self, f: impl Fn(f64) -> f64) -> NVector {
        NVector::new(self.components.iter().map(|c| f(*c)).collect())
    }
}

impl<const N: usize> From<[f64; N]> for NVector {
    fn from(components: [f64; N]) -> Self {
        Self::new(components.to_vec())
    }
}

impl From<Vec<f64>> for NVector {
    fn from(components: Vec<f64>) -> Self {
        Self::new(components)
    }
}

impl fmt::Display for NVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<")?;
        for (i, c) in self.components.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{c}")?;
        }
        write!(f, ">")
    }
}

impl Index<usize> for NVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.components[index]
    }
}

impl IndexMut<usize> for NVector {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.components[index]
    }
}

macro_rules! vector_binop {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait<&NVector> for &NVector {
            type Output = NVector;

            fn $method(self, rhs: &NVector) -> NVector {
                self.zip_with(rhs, |a, b| a $op b)
            }
        }

        impl $trait<NVector> for NVector {
            type Output = NVector;

            fn $method(self, rhs: NVector) -> NVector {
                (&self).$method(&rhs)
            }
        }

        impl $trait<&NVector> for NVector {
            type Output = NVector;

            fn $method(self, rhs: &NVector) -> NVector {
                (&self).$method(rhs)
            }
        }
    };
}

vector_binop!(Add, add, +);
vector_binop!(Sub, sub, -);

macro_rules! scalar_binop {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait<f64> for &NVector {
            type Output = NVector;

            fn $method(self, rhs: f64) -> NVector {
                self.map(|c| c $op rhs)
            }
        }

        impl $trait<f64> for NVector {
            type Output = NVector;

            fn $method(self, rhs: f64) -> NVector {
                (&self).$method(rhs)
            }
        }
    };
}

scalar_binop!(Mul, mul, *);
scalar_binop!(Div, div, /);

impl Neg for NVector {
    type Output = NVector;

    fn neg(self) -> NVector {
        self.map(|c| -c)
    }
}

impl Neg for &NVector {
    type Output = NVector;

    fn neg(self) -> NVector {
        self.map(|c| -c)
    }
}

impl AddAssign<&NVector> for NVector {
    fn add_assign(&mut self, rhs: &NVector) {
        for (a, b) in self.components.iter_mut().zip(&rhs.components) {
            *a += b;
        }
    }
}

impl SubAssign<&NVector> for NVector {
    fn sub_assign(&mut self, rhs: &NVector) {
        for (a, b) in self.components.iter_mut().zip(&rhs.components) {
            *a -= b;
        }
    }
}

impl MulAssign<f64> for NVector {
    fn mul_assign(&mut self, rhs: f64) {
        for c in &mut self.components {
            *c *= rhs;
        }
    }
}

impl DivAssign<f64> for NVector {
    fn div_assign(&mut self, rhs: f64) {
        for c in &mut self.components {
            *c /= rhs;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        let a = NVector::xy(1.0, 2.0);
        let b = NVector::xy(3.0, 5.0);
        assert_eq!(&a + &b, NVector::xy(4.0, 7.0));
        assert_eq!(&b - &a, NVector::xy(2.0, 3.0));
        assert_eq!(&a * 2.0, NVector::xy(2.0, 4.0));
        assert_eq!(&b / 2.0, NVector::xy(1.5, 2.5));
        assert_eq!(-a, NVector::xy(-1.0, -2.0));
    }

    #[test]
    fn test_in_place_ops() {
        let mut v = NVector::xy(1.0, 1.0);
        v += &NVector::xy(2.0, 3.0);
        v *= 2.0;
        v[0] += 1.0;
        assert_eq!(v, NVector::xy(7.0, 8.0));
    }

    #[test]
    fn test_length_and_dot() {
        let v = NVector::xy(3.0, 4.0);
        assert!((v.length() - 5.0).abs() < 1e-9);
        assert!((v.dot(&NVector::xy(1.0, 2.0)) - 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_cross_only_for_3d() {
        let x = NVector::xyz(1.0, 0.0, 0.0);
        let y = NVector::xyz(0.0, 1.0, 0.0);
        assert_eq!(x.cross(&y), Some(NVector::xyz(0.0, 0.0, 1.0)));
        assert_eq!(NVector::xy(1.0, 0.0).cross(&NVector::xy(0.0, 1.0)), None);
    }

    #[test]
    fn test_lerp() {
        let a = NVector::xy(0.0, 10.0);
        let b = NVector::xy(10.0, 20.0);
        assert_eq!(a.lerp(&b, 0.5), NVector::xy(5.0, 15.0));
    }

    #[test]
    fn test_axis_accessors() {
        let v = NVector::new(vec![1.0]);
        assert_eq!(v.x(), Some(1.0));
        assert_eq!(v.y(), None);
        assert_eq!(v.z(), None);
    }

    #[test]
    fn test_serde_is_plain_array() {
        let v = NVector::xy(1.5, 2.0);
        assert_eq!(serde_json::to_string(&v).unwrap(), "[1.5,2.0]");
        let back: NVector = serde_json::from_str("[1, 2, 3]").unwrap();
        assert_eq!(back, NVector::xyz(1.0, 2.0, 3.0));
    }
}
