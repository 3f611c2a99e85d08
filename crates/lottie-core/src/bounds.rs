use crate::nvector::NVector;

/// Axis-aligned bounding box. A box with no points included is null.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub x1: Option<f64>,
    pub y1: Option<f64>,
    pub x2: Option<f64>,
    pub y2: Option<f64>,
}

impl BoundingBox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x1: Some(x1),
            y1: Some(y1),
            x2: Some(x2),
            y2: Some(y2),
        }
    }

    /// Grows the box to contain the point.
    pub fn include(&mut self, x: f64, y: f64) {
        self.x1 = Some(self.x1.map_or(x, |v| v.min(x)));
        self.y1 = Some(self.y1.map_or(y, |v| v.min(y)));
        self.x2 = Some(self.x2.map_or(x, |v| v.max(x)));
        self.y2 = Some(self.y2.map_or(y, |v| v.max(y)));
    }

    /// Grows the box to contain `other`.
    pub fn expand(&mut self, other: &BoundingBox) {
        if let (Some(x1), Some(y1), Some(x2), Some(y2)) = (other.x1, other.y1, other.x2, other.y2) {
            self.include(x1, y1);
            self.include(x2, y2);
        }
    }

    pub fn is_null(&self) -> bool {
        self.x1.is_none() || self.y1.is_none() || self.x2.is_none() || self.y2.is_none()
    }

    pub fn width(&self) -> Option<f64> {
        Some(self.x2? - self.x1?)
    }

    pub fn height(&self) -> Option<f64> {
        Some(self.y2? - self.y1?)
    }

    pub fn size(&self) -> Option<NVector> {
        Some(NVector::xy(self.width()?, self.height()?))
    }

    pub fn center(&self) -> Option<NVector> {
        Some(NVector::xy(
            (self.x1? + self.x2?) / 2.0,
            (self.y1? + self.y2?) / 2.0,
        ))
    }

    /// Corners in clockwise order starting from the top left.
    pub fn corners(&self) -> Option<[NVector; 4]> {
        let (x1, y1, x2, y2) = (self.x1?, self.y1?, self.x2?, self.y2?);
        Some([
            NVector::xy(x1, y1),
            NVector::xy(x2, y1),
            NVector::xy(x2, y2),
            NVector::xy(x1, y2),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_box() {
        let bb = BoundingBox::default();
        assert!(bb.is_null());
        assert_eq!(bb.center(), None);
    }

    #[test]
    fn test_include_and_expand() {
        let mut bb = BoundingBox::default();
        bb.include(10.0, 5.0);
        bb.include(-2.0, 8.0);
        assert_eq!(bb, BoundingBox::new(-2.0, 5.0, 10.0, 8.0));

        bb.expand(&BoundingBox::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(bb.y1, Some(0.0));
        bb.expand(&BoundingBox::default());
        assert_eq!(bb.size(), Some(NVector::xy(12.0, 8.0)));
        assert_eq!(bb.center(), Some(NVector::xy(4.0, 4.0)));
    }
}
