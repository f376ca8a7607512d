use serde::{Deserialize, Serialize};

/// A CIE 1931 chromaticity coordinate, independent of brightness.
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct ColorPoint {
    pub x: f64,
    pub y: f64,
}

impl ColorPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub(crate) fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    pub(crate) fn cross(self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub(crate) fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub(crate) fn distance(self, other: Self) -> f64 {
        let d = self.sub(other);
        d.dot(d).sqrt()
    }
}
