use serde::{Deserialize, Serialize};

use crate::Pt2D;

/// The extent of a drawing. Always symmetric around the projection's origin, so the origin stays
/// on the canvas no matter how lopsided the data is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl MapBounds {
    pub fn new() -> Self {
        Self {
            min_x: 0.0,
            max_x: 0.0,
            min_y: 0.0,
            max_y: 0.0,
        }
    }

    pub fn from<I: IntoIterator<Item = Pt2D>>(pts: I) -> Self {
        let mut b = Self::new();
        for pt in pts {
            b.update(pt);
        }
        b
    }

    pub fn update(&mut self, pt: Pt2D) {
        self.max_x = self.max_x.max(pt.x().abs());
        self.min_x = -self.max_x;
        self.max_y = self.max_y.max(pt.y().abs());
        self.min_y = -self.max_y;
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Grows every side by `margin`, staying symmetric.
    pub fn pad(&self, margin: f64) -> Self {
        Self {
            min_x: self.min_x - margin,
            max_x: self.max_x + margin,
            min_y: self.min_y - margin,
            max_y: self.max_y + margin,
        }
    }

    /// Moves a point into canvas space, where everything is non-negative.
    pub fn translate(&self, pt: Pt2D) -> Pt2D {
        pt.offset(-self.min_x, -self.min_y)
    }

    pub fn contains(&self, pt: Pt2D) -> bool {
        pt.x() >= self.min_x && pt.x() <= self.max_x && pt.y() >= self.min_y && pt.y() <= self.max_y
    }
}

impl Default for MapBounds {
    fn default() -> Self {
        Self::new()
    }
}
