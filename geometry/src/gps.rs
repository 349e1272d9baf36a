use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Pt2D;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    longitude: f64,
    latitude: f64,
}

impl LonLat {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    pub fn x(self) -> f64 {
        self.longitude
    }

    pub fn y(self) -> f64 {
        self.latitude
    }
}

impl fmt::Display for LonLat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LonLat({0}, {1})", self.longitude, self.latitude)
    }
}

/// A linear projection around a fixed origin. This isn't a real map projection; the scale just
/// turns degrees into convenient drawing units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub origin: LonLat,
    /// Drawing units per degree
    pub scale: f64,
}

impl Projection {
    pub fn new(origin: LonLat, scale: f64) -> Self {
        Self { origin, scale }
    }

    /// Invert y, so that north is up. Screen drawing order, not Cartesian grid.
    pub fn project(&self, gps: LonLat) -> Pt2D {
        Pt2D::new(
            (gps.x() - self.origin.x()) * self.scale,
            -(gps.y() - self.origin.y()) * self.scale,
        )
    }
}

impl Default for Projection {
    /// Centered on downtown Boston
    fn default() -> Self {
        Self::new(LonLat::new(-71.0589, 42.3601), 100.0)
    }
}
