use gtfs::RouteType;
use serde::{Deserialize, Serialize};

/// How every route of one mode is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteStyle {
    /// Stroke width in drawing units. Also the distance each direction is shifted by.
    pub width: f64,
    pub opacity: f64,
    /// Draw the two directions side-by-side instead of on top of each other
    pub offset: bool,
}

impl RouteStyle {
    pub fn for_route_type(route_type: RouteType) -> Self {
        let (width, opacity, offset) = match route_type {
            RouteType::Tram => (0.25, 1.0, true),
            RouteType::Subway => (0.5, 1.0, true),
            RouteType::Rail => (0.5, 1.0, true),
            RouteType::Bus => (0.1, 0.2, false),
            RouteType::Ferry => (0.25, 0.6, false),
            RouteType::CableTram => (0.25, 0.8, false),
            RouteType::AerialLift => (0.25, 0.8, false),
            RouteType::Funicular => (0.25, 0.8, false),
            RouteType::Trolleybus => (0.15, 0.3, false),
            RouteType::Monorail => (0.4, 1.0, true),
        };
        Self {
            width,
            opacity,
            offset,
        }
    }

    /// How far a stroke can reach from the route's centerline: the shift plus half the stroke.
    pub fn reach(&self) -> f64 {
        if self.offset {
            self.width * 1.5
        } else {
            self.width / 2.0
        }
    }

    /// `None` for route types that aren't in the table.
    pub fn lookup(code: u16) -> Option<(RouteType, Self)> {
        let route_type = RouteType::from_code(code)?;
        Some((route_type, Self::for_route_type(route_type)))
    }
}
