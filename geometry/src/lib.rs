//! Planar geometry for drawing transit maps: points, polylines with curve offsetting, a linear
//! GPS projection, and the symmetric bounds used to place everything on a canvas.

mod bounds;
mod gps;
mod polyline;
mod pt;

pub use bounds::MapBounds;
pub use gps::{LonLat, Projection};
pub use polyline::PolyLine;
pub use pt::Pt2D;
