#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod canvas;
mod error;
mod map;
mod route;
mod style;

pub use self::canvas::Canvas;
pub use self::error::MapError;
pub use self::map::{build_routes, make_map, MapConfig, MapSummary};
pub use self::route::{RenderStats, Route, ShapePoint};
pub use self::style::RouteStyle;
