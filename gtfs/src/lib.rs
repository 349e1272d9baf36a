//! Tabular GTFS-style input: shape points, the per-shape route table, and the enrichment steps
//! that join them and add projected coordinates. The enriched shape table doubles as a cache.

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod error;
mod ids;
mod io;
mod routes;
mod shapes;

pub use error::TableError;
pub use ids::{Direction, RouteID, ShapeID};
pub use io::write_atomic;
pub use routes::{RouteRecord, RouteTable, RouteType};
pub use shapes::{ShapeRow, ShapeTable};
