use gtfs::{RouteID, ShapeID};

/// Problems with otherwise readable input that stop a map from being drawn.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("route {route_id} has unknown route_type {code}")]
    UnknownRouteType { route_id: RouteID, code: u16 },

    #[error("shape {shape_id} point {sequence}: {problem}")]
    MalformedRow {
        shape_id: ShapeID,
        sequence: usize,
        problem: String,
    },
}
