use std::collections::BTreeMap;

use anyhow::Result;
use geometry::{MapBounds, Projection};
use gtfs::{RouteID, RouteTable, ShapeRow, ShapeTable};

use crate::{Canvas, MapError, Route};

/// Everything needed to turn a shape table into a map.
#[derive(Clone, Debug)]
pub struct MapConfig {
    /// The shape table. Enrichment results are cached back here.
    pub shapes_path: String,
    pub routes_path: String,
    pub output_path: String,
    /// Redo the route join and projection, even if the shape table already has them
    pub force: bool,
    pub projection: Projection,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MapSummary {
    pub routes: usize,
    pub polylines: usize,
    pub skipped: usize,
    pub bounds: MapBounds,
}

/// Loads, enriches, and draws everything. Nothing is written to `output_path` unless every route
/// can be drawn.
pub fn make_map(config: &MapConfig) -> Result<MapSummary> {
    info!("Loading {} and {}", config.shapes_path, config.routes_path);
    let mut shapes = ShapeTable::load(&config.shapes_path)?;
    let route_table = RouteTable::load(&config.routes_path)?;

    let mut dirty = false;
    if let Some(joined) = shapes.join_routes(&route_table, config.force) {
        shapes = joined;
        dirty = true;
    }
    if let Some(projected) = shapes.project(&config.projection, config.force) {
        shapes = projected;
        dirty = true;
    }
    if dirty {
        shapes.save(&config.shapes_path)?;
    }

    let routes = build_routes(&shapes)?;
    // Offset directions and wide strokes at the edges stay on the canvas
    let margin = routes
        .iter()
        .map(|route| route.style.reach())
        .fold(0.0, f64::max);
    let bounds = MapBounds::from(
        routes
            .iter()
            .flat_map(|route| route.points().iter().map(|pt| pt.pos)),
    )
    .pad(margin);
    info!(
        "{} routes, map is {} by {}",
        routes.len(),
        bounds.width(),
        bounds.height()
    );

    let mut canvas = Canvas::new(&bounds);
    let mut summary = MapSummary {
        routes: routes.len(),
        polylines: 0,
        skipped: 0,
        bounds: bounds.clone(),
    };
    for route in &routes {
        debug!("Drawing {}", route.describe());
        let stats = route.render(&bounds, &mut canvas);
        summary.polylines += stats.drawn;
        summary.skipped += stats.skipped;
    }
    canvas.save(&config.output_path)?;
    Ok(summary)
}

/// One route per distinct route ID. Fails before anything is drawn if any route is unusable.
pub fn build_routes(shapes: &ShapeTable) -> Result<Vec<Route>> {
    let mut per_route: BTreeMap<&RouteID, Vec<&ShapeRow>> = BTreeMap::new();
    for row in &shapes.rows {
        match row.route_id {
            Some(ref id) => per_route.entry(id).or_insert_with(Vec::new).push(row),
            None => {
                return Err(MapError::MalformedRow {
                    shape_id: row.shape_id.clone(),
                    sequence: row.shape_pt_sequence,
                    problem: "no route_id".to_string(),
                }
                .into())
            }
        }
    }

    let mut routes = Vec::new();
    for rows in per_route.into_values() {
        routes.push(Route::new(&rows)?);
    }
    Ok(routes)
}
