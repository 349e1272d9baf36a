use std::collections::BTreeMap;

use anyhow::Result;
use geometry::{LonLat, MapBounds, PolyLine, Pt2D};
use gtfs::{Direction, RouteID, RouteType, ShapeID, ShapeRow};
use svg::node::element::{Group, Polyline};

use crate::{Canvas, MapError, RouteStyle};

/// How finely each segment is sampled when shifting a direction to one side
const OFFSET_STEPS: usize = 10;

/// A fully enriched and projected shape point.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapePoint {
    pub shape_id: ShapeID,
    pub route_id: RouteID,
    pub direction: Direction,
    pub sequence: usize,
    pub gps: LonLat,
    pub pos: Pt2D,
}

impl ShapePoint {
    pub fn from_row(row: &ShapeRow) -> Result<Self> {
        let malformed = |problem: &str| MapError::MalformedRow {
            shape_id: row.shape_id.clone(),
            sequence: row.shape_pt_sequence,
            problem: problem.to_string(),
        };

        let route_id = row.route_id.clone().ok_or_else(|| malformed("no route_id"))?;
        let direction = match row.direction_id {
            Some(id) => Direction::from_id(id)
                .ok_or_else(|| malformed(&format!("direction_id {id} isn't 0 or 1")))?,
            None => return Err(malformed("no direction_id").into()),
        };
        let pos = match (row.x, row.y) {
            (Some(x), Some(y)) => Pt2D::new(x, y),
            _ => return Err(malformed("not projected").into()),
        };
        Ok(Self {
            shape_id: row.shape_id.clone(),
            route_id,
            direction,
            sequence: row.shape_pt_sequence,
            gps: row.gps(),
            pos,
        })
    }
}

/// One transit line, possibly made of many shapes in both directions.
pub struct Route {
    pub route_id: RouteID,
    pub name: String,
    pub route_type: RouteType,
    pub style: RouteStyle,
    /// With a leading #
    pub color: String,
    pub text_color: String,
    points: Vec<ShapePoint>,
}

/// What happened while drawing one route
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub drawn: usize,
    pub skipped: usize,
}

impl Route {
    /// Metadata comes from the first row; the rows should all belong to the same route. Fails if
    /// the route type has no style.
    pub fn new(rows: &[&ShapeRow]) -> Result<Self> {
        let first = match rows.first() {
            Some(row) => *row,
            None => bail!("Can't make a route with no shape points"),
        };
        let points = rows
            .iter()
            .map(|row| ShapePoint::from_row(row))
            .collect::<Result<Vec<_>>>()?;
        let route_id = points[0].route_id.clone();

        let code = first.route_type.ok_or_else(|| MapError::MalformedRow {
            shape_id: first.shape_id.clone(),
            sequence: first.shape_pt_sequence,
            problem: "no route_type".to_string(),
        })?;
        let (route_type, style) =
            RouteStyle::lookup(code).ok_or_else(|| MapError::UnknownRouteType {
                route_id: route_id.clone(),
                code,
            })?;

        Ok(Self {
            name: first
                .route_name
                .clone()
                .unwrap_or_else(|| route_id.to_string()),
            route_id,
            route_type,
            style,
            color: hex_color(first.route_color.as_deref().unwrap_or("FFFFFF")),
            text_color: hex_color(first.route_text_color.as_deref().unwrap_or("000000")),
            points,
        })
    }

    pub fn points(&self) -> &Vec<ShapePoint> {
        &self.points
    }

    pub fn describe(&self) -> String {
        format!("{} ({})", self.name, self.route_type.describe())
    }

    /// The points for one direction in sequence order. When several shapes serve the same
    /// direction, only the one with the most points is used, so unrelated shapes don't get
    /// stitched together. Ties go to the smallest shape ID.
    pub fn polyline(&self, direction: Direction) -> Option<(ShapeID, PolyLine)> {
        let mut per_shape: BTreeMap<&ShapeID, Vec<&ShapePoint>> = BTreeMap::new();
        for pt in &self.points {
            if pt.direction == direction {
                per_shape.entry(&pt.shape_id).or_insert_with(Vec::new).push(pt);
            }
        }
        if per_shape.len() > 1 {
            debug!(
                "{} has {} shapes in direction {}; drawing the longest",
                self.route_id,
                per_shape.len(),
                direction.id()
            );
        }

        let mut best: Option<(&ShapeID, Vec<&ShapePoint>)> = None;
        for (shape_id, pts) in per_shape {
            if best.as_ref().map(|(_, b)| pts.len() > b.len()).unwrap_or(true) {
                best = Some((shape_id, pts));
            }
        }

        let (shape_id, mut pts) = best?;
        // The input file might not be in order
        pts.sort_by_key(|pt| pt.sequence);
        Some((
            shape_id.clone(),
            PolyLine::unchecked_new(pts.into_iter().map(|pt| pt.pos).collect()),
        ))
    }

    /// Draws one polyline per direction. When the style asks for it, direction 0 is shifted by
    /// +width and direction 1 by -width.
    pub fn render(&self, bounds: &MapBounds, canvas: &mut Canvas) -> RenderStats {
        let (group, stats) = self.to_group(bounds);
        canvas.add(group);
        stats
    }

    pub fn to_group(&self, bounds: &MapBounds) -> (Group, RenderStats) {
        let mut stats = RenderStats::default();
        let mut group = Group::new()
            .set("id", format!("route-{}", self.route_id))
            .set(
                "class",
                format!("route {}", self.route_type.describe().replace(' ', "-")),
            )
            .set("data-name", self.name.clone())
            .set("data-text-color", self.text_color.clone());

        for direction in Direction::all() {
            let mut dir_group = Group::new()
                .set("id", format!("route-{}-dir-{}", self.route_id, direction.id()))
                .set("class", format!("direction-{}", direction.id()));

            if let Some((shape_id, pl)) = self.polyline(direction) {
                let pl = pl.translate(-bounds.min_x, -bounds.min_y);
                let pl = if self.style.offset {
                    let sign = match direction {
                        Direction::Outbound => 1.0,
                        Direction::Inbound => -1.0,
                    };
                    pl.offset(sign * self.style.width, OFFSET_STEPS)
                } else {
                    pl
                };

                if pl.is_degenerate() {
                    warn!(
                        "Skipping {} direction {} (shape {shape_id}): only {} points",
                        self.route_id,
                        direction.id(),
                        pl.len()
                    );
                    stats.skipped += 1;
                } else {
                    dir_group = dir_group.add(
                        Polyline::new()
                            .set("points", svg_points(&pl))
                            .set("stroke", self.color.clone())
                            .set("stroke-width", self.style.width)
                            .set("stroke-opacity", self.style.opacity)
                            .set("fill", "none"),
                    );
                    stats.drawn += 1;
                }
            }

            group = group.add(dir_group);
        }
        (group, stats)
    }
}

/// GTFS colors don't have the leading #
fn hex_color(color: &str) -> String {
    format!("#{}", color.trim().trim_start_matches('#'))
}

fn svg_points(pl: &PolyLine) -> String {
    pl.points()
        .iter()
        .map(|pt| format!("{:.4},{:.4}", pt.x(), pt.y()))
        .collect::<Vec<_>>()
        .join(" ")
}
