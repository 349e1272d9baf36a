use anyhow::Result;
use geometry::{LonLat, Projection};
use serde::{Deserialize, Serialize};

use crate::io::{check_columns, write_atomic};
use crate::{RouteID, RouteTable, ShapeID};

// GTFS defaults when a route doesn't specify colors
const DEFAULT_ROUTE_COLOR: &str = "FFFFFF";
const DEFAULT_TEXT_COLOR: &str = "000000";

/// One point along a shape. The route and projection columns start empty in a raw GTFS
/// `shapes.txt` and get filled in by `join_routes` and `project`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeRow {
    pub shape_id: ShapeID,
    pub shape_pt_lat: f64,
    pub shape_pt_lon: f64,
    pub shape_pt_sequence: usize,
    #[serde(default)]
    pub shape_dist_traveled: Option<f64>,

    #[serde(default)]
    pub route_id: Option<RouteID>,
    #[serde(default)]
    pub direction_id: Option<u8>,
    #[serde(default)]
    pub route_name: Option<String>,
    #[serde(default)]
    pub route_type: Option<u16>,
    #[serde(default)]
    pub route_color: Option<String>,
    #[serde(default)]
    pub route_text_color: Option<String>,

    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
}

impl ShapeRow {
    pub fn gps(&self) -> LonLat {
        LonLat::new(self.shape_pt_lon, self.shape_pt_lat)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShapeTable {
    pub rows: Vec<ShapeRow>,
}

const REQUIRED: &[&str] = &[
    "shape_id",
    "shape_pt_lat",
    "shape_pt_lon",
    "shape_pt_sequence",
];

// Every column, in the order they're written. Only needed when there are no rows to derive the
// header from.
const ALL_COLUMNS: &[&str] = &[
    "shape_id",
    "shape_pt_lat",
    "shape_pt_lon",
    "shape_pt_sequence",
    "shape_dist_traveled",
    "route_id",
    "direction_id",
    "route_name",
    "route_type",
    "route_color",
    "route_text_color",
    "x",
    "y",
];

impl ShapeTable {
    pub fn load(path: &str) -> Result<Self> {
        Self::load_from_reader(fs_err::File::open(path)?, path)
    }

    /// `path` is just used for error messages.
    pub fn load_from_reader<R: std::io::Read>(reader: R, path: &str) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(reader);
        check_columns(reader.headers()?, REQUIRED, path)?;

        let mut rows = Vec::new();
        for rec in reader.deserialize() {
            rows.push(rec?);
        }
        Ok(Self { rows })
    }

    /// Atomically overwrites `path`.
    pub fn save(&self, path: &str) -> Result<()> {
        write_atomic(path, &self.to_csv()?)?;
        info!("Cached {} shape points to {path}", self.rows.len());
        Ok(())
    }

    pub fn to_csv(&self) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        if self.rows.is_empty() {
            writer.write_record(ALL_COLUMNS)?;
        }
        for row in &self.rows {
            writer.serialize(row)?;
        }
        Ok(writer.into_inner().map_err(|err| anyhow!("{}", err.error()))?)
    }

    pub fn has_route_metadata(&self) -> bool {
        self.rows
            .iter()
            .all(|row| row.route_id.is_some() && row.route_color.is_some())
    }

    pub fn has_projection(&self) -> bool {
        self.rows.iter().all(|row| row.x.is_some() && row.y.is_some())
    }

    /// Fills in route metadata by matching `shape_id` against the route table. Returns `None` if
    /// every row already has it, unless `force` is set. Points on shapes that no route uses are
    /// dropped.
    pub fn join_routes(&self, routes: &RouteTable, force: bool) -> Option<ShapeTable> {
        if !force && self.has_route_metadata() {
            debug!("Shapes already have route metadata");
            return None;
        }

        let mut rows = Vec::with_capacity(self.rows.len());
        let mut unmatched = 0;
        for row in &self.rows {
            let rec = match routes.get(&row.shape_id) {
                Some(rec) => rec,
                None => {
                    unmatched += 1;
                    continue;
                }
            };
            let mut row = row.clone();
            row.route_id = Some(rec.route_id.clone());
            row.direction_id = rec.direction_id.or(row.direction_id);
            // A blank name is cached as an empty field, which loads back as None
            row.route_name = Some(rec.route_name.trim())
                .filter(|name| !name.is_empty())
                .map(|name| name.to_string());
            row.route_type = Some(rec.route_type);
            row.route_color = Some(color_or_default(&rec.route_color, DEFAULT_ROUTE_COLOR));
            row.route_text_color = Some(color_or_default(
                &rec.route_text_color,
                DEFAULT_TEXT_COLOR,
            ));
            rows.push(row);
        }
        if unmatched > 0 {
            warn!("Dropped {unmatched} shape points with no matching route");
        }
        info!("Joined route metadata onto {} shape points", rows.len());
        Some(ShapeTable { rows })
    }

    /// Fills in x and y for every row. Returns `None` if they're already present, unless `force`
    /// is set.
    pub fn project(&self, projection: &Projection, force: bool) -> Option<ShapeTable> {
        if !force && self.has_projection() {
            debug!("Shapes already projected");
            return None;
        }

        let rows = self
            .rows
            .iter()
            .map(|row| {
                let pt = projection.project(row.gps());
                let mut row = row.clone();
                row.x = Some(pt.x());
                row.y = Some(pt.y());
                row
            })
            .collect::<Vec<_>>();
        info!("Projected {} shape points", rows.len());
        Some(ShapeTable { rows })
    }
}

fn color_or_default(color: &str, default: &str) -> String {
    let color = color.trim().trim_start_matches('#');
    if color.is_empty() {
        default.to_string()
    } else {
        color.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TableError;
    use approx::assert_relative_eq;

    const RAW: &str = "\
shape_id,shape_pt_lat,shape_pt_lon,shape_pt_sequence,shape_dist_traveled
s1,42.3601,-71.0589,1,
s1,42.3611,-71.0579,2,0.1
s2,42.35,-71.06,1,
orphan,42.0,-71.0,1,
";

    const ROUTES: &str = "\
shape_id,route_id,direction_id,route_name,route_type,route_color,route_text_color
s1,Red,0,Red Line,1,DA291C,FFFFFF
s2,Red,1,Red Line,1,,
";

    fn raw() -> ShapeTable {
        ShapeTable::load_from_reader(RAW.as_bytes(), "shapes.txt").unwrap()
    }

    fn routes() -> RouteTable {
        RouteTable::load_from_reader(ROUTES.as_bytes(), "routes.txt").unwrap()
    }

    #[test]
    fn load_raw() {
        let table = raw();
        assert_eq!(table.rows.len(), 4);
        assert!(!table.has_route_metadata());
        assert!(!table.has_projection());
        assert_eq!(table.rows[1].shape_dist_traveled, Some(0.1));
        assert_eq!(table.rows[0].route_id, None);
    }

    #[test]
    fn missing_lat() {
        let input = "shape_id,shape_pt_lon,shape_pt_sequence\ns1,-71.0,1\n";
        let err = ShapeTable::load_from_reader(input.as_bytes(), "shapes.txt").unwrap_err();
        assert!(err.downcast_ref::<TableError>().is_some());
    }

    #[test]
    fn join() {
        let joined = raw().join_routes(&routes(), false).unwrap();
        // The orphan shape is dropped
        assert_eq!(joined.rows.len(), 3);
        assert!(joined.has_route_metadata());

        let row = &joined.rows[0];
        assert_eq!(row.route_id, Some(RouteID("Red".to_string())));
        assert_eq!(row.direction_id, Some(0));
        assert_eq!(row.route_name.as_deref(), Some("Red Line"));
        assert_eq!(row.route_type, Some(1));
        assert_eq!(row.route_color.as_deref(), Some("DA291C"));

        // Blank colors get GTFS defaults
        let row = &joined.rows[2];
        assert_eq!(row.direction_id, Some(1));
        assert_eq!(row.route_color.as_deref(), Some("FFFFFF"));
        assert_eq!(row.route_text_color.as_deref(), Some("000000"));
    }

    #[test]
    fn join_is_idempotent() {
        let joined = raw().join_routes(&routes(), false).unwrap();
        assert!(joined.join_routes(&routes(), false).is_none());

        // Forcing redoes the work, with the same result
        let again = joined.join_routes(&routes(), true).unwrap();
        assert_eq!(again, joined);
    }

    #[test]
    fn project_rows() {
        let projection = Projection::default();
        let projected = raw().project(&projection, false).unwrap();
        assert!(projected.has_projection());
        assert_relative_eq!(projected.rows[0].x.unwrap(), 0.0);
        assert_relative_eq!(projected.rows[0].y.unwrap(), 0.0);
        assert!(projected.rows[1].x.unwrap() > 0.0);
        assert!(projected.rows[1].y.unwrap() < 0.0);

        assert!(projected.project(&projection, false).is_none());
        assert!(projected.project(&projection, true).is_some());
    }

    #[test]
    fn csv_round_trip_keeps_enrichment() {
        let table = raw()
            .join_routes(&routes(), false)
            .unwrap()
            .project(&Projection::default(), false)
            .unwrap();
        let bytes = table.to_csv().unwrap();
        let reloaded = ShapeTable::load_from_reader(bytes.as_slice(), "cache").unwrap();
        assert_eq!(reloaded, table);
        assert!(reloaded.join_routes(&routes(), false).is_none());
        assert!(reloaded.project(&Projection::default(), false).is_none());
    }

    #[test]
    fn empty_table_still_has_header() {
        let table = ShapeTable { rows: Vec::new() };
        let bytes = table.to_csv().unwrap();
        let reloaded = ShapeTable::load_from_reader(bytes.as_slice(), "cache").unwrap();
        assert!(reloaded.rows.is_empty());
    }

    #[test]
    fn blank_route_name_survives_cache() {
        let routes = RouteTable::load_from_reader(
            "shape_id,route_id,route_name,route_type,route_color,route_text_color\n\
             s1,Red,,1,DA291C,FFFFFF\n\
             s2,Red,  ,1,DA291C,FFFFFF\n"
                .as_bytes(),
            "routes.txt",
        )
        .unwrap();
        let joined = raw().join_routes(&routes, false).unwrap();
        assert!(joined.rows.iter().all(|row| row.route_name.is_none()));

        let bytes = joined.to_csv().unwrap();
        let reloaded = ShapeTable::load_from_reader(bytes.as_slice(), "cache").unwrap();
        assert_eq!(reloaded, joined);
    }

    #[test]
    fn direction_from_shape_rows() {
        let shapes = ShapeTable::load_from_reader(
            "shape_id,route_id,direction_id,shape_pt_lat,shape_pt_lon,shape_pt_sequence\n\
             s1,Red,0,42.3601,-71.0589,1\n\
             s2,Red,1,42.35,-71.06,1\n"
                .as_bytes(),
            "shapes.txt",
        )
        .unwrap();
        assert!(!shapes.has_route_metadata());
        let routes = RouteTable::load_from_reader(
            "shape_id,route_id,route_name,route_type,route_color,route_text_color\n\
             s1,Red,Red Line,1,DA291C,FFFFFF\n\
             s2,Red,Red Line,1,DA291C,FFFFFF\n"
                .as_bytes(),
            "routes.txt",
        )
        .unwrap();

        let joined = shapes.join_routes(&routes, false).unwrap();
        assert_eq!(joined.rows[0].direction_id, Some(0));
        assert_eq!(joined.rows[1].direction_id, Some(1));
        assert!(joined.has_route_metadata());
    }
}
