use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::io::check_columns;
use crate::{RouteID, ShapeID};

/// The GTFS `route_type` codes we know how to draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RouteType {
    Tram,
    Subway,
    Rail,
    Bus,
    Ferry,
    CableTram,
    AerialLift,
    Funicular,
    Trolleybus,
    Monorail,
}

impl RouteType {
    pub fn all() -> Vec<Self> {
        use RouteType::*;
        vec![
            Tram, Subway, Rail, Bus, Ferry, CableTram, AerialLift, Funicular, Trolleybus, Monorail,
        ]
    }

    pub fn from_code(code: u16) -> Option<Self> {
        Self::all().into_iter().find(|rt| rt.code() == code)
    }

    pub fn code(self) -> u16 {
        match self {
            RouteType::Tram => 0,
            RouteType::Subway => 1,
            RouteType::Rail => 2,
            RouteType::Bus => 3,
            RouteType::Ferry => 4,
            RouteType::CableTram => 5,
            RouteType::AerialLift => 6,
            RouteType::Funicular => 7,
            RouteType::Trolleybus => 11,
            RouteType::Monorail => 12,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            RouteType::Tram => "light rail",
            RouteType::Subway => "subway",
            RouteType::Rail => "commuter rail",
            RouteType::Bus => "bus",
            RouteType::Ferry => "ferry",
            RouteType::CableTram => "cable car",
            RouteType::AerialLift => "gondola",
            RouteType::Funicular => "funicular",
            RouteType::Trolleybus => "trolleybus",
            RouteType::Monorail => "monorail",
        }
    }
}

/// One row of the route table. Each shape belongs to exactly one route.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteRecord {
    pub shape_id: ShapeID,
    pub route_id: RouteID,
    pub direction_id: Option<u8>,
    pub route_name: String,
    /// Kept as the raw code; unknown codes are only an error once something needs to be drawn
    pub route_type: u16,
    pub route_color: String,
    pub route_text_color: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RouteTable {
    pub by_shape: BTreeMap<ShapeID, RouteRecord>,
}

const REQUIRED: &[&str] = &[
    "shape_id",
    "route_id",
    "route_name",
    "route_type",
    "route_color",
    "route_text_color",
];

impl RouteTable {
    pub fn load(path: &str) -> Result<Self> {
        Self::load_from_reader(fs_err::File::open(path)?, path)
    }

    /// `path` is just used for error messages.
    pub fn load_from_reader<R: std::io::Read>(reader: R, path: &str) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(reader);
        check_columns(reader.headers()?, REQUIRED, path)?;

        let mut by_shape = BTreeMap::new();
        let mut duplicates = 0;
        for rec in reader.deserialize() {
            let rec: RouteRecord = rec?;
            // The first occurrence wins
            if by_shape.contains_key(&rec.shape_id) {
                duplicates += 1;
                continue;
            }
            by_shape.insert(rec.shape_id.clone(), rec);
        }
        if duplicates > 0 {
            debug!("{path}: ignored {duplicates} duplicate rows for the same shape_id");
        }
        Ok(Self { by_shape })
    }

    pub fn get(&self, shape_id: &ShapeID) -> Option<&RouteRecord> {
        self.by_shape.get(shape_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TableError;

    #[test]
    fn route_type_codes() {
        assert_eq!(RouteType::from_code(3), Some(RouteType::Bus));
        assert_eq!(RouteType::from_code(12), Some(RouteType::Monorail));
        assert_eq!(RouteType::from_code(8), None);
        assert_eq!(RouteType::from_code(99), None);
        for rt in RouteType::all() {
            assert_eq!(RouteType::from_code(rt.code()), Some(rt));
        }
    }

    #[test]
    fn dedupe_by_shape() {
        let input = "\
shape_id,route_id,direction_id,route_name,route_type,route_color,route_text_color
s1,Red,0,Red Line,1,DA291C,FFFFFF
s1,Orange,1,Orange Line,1,ED8B00,FFFFFF
s2,1,1,Route 1,3,FFC72C,000000
";
        let table = RouteTable::load_from_reader(input.as_bytes(), "routes.txt").unwrap();
        assert_eq!(table.by_shape.len(), 2);
        let s1 = table.get(&ShapeID("s1".to_string())).unwrap();
        assert_eq!(s1.route_id, RouteID("Red".to_string()));
        assert_eq!(s1.direction_id, Some(0));
        let s2 = table.get(&ShapeID("s2".to_string())).unwrap();
        assert_eq!(s2.route_type, 3);
        assert_eq!(s2.route_text_color, "000000");
    }

    #[test]
    fn direction_is_optional() {
        let input = "\
shape_id,route_id,route_name,route_type,route_color,route_text_color
s1,Red,Red Line,1,DA291C,FFFFFF
";
        let table = RouteTable::load_from_reader(input.as_bytes(), "routes.txt").unwrap();
        assert_eq!(table.get(&ShapeID("s1".to_string())).unwrap().direction_id, None);
    }

    #[test]
    fn missing_shape_id() {
        let input = "\
route_id,route_name,route_type,route_color,route_text_color
Red,Red Line,1,DA291C,FFFFFF
";
        let err = RouteTable::load_from_reader(input.as_bytes(), "routes.txt").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TableError>(),
            Some(TableError::MissingColumns { columns, .. }) if columns == &vec!["shape_id".to_string()]
        ));
    }
}
