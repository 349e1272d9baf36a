use anyhow::Result;
use geometry::MapBounds;
use svg::node::element::Group;
use svg::{Document, Node};

/// An SVG document sized to the map. Routes are added as groups, then the whole thing is written
/// out once.
pub struct Canvas {
    document: Document,
    num_groups: usize,
}

impl Canvas {
    pub fn new(bounds: &MapBounds) -> Self {
        let (width, height) = (bounds.width(), bounds.height());
        let document = Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", format!("0 0 {width} {height}"));
        Self {
            document,
            num_groups: 0,
        }
    }

    pub fn add(&mut self, group: Group) {
        self.document.append(group);
        self.num_groups += 1;
    }

    pub fn num_groups(&self) -> usize {
        self.num_groups
    }

    pub fn to_svg(&self) -> String {
        self.document.to_string()
    }

    /// Finishes the drawing. The file only appears once it's completely written.
    pub fn save(self, path: &str) -> Result<()> {
        gtfs::write_atomic(path, self.to_svg().as_bytes())?;
        info!("Wrote {} routes to {path}", self.num_groups);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geometry::Pt2D;

    #[test]
    fn sized_to_bounds() {
        let bounds = MapBounds::from(vec![Pt2D::new(5.0, -2.0)]);
        let mut canvas = Canvas::new(&bounds);
        canvas.add(Group::new().set("id", "route-1"));
        assert_eq!(canvas.num_groups(), 1);

        let svg = canvas.to_svg();
        assert!(svg.contains(r#"width="10""#), "{svg}");
        assert!(svg.contains(r#"height="4""#), "{svg}");
        assert!(svg.contains(r#"viewBox="0 0 10 4""#), "{svg}");
        assert!(svg.contains(r#"id="route-1""#), "{svg}");
    }

    #[test]
    fn save_and_overwrite() {
        let dir = std::env::temp_dir().join(format!("model_canvas_{}", std::process::id()));
        fs_err::create_dir_all(&dir).unwrap();
        let path = dir.join("map.svg").display().to_string();

        let bounds = MapBounds::from(vec![Pt2D::new(1.0, 1.0)]);
        Canvas::new(&bounds).save(&path).unwrap();
        let mut canvas = Canvas::new(&bounds);
        canvas.add(Group::new().set("id", "second"));
        canvas.save(&path).unwrap();

        let contents = fs_err::read_to_string(&path).unwrap();
        assert!(contents.contains("second"));
        assert!(!std::path::Path::new(&format!("{path}.tmp")).exists());
        fs_err::remove_dir_all(&dir).unwrap();
    }
}
