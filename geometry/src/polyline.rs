use serde::{Deserialize, Serialize};

use crate::Pt2D;

/// An ordered sequence of points. There's no minimum length; callers check `is_degenerate` before
/// drawing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolyLine {
    pts: Vec<Pt2D>,
}

impl PolyLine {
    pub fn unchecked_new(pts: Vec<Pt2D>) -> Self {
        Self { pts }
    }

    pub fn points(&self) -> &Vec<Pt2D> {
        &self.pts
    }

    pub fn into_points(self) -> Vec<Pt2D> {
        self.pts
    }

    pub fn len(&self) -> usize {
        self.pts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pts.is_empty()
    }

    /// Fewer than 2 points means there's no segment to draw.
    pub fn is_degenerate(&self) -> bool {
        self.pts.len() < 2
    }

    pub fn is_closed(&self) -> bool {
        self.pts.len() >= 2 && self.pts.first() == self.pts.last()
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::unchecked_new(self.pts.iter().map(|pt| pt.offset(dx, dy)).collect())
    }

    /// Approximates the curve displaced perpendicularly by `distance`. Each segment is sampled
    /// `steps` times and every sample is pushed along the segment's normal. The normal of a
    /// segment heading in +x points towards -y, so on a y-down canvas, a positive distance shifts
    /// to the left of the direction of travel.
    ///
    /// Zero-length segments contribute nothing. Closed input yields closed output; otherwise the
    /// last segment's endpoint is included. With fewer than 2 points, the input is returned as is,
    /// and with `steps == 0`, the result is empty.
    pub fn offset(&self, distance: f64, steps: usize) -> Self {
        if self.is_degenerate() {
            return self.clone();
        }
        if steps == 0 {
            return Self::unchecked_new(Vec::new());
        }

        let mut result = Vec::with_capacity((self.pts.len() - 1) * steps + 1);
        let mut last_end = None;
        for pair in self.pts.windows(2) {
            let (pt1, pt2) = (pair[0], pair[1]);
            let (nx, ny) = match unit_normal(pt1, pt2) {
                Some(normal) => normal,
                None => continue,
            };
            let (dx, dy) = (distance * nx, distance * ny);
            for k in 0..steps {
                let t = k as f64 / steps as f64;
                result.push(pt1.lerp(pt2, t).offset(dx, dy));
            }
            last_end = Some(pt2.offset(dx, dy));
        }

        if self.is_closed() {
            if let Some(first) = result.first().cloned() {
                result.push(first);
            }
        } else if let Some(pt) = last_end {
            result.push(pt);
        }
        Self::unchecked_new(result)
    }
}

// Rotates the direction (dx, dy) to (dy, -dx)
fn unit_normal(pt1: Pt2D, pt2: Pt2D) -> Option<(f64, f64)> {
    if pt1 == pt2 {
        return None;
    }
    let len = pt1.dist_to(pt2);
    let (dx, dy) = ((pt2.x() - pt1.x()) / len, (pt2.y() - pt1.y()) / len);
    Some((dy, -dx))
}
