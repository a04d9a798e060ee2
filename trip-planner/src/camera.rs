//! Camera framing instructions for the map surface.

use serde::Serialize;

use crate::geo::{Coordinate, Viewport};

/// Padding around fitted coordinates, in layout units before scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgePadding {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl EdgePadding {
    /// Scale every side to device pixels for the given viewport.
    pub fn scaled(&self, viewport: &Viewport) -> Self {
        Self {
            top: viewport.pixel_size(self.top),
            bottom: viewport.pixel_size(self.bottom),
            left: viewport.pixel_size(self.left),
            right: viewport.pixel_size(self.right),
        }
    }
}

impl Default for EdgePadding {
    /// Wider on the right, where the fare card sits.
    fn default() -> Self {
        Self {
            top: 50.0,
            bottom: 50.0,
            left: 50.0,
            right: 350.0,
        }
    }
}

/// Axis-aligned bounding box of a set of coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

impl Bounds {
    /// Smallest box containing all `points`, or `None` when empty.
    pub fn enclosing(points: &[Coordinate]) -> Option<Self> {
        let first = points.first()?;
        let (mut south, mut west) = (first.latitude(), first.longitude());
        let (mut north, mut east) = (south, west);

        for p in &points[1..] {
            south = south.min(p.latitude());
            north = north.max(p.latitude());
            west = west.min(p.longitude());
            east = east.max(p.longitude());
        }

        // Min/max of valid coordinates stay valid.
        Some(Self {
            south_west: Coordinate::new(south, west).ok()?,
            north_east: Coordinate::new(north, east).ok()?,
        })
    }

    pub fn contains(&self, point: &Coordinate) -> bool {
        (self.south_west.latitude()..=self.north_east.latitude()).contains(&point.latitude())
            && (self.south_west.longitude()..=self.north_east.longitude())
                .contains(&point.longitude())
    }
}

/// Instruction to frame the map so that every coordinate is visible.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraFit {
    pub coordinates: Vec<Coordinate>,
    pub edge_padding: EdgePadding,
    pub bounds: Option<Bounds>,
}

impl CameraFit {
    /// Frame a route path, with padding already scaled for the viewport.
    pub fn for_path(path: &[Coordinate], padding: &EdgePadding, viewport: &Viewport) -> Self {
        Self {
            coordinates: path.to_vec(),
            edge_padding: padding.scaled(viewport),
            bounds: Bounds::enclosing(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    #[test]
    fn default_padding_reserves_right_side() {
        let padding = EdgePadding::default();
        assert_eq!(padding.right, 350.0);
        assert_eq!(padding.top, 50.0);
        assert_eq!(padding.bottom, 50.0);
        assert_eq!(padding.left, 50.0);
    }

    #[test]
    fn padding_scaled_by_pixel_ratio() {
        let viewport = Viewport::new(400.0, 800.0).with_pixel_ratio(2.0);
        let scaled = EdgePadding::default().scaled(&viewport);
        assert_eq!(scaled.top, 100.0);
        assert_eq!(scaled.right, 700.0);
    }

    #[test]
    fn bounds_of_path() {
        let path = [c(37.7749, -122.4194), c(37.80, -122.35), c(37.8044, -122.2712)];
        let bounds = Bounds::enclosing(&path).unwrap();

        assert_eq!(bounds.south_west, c(37.7749, -122.4194));
        assert_eq!(bounds.north_east, c(37.8044, -122.2712));
        assert!(path.iter().all(|p| bounds.contains(p)));
        assert!(!bounds.contains(&c(38.0, -122.3)));
    }

    #[test]
    fn empty_path_has_no_bounds() {
        assert_eq!(Bounds::enclosing(&[]), None);
    }

    #[test]
    fn fit_keeps_path_order() {
        let path = vec![c(1.0, 1.0), c(0.0, 0.0), c(2.0, 2.0)];
        let fit = CameraFit::for_path(&path, &EdgePadding::default(), &Viewport::new(1.0, 1.0));
        assert_eq!(fit.coordinates, path);
        assert_eq!(fit.edge_padding, EdgePadding::default());
    }
}
