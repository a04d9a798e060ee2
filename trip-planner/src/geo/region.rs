//! Map viewport regions.

use serde::Serialize;

use super::Coordinate;

/// Latitude span shown around the user's position.
pub const DEFAULT_LATITUDE_DELTA: f64 = 0.0922;

/// Dimensions of the map viewport in layout units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    /// Device pixels per layout unit.
    pub pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio: 1.0,
        }
    }

    pub fn with_pixel_ratio(mut self, ratio: f64) -> Self {
        self.pixel_ratio = ratio;
        self
    }

    /// Width over height. A degenerate viewport is treated as square.
    pub fn aspect_ratio(&self) -> f64 {
        if self.height > 0.0 && self.width > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Convert a layout size to device pixels, rounded to the nearest pixel.
    pub fn pixel_size(&self, layout_size: f64) -> f64 {
        (layout_size * self.pixel_ratio).round()
    }
}

impl Default for Viewport {
    /// A typical portrait phone screen.
    fn default() -> Self {
        Self {
            width: 411.0,
            height: 823.0,
            pixel_ratio: 2.625,
        }
    }
}

/// A coordinate plus the span of the map viewport centred on it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    #[serde(flatten)]
    pub center: Coordinate,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl Region {
    /// Build a region around `center` whose longitude span follows the
    /// viewport's aspect ratio.
    pub fn around(center: Coordinate, latitude_delta: f64, viewport: &Viewport) -> Self {
        Self {
            center,
            latitude_delta,
            longitude_delta: latitude_delta * viewport.aspect_ratio(),
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn longitude_delta_is_scaled_latitude_delta(
            width in 1.0f64..4000.0,
            height in 1.0f64..4000.0,
            lat in -90.0f64..=90.0,
            lng in -180.0f64..=180.0,
        ) {
            let viewport = Viewport::new(width, height);
            let center = Coordinate::new(lat, lng).unwrap();
            let region = Region::around(center, DEFAULT_LATITUDE_DELTA, &viewport);
            prop_assert_eq!(region.longitude_delta, DEFAULT_LATITUDE_DELTA * (width / height));
        }
    }
}
