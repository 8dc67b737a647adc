//! Coordinate mapping between document space and viewport space.
//!
//! Document space is the emoji/background coordinate system centered at
//! `(0, 0)`, independent of viewport size or zoom. Viewport space is
//! on-screen pixels used for rendering and gesture hit-testing.

use serde::{Deserialize, Serialize};

/// A point in viewport space, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportPoint {
    /// X position in pixels from the viewport's left edge.
    pub x: f32,
    /// Y position in pixels from the viewport's top edge.
    pub y: f32,
}

impl ViewportPoint {
    /// Create a viewport point.
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Pan/zoom state mapping document space onto a viewport.
///
/// `pan_x`/`pan_y` are in viewport pixels at zoom 1; `zoom` is the
/// multiplicative factor from document units to viewport pixels and must be
/// strictly positive. The two mapping methods are exact inverses under real
/// arithmetic; integer rounding on the inverse direction means a round trip
/// holds only within ±1 document unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Center of the viewport, in viewport pixels.
    pub center: ViewportPoint,
    /// Horizontal pan offset in viewport pixels.
    pub pan_x: f32,
    /// Vertical pan offset in viewport pixels.
    pub pan_y: f32,
    /// Zoom scale (1.0 = 100%). Must be strictly positive.
    pub zoom: f32,
}

impl Viewport {
    /// Create a viewport with the given center, no pan, zoom 1.
    #[must_use]
    pub fn new(center: ViewportPoint) -> Self {
        Self {
            center,
            pan_x: 0.0,
            pan_y: 0.0,
            zoom: 1.0,
        }
    }

    /// Inverse-map a viewport point to document coordinates.
    ///
    /// `zoom == 0` is undefined input; callers must guarantee `zoom > 0`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_document_space(&self, point: ViewportPoint) -> (i32, i32) {
        debug_assert!(self.zoom > 0.0, "zoom must be strictly positive");
        let x = ((point.x - self.pan_x - self.center.x) / self.zoom).round() as i32;
        let y = ((point.y - self.pan_y - self.center.y) / self.zoom).round() as i32;
        (x, y)
    }

    /// Forward-map document coordinates to a viewport point.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_viewport_space(&self, x: i32, y: i32) -> ViewportPoint {
        ViewportPoint {
            x: self.center.x + x as f32 * self.zoom + self.pan_x,
            y: self.center.y + y as f32 * self.zoom + self.pan_y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_at_origin() {
        let viewport = Viewport::new(ViewportPoint::new(400.0, 300.0));
        let point = viewport.to_viewport_space(0, 0);
        assert!((point.x - 400.0).abs() < f32::EPSILON);
        assert!((point.y - 300.0).abs() < f32::EPSILON);
        assert_eq!(viewport.to_document_space(point), (0, 0));
    }

    #[test]
    fn test_forward_map_applies_zoom_then_pan() {
        let viewport = Viewport {
            center: ViewportPoint::new(400.0, 300.0),
            pan_x: 10.0,
            pan_y: -20.0,
            zoom: 2.0,
        };
        let point = viewport.to_viewport_space(-200, 200);
        assert!((point.x - (400.0 - 400.0 + 10.0)).abs() < f32::EPSILON);
        assert!((point.y - (300.0 + 400.0 - 20.0)).abs() < f32::EPSILON);
    }

    #[test]
    fn test_round_trip_within_one_unit() {
        let zooms = [0.1_f32, 0.33, 0.5, 1.0, 1.7, 2.0, 5.0];
        let pans = [(0.0_f32, 0.0_f32), (123.4, -56.7), (-0.5, 0.5)];
        let coords = [-200, -37, -1, 0, 1, 50, 200, 997];

        for &zoom in &zooms {
            for &(pan_x, pan_y) in &pans {
                let viewport = Viewport {
                    center: ViewportPoint::new(512.0, 384.0),
                    pan_x,
                    pan_y,
                    zoom,
                };
                for &x in &coords {
                    for &y in &coords {
                        let (rx, ry) =
                            viewport.to_document_space(viewport.to_viewport_space(x, y));
                        assert!(
                            (rx - x).abs() <= 1 && (ry - y).abs() <= 1,
                            "round trip ({x}, {y}) -> ({rx}, {ry}) at zoom {zoom}, pan ({pan_x}, {pan_y})"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_inverse_map_rounds_to_nearest() {
        let viewport = Viewport {
            center: ViewportPoint::new(0.0, 0.0),
            pan_x: 0.0,
            pan_y: 0.0,
            zoom: 2.0,
        };
        // 2.6 document units away: 5.2 px / zoom 2 rounds to 3.
        assert_eq!(
            viewport.to_document_space(ViewportPoint::new(5.2, -5.2)),
            (3, -3)
        );
    }
}
