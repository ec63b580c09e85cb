//! Web Mercator projection between geographic and world coordinates.
//!
//! World space is a square of `WORLD_SIZE` units at zoom 0, following the
//! standard 256-pixel web tile convention. Every zoom level doubles the
//! resolution, so one world unit spans half the real-world distance per
//! zoom-in step.

use std::f64::consts::PI;

use super::point::LatLng;

/// Width and height of world space at zoom 0.
pub const WORLD_SIZE: f64 = 256.0;

/// Converts longitude in degrees to x in world coordinates.
pub fn lng_to_x(lng: f64) -> f64 {
    WORLD_SIZE * (lng / 360.0 + 0.5)
}

/// Converts latitude in degrees to y in world coordinates.
pub fn lat_to_y(lat: f64) -> f64 {
    let merc = -((0.25 + lat / 360.0) * PI).tan().ln();
    (WORLD_SIZE / 2.0) * (1.0 + merc / PI)
}

/// Converts x in world coordinates to longitude in degrees.
pub fn x_to_lng(x: f64) -> f64 {
    360.0 * (x / WORLD_SIZE - 0.5)
}

/// Converts y in world coordinates to latitude in degrees.
pub fn y_to_lat(y: f64) -> f64 {
    let merc = PI * (y / (WORLD_SIZE / 2.0) - 1.0);
    (360.0 / PI) * (-merc).exp().atan() - 90.0
}

/// Projects a geographic position into world coordinates.
#[allow(dead_code)] // Part of public API, may be used by external code
pub fn project(position: LatLng) -> (f64, f64) {
    (lng_to_x(position.lng), lat_to_y(position.lat))
}

/// Inverse of [`project`].
pub fn unproject(x: f64, y: f64) -> LatLng {
    LatLng::new(y_to_lat(y), x_to_lng(x))
}
