//! Lambert conformal conic projection onto the short-range provider grid.

use std::f64::consts::PI;

use crate::model::{GeoPoint, GridCell};

/// Earth radius in km.
const EARTH_RADIUS_KM: f64 = 6371.00877;
/// Grid spacing in km.
const GRID_KM: f64 = 5.0;
/// Standard parallels.
const STANDARD_LAT_1: f64 = 30.0;
const STANDARD_LAT_2: f64 = 60.0;
/// Projection origin.
const ORIGIN_LON: f64 = 126.0;
const ORIGIN_LAT: f64 = 38.0;
/// Grid indices of the origin.
const ORIGIN_X: f64 = 43.0;
const ORIGIN_Y: f64 = 136.0;

const DEG_TO_RAD: f64 = PI / 180.0;

/// Project a coordinate onto the provider grid.
///
/// Output is `floor(v + 0.5)` on both axes, exactly as the provider indexes
/// its cells. Non-finite input never panics: NaN saturates to 0 and infinities
/// to the `i32` bounds.
pub fn project(point: GeoPoint) -> GridCell {
    let re = EARTH_RADIUS_KM / GRID_KM;
    let slat1 = STANDARD_LAT_1 * DEG_TO_RAD;
    let slat2 = STANDARD_LAT_2 * DEG_TO_RAD;
    let olon = ORIGIN_LON * DEG_TO_RAD;
    let olat = ORIGIN_LAT * DEG_TO_RAD;

    let sn = (slat1.cos() / slat2.cos()).ln()
        / ((PI * 0.25 + slat2 * 0.5).tan() / (PI * 0.25 + slat1 * 0.5).tan()).ln();
    let sf = (PI * 0.25 + slat1 * 0.5).tan().powf(sn) * slat1.cos() / sn;
    let ro = re * sf / (PI * 0.25 + olat * 0.5).tan().powf(sn);
    let ra = re * sf / (PI * 0.25 + point.latitude * DEG_TO_RAD * 0.5).tan().powf(sn);

    let theta = normalize_angle(point.longitude * DEG_TO_RAD - olon) * sn;

    let x = (ra * theta.sin() + ORIGIN_X + 0.5).floor();
    let y = (ro - ra * theta.cos() + ORIGIN_Y + 0.5).floor();

    GridCell { x: x as i32, y: y as i32 }
}

/// Wrap into (-π, π].
fn normalize_angle(mut theta: f64) -> f64 {
    if theta > PI {
        theta -= 2.0 * PI;
    }
    if theta <= -PI {
        theta += 2.0 * PI;
    }
    theta
}
