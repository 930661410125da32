//! Spatial math for route progress and guidance distances.
//!
//! Two distance scales coexist on purpose: `planar_distance` works in raw
//! degree space and is the unit of route progress and speed, while
//! `haversine_distance` returns physical meters for anything shown to or
//! spoken at the driver. Callers must not compare values across the two.

use crate::models::GeoPoint;

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

const METERS_PER_DEG_LAT: f64 = 111_320.0;
const METERS_PER_MILE: f64 = 1_609.344;

/// Euclidean distance on raw (lat, lon) treated as a flat plane.
///
/// Not a physical distance. Segment lengths, cumulative progress and the
/// simulator speed all use this scale, which keeps them mutually
/// consistent for nearby points.
pub fn planar_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let dx = b.latitude - a.latitude;
    let dy = b.longitude - a.longitude;
    (dx * dx + dy * dy).sqrt()
}

/// Great-circle distance between two points in meters.
///
/// Standard haversine formula over a spherical Earth.
pub fn haversine_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let dphi = (b.latitude - a.latitude).to_radians();
    let dlambda = (b.longitude - a.longitude).to_radians();
    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Initial compass bearing from `a` to `b` in degrees, normalized to
/// [0, 360). 0 = north, 90 = east.
pub fn bearing_degrees(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let delta_lambda = (b.longitude - a.longitude).to_radians();

    let y = delta_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

/// Closest point on segment `a`-`b` to `p`.
#[derive(Debug, Clone, Copy)]
pub struct SegmentProjection {
    /// Parameter along the segment, clamped to [0, 1].
    pub t: f64,
    pub point: GeoPoint,
}

/// Project `p` onto the segment `a`-`b`.
///
/// Works in a local tangent plane centered at `p`, with longitude scaled
/// by cos(latitude) to correct for meridian convergence. A degenerate
/// segment (`a` == `b`) yields `t = 0` and the segment start.
pub fn project_onto_segment(p: GeoPoint, a: GeoPoint, b: GeoPoint) -> SegmentProjection {
    let m_per_deg_lat = METERS_PER_DEG_LAT;
    let m_per_deg_lon = METERS_PER_DEG_LAT * p.latitude.to_radians().cos();

    let ax = (a.longitude - p.longitude) * m_per_deg_lon;
    let ay = (a.latitude - p.latitude) * m_per_deg_lat;
    let bx = (b.longitude - p.longitude) * m_per_deg_lon;
    let by = (b.latitude - p.latitude) * m_per_deg_lat;

    let vx = bx - ax;
    let vy = by - ay;

    let vv = vx * vx + vy * vy;
    let t = if vv == 0.0 {
        0.0
    } else {
        ((-ax * vx - ay * vy) / vv).clamp(0.0, 1.0)
    };

    let proj_x = ax + t * vx;
    let proj_y = ay + t * vy;

    let point = GeoPoint::new(
        proj_y / m_per_deg_lat + p.latitude,
        if m_per_deg_lon == 0.0 {
            p.longitude
        } else {
            proj_x / m_per_deg_lon + p.longitude
        },
    );

    SegmentProjection { t, point }
}

pub fn meters_to_miles(meters: f64) -> f64 {
    meters / METERS_PER_MILE
}
