//! Core data models for the tracking simulation.

use serde::{Deserialize, Serialize};

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// True when both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// An advisory message attached to a contiguous range of route segment
/// indices (inclusive on both ends).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardZone {
    pub start_index: usize,
    pub end_index: usize,
    pub message: String,
}

impl HazardZone {
    /// Check if a segment index falls inside this zone.
    pub fn contains(&self, segment_index: usize) -> bool {
        segment_index >= self.start_index && segment_index <= self.end_index
    }
}

/// Maneuver hint attached to a navigation step, for display layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Maneuver {
    TurnLeft,
    TurnRight,
    KeepLeft,
    KeepRight,
    Straight,
}

/// One turn-by-turn instruction produced by an external routing provider.
///
/// The engine only reads the step geometry (path and/or end point); the
/// remaining fields pass through to display and announcements.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavigationStep {
    #[serde(default)]
    pub instruction: Option<String>,
    #[serde(default)]
    pub maneuver: Option<Maneuver>,
    /// Detailed polyline for the step, when the provider supplies one.
    #[serde(default)]
    pub path: Vec<GeoPoint>,
    #[serde(default)]
    pub end_point: Option<GeoPoint>,
    /// Step length reported by the provider, in meters. Used as the
    /// fallback when the step geometry cannot be projected.
    #[serde(default)]
    pub total_distance_m: Option<f64>,
}

/// Live vehicle state, written exactly once per tick by the simulator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VehicleState {
    /// Cumulative distance traveled along the route, in route units.
    pub progress: f64,
    /// Index of the segment containing the vehicle (index of the
    /// segment's end point, so always >= 1).
    pub segment_index: usize,
    pub position: GeoPoint,
    /// Compass heading in degrees, 0 = north.
    pub heading_deg: f64,
}
