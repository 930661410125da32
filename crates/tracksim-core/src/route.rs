//! Immutable route polyline with precomputed segment lengths.

use crate::models::GeoPoint;
use crate::spatial::planar_distance;
use thiserror::Error;

/// A route needs at least two points to have a segment to travel.
#[derive(Debug, Error)]
#[error("a route requires at least two points, got {count}")]
pub struct InvalidRouteError {
    pub count: usize,
}

/// Ordered polyline the simulated vehicle follows.
///
/// Segment `i` (for `i >= 1`) spans point `i-1` to point `i`;
/// `segment_length(0)` is defined as 0. Lengths are planar degree-space
/// values, the same scale the simulator speed uses. Immutable once built,
/// so it can be shared across concurrent sessions without locking.
#[derive(Debug, Clone)]
pub struct Route {
    points: Vec<GeoPoint>,
    segment_lengths: Vec<f64>,
    cumulative_lengths: Vec<f64>,
}

impl Route {
    /// Build a route from raw waypoints, precomputing per-segment and
    /// cumulative lengths.
    ///
    /// Zero-length segments (duplicate consecutive points) are accepted
    /// and logged; interpolation treats them as degenerate.
    pub fn build(points: Vec<GeoPoint>) -> Result<Self, InvalidRouteError> {
        if points.len() < 2 {
            return Err(InvalidRouteError {
                count: points.len(),
            });
        }

        let mut segment_lengths = Vec::with_capacity(points.len());
        let mut cumulative_lengths = Vec::with_capacity(points.len());
        segment_lengths.push(0.0);
        cumulative_lengths.push(0.0);

        for i in 1..points.len() {
            let length = planar_distance(points[i - 1], points[i]);
            if length == 0.0 {
                tracing::debug!("route has a zero-length segment at index {i}");
            }
            segment_lengths.push(length);
            cumulative_lengths.push(cumulative_lengths[i - 1] + length);
        }

        Ok(Self {
            points,
            segment_lengths,
            cumulative_lengths,
        })
    }

    /// Number of points (not segments) in the route.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        // A built route always has >= 2 points.
        false
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn point_at(&self, index: usize) -> GeoPoint {
        self.points[index]
    }

    /// Endpoints of segment `index`: `(point[index-1], point[index])`.
    pub fn segment_at(&self, index: usize) -> (GeoPoint, GeoPoint) {
        (self.points[index - 1], self.points[index])
    }

    pub fn segment_length(&self, index: usize) -> f64 {
        self.segment_lengths[index]
    }

    pub fn cumulative_length(&self, index: usize) -> f64 {
        self.cumulative_lengths[index]
    }

    pub fn total_length(&self) -> f64 {
        *self
            .cumulative_lengths
            .last()
            .expect("route has at least two points")
    }

    /// Index of the segment containing `progress`, in `[1, len - 1]`.
    ///
    /// Cumulative lengths are monotonic, so a binary search finds the
    /// first segment whose cumulative bound reaches `progress`. A value
    /// exactly on a boundary resolves to the lower segment, so finishing
    /// segment `i` reports segment `i` at fraction 1.
    pub fn locate(&self, progress: f64) -> usize {
        let index = self.cumulative_lengths.partition_point(|&c| c < progress);
        index.clamp(1, self.points.len() - 1)
    }
}
