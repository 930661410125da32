//! Built-in demo scenario: a short drive near the UCI campus.
//!
//! Lets the binary run with no input files, and doubles as the reference
//! shape for user-supplied route/zone/step JSON.

use anyhow::Result;
use tracksim_core::{
    Announcer, GeoPoint, HazardZone, LaneStatusProvider, Maneuver, NavigationStep,
    RoutingStepsProvider, TelemetrySink,
};

const BASE_LAT: f64 = 33.6400;
const BASE_LON: f64 = -117.8400;
const POINT_SPACING_DEG: f64 = 0.0001;

/// Demo route: north for 60 points, then east for 40.
pub fn demo_route() -> Vec<GeoPoint> {
    let mut points = Vec::with_capacity(100);
    for i in 0..60 {
        points.push(GeoPoint::new(
            BASE_LAT + i as f64 * POINT_SPACING_DEG,
            BASE_LON,
        ));
    }
    let corner_lat = BASE_LAT + 59.0 * POINT_SPACING_DEG;
    for i in 1..=40 {
        points.push(GeoPoint::new(
            corner_lat,
            BASE_LON + i as f64 * POINT_SPACING_DEG,
        ));
    }
    points
}

/// Demo hazard zones along the route.
pub fn demo_zones() -> Vec<HazardZone> {
    vec![
        HazardZone {
            start_index: 20,
            end_index: 40,
            message: "Lane 2: 45 mph".to_string(),
        },
        HazardZone {
            start_index: 45,
            end_index: 58,
            message: "Construction ahead in Lane 1".to_string(),
        },
        HazardZone {
            start_index: 70,
            end_index: 90,
            message: "Lane 3: 50 mph".to_string(),
        },
    ]
}

/// Two guidance steps matching the demo route's two legs.
pub fn demo_steps() -> Vec<NavigationStep> {
    let route = demo_route();
    let north_leg: Vec<GeoPoint> = route[..60].to_vec();
    let east_leg: Vec<GeoPoint> = route[59..].to_vec();

    vec![
        NavigationStep {
            instruction: Some("Head north on Campus Dr".to_string()),
            maneuver: Some(Maneuver::Straight),
            end_point: north_leg.last().copied(),
            total_distance_m: Some(leg_length_m(&north_leg)),
            path: north_leg,
        },
        NavigationStep {
            instruction: Some("Turn right onto University Dr".to_string()),
            maneuver: Some(Maneuver::TurnRight),
            end_point: east_leg.last().copied(),
            total_distance_m: Some(leg_length_m(&east_leg)),
            path: east_leg,
        },
    ]
}

fn leg_length_m(points: &[GeoPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| tracksim_core::haversine_distance(pair[0], pair[1]))
        .sum()
}

/// Prints announcements to the terminal. Nothing is ever pending, so the
/// cancel-before-speak contract holds trivially.
#[derive(Debug, Default)]
pub struct ConsoleAnnouncer;

impl Announcer for ConsoleAnnouncer {
    fn announce(&mut self, text: &str) -> Result<()> {
        println!("[voice] {text}");
        Ok(())
    }
}

/// Logs reported positions instead of shipping them anywhere.
#[derive(Debug, Default)]
pub struct LogTelemetrySink;

impl TelemetrySink for LogTelemetrySink {
    fn report(&mut self, position: GeoPoint) -> Result<()> {
        tracing::info!(
            "position report lat={:.6} lon={:.6}",
            position.latitude,
            position.longitude
        );
        Ok(())
    }
}

/// Yields a fixed step list once, like a routing service that answered a
/// single directions request.
pub struct StaticStepsProvider {
    steps: Option<Vec<NavigationStep>>,
}

impl StaticStepsProvider {
    pub fn new(steps: Vec<NavigationStep>) -> Self {
        Self { steps: Some(steps) }
    }
}

impl RoutingStepsProvider for StaticStepsProvider {
    fn poll_steps(&mut self) -> Option<Vec<NavigationStep>> {
        self.steps.take()
    }
}

/// Fixed lane blockage levels (lane 3 fully blocked, lane 2 partially).
#[derive(Debug, Default)]
pub struct StaticLaneStatusProvider {
    published: bool,
}

impl LaneStatusProvider for StaticLaneStatusProvider {
    fn poll_lanes(&mut self) -> Option<Vec<f64>> {
        if self.published {
            return None;
        }
        self.published = true;
        Some(vec![0.0, 0.25, 1.0, 0.0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_route_has_no_duplicate_consecutive_points() {
        let route = demo_route();
        assert_eq!(route.len(), 100);
        for pair in route.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn demo_zones_fit_inside_the_route() {
        let route = demo_route();
        for zone in demo_zones() {
            assert!(zone.start_index <= zone.end_index);
            assert!(zone.end_index < route.len());
        }
    }

    #[test]
    fn demo_steps_cover_both_legs() {
        let steps = demo_steps();
        assert_eq!(steps.len(), 2);
        for step in &steps {
            assert!(step.path.len() >= 2);
            assert!(step.total_distance_m.unwrap() > 0.0);
        }
    }

    #[test]
    fn static_steps_provider_yields_exactly_once() {
        let mut provider = StaticStepsProvider::new(demo_steps());
        assert!(provider.poll_steps().is_some());
        assert!(provider.poll_steps().is_none());
    }
}
