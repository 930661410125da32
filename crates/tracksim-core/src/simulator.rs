//! Constant-rate progress simulation along a route.

use crate::config::SimConfig;
use crate::models::{GeoPoint, VehicleState};
use crate::route::Route;
use crate::spatial::bearing_degrees;
use std::sync::Arc;

/// Whether the simulator advances on `tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimPhase {
    Idle,
    Running,
}

/// Advances a scalar progress value along a [`Route`] and resolves the
/// interpolated vehicle state each tick.
///
/// The simulator makes no scheduling decisions; an external driver calls
/// [`ProgressSimulator::tick`] at whatever cadence it likes. Reaching the
/// end of the route clamps progress and drops back to [`SimPhase::Idle`]
/// unless `loop_at_end` is set, in which case progress wraps to 0 and the
/// run continues.
pub struct ProgressSimulator {
    route: Arc<Route>,
    speed: f64,
    max_speed: f64,
    loop_at_end: bool,
    phase: SimPhase,
    state: VehicleState,
}

impl ProgressSimulator {
    pub fn new(route: Arc<Route>, config: &SimConfig) -> Self {
        let state = resolve_state(&route, 0.0);
        Self {
            route,
            speed: config.speed,
            max_speed: config.max_speed,
            loop_at_end: config.loop_at_end,
            phase: SimPhase::Idle,
            state,
        }
    }

    pub fn phase(&self) -> SimPhase {
        self.phase
    }

    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    pub fn route(&self) -> &Arc<Route> {
        &self.route
    }

    /// Adjust the per-tick advance; still clamped to `max_speed`.
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    pub fn start(&mut self) {
        self.phase = SimPhase::Running;
    }

    /// Stop advancing, keeping the current progress.
    pub fn pause(&mut self) {
        self.phase = SimPhase::Idle;
    }

    /// Stop advancing and rewind to the route start.
    pub fn stop(&mut self) {
        self.phase = SimPhase::Idle;
        self.state = resolve_state(&self.route, 0.0);
    }

    /// Advance by `min(speed, max_speed) * delta` and resolve the new
    /// vehicle state.
    ///
    /// Returns `None` when idle or when the advance is zero (a
    /// `tick(0.0)` changes nothing and emits nothing). At the route end
    /// the returned state is the clamped final position; subsequent
    /// ticks return `None`.
    pub fn tick(&mut self, delta: f64) -> Option<VehicleState> {
        if self.phase == SimPhase::Idle {
            return None;
        }

        let step = self.speed.min(self.max_speed) * delta;
        if step <= 0.0 {
            return None;
        }

        let total = self.route.total_length();
        let mut progress = self.state.progress + step;
        if self.loop_at_end {
            if progress > total {
                progress = 0.0;
            }
        } else if progress >= total {
            progress = total;
            self.phase = SimPhase::Idle;
        }

        self.state = resolve_state(&self.route, progress);
        Some(self.state)
    }
}

/// Resolve the interpolated vehicle state for a progress value.
fn resolve_state(route: &Route, progress: f64) -> VehicleState {
    let segment_index = route.locate(progress);
    let (start, end) = route.segment_at(segment_index);
    let segment_length = route.segment_length(segment_index);

    let fraction = if segment_length > 0.0 {
        (progress - route.cumulative_length(segment_index - 1)) / segment_length
    } else {
        tracing::warn!("degenerate segment {segment_index}, snapping to its start");
        0.0
    };

    let position = GeoPoint::new(
        start.latitude + fraction * (end.latitude - start.latitude),
        start.longitude + fraction * (end.longitude - start.longitude),
    );

    VehicleState {
        progress,
        segment_index,
        position,
        heading_deg: bearing_degrees(start, end),
    }
}
