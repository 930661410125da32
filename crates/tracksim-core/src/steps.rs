//! Active navigation-step tracking against the live position.

use crate::models::{GeoPoint, NavigationStep};
use crate::spatial::{haversine_distance, meters_to_miles, project_onto_segment};
use std::fmt;
use thiserror::Error;

/// The step geometry could not be projected.
#[derive(Debug, Error)]
pub enum StepProjectionError {
    #[error("step geometry contains a non-finite coordinate")]
    NonFiniteCoordinate,
}

/// Remaining distance along the active step, as shown to the driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RemainingDistance {
    pub meters: f64,
}

impl RemainingDistance {
    pub fn miles(&self) -> f64 {
        meters_to_miles(self.meters)
    }
}

impl fmt::Display for RemainingDistance {
    /// Short distances read better in feet: "430 ft", else "1.2 mi".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let miles = self.miles();
        if miles < 0.1 {
            write!(f, "{:.0} ft", (miles * 5_280.0).max(0.0))
        } else {
            write!(f, "{miles:.1} mi")
        }
    }
}

/// Outcome of one step evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepStatus {
    pub step_index: usize,
    pub remaining: RemainingDistance,
    /// True when this evaluation moved to a later step.
    pub advanced: bool,
}

/// Determines the current turn-by-turn step from the live position.
///
/// The step index only ever moves forward; replacing the step list is the
/// one way to rewind. When the remaining distance on the active step
/// drops under the switch-ahead threshold the tracker walks forward,
/// skipping any number of short steps in a single evaluation.
pub struct StepTracker {
    steps: Vec<NavigationStep>,
    step_index: usize,
    switch_at_m: f64,
}

impl StepTracker {
    pub fn new(switch_at_m: f64) -> Self {
        Self {
            steps: Vec::new(),
            step_index: 0,
            switch_at_m,
        }
    }

    /// Replace the step list. Always rewinds to the first step, even for
    /// an identical list.
    pub fn set_steps(&mut self, steps: Vec<NavigationStep>) {
        self.steps = steps;
        self.step_index = 0;
    }

    pub fn steps(&self) -> &[NavigationStep] {
        &self.steps
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn active_step(&self) -> Option<&NavigationStep> {
        self.steps.get(self.step_index)
    }

    /// Re-evaluate the active step for `position`.
    ///
    /// Returns `None` when no steps are loaded. Never regresses to an
    /// earlier step.
    pub fn evaluate(&mut self, position: GeoPoint) -> Option<StepStatus> {
        if self.steps.is_empty() {
            return None;
        }

        let mut next_index = self.step_index.min(self.steps.len() - 1);
        let mut remaining = self.remaining_or_fallback(next_index, position);
        while remaining < self.switch_at_m && next_index < self.steps.len() - 1 {
            next_index += 1;
            remaining = self.remaining_or_fallback(next_index, position);
        }

        let advanced = next_index > self.step_index;
        self.step_index = next_index;

        Some(StepStatus {
            step_index: next_index,
            remaining: RemainingDistance { meters: remaining },
            advanced,
        })
    }

    /// Remaining meters for a step, falling back to the provider-reported
    /// length (or 0, which lets the switch-ahead loop skip the step) when
    /// the geometry cannot be projected.
    fn remaining_or_fallback(&self, index: usize, position: GeoPoint) -> f64 {
        let step = &self.steps[index];
        match remaining_meters(step, position) {
            Ok(meters) => meters,
            Err(err) => {
                tracing::warn!("step {index} projection failed ({err}), using provider distance");
                step.total_distance_m.unwrap_or(0.0)
            }
        }
    }
}

/// Remaining meters from `position` to the end of `step`.
///
/// With a path of at least two points: project onto the closest path
/// segment, then sum the projected point to the next vertex plus every
/// following segment. With only an end point: straight-line distance.
/// Otherwise the step is already exhausted.
pub fn remaining_meters(
    step: &NavigationStep,
    position: GeoPoint,
) -> Result<f64, StepProjectionError> {
    if !position.is_finite() {
        return Err(StepProjectionError::NonFiniteCoordinate);
    }

    if step.path.is_empty() {
        if let Some(end) = step.end_point {
            if !end.is_finite() {
                return Err(StepProjectionError::NonFiniteCoordinate);
            }
            return Ok(haversine_distance(position, end));
        }
        return Ok(0.0);
    }

    if step.path.len() < 2 {
        return Ok(0.0);
    }
    if step.path.iter().any(|p| !p.is_finite()) {
        return Err(StepProjectionError::NonFiniteCoordinate);
    }

    let mut best_segment = 0;
    let mut best_point = step.path[0];
    let mut best_distance = f64::INFINITY;
    for i in 0..step.path.len() - 1 {
        let projection = project_onto_segment(position, step.path[i], step.path[i + 1]);
        let distance = haversine_distance(position, projection.point);
        if distance < best_distance {
            best_distance = distance;
            best_segment = i;
            best_point = projection.point;
        }
    }

    let next = best_segment + 1;
    let mut remaining = haversine_distance(best_point, step.path[next]);
    for j in next..step.path.len() - 1 {
        remaining += haversine_distance(step.path[j], step.path[j + 1]);
    }

    Ok(remaining)
}
