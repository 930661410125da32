//! Hazard-zone alert resolution with edge-triggered transitions.

use crate::models::HazardZone;

/// Spoken when the vehicle leaves the last active zone.
pub const ALL_CLEAR: &str = "All clear";

/// Transition produced when the resolved alert message changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertTransition {
    /// Entered a zone (or moved directly into a different one).
    Entered(String),
    /// Left the last zone with no replacement.
    Cleared,
}

/// Maps the live segment index to the active hazard message and yields a
/// transition only when that message changes.
///
/// Resolution is pure: the first zone in configuration order containing
/// the segment index wins. Repeated observations inside the same zone, or
/// in the clear state, produce nothing. One instance per session; the
/// last-announced message is instance state, never shared.
pub struct ZoneAlertTracker {
    zones: Vec<HazardZone>,
    active_message: Option<String>,
}

impl ZoneAlertTracker {
    pub fn new(zones: Vec<HazardZone>) -> Self {
        Self {
            zones,
            active_message: None,
        }
    }

    /// The message currently in effect, if any.
    pub fn active_message(&self) -> Option<&str> {
        self.active_message.as_deref()
    }

    /// First zone containing `segment_index`, in configuration order.
    pub fn resolve(&self, segment_index: usize) -> Option<&HazardZone> {
        self.zones.iter().find(|zone| zone.contains(segment_index))
    }

    /// Observe the vehicle's segment index, returning a transition when
    /// the resolved message differs from the previous observation.
    pub fn observe(&mut self, segment_index: usize) -> Option<AlertTransition> {
        let resolved = self.resolve(segment_index).map(|zone| zone.message.clone());
        if resolved == self.active_message {
            return None;
        }

        let transition = match &resolved {
            Some(message) => AlertTransition::Entered(message.clone()),
            None => AlertTransition::Cleared,
        };
        self.active_message = resolved;
        Some(transition)
    }
}
