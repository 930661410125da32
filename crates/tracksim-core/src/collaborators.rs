//! Abstract interfaces to the session's external collaborators.
//!
//! Concrete transports (speech synthesis, HTTP, map rendering) live
//! outside this crate. Side-effect calls are fire-and-forget: the session
//! logs a returned error and moves on, so a failing collaborator can
//! never stall or corrupt a tick.

use crate::models::{GeoPoint, NavigationStep};
use anyhow::Result;

/// Spoken or visual alert output.
///
/// Implementations must interrupt any in-flight utterance before
/// speaking the new one (at most one utterance pending); the session only
/// ever calls `announce`.
pub trait Announcer: Send {
    fn announce(&mut self, text: &str) -> Result<()>;
}

/// Best-effort position reporting. The session neither awaits nor
/// retries; implementations own their failure handling.
pub trait TelemetrySink: Send {
    fn report(&mut self, position: GeoPoint) -> Result<()>;
}

/// Supplies the ordered turn-by-turn step list, refreshed out of band.
///
/// `poll_steps` returns `Some` only when a new list is available; the
/// driver pushes it into the session, which rewinds step tracking.
pub trait RoutingStepsProvider: Send {
    fn poll_steps(&mut self) -> Option<Vec<NavigationStep>>;
}

/// Supplies per-lane blockage levels in `0..=1` for display only.
pub trait LaneStatusProvider: Send {
    fn poll_lanes(&mut self) -> Option<Vec<f64>>;
}

/// Announcer that discards everything, for tests and headless runs.
#[derive(Debug, Default)]
pub struct NullAnnouncer;

impl Announcer for NullAnnouncer {
    fn announce(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }
}

/// Telemetry sink that discards everything.
#[derive(Debug, Default)]
pub struct NullTelemetrySink;

impl TelemetrySink for NullTelemetrySink {
    fn report(&mut self, _position: GeoPoint) -> Result<()> {
        Ok(())
    }
}
