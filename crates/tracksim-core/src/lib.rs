//! Route progress and guidance engine for vehicle tracking simulations.
//!
//! Advances a simulated vehicle along a polyline route at a constant
//! rate, resolves hazard-zone alerts by segment index, and tracks the
//! active turn-by-turn navigation step against the live position. All
//! state mutation happens inside a single synchronous `tick`; scheduling,
//! rendering and transport belong to external collaborators.

pub mod alerts;
pub mod collaborators;
pub mod config;
pub mod models;
pub mod route;
pub mod session;
pub mod simulator;
pub mod spatial;
pub mod steps;

pub use alerts::{AlertTransition, ZoneAlertTracker, ALL_CLEAR};
pub use collaborators::{
    Announcer, LaneStatusProvider, NullAnnouncer, NullTelemetrySink, RoutingStepsProvider,
    TelemetrySink,
};
pub use config::SimConfig;
pub use models::{GeoPoint, HazardZone, Maneuver, NavigationStep, VehicleState};
pub use route::{InvalidRouteError, Route};
pub use session::{Session, TickReport};
pub use simulator::{ProgressSimulator, SimPhase};
pub use spatial::haversine_distance;
pub use steps::{remaining_meters, RemainingDistance, StepProjectionError, StepStatus, StepTracker};
