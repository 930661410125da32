//! Single-writer session driving the simulator and its observers.

use crate::alerts::{AlertTransition, ZoneAlertTracker, ALL_CLEAR};
use crate::collaborators::{Announcer, TelemetrySink};
use crate::config::SimConfig;
use crate::models::{GeoPoint, NavigationStep, VehicleState};
use crate::route::Route;
use crate::simulator::{ProgressSimulator, SimPhase};
use crate::steps::{StepStatus, StepTracker};
use std::sync::Arc;

/// Everything that changed during one tick, for display layers.
#[derive(Debug, Clone)]
pub struct TickReport {
    pub vehicle: VehicleState,
    /// Alert edge, if one fired this tick.
    pub alert: Option<AlertTransition>,
    /// Step evaluation, when a step list is loaded.
    pub step: Option<StepStatus>,
}

/// One simulated vehicle on one route.
///
/// The session owns all mutable state and is the single writer: each
/// `tick` advances the simulator, then feeds the new vehicle state to the
/// alert and step trackers and fires the resulting collaborator side
/// effects. An external scheduler decides when ticks happen; stopping a
/// session is simply not calling `tick` again.
pub struct Session {
    simulator: ProgressSimulator,
    alerts: ZoneAlertTracker,
    steps: StepTracker,
    announcer: Box<dyn Announcer>,
    telemetry: Box<dyn TelemetrySink>,
    lane_levels: Vec<f64>,
    report_every_ticks: u32,
    ticks: u64,
}

impl Session {
    pub fn new(
        route: Arc<Route>,
        config: &SimConfig,
        announcer: Box<dyn Announcer>,
        telemetry: Box<dyn TelemetrySink>,
    ) -> Self {
        Self {
            simulator: ProgressSimulator::new(route, config),
            alerts: ZoneAlertTracker::new(config.hazard_zones.clone()),
            steps: StepTracker::new(config.switch_at_meters),
            announcer,
            telemetry,
            lane_levels: Vec::new(),
            report_every_ticks: config.report_every_ticks,
            ticks: 0,
        }
    }

    pub fn start(&mut self) {
        self.simulator.start();
    }

    pub fn pause(&mut self) {
        self.simulator.pause();
    }

    pub fn stop(&mut self) {
        self.simulator.stop();
    }

    pub fn is_running(&self) -> bool {
        self.simulator.phase() == SimPhase::Running
    }

    pub fn vehicle(&self) -> &VehicleState {
        self.simulator.state()
    }

    pub fn active_alert(&self) -> Option<&str> {
        self.alerts.active_message()
    }

    pub fn active_step(&self) -> Option<&NavigationStep> {
        self.steps.active_step()
    }

    /// Last lane blockage levels pushed by the driver.
    pub fn lane_levels(&self) -> &[f64] {
        &self.lane_levels
    }

    /// Replace the navigation steps (new list from the routing
    /// collaborator). Step tracking rewinds to the first step.
    pub fn update_steps(&mut self, steps: Vec<NavigationStep>) {
        self.steps.set_steps(steps);
    }

    /// Cache the latest lane blockage levels for display.
    pub fn update_lanes(&mut self, levels: Vec<f64>) {
        self.lane_levels = levels;
    }

    /// Run one simulation tick. `delta` is normally 1.0.
    ///
    /// Returns `None` when nothing advanced (idle simulator or zero
    /// delta); no observer runs and no side effect fires in that case.
    pub fn tick(&mut self, delta: f64) -> Option<TickReport> {
        let vehicle = self.simulator.tick(delta)?;
        self.ticks += 1;

        let alert = self.alerts.observe(vehicle.segment_index);
        if let Some(transition) = &alert {
            let text = match transition {
                AlertTransition::Entered(message) => message.as_str(),
                AlertTransition::Cleared => ALL_CLEAR,
            };
            self.announce(text);
        }

        let step = self.steps.evaluate(vehicle.position);
        if let Some(status) = &step {
            if status.advanced {
                let instruction = self
                    .steps
                    .active_step()
                    .and_then(|s| s.instruction.clone());
                if let Some(text) = instruction {
                    self.announce(&text);
                }
                self.report_position(vehicle.position);
            }
        }

        if self.report_every_ticks > 0 && self.ticks % u64::from(self.report_every_ticks) == 0 {
            self.report_position(vehicle.position);
        }

        Some(TickReport {
            vehicle,
            alert,
            step,
        })
    }

    fn announce(&mut self, text: &str) {
        if let Err(err) = self.announcer.announce(text) {
            tracing::debug!("announcement dropped: {err}");
        }
    }

    fn report_position(&mut self, position: GeoPoint) {
        if let Err(err) = self.telemetry.report(position) {
            tracing::debug!("telemetry report dropped: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HazardZone;
    use anyhow::Result;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct RecordingAnnouncer {
        spoken: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    impl Announcer for RecordingAnnouncer {
        fn announce(&mut self, text: &str) -> Result<()> {
            if self.fail {
                anyhow::bail!("speech backend offline");
            }
            self.spoken.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct RecordingSink {
        reports: Arc<Mutex<Vec<GeoPoint>>>,
    }

    impl TelemetrySink for RecordingSink {
        fn report(&mut self, position: GeoPoint) -> Result<()> {
            self.reports.lock().unwrap().push(position);
            Ok(())
        }
    }

    fn straight_route() -> Arc<Route> {
        Arc::new(
            Route::build(vec![
                GeoPoint::new(0.0, 0.0),
                GeoPoint::new(0.0, 1.0),
                GeoPoint::new(0.0, 2.0),
                GeoPoint::new(0.0, 3.0),
            ])
            .unwrap(),
        )
    }

    fn session_with(
        config: SimConfig,
        announcer: RecordingAnnouncer,
        sink: RecordingSink,
    ) -> Session {
        Session::new(
            straight_route(),
            &config,
            Box::new(announcer),
            Box::new(sink),
        )
    }

    #[test]
    fn hazard_transitions_are_spoken_once_each() {
        let announcer = RecordingAnnouncer::default();
        let spoken = announcer.spoken.clone();
        let config = SimConfig {
            speed: 1.0,
            max_speed: 1.0,
            hazard_zones: vec![HazardZone {
                start_index: 2,
                end_index: 2,
                message: "Construction ahead in Lane 1".to_string(),
            }],
            ..SimConfig::default()
        };
        let mut session = session_with(config, announcer, RecordingSink::default());
        session.start();

        // Segment 1, segment 2 (enter), segment 3 (clear).
        session.tick(0.5);
        session.tick(1.0);
        session.tick(1.0);

        assert_eq!(
            *spoken.lock().unwrap(),
            vec![
                "Construction ahead in Lane 1".to_string(),
                ALL_CLEAR.to_string()
            ]
        );
    }

    #[test]
    fn zero_delta_tick_emits_nothing() {
        let announcer = RecordingAnnouncer::default();
        let spoken = announcer.spoken.clone();
        let config = SimConfig {
            speed: 1.0,
            max_speed: 1.0,
            hazard_zones: vec![HazardZone {
                start_index: 1,
                end_index: 3,
                message: "Lane 2: 45 mph".to_string(),
            }],
            ..SimConfig::default()
        };
        let mut session = session_with(config, announcer, RecordingSink::default());
        session.start();

        assert!(session.tick(0.0).is_none());
        assert!(spoken.lock().unwrap().is_empty());
        assert_eq!(session.vehicle().progress, 0.0);
    }

    #[test]
    fn step_advancement_announces_and_reports_position() {
        let announcer = RecordingAnnouncer::default();
        let spoken = announcer.spoken.clone();
        let sink = RecordingSink::default();
        let reports = sink.reports.clone();

        let config = SimConfig {
            speed: 1.0,
            max_speed: 1.0,
            ..SimConfig::default()
        };
        let mut session = session_with(config, announcer, sink);
        session.update_steps(vec![
            NavigationStep {
                instruction: Some("Head east".to_string()),
                path: vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0)],
                ..NavigationStep::default()
            },
            NavigationStep {
                instruction: Some("Continue east".to_string()),
                path: vec![GeoPoint::new(0.0, 1.0), GeoPoint::new(0.0, 3.0)],
                ..NavigationStep::default()
            },
        ]);
        session.start();

        // Well inside step one.
        let report = session.tick(0.5).unwrap();
        assert!(!report.step.unwrap().advanced);
        assert!(reports.lock().unwrap().is_empty());

        // Past the end of step one's path: the tracker switches.
        let report = session.tick(0.7).unwrap();
        let status = report.step.unwrap();
        assert_eq!(status.step_index, 1);
        assert!(status.advanced);
        assert_eq!(*spoken.lock().unwrap(), vec!["Continue east".to_string()]);
        assert_eq!(reports.lock().unwrap().len(), 1);
    }

    #[test]
    fn periodic_telemetry_reports_on_cadence() {
        let sink = RecordingSink::default();
        let reports = sink.reports.clone();
        let config = SimConfig {
            speed: 0.1,
            max_speed: 0.1,
            report_every_ticks: 2,
            ..SimConfig::default()
        };
        let mut session = session_with(config, RecordingAnnouncer::default(), sink);
        session.start();

        for _ in 0..6 {
            session.tick(1.0);
        }
        assert_eq!(reports.lock().unwrap().len(), 3);
    }

    #[test]
    fn failing_announcer_never_stalls_the_tick() {
        let announcer = RecordingAnnouncer {
            fail: true,
            ..RecordingAnnouncer::default()
        };
        let config = SimConfig {
            speed: 1.0,
            max_speed: 1.0,
            hazard_zones: vec![HazardZone {
                start_index: 1,
                end_index: 3,
                message: "Lane 3: 50 mph".to_string(),
            }],
            ..SimConfig::default()
        };
        let mut session = session_with(config, announcer, RecordingSink::default());
        session.start();

        let report = session.tick(0.5).unwrap();
        assert!(report.alert.is_some());
        assert!(session.is_running());
        assert!((session.vehicle().progress - 0.5).abs() < 1e-12);
    }

    #[test]
    fn session_goes_idle_at_route_end() {
        let config = SimConfig {
            speed: 10.0,
            max_speed: 10.0,
            ..SimConfig::default()
        };
        let mut session = session_with(
            config,
            RecordingAnnouncer::default(),
            RecordingSink::default(),
        );
        session.start();

        let report = session.tick(1.0).unwrap();
        assert_eq!(report.vehicle.progress, 3.0);
        assert!(!session.is_running());
        assert!(session.tick(1.0).is_none());
    }

    #[test]
    fn replacing_steps_rewinds_tracking() {
        let config = SimConfig {
            speed: 1.0,
            max_speed: 1.0,
            ..SimConfig::default()
        };
        let mut session = session_with(
            config,
            RecordingAnnouncer::default(),
            RecordingSink::default(),
        );
        session.update_steps(vec![
            NavigationStep {
                path: vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 0.001)],
                ..NavigationStep::default()
            },
            NavigationStep {
                path: vec![GeoPoint::new(0.0, 0.001), GeoPoint::new(0.0, 3.0)],
                ..NavigationStep::default()
            },
        ]);
        session.start();
        session.tick(0.5);
        assert_eq!(session.steps.step_index(), 1);

        session.update_steps(vec![NavigationStep {
            path: vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 3.0)],
            ..NavigationStep::default()
        }]);
        assert_eq!(session.steps.step_index(), 0);
    }

    #[test]
    fn lane_levels_are_cached_for_display() {
        let config = SimConfig::default();
        let mut session = session_with(
            config,
            RecordingAnnouncer::default(),
            RecordingSink::default(),
        );
        assert!(session.lane_levels().is_empty());

        session.update_lanes(vec![0.0, 0.25, 1.0]);
        assert_eq!(session.lane_levels(), &[0.0, 0.25, 1.0]);
    }
}
