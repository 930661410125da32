//! Session configuration tunables.

use crate::models::HazardZone;
use serde::{Deserialize, Serialize};

/// Tunables for a simulation session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Progress advanced per tick, in route (planar degree) units.
    pub speed: f64,
    /// Ceiling the per-tick advance is clamped to.
    pub max_speed: f64,
    /// Remaining-distance threshold below which the active step switches
    /// to the next one, in meters.
    pub switch_at_meters: f64,
    /// Wrap to the route start on reaching the end instead of stopping.
    pub loop_at_end: bool,
    /// Report the position to the telemetry sink every N ticks
    /// (0 = only on step advancement).
    pub report_every_ticks: u32,
    pub hazard_zones: Vec<HazardZone>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            speed: 0.000_03,
            max_speed: 0.000_03,
            switch_at_meters: 12.0,
            loop_at_end: false,
            report_every_ticks: 0,
            hazard_zones: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = SimConfig::default();
        assert_eq!(config.speed, 0.000_03);
        assert_eq!(config.switch_at_meters, 12.0);
        assert!(!config.loop_at_end);
        assert_eq!(config.report_every_ticks, 0);
        assert!(config.hazard_zones.is_empty());
    }

    #[test]
    fn partial_config_files_fill_in_defaults() {
        let config: SimConfig = serde_json::from_str(
            r#"{
                "loop_at_end": true,
                "hazard_zones": [
                    {"start_index": 20, "end_index": 40, "message": "Lane 2: 45 mph"}
                ]
            }"#,
        )
        .unwrap();
        assert!(config.loop_at_end);
        assert_eq!(config.hazard_zones.len(), 1);
        assert_eq!(config.speed, 0.000_03);
    }
}
