//! Settings snapshot written alongside each capture.
//!
//! Recording the session configuration next to the measured data keeps
//! captures reproducible. Note the power value is the one the instrument
//! confirmed after the set, not the requested one; the instrument quantizes
//! power to discrete levels.

use crate::config::VnaConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Flat snapshot of the session configuration at capture time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SettingsSnapshot {
    /// Number of configured traces.
    pub num_traces: usize,
    /// Sweep start frequency as configured, value plus unit.
    pub freq_start: String,
    /// Sweep stop frequency as configured, value plus unit.
    pub freq_stop: String,
    /// IF bandwidth as configured, value plus unit.
    pub if_bandwidth: String,
    /// Sweep point count.
    pub points: usize,
    /// Instrument-confirmed source power in dBm.
    pub power_dbm: f64,
    /// When the capture was taken.
    pub captured_at: DateTime<Utc>,
}

impl SettingsSnapshot {
    /// Snapshots the given configuration at the current time.
    pub fn from_config(config: &VnaConfig) -> Self {
        Self {
            num_traces: config.trace_labels.len(),
            freq_start: config.freq_start.clone(),
            freq_stop: config.freq_stop.clone(),
            if_bandwidth: config.if_bandwidth.clone(),
            points: config.points,
            power_dbm: config.power_dbm,
            captured_at: Utc::now(),
        }
    }

    /// Label/value rows for the settings table.
    pub fn rows(&self) -> Vec<(String, String)> {
        vec![
            ("Num_Traces".to_string(), self.num_traces.to_string()),
            ("Freq Start".to_string(), self.freq_start.clone()),
            ("Freq End".to_string(), self.freq_stop.clone()),
            ("IFBW".to_string(), self.if_bandwidth.clone()),
            ("Points".to_string(), self.points.to_string()),
            ("Power (dBm)".to_string(), self.power_dbm.to_string()),
            ("Captured".to_string(), self.captured_at.to_rfc3339()),
        ]
    }
}
