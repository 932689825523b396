//! Session configuration.
//!
//! All parameters are constructor arguments with instrument-friendly defaults;
//! there is no external configuration file. Frequency and bandwidth values are
//! free-form strings combining a number and a unit suffix (e.g. `"3 GHz"`,
//! `"1 kHz"`). The SCPI command syntax accepts these directly, so the driver
//! passes them through uninterpreted; a malformed value fails at the
//! instrument, not here.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a [`crate::VnaSession`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VnaConfig {
    /// Instrument hostname or IP address.
    pub host: String,
    /// SCPI socket server port (the instrument default is 5025).
    pub port: u16,
    /// Sweep start frequency, value plus unit.
    pub freq_start: String,
    /// Sweep stop frequency, value plus unit.
    pub freq_stop: String,
    /// IF bandwidth, value plus unit.
    pub if_bandwidth: String,
    /// Number of sweep points.
    pub points: usize,
    /// Measurement parameters in display order, e.g. `["S11", "S21"]`.
    pub trace_labels: Vec<String>,
    /// Source power in dBm. After initialization this holds the value the
    /// instrument confirmed, which may differ from the requested one.
    pub power_dbm: f64,
    /// Read timeout for blocking queries. Set high to tolerate slow sweeps.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for VnaConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5025,
            freq_start: "3 GHz".to_string(),
            freq_stop: "4 GHz".to_string(),
            if_bandwidth: "1 kHz".to_string(),
            points: 3001,
            trace_labels: vec![
                "S11".to_string(),
                "S12".to_string(),
                "S22".to_string(),
                "S21".to_string(),
            ],
            power_dbm: -10.0,
            timeout: Duration::from_secs(100),
        }
    }
}

impl VnaConfig {
    /// Sets the instrument address.
    pub fn with_address(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    /// Sets the sweep frequency range.
    pub fn with_frequency_range(
        mut self,
        start: impl Into<String>,
        stop: impl Into<String>,
    ) -> Self {
        self.freq_start = start.into();
        self.freq_stop = stop.into();
        self
    }

    /// Sets the IF bandwidth.
    pub fn with_if_bandwidth(mut self, bandwidth: impl Into<String>) -> Self {
        self.if_bandwidth = bandwidth.into();
        self
    }

    /// Sets the sweep point count.
    pub fn with_points(mut self, points: usize) -> Self {
        self.points = points;
        self
    }

    /// Sets the trace parameters in display order.
    pub fn with_traces<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trace_labels = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the requested source power in dBm.
    pub fn with_power_dbm(mut self, power_dbm: f64) -> Self {
        self.power_dbm = power_dbm;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_instrument() {
        let config = VnaConfig::default();
        assert_eq!(config.port, 5025);
        assert_eq!(config.points, 3001);
        assert_eq!(config.trace_labels, vec!["S11", "S12", "S22", "S21"]);
        assert_eq!(config.power_dbm, -10.0);
    }

    #[test]
    fn test_builder_setters() {
        let config = VnaConfig::default()
            .with_address("10.0.0.5", 5026)
            .with_frequency_range("100 MHz", "8 GHz")
            .with_traces(["S11", "S21"])
            .with_points(201)
            .with_power_dbm(-5.0);
        assert_eq!(config.host, "10.0.0.5");
        assert_eq!(config.freq_stop, "8 GHz");
        assert_eq!(config.trace_labels.len(), 2);
        assert_eq!(config.points, 201);
    }
}
