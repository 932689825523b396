//! VNA session driver.
//!
//! A [`VnaSession`] owns one SCPI transport and the configuration of one
//! instrument. Construction runs the full initialization sequence (frequency
//! range, IF bandwidth, power, point count, trace definitions) so a session
//! in hand is a configured instrument. All commands are case sensitive and
//! reproduced verbatim from the instrument's command set.
//!
//! Acquisition forces the traces into polar format first: raw data is always
//! fetched from the polar buffer as interleaved (re, im) pairs, regardless of
//! what the caller wants displayed on the front panel afterwards.

use crate::config::VnaConfig;
use crate::data::export;
use crate::error::{Result, VnaError};
use crate::instrument::transport::{ScpiTransport, TcpTransport};
use crate::measurement::{parse_complex_pairs, parse_float_list, SettingsSnapshot, Sweep, Trace};
use log::{info, warn};
use std::fmt;
use std::path::Path;

/// Display formats the instrument recognizes for a trace.
///
/// The format affects only how the instrument renders the trace on its own
/// screen; raw data export always goes through [`TraceFormat::Polar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceFormat {
    /// Logarithmic magnitude (MLOG).
    LogMag,
    /// Phase (PHAS).
    Phase,
    /// Group delay (GDEL).
    GroupDelay,
    /// Smith chart, linear (SLIN).
    SmithLin,
    /// Smith chart, logarithmic (SLOG).
    SmithLog,
    /// Smith chart, real/imaginary (SCOM).
    SmithComplex,
    /// Smith chart, R + jX (SMIT).
    Smith,
    /// Smith chart, G + jB (SADM).
    SmithAdmittance,
    /// Polar, linear (PLIN).
    PolarLin,
    /// Polar, logarithmic (PLOG).
    PolarLog,
    /// Polar, real/imaginary (POL). The raw-data retrieval format.
    Polar,
    /// Linear magnitude (MLIN).
    LinMag,
    /// Standing wave ratio (SWR).
    Swr,
    /// Real part (REAL).
    Real,
    /// Imaginary part (IMAG).
    Imag,
    /// Unwrapped phase (UPH).
    PhaseUnwrapped,
}

impl TraceFormat {
    /// The SCPI mnemonic for this format.
    pub fn mnemonic(self) -> &'static str {
        match self {
            TraceFormat::LogMag => "MLOG",
            TraceFormat::Phase => "PHAS",
            TraceFormat::GroupDelay => "GDEL",
            TraceFormat::SmithLin => "SLIN",
            TraceFormat::SmithLog => "SLOG",
            TraceFormat::SmithComplex => "SCOM",
            TraceFormat::Smith => "SMIT",
            TraceFormat::SmithAdmittance => "SADM",
            TraceFormat::PolarLin => "PLIN",
            TraceFormat::PolarLog => "PLOG",
            TraceFormat::Polar => "POL",
            TraceFormat::LinMag => "MLIN",
            TraceFormat::Swr => "SWR",
            TraceFormat::Real => "REAL",
            TraceFormat::Imag => "IMAG",
            TraceFormat::PhaseUnwrapped => "UPH",
        }
    }
}

impl fmt::Display for TraceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// A configured session with one VNA.
pub struct VnaSession<T: ScpiTransport> {
    transport: T,
    config: VnaConfig,
}

impl VnaSession<TcpTransport> {
    /// Opens a TCP transport to the address in `config` and initializes the
    /// instrument with it.
    pub fn connect(config: VnaConfig) -> Result<Self> {
        let transport = TcpTransport::connect(&config.host, config.port, config.timeout)?;
        Self::new(transport, config)
    }
}

impl<T: ScpiTransport> VnaSession<T> {
    /// Initializes the instrument over an already-open transport: frequency
    /// range, IF bandwidth, source power (with read-back), sweep points, and
    /// trace definitions in log-magnitude display format.
    pub fn new(transport: T, config: VnaConfig) -> Result<Self> {
        let mut session = Self { transport, config };

        let (start, stop) = (
            session.config.freq_start.clone(),
            session.config.freq_stop.clone(),
        );
        session.set_frequency_range(&start, &stop)?;

        let bandwidth = session.config.if_bandwidth.clone();
        session.set_if_bandwidth(&bandwidth)?;

        let requested = session.config.power_dbm;
        session.set_power(requested)?;

        let points = session.config.points;
        session.set_sweep_points(points)?;

        session.configure_traces(TraceFormat::LogMag)?;
        Ok(session)
    }

    /// The session configuration, including the confirmed power level.
    pub fn config(&self) -> &VnaConfig {
        &self.config
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sets the sweep frequency range. Values are passed through to the
    /// instrument uninterpreted, e.g. `"3 GHz"`.
    pub fn set_frequency_range(&mut self, start: &str, stop: &str) -> Result<()> {
        info!("Frequency range: {start} to {stop}");
        self.transport
            .send(&format!("SENS1:FREQ:STAR {start};STOP {stop}"))?;
        self.config.freq_start = start.to_string();
        self.config.freq_stop = stop.to_string();
        Ok(())
    }

    /// Sets the IF bandwidth, e.g. `"1 kHz"`.
    pub fn set_if_bandwidth(&mut self, bandwidth: &str) -> Result<()> {
        info!("IF bandwidth: {bandwidth}");
        self.transport.send(&format!("SENS1:BWID {bandwidth}"))?;
        self.config.if_bandwidth = bandwidth.to_string();
        Ok(())
    }

    /// Sets the number of sweep points.
    pub fn set_sweep_points(&mut self, points: usize) -> Result<()> {
        info!("Sweep points: {points}");
        self.transport.send(&format!("SENS1:SWE:POIN {points}"))?;
        self.config.points = points;
        Ok(())
    }

    /// Sets the source power and reads back the level the instrument actually
    /// applied. The instrument quantizes power to discrete steps, so the
    /// confirmed value is stored and returned; downstream consumers must use
    /// it, not the requested one.
    pub fn set_power(&mut self, requested_dbm: f64) -> Result<f64> {
        self.transport
            .send(&format!("SOUR:POW:LEV:IMM {requested_dbm}"))?;
        let response = self.transport.query("SOUR:POW:LEV:IMM?")?;
        let confirmed: f64 = response
            .trim()
            .parse()
            .map_err(|_| VnaError::MalformedResponse {
                token: response.clone(),
            })?;

        if (confirmed - requested_dbm).abs() > 1e-9 {
            warn!("Requested {requested_dbm} dBm, instrument applied {confirmed} dBm");
        } else {
            info!("Source power: {confirmed} dBm");
        }
        self.config.power_dbm = confirmed;
        Ok(confirmed)
    }

    /// Selects continuous or single-shot trigger initiation, and routes the
    /// trigger source to the bus. With continuous initiation off, a sweep
    /// runs only in response to an explicit trigger command.
    pub fn set_trigger_continuous(&mut self, continuous: bool) -> Result<()> {
        let setting = if continuous { "ON" } else { "OFF" };
        self.transport.send(&format!("INIT:CONT {setting}"))?;
        self.transport.send("TRIG:SOUR BUS")?;
        Ok(())
    }

    /// Defines the configured traces on the instrument, selects each in turn,
    /// and applies a uniform display format to all of them.
    ///
    /// Returns the ordered label list. This ordering is authoritative: raw
    /// data queries during acquisition are issued in exactly this order.
    pub fn configure_traces(&mut self, format: TraceFormat) -> Result<Vec<String>> {
        let count = self.config.trace_labels.len();
        self.transport.send(&format!("CALC1:PAR:COUN {count}"))?;

        for (i, label) in self.config.trace_labels.iter().enumerate() {
            let par = i + 1;
            self.transport.send(&format!("CALC1:PAR{par}:DEF {label}"))?;
            self.transport.send(&format!("CALC1:PAR{par}:SEL"))?;
            self.transport.send(&format!("CALC1:FORM {format}"))?;
        }

        info!("Trace ordering: {}", self.config.trace_labels.join(" "));
        Ok(self.config.trace_labels.clone())
    }

    /// Triggers a single sweep and parses the result into a [`Sweep`].
    ///
    /// Traces are forced into polar format first so the raw buffers contain
    /// interleaved (re, im) pairs. The `*OPC?` query is a synchronous barrier:
    /// this call blocks until the instrument reports sweep completion, bounded
    /// only by the transport read timeout. The frequency axis is converted
    /// from Hz to MHz.
    pub fn acquire(&mut self) -> Result<Sweep> {
        let labels = self.configure_traces(TraceFormat::Polar)?;

        self.transport.send("TRIG:SEQ:SING")?;
        self.transport.query("*OPC?")?;

        let raw = self.transport.query("SENS1:FREQ:DATA?")?;
        let freq_mhz: Vec<f64> = parse_float_list(&raw)?
            .into_iter()
            .map(|hz| hz * 1e-6)
            .collect();

        if freq_mhz.len() != self.config.points {
            return Err(VnaError::PointCountMismatch {
                expected: self.config.points,
                actual: freq_mhz.len(),
            });
        }

        let mut traces = Vec::with_capacity(labels.len());
        for (i, label) in labels.iter().enumerate() {
            let trac = i + 1;
            let raw = self.transport.query(&format!("CALC1:TRAC{trac}:DATA:FDAT?"))?;
            traces.push(Trace {
                label: label.clone(),
                values: parse_complex_pairs(&raw)?,
            });
        }

        Sweep::assemble(freq_mhz, traces)
    }

    /// Snapshot of the current configuration, for saving alongside a sweep.
    pub fn snapshot(&self) -> SettingsSnapshot {
        SettingsSnapshot::from_config(&self.config)
    }

    /// Acquires one sweep, saves it under `dir`, and resets the front panel
    /// display back to log magnitude.
    pub fn capture(&mut self, dir: &Path) -> Result<Sweep> {
        let sweep = self.acquire()?;
        export::save_capture(dir, &sweep, &self.snapshot())?;
        self.configure_traces(TraceFormat::LogMag)?;
        Ok(sweep)
    }
}
