//! Control driver for Copper Mountain vector network analyzers.
//!
//! The instrument must have its Network Remote Control socket server enabled
//! (default port 5025). Commands are plain SCPI text terminated by a newline;
//! sweeps are assumed to run in continuous mode until a session takes over
//! triggering.
//!
//! A capture is a linear sequence: connect, configure the sweep, trigger a
//! single sweep, parse the returned comma-separated data into complex traces,
//! and write the results (tables plus figures) to an output directory.

pub mod config;
pub mod data;
pub mod error;
pub mod instrument;
pub mod measurement;

pub use config::VnaConfig;
pub use error::{Result, VnaError};
pub use instrument::{ScpiTransport, TcpTransport, TraceFormat, VnaSession};
pub use measurement::{SettingsSnapshot, Sweep, Trace};
