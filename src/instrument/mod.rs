//! Instrument communication: SCPI transport and the VNA session driver.

pub mod transport;
pub mod vna;

pub use transport::{MockTransport, ScpiTransport, TcpTransport};
pub use vna::{TraceFormat, VnaSession};
