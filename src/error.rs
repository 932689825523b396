//! Custom error types for the driver.
//!
//! This module defines the primary error type, `VnaError`, used across the
//! crate. Using the `thiserror` crate, it provides a centralized and
//! consistent way to handle the failure classes of an instrument session:
//!
//! - **`Connection`**: the instrument socket could not be opened. Unlike some
//!   reference implementations that log and continue with an unusable handle,
//!   this is a hard error; no session is constructed without a transport.
//! - **`Io`**: wraps `std::io::Error` for socket reads/writes, including the
//!   read timeout that bounds every blocking query.
//! - **`MalformedResponse`**: a token in a comma-separated numeric reply did
//!   not parse as a float. Silent corruption of trace data is unacceptable,
//!   so this always fails loudly.
//! - **`OddPairCount` / `TraceLengthMismatch` / `PointCountMismatch`**: the
//!   raw data layout (interleaved re/im pairs, one pair per frequency point)
//!   did not line up. These signal protocol desynchronization and abort the
//!   acquisition.
//!
//! The directory-already-exists case during export is deliberately *not* an
//! error: the export step warns and skips all writes (see `data::export`).

use thiserror::Error;

/// Convenience alias for results using the driver error type.
pub type Result<T> = std::result::Result<T, VnaError>;

/// Errors produced by the VNA driver.
#[derive(Error, Debug)]
pub enum VnaError {
    /// Failed to open the instrument socket.
    #[error("Connection error: {0}")]
    Connection(String),

    /// I/O failure on the instrument socket, including read timeouts.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The instrument closed the connection mid-exchange.
    #[error("Connection closed by instrument")]
    ConnectionClosed,

    /// Instrument-side failure or an unexpected exchange.
    #[error("Instrument error: {0}")]
    Instrument(String),

    /// A token in a comma-separated numeric response failed to parse.
    #[error("Malformed numeric response: {token:?} is not a number")]
    MalformedResponse {
        /// The offending token.
        token: String,
    },

    /// Raw trace data had an odd value count and cannot form (re, im) pairs.
    #[error("Raw trace data has {count} values, expected interleaved re/im pairs")]
    OddPairCount {
        /// Number of values in the response.
        count: usize,
    },

    /// A parsed trace does not match the frequency axis length.
    #[error("Trace {label} has {actual} points, frequency axis has {expected}")]
    TraceLengthMismatch {
        /// Trace label, e.g. "S11".
        label: String,
        /// Frequency axis length.
        expected: usize,
        /// Parsed trace length.
        actual: usize,
    },

    /// The frequency axis does not match the configured sweep point count.
    #[error("Frequency axis has {actual} points, sweep configured for {expected}")]
    PointCountMismatch {
        /// Configured point count.
        expected: usize,
        /// Points returned by the instrument.
        actual: usize,
    },

    /// Failure writing a CSV table.
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    /// Figure rendering failed.
    #[error("Plot rendering error: {0}")]
    Plot(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VnaError::Instrument("sweep aborted".to_string());
        assert_eq!(err.to_string(), "Instrument error: sweep aborted");
    }

    #[test]
    fn test_length_mismatch_display() {
        let err = VnaError::TraceLengthMismatch {
            label: "S21".into(),
            expected: 3001,
            actual: 3000,
        };
        assert!(err.to_string().contains("S21"));
        assert!(err.to_string().contains("3001"));
    }
}
