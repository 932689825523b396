//! Measurement data: parsed sweeps and the settings snapshot saved with them.

pub mod snapshot;
pub mod sweep;

pub use snapshot::SettingsSnapshot;
pub use sweep::{parse_complex_pairs, parse_float_list, unwrap_phase, Sweep, Trace};
