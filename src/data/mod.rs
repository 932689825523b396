//! Data export: capture tables and figures on disk.

pub mod export;

pub use export::save_capture;
