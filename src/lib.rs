//! Loader for wearable-sensor swim training spreadsheets.
//!
//! A recording is a single worksheet: an 11-row legend block followed by one
//! row per sample with a quoted clock time, twelve wrist/back gyroscope and
//! accelerometer channels, a swim class code and a stroke phase code.
//! [`data::load_series`] validates the legend, parses the samples and returns
//! a [`data::TimeSeries`] with per-channel normalized readings.

pub mod config;
pub mod data;

pub use config::LoaderConfig;
