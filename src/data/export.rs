//! Capture export.
//!
//! A capture directory holds six files: `data.txt` (the measurement table,
//! frequency plus one complex column per trace), `VNAsettings.txt` (the
//! settings snapshot as label/value rows), and four figures rendered over all
//! traces — `logplot.png` (20·log10|Z|), `linplot.png` (|Z|),
//! `phaseplot.png` (unwrapped phase), `phaseplot2.png` (wrapped phase).
//!
//! Collision policy: if the target directory already exists the entire export
//! is skipped with a warning and no error. Prior results are never
//! overwritten or merged.

use crate::error::{Result, VnaError};
use crate::measurement::{SettingsSnapshot, Sweep};
use log::{info, warn};
use num_complex::Complex64;
use plotters::prelude::*;
use std::fs;
use std::path::Path;

const PLOT_SIZE: (u32, u32) = (1280, 960);

/// Saves a sweep and its settings snapshot under `dir`.
///
/// If `dir` already exists, nothing is written and `Ok` is returned.
pub fn save_capture(dir: &Path, sweep: &Sweep, settings: &SettingsSnapshot) -> Result<()> {
    if dir.exists() {
        warn!(
            "Directory {} already exists; this capture will not be saved",
            dir.display()
        );
        return Ok(());
    }
    fs::create_dir_all(dir)?;

    write_data_table(&dir.join("data.txt"), sweep)?;
    write_settings_table(&dir.join("VNAsettings.txt"), settings)?;

    let magnitude_series: Vec<(String, Vec<f64>)> = sweep
        .traces
        .iter()
        .map(|t| (format!("{}|Z|", t.label), t.magnitude()))
        .collect();
    let db_series: Vec<(String, Vec<f64>)> = sweep
        .traces
        .iter()
        .map(|t| (format!("{}|Z|", t.label), t.magnitude_db()))
        .collect();
    let unwrapped_series: Vec<(String, Vec<f64>)> = sweep
        .traces
        .iter()
        .map(|t| (format!("{}phi", t.label), t.phase_unwrapped()))
        .collect();
    let wrapped_series: Vec<(String, Vec<f64>)> = sweep
        .traces
        .iter()
        .map(|t| (format!("{}phi", t.label), t.phase()))
        .collect();

    render_plot(&dir.join("logplot.png"), "dB", &sweep.freq_mhz, &db_series)?;
    render_plot(
        &dir.join("linplot.png"),
        "Mag",
        &sweep.freq_mhz,
        &magnitude_series,
    )?;
    render_plot(
        &dir.join("phaseplot.png"),
        "Unwrapped Phase",
        &sweep.freq_mhz,
        &unwrapped_series,
    )?;
    render_plot(
        &dir.join("phaseplot2.png"),
        "Phase",
        &sweep.freq_mhz,
        &wrapped_series,
    )?;

    info!("Capture saved to {}", dir.display());
    Ok(())
}

/// Formats one complex value for the data table, e.g. `0.5+0.25j`.
fn complex_cell(z: Complex64) -> String {
    format!("{}{:+}j", z.re, z.im)
}

fn write_data_table(path: &Path, sweep: &Sweep) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec!["Freq (MHz)".to_string()];
    header.extend(sweep.traces.iter().map(|t| t.label.clone()));
    writer.write_record(&header)?;

    for (i, freq) in sweep.freq_mhz.iter().enumerate() {
        let mut row = vec![freq.to_string()];
        for trace in &sweep.traces {
            row.push(complex_cell(trace.values[i]));
        }
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

fn write_settings_table(path: &Path, settings: &SettingsSnapshot) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for (label, value) in settings.rows() {
        writer.write_record([label, value])?;
    }
    writer.flush()?;
    Ok(())
}

/// Finite min/max of a value stream, padded when degenerate so the chart
/// always has a drawable range.
fn axis_bounds<I: Iterator<Item = f64>>(values: I) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values {
        if v.is_finite() {
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if (hi - lo).abs() < f64::EPSILON {
        (lo - 1.0, hi + 1.0)
    } else {
        (lo, hi)
    }
}

fn render_plot(
    path: &Path,
    y_desc: &str,
    x: &[f64],
    series: &[(String, Vec<f64>)],
) -> Result<()> {
    let root = BitMapBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| VnaError::Plot(e.to_string()))?;

    let (x_min, x_max) = axis_bounds(x.iter().copied());
    let (y_min, y_max) = axis_bounds(series.iter().flat_map(|(_, ys)| ys.iter().copied()));

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| VnaError::Plot(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc("Freq (MHz)")
        .y_desc(y_desc)
        .draw()
        .map_err(|e| VnaError::Plot(e.to_string()))?;

    for (idx, (label, ys)) in series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        chart
            .draw_series(LineSeries::new(
                x.iter().copied().zip(ys.iter().copied()),
                color.stroke_width(1),
            ))
            .map_err(|e| VnaError::Plot(e.to_string()))?
            .label(label.clone())
            .legend(move |(lx, ly)| {
                PathElement::new(vec![(lx, ly), (lx + 20, ly)], color.stroke_width(1))
            });
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(|e| VnaError::Plot(e.to_string()))?;

    root.present().map_err(|e| VnaError::Plot(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complex_cell_format() {
        assert_eq!(complex_cell(Complex64::new(0.5, 0.25)), "0.5+0.25j");
        assert_eq!(complex_cell(Complex64::new(-1.0, -2.5)), "-1-2.5j");
    }

    #[test]
    fn test_axis_bounds_pads_degenerate_range() {
        let (lo, hi) = axis_bounds([5.0, 5.0].into_iter());
        assert_eq!((lo, hi), (4.0, 6.0));
    }

    #[test]
    fn test_axis_bounds_ignores_non_finite() {
        let (lo, hi) = axis_bounds([f64::NEG_INFINITY, 1.0, 3.0].into_iter());
        assert_eq!((lo, hi), (1.0, 3.0));
    }
}
