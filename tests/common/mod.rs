#![allow(dead_code)]

use std::path::Path;

use sn_diagnostics::SimulationConfig;
use tempfile::TempDir;

pub const TOB: f64 = 0.05;
pub const DT: f64 = 1e-4;
pub const SAMPLES: usize = 1000;
pub const GW_OFFSET: f64 = 5.0;
pub const GW_AMPLITUDE: f64 = 20.0;
pub const GW_FREQUENCY: f64 = 800.0;

pub fn times() -> Vec<f64> {
    (0..SAMPLES).map(|i| i as f64 * DT).collect()
}

/// Write rows as a log with a comment header and two leading counters.
pub fn write_log(dir: &Path, name: &str, rows: impl IntoIterator<Item = Vec<f64>>) {
    let mut text = String::from("# synthetic log\n");
    for (i, row) in rows.into_iter().enumerate() {
        text.push_str(&format!("{} {}", i * 10, i));
        for v in row {
            text.push_str(&format!(" {v:E}"));
        }
        text.push('\n');
    }
    std::fs::write(dir.join(name), text).unwrap();
}

/// Strain log sampled every `dt`: a constant offset plus an oscillation after
/// bounce. 3D runs get the four components as 1, 2, 3 and 4 times that signal.
pub fn write_strain(dir: &Path, dim: u8, dt: f64, samples: usize) {
    write_log(
        dir,
        "grw.dat",
        (0..samples).map(|i| {
            let t = i as f64 * dt;
            let h = GW_OFFSET + wave(t);
            if dim == 3 {
                vec![t, h, 2.0 * h, 3.0 * h, 4.0 * h]
            } else {
                vec![t, h]
            }
        }),
    );
}

/// Post-bounce part of the strain fixture, in cm.
pub fn wave(t: f64) -> f64 {
    if t > TOB {
        GW_AMPLITUDE * (2.0 * std::f64::consts::PI * GW_FREQUENCY * (t - TOB)).sin()
    } else {
        0.0
    }
}

/// A simulation directory with every log, `dim`-dependent strain columns and
/// simple analytic contents.
pub struct Fixture {
    pub dir: TempDir,
    pub sim: SimulationConfig,
}

pub fn fixture(dim: u8) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path();
    let t = times();

    // Luminosity columns 38..=40 and number luminosity 35..=37.
    write_log(
        path,
        "neu.dat",
        t.iter().map(|&t| {
            let mut row = vec![t];
            row.resize(33, 0.0);
            row.extend([2.0e57, 3.0e57, 8.0e57, 2.0e52, 3.0e52, 8.0e52 + 1.0e55 * t]);
            row
        }),
    );
    write_log(
        path,
        "rho.dat",
        t.iter()
            .map(|&t| vec![t, 1.0e14 * (1.0 + t), 2.0 * 1.989e33, 1.0e3, 0.5, 0.1, 0.3]),
    );
    write_log(
        path,
        "erg.dat",
        t.iter().map(|&t| {
            let mut row = vec![t, 0.0, 5.0e52, 0.0, 0.0, 6.0e50, 1.0e50, 2.0e50, 3.0e50];
            row.extend([1.0e20, 1.0e33, 0.05, 30.0, 0.5, 12.0, 1.2, 15.0, 0.0]);
            row
        }),
    );
    write_log(path, "vel.dat", t.iter().map(|&t| vec![t, 1.0e9, 2.0e8, 3.0e7]));
    write_log(
        path,
        "mag.dat",
        t.iter().map(|&t| vec![t, 6.0e45, 1.0e45, 2.0e45, 3.0e45]),
    );
    write_strain(path, dim, DT, SAMPLES);

    let sim = SimulationConfig::new(path, dim, TOB).unwrap().with_name("fixture");
    Fixture { dir, sim }
}
