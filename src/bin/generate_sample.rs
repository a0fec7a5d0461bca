use std::f64::consts::PI;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use log::info;
use serde_json::json;

/// Write a synthetic simulation (logs plus `sim.json`) for trying out the
/// diagnostics without a real run.
#[derive(Parser)]
#[command(name = "generate-sample")]
struct Cli {
    /// Output directory.
    #[arg(default_value = "sample-sim")]
    out: PathBuf,
    /// Simulation dimensionality (1, 2 or 3).
    #[arg(long, default_value_t = 2)]
    dim: u8,
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

const T_START: f64 = 0.15;
const T_END: f64 = 0.65;
const TOB: f64 = 0.25;
const DT: f64 = 1.0e-4;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        mean + std_dev * z
    }
}

// ---------------------------------------------------------------------------
// Synthetic profiles
// ---------------------------------------------------------------------------

/// Smooth step from 0 to 1 around `t0`.
fn step(t: f64, t0: f64, width: f64) -> f64 {
    0.5 * (1.0 + ((t - t0) / width).tanh())
}

/// Post-bounce decay, 0 before bounce.
fn decay(tpb: f64, tau: f64) -> f64 {
    if tpb < 0.0 {
        0.0
    } else {
        (-tpb / tau).exp()
    }
}

fn write_log(path: &Path, header: &str, rows: &[Vec<f64>]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut w = BufWriter::new(file);
    writeln!(w, "# {header}")?;
    for row in rows {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, v)| match i {
                0 | 1 => format!("{}", *v as i64),
                // Fortran-style exponents, as the simulation code writes them
                _ => format!("{v:.8E}").replace('E', "D"),
            })
            .collect();
        writeln!(w, "{}", line.join(" "))?;
    }
    w.flush()?;
    info!("wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Leading block: step counter, output index, time.
fn prefix(i: usize, t: f64) -> Vec<f64> {
    vec![(i * 10) as f64, i as f64, t]
}

fn neutrino_rows(times: &[f64], rng: &mut SimpleRng) -> Vec<Vec<f64>> {
    times
        .iter()
        .enumerate()
        .map(|(i, &t)| {
            let tpb = t - TOB;
            let burst = 3.5e53 * (-((tpb - 0.004) / 0.003).powi(2)).exp();
            let accretion = 4.0e52 * step(tpb, 0.01, 0.005) * (1.0 + 0.5 * decay(tpb, 0.2));
            let lum = [
                burst + accretion,
                0.9 * accretion,
                4.0 * 0.7 * accretion,
            ];
            // Mean energies of 11, 14 and 17 MeV
            let mev = 1.602_176_634e-6;
            let mean = [11.0 * mev, 14.0 * mev, 17.0 * mev];
            let mut row = prefix(i, t);
            row.resize(35, 0.0);
            for (l, e) in lum.iter().zip(mean) {
                row.push((l / e).max(1.0) * (1.0 + rng.gauss(0.0, 1e-3)));
            }
            for l in lum {
                row.push(l.max(1.0) * (1.0 + rng.gauss(0.0, 1e-3)));
            }
            row
        })
        .collect()
}

fn rho_rows(times: &[f64]) -> Vec<Vec<f64>> {
    times
        .iter()
        .enumerate()
        .map(|(i, &t)| {
            let tpb = t - TOB;
            let compression = step(tpb, 0.0, 0.002);
            let rho_max = 1.0e10 + 3.0e14 * compression * (1.0 + 0.3 * (1.0 - decay(tpb, 0.3)));
            let mass = 1.4 * 1.989e33 * (1.0 + 0.2 * (1.0 - decay(tpb, 0.3)));
            let ye_cent = 0.42 - 0.14 * compression;
            let mut row = prefix(i, t);
            row.extend([rho_max, mass, 1.0e3, 0.5, 0.05 + 0.1 * (1.0 - compression), ye_cent]);
            row
        })
        .collect()
}

fn energy_rows(times: &[f64]) -> Vec<Vec<f64>> {
    times
        .iter()
        .enumerate()
        .map(|(i, &t)| {
            let tpb = t - TOB;
            let c = step(tpb, 0.0, 0.002);
            let kinetic = [1.0e50 * (1.0 + c), 6.0e49 * (1.0 + c), 3.0e49 * (1.0 + c), 1.0e49];
            let mut row = prefix(i, t);
            row.extend([0.0, 2.0e52 * (1.0 + 0.5 * c), 0.0, 0.0]);
            row.extend(kinetic);
            row.extend([0.0; 4]);
            // pmin pmax Tmin Tmax smin smax scent Tcent, then one trailing field
            row.extend([
                1.0e20,
                1.0e33 * (1.0 + 30.0 * c),
                0.01,
                5.0 * (1.0 + 5.0 * c),
                0.5,
                15.0 * c + 1.0,
                1.0 + 0.3 * c,
                2.0 + 15.0 * c,
                0.0,
            ]);
            row
        })
        .collect()
}

fn velocity_rows(times: &[f64]) -> Vec<Vec<f64>> {
    times
        .iter()
        .enumerate()
        .map(|(i, &t)| {
            let tpb = t - TOB;
            let mut row = prefix(i, t);
            row.extend([
                -7.0e9 * (1.0 - step(tpb, 0.0, 0.002)) + 2.0e9 * step(tpb, 0.1, 0.03),
                1.0e9 * step(tpb, 0.05, 0.02),
                3.0e8 * step(tpb, 0.05, 0.02),
            ]);
            row
        })
        .collect()
}

fn magnetic_rows(times: &[f64]) -> Vec<Vec<f64>> {
    times
        .iter()
        .enumerate()
        .map(|(i, &t)| {
            let growth = 1.0e45 * (1.0 + 100.0 * step(t - TOB, 0.15, 0.05));
            let (r, th, ph) = (0.3 * growth, 0.2 * growth, 0.5 * growth);
            let mut row = prefix(i, t);
            row.extend([r + th + ph, r, th, ph]);
            row
        })
        .collect()
}

/// Quadrupole amplitudes `D·h` in cm: a bounce ringdown plus a rising
/// proto-neutron-star mode.
fn gw_rows(times: &[f64], dim: u8, rng: &mut SimpleRng) -> Vec<Vec<f64>> {
    times
        .iter()
        .enumerate()
        .map(|(i, &t)| {
            let tpb = t - TOB;
            let ringdown = -60.0 * decay(tpb, 0.003) * (2.0 * PI * 750.0 * tpb).cos();
            let f_pns = 300.0 + 2000.0 * tpb.max(0.0);
            let pns = 8.0 * step(tpb, 0.1, 0.02) * (2.0 * PI * f_pns * tpb).sin();
            let plus = 2.0 + ringdown + pns + rng.gauss(0.0, 0.2);
            let mut row = prefix(i, t);
            if dim == 3 {
                let cross = 0.5 * pns + rng.gauss(0.0, 0.2);
                row.extend([plus, 0.8 * plus, cross, 0.6 * cross]);
            } else {
                row.push(plus);
            }
            row
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    ensure!((1..=3).contains(&cli.dim), "dim must be 1, 2 or 3, got {}", cli.dim);

    let log_dir = cli.out.join("outp-log");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating {}", log_dir.display()))?;

    let n = ((T_END - T_START) / DT).round() as usize;
    let times: Vec<f64> = (0..n).map(|i| T_START + i as f64 * DT).collect();
    let mut rng = SimpleRng::new(cli.seed);

    let neutrinos = neutrino_rows(&times, &mut rng);
    write_log(&log_dir.join("neu.dat"), "integrated neutrino quantities", &neutrinos)?;
    write_log(&log_dir.join("rho.dat"), "rho / mass / ye extrema", &rho_rows(&times))?;
    let energies = energy_rows(&times);
    write_log(&log_dir.join("erg.dat"), "energies and thermodynamic extrema", &energies)?;
    write_log(&log_dir.join("vel.dat"), "velocity maxima", &velocity_rows(&times))?;
    write_log(&log_dir.join("mag.dat"), "magnetic energies", &magnetic_rows(&times))?;
    if cli.dim > 1 {
        let strain = gw_rows(&times, cli.dim, &mut rng);
        write_log(&log_dir.join("grw.dat"), "quadrupole amplitudes", &strain)?;
    }

    let config = json!({
        "name": format!("sample-{}D", cli.dim),
        "log_dir": "outp-log",
        "dim": cli.dim,
        "tob": TOB,
    });
    let config_path = cli.out.join("sim.json");
    std::fs::write(&config_path, serde_json::to_string_pretty(&config)?)
        .with_context(|| format!("writing {}", config_path.display()))?;

    println!("Sample simulation written to {}", cli.out.display());
    println!("  {} samples, {}D, bounce at {TOB} s", times.len(), cli.dim);
    Ok(())
}
