use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use serde::Serialize;

use sn_diagnostics::analysis::spectral::SpectrogramScale;
use sn_diagnostics::analysis::window::WindowKind;
use sn_diagnostics::data::export::{self, Table};
use sn_diagnostics::quantities::gw::{
    self, PeakOptions, SpectrogramOptions, SpectrumOptions, StrainOptions,
};
use sn_diagnostics::quantities::selectors::{Detector, GwComponent, PeakKind};
use sn_diagnostics::quantities::{self, Quantity};
use sn_diagnostics::{SeriesOptions, SimulationConfig, SmoothOptions};

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(
    name = "sn-diagnostics",
    version,
    about = "Inspect and export supernova simulation diagnostics"
)]
struct Cli {
    /// Simulation description (JSON).
    #[arg(short, long, default_value = "sim.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the available time-series quantities.
    List,
    /// Evaluate a time-series quantity.
    Series {
        #[arg(value_enum)]
        quantity: Quantity,
        /// Component selector (nue, max, h+eq, ...); the valid set depends on the quantity.
        #[arg(long)]
        comp: Option<String>,
        #[command(flatten)]
        series: SeriesArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Gravitational-wave energy spectrum dE/df.
    EnergySpectrum {
        #[arg(long, value_enum, default_value_t = GwComponent::All)]
        comp: GwComponent,
        #[command(flatten)]
        spectrum: SpectrumArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Characteristic strain at an observer distance.
    Hchar {
        #[arg(long, value_enum, default_value_t = GwComponent::All)]
        comp: GwComponent,
        /// Observer distance in kpc.
        #[arg(long, default_value_t = 10.0)]
        distance_kpc: f64,
        /// Divide by the square root of the frequency, as a detector ASD.
        #[arg(long)]
        per_root_hz: bool,
        #[command(flatten)]
        spectrum: SpectrumArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Design sensitivity of a detector.
    Asd {
        #[arg(value_enum)]
        detector: Detector,
        /// Directory with `<detector>.txt` curves, `<log_dir>/asd` by default.
        #[arg(long)]
        asd_dir: Option<PathBuf>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Short-time Fourier transform of the strain.
    Spectrogram {
        #[arg(long, value_enum, default_value_t = GwComponent::All)]
        comp: GwComponent,
        /// Window length in ms.
        #[arg(long, default_value_t = 10.0)]
        window_ms: f64,
        #[arg(long, value_enum, default_value_t = WindowKind::Hanning)]
        windowing: WindowKind,
        #[arg(long, value_enum, default_value_t = SpectrogramScale::Magnitude)]
        scale: SpectrogramScale,
        /// Observer distance in kpc.
        #[arg(long)]
        distance_kpc: Option<f64>,
        /// JSON output file.
        #[arg(long)]
        out: PathBuf,
    },
    /// Peak-to-peak strain amplitude around a peak.
    DeltaH {
        #[command(flatten)]
        peak: PeakArgs,
    },
    /// Dominant strain frequencies around a peak.
    PeakFrequencies {
        #[command(flatten)]
        peak: PeakArgs,
        /// Also write the Fourier amplitude to this file.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Args)]
struct SeriesArgs {
    /// Keep simulation time instead of time since bounce.
    #[arg(long)]
    no_tob: bool,
    /// Time derivative of the quantity.
    #[arg(long)]
    derive: bool,
    /// Smoothing window in samples.
    #[arg(long)]
    smooth: Option<usize>,
    #[arg(long, value_enum, default_value_t = WindowKind::Hanning)]
    smooth_window: WindowKind,
}

impl SeriesArgs {
    fn options(&self) -> SeriesOptions {
        SeriesOptions {
            tob_corrected: !self.no_tob,
            derive: self.derive,
            smooth: smoothing(self.smooth, self.smooth_window),
        }
    }
}

#[derive(Args)]
struct SpectrumArgs {
    /// Restrict the strain to this interval, s after bounce (or simulation
    /// time with --no-tob).
    #[arg(long, num_args = 2, value_names = ["START", "END"], allow_negative_numbers = true)]
    time_range: Option<Vec<f64>>,
    #[arg(long, value_enum, default_value_t = WindowKind::Hanning)]
    windowing: WindowKind,
    /// Transform without a taper.
    #[arg(long, conflicts_with = "windowing")]
    rectangular: bool,
    /// Keep the strain offset.
    #[arg(long)]
    no_zero_correction: bool,
    /// Thin heavily refined time steps first.
    #[arg(long)]
    lower_refinement: bool,
    #[arg(long)]
    no_tob: bool,
    /// Smoothing window in frequency bins.
    #[arg(long)]
    smooth: Option<usize>,
    #[arg(long, value_enum, default_value_t = WindowKind::Hanning)]
    smooth_window: WindowKind,
}

impl SpectrumArgs {
    fn options(&self) -> SpectrumOptions {
        SpectrumOptions {
            time_range: match self.time_range.as_deref() {
                Some(&[start, end]) => Some((start, end)),
                _ => None,
            },
            windowing: (!self.rectangular).then_some(self.windowing),
            zero_correction: !self.no_zero_correction,
            lower_refinement: self.lower_refinement,
            tob_corrected: !self.no_tob,
            smooth: smoothing(self.smooth, self.smooth_window),
        }
    }
}

fn smoothing(window: Option<usize>, kind: WindowKind) -> Option<SmoothOptions> {
    window.map(|window| SmoothOptions { window, kind })
}

#[derive(Args)]
struct OutputArgs {
    /// Output file (.csv, .json or .parquet); prints a table otherwise.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Rows to print when no output file is given.
    #[arg(long, default_value_t = 20)]
    head: usize,
}

#[derive(Args)]
struct PeakArgs {
    #[arg(long, value_enum, default_value_t = PeakKind::Bounce)]
    peak: PeakKind,
    /// Search start, s after bounce.
    #[arg(long)]
    from: Option<f64>,
    /// Search end, s after bounce.
    #[arg(long)]
    to: Option<f64>,
    /// Minimum search window, ms.
    #[arg(long, default_value_t = 1.75)]
    min_time: f64,
    /// Maximum search window, ms.
    #[arg(long, default_value_t = 2.0)]
    max_time: f64,
    #[arg(long)]
    distance_kpc: Option<f64>,
}

impl PeakArgs {
    fn options(&self) -> PeakOptions {
        PeakOptions {
            peak: self.peak,
            interval: (self.from, self.to),
            min_time: self.min_time,
            max_time: self.max_time,
            distance: self.distance_kpc.map(kpc_to_cm),
            tob_corrected: true,
        }
    }
}

fn kpc_to_cm(kpc: f64) -> f64 {
    kpc * sn_diagnostics::units::KILOPARSEC
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn emit(table: &Table, output: &OutputArgs) -> Result<()> {
    match &output.out {
        Some(path) => export::write_table(table, path)
            .with_context(|| format!("writing {}", path.display()))?,
        None => println!("{}", table.pretty(Some(output.head))?),
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<SimulationConfig> {
    SimulationConfig::from_json_file(path)
        .with_context(|| format!("loading simulation config {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::List => {
            for q in Quantity::ALL {
                match q.default_component() {
                    Some(comp) => println!("{:<28} (default comp: {comp})", q.as_str()),
                    None => println!("{}", q.as_str()),
                }
            }
        }
        Command::Series {
            quantity,
            comp,
            series,
            output,
        } => {
            let sim = load_config(&cli.config)?;
            info!("evaluating {} for '{}'", quantity.as_str(), sim.name);
            let result = quantities::evaluate(&sim, quantity, comp.as_deref(), &series.options())
                .with_context(|| format!("evaluating {}", quantity.as_str()))?;
            emit(&Table::from_series(&result)?, &output)?;
        }
        Command::EnergySpectrum {
            comp,
            spectrum,
            output,
        } => {
            let sim = load_config(&cli.config)?;
            let spectra = gw::gw_energy_spectrum(&sim, comp, &spectrum.options())?;
            emit(&Table::from_spectra(&spectra)?, &output)?;
        }
        Command::Hchar {
            comp,
            distance_kpc,
            per_root_hz,
            spectrum,
            output,
        } => {
            let sim = load_config(&cli.config)?;
            let distance = kpc_to_cm(distance_kpc);
            let opts = spectrum.options();
            let spectra = gw::characteristic_strain(&sim, comp, distance, per_root_hz, &opts)?;
            emit(&Table::from_spectra(&spectra)?, &output)?;
        }
        Command::Asd {
            detector,
            asd_dir,
            output,
        } => {
            let mut sim = load_config(&cli.config)?;
            if let Some(dir) = asd_dir {
                sim = sim.with_asd_dir(dir);
            }
            let curve = gw::asd(&sim, detector)
                .with_context(|| format!("loading the {detector} sensitivity"))?;
            emit(&Table::from_spectra(std::slice::from_ref(&curve))?, &output)?;
        }
        Command::Spectrogram {
            comp,
            window_ms,
            windowing,
            scale,
            distance_kpc,
            out,
        } => {
            let sim = load_config(&cli.config)?;
            let opts = SpectrogramOptions {
                strain: StrainOptions {
                    distance: distance_kpc.map(kpc_to_cm),
                    ..StrainOptions::default()
                },
                window_size: window_ms * 1e-3,
                windowing,
                scale,
                ..SpectrogramOptions::default()
            };
            let maps = gw::gw_spectrogram(&sim, comp, &opts)?;
            export::write_json(&maps, &out)
                .with_context(|| format!("writing {}", out.display()))?;
            info!("wrote {} spectrogram(s) to {}", maps.len(), out.display());
        }
        Command::DeltaH { peak } => {
            let sim = load_config(&cli.config)?;
            print_json(&gw::delta_h(&sim, &peak.options())?)?;
        }
        Command::PeakFrequencies { peak, out } => {
            let sim = load_config(&cli.config)?;
            let result = gw::gw_peak_frequencies(&sim, &peak.options())?;
            println!("frequencies [Hz]: {:?}", result.frequencies);
            println!("intensities: {:?}", result.intensities);
            if let Some(path) = out {
                let table = Table::from_spectra(std::slice::from_ref(&result.fourier))?;
                export::write_table(&table, &path)
                    .with_context(|| format!("writing {}", path.display()))?;
            }
        }
    }
    Ok(())
}
