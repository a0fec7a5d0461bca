//! Gravitational-wave diagnostics built on the strain log: strain, emitted
//! power, energy spectrum, characteristic strain, spectrogram and peak
//! measurements.

use log::{debug, warn};
use num_complex::Complex;
use serde::Serialize;

use crate::analysis::calculus::gradient;
use crate::analysis::peaks::{argmax, argmin, local_extrema, time_range, two_largest_maxima};
use crate::analysis::spectral::{
    fourier_transform, resample_uniform, rfft, rfft_frequencies, stft, SpectrogramScale,
    UniformSignal,
};
use crate::analysis::window::WindowKind;
use crate::config::SimulationConfig;
use crate::data::loader::load_log;
use crate::data::model::{frequency_axis, time_axis, FrequencySeries, TaggedArray, TaggedSeries};
use crate::data::pipeline::{self, Decorations, SeriesOptions, SmoothOptions};
use crate::data::schema::{self, Column, GRAVITATIONAL_WAVES};
use crate::error::{Error, Result};
use crate::quantities::selectors::{Detector, GwComponent, PeakKind};
use crate::units::{Unit, GRAVITATIONAL_CONSTANT, KILOPARSEC, SPEED_OF_LIGHT};

/// Samples earlier than this before bounce define the zero level.
const ZERO_LEVEL_LEAD: f64 = 0.01;
/// `lower_refinement` thins the strain to at least this spacing.
const COARSE_DT: f64 = 5e-5;
/// Minimum transform length for peak frequencies.
const PEAK_FFT_LEN: usize = 4096;

// ---------------------------------------------------------------------------
// Strain
// ---------------------------------------------------------------------------

/// How the strain is read from the log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrainOptions {
    /// Observer distance in cm. `None` keeps the amplitude `D·h` in cm.
    pub distance: Option<f64>,
    /// Shift the signal so that its early pre-bounce level is zero.
    pub zero_correction: bool,
    /// Thin heavily refined time steps.
    pub lower_refinement: bool,
}

impl Default for StrainOptions {
    fn default() -> Self {
        StrainOptions {
            distance: None,
            zero_correction: true,
            lower_refinement: false,
        }
    }
}

struct Polarisation {
    column: Column,
    name: &'static str,
    label: &'static str,
}

const AXISYMMETRIC: [Polarisation; 1] = [Polarisation {
    column: GRAVITATIONAL_WAVES.plus_2d,
    name: "h+",
    label: r"$h_+$",
}];

const THREE_D: [Polarisation; 4] = [
    Polarisation {
        column: GRAVITATIONAL_WAVES.plus_equator,
        name: "h+eq",
        label: r"$h_{+,\mathrm{eq}}$",
    },
    Polarisation {
        column: GRAVITATIONAL_WAVES.plus_pole,
        name: "h+pol",
        label: r"$h_{+,\mathrm{pol}}$",
    },
    Polarisation {
        column: GRAVITATIONAL_WAVES.cross_equator,
        name: "hxeq",
        label: r"$h_{\times,\mathrm{eq}}$",
    },
    Polarisation {
        column: GRAVITATIONAL_WAVES.cross_pole,
        name: "hxpol",
        label: r"$h_{\times,\mathrm{pol}}$",
    },
];

fn polarisations(sim: &SimulationConfig) -> Result<&'static [Polarisation]> {
    match sim.dim() {
        2 => Ok(&AXISYMMETRIC),
        3 => Ok(&THREE_D),
        dim => Err(Error::NoGravitationalWaves { dim }),
    }
}

/// Keep one sample every `n`, where `n` steps of the initial spacing reach
/// [`COARSE_DT`].
fn refinement_stride(time: &[f64]) -> usize {
    let dt = match time {
        [a, b, ..] if b > a => b - a,
        _ => return 1,
    };
    let mut n = 1;
    let mut coarse = dt;
    while coarse < COARSE_DT {
        coarse += dt;
        n += 1;
    }
    n
}

/// Strain components in simulation time, before any pipeline stage.
fn load_strain(sim: &SimulationConfig, opts: &StrainOptions) -> Result<Vec<TaggedSeries>> {
    let pols = polarisations(sim)?;
    let table = load_log(&sim.gw_path())?;
    let time = table.column(schema::TIME)?;

    let zero_index = time.iter().position(|t| t - sim.tob() >= -ZERO_LEVEL_LEAD);
    let stride = if opts.lower_refinement {
        refinement_stride(&time)
    } else {
        1
    };
    debug!("strain: {} samples, stride {stride}", time.len());
    let thinned_time: Vec<f64> = time.iter().copied().step_by(stride).collect();

    pols.iter()
        .map(|p| {
            let mut values = table.column(p.column)?;
            if opts.zero_correction {
                if let Some(idx) = zero_index.filter(|&i| i > 0) {
                    let level = values[..idx].iter().sum::<f64>() / idx as f64;
                    values.iter_mut().for_each(|v| *v -= level);
                }
            }
            let values: Vec<f64> = values.into_iter().step_by(stride).collect();
            let data = TaggedArray::new(values, Unit::centimeter(), p.name, p.label)
                .with_limits([-150.0, 150.0]);
            let data = match opts.distance {
                Some(d) => TaggedArray {
                    unit: Unit::dimensionless(),
                    ..data.scaled(1.0 / d)
                },
                None => data,
            };
            TaggedSeries::new(data, time_axis(thinned_time.clone()))
        })
        .collect()
}

fn select(mut all: Vec<TaggedSeries>, dim: u8, comp: GwComponent) -> Vec<TaggedSeries> {
    match (dim, comp.index()) {
        (3, Some(i)) => vec![all.swap_remove(i)],
        _ => all,
    }
}

/// Gravitational-wave strain. Axisymmetric runs have a single plus
/// polarisation and ignore `comp`; 3D runs return the requested component or
/// all four in the order h+eq, h+pol, hxeq, hxpol.
pub fn gw_strain(
    sim: &SimulationConfig,
    comp: GwComponent,
    strain: &StrainOptions,
    opts: &SeriesOptions,
) -> Result<Vec<TaggedSeries>> {
    let all = load_strain(sim, strain)?;
    let all = pipeline::run_all(all, Decorations::FULL, opts, sim.tob())?;
    Ok(select(all, sim.dim(), comp))
}

/// Strain amplitudes with only the bounce shift applied.
fn amplitudes(
    sim: &SimulationConfig,
    strain: &StrainOptions,
    tob_corrected: bool,
) -> Result<Vec<TaggedSeries>> {
    let opts = SeriesOptions {
        tob_corrected,
        ..SeriesOptions::default()
    };
    gw_strain(sim, GwComponent::All, strain, &opts)
}

// ---------------------------------------------------------------------------
// Energy
// ---------------------------------------------------------------------------

/// `k` in `dE/dt = k Σ Ȧ²` for amplitudes `A = D·h` in cm.
///
/// Axisymmetric: the plus polarisation scales as sin²θ, giving `2c³/(15G)`.
/// 3D: the sky average is estimated from the equatorial and polar observers,
/// giving `c³/(8G)` per component.
pub fn energy_coefficient(dim: u8) -> f64 {
    let c3_g = SPEED_OF_LIGHT.powi(3) / GRAVITATIONAL_CONSTANT;
    if dim == 2 {
        2.0 * c3_g / 15.0
    } else {
        c3_g / 8.0
    }
}

fn energy_rate_values(components: &[TaggedSeries], k: f64) -> Vec<f64> {
    let n = components.first().map_or(0, |c| c.len());
    let mut total = vec![0.0; n];
    for c in components {
        let rate = gradient(&c.data.values, &c.time.values);
        for (acc, r) in total.iter_mut().zip(rate) {
            *acc += k * r * r;
        }
    }
    total
}

/// Power radiated in gravitational waves, erg/s.
pub fn gw_energy_rate(
    sim: &SimulationConfig,
    lower_refinement: bool,
    opts: &SeriesOptions,
) -> Result<TaggedSeries> {
    let strain = StrainOptions {
        lower_refinement,
        ..StrainOptions::default()
    };
    let components = amplitudes(sim, &strain, opts.tob_corrected)?;
    let Some(first) = components.first() else {
        return Err(Error::NoGravitationalWaves { dim: sim.dim() });
    };
    if first.len() < 2 {
        return Err(Error::SeriesTooShort {
            name: first.data.name.clone(),
            len: first.len(),
            min: 2,
        });
    }
    let values = energy_rate_values(&components, energy_coefficient(sim.dim()));
    let data = TaggedArray::new(
        values,
        Unit::erg().div(&Unit::second()),
        "dEGWdt",
        r"$dE_\mathrm{GW}/dt$",
    );
    let series = TaggedSeries::new(data, first.time.clone())?;
    pipeline::run(series, Decorations::SMOOTH_ONLY, opts, sim.tob())
}

/// Spectral analysis options shared by `dE/df` and `h_char`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpectrumOptions {
    /// Restrict the strain to `[start, end]` seconds on its time axis.
    pub time_range: Option<(f64, f64)>,
    /// Taper applied before the transform; `None` for a rectangular window.
    pub windowing: Option<WindowKind>,
    pub zero_correction: bool,
    pub lower_refinement: bool,
    pub tob_corrected: bool,
    pub smooth: Option<SmoothOptions>,
}

impl Default for SpectrumOptions {
    fn default() -> Self {
        SpectrumOptions {
            time_range: None,
            windowing: Some(WindowKind::Hanning),
            zero_correction: true,
            lower_refinement: false,
            tob_corrected: true,
            smooth: None,
        }
    }
}

/// `(f, Ã(f))` for `f > 0`, or `None` when the cropped signal is too short.
fn amplitude_spectrum(
    series: &TaggedSeries,
    time_range_s: Option<(f64, f64)>,
    windowing: Option<WindowKind>,
) -> Option<(Vec<f64>, Vec<f64>)> {
    let t = &series.time.values;
    let range = match time_range_s {
        Some((lo, hi)) => time_range(t, lo, hi),
        None => 0..t.len(),
    };
    let signal = resample_uniform(&t[range.clone()], &series.data.values[range])?;
    let (freq, spectrum) = match windowing {
        Some(w) => fourier_transform(&signal, w, 0),
        None => untapered_transform(&signal),
    };
    Some(
        freq.into_iter()
            .zip(spectrum)
            .skip(1)
            .map(|(f, c)| (f, c.norm()))
            .unzip(),
    )
}

fn untapered_transform(signal: &UniformSignal) -> (Vec<f64>, Vec<Complex<f64>>) {
    let spectrum = rfft(&signal.values).into_iter().map(|c| c * signal.dt).collect();
    (rfft_frequencies(signal.values.len(), signal.dt), spectrum)
}

fn energy_spectrum_values(freq: &[f64], amplitude: &[f64], k: f64) -> Vec<f64> {
    freq.iter()
        .zip(amplitude)
        .map(|(f, a)| {
            let w = 2.0 * std::f64::consts::PI * f;
            2.0 * k * w * w * a * a
        })
        .collect()
}

fn energy_spectra(
    sim: &SimulationConfig,
    comp: GwComponent,
    opts: &SpectrumOptions,
) -> Result<Vec<FrequencySeries>> {
    let strain = StrainOptions {
        distance: None,
        zero_correction: opts.zero_correction,
        lower_refinement: opts.lower_refinement,
    };
    let components = select(amplitudes(sim, &strain, opts.tob_corrected)?, sim.dim(), comp);
    let k = energy_coefficient(sim.dim());
    components
        .iter()
        .map(|c| {
            let (freq, amp) = amplitude_spectrum(c, opts.time_range, opts.windowing).ok_or_else(|| {
                Error::SeriesTooShort {
                    name: c.data.name.clone(),
                    len: c.len(),
                    min: 2,
                }
            })?;
            let values = energy_spectrum_values(&freq, &amp, k);
            let data = TaggedArray::new(
                values,
                Unit::erg().div(&Unit::hertz()),
                &format!("dEdf_{}", c.data.name),
                r"$dE_\mathrm{GW}/df$",
            );
            FrequencySeries::new(data, frequency_axis(freq))
        })
        .collect()
}

/// Energy spectrum `dE/df` per component, erg/Hz.
pub fn gw_energy_spectrum(
    sim: &SimulationConfig,
    comp: GwComponent,
    opts: &SpectrumOptions,
) -> Result<Vec<FrequencySeries>> {
    Ok(energy_spectra(sim, comp, opts)?
        .into_iter()
        .map(|s| pipeline::smooth_spectrum(s, opts.smooth.as_ref()))
        .collect())
}

/// Default observer distance for the characteristic strain, 10 kpc in cm.
pub const DEFAULT_DISTANCE: f64 = 10.0 * KILOPARSEC;

/// Characteristic strain `h_c = sqrt(2G/c³ dE/df) / (πD)`.
///
/// With `divide_by_frequency` the result is `h_c / √f`, comparable with a
/// detector ASD.
pub fn characteristic_strain(
    sim: &SimulationConfig,
    comp: GwComponent,
    distance: f64,
    divide_by_frequency: bool,
    opts: &SpectrumOptions,
) -> Result<Vec<FrequencySeries>> {
    let factor = 2.0 * GRAVITATIONAL_CONSTANT / SPEED_OF_LIGHT.powi(3);
    Ok(energy_spectra(sim, comp, opts)?
        .into_iter()
        .map(|s| {
            let values = s
                .data
                .values
                .iter()
                .zip(&s.frequency.values)
                .map(|(dedf, f)| {
                    let hc = (factor * dedf).sqrt() / (std::f64::consts::PI * distance);
                    if divide_by_frequency {
                        hc / f.sqrt()
                    } else {
                        hc
                    }
                })
                .collect();
            let unit = if divide_by_frequency {
                Unit::per_root_hertz()
            } else {
                Unit::dimensionless()
            };
            let name = s.data.name.replacen("dEdf", "hchar", 1);
            let data = TaggedArray::new(values, unit, &name, r"$h_\mathrm{char}$")
                .with_limits([1e-24, 1e-20])
                .with_log(true);
            let series = FrequencySeries {
                data,
                frequency: s.frequency,
            };
            pipeline::smooth_spectrum(series, opts.smooth.as_ref())
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Spectrogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpectrogramOptions {
    pub strain: StrainOptions,
    /// Length of each transform window, s.
    pub window_size: f64,
    pub windowing: WindowKind,
    pub scale: SpectrogramScale,
    pub time_range: Option<(f64, f64)>,
    pub tob_corrected: bool,
}

impl Default for SpectrogramOptions {
    fn default() -> Self {
        SpectrogramOptions {
            strain: StrainOptions::default(),
            window_size: 0.01,
            windowing: WindowKind::Hanning,
            scale: SpectrogramScale::Magnitude,
            time_range: None,
            tob_corrected: true,
        }
    }
}

/// Time–frequency map of one strain component. `values[i][j]` belongs to
/// `time[i]` and `frequency[j]`.
#[derive(Debug, Clone, Serialize)]
pub struct Spectrogram {
    pub name: String,
    pub time: TaggedArray,
    pub frequency: TaggedArray,
    pub unit: Unit,
    pub scale: SpectrogramScale,
    pub values: Vec<Vec<f64>>,
}

/// Short-time Fourier transform of each requested strain component.
pub fn gw_spectrogram(
    sim: &SimulationConfig,
    comp: GwComponent,
    opts: &SpectrogramOptions,
) -> Result<Vec<Spectrogram>> {
    let components = select(amplitudes(sim, &opts.strain, opts.tob_corrected)?, sim.dim(), comp);
    components
        .iter()
        .map(|c| {
            let t = &c.time.values;
            let range = match opts.time_range {
                Some((lo, hi)) => time_range(t, lo, hi),
                None => 0..t.len(),
            };
            let signal = resample_uniform(&t[range.clone()], &c.data.values[range]).ok_or_else(|| {
                Error::SeriesTooShort {
                    name: c.data.name.clone(),
                    len: c.len(),
                    min: 2,
                }
            })?;
            let segment = (opts.window_size / signal.dt).round() as usize;
            let result = stft(&signal, segment, opts.windowing, opts.scale);
            if result.columns.is_empty() {
                warn!("{}: no complete {} s window", c.data.name, opts.window_size);
            }
            let unit = match opts.scale {
                SpectrogramScale::Magnitude => c.data.unit.clone(),
                SpectrogramScale::Psd => c.data.unit.powi(2).div(&Unit::hertz()),
            };
            Ok(Spectrogram {
                name: c.data.name.clone(),
                time: time_axis(result.time),
                frequency: frequency_axis(result.frequency),
                unit,
                scale: opts.scale,
                values: result.columns,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Peaks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeakOptions {
    pub peak: PeakKind,
    /// Search interval in seconds after bounce; open ends default to bounce
    /// and the end of the signal.
    pub interval: (Option<f64>, Option<f64>),
    /// Window for the minimum, ms.
    pub min_time: f64,
    /// Window for the maximum, ms.
    pub max_time: f64,
    /// Observer distance in cm, see [`StrainOptions::distance`].
    pub distance: Option<f64>,
    /// Report peak times since bounce.
    pub tob_corrected: bool,
}

impl Default for PeakOptions {
    fn default() -> Self {
        PeakOptions {
            peak: PeakKind::Bounce,
            interval: (None, None),
            min_time: 1.75,
            max_time: 2.0,
            distance: None,
            tob_corrected: true,
        }
    }
}

/// Sample indices found by the peak search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeakIndices {
    /// Feature the windows are centred on.
    pub reference: usize,
    pub high: usize,
    pub low: usize,
}

/// Locate the maximum and minimum that define `Δh`.
///
/// * `Bounce`: the first extremum in the interval is the bounce spike and is
///   skipped; the maximum is searched within `max_time` after it and the
///   minimum within `min_time`.
/// * `Highest`: centred on the largest `|h|` in the interval; the maximum is
///   searched within ±`max_time` and the minimum within ±`min_time`.
pub fn peak_indices(time: &[f64], values: &[f64], opts: &PeakOptions) -> Result<PeakIndices> {
    let lo = opts.interval.0.unwrap_or(0.0);
    let hi = opts.interval.1.unwrap_or(f64::INFINITY);
    let range = time_range(time, lo, hi);
    let max_window = opts.max_time * 1e-3;
    let min_window = opts.min_time * 1e-3;

    match opts.peak {
        PeakKind::Bounce => {
            let reference = local_extrema(values)
                .into_iter()
                .find(|i| range.contains(i))
                .ok_or(Error::PeakNotFound { what: "bounce peak" })?;
            let t_ref = time[reference];
            let high_end = time_range(time, t_ref, t_ref + max_window).end.min(range.end);
            let low_end = time_range(time, t_ref, t_ref + min_window).end.min(range.end);
            let high = argmax(values, reference + 1..high_end)
                .ok_or(Error::PeakNotFound { what: "maximum" })?;
            let low = argmin(values, reference + 1..low_end)
                .ok_or(Error::PeakNotFound { what: "minimum" })?;
            Ok(PeakIndices { reference, high, low })
        }
        PeakKind::Highest => {
            let abs: Vec<f64> = values.iter().map(|v| v.abs()).collect();
            let reference =
                argmax(&abs, range).ok_or(Error::PeakNotFound { what: "highest peak" })?;
            let t_ref = time[reference];
            let high = argmax(values, time_range(time, t_ref - max_window, t_ref + max_window))
                .ok_or(Error::PeakNotFound { what: "maximum" })?;
            let low = argmin(values, time_range(time, t_ref - min_window, t_ref + min_window))
                .ok_or(Error::PeakNotFound { what: "minimum" })?;
            Ok(PeakIndices { reference, high, low })
        }
    }
}

/// Peak-to-peak strain amplitude and where it was measured.
#[derive(Debug, Clone, Serialize)]
pub struct DeltaH {
    pub delta_h: f64,
    pub unit: Unit,
    /// `(t, h)` of the maximum.
    pub high: (f64, f64),
    /// `(t, h)` of the minimum.
    pub low: (f64, f64),
}

/// First (or only) strain component, bounce-corrected, for the peak search.
fn peak_strain(sim: &SimulationConfig, distance: Option<f64>) -> Result<TaggedSeries> {
    let strain = StrainOptions {
        distance,
        ..StrainOptions::default()
    };
    amplitudes(sim, &strain, true)?
        .into_iter()
        .next()
        .ok_or(Error::NoGravitationalWaves { dim: sim.dim() })
}

/// `Δh`: difference between the strain maximum and minimum around the
/// selected peak.
pub fn delta_h(sim: &SimulationConfig, opts: &PeakOptions) -> Result<DeltaH> {
    let h = peak_strain(sim, opts.distance)?;
    let (t, v) = (&h.time.values, &h.data.values);
    let idx = peak_indices(t, v, opts)?;
    let shift = if opts.tob_corrected { 0.0 } else { sim.tob() };
    Ok(DeltaH {
        delta_h: (v[idx.high] - v[idx.low]).abs(),
        unit: h.data.unit.clone(),
        high: (t[idx.high] + shift, v[idx.high]),
        low: (t[idx.low] + shift, v[idx.low]),
    })
}

/// Dominant frequencies of the strain around a peak.
#[derive(Debug, Clone, Serialize)]
pub struct PeakFrequencies {
    /// Dominant first, then the second dominant if present, Hz.
    pub frequencies: Vec<f64>,
    /// `|h̃|` at those frequencies.
    pub intensities: Vec<f64>,
    pub fourier: FrequencySeries,
}

/// Fourier analysis of the strain within ±`max_time` of the selected peak,
/// Hann-tapered and zero-padded.
pub fn gw_peak_frequencies(sim: &SimulationConfig, opts: &PeakOptions) -> Result<PeakFrequencies> {
    let h = peak_strain(sim, opts.distance)?;
    let (t, v) = (&h.time.values, &h.data.values);
    let idx = peak_indices(t, v, opts)?;
    let t_ref = t[idx.reference];
    let window = opts.max_time * 1e-3;
    let range = time_range(t, t_ref - window, t_ref + window);
    let signal = resample_uniform(&t[range.clone()], &v[range]).ok_or(Error::PeakNotFound {
        what: "peak segment",
    })?;
    let (freq, spectrum) = fourier_transform(&signal, WindowKind::Hanning, PEAK_FFT_LEN);
    let magnitude: Vec<f64> = spectrum.iter().map(|c| c.norm()).collect();

    let peaks = two_largest_maxima(&magnitude);
    if peaks.is_empty() {
        return Err(Error::PeakNotFound {
            what: "frequency peak",
        });
    }
    let data = TaggedArray::new(
        magnitude.clone(),
        h.data.unit.mul(&Unit::second()),
        "htilde",
        r"$|\tilde{h}|$",
    );
    Ok(PeakFrequencies {
        frequencies: peaks.iter().map(|&i| freq[i]).collect(),
        intensities: peaks.iter().map(|&i| magnitude[i]).collect(),
        fourier: FrequencySeries::new(data, frequency_axis(freq))?,
    })
}

// ---------------------------------------------------------------------------
// Detector sensitivity
// ---------------------------------------------------------------------------

/// Design amplitude spectral density of `detector`, read from
/// `<asd_dir>/<detector>.txt` (frequency, ASD).
pub fn asd(sim: &SimulationConfig, detector: Detector) -> Result<FrequencySeries> {
    let path = sim.asd_dir().join(format!("{}.txt", detector.as_str()));
    let table = load_log(&path)?;
    let data = TaggedArray::new(
        table.column(Column::At(1))?,
        Unit::per_root_hertz(),
        detector.as_str(),
        &format!(r"$\mathrm{{ASD}}_\mathrm{{{}}}$", detector.as_str()),
    )
    .with_log(true);
    FrequencySeries::new(data, frequency_axis(table.column(Column::At(0))?))
}
