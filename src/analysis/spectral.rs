use std::fmt;
use std::str::FromStr;

use log::warn;
use num_complex::Complex;
use rustfft::FftPlanner;
use serde::Serialize;

use super::window::WindowKind;
use crate::error::Error;

// ---------------------------------------------------------------------------
// Uniform resampling
// ---------------------------------------------------------------------------

/// A signal on an evenly spaced time grid.
#[derive(Debug, Clone)]
pub struct UniformSignal {
    pub t0: f64,
    pub dt: f64,
    pub values: Vec<f64>,
}

impl UniformSignal {
    pub fn sample_rate(&self) -> f64 {
        1.0 / self.dt
    }

    pub fn time_at(&self, i: usize) -> f64 {
        self.t0 + i as f64 * self.dt
    }
}

/// Linearly interpolate onto an even grid spanning the same interval with the
/// same number of samples. Returns `None` for fewer than two samples or a
/// degenerate time span.
pub fn resample_uniform(time: &[f64], values: &[f64]) -> Option<UniformSignal> {
    let n = time.len().min(values.len());
    if n < 2 {
        return None;
    }
    let t0 = time[0];
    let span = time[n - 1] - t0;
    if !(span > 0.0) {
        return None;
    }
    let dt = span / (n - 1) as f64;

    let mut out = Vec::with_capacity(n);
    let mut j = 0;
    for i in 0..n {
        let t = t0 + i as f64 * dt;
        while j + 2 < n && time[j + 1] < t {
            j += 1;
        }
        let (ta, tb) = (time[j], time[j + 1]);
        let v = if tb > ta {
            let w = ((t - ta) / (tb - ta)).clamp(0.0, 1.0);
            values[j] + w * (values[j + 1] - values[j])
        } else {
            values[j]
        };
        out.push(v);
    }
    Some(UniformSignal { t0, dt, values: out })
}

// ---------------------------------------------------------------------------
// Fourier transform
// ---------------------------------------------------------------------------

/// One-sided transform of a real signal of length `n`: `n / 2 + 1` bins.
pub fn rfft(values: &[f64]) -> Vec<Complex<f64>> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }
    let mut buffer: Vec<Complex<f64>> = values.iter().map(|&v| Complex::new(v, 0.0)).collect();
    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_forward(n).process(&mut buffer);
    buffer.truncate(n / 2 + 1);
    buffer
}

/// Frequencies of the bins returned by [`rfft`].
pub fn rfft_frequencies(n: usize, dt: f64) -> Vec<f64> {
    (0..n / 2 + 1).map(|k| k as f64 / (n as f64 * dt)).collect()
}

/// Continuous-normalised spectrum `X(f) ≈ ∫ x(t) e^{-2πift} dt` of a
/// windowed signal, zero-padded to at least `min_len` samples.
pub fn fourier_transform(
    signal: &UniformSignal,
    window: WindowKind,
    min_len: usize,
) -> (Vec<f64>, Vec<Complex<f64>>) {
    let weights = window.weights(signal.values.len());
    let mut tapered: Vec<f64> = signal
        .values
        .iter()
        .zip(&weights)
        .map(|(v, w)| v * w)
        .collect();
    if tapered.len() < min_len {
        tapered.resize(min_len, 0.0);
    }
    let n = tapered.len();
    let spectrum = rfft(&tapered)
        .into_iter()
        .map(|c| c * signal.dt)
        .collect();
    (rfft_frequencies(n, signal.dt), spectrum)
}

// ---------------------------------------------------------------------------
// Short-time Fourier transform
// ---------------------------------------------------------------------------

/// Normalisation of each STFT column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
pub enum SpectrogramScale {
    #[default]
    Magnitude,
    Psd,
}

impl SpectrogramScale {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpectrogramScale::Magnitude => "magnitude",
            SpectrogramScale::Psd => "psd",
        }
    }
}

impl fmt::Display for SpectrogramScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpectrogramScale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "magnitude" => Ok(SpectrogramScale::Magnitude),
            "psd" => Ok(SpectrogramScale::Psd),
            other => Err(Error::not_recognized("spectrogram scale", other)),
        }
    }
}

/// Raw STFT output: segment centre times, bin frequencies and one spectrum
/// per segment.
#[derive(Debug, Clone)]
pub struct Stft {
    pub time: Vec<f64>,
    pub frequency: Vec<f64>,
    pub columns: Vec<Vec<f64>>,
}

/// STFT with `segment` samples per window and 50 % overlap.
pub fn stft(
    signal: &UniformSignal,
    segment: usize,
    window: WindowKind,
    scale: SpectrogramScale,
) -> Stft {
    let n = signal.values.len();
    let segment = segment.max(2);
    if segment > n {
        warn!("signal shorter than one STFT window ({n} < {segment} samples)");
        return Stft {
            time: Vec::new(),
            frequency: rfft_frequencies(segment, signal.dt),
            columns: Vec::new(),
        };
    }
    let hop = (segment - segment / 2).max(1);
    let weights = window.weights(segment);
    let sum_w: f64 = weights.iter().sum();
    let sum_w2: f64 = weights.iter().map(|w| w * w).sum();
    let fs = signal.sample_rate();

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(segment);
    let n_bins = segment / 2 + 1;

    let mut time = Vec::new();
    let mut columns = Vec::new();
    let mut start = 0;
    while start + segment <= n {
        let mut buffer: Vec<Complex<f64>> = signal.values[start..start + segment]
            .iter()
            .zip(&weights)
            .map(|(v, w)| Complex::new(v * w, 0.0))
            .collect();
        fft.process(&mut buffer);

        let column = buffer[..n_bins]
            .iter()
            .enumerate()
            .map(|(k, c)| match scale {
                SpectrogramScale::Magnitude => c.norm() / sum_w,
                SpectrogramScale::Psd => {
                    let p = c.norm_sqr() / (fs * sum_w2);
                    let edge = k == 0 || (segment % 2 == 0 && k == n_bins - 1);
                    if edge {
                        p
                    } else {
                        2.0 * p
                    }
                }
            })
            .collect();
        columns.push(column);
        time.push(signal.time_at(start) + 0.5 * (segment - 1) as f64 * signal.dt);
        start += hop;
    }

    Stft {
        time,
        frequency: rfft_frequencies(segment, signal.dt),
        columns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn resampling_an_even_grid_is_identity() {
        let t: Vec<f64> = (0..10).map(|i| i as f64 * 0.5).collect();
        let v: Vec<f64> = t.iter().map(|x| 3.0 * x + 1.0).collect();
        let u = resample_uniform(&t, &v).unwrap();
        assert!((u.dt - 0.5).abs() < 1e-12);
        for (a, b) in u.values.iter().zip(&v) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn resampling_interpolates_linearly() {
        let t = [0.0, 0.1, 1.0];
        let v = [0.0, 0.1, 1.0];
        let u = resample_uniform(&t, &v).unwrap();
        assert_eq!(u.values.len(), 3);
        assert!((u.values[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn rfft_finds_a_pure_tone() {
        let n = 256;
        let dt = 1.0 / 1024.0;
        let f0 = 64.0;
        let x: Vec<f64> = (0..n).map(|i| (2.0 * PI * f0 * i as f64 * dt).sin()).collect();
        let spec = rfft(&x);
        let freqs = rfft_frequencies(n, dt);
        let (k, _) = spec
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.norm().total_cmp(&b.1.norm()))
            .unwrap();
        assert!((freqs[k] - f0).abs() < 1e-9);
    }

    #[test]
    fn stft_segments_with_half_overlap() {
        let signal = UniformSignal {
            t0: 0.0,
            dt: 1e-3,
            values: vec![1.0; 100],
        };
        let s = stft(&signal, 20, WindowKind::Hanning, SpectrogramScale::Magnitude);
        assert_eq!(s.columns.len(), 9);
        assert_eq!(s.frequency.len(), 11);
        // Constant signal: all magnitude in the DC bin, normalised to 1.
        assert!((s.columns[0][0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn scale_names() {
        assert_eq!("psd".parse::<SpectrogramScale>().unwrap(), SpectrogramScale::Psd);
        assert!("power".parse::<SpectrogramScale>().is_err());
    }
}
