use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Shape parameter used for the Kaiser window.
pub const KAISER_BETA: f64 = 14.0;

/// Tapering windows shared by smoothing and spectral analysis.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    Bartlett,
    Blackman,
    Hamming,
    #[default]
    Hanning,
    Kaiser,
}

impl WindowKind {
    pub const ALL: [WindowKind; 5] = [
        WindowKind::Bartlett,
        WindowKind::Blackman,
        WindowKind::Hamming,
        WindowKind::Hanning,
        WindowKind::Kaiser,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WindowKind::Bartlett => "bartlett",
            WindowKind::Blackman => "blackman",
            WindowKind::Hamming => "hamming",
            WindowKind::Hanning => "hanning",
            WindowKind::Kaiser => "kaiser",
        }
    }

    /// Symmetric window of `len` points.
    pub fn weights(&self, len: usize) -> Vec<f64> {
        match len {
            0 => return Vec::new(),
            1 => return vec![1.0],
            _ => {}
        }
        let m = (len - 1) as f64;
        (0..len)
            .map(|n| {
                let x = n as f64 / m;
                match self {
                    WindowKind::Bartlett => 1.0 - (2.0 * x - 1.0).abs(),
                    WindowKind::Blackman => {
                        0.42 - 0.5 * (2.0 * PI * x).cos() + 0.08 * (4.0 * PI * x).cos()
                    }
                    WindowKind::Hamming => 0.54 - 0.46 * (2.0 * PI * x).cos(),
                    WindowKind::Hanning => 0.5 - 0.5 * (2.0 * PI * x).cos(),
                    WindowKind::Kaiser => {
                        let r = 2.0 * x - 1.0;
                        bessel_i0(KAISER_BETA * (1.0 - r * r).max(0.0).sqrt())
                            / bessel_i0(KAISER_BETA)
                    }
                }
            })
            .collect()
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WindowKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WindowKind::ALL
            .into_iter()
            .find(|w| w.as_str() == s)
            .ok_or_else(|| Error::not_recognized("window", s))
    }
}

/// Modified Bessel function of the first kind, order zero (power series).
fn bessel_i0(x: f64) -> f64 {
    let half = x / 2.0;
    let mut term = 1.0;
    let mut sum = 1.0;
    for k in 1..200 {
        term *= half / k as f64;
        let t2 = term * term;
        sum += t2;
        if t2 < sum * 1e-17 {
            break;
        }
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_are_symmetric_and_peak_in_the_middle() {
        for kind in WindowKind::ALL {
            let w = kind.weights(9);
            for i in 0..9 {
                assert!((w[i] - w[8 - i]).abs() < 1e-12, "{kind} not symmetric");
            }
            assert!((w[4] - 1.0).abs() < 1e-9, "{kind} centre is {}", w[4]);
        }
    }

    #[test]
    fn hanning_endpoints_vanish() {
        let w = WindowKind::Hanning.weights(5);
        assert!(w[0].abs() < 1e-15);
        assert!((w[2] - 1.0).abs() < 1e-15);
    }

    #[test]
    fn bessel_matches_known_value() {
        // I0(1) = 1.2660658777520082
        assert!((bessel_i0(1.0) - 1.266_065_877_752_008_2).abs() < 1e-12);
    }

    #[test]
    fn parses_names() {
        assert_eq!("kaiser".parse::<WindowKind>().unwrap(), WindowKind::Kaiser);
        let err = "boxcar".parse::<WindowKind>().unwrap_err();
        assert!(err.to_string().contains("not recognized"));
    }
}
