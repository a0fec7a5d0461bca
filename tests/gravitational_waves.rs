mod common;

use sn_diagnostics::analysis::peaks::argmax;
use sn_diagnostics::analysis::spectral::SpectrogramScale;
use sn_diagnostics::quantities::gw::{
    self, PeakOptions, SpectrogramOptions, SpectrumOptions, StrainOptions, DEFAULT_DISTANCE,
};
use sn_diagnostics::quantities::selectors::{Detector, GwComponent, PeakKind};
use sn_diagnostics::units::{GRAVITATIONAL_CONSTANT, SPEED_OF_LIGHT};
use sn_diagnostics::{Error, FrequencySeries, Result, SeriesOptions, TaggedSeries};

use common::{fixture, wave, write_strain, DT, GW_AMPLITUDE, GW_FREQUENCY, SAMPLES, TOB};

fn strain(dim: u8, comp: GwComponent) -> Result<Vec<TaggedSeries>> {
    let fx = fixture(dim);
    gw::gw_strain(&fx.sim, comp, &StrainOptions::default(), &SeriesOptions::default())
}

fn spectrum(dim: u8, comp: GwComponent, opts: &SpectrumOptions) -> Vec<FrequencySeries> {
    let fx = fixture(dim);
    gw::gw_energy_spectrum(&fx.sim, comp, opts).unwrap()
}

/// Index of the bin closest to `f`.
fn bin(s: &FrequencySeries, f: f64) -> usize {
    (0..s.len())
        .min_by(|&a, &b| {
            let da = (s.frequency.values[a] - f).abs();
            let db = (s.frequency.values[b] - f).abs();
            da.total_cmp(&db)
        })
        .unwrap()
}

fn close(a: f64, b: f64, rel: f64) -> bool {
    (a - b).abs() <= rel * b.abs().max(f64::MIN_POSITIVE)
}

#[test]
fn spherical_runs_have_no_strain() {
    let err = strain(1, GwComponent::All).unwrap_err();
    assert!(matches!(err, Error::NoGravitationalWaves { dim: 1 }));
}

#[test]
fn zero_correction_removes_the_offset() {
    let s = strain(2, GwComponent::All).unwrap();
    assert_eq!(s.len(), 1);
    assert_eq!(s[0].name(), "h+");
    assert_eq!(s[0].data.unit.symbol, "cm");
    assert!(s[0].data.values[..400].iter().all(|v| v.abs() < 1e-12));

    let fx = fixture(2);
    let raw = StrainOptions {
        zero_correction: false,
        ..StrainOptions::default()
    };
    let s = gw::gw_strain(&fx.sim, GwComponent::All, &raw, &SeriesOptions::default()).unwrap();
    assert_eq!(s[0].data.values[0], common::GW_OFFSET);
}

#[test]
fn three_d_component_selection() {
    let all = strain(3, GwComponent::All).unwrap();
    let names: Vec<&str> = all.iter().map(|s| s.name()).collect();
    assert_eq!(names, ["h+eq", "h+pol", "hxeq", "hxpol"]);

    let pol = strain(3, GwComponent::PlusPole).unwrap();
    assert_eq!(pol.len(), 1);
    assert_eq!(pol[0].name(), "h+pol");
    for (p, e) in pol[0].data.values.iter().zip(&all[0].data.values) {
        assert!((p - 2.0 * e).abs() < 1e-9);
    }
}

#[test]
fn axisymmetric_runs_ignore_the_component() {
    let s = strain(2, GwComponent::CrossPole).unwrap();
    assert_eq!(s.len(), 1);
    assert_eq!(s[0].name(), "h+");
}

#[test]
fn distance_makes_the_strain_dimensionless() {
    let fx = fixture(2);
    let opts = StrainOptions {
        distance: Some(DEFAULT_DISTANCE),
        ..StrainOptions::default()
    };
    let h = gw::gw_strain(&fx.sim, GwComponent::All, &opts, &SeriesOptions::default()).unwrap();
    assert!(h[0].data.unit.is_dimensionless());
    let [lo, hi] = h[0].data.limits.unwrap();
    assert!(close(hi, 150.0 / DEFAULT_DISTANCE, 1e-12) && close(lo, -hi, 1e-12));
    let peak = h[0].data.values.iter().fold(0.0f64, |m, v| m.max(v.abs()));
    assert!((peak * DEFAULT_DISTANCE - GW_AMPLITUDE).abs() < 0.1);
}

#[test]
fn energy_rate_is_positive_after_bounce() {
    let fx = fixture(2);
    let rate = gw::gw_energy_rate(&fx.sim, false, &SeriesOptions::default()).unwrap();
    assert_eq!(rate.name(), "dEGWdt");
    assert_eq!(rate.len(), SAMPLES);
    assert_eq!(rate.data.unit.symbol, "erg / s");
    assert!(rate.data.values.iter().all(|&v| v >= 0.0));
    assert!(rate.data.values[..400].iter().all(|&v| v == 0.0));
    assert!(rate.data.values[600..].iter().any(|&v| v > 0.0));
}

#[test]
fn three_d_energy_rate_sums_components() {
    let k = SPEED_OF_LIGHT.powi(3) / GRAVITATIONAL_CONSTANT / 8.0;
    assert_eq!(gw::energy_coefficient(3), k);

    let fx3 = fixture(3);
    let rate3 = gw::gw_energy_rate(&fx3.sim, false, &SeriesOptions::default()).unwrap();
    assert_eq!(rate3.len(), SAMPLES);

    // Components are h, 2h, 3h and 4h, so the squared rates add up to 30 ḣ².
    let (before, after) = (699.0 * DT, 701.0 * DT);
    let hdot = (wave(after) - wave(before)) / (after - before);
    let expected = k * 30.0 * hdot * hdot;
    assert!(close(rate3.data.values[700], expected, 1e-6), "{}", rate3.data.values[700]);

    let fx2 = fixture(2);
    let rate2 = gw::gw_energy_rate(&fx2.sim, false, &SeriesOptions::default()).unwrap();
    let ratio = 30.0 * (1.0 / 8.0) / (2.0 / 15.0);
    for (r3, r2) in rate3.data.values.iter().zip(&rate2.data.values) {
        if *r2 > 0.0 {
            assert!(close(r3 / r2, ratio, 1e-9), "{}", r3 / r2);
        }
    }
}

#[test]
fn lower_refinement_thins_to_the_coarse_step() {
    let fx = fixture(2);
    write_strain(fx.dir.path(), 2, DT / 4.0, 4 * SAMPLES);
    let raw = SeriesOptions::raw_time();

    let full = gw::gw_energy_rate(&fx.sim, false, &raw).unwrap();
    assert_eq!(full.len(), 4 * SAMPLES);

    let thinned = gw::gw_energy_rate(&fx.sim, true, &raw).unwrap();
    assert_eq!(thinned.len(), 2 * SAMPLES);
    let t = &thinned.time.values;
    for pair in t.windows(2).take(10) {
        assert!(close(pair[1] - pair[0], 5e-5, 1e-9), "{pair:?}");
    }

    let opts = StrainOptions {
        lower_refinement: true,
        ..StrainOptions::default()
    };
    let h = gw::gw_strain(&fx.sim, GwComponent::All, &opts, &raw).unwrap();
    assert_eq!(h[0].len(), 2 * SAMPLES);
}

#[test]
fn energy_spectrum_peaks_at_the_signal_frequency() {
    let spectra = spectrum(2, GwComponent::All, &SpectrumOptions::default());
    let s = &spectra[0];
    assert_eq!(s.data.unit.symbol, "erg / Hz");
    assert!(s.frequency.values[0] > 0.0);
    let i = argmax(&s.data.values, 0..s.len()).unwrap();
    assert!((s.frequency.values[i] - GW_FREQUENCY).abs() <= 20.0);
}

#[test]
fn rectangular_window_recovers_the_tone_amplitude() {
    let opts = SpectrumOptions {
        windowing: None,
        ..SpectrumOptions::default()
    };
    let rect = &spectrum(2, GwComponent::All, &opts)[0];
    let i = bin(rect, GW_FREQUENCY);
    assert!(close(rect.frequency.values[i], GW_FREQUENCY, 1e-6));

    // 50 ms of a 20 cm tone: |Ã| = A·T/2 = 0.5 cm·s at its own frequency.
    let w = 2.0 * std::f64::consts::PI * rect.frequency.values[i];
    let k = gw::energy_coefficient(2);
    let amplitude_sq = rect.data.values[i] / (2.0 * k * w * w);
    assert!(close(amplitude_sq, 0.25, 1e-3), "{amplitude_sq}");

    let hann = &spectrum(2, GwComponent::All, &SpectrumOptions::default())[0];
    assert_eq!(hann.len(), rect.len());
    assert!(!close(hann.data.values[i], rect.data.values[i], 1e-2));
}

#[test]
fn time_range_crops_before_the_transform() {
    let full = &spectrum(2, GwComponent::All, &SpectrumOptions::default())[0];
    assert_eq!(full.len(), SAMPLES / 2);

    let quiet = SpectrumOptions {
        time_range: Some((-0.04, -0.01)),
        ..SpectrumOptions::default()
    };
    let pre = &spectrum(2, GwComponent::All, &quiet)[0];
    assert!(pre.len() < full.len());
    assert!(pre.data.values.iter().all(|&v| v == 0.0));

    let post = SpectrumOptions {
        time_range: Some((0.0, 0.05)),
        ..SpectrumOptions::default()
    };
    let cropped = &spectrum(2, GwComponent::All, &post)[0];
    assert!(cropped.len().abs_diff(full.len() / 2) <= 1, "{}", cropped.len());
    let df_full = full.frequency.values[1] - full.frequency.values[0];
    let df_cropped = cropped.frequency.values[1] - cropped.frequency.values[0];
    assert!(close(df_cropped / df_full, 2.0, 1e-2), "{}", df_cropped / df_full);

    let outside = SpectrumOptions {
        time_range: Some((1.0, 2.0)),
        ..SpectrumOptions::default()
    };
    let fx = fixture(2);
    let err = gw::gw_energy_spectrum(&fx.sim, GwComponent::All, &outside).unwrap_err();
    assert!(matches!(err, Error::SeriesTooShort { .. }));
}

#[test]
fn three_d_energy_spectrum_selection() {
    let opts = SpectrumOptions::default();
    let one = spectrum(3, GwComponent::CrossPole, &opts);
    assert_eq!(one.len(), 1);
    assert_eq!(one[0].name(), "dEdf_hxpol");

    let all = spectrum(3, GwComponent::All, &opts);
    let names: Vec<&str> = all.iter().map(|s| s.name()).collect();
    assert_eq!(names, ["dEdf_h+eq", "dEdf_h+pol", "dEdf_hxeq", "dEdf_hxpol"]);
    let i = bin(&all[0], GW_FREQUENCY);
    assert!(close(all[3].data.values[i] / all[0].data.values[i], 16.0, 1e-9));
    assert_eq!(one[0].data.values, all[3].data.values);

    let fx = fixture(3);
    let hc = gw::characteristic_strain(
        &fx.sim,
        GwComponent::CrossEquator,
        DEFAULT_DISTANCE,
        false,
        &opts,
    )
    .unwrap();
    assert_eq!(hc.len(), 1);
    assert_eq!(hc[0].name(), "hchar_hxeq");
}

#[test]
fn characteristic_strain_units() {
    let fx = fixture(2);
    let opts = SpectrumOptions::default();
    let all = GwComponent::All;
    let hc = gw::characteristic_strain(&fx.sim, all, DEFAULT_DISTANCE, false, &opts).unwrap();
    assert!(hc[0].data.unit.is_dimensionless());
    assert!(hc[0].data.name.starts_with("hchar"));
    let per_hz = gw::characteristic_strain(&fx.sim, all, DEFAULT_DISTANCE, true, &opts).unwrap();
    assert_eq!(per_hz[0].data.unit.symbol, "Hz^-1/2");
    let (f, a, b) = (
        hc[0].frequency.values[10],
        hc[0].data.values[10],
        per_hz[0].data.values[10],
    );
    assert!((a / f.sqrt() - b).abs() <= 1e-12 * a.abs().max(1e-300));
}

#[test]
fn spectrogram_shape_and_content() {
    let fx = fixture(2);
    let opts = SpectrogramOptions::default();
    let maps = gw::gw_spectrogram(&fx.sim, GwComponent::All, &opts).unwrap();
    let map = &maps[0];
    assert_eq!(map.unit.symbol, "cm");
    assert_eq!(map.values.len(), map.time.len());
    assert!(!map.values.is_empty());
    assert!(map.values.iter().all(|row| row.len() == map.frequency.len()));

    let late = map.values.last().unwrap();
    let i = argmax(late, 0..late.len()).unwrap();
    assert!((map.frequency.values[i] - GW_FREQUENCY).abs() <= 100.0);
}

#[test]
fn power_spectral_density_integrates_to_the_mean_square() {
    let fx = fixture(2);
    let opts = SpectrogramOptions {
        scale: SpectrogramScale::Psd,
        ..SpectrogramOptions::default()
    };
    let maps = gw::gw_spectrogram(&fx.sim, GwComponent::All, &opts).unwrap();
    let map = &maps[0];
    assert_eq!(map.unit.symbol, "cm^2 / Hz");
    assert_eq!(map.scale, SpectrogramScale::Psd);

    // The last window is entirely after bounce: Σ p·df ≈ A²/2.
    let df = map.frequency.values[1] - map.frequency.values[0];
    let power: f64 = map.values.last().unwrap().iter().map(|p| p * df).sum();
    let mean_square = 0.5 * GW_AMPLITUDE * GW_AMPLITUDE;
    assert!(close(power, mean_square, 5e-2), "{power}");

    let early: f64 = map.values[0].iter().sum();
    assert!(early.abs() < 1e-12);
}

#[test]
fn delta_h_around_the_bounce_oscillation() {
    let fx = fixture(2);
    let d = gw::delta_h(&fx.sim, &PeakOptions::default()).unwrap();
    assert_eq!(d.unit.symbol, "cm");
    let (lo, hi) = (1.9 * GW_AMPLITUDE, 2.0 * GW_AMPLITUDE);
    assert!(d.delta_h > lo && d.delta_h <= hi, "{}", d.delta_h);
    assert!(d.high.1 > 0.0 && d.low.1 < 0.0);
    assert!(d.high.0 > 0.0 && d.high.0 < 3e-3);

    let sim_time = PeakOptions {
        tob_corrected: false,
        ..PeakOptions::default()
    };
    let d2 = gw::delta_h(&fx.sim, &sim_time).unwrap();
    assert!((d2.high.0 - d.high.0 - TOB).abs() < 1e-12);
}

#[test]
fn highest_peak_search() {
    let fx = fixture(2);
    let opts = PeakOptions {
        peak: PeakKind::Highest,
        ..PeakOptions::default()
    };
    let d = gw::delta_h(&fx.sim, &opts).unwrap();
    assert!(d.delta_h > 1.9 * GW_AMPLITUDE);
}

#[test]
fn empty_interval_finds_no_peak() {
    let fx = fixture(2);
    let opts = PeakOptions {
        interval: (Some(10.0), Some(11.0)),
        ..PeakOptions::default()
    };
    assert!(matches!(gw::delta_h(&fx.sim, &opts), Err(Error::PeakNotFound { .. })));
}

#[test]
fn peak_frequencies_near_the_signal() {
    let fx = fixture(2);
    let p = gw::gw_peak_frequencies(&fx.sim, &PeakOptions::default()).unwrap();
    assert!(!p.frequencies.is_empty());
    assert_eq!(p.frequencies.len(), p.intensities.len());
    assert!((p.frequencies[0] - GW_FREQUENCY).abs() < 250.0, "{:?}", p.frequencies);
    assert!(p.fourier.len() >= 4096 / 2);
}

#[test]
fn detector_asd_from_text_file() {
    let fx = fixture(2);
    let asd_dir = fx.dir.path().join("asd");
    std::fs::create_dir(&asd_dir).unwrap();
    std::fs::write(asd_dir.join("aLIGO.txt"), "10 1e-22\n100 4e-24\n1000 1e-23\n").unwrap();
    let asd = gw::asd(&fx.sim, Detector::AdvancedLigo).unwrap();
    assert_eq!(asd.len(), 3);
    assert_eq!(asd.frequency.values[1], 100.0);
    assert_eq!(asd.data.unit.symbol, "Hz^-1/2");
    assert!(matches!(gw::asd(&fx.sim, Detector::Kagra), Err(Error::Io { .. })));
}

#[test]
fn detector_curves_from_a_custom_directory() {
    let fx = fixture(2);
    let curves = tempfile::tempdir().unwrap();
    std::fs::write(curves.path().join("ET.txt"), "5 1e-23
50 2e-25
").unwrap();
    assert!(gw::asd(&fx.sim, Detector::EinsteinTelescope).is_err());

    let sim = fx.sim.clone().with_asd_dir(curves.path());
    let et = gw::asd(&sim, Detector::EinsteinTelescope).unwrap();
    assert_eq!(et.frequency.values, vec![5.0, 50.0]);
    assert_eq!(et.data.values, vec![1e-23, 2e-25]);
}
