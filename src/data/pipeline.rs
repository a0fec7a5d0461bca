use log::debug;
use serde::{Deserialize, Serialize};

use super::model::{FrequencySeries, TaggedSeries};
use crate::analysis::calculus;
use crate::analysis::window::WindowKind;
use crate::error::{Error, Result};
use crate::units::Unit;

// ---------------------------------------------------------------------------
// Options shared by every accessor
// ---------------------------------------------------------------------------

/// Moving-window smoothing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothOptions {
    /// Window width in samples, rounded up to an odd number.
    pub window: usize,
    pub kind: WindowKind,
}

impl Default for SmoothOptions {
    fn default() -> Self {
        SmoothOptions {
            window: 11,
            kind: WindowKind::Hanning,
        }
    }
}

/// Optional post-processing applied to an accessor's result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesOptions {
    /// Report time since bounce (default) instead of simulation time.
    pub tob_corrected: bool,
    /// Return the time derivative of the quantity.
    pub derive: bool,
    pub smooth: Option<SmoothOptions>,
}

impl Default for SeriesOptions {
    fn default() -> Self {
        SeriesOptions {
            tob_corrected: true,
            derive: false,
            smooth: None,
        }
    }
}

impl SeriesOptions {
    pub fn raw_time() -> Self {
        SeriesOptions {
            tob_corrected: false,
            ..Default::default()
        }
    }

    pub fn derived(mut self) -> Self {
        self.derive = true;
        self
    }

    pub fn smoothed(mut self, smooth: SmoothOptions) -> Self {
        self.smooth = Some(smooth);
        self
    }
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// How an accessor relates its time axis to the bounce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TobMode {
    /// Loaded in simulation time; shift to time since bounce on request.
    Subtract,
    /// Computed relative to bounce; shift back to simulation time unless
    /// bounce-corrected output is requested.
    Sum,
}

/// The transforms an accessor takes part in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decorations {
    pub tob: Option<TobMode>,
    pub derive: bool,
    pub smooth: bool,
}

impl Decorations {
    pub const FULL: Decorations = Decorations {
        tob: Some(TobMode::Subtract),
        derive: true,
        smooth: true,
    };
    pub const TOB_ONLY: Decorations = Decorations {
        tob: Some(TobMode::Subtract),
        derive: false,
        smooth: false,
    };
    pub const DERIVE_SMOOTH: Decorations = Decorations {
        tob: None,
        derive: true,
        smooth: true,
    };
    pub const SMOOTH_ONLY: Decorations = Decorations {
        tob: None,
        derive: false,
        smooth: true,
    };
    pub const SUM_TOB_SMOOTH: Decorations = Decorations {
        tob: Some(TobMode::Sum),
        derive: false,
        smooth: true,
    };
}

/// One pure series → series transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stage {
    SubtractTob(f64),
    SumTob(f64),
    Derive,
    Smooth(SmoothOptions),
}

/// Ordered stage list for an accessor: time reference, then derivative,
/// then smoothing.
pub fn plan(decorations: Decorations, opts: &SeriesOptions, tob: f64) -> Vec<Stage> {
    let mut stages = Vec::new();
    match (decorations.tob, opts.tob_corrected) {
        (Some(TobMode::Subtract), true) => stages.push(Stage::SubtractTob(tob)),
        (Some(TobMode::Sum), false) => stages.push(Stage::SumTob(tob)),
        _ => {}
    }
    if decorations.derive && opts.derive {
        stages.push(Stage::Derive);
    }
    if decorations.smooth {
        if let Some(smooth) = opts.smooth {
            stages.push(Stage::Smooth(smooth));
        }
    }
    stages
}

/// Run `stages` over `series` in order.
pub fn apply(series: TaggedSeries, stages: &[Stage]) -> Result<TaggedSeries> {
    stages.iter().try_fold(series, |s, stage| {
        debug!("{}: {stage:?}", s.name());
        match *stage {
            Stage::SubtractTob(tob) => shift_time(s, -tob),
            Stage::SumTob(tob) => shift_time(s, tob),
            Stage::Derive => derive(s),
            Stage::Smooth(opts) => Ok(smooth(s, &opts)),
        }
    })
}

/// Plan and apply in one go.
pub fn run(
    series: TaggedSeries,
    decorations: Decorations,
    opts: &SeriesOptions,
    tob: f64,
) -> Result<TaggedSeries> {
    apply(series, &plan(decorations, opts, tob))
}

/// [`run`] over every component of a multi-series result.
pub fn run_all(
    series: Vec<TaggedSeries>,
    decorations: Decorations,
    opts: &SeriesOptions,
    tob: f64,
) -> Result<Vec<TaggedSeries>> {
    let stages = plan(decorations, opts, tob);
    series.into_iter().map(|s| apply(s, &stages)).collect()
}

// ---------------------------------------------------------------------------
// Stage implementations
// ---------------------------------------------------------------------------

/// Time since bounce.
pub fn subtract_tob(series: TaggedSeries, tob: f64) -> Result<TaggedSeries> {
    shift_time(series, -tob)
}

/// Simulation time from time since bounce.
pub fn sum_tob(series: TaggedSeries, tob: f64) -> Result<TaggedSeries> {
    shift_time(series, tob)
}

/// Shift the time axis by `offset` seconds, whatever unit it is stored in.
fn shift_time(mut series: TaggedSeries, offset: f64) -> Result<TaggedSeries> {
    let offset = offset * Unit::second().conversion_factor(&series.time.unit)?;
    for t in &mut series.time.values {
        *t += offset;
    }
    if let Some([lo, hi]) = series.time.limits.as_mut() {
        *lo += offset;
        *hi += offset;
    }
    Ok(series)
}

/// Time derivative; the unit becomes `[X] / [time]`.
pub fn derive(series: TaggedSeries) -> Result<TaggedSeries> {
    if series.len() < 2 {
        return Err(Error::SeriesTooShort {
            name: series.data.name.clone(),
            len: series.len(),
            min: 2,
        });
    }
    let TaggedSeries { data, time } = series;
    let values = calculus::gradient(&data.values, &time.values);
    let unit = data.unit.div(&time.unit);
    let name = format!("d{}/dt", data.name);
    let label = format!("$d({})/dt$", data.label.trim_matches('$'));
    let mut derived = data;
    derived.values = values;
    derived.unit = unit;
    derived.limits = None;
    derived.log = false;
    TaggedSeries::new(derived.relabel(&name, &label), time)
}

/// Smoothed payload on the same time axis.
pub fn smooth(mut series: TaggedSeries, opts: &SmoothOptions) -> TaggedSeries {
    series.data.values = calculus::smooth(&series.data.values, opts.window, opts.kind);
    series
}

/// Smoothing for frequency-domain results.
pub fn smooth_spectrum(
    mut series: FrequencySeries,
    opts: Option<&SmoothOptions>,
) -> FrequencySeries {
    if let Some(opts) = opts {
        series.data.values = calculus::smooth(&series.data.values, opts.window, opts.kind);
    }
    series
}
