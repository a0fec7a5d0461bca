use serde::Serialize;

use crate::error::{Error, Result};
use crate::units::Unit;

// ---------------------------------------------------------------------------
// TaggedArray – numbers with a unit and display metadata
// ---------------------------------------------------------------------------

/// A 1-D numeric payload tagged with its physical unit and the hints a
/// plotting front end needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaggedArray {
    pub values: Vec<f64>,
    pub unit: Unit,
    /// Short machine-readable name (`Lnue`, `rho_max`, ...).
    pub name: String,
    /// Display label, usually LaTeX.
    pub label: String,
    pub cmap: Option<String>,
    /// Suggested axis range, in `unit`.
    pub limits: Option<[f64; 2]>,
    pub log: bool,
}

impl TaggedArray {
    pub fn new(values: Vec<f64>, unit: Unit, name: &str, label: &str) -> Self {
        TaggedArray {
            values,
            unit,
            name: name.to_string(),
            label: label.to_string(),
            cmap: None,
            limits: None,
            log: false,
        }
    }

    pub fn with_limits(mut self, limits: [f64; 2]) -> Self {
        self.limits = Some(limits);
        self
    }

    pub fn with_cmap(mut self, cmap: &str) -> Self {
        self.cmap = Some(cmap.to_string());
        self
    }

    pub fn with_log(mut self, log: bool) -> Self {
        self.log = log;
        self
    }

    pub fn relabel(mut self, name: &str, label: &str) -> Self {
        self.name = name.to_string();
        self.label = label.to_string();
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Rescale into `unit`, keeping name, label and display hints.
    pub fn to(&self, unit: &Unit) -> Result<TaggedArray> {
        let factor = self.unit.conversion_factor(unit)?;
        Ok(TaggedArray {
            values: self.values.iter().map(|v| v * factor).collect(),
            unit: unit.clone(),
            limits: self.limits.map(|[lo, hi]| [lo * factor, hi * factor]),
            ..self.clone()
        })
    }

    /// Multiply every value and the axis limits by `factor`. The unit is left
    /// alone, so callers that change dimensions swap it afterwards.
    pub fn scaled(&self, factor: f64) -> TaggedArray {
        TaggedArray {
            values: self.values.iter().map(|v| v * factor).collect(),
            limits: self.limits.map(|[lo, hi]| [lo * factor, hi * factor]),
            ..self.clone()
        }
    }

    /// Elementwise quotient. Zero denominators follow IEEE-754, so the result
    /// may hold `inf` or `NaN`.
    pub fn try_div(&self, rhs: &TaggedArray) -> Result<TaggedArray> {
        if self.len() != rhs.len() {
            return Err(Error::LengthMismatch {
                left: self.len(),
                right: rhs.len(),
            });
        }
        Ok(TaggedArray {
            values: self
                .values
                .iter()
                .zip(&rhs.values)
                .map(|(a, b)| a / b)
                .collect(),
            unit: self.unit.div(&rhs.unit),
            name: format!("{}/{}", self.name, rhs.name),
            label: format!("{}/{}", self.label, rhs.label),
            cmap: None,
            limits: None,
            log: false,
        })
    }
}

// ---------------------------------------------------------------------------
// TaggedSeries – payload against time
// ---------------------------------------------------------------------------

/// A tagged payload sampled on a tagged time axis of the same length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaggedSeries {
    pub data: TaggedArray,
    pub time: TaggedArray,
}

impl TaggedSeries {
    pub fn new(data: TaggedArray, time: TaggedArray) -> Result<Self> {
        if data.len() != time.len() {
            return Err(Error::LengthMismatch {
                left: data.len(),
                right: time.len(),
            });
        }
        Ok(TaggedSeries { data, time })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    /// Elementwise quotient of two series sampled on the same times.
    pub fn try_div(&self, rhs: &TaggedSeries) -> Result<TaggedSeries> {
        TaggedSeries::new(self.data.try_div(&rhs.data)?, self.time.clone())
    }

    pub fn to(&self, unit: &Unit) -> Result<TaggedSeries> {
        Ok(TaggedSeries {
            data: self.data.to(unit)?,
            time: self.time.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// FrequencySeries – payload against frequency
// ---------------------------------------------------------------------------

/// Frequency-domain counterpart of [`TaggedSeries`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencySeries {
    pub data: TaggedArray,
    pub frequency: TaggedArray,
}

impl FrequencySeries {
    pub fn new(data: TaggedArray, frequency: TaggedArray) -> Result<Self> {
        if data.len() != frequency.len() {
            return Err(Error::LengthMismatch {
                left: data.len(),
                right: frequency.len(),
            });
        }
        Ok(FrequencySeries { data, frequency })
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Standard time axis of every log: seconds, limits from zero to the last
/// sample.
pub fn time_axis(values: Vec<f64>) -> TaggedArray {
    let end = values.last().copied().unwrap_or(0.0);
    TaggedArray::new(values, Unit::second(), "time", r"$t$").with_limits([0.0, end])
}

/// Frequency axis in Hz.
pub fn frequency_axis(values: Vec<f64>) -> TaggedArray {
    let end = values.last().copied().unwrap_or(0.0);
    TaggedArray::new(values, Unit::hertz(), "frequency", r"$f$").with_limits([0.0, end])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-12 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn conversion_round_trip() {
        let mass = TaggedArray::new(vec![1e33, 2.5e33, 4e30], Unit::gram(), "mtot", "$M$")
            .with_limits([0.0, 1e34]);
        let back = mass.to(&Unit::solar_mass()).unwrap().to(&Unit::gram()).unwrap();
        for (a, b) in mass.values.iter().zip(&back.values) {
            assert!(close(*a, *b), "{a} vs {b}");
        }
        assert_eq!(back.name, "mtot");
        assert_eq!(back.label, "$M$");
        let [lo, hi] = back.limits.unwrap();
        assert!(close(lo, 0.0) && close(hi, 1e34));
    }

    #[test]
    fn conversion_keeps_metadata() {
        let t = TaggedArray::new(vec![0.5], Unit::second(), "time", "$t$")
            .with_cmap("viridis")
            .with_log(true);
        let ms = t.to(&Unit::millisecond()).unwrap();
        assert_eq!(ms.values, vec![500.0]);
        assert_eq!(ms.cmap.as_deref(), Some("viridis"));
        assert!(ms.log);
        assert_eq!(ms.unit.symbol, "ms");
    }

    #[test]
    fn scaling_moves_values_and_limits() {
        let amp = TaggedArray::new(vec![2.0, -4.0], Unit::centimeter(), "h+", "$h$")
            .with_limits([-150.0, 150.0])
            .with_log(true);
        let scaled = amp.scaled(0.5);
        assert_eq!(scaled.values, vec![1.0, -2.0]);
        assert_eq!(scaled.limits, Some([-75.0, 75.0]));
        assert_eq!(scaled.unit.symbol, "cm");
        assert!(scaled.log);
        assert_eq!(scaled.name, "h+");
    }

    #[test]
    fn division_builds_quotient_unit() {
        let lum = TaggedArray::new(vec![4.0, 9.0], Unit::erg().div(&Unit::second()), "L", "L");
        let num = TaggedArray::new(
            vec![2.0, 3.0],
            Unit::dimensionless().div(&Unit::second()),
            "N",
            "N",
        );
        let q = lum.try_div(&num).unwrap();
        assert_eq!(q.values, vec![2.0, 3.0]);
        assert_eq!(q.unit.dims, Unit::erg().dims);
    }

    #[test]
    fn division_by_zero_propagates_ieee() {
        let a = TaggedArray::new(vec![1.0, 0.0], Unit::erg(), "a", "a");
        let b = TaggedArray::new(vec![0.0, 0.0], Unit::dimensionless(), "b", "b");
        let q = a.try_div(&b).unwrap();
        assert!(q.values[0].is_infinite());
        assert!(q.values[1].is_nan());
    }

    #[test]
    fn series_rejects_mismatched_lengths() {
        let data = TaggedArray::new(vec![1.0, 2.0], Unit::erg(), "e", "e");
        let err = TaggedSeries::new(data, time_axis(vec![0.0])).unwrap_err();
        assert!(matches!(err, Error::LengthMismatch { left: 2, right: 1 }));
    }
}
