use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Physical constants (CGS)
// ---------------------------------------------------------------------------

pub const SPEED_OF_LIGHT: f64 = 2.997_924_58e10;
pub const GRAVITATIONAL_CONSTANT: f64 = 6.674_30e-8;
pub const SOLAR_MASS: f64 = 1.988_409_870_698_051e33;
pub const KILOPARSEC: f64 = 3.085_677_581_491_367e21;
pub const MEV: f64 = 1.602_176_634e-6;
pub const BOLTZMANN: f64 = 1.380_649e-16;

// ---------------------------------------------------------------------------
// Dimensions
// ---------------------------------------------------------------------------

/// Exponents over (mass, length, time, temperature), stored doubled so that
/// half-integer powers such as `Hz^-1/2` stay exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Dimensions {
    mass: i8,
    length: i8,
    time: i8,
    temperature: i8,
}

impl Dimensions {
    pub const NONE: Dimensions = Dimensions::new(0, 0, 0, 0);

    pub const fn new(mass: i8, length: i8, time: i8, temperature: i8) -> Self {
        Dimensions {
            mass: mass * 2,
            length: length * 2,
            time: time * 2,
            temperature: temperature * 2,
        }
    }

    fn combine(self, other: Dimensions, sign: i8) -> Self {
        Dimensions {
            mass: self.mass + sign * other.mass,
            length: self.length + sign * other.length,
            time: self.time + sign * other.time,
            temperature: self.temperature + sign * other.temperature,
        }
    }

    fn times(self, n: i8) -> Self {
        Dimensions {
            mass: self.mass * n,
            length: self.length * n,
            time: self.time * n,
            temperature: self.temperature * n,
        }
    }

    /// Square root; `None` unless every exponent is a whole number.
    fn halve(self) -> Option<Self> {
        let exps = [self.mass, self.length, self.time, self.temperature];
        if exps.iter().any(|e| e % 2 != 0) {
            return None;
        }
        Some(Dimensions {
            mass: self.mass / 2,
            length: self.length / 2,
            time: self.time / 2,
            temperature: self.temperature / 2,
        })
    }
}

// ---------------------------------------------------------------------------
// Unit
// ---------------------------------------------------------------------------

/// A physical unit: display symbol, factor to CGS and dimensions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Unit {
    pub symbol: String,
    pub scale: f64,
    pub dims: Dimensions,
}

impl Unit {
    pub fn new(symbol: &str, scale: f64, dims: Dimensions) -> Self {
        Unit {
            symbol: symbol.to_string(),
            scale,
            dims,
        }
    }

    pub fn dimensionless() -> Self {
        Unit::new("", 1.0, Dimensions::NONE)
    }

    pub fn second() -> Self {
        Unit::new("s", 1.0, Dimensions::new(0, 0, 1, 0))
    }

    pub fn millisecond() -> Self {
        Unit::new("ms", 1e-3, Dimensions::new(0, 0, 1, 0))
    }

    pub fn hertz() -> Self {
        Unit::new("Hz", 1.0, Dimensions::new(0, 0, -1, 0))
    }

    /// Unit of amplitude spectral densities.
    pub fn per_root_hertz() -> Self {
        let dims = Dimensions {
            time: 1,
            ..Dimensions::NONE
        };
        Unit::new("Hz^-1/2", 1.0, dims)
    }

    pub fn gram() -> Self {
        Unit::new("g", 1.0, Dimensions::new(1, 0, 0, 0))
    }

    pub fn solar_mass() -> Self {
        Unit::new("M_sun", SOLAR_MASS, Dimensions::new(1, 0, 0, 0))
    }

    pub fn centimeter() -> Self {
        Unit::new("cm", 1.0, Dimensions::new(0, 1, 0, 0))
    }

    pub fn kiloparsec() -> Self {
        Unit::new("kpc", KILOPARSEC, Dimensions::new(0, 1, 0, 0))
    }

    pub fn erg() -> Self {
        Unit::new("erg", 1.0, Dimensions::new(1, 2, -2, 0))
    }

    pub fn mev() -> Self {
        Unit::new("MeV", MEV, Dimensions::new(1, 2, -2, 0))
    }

    /// Barye, the CGS pressure unit.
    pub fn barye() -> Self {
        Unit::new("Ba", 1.0, Dimensions::new(1, -1, -2, 0))
    }

    pub fn boltzmann() -> Self {
        Unit::new("k_B", BOLTZMANN, Dimensions::new(1, 2, -2, -1))
    }

    /// Baryon count; dimensionless, kept for the entropy symbol.
    pub fn baryon() -> Self {
        Unit::new("baryon", 1.0, Dimensions::NONE)
    }

    pub fn is_dimensionless(&self) -> bool {
        self.dims == Dimensions::NONE
    }

    /// Factor converting a value in `self` into a value in `target`.
    pub fn conversion_factor(&self, target: &Unit) -> Result<f64> {
        if self.dims != target.dims {
            return Err(Error::IncompatibleUnits {
                from: self.to_string(),
                to: target.to_string(),
            });
        }
        Ok(self.scale / target.scale)
    }

    pub fn mul(&self, other: &Unit) -> Unit {
        let symbol = match (self.symbol.is_empty(), other.symbol.is_empty()) {
            (true, _) => other.symbol.clone(),
            (_, true) => self.symbol.clone(),
            _ => format!("{} {}", self.symbol, other.symbol),
        };
        Unit {
            symbol,
            scale: self.scale * other.scale,
            dims: self.dims.combine(other.dims, 1),
        }
    }

    pub fn div(&self, other: &Unit) -> Unit {
        let numerator = if self.symbol.is_empty() {
            "1"
        } else {
            self.symbol.as_str()
        };
        let symbol = if other.symbol.is_empty() {
            self.symbol.clone()
        } else if other.symbol.contains(' ') {
            format!("{numerator} / ({})", other.symbol)
        } else {
            format!("{numerator} / {}", other.symbol)
        };
        Unit {
            symbol,
            scale: self.scale / other.scale,
            dims: self.dims.combine(other.dims, -1),
        }
    }

    pub fn powi(&self, n: i8) -> Unit {
        let symbol = if self.symbol.is_empty() || n == 1 {
            self.symbol.clone()
        } else if self.symbol.contains(' ') {
            format!("({})^{n}", self.symbol)
        } else {
            format!("{}^{n}", self.symbol)
        };
        Unit {
            symbol,
            scale: self.scale.powi(n as i32),
            dims: self.dims.times(n),
        }
    }

    /// Fails when an exponent is already half-integer: exponents are tracked
    /// in halves, so `Hz^-1/2` has no square root here.
    pub fn sqrt(&self) -> Result<Unit> {
        let dims = self.dims.halve().ok_or_else(|| Error::FractionalExponent {
            unit: self.symbol.clone(),
        })?;
        let symbol = if self.symbol.is_empty() {
            String::new()
        } else {
            format!("({})^1/2", self.symbol)
        };
        Ok(Unit {
            symbol,
            scale: self.scale.sqrt(),
            dims,
        })
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.symbol.is_empty() {
            write!(f, "dimensionless")
        } else {
            write!(f, "{}", self.symbol)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luminosity_over_number_rate_is_energy() {
        let lum = Unit::erg().div(&Unit::second());
        let num = Unit::dimensionless().div(&Unit::second());
        let energy = lum.div(&num);
        assert_eq!(energy.dims, Unit::erg().dims);
        let factor = energy.conversion_factor(&Unit::mev()).unwrap();
        assert!((factor - 1.0 / MEV).abs() / factor < 1e-12);
    }

    #[test]
    fn incompatible_conversion_fails() {
        let err = Unit::gram().conversion_factor(&Unit::second()).unwrap_err();
        assert!(matches!(err, Error::IncompatibleUnits { .. }));
    }

    #[test]
    fn square_root_of_inverse_hertz() {
        let u = Unit::hertz().powi(-1).sqrt().unwrap();
        assert_eq!(u.dims, Unit::per_root_hertz().dims);
        assert_eq!(u.dims, Unit::second().sqrt().unwrap().dims);
        assert_eq!(u.powi(2).dims, Unit::second().dims);
    }

    #[test]
    fn half_integer_exponents_have_no_square_root() {
        let err = Unit::per_root_hertz().sqrt().unwrap_err();
        assert!(matches!(err, Error::FractionalExponent { ref unit } if unit == "Hz^-1/2"));
        let quarter = Unit::second().sqrt().unwrap().sqrt();
        assert!(quarter.is_err());
        assert!(Unit::centimeter().powi(4).sqrt().unwrap().sqrt().is_ok());
    }

    #[test]
    fn symbols_compose() {
        assert_eq!(Unit::erg().div(&Unit::second()).symbol, "erg / s");
        assert_eq!(Unit::dimensionless().div(&Unit::second()).symbol, "1 / s");
        assert_eq!(
            Unit::gram().div(&Unit::centimeter().powi(3)).symbol,
            "g / cm^3"
        );
        assert_eq!(Unit::dimensionless().to_string(), "dimensionless");
    }
}
