/// Per-quantity accessors and the string registry the command line uses.
pub mod global;
pub mod gw;
pub mod selectors;

use std::str::FromStr;

use crate::config::SimulationConfig;
use crate::data::model::TaggedSeries;
use crate::data::pipeline::SeriesOptions;
use crate::error::{Error, Result};
use gw::StrainOptions;
use selectors::{Bound, Extremum, Flavour, GwComponent, KineticComponent, MagneticComponent};

// ---------------------------------------------------------------------------
// Time-series quantities by name
// ---------------------------------------------------------------------------

/// Every accessor that yields time series, addressable by identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    NeutrinoLuminosity,
    NeutrinoNumberLuminosity,
    NeutrinoMeanEnergy,
    TotalMass,
    Rho,
    Ye,
    Temperature,
    Entropy,
    GasPressure,
    RadialVelocity,
    ThetaVelocity,
    PhiVelocity,
    RotationalEnergy,
    InternalEnergy,
    MagneticEnergy,
    KineticEnergy,
    GwStrain,
    GwEnergyRate,
}

impl Quantity {
    pub const ALL: [Quantity; 18] = [
        Quantity::NeutrinoLuminosity,
        Quantity::NeutrinoNumberLuminosity,
        Quantity::NeutrinoMeanEnergy,
        Quantity::TotalMass,
        Quantity::Rho,
        Quantity::Ye,
        Quantity::Temperature,
        Quantity::Entropy,
        Quantity::GasPressure,
        Quantity::RadialVelocity,
        Quantity::ThetaVelocity,
        Quantity::PhiVelocity,
        Quantity::RotationalEnergy,
        Quantity::InternalEnergy,
        Quantity::MagneticEnergy,
        Quantity::KineticEnergy,
        Quantity::GwStrain,
        Quantity::GwEnergyRate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Quantity::NeutrinoLuminosity => "neutrino_luminosity",
            Quantity::NeutrinoNumberLuminosity => "neutrino_number_luminosity",
            Quantity::NeutrinoMeanEnergy => "neutrino_mean_energy",
            Quantity::TotalMass => "total_mass",
            Quantity::Rho => "rho",
            Quantity::Ye => "ye",
            Quantity::Temperature => "temperature",
            Quantity::Entropy => "entropy",
            Quantity::GasPressure => "gas_pressure",
            Quantity::RadialVelocity => "radial_velocity",
            Quantity::ThetaVelocity => "theta_velocity",
            Quantity::PhiVelocity => "phi_velocity",
            Quantity::RotationalEnergy => "rotational_energy",
            Quantity::InternalEnergy => "internal_energy",
            Quantity::MagneticEnergy => "magnetic_energy",
            Quantity::KineticEnergy => "kinetic_energy",
            Quantity::GwStrain => "gw_strain",
            Quantity::GwEnergyRate => "gw_energy_rate",
        }
    }

    /// Selector a quantity uses when none is given.
    pub fn default_component(&self) -> Option<&'static str> {
        match self {
            Quantity::NeutrinoLuminosity
            | Quantity::NeutrinoNumberLuminosity
            | Quantity::NeutrinoMeanEnergy
            | Quantity::GwStrain => Some("all"),
            Quantity::Rho | Quantity::Temperature | Quantity::Entropy | Quantity::GasPressure => {
                Some("max")
            }
            Quantity::Ye => Some("cent"),
            Quantity::MagneticEnergy | Quantity::KineticEnergy => Some("tot"),
            _ => None,
        }
    }
}

impl clap::ValueEnum for Quantity {
    fn value_variants<'a>() -> &'a [Self] {
        &Self::ALL
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.as_str()))
    }
}

impl FromStr for Quantity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Quantity::ALL
            .into_iter()
            .find(|q| q.as_str() == s)
            .ok_or_else(|| Error::not_recognized("quantity", s))
    }
}

/// Evaluate `quantity` with an optional component selector string.
///
/// Quantities without components reject any selector before touching the
/// logs.
pub fn evaluate(
    sim: &SimulationConfig,
    quantity: Quantity,
    comp: Option<&str>,
    opts: &SeriesOptions,
) -> Result<Vec<TaggedSeries>> {
    let comp = match (comp, quantity.default_component()) {
        (Some(c), None) => return Err(Error::not_recognized(quantity.as_str(), c)),
        (Some(c), Some(_)) => c,
        (None, default) => default.unwrap_or(""),
    };
    let one = |s: TaggedSeries| vec![s];
    Ok(match quantity {
        Quantity::NeutrinoLuminosity => {
            global::neutrino_luminosity(sim, comp.parse::<Flavour>()?, opts)?
        }
        Quantity::NeutrinoNumberLuminosity => {
            global::neutrino_number_luminosity(sim, comp.parse::<Flavour>()?, opts)?
        }
        Quantity::NeutrinoMeanEnergy => {
            global::neutrino_mean_energies(sim, comp.parse::<Flavour>()?, opts)?
        }
        Quantity::TotalMass => one(global::total_mass(sim, opts)?),
        Quantity::Rho => one(global::rho(sim, comp.parse::<Bound>()?, opts)?),
        Quantity::Ye => one(global::ye(sim, comp.parse::<Extremum>()?, opts)?),
        Quantity::Temperature => one(global::temperature(sim, comp.parse::<Extremum>()?, opts)?),
        Quantity::Entropy => one(global::entropy(sim, comp.parse::<Extremum>()?, opts)?),
        Quantity::GasPressure => one(global::gas_pressure(sim, comp.parse::<Bound>()?, opts)?),
        Quantity::RadialVelocity => one(global::radial_velocity(sim, opts)?),
        Quantity::ThetaVelocity => one(global::theta_velocity(sim, opts)?),
        Quantity::PhiVelocity => one(global::phi_velocity(sim, opts)?),
        Quantity::RotationalEnergy => one(global::rotational_energy(sim, opts)?),
        Quantity::InternalEnergy => one(global::internal_energy(sim, opts)?),
        Quantity::MagneticEnergy => {
            one(global::magnetic_energy(sim, comp.parse::<MagneticComponent>()?, opts)?)
        }
        Quantity::KineticEnergy => {
            one(global::kinetic_energy(sim, comp.parse::<KineticComponent>()?, opts)?)
        }
        Quantity::GwStrain => gw::gw_strain(
            sim,
            comp.parse::<GwComponent>()?,
            &StrainOptions::default(),
            opts,
        )?,
        Quantity::GwEnergyRate => one(gw::gw_energy_rate(sim, false, opts)?),
    })
}
