//! Global scalar diagnostics: neutrino luminosities and mean energies,
//! density, electron fraction, thermodynamic extrema, velocities and
//! energies.

use crate::config::SimulationConfig;
use crate::data::loader::{load_log, LogTable};
use crate::data::model::{time_axis, TaggedArray, TaggedSeries};
use crate::data::pipeline::{self, Decorations, SeriesOptions};
use crate::data::schema::{
    self, Column, ENERGY, HEAVY_LEPTON_SPECIES, INTEGRATED_NEUTRINO, MAGNETIC, RHO_MAX, VELOCITY,
};
use crate::error::Result;
use crate::quantities::selectors::{Bound, Extremum, Flavour, KineticComponent, MagneticComponent};
use crate::units::Unit;

// ---------------------------------------------------------------------------
// Column → tagged series
// ---------------------------------------------------------------------------

/// Display metadata attached to one column.
#[derive(Debug, Clone, Copy)]
pub struct Tag {
    pub name: &'static str,
    pub label: &'static str,
    pub cmap: Option<&'static str>,
    pub limits: [f64; 2],
    pub log: bool,
}

impl Tag {
    const fn linear(name: &'static str, label: &'static str, limits: [f64; 2]) -> Tag {
        Tag {
            name,
            label,
            cmap: None,
            limits,
            log: false,
        }
    }

    const fn logarithmic(name: &'static str, label: &'static str, limits: [f64; 2]) -> Tag {
        Tag {
            name,
            label,
            cmap: None,
            limits,
            log: true,
        }
    }

    const fn with_cmap(mut self, cmap: &'static str) -> Tag {
        self.cmap = Some(cmap);
        self
    }

    fn array(&self, values: Vec<f64>, unit: Unit) -> TaggedArray {
        let array = TaggedArray::new(values, unit, self.name, self.label)
            .with_limits(self.limits)
            .with_log(self.log);
        match self.cmap {
            Some(cmap) => array.with_cmap(cmap),
            None => array,
        }
    }
}

fn series(table: &LogTable, values: Vec<f64>, unit: Unit, tag: &Tag) -> Result<TaggedSeries> {
    TaggedSeries::new(tag.array(values, unit), time_axis(table.column(schema::TIME)?))
}

fn column_series(table: &LogTable, column: Column, unit: Unit, tag: &Tag) -> Result<TaggedSeries> {
    series(table, table.column(column)?, unit, tag)
}

fn finish(sim: &SimulationConfig, s: TaggedSeries, opts: &SeriesOptions) -> Result<TaggedSeries> {
    pipeline::run(s, Decorations::FULL, opts, sim.tob())
}

// ---------------------------------------------------------------------------
// Neutrinos
// ---------------------------------------------------------------------------

const LUMINOSITY_TAGS: [Tag; 3] = [
    Tag::linear("Lnue", r"$L_\mathrm{\nu_e}$", [0.0, 1e53]),
    Tag::linear("Lnua", r"$L_\mathrm{\overline{\nu}_e}$", [0.0, 1e53]),
    Tag::linear("Lnux", r"$L_\mathrm{\nu_x}$", [0.0, 1e53]),
];

const NUMBER_LUMINOSITY_TAGS: [Tag; 3] = [
    Tag::linear("Lnumnue", r"$N_\mathrm{\nu_e}$", [0.0, 1e55]),
    Tag::linear("Lnumnua", r"$N_\mathrm{\overline{\nu}_e}$", [0.0, 1e55]),
    Tag::linear("Lnumnux", r"$N_\mathrm{\nu_x}$", [0.0, 1e55]),
];

const MEAN_ENERGY_TAGS: [Tag; 3] = [
    Tag::linear("Enue", r"$\langle E_{\nu_\mathrm{e}}\rangle$", [0.0, 30.0]),
    Tag::linear("Enua", r"$\langle E_{\overline{\nu}_\mathrm{e}}\rangle$", [0.0, 30.0]),
    Tag::linear("Enux", r"$\langle E_{\nu_\mathrm{x}}\rangle$", [0.0, 30.0]),
];

fn flavour_index(flavour: Flavour) -> usize {
    match flavour {
        Flavour::Nue | Flavour::All => 0,
        Flavour::Nua => 1,
        Flavour::Nux => 2,
    }
}

/// Load one flavour column; heavy-lepton columns are reported per species.
fn flavour_values(table: &LogTable, columns: [Column; 3], flavour: Flavour) -> Result<Vec<f64>> {
    let values = table.column(columns[flavour_index(flavour)])?;
    Ok(match flavour {
        Flavour::Nux => values.into_iter().map(|v| v / HEAVY_LEPTON_SPECIES).collect(),
        _ => values,
    })
}

fn flavour_series(
    table: &LogTable,
    columns: [Column; 3],
    tags: &[Tag; 3],
    unit: &Unit,
    comp: Flavour,
) -> Result<Vec<TaggedSeries>> {
    comp.expand()
        .iter()
        .map(|&f| {
            let values = flavour_values(table, columns, f)?;
            series(table, values, unit.clone(), &tags[flavour_index(f)])
        })
        .collect()
}

/// Neutrino luminosity in erg/s; `All` yields [nue, nua, nux].
pub fn neutrino_luminosity(
    sim: &SimulationConfig,
    comp: Flavour,
    opts: &SeriesOptions,
) -> Result<Vec<TaggedSeries>> {
    let table = load_log(&sim.integrated_nu_path())?;
    let s = INTEGRATED_NEUTRINO;
    let raw = flavour_series(
        &table,
        [s.lum_nue, s.lum_nua, s.lum_nux],
        &LUMINOSITY_TAGS,
        &Unit::erg().div(&Unit::second()),
        comp,
    )?;
    pipeline::run_all(raw, Decorations::FULL, opts, sim.tob())
}

/// Neutrino number luminosity in 1/s. Only the bounce shift applies.
pub fn neutrino_number_luminosity(
    sim: &SimulationConfig,
    comp: Flavour,
    opts: &SeriesOptions,
) -> Result<Vec<TaggedSeries>> {
    let table = load_log(&sim.integrated_nu_path())?;
    let s = INTEGRATED_NEUTRINO;
    let raw = flavour_series(
        &table,
        [s.number_nue, s.number_nua, s.number_nux],
        &NUMBER_LUMINOSITY_TAGS,
        &Unit::dimensionless().div(&Unit::second()),
        comp,
    )?;
    pipeline::run_all(raw, Decorations::TOB_ONLY, opts, sim.tob())
}

/// Mean neutrino energy `L / N` in MeV.
///
/// Zero number luminosity yields `inf` or `NaN` samples rather than an error.
pub fn neutrino_mean_energies(
    sim: &SimulationConfig,
    comp: Flavour,
    opts: &SeriesOptions,
) -> Result<Vec<TaggedSeries>> {
    let base = SeriesOptions {
        tob_corrected: opts.tob_corrected,
        ..SeriesOptions::default()
    };
    let lum = neutrino_luminosity(sim, comp, &base)?;
    let num = neutrino_number_luminosity(sim, comp, &base)?;

    let mean = comp
        .expand()
        .iter()
        .zip(lum.iter().zip(&num))
        .map(|(&f, (l, n))| {
            let tag = &MEAN_ENERGY_TAGS[flavour_index(f)];
            let mut e = l.try_div(n)?.to(&Unit::mev())?;
            e.data = e
                .data
                .relabel(tag.name, tag.label)
                .with_limits(tag.limits);
            Ok(e)
        })
        .collect::<Result<Vec<_>>>()?;
    pipeline::run_all(mean, Decorations::DERIVE_SMOOTH, opts, sim.tob())
}

// ---------------------------------------------------------------------------
// Density, mass and electron fraction
// ---------------------------------------------------------------------------

/// Total mass on the grid, in solar masses.
pub fn total_mass(sim: &SimulationConfig, opts: &SeriesOptions) -> Result<TaggedSeries> {
    let table = load_log(&sim.rho_max_path())?;
    let tag = Tag::linear("mtot", r"$M_\mathrm{tot}$", [0.0, 10.0]);
    let mass = column_series(&table, RHO_MAX.total_mass, Unit::gram(), &tag)?;
    let mut mass = mass.to(&Unit::solar_mass())?;
    mass.data.limits = Some(tag.limits);
    finish(sim, mass, opts)
}

/// Maximum or minimum density, g/cm³.
pub fn rho(sim: &SimulationConfig, comp: Bound, opts: &SeriesOptions) -> Result<TaggedSeries> {
    let table = load_log(&sim.rho_max_path())?;
    let (column, tag) = match comp {
        Bound::Max => (
            RHO_MAX.rho_max,
            Tag::logarithmic("rho_max", r"$\rho_\mathrm{max}$", [1e4, 1e15]),
        ),
        Bound::Min => (
            RHO_MAX.rho_min,
            Tag::logarithmic("rho_min", r"$\rho_\mathrm{min}$", [1e-3, 1e2]),
        ),
    };
    let unit = Unit::gram().div(&Unit::centimeter().powi(3));
    let s = column_series(&table, column, unit, &tag.with_cmap("viridis"))?;
    finish(sim, s, opts)
}

/// Electron fraction extrema.
pub fn ye(sim: &SimulationConfig, comp: Extremum, opts: &SeriesOptions) -> Result<TaggedSeries> {
    let table = load_log(&sim.rho_max_path())?;
    let (column, tag) = match comp {
        Extremum::Max => (
            RHO_MAX.ye_max,
            Tag::linear("Yemax", r"$Y_\mathrm{e,max}$", [0.0, 1.0]),
        ),
        Extremum::Min => (
            RHO_MAX.ye_min,
            Tag::linear("Yemin", r"$Y_\mathrm{e,min}$", [0.0, 0.5]),
        ),
        Extremum::Cent => (
            RHO_MAX.ye_cent,
            Tag::linear("Yecent", r"$Y_\mathrm{e,cent}$", [0.0, 0.5]),
        ),
    };
    let s = column_series(&table, column, Unit::dimensionless(), &tag)?;
    finish(sim, s, opts)
}

// ---------------------------------------------------------------------------
// Thermodynamics
// ---------------------------------------------------------------------------

/// Temperature extrema, MeV.
pub fn temperature(
    sim: &SimulationConfig,
    comp: Extremum,
    opts: &SeriesOptions,
) -> Result<TaggedSeries> {
    let table = load_log(&sim.energy_path())?;
    let (column, tag) = match comp {
        Extremum::Max => (
            ENERGY.temperature_max,
            Tag::linear("Tmax", r"$T_\mathrm{max}$", [0.0, 40.0]),
        ),
        Extremum::Min => (
            ENERGY.temperature_min,
            Tag::linear("Tmin", r"$T_\mathrm{min}$", [0.0, 1.0]),
        ),
        Extremum::Cent => (
            ENERGY.temperature_cent,
            Tag::linear("Tcent", r"$T_\mathrm{cent}$", [0.0, 40.0]),
        ),
    };
    let s = column_series(&table, column, Unit::mev(), &tag)?;
    finish(sim, s, opts)
}

/// Entropy extrema, k_B per baryon.
pub fn entropy(
    sim: &SimulationConfig,
    comp: Extremum,
    opts: &SeriesOptions,
) -> Result<TaggedSeries> {
    let table = load_log(&sim.energy_path())?;
    let (column, tag) = match comp {
        Extremum::Max => (
            ENERGY.entropy_max,
            Tag::linear("entropymax", r"$s_\mathrm{max}$", [0.0, 100.0]),
        ),
        Extremum::Min => (
            ENERGY.entropy_min,
            Tag::linear("entropymin", r"$s_\mathrm{min}$", [0.0, 1.0]),
        ),
        Extremum::Cent => (
            ENERGY.entropy_cent,
            Tag::linear("entropycent", r"$s_\mathrm{cent}$", [0.0, 5.0]),
        ),
    };
    let unit = Unit::boltzmann().div(&Unit::baryon());
    let s = column_series(&table, column, unit, &tag)?;
    finish(sim, s, opts)
}

/// Gas pressure extrema, Ba.
pub fn gas_pressure(
    sim: &SimulationConfig,
    comp: Bound,
    opts: &SeriesOptions,
) -> Result<TaggedSeries> {
    let table = load_log(&sim.energy_path())?;
    let (column, tag) = match comp {
        Bound::Max => (
            ENERGY.pressure_max,
            Tag::logarithmic("gas_pressuremax", r"$P_\mathrm{gas,max}$", [1e25, 1e34]),
        ),
        Bound::Min => (
            ENERGY.pressure_min,
            Tag::logarithmic("gas_pressuremin", r"$P_\mathrm{gas,min}$", [1e-5, 1e1]),
        ),
    };
    let s = column_series(&table, column, Unit::barye(), &tag)?;
    finish(sim, s, opts)
}

// ---------------------------------------------------------------------------
// Velocities
// ---------------------------------------------------------------------------

fn velocity(
    sim: &SimulationConfig,
    column: Column,
    tag: Tag,
    opts: &SeriesOptions,
) -> Result<TaggedSeries> {
    let table = load_log(&sim.velocity_path())?;
    let unit = Unit::centimeter().div(&Unit::second());
    let s = column_series(&table, column, unit, &tag)?;
    finish(sim, s, opts)
}

/// Maximum radial velocity, cm/s.
pub fn radial_velocity(sim: &SimulationConfig, opts: &SeriesOptions) -> Result<TaggedSeries> {
    let tag = Tag::logarithmic("vrmax", r"$v_\mathrm{r,max}$", [-1e10, 5e10]);
    velocity(sim, VELOCITY.radial, tag, opts)
}

/// Maximum polar velocity, cm/s.
pub fn theta_velocity(sim: &SimulationConfig, opts: &SeriesOptions) -> Result<TaggedSeries> {
    let tag = Tag::logarithmic("vthetamax", r"$v_{\theta,\mathrm{max}}$", [-1e10, 5e10]);
    velocity(sim, VELOCITY.theta, tag, opts)
}

/// Maximum azimuthal velocity, cm/s.
pub fn phi_velocity(sim: &SimulationConfig, opts: &SeriesOptions) -> Result<TaggedSeries> {
    let tag = Tag::logarithmic("vphimax", r"$v_{\phi,\mathrm{max}}$", [-1e10, 5e10]);
    velocity(sim, VELOCITY.phi, tag, opts)
}

// ---------------------------------------------------------------------------
// Energies
// ---------------------------------------------------------------------------

/// Total rotational energy, erg.
pub fn rotational_energy(sim: &SimulationConfig, opts: &SeriesOptions) -> Result<TaggedSeries> {
    let table = load_log(&sim.energy_path())?;
    let tag = Tag::logarithmic("Erottot", r"$E_\mathrm{rot,tot}$", [1e49, 1e53]);
    let s = column_series(&table, ENERGY.rotational, Unit::erg(), &tag)?;
    finish(sim, s, opts)
}

/// Internal energy, erg.
pub fn internal_energy(sim: &SimulationConfig, opts: &SeriesOptions) -> Result<TaggedSeries> {
    let table = load_log(&sim.energy_path())?;
    let tag = Tag::logarithmic("internal_energy", r"$E_{\mathrm{int,max}}$", [1e24, 1e35])
        .with_cmap("nipy_spectral");
    let s = column_series(&table, ENERGY.internal, Unit::erg(), &tag)?;
    finish(sim, s, opts)
}

/// Magnetic energy, erg. The poloidal part is the sum of the r and θ
/// components.
pub fn magnetic_energy(
    sim: &SimulationConfig,
    comp: MagneticComponent,
    opts: &SeriesOptions,
) -> Result<TaggedSeries> {
    let table = load_log(&sim.magnetic_path())?;
    let (values, label) = match comp {
        MagneticComponent::Total => (table.column(MAGNETIC.total)?, r"$E_{\mathrm{mag,tot}}$"),
        MagneticComponent::Poloidal => (
            table.column_sum(&[MAGNETIC.r, MAGNETIC.theta])?,
            r"$E_{\mathrm{mag,pol}}$",
        ),
        MagneticComponent::Toroidal => (table.column(MAGNETIC.phi)?, r"$E_{\mathrm{mag,tor}}$"),
        MagneticComponent::R => (table.column(MAGNETIC.r)?, r"$E_{\mathrm{mag},r}$"),
        MagneticComponent::Theta => (table.column(MAGNETIC.theta)?, r"$E_{\mathrm{mag},\theta}$"),
        MagneticComponent::Phi => (table.column(MAGNETIC.phi)?, r"$E_{\mathrm{mag},\phi}$"),
    };
    let tag = Tag::logarithmic("magnetic_energy", label, [1e30, 1e51]).with_cmap("nipy_spectral");
    let s = series(&table, values, Unit::erg(), &tag)?;
    finish(sim, s, opts)
}

/// Kinetic energy, erg.
pub fn kinetic_energy(
    sim: &SimulationConfig,
    comp: KineticComponent,
    opts: &SeriesOptions,
) -> Result<TaggedSeries> {
    let table = load_log(&sim.energy_path())?;
    let (column, label) = match comp {
        KineticComponent::Total => (ENERGY.kinetic_tot, r"$E_{\mathrm{kin,tot}}$"),
        KineticComponent::R => (ENERGY.kinetic_r, r"$E_{\mathrm{kin},r}$"),
        KineticComponent::Theta => (ENERGY.kinetic_th, r"$E_{\mathrm{kin},\theta}$"),
        KineticComponent::Phi => (ENERGY.kinetic_ph, r"$E_{\mathrm{kin},\phi}$"),
    };
    let tag = Tag::logarithmic("kinetic_energy", label, [1e30, 1e51]).with_cmap("nipy_spectral");
    let s = column_series(&table, column, Unit::erg(), &tag)?;
    finish(sim, s, opts)
}
