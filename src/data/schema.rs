use std::fmt;

// ---------------------------------------------------------------------------
// Column position
// ---------------------------------------------------------------------------

/// Position of a field in a log row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    /// Zero-based index from the start of the row.
    At(usize),
    /// One-based index from the end of the row (`FromEnd(1)` is the last).
    FromEnd(usize),
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::At(i) => write!(f, "{i}"),
            Column::FromEnd(k) => write!(f, "-{k}"),
        }
    }
}

/// Every log stores the simulation time in seconds here.
pub const TIME: Column = Column::At(2);

// ---------------------------------------------------------------------------
// Per-file schemas
// ---------------------------------------------------------------------------

/// Integrated neutrino log. Heavy-lepton columns sum over four species.
#[derive(Debug, Clone, Copy)]
pub struct IntegratedNeutrino {
    pub number_nue: Column,
    pub number_nua: Column,
    pub number_nux: Column,
    pub lum_nue: Column,
    pub lum_nua: Column,
    pub lum_nux: Column,
}

pub const INTEGRATED_NEUTRINO: IntegratedNeutrino = IntegratedNeutrino {
    number_nue: Column::At(35),
    number_nua: Column::At(36),
    number_nux: Column::At(37),
    lum_nue: Column::At(38),
    lum_nua: Column::At(39),
    lum_nux: Column::At(40),
};

/// Number of heavy-lepton species folded into the `nux` columns.
pub const HEAVY_LEPTON_SPECIES: f64 = 4.0;

/// Density / electron fraction extrema log.
#[derive(Debug, Clone, Copy)]
pub struct RhoMax {
    pub rho_max: Column,
    pub total_mass: Column,
    pub rho_min: Column,
    pub ye_max: Column,
    pub ye_min: Column,
    pub ye_cent: Column,
}

pub const RHO_MAX: RhoMax = RhoMax {
    rho_max: Column::At(3),
    total_mass: Column::At(4),
    rho_min: Column::At(5),
    ye_max: Column::At(6),
    ye_min: Column::At(7),
    ye_cent: Column::At(8),
};

/// Energy log; thermodynamic extrema sit at the end of the row.
#[derive(Debug, Clone, Copy)]
pub struct Energy {
    pub internal: Column,
    pub kinetic_tot: Column,
    pub kinetic_r: Column,
    pub kinetic_th: Column,
    pub kinetic_ph: Column,
    pub rotational: Column,
    pub pressure_min: Column,
    pub pressure_max: Column,
    pub temperature_min: Column,
    pub temperature_max: Column,
    pub entropy_min: Column,
    pub entropy_max: Column,
    pub entropy_cent: Column,
    pub temperature_cent: Column,
}

pub const ENERGY: Energy = Energy {
    internal: Column::At(4),
    kinetic_tot: Column::At(7),
    kinetic_r: Column::At(8),
    kinetic_th: Column::At(9),
    kinetic_ph: Column::At(10),
    rotational: Column::At(10),
    pressure_min: Column::FromEnd(9),
    pressure_max: Column::FromEnd(8),
    temperature_min: Column::FromEnd(7),
    temperature_max: Column::FromEnd(6),
    entropy_min: Column::FromEnd(5),
    entropy_max: Column::FromEnd(4),
    entropy_cent: Column::FromEnd(3),
    temperature_cent: Column::FromEnd(2),
};

/// Velocity maxima log.
#[derive(Debug, Clone, Copy)]
pub struct Velocity {
    pub radial: Column,
    pub theta: Column,
    pub phi: Column,
}

pub const VELOCITY: Velocity = Velocity {
    radial: Column::FromEnd(3),
    theta: Column::FromEnd(2),
    phi: Column::FromEnd(1),
};

/// Magnetic energy log.
#[derive(Debug, Clone, Copy)]
pub struct Magnetic {
    pub total: Column,
    pub r: Column,
    pub theta: Column,
    pub phi: Column,
}

pub const MAGNETIC: Magnetic = Magnetic {
    total: Column::At(3),
    r: Column::At(4),
    theta: Column::At(5),
    phi: Column::At(6),
};

/// Gravitational-wave log: quadrupole amplitudes `D·h` in cm.
#[derive(Debug, Clone, Copy)]
pub struct GravitationalWaves {
    /// Axisymmetric runs: the single plus polarisation.
    pub plus_2d: Column,
    pub plus_equator: Column,
    pub plus_pole: Column,
    pub cross_equator: Column,
    pub cross_pole: Column,
}

pub const GRAVITATIONAL_WAVES: GravitationalWaves = GravitationalWaves {
    plus_2d: Column::At(3),
    plus_equator: Column::At(3),
    plus_pole: Column::At(4),
    cross_equator: Column::At(5),
    cross_pole: Column::At(6),
};
