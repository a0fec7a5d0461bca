//! Post-processing of core-collapse supernova simulation logs.
//!
//! Every accessor reads a fixed-format text log named by a
//! [`SimulationConfig`], picks its columns through a named schema, tags the
//! result with units and display hints and runs it through the shared
//! [`pipeline`](data::pipeline): bounce-time shift, then time derivative,
//! then smoothing.
//!
//! ```no_run
//! use sn_diagnostics::quantities::{global, selectors::Flavour};
//! use sn_diagnostics::{SeriesOptions, SimulationConfig};
//!
//! let sim = SimulationConfig::from_json_file("run/sim.json".as_ref())?;
//! let lum = global::neutrino_luminosity(&sim, Flavour::All, &SeriesOptions::default())?;
//! assert_eq!(lum.len(), 3);
//! # Ok::<(), sn_diagnostics::Error>(())
//! ```

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod quantities;
pub mod units;

pub use config::SimulationConfig;
pub use data::model::{FrequencySeries, TaggedArray, TaggedSeries};
pub use data::pipeline::{SeriesOptions, SmoothOptions};
pub use error::{Error, Result};
pub use units::Unit;
