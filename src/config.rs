use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Log file names
// ---------------------------------------------------------------------------

/// File names of the individual logs inside the log directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogFiles {
    pub integrated_nu: String,
    pub rho_max: String,
    pub energy: String,
    pub velocity: String,
    pub magnetic: String,
    pub gravitational_waves: String,
}

impl Default for LogFiles {
    fn default() -> Self {
        LogFiles {
            integrated_nu: "neu.dat".to_string(),
            rho_max: "rho.dat".to_string(),
            energy: "erg.dat".to_string(),
            velocity: "vel.dat".to_string(),
            magnetic: "mag.dat".to_string(),
            gravitational_waves: "grw.dat".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// SimulationConfig
// ---------------------------------------------------------------------------

/// Everything the accessors need to know about one simulation.
///
/// Expected JSON:
///
/// ```json
/// {
///   "name": "s15-2D",
///   "log_dir": "outp-log",
///   "dim": 2,
///   "tob": 0.2875,
///   "files": { "energy": "erg.dat" },
///   "asd_dir": "asd"
/// }
/// ```
///
/// `files` may be partial or omitted; relative paths resolve against the
/// directory holding the JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default)]
    pub name: String,
    pub log_dir: PathBuf,
    dim: u8,
    /// Time of bounce in seconds.
    tob: f64,
    #[serde(default)]
    pub files: LogFiles,
    #[serde(default)]
    pub asd_dir: Option<PathBuf>,
}

impl SimulationConfig {
    pub fn new(log_dir: impl Into<PathBuf>, dim: u8, tob: f64) -> Result<Self> {
        let config = SimulationConfig {
            name: String::new(),
            log_dir: log_dir.into(),
            dim,
            tob,
            files: LogFiles::default(),
            asd_dir: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON configuration file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let mut config: SimulationConfig = serde_json::from_str(&text)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        if config.log_dir.is_relative() {
            config.log_dir = base.join(&config.log_dir);
        }
        if let Some(asd) = config.asd_dir.as_mut() {
            if asd.is_relative() {
                *asd = base.join(&*asd);
            }
        }
        config.validate()?;
        debug!(
            "simulation '{}': {}D, tob = {} s, logs in {}",
            config.name,
            config.dim,
            config.tob,
            config.log_dir.display()
        );
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(1..=3).contains(&self.dim) {
            return Err(Error::InvalidConfig(format!(
                "dim must be 1, 2 or 3, got {}",
                self.dim
            )));
        }
        if !self.tob.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "tob must be finite, got {}",
                self.tob
            )));
        }
        Ok(())
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_asd_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.asd_dir = Some(dir.into());
        self
    }

    pub fn dim(&self) -> u8 {
        self.dim
    }

    pub fn tob(&self) -> f64 {
        self.tob
    }

    pub fn integrated_nu_path(&self) -> PathBuf {
        self.log_dir.join(&self.files.integrated_nu)
    }

    pub fn rho_max_path(&self) -> PathBuf {
        self.log_dir.join(&self.files.rho_max)
    }

    pub fn energy_path(&self) -> PathBuf {
        self.log_dir.join(&self.files.energy)
    }

    pub fn velocity_path(&self) -> PathBuf {
        self.log_dir.join(&self.files.velocity)
    }

    pub fn magnetic_path(&self) -> PathBuf {
        self.log_dir.join(&self.files.magnetic)
    }

    pub fn gw_path(&self) -> PathBuf {
        self.log_dir.join(&self.files.gravitational_waves)
    }

    /// Directory holding detector sensitivity curves; defaults to `asd/`
    /// inside the log directory.
    pub fn asd_dir(&self) -> PathBuf {
        self.asd_dir
            .clone()
            .unwrap_or_else(|| self.log_dir.join("asd"))
    }
}
