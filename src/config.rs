//! Simulation configuration and the named pattern table.

use crate::{
    Pos2,
    error::{Error, Result},
};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, io, path::Path, time::Duration};

/// A named stamp of cells, placed relative to an origin
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Pattern {
    /// Offsets from the origin, `x` being the column and `y` the row
    pub cells: Vec<Pos2>,
    pub description: String,
}

impl Pattern {
    pub fn new<I, P>(cells: I, description: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Pos2>,
    {
        Self {
            cells: cells.into_iter().map(Into::into).collect(),
            description: description.into(),
        }
    }
}

/// Parameters for an engine session
///
/// Field names follow the `config.json` layout (`cellSize`, `initialDensity`, ...).
/// Any field missing from the input keeps its [`Default`] value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub width: u32,
    pub height: u32,
    pub cell_size: u32,
    pub live_color: String,
    pub dead_color: String,
    pub grid_color: String,
    pub initial_density: f64,
    /// Milliseconds between animation frames
    pub frame_delay: u64,
    pub patterns: BTreeMap<String, Pattern>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            cell_size: 10,
            live_color: "#000000".to_owned(),
            dead_color: "#ffffff".to_owned(),
            grid_color: "#dddddd".to_owned(),
            initial_density: 0.3,
            frame_delay: 100,
            patterns: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn from_json(value: &str) -> Result<Self> {
        Ok(serde_json::from_str(value)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config = Self::from_json(&std::fs::read_to_string(path)?)?;
        info!(
            "loaded config from {} ({} patterns)",
            path.display(),
            config.patterns.len()
        );
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file falls back to the defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        match Self::load(path.as_ref()) {
            Err(Error::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
                warn!(
                    "no config file found at {}, using default config",
                    path.as_ref().display()
                );
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Checks the constraints the engine relies on but never enforces itself
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("width", self.width),
            ("height", self.height),
            ("cellSize", self.cell_size),
        ] {
            if value == 0 {
                return Err(Error::InvalidConfig(format!("{field} must be positive")));
            }
        }
        if self.patterns.keys().any(|name| name.trim().is_empty()) {
            return Err(Error::InvalidConfig("pattern names must not be empty".into()));
        }
        Ok(())
    }

    /// Adds or replaces a named pattern, returning the one it replaced
    pub fn insert_pattern(&mut self, name: impl Into<String>, pattern: Pattern) -> Option<Pattern> {
        self.patterns.insert(name.into(), pattern)
    }

    #[inline]
    pub fn frame_delay(&self) -> Duration {
        Duration::from_millis(self.frame_delay)
    }
}
