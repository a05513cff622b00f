pub mod initial;
pub mod parameters;

use std::{fs::File, io::Read, path::Path};

use crate::error::{ConfigurationError, SetupError};

use self::{
    initial::InitialConditionConfig,
    parameters::{forcing::ForcingParams, simulation::SimParams, LeftBoundary},
};

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct SetupConfig {
    pub parameters: SimParams,
    // No forcing means the string only evolves from its initial condition.
    #[serde(default)]
    pub forcing: Option<ForcingParams>,
    #[serde(default)]
    pub left_boundary: LeftBoundary,
    #[serde(default)]
    pub initial_condition: InitialConditionConfig,
}

impl Default for SetupConfig {
    // The reference run: a 201-point string driven at its midpoint for one
    // sine period.
    fn default() -> Self {
        SetupConfig {
            parameters: SimParams::default(),
            forcing: Some(ForcingParams::default()),
            left_boundary: LeftBoundary::Fixed,
            initial_condition: InitialConditionConfig::Rest,
        }
    }
}

impl SetupConfig {
    pub fn parse<P: AsRef<Path>>(path: P) -> Result<Self, SetupError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, SetupError> {
        let config: SetupConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.parameters.validate()?;
        let n = self.parameters.n;
        if let Some(forcing) = &self.forcing {
            forcing.validate(n)?;
            let i = forcing.driven_index;
            if i == n - 1 || (i == 0 && self.left_boundary == LeftBoundary::Fixed) {
                return Err(ConfigurationError::DrivenIndexOnFixedBoundary { index: i });
            }
        }
        self.initial_condition.validate(n)
    }

    pub fn print(&self) {
        let p = &self.parameters;
        println!(
            "\
String:
  Points: {n}
  Left boundary: {left:?}
  Right boundary: Fixed

Time:
  Timestep: {dt}
  Last step: {timestep_max}
  End time: {t_max}

Dynamics:
  Spring multiplier: {k}
  Velocity multiplier: {vm}",
            n = p.n,
            left = self.left_boundary,
            dt = p.dt,
            timestep_max = p.timestep_max,
            t_max = p.t_max(),
            k = p.spring_multiplier,
            vm = p.velocity_multiplier,
        );
        match &self.forcing {
            Some(f) => println!(
                "\
Forcing:
  Driven point: {i}
  Waveform: {waveform:?}
  Strength: {strength}
  Duration: {duration}
  Settle time: {settle}",
                i = f.driven_index,
                waveform = f.waveform,
                strength = f.strength,
                duration = f.duration,
                settle = f.settle,
            ),
            None => println!("Forcing: none"),
        }
    }
}
