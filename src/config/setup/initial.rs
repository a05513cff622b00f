use crate::error::ConfigurationError;
use crate::state::SimState;

use nalgebra::DVector;

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(tag = "type")]
pub enum InitialConditionConfig {
    #[default]
    Rest,
    Impulse(ImpulseConfig),
    Explicit(ExplicitConfig),
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct ImpulseConfig {
    pub index: usize,
    pub magnitude: f64,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct ExplicitConfig {
    pub displacements: Vec<f64>,
}

impl InitialConditionConfig {
    pub fn validate(&self, n: usize) -> Result<(), ConfigurationError> {
        match self {
            InitialConditionConfig::Rest => Ok(()),
            InitialConditionConfig::Impulse(ImpulseConfig { index, magnitude }) => {
                if *index >= n {
                    Err(ConfigurationError::ImpulseIndexOutOfRange { index: *index, n })
                } else if !magnitude.is_finite() {
                    Err(ConfigurationError::NonFiniteParameter {
                        name: "initial.magnitude",
                        value: *magnitude,
                    })
                } else {
                    Ok(())
                }
            }
            InitialConditionConfig::Explicit(ExplicitConfig { displacements }) => {
                if displacements.len() != n {
                    return Err(ConfigurationError::InitialLengthMismatch {
                        got: displacements.len(),
                        expected: n,
                    });
                }
                match displacements.iter().find(|x| !x.is_finite()) {
                    Some(&value) => Err(ConfigurationError::NonFiniteParameter {
                        name: "initial.displacements",
                        value,
                    }),
                    None => Ok(()),
                }
            }
        }
    }
}

// The seeded shape starts at rest: previous equals current.
pub fn initialize_state(
    config: &InitialConditionConfig,
    n: usize,
) -> Result<SimState, ConfigurationError> {
    config.validate(n)?;
    let current = match config {
        InitialConditionConfig::Rest => DVector::zeros(n),
        InitialConditionConfig::Impulse(ImpulseConfig { index, magnitude }) => {
            let mut x = DVector::zeros(n);
            x[*index] = *magnitude;
            x
        }
        InitialConditionConfig::Explicit(ExplicitConfig { displacements }) => {
            DVector::from_column_slice(displacements)
        }
    };
    Ok(SimState::new(current.clone(), current))
}
